//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod purchase;
pub mod select_plan;
pub mod submit_feedback;

// Re-exports
pub use config::MembershipConfig;
pub use purchase::{PurchaseInput, PurchaseUseCase};
pub use select_plan::{SelectPlanInput, select_plan};
pub use submit_feedback::SubmitFeedbackUseCase;
