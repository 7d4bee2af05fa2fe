//! Select Plan Use Case
//!
//! Turns the `/buy?plan=..&price=..` choice of a member into the details
//! shown on the purchase form.

use auth::CurrentUser;
use tracing::{info, warn};

use crate::domain::plan::{Plan, PurchaseDetails};
use crate::error::MembershipResult;

/// Query parameters of `POST /buy`
#[derive(Debug, Clone, Default)]
pub struct SelectPlanInput {
    pub plan: String,
    /// Price as displayed to the visitor; the catalog price wins
    pub price: Option<String>,
}

pub fn select_plan(member: &CurrentUser, input: SelectPlanInput) -> MembershipResult<PurchaseDetails> {
    let plan: Plan = input.plan.parse()?;

    if let Some(claimed) = input.price.as_deref().filter(|p| !p.trim().is_empty()) {
        if claimed.trim().parse::<i64>().ok() != Some(plan.price()) {
            warn!(
                plan = %plan,
                claimed = %claimed,
                catalog = plan.price(),
                "Client price differs from catalog, using catalog price"
            );
        }
    }

    info!(user_id = %member.user_id, plan = %plan, "Plan selected");
    Ok(PurchaseDetails::new(Some(member), Some(plan)))
}
