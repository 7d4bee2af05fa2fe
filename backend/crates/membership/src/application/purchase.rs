//! Purchase Use Case
//!
//! Appends the selected plan, at catalog price, to the member's purchase
//! history.

use std::sync::Arc;

use auth::{CurrentUser, PurchaseRecord, UserRepository};
use chrono::Utc;
use tracing::info;

use crate::domain::plan::Plan;
use crate::error::{MembershipError, MembershipResult};

/// Billing fields of the purchase form
#[derive(Debug, Clone, Default)]
pub struct PurchaseInput {
    pub name: String,
    pub email: String,
    pub contact: String,
    pub address: String,
}

/// Purchase use case
pub struct PurchaseUseCase<R>
where
    R: UserRepository + Send + Sync + 'static,
{
    users: Arc<R>,
}

impl<R> PurchaseUseCase<R>
where
    R: UserRepository + Send + Sync + 'static,
{
    pub fn new(users: Arc<R>) -> Self {
        Self { users }
    }

    pub async fn execute(
        &self,
        member: &CurrentUser,
        plan: Option<Plan>,
        input: PurchaseInput,
    ) -> MembershipResult<PurchaseRecord> {
        let plan = plan.ok_or(MembershipError::NoPlanSelected)?;

        let fields = [
            ("name", &input.name),
            ("email", &input.email),
            ("contact", &input.contact),
            ("address", &input.address),
        ];
        if let Some((field, _)) = fields.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(MembershipError::Validation(format!(
                "The {field} field is required"
            )));
        }

        let record = PurchaseRecord {
            plan: plan.code().to_string(),
            price: plan.price(),
            name: input.name.trim().to_string(),
            email: input.email.trim().to_string(),
            contact: input.contact.trim().to_string(),
            address: input.address.trim().to_string(),
            purchased_at: Utc::now(),
        };

        // Single atomic append; concurrent purchases never overwrite each other
        self.users.append_purchase(&member.user_id, &record).await?;

        info!(
            user_id = %member.user_id,
            plan = %plan,
            price = record.price,
            "Purchase recorded"
        );

        Ok(record)
    }
}
