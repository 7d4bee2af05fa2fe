//! Purchase Record Entity
//!
//! One completed plan purchase, appended to the member's history. Stored as
//! a JSON element of the `purchase_records` column.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    /// Plan tier code (`novice`, `amateur`, `pro`)
    pub plan: String,
    /// Price in whole rupees
    pub price: i64,
    /// Billing name entered on the purchase form
    pub name: String,
    pub email: String,
    pub contact: String,
    pub address: String,
    pub purchased_at: DateTime<Utc>,
}
