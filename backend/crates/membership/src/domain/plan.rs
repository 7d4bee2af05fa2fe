//! Plan Catalog
//!
//! The three membership tiers offered on `/buy`. The catalog is the only
//! source of prices; a price sent by the client is informational.

use std::fmt;
use std::str::FromStr;

use auth::CurrentUser;

use crate::error::MembershipError;

/// Membership tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Plan {
    Novice,
    Amateur,
    Pro,
}

impl Plan {
    pub const ALL: [Plan; 3] = [Plan::Novice, Plan::Amateur, Plan::Pro];

    /// Code used in query strings, cookies and purchase records
    pub fn code(&self) -> &'static str {
        match self {
            Plan::Novice => "novice",
            Plan::Amateur => "amateur",
            Plan::Pro => "pro",
        }
    }

    /// Upper-case label shown on the purchase form
    pub fn label(&self) -> &'static str {
        match self {
            Plan::Novice => "NOVICE",
            Plan::Amateur => "AMATEUR",
            Plan::Pro => "PRO",
        }
    }

    /// Catalog price in whole rupees
    pub fn price(&self) -> i64 {
        match self {
            Plan::Novice => 999,
            Plan::Amateur => 1999,
            Plan::Pro => 2999,
        }
    }

    pub fn features(&self) -> &'static [&'static str] {
        match self {
            Plan::Novice => &[
                "Full Body Workouts",
                "Access to 75% Gym Equipments",
                "Diet Plan free for 1 Month",
            ],
            Plan::Amateur => &[
                "Full Body Workouts",
                "Access to All Gym Equipments",
                "Diet Plan free for 6 Month",
            ],
            Plan::Pro => &[
                "Full Body Workouts",
                "Access to All Gym Equipments",
                "Diet Plan free for 12 Month",
                "Personal Trainer",
            ],
        }
    }
}

impl FromStr for Plan {
    type Err = MembershipError;

    /// Case-insensitive, surrounding whitespace ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_lowercase();
        Plan::ALL
            .into_iter()
            .find(|plan| plan.code() == code)
            .ok_or_else(|| MembershipError::UnknownPlan(s.trim().to_string()))
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// What the purchase form shows: who is buying which plan
///
/// Built per request from the visitor's session and plan cookie, so two
/// visitors never see each other's selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseDetails {
    /// Member name, empty for anonymous visitors
    pub customer: String,
    pub email: String,
    pub plan: Option<Plan>,
}

impl PurchaseDetails {
    pub fn new(member: Option<&CurrentUser>, plan: Option<Plan>) -> Self {
        let (customer, email) = member
            .map(|m| (m.user_name.to_string(), m.email.to_string()))
            .unwrap_or_default();
        Self {
            customer,
            email,
            plan,
        }
    }

    pub fn price(&self) -> Option<i64> {
        self.plan.map(|p| p.price())
    }
}
