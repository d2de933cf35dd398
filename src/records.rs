use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A server-owned expense row. The client only ever reads these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub amount: f64,
    pub category: String,
    pub payment_method: String,
    pub timestamp: DateTime<Utc>,
}

/// A server-owned savings goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub name: String,
    pub saved: f64,
    pub target: f64,
}

impl Goal {
    /// Progress toward the target as a percentage.
    ///
    /// Not clamped above 100 — an overshot goal reads as e.g. 125%. A
    /// non-positive target reads as 0% rather than dividing by zero.
    pub fn progress_percent(&self) -> f64 {
        if self.target <= 0.0 {
            return 0.0;
        }
        100.0 * self.saved / self.target
    }
}

/// Thirty-day spending summary from the analytics endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total_spent: f64,
    pub avg_expense: f64,
    pub total_expenses: u64,
    pub total_saved: f64,
}
