use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::printing::DeviceOutcome;

/// Result of one fetch or delete step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepOutcome {
    Done,
    Failed { reason: String },
}

impl StepOutcome {
    pub fn failed(reason: impl ToString) -> Self {
        Self::Failed {
            reason: reason.to_string(),
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

/// Everything that happened to one remote document.
#[derive(Debug, Clone, Serialize)]
pub struct ItemReport {
    pub name: String,
    pub fetch: StepOutcome,
    pub prints: Vec<DeviceOutcome>,
    pub delete: StepOutcome,
}

/// Outcome of one cycle.
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    /// True iff the listing returned at least one matching document.
    pub work_found: bool,
    /// Why the cycle did nothing: incomplete settings or a failed listing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub items: Vec<ItemReport>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CycleReport {
    pub(crate) fn idle(started_at: DateTime<Utc>, error: Option<String>) -> Self {
        Self {
            work_found: false,
            error,
            items: Vec::new(),
            started_at,
            finished_at: Utc::now(),
        }
    }

    /// Number of documents actually accepted by a device.
    pub fn submission_count(&self) -> usize {
        self.items
            .iter()
            .flat_map(|item| item.prints.iter())
            .filter(|p| p.outcome.is_submitted())
            .count()
    }
}
