//! Read-only view of a prompt as stored by the broker.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::PromptId;

/// Quick answers shown for a prompt submitted without options.
///
/// Display only: the stored prompt keeps "no options".
pub const DEFAULT_OPTIONS: [&str; 3] = ["r", "s", "c"];

/// Snapshot of a single prompt, detached from the registry.
///
/// Carries no waiter state; it is what listings and the panel see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PromptSummary {
    /// Identifier assigned at submission.
    pub id: PromptId,
    /// Question text, possibly empty.
    pub message: String,
    /// Quick-answer labels exactly as submitted, if any.
    pub options: Option<Vec<String>>,
    /// Wall-clock submission time.
    pub created_at: DateTime<Utc>,
    /// The first accepted answer, once there is one.
    pub answer: Option<String>,
}

impl PromptSummary {
    /// Whether the prompt still awaits its answer.
    pub const fn is_pending(&self) -> bool {
        self.answer.is_none()
    }

    /// Labels to offer as quick answers, falling back to [`DEFAULT_OPTIONS`].
    pub fn display_options(&self) -> Vec<String> {
        self.options.clone().unwrap_or_else(|| {
            DEFAULT_OPTIONS
                .iter()
                .map(|label| (*label).to_owned())
                .collect()
        })
    }
}
