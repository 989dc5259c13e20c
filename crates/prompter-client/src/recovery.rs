//! Human-in-the-loop recovery for failing operations.
//!
//! When an operation fails, the caller asks the human (through the
//! broker) whether to retry it, skip it, or cancel and propagate the
//! error. Any answer that is not one of the three choices means retry.

use std::fmt::Display;
use std::future::Future;

use tracing::{info, warn};

use crate::client::PrompterClient;

/// Quick answers offered with a recovery question.
pub const RECOVERY_OPTIONS: [&str; 3] = ["r", "s", "c"];

/// What to do about a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryChoice {
    /// Run the operation again.
    Retry,
    /// Give up on the operation without an error.
    Skip,
    /// Give up and propagate the error.
    Cancel,
}

impl RecoveryChoice {
    /// Interpret a human answer. Case and surrounding whitespace are
    /// ignored; anything unrecognised is [`RecoveryChoice::Retry`].
    pub fn parse(answer: &str) -> Self {
        match answer.trim().to_lowercase().as_str() {
            "s" | "skip" => Self::Skip,
            "c" | "cancel" => Self::Cancel,
            _ => Self::Retry,
        }
    }
}

/// The question shown to the human for `error`.
pub fn recovery_message(error: &impl Display) -> String {
    format!("Exception: {error}\nOptions: retry (r), skip (s), cancel (c)?")
}

/// Run `op` until it succeeds, asking the human what to do after each
/// failure.
///
/// Returns `Ok(Some(value))` on success, `Ok(None)` if the human chose to
/// skip, and the operation's error if they chose to cancel. If the broker
/// cannot be reached the error is returned as if cancelled.
pub async fn run_with_recovery<T, E, F, Fut>(client: &PrompterClient, mut op: F) -> Result<Option<T>, E>
where
    E: Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    loop {
        let error = match op().await {
            Ok(value) => return Ok(Some(value)),
            Err(error) => error,
        };

        let answer = match client.ask(&recovery_message(&error), &RECOVERY_OPTIONS).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!(error = %e, "Broker unreachable, cancelling");
                return Err(error);
            }
        };

        match RecoveryChoice::parse(&answer) {
            RecoveryChoice::Retry => info!(%error, "Retrying after failure"),
            RecoveryChoice::Skip => {
                info!(%error, "Skipping after failure");
                return Ok(None);
            }
            RecoveryChoice::Cancel => return Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_recognises_short_and_long_forms() {
        assert_eq!(RecoveryChoice::parse("r"), RecoveryChoice::Retry);
        assert_eq!(RecoveryChoice::parse("retry"), RecoveryChoice::Retry);
        assert_eq!(RecoveryChoice::parse(" S "), RecoveryChoice::Skip);
        assert_eq!(RecoveryChoice::parse("Skip"), RecoveryChoice::Skip);
        assert_eq!(RecoveryChoice::parse("c"), RecoveryChoice::Cancel);
        assert_eq!(RecoveryChoice::parse("CANCEL"), RecoveryChoice::Cancel);
    }

    #[test]
    fn anything_else_means_retry() {
        assert_eq!(RecoveryChoice::parse(""), RecoveryChoice::Retry);
        assert_eq!(RecoveryChoice::parse("try once more"), RecoveryChoice::Retry);
    }

    #[test]
    fn message_names_the_error_and_choices() {
        assert_eq!(
            recovery_message(&"disk full"),
            "Exception: disk full\nOptions: retry (r), skip (s), cancel (c)?"
        );
    }
}
