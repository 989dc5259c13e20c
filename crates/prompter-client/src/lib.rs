//! Caller-side client for the Prompter broker.
//!
//! Wraps the three JSON endpoints in typed async calls, plus
//! [`PrompterClient::ask`], which submits a prompt and waits for the
//! human's answer in one go. [`recovery`] builds on that to put a
//! retry/skip/cancel decision about a failed operation in front of a
//! human.

pub mod client;
pub mod error;
pub mod recovery;

pub use client::{DEFAULT_WAIT_TIMEOUT, PrompterClient};
pub use error::ClientError;
pub use recovery::{RECOVERY_OPTIONS, RecoveryChoice, recovery_message, run_with_recovery};
