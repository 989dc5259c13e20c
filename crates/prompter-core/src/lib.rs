//! Core of the Prompter broker.
//!
//! An external process submits a prompt, a human answers it in the panel
//! (or another caller answers it over the network), and every party
//! waiting on that prompt receives the answer. This crate owns all of that
//! state and none of the transport:
//!
//! - [`registry`] -- the prompts and their pending/answered lifecycle
//! - [`waiters`] -- one-shot signals for callers suspended on an answer
//! - [`broker`] -- the gateway operations (submit, answer, wait, clear)
//! - [`presentation`] -- panel rendering, the singleton surface slot, and
//!   the panel action dispatcher
//! - [`config`] -- typed configuration loaded once at startup
//!
//! # Concurrency
//!
//! The registry, the waiter map, and the panel slot sit behind a single
//! [`tokio::sync::Mutex`] inside [`Broker`]. Every mutation, the release
//! of the waiters it unblocks, and the panel re-render happen in one
//! critical section, so no observer can see an answer without its waiters
//! having been released, and no render can be older than the mutation
//! that triggered it.

pub mod broker;
pub mod config;
pub mod error;
pub mod presentation;
pub mod registry;
pub mod waiters;

pub use broker::{AnswerOutcome, AnswerSource, AnswerWait, Broker};
pub use config::{ConfigError, PrompterConfig};
pub use error::{BrokerError, PanelError};
pub use presentation::{PanelOpen, PanelRenderer, PanelToken, Surface};
