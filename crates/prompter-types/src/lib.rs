//! Shared type definitions for the Prompter broker.
//!
//! Everything that crosses a process or surface boundary lives here: the
//! prompt identifier, the read-only prompt summary, the JSON bodies of the
//! three network endpoints, and the frames exchanged with the panel.
//! Panel-facing types flow to `TypeScript` via `ts-rs`.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrapper for prompt identifiers
//! - [`prompt`] -- Read-only prompt summary and the default quick answers
//! - [`wire`] -- Request/response bodies with lenient field coercion
//! - [`panel`] -- Tagged messages between the broker and the panel

pub mod ids;
pub mod panel;
pub mod prompt;
pub mod wire;

pub use ids::PromptId;
pub use panel::{PanelAction, PanelFrame};
pub use prompt::{DEFAULT_OPTIONS, PromptSummary};
pub use wire::{AnswerRequest, AnswerResponse, SubmitRequest, SubmitResponse, WaitResponse};
