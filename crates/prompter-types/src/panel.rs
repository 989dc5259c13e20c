//! Messages exchanged between the broker and the panel surface.
//!
//! Both directions are closed, internally tagged enums so that the panel
//! script and the dispatcher agree on a single `type` field.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// An action taken by the human in the panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum PanelAction {
    /// Answer a prompt with a quick option or free text.
    Answer {
        /// Id string of the prompt, as rendered.
        id: String,
        /// Chosen or typed answer.
        #[serde(default)]
        answer: String,
    },
    /// Remove every answered prompt from the list.
    Clear,
}

/// A frame pushed from the broker to the panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum PanelFrame {
    /// Replace the panel body with freshly rendered markup.
    Render {
        /// Full prompt list markup.
        html: String,
    },
    /// Bring the existing panel to the foreground.
    Reveal,
    /// Sent to a second panel before it is closed; the first one stays.
    Duplicate,
}
