//! Presentation sync: the human-facing panel.
//!
//! The panel itself is hosted outside the core (see the server crate's
//! WebSocket host); the core only sees it through the [`Surface`] trait.
//! [`PanelSlot`] enforces that at most one surface is open, and
//! [`PanelRenderer`] turns the registry listing into panel markup.

use std::sync::Arc;

use minijinja::{Environment, context};
use prompter_types::PromptSummary;
use serde::Serialize;

use crate::error::PanelError;

/// Heading shown at the top of the panel.
pub const PANEL_TITLE: &str = "Prompter";

/// Template name; the `.html` suffix turns on HTML auto-escaping.
const PANEL_TEMPLATE: &str = "panel.html";

/// A visual surface the broker can push markup to.
///
/// Implementations must not block: they are called while the broker holds
/// its state lock.
pub trait Surface: Send + Sync {
    /// Replace the surface contents with `html`.
    fn show(&self, html: String);

    /// Bring the surface to the foreground.
    fn reveal(&self);

    /// Close the surface; it will not be used again.
    fn dispose(&self);
}

/// Identifies one opened surface so a stale close cannot evict a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PanelToken(u64);

/// Result of asking the broker to open the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelOpen {
    /// The offered surface is now the panel.
    Opened(PanelToken),
    /// A panel was already open and has been revealed instead; the offered
    /// surface was not installed.
    Revealed,
}

/// Holder of the single open surface, if any.
#[derive(Default)]
pub struct PanelSlot {
    current: Option<(PanelToken, Arc<dyn Surface>)>,
    next_token: u64,
}

impl PanelSlot {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `surface` unless a panel is already open, in which case
    /// the existing one is revealed.
    pub fn open(&mut self, surface: Arc<dyn Surface>) -> PanelOpen {
        if let Some((_, existing)) = &self.current {
            existing.reveal();
            return PanelOpen::Revealed;
        }
        let token = PanelToken(self.next_token);
        self.next_token = self.next_token.wrapping_add(1);
        self.current = Some((token, surface));
        PanelOpen::Opened(token)
    }

    /// Forget the surface opened with `token`. Returns `false` if that
    /// surface is no longer the current one.
    pub fn close(&mut self, token: PanelToken) -> bool {
        match &self.current {
            Some((current, _)) if *current == token => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    /// The open surface, if any.
    pub fn current(&self) -> Option<&Arc<dyn Surface>> {
        self.current.as_ref().map(|(_, surface)| surface)
    }

    /// Remove and return the open surface.
    pub fn take(&mut self) -> Option<Arc<dyn Surface>> {
        self.current.take().map(|(_, surface)| surface)
    }

    /// Whether a surface is open.
    pub const fn is_open(&self) -> bool {
        self.current.is_some()
    }
}

/// One prompt as the template sees it.
#[derive(Debug, Serialize)]
struct PanelItem {
    id: String,
    message: String,
    options: Vec<String>,
    answer: Option<String>,
    pending: bool,
}

impl From<&PromptSummary> for PanelItem {
    fn from(prompt: &PromptSummary) -> Self {
        Self {
            id: prompt.id.to_string(),
            message: prompt.message.clone(),
            options: prompt.display_options(),
            answer: prompt.answer.clone(),
            pending: prompt.is_pending(),
        }
    }
}

/// Renders the prompt list into panel markup via `minijinja`.
///
/// Every interpolated value is HTML-escaped; prompt text comes from
/// untrusted callers.
pub struct PanelRenderer {
    env: Environment<'static>,
}

impl PanelRenderer {
    /// Compile the embedded panel template.
    pub fn new() -> Result<Self, PanelError> {
        let mut env = Environment::new();
        env.add_template(PANEL_TEMPLATE, include_str!("../templates/panel.html"))?;
        Ok(Self { env })
    }

    /// Render `prompts` (expected oldest first) into panel markup.
    pub fn render(&self, prompts: &[PromptSummary]) -> Result<String, PanelError> {
        let items: Vec<PanelItem> = prompts.iter().map(PanelItem::from).collect();
        let html = self
            .env
            .get_template(PANEL_TEMPLATE)?
            .render(context! { title => PANEL_TITLE, items => items })?;
        Ok(html)
    }
}
