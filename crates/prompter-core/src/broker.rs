//! The gateway: every operation that reads or mutates broker state.
//!
//! Both front doors, network callers and the panel, go through
//! [`Broker`]; neither touches the registry directly.
//!
//! | Operation | Suspends | Panel refresh |
//! |-----------|----------|---------------|
//! | [`Broker::submit`] | no | yes |
//! | [`Broker::answer`] | no | on a fresh answer |
//! | [`Broker::wait`] | until answered | no |
//! | [`Broker::clear_answered`] | no | yes |

use std::sync::Arc;

use prompter_types::{PanelAction, PromptId, PromptSummary, SubmitRequest};
use tokio::sync::{Mutex, oneshot};
use tracing::{debug, info, warn};

use crate::error::{BrokerError, PanelError};
use crate::presentation::{PanelOpen, PanelRenderer, PanelSlot, PanelToken, Surface};
use crate::registry::Registry;
use crate::waiters::WaiterSet;

/// Where an answer came from, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerSource {
    /// A `POST /answer` caller.
    Network,
    /// A human in the panel.
    Panel,
}

impl core::fmt::Display for AnswerSource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Network => f.write_str("network"),
            Self::Panel => f.write_str("panel"),
        }
    }
}

/// Outcome of a successful [`Broker::answer`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// The answer was stored and this many waiters received it.
    Accepted {
        /// Waiters that were still listening when released.
        released: usize,
    },
    /// The prompt already had an answer; nothing changed.
    AlreadyAnswered,
}

/// A pending or already satisfied wait on one prompt.
///
/// Obtained from [`Broker::await_answer`] without suspending; awaiting it
/// with [`AnswerWait::resolve`] is the suspension point.
#[derive(Debug)]
pub enum AnswerWait {
    /// The prompt was already answered.
    Ready(String),
    /// Registered as a waiter; resolves when the prompt is answered.
    Pending(oneshot::Receiver<String>),
}

impl AnswerWait {
    /// Wait for the answer.
    ///
    /// Fails with [`BrokerError::Closed`] if the broker shuts down first.
    pub async fn resolve(self) -> Result<String, BrokerError> {
        match self {
            Self::Ready(answer) => Ok(answer),
            Self::Pending(rx) => match rx.await {
                Ok(answer) => Ok(answer),
                Err(_closed) => Err(BrokerError::Closed),
            },
        }
    }
}

/// State guarded by the broker lock.
struct BrokerInner {
    registry: Registry,
    waiters: WaiterSet,
    panel: PanelSlot,
    closed: bool,
}

/// The process-wide prompt broker.
///
/// Constructed once at startup and shared behind an [`Arc`] with the
/// network layer and the panel host.
pub struct Broker {
    inner: Mutex<BrokerInner>,
    renderer: PanelRenderer,
}

impl Broker {
    /// Create an empty broker with no panel open.
    pub fn new() -> Result<Self, PanelError> {
        Ok(Self {
            inner: Mutex::new(BrokerInner {
                registry: Registry::new(),
                waiters: WaiterSet::new(),
                panel: PanelSlot::new(),
                closed: false,
            }),
            renderer: PanelRenderer::new()?,
        })
    }

    // -----------------------------------------------------------------------
    // Gateway operations
    // -----------------------------------------------------------------------

    /// Create a pending prompt and return its id.
    pub async fn submit(&self, request: SubmitRequest) -> PromptId {
        let mut inner = self.inner.lock().await;
        let option_count = request.options.as_ref().map(Vec::len);
        let id = inner.registry.create(request.message, request.options);
        info!(prompt_id = %id, ?option_count, "Prompt submitted");
        self.refresh(&inner);
        id
    }

    /// Answer a prompt by its raw id string.
    ///
    /// The first answer is stored and releases every waiter in
    /// registration order, all under one lock. Later answers leave the
    /// stored one in place and report [`AnswerOutcome::AlreadyAnswered`].
    pub async fn answer(
        &self,
        raw_id: &str,
        answer: String,
        source: AnswerSource,
    ) -> Result<AnswerOutcome, BrokerError> {
        let mut inner = self.inner.lock().await;
        let id = Self::known_id(&inner, raw_id)?;

        if !inner.registry.set_answer(&id, &answer) {
            debug!(prompt_id = %id, %source, "Prompt already answered, ignoring");
            return Ok(AnswerOutcome::AlreadyAnswered);
        }

        let released = inner.waiters.release(&id, &answer);
        info!(prompt_id = %id, %source, released, "Prompt answered");
        self.refresh(&inner);
        Ok(AnswerOutcome::Accepted { released })
    }

    /// Start waiting for a prompt's answer without suspending.
    ///
    /// Returns [`AnswerWait::Ready`] if the prompt is already answered,
    /// otherwise registers a waiter. Unknown ids fail immediately.
    pub async fn await_answer(&self, raw_id: &str) -> Result<AnswerWait, BrokerError> {
        let mut inner = self.inner.lock().await;
        if inner.closed {
            return Err(BrokerError::Closed);
        }
        let id = Self::known_id(&inner, raw_id)?;

        if let Some(answer) = inner.registry.get(&id).and_then(|p| p.answer.clone()) {
            return Ok(AnswerWait::Ready(answer));
        }

        let rx = inner.waiters.register(id);
        debug!(prompt_id = %id, waiters = inner.waiters.outstanding(&id), "Waiter registered");
        Ok(AnswerWait::Pending(rx))
    }

    /// Wait until the prompt is answered and return the answer.
    ///
    /// There is no timeout: a prompt that is never answered keeps the
    /// caller suspended until the broker shuts down.
    pub async fn wait(&self, raw_id: &str) -> Result<String, BrokerError> {
        self.await_answer(raw_id).await?.resolve().await
    }

    /// Remove every answered prompt and return how many were removed.
    pub async fn clear_answered(&self) -> usize {
        let mut inner = self.inner.lock().await;
        let removed = inner.registry.clear_answered().len();
        info!(removed, remaining = inner.registry.len(), "Cleared answered prompts");
        self.refresh(&inner);
        removed
    }

    // -----------------------------------------------------------------------
    // Read-only views
    // -----------------------------------------------------------------------

    /// Look up one prompt by its raw id string.
    pub async fn get(&self, raw_id: &str) -> Option<PromptSummary> {
        let inner = self.inner.lock().await;
        let id = PromptId::parse(raw_id)?;
        inner.registry.get(&id).cloned()
    }

    /// Every prompt, oldest first.
    pub async fn list(&self) -> Vec<PromptSummary> {
        self.inner.lock().await.registry.list_ordered()
    }

    // -----------------------------------------------------------------------
    // Panel
    // -----------------------------------------------------------------------

    /// Offer a surface as the panel.
    ///
    /// If no panel is open the surface is installed and immediately shown
    /// the current list. Otherwise the open panel is revealed and the
    /// offered surface is left untouched.
    pub async fn open_panel(&self, surface: Arc<dyn Surface>) -> PanelOpen {
        let mut inner = self.inner.lock().await;
        let outcome = inner.panel.open(surface);
        match outcome {
            PanelOpen::Opened(_) => {
                info!("Panel opened");
                self.refresh(&inner);
            }
            PanelOpen::Revealed => debug!("Panel already open, revealed existing"),
        }
        outcome
    }

    /// Forget the panel opened with `token`, once its host has gone away.
    pub async fn close_panel(&self, token: PanelToken) {
        if self.inner.lock().await.panel.close(token) {
            info!("Panel disposed");
        }
    }

    /// Route a human action from the panel into the gateway.
    pub async fn dispatch(&self, action: PanelAction) {
        match action {
            PanelAction::Answer { id, answer } => {
                if let Err(e) = self.answer(&id, answer, AnswerSource::Panel).await {
                    debug!(error = %e, "Panel answer ignored");
                }
            }
            PanelAction::Clear => {
                self.clear_answered().await;
            }
        }
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Stop the broker.
    ///
    /// Every suspended wait resolves with [`BrokerError::Closed`] and the
    /// panel is disposed, so the hosting server can finish its in-flight
    /// requests and release the listener. Idempotent.
    pub async fn shutdown(&self) {
        let mut inner = self.inner.lock().await;
        if inner.closed {
            return;
        }
        inner.closed = true;
        let dropped = inner.waiters.drain_all();
        if let Some(surface) = inner.panel.take() {
            surface.dispose();
        }
        info!(dropped_waiters = dropped, "Broker shut down");
    }

    /// Whether [`Broker::shutdown`] has run.
    pub async fn is_closed(&self) -> bool {
        self.inner.lock().await.closed
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn known_id(inner: &BrokerInner, raw_id: &str) -> Result<PromptId, BrokerError> {
        PromptId::parse(raw_id)
            .filter(|id| inner.registry.get(id).is_some())
            .ok_or_else(|| {
                debug!(raw_id, "Unknown prompt id");
                BrokerError::NotFound(raw_id.to_owned())
            })
    }

    /// Push the current list to the open panel, if any.
    fn refresh(&self, inner: &BrokerInner) {
        let Some(surface) = inner.panel.current() else {
            return;
        };
        match self.renderer.render(&inner.registry.list_ordered()) {
            Ok(html) => surface.show(html),
            Err(e) => warn!(error = %e, "Failed to render panel"),
        }
    }
}
