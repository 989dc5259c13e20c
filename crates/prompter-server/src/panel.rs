//! Panel host: the human-facing surface served over `WebSocket`.
//!
//! `GET /panel` returns a static page; the page connects to
//! `GET /panel/ws`, and that connection becomes the broker's
//! [`Surface`]. The broker pushes [`PanelFrame`]s down the socket and the
//! page sends [`PanelAction`]s back up.
//!
//! Only one panel can be open. A second connection reveals the first one
//! (its page focuses itself), receives a `duplicate` frame, and is closed.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::{Html, IntoResponse};
use prompter_core::{PanelOpen, Surface};
use prompter_types::{PanelAction, PanelFrame};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::state::AppState;

/// What the broker asks of the socket task.
#[derive(Debug)]
enum SurfaceEvent {
    Frame(PanelFrame),
    Dispose,
}

/// [`Surface`] backed by a panel `WebSocket`.
///
/// Calls never block: they queue events for the socket task, which does
/// the actual sending.
struct SocketSurface {
    tx: mpsc::UnboundedSender<SurfaceEvent>,
}

impl SocketSurface {
    fn push(&self, event: SurfaceEvent) {
        if self.tx.send(event).is_err() {
            debug!("Panel socket task already gone");
        }
    }
}

impl Surface for SocketSurface {
    fn show(&self, html: String) {
        self.push(SurfaceEvent::Frame(PanelFrame::Render { html }));
    }

    fn reveal(&self) {
        self.push(SurfaceEvent::Frame(PanelFrame::Reveal));
    }

    fn dispose(&self) {
        self.push(SurfaceEvent::Dispose);
    }
}

// ---------------------------------------------------------------------------
// GET /panel
// ---------------------------------------------------------------------------

/// Serve the panel page.
pub async fn panel_page() -> impl IntoResponse {
    Html(PANEL_PAGE)
}

// ---------------------------------------------------------------------------
// GET /panel/ws
// ---------------------------------------------------------------------------

/// Upgrade to a `WebSocket` and offer it to the broker as the panel.
///
/// # Route
///
/// `GET /panel/ws`
pub async fn panel_ws(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_panel(socket, state))
}

/// Run one panel connection: forward broker frames out, dispatch panel
/// actions in, and release the panel slot when either side goes away.
async fn handle_panel(mut socket: WebSocket, state: Arc<AppState>) {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let surface = Arc::new(SocketSurface { tx });

    let token = match state.broker.open_panel(surface).await {
        PanelOpen::Opened(token) => token,
        PanelOpen::Revealed => {
            if send_frame(&mut socket, &PanelFrame::Duplicate).await {
                let _closed = socket.send(Message::Close(None)).await;
            }
            return;
        }
    };

    loop {
        tokio::select! {
            // Frames queued by the broker.
            event = rx.recv() => {
                match event {
                    Some(SurfaceEvent::Frame(frame)) => {
                        if !send_frame(&mut socket, &frame).await {
                            break;
                        }
                    }
                    Some(SurfaceEvent::Dispose) | None => {
                        debug!("Panel disposed by broker, closing socket");
                        let _closed = socket.send(Message::Close(None)).await;
                        break;
                    }
                }
            }
            // Actions from the human.
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<PanelAction>(text.as_str()) {
                            Ok(action) => state.broker.dispatch(action).await,
                            Err(e) => warn!(error = %e, "Ignoring malformed panel message"),
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("Panel client disconnected");
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            debug!("Panel client disconnected (pong failed)");
                            break;
                        }
                    }
                    Some(Err(e)) => {
                        debug!("Panel WebSocket error: {e}");
                        break;
                    }
                    _ => {
                        // Binary and pong frames carry nothing for us.
                    }
                }
            }
        }
    }

    state.broker.close_panel(token).await;
}

/// Serialize and send one frame. Returns `false` if the client is gone.
async fn send_frame(socket: &mut WebSocket, frame: &PanelFrame) -> bool {
    let json = match serde_json::to_string(frame) {
        Ok(j) => j,
        Err(e) => {
            warn!("Failed to serialize panel frame: {e}");
            return true;
        }
    };
    if socket.send(Message::Text(json.into())).await.is_err() {
        debug!("Panel client disconnected (send failed)");
        return false;
    }
    true
}

/// The panel page. All prompt markup arrives over the socket; this page
/// only hosts it and turns clicks into [`PanelAction`] messages.
const PANEL_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Prompter</title>
    <style>
        body { font-family: system-ui, sans-serif; padding: 12px; }
        .prompt { border: 1px solid #888; padding: 10px; margin-bottom: 8px; border-radius: 8px; }
        .controls { margin-top: 8px; }
        #status { color: #888; font-size: 0.85rem; }
    </style>
</head>
<body>
    <div id="status">Connecting...</div>
    <div id="panel"></div>
    <script>
        const panel = document.getElementById('panel');
        const status = document.getElementById('status');
        const socket = new WebSocket(
            (location.protocol === 'https:' ? 'wss://' : 'ws://') + location.host + '/panel/ws'
        );

        socket.onopen = () => { status.textContent = ''; };
        socket.onclose = () => { status.textContent = 'Disconnected.'; };
        socket.onmessage = (event) => {
            const frame = JSON.parse(event.data);
            if (frame.type === 'render') {
                panel.innerHTML = frame.html;
            } else if (frame.type === 'reveal') {
                window.focus();
            } else if (frame.type === 'duplicate') {
                status.textContent = 'The panel is already open in another window.';
            }
        };

        function send(action) {
            if (socket.readyState === WebSocket.OPEN) {
                socket.send(JSON.stringify(action));
            }
        }

        panel.addEventListener('click', (event) => {
            const button = event.target.closest('button[data-action]');
            if (!button) return;
            const id = button.dataset.id;
            if (button.dataset.action === 'answer') {
                send({ type: 'answer', id, answer: String(button.dataset.answer) });
            } else if (button.dataset.action === 'custom') {
                const input = document.getElementById('txt-' + id);
                const value = input && typeof input.value === 'string' ? input.value : '';
                if (value) send({ type: 'answer', id, answer: value });
            } else if (button.dataset.action === 'clear') {
                send({ type: 'clear' });
            }
        });
    </script>
</body>
</html>"#;
