//! Tokio driver for a [`ChatSession`].
//!
//! The driver owns the transport and the timers; the session decides
//! everything else. One call to [`Client::step`] waits for the next frame or
//! timer deadline, whichever comes first, and carries out the resulting
//! actions. Between steps the caller has `&mut` access to the session, so
//! assets can be swapped without locks.

use std::collections::VecDeque;
use std::time::Duration;

use tokio::time::{sleep, sleep_until, Instant};
use tracing::{debug, warn};

use crate::error::{ChatError, Result, TransportError};
use crate::event::{ChatMessage, ClearMessages, DeleteMessage, PlatformEvent};
use crate::http;
use crate::session::ChatSession;
use crate::state::{Action, ConnectionState};
use crate::transport::{ChatTransport, Connector, WsConnector};

enum Wake {
    Frame(Option<std::result::Result<String, TransportError>>),
    Tick,
}

/// Drives one session over a transport.
pub struct Client<S, C = WsConnector> {
    session: S,
    connector: C,
    transport: Option<Box<dyn ChatTransport>>,
    http: reqwest::Client,
}

impl<S: ChatSession> Client<S, WsConnector> {
    /// Drive `session` over real WebSockets.
    pub fn from_session(session: S) -> Self {
        Self::with_connector(session, WsConnector)
    }
}

impl<S: ChatSession, C: Connector> Client<S, C> {
    /// Drive `session` over transports opened by `connector`.
    pub fn with_connector(session: S, connector: C) -> Self {
        Self {
            session,
            connector,
            transport: None,
            http: http::default_client(),
        }
    }

    /// Use a specific HTTP client for metadata fetches.
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut S {
        &mut self.session
    }

    pub fn state(&self) -> ConnectionState {
        self.session.machine().state()
    }

    pub fn is_connected(&self) -> bool {
        self.session.machine().is_connected()
    }

    /// Round-trip time of the last completed keepalive.
    pub fn latency(&self) -> Option<Duration> {
        self.session.machine().latency()
    }

    pub fn on_message(&mut self, f: impl FnMut(&ChatMessage) + Send + 'static) {
        self.session.handlers_mut().on_message(f);
    }

    pub fn on_clear_messages(&mut self, f: impl FnMut(&ClearMessages) + Send + 'static) {
        self.session.handlers_mut().on_clear_messages(f);
    }

    pub fn on_delete_message(&mut self, f: impl FnMut(&DeleteMessage) + Send + 'static) {
        self.session.handlers_mut().on_delete_message(f);
    }

    pub fn on_event(&mut self, f: impl FnMut(&PlatformEvent) + Send + 'static) {
        self.session.handlers_mut().on_event(f);
    }

    pub fn on_raw_message(&mut self, f: impl FnMut(&S::Raw) + Send + 'static) {
        self.session.handlers_mut().on_raw_message(f);
    }

    /// Connect, optionally switching channel first.
    ///
    /// Any previous transport is closed before the new one opens. Fails
    /// without touching the network when no channel is configured.
    pub async fn connect(&mut self, channel: Option<&str>) -> Result<()> {
        self.session.prepare_connect(channel)?;
        if let Some(url) = self.session.metadata_url() {
            let body = http::get_text(&self.http, &url).await?;
            self.session.apply_metadata(&body)?;
        }
        let actions = self.session.machine_mut().connect();
        self.apply(actions).await
    }

    /// Close the transport and stop keepalive timers.
    pub async fn disconnect(&mut self) -> Result<()> {
        let actions = self.session.machine_mut().disconnect();
        self.apply(actions).await
    }

    /// Send a raw frame. Fails with [`ChatError::NotConnected`] unless joined.
    pub async fn send(&mut self, text: impl Into<String>) -> Result<()> {
        let action = self.session.machine().send(text)?;
        self.apply(vec![action]).await
    }

    /// Wait for one frame or timer and process it.
    ///
    /// Returns `Ok(false)` once there is no transport left to read from.
    pub async fn step(&mut self) -> Result<bool> {
        let deadline = self.session.machine().next_deadline().map(Instant::from_std);
        let wake = {
            let Some(transport) = self.transport.as_mut() else {
                return Ok(false);
            };
            let timer = sleep_until(deadline.unwrap_or_else(far_future));
            tokio::select! {
                frame = transport.next_frame() => Wake::Frame(frame),
                _ = timer, if deadline.is_some() => Wake::Tick,
            }
        };

        match wake {
            Wake::Frame(Some(Ok(text))) => {
                let now = Instant::now().into_std();
                let actions = self.session.handle_frame(&text, now);
                self.apply(actions).await?;
                Ok(true)
            }
            Wake::Frame(Some(Err(e))) => {
                self.transport = None;
                self.session.machine_mut().on_close();
                Err(e.into())
            }
            Wake::Frame(None) => {
                debug!("transport closed by peer");
                self.transport = None;
                self.session.machine_mut().on_close();
                Ok(false)
            }
            Wake::Tick => {
                let now = Instant::now().into_std();
                let actions = self.session.machine_mut().on_tick(now);
                self.apply(actions).await?;
                Ok(true)
            }
        }
    }

    /// Step until the transport closes or fails.
    pub async fn run(&mut self) -> Result<()> {
        while self.step().await? {}
        Ok(())
    }

    async fn apply(&mut self, actions: Vec<Action>) -> Result<()> {
        let mut queue = VecDeque::from(actions);
        while let Some(action) = queue.pop_front() {
            match action {
                Action::Close => {
                    if let Some(mut transport) = self.transport.take() {
                        if let Err(e) = transport.close().await {
                            debug!(error = %e, "close failed");
                        }
                    }
                }
                Action::Open { delay } => {
                    if !delay.is_zero() {
                        sleep(delay).await;
                    }
                    let url = self.session.endpoint();
                    match self.connector.connect(&url).await {
                        Ok(transport) => {
                            self.transport = Some(transport);
                            let handshake = self.session.handshake();
                            let now = Instant::now().into_std();
                            queue.extend(self.session.machine_mut().on_open(now, handshake));
                        }
                        Err(e) => {
                            warn!(url = %url, error = %e, "connect failed");
                            self.session.machine_mut().on_open_failed();
                            return Err(e.into());
                        }
                    }
                }
                Action::Send(text) => {
                    let Some(transport) = self.transport.as_mut() else {
                        return Err(ChatError::NotConnected);
                    };
                    if let Err(e) = transport.send_text(text).await {
                        warn!(error = %e, "send failed, dropping transport");
                        self.transport = None;
                        self.session.machine_mut().on_close();
                        return Err(e.into());
                    }
                }
            }
        }
        Ok(())
    }
}

fn far_future() -> Instant {
    Instant::now() + Duration::from_secs(86_400 * 365)
}
