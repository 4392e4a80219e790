//! Sans-IO connection state machine.
//!
//! The machine owns connection state, keepalive timers and reconnect
//! backoff, but performs no I/O and reads no clock. The driver feeds it
//! events (transport opened, pong received, time passed) with the current
//! [`Instant`] and executes the [`Action`]s it returns.
//!
//! ```
//! use std::time::{Duration, Instant};
//! use unichat::config::KeepaliveConfig;
//! use unichat::state::{Action, ConnectionMachine, ConnectionState};
//!
//! let mut machine = ConnectionMachine::new(KeepaliveConfig::default(), "PING");
//! let t0 = Instant::now();
//!
//! machine.connect();
//! let actions = machine.on_open(t0, vec!["JOIN #chan".to_string()]);
//! assert_eq!(actions.last(), Some(&Action::Send("PING".to_string())));
//! assert_eq!(machine.state(), ConnectionState::AwaitingPong);
//!
//! assert!(machine.on_pong(t0 + Duration::from_millis(40)));
//! assert_eq!(machine.latency(), Some(Duration::from_millis(40)));
//! ```

mod backoff;

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

pub use self::backoff::Backoff;

use crate::config::KeepaliveConfig;
use crate::error::{ChatError, Result};

/// Lifecycle state of one connection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionState {
    /// No transport.
    #[default]
    Disconnected,
    /// A transport is being opened.
    Connecting,
    /// Handshake sent, no ping outstanding.
    Joined,
    /// A ping is outstanding.
    AwaitingPong,
}

impl ConnectionState {
    /// Whether commands may be sent in this state.
    pub fn is_connected(self) -> bool {
        matches!(self, Self::Joined | Self::AwaitingPong)
    }
}

/// Work the driver must carry out, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Close the current transport, if there is one.
    Close,
    /// Wait `delay`, open a new transport, then report it with
    /// [`ConnectionMachine::on_open`].
    Open { delay: Duration },
    /// Write one text frame.
    Send(String),
}

/// Keepalive and reconnect state machine.
#[derive(Clone, Debug)]
pub struct ConnectionMachine {
    config: KeepaliveConfig,
    ping_command: String,
    state: ConnectionState,
    ping_sent_at: Option<Instant>,
    pong_deadline: Option<Instant>,
    next_ping: Option<Instant>,
    latency: Option<Duration>,
    backoff: Backoff,
    reconnects: u64,
}

impl ConnectionMachine {
    /// Create a disconnected machine that pings with `ping_command`.
    pub fn new(config: KeepaliveConfig, ping_command: impl Into<String>) -> Self {
        let backoff = Backoff::new(&config.backoff);
        Self {
            config,
            ping_command: ping_command.into(),
            state: ConnectionState::Disconnected,
            ping_sent_at: None,
            pong_deadline: None,
            next_ping: None,
            latency: None,
            backoff,
            reconnects: 0,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state.is_connected()
    }

    /// Round-trip time of the last completed ping.
    pub fn latency(&self) -> Option<Duration> {
        self.latency
    }

    /// Reconnects triggered by keepalive timeouts so far.
    pub fn reconnects(&self) -> u64 {
        self.reconnects
    }

    /// Earliest instant at which [`on_tick`](Self::on_tick) has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.pong_deadline, self.next_ping) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Start a connect attempt, retiring any current transport first.
    pub fn connect(&mut self) -> Vec<Action> {
        self.teardown();
        self.backoff.reset();
        self.state = ConnectionState::Connecting;
        vec![
            Action::Close,
            Action::Open {
                delay: Duration::ZERO,
            },
        ]
    }

    /// The transport opened. Sends `handshake`, then pings immediately.
    pub fn on_open(&mut self, now: Instant, handshake: Vec<String>) -> Vec<Action> {
        if self.state != ConnectionState::Connecting {
            debug!(state = ?self.state, "transport opened outside of a connect attempt");
            return Vec::new();
        }
        info!("connected");
        self.state = ConnectionState::Joined;
        let mut actions: Vec<Action> = handshake.into_iter().map(Action::Send).collect();
        actions.extend(self.ping(now));
        actions
    }

    /// Opening the transport failed; the attempt is abandoned.
    pub fn on_open_failed(&mut self) {
        self.teardown();
        self.state = ConnectionState::Disconnected;
    }

    /// Advance timers to `now`.
    ///
    /// A pong timeout yields a single reconnect; the outstanding ping is
    /// forgotten so a late pong cannot act on the new connection.
    pub fn on_tick(&mut self, now: Instant) -> Vec<Action> {
        if self.pong_deadline.is_some_and(|deadline| now >= deadline) {
            self.teardown();
            self.state = ConnectionState::Connecting;
            self.reconnects += 1;
            let delay = self.backoff.next_delay();
            warn!(
                timeout_ms = self.config.ping_timeout.as_millis() as u64,
                delay_ms = delay.as_millis() as u64,
                "pong timeout, reconnecting"
            );
            return vec![Action::Close, Action::Open { delay }];
        }

        if self.is_connected() && self.next_ping.is_some_and(|at| now >= at) {
            return self.ping(now);
        }

        Vec::new()
    }

    /// A pong arrived. Returns whether it answered an outstanding ping.
    pub fn on_pong(&mut self, now: Instant) -> bool {
        match (self.state, self.ping_sent_at) {
            (ConnectionState::AwaitingPong, Some(sent)) => {
                let latency = now.saturating_duration_since(sent);
                debug!(latency_ms = latency.as_millis() as u64, "pong");
                self.latency = Some(latency);
                self.ping_sent_at = None;
                self.pong_deadline = None;
                self.state = ConnectionState::Joined;
                self.backoff.reset();
                true
            }
            _ => {
                debug!(state = ?self.state, "PONG without pending PING");
                false
            }
        }
    }

    /// The transport closed on its own. No reconnect follows.
    pub fn on_close(&mut self) {
        if self.state != ConnectionState::Disconnected {
            info!("disconnected");
        }
        self.teardown();
        self.state = ConnectionState::Disconnected;
    }

    /// Caller-requested disconnect.
    pub fn disconnect(&mut self) -> Vec<Action> {
        self.teardown();
        self.state = ConnectionState::Disconnected;
        vec![Action::Close]
    }

    /// Queue a command, failing when not connected.
    pub fn send(&self, line: impl Into<String>) -> Result<Action> {
        if !self.is_connected() {
            return Err(ChatError::NotConnected);
        }
        Ok(Action::Send(line.into()))
    }

    fn ping(&mut self, now: Instant) -> Vec<Action> {
        self.state = ConnectionState::AwaitingPong;
        self.ping_sent_at = Some(now);
        self.pong_deadline = Some(now + self.config.ping_timeout);
        self.next_ping = Some(now + self.config.ping_interval);
        vec![Action::Send(self.ping_command.clone())]
    }

    // Idempotent.
    fn teardown(&mut self) {
        self.ping_sent_at = None;
        self.pong_deadline = None;
        self.next_ping = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackoffConfig;

    const SEC: Duration = Duration::from_secs(1);

    fn machine() -> ConnectionMachine {
        ConnectionMachine::new(
            KeepaliveConfig {
                ping_interval: 30 * SEC,
                ping_timeout: 10 * SEC,
                backoff: BackoffConfig {
                    base_ms: 1000,
                    max_ms: 4000,
                },
            },
            "PING",
        )
    }

    fn joined(t0: Instant) -> ConnectionMachine {
        let mut m = machine();
        m.connect();
        m.on_open(t0, vec!["JOIN #c".into()]);
        m
    }

    fn ping() -> Action {
        Action::Send("PING".into())
    }

    #[test]
    fn test_connect_retires_old_transport_first() {
        let mut m = machine();
        assert_eq!(
            m.connect(),
            vec![Action::Close, Action::Open { delay: Duration::ZERO }]
        );
        assert_eq!(m.state(), ConnectionState::Connecting);
    }

    #[test]
    fn test_open_sends_handshake_then_ping() {
        let t0 = Instant::now();
        let mut m = machine();
        m.connect();
        let actions = m.on_open(t0, vec!["CAP REQ :a".into(), "JOIN #c".into()]);
        assert_eq!(
            actions,
            vec![
                Action::Send("CAP REQ :a".into()),
                Action::Send("JOIN #c".into()),
                ping()
            ]
        );
        assert_eq!(m.state(), ConnectionState::AwaitingPong);
        assert_eq!(m.next_deadline(), Some(t0 + 10 * SEC));
    }

    #[test]
    fn test_stale_open_is_ignored() {
        let mut m = machine();
        assert!(m.on_open(Instant::now(), vec!["JOIN #c".into()]).is_empty());
        assert_eq!(m.state(), ConnectionState::Disconnected);
    }

    #[test]
    fn test_ping_every_interval() {
        let t0 = Instant::now();
        let mut m = joined(t0);
        assert!(m.on_pong(t0 + SEC));
        assert_eq!(m.state(), ConnectionState::Joined);
        assert_eq!(m.next_deadline(), Some(t0 + 30 * SEC));

        assert!(m.on_tick(t0 + 29 * SEC).is_empty());
        assert_eq!(m.on_tick(t0 + 30 * SEC), vec![ping()]);
        assert_eq!(m.state(), ConnectionState::AwaitingPong);
    }

    #[test]
    fn test_latency_measured_from_send() {
        let t0 = Instant::now();
        let mut m = joined(t0);
        assert_eq!(m.latency(), None);
        m.on_pong(t0 + Duration::from_millis(120));
        assert_eq!(m.latency(), Some(Duration::from_millis(120)));
    }

    #[test]
    fn test_timeout_reconnects_once() {
        let t0 = Instant::now();
        let mut m = joined(t0);

        assert!(m.on_tick(t0 + 9 * SEC).is_empty());
        assert_eq!(
            m.on_tick(t0 + 10 * SEC),
            vec![Action::Close, Action::Open { delay: Duration::ZERO }]
        );
        assert_eq!(m.state(), ConnectionState::Connecting);
        assert_eq!(m.next_deadline(), None);

        // Late pong for the superseded ping.
        assert!(!m.on_pong(t0 + 11 * SEC));
        assert!(m.on_tick(t0 + 40 * SEC).is_empty());
        assert_eq!(m.reconnects(), 1);
    }

    #[test]
    fn test_repeated_timeouts_back_off() {
        let t0 = Instant::now();
        let mut m = joined(t0);
        let mut now = t0;
        let mut delays = Vec::new();
        for _ in 0..4 {
            now += 10 * SEC;
            let actions = m.on_tick(now);
            if let Some(Action::Open { delay }) = actions.last() {
                delays.push(*delay);
            }
            m.on_open(now, Vec::new());
        }
        assert_eq!(delays, vec![Duration::ZERO, SEC, 2 * SEC, 4 * SEC]);

        m.on_pong(now + SEC);
        now += 30 * SEC;
        m.on_tick(now);
        let actions = m.on_tick(now + 10 * SEC);
        assert_eq!(actions.last(), Some(&Action::Open { delay: Duration::ZERO }));
    }

    #[test]
    fn test_close_clears_timers() {
        let t0 = Instant::now();
        let mut m = joined(t0);
        m.on_close();
        assert_eq!(m.state(), ConnectionState::Disconnected);
        assert_eq!(m.next_deadline(), None);
        assert!(m.on_tick(t0 + 60 * SEC).is_empty());
    }

    #[test]
    fn test_send_requires_connection() {
        let t0 = Instant::now();
        let mut m = machine();
        assert!(matches!(m.send("PRIVMSG #c :hi"), Err(ChatError::NotConnected)));
        m.connect();
        assert!(matches!(m.send("x"), Err(ChatError::NotConnected)));
        m.on_open(t0, Vec::new());
        assert_eq!(m.send("x").unwrap(), Action::Send("x".into()));
        assert_eq!(m.disconnect(), vec![Action::Close]);
        assert!(m.send("x").is_err());
    }
}
