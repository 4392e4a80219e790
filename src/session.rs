//! Platform sessions.
//!
//! A session is the sans-IO half of a client: it owns the
//! [`ConnectionMachine`], the asset table and the subscriber slots, turns
//! inbound frames into events, and tells the driver what to send. Drivers
//! ([`Client`](crate::client::Client) or a hand-written loop) only move
//! bytes and read the clock.

use std::time::Instant;

use tracing::error;

use crate::error::{ChatError, Result};
use crate::handlers::Handlers;
use crate::state::{Action, ConnectionMachine};

/// Sans-IO half of a platform client.
pub trait ChatSession {
    /// Payload delivered to the raw-message subscriber.
    type Raw;

    /// Configured channel, if any.
    fn channel(&self) -> Option<&str>;

    /// Replace the configured channel.
    fn set_channel(&mut self, channel: &str);

    /// WebSocket URL to dial.
    fn endpoint(&self) -> String;

    /// URL of channel metadata that must be fetched before dialing.
    fn metadata_url(&self) -> Option<String> {
        None
    }

    /// Absorb the fetched metadata body.
    fn apply_metadata(&mut self, _body: &str) -> Result<()> {
        Ok(())
    }

    /// Frames sent as soon as the transport opens.
    fn handshake(&self) -> Vec<String>;

    /// Process one inbound text frame. Never fails; bad input is logged.
    fn handle_frame(&mut self, frame: &str, now: Instant) -> Vec<Action>;

    fn machine(&self) -> &ConnectionMachine;

    fn machine_mut(&mut self) -> &mut ConnectionMachine;

    fn handlers_mut(&mut self) -> &mut Handlers<Self::Raw>;

    /// Apply an optional channel override and check that a channel is set.
    fn prepare_connect(&mut self, channel: Option<&str>) -> Result<()> {
        if let Some(channel) = channel.filter(|c| !c.is_empty()) {
            self.set_channel(channel);
        }
        if self.channel().is_none() {
            error!("channel name not specified");
            return Err(ChatError::NoChannel);
        }
        Ok(())
    }
}
