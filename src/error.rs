//! Error types for the chat normalization library.
//!
//! Parse anomalies (unknown tag keys, malformed emote entries) are not errors:
//! decoding is total and reports them as data. The enums here cover the
//! failures a caller must react to.

use thiserror::Error;

/// Convenience type alias for Results using [`ChatError`].
pub type Result<T, E = ChatError> = std::result::Result<T, E>;

/// Top-level client errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatError {
    /// `connect` was called before a channel name was configured.
    #[error("channel name not specified")]
    NoChannel,

    /// A command was sent while the connection was not joined.
    #[error("not connected")]
    NotConnected,

    /// The underlying socket failed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Fetching channel metadata failed; the connect attempt was aborted.
    #[error("channel metadata error: {0}")]
    Metadata(#[from] MetadataError),

    /// Configuration could not be loaded.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors raised by a [`ChatTransport`](crate::transport::ChatTransport).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransportError {
    /// Opening the socket failed.
    #[error("connect to {url} failed: {reason}")]
    Connect {
        /// Endpoint that was dialed.
        url: String,
        /// Underlying failure description.
        reason: String,
    },

    /// Writing a frame failed.
    #[error("send failed: {0}")]
    Send(String),

    /// Reading a frame failed.
    #[error("receive failed: {0}")]
    Receive(String),

    /// The socket is already closed.
    #[error("transport closed")]
    Closed,
}

/// Errors from the Kick channel-info endpoint.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MetadataError {
    /// The request could not be completed.
    #[cfg(feature = "tokio")]
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("unexpected status {status} from {url}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Requested URL.
        url: String,
    },

    /// The response body was not the expected shape.
    #[error("invalid channel response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Errors loading configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// TOML syntax or schema error.
    #[error("invalid toml: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Errors encountered when parsing a single protocol line.
///
/// The frame handlers never surface these; they exist for callers that
/// parse lines directly and want to reject degenerate input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MessageParseError {
    /// Line was empty after trimming.
    #[error("empty message")]
    EmptyMessage,

    /// No command token was present.
    #[error("missing command")]
    MissingCommand,
}
