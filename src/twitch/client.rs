use std::collections::HashMap;

use super::TwitchSession;
use crate::assets::BadgeAsset;
use crate::client::Client;
use crate::config::TwitchConfig;
use crate::transport::{Connector, WsConnector};

/// Networked Twitch chat client.
///
/// ```no_run
/// # async fn demo() -> unichat::Result<()> {
/// use unichat::config::TwitchConfig;
/// use unichat::twitch::TwitchClient;
///
/// let mut client = TwitchClient::new(TwitchConfig::anonymous("forsen"));
/// client.on_message(|m| println!("{}: {}", m.user.display_name, m.raw_text));
/// client.connect(None).await?;
/// client.run().await
/// # }
/// ```
pub type TwitchClient<C = WsConnector> = Client<TwitchSession, C>;

impl TwitchClient {
    pub fn new(config: TwitchConfig) -> Self {
        Client::from_session(TwitchSession::new(config))
    }
}

impl<C: Connector> Client<TwitchSession, C> {
    /// See [`TwitchSession::set_badges`].
    pub fn set_badges(&mut self, badges: HashMap<String, BadgeAsset>) {
        self.session_mut().set_badges(badges);
    }

    /// See [`TwitchSession::set_external_emotes`].
    pub fn set_external_emotes(&mut self, emotes: HashMap<String, String>) {
        self.session_mut().set_external_emotes(emotes);
    }

    pub fn stored_badges(&self) -> &HashMap<String, BadgeAsset> {
        self.session().stored_badges()
    }

    pub fn stored_external_emotes(&self) -> &HashMap<String, String> {
        self.session().stored_external_emotes()
    }
}
