use std::collections::HashMap;

use super::KickSession;
use crate::assets::BadgeAsset;
use crate::client::Client;
use crate::config::KickConfig;
use crate::transport::{Connector, WsConnector};

/// Networked Kick chat client.
///
/// `connect` fetches the channel metadata first; a failed fetch aborts the
/// attempt before any socket is opened.
pub type KickClient<C = WsConnector> = Client<KickSession, C>;

impl KickClient {
    pub fn new(config: KickConfig) -> Self {
        Client::from_session(KickSession::new(config))
    }
}

impl<C: Connector> Client<KickSession, C> {
    /// See [`KickSession::set_badges`].
    pub fn set_badges(&mut self, badges: HashMap<String, BadgeAsset>) {
        self.session_mut().set_badges(badges);
    }

    /// See [`KickSession::set_external_emotes`].
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
