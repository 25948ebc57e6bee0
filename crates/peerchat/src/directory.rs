use std::sync::Arc;

use defs::{ConnectRequest, Peer, RegisterForm};

use crate::config::Config;
use crate::error::NetworkError;

const SUBMIT_INFO: &str = "/submit-info";
const GET_LIST: &str = "/get-list";
const CONNECT_PEER: &str = "/connect-peer";

/// Client for the tracker's directory endpoints.
///
/// Every call is a one-shot request. Nothing is cached between calls and
/// nothing is retried.
#[derive(Clone)]
pub struct DirectoryClient {
    http: reqwest::Client,
    config: Arc<Config>,
}

impl DirectoryClient {
    #[must_use]
    pub const fn new(http: reqwest::Client, config: Arc<Config>) -> Self {
        Self { http, config }
    }

    /// Register `advertise_host:port` with the tracker.
    ///
    /// Returns the tracker's response text, which is opaque to us.
    pub async fn register(&self, port: u16) -> Result<String, NetworkError> {
        let form = RegisterForm {
            ip: self.config.advertise_host().to_string(),
            port,
        };

        let text = self
            .http
            .post(self.config.tracker_url(SUBMIT_INFO))
            .form(&form)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(text)
    }

    /// Fetch the tracker's current peer list, in tracker order.
    pub async fn fetch_peers(&self) -> Result<Vec<Peer>, NetworkError> {
        let body = self
            .http
            .get(self.config.tracker_url(GET_LIST))
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(defs::parse_peer_list(&body)?)
    }

    /// Tell the tracker we intend to talk to `peer`. Purely advisory: no
    /// connection or session results from it.
    pub async fn connect_peer(&self, peer: &Peer) -> Result<String, NetworkError> {
        let text = self
            .http
            .post(self.config.tracker_url(CONNECT_PEER))
            .json(&ConnectRequest::from(peer))
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(text)
    }
}
