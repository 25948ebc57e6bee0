use std::sync::Arc;

use defs::{DeliveryForm, Peer};
use futures::future::join_all;
use tracing::{debug, info};

use crate::config::{Config, authority};
use crate::directory::DirectoryClient;
use crate::error::NetworkError;

const SEND_PEER: &str = "/send-peer";

/// Tally of one broadcast. Only ever logged; it never decides anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub attempted: usize,
    pub delivered: usize,
    pub failed: usize,
}

/// Fans a chat line out to every peer the tracker currently lists.
#[derive(Clone)]
pub struct Broadcaster {
    http: reqwest::Client,
    directory: DirectoryClient,
    config: Arc<Config>,
}

impl Broadcaster {
    #[must_use]
    pub const fn new(
        http: reqwest::Client,
        directory: DirectoryClient,
        config: Arc<Config>,
    ) -> Self {
        Self {
            http,
            directory,
            config,
        }
    }

    /// Re-fetch the peer list and send `message` to each peer.
    ///
    /// Each delivery runs as its own task, so a slow or failing peer never
    /// holds up another, and dropping this future does not cancel sends
    /// already issued. The tasks are joined only to produce the report.
    ///
    /// # Errors
    /// Only the peer-list fetch can fail; delivery failures are logged and
    /// counted.
    pub async fn broadcast(&self, message: &str) -> Result<BroadcastReport, NetworkError> {
        let peers = self.directory.fetch_peers().await?;
        let form = DeliveryForm {
            from: self.config.advertise_host().to_string(),
            msg: message.to_string(),
        };

        let handles: Vec<_> = peers
            .into_iter()
            .filter(|peer| !(self.config.exclude_self() && self.config.is_self(peer)))
            .map(|peer| tokio::spawn(deliver(self.http.clone(), peer, form.clone())))
            .collect();

        let mut report = BroadcastReport {
            attempted: handles.len(),
            ..BroadcastReport::default()
        };
        for outcome in join_all(handles).await {
            match outcome {
                Ok(true) => report.delivered += 1,
                Ok(false) => report.failed += 1,
                Err(e) => {
                    debug!(error = %e, "delivery task did not complete");
                    report.failed += 1;
                }
            }
        }

        info!(
            attempted = report.attempted,
            delivered = report.delivered,
            failed = report.failed,
            "broadcast finished"
        );
        Ok(report)
    }
}

/// Url of a peer's inbox.
#[must_use]
pub fn peer_inbox_url(peer: &Peer) -> String {
    format!("http://{}{SEND_PEER}", authority(&peer.ip, peer.port))
}

async fn deliver(http: reqwest::Client, peer: Peer, form: DeliveryForm) -> bool {
    let result = http
        .post(peer_inbox_url(&peer))
        .form(&form)
        .send()
        .await
        .and_then(reqwest::Response::error_for_status);

    match result {
        Ok(_) => {
            debug!(%peer, "delivered");
            true
        }
        Err(e) => {
            debug!(%peer, error = %NetworkError::from(e), "send to peer failed");
            false
        }
    }
}
