use std::fmt;

use serde::{Deserialize, Serialize};

/// A chat endpoint reachable directly over HTTP.
///
/// Identity is the `(ip, port)` pair. Nothing here enforces uniqueness; a
/// tracker may hand back duplicates and they are kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Peer {
    pub ip: String,
    pub port: u16,
}

impl Peer {
    pub fn new(ip: impl Into<String>, port: u16) -> Self {
        Self {
            ip: ip.into(),
            port,
        }
    }
}

impl fmt::Display for Peer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.ip, self.port)
    }
}

/// One line of chat. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChatMessage {
    pub sender: String,
    pub text: String,
}

impl ChatMessage {
    pub fn new(sender: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            text: text.into(),
        }
    }
}

impl fmt::Display for ChatMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.sender, self.text)
    }
}

/// Form body of `POST /submit-info`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegisterForm {
    pub ip: String,
    pub port: u16,
}

/// JSON body of `POST /connect-peer`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ConnectRequest {
    pub target_ip: String,
    pub target_port: u16,
}

impl From<&Peer> for ConnectRequest {
    fn from(peer: &Peer) -> Self {
        Self {
            target_ip: peer.ip.clone(),
            target_port: peer.port,
        }
    }
}

/// Form body of `POST /send-peer`, both sent to other peers and accepted by
/// our own inbox.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DeliveryForm {
    pub from: String,
    pub msg: String,
}

impl From<DeliveryForm> for ChatMessage {
    fn from(form: DeliveryForm) -> Self {
        Self::new(form.from, form.msg)
    }
}

/// Parse a `/get-list` body.
///
/// The body must be JSON, but a missing or non-array `peers` field yields an
/// empty list rather than an error. Entries that are not a valid peer are
/// skipped one by one; the rest are kept in order.
///
/// # Errors
/// Returns the parse error if `body` is not valid JSON.
pub fn parse_peer_list(body: &str) -> Result<Vec<Peer>, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    let Some(entries) = value.get("peers").and_then(serde_json::Value::as_array) else {
        return Ok(Vec::new());
    };
    Ok(entries
        .iter()
        .filter_map(|entry| Peer::deserialize(entry).ok())
        .collect())
}
