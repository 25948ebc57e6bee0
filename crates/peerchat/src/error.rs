use std::fmt;

/// Errors from talking to the tracker or to another peer.
#[derive(Debug)]
pub enum NetworkError {
    /// Connection refused, DNS failure, timeout and the like.
    Transport(String),
    /// The server answered with a non-success status.
    Status { url: String, status: u16 },
    /// The response body could not be understood.
    MalformedBody(String),
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(msg) => write!(f, "transport error: {msg}"),
            Self::Status { url, status } => write!(f, "{url} answered with status {status}"),
            Self::MalformedBody(msg) => write!(f, "malformed response body: {msg}"),
        }
    }
}

impl std::error::Error for NetworkError {}

impl From<reqwest::Error> for NetworkError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            return Self::Status {
                url: e.url().map_or_else(String::new, ToString::to_string),
                status: status.as_u16(),
            };
        }
        if e.is_decode() {
            return Self::MalformedBody(e.to_string());
        }
        Self::Transport(e.to_string())
    }
}

impl From<serde_json::Error> for NetworkError {
    fn from(e: serde_json::Error) -> Self {
        Self::MalformedBody(e.to_string())
    }
}

/// Errors in startup configuration.
#[derive(Debug)]
pub enum ConfigError {
    InvalidTrackerBase { url: String, reason: String },
    HttpClient(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTrackerBase { url, reason } => {
                write!(f, "invalid tracker base url {url:?}: {reason}")
            }
            Self::HttpClient(msg) => write!(f, "could not build http client: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}
