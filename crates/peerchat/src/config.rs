use std::net::{IpAddr, Ipv6Addr};
use std::time::Duration;

use reqwest::Url;

use crate::error::ConfigError;

/// Port the tracker listens on when its base url is derived.
pub const DEFAULT_TRACKER_PORT: u16 = 8000;
/// Port our inbox listens on, and the port registered, unless told otherwise.
pub const DEFAULT_PEER_PORT: u16 = 9001;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Everything the client needs to know about itself and the tracker.
///
/// Built once at startup and shared as `Arc<Config>`.
#[derive(Debug, Clone)]
pub struct Config {
    tracker_base: String,
    advertise_host: String,
    port: u16,
    request_timeout: Option<Duration>,
    refresh_interval: Option<Duration>,
    exclude_self: bool,
}

impl Config {
    /// Config for a peer advertised as `advertise_host:port`, with the
    /// tracker assumed at `http://<advertise_host>:8000`.
    pub fn new(advertise_host: impl Into<String>, port: u16) -> Result<Self, ConfigError> {
        Self::resolve(advertise_host, port, None)
    }

    /// Like [`Config::new`], but an explicit `tracker_base` wins and the
    /// derived one is never built.
    pub fn resolve(
        advertise_host: impl Into<String>,
        port: u16,
        tracker_base: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let advertise_host = advertise_host.into();
        let tracker_base = match tracker_base {
            Some(base) => validate_base(base)?,
            None => validate_base(&derive_tracker_base("http", &advertise_host))?,
        };

        Ok(Self {
            tracker_base,
            advertise_host,
            port,
            request_timeout: Some(DEFAULT_REQUEST_TIMEOUT),
            refresh_interval: None,
            exclude_self: false,
        })
    }

    /// Point at an explicit tracker instead of the derived one.
    pub fn with_tracker_base(mut self, base: &str) -> Result<Self, ConfigError> {
        self.tracker_base = validate_base(base)?;
        Ok(self)
    }

    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    #[must_use]
    pub const fn with_refresh_interval(mut self, interval: Option<Duration>) -> Self {
        self.refresh_interval = interval;
        self
    }

    #[must_use]
    pub const fn with_exclude_self(mut self, exclude_self: bool) -> Self {
        self.exclude_self = exclude_self;
        self
    }

    #[must_use]
    pub fn tracker_base(&self) -> &str {
        &self.tracker_base
    }

    /// Full url of a tracker endpoint such as `/get-list`.
    #[must_use]
    pub fn tracker_url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.tracker_base)
    }

    #[must_use]
    pub fn advertise_host(&self) -> &str {
        &self.advertise_host
    }

    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    #[must_use]
    pub const fn refresh_interval(&self) -> Option<Duration> {
        self.refresh_interval
    }

    #[must_use]
    pub const fn exclude_self(&self) -> bool {
        self.exclude_self
    }

    /// Whether `peer` is this client as the tracker sees it.
    #[must_use]
    pub fn is_self(&self, peer: &defs::Peer) -> bool {
        peer.ip == self.advertise_host && peer.port == self.port
    }

    /// The shared HTTP client, with the configured per-request timeout.
    pub fn http_client(&self) -> Result<reqwest::Client, ConfigError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.request_timeout {
            builder = builder.timeout(timeout);
        }
        builder
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))
    }
}

/// `<scheme>://<host>:8000`, bracketing IPv6 literals.
#[must_use]
pub fn derive_tracker_base(scheme: &str, host: &str) -> String {
    format!("{scheme}://{}", authority(host, DEFAULT_TRACKER_PORT))
}

/// `host:port` suitable for a url.
#[must_use]
pub fn authority(host: &str, port: u16) -> String {
    if host.parse::<Ipv6Addr>().is_ok() {
        format!("[{host}]:{port}")
    } else {
        format!("{host}:{port}")
    }
}

/// The address to advertise when none is configured.
#[must_use]
pub fn default_advertise_host() -> String {
    local_ip_address::local_ip().map_or_else(
        |_| IpAddr::from([127, 0, 0, 1]).to_string(),
        |ip| ip.to_string(),
    )
}

fn validate_base(base: &str) -> Result<String, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidTrackerBase {
        url: base.to_string(),
        reason: reason.to_string(),
    };

    let url = Url::parse(base).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host"));
    }

    Ok(base.trim_end_matches('/').to_string())
}
