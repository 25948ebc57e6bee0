#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

pub mod app;
mod broadcast;
mod command;
pub mod config;
mod directory;
mod error;
pub mod inbox;
mod selector;
mod transcript;

pub use app::{App, AppEvent};
pub use broadcast::{BroadcastReport, Broadcaster, peer_inbox_url};
pub use command::Command;
pub use config::Config;
pub use directory::DirectoryClient;
pub use error::{ConfigError, NetworkError};
pub use inbox::Inbox;
pub use selector::{Entry, PeerSelector};
pub use transcript::Transcript;
