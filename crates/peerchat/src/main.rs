use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use peerchat::{App, Config, Inbox, app, config};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

#[derive(Parser)]
#[command(
    name = "peerchat",
    about = "Broadcast chat over a tracker-provided peer list"
)]
struct Cli {
    /// Tracker base url; defaults to http://<host>:8000
    #[arg(long, env = "TRACKER_BASE")]
    tracker: Option<String>,

    /// Address other peers reach us at; defaults to the local IP
    #[arg(long, env = "PEER_HOST")]
    host: Option<String>,

    /// Address the inbox binds to
    #[arg(long, env = "PEER_BIND", default_value = "0.0.0.0")]
    bind: String,

    /// Inbox port, also the port registered with the tracker
    #[arg(short, long, env = "PEER_PORT", default_value_t = config::DEFAULT_PEER_PORT)]
    port: u16,

    /// Per-request timeout in seconds, 0 for none
    #[arg(long, env = "REQUEST_TIMEOUT", default_value_t = 10)]
    timeout: u64,

    /// Peer list refresh interval in seconds, 0 to disable
    #[arg(long, env = "REFRESH_INTERVAL", default_value_t = 0)]
    refresh: u64,

    /// Skip ourselves when broadcasting
    #[arg(long, env = "EXCLUDE_SELF")]
    exclude_self: bool,
}

fn seconds(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

impl Cli {
    fn config(&self) -> Result<Config, peerchat::ConfigError> {
        let host = self
            .host
            .clone()
            .unwrap_or_else(config::default_advertise_host);

        Ok(Config::resolve(host, self.port, self.tracker.as_deref())?
            .with_request_timeout(seconds(self.timeout))
            .with_refresh_interval(seconds(self.refresh))
            .with_exclude_self(self.exclude_self))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Arc::new(cli.config()?);
    tracing::info!(
        tracker = config.tracker_base(),
        host = config.advertise_host(),
        port = config.port(),
        "starting"
    );

    let (events_tx, events_rx) = mpsc::unbounded_channel();

    let listener = TcpListener::bind((cli.bind.as_str(), config.port())).await?;
    tracing::info!("inbox listening on {}", listener.local_addr()?);
    let inbox = Inbox::new(events_tx.clone());
    tokio::spawn(async move {
        if let Err(e) = inbox.run(listener).await {
            tracing::error!(error = %e, "inbox stopped");
        }
    });

    app::spawn_input_reader(events_tx.clone());
    if let Some(period) = config.refresh_interval() {
        app::spawn_refresh_timer(period, events_tx.clone());
    }

    let app = App::new(Arc::clone(&config), events_tx, std::io::stdout())?;
    app.run(events_rx).await?;

    Ok(())
}
