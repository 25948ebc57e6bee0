use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use defs::{ChatMessage, Peer};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::broadcast::Broadcaster;
use crate::command::{Command, HELP};
use crate::config::Config;
use crate::directory::DirectoryClient;
use crate::error::ConfigError;
use crate::selector::PeerSelector;
use crate::transcript::Transcript;

/// Everything the UI task reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// A line typed by the user.
    Input(String),
    /// Timer-driven peer list refresh; failures are only logged.
    Refresh,
    PeersFetched(Vec<Peer>),
    Inbound(ChatMessage),
    System(String),
    Quit,
}

/// The UI binder. Owns all UI state and is only ever touched from the task
/// running [`App::run`]; network work is spawned and reports back as
/// [`AppEvent`]s.
pub struct App<W> {
    directory: DirectoryClient,
    broadcaster: Broadcaster,
    selector: PeerSelector,
    transcript: Transcript,
    events: mpsc::UnboundedSender<AppEvent>,
    out: W,
    register_port: u16,
    running: bool,
}

impl<W: Write> App<W> {
    pub fn new(
        config: Arc<Config>,
        events: mpsc::UnboundedSender<AppEvent>,
        out: W,
    ) -> Result<Self, ConfigError> {
        let http = config.http_client()?;
        let directory = DirectoryClient::new(http.clone(), Arc::clone(&config));
        let broadcaster = Broadcaster::new(http, directory.clone(), Arc::clone(&config));

        Ok(Self {
            directory,
            broadcaster,
            selector: PeerSelector::new(),
            transcript: Transcript::new(),
            events,
            out,
            register_port: config.port(),
            running: true,
        })
    }

    /// Process events until the user quits.
    pub async fn run(mut self, mut events: mpsc::UnboundedReceiver<AppEvent>) -> io::Result<()> {
        writeln!(self.out, "{HELP}")?;
        while self.running {
            let Some(event) = events.recv().await else {
                break;
            };
            self.handle(event)?;
        }
        Ok(())
    }

    /// Apply one event. Must be called from within a tokio runtime.
    pub fn handle(&mut self, event: AppEvent) -> io::Result<()> {
        match event {
            AppEvent::Input(line) => self.handle_command(Command::parse(&line)),
            AppEvent::Refresh => {
                self.spawn_refresh(false);
                Ok(())
            }
            AppEvent::PeersFetched(peers) => {
                self.selector.render(peers);
                self.draw_peers()
            }
            AppEvent::Inbound(message) => self.append(message),
            AppEvent::System(text) => self.system(text),
            AppEvent::Quit => {
                self.running = false;
                Ok(())
            }
        }
    }

    fn handle_command(&mut self, command: Command) -> io::Result<()> {
        match command {
            Command::Register(port) => {
                self.spawn_register(port.unwrap_or(self.register_port));
                Ok(())
            }
            Command::Refresh => {
                self.spawn_refresh(true);
                Ok(())
            }
            Command::Peers => self.draw_peers(),
            Command::Connect(index) => {
                let Some(peer) = self.selector.select(index).cloned() else {
                    return self.system(format!("no peer numbered {index}"));
                };
                self.draw_peers()?;
                self.spawn_connect(peer);
                Ok(())
            }
            Command::Send(text) => {
                let echoed = self.transcript.local(text.as_str());
                writeln!(self.out, "{echoed}")?;
                self.spawn_broadcast(text);
                Ok(())
            }
            Command::Help => writeln!(self.out, "{HELP}"),
            Command::Quit => {
                self.running = false;
                Ok(())
            }
            Command::Invalid(reason) => self.system(reason),
            Command::Noop => Ok(()),
        }
    }

    fn spawn_register(&self, port: u16) {
        let directory = self.directory.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            match directory.register(port).await {
                Ok(text) => {
                    info!(%text, "register result");
                    let _ = events.send(AppEvent::System("Registered with tracker".to_string()));
                    refresh(&directory, &events, true).await;
                }
                Err(e) => {
                    error!(error = %e, "register failed");
                    let _ = events.send(AppEvent::System(format!("Register failed: {e}")));
                }
            }
        });
    }

    fn spawn_refresh(&self, user_initiated: bool) {
        let directory = self.directory.clone();
        let events = self.events.clone();
        tokio::spawn(async move { refresh(&directory, &events, user_initiated).await });
    }

    fn spawn_connect(&self, peer: Peer) {
        let directory = self.directory.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let event = match directory.connect_peer(&peer).await {
                Ok(text) => {
                    info!(%peer, %text, "connect-peer result");
                    AppEvent::System(format!("Connected to peer {peer}"))
                }
                Err(e) => {
                    error!(%peer, error = %e, "connect-peer failed");
                    AppEvent::System(format!("connect-peer failed: {e}"))
                }
            };
            let _ = events.send(event);
        });
    }

    fn spawn_broadcast(&self, text: String) {
        let broadcaster = self.broadcaster.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            if let Err(e) = broadcaster.broadcast(&text).await {
                error!(error = %e, "broadcast failed");
                let _ = events.send(AppEvent::System(format!("broadcast failed: {e}")));
            }
        });
    }

    fn append(&mut self, message: ChatMessage) -> io::Result<()> {
        let message = self.transcript.push(message);
        writeln!(self.out, "{message}")
    }

    fn system(&mut self, text: String) -> io::Result<()> {
        let message = self.transcript.system(text);
        writeln!(self.out, "{message}")
    }

    fn draw_peers(&mut self) -> io::Result<()> {
        writeln!(self.out, "peers:")?;
        for line in self.selector.lines() {
            writeln!(self.out, "{line}")?;
        }
        Ok(())
    }

    #[must_use]
    pub const fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    #[must_use]
    pub const fn selector(&self) -> &PeerSelector {
        &self.selector
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub const fn output(&self) -> &W {
        &self.out
    }
}

async fn refresh(
    directory: &DirectoryClient,
    events: &mpsc::UnboundedSender<AppEvent>,
    user_initiated: bool,
) {
    let event = match directory.fetch_peers().await {
        Ok(peers) => {
            debug!(count = peers.len(), "peer list fetched");
            AppEvent::PeersFetched(peers)
        }
        Err(e) => {
            error!(error = %e, "get-list failed");
            if !user_initiated {
                return;
            }
            AppEvent::System(format!("get-list failed: {e}"))
        }
    };
    let _ = events.send(event);
}

/// Forward stdin lines as [`AppEvent::Input`]; end of input quits.
///
/// Runs on a plain thread so a pending read never holds up runtime shutdown.
pub fn spawn_input_reader(events: mpsc::UnboundedSender<AppEvent>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if events.send(AppEvent::Input(line)).is_err() {
                        return;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "error reading stdin");
                    break;
                }
            }
        }
        let _ = events.send(AppEvent::Quit);
    })
}

/// Emit [`AppEvent::Refresh`] every `period`, starting one period from now.
pub fn spawn_refresh_timer(
    period: Duration,
    events: mpsc::UnboundedSender<AppEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if events.send(AppEvent::Refresh).is_err() {
                break;
            }
        }
    })
}
