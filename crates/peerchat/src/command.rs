/// One line of user input, interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Register with the tracker, on the given port or the listen port.
    Register(Option<u16>),
    Refresh,
    Peers,
    /// Select a row of the peer list, 1-based.
    Connect(usize),
    Help,
    Quit,
    Send(String),
    /// Nothing to do, e.g. an empty line.
    Noop,
    /// Bad input, with a message for the user.
    Invalid(String),
}

pub const HELP: &str = "\
commands:
  /register [port]  register with the tracker, then refresh the peer list
  /refresh, /list   fetch the peer list from the tracker
  /peers            show the current peer list
  /connect <n>      select peer n and tell the tracker
  /help             show this help
  /quit             exit
anything else is broadcast to every peer (start with // to send a leading /)";

impl Command {
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            return Self::Noop;
        }
        if let Some(literal) = line.strip_prefix("//") {
            return Self::Send(format!("/{literal}"));
        }
        let Some(rest) = line.strip_prefix('/') else {
            return Self::Send(line.to_string());
        };

        let mut words = rest.split_whitespace();
        let name = words.next().unwrap_or_default();
        let arg = words.next();
        if words.next().is_some() {
            return Self::Invalid(format!("too many arguments to /{name}"));
        }

        match (name, arg) {
            ("register", None) => Self::Register(None),
            ("register", Some(port)) => port.parse().map_or_else(
                |_| Self::Invalid(format!("invalid port: {port}")),
                |port| Self::Register(Some(port)),
            ),
            ("refresh" | "list", None) => Self::Refresh,
            ("peers", None) => Self::Peers,
            ("connect", Some(index)) => match index.parse() {
                Ok(index) if index > 0 => Self::Connect(index),
                _ => Self::Invalid(format!("invalid peer number: {index}")),
            },
            ("connect", None) => Self::Invalid("usage: /connect <n>".to_string()),
            ("help", None) => Self::Help,
            ("quit" | "exit", None) => Self::Quit,
            ("refresh" | "list" | "peers" | "help" | "quit" | "exit", Some(_)) => {
                Self::Invalid(format!("/{name} takes no arguments"))
            }
            _ => Self::Invalid(format!("unknown command: /{name}")),
        }
    }
}
