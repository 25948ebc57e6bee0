use defs::Peer;

pub const PLACEHOLDER: &str = "No other peers online.";

/// One row of the rendered peer list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Placeholder,
    Peer(Peer),
}

/// The peer list as shown to the user, plus which row is highlighted.
///
/// The highlight is cosmetic. Broadcasts always go to the full list the
/// tracker returns, never to the selection.
#[derive(Debug, Clone)]
pub struct PeerSelector {
    entries: Vec<Entry>,
    active: Option<usize>,
}

impl Default for PeerSelector {
    fn default() -> Self {
        Self {
            entries: vec![Entry::Placeholder],
            active: None,
        }
    }
}

impl PeerSelector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from scratch. Clears any selection.
    pub fn render(&mut self, peers: Vec<Peer>) {
        self.active = None;
        self.entries = if peers.is_empty() {
            vec![Entry::Placeholder]
        } else {
            peers.into_iter().map(Entry::Peer).collect()
        };
    }

    /// Highlight the 1-based row `index` and return its peer. The
    /// placeholder and out-of-range rows select nothing and leave the current
    /// highlight alone.
    pub fn select(&mut self, index: usize) -> Option<&Peer> {
        let slot = index.checked_sub(1)?;
        match self.entries.get(slot) {
            Some(Entry::Peer(peer)) => {
                self.active = Some(slot);
                Some(peer)
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    #[must_use]
    pub fn selectable(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| matches!(entry, Entry::Peer(_)))
            .count()
    }

    #[must_use]
    pub fn active(&self) -> Option<&Peer> {
        match self.entries.get(self.active?) {
            Some(Entry::Peer(peer)) => Some(peer),
            _ => None,
        }
    }

    /// Display lines, one per entry.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.entries
            .iter()
            .enumerate()
            .map(|(slot, entry)| match entry {
                Entry::Placeholder => format!("    {PLACEHOLDER}"),
                Entry::Peer(peer) => {
                    let marker = if self.active == Some(slot) { '*' } else { ' ' };
                    format!("{marker} [{}] {peer}", slot + 1)
                }
            })
            .collect()
    }
}
