use pcsc::{Protocols, ShareMode as PcscShareMode};

/// Sharing mode for card connections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub(crate) enum ShareMode {
    /// Exclusive access to the card
    Exclusive,
    /// Shared access to the card
    #[default]
    Shared,
}

impl From<ShareMode> for PcscShareMode {
    fn from(mode: ShareMode) -> Self {
        match mode {
            ShareMode::Exclusive => Self::Exclusive,
            ShareMode::Shared => Self::Shared,
        }
    }
}

/// How to reach the reader
#[derive(Debug, Clone)]
pub(crate) struct PcscConfig {
    /// Reader to open; the first reader with a card when absent
    pub(crate) reader: Option<String>,
    /// Sharing mode for card connections
    pub(crate) share_mode: ShareMode,
    /// Protocols offered when connecting
    pub(crate) protocols: Protocols,
}

impl Default for PcscConfig {
    fn default() -> Self {
        Self {
            reader: None,
            share_mode: ShareMode::Shared,
            protocols: Protocols::ANY,
        }
    }
}

impl PcscConfig {
    /// Open a named reader
    pub(crate) fn with_reader(mut self, reader: Option<String>) -> Self {
        self.reader = reader;
        self
    }

    /// Set the sharing mode
    pub(crate) const fn with_share_mode(mut self, share_mode: ShareMode) -> Self {
        self.share_mode = share_mode;
        self
    }
}
