/// Where the app is in the connect / browse flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    /// A connect is in flight; `was_connected` tells where a failure returns to
    Connecting { was_connected: bool },
    Connected(Activity),
}

impl ConnectionState {
    #[must_use]
    pub const fn is_connected(self) -> bool {
        matches!(
            self,
            Self::Connected(_) | Self::Connecting { was_connected: true }
        )
    }
}

/// What a live connection is doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Activity {
    #[default]
    Browsing,
    /// A query is in flight
    Querying,
}

/// The pane receiving key presses when no popup is open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Tables,
    Editor,
    Results,
}

impl Focus {
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Tables => Self::Editor,
            Self::Editor => Self::Results,
            Self::Results => Self::Tables,
        }
    }

    #[must_use]
    pub const fn previous(self) -> Self {
        match self {
            Self::Tables => Self::Results,
            Self::Editor => Self::Tables,
            Self::Results => Self::Editor,
        }
    }
}
