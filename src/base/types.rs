pub type Err = anyhow::Error;
pub type Res<T> = Result<T, Err>;
pub type Void = Res<()>;

/// Parameters for a single page of channel history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryQuery {
    pub channel_id: String,
    /// Oldest message timestamp (inclusive), in epoch seconds.
    pub oldest: String,
    /// Latest message timestamp (inclusive), in epoch seconds.
    pub latest: String,
    pub limit: u16,
    /// Opaque pagination token from the previous page, if any.
    pub cursor: Option<String>,
}

/// One page of channel history, in the order the provider returned it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryPage {
    pub messages: Vec<HistoryMessage>,
    pub next_cursor: Option<String>,
}

/// A top-level channel message and its reactions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryMessage {
    pub ts: String,
    pub reactions: Vec<Reaction>,
}

/// An emoji reaction and the users who added it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reaction {
    pub name: String,
    pub users: Vec<String>,
}

/// The parts of a user profile needed to name a reactor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub display_name: Option<String>,
    pub name: String,
}

impl UserProfile {
    /// The display name when set, otherwise the account name.
    pub fn preferred_name(&self) -> &str {
        match self.display_name.as_deref() {
            Some(display_name) if !display_name.is_empty() => display_name,
            _ => &self.name,
        }
    }
}
