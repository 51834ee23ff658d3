//! Channel audits: who reacted to what, and which threads are still open.
//!
//! A [`ThreadAuditor`] walks a channel's history over an [`AuditWindow`]
//! one page at a time, feeding every reaction into a [`ReactionTally`] and
//! recording an [`UnacknowledgedEntry`] for each message without a check
//! mark. Calls to the chat platform are made one at a time.

pub mod summary;
pub mod tally;
pub mod window;

use std::collections::{BTreeSet, HashMap};

use tracing::{debug, info, instrument, warn};

use crate::{
    base::{
        error::AuditError,
        types::{HistoryMessage, HistoryQuery},
    },
    service::chat::ChatClient,
};

pub use summary::{AuditSummary, NO_LINK, UnacknowledgedEntry};
pub use tally::{ReactionTally, UserStats, is_acknowledgement};
pub use window::AuditWindow;

/// Default number of messages requested per history page.
pub const DEFAULT_PAGE_SIZE: u16 = 200;

/// The name shown for a user whose profile could not be fetched.
pub fn fallback_mention(user_id: &str) -> String {
    format!("<@{user_id}>")
}

/// Substitutes `fallback` for a recoverable error, and passes anything else through.
fn recover(result: Result<String, AuditError>, fallback: impl FnOnce() -> String) -> Result<String, AuditError> {
    match result {
        Err(err) if err.is_recoverable() => {
            warn!("{}", err);
            Ok(fallback())
        }
        other => other,
    }
}

/// Scans one channel over one window.
pub struct ThreadAuditor<'a> {
    chat: &'a ChatClient,
    channel_id: String,
    window: AuditWindow,
    page_size: u16,
    cache_display_names: bool,
}

impl<'a> ThreadAuditor<'a> {
    pub fn new(chat: &'a ChatClient, channel_id: impl Into<String>, window: AuditWindow) -> Self {
        Self {
            chat,
            channel_id: channel_id.into(),
            window,
            page_size: DEFAULT_PAGE_SIZE,
            cache_display_names: false,
        }
    }

    pub fn with_page_size(mut self, page_size: u16) -> Self {
        self.page_size = page_size;
        self
    }

    /// Look each user up once per scan instead of once per reaction.
    pub fn with_display_name_cache(mut self, enabled: bool) -> Self {
        self.cache_display_names = enabled;
        self
    }

    /// Pages through the whole window and builds the summary.
    ///
    /// Only [`AuditError::Scan`] is ever returned; recoverable name and
    /// permalink failures are logged and replaced with fallbacks.
    #[instrument(skip(self), fields(channel_id = %self.channel_id))]
    pub async fn scan(&self) -> Result<AuditSummary, AuditError> {
        let mut summary = AuditSummary::new(self.window.label.clone());
        let mut names = DisplayNames::new(self.chat, self.cache_display_names);
        let mut cursor = None;
        let mut pages = 0usize;

        loop {
            let query = HistoryQuery {
                channel_id: self.channel_id.clone(),
                oldest: self.window.oldest.to_string(),
                latest: self.window.latest.to_string(),
                limit: self.page_size,
                cursor: cursor.take(),
            };

            let page = self.chat.fetch_history(&query).await?;
            pages += 1;

            debug!("Fetched page {} with {} messages", pages, page.messages.len());

            for message in page.messages {
                self.classify(message, &mut names, &mut summary).await?;
            }

            cursor = page.next_cursor.filter(|c| !c.is_empty());

            if cursor.is_none() {
                break;
            }
        }

        info!(
            "Scanned {} messages over {} pages; {} acknowledged, {} pending, {} reactions",
            summary.total_messages,
            pages,
            summary.acknowledged(),
            summary.pending(),
            summary.tally.total()
        );

        Ok(summary)
    }

    async fn classify(&self, message: HistoryMessage, names: &mut DisplayNames<'_>, summary: &mut AuditSummary) -> Result<(), AuditError> {
        summary.total_messages += 1;

        let mut reactors = BTreeSet::new();
        let mut acknowledged = false;

        for reaction in &message.reactions {
            for user_id in &reaction.users {
                let name = names.resolve(user_id).await?;
                summary.tally.record(&name, &reaction.name);
                reactors.insert(name);
            }

            acknowledged |= is_acknowledgement(&reaction.name);
        }

        if acknowledged {
            return Ok(());
        }

        let permalink = recover(self.permalink(&message.ts).await, || NO_LINK.to_string())?;
        let time = window::format_message_ts(&message.ts)?;

        summary.unacknowledged.push(UnacknowledgedEntry { permalink, time, reactors });

        Ok(())
    }

    async fn permalink(&self, ts: &str) -> Result<String, AuditError> {
        let permalink = self.chat.get_permalink(&self.channel_id, ts).await.map_err(|source| AuditError::PermalinkResolution { ts: ts.to_string(), source })?;

        Ok(permalink.unwrap_or_else(|| NO_LINK.to_string()))
    }
}

/// Resolves user ids to display names for the duration of one scan.
struct DisplayNames<'a> {
    chat: &'a ChatClient,
    cache: Option<HashMap<String, String>>,
}

impl<'a> DisplayNames<'a> {
    fn new(chat: &'a ChatClient, cached: bool) -> Self {
        Self {
            chat,
            cache: cached.then(HashMap::new),
        }
    }

    async fn resolve(&mut self, user_id: &str) -> Result<String, AuditError> {
        if let Some(name) = self.cache.as_ref().and_then(|cache| cache.get(user_id)) {
            return Ok(name.clone());
        }

        let looked_up = self.lookup(user_id).await;

        if let (Ok(name), Some(cache)) = (&looked_up, self.cache.as_mut()) {
            cache.insert(user_id.to_string(), name.clone());
        }

        recover(looked_up, || fallback_mention(user_id))
    }

    async fn lookup(&self, user_id: &str) -> Result<String, AuditError> {
        let profile = self.chat.get_user_profile(user_id).await.map_err(|source| AuditError::NameResolution { user_id: user_id.to_string(), source })?;

        Ok(profile.preferred_name().to_string())
    }
}
