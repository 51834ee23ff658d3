pub mod slack;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::types::{HistoryPage, HistoryQuery, Res, UserProfile, Void};

// Traits.

/// Generic "chat" trait that clients must implement.
///
/// This trait defines the calls the auditor makes against a chat platform
/// like Slack. Implementing this trait allows the audit to run against a
/// different platform, or against a mock in tests.
#[async_trait]
pub trait GenericChatClient: Send + Sync + 'static {
    /// Start the chat client listener.
    ///
    /// This sets up the slash-command listener and blocks until shutdown.
    async fn start(&self) -> Void;

    /// Fetch one page of channel history.
    ///
    /// Returns the messages in provider order, along with the cursor for the
    /// next page when more remain.
    async fn fetch_history(&self, query: &HistoryQuery) -> Res<HistoryPage>;

    /// Look up the profile of a user.
    async fn get_user_profile(&self, user_id: &str) -> Res<UserProfile>;

    /// Get a permalink to a message, if the platform has one.
    async fn get_permalink(&self, channel_id: &str, message_ts: &str) -> Res<Option<String>>;

    /// Deliver a delayed response to a slash command.
    async fn respond(&self, response_url: &str, text: &str) -> Void;
}

// Structs.

/// Chat client for the application.
///
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct ChatClient {
    inner: Arc<dyn GenericChatClient>,
}

impl Deref for ChatClient {
    type Target = dyn GenericChatClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl ChatClient {
    pub fn new(inner: Arc<dyn GenericChatClient>) -> Self {
        Self { inner }
    }
}
