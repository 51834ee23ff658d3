//! Chat service integration for thread-audit-bot.
//!
//! This module provides the Slack implementation of [`GenericChatClient`]:
//! - Receiving slash commands over socket mode
//! - Paging through channel history
//! - Resolving user profiles and message permalinks
//! - Delivering delayed command responses

use crate::{
    base::{
        config::Config,
        types::{HistoryMessage, HistoryPage, HistoryQuery, Reaction, Res, UserProfile, Void},
    },
    interaction,
};
use async_trait::async_trait;
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::connect::HttpConnector;
use slack_morphism::prelude::*;
use tracing::{debug, info, instrument, warn};
use url::Url;

use std::{ops::Deref, sync::Arc};

use super::{ChatClient, GenericChatClient};

// Type aliases.

type FullClient = slack_morphism::SlackClient<SlackClientHyperConnector<HttpsConnector<HttpConnector>>>;

// Extra methods on `ChatClient` applied by the slack implementation.

impl ChatClient {
    /// Creates a new Slack chat client.
    pub async fn slack(config: &Config) -> Res<Self> {
        let client = SlackChatClient::new(config).await?;
        Ok(Self { inner: Arc::new(client) })
    }
}

impl From<SlackChatClient> for ChatClient {
    fn from(client: SlackChatClient) -> Self {
        Self { inner: Arc::new(client) }
    }
}

// Structs.

/// User state for the slack socket client.
struct SlackUserState {
    config: Config,
    chat: ChatClient,
}

/// Slack client implementation.
#[derive(Clone)]
struct SlackChatClient {
    pub app_token: SlackApiToken,
    pub bot_token: SlackApiToken,
    pub client: Arc<FullClient>,
    pub config: Config,
}

impl Deref for SlackChatClient {
    type Target = FullClient;

    fn deref(&self) -> &Self::Target {
        &self.client
    }
}

impl SlackChatClient {
    /// Create a new Slack chat client.
    #[instrument(name = "SlackChatClient::new", skip_all)]
    pub async fn new(config: &Config) -> Res<Self> {
        // Initialize tokens.

        let app_token = SlackApiToken::new(SlackApiTokenValue(config.slack_app_token.clone()));
        let bot_token = SlackApiToken::new(SlackApiTokenValue(config.slack_bot_token.clone()));

        // Initialize the Slack client.

        let https_connector = HttpsConnector::<HttpConnector>::builder().with_native_roots()?.https_only().enable_all_versions().build();
        let connector = SlackClientHyperConnector::with_connector(https_connector);
        let client = Arc::new(slack_morphism::SlackClient::new(connector));

        // Check the bot token before listening.

        let session = client.open_session(&bot_token);
        let bot_user = session.auth_test().await?;

        info!("Slack bot user ID: {}", bot_user.user_id.0);

        Ok(Self {
            app_token,
            bot_token,
            client,
            config: config.clone(),
        })
    }
}

#[async_trait]
impl GenericChatClient for SlackChatClient {
    async fn start(&self) -> Void {
        // Initialize the socket mode listener.

        let socket_mode_callbacks = SlackSocketModeListenerCallbacks::new()
            .with_command_events(handle_command_event)
            .with_interaction_events(handle_interaction_event)
            .with_push_events(handle_push_event);

        // Initialize the socket mode listener environment.

        let listener_environment = Arc::new(SlackClientEventsListenerEnvironment::new(self.client.clone()).with_user_state(SlackUserState {
            config: self.config.clone(),
            chat: ChatClient::from(self.clone()),
        }));

        let socket_mode_listener = Arc::new(SlackClientSocketModeListener::new(
            &SlackClientSocketModeConfig::new(),
            listener_environment.clone(),
            socket_mode_callbacks,
        ));

        // Register an app token to listen for events,
        socket_mode_listener.listen_for(&self.app_token).await?;

        info!("Listening for `{}` commands ...", self.config.command_name);

        // Serve until Ctrl-C.
        socket_mode_listener.serve().await;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn fetch_history(&self, query: &HistoryQuery) -> Res<HistoryPage> {
        let request = SlackApiConversationsHistoryRequest::new()
            .with_channel(SlackChannelId(query.channel_id.clone()))
            .with_oldest(SlackTs(query.oldest.clone()))
            .with_latest(SlackTs(query.latest.clone()))
            .with_limit(query.limit)
            .with_inclusive(true)
            .opt_cursor(query.cursor.clone().map(SlackCursorId));

        let session = self.client.open_session(&self.bot_token);

        let response = session.conversations_history(&request).await?;

        let messages = response
            .messages
            .into_iter()
            .map(|message| HistoryMessage {
                ts: message.origin.ts.0,
                reactions: message
                    .content
                    .reactions
                    .unwrap_or_default()
                    .into_iter()
                    .map(|reaction| Reaction {
                        name: reaction.name.0,
                        users: reaction.users.into_iter().map(|user| user.0).collect(),
                    })
                    .collect(),
            })
            .collect();

        // Slack signals the last page with a missing or empty cursor.
        let next_cursor = response.response_metadata.and_then(|metadata| metadata.next_cursor).map(|cursor| cursor.0).filter(|cursor| !cursor.is_empty());

        Ok(HistoryPage { messages, next_cursor })
    }

    #[instrument(skip(self))]
    async fn get_user_profile(&self, user_id: &str) -> Res<UserProfile> {
        let request = SlackApiUsersInfoRequest::new(SlackUserId(user_id.to_string()));

        let session = self.client.open_session(&self.bot_token);

        let user = session.users_info(&request).await?.user;

        let name = user.name.ok_or_else(|| anyhow::anyhow!("User {} has no name", user_id))?;
        let display_name = user.profile.and_then(|profile| profile.display_name);

        Ok(UserProfile { display_name, name })
    }

    #[instrument(skip(self))]
    async fn get_permalink(&self, channel_id: &str, message_ts: &str) -> Res<Option<String>> {
        let request = SlackApiChatGetPermalinkRequest::new(SlackChannelId(channel_id.to_string()), SlackTs(message_ts.to_string()));

        let session = self.client.open_session(&self.bot_token);

        let response = session.chat_get_permalink(&request).await?;

        Ok(Some(response.permalink.to_string()))
    }

    #[instrument(skip(self, text))]
    async fn respond(&self, response_url: &str, text: &str) -> Void {
        let response_url = SlackResponseUrl(Url::parse(response_url)?);
        let request = SlackApiPostWebhookMessageRequest::new(SlackMessageContent::new().with_text(text.to_string()));

        self.client.respond_to_event(&response_url, &request).await.map_err(|e| anyhow::anyhow!("Failed to respond to command: {}", e))?;

        Ok(())
    }
}

// Socket mode listener callbacks for Slack.

/// Handles command events from Slack.
///
/// The configured command is acknowledged right away; the audit itself runs
/// in a background task and answers through the event's response URL.
#[instrument(skip_all, fields(command = %event.command.0))]
async fn handle_command_event(
    event: SlackCommandEvent,
    _client: Arc<SlackHyperClient>,
    states: SlackClientEventsUserState,
) -> Result<SlackCommandEventResponse, Box<dyn std::error::Error + Send + Sync>> {
    let states = states.read().await;
    let user_state = states.get_user_state::<SlackUserState>().ok_or(anyhow::anyhow!("Failed to get user state"))?;

    if event.command.0 != user_state.config.command_name {
        warn!("Received unsupported command `{}`.", event.command.0);
        let text = format!("Only `{}` is currently supported.", user_state.config.command_name);
        return Ok(SlackCommandEventResponse::new(SlackMessageContent::new().with_text(text)));
    }

    debug!("Command received: {}", serde_json::to_string(&event)?);

    interaction::statistics::handle_statistics_command(
        event.channel_id.0.clone(),
        event.response_url.0.to_string(),
        user_state.config.clone(),
        user_state.chat.clone(),
    );

    Ok(SlackCommandEventResponse::new(SlackMessageContent::new()))
}

/// Handles interaction events from Slack.
async fn handle_interaction_event(event: SlackInteractionEvent, _client: Arc<SlackHyperClient>, _states: SlackClientEventsUserState) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    warn!("[INTERACTION] {:#?}", event);
    Ok(())
}

/// Handles push events from Slack.
async fn handle_push_event(_event: SlackPushEventCallback, _client: Arc<SlackHyperClient>, _states: SlackClientEventsUserState) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    warn!("Received unhandled push event.");
    Ok(())
}
