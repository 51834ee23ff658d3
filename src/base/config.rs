//! Load configuration via `config` crate with env-override support.

use std::{ops::Deref, sync::Arc};

use serde::Deserialize;

use crate::audit::DEFAULT_PAGE_SIZE;

use super::types::Res;

/// Default slash command the bot answers to.
fn default_command_name() -> String {
    "/statistics".to_string()
}

/// Default number of messages requested per history page.
fn default_history_page_size() -> u16 {
    DEFAULT_PAGE_SIZE
}

/// Default number of unacknowledged threads listed in a report.
fn default_max_reported_threads() -> usize {
    50
}

/// Configuration for the thread-audit-bot application.
#[derive(Debug, Clone)]
pub struct Config {
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ConfigInner {
    /// Slack app token used for socket mode (`SLACK_APP_TOKEN`).
    pub slack_app_token: String,
    /// Slack bot token used for Web API calls (`SLACK_BOT_TOKEN`).
    pub slack_bot_token: String,
    /// Slash command that triggers an audit (`COMMAND_NAME`).
    #[serde(default = "default_command_name")]
    pub command_name: String,
    /// Messages requested per `conversations.history` page (`HISTORY_PAGE_SIZE`).
    /// Slack accepts values between 1 and 1000.
    #[serde(default = "default_history_page_size")]
    pub history_page_size: u16,
    /// Maximum unacknowledged threads listed in a report (`MAX_REPORTED_THREADS`).
    #[serde(default = "default_max_reported_threads")]
    pub max_reported_threads: usize,
    /// Resolve each reacting user at most once per audit (`CACHE_DISPLAY_NAMES`).
    #[serde(default)]
    pub cache_display_names: bool,
}

impl Config {
    pub fn load(explicit_path: Option<&std::path::Path>) -> Res<Self> {
        let mut cfg = config::Config::builder().add_source(config::Environment::default().prefix("THREAD_AUDIT"));

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if std::path::Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        let result = Config {
            inner: Arc::new(cfg.build()?.try_deserialize()?),
        };

        result.validate()?;

        Ok(result)
    }

    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> Res<()> {
        if !self.command_name.starts_with('/') {
            return Err(anyhow::anyhow!("Command name must start with `/`."));
        }

        if self.history_page_size < 1 || self.history_page_size > 1000 {
            return Err(anyhow::anyhow!("History page size must be between 1 and 1000."));
        }

        if self.max_reported_threads < 1 {
            return Err(anyhow::anyhow!("Max reported threads must be at least 1."));
        }

        Ok(())
    }
}
