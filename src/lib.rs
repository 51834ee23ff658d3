//! Library root for `thread-audit-bot`.
//!
//! Thread-audit-bot answers a single Slack slash command by auditing the
//! channel it was invoked from:
//! - Pages through the channel's history over a fixed window
//! - Tallies emoji reactions per user
//! - Lists the threads that nobody has checked off
//!
//! The chat platform sits behind the `GenericChatClient` trait so the audit
//! can be exercised without Slack.

pub mod audit;
pub mod base;
pub mod interaction;
pub mod runtime;
pub mod service;

use base::{config::Config, types::Void};
use rustls::crypto;
use tracing::info;

/// Public async entry for the binary crate.
///
/// Sets up necessary services and starts the thread-audit-bot runtime:
/// - Initializes the crypto provider
/// - Creates the runtime context with the chat client
/// - Listens for slash commands until shutdown
pub async fn start(config: Config) -> Void {
    info!("Starting thread-audit-bot ...");

    // Start the crypto provider.
    crypto::ring::default_provider().install_default().map_err(|_| anyhow::anyhow!("A crypto provider is already installed"))?;

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config).await?;

    // Start the runtime.
    runtime.start().await?;

    Ok(())
}
