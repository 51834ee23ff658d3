//! The `/statistics` slash command.

use tracing::{Instrument, error, info, instrument};

use crate::{
    audit::{AuditWindow, ThreadAuditor},
    base::{config::Config, error::AuditError, types::Void},
    service::chat::ChatClient,
};

/// Handles the statistics command.
///
/// The caller has already acknowledged the command; this spawns the audit
/// and delivers the report to `response_url` once it finishes.
#[instrument(skip_all, fields(channel_id = %channel_id))]
pub fn handle_statistics_command(channel_id: String, response_url: String, config: Config, chat: ChatClient) {
    tokio::spawn(
        async move {
            // Process the command.
            let result = handle_statistics_command_internal(&channel_id, &response_url, &config, &chat).await;

            // Log any errors.
            if let Err(err) = &result {
                error!("Error while handling: {}", err);
            }
        }
        .in_current_span(),
    );
}

/// Runs the audit and posts whatever text it produced.
#[instrument(skip_all)]
pub async fn handle_statistics_command_internal(channel_id: &str, response_url: &str, config: &Config, chat: &ChatClient) -> Void {
    let text = build_statistics_report(channel_id, config, chat).await;

    chat.respond(response_url, &text).await
}

/// Builds the report text, or `Error: ...` if the audit could not finish.
pub async fn build_statistics_report(channel_id: &str, config: &Config, chat: &ChatClient) -> String {
    match run_audit(channel_id, config, chat).await {
        Ok(text) => text,
        Err(err) => {
            error!("Audit of {} failed: {}", channel_id, err);
            format!("Error: {err}")
        }
    }
}

async fn run_audit(channel_id: &str, config: &Config, chat: &ChatClient) -> Result<String, AuditError> {
    let window = AuditWindow::fixed()?;

    info!("Auditing {} from {} to {}", channel_id, window.oldest, window.latest);

    let summary = ThreadAuditor::new(chat, channel_id, window)
        .with_page_size(config.history_page_size)
        .with_display_name_cache(config.cache_display_names)
        .scan()
        .await?;

    Ok(summary.render(config.max_reported_threads))
}
