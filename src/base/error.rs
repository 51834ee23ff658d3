//! Error taxonomy for a channel audit.

use thiserror::Error;

use super::types::Err;

/// Errors raised while auditing a channel.
///
/// Only [`AuditError::Scan`] aborts an audit. The resolution failures are
/// reported so callers can log them, then replaced with a fallback value.
#[derive(Debug, Error)]
pub enum AuditError {
    /// A reactor's user id could not be turned into a display name.
    #[error("failed to resolve display name for user {user_id}: {source}")]
    NameResolution { user_id: String, source: Err },
    /// A message permalink could not be fetched.
    #[error("failed to resolve permalink for message {ts}: {source}")]
    PermalinkResolution { ts: String, source: Err },
    /// Anything else; the audit is abandoned.
    #[error(transparent)]
    Scan(#[from] Err),
}

impl AuditError {
    /// Whether the audit can continue with a substituted value.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, AuditError::Scan(_))
    }
}
