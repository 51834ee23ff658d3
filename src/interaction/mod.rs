//! Slash-command handling for thread-audit-bot.
//!
//! This module turns an acknowledged command into a finished report:
//! - Running the channel audit in the background
//! - Falling back to an error message when the audit fails
//! - Delivering the text through the command's response URL

pub mod statistics;
