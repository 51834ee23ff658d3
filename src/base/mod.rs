//! Core components, types, and utilities for the thread-audit-bot.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - The audit error taxonomy.
//! - Common types and result handling.

pub mod config;
pub mod error;
pub mod types;
