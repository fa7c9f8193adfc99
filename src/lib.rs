//! RSS Notify - keyword alerts for syndication feeds
//!
//! Polls a list of RSS/Atom feeds, picks out entries whose title or
//! description mention a configured keyword, and posts each new match once
//! to a webhook as an embed.

pub mod checker;
pub mod config;
pub mod db;
pub mod error;
pub mod fetcher;
pub mod formatter;
pub mod matcher;
pub mod notifier;
