//! Core types and shared functionality for the Hatena Blog MCP server.
//!
//! This crate provides:
//! - Blog entry types
//! - File-backed entry cache with lazy expiry
//! - The cache-and-filter service behind every tool
//! - Unified error types
//! - Configuration structures

pub mod blog;
pub mod cache;
pub mod config;
pub mod entry;
pub mod error;

pub use blog::{BlogService, CategoryCount, EntrySource, UnknownDraftPolicy};
pub use cache::{CachedEntry, EntryStore};
pub use config::{AppConfig, ConfigError};
pub use entry::{Entry, EntryPage};
pub use error::Error;
