//! Client code for the Hatena Blog MCP server.
//!
//! This crate provides the AtomPub fetch adapter: HTTP access with Basic
//! auth, cursor validation, and Atom feed parsing into core entry types.

pub mod atompub;

pub use atompub::{AtomPubError, HatenaClient, HatenaConfig, parse_entry, parse_feed};
