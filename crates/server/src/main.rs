//! mcp-hatena-blog server entry point.
//!
//! This is the main binary that boots the MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use hatena_client::{HatenaClient, HatenaConfig};
use hatena_core::{AppConfig, BlogService, EntryStore};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

use crate::source::BlogSource;

mod handler;
mod source;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;

    let source = match HatenaConfig::from_app_config(&config) {
        Ok(client_config) => BlogSource::Ready(HatenaClient::new(client_config)?),
        Err(e) => {
            tracing::warn!("AtomPub client not configured, network tools will fail: {e}");
            BlogSource::Unconfigured(e)
        }
    };

    let store = EntryStore::open(&config.cache_dir, config.cache_ttl()).await?;
    let service = Arc::new(BlogService::new(source, store, config.unknown_draft_policy));

    if config.sync_on_startup {
        tokio::spawn(prime_cache(Arc::clone(&service)));
    }

    tracing::info!(cache_dir = %config.cache_dir.display(), "Starting mcp-hatena-blog server on stdio transport");

    let handler = handler::HatenaBlogServer::new(service);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}

/// Populate an empty cache with a full sync. Failures are logged, never fatal.
async fn prime_cache(service: Arc<BlogService<BlogSource>>) {
    match service.store().is_empty().await {
        Ok(true) => {}
        Ok(false) => return,
        Err(e) => {
            tracing::warn!("cannot inspect cache, skipping startup sync: {e}");
            return;
        }
    }

    if matches!(service.source(), BlogSource::Unconfigured(_)) {
        return;
    }

    tracing::info!("cache is empty, running startup sync");
    match service.sync_all().await {
        Ok(report) => tracing::info!(synced = report.synced, pages = report.pages, "startup sync finished"),
        Err(e) => tracing::warn!("startup sync failed: {e}"),
    }
}
