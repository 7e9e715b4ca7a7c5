//! Entry source wiring.
//!
//! The server starts even without credentials so cache-only tools keep
//! working; any call that needs the network then reports the missing setting.

use hatena_client::HatenaClient;
use hatena_core::{ConfigError, Entry, EntryPage, EntrySource, Error};

/// The AtomPub client, or the reason it could not be configured.
#[derive(Debug)]
pub enum BlogSource {
    Ready(HatenaClient),
    Unconfigured(ConfigError),
}

impl BlogSource {
    fn client(&self) -> Result<&HatenaClient, Error> {
        match self {
            BlogSource::Ready(client) => Ok(client),
            BlogSource::Unconfigured(err) => Err(err.clone().into()),
        }
    }
}

#[async_trait::async_trait]
impl EntrySource for BlogSource {
    async fn fetch_page(&self, cursor: Option<&str>) -> Result<EntryPage, Error> {
        self.client()?.fetch_page(cursor).await
    }

    async fn fetch_entry(&self, entry_id: &str) -> Result<Entry, Error> {
        self.client()?.fetch_entry(entry_id).await
    }
}
