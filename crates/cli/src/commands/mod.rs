// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod config;
pub mod files;
pub mod health;
pub mod queue;
pub mod search;
pub mod session;
pub mod upload;

use std::path::PathBuf;
use std::sync::Arc;

use ragq_core::{EventBus, QueueProcessor, UploadQueue, UploadStore};
use serde::Serialize;

use crate::api::ApiClient;
use crate::auth::TokenStore;
use crate::config::Config;
use crate::error::Result;
use crate::transmit::HttpTransmitter;

/// Settings and session shared by every command.
#[derive(Debug, Clone)]
pub struct Context {
    pub config_dir: PathBuf,
    /// Effective configuration, environment overrides applied.
    pub config: Config,
    pub tokens: TokenStore,
}

impl Context {
    /// Context for the resolved config directory.
    pub fn load() -> Result<Self> {
        Self::from_dir(crate::config::config_dir()?)
    }

    pub fn from_dir(config_dir: PathBuf) -> Result<Self> {
        let config = Config::load(&config_dir)?.with_env_overrides();
        let tokens = TokenStore::new(&config_dir);
        Ok(Context {
            config_dir,
            config,
            tokens,
        })
    }

    /// Client without credentials.
    pub fn client(&self) -> Result<ApiClient> {
        ApiClient::new(&self.config.api_url, self.config.timeout())
    }

    /// Client carrying the session token. Fails with `NotLoggedIn` if there is none.
    pub fn authed_client(&self) -> Result<ApiClient> {
        let token = self.tokens.resolve_token()?;
        Ok(self.client()?.with_token(token))
    }

    /// The upload queue database. An unreadable database yields an
    /// unavailable store rather than an error.
    pub fn open_store(&self) -> Result<Arc<UploadStore>> {
        let path = self.config.queue_db_path()?;
        let store = UploadStore::open_or_unavailable(&path).with_retention(self.config.queue.retention());
        Ok(Arc::new(store))
    }

    /// Queue view whose processor transmits with `client`.
    pub fn open_queue(&self, store: Arc<UploadStore>, client: ApiClient) -> Arc<UploadQueue> {
        let transmitter = Arc::new(HttpTransmitter::new(client));
        let processor = QueueProcessor::with_config(
            store,
            transmitter,
            EventBus::new(),
            self.config.queue.processor_config(),
        );
        UploadQueue::new(Arc::new(processor))
    }
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
