//! Main server integration for intake

use crate::access::TokenAccessGuard;
use crate::actions::{AccountRequestActions, EffectDispatcher};
use crate::models::Configuration;
use crate::notify::notifier_from_config;
use crate::store::{InMemoryRecordStore, RecordStore};
use anyhow::{Context, Result};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use warp::Filter;

/// Main intake server
pub struct IntakeServer {
    config: Configuration,
    actions: Arc<AccountRequestActions>,
}

impl IntakeServer {
    /// Create a server around existing actions
    pub fn new(config: Configuration, actions: Arc<AccountRequestActions>) -> Self {
        Self { config, actions }
    }

    /// Wire an in-memory store, token guard and configured notifier
    pub fn from_config(config: Configuration) -> Result<Self> {
        let store: Arc<dyn RecordStore> = Arc::new(InMemoryRecordStore::new());
        Self::with_store(config, store)
    }

    /// Same as [`from_config`](Self::from_config) with a caller-supplied store
    pub fn with_store(config: Configuration, store: Arc<dyn RecordStore>) -> Result<Self> {
        if let Err(errors) = config.validate() {
            anyhow::bail!("Invalid configuration: {}", errors.join("; "));
        }

        if config.access_tokens.is_empty() {
            tracing::warn!("No access tokens configured; every request will be rejected");
        }

        let guard = Arc::new(TokenAccessGuard::new(config.access_tokens.clone()));
        let notifier = notifier_from_config(&config)?;
        let dispatcher = EffectDispatcher::new(notifier, &config.frontend_url)?;
        let actions = Arc::new(AccountRequestActions::new(store, guard, dispatcher));

        Ok(Self::new(config, actions))
    }

    /// Start the server and run until Ctrl+C
    pub async fn start(self) -> Result<()> {
        self.start_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
            }
        })
        .await
    }

    /// Start the server and run until `shutdown` resolves
    pub async fn start_with_shutdown(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<()> {
        let (address, server) = self.bind_with_shutdown(shutdown)?;
        tracing::info!(%address, "intake server listening");
        server.await;
        tracing::info!("intake server stopped");
        Ok(())
    }

    /// Bind the listener and return the bound address with the serving future
    pub fn bind_with_shutdown(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(SocketAddr, impl Future<Output = ()> + 'static)> {
        let address: SocketAddr = self
            .config
            .bind_address()
            .parse()
            .context("Invalid server address")?;

        let routes = crate::server::api::create_api_routes(
            Arc::clone(&self.actions),
            self.config.max_body_size,
        )
        .with(warp::trace::request());

        warp::serve(routes)
            .try_bind_with_graceful_shutdown(address, shutdown)
            .context(format!("Failed to bind to {}", address))
    }
}
