use std::collections::HashMap;
use std::sync::Arc;

use regmirror_sync::{HttpTransport, RemoteTransport};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::client::RegisterClient;
use crate::config::ClientConfig;
use crate::error::ClientResult;

/// A client shared between tasks. Refresh takes the write lock.
pub type SharedClient = Arc<RwLock<RegisterClient>>;

/// Opens a transport for a register.
pub trait TransportFactory: Send + Sync {
    fn transport(
        &self,
        register: &str,
        environment: &str,
        config: &ClientConfig,
    ) -> ClientResult<Arc<dyn RemoteTransport>>;
}

/// Connects to the public register endpoints over HTTP.
#[derive(Clone, Copy, Debug, Default)]
pub struct HttpTransportFactory;

impl TransportFactory for HttpTransportFactory {
    fn transport(
        &self,
        register: &str,
        environment: &str,
        config: &ClientConfig,
    ) -> ClientResult<Arc<dyn RemoteTransport>> {
        let url = config.register_url(register, environment);
        let transport = HttpTransport::new(&url, &config.user_agent, config.api_key.clone())?;
        Ok(Arc::new(transport))
    }
}

/// Registry of register clients keyed by `register:environment`.
///
/// A client is built and synced on first request. Later requests return the
/// same client, refreshed first when it is older than the configured cache
/// duration.
pub struct RegisterClientManager<F: TransportFactory = HttpTransportFactory> {
    config: ClientConfig,
    factory: F,
    clients: Mutex<HashMap<String, SharedClient>>,
}

impl RegisterClientManager {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_factory(config, HttpTransportFactory)
    }
}

impl<F: TransportFactory> RegisterClientManager<F> {
    pub fn with_factory(config: ClientConfig, factory: F) -> Self {
        Self {
            config,
            factory,
            clients: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The client for `register` in `environment`, building it on a miss.
    ///
    /// Concurrent callers for the same key wait for a single build.
    pub async fn register(&self, register: &str, environment: &str) -> ClientResult<SharedClient> {
        let key = format!("{register}:{environment}");
        let mut clients = self.clients.lock().await;

        if let Some(client) = clients.get(&key) {
            let client = Arc::clone(client);
            drop(clients);
            self.refresh_if_stale(&key, &client).await?;
            return Ok(client);
        }

        info!(register, environment, "opening register");
        let transport = self.factory.transport(register, environment, &self.config)?;
        let client = RegisterClient::connect(transport, self.config.page_size).await?;
        let client = Arc::new(RwLock::new(client));
        clients.insert(key, Arc::clone(&client));
        Ok(client)
    }

    /// Number of clients built so far.
    pub async fn len(&self) -> usize {
        self.clients.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.clients.lock().await.is_empty()
    }

    async fn refresh_if_stale(&self, key: &str, client: &SharedClient) -> ClientResult<()> {
        let mut client = client.write().await;
        if client.last_refreshed().elapsed() < self.config.cache_duration() {
            return Ok(());
        }
        debug!(key, "cached register is stale, refreshing");
        client.refresh_data().await?;
        Ok(())
    }
}
