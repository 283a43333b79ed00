use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};
use mongodb::bson::doc;
use mongodb::{Client, Database};
use once_cell::sync::OnceCell as SyncOnceCell;
use std::fmt;
use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::config::{APP_CONFIG, Config};
use crate::errors::{ConfigError, Error};

static PROVIDER: SyncOnceCell<Arc<ConnectionProvider>> = SyncOnceCell::new();

/// The process-wide provider, built from [`APP_CONFIG`] on first use.
///
/// Fails without touching the network while `MONGO_URI` is missing; nothing
/// is stored in that case, so the error is returned on every call.
pub fn provider() -> Result<&'static Arc<ConnectionProvider>, Error> {
    PROVIDER.get_or_try_init(|| ConnectionProvider::new(&APP_CONFIG).map(Arc::new))
}

/// The shared MongoDB client. Every caller in the process awaits the same
/// connection attempt.
pub async fn connection() -> Result<&'static Client, Error> {
    provider()?.connection().await
}

/// Opens a connection to the document store.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    type Connection: Send + Sync + 'static;

    async fn connect(&self, uri: &str) -> Result<Self::Connection, Error>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MongoConnector;

#[async_trait]
impl Connector for MongoConnector {
    type Connection = Client;

    async fn connect(&self, uri: &str) -> Result<Client, Error> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(Error::connection)?;

        // The driver connects lazily; ping so the attempt reaches the server.
        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(Error::connection)?;

        Ok(client)
    }
}

type Attempt<T> = Shared<BoxFuture<'static, Result<Arc<T>, Error>>>;

/// Holds one memoized connection attempt. The attempt runs on its own task,
/// so awaiters only observe it: dropping an awaiter never restarts it, and
/// the outcome, success or failure, is shared by every caller.
pub struct ConnectionProvider<C: Connector = MongoConnector> {
    uri: String,
    database_name: Option<String>,
    connector: Arc<C>,
    attempt: SyncOnceCell<Attempt<C::Connection>>,
    connection: OnceCell<Result<Arc<C::Connection>, Error>>,
}

impl ConnectionProvider {
    pub fn new(config: &Config) -> Result<Self, Error> {
        Self::with_connector(config, MongoConnector)
    }
}

impl<C: Connector<Connection = Client>> ConnectionProvider<C> {
    /// The configured database, falling back to the one named in the URI.
    pub async fn database(&self) -> Result<Database, Error> {
        let client = self.connection().await?;

        match &self.database_name {
            Some(name) => Ok(client.database(name)),
            None => client
                .default_database()
                .ok_or_else(|| ConfigError::MissingDatabase.into()),
        }
    }
}

impl<C: Connector> ConnectionProvider<C> {
    pub fn with_connector(config: &Config, connector: C) -> Result<Self, Error> {
        let uri = config.mongo_uri()?.to_string();
        let database_name = config
            .database_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string);

        Ok(Self {
            uri,
            database_name,
            connector: Arc::new(connector),
            attempt: SyncOnceCell::new(),
            connection: OnceCell::new(),
        })
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Starts the connection attempt without waiting for it. Must be called
    /// from within a tokio runtime.
    pub fn start(&self) {
        self.attempt();
    }

    pub fn is_started(&self) -> bool {
        self.attempt.get().is_some()
    }

    /// Whether an awaiter has received the outcome of the attempt.
    pub fn is_initialized(&self) -> bool {
        self.connection.initialized()
    }

    pub async fn connection(&self) -> Result<&C::Connection, Error> {
        self.connection
            .get_or_init(|| self.attempt().clone())
            .await
            .as_ref()
            .map(|connection| &**connection)
            .map_err(Error::clone)
    }

    fn attempt(&self) -> &Attempt<C::Connection> {
        self.attempt.get_or_init(|| {
            let connector = Arc::clone(&self.connector);
            let uri = self.uri.clone();

            let task = tokio::spawn(async move {
                let redacted = redact_uri(&uri);
                tracing::info!("Connecting to MongoDB at {redacted}");

                let result = connector.connect(&uri).await;
                match &result {
                    Ok(_) => tracing::info!("Connected to MongoDB at {redacted}"),
                    Err(e) => tracing::error!("MongoDB connection to {redacted} failed: {e}"),
                }
                result.map(Arc::new)
            });

            async move { task.await.unwrap_or_else(|e| Err(e.into())) }
                .boxed()
                .shared()
        })
    }
}

impl<C: Connector> fmt::Debug for ConnectionProvider<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionProvider")
            .field("uri", &redact_uri(&self.uri))
            .field("database_name", &self.database_name)
            .field("started", &self.is_started())
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

/// Masks the credentials of a connection string for logging.
fn redact_uri(uri: &str) -> String {
    let Some((scheme, rest)) = uri.split_once("://") else {
        return uri.to_string();
    };
    let authority_end = rest.find(['/', '?']).unwrap_or(rest.len());

    match rest[..authority_end].rfind('@') {
        Some(at) => format!("{scheme}://***@{}", &rest[at + 1..]),
        None => uri.to_string(),
    }
}
