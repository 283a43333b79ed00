use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mongodb::error::Error as MongoError;
use serde_json::json;
use std::sync::Arc;
use tokio::task::JoinError;

/// Errors handed out by the connection provider. Cloneable because a failed
/// connection attempt is memoized and returned to every awaiter.
#[derive(thiserror::Error, Debug, Clone)]
pub enum Error {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("Failed to connect to MongoDB: {0}")]
    Connection(Arc<MongoError>),

    #[error("{0}")]
    Mongo(Arc<MongoError>),

    #[error("{0}")]
    RunSyncTask(Arc<JoinError>),
}

impl Error {
    fn get_codes(&self) -> (StatusCode, u16) {
        match *self {
            // Configuration
            Error::Config(ConfigError::MissingUri) => (StatusCode::INTERNAL_SERVER_ERROR, 5000),
            Error::Config(ConfigError::MissingDatabase) => {
                (StatusCode::INTERNAL_SERVER_ERROR, 5001)
            }

            // Database
            Error::Connection(_) => (StatusCode::SERVICE_UNAVAILABLE, 5002),
            Error::Mongo(_) => (StatusCode::INTERNAL_SERVER_ERROR, 5003),
            Error::RunSyncTask(_) => (StatusCode::INTERNAL_SERVER_ERROR, 5004),
        }
    }

    pub fn connection(err: MongoError) -> Self {
        Error::Connection(Arc::new(err))
    }
}

impl From<MongoError> for Error {
    fn from(err: MongoError) -> Self {
        Error::Mongo(Arc::new(err))
    }
}

impl From<JoinError> for Error {
    fn from(err: JoinError) -> Self {
        Error::RunSyncTask(Arc::new(err))
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::error!("{self:?}");

        let (status_code, code) = self.get_codes();
        let message = self.to_string();

        (status_code, Json(json!({ "code": code, "message": message }))).into_response()
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Please add your Mongo URI to the .env file (MONGO_URI is not set)")]
    MissingUri,
    #[error("No database selected: set DATABASE_NAME or add a database to MONGO_URI")]
    MissingDatabase,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_codes_are_grouped() {
        let refused =
            || MongoError::from(io::Error::new(io::ErrorKind::ConnectionRefused, "refused"));

        assert_eq!(
            Error::from(ConfigError::MissingUri).get_codes(),
            (StatusCode::INTERNAL_SERVER_ERROR, 5000)
        );
        assert_eq!(
            Error::from(ConfigError::MissingDatabase).get_codes(),
            (StatusCode::INTERNAL_SERVER_ERROR, 5001)
        );
        assert_eq!(
            Error::connection(refused()).get_codes(),
            (StatusCode::SERVICE_UNAVAILABLE, 5002)
        );
        assert_eq!(
            Error::from(refused()).get_codes(),
            (StatusCode::INTERNAL_SERVER_ERROR, 5003)
        );
    }

    #[tokio::test]
    async fn test_panicked_task_maps_to_run_sync_task() {
        let handle: tokio::task::JoinHandle<()> =
            tokio::spawn(async { panic!("connect task panicked") });
        let join_error = handle.await.unwrap_err();

        assert_eq!(
            Error::from(join_error).get_codes(),
            (StatusCode::INTERNAL_SERVER_ERROR, 5004)
        );
    }
}
