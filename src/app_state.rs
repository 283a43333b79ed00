use axum::extract::FromRef;
use std::sync::Arc;

use crate::database::{self, ConnectionProvider};

#[derive(Clone, Debug)]
pub struct AppState {
    pub provider: Arc<ConnectionProvider>,
}

impl AppState {
    pub fn init() -> eyre::Result<Self> {
        let provider = database::provider()?.clone();

        Ok(Self { provider })
    }
}

impl FromRef<AppState> for Arc<ConnectionProvider> {
    fn from_ref(app_state: &AppState) -> Arc<ConnectionProvider> {
        app_state.provider.clone()
    }
}
