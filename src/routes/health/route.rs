use axum::{Router, extract::State, routing::get};
use mongodb::bson::doc;
use std::sync::Arc;

use crate::app_state::AppState;
use crate::database::ConnectionProvider;
use crate::errors::Error;

pub fn create_route() -> Router<AppState> {
    Router::new().route("/", get(health_check))
}

async fn health_check(
    State(provider): State<Arc<ConnectionProvider>>,
) -> Result<&'static str, Error> {
    let client = provider.connection().await?;
    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await?;

    Ok("OK")
}
