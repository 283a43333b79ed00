use std::net::SocketAddr;

use mongo_provider::{app, config::APP_CONFIG, database, utils::tracing::init_standard_tracing};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    dotenvy::dotenv().ok();
    init_standard_tracing(env!("CARGO_CRATE_NAME"));

    // Missing MONGO_URI is fatal here, before any network activity.
    let provider = database::provider()?;

    provider.start();

    let app = app::create_app()?;

    let address = format!("0.0.0.0:{}", APP_CONFIG.port);

    tracing::info!("Server listening on {}", &address);
    let listener = tokio::net::TcpListener::bind(address).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
