#[tokio::main]
async fn main() -> anyhow::Result<()> {
    laundrydesk_observability::init();

    let config = laundrydesk_api::config::ApiConfig::from_env();
    let app = laundrydesk_api::app::build_app(&config)?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app).await?;
    Ok(())
}
