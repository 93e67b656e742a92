use todo_api::{app_router, build_in_memory_state, config::Config, telemetry::init_tracing};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(config.log_format);

    let state = build_in_memory_state(&config)?;
    let app = app_router(state);

    let listener = TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, delivery = ?config.event_delivery, "todo api listening");
    axum::serve(listener, app).await?;
    Ok(())
}
