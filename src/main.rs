use helpdesk_agent::api::{create_router, AppState};
use helpdesk_agent::infrastructure::{
    create_pool, knowledge, load_quotation_engine, telemetry, AppConfig,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    telemetry::init(&config.config.logging);

    let quotation = load_quotation_engine(config.config.pricing_file.as_deref())?;

    let redis_pool = create_pool(&config.config.redis_url)?;
    info!("Redis pool initialized");

    let mut state = AppState::new(redis_pool, quotation, config.clone());
    match knowledge::connect(&config.config).await {
        Ok(service) => {
            info!(collection = %config.config.knowledge.collection, "knowledge index connected");
            state = state.with_knowledge_service(Arc::new(service));
        }
        Err(e) => warn!(error = %e, "knowledge base disabled"),
    }

    let app = create_router(state);

    let server = &config.config.server;
    let addr = SocketAddr::new(server.host.parse()?, server.port);

    info!("API server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
