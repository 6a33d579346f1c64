use std::sync::Arc;

use anyhow::Result;
use api::{build_router, ApiState};
use artgen::{ArtGenerator, GenerativeClient, OpenAiClient};
use axum::Router;
use collector::{GithubClient, ProfileCollector, RestGithubClient};
use common::{config::AppConfig, logging};
use db::pg::PgDatabase;
use db::Repositories;
use pipeline::Pipeline;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logging("info");
    let config = AppConfig::load()?;

    let database = Arc::new(PgDatabase::connect(&config.database.url).await?);
    let repositories: Arc<dyn Repositories> = database.clone();

    let github: Arc<dyn GithubClient> = Arc::new(RestGithubClient::new(
        config.github.token.clone(),
        &config.github.user_agent,
    ));
    let collector = ProfileCollector::new(&config.github, github);

    let openai: Arc<dyn GenerativeClient> = Arc::new(OpenAiClient::new(&config.openai)?);
    let generator = ArtGenerator::new(&config.generator, openai);

    let pipeline = Arc::new(Pipeline::new(
        collector,
        generator,
        repositories,
        &config.pipeline,
    ));

    let metrics_path: &'static str =
        Box::leak(config.observability.metrics_path.clone().into_boxed_str());
    let state = Arc::new(ApiState {
        pipeline,
        metrics_path,
    });
    let app: Router = build_router(state);

    let addr: std::net::SocketAddr = config.api.bind.parse()?;
    info!("api listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
