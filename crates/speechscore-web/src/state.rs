//! Shared application state for the web server.

use std::sync::Arc;

use anyhow::Context;
use speechscore_embed::{Embedder, EmbeddingService};
use speechscore_rubric::{load_rubric, ScoringEngine};
use tracing::info;

use crate::config::Config;

/// Shared state injected into every Axum handler.
#[derive(Clone)]
pub struct AppState {
    pub engine: ScoringEngine,
    /// Present when the engine runs on the real model, so health checks can
    /// report whether it has been loaded yet.
    pub embedding: Option<Arc<EmbeddingService>>,
}

impl AppState {
    pub fn new(engine: ScoringEngine) -> Self {
        Self { engine, embedding: None }
    }

    /// Build the production state: lazy sentence model plus the rubric table
    /// loaded from the configured path.
    pub async fn load(config: &Config) -> anyhow::Result<Self> {
        let service = Arc::new(EmbeddingService::new(config.embedding.clone()));

        let path = config.rubric.path.clone();
        let loader = Arc::clone(&service);
        // Loading embeds every description, which blocks on the model.
        let rubric = tokio::task::spawn_blocking(move || load_rubric(&path, &*loader))
            .await
            .context("rubric loader task panicked")?
            .with_context(|| format!("failed to load rubric from {}", config.rubric.path))?;

        info!(
            criteria = rubric.len(),
            total_weight = rubric.total_weight(),
            "Rubric ready"
        );

        let embedder: Arc<dyn Embedder> = service.clone();
        let engine = ScoringEngine::new(Arc::new(rubric), embedder).with_weights(config.scoring.weights);

        Ok(Self { engine, embedding: Some(service) })
    }
}

pub type SharedState = Arc<AppState>;
