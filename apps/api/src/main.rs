mod config;
mod errors;
mod evaluation;
mod routes;
mod state;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use std::net::SocketAddr;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::{Config, CorsOrigins};
use crate::evaluation::evaluator::ResumeEvaluator;
use crate::evaluation::profile::JobProfile;
use crate::evaluation::similarity::FastEmbedder;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume scorer API v{}", env!("CARGO_PKG_VERSION"));

    // Load the embedding model before accepting traffic; first run downloads weights.
    let model_name = config.embedding_model.clone();
    let cache_dir = config.model_cache_dir.clone();
    let embedder = tokio::task::spawn_blocking(move || FastEmbedder::load(&model_name, cache_dir))
        .await
        .context("Model loading task panicked")??;
    info!("Embedding model loaded (model: {})", config.embedding_model);

    let evaluator = ResumeEvaluator::new(JobProfile::default(), Arc::new(embedder))?;

    let state = AppState {
        config: config.clone(),
        evaluator: Arc::new(evaluator),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors)?);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Builds the CORS layer from `CORS_ALLOWED_ORIGINS`.
fn cors_layer(origins: &CorsOrigins) -> Result<CorsLayer> {
    match origins {
        CorsOrigins::Any => {
            warn!("CORS allows any origin; set CORS_ALLOWED_ORIGINS in production");
            Ok(CorsLayer::permissive())
        }
        CorsOrigins::List(list) => {
            let origins = origin_header_values(list)?;
            info!("CORS restricted to {} origin(s)", origins.len());
            Ok(CorsLayer::permissive().allow_origin(AllowOrigin::list(origins)))
        }
    }
}

/// Every configured origin must be a valid header value; one bad entry fails startup.
fn origin_header_values(list: &[String]) -> Result<Vec<HeaderValue>> {
    list.iter()
        .map(|o| HeaderValue::from_str(o).with_context(|| format!("Invalid CORS origin '{o}'")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_list_becomes_header_values() {
        let origins = origin_header_values(&[
            "https://app.example".to_string(),
            "http://localhost:3000".to_string(),
        ])
        .unwrap();
        assert_eq!(origins.len(), 2);
        assert_eq!(origins[1], "http://localhost:3000");
    }

    #[test]
    fn test_invalid_origin_fails_startup() {
        let err = cors_layer(&CorsOrigins::List(vec!["bad\norigin".to_string()])).unwrap_err();
        assert!(err.to_string().contains("Invalid CORS origin"));
    }

    #[test]
    fn test_restricted_and_open_cors_layers_build() {
        assert!(cors_layer(&CorsOrigins::List(vec!["https://app.example".to_string()])).is_ok());
        assert!(cors_layer(&CorsOrigins::Any).is_ok());
    }
}
