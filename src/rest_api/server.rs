//! # REST API HTTP Server
//!
//! Axum router for the word service.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::HeaderValue,
    routing::get,
    Json, Router,
};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::HttpConfig;
use crate::observability::{log_event, Event, Logger};
use crate::store::WordStore;

use super::errors::RestError;
use super::handler::WordsHandler;
use super::response::{HealthResponse, MetricsResponse, PageResponse};

pub struct RestServer<S> {
    handler: Arc<WordsHandler<S>>,
    config: HttpConfig,
}

type ServerState<S> = Arc<WordsHandler<S>>;

impl<S: WordStore + 'static> RestServer<S> {
    pub fn new(handler: WordsHandler<S>, config: HttpConfig) -> Self {
        Self {
            handler: Arc::new(handler),
            config,
        }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route(
                "/api/words",
                get(list_words_handler::<S>).fallback(method_not_allowed),
            )
            .route(
                "/words",
                get(list_words_handler::<S>).fallback(method_not_allowed),
            )
            .route("/health", get(health_handler))
            .route("/metrics", get(metrics_handler::<S>))
            .with_state(Arc::clone(&self.handler))
            .layer(cors_layer(&self.config))
    }

    /// Bind and serve until the listener fails
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid listen address {}: {}", self.config.socket_addr(), e),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;
        let addr = addr.to_string();
        log_event(Event::ServerStart, &[("addr", addr.as_str())]);

        let result = axum::serve(listener, self.router()).await;
        log_event(Event::ServerStop, &[("addr", addr.as_str())]);
        result
    }
}

/// Permissive when no origins are configured.
///
/// `Config::validate` rejects malformed origins at load time; a config that
/// skipped validation gets no cross-origin access at all and an error line.
fn cors_layer(config: &HttpConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if config.cors_origins.is_empty() {
        return layer.allow_origin(Any);
    }
    match config.allowed_origins() {
        Ok(origins) => layer.allow_origin(AllowOrigin::list(origins)),
        Err(err) => {
            let reason = err.to_string();
            Logger::error(
                Event::CorsOriginRejected.as_str(),
                &[("reason", reason.as_str())],
            );
            layer.allow_origin(AllowOrigin::list(Vec::<HeaderValue>::new()))
        }
    }
}

async fn list_words_handler<S: WordStore + 'static>(
    State(handler): State<ServerState<S>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<PageResponse>, RestError> {
    let response = handler.list_words(&params).await?;
    Ok(Json(response))
}

async fn method_not_allowed() -> RestError {
    RestError::MethodNotAllowed
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

async fn metrics_handler<S: WordStore + 'static>(
    State(handler): State<ServerState<S>>,
) -> Json<MetricsResponse> {
    Json(MetricsResponse {
        metrics: handler.metrics().snapshot(),
    })
}
