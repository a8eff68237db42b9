use crate::config::Config;
use crate::controller::SearchController;
use crate::state::Screen;
use crate::tmdb::{TmdbApi, TmdbClient};
use crate::view::WatchView;
use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

const MAX_BODY_BYTES: usize = 64 * 1024;
pub const LONG_POLL: Duration = Duration::from_secs(25);
const INDEX_HTML: &str = include_str!("../assets/index.html");

#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<SearchController>,
    pub view: Arc<WatchView>,
}

#[derive(Debug, Deserialize)]
pub struct SearchInput {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct StateQuery {
    pub after: Option<u64>,
}

pub async fn run_server(config: Config) -> Result<()> {
    let tmdb: Arc<dyn TmdbApi> = Arc::new(TmdbClient::new(&config)?);
    let view = Arc::new(WatchView::new());
    let controller = SearchController::from_config(&config, tmdb, view.clone());

    controller.on_startup().await;

    let app = build_router(AppState { controller, view });

    info!("Listening on {}", config.addr);
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/input", post(handle_input))
        .route("/state", get(current_state))
        .route("/health", get(health))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health() -> &'static str {
    "OK"
}

async fn handle_input(
    State(state): State<AppState>,
    Json(input): Json<SearchInput>,
) -> StatusCode {
    debug!("Search input: {:?}", input.text);
    state.controller.on_search_input(input.text).await;
    StatusCode::ACCEPTED
}

async fn current_state(
    State(state): State<AppState>,
    Query(query): Query<StateQuery>,
) -> Json<Screen> {
    if let Some(after) = query.after {
        let mut rx = state.view.subscribe();
        let newer = async {
            loop {
                let revision = rx.borrow_and_update().revision;
                if revision > after || rx.changed().await.is_err() {
                    break;
                }
            }
        };
        if tokio::time::timeout(LONG_POLL, newer).await.is_err() {
            debug!(after, "No new frame before the long-poll deadline");
        }
    }
    Json(state.view.current())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        }
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        }
    }
}
