// src/lib.rs
// Public library surface for the service binary, the offline renderer and integration tests.

pub mod config;
pub mod defaults;
pub mod error;
pub mod schema;
pub mod validate;

// Derived figures
pub mod fingerprint;
pub mod force;
pub mod landscape;
pub mod report;
pub mod tension;
pub mod trajectory;
pub mod wrap;

// Output surfaces
pub mod api;
pub mod export;
pub mod metrics;
pub mod session;
pub mod spec_preview;

use anyhow::Context;
use axum::Router;
use std::path::PathBuf;

pub use crate::api::{create_router, AppState};
pub use crate::config::LayoutConfig;
pub use crate::error::{ApiError, SchemaError};
pub use crate::session::ReportSession;
pub use crate::validate::{validate, ValidatedSchema};

/// Full router (report API + `/metrics`) over the given state.
pub fn build_app(state: AppState) -> Router {
    let metrics = crate::metrics::Metrics::init();
    create_router(state).merge(metrics.router())
}

/// Bootstrap: demo document, layout config from `$LANDSCAPE_CONFIG_PATH` (or the
/// default path), Prometheus recorder.
pub async fn app() -> anyhow::Result<Router> {
    let path: PathBuf = config::layout::resolve_path();
    app_with_config(path).await
}

/// Same as [`app`] with an explicit config path.
pub async fn app_with_config(path: PathBuf) -> anyhow::Result<Router> {
    // Recorder first, so the session's initial generation gauge is captured.
    crate::metrics::Metrics::init();
    let session = ReportSession::with_default().context("loading compiled-in demo schema")?;
    let layout = LayoutConfig::load_or_default(&path);
    tracing::info!(config = %path.display(), "narrative report service ready");
    Ok(build_app(AppState::new(session, layout, path)))
}
