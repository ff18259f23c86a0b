use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use metrics::{counter, histogram};
use serde::Serialize;
use tower_http::cors::CorsLayer;

use crate::config::LayoutConfig;
use crate::error::ApiError;
use crate::export::{content_disposition, export_pretty};
use crate::fingerprint::{fingerprints, Fingerprint};
use crate::force::DecayingForceLayout;
use crate::landscape::Landscape;
use crate::report::{
    breakdown, landscape_figure, notable_quotes, source_list, NotableQuote, Report, SourceEntry,
    ThemeBreakdown,
};
use crate::session::{ActiveReport, ReportSession};
use crate::spec_preview::spec_preview;
use crate::tension::{build_graph, settle, TensionFrame};
use crate::trajectory::{synthesize, SentimentArc};
use crate::validate::ValidatedSchema;

/// Settle attempts before a request gives up on a report that keeps changing.
const SETTLE_ATTEMPTS: usize = 3;

#[derive(Clone)]
pub struct AppState {
    session: Arc<ReportSession>,
    layout: Arc<RwLock<LayoutConfig>>,
    layout_path: Arc<PathBuf>,
}

impl AppState {
    pub fn new(session: ReportSession, layout: LayoutConfig, layout_path: PathBuf) -> Self {
        Self {
            session: Arc::new(session),
            layout: Arc::new(RwLock::new(layout)),
            layout_path: Arc::new(layout_path),
        }
    }

    pub fn session(&self) -> &ReportSession {
        &self.session
    }

    /// Copy of the current layout config.
    pub fn layout(&self) -> LayoutConfig {
        match self.layout.read() {
            Ok(g) => g.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Run a settle-dependent computation against the active report on the blocking
    /// pool, retrying when the report is replaced mid-run.
    async fn with_live_report<T, F>(&self, run: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnMut(&ValidatedSchema, &LayoutConfig, &mut DecayingForceLayout, &dyn Fn() -> bool) -> Option<T>
            + Send
            + 'static,
    {
        let state = self.clone();
        tokio::task::spawn_blocking(move || state.settle_live(run))
            .await
            .map_err(|e| ApiError::Worker(e.to_string()))?
    }

    fn settle_live<T, F>(&self, mut run: F) -> Result<T, ApiError>
    where
        F: FnMut(&ValidatedSchema, &LayoutConfig, &mut DecayingForceLayout, &dyn Fn() -> bool) -> Option<T>,
    {
        for attempt in 1..=SETTLE_ATTEMPTS {
            let active: Arc<ActiveReport> = self.session.current();
            let cfg = self.layout();
            let mut sim = cfg.simulation;
            let generation = active.generation;
            let session = &self.session;
            let live = move || session.is_current(generation);

            if let Some(out) = run(&active.schema, &cfg, &mut sim, &live) {
                return Ok(out);
            }
            counter!("narrative_stale_settles_total").increment(1);
            tracing::info!(attempt, generation, "tension settle superseded");
        }
        Err(ApiError::Superseded)
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/report", get(get_report))
        .route("/landscape", get(get_landscape))
        .route("/tension", get(get_tension))
        .route("/trajectory", get(get_trajectory))
        .route("/fingerprints", get(get_fingerprints))
        .route("/quotes", get(get_quotes))
        .route("/breakdown", get(get_breakdown))
        .route("/sources", get(get_sources))
        .route("/schema", get(export_schema).post(import_schema))
        .route("/schema/reset", post(reset_schema))
        .route("/spec-preview", get(get_spec_preview))
        .route("/admin/reload-config", get(admin_reload_config))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

async fn get_report(State(state): State<AppState>) -> Result<Json<Report>, ApiError> {
    let report = state.with_live_report(|schema, cfg, sim, live| {
        Report::compose(schema, cfg, sim, live)
    })
    .await?;
    histogram!("narrative_tension_ticks").record(report.tension.ticks as f64);
    Ok(Json(report))
}

async fn get_landscape(State(state): State<AppState>) -> Json<Landscape> {
    let active = state.session.current();
    Json(landscape_figure(&active.schema, &state.layout()))
}

async fn get_tension(State(state): State<AppState>) -> Result<Json<TensionFrame>, ApiError> {
    let frame = state.with_live_report(|schema, cfg, sim, live| {
        let graph = build_graph(schema.themes(), cfg.tension.threshold);
        settle(&graph, &cfg.tension, sim, live)
    })
    .await?;
    histogram!("narrative_tension_ticks").record(frame.ticks as f64);
    Ok(Json(frame))
}

async fn get_trajectory(State(state): State<AppState>) -> Json<SentimentArc> {
    let active = state.session.current();
    Json(synthesize(&active.schema.sentiment_overall()))
}

async fn get_fingerprints(State(state): State<AppState>) -> Json<Vec<Fingerprint>> {
    let active = state.session.current();
    Json(fingerprints(active.schema.themes(), &state.layout().fingerprint))
}

async fn get_quotes(State(state): State<AppState>) -> Json<Vec<NotableQuote>> {
    let active = state.session.current();
    Json(notable_quotes(active.schema.themes(), state.layout().quotes.limit))
}

async fn get_breakdown(State(state): State<AppState>) -> Json<Vec<ThemeBreakdown>> {
    let active = state.session.current();
    Json(breakdown(active.schema.themes()))
}

async fn get_sources(State(state): State<AppState>) -> Json<Vec<SourceEntry>> {
    let active = state.session.current();
    Json(source_list(active.schema.schema().sources()))
}

async fn get_spec_preview(State(state): State<AppState>) -> Json<serde_json::Value> {
    let active = state.session.current();
    Json(spec_preview(&active.schema))
}

async fn export_schema(State(state): State<AppState>) -> impl IntoResponse {
    let active = state.session.current();
    (
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, content_disposition()),
        ],
        export_pretty(&active.schema),
    )
}

#[derive(Debug, Serialize)]
struct ImportResp {
    generation: u64,
    themes: usize,
    sources: usize,
}

impl From<&ActiveReport> for ImportResp {
    fn from(a: &ActiveReport) -> Self {
        Self {
            generation: a.generation,
            themes: a.schema.themes().len(),
            sources: a.schema.schema().sources().len(),
        }
    }
}

/// Body is the raw pasted text, whatever its content type.
async fn import_schema(State(state): State<AppState>, body: String) -> Result<Json<ImportResp>, ApiError> {
    let active = state.session.replace_from_raw(&body)?;
    Ok(Json(ImportResp::from(active.as_ref())))
}

async fn reset_schema(State(state): State<AppState>) -> Result<Json<ImportResp>, ApiError> {
    let active = state.session.reset_to_default()?;
    Ok(Json(ImportResp::from(active.as_ref())))
}

async fn admin_reload_config(State(state): State<AppState>) -> Result<String, ApiError> {
    let fresh = LayoutConfig::load_from_file(&state.layout_path)
        .map_err(|e| ApiError::Config(format!("{e:#}")))?;
    match state.layout.write() {
        Ok(mut w) => {
            *w = fresh;
            tracing::info!(path = %state.layout_path.display(), "layout config reloaded");
            Ok("reloaded".to_string())
        }
        Err(_) => Err(ApiError::Config("lock poisoned".to_string())),
    }
}
