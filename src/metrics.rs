use axum::{routing::get, Router};
use metrics::{describe_counter, describe_gauge, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

#[derive(Clone)]
pub struct Metrics {
    pub handle: PrometheusHandle,
}

static HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

impl Metrics {
    /// Install the Prometheus recorder once per process and describe the report series.
    /// Later calls (tests build many routers) reuse the same handle.
    pub fn init() -> Self {
        let handle = HANDLE.get_or_init(|| {
            let handle = match PrometheusBuilder::new().install_recorder() {
                Ok(h) => h,
                Err(e) => {
                    // Another recorder owns the process; keep a detached one so /metrics still answers.
                    tracing::warn!(error = %e, "prometheus recorder not installed");
                    PrometheusBuilder::new().build_recorder().handle()
                }
            };
            describe();
            handle
        });
        Self {
            handle: handle.clone(),
        }
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

fn describe() {
    describe_counter!(
        "narrative_imports_total",
        "Narrative schema documents accepted and made active."
    );
    describe_counter!(
        "narrative_import_rejections_total",
        "Narrative schema documents rejected, by reason."
    );
    describe_counter!(
        "narrative_stale_settles_total",
        "Tension settles abandoned because the report changed."
    );
    describe_histogram!(
        "narrative_tension_ticks",
        "Simulation ticks delivered per completed tension settle."
    );
    describe_gauge!(
        "narrative_schema_generation",
        "Generation of the active narrative schema."
    );
}
