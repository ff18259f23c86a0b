//! Narrative Landscape Service: Binary Entrypoint
//! Boots the Axum HTTP server over the library router.

use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - LANDSCAPE_DEV_LOG=1
fn enable_dev_tracing() {
    let dev_flag = std::env::var("LANDSCAPE_DEV_LOG")
        .ok()
        .is_some_and(|v| v == "1");

    let is_dev_env = cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        );

    if !(dev_flag && is_dev_env) {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("narrative_landscape=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    // Makes LANDSCAPE_CONFIG_PATH / LANDSCAPE_DEV_LOG available below.
    let _ = dotenvy::dotenv();

    enable_dev_tracing();

    let router = narrative_landscape::app().await?;
    Ok(router.into())
}
