//! In-session active report.
//!
//! One document is active at a time. Imports validate first and only then swap the
//! shared `Arc`, so a rejected paste never disturbs what is on screen. The generation
//! counter lets long-running work (the tension settle) notice it has been superseded.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use metrics::{counter, gauge};

use crate::defaults::default_schema;
use crate::error::SchemaError;
use crate::validate::{validate, ValidatedSchema};

/// Validated document plus the generation it was installed at.
#[derive(Debug)]
pub struct ActiveReport {
    pub generation: u64,
    pub schema: ValidatedSchema,
}

#[derive(Debug)]
pub struct ReportSession {
    active: RwLock<Arc<ActiveReport>>,
    generation: AtomicU64,
}

impl ReportSession {
    /// Start a session with an explicitly constructed initial document.
    pub fn new(initial: ValidatedSchema) -> Self {
        gauge!("narrative_schema_generation").set(0.0);
        Self {
            active: RwLock::new(Arc::new(ActiveReport {
                generation: 0,
                schema: initial,
            })),
            generation: AtomicU64::new(0),
        }
    }

    /// Session seeded with the compiled-in demo document.
    pub fn with_default() -> Result<Self, SchemaError> {
        Ok(Self::new(default_schema()?))
    }

    /// Snapshot of the active report. Callers compute on the `Arc`, never under the lock.
    pub fn current(&self) -> Arc<ActiveReport> {
        match self.active.read() {
            Ok(g) => Arc::clone(&g),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// True while `generation` is still the active one.
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation() == generation
    }

    /// Validate `raw` and make it active. On error nothing changes.
    pub fn replace_from_raw(&self, raw: &str) -> Result<Arc<ActiveReport>, SchemaError> {
        match validate(raw) {
            Ok(schema) => {
                let report = self.install(schema);
                counter!("narrative_imports_total").increment(1);
                tracing::info!(
                    generation = report.generation,
                    themes = report.schema.themes().len(),
                    bytes = raw.len(),
                    "narrative schema imported"
                );
                Ok(report)
            }
            Err(e) => {
                counter!("narrative_import_rejections_total", "reason" => e.code()).increment(1);
                tracing::warn!(reason = e.code(), error = %e, "narrative schema rejected");
                Err(e)
            }
        }
    }

    /// Reinstall the compiled-in demo document.
    pub fn reset_to_default(&self) -> Result<Arc<ActiveReport>, SchemaError> {
        let report = self.install(default_schema()?);
        tracing::info!(generation = report.generation, "narrative schema reset to demo");
        Ok(report)
    }

    fn install(&self, schema: ValidatedSchema) -> Arc<ActiveReport> {
        let mut guard = match self.active.write() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        // Bumped under the write lock so generation and document move together.
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        let report = Arc::new(ActiveReport { generation, schema });
        *guard = Arc::clone(&report);
        gauge!("narrative_schema_generation").set(generation as f64);
        report
    }
}
