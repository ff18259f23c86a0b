//! Demo dataset shown before any operator import.
//!
//! The text is compiled in, but the validated value is built explicitly at startup and
//! handed to the session; nothing reads it through a global.

use crate::error::SchemaError;
use crate::validate::{validate, ValidatedSchema};

/// Pretty-printed demo document ("What pain points do people have with NotebookLM?").
pub const DEFAULT_SCHEMA_JSON: &str = include_str!("../data/narrative_default.json");

/// Validate the compiled-in demo document.
pub fn default_schema() -> Result<ValidatedSchema, SchemaError> {
    validate(DEFAULT_SCHEMA_JSON)
}
