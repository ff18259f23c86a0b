// src/config/mod.rs
pub mod layout;

pub use layout::{LayoutConfig, QuoteConfig, DEFAULT_LANDSCAPE_CONFIG_PATH, ENV_LANDSCAPE_CONFIG_PATH};
