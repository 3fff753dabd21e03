//! Configuration (layered: code > env > defaults).

use std::env;

use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::error::{HearthError, Result};
use crate::schema::DEFAULT_SYSTEM_INSTRUCTION;

/// Message shown on progress chunks while the model downloads.
pub const DEFAULT_DOWNLOAD_MESSAGE: &str = "Downloading on-device model...";
/// Message shown when the progress callback itself reports completion.
pub const DEFAULT_DOWNLOAD_COMPLETE_MESSAGE: &str = "On-device model ready";

/// Sampling settings forwarded to the generation engine.
#[derive(Debug, Clone, Builder, Serialize, Deserialize, Default, PartialEq)]
pub struct GenerationSettings {
    pub temperature: Option<f64>,
    pub top_k: Option<u32>,
}

/// Transport configuration.
///
/// Env overrides:
/// - `HEARTH_SYSTEM_PROMPT`
/// - `HEARTH_DOWNLOAD_MESSAGE`
/// - `HEARTH_TEMPERATURE`
/// - `HEARTH_TOP_K`
#[derive(Debug, Clone, Builder, Serialize, Deserialize, PartialEq)]
pub struct TransportConfig {
    #[builder(into, default = DEFAULT_SYSTEM_INSTRUCTION.to_string())]
    pub system_instruction: String,
    #[builder(into, default = DEFAULT_DOWNLOAD_MESSAGE.to_string())]
    pub download_message: String,
    #[builder(into, default = DEFAULT_DOWNLOAD_COMPLETE_MESSAGE.to_string())]
    pub download_complete_message: String,
    #[builder(default)]
    pub generation: GenerationSettings,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl TransportConfig {
    /// Load from environment variables, rejecting malformed numbers.
    pub fn try_from_env() -> Result<Self> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        let mut config = Self::default();

        if let Ok(prompt) = env::var("HEARTH_SYSTEM_PROMPT") {
            config.system_instruction = prompt;
        }
        if let Ok(message) = env::var("HEARTH_DOWNLOAD_MESSAGE") {
            config.download_message = message;
        }
        if let Ok(raw) = env::var("HEARTH_TEMPERATURE") {
            let temperature = raw.trim().parse::<f64>().map_err(|_| {
                HearthError::Configuration(format!("HEARTH_TEMPERATURE is not a number: {raw}"))
            })?;
            config.generation.temperature = Some(temperature);
        }
        if let Ok(raw) = env::var("HEARTH_TOP_K") {
            let top_k = raw.trim().parse::<u32>().map_err(|_| {
                HearthError::Configuration(format!("HEARTH_TOP_K is not an integer: {raw}"))
            })?;
            config.generation.top_k = Some(top_k);
        }

        Ok(config)
    }

    /// Load from environment variables, falling back to defaults on error.
    pub fn from_env() -> Self {
        Self::try_from_env().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "ignoring invalid hearth env configuration");
            Self::default()
        })
    }
}

/// Verbose per-chunk tracing, off unless `HEARTH_DEBUG` is set.
pub(crate) fn debug_enabled() -> bool {
    matches!(env::var("HEARTH_DEBUG").as_deref(), Ok("1" | "true" | "TRUE"))
}
