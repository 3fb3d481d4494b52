//! Configuration management for page annotations

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::annotations::STORAGE_KEY;
use crate::error::ConfigError;
use crate::output::{OutputDetail, OutputFormat};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub output_detail: OutputDetail,
    pub output_format: OutputFormat,
    pub marker_color: String,
    pub clear_on_copy: bool,
    pub block_interactions: bool,
    pub webhook_url: Option<String>,
    pub auto_send: bool,
    pub enabled: bool,
    pub storage_dir: PathBuf,
    pub storage_key: String,
}

/// Partial settings applied at runtime
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub output_detail: Option<OutputDetail>,
    pub output_format: Option<OutputFormat>,
    pub marker_color: Option<String>,
    pub clear_on_copy: Option<bool>,
    pub block_interactions: Option<bool>,
    pub webhook_url: Option<String>,
    pub auto_send: Option<bool>,
    pub enabled: Option<bool>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            output_detail: OutputDetail::Standard,
            output_format: OutputFormat::Markdown,
            marker_color: "#ff4444".to_string(),
            clear_on_copy: false,
            block_interactions: false,
            webhook_url: None,
            auto_send: false,
            enabled: true,
            storage_dir: PathBuf::from("./.annotations"),
            storage_key: STORAGE_KEY.to_string(),
        }
    }
}

impl Settings {
    /// Read `ANNOTATIONS_*` variables, using defaults for unset ones
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Settings::default();

        Ok(Settings {
            output_detail: match env::var("ANNOTATIONS_OUTPUT_DETAIL") {
                Ok(v) => v.parse()?,
                Err(_) => defaults.output_detail,
            },
            output_format: match env::var("ANNOTATIONS_OUTPUT_FORMAT") {
                Ok(v) => v.parse()?,
                Err(_) => defaults.output_format,
            },
            marker_color: env::var("ANNOTATIONS_MARKER_COLOR").unwrap_or(defaults.marker_color),
            clear_on_copy: env_bool("ANNOTATIONS_CLEAR_ON_COPY", defaults.clear_on_copy)?,
            block_interactions: env_bool(
                "ANNOTATIONS_BLOCK_INTERACTIONS",
                defaults.block_interactions,
            )?,
            webhook_url: env::var("ANNOTATIONS_WEBHOOK_URL")
                .ok()
                .filter(|url| !url.is_empty()),
            auto_send: env_bool("ANNOTATIONS_AUTO_SEND", defaults.auto_send)?,
            enabled: env_bool("ANNOTATIONS_ENABLED", defaults.enabled)?,
            storage_dir: env::var("ANNOTATIONS_STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_dir),
            storage_key: env::var("ANNOTATIONS_STORAGE_KEY").unwrap_or(defaults.storage_key),
        })
    }

    /// Apply the set fields of `update`
    pub fn update(&mut self, update: SettingsUpdate) {
        if let Some(v) = update.output_detail {
            self.output_detail = v;
        }
        if let Some(v) = update.output_format {
            self.output_format = v;
        }
        if let Some(v) = update.marker_color {
            self.marker_color = v;
        }
        if let Some(v) = update.clear_on_copy {
            self.clear_on_copy = v;
        }
        if let Some(v) = update.block_interactions {
            self.block_interactions = v;
        }
        if let Some(v) = update.webhook_url {
            self.webhook_url = Some(v);
        }
        if let Some(v) = update.auto_send {
            self.auto_send = v;
        }
        if let Some(v) = update.enabled {
            self.enabled = v;
        }
    }
}

fn env_bool(var: &'static str, default: bool) -> Result<bool, ConfigError> {
    match env::var(var) {
        Ok(value) => parse_bool(&value).ok_or(ConfigError::InvalidValue { var, value }),
        Err(_) => Ok(default),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
