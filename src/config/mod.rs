//! Configuration management.
//!
//! Runtime settings are assembled from three layers, later layers winning:
//! built-in defaults, an optional TOML file, and `BLACKOUT_*` environment
//! variables.

use crate::{Error, Result};
use serde::Deserialize;
use std::env;
use std::path::Path;

/// Environment variable naming the config file when no path is passed.
const CONFIG_PATH_ENV: &str = "BLACKOUT_CONFIG_PATH";

/// Main configuration for blackout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Config {
    /// Rendering knobs for the flattening redactors.
    pub render: RenderSettings,
    /// Metrics exporter settings.
    pub metrics: MetricsSettings,
}

/// Rendering knobs for the flattening redactors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSettings {
    /// Resolution, in pixels per inch, at which PDF pages are rasterized.
    pub pdf_dpi: u32,
    /// Color mode of the rasterized pages.
    pub color_mode: ColorMode,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            pdf_dpi: 100,
            color_mode: ColorMode::Rgb,
        }
    }
}

/// Color mode for rasterized output pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Full color.
    #[default]
    Rgb,
    /// Single-channel grayscale.
    Grayscale,
}

impl ColorMode {
    /// Parses a color mode string. Unrecognized values fall back to RGB.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "gray" | "grayscale" | "greyscale" => Self::Grayscale,
            _ => Self::Rgb,
        }
    }
}

/// Metrics exporter settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSettings {
    /// Whether the Prometheus recorder is installed.
    pub enabled: bool,
    /// Port for the metrics HTTP listener.
    pub port: u16,
}

impl Default for MetricsSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            port: 9090,
        }
    }
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Render section.
    pub render: Option<ConfigFileRender>,
    /// Metrics section.
    pub metrics: Option<ConfigFileMetrics>,
}

/// Render section in the config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileRender {
    /// PDF rasterization resolution, pixels per inch.
    pub pdf_dpi: Option<u32>,
    /// Color mode: `rgb` or `gray`.
    pub color_mode: Option<String>,
}

/// Metrics section in the config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileMetrics {
    /// Whether metrics are enabled.
    pub enabled: Option<bool>,
    /// Metrics listener port.
    pub port: Option<u16>,
}

impl Config {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::InvalidInput(format!("cannot read config file {}: {e}", path.display()))
        })?;
        let file: ConfigFile = toml::from_str(&contents).map_err(|e| {
            Error::InvalidInput(format!("cannot parse config file {}: {e}", path.display()))
        })?;
        Ok(Self::from_config_file(&file))
    }

    /// Resolves configuration: an explicit path, else `BLACKOUT_CONFIG_PATH`,
    /// else defaults — with `BLACKOUT_*` environment overrides applied last.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if a named config file cannot be read
    /// or parsed. A missing file is an error only when explicitly named.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let base = if let Some(path) = path {
            Self::load_from_file(path)?
        } else if let Ok(env_path) = env::var(CONFIG_PATH_ENV) {
            if env_path.trim().is_empty() {
                Self::default()
            } else {
                Self::load_from_file(Path::new(&env_path))?
            }
        } else {
            Self::default()
        };
        Ok(base.with_env_overrides())
    }

    /// Builds configuration from a parsed file, with defaults for absent
    /// values.
    #[must_use]
    pub fn from_config_file(file: &ConfigFile) -> Self {
        let defaults = Self::default();
        let render = file
            .render
            .as_ref()
            .map_or(defaults.render, |section| RenderSettings {
                pdf_dpi: section.pdf_dpi.unwrap_or(defaults.render.pdf_dpi),
                color_mode: section
                    .color_mode
                    .as_deref()
                    .map_or(defaults.render.color_mode, ColorMode::parse),
            });
        let metrics = file
            .metrics
            .as_ref()
            .map_or(defaults.metrics, |section| MetricsSettings {
                enabled: section.enabled.unwrap_or(defaults.metrics.enabled),
                port: section.port.unwrap_or(defaults.metrics.port),
            });
        Self { render, metrics }
    }

    /// Applies `BLACKOUT_*` environment variable overrides.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(dpi) = parse_env("BLACKOUT_PDF_DPI") {
            self.render.pdf_dpi = dpi;
        }
        if let Ok(mode) = env::var("BLACKOUT_COLOR_MODE") {
            self.render.color_mode = ColorMode::parse(&mode);
        }
        if let Some(enabled) = parse_bool_env("BLACKOUT_METRICS_ENABLED") {
            self.metrics.enabled = enabled;
        }
        if let Some(port) = parse_env("BLACKOUT_METRICS_PORT") {
            self.metrics.port = port;
        }
        self
    }
}

/// Parses an environment variable with `FromStr`, ignoring unset or
/// malformed values.
fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|value| value.parse().ok())
}

/// Parses a boolean environment variable (`true`/`false`/`1`/`0`).
fn parse_bool_env(name: &str) -> Option<bool> {
    let value = env::var(name).ok()?;
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
