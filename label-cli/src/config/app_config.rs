//! Runtime configuration loaded from environment variables.

use std::time::Duration;

use label_raster::{CommandRasterizer, LabelOptions, LabelProcessing};

use super::ConfigError;
use super::defaults::get_default;
use super::validation::validate_setting;

/// Runtime configuration for label rendering.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub rasterizer: String,
    pub dpi: u32,
    pub rasterizer_timeout_secs: u64,
    pub processing: LabelProcessing,
    pub threshold: bool,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rasterizer: "gs".into(),
            dpi: label_raster::DEFAULT_DPI,
            rasterizer_timeout_secs: 30,
            processing: LabelProcessing::Full,
            threshold: true,
            log_filter: "info".into(),
        }
    }
}

impl AppConfig {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, falling back to defaults for
    /// missing or empty values. Every value is validated.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let g = |key: &'static str| -> Result<String, ConfigError> {
            let value = lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| get_default(key).unwrap_or_default().to_string());
            validate_setting(key, &value).map_err(|reason| ConfigError::Invalid {
                key,
                value: value.clone(),
                reason,
            })?;
            Ok(value)
        };

        let defaults = Self::default();
        Ok(Self {
            rasterizer: g("LABEL_RASTERIZER")?,
            dpi: parse_u32(&g("LABEL_DPI")?, defaults.dpi),
            rasterizer_timeout_secs: parse_u64(
                &g("LABEL_RASTERIZER_TIMEOUT_SECS")?,
                defaults.rasterizer_timeout_secs,
            ),
            processing: g("LABEL_PROCESSING")?
                .parse()
                .unwrap_or(defaults.processing),
            threshold: g("LABEL_THRESHOLD")? == "true",
            log_filter: g("LABEL_LOG")?,
        })
    }

    pub fn rasterizer_timeout(&self) -> Duration {
        Duration::from_secs(self.rasterizer_timeout_secs)
    }

    /// Build the configured external rasterizer.
    pub fn build_rasterizer(&self) -> CommandRasterizer {
        CommandRasterizer::ghostscript(&self.rasterizer, self.dpi)
            .with_timeout(self.rasterizer_timeout())
    }

    /// Processing options for the full pipeline.
    pub fn label_options(&self) -> LabelOptions {
        LabelOptions::new().with_threshold(self.threshold)
    }
}

fn parse_u32(s: &str, default: u32) -> u32 {
    if s.is_empty() {
        return default;
    }
    s.parse().unwrap_or(default)
}

fn parse_u64(s: &str, default: u64) -> u64 {
    if s.is_empty() {
        return default;
    }
    s.parse().unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.rasterizer, "gs");
        assert_eq!(config.dpi, 216);
        assert_eq!(config.rasterizer_timeout_secs, 30);
        assert_eq!(config.processing, LabelProcessing::Full);
        assert!(config.threshold);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn overrides_are_applied() {
        let config = load(&[
            ("LABEL_RASTERIZER", "/opt/gs/bin/gs"),
            ("LABEL_DPI", "300"),
            ("LABEL_RASTERIZER_TIMEOUT_SECS", "5"),
            ("LABEL_PROCESSING", "passthrough"),
            ("LABEL_THRESHOLD", "false"),
            ("LABEL_LOG", "debug"),
        ])
        .unwrap();
        assert_eq!(config.rasterizer, "/opt/gs/bin/gs");
        assert_eq!(config.dpi, 300);
        assert_eq!(config.rasterizer_timeout(), Duration::from_secs(5));
        assert_eq!(config.processing, LabelProcessing::PassThrough);
        assert!(!config.threshold);
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = load(&[("LABEL_DPI", "   "), ("LABEL_PROCESSING", "")]).unwrap();
        assert_eq!(config.dpi, 216);
        assert_eq!(config.processing, LabelProcessing::Full);
    }

    #[test]
    fn invalid_value_names_the_key() {
        let err = load(&[("LABEL_DPI", "9000")]).unwrap_err();
        let ConfigError::Invalid { key, value, .. } = err;
        assert_eq!(key, "LABEL_DPI");
        assert_eq!(value, "9000");
    }

    #[test]
    fn rasterizer_uses_configured_program_and_dpi() {
        let config = load(&[("LABEL_RASTERIZER", "gswin64c"), ("LABEL_DPI", "300")]).unwrap();
        let rasterizer = config.build_rasterizer();
        assert_eq!(rasterizer.program(), "gswin64c");
        assert!(rasterizer.args().iter().any(|a| a == "-r300"));
        assert_eq!(rasterizer.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn label_options_follow_threshold_flag() {
        let config = load(&[("LABEL_THRESHOLD", "false")]).unwrap();
        assert!(!config.label_options().threshold);
        assert_eq!(config.label_options().crop_margin, 8);
    }
}
