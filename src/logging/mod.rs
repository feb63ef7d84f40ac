//! Structured logging.
//!
//! All modules log through `tracing` macros with structured fields. This
//! module owns subscriber setup:
//! - level filtering, globally and per module
//! - `RUST_LOG` overrides the configured filter when set
//! - idempotent initialisation, first call wins

use std::sync::Once;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::engine::config::SimulationConfig;

pub struct LoggingPlugin;

impl Plugin for LoggingPlugin {
    fn build(&self, app: &mut App) {
        let config = app
            .world()
            .get_resource::<SimulationConfig>()
            .map(|c| c.tracing.clone())
            .unwrap_or_default();
        init_tracing(&config);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TracingConfig {
    pub default_level: LogLevel,
    pub module_filters: Vec<(String, LogLevel)>,
    pub show_targets: bool,
    pub show_thread_ids: bool,
    pub show_file_line: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            default_level: LogLevel::Info,
            module_filters: vec![
                ("dungeon_core::generation".to_string(), LogLevel::Info),
                ("dungeon_core::combat".to_string(), LogLevel::Info),
                ("dungeon_core::console".to_string(), LogLevel::Warn),
                ("bevy_ecs".to_string(), LogLevel::Warn),
            ],
            show_targets: true,
            show_thread_ids: false,
            show_file_line: false,
        }
    }
}

impl TracingConfig {
    /// `EnvFilter` directive string, e.g. `info,dungeon_core::combat=debug`
    pub fn to_env_filter_string(&self) -> String {
        std::iter::once(self.default_level.as_str().to_string())
            .chain(
                self.module_filters
                    .iter()
                    .map(|(module, level)| format!("{module}={}", level.as_str())),
            )
            .collect::<Vec<_>>()
            .join(",")
    }
}

static TRACING_INIT: Once = Once::new();

pub fn init_tracing_default() {
    init_tracing(&TracingConfig::default());
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init_tracing(config: &TracingConfig) {
    let filter_str = config.to_env_filter_string();
    let config = config.clone();
    TRACING_INIT.call_once(move || {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(config.show_targets)
            .with_thread_ids(config.show_thread_ids)
            .with_file(config.show_file_line)
            .with_line_number(config.show_file_line)
            .compact();

        // A host application may already own the global subscriber
        let _ = subscriber.try_init();
    });
}

/// Guard that keeps an `operation` span entered until dropped
pub struct TimingSpan {
    _span: tracing::span::EnteredSpan,
}

impl TimingSpan {
    pub fn new(name: &str) -> Self {
        let span = tracing::info_span!("operation", name = name);
        Self {
            _span: span.entered(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_filter_string() {
        let filter = TracingConfig::default().to_env_filter_string();
        assert!(filter.starts_with("info,"));
        assert!(filter.contains("dungeon_core::generation=info"));
        assert!(filter.contains("bevy_ecs=warn"));
    }

    #[test]
    fn test_custom_filters() {
        let config = TracingConfig {
            default_level: LogLevel::Debug,
            module_filters: vec![("dungeon_core::monster".to_string(), LogLevel::Trace)],
            ..Default::default()
        };
        assert_eq!(config.to_env_filter_string(), "debug,dungeon_core::monster=trace");
    }

    #[test]
    fn test_levels_serialize_lowercase() {
        let json = serde_json::to_string(&LogLevel::Warn).unwrap();
        assert_eq!(json, "\"warn\"");
        let config: TracingConfig =
            serde_json::from_str(r#"{"default_level": "error"}"#).unwrap();
        assert_eq!(config.default_level, LogLevel::Error);
        assert!(config.show_targets);
    }

    #[test]
    fn test_init_tracing_idempotent() {
        init_tracing_default();
        init_tracing(&TracingConfig::default());
        let _span = TimingSpan::new("test_operation");
    }
}
