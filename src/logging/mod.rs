//! Structured logging via `tracing`.
//!
//! The simulation only emits events; the subscriber is configured from the
//! `logging` section of the encounter's tuning file and installed by
//! [`LoggingPlugin`], which [`crate::DefensePlugin`] adds unless the host
//! already did. [`init_tracing`] is idempotent.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Once;
use tracing_subscriber::EnvFilter;

#[derive(Default)]
pub struct LoggingPlugin {
    pub config: TracingConfig,
}

impl Plugin for LoggingPlugin {
    fn build(&self, _app: &mut App) {
        init_tracing(&self.config);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
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

/// Subscriber settings; lives in [`crate::DefenseConfig::logging`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TracingConfig {
    pub default_level: LogLevel,
    /// `(target, level)` pairs, e.g. `("alchemy_core::zone", Debug)`
    pub module_filters: Vec<(String, LogLevel)>,
    pub show_timestamps: bool,
    pub show_targets: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            default_level: LogLevel::Info,
            module_filters: vec![
                ("alchemy_core::defense".to_string(), LogLevel::Info),
                ("alchemy_core::launcher".to_string(), LogLevel::Debug),
                ("alchemy_core::zone".to_string(), LogLevel::Debug),
                ("alchemy_core::enemy".to_string(), LogLevel::Info),
                ("alchemy_core::config".to_string(), LogLevel::Info),
            ],
            show_timestamps: true,
            show_targets: true,
        }
    }
}

impl TracingConfig {
    pub fn to_env_filter_string(&self) -> String {
        let mut parts = vec![self.default_level.as_str().to_string()];
        for (module, level) in &self.module_filters {
            parts.push(format!("{}={}", module, level.as_str()));
        }
        parts.join(",")
    }

    /// Name of the first filter target that would corrupt the filter string.
    pub fn invalid_target(&self) -> Option<&str> {
        self.module_filters
            .iter()
            .map(|(module, _)| module.as_str())
            .find(|m| m.is_empty() || m.contains(&[',', '=', ' '][..]))
    }
}

static TRACING_INIT: Once = Once::new();

/// Install the global subscriber (first call wins). `RUST_LOG` overrides
/// the configured filters.
pub fn init_tracing(config: &TracingConfig) {
    let config = config.clone();
    TRACING_INIT.call_once(move || {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.to_env_filter_string()));

        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(config.show_targets)
            .compact();

        // Another subscriber may already be installed (e.g. by the host app)
        let _ = if config.show_timestamps {
            builder.try_init()
        } else {
            builder.without_time().try_init()
        };
    });
}
