#![allow(clippy::must_use_candidate)]

mod env;
pub mod faults;
pub mod health;
mod loader;
pub mod server;
pub mod telemetry;

use serde::Deserialize;

pub use faults::*;
pub use health::*;
pub use server::*;
pub use telemetry::TelemetryConfig;

/// Top-level service configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Fault rendering configuration
    #[serde(default)]
    pub faults: FaultsConfig,
    /// Telemetry configuration
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}
