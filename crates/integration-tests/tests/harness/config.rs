//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;

use restful_config::{Config, FaultsConfig, HealthConfig, ServerConfig};

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with minimal defaults
    pub fn new() -> Self {
        Self {
            config: Config {
                server: ServerConfig {
                    listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                    health: HealthConfig::default(),
                },
                faults: FaultsConfig::default(),
                telemetry: None,
            },
        }
    }

    /// Cap the number of chained errors rendered into bodies
    pub fn with_max_cause_depth(mut self, depth: usize) -> Self {
        self.config.faults.max_cause_depth = depth;
        self
    }

    /// Serve the health check on a different path
    pub fn with_health_path(mut self, path: &str) -> Self {
        self.config.server.health.path = path.to_owned();
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
