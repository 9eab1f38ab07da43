pub mod exporters;
pub mod tracing;

use std::collections::HashMap;

use serde::Deserialize;

use self::{exporters::ExporterConfig, tracing::TracingConfig};

/// Telemetry configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TelemetryConfig {
    /// Service name reported with exported spans
    #[serde(default = "default_service_name")]
    pub service_name: String,
    /// Additional resource attributes
    #[serde(default)]
    pub resource_attributes: HashMap<String, String>,
    /// Default exporter, used when `tracing.exporter` is not set
    #[serde(default)]
    pub exporter: Option<ExporterConfig>,
    /// Tracing-specific configuration
    #[serde(default)]
    pub tracing: Option<TracingConfig>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            resource_attributes: HashMap::new(),
            exporter: None,
            tracing: None,
        }
    }
}

impl TelemetryConfig {
    /// Exporter for spans, preferring the tracing-specific override
    pub fn trace_exporter(&self) -> Option<&ExporterConfig> {
        self.tracing
            .as_ref()
            .and_then(|t| t.exporter.as_ref())
            .or(self.exporter.as_ref())
    }
}

fn default_service_name() -> String {
    "restful".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use exporters::ExportProtocol;

    #[test]
    fn tracing_exporter_overrides_default() {
        let toml = r#"
            service_name = "orders-api"

            [exporter]
            endpoint = "http://collector:4317"

            [tracing]
            sampling_rate = 0.25

            [tracing.exporter]
            endpoint = "http://collector:4318"
            protocol = "http_proto"
        "#;

        let config: TelemetryConfig = toml::from_str(toml).unwrap();
        let exporter = config.trace_exporter().unwrap();

        assert_eq!(config.service_name, "orders-api");
        assert_eq!(exporter.endpoint.as_str(), "http://collector:4318/");
        assert!(matches!(exporter.protocol, ExportProtocol::HttpProto));
        assert!((config.tracing.unwrap().sampling_rate - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn falls_back_to_default_exporter() {
        let toml = r#"
            [exporter]
            endpoint = "http://collector:4317"
        "#;

        let config: TelemetryConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.service_name, "restful");
        assert!(matches!(config.trace_exporter().unwrap().protocol, ExportProtocol::Grpc));
    }

    #[test]
    fn default_matches_empty_section() {
        let parsed: TelemetryConfig = toml::from_str("").unwrap();
        let config = TelemetryConfig::default();

        assert_eq!(config.service_name, "restful");
        assert_eq!(config.service_name, parsed.service_name);
        assert!(config.trace_exporter().is_none());
    }
}
