use restful_core::{FaultTranslator, MAX_CAUSE_DEPTH};
use serde::Deserialize;

/// Upper bound accepted for `faults.max_cause_depth`
///
/// Body rendering and JSON encoding recurse once per rendered error, so the
/// cap must stay renderable on a 2 MiB tokio worker stack in debug builds.
pub const MAX_CAUSE_DEPTH_LIMIT: usize = 1_000;

/// Fault rendering configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FaultsConfig {
    /// Most errors of a causal chain rendered into a response body
    #[serde(default = "default_max_cause_depth")]
    pub max_cause_depth: usize,
}

impl Default for FaultsConfig {
    fn default() -> Self {
        Self {
            max_cause_depth: default_max_cause_depth(),
        }
    }
}

impl FaultsConfig {
    /// Translator honoring this configuration
    pub const fn translator(&self) -> FaultTranslator {
        FaultTranslator::new(self.max_cause_depth)
    }
}

#[allow(clippy::missing_const_for_fn)]
fn default_max_cause_depth() -> usize {
    MAX_CAUSE_DEPTH
}
