//! Host configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Host configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HostConfig {
    /// Engine tick interval
    pub tick_interval: Duration,
    /// Fixed RNG seed; random when absent
    pub seed: Option<u64>,
    /// Directory with cities/siege/scripts YAML; embedded data when absent
    pub data_path: Option<String>,
    /// Default tracing filter
    pub log_filter: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(250),
            seed: None,
            data_path: None,
            log_filter: "rampart_host=info,rampart_core=info".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = HostConfig::default();
        assert!(config.tick_interval >= Duration::from_millis(16));
        assert!(config.seed.is_none());
        assert!(config.log_filter.contains("rampart_core"));
    }
}
