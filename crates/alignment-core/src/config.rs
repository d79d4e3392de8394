//! Engine timing configuration.
//!
//! Every interval is in virtual-clock milliseconds. Missing JSON fields fall
//! back to the defaults below.

use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Quiet period before buffered updates are applied
    pub debounce_ms: u64,
    /// Passive regeneration ticker
    pub regen_interval_ms: u64,
    /// Resource operation ticker
    pub operation_interval_ms: u64,
    /// Technology and research project ticker
    pub research_interval_ms: u64,
    /// Probe replication ticker
    pub probe_interval_ms: u64,
    /// Delay between a timed activity finishing and its effects landing
    pub completion_delay_ms: u64,
    pub dialogue_follow_up_ms: u64,
    pub decision_consequence_ms: u64,
    /// Fixed seed for the session RNG; entropy when absent
    pub rng_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 30,
            regen_interval_ms: 2000,
            operation_interval_ms: 2000,
            research_interval_ms: 3000,
            probe_interval_ms: 2000,
            completion_delay_ms: 100,
            dialogue_follow_up_ms: 5000,
            decision_consequence_ms: 10_000,
            rng_seed: None,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Recurring tickers must have a non-zero period.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let intervals = [
            ("regen_interval_ms", self.regen_interval_ms),
            ("operation_interval_ms", self.operation_interval_ms),
            ("research_interval_ms", self.research_interval_ms),
            ("probe_interval_ms", self.probe_interval_ms),
        ];
        match intervals.iter().find(|(_, ms)| *ms == 0) {
            Some((field, _)) => Err(ConfigError::ZeroInterval(field)),
            None => Ok(()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{0} must be greater than zero")]
    ZeroInterval(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = EngineConfig::default();
        assert_eq!(c.debounce_ms, 30);
        assert_eq!(c.regen_interval_ms, 2000);
        assert_eq!(c.research_interval_ms, 3000);
        assert_eq!(c.completion_delay_ms, 100);
        assert!(c.rng_seed.is_none());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let c = EngineConfig::from_json_str(r#"{"debounce_ms": 5, "rng_seed": 42}"#).expect("valid");
        assert_eq!(c.debounce_ms, 5);
        assert_eq!(c.rng_seed, Some(42));
        assert_eq!(c.operation_interval_ms, 2000);
    }

    #[test]
    fn test_rejects_zero_interval() {
        let err = EngineConfig::from_json_str(r#"{"research_interval_ms": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroInterval("research_interval_ms")));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            EngineConfig::from_json_str("{debounce_ms"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            EngineConfig::load("/definitely/not/here.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
