//! Configuration types for the execution engine.

use serde::Deserialize;
use std::time::Duration;

/// Genesis block timestamp, fixed so every fresh chain hashes identically.
pub const GENESIS_TIMESTAMP: &str = "2018-06-01T00:00:00";

/// Maximum depth of nested `executeSmartContract` calls before a run is
/// aborted with `DepthExceeded`. Guards against unbounded recursion
/// between mutually reentrant contracts.
pub const MAX_CALL_DEPTH: usize = 64;

/// Runtime configuration for the executor.
#[derive(Clone, Debug, Deserialize)]
pub struct ExecutionConfig {
    /// Wall-clock ceiling granted to a single contract run.
    #[serde(with = "duration_secs")]
    pub quantum: Duration,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            quantum: Duration::from_secs(10),
        }
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Duration::from_secs(u64::deserialize(deserializer)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ExecutionConfig::default();
        assert_eq!(config.quantum, Duration::from_secs(10));
    }
}
