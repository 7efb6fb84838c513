/*!
 * Synchronization Configuration
 *
 * Runtime configuration for sync strategy selection
 */

use crate::errors::ConfigError;
use std::str::FromStr;

/// Environment variable consulted by [`SyncConfig::from_env`]
pub const STRATEGY_ENV_VAR: &str = "BLOCKING_QUEUE_STRATEGY";

/// Strategy type selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrategyType {
    /// Futex-based signal word (fastest on Linux)
    Futex,
    /// Condvar plus deadline timer (cross-platform, reliable)
    Condvar,
    /// Auto-select based on platform
    #[default]
    Auto,
}

impl FromStr for StrategyType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "futex" => Ok(StrategyType::Futex),
            "condvar" => Ok(StrategyType::Condvar),
            "auto" | "" => Ok(StrategyType::Auto),
            _ => Err(ConfigError::UnknownStrategy(s.to_string())),
        }
    }
}

/// Synchronization configuration
#[derive(Debug, Clone, Default)]
pub struct SyncConfig {
    /// Preferred strategy
    pub strategy: StrategyType,
}

impl SyncConfig {
    pub const fn new(strategy: StrategyType) -> Self {
        Self { strategy }
    }

    /// Read the strategy from `BLOCKING_QUEUE_STRATEGY`, defaulting to `Auto`
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(STRATEGY_ENV_VAR) {
            Ok(value) => Ok(Self::new(value.parse()?)),
            Err(_) => Ok(Self::default()),
        }
    }

    /// Select best strategy for current platform
    pub fn select_strategy(&self) -> StrategyType {
        match self.strategy {
            StrategyType::Auto => {
                // Prefer futex on Linux, condvar elsewhere
                #[cfg(target_os = "linux")]
                {
                    StrategyType::Futex
                }
                #[cfg(not(target_os = "linux"))]
                {
                    StrategyType::Condvar
                }
            }
            other => other,
        }
    }
}
