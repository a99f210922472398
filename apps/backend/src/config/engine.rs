use std::env;
use std::time::Duration;

use crate::error::EngineError;

/// Runtime configuration for game timing.
///
/// Values come from environment variables with sensible defaults, so a bare
/// deployment works without any configuration at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    /// Total thinking time per side for a whole game.
    pub clock_duration: Duration,
    /// How long a disconnected player has to reconnect before forfeiting.
    pub disconnect_grace: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            clock_duration: Duration::from_secs(300),
            disconnect_grace: Duration::from_secs(30),
        }
    }
}

impl GameConfig {
    /// Build a config from environment variables.
    ///
    /// `LANES_CLOCK_SECS` and `LANES_DISCONNECT_GRACE_SECS` override the
    /// defaults; both must be positive integers.
    pub fn from_env() -> Result<Self, EngineError> {
        let defaults = Self::default();
        Ok(Self {
            clock_duration: secs_var("LANES_CLOCK_SECS", defaults.clock_duration)?,
            disconnect_grace: secs_var("LANES_DISCONNECT_GRACE_SECS", defaults.disconnect_grace)?,
        })
    }
}

fn secs_var(name: &str, default: Duration) -> Result<Duration, EngineError> {
    match env::var(name) {
        Err(_) => Ok(default),
        Ok(raw) => {
            let secs: u64 = raw.parse().map_err(|_| {
                EngineError::config(format!("{name} must be a positive integer, got '{raw}'"))
            })?;
            if secs == 0 {
                return Err(EngineError::config(format!("{name} must be positive")));
            }
            Ok(Duration::from_secs(secs))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.clock_duration, Duration::from_secs(300));
        assert_eq!(cfg.disconnect_grace, Duration::from_secs(30));
    }

    #[test]
    fn rejects_non_numeric_override() {
        let err = secs_var_for_test("not-a-number");
        assert!(err.is_err());
    }

    #[test]
    fn rejects_zero_override() {
        let err = secs_var_for_test("0");
        assert!(err.is_err());
    }

    fn secs_var_for_test(value: &str) -> Result<Duration, EngineError> {
        // Use a variable name unique to this test binary to avoid races with
        // other tests reading the environment.
        let name = "LANES_TEST_SECS_VAR";
        std::env::set_var(name, value);
        let out = secs_var(name, Duration::from_secs(1));
        std::env::remove_var(name);
        out
    }
}
