//! Background queue selection.

use serde::{Deserialize, Serialize};

/// Which queue backend the application runs its jobs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QueueDriver {
    /// In-process queue. Jobs are lost on restart.
    #[default]
    Memory,
    /// Redis-backed queue. Requires a Redis URL.
    Redis,
}

impl QueueDriver {
    /// All accepted driver names, in declaration order.
    pub const CHOICES: &'static [&'static str] = &["memory", "redis"];

    /// Whether this driver needs an external Redis connection.
    #[must_use]
    pub const fn requires_redis(self) -> bool {
        matches!(self, Self::Redis)
    }
}

impl std::fmt::Display for QueueDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Memory => write!(f, "memory"),
            Self::Redis => write!(f, "redis"),
        }
    }
}

impl std::str::FromStr for QueueDriver {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "memory" => Ok(Self::Memory),
            "redis" => Ok(Self::Redis),
            _ => Err(format!(
                "invalid queue driver: {s} (expected one of: {})",
                Self::CHOICES.join(", ")
            )),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_memory() {
        assert_eq!(QueueDriver::default(), QueueDriver::Memory);
    }

    #[test]
    fn test_parse_and_display() {
        for name in QueueDriver::CHOICES {
            let driver: QueueDriver = name.parse().unwrap();
            assert_eq!(driver.to_string(), *name);
        }
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        let err = "Redis".parse::<QueueDriver>().unwrap_err();
        assert!(err.contains("memory, redis"));
    }

    #[test]
    fn test_requires_redis() {
        assert!(QueueDriver::Redis.requires_redis());
        assert!(!QueueDriver::Memory.requires_redis());
    }
}
