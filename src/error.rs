use core::fmt;

use crate::sim::GamePhase;

/// Rejected configuration: unknown names or a change attempted mid-run
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    UnknownMode { name: String },
    UnknownDifficulty { name: String },
    Locked { phase: GamePhase },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownMode { name } => {
                write!(f, "unknown game mode: {name:?} (expected arithmetic or numbers)")
            }
            Self::UnknownDifficulty { name } => {
                write!(f, "unknown difficulty: {name:?} (expected easy, medium or hard)")
            }
            Self::Locked { phase } => {
                write!(f, "configuration is locked while in {phase:?}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Failure reading or writing the key/value store
#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Serialization(serde_json::Error),
    Unavailable { reason: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "store i/o error: {err}"),
            Self::Serialization(err) => write!(f, "store serialization error: {err}"),
            Self::Unavailable { reason } => write!(f, "store unavailable: {reason}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::Unavailable { .. } => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_messages() {
        let err = ConfigError::UnknownDifficulty {
            name: "nightmare".to_string(),
        };
        assert!(err.to_string().contains("nightmare"));

        let err = ConfigError::Locked {
            phase: GamePhase::Playing,
        };
        assert_eq!(err.to_string(), "configuration is locked while in Playing");
    }

    #[test]
    fn test_store_error_source() {
        use std::error::Error;

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = StoreError::from(io);
        assert!(err.source().is_some());

        let err = StoreError::Unavailable {
            reason: "no window".to_string(),
        };
        assert!(err.source().is_none());
    }
}
