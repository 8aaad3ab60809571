//! Error types for the fallible edges of the turret core.
//!
//! Gameplay gating (a rejected rotation or shot) is never an error; these
//! variants cover configuration loading and pool lookups only.

use std::fmt;
use std::path::PathBuf;

use crate::resources::PrefabId;

/// Top-level error enum for the turret crate.
#[derive(Debug)]
pub enum TurretError {
    /// The configuration file could not be read.
    ConfigRead {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// The configuration text is not valid TOML for [`crate::config::TurretConfig`].
    ConfigParse(toml::de::Error),

    /// A configuration value is outside its accepted range.
    InvalidConfig {
        /// Name of the offending field.
        field: &'static str,
        /// Human-readable description of the accepted range.
        reason: &'static str,
    },

    /// A prefab id was not produced by this pool's registry.
    UnknownPrefab(PrefabId),
}

impl fmt::Display for TurretError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurretError::ConfigRead { path, source } => {
                write!(f, "failed to read turret config '{}': {}", path.display(), source)
            }
            TurretError::ConfigParse(err) => write!(f, "failed to parse turret config: {err}"),
            TurretError::InvalidConfig { field, reason } => {
                write!(f, "invalid turret config field '{field}': {reason}")
            }
            TurretError::UnknownPrefab(id) => write!(f, "unknown prefab id {}", id.0),
        }
    }
}

impl std::error::Error for TurretError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TurretError::ConfigRead { source, .. } => Some(source),
            TurretError::ConfigParse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for TurretError {
    fn from(err: toml::de::Error) -> Self {
        TurretError::ConfigParse(err)
    }
}

/// Convenience alias: a `Result` using `TurretError` as the error type.
pub type TurretResult<T> = Result<T, TurretError>;
