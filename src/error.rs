//! Error handling for Hearth Landmass
//!
//! Terrain generation itself is total over its clamped inputs. Errors only
//! surface when configuration is accepted, when configuration files are read,
//! and when the worker pool is started.

/// Main error type for Hearth Landmass
#[derive(Debug, thiserror::Error)]
pub enum LandmassError {
    // Configuration Errors
    #[error("Invalid config: {field} = {value} ({reason})")]
    InvalidConfig {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Config parse error in {context}: {error}")]
    ConfigParse { context: String, error: String },

    // System Errors
    #[error("IO error for {path}: {error}")]
    Io { path: String, error: String },

    // Threading Errors
    #[error("Failed to spawn worker thread '{name}': {error}")]
    WorkerSpawn { name: String, error: String },

    #[error("Channel closed: {name}")]
    ChannelClosed { name: String },
}

/// Type alias for Results in Hearth Landmass
pub type LandmassResult<T> = Result<T, LandmassError>;

impl LandmassError {
    /// Shorthand for the most common configuration rejection
    pub fn invalid_config(
        field: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        LandmassError::InvalidConfig {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<toml::de::Error> for LandmassError {
    fn from(error: toml::de::Error) -> Self {
        LandmassError::ConfigParse {
            context: "landmass config".to_string(),
            error: error.to_string(),
        }
    }
}

impl<T> From<crossbeam_channel::SendError<T>> for LandmassError {
    fn from(_: crossbeam_channel::SendError<T>) -> Self {
        LandmassError::ChannelClosed {
            name: "worker_jobs".to_string(),
        }
    }
}

/// Extension trait for attaching a file path to I/O failures
pub trait ErrorContext<T> {
    fn with_path(self, path: &std::path::Path) -> LandmassResult<T>;
}

impl<T> ErrorContext<T> for Result<T, std::io::Error> {
    fn with_path(self, path: &std::path::Path) -> LandmassResult<T> {
        self.map_err(|e| LandmassError::Io {
            path: path.display().to_string(),
            error: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LandmassError::invalid_config("noise.scale", -1.0, "must be positive");
        assert_eq!(
            err.to_string(),
            "Invalid config: noise.scale = -1 (must be positive)"
        );
    }

    #[test]
    fn test_io_context_keeps_path() {
        let result: Result<i32, std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file not found",
        ));
        let err = result
            .with_path(std::path::Path::new("terrain.toml"))
            .unwrap_err();
        match err {
            LandmassError::Io { path, error } => {
                assert_eq!(path, "terrain.toml");
                assert!(error.contains("file not found"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_toml_error_maps_to_config_parse() {
        let source: Result<toml::Value, _> = toml::from_str("seed = ");
        let err: LandmassError = source.unwrap_err().into();
        match err {
            LandmassError::ConfigParse { context, error } => {
                assert_eq!(context, "landmass config");
                assert!(!error.is_empty());
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_send_error_maps_to_channel_closed() {
        let (tx, rx) = crossbeam_channel::unbounded::<u8>();
        drop(rx);
        let err: LandmassError = tx.send(1).unwrap_err().into();
        assert!(matches!(err, LandmassError::ChannelClosed { .. }));
    }
}
