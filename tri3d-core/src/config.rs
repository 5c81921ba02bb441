/// Render configuration loaded from TOML
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::emit::RenderMode;
use crate::projection::ProjectionParams;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config")]
    Toml(#[from] toml::de::Error),
    #[error("invalid projection: {reason}")]
    Invalid { reason: &'static str },
}

/// Settings for a [`RenderContext`](crate::pipeline::RenderContext) and its
/// host loop. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    #[serde(flatten)]
    pub projection: ProjectionParams,
    /// Radians per second
    pub angular_rate: f32,
    /// Distance moved per key press
    pub translate_step: f32,
    pub mode: RenderMode,
    pub eye: [f32; 3],
    pub light_direction: [f32; 3],
    /// Upper bound on vertices emitted per frame
    pub max_vertices: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            projection: ProjectionParams::default(),
            angular_rate: 1.0,
            translate_step: 0.2,
            mode: RenderMode::Wireframe,
            eye: [0.0, 0.0, 0.0],
            light_direction: [0.0, 0.0, -1.0],
            max_vertices: 30_000,
        }
    }
}

impl RenderConfig {
    /// Parse a config and reject projection parameters that can't produce
    /// finite depths.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config
            .projection
            .validate()
            .map_err(|reason| ConfigError::Invalid { reason })?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        let config = Self::from_toml(&text)?;
        tracing::debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }
}
