use crate::foundation::error::{GlassError, GlassResult};
use std::path::Path;

/// Options for a [`crate::GlassController`].
///
/// Deserializes from JSON with every field optional:
///
/// ```json
/// { "max_measure_attempts": 120, "resolution": 0.5 }
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlassOpts {
    /// Frame-clock ticks to wait for a non-zero surface size before giving up.
    pub max_measure_attempts: u32,
    /// Texture pixels per surface pixel.
    pub resolution: f64,
    /// Prefix of generated filter ids.
    pub id_prefix: String,
    /// Seed for the id token generator. `None` seeds from the thread-local generator.
    ///
    /// Meant for reproducible output from a single controller: controllers sharing a seed get
    /// the same id, and a host rejects mounting the second one. Give each controller on a host
    /// its own seed, or leave this unset.
    pub id_seed: Option<u64>,
    /// Evaluate texture rows on the rayon pool.
    pub parallel: bool,
    /// Largest accepted texture side, in texture pixels.
    pub max_texture_dim: u32,
}

impl Default for GlassOpts {
    fn default() -> Self {
        Self {
            // About ten seconds at 60 Hz.
            max_measure_attempts: 600,
            resolution: 1.0,
            id_prefix: "liquid-glass".to_string(),
            id_seed: None,
            parallel: false,
            max_texture_dim: 16_384,
        }
    }
}

impl GlassOpts {
    /// Parse and validate options from a JSON string.
    pub fn from_json_str(s: &str) -> GlassResult<Self> {
        let opts: Self = serde_json::from_str(s)
            .map_err(|e| GlassError::validation(format!("invalid options json: {e}")))?;
        opts.validate()?;
        Ok(opts)
    }

    /// Read, parse and validate options from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> GlassResult<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path).map_err(|e| {
            GlassError::Other(anyhow::Error::new(e).context(format!("read '{}'", path.display())))
        })?;
        Self::from_json_str(&s)
    }

    /// Check field ranges.
    pub fn validate(&self) -> GlassResult<()> {
        if self.max_measure_attempts == 0 {
            return Err(GlassError::validation("max_measure_attempts must be >= 1"));
        }
        if !self.resolution.is_finite() || self.resolution <= 0.0 {
            return Err(GlassError::validation("resolution must be finite and > 0"));
        }
        if self.id_prefix.is_empty()
            || !self
                .id_prefix
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        {
            return Err(GlassError::validation(
                "id_prefix must be non-empty and contain only [A-Za-z0-9_-]",
            ));
        }
        if self.max_texture_dim == 0 {
            return Err(GlassError::validation("max_texture_dim must be >= 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/lifecycle/config.rs"]
mod tests;
