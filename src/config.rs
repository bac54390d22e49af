//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Tunables of an [`Engine`](crate::engine::Engine).
///
/// Every field has a default, so `{}` is a valid JSON configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Worker threads; `0` uses every available core.
    pub threads: usize,

    /// Independent message channels, i.e. how many traversals may be in flight
    /// at once against the engine.
    pub channels: usize,

    /// Lanes per worker thread. More lanes balance skewed degree distributions
    /// better at the cost of more emit buffers.
    pub lanes_per_thread: usize,

    /// Fraction of all edges above which a frontier is traversed in pull mode.
    pub dense_threshold: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            threads: 0,
            channels: 8,
            lanes_per_thread: 4,
            dense_threshold: 0.05,
        }
    }
}

impl EngineConfig {
    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    /// Returns [`Error::Json`] for malformed input or unknown fields, and
    /// [`Error::InvalidConfig`] for out-of-range values.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the worker thread count.
    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Sets the channel count.
    #[must_use]
    pub fn with_channels(mut self, channels: usize) -> Self {
        self.channels = channels;
        self
    }

    /// Checks value ranges.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.channels == 0 {
            return Err(Error::InvalidConfig("channels must be at least 1".into()));
        }
        if self.lanes_per_thread == 0 {
            return Err(Error::InvalidConfig("lanes_per_thread must be at least 1".into()));
        }
        if !(self.dense_threshold.is_finite()
            && self.dense_threshold > 0.0
            && self.dense_threshold <= 1.0)
        {
            return Err(Error::InvalidConfig(format!(
                "dense_threshold must be within (0, 1], got {}",
                self.dense_threshold
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        assert_eq!(EngineConfig::from_json("{}").unwrap(), EngineConfig::default());
    }

    #[test]
    fn partial_document_overrides_fields() {
        let c = EngineConfig::from_json(r#"{ "threads": 2, "dense_threshold": 0.5 }"#).unwrap();
        assert_eq!(c.threads, 2);
        assert_eq!(c.dense_threshold, 0.5);
        assert_eq!(c.channels, 8);
    }

    #[test]
    fn unknown_field_is_rejected() {
        let err = EngineConfig::from_json(r#"{ "thread": 2 }"#).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        for text in [
            r#"{ "channels": 0 }"#,
            r#"{ "lanes_per_thread": 0 }"#,
            r#"{ "dense_threshold": 0.0 }"#,
            r#"{ "dense_threshold": 1.5 }"#,
        ] {
            assert!(
                matches!(EngineConfig::from_json(text), Err(Error::InvalidConfig(_))),
                "{text} should be rejected"
            );
        }
    }
}
