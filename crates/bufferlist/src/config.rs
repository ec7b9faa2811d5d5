#![forbid(unsafe_code)]

//! Tuning knobs for the buffered list.
//!
//! [`ListConfig`] is plain data with sensible defaults. It can be built in
//! code, deserialized from JSON, and must pass [`ListConfig::validate`]
//! before an engine accepts it.
//!
//! ```
//! use bufferlist::ListConfig;
//!
//! let config = ListConfig::from_json_str(r#"{ "batch_size": 30, "grouped": true }"#).unwrap();
//! assert_eq!(config.batch_size, 30);
//! assert_eq!(config.minimum_items, 50);
//! ```

use std::fmt;
use std::time::Duration;

use bufferlist_core::Px;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from configuration parsing and validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A field holds a value the engine cannot work with.
    InvalidValue {
        field: &'static str,
        reason: String,
    },
    /// The configuration document could not be parsed.
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { field, reason } => write!(f, "invalid {field}: {reason}"),
            Self::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Trigger gesture
// ---------------------------------------------------------------------------

/// Item gesture that requests selection of the touched record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectTrigger {
    #[default]
    Tap,
    DoubleTap,
}

// ---------------------------------------------------------------------------
// ListConfig
// ---------------------------------------------------------------------------

/// Configuration for a buffered list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    /// Window length rendered on every full replace. Default: 50.
    pub minimum_items: usize,

    /// Records added per incremental append or insert. Default: 50.
    pub batch_size: usize,

    /// Window length above which cleanup shrinks the window after scrolling
    /// stops. Must exceed `batch_size`. Default: 125.
    pub cleanup_boundary: usize,

    /// Lock selection for `select_block_ms` after each scroll end, so a tap
    /// that merely stops a fling does not select. Default: false.
    pub block_scroll_select: bool,

    /// Estimated maximum item height in pixels. Drives proxy extents and the
    /// position-to-index estimate for jumps. Too small and upward scrolling
    /// may not reach the true top; too large and the scroll indicator
    /// undersizes. Default: 85.
    pub max_item_height: Px,

    /// Insert group headers and maintain the group index. Default: false.
    pub grouped: bool,

    /// Drive the pinned header while grouped. Default: true.
    pub pin_headers: bool,

    /// Distance in pixels from a materialized edge at which incremental
    /// growth kicks in. Default: 50.
    pub edge_threshold: Px,

    /// Delay between scroll end and cleanup. Default: 250ms.
    pub cleanup_delay_ms: u64,

    /// Duration of the post-scroll selection lock. Default: 100ms.
    pub select_block_ms: u64,

    /// Records kept above the first visible record when the window is
    /// re-rendered by cleanup or a store change. Default: 3.
    pub refresh_anchor_margin: usize,

    /// Gesture that requests selection. Default: tap.
    pub trigger: SelectTrigger,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            minimum_items: 50,
            batch_size: 50,
            cleanup_boundary: 125,
            block_scroll_select: false,
            max_item_height: 85,
            grouped: false,
            pin_headers: true,
            edge_threshold: 50,
            cleanup_delay_ms: 250,
            select_block_ms: 100,
            refresh_anchor_margin: 3,
            trigger: SelectTrigger::Tap,
        }
    }
}

impl ListConfig {
    /// Parse a JSON document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Set the full-replace window length.
    #[must_use]
    pub fn with_minimum_items(mut self, n: usize) -> Self {
        self.minimum_items = n;
        self
    }

    /// Set the incremental batch size.
    #[must_use]
    pub fn with_batch_size(mut self, n: usize) -> Self {
        self.batch_size = n;
        self
    }

    /// Set the cleanup boundary.
    #[must_use]
    pub fn with_cleanup_boundary(mut self, n: usize) -> Self {
        self.cleanup_boundary = n;
        self
    }

    /// Set the item height estimate.
    #[must_use]
    pub fn with_max_item_height(mut self, px: Px) -> Self {
        self.max_item_height = px;
        self
    }

    /// Enable or disable grouping.
    #[must_use]
    pub fn with_grouped(mut self, grouped: bool) -> Self {
        self.grouped = grouped;
        self
    }

    /// Enable or disable the post-scroll selection lock.
    #[must_use]
    pub fn with_block_scroll_select(mut self, block: bool) -> Self {
        self.block_scroll_select = block;
        self
    }

    /// Cleanup delay as a [`Duration`].
    #[must_use]
    pub fn cleanup_delay(&self) -> Duration {
        Duration::from_millis(self.cleanup_delay_ms)
    }

    /// Selection lock as a [`Duration`].
    #[must_use]
    pub fn select_block(&self) -> Duration {
        Duration::from_millis(self.select_block_ms)
    }

    /// True when group headers should be pinned.
    #[must_use]
    pub fn pins_headers(&self) -> bool {
        self.grouped && self.pin_headers
    }

    /// Check the invariants the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.minimum_items == 0 {
            return Err(invalid("minimum_items", "must be at least 1"));
        }
        if self.batch_size == 0 {
            return Err(invalid("batch_size", "must be at least 1"));
        }
        if self.cleanup_boundary <= self.batch_size {
            return Err(invalid(
                "cleanup_boundary",
                format!(
                    "must exceed batch_size ({} <= {})",
                    self.cleanup_boundary, self.batch_size
                ),
            ));
        }
        if self.max_item_height <= 0 {
            return Err(invalid("max_item_height", "must be positive"));
        }
        if self.edge_threshold < 0 {
            return Err(invalid("edge_threshold", "must not be negative"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        field,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ListConfig::default();
        assert_eq!(config.minimum_items, 50);
        assert_eq!(config.batch_size, 50);
        assert_eq!(config.cleanup_boundary, 125);
        assert_eq!(config.max_item_height, 85);
        assert!(!config.block_scroll_select);
        assert_eq!(config.cleanup_delay(), Duration::from_millis(250));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn cleanup_boundary_must_exceed_batch() {
        let err = ListConfig::default()
            .with_batch_size(60)
            .with_cleanup_boundary(60)
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                field: "cleanup_boundary",
                ..
            }
        ));
        assert!(err.to_string().contains("must exceed batch_size"));
    }

    #[test]
    fn zero_sizes_rejected() {
        assert!(
            ListConfig::default()
                .with_minimum_items(0)
                .validate()
                .is_err()
        );
        assert!(ListConfig::default().with_batch_size(0).validate().is_err());
        assert!(
            ListConfig::default()
                .with_max_item_height(0)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn json_partial_document_fills_defaults() {
        let config =
            ListConfig::from_json_str(r#"{"grouped": true, "trigger": "double_tap"}"#).unwrap();
        assert!(config.grouped);
        assert!(config.pins_headers());
        assert_eq!(config.trigger, SelectTrigger::DoubleTap);
        assert_eq!(config.batch_size, 50);
    }

    #[test]
    fn json_invalid_values_rejected() {
        let err = ListConfig::from_json_str(r#"{"batch_size": 200}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        let err = ListConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn json_round_trip_preserves_values() {
        let config = ListConfig::default()
            .with_grouped(true)
            .with_block_scroll_select(true);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(ListConfig::from_json_str(&json).unwrap(), config);
    }
}
