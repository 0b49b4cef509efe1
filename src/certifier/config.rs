//! Certifier Configuration
//!
//! Loaded from a JSON file; every field is optional:
//!
//! ```json
//! { "block_size": 1000, "gc_interval": 1000, "seed": "uuid:1-100" }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{CertifierError, CertifierResult};
use crate::generator::DEFAULT_BLOCK_SIZE;

/// Accepts between automatic fingerprint-table prunes.
pub const DEFAULT_GC_INTERVAL: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertifierConfig {
    /// Gnos reserved per generator refill. Must be > 0.
    #[serde(default = "default_block_size")]
    pub block_size: u64,

    /// Accepts between fingerprint-table prunes. Must be > 0.
    #[serde(default = "default_gc_interval")]
    pub gc_interval: u64,

    /// Executed-set text applied before the first certification.
    #[serde(default)]
    pub seed: Option<String>,
}

fn default_block_size() -> u64 {
    DEFAULT_BLOCK_SIZE
}

fn default_gc_interval() -> u64 {
    DEFAULT_GC_INTERVAL
}

impl Default for CertifierConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            gc_interval: DEFAULT_GC_INTERVAL,
            seed: None,
        }
    }
}

impl CertifierConfig {
    /// Default configuration with the given block size.
    pub fn with_block_size(block_size: u64) -> Self {
        Self {
            block_size,
            ..Self::default()
        }
    }

    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> CertifierResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CertifierError::ConfigIo(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&content)
    }

    /// Parse and validate configuration JSON.
    pub fn from_json(content: &str) -> CertifierResult<Self> {
        let config: CertifierConfig = serde_json::from_str(content)
            .map_err(|e| CertifierError::InvalidConfig(format!("invalid JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CertifierResult<()> {
        if self.block_size == 0 {
            return Err(CertifierError::InvalidConfig(
                "block_size must be > 0".to_string(),
            ));
        }
        if self.gc_interval == 0 {
            return Err(CertifierError::InvalidConfig(
                "gc_interval must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}
