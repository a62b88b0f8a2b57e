//! Runtime configuration
//!
//! Defaults match the classic snipping behavior: `image.png` next to the
//! executable, overlay sized by summed monitor widths. Both can be overridden
//! from the environment.

use capture::{BoundsPolicy, ConfigurationError};
use std::path::PathBuf;

pub const OUTPUT_VAR: &str = "REGIONSNAP_OUTPUT";
pub const BOUNDS_VAR: &str = "REGIONSNAP_BOUNDS";

const DEFAULT_FILE_NAME: &str = "image.png";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Where the captured PNG is written
    pub output_path: PathBuf,
    /// How the overlay's width is derived from the monitor layout
    pub bounds_policy: BoundsPolicy,
}

impl AppConfig {
    /// Load from the process environment
    pub fn load() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigurationError> {
        let output_path = match lookup(OUTPUT_VAR) {
            Some(value) if value.trim().is_empty() => {
                return Err(ConfigurationError::InvalidSetting {
                    key: OUTPUT_VAR,
                    value,
                })
            }
            Some(value) => PathBuf::from(value),
            None => default_output_path()?,
        };

        let bounds_policy = match lookup(BOUNDS_VAR) {
            Some(value) => parse_bounds_policy(&value).ok_or(ConfigurationError::InvalidSetting {
                key: BOUNDS_VAR,
                value,
            })?,
            None => BoundsPolicy::default(),
        };

        Ok(Self {
            output_path,
            bounds_policy,
        })
    }
}

/// `image.png` in the directory of the running executable
pub fn default_output_path() -> Result<PathBuf, ConfigurationError> {
    let exe = std::env::current_exe()
        .map_err(|e| ConfigurationError::OutputDirectory(e.to_string()))?;
    let dir = exe.parent().ok_or_else(|| {
        ConfigurationError::OutputDirectory(format!("{} has no parent", exe.display()))
    })?;
    Ok(dir.join(DEFAULT_FILE_NAME))
}

fn parse_bounds_policy(value: &str) -> Option<BoundsPolicy> {
    match value.trim().to_ascii_lowercase().as_str() {
        "summed" | "summed-widths" => Some(BoundsPolicy::SummedWidths),
        "extent" => Some(BoundsPolicy::Extent),
        _ => None,
    }
}
