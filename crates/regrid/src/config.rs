//! Runtime configuration for cropping and resampling.

use serde::{Deserialize, Serialize};

use regrid_common::{InterpolationMethod, RegridError, Result};

/// Configuration for the crop + resample pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegridConfig {
    /// Fraction of the crop box span added as padding on every side.
    pub pad_pct: f64,

    /// Interpolation method for resampling.
    pub method: InterpolationMethod,

    /// Copy source attributes onto resampled output.
    pub keep_attrs: bool,
}

impl Default for RegridConfig {
    fn default() -> Self {
        Self {
            pad_pct: 0.1,
            method: InterpolationMethod::Bilinear,
            keep_attrs: false,
        }
    }
}

impl RegridConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("REGRID_PAD_PCT") {
            if let Ok(pad) = val.parse() {
                config.pad_pct = pad;
            }
        }

        if let Ok(val) = std::env::var("REGRID_INTERPOLATION") {
            config.method = InterpolationMethod::from_str(&val);
        }

        if let Ok(val) = std::env::var("REGRID_KEEP_ATTRS") {
            config.keep_attrs = val.to_lowercase() == "true" || val == "1";
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.pad_pct) {
            return Err(RegridError::ConfigError(format!(
                "pad_pct must be in [0, 1), got {}",
                self.pad_pct
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = RegridConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.pad_pct - 0.1).abs() < f64::EPSILON);
        assert_eq!(config.method, InterpolationMethod::Bilinear);
    }

    #[test]
    fn test_validate_rejects_bad_padding() {
        let config = RegridConfig {
            pad_pct: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = RegridConfig {
            pad_pct: -0.1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
