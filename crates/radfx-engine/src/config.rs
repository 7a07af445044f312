//! Fixed filter configuration, loaded once at startup.
//!
//! Every filter runs with a single configuration for the lifetime of the
//! process. The defaults match the reference pipeline; a YAML file may
//! override any subset of them:
//!
//! ```yaml
//! gaussian: { sigma: 1.4, kernel_size: 5 }
//! median: { window_size: 5 }
//! canny: { sigma: 1.4, kernel_size: 5, low_threshold: 100, high_threshold: 200 }
//! limits: { max_dimension: 2048 }
//! ```
//!
//! # Example
//!
//! ```rust
//! use radfx_engine::FilterConfig;
//!
//! let cfg = FilterConfig::from_yaml_str("median: { window_size: 3 }").unwrap();
//! assert_eq!(cfg.median.window_size, 3);
//! assert_eq!(cfg.gaussian.kernel_size, 5);
//! ```

use std::path::Path;

use radfx_ops::canny::{CannyParams, DEFAULT_HIGH_THRESHOLD, DEFAULT_LOW_THRESHOLD};
use radfx_ops::gaussian::{DEFAULT_KERNEL_SIZE, DEFAULT_SIGMA};
use radfx_ops::median::DEFAULT_WINDOW;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{EngineError, EngineResult};

/// Largest accepted width or height, in pixels.
pub const DEFAULT_MAX_DIMENSION: usize = 2048;

/// Gaussian blur settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GaussianConfig {
    /// Standard deviation.
    pub sigma: f64,
    /// Kernel side (odd).
    pub kernel_size: usize,
}

impl Default for GaussianConfig {
    fn default() -> Self {
        Self {
            sigma: DEFAULT_SIGMA,
            kernel_size: DEFAULT_KERNEL_SIZE,
        }
    }
}

/// Median filter settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MedianConfig {
    /// Window side (odd).
    pub window_size: usize,
}

impl Default for MedianConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW,
        }
    }
}

/// Canny settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CannyConfig {
    /// Smoothing standard deviation.
    pub sigma: f64,
    /// Smoothing kernel side (odd).
    pub kernel_size: usize,
    /// Lower hysteresis threshold.
    pub low_threshold: f64,
    /// Upper hysteresis threshold.
    pub high_threshold: f64,
}

impl Default for CannyConfig {
    fn default() -> Self {
        Self {
            sigma: DEFAULT_SIGMA,
            kernel_size: DEFAULT_KERNEL_SIZE,
            low_threshold: DEFAULT_LOW_THRESHOLD,
            high_threshold: DEFAULT_HIGH_THRESHOLD,
        }
    }
}

impl From<CannyConfig> for CannyParams {
    fn from(c: CannyConfig) -> Self {
        CannyParams {
            sigma: c.sigma,
            kernel_size: c.kernel_size,
            low_threshold: c.low_threshold,
            high_threshold: c.high_threshold,
        }
    }
}

/// Source image limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Limits {
    /// Largest accepted width or height.
    pub max_dimension: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_dimension: DEFAULT_MAX_DIMENSION,
        }
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    /// Gaussian blur.
    pub gaussian: GaussianConfig,
    /// Median filter.
    pub median: MedianConfig,
    /// Canny edge detector.
    pub canny: CannyConfig,
    /// Source image limits.
    pub limits: Limits,
}

impl FilterConfig {
    /// Loads and validates a YAML configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(EngineError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        debug!(path = %path.display(), "loading filter config");
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parses and validates YAML. Missing fields take their defaults.
    pub fn from_yaml_str(yaml: &str) -> EngineResult<Self> {
        // An empty document means "all defaults".
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: FilterConfig = serde_yaml::from_str(yaml)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Serializes to YAML.
    pub fn to_yaml(&self) -> EngineResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Checks every value is usable by its filter.
    pub fn validate(&self) -> EngineResult<()> {
        check_kernel("gaussian.kernel_size", self.gaussian.kernel_size)?;
        check_sigma("gaussian.sigma", self.gaussian.sigma)?;
        check_kernel("median.window_size", self.median.window_size)?;
        check_kernel("canny.kernel_size", self.canny.kernel_size)?;
        check_sigma("canny.sigma", self.canny.sigma)?;

        let (low, high) = (self.canny.low_threshold, self.canny.high_threshold);
        if !(low.is_finite() && high.is_finite() && low >= 0.0) {
            return Err(EngineError::Config(format!(
                "canny thresholds must be finite and non-negative, got {}/{}",
                low, high
            )));
        }
        if low > high {
            return Err(EngineError::Config(format!(
                "canny.low_threshold {} exceeds canny.high_threshold {}",
                low, high
            )));
        }
        if self.limits.max_dimension == 0 {
            return Err(EngineError::Config(
                "limits.max_dimension must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

fn check_kernel(field: &str, size: usize) -> EngineResult<()> {
    if size == 0 || size % 2 == 0 {
        return Err(EngineError::Config(format!(
            "{} must be odd, got {}",
            field, size
        )));
    }
    Ok(())
}

fn check_sigma(field: &str, sigma: f64) -> EngineResult<()> {
    if !(sigma.is_finite() && sigma > 0.0) {
        return Err(EngineError::Config(format!(
            "{} must be positive, got {}",
            field, sigma
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let cfg = FilterConfig::default();
        assert_eq!(cfg.gaussian.sigma, 1.4);
        assert_eq!(cfg.gaussian.kernel_size, 5);
        assert_eq!(cfg.median.window_size, 5);
        assert_eq!(cfg.canny.low_threshold, 100.0);
        assert_eq!(cfg.canny.high_threshold, 200.0);
        assert_eq!(cfg.limits.max_dimension, 2048);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_yaml_roundtrip() {
        let mut cfg = FilterConfig::default();
        cfg.canny.low_threshold = 50.0;
        cfg.median.window_size = 3;
        let yaml = cfg.to_yaml().unwrap();
        assert_eq!(FilterConfig::from_yaml_str(&yaml).unwrap(), cfg);
    }

    #[test]
    fn test_partial_yaml_and_empty() {
        let cfg = FilterConfig::from_yaml_str("canny:\n  high_threshold: 180\n").unwrap();
        assert_eq!(cfg.canny.high_threshold, 180.0);
        assert_eq!(cfg.canny.low_threshold, 100.0);
        assert_eq!(FilterConfig::from_yaml_str("  \n").unwrap(), FilterConfig::default());
    }

    #[test]
    fn test_rejects_even_kernel() {
        let err = FilterConfig::from_yaml_str("gaussian: { kernel_size: 4 }").unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
        let err = FilterConfig::from_yaml_str("median: { window_size: 6 }").unwrap_err();
        assert!(err.to_string().contains("median.window_size"));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(FilterConfig::from_yaml_str("gaussian: { sigma: 0 }").is_err());
        assert!(FilterConfig::from_yaml_str("canny: { low_threshold: 300 }").is_err());
        assert!(FilterConfig::from_yaml_str("limits: { max_dimension: 0 }").is_err());
    }

    #[test]
    fn test_rejects_unknown_fields() {
        let err = FilterConfig::from_yaml_str("gaussian: { radius: 2 }").unwrap_err();
        assert!(matches!(err, EngineError::Yaml(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "limits:\n  max_dimension: 512").unwrap();
        let cfg = FilterConfig::from_file(file.path()).unwrap();
        assert_eq!(cfg.limits.max_dimension, 512);

        let missing = FilterConfig::from_file("/nonexistent/radfx.yaml").unwrap_err();
        assert!(matches!(missing, EngineError::ConfigNotFound { .. }));
    }
}
