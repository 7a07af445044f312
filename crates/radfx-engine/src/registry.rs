//! Filter identities, their fixed parameters and the name registry.
//!
//! A filter is a [`FilterKind`] plus the [`FilterParams`] it runs with. The
//! [`FilterRegistry`] builds one [`FilterSpec`] per kind from a
//! [`FilterConfig`], precomputing kernels, and is then shared read-only.
//!
//! # Example
//!
//! ```rust
//! use radfx_engine::{FilterConfig, FilterKind, FilterRegistry};
//!
//! let registry = FilterRegistry::from_config(&FilterConfig::default()).unwrap();
//! assert_eq!(registry.get("Gaussian_Blur").map(|s| s.kind()), Some(FilterKind::Gaussian));
//! assert!(registry.get("emboss").is_none());
//! ```

use std::fmt;

use radfx_core::GrayImage;
use radfx_ops::array::Kernel;
use radfx_ops::gaussian::kernel_for;
use radfx_ops::{canny, dct, fourier, gaussian, histogram, median, otsu, sobel};
use radfx_ops::{OpsError, OpsResult};
use serde::Serialize;

use crate::{EngineError, EngineResult, FilterConfig};

/// The eight supported filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    /// Sobel gradient magnitude.
    Sobel,
    /// Canny edge detector.
    Canny,
    /// Gaussian blur.
    Gaussian,
    /// Median filter.
    Median,
    /// Histogram equalization.
    Histogram,
    /// Fourier magnitude spectrum.
    Fourier,
    /// DCT coefficient view.
    Dct,
    /// Otsu thresholding.
    Otsu,
}

impl FilterKind {
    /// All kinds, in listing order.
    pub const ALL: [FilterKind; 8] = [
        FilterKind::Sobel,
        FilterKind::Canny,
        FilterKind::Gaussian,
        FilterKind::Median,
        FilterKind::Histogram,
        FilterKind::Fourier,
        FilterKind::Dct,
        FilterKind::Otsu,
    ];

    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            FilterKind::Sobel => "sobel",
            FilterKind::Canny => "canny",
            FilterKind::Gaussian => "gaussian",
            FilterKind::Median => "median",
            FilterKind::Histogram => "histogram",
            FilterKind::Fourier => "fourier",
            FilterKind::Dct => "dct",
            FilterKind::Otsu => "otsu",
        }
    }

    /// Alternative long names accepted by [`FilterKind::from_name`].
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            FilterKind::Gaussian => &["gaussian_blur"],
            FilterKind::Median => &["median_filter"],
            FilterKind::Histogram => &["histogram_equalization"],
            FilterKind::Fourier => &["fourier_transform"],
            FilterKind::Otsu => &["otsu_thresholding"],
            FilterKind::Sobel | FilterKind::Canny | FilterKind::Dct => &[],
        }
    }

    /// Resolves a canonical name or alias, ignoring ASCII case and
    /// surrounding whitespace.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|k| {
            k.name().eq_ignore_ascii_case(name)
                || k.aliases().iter().any(|a| a.eq_ignore_ascii_case(name))
        })
    }

    /// Human-readable title.
    pub fn display_name(self) -> &'static str {
        match self {
            FilterKind::Sobel => "Sobel Edge Detection",
            FilterKind::Canny => "Canny Edge Detection",
            FilterKind::Gaussian => "Gaussian Blur",
            FilterKind::Median => "Median Filter",
            FilterKind::Histogram => "Histogram Equalization",
            FilterKind::Fourier => "Fourier Transform",
            FilterKind::Dct => "Discrete Cosine Transform",
            FilterKind::Otsu => "Otsu Thresholding",
        }
    }

    /// One-line description.
    pub fn description(self) -> &'static str {
        match self {
            FilterKind::Sobel => "Edge magnitude from 3x3 Sobel derivatives",
            FilterKind::Canny => {
                "Thin edges via smoothing, non-maximum suppression and hysteresis"
            }
            FilterKind::Gaussian => "Smoothing with a normalized Gaussian kernel",
            FilterKind::Median => "Salt-and-pepper noise removal by windowed median",
            FilterKind::Histogram => "Contrast enhancement by histogram equalization",
            FilterKind::Fourier => "Log magnitude of the centred 2D DFT",
            FilterKind::Dct => "Log magnitude of orthonormal 2D DCT-II coefficients",
            FilterKind::Otsu => "Binary segmentation at the Otsu threshold",
        }
    }

    /// What kind of image the filter produces.
    pub fn output_type(self) -> OutputType {
        match self {
            FilterKind::Canny | FilterKind::Otsu => OutputType::Binary,
            FilterKind::Fourier | FilterKind::Dct => OutputType::Spectrum,
            FilterKind::Sobel
            | FilterKind::Gaussian
            | FilterKind::Median
            | FilterKind::Histogram => OutputType::Grayscale,
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Kind of image a filter produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputType {
    /// Intensities in 0..=255.
    Grayscale,
    /// Only 0 and 255.
    Binary,
    /// Log-scaled transform magnitudes in 0..=255.
    Spectrum,
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputType::Grayscale => "grayscale",
            OutputType::Binary => "binary",
            OutputType::Spectrum => "spectrum",
        })
    }
}

/// Fixed parameters of one filter, with kernels already built.
#[derive(Debug, Clone)]
pub enum FilterParams {
    /// Filter takes no parameters.
    None,
    /// Gaussian blur kernel.
    Gaussian {
        /// Normalized kernel.
        kernel: Kernel,
        /// Standard deviation the kernel was built from.
        sigma: f64,
    },
    /// Median window side.
    Median {
        /// Window side (odd).
        window: usize,
    },
    /// Canny smoothing kernel and thresholds.
    Canny {
        /// Smoothing kernel.
        kernel: Kernel,
        /// Standard deviation the kernel was built from.
        sigma: f64,
        /// Lower threshold.
        low: f64,
        /// Upper threshold.
        high: f64,
    },
}

impl fmt::Display for FilterParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterParams::None => f.write_str("-"),
            FilterParams::Gaussian { kernel, sigma } => {
                write!(f, "sigma={}, kernel_size={}", sigma, kernel.size())
            }
            FilterParams::Median { window } => write!(f, "window_size={}", window),
            FilterParams::Canny {
                kernel,
                sigma,
                low,
                high,
            } => write!(
                f,
                "sigma={}, kernel_size={}, low={}, high={}",
                sigma,
                kernel.size(),
                low,
                high
            ),
        }
    }
}

/// A filter bound to its fixed configuration.
#[derive(Debug, Clone)]
pub struct FilterSpec {
    kind: FilterKind,
    params: FilterParams,
}

impl FilterSpec {
    /// Builds the spec for `kind` from `config`.
    pub fn new(kind: FilterKind, config: &FilterConfig) -> OpsResult<Self> {
        let params = match kind {
            FilterKind::Gaussian => FilterParams::Gaussian {
                kernel: kernel_for(config.gaussian.kernel_size, config.gaussian.sigma)?,
                sigma: config.gaussian.sigma,
            },
            FilterKind::Median => FilterParams::Median {
                window: config.median.window_size,
            },
            FilterKind::Canny => {
                canny::CannyParams::from(config.canny).validate_thresholds()?;
                FilterParams::Canny {
                    kernel: kernel_for(config.canny.kernel_size, config.canny.sigma)?,
                    sigma: config.canny.sigma,
                    low: config.canny.low_threshold,
                    high: config.canny.high_threshold,
                }
            }
            FilterKind::Sobel
            | FilterKind::Histogram
            | FilterKind::Fourier
            | FilterKind::Dct
            | FilterKind::Otsu => FilterParams::None,
        };
        Ok(Self { kind, params })
    }

    /// Filter identity.
    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    /// Fixed parameters.
    pub fn params(&self) -> &FilterParams {
        &self.params
    }

    /// Applies the filter to `image`.
    pub fn run(&self, image: &GrayImage) -> OpsResult<GrayImage> {
        match (self.kind, &self.params) {
            (FilterKind::Sobel, _) => sobel::sobel(image),
            (FilterKind::Gaussian, FilterParams::Gaussian { kernel, .. }) => {
                gaussian::blur_with_kernel(image, kernel)
            }
            (FilterKind::Median, FilterParams::Median { window }) => {
                median::median_filter(image, *window)
            }
            (FilterKind::Histogram, _) => Ok(histogram::equalize(image)),
            (FilterKind::Fourier, _) => fourier::fourier_view(image),
            (FilterKind::Dct, _) => dct::dct_view(image),
            (FilterKind::Otsu, _) => Ok(otsu::otsu(image)),
            (
                FilterKind::Canny,
                FilterParams::Canny {
                    kernel, low, high, ..
                },
            ) => canny::canny_with_kernel(image, kernel, *low, *high),
            (kind, params) => Err(OpsError::Unexpected(format!(
                "{} cannot run with parameters {}",
                kind, params
            ))),
        }
    }
}

/// Listing entry for one registered filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterInfo {
    /// Canonical name.
    pub id: &'static str,
    /// Human-readable title.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Accepted aliases.
    pub aliases: &'static [&'static str],
    /// Output image kind.
    pub output_type: OutputType,
    /// Fixed parameters, formatted.
    pub parameters: String,
}

/// Immutable table of every filter and its fixed configuration.
#[derive(Debug, Clone)]
pub struct FilterRegistry {
    specs: Vec<FilterSpec>,
    config: FilterConfig,
}

impl FilterRegistry {
    /// Validates `config` and builds one spec per filter kind.
    pub fn from_config(config: &FilterConfig) -> EngineResult<Self> {
        config.validate()?;
        let specs = FilterKind::ALL
            .into_iter()
            .map(|kind| FilterSpec::new(kind, config))
            .collect::<OpsResult<Vec<_>>>()
            .map_err(|e| EngineError::Config(e.to_string()))?;
        Ok(Self {
            specs,
            config: *config,
        })
    }

    /// Looks up a filter by canonical name or alias, case-insensitively.
    pub fn get(&self, name: &str) -> Option<&FilterSpec> {
        let kind = FilterKind::from_name(name)?;
        self.specs.iter().find(|s| s.kind == kind)
    }

    /// Every registered spec, in listing order.
    pub fn specs(&self) -> &[FilterSpec] {
        &self.specs
    }

    /// Configuration the registry was built from.
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Metadata for every registered filter.
    pub fn describe(&self) -> Vec<FilterInfo> {
        self.specs
            .iter()
            .map(|s| FilterInfo {
                id: s.kind.name(),
                name: s.kind.display_name(),
                description: s.kind.description(),
                aliases: s.kind.aliases(),
                output_type: s.kind.output_type(),
                parameters: s.params.to_string(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> FilterRegistry {
        FilterRegistry::from_config(&FilterConfig::default()).unwrap()
    }

    #[test]
    fn test_canonical_names_resolve() {
        let reg = registry();
        for kind in FilterKind::ALL {
            assert_eq!(reg.get(kind.name()).map(|s| s.kind()), Some(kind));
        }
    }

    #[test]
    fn test_aliases_and_case() {
        assert_eq!(FilterKind::from_name("OTSU"), Some(FilterKind::Otsu));
        assert_eq!(
            FilterKind::from_name("histogram_equalization"),
            Some(FilterKind::Histogram)
        );
        assert_eq!(
            FilterKind::from_name(" Fourier_Transform "),
            Some(FilterKind::Fourier)
        );
        assert_eq!(FilterKind::from_name("median_filter"), Some(FilterKind::Median));
        assert_eq!(FilterKind::from_name("unknown_filter_xyz"), None);
        assert_eq!(FilterKind::from_name(""), None);
    }

    #[test]
    fn test_describe_metadata() {
        let info = registry().describe();
        assert_eq!(info.len(), 8);
        let canny = info.iter().find(|i| i.id == "canny").unwrap();
        assert_eq!(canny.output_type, OutputType::Binary);
        assert!(canny.parameters.contains("low=100"));
        let dct = info.iter().find(|i| i.id == "dct").unwrap();
        assert_eq!(dct.output_type, OutputType::Spectrum);
        assert_eq!(dct.parameters, "-");
    }

    #[test]
    fn test_specs_run() {
        let reg = registry();
        let img = GrayImage::from_fn(16, 16, |x, y| ((x * 16 + y) % 256) as f64).unwrap();
        for spec in reg.specs() {
            let out = spec.run(&img).unwrap();
            assert_eq!(out.dims(), img.dims(), "{}", spec.kind());
        }
    }

    #[test]
    fn test_params_follow_config() {
        let cfg = FilterConfig::from_yaml_str("median: { window_size: 3 }").unwrap();
        let reg = FilterRegistry::from_config(&cfg).unwrap();
        assert!(matches!(
            reg.get("median").map(FilterSpec::params),
            Some(FilterParams::Median { window: 3 })
        ));
        assert!(matches!(
            reg.get("sobel").map(FilterSpec::params),
            Some(FilterParams::None)
        ));
        match reg.get("gaussian").map(FilterSpec::params) {
            Some(FilterParams::Gaussian { kernel, sigma }) => {
                assert_eq!(kernel.size(), 5);
                assert_eq!(*sigma, 1.4);
            }
            other => panic!("unexpected params {:?}", other),
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut cfg = FilterConfig::default();
        cfg.canny.kernel_size = 2;
        assert!(matches!(
            FilterRegistry::from_config(&cfg),
            Err(EngineError::Config(_))
        ));
    }

    #[test]
    fn test_mismatched_params_fail_cleanly() {
        let spec = FilterSpec {
            kind: FilterKind::Gaussian,
            params: FilterParams::None,
        };
        let img = GrayImage::filled(8, 8, 1.0).unwrap();
        assert!(matches!(spec.run(&img), Err(OpsError::Unexpected(_))));
    }
}
