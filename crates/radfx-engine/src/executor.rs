//! Applies a requested list of filters to one image.
//!
//! Failures stay local to the filter that caused them: an unknown name, an
//! image too small for a kernel, a panic or a non-finite result each become
//! a failed [`FilterResult`] while the rest of the batch proceeds. Only a
//! structurally unusable source image fails the whole call.
//!
//! # Example
//!
//! ```rust
//! use radfx_core::GrayImage;
//! use radfx_engine::{FailureKind, FilterExecutor};
//!
//! let executor = FilterExecutor::with_defaults().unwrap();
//! let img = GrayImage::from_fn(16, 16, |x, _| if x > 7 { 255.0 } else { 0.0 }).unwrap();
//!
//! let batch = executor.apply(&img, &["sobel", "unknown_filter_xyz"]).unwrap();
//! assert_eq!(batch.len(), 2);
//! assert!(batch.results()[0].is_ok());
//! assert_eq!(
//!     batch.results()[1].failure().map(|f| f.kind),
//!     Some(FailureKind::UnknownFilter)
//! );
//! ```

use std::any::Any;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

use radfx_core::GrayImage;
use radfx_ops::{OpsError, OpsResult};
use rayon::prelude::*;
use tracing::{debug, info, trace, warn};

use crate::registry::{FilterKind, FilterRegistry};
use crate::{EngineError, EngineResult, FilterConfig};

/// How the filters of one batch are dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// One filter after another on the calling thread.
    Sequential,
    /// Filters fan out over the global rayon pool.
    #[default]
    Parallel,
}

/// Why a filter produced no image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The requested name is not registered.
    UnknownFilter,
    /// The image is too small (or otherwise misshapen) for the filter.
    InvalidDimensions,
    /// Anything else: bad parameters, a panic, a non-finite result.
    UnexpectedFailure,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FailureKind::UnknownFilter => "unknown filter",
            FailureKind::InvalidDimensions => "invalid dimensions",
            FailureKind::UnexpectedFailure => "unexpected failure",
        })
    }
}

/// Failure category plus a human-readable cause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterFailure {
    /// Category.
    pub kind: FailureKind,
    /// Cause, suitable for display.
    pub cause: String,
}

impl fmt::Display for FilterFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.cause)
    }
}

impl From<OpsError> for FilterFailure {
    fn from(err: OpsError) -> Self {
        let kind = match err {
            OpsError::InvalidDimensions(_) => FailureKind::InvalidDimensions,
            OpsError::InvalidParameter(_) | OpsError::Unexpected(_) => {
                FailureKind::UnexpectedFailure
            }
        };
        Self {
            kind,
            cause: err.to_string(),
        }
    }
}

/// Outcome of one requested filter.
#[derive(Debug, Clone)]
pub struct FilterResult {
    name: String,
    kind: Option<FilterKind>,
    image: Option<GrayImage>,
    elapsed: Duration,
    failure: Option<FilterFailure>,
}

impl FilterResult {
    fn success(name: &str, kind: FilterKind, image: GrayImage, elapsed: Duration) -> Self {
        Self {
            name: name.to_string(),
            kind: Some(kind),
            image: Some(image),
            elapsed,
            failure: None,
        }
    }

    fn failed(
        name: &str,
        kind: Option<FilterKind>,
        failure: FilterFailure,
        elapsed: Duration,
    ) -> Self {
        Self {
            name: name.to_string(),
            kind,
            image: None,
            elapsed,
            failure: Some(failure),
        }
    }

    /// Name exactly as requested.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolved filter, if the name was recognised.
    pub fn kind(&self) -> Option<FilterKind> {
        self.kind
    }

    /// True if the filter produced an image.
    pub fn is_ok(&self) -> bool {
        self.failure.is_none()
    }

    /// Output image on success.
    pub fn image(&self) -> Option<&GrayImage> {
        self.image.as_ref()
    }

    /// Takes the output image out of the result.
    pub fn into_image(self) -> Option<GrayImage> {
        self.image
    }

    /// Failure on error.
    pub fn failure(&self) -> Option<&FilterFailure> {
        self.failure.as_ref()
    }

    /// Time spent in the filter.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

/// Results of one [`FilterExecutor::apply`] call, in request order.
#[derive(Debug, Clone)]
pub struct ExecutionBatch<'a> {
    source: &'a GrayImage,
    requested: Vec<String>,
    results: Vec<FilterResult>,
    elapsed: Duration,
}

impl<'a> ExecutionBatch<'a> {
    /// The image every filter ran on.
    pub fn source(&self) -> &'a GrayImage {
        self.source
    }

    /// Requested names, in order.
    pub fn requested(&self) -> &[String] {
        &self.requested
    }

    /// One result per requested name, in order.
    pub fn results(&self) -> &[FilterResult] {
        &self.results
    }

    /// Consumes the batch, returning its results.
    pub fn into_results(self) -> Vec<FilterResult> {
        self.results
    }

    /// Number of results.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// True if nothing was requested.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Wall-clock duration of the whole batch.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Successful results.
    pub fn succeeded(&self) -> impl Iterator<Item = &FilterResult> {
        self.results.iter().filter(|r| r.is_ok())
    }

    /// Failed results.
    pub fn failed(&self) -> impl Iterator<Item = &FilterResult> {
        self.results.iter().filter(|r| !r.is_ok())
    }

    /// True if every requested filter succeeded.
    pub fn all_ok(&self) -> bool {
        self.results.iter().all(FilterResult::is_ok)
    }
}

/// Runs registered filters over images.
///
/// Cheap to clone; the registry is shared.
#[derive(Debug, Clone)]
pub struct FilterExecutor {
    registry: Arc<FilterRegistry>,
    mode: ExecutionMode,
}

impl FilterExecutor {
    /// Creates an executor over a shared registry, in parallel mode.
    pub fn new(registry: Arc<FilterRegistry>) -> Self {
        Self {
            registry,
            mode: ExecutionMode::default(),
        }
    }

    /// Builds a registry from `config` and wraps it.
    pub fn from_config(config: &FilterConfig) -> EngineResult<Self> {
        Ok(Self::new(Arc::new(FilterRegistry::from_config(config)?)))
    }

    /// Executor with the default configuration.
    pub fn with_defaults() -> EngineResult<Self> {
        Self::from_config(&FilterConfig::default())
    }

    /// Sets the dispatch mode.
    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Current dispatch mode.
    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// The shared registry.
    pub fn registry(&self) -> &Arc<FilterRegistry> {
        &self.registry
    }

    /// Applies every filter in `names` to `image`.
    ///
    /// Returns one result per name in request order. Fails only if the
    /// source image has non-finite samples or exceeds the configured
    /// dimension limit.
    pub fn apply<'a, S>(
        &self,
        image: &'a GrayImage,
        names: &[S],
    ) -> EngineResult<ExecutionBatch<'a>>
    where
        S: AsRef<str> + Sync,
    {
        self.dispatch(image, names, |name| self.run_named(image, name))
    }

    /// Validates `image`, then runs `run` once per name in the current mode.
    fn dispatch<'a, S, F>(
        &self,
        image: &'a GrayImage,
        names: &[S],
        run: F,
    ) -> EngineResult<ExecutionBatch<'a>>
    where
        S: AsRef<str> + Sync,
        F: Fn(&str) -> FilterResult + Sync,
    {
        let (width, height) = image.dims();
        trace!(width, height, filters = names.len(), mode = ?self.mode, "FilterExecutor::apply");
        self.validate_source(image)?;

        let start = Instant::now();
        let results: Vec<FilterResult> = match self.mode {
            ExecutionMode::Sequential => names.iter().map(|n| run(n.as_ref())).collect(),
            ExecutionMode::Parallel => names.par_iter().map(|n| run(n.as_ref())).collect(),
        };
        let elapsed = start.elapsed();

        let failed = results.iter().filter(|r| !r.is_ok()).count();
        info!(
            width,
            height,
            requested = names.len(),
            failed,
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            "filter batch complete"
        );

        Ok(ExecutionBatch {
            source: image,
            requested: names.iter().map(|n| n.as_ref().to_string()).collect(),
            results,
            elapsed,
        })
    }

    /// Applies a single filter.
    pub fn apply_one(&self, image: &GrayImage, name: &str) -> EngineResult<FilterResult> {
        self.validate_source(image)?;
        Ok(self.run_named(image, name))
    }

    fn validate_source(&self, image: &GrayImage) -> EngineResult<()> {
        let (width, height) = image.dims();
        let max = self.registry.config().limits.max_dimension;
        if width > max || height > max {
            return Err(EngineError::InvalidSource(format!(
                "{}x{} exceeds the {} pixel limit",
                width, height, max
            )));
        }
        if !image.is_finite() {
            return Err(EngineError::InvalidSource(
                "image contains NaN or infinite samples".into(),
            ));
        }
        Ok(())
    }

    fn run_named(&self, image: &GrayImage, name: &str) -> FilterResult {
        let Some(spec) = self.registry.get(name) else {
            warn!(filter = name, "unknown filter requested");
            return FilterResult::failed(
                name,
                None,
                FilterFailure {
                    kind: FailureKind::UnknownFilter,
                    cause: format!("no filter named '{}'", name),
                },
                Duration::ZERO,
            );
        };

        run_guarded(name, spec.kind(), || spec.run(image))
    }
}

/// Runs one filter, turning a panic or a non-finite result into a failure.
fn run_guarded<F>(name: &str, kind: FilterKind, filter: F) -> FilterResult
where
    F: FnOnce() -> OpsResult<GrayImage>,
{
    let start = Instant::now();
    let outcome = catch_unwind(AssertUnwindSafe(filter));
    let elapsed = start.elapsed();

    let result = match outcome {
        Ok(Ok(out)) if out.is_finite() => FilterResult::success(name, kind, out, elapsed),
        Ok(Ok(_)) => FilterResult::failed(
            name,
            Some(kind),
            FilterFailure {
                kind: FailureKind::UnexpectedFailure,
                cause: "result contains non-finite samples".into(),
            },
            elapsed,
        ),
        Ok(Err(err)) => FilterResult::failed(name, Some(kind), err.into(), elapsed),
        Err(payload) => FilterResult::failed(
            name,
            Some(kind),
            FilterFailure {
                kind: FailureKind::UnexpectedFailure,
                cause: format!("filter panicked: {}", panic_message(payload.as_ref())),
            },
            elapsed,
        ),
    };

    match result.failure() {
        None => debug!(
            filter = %kind,
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            "filter ok"
        ),
        Some(f) => warn!(filter = %kind, cause = %f, "filter failed"),
    }
    result
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
