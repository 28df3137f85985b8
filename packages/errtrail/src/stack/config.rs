//! Stack formatting configuration and its process-wide holder

use super::frame::Frame;
use once_cell::sync::{Lazy, OnceCell};
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;

/// Custom frame renderer
pub type FrameFormatter = Arc<dyn Fn(&Frame) -> String + Send + Sync>;

/// How captured stack traces are filtered and rendered
///
/// Everything except the formatter can be loaded with serde, e.g. from a
/// JSON section of the application config.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct StackConfig {
    /// Drop closure and async block frames
    pub filter_anonymous: bool,
    /// Drop std/core/alloc/runtime frames
    pub trim_runtime: bool,
    /// Render the full source path instead of its last two components
    pub full_path: bool,
    /// Only keep frames whose function lives in one of these crates/modules
    pub allowed_packages: Vec<String>,
    /// Maximum number of frames kept, zero for no limit
    pub max_frames: usize,
    /// Replaces the default `file:line function` rendering
    #[serde(skip)]
    pub formatter: Option<FrameFormatter>,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            filter_anonymous: false,
            trim_runtime: true,
            full_path: false,
            allowed_packages: Vec::new(),
            max_frames: 64,
            formatter: None,
        }
    }
}

impl fmt::Debug for StackConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StackConfig")
            .field("filter_anonymous", &self.filter_anonymous)
            .field("trim_runtime", &self.trim_runtime)
            .field("full_path", &self.full_path)
            .field("allowed_packages", &self.allowed_packages)
            .field("max_frames", &self.max_frames)
            .field("formatter", &self.formatter.as_ref().map(|_| "custom"))
            .finish()
    }
}

impl StackConfig {
    /// Create the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if `json` is not a valid config object.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Drop closure and async block frames
    #[must_use]
    pub fn filter_anonymous(mut self, filter: bool) -> Self {
        self.filter_anonymous = filter;
        self
    }

    /// Drop runtime frames
    #[must_use]
    pub fn trim_runtime(mut self, trim: bool) -> Self {
        self.trim_runtime = trim;
        self
    }

    /// Render full source paths
    #[must_use]
    pub fn full_path(mut self, full: bool) -> Self {
        self.full_path = full;
        self
    }

    /// Allow frames from one more crate or module path
    #[must_use]
    pub fn allow_package(mut self, package: impl Into<String>) -> Self {
        self.allowed_packages.push(package.into());
        self
    }

    /// Cap the number of frames kept
    #[must_use]
    pub fn max_frames(mut self, max: usize) -> Self {
        self.max_frames = max;
        self
    }

    /// Use a custom frame renderer
    #[must_use]
    pub fn formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&Frame) -> String + Send + Sync + 'static,
    {
        self.formatter = Some(Arc::new(formatter));
        self
    }
}

static CONFIG: OnceCell<StackConfig> = OnceCell::new();
static DEFAULT_CONFIG: Lazy<StackConfig> = Lazy::new(StackConfig::default);

/// Install the process-wide stack configuration
///
/// Call once at start-up, before errors are created.
///
/// # Panics
///
/// Panics if a configuration was already installed: traces captured
/// before and after would be formatted differently.
pub fn set_config(config: StackConfig) {
    if CONFIG.set(config).is_err() {
        panic!("errtrail stack configuration already set; it can only be set once per process");
    }
}

/// Whether [`set_config`] has been called
#[must_use]
pub fn configured() -> bool {
    CONFIG.get().is_some()
}

/// The installed configuration, or the default one
#[must_use]
pub fn config() -> &'static StackConfig {
    CONFIG.get().unwrap_or_else(|| &*DEFAULT_CONFIG)
}
