//! Stack trace capture
//!
//! Captures the calling thread's frames with the `backtrace` crate, drops
//! the frames of the capture machinery itself, then filters and renders the
//! rest according to the process-wide [`StackConfig`].

pub mod config;
pub mod frame;

pub use config::{config, configured, set_config, FrameFormatter, StackConfig};
pub use frame::Frame;

use once_cell::sync::Lazy;

/// Frames belonging to the capture path, skipped before `skip` is applied
///
/// Includes the rpc bridge, so a boundary trace starts at the code that
/// made the call.
#[cfg(feature = "full-backtrace")]
const INTERNAL_MARKERS: &[&str] = &[
    "errtrail::stack::",
    "errtrail::error::constructors::",
    "errtrail::error::extensions::",
    "errtrail_rpc::bridge::",
    "errtrail_rpc::stream::",
    "errtrail_rpc::interceptor::",
];

static BINARY_NAME: Lazy<String> = Lazy::new(|| {
    std::env::current_exe()
        .ok()
        .and_then(|path| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .or_else(|| std::env::args().next())
        .unwrap_or_else(|| "unknown".to_string())
});

/// Name of the running binary, as recorded on captured traces
#[must_use]
pub fn binary_name() -> &'static str {
    BINARY_NAME.as_str()
}

/// Capture the current stack with the process-wide configuration
///
/// `skip` drops that many caller frames after the capture machinery.
#[must_use]
pub fn capture(skip: usize) -> Vec<String> {
    capture_with(skip, config())
}

/// Capture the current stack with an explicit configuration
#[must_use]
pub fn capture_with(skip: usize, config: &StackConfig) -> Vec<String> {
    let mut kept: Vec<String> = capture_frames(skip)
        .into_iter()
        .filter(|frame| frame.is_kept(config))
        .map(|frame| frame.render(config))
        .collect();
    if config.max_frames > 0 {
        kept.truncate(config.max_frames);
    }
    kept
}

/// Resolve the current stack into unfiltered frames, innermost first
#[cfg(feature = "full-backtrace")]
#[must_use]
pub fn capture_frames(skip: usize) -> Vec<Frame> {
    let backtrace = backtrace::Backtrace::new();
    let frames = backtrace
        .frames()
        .iter()
        .flat_map(|frame| frame.symbols())
        .map(|symbol| Frame {
            function: symbol
                .name()
                .map(|name| format!("{name:#}"))
                .unwrap_or_default(),
            file: symbol
                .filename()
                .map(|path| path.display().to_string())
                .unwrap_or_default(),
            line: symbol.lineno().unwrap_or_default(),
        });

    frames
        .skip_while(is_internal)
        .skip(skip)
        .collect()
}

/// Stack capture is compiled out without the `full-backtrace` feature
#[cfg(not(feature = "full-backtrace"))]
#[must_use]
pub fn capture_frames(_skip: usize) -> Vec<Frame> {
    Vec::new()
}

/// Leading frames to drop: the capture path and the std adapters
/// (`map_err`, `FnOnce::call_once`) it is reached through
#[cfg(feature = "full-backtrace")]
fn is_internal(frame: &Frame) -> bool {
    frame.function.is_empty()
        || frame.is_runtime()
        || INTERNAL_MARKERS.iter().any(|m| frame.function.contains(m))
}
