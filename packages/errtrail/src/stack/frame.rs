//! Call-frame descriptors and the filters applied to them

use super::config::StackConfig;
use std::fmt;

/// One resolved call frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    /// Demangled function path without the trailing hash
    pub function: String,
    /// Source file, empty when the symbol has no debug info
    pub file: String,
    /// Line number, zero when unknown
    pub line: u32,
}

/// Symbol prefixes of the standard library, the async runtime and the
/// unwinder itself
const RUNTIME_PREFIXES: &[&str] = &[
    "std::",
    "core::",
    "alloc::",
    "backtrace::",
    "test::",
    "tokio::",
    "futures_util::",
    "futures_executor::",
    "__rust",
    "rust_begin_unwind",
    "__libc_start",
    "_start",
    "start_thread",
    "__clone",
];

const UNKNOWN_FILE: &str = "<unknown>";

const ANONYMOUS_MARKERS: &[&str] = &["{{closure}}", "{{async_block}}", "{{async_fn_body}}"];

impl Frame {
    /// Whether the frame belongs to the runtime rather than user code
    ///
    /// Decided by symbol name alone, so builds without debug info keep
    /// their own frames.
    #[must_use]
    pub fn is_runtime(&self) -> bool {
        let name = self.function.trim_start_matches('<');
        RUNTIME_PREFIXES.iter().any(|p| name.starts_with(p))
    }

    /// Whether the frame is a closure or async block body
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        ANONYMOUS_MARKERS.iter().any(|m| self.function.contains(m))
    }

    /// Whether the frame's function lives in one of `packages`
    ///
    /// An empty list allows everything.
    #[must_use]
    pub fn in_packages(&self, packages: &[String]) -> bool {
        if packages.is_empty() {
            return true;
        }
        let name = self.function.trim_start_matches('<');
        packages.iter().any(|pkg| {
            name.strip_prefix(pkg.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
        })
    }

    /// Whether `config` keeps this frame
    #[must_use]
    pub fn is_kept(&self, config: &StackConfig) -> bool {
        if config.trim_runtime && self.is_runtime() {
            return false;
        }
        if config.filter_anonymous && self.is_anonymous() {
            return false;
        }
        self.in_packages(&config.allowed_packages)
    }

    /// Render with the configured formatter, or `file:line function`
    ///
    /// A frame without debug info renders as `<unknown>:0 function`.
    #[must_use]
    pub fn render(&self, config: &StackConfig) -> String {
        if let Some(formatter) = &config.formatter {
            return formatter(self);
        }
        let file = if self.file.is_empty() {
            UNKNOWN_FILE
        } else if config.full_path {
            self.file.as_str()
        } else {
            shorten_path(&self.file)
        };
        format!("{file}:{} {}", self.line, self.function)
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = if self.file.is_empty() {
            UNKNOWN_FILE
        } else {
            self.file.as_str()
        };
        write!(f, "{file}:{} {}", self.line, self.function)
    }
}

/// Keep the last two path components
fn shorten_path(path: &str) -> &str {
    let mut separators = path.rmatch_indices(['/', '\\']).map(|(i, _)| i);
    separators.next();
    match separators.next() {
        Some(index) => &path[index + 1..],
        None => path,
    }
}
