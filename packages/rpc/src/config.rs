//! Bridge configuration

/// Default namespace for context key/values in transport metadata
pub const DEFAULT_METADATA_PREFIX: &str = "errtrail-kv-";

/// Settings shared by the interceptors and the status conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Prefix put in front of every context key on the wire
    pub metadata_prefix: String,
    /// Attach the request context's key/values to errors a server returns
    pub echo_key_values: bool,
    /// Capture a stack trace where a decoded error enters this process
    pub capture_boundary_trace: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            metadata_prefix: DEFAULT_METADATA_PREFIX.to_string(),
            echo_key_values: true,
            capture_boundary_trace: true,
        }
    }
}

impl BridgeConfig {
    /// Create the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the metadata prefix
    #[must_use]
    pub fn metadata_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.metadata_prefix = prefix.into();
        self
    }

    /// Enable or disable echoing context key/values on server errors
    #[must_use]
    pub fn echo_key_values(mut self, echo: bool) -> Self {
        self.echo_key_values = echo;
        self
    }

    /// Enable or disable boundary trace capture
    ///
    /// Without it decoded errors keep the remote hops only.
    #[must_use]
    pub fn capture_boundary_trace(mut self, capture: bool) -> Self {
        self.capture_boundary_trace = capture;
        self
    }
}
