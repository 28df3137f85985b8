//! Carries errtrail errors and request key/values across RPC boundaries
//!
//! The transport itself stays outside this crate. What it provides:
//! - [`Status`] objects with opaque detail payloads
//! - Conversion of errors into statuses and back ([`to_status`],
//!   [`from_transport`]), adding a hop each time an error crosses in
//! - Cancellation and deadline sentinels mapped onto dedicated categories
//! - Client and server interceptors for single and streaming calls that
//!   move context key/values through transport metadata

pub mod bridge;
pub mod config;
pub mod context;
pub mod interceptor;
pub mod metadata;
pub mod status;
pub mod stream;

pub use bridge::{
    error_detail, from_status, from_status_with, from_transport, from_transport_with,
    hops_detail, status_code, to_status, BoxError, DetailError,
};
pub use config::{BridgeConfig, DEFAULT_METADATA_PREFIX};
pub use context::{canceled, deadline_exceeded, Context, CANCELED_CODE, DEADLINE_EXCEEDED_CODE};
pub use interceptor::{ClientInterceptor, Request, ServerInterceptor};
pub use metadata::Metadata;
pub use status::{Code, Detail, Status, ERROR_TYPE_URL, HOPS_TYPE_URL};
pub use stream::{ClientStream, RawStream, ServerStream};
