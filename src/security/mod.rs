//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     PolicyConfiguration → headers.rs (validate, compile header values)
//!                         → interceptor.rs (SecureInterceptor)
//!
//! Incoming request:
//!     → hosts.rs (allow-list, production only)
//!     → transport.rs (secure detection, HTTPS redirect)
//!     → next handler
//!     → headers.rs (write compiled headers)
//! ```
//!
//! # Design Decisions
//! - Fail closed at startup: an invalid policy never serves a request
//! - Enforcement only in production; content headers in every mode

pub mod headers;
pub mod hosts;
pub mod interceptor;
pub mod transport;

pub use headers::SecurityHeaders;
pub use interceptor::{secure_headers_middleware, Decision, SecureInterceptor};
pub use transport::TlsConnection;
