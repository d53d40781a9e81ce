//! HTTP serving subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, tracing layer)
//!     → security interceptor (reject, redirect or continue)
//!     → application router
//!     → security headers added to the response
//!     → Send to client
//! ```

pub mod server;

pub use server::HttpServer;
