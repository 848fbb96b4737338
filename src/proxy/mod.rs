//! Proxying subsystem.
//!
//! # Data Flow
//! ```text
//! Validated request (parts + body)
//!     → forwarder.rs (URI rewrite, header mirroring, upstream call)
//!     → http::response::relay (status, headers, streamed body)
//!     → Send to client
//! ```

pub mod forwarder;

pub use forwarder::Forwarder;
