//! Observability for NFTOpt
//!
//! Structured logging setup shared by the binary and tests. Log level is
//! controlled via `RUST_LOG`.

pub mod logging;

pub use logging::{init_logging, LogFormat};
