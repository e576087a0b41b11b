//! Shared utilities for the boarding-pass tools.

pub mod logging;

pub use logging::{init_tracing, LogFormat, UnknownLogFormat};
