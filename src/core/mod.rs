//! Core application primitives (runtime loop, HTTP API)

pub mod http;
pub mod runtime;

pub use http::*;
pub use runtime::*;
