//! Simulation utilities.
//!
//! Provides the request trace format used to drive a hierarchy from a file.

/// Request trace format and loaders.
pub mod trace;

pub use trace::{TraceError, load_trace, parse_number, parse_trace};
