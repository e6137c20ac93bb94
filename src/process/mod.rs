//! Document-level processing.
//!
//! [`pipeline`] wires the parser and format stages into the [`Formatter`]
//! object that callers construct per configuration.

pub mod pipeline;

pub use pipeline::{FormatOutcome, Formatter};
