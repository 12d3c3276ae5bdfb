//! esparse_core: Core utilities for the esparse ECMAScript parser.
//!
//! Provides text spans and the line map used for byte-offset to
//! line/column conversion throughout the pipeline.

pub mod text;

// Re-export commonly used types
pub use text::{LineAndColumn, LineMap, SourceLocation, TextSpan};
