//! esparse_scanner: Lexer/tokenizer for ECMAScript source text.
//!
//! Produces one token per `scan()` call, with byte offsets into the UTF-8
//! source, cooked literal values, and the flags the parser needs for ASI
//! and lazy strict-mode re-validation. Supports:
//! - All ECMAScript token types through ES2022
//! - Template literals (head/middle/tail chunks with rescan continuation)
//! - Regular expression literals (rescan from `/` or `/=`)
//! - Unicode identifiers with `\u` escapes
//! - Legacy (annex B) numeric and escape forms, flagged for the parser

mod char_codes;
mod scanner;
mod token;

pub use scanner::{Scanner, ScannerState};
pub use token::TokenInfo;
