//! esparse_parser: Recursive-descent / precedence-climbing parser for
//! ECMAScript source text.
//!
//! Consumes tokens from [`esparse_scanner`] one at a time and builds the
//! owned, ESTree-shaped tree defined in [`esparse_ast`], enforcing the
//! full set of static legality rules: strict-mode restrictions, binding
//! conflicts, destructuring validity, automatic semicolon insertion, and
//! module vs. script semantics. A parse either returns a complete
//! [`Program`] or fails with exactly one positioned error.

mod context;
mod expressions;
mod parser;
mod patterns;
mod precedence;
mod scope;

pub use esparse_ast::node::Program;
pub use esparse_diagnostics::{ErrorKind, ParseError};
pub use parser::Parser;

/// Configuration for a single parse call.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParserOptions {
    /// Start out in strict mode even without a directive.
    pub strict: bool,
    /// Parse with the module goal symbol (implies strict).
    pub module: bool,
    /// Attach `loc` (1-based line, 0-based column) to every node.
    pub location_tracking: bool,
    /// Reject the annex-B web-compatibility relaxations.
    pub disable_web_compat: bool,
    /// Enable in-progress grammar extensions: logical assignment,
    /// numeric separators, class static blocks.
    pub next_syntax: bool,
}

/// Parse source text with explicit options.
pub fn parse_with_options(source: &str, options: ParserOptions) -> Result<Program, ParseError> {
    Parser::new(source, options).parse_program()
}

/// Parse source text with the script goal symbol.
pub fn parse_script(source: &str) -> Result<Program, ParseError> {
    parse_with_options(source, ParserOptions::default())
}

/// Parse source text with the module goal symbol.
pub fn parse_module(source: &str) -> Result<Program, ParseError> {
    parse_with_options(
        source,
        ParserOptions {
            module: true,
            ..ParserOptions::default()
        },
    )
}
