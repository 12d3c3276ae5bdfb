//! esparse_ast: Syntax tree definitions for the esparse ECMAScript parser.
//!
//! Defines the token-kind enum consumed by scanner and parser, token flag
//! bits, and the externally visible node types. Nodes serialize to the
//! conventional cross-tool AST JSON shape (`type` tag, `start`/`end` byte
//! offsets, optional `loc`).

pub mod node;
pub mod syntax_kind;
pub mod types;

// Re-export key types
pub use node::*;
pub use syntax_kind::SyntaxKind;
pub use types::TokenFlags;
