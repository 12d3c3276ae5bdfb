//! Token information produced by the scanner.

use esparse_ast::syntax_kind::SyntaxKind;
use esparse_ast::types::TokenFlags;

/// A snapshot of the scanner's current token.
#[derive(Debug, Clone)]
pub struct TokenInfo {
    /// The kind of token.
    pub kind: SyntaxKind,
    /// Start byte offset in the source text.
    pub pos: u32,
    /// End byte offset in the source text (exclusive).
    pub end: u32,
    /// The cooked value (for identifiers and literals).
    pub value: String,
    /// Token flags (preceding line break, numeric format, etc.).
    pub flags: TokenFlags,
}

impl TokenInfo {
    /// The length of this token in bytes.
    pub fn len(&self) -> u32 {
        self.end - self.pos
    }

    /// Whether this token has zero length.
    pub fn is_empty(&self) -> bool {
        self.pos == self.end
    }

    /// Whether there was a line break before this token.
    pub fn has_preceding_line_break(&self) -> bool {
        self.flags.contains(TokenFlags::PRECEDING_LINE_BREAK)
    }
}
