//! Token flag bits set by the scanner and consulted by the parser.

bitflags::bitflags! {
    /// Flags describing the current token.
    ///
    /// Numeric-format and escape flags let the parser re-validate tokens
    /// lazily: a legacy octal literal scans fine in sloppy mode and only
    /// becomes an error if the surrounding code turns out to be strict.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TokenFlags: u32 {
        const NONE                   = 0;
        /// A line terminator occurred between the previous token and this one.
        const PRECEDING_LINE_BREAK   = 1 << 0;
        /// The token contains a `\u` escape (identifiers: decoded form).
        const UNICODE_ESCAPE         = 1 << 1;
        /// `0x`-prefixed numeric literal.
        const HEX_SPECIFIER          = 1 << 2;
        /// `0b`-prefixed numeric literal.
        const BINARY_SPECIFIER       = 1 << 3;
        /// `0o`-prefixed numeric literal.
        const OCTAL_SPECIFIER        = 1 << 4;
        /// Legacy `0`-prefixed octal literal (`0644`), strict-illegal.
        const LEGACY_OCTAL           = 1 << 5;
        /// Legacy decimal with leading zero (`08`, `09`), strict-illegal.
        const NON_OCTAL_DECIMAL      = 1 << 6;
        /// Exponent part present.
        const SCIENTIFIC             = 1 << 7;
        /// Numeric separator (`_`) present.
        const CONTAINS_SEPARATOR     = 1 << 8;
        /// String contains a legacy octal escape (`\07`), strict-illegal.
        const OCTAL_ESCAPE           = 1 << 9;
        /// String contains `\8` or `\9`, strict-illegal.
        const EIGHT_NINE_ESCAPE      = 1 << 10;
        /// Template chunk contains an invalid escape (cooked value absent).
        const INVALID_TEMPLATE_ESCAPE = 1 << 11;
    }
}

impl TokenFlags {
    /// Flags that make a numeric literal or string escape illegal once the
    /// surrounding code is known to be strict.
    pub const STRICT_ILLEGAL: TokenFlags = TokenFlags::LEGACY_OCTAL
        .union(TokenFlags::NON_OCTAL_DECIMAL)
        .union(TokenFlags::OCTAL_ESCAPE)
        .union(TokenFlags::EIGHT_NINE_ESCAPE);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_illegal_set() {
        assert!(TokenFlags::STRICT_ILLEGAL.contains(TokenFlags::LEGACY_OCTAL));
        assert!(TokenFlags::STRICT_ILLEGAL.contains(TokenFlags::EIGHT_NINE_ESCAPE));
        assert!(!TokenFlags::STRICT_ILLEGAL.contains(TokenFlags::HEX_SPECIFIER));
    }
}
