//! esparse_diagnostics: Error kinds and positioned parse errors.
//!
//! The parser is fail-fast: the first violation aborts the parse, so an
//! error here is always fatal to its parse call. Two kinds exist: lexical
//! errors (malformed tokens) and syntax errors (well-formed tokens in an
//! illegal arrangement). There is no warning tier.

use esparse_core::text::{LineAndColumn, TextPos, TextSpan};
use std::fmt;
use thiserror::Error;

/// The two fatal error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A malformed token: bad escape, unterminated literal, invalid
    /// numeric syntax, invalid character.
    Lexical,
    /// Well-formed tokens in an illegal arrangement: unexpected token,
    /// binding conflict, strict-mode violation, illegal pattern or label.
    Syntax,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Lexical => write!(f, "LexicalError"),
            ErrorKind::Syntax => write!(f, "SyntaxError"),
        }
    }
}

/// A diagnostic message template with a stable code and kind.
#[derive(Debug, Clone, Copy)]
pub struct Message {
    /// The stable error code (1xxx lexical, 2xxx syntax).
    pub code: u32,
    /// The kind of error this message produces.
    pub kind: ErrorKind,
    /// The message template. May contain `{0}`, `{1}` placeholders.
    pub text: &'static str,
}

/// Format a message template by replacing `{0}`, `{1}`, etc. with arguments.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{}}}", i), arg);
    }
    result
}

fn render(
    kind: &ErrorKind,
    message: &str,
    start: &TextPos,
    loc: &Option<LineAndColumn>,
) -> String {
    match loc {
        Some(lc) => format!("{}: {} ({}:{})", kind, message, lc.line, lc.column),
        None => format!("{}: {} (at offset {})", kind, message, start),
    }
}

/// A realized, positioned parse error. Fatal to the parse that raised it.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}", render(.kind, .message, .start, .loc))]
pub struct ParseError {
    /// Lexical or syntax.
    pub kind: ErrorKind,
    /// The stable code of the message this error was built from.
    pub code: u32,
    /// The resolved message text.
    pub message: String,
    /// Byte offset of the offending source range.
    pub start: TextPos,
    /// Exclusive end byte offset of the offending source range.
    pub end: TextPos,
    /// Line/column of `start`, present when location tracking is active.
    pub loc: Option<LineAndColumn>,
}

impl ParseError {
    /// Build an error from a message template at a source range.
    pub fn new(message: &Message, args: &[&str], start: TextPos, end: TextPos) -> Self {
        Self {
            kind: message.kind,
            code: message.code,
            message: format_message(message.text, args),
            start,
            end,
            loc: None,
        }
    }

    /// Attach line/column information.
    pub fn with_loc(mut self, loc: LineAndColumn) -> Self {
        self.loc = Some(loc);
        self
    }

    /// The offending source range as a span.
    pub fn span(&self) -> TextSpan {
        TextSpan::from_bounds(self.start, self.end.max(self.start))
    }

    /// Whether this is a lexical (tokenizer-level) error.
    pub fn is_lexical(&self) -> bool {
        self.kind == ErrorKind::Lexical
    }
}

// ============================================================================
// Message table
// ============================================================================

pub mod messages {
    use super::*;

    macro_rules! diag {
        ($code:expr, Lexical, $msg:expr) => {
            Message { code: $code, kind: ErrorKind::Lexical, text: $msg }
        };
        ($code:expr, Syntax, $msg:expr) => {
            Message { code: $code, kind: ErrorKind::Syntax, text: $msg }
        };
    }

    // ========================================================================
    // Lexical errors (1000-1099)
    // ========================================================================
    pub const UNTERMINATED_STRING: Message = diag!(1002, Lexical, "Unterminated string constant.");
    pub const UNTERMINATED_TEMPLATE: Message = diag!(1003, Lexical, "Unterminated template literal.");
    pub const UNTERMINATED_REGEXP: Message = diag!(1004, Lexical, "Unterminated regular expression literal.");
    pub const UNTERMINATED_COMMENT: Message = diag!(1005, Lexical, "Unterminated comment.");
    pub const INVALID_CHARACTER: Message = diag!(1006, Lexical, "Invalid character.");
    pub const INVALID_ESCAPE: Message = diag!(1007, Lexical, "Invalid escape sequence.");
    pub const INVALID_UNICODE_ESCAPE: Message = diag!(1008, Lexical, "Invalid Unicode escape sequence.");
    pub const INVALID_HEX_ESCAPE: Message = diag!(1009, Lexical, "Invalid hexadecimal escape sequence.");
    pub const CODE_POINT_OUT_OF_RANGE: Message = diag!(1010, Lexical, "Unicode code point must not be greater than 0x10FFFF.");
    pub const IDENTIFIER_AFTER_NUMBER: Message = diag!(1011, Lexical, "Identifier directly after number.");
    pub const DIGIT_EXPECTED: Message = diag!(1012, Lexical, "Digit expected.");
    pub const HEX_DIGIT_EXPECTED: Message = diag!(1013, Lexical, "Hexadecimal digit expected.");
    pub const BINARY_DIGIT_EXPECTED: Message = diag!(1014, Lexical, "Binary digit expected.");
    pub const OCTAL_DIGIT_EXPECTED: Message = diag!(1015, Lexical, "Octal digit expected.");
    pub const INVALID_BIGINT: Message = diag!(1016, Lexical, "Invalid BigInt literal.");
    pub const SEPARATOR_NOT_ALLOWED: Message = diag!(1017, Lexical, "Numeric separator is not allowed here.");
    pub const INVALID_REGEXP_FLAG: Message = diag!(1018, Lexical, "Invalid regular expression flag.");

    // ========================================================================
    // General syntax errors (2000-2049)
    // ========================================================================
    pub const UNEXPECTED_TOKEN: Message = diag!(2000, Syntax, "Unexpected token '{0}'.");
    pub const UNEXPECTED_EOF: Message = diag!(2001, Syntax, "Unexpected end of input.");
    pub const TOKEN_EXPECTED: Message = diag!(2002, Syntax, "'{0}' expected.");
    pub const IDENTIFIER_EXPECTED: Message = diag!(2003, Syntax, "Identifier expected.");
    pub const UNEXPECTED_RESERVED: Message = diag!(2004, Syntax, "Unexpected reserved word '{0}'.");
    pub const ESCAPED_KEYWORD: Message = diag!(2005, Syntax, "Keyword must not contain escaped characters.");
    pub const EXPRESSION_EXPECTED: Message = diag!(2006, Syntax, "Expression expected.");
    pub const PROPERTY_NAME_EXPECTED: Message = diag!(2007, Syntax, "Property name expected.");
    pub const STATEMENT_EXPECTED: Message = diag!(2008, Syntax, "Declaration or statement expected.");
    pub const RECURSION_LIMIT: Message = diag!(2009, Syntax, "Maximum parse depth exceeded.");

    // ========================================================================
    // Restricted productions and ASI (2050-2069)
    // ========================================================================
    pub const NEWLINE_AFTER_THROW: Message = diag!(2050, Syntax, "Illegal newline after 'throw'.");
    pub const NEWLINE_BEFORE_ARROW: Message = diag!(2051, Syntax, "No line break is allowed before '=>'.");

    // ========================================================================
    // Statements and labels (2070-2099)
    // ========================================================================
    pub const ILLEGAL_RETURN: Message = diag!(2070, Syntax, "A 'return' statement can only be used within a function body.");
    pub const ILLEGAL_BREAK: Message = diag!(2071, Syntax, "A 'break' statement can only be used within an enclosing iteration or switch statement.");
    pub const ILLEGAL_CONTINUE: Message = diag!(2072, Syntax, "A 'continue' statement can only be used within an enclosing iteration statement.");
    pub const UNDEFINED_LABEL: Message = diag!(2073, Syntax, "Undefined label '{0}'.");
    pub const CONTINUE_NOT_ITERATION_LABEL: Message = diag!(2074, Syntax, "A 'continue' statement can only jump to a label of an enclosing iteration statement.");
    pub const DUPLICATE_LABEL: Message = diag!(2075, Syntax, "Label '{0}' has already been declared.");
    pub const MULTIPLE_DEFAULTS: Message = diag!(2076, Syntax, "More than one 'default' clause in a 'switch' statement.");
    pub const STRICT_WITH: Message = diag!(2077, Syntax, "'with' statements are not allowed in strict mode.");
    pub const LEXICAL_SINGLE_STATEMENT: Message = diag!(2078, Syntax, "Lexical declaration cannot appear in a single-statement context.");
    pub const CLASS_SINGLE_STATEMENT: Message = diag!(2079, Syntax, "Class declaration cannot appear in a single-statement context.");
    pub const GENERATOR_SINGLE_STATEMENT: Message = diag!(2080, Syntax, "Generators can only be declared at the top level or inside a block.");
    pub const FUNCTION_SINGLE_STATEMENT: Message = diag!(2081, Syntax, "Function declaration cannot appear in a single-statement context.");
    pub const LABELLED_FUNCTION: Message = diag!(2082, Syntax, "Labelled function declaration is not allowed here.");

    // ========================================================================
    // Declarations and bindings (2100-2129)
    // ========================================================================
    pub const DUPLICATE_BINDING: Message = diag!(2100, Syntax, "Identifier '{0}' has already been declared.");
    pub const DUPLICATE_PARAMETER: Message = diag!(2101, Syntax, "Duplicate parameter name not allowed in this context.");
    pub const CONST_WITHOUT_INIT: Message = diag!(2102, Syntax, "Missing initializer in 'const' declaration.");
    pub const LET_IN_LEXICAL_BINDING: Message = diag!(2103, Syntax, "'let' is disallowed as a lexically bound name.");
    pub const FOR_IN_INITIALIZER: Message = diag!(2104, Syntax, "The variable declaration of a 'for...in' statement cannot have an initializer.");
    pub const FOR_OF_INITIALIZER: Message = diag!(2105, Syntax, "The variable declaration of a 'for...of' statement cannot have an initializer.");
    pub const FOR_IN_OF_SINGLE_DECLARATION: Message = diag!(2106, Syntax, "Only a single declaration is allowed in a 'for...in' or 'for...of' statement.");
    pub const FOR_OF_LET: Message = diag!(2107, Syntax, "The left-hand side of a 'for...of' statement may not start with 'let'.");
    pub const INVALID_FOR_LHS: Message = diag!(2108, Syntax, "Invalid left-hand side in 'for' loop.");

    // ========================================================================
    // Patterns and assignment targets (2130-2159)
    // ========================================================================
    pub const INVALID_ASSIGNMENT_TARGET: Message = diag!(2130, Syntax, "Invalid left-hand side in assignment.");
    pub const INVALID_BINDING_TARGET: Message = diag!(2131, Syntax, "Invalid binding pattern target.");
    pub const INVALID_DESTRUCTURING_TARGET: Message = diag!(2132, Syntax, "Invalid destructuring assignment target.");
    pub const REST_MUST_BE_LAST: Message = diag!(2133, Syntax, "A rest element must be last in a destructuring pattern.");
    pub const REST_WITH_DEFAULT: Message = diag!(2134, Syntax, "A rest element cannot have an initializer.");
    pub const COMMA_AFTER_REST: Message = diag!(2135, Syntax, "A comma is not permitted after the rest element.");
    pub const INVALID_COVER_INITIALIZER: Message = diag!(2136, Syntax, "Shorthand property assignments are valid only in destructuring patterns.");
    pub const INVALID_INCREMENT_TARGET: Message = diag!(2137, Syntax, "The operand of an increment or decrement operator must be a variable or a property access.");
    pub const PARENTHESIZED_PATTERN: Message = diag!(2138, Syntax, "A parenthesized expression cannot be a destructuring pattern.");
    pub const DUPLICATE_PROTO: Message = diag!(2139, Syntax, "Duplicate '__proto__' property in object literal is not allowed.");

    // ========================================================================
    // Strict mode (2160-2189)
    // ========================================================================
    pub const STRICT_EVAL_ARGUMENTS: Message = diag!(2160, Syntax, "Unexpected 'eval' or 'arguments' in strict mode.");
    pub const STRICT_OCTAL: Message = diag!(2161, Syntax, "Octal literals are not allowed in strict mode.");
    pub const STRICT_DECIMAL_WITH_LEADING_ZERO: Message = diag!(2162, Syntax, "Decimals with leading zeros are not allowed in strict mode.");
    pub const STRICT_OCTAL_ESCAPE: Message = diag!(2163, Syntax, "Octal escape sequences are not allowed in strict mode.");
    pub const STRICT_EIGHT_NINE_ESCAPE: Message = diag!(2164, Syntax, "'\\8' and '\\9' are not allowed in strict mode.");
    pub const STRICT_DELETE: Message = diag!(2165, Syntax, "'delete' of an unqualified identifier in strict mode.");
    pub const OCTAL_IN_DIRECTIVE: Message = diag!(2166, Syntax, "Octal escape sequences are not allowed in a directive prologue.");
    pub const ILLEGAL_USE_STRICT: Message = diag!(2167, Syntax, "Illegal 'use strict' directive in function with non-simple parameter list.");

    // ========================================================================
    // Functions, arrows, classes (2190-2229)
    // ========================================================================
    pub const GETTER_PARAMETERS: Message = diag!(2190, Syntax, "A 'get' accessor cannot have parameters.");
    pub const SETTER_PARAMETERS: Message = diag!(2191, Syntax, "A 'set' accessor must have exactly one parameter.");
    pub const SETTER_REST_PARAMETER: Message = diag!(2192, Syntax, "A 'set' accessor cannot have a rest parameter.");
    pub const YIELD_IN_PARAMETERS: Message = diag!(2193, Syntax, "A 'yield' expression cannot be used in a parameter initializer.");
    pub const AWAIT_IN_PARAMETERS: Message = diag!(2194, Syntax, "An 'await' expression cannot be used in a parameter initializer.");
    pub const FOR_AWAIT_OUTSIDE_ASYNC: Message = diag!(2195, Syntax, "'for await' is only allowed within async functions and at the top levels of modules.");
    pub const DUPLICATE_CONSTRUCTOR: Message = diag!(2197, Syntax, "A class may only have one constructor.");
    pub const CONSTRUCTOR_SPECIAL_METHOD: Message = diag!(2198, Syntax, "Class constructor may not be an accessor, generator, or async method.");
    pub const STATIC_PROTOTYPE: Message = diag!(2199, Syntax, "Classes may not have a static property named 'prototype'.");
    pub const CONSTRUCTOR_CLASS_FIELD: Message = diag!(2200, Syntax, "Classes may not have a field named 'constructor'.");
    pub const DELETE_PRIVATE_FIELD: Message = diag!(2201, Syntax, "Private fields cannot be deleted.");
    pub const PRIVATE_NAME_OUTSIDE_CLASS: Message = diag!(2202, Syntax, "Private names are only allowed in property accesses inside a class body.");
    pub const CONSTRUCTOR_PRIVATE_NAME: Message = diag!(2203, Syntax, "'#constructor' is not a valid private name.");
    pub const SUPER_OUTSIDE_METHOD: Message = diag!(2204, Syntax, "'super' keyword is not allowed here.");
    pub const SUPER_CALL_OUTSIDE_CONSTRUCTOR: Message = diag!(2205, Syntax, "Super calls are only permitted in derived-class constructors.");
    pub const NEW_TARGET_OUTSIDE_FUNCTION: Message = diag!(2206, Syntax, "'new.target' expression is only allowed within functions and class bodies.");
    pub const INVALID_META_PROPERTY: Message = diag!(2207, Syntax, "The only valid meta property for 'new' is 'new.target'.");
    pub const ARGUMENTS_IN_CLASS_FIELD: Message = diag!(2208, Syntax, "'arguments' is not allowed in class field initializers or static initialization blocks.");

    // ========================================================================
    // Optional chaining, new, templates (2230-2249)
    // ========================================================================
    pub const NEW_OPTIONAL_CHAIN: Message = diag!(2230, Syntax, "Invalid optional chain from new expression.");
    pub const TAGGED_TEMPLATE_OPTIONAL_CHAIN: Message = diag!(2231, Syntax, "Invalid tagged template on optional chain.");

    // ========================================================================
    // Modules (2250-2279)
    // ========================================================================
    pub const IMPORT_OUTSIDE_MODULE: Message = diag!(2250, Syntax, "'import' and 'export' may appear only with 'sourceType: module'.");
    pub const IMPORT_META_OUTSIDE_MODULE: Message = diag!(2251, Syntax, "Cannot use 'import.meta' outside a module.");
    pub const DUPLICATE_EXPORT: Message = diag!(2252, Syntax, "Duplicate export '{0}'.");
    pub const MODULE_STRING_NAME_UNPAIRED: Message = diag!(2253, Syntax, "A string literal cannot be used as an exported binding without 'from'.");
    pub const IMPORT_CALL_ARITY: Message = diag!(2254, Syntax, "An 'import()' call must have exactly one argument.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_message() {
        assert_eq!(
            format_message("Unexpected token '{0}'.", &["=>"]),
            "Unexpected token '=>'."
        );
        assert_eq!(format_message("no args", &[]), "no args");
    }

    #[test]
    fn test_error_display_with_offset() {
        let err = ParseError::new(&messages::UNEXPECTED_EOF, &[], 12, 12);
        assert_eq!(err.kind, ErrorKind::Syntax);
        assert!(err.to_string().contains("Unexpected end of input"));
        assert!(err.to_string().contains("offset 12"));
    }

    #[test]
    fn test_error_display_with_loc() {
        let err = ParseError::new(&messages::UNTERMINATED_STRING, &[], 3, 5)
            .with_loc(LineAndColumn::new(1, 3));
        assert!(err.is_lexical());
        assert!(err.to_string().contains("(1:3)"));
    }
}
