//! Scanner integration tests.
//!
//! Verifies tokenization of full constructs: token streams, byte
//! offsets, and the flags the parser relies on.

use esparse_ast::syntax_kind::SyntaxKind;
use esparse_ast::types::TokenFlags;
use esparse_scanner::Scanner;

/// Helper: scan all tokens and return (kind, value) pairs.
fn scan_all(source: &str) -> Vec<(SyntaxKind, String)> {
    let mut scanner = Scanner::new(source, false, true, false);
    let mut tokens = Vec::new();
    loop {
        let kind = scanner.scan().expect("scan failed");
        if kind == SyntaxKind::EndOfFileToken {
            break;
        }
        tokens.push((kind, scanner.token_value().to_string()));
    }
    tokens
}

/// Helper: scan all token kinds.
fn scan_kinds(source: &str) -> Vec<SyntaxKind> {
    scan_all(source).into_iter().map(|(k, _)| k).collect()
}

#[test]
fn test_empty_source() {
    assert!(scan_all("").is_empty());
    assert!(scan_all("   \n\t  ").is_empty());
}

#[test]
fn test_statement_token_stream() {
    assert_eq!(
        scan_kinds("let x = 42;"),
        vec![
            SyntaxKind::LetKeyword,
            SyntaxKind::Identifier,
            SyntaxKind::EqualsToken,
            SyntaxKind::NumericLiteral,
            SyntaxKind::SemicolonToken,
        ]
    );
}

#[test]
fn test_byte_offsets_with_multibyte_source() {
    // "π" is two bytes; offsets are byte offsets.
    let mut scanner = Scanner::new("π = 1;", false, true, false);
    assert_eq!(scanner.scan().unwrap(), SyntaxKind::Identifier);
    assert_eq!(scanner.token_start(), 0);
    assert_eq!(scanner.token_end(), 2);
    assert_eq!(scanner.scan().unwrap(), SyntaxKind::EqualsToken);
    assert_eq!(scanner.token_start(), 3);
}

#[test]
fn test_keywords_vs_contextual_words() {
    assert_eq!(
        scan_kinds("async of static get from"),
        vec![SyntaxKind::Identifier; 5]
    );
    assert_eq!(
        scan_kinds("enum instanceof typeof"),
        vec![
            SyntaxKind::EnumKeyword,
            SyntaxKind::InstanceOfKeyword,
            SyntaxKind::TypeOfKeyword,
        ]
    );
}

#[test]
fn test_string_values_are_cooked() {
    let tokens = scan_all(r#"'a\tb' "\u0041\u{42}""#);
    assert_eq!(tokens[0].1, "a\tb");
    assert_eq!(tokens[1].1, "AB");
}

#[test]
fn test_template_token_sequence() {
    let mut scanner = Scanner::new("`x${a}y${b}z`", false, true, false);
    assert_eq!(scanner.scan().unwrap(), SyntaxKind::TemplateHead);
    assert_eq!(scanner.scan().unwrap(), SyntaxKind::Identifier);
    assert_eq!(scanner.scan().unwrap(), SyntaxKind::CloseBraceToken);
    assert_eq!(scanner.rescan_template_token().unwrap(), SyntaxKind::TemplateMiddle);
    assert_eq!(scanner.template_cooked(), Some("y"));
    assert_eq!(scanner.scan().unwrap(), SyntaxKind::Identifier);
    assert_eq!(scanner.scan().unwrap(), SyntaxKind::CloseBraceToken);
    assert_eq!(scanner.rescan_template_token().unwrap(), SyntaxKind::TemplateTail);
    assert_eq!(scanner.template_cooked(), Some("z"));
}

#[test]
fn test_template_cr_normalization() {
    let mut scanner = Scanner::new("`a\r\nb`", false, true, false);
    scanner.scan().unwrap();
    assert_eq!(scanner.template_cooked(), Some("a\nb"));
}

#[test]
fn test_line_break_flags_through_comments() {
    let mut scanner = Scanner::new("a /* x\ny */ b", false, true, false);
    scanner.scan().unwrap();
    assert!(!scanner.has_preceding_line_break());
    scanner.scan().unwrap();
    assert!(scanner.has_preceding_line_break());
}

#[test]
fn test_regex_rescan_from_division() {
    let mut scanner = Scanner::new("/=start/y", false, true, false);
    assert_eq!(scanner.scan().unwrap(), SyntaxKind::SlashEqualsToken);
    assert_eq!(
        scanner.rescan_slash_token().unwrap(),
        SyntaxKind::RegularExpressionLiteral
    );
    assert_eq!(scanner.regex_pattern(), "=start");
    assert_eq!(scanner.regex_flags(), "y");
}

#[test]
fn test_numeric_flags() {
    let mut scanner = Scanner::new("0755", false, true, false);
    scanner.scan().unwrap();
    assert!(scanner.token_flags().contains(TokenFlags::LEGACY_OCTAL));
    assert_eq!(scanner.token_number(), 493.0);

    let mut scanner = Scanner::new("1e-3", false, true, false);
    scanner.scan().unwrap();
    assert!(scanner.token_flags().contains(TokenFlags::SCIENTIFIC));
    assert_eq!(scanner.token_number(), 0.001);
}

#[test]
fn test_lexical_errors() {
    for source in ["'abc", "`abc", "/* abc", "\"\\u{}\"", "3in", "0b2", "@"] {
        let mut scanner = Scanner::new(source, false, true, false);
        let mut result = scanner.scan();
        // Some inputs fail on a later token.
        while let Ok(kind) = result {
            if kind == SyntaxKind::EndOfFileToken {
                panic!("expected lexical error: {source}");
            }
            result = scanner.scan();
        }
        assert!(result.unwrap_err().is_lexical(), "{source}");
    }
}

#[test]
fn test_private_names_and_hashbang() {
    let mut scanner = Scanner::new("#!/bin/node\nobj.#field", false, true, false);
    scanner.skip_hashbang();
    assert_eq!(scanner.scan().unwrap(), SyntaxKind::Identifier);
    assert_eq!(scanner.scan().unwrap(), SyntaxKind::DotToken);
    assert_eq!(scanner.scan().unwrap(), SyntaxKind::PrivateIdentifier);
    assert_eq!(scanner.token_value(), "field");
}
