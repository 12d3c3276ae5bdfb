//! Parser state, token plumbing, and the statement/declaration grammar.
//!
//! The expression grammar lives in `expressions.rs` and pattern
//! reinterpretation in `patterns.rs`; both are further `impl` blocks on
//! [`Parser`]. The parser is fail-fast: the first violation aborts the
//! parse, so no diagnostics accumulate.

use crate::context::Context;
use crate::expressions::ArrowHead;
use crate::patterns::bound_names;
use crate::scope::{BindingKind, ContinueTarget, LabelTracker, ScopeKind, ScopeStack};
use crate::ParserOptions;
use esparse_ast::node::*;
use esparse_ast::syntax_kind::SyntaxKind;
use esparse_ast::types::TokenFlags;
use esparse_core::text::{LineMap, SourceLocation};
use esparse_diagnostics::{messages, Message, ParseError};
use esparse_scanner::Scanner;
use rustc_hash::FxHashSet;

pub(crate) type Result<T> = std::result::Result<T, ParseError>;

/// Nesting bound for statements and expressions; deeper input fails with
/// a positioned syntax error instead of exhausting the stack. Each unit
/// here costs several native frames through the expression grammar, so
/// the bound stays well inside default thread stacks.
const MAX_RECURSION_DEPTH: u32 = 128;

/// The parser produces a Program node from ECMAScript source text, or
/// exactly one error for the first illegal construct.
pub struct Parser<'a> {
    pub(crate) scanner: Scanner<'a>,
    pub(crate) src: &'a str,
    pub(crate) options: ParserOptions,
    pub(crate) line_map: Option<LineMap>,
    /// End offset of the most recently consumed token; node spans end here.
    pub(crate) prev_token_end: u32,
    pub(crate) scopes: ScopeStack,
    pub(crate) labels: LabelTracker,
    /// Position of the first `{x = 1}` shorthand-initializer cover seen
    /// and not yet resolved into a pattern.
    pub(crate) cover_initialized_name: Option<Span>,
    /// Position of the first duplicated `__proto__` key pending pattern
    /// resolution.
    pub(crate) duplicate_proto: Option<Span>,
    /// Start offsets of spread elements that were followed by a comma,
    /// for rest-must-be-last validation during reinterpretation.
    pub(crate) spread_commas: FxHashSet<u32>,
    /// A just-parsed parenthesized head awaiting its `=>`.
    pub(crate) pending_arrow_head: Option<ArrowHead>,
    /// Span of the last parenthesized bare object/array literal, which
    /// must not be reinterpreted as a destructuring pattern.
    pub(crate) last_paren_primary: Option<Span>,
    /// Names exported so far (module goal), for duplicate detection.
    pub(crate) exported_names: FxHashSet<String>,
    pub(crate) recursion_depth: u32,
}

impl<'a> Parser<'a> {
    pub fn new(src: &'a str, options: ParserOptions) -> Self {
        let scanner = Scanner::new(
            src,
            options.module,
            !options.disable_web_compat,
            options.next_syntax,
        );
        let line_map = options.location_tracking.then(|| LineMap::new(src));
        Self {
            scanner,
            src,
            options,
            line_map,
            prev_token_end: 0,
            scopes: ScopeStack::new(),
            labels: LabelTracker::new(),
            cover_initialized_name: None,
            duplicate_proto: None,
            spread_commas: FxHashSet::default(),
            exported_names: FxHashSet::default(),
            pending_arrow_head: None,
            last_paren_primary: None,
            recursion_depth: 0,
        }
    }

    /// Parse the whole input as a Program, consuming the parser.
    pub fn parse_program(mut self) -> Result<Program> {
        self.scanner.skip_hashbang();
        self.next_token()?;

        let mut ctx = Context::ALLOW_IN;
        if self.options.module {
            // The module goal implies strict code and reserves `await`
            // for top-level await.
            ctx = ctx.with(Context::MODULE | Context::STRICT | Context::IN_ASYNC);
        }
        if self.options.strict {
            ctx = ctx.with(Context::STRICT);
        }

        self.scopes.push(ScopeKind::Function);
        let mut body = self.parse_directive_prologue(&mut ctx)?;
        while !self.at(SyntaxKind::EndOfFileToken) {
            body.push(self.parse_statement(ctx)?);
        }
        self.scopes.pop();

        let span = Span::new(0, self.src.len() as u32);
        Ok(Program {
            source_type: if self.options.module {
                SourceType::Module
            } else {
                SourceType::Script
            },
            body,
            span,
            loc: self.node_loc(span),
        })
    }

    // ========================================================================
    // Token management
    // ========================================================================

    #[inline]
    pub(crate) fn current(&self) -> SyntaxKind {
        self.scanner.token()
    }

    #[inline]
    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        self.scanner.token() == kind
    }

    #[inline]
    pub(crate) fn token_pos(&self) -> u32 {
        self.scanner.token_start() as u32
    }

    #[inline]
    pub(crate) fn token_end(&self) -> u32 {
        self.scanner.token_end() as u32
    }

    #[inline]
    pub(crate) fn token_flags(&self) -> TokenFlags {
        self.scanner.token_flags()
    }

    #[inline]
    pub(crate) fn newline_before(&self) -> bool {
        self.scanner.has_preceding_line_break()
    }

    /// Whether the current token is the contextual word `word`, written
    /// without escapes.
    pub(crate) fn at_contextual(&self, word: &str) -> bool {
        self.at(SyntaxKind::Identifier)
            && self.scanner.token_value() == word
            && !self.token_flags().contains(TokenFlags::UNICODE_ESCAPE)
    }

    /// Advance to the next token; the consumed token's end becomes the
    /// span end for nodes finished here.
    pub(crate) fn next_token(&mut self) -> Result<()> {
        self.prev_token_end = self.scanner.token_end() as u32;
        self.scanner.scan().map_err(|e| self.locate(e))?;
        Ok(())
    }

    /// Consume the current token if it matches.
    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> Result<bool> {
        if self.at(kind) {
            self.next_token()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Require and consume a token.
    pub(crate) fn expect(&mut self, kind: SyntaxKind) -> Result<()> {
        if self.at(kind) {
            self.next_token()
        } else {
            Err(self.fail(&messages::TOKEN_EXPECTED, &[kind.text()]))
        }
    }

    /// Consume a statement terminator, inserting one when ASI applies:
    /// before `}`, at end of input, or after a line terminator.
    pub(crate) fn expect_semicolon(&mut self) -> Result<()> {
        if self.at(SyntaxKind::SemicolonToken) {
            return self.next_token();
        }
        if self.at(SyntaxKind::CloseBraceToken)
            || self.at(SyntaxKind::EndOfFileToken)
            || self.newline_before()
        {
            return Ok(());
        }
        Err(self.unexpected())
    }

    // ========================================================================
    // Errors and node finishing
    // ========================================================================

    pub(crate) fn locate(&self, mut error: ParseError) -> ParseError {
        if error.loc.is_none() {
            if let Some(map) = &self.line_map {
                error.loc = Some(map.line_and_column_of(error.start));
            }
        }
        error
    }

    /// Build an error at the current token.
    pub(crate) fn fail(&self, msg: &Message, args: &[&str]) -> ParseError {
        self.fail_at(msg, args, self.token_pos(), self.token_end())
    }

    pub(crate) fn fail_at(&self, msg: &Message, args: &[&str], start: u32, end: u32) -> ParseError {
        self.locate(ParseError::new(msg, args, start, end))
    }

    pub(crate) fn fail_span(&self, msg: &Message, args: &[&str], span: Span) -> ParseError {
        self.fail_at(msg, args, span.start, span.end)
    }

    /// "Unexpected token" (or end of input) at the current token.
    pub(crate) fn unexpected(&self) -> ParseError {
        if self.at(SyntaxKind::EndOfFileToken) {
            return self.fail(&messages::UNEXPECTED_EOF, &[]);
        }
        let value = self.scanner.token_value();
        let shown = if value.is_empty() {
            self.current().text()
        } else {
            value
        };
        self.fail(&messages::UNEXPECTED_TOKEN, &[shown])
    }

    pub(crate) fn finish(&self, start: u32) -> Span {
        Span::new(start, self.prev_token_end)
    }

    pub(crate) fn node_loc(&self, span: Span) -> Option<SourceLocation> {
        self.line_map
            .as_ref()
            .map(|map| map.location_of(span.start, span.end))
    }

    pub(crate) fn enter_recursion(&mut self) -> Result<()> {
        self.recursion_depth += 1;
        if self.recursion_depth > MAX_RECURSION_DEPTH {
            return Err(self.fail(&messages::RECURSION_LIMIT, &[]));
        }
        Ok(())
    }

    #[inline]
    pub(crate) fn exit_recursion(&mut self) {
        self.recursion_depth -= 1;
    }

    /// Whether annex-B web-compat relaxations apply in this context.
    pub(crate) fn web_compat(&self) -> bool {
        !self.options.disable_web_compat
    }

    // ========================================================================
    // Identifiers and binding names
    // ========================================================================

    /// Validate a name used in a binding position under the context's
    /// reservedness rules.
    pub(crate) fn check_binding_name(&self, name: &str, span: Span, ctx: Context) -> Result<()> {
        match name {
            "eval" | "arguments" => {
                if ctx.has(Context::STRICT) {
                    return Err(self.fail_span(&messages::STRICT_EVAL_ARGUMENTS, &[], span));
                }
            }
            "yield" => {
                if ctx.has(Context::STRICT) || ctx.has(Context::IN_GENERATOR) {
                    return Err(self.fail_span(&messages::UNEXPECTED_RESERVED, &[name], span));
                }
            }
            "await" => {
                if ctx.has(Context::MODULE)
                    || ctx.has(Context::IN_ASYNC)
                    || ctx.has(Context::IN_CLASS_STATIC_BLOCK)
                {
                    return Err(self.fail_span(&messages::UNEXPECTED_RESERVED, &[name], span));
                }
            }
            "let" | "static" | "implements" | "interface" | "package" | "private"
            | "protected" | "public" => {
                if ctx.has(Context::STRICT) {
                    return Err(self.fail_span(&messages::UNEXPECTED_RESERVED, &[name], span));
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Parse a binding identifier: an identifier (or contextually
    /// unreserved keyword) legal as a declared name here.
    pub(crate) fn parse_binding_identifier(&mut self, ctx: Context) -> Result<Identifier> {
        let start = self.token_pos();
        let kind = self.current();
        let name = match kind {
            SyntaxKind::Identifier => self.scanner.token_value().to_string(),
            SyntaxKind::YieldKeyword | SyntaxKind::AwaitKeyword | SyntaxKind::LetKeyword => {
                self.scanner.token_value().to_string()
            }
            _ if kind.is_keyword() => {
                return Err(self.fail(&messages::UNEXPECTED_RESERVED, &[self.scanner.token_value()]))
            }
            _ => return Err(self.fail(&messages::IDENTIFIER_EXPECTED, &[])),
        };
        self.next_token()?;
        let span = self.finish(start);
        self.check_binding_name(&name, span, ctx)?;
        Ok(Identifier {
            name,
            span,
            loc: self.node_loc(span),
        })
    }

    /// Parse an IdentifierName: any identifier or keyword (member
    /// property names, object literal keys, import/export names).
    pub(crate) fn parse_identifier_name(&mut self) -> Result<Identifier> {
        let kind = self.current();
        if kind != SyntaxKind::Identifier && !kind.is_keyword() {
            return Err(self.fail(&messages::IDENTIFIER_EXPECTED, &[]));
        }
        let start = self.token_pos();
        let name = self.scanner.token_value().to_string();
        self.next_token()?;
        let span = self.finish(start);
        Ok(Identifier {
            name,
            span,
            loc: self.node_loc(span),
        })
    }

    // ========================================================================
    // Statements
    // ========================================================================

    pub(crate) fn parse_statement(&mut self, ctx: Context) -> Result<Statement> {
        self.enter_recursion()?;
        let result = self.parse_statement_inner(ctx);
        self.exit_recursion();
        result
    }

    fn parse_statement_inner(&mut self, ctx: Context) -> Result<Statement> {
        // Reserved words keep their keyword meaning only when written
        // without escapes; `if` never starts an if statement.
        if self.current().is_always_reserved()
            && self.token_flags().contains(TokenFlags::UNICODE_ESCAPE)
        {
            return Err(self.fail(&messages::ESCAPED_KEYWORD, &[]));
        }
        match self.current() {
            SyntaxKind::SemicolonToken => {
                let start = self.token_pos();
                self.next_token()?;
                let span = self.finish(start);
                Ok(Statement::Empty(EmptyStatement {
                    span,
                    loc: self.node_loc(span),
                }))
            }
            SyntaxKind::OpenBraceToken => Ok(Statement::Block(self.parse_block(ctx)?)),
            SyntaxKind::VarKeyword => self.parse_variable_statement(ctx, DeclarationKind::Var),
            SyntaxKind::ConstKeyword => self.parse_variable_statement(ctx, DeclarationKind::Const),
            SyntaxKind::LetKeyword => {
                if self.let_starts_declaration()? {
                    self.parse_variable_statement(ctx, DeclarationKind::Let)
                } else if self.at_labeled_statement()? {
                    self.parse_labeled_statement(ctx)
                } else {
                    self.parse_expression_statement(ctx)
                }
            }
            SyntaxKind::FunctionKeyword => self.parse_function_declaration(ctx, false),
            SyntaxKind::ClassKeyword => self.parse_class_declaration(ctx),
            SyntaxKind::IfKeyword => self.parse_if_statement(ctx),
            SyntaxKind::ReturnKeyword => self.parse_return_statement(ctx),
            SyntaxKind::WhileKeyword => self.parse_while_statement(ctx),
            SyntaxKind::DoKeyword => self.parse_do_statement(ctx),
            SyntaxKind::ForKeyword => self.parse_for_statement(ctx),
            SyntaxKind::ThrowKeyword => self.parse_throw_statement(ctx),
            SyntaxKind::TryKeyword => self.parse_try_statement(ctx),
            SyntaxKind::BreakKeyword => self.parse_break_statement(ctx),
            SyntaxKind::ContinueKeyword => self.parse_continue_statement(ctx),
            SyntaxKind::SwitchKeyword => self.parse_switch_statement(ctx),
            SyntaxKind::WithKeyword => self.parse_with_statement(ctx),
            SyntaxKind::DebuggerKeyword => {
                let start = self.token_pos();
                self.next_token()?;
                self.expect_semicolon()?;
                let span = self.finish(start);
                Ok(Statement::Debugger(DebuggerStatement {
                    span,
                    loc: self.node_loc(span),
                }))
            }
            SyntaxKind::ImportKeyword => {
                // `import(...)` and `import.meta` are expressions.
                if matches!(
                    self.peek_token()?,
                    SyntaxKind::OpenParenToken | SyntaxKind::DotToken
                ) {
                    self.parse_expression_statement(ctx)
                } else {
                    self.parse_import_declaration(ctx)
                }
            }
            SyntaxKind::ExportKeyword => self.parse_export_declaration(ctx),
            _ => {
                if self.at_async_function()? {
                    self.parse_function_declaration(ctx, true)
                } else if self.at_labeled_statement()? {
                    self.parse_labeled_statement(ctx)
                } else {
                    self.parse_expression_statement(ctx)
                }
            }
        }
    }

    /// One-token lookahead without disturbing the current token.
    pub(crate) fn peek_token(&mut self) -> Result<SyntaxKind> {
        let saved = self.scanner.save_state();
        let result = self.scanner.scan();
        self.scanner.restore_state(saved);
        result.map_err(|e| self.locate(e))
    }

    /// `let` begins a declaration when followed by an identifier-like
    /// token, `[`, or `{`. An escaped `let` is always an identifier.
    fn let_starts_declaration(&mut self) -> Result<bool> {
        if self.token_flags().contains(TokenFlags::UNICODE_ESCAPE) {
            return Ok(false);
        }
        let saved = self.scanner.save_state();
        let next = self.scanner.scan();
        self.scanner.restore_state(saved);
        let next = next.map_err(|e| self.locate(e))?;
        Ok(matches!(
            next,
            SyntaxKind::Identifier
                | SyntaxKind::OpenBracketToken
                | SyntaxKind::OpenBraceToken
                | SyntaxKind::LetKeyword
                | SyntaxKind::YieldKeyword
                | SyntaxKind::AwaitKeyword
        ))
    }

    /// `async function` (no line terminator between) starts an async
    /// function declaration.
    fn at_async_function(&mut self) -> Result<bool> {
        if !self.at_contextual("async") {
            return Ok(false);
        }
        let saved = self.scanner.save_state();
        let next = self.scanner.scan();
        let newline = self.scanner.has_preceding_line_break();
        self.scanner.restore_state(saved);
        Ok(next.map_err(|e| self.locate(e))? == SyntaxKind::FunctionKeyword && !newline)
    }

    /// An identifier-like token followed by `:` labels a statement.
    fn at_labeled_statement(&mut self) -> Result<bool> {
        if !matches!(
            self.current(),
            SyntaxKind::Identifier
                | SyntaxKind::YieldKeyword
                | SyntaxKind::AwaitKeyword
                | SyntaxKind::LetKeyword
        ) {
            return Ok(false);
        }
        Ok(self.peek_token()? == SyntaxKind::ColonToken)
    }

    /// Statements in single-statement positions (if/loop/with/label
    /// bodies): declarations are rejected, with the annex-B exception of
    /// plain function declarations directly under `if`/`else`.
    fn parse_embedded_statement(&mut self, ctx: Context, allow_function: bool) -> Result<Statement> {
        match self.current() {
            SyntaxKind::ClassKeyword => Err(self.fail(&messages::CLASS_SINGLE_STATEMENT, &[])),
            SyntaxKind::ConstKeyword => Err(self.fail(&messages::LEXICAL_SINGLE_STATEMENT, &[])),
            SyntaxKind::LetKeyword => {
                if self.let_starts_declaration()? {
                    return Err(self.fail(&messages::LEXICAL_SINGLE_STATEMENT, &[]));
                }
                self.parse_statement(ctx)
            }
            SyntaxKind::VarKeyword => self.parse_variable_statement(ctx, DeclarationKind::Var),
            SyntaxKind::FunctionKeyword => {
                if !allow_function || ctx.has(Context::STRICT) || !self.web_compat() {
                    return Err(self.fail(&messages::FUNCTION_SINGLE_STATEMENT, &[]));
                }
                if self.peek_token()? == SyntaxKind::AsteriskToken {
                    return Err(self.fail(&messages::GENERATOR_SINGLE_STATEMENT, &[]));
                }
                self.parse_function_declaration(ctx, false)
            }
            _ => {
                if self.at_async_function()? {
                    return Err(self.fail(&messages::FUNCTION_SINGLE_STATEMENT, &[]));
                }
                self.parse_statement(ctx)
            }
        }
    }

    /// Parse `{ ... }` as a block with its own lexical scope.
    pub(crate) fn parse_block(&mut self, ctx: Context) -> Result<BlockStatement> {
        let start = self.token_pos();
        self.expect(SyntaxKind::OpenBraceToken)?;
        self.scopes.push(ScopeKind::Block);
        let mut body = Vec::new();
        while !self.at(SyntaxKind::CloseBraceToken) && !self.at(SyntaxKind::EndOfFileToken) {
            body.push(self.parse_statement(ctx)?);
        }
        self.scopes.pop();
        self.expect(SyntaxKind::CloseBraceToken)?;
        let span = self.finish(start);
        Ok(BlockStatement {
            body,
            span,
            loc: self.node_loc(span),
        })
    }

    /// Parse `{ ... }` without pushing a scope; used for function and
    /// catch bodies whose scope already holds the parameters, so that
    /// body declarations conflict with them correctly.
    fn parse_block_into_current_scope(&mut self, ctx: Context) -> Result<BlockStatement> {
        let start = self.token_pos();
        self.expect(SyntaxKind::OpenBraceToken)?;
        let mut body = Vec::new();
        while !self.at(SyntaxKind::CloseBraceToken) && !self.at(SyntaxKind::EndOfFileToken) {
            body.push(self.parse_statement(ctx)?);
        }
        self.expect(SyntaxKind::CloseBraceToken)?;
        let span = self.finish(start);
        Ok(BlockStatement {
            body,
            span,
            loc: self.node_loc(span),
        })
    }

    // ========================================================================
    // Directive prologue
    // ========================================================================

    /// Parse the run of initial string-literal expression statements.
    /// Recognizing `"use strict"` flips the context for everything that
    /// follows, including re-validation of earlier octal escapes.
    pub(crate) fn parse_directive_prologue(&mut self, ctx: &mut Context) -> Result<Vec<Statement>> {
        let mut statements = Vec::new();
        let mut pending_octal: Option<Span> = None;
        while self.at(SyntaxKind::StringLiteral) {
            let token_start = self.token_pos();
            let token_end = self.token_end();
            let token_flags = self.token_flags();
            let stmt_start = token_start;

            let expression = self.isolate_cover(*ctx, |p, c| p.parse_expression(c))?;
            let is_directive = matches!(&expression, Expression::Literal(lit)
                if lit.span.start == token_start && lit.span.end == token_end);
            self.expect_semicolon()?;
            let span = self.finish(stmt_start);

            let directive = if is_directive {
                // The directive records the raw characters between the
                // quotes; escapes are deliberately not cooked.
                Some(self.src[(token_start + 1) as usize..(token_end - 1) as usize].to_string())
            } else {
                None
            };

            if token_flags.intersects(TokenFlags::OCTAL_ESCAPE | TokenFlags::EIGHT_NINE_ESCAPE) {
                pending_octal.get_or_insert(Span::new(token_start, token_end));
            }
            if directive.as_deref() == Some("use strict") {
                *ctx = ctx.with(Context::STRICT);
            }

            statements.push(Statement::Expression(ExpressionStatement {
                expression: Box::new(expression),
                directive,
                span,
                loc: self.node_loc(span),
            }));

            if !is_directive {
                break;
            }
        }
        if ctx.has(Context::STRICT) {
            if let Some(span) = pending_octal {
                return Err(self.fail_span(&messages::OCTAL_IN_DIRECTIVE, &[], span));
            }
        }
        Ok(statements)
    }

    // ========================================================================
    // Variable declarations
    // ========================================================================

    fn parse_variable_statement(&mut self, ctx: Context, kind: DeclarationKind) -> Result<Statement> {
        let declaration = self.parse_variable_declaration_list(ctx, kind, false)?;
        self.expect_semicolon()?;
        let mut declaration = declaration;
        declaration.span = self.finish(declaration.span.start);
        declaration.loc = self.node_loc(declaration.span);
        Ok(Statement::VariableDeclaration(declaration))
    }

    /// Parse `var/let/const` declarators. With `in_for_head` the
    /// missing-initializer checks are deferred to the caller, which knows
    /// whether a `for-in`/`for-of` follows.
    fn parse_variable_declaration_list(
        &mut self,
        ctx: Context,
        kind: DeclarationKind,
        in_for_head: bool,
    ) -> Result<VariableDeclaration> {
        let start = self.token_pos();
        self.next_token()?; // var / let / const

        let mut declarations = Vec::new();
        loop {
            declarations.push(self.parse_variable_declarator(ctx, kind, in_for_head)?);
            if !self.eat(SyntaxKind::CommaToken)? {
                break;
            }
        }
        let span = self.finish(start);
        Ok(VariableDeclaration {
            declarations,
            kind,
            span,
            loc: self.node_loc(span),
        })
    }

    fn parse_variable_declarator(
        &mut self,
        ctx: Context,
        kind: DeclarationKind,
        in_for_head: bool,
    ) -> Result<VariableDeclarator> {
        let start = self.token_pos();
        let id = self.parse_binding_target(ctx)?;
        self.declare_pattern(&id, kind, ctx)?;

        let init = if self.eat(SyntaxKind::EqualsToken)? {
            Some(Box::new(self.isolate_cover(ctx, |p, c| {
                p.parse_assignment_expression(c)
            })?))
        } else {
            if !in_for_head {
                if kind == DeclarationKind::Const {
                    return Err(self.fail_at(
                        &messages::CONST_WITHOUT_INIT,
                        &[],
                        start,
                        self.prev_token_end,
                    ));
                }
                // Pattern bindings always require an initializer.
                if !matches!(id, Pattern::Identifier(_)) {
                    return Err(self.fail(&messages::TOKEN_EXPECTED, &["="]));
                }
            }
            None
        };
        let span = self.finish(start);
        Ok(VariableDeclarator {
            id,
            init,
            span,
            loc: self.node_loc(span),
        })
    }

    /// Register every name bound by a declaration pattern in the scope
    /// records, failing on conflicts.
    fn declare_pattern(&mut self, pattern: &Pattern, kind: DeclarationKind, ctx: Context) -> Result<()> {
        let mut names = Vec::new();
        bound_names(pattern, &mut names);
        let strict = ctx.has(Context::STRICT);
        let web_compat = self.web_compat();
        for (name, span) in names {
            if kind.is_lexical() && name == "let" {
                return Err(self.fail_span(&messages::LET_IN_LEXICAL_BINDING, &[], span));
            }
            let result = match kind {
                DeclarationKind::Var => self.scopes.declare_var(name, strict, web_compat),
                DeclarationKind::Let => {
                    self.scopes
                        .declare_lexical(name, BindingKind::Let, strict, web_compat)
                }
                DeclarationKind::Const => {
                    self.scopes
                        .declare_lexical(name, BindingKind::Const, strict, web_compat)
                }
            };
            if let Err(conflict) = result {
                return Err(self.fail_span(&messages::DUPLICATE_BINDING, &[&conflict.name], span));
            }
        }
        Ok(())
    }

    // ========================================================================
    // Binding targets (direct pattern parsing for declarations)
    // ========================================================================

    /// Parse a binding target: an identifier or a destructuring pattern,
    /// parsed directly (declaration positions are unambiguous).
    pub(crate) fn parse_binding_target(&mut self, ctx: Context) -> Result<Pattern> {
        match self.current() {
            SyntaxKind::OpenBracketToken => self.parse_array_binding_pattern(ctx),
            SyntaxKind::OpenBraceToken => self.parse_object_binding_pattern(ctx),
            _ => Ok(Pattern::Identifier(self.parse_binding_identifier(ctx)?)),
        }
    }

    fn parse_array_binding_pattern(&mut self, ctx: Context) -> Result<Pattern> {
        let start = self.token_pos();
        self.expect(SyntaxKind::OpenBracketToken)?;
        let mut elements = Vec::new();
        while !self.at(SyntaxKind::CloseBracketToken) {
            if self.at(SyntaxKind::CommaToken) {
                self.next_token()?;
                elements.push(None);
                continue;
            }
            if self.at(SyntaxKind::DotDotDotToken) {
                elements.push(Some(self.parse_binding_rest_element(ctx)?));
                if self.at(SyntaxKind::CommaToken) {
                    return Err(self.fail(&messages::COMMA_AFTER_REST, &[]));
                }
                break;
            }
            elements.push(Some(self.parse_binding_element(ctx)?));
            if !self.at(SyntaxKind::CloseBracketToken) {
                self.expect(SyntaxKind::CommaToken)?;
            }
        }
        self.expect(SyntaxKind::CloseBracketToken)?;
        let span = self.finish(start);
        Ok(Pattern::Array(ArrayPattern {
            elements,
            span,
            loc: self.node_loc(span),
        }))
    }

    fn parse_object_binding_pattern(&mut self, ctx: Context) -> Result<Pattern> {
        let start = self.token_pos();
        self.expect(SyntaxKind::OpenBraceToken)?;
        let mut properties = Vec::new();
        while !self.at(SyntaxKind::CloseBraceToken) {
            if self.at(SyntaxKind::DotDotDotToken) {
                let rest_start = self.token_pos();
                self.next_token()?;
                // Object rest binds a single plain identifier.
                let argument = Pattern::Identifier(self.parse_binding_identifier(ctx)?);
                let span = self.finish(rest_start);
                properties.push(ObjectPatternMember::Rest(RestElement {
                    argument: Box::new(argument),
                    span,
                    loc: self.node_loc(span),
                }));
                if self.at(SyntaxKind::CommaToken) {
                    return Err(self.fail(&messages::COMMA_AFTER_REST, &[]));
                }
                break;
            }
            properties.push(self.parse_object_binding_property(ctx)?);
            if !self.at(SyntaxKind::CloseBraceToken) {
                self.expect(SyntaxKind::CommaToken)?;
            }
        }
        self.expect(SyntaxKind::CloseBraceToken)?;
        let span = self.finish(start);
        Ok(Pattern::Object(ObjectPattern {
            properties,
            span,
            loc: self.node_loc(span),
        }))
    }

    fn parse_object_binding_property(&mut self, ctx: Context) -> Result<ObjectPatternMember> {
        let start = self.token_pos();
        let (key, computed) = self.parse_property_key(ctx)?;

        let (value, shorthand) = if computed || self.at(SyntaxKind::ColonToken) {
            self.expect(SyntaxKind::ColonToken)?;
            (self.parse_binding_element(ctx)?, false)
        } else {
            // Shorthand: the key doubles as the bound name.
            let Expression::Identifier(ref id) = key else {
                return Err(self.fail(&messages::TOKEN_EXPECTED, &[":"]));
            };
            if SyntaxKind::from_keyword(&id.name).is_some_and(SyntaxKind::is_always_reserved) {
                return Err(self.fail_span(&messages::UNEXPECTED_RESERVED, &[&id.name], id.span));
            }
            self.check_binding_name(&id.name, id.span, ctx)?;
            let mut value = Pattern::Identifier(id.clone());
            if self.at(SyntaxKind::EqualsToken) {
                self.next_token()?;
                let default =
                    self.isolate_cover(ctx, |p, c| p.parse_assignment_expression(c))?;
                let span = self.finish(start);
                value = Pattern::Assignment(AssignmentPattern {
                    left: Box::new(value),
                    right: Box::new(default),
                    span,
                    loc: self.node_loc(span),
                });
            }
            (value, true)
        };

        let span = self.finish(start);
        Ok(ObjectPatternMember::Property(AssignmentProperty {
            key: Box::new(key),
            value: Box::new(value),
            kind: PropertyKind::Init,
            computed,
            method: false,
            shorthand,
            span,
            loc: self.node_loc(span),
        }))
    }

    /// A binding element: a target with an optional default.
    fn parse_binding_element(&mut self, ctx: Context) -> Result<Pattern> {
        let start = self.token_pos();
        let target = self.parse_binding_target(ctx)?;
        if self.at(SyntaxKind::EqualsToken) {
            self.next_token()?;
            let default = self.isolate_cover(ctx, |p, c| p.parse_assignment_expression(c))?;
            let span = self.finish(start);
            return Ok(Pattern::Assignment(AssignmentPattern {
                left: Box::new(target),
                right: Box::new(default),
                span,
                loc: self.node_loc(span),
            }));
        }
        Ok(target)
    }

    fn parse_binding_rest_element(&mut self, ctx: Context) -> Result<Pattern> {
        let start = self.token_pos();
        self.expect(SyntaxKind::DotDotDotToken)?;
        let argument = self.parse_binding_target(ctx)?;
        if self.at(SyntaxKind::EqualsToken) {
            return Err(self.fail(&messages::REST_WITH_DEFAULT, &[]));
        }
        let span = self.finish(start);
        Ok(Pattern::Rest(RestElement {
            argument: Box::new(argument),
            span,
            loc: self.node_loc(span),
        }))
    }

    // ========================================================================
    // Control-flow statements
    // ========================================================================

    fn parse_paren_expression(&mut self, ctx: Context) -> Result<Expression> {
        self.expect(SyntaxKind::OpenParenToken)?;
        let expression = self.isolate_cover(ctx.with(Context::ALLOW_IN), |p, c| {
            p.parse_expression(c)
        })?;
        self.expect(SyntaxKind::CloseParenToken)?;
        Ok(expression)
    }

    fn parse_if_statement(&mut self, ctx: Context) -> Result<Statement> {
        let start = self.token_pos();
        self.expect(SyntaxKind::IfKeyword)?;
        let test = self.parse_paren_expression(ctx)?;
        let consequent = self.parse_embedded_statement(ctx, true)?;
        let alternate = if self.eat(SyntaxKind::ElseKeyword)? {
            Some(Box::new(self.parse_embedded_statement(ctx, true)?))
        } else {
            None
        };
        let span = self.finish(start);
        Ok(Statement::If(IfStatement {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate,
            span,
            loc: self.node_loc(span),
        }))
    }

    fn parse_while_statement(&mut self, ctx: Context) -> Result<Statement> {
        let start = self.token_pos();
        self.expect(SyntaxKind::WhileKeyword)?;
        let test = self.parse_paren_expression(ctx)?;
        let body = self.parse_embedded_statement(ctx.with(Context::IN_LOOP), false)?;
        let span = self.finish(start);
        Ok(Statement::While(WhileStatement {
            test: Box::new(test),
            body: Box::new(body),
            span,
            loc: self.node_loc(span),
        }))
    }

    fn parse_do_statement(&mut self, ctx: Context) -> Result<Statement> {
        let start = self.token_pos();
        self.expect(SyntaxKind::DoKeyword)?;
        let body = self.parse_embedded_statement(ctx.with(Context::IN_LOOP), false)?;
        self.expect(SyntaxKind::WhileKeyword)?;
        let test = self.parse_paren_expression(ctx)?;
        // The trailing semicolon of do-while is always optional.
        self.eat(SyntaxKind::SemicolonToken)?;
        let span = self.finish(start);
        Ok(Statement::DoWhile(DoWhileStatement {
            body: Box::new(body),
            test: Box::new(test),
            span,
            loc: self.node_loc(span),
        }))
    }

    fn parse_for_statement(&mut self, ctx: Context) -> Result<Statement> {
        let start = self.token_pos();
        self.expect(SyntaxKind::ForKeyword)?;
        let is_await = if self.at(SyntaxKind::AwaitKeyword) {
            if !ctx.has(Context::IN_ASYNC) || ctx.has(Context::IN_CLASS_STATIC_BLOCK) {
                return Err(self.fail(&messages::FOR_AWAIT_OUTSIDE_ASYNC, &[]));
            }
            self.next_token()?;
            true
        } else {
            false
        };
        self.expect(SyntaxKind::OpenParenToken)?;
        self.scopes.push(ScopeKind::Block);
        let no_in = ctx.without(Context::ALLOW_IN);

        // Declaration head
        let decl_kind = match self.current() {
            SyntaxKind::VarKeyword => Some(DeclarationKind::Var),
            SyntaxKind::ConstKeyword => Some(DeclarationKind::Const),
            SyntaxKind::LetKeyword => self
                .let_starts_declaration()?
                .then_some(DeclarationKind::Let),
            _ => None,
        };
        if let Some(kind) = decl_kind {
            let declaration = self.parse_variable_declaration_list(no_in, kind, true)?;
            if self.at(SyntaxKind::InKeyword) || self.at_contextual("of") {
                let for_of = self.at_contextual("of");
                if declaration.declarations.len() != 1 {
                    return Err(self.fail_span(
                        &messages::FOR_IN_OF_SINGLE_DECLARATION,
                        &[],
                        declaration.span,
                    ));
                }
                let declarator = &declaration.declarations[0];
                if let Some(init) = &declarator.init {
                    // Annex B tolerates `for (var i = 0 in x)` only.
                    let tolerated = !for_of
                        && kind == DeclarationKind::Var
                        && matches!(declarator.id, Pattern::Identifier(_))
                        && !ctx.has(Context::STRICT)
                        && self.web_compat();
                    if !tolerated {
                        let message = if for_of {
                            &messages::FOR_OF_INITIALIZER
                        } else {
                            &messages::FOR_IN_INITIALIZER
                        };
                        return Err(self.fail_span(message, &[], init.span()));
                    }
                }
                let left = ForTarget::Declaration(declaration);
                return self.parse_for_in_of_tail(ctx, start, left, for_of, is_await);
            }
            if is_await {
                return Err(self.fail(&messages::TOKEN_EXPECTED, &["of"]));
            }
            // Plain for: const declarators need initializers after all.
            if kind == DeclarationKind::Const {
                for declarator in &declaration.declarations {
                    if declarator.init.is_none() {
                        return Err(self.fail_span(
                            &messages::CONST_WITHOUT_INIT,
                            &[],
                            declarator.span,
                        ));
                    }
                }
            }
            if kind != DeclarationKind::Var {
                for declarator in &declaration.declarations {
                    if declarator.init.is_none()
                        && !matches!(declarator.id, Pattern::Identifier(_))
                    {
                        return Err(self.fail_span(
                            &messages::TOKEN_EXPECTED,
                            &["="],
                            declarator.span,
                        ));
                    }
                }
            }
            self.expect(SyntaxKind::SemicolonToken)?;
            return self.parse_for_tail(ctx, start, Some(ForInit::Declaration(declaration)));
        }

        // Empty head
        if self.at(SyntaxKind::SemicolonToken) {
            if is_await {
                return Err(self.fail(&messages::TOKEN_EXPECTED, &["of"]));
            }
            self.next_token()?;
            return self.parse_for_tail(ctx, start, None);
        }

        // Expression head: may resolve into a for-in/for-of target.
        let for_of_let = self.at(SyntaxKind::LetKeyword);
        let saved_cover = self.cover_initialized_name.take();
        let saved_proto = self.duplicate_proto.take();
        let expr = self.parse_expression(no_in)?;
        if self.at(SyntaxKind::InKeyword) || self.at_contextual("of") {
            let for_of = self.at_contextual("of");
            if for_of && for_of_let {
                return Err(self.fail_span(&messages::FOR_OF_LET, &[], expr.span()));
            }
            if matches!(expr, Expression::Sequence(_) | Expression::Assignment(_)) {
                return Err(self.fail_span(&messages::INVALID_FOR_LHS, &[], expr.span()));
            }
            if matches!(expr, Expression::Object(_) | Expression::Array(_))
                && self.last_paren_primary == Some(expr.span())
            {
                return Err(self.fail_span(&messages::PARENTHESIZED_PATTERN, &[], expr.span()));
            }
            let target = self.reinterpret_as_assignment_target(expr, ctx)?;
            self.cover_initialized_name = saved_cover;
            self.duplicate_proto = saved_proto;
            let left = ForTarget::Pattern(Box::new(target));
            return self.parse_for_in_of_tail(ctx, start, left, for_of, is_await);
        }
        if is_await {
            return Err(self.fail(&messages::TOKEN_EXPECTED, &["of"]));
        }
        if let Some(span) = self.cover_initialized_name.take() {
            return Err(self.fail_span(&messages::INVALID_COVER_INITIALIZER, &[], span));
        }
        if let Some(span) = self.duplicate_proto.take() {
            return Err(self.fail_span(&messages::DUPLICATE_PROTO, &[], span));
        }
        self.cover_initialized_name = saved_cover;
        self.duplicate_proto = saved_proto;
        self.expect(SyntaxKind::SemicolonToken)?;
        self.parse_for_tail(ctx, start, Some(ForInit::Expression(Box::new(expr))))
    }

    fn parse_for_tail(
        &mut self,
        ctx: Context,
        start: u32,
        init: Option<ForInit>,
    ) -> Result<Statement> {
        let test = if self.at(SyntaxKind::SemicolonToken) {
            None
        } else {
            Some(Box::new(self.isolate_cover(
                ctx.with(Context::ALLOW_IN),
                |p, c| p.parse_expression(c),
            )?))
        };
        self.expect(SyntaxKind::SemicolonToken)?;
        let update = if self.at(SyntaxKind::CloseParenToken) {
            None
        } else {
            Some(Box::new(self.isolate_cover(
                ctx.with(Context::ALLOW_IN),
                |p, c| p.parse_expression(c),
            )?))
        };
        self.expect(SyntaxKind::CloseParenToken)?;
        let body = self.parse_embedded_statement(ctx.with(Context::IN_LOOP), false)?;
        self.scopes.pop();
        let span = self.finish(start);
        Ok(Statement::For(ForStatement {
            init,
            test,
            update,
            body: Box::new(body),
            span,
            loc: self.node_loc(span),
        }))
    }

    fn parse_for_in_of_tail(
        &mut self,
        ctx: Context,
        start: u32,
        left: ForTarget,
        for_of: bool,
        is_await: bool,
    ) -> Result<Statement> {
        if is_await && !for_of {
            return Err(self.fail(&messages::TOKEN_EXPECTED, &["of"]));
        }
        self.next_token()?; // in / of
        let right = if for_of {
            self.isolate_cover(ctx.with(Context::ALLOW_IN), |p, c| {
                p.parse_assignment_expression(c)
            })?
        } else {
            self.isolate_cover(ctx.with(Context::ALLOW_IN), |p, c| p.parse_expression(c))?
        };
        self.expect(SyntaxKind::CloseParenToken)?;
        let body = self.parse_embedded_statement(ctx.with(Context::IN_LOOP), false)?;
        self.scopes.pop();
        let span = self.finish(start);
        if for_of {
            Ok(Statement::ForOf(ForOfStatement {
                left,
                right: Box::new(right),
                body: Box::new(body),
                is_await,
                span,
                loc: self.node_loc(span),
            }))
        } else {
            Ok(Statement::ForIn(ForInStatement {
                left,
                right: Box::new(right),
                body: Box::new(body),
                span,
                loc: self.node_loc(span),
            }))
        }
    }

    fn parse_continue_statement(&mut self, ctx: Context) -> Result<Statement> {
        let start = self.token_pos();
        self.expect(SyntaxKind::ContinueKeyword)?;
        let label = self.parse_jump_label()?;
        match &label {
            Some(id) => match self.labels.resolve_continue(&id.name) {
                ContinueTarget::Found => {}
                ContinueTarget::NotIteration => {
                    return Err(self.fail_span(
                        &messages::CONTINUE_NOT_ITERATION_LABEL,
                        &[],
                        id.span,
                    ))
                }
                ContinueTarget::NotFound => {
                    return Err(self.fail_span(&messages::UNDEFINED_LABEL, &[&id.name], id.span))
                }
            },
            None => {
                if !ctx.has(Context::IN_LOOP) {
                    return Err(self.fail_at(
                        &messages::ILLEGAL_CONTINUE,
                        &[],
                        start,
                        self.prev_token_end,
                    ));
                }
            }
        }
        self.expect_semicolon()?;
        let span = self.finish(start);
        Ok(Statement::Continue(ContinueStatement {
            label,
            span,
            loc: self.node_loc(span),
        }))
    }

    fn parse_break_statement(&mut self, ctx: Context) -> Result<Statement> {
        let start = self.token_pos();
        self.expect(SyntaxKind::BreakKeyword)?;
        let label = self.parse_jump_label()?;
        match &label {
            Some(id) => {
                if !self.labels.resolve_break(&id.name) {
                    return Err(self.fail_span(&messages::UNDEFINED_LABEL, &[&id.name], id.span));
                }
            }
            None => {
                if !ctx.has(Context::IN_LOOP) && !ctx.has(Context::IN_SWITCH) {
                    return Err(self.fail_at(
                        &messages::ILLEGAL_BREAK,
                        &[],
                        start,
                        self.prev_token_end,
                    ));
                }
            }
        }
        self.expect_semicolon()?;
        let span = self.finish(start);
        Ok(Statement::Break(BreakStatement {
            label,
            span,
            loc: self.node_loc(span),
        }))
    }

    /// The optional label of `break`/`continue` is a restricted
    /// production: a line terminator forces ASI before it.
    fn parse_jump_label(&mut self) -> Result<Option<Identifier>> {
        if self.newline_before()
            || !matches!(
                self.current(),
                SyntaxKind::Identifier
                    | SyntaxKind::YieldKeyword
                    | SyntaxKind::AwaitKeyword
                    | SyntaxKind::LetKeyword
            )
        {
            return Ok(None);
        }
        Ok(Some(self.parse_identifier_name()?))
    }

    fn parse_return_statement(&mut self, ctx: Context) -> Result<Statement> {
        let start = self.token_pos();
        if !ctx.has(Context::IN_FUNCTION) {
            return Err(self.fail(&messages::ILLEGAL_RETURN, &[]));
        }
        self.expect(SyntaxKind::ReturnKeyword)?;
        let argument = if self.at(SyntaxKind::SemicolonToken)
            || self.at(SyntaxKind::CloseBraceToken)
            || self.at(SyntaxKind::EndOfFileToken)
            || self.newline_before()
        {
            None
        } else {
            Some(Box::new(self.isolate_cover(ctx, |p, c| {
                p.parse_expression(c)
            })?))
        };
        self.expect_semicolon()?;
        let span = self.finish(start);
        Ok(Statement::Return(ReturnStatement {
            argument,
            span,
            loc: self.node_loc(span),
        }))
    }

    fn parse_with_statement(&mut self, ctx: Context) -> Result<Statement> {
        let start = self.token_pos();
        if ctx.has(Context::STRICT) {
            return Err(self.fail(&messages::STRICT_WITH, &[]));
        }
        self.expect(SyntaxKind::WithKeyword)?;
        let object = self.parse_paren_expression(ctx)?;
        let body = self.parse_embedded_statement(ctx, false)?;
        let span = self.finish(start);
        Ok(Statement::With(WithStatement {
            object: Box::new(object),
            body: Box::new(body),
            span,
            loc: self.node_loc(span),
        }))
    }

    fn parse_switch_statement(&mut self, ctx: Context) -> Result<Statement> {
        let start = self.token_pos();
        self.expect(SyntaxKind::SwitchKeyword)?;
        let discriminant = self.parse_paren_expression(ctx)?;
        self.expect(SyntaxKind::OpenBraceToken)?;
        self.scopes.push(ScopeKind::Block);
        let case_ctx = ctx.with(Context::IN_SWITCH);

        let mut cases = Vec::new();
        let mut seen_default = false;
        while !self.at(SyntaxKind::CloseBraceToken) {
            let case_start = self.token_pos();
            let test = if self.eat(SyntaxKind::CaseKeyword)? {
                Some(Box::new(self.isolate_cover(
                    case_ctx.with(Context::ALLOW_IN),
                    |p, c| p.parse_expression(c),
                )?))
            } else {
                self.expect(SyntaxKind::DefaultKeyword)?;
                if seen_default {
                    return Err(self.fail_at(
                        &messages::MULTIPLE_DEFAULTS,
                        &[],
                        case_start,
                        self.prev_token_end,
                    ));
                }
                seen_default = true;
                None
            };
            self.expect(SyntaxKind::ColonToken)?;
            let mut consequent = Vec::new();
            while !matches!(
                self.current(),
                SyntaxKind::CaseKeyword
                    | SyntaxKind::DefaultKeyword
                    | SyntaxKind::CloseBraceToken
                    | SyntaxKind::EndOfFileToken
            ) {
                consequent.push(self.parse_statement(case_ctx)?);
            }
            let span = self.finish(case_start);
            cases.push(SwitchCase {
                test,
                consequent,
                span,
                loc: self.node_loc(span),
            });
        }
        self.scopes.pop();
        self.expect(SyntaxKind::CloseBraceToken)?;
        let span = self.finish(start);
        Ok(Statement::Switch(SwitchStatement {
            discriminant: Box::new(discriminant),
            cases,
            span,
            loc: self.node_loc(span),
        }))
    }

    fn parse_throw_statement(&mut self, ctx: Context) -> Result<Statement> {
        let start = self.token_pos();
        self.expect(SyntaxKind::ThrowKeyword)?;
        if self.newline_before() {
            return Err(self.fail(&messages::NEWLINE_AFTER_THROW, &[]));
        }
        let argument = self.isolate_cover(ctx, |p, c| p.parse_expression(c))?;
        self.expect_semicolon()?;
        let span = self.finish(start);
        Ok(Statement::Throw(ThrowStatement {
            argument: Box::new(argument),
            span,
            loc: self.node_loc(span),
        }))
    }

    fn parse_try_statement(&mut self, ctx: Context) -> Result<Statement> {
        let start = self.token_pos();
        self.expect(SyntaxKind::TryKeyword)?;
        let block = self.parse_block(ctx)?;

        let handler = if self.at(SyntaxKind::CatchKeyword) {
            let catch_start = self.token_pos();
            self.next_token()?;
            let (param, body) = if self.eat(SyntaxKind::OpenParenToken)? {
                let target = self.parse_binding_target(ctx)?;
                self.expect(SyntaxKind::CloseParenToken)?;
                let simple = matches!(target, Pattern::Identifier(_));
                // Catch parameter and body share one scope, so body
                // declarations are checked against the parameter.
                self.scopes.push(ScopeKind::Catch { simple });
                self.declare_catch_params(&target)?;
                let body = self.parse_block_into_current_scope(ctx)?;
                self.scopes.pop();
                (Some(target), body)
            } else {
                (None, self.parse_block(ctx)?)
            };
            let span = self.finish(catch_start);
            Some(CatchClause {
                param,
                body,
                span,
                loc: self.node_loc(span),
            })
        } else {
            None
        };

        let finalizer = if self.eat(SyntaxKind::FinallyKeyword)? {
            Some(self.parse_block(ctx)?)
        } else {
            None
        };
        if handler.is_none() && finalizer.is_none() {
            return Err(self.fail(&messages::TOKEN_EXPECTED, &["catch"]));
        }
        let span = self.finish(start);
        Ok(Statement::Try(TryStatement {
            block,
            handler,
            finalizer,
            span,
            loc: self.node_loc(span),
        }))
    }

    fn declare_catch_params(&mut self, target: &Pattern) -> Result<()> {
        let mut names = Vec::new();
        bound_names(target, &mut names);
        for (index, (name, span)) in names.iter().enumerate() {
            if names[..index].iter().any(|(other, _)| other == name) {
                return Err(self.fail_span(&messages::DUPLICATE_BINDING, &[name], *span));
            }
            self.scopes.declare_parameter(name, BindingKind::CatchParam);
        }
        Ok(())
    }

    fn parse_labeled_statement(&mut self, ctx: Context) -> Result<Statement> {
        // Collect the run of consecutive labels; whether they denote an
        // iteration statement is known only once the body token shows up,
        // which is when continue-targeting becomes decidable.
        let mut label_names = Vec::new();
        loop {
            let label = self.parse_identifier_name()?;
            self.check_binding_name(&label.name, label.span, ctx)?;
            self.expect(SyntaxKind::ColonToken)?;
            label_names.push(label);
            if !(matches!(
                self.current(),
                SyntaxKind::Identifier
                    | SyntaxKind::YieldKeyword
                    | SyntaxKind::AwaitKeyword
                    | SyntaxKind::LetKeyword
            ) && self.peek_token()? == SyntaxKind::ColonToken)
            {
                break;
            }
        }

        let iteration = matches!(
            self.current(),
            SyntaxKind::ForKeyword | SyntaxKind::WhileKeyword | SyntaxKind::DoKeyword
        );
        for label in &label_names {
            if self.labels.push(&label.name, iteration).is_err() {
                return Err(self.fail_span(&messages::DUPLICATE_LABEL, &[&label.name], label.span));
            }
        }

        let body = if self.at(SyntaxKind::FunctionKeyword) {
            // Annex B: a labelled plain function declaration, sloppy only.
            if ctx.has(Context::STRICT) || !self.web_compat() {
                return Err(self.fail(&messages::LABELLED_FUNCTION, &[]));
            }
            if self.peek_token()? == SyntaxKind::AsteriskToken {
                return Err(self.fail(&messages::GENERATOR_SINGLE_STATEMENT, &[]));
            }
            self.parse_function_declaration(ctx, false)?
        } else {
            self.parse_embedded_statement(ctx, false)?
        };

        for _ in &label_names {
            self.labels.pop();
        }

        // Innermost label wraps the body directly; each span starts at
        // its own label.
        let mut statement = body;
        for label in label_names.into_iter().rev() {
            let span = Span::new(label.span.start, self.prev_token_end);
            statement = Statement::Labeled(LabeledStatement {
                label,
                body: Box::new(statement),
                span,
                loc: self.node_loc(span),
            });
        }
        Ok(statement)
    }

    fn parse_expression_statement(&mut self, ctx: Context) -> Result<Statement> {
        let start = self.token_pos();
        let expression = self.isolate_cover(ctx, |p, c| p.parse_expression(c))?;
        self.expect_semicolon()?;
        let span = self.finish(start);
        Ok(Statement::Expression(ExpressionStatement {
            expression: Box::new(expression),
            directive: None,
            span,
            loc: self.node_loc(span),
        }))
    }

    // ========================================================================
    // Functions
    // ========================================================================

    fn parse_function_declaration(&mut self, ctx: Context, is_async: bool) -> Result<Statement> {
        let start = self.token_pos();
        if is_async {
            self.next_token()?; // async
        }
        self.expect(SyntaxKind::FunctionKeyword)?;
        let is_generator = self.eat(SyntaxKind::AsteriskToken)?;

        let id = self.parse_binding_identifier(ctx)?;
        self.declare_hoisted_function(&id, ctx)?;

        let (params, body, became_strict) =
            self.parse_function_tail(ctx, is_async, is_generator, Context::NONE, false)?;
        if became_strict {
            self.check_binding_name(&id.name, id.span, ctx.with(Context::STRICT))?;
        }
        let span = self.finish(start);
        Ok(Statement::FunctionDeclaration(FunctionDeclaration {
            id: Some(id),
            params,
            body,
            generator: is_generator,
            is_async,
            span,
            loc: self.node_loc(span),
        }))
    }

    /// Declare a function-declaration name: var-like at the top level of
    /// a script or function body, lexical in blocks and modules.
    fn declare_hoisted_function(&mut self, id: &Identifier, ctx: Context) -> Result<()> {
        let strict = ctx.has(Context::STRICT);
        let web_compat = self.web_compat();
        let module_top = ctx.has(Context::MODULE) && self.scopes.depth() == 1;
        let result = if self.current_scope_is_function() && !module_top {
            self.scopes.declare_var(&id.name, strict, web_compat)
        } else {
            self.scopes
                .declare_lexical(&id.name, BindingKind::Function, strict, web_compat)
        };
        result.map_err(|conflict| {
            self.fail_span(&messages::DUPLICATE_BINDING, &[&conflict.name], id.span)
        })
    }

    fn current_scope_is_function(&self) -> bool {
        // The scope stack is never empty while parsing statements.
        self.scopes.current_kind() == Some(ScopeKind::Function)
    }

    /// Parse parameters and body for any function-like construct.
    /// `extra_flags` adds method capabilities (super access); returns the
    /// params, body, and whether a directive made the body strict.
    pub(crate) fn parse_function_tail(
        &mut self,
        outer_ctx: Context,
        is_async: bool,
        is_generator: bool,
        extra_flags: Context,
        is_method: bool,
    ) -> Result<(Vec<Pattern>, BlockStatement, bool)> {
        self.scopes.push(ScopeKind::Function);
        self.labels.enter_function();

        let mut base = outer_ctx.for_function_body().with(extra_flags);
        if is_generator {
            base = base.with(Context::IN_GENERATOR);
        }
        if is_async {
            base = base.with(Context::IN_ASYNC);
        }

        let (params, simple, names) =
            self.parse_formal_parameters(base.with(Context::IN_PARAMETERS))?;
        self.validate_parameters(base, &names, simple, is_method)?;

        let mut body_ctx = base;
        let was_strict = body_ctx.has(Context::STRICT);
        let body = self.parse_function_body_block(&mut body_ctx, simple)?;
        let became_strict = body_ctx.has(Context::STRICT) && !was_strict;
        if became_strict {
            self.validate_parameters(body_ctx, &names, simple, is_method)?;
        }

        self.labels.exit_function();
        self.scopes.pop();
        Ok((params, body, became_strict))
    }

    pub(crate) fn parse_formal_parameters(
        &mut self,
        ctx: Context,
    ) -> Result<(Vec<Pattern>, bool, Vec<(String, Span)>)> {
        self.expect(SyntaxKind::OpenParenToken)?;
        let mut params = Vec::new();
        let mut simple = true;
        while !self.at(SyntaxKind::CloseParenToken) {
            if self.at(SyntaxKind::DotDotDotToken) {
                simple = false;
                params.push(self.parse_binding_rest_element(ctx)?);
                if self.at(SyntaxKind::CommaToken) {
                    return Err(self.fail(&messages::COMMA_AFTER_REST, &[]));
                }
                break;
            }
            let param = self.parse_binding_element(ctx)?;
            if !matches!(param, Pattern::Identifier(_)) {
                simple = false;
            }
            params.push(param);
            if !self.at(SyntaxKind::CloseParenToken) {
                self.expect(SyntaxKind::CommaToken)?;
            }
        }
        self.expect(SyntaxKind::CloseParenToken)?;

        let mut names = Vec::new();
        for param in &params {
            bound_names(param, &mut names);
        }
        let names: Vec<(String, Span)> = names
            .into_iter()
            .map(|(name, span)| (name.to_string(), span))
            .collect();
        for (name, _) in &names {
            self.scopes.declare_parameter(name, BindingKind::Parameter);
        }
        Ok((params, simple, names))
    }

    /// Duplicate/eval-arguments/reserved checks over a parameter list.
    /// Runs when the list is parsed, and again if a `"use strict"`
    /// directive retroactively strictens the function.
    pub(crate) fn validate_parameters(
        &self,
        ctx: Context,
        names: &[(String, Span)],
        simple: bool,
        strict_list: bool,
    ) -> Result<()> {
        let strict = ctx.has(Context::STRICT);
        let duplicates_allowed = simple && !strict && !strict_list;
        for (index, (name, span)) in names.iter().enumerate() {
            if !duplicates_allowed && names[..index].iter().any(|(other, _)| other == name) {
                return Err(self.fail_span(&messages::DUPLICATE_PARAMETER, &[], *span));
            }
            if strict {
                self.check_binding_name(name, *span, ctx)?;
            }
        }
        Ok(())
    }

    /// A function body: braces, directive prologue (which may flip the
    /// context strict), then statements in the function's own scope.
    pub(crate) fn parse_function_body_block(
        &mut self,
        ctx: &mut Context,
        simple_params: bool,
    ) -> Result<BlockStatement> {
        let start = self.token_pos();
        self.expect(SyntaxKind::OpenBraceToken)?;
        let was_strict = ctx.has(Context::STRICT);
        let mut body = self.parse_directive_prologue(ctx)?;
        if ctx.has(Context::STRICT) && !was_strict && !simple_params {
            return Err(self.fail_at(
                &messages::ILLEGAL_USE_STRICT,
                &[],
                start,
                self.prev_token_end,
            ));
        }
        while !self.at(SyntaxKind::CloseBraceToken) && !self.at(SyntaxKind::EndOfFileToken) {
            body.push(self.parse_statement(*ctx)?);
        }
        self.expect(SyntaxKind::CloseBraceToken)?;
        let span = self.finish(start);
        Ok(BlockStatement {
            body,
            span,
            loc: self.node_loc(span),
        })
    }

    // ========================================================================
    // Classes
    // ========================================================================

    fn parse_class_declaration(&mut self, ctx: Context) -> Result<Statement> {
        let start = self.token_pos();
        self.expect(SyntaxKind::ClassKeyword)?;
        // Class code is always strict, including the name.
        let strict_ctx = ctx.with(Context::STRICT);
        let id = self.parse_binding_identifier(strict_ctx)?;
        let result = self
            .scopes
            .declare_lexical(&id.name, BindingKind::Class, true, self.web_compat());
        if let Err(conflict) = result {
            return Err(self.fail_span(&messages::DUPLICATE_BINDING, &[&conflict.name], id.span));
        }
        let (super_class, body) = self.parse_class_tail(strict_ctx)?;
        let span = self.finish(start);
        Ok(Statement::ClassDeclaration(ClassDeclaration {
            id: Some(id),
            super_class,
            body,
            span,
            loc: self.node_loc(span),
        }))
    }

    /// Heritage clause and class body; shared by declarations,
    /// expressions, and `export default class`.
    pub(crate) fn parse_class_tail(
        &mut self,
        ctx: Context,
    ) -> Result<(Option<Box<Expression>>, ClassBody)> {
        let ctx = ctx.with(Context::STRICT | Context::IN_CLASS_BODY);
        let super_class = if self.eat(SyntaxKind::ExtendsKeyword)? {
            Some(Box::new(self.parse_left_hand_side_expression(ctx)?))
        } else {
            None
        };
        let has_heritage = super_class.is_some();

        let body_start = self.token_pos();
        self.expect(SyntaxKind::OpenBraceToken)?;
        let mut elements = Vec::new();
        let mut seen_constructor = false;
        let mut private_names: Vec<(String, bool, u8)> = Vec::new();
        while !self.at(SyntaxKind::CloseBraceToken) {
            if self.eat(SyntaxKind::SemicolonToken)? {
                continue;
            }
            let element = self.parse_class_element(
                ctx,
                has_heritage,
                &mut seen_constructor,
                &mut private_names,
            )?;
            elements.push(element);
        }
        self.expect(SyntaxKind::CloseBraceToken)?;
        let span = self.finish(body_start);
        Ok((
            super_class,
            ClassBody {
                body: elements,
                span,
                loc: self.node_loc(span),
            },
        ))
    }

    fn parse_class_element(
        &mut self,
        ctx: Context,
        has_heritage: bool,
        seen_constructor: &mut bool,
        private_names: &mut Vec<(String, bool, u8)>,
    ) -> Result<ClassElement> {
        let start = self.token_pos();

        // `static` is a modifier unless it names a member.
        let mut is_static = false;
        if self.at_contextual("static") {
            let next = self.peek_token()?;
            if !matches!(
                next,
                SyntaxKind::OpenParenToken
                    | SyntaxKind::EqualsToken
                    | SyntaxKind::SemicolonToken
                    | SyntaxKind::CloseBraceToken
            ) {
                is_static = true;
                self.next_token()?;
            }
        }

        // Static initialization block.
        if is_static && self.at(SyntaxKind::OpenBraceToken) {
            if !self.options.next_syntax {
                return Err(self.unexpected());
            }
            return self.parse_static_block(ctx, start);
        }

        // get/set/async/* modifiers, each possibly a member name itself.
        let mut kind = MethodKind::Method;
        let mut is_async = false;
        let mut is_generator = false;
        if self.at_contextual("get") && self.class_modifier_is_prefix()? {
            self.next_token()?;
            kind = MethodKind::Get;
        } else if self.at_contextual("set") && self.class_modifier_is_prefix()? {
            self.next_token()?;
            kind = MethodKind::Set;
        } else if self.at_contextual("async") && self.class_modifier_is_prefix()? {
            let saved = self.scanner.save_state();
            let newline = {
                self.scanner.scan().map_err(|e| self.locate(e))?;
                let nl = self.scanner.has_preceding_line_break();
                self.scanner.restore_state(saved);
                nl
            };
            if !newline {
                self.next_token()?;
                is_async = true;
                if self.eat(SyntaxKind::AsteriskToken)? {
                    is_generator = true;
                }
            }
        } else if self.at(SyntaxKind::AsteriskToken) {
            self.next_token()?;
            is_generator = true;
        }

        let (key, computed) = self.parse_class_property_key(ctx)?;
        let key_name = non_computed_key_name(&key, computed);

        // Private-name bookkeeping: duplicates are illegal except a
        // get/set pair with matching placement.
        if let Expression::PrivateIdentifier(ref private) = key {
            if private.name == "constructor" {
                return Err(self.fail_span(&messages::CONSTRUCTOR_PRIVATE_NAME, &[], private.span));
            }
            let mask = match kind {
                MethodKind::Get => 1u8,
                MethodKind::Set => 2,
                _ => 3,
            };
            if let Some(entry) = private_names
                .iter_mut()
                .find(|(name, st, _)| *name == private.name && *st == is_static)
            {
                if entry.2 & mask != 0 {
                    return Err(self.fail_span(
                        &messages::DUPLICATE_BINDING,
                        &[&private.name],
                        private.span,
                    ));
                }
                entry.2 |= mask;
            } else {
                private_names.push((private.name.clone(), is_static, mask));
            }
        }

        if self.at(SyntaxKind::OpenParenToken) {
            // Method definition.
            let is_constructor = !is_static
                && !computed
                && kind == MethodKind::Method
                && !is_async
                && !is_generator
                && key_name.as_deref() == Some("constructor");
            if !is_constructor
                && !is_static
                && !computed
                && key_name.as_deref() == Some("constructor")
            {
                return Err(self.fail_at(
                    &messages::CONSTRUCTOR_SPECIAL_METHOD,
                    &[],
                    start,
                    self.prev_token_end,
                ));
            }
            if is_constructor {
                if *seen_constructor {
                    return Err(self.fail_at(
                        &messages::DUPLICATE_CONSTRUCTOR,
                        &[],
                        start,
                        self.prev_token_end,
                    ));
                }
                *seen_constructor = true;
            }
            if is_static && key_name.as_deref() == Some("prototype") {
                return Err(self.fail_at(
                    &messages::STATIC_PROTOTYPE,
                    &[],
                    start,
                    self.prev_token_end,
                ));
            }

            let mut extra = Context::ALLOW_SUPER_PROPERTY;
            if is_constructor && has_heritage {
                extra = extra.with(Context::ALLOW_SUPER_CALL);
            }
            let value = self.parse_method_function(ctx, is_async, is_generator, extra, kind)?;
            let span = self.finish(start);
            let method_kind = if is_constructor {
                MethodKind::Constructor
            } else {
                kind
            };
            return Ok(ClassElement::Method(MethodDefinition {
                key: Box::new(key),
                value,
                kind: method_kind,
                computed,
                is_static,
                span,
                loc: self.node_loc(span),
            }));
        }

        // Property definition (class field).
        if kind != MethodKind::Method || is_async || is_generator {
            return Err(self.fail(&messages::TOKEN_EXPECTED, &["("]));
        }
        if key_name.as_deref() == Some("constructor") {
            return Err(self.fail_at(
                &messages::CONSTRUCTOR_CLASS_FIELD,
                &[],
                start,
                self.prev_token_end,
            ));
        }
        if is_static && key_name.as_deref() == Some("prototype") {
            return Err(self.fail_at(&messages::STATIC_PROTOTYPE, &[], start, self.prev_token_end));
        }
        let value = if self.eat(SyntaxKind::EqualsToken)? {
            let field_ctx = ctx
                .without(Context::IN_ASYNC | Context::IN_GENERATOR | Context::IN_PARAMETERS)
                .with(
                    Context::IN_CLASS_FIELD_INIT
                        | Context::ALLOW_SUPER_PROPERTY
                        | Context::ALLOW_IN
                        | Context::ALLOW_NEW_TARGET,
                );
            Some(Box::new(self.isolate_cover(field_ctx, |p, c| {
                p.parse_assignment_expression(c)
            })?))
        } else {
            None
        };
        self.expect_semicolon()?;
        let span = self.finish(start);
        Ok(ClassElement::Property(PropertyDefinition {
            key: Box::new(key),
            value,
            computed,
            is_static,
            span,
            loc: self.node_loc(span),
        }))
    }

    /// A `get`/`set`/`async` word is a modifier only when a member name
    /// follows it.
    fn class_modifier_is_prefix(&mut self) -> Result<bool> {
        Ok(!matches!(
            self.peek_token()?,
            SyntaxKind::OpenParenToken
                | SyntaxKind::EqualsToken
                | SyntaxKind::SemicolonToken
                | SyntaxKind::CloseBraceToken
        ))
    }

    fn parse_static_block(&mut self, ctx: Context, start: u32) -> Result<ClassElement> {
        self.scopes.push(ScopeKind::Function);
        self.labels.enter_function();
        let block_ctx = ctx
            .without(
                Context::IN_FUNCTION
                    | Context::IN_GENERATOR
                    | Context::IN_ASYNC
                    | Context::IN_LOOP
                    | Context::IN_SWITCH,
            )
            .with(
                Context::IN_CLASS_STATIC_BLOCK
                    | Context::ALLOW_SUPER_PROPERTY
                    | Context::ALLOW_IN
                    | Context::ALLOW_NEW_TARGET,
            );
        let block = self.parse_block_into_current_scope(block_ctx)?;
        self.labels.exit_function();
        self.scopes.pop();
        let span = self.finish(start);
        Ok(ClassElement::StaticBlock(StaticBlock {
            body: block.body,
            span,
            loc: self.node_loc(span),
        }))
    }

    /// Property keys in class bodies: everything object literals allow,
    /// plus private names.
    fn parse_class_property_key(&mut self, ctx: Context) -> Result<(Expression, bool)> {
        if self.at(SyntaxKind::PrivateIdentifier) {
            let start = self.token_pos();
            let name = self.scanner.token_value().to_string();
            self.next_token()?;
            let span = self.finish(start);
            return Ok((
                Expression::PrivateIdentifier(PrivateIdentifier {
                    name,
                    span,
                    loc: self.node_loc(span),
                }),
                false,
            ));
        }
        self.parse_property_key(ctx)
    }

    /// A method's function value, with the class/method context flags.
    fn parse_method_function(
        &mut self,
        ctx: Context,
        is_async: bool,
        is_generator: bool,
        extra: Context,
        kind: MethodKind,
    ) -> Result<FunctionExpression> {
        let params_start = self.token_pos();
        let (params, body, _) =
            self.parse_function_tail(ctx, is_async, is_generator, extra, true)?;

        match kind {
            MethodKind::Get => {
                if !params.is_empty() {
                    return Err(self.fail_at(
                        &messages::GETTER_PARAMETERS,
                        &[],
                        params_start,
                        self.prev_token_end,
                    ));
                }
            }
            MethodKind::Set => {
                if params.len() != 1 {
                    return Err(self.fail_at(
                        &messages::SETTER_PARAMETERS,
                        &[],
                        params_start,
                        self.prev_token_end,
                    ));
                }
                if matches!(params[0], Pattern::Rest(_)) {
                    return Err(self.fail_at(
                        &messages::SETTER_REST_PARAMETER,
                        &[],
                        params_start,
                        self.prev_token_end,
                    ));
                }
            }
            _ => {}
        }

        let span = Span::new(params_start, self.prev_token_end);
        Ok(FunctionExpression {
            id: None,
            params,
            body,
            generator: is_generator,
            is_async,
            span,
            loc: self.node_loc(span),
        })
    }

    // ========================================================================
    // Modules
    // ========================================================================

    fn require_module_top_level(&self, ctx: Context) -> Result<()> {
        if !ctx.has(Context::MODULE) || self.scopes.depth() != 1 {
            return Err(self.fail(&messages::IMPORT_OUTSIDE_MODULE, &[]));
        }
        Ok(())
    }

    fn declare_import_binding(&mut self, id: &Identifier, ctx: Context) -> Result<()> {
        self.check_binding_name(&id.name, id.span, ctx)?;
        self.scopes
            .declare_lexical(&id.name, BindingKind::Import, true, self.web_compat())
            .map_err(|conflict| {
                self.fail_span(&messages::DUPLICATE_BINDING, &[&conflict.name], id.span)
            })
    }

    fn parse_import_declaration(&mut self, ctx: Context) -> Result<Statement> {
        self.require_module_top_level(ctx)?;
        let start = self.token_pos();
        self.expect(SyntaxKind::ImportKeyword)?;

        let mut specifiers = Vec::new();
        if self.at(SyntaxKind::StringLiteral) {
            // Side-effect import.
            let source = self.parse_module_source()?;
            self.expect_semicolon()?;
            let span = self.finish(start);
            return Ok(Statement::ImportDeclaration(ImportDeclaration {
                specifiers,
                source,
                span,
                loc: self.node_loc(span),
            }));
        }

        // Default binding first, then optional named/namespace clause.
        if !self.at(SyntaxKind::OpenBraceToken) && !self.at(SyntaxKind::AsteriskToken) {
            let default_start = self.token_pos();
            let local = self.parse_binding_identifier(ctx)?;
            self.declare_import_binding(&local, ctx)?;
            let span = self.finish(default_start);
            specifiers.push(ImportDeclarationSpecifier::Default(ImportDefaultSpecifier {
                local,
                span,
                loc: self.node_loc(span),
            }));
            if self.at(SyntaxKind::CommaToken) {
                self.next_token()?;
            } else {
                let source = self.parse_from_clause()?;
                self.expect_semicolon()?;
                let span = self.finish(start);
                return Ok(Statement::ImportDeclaration(ImportDeclaration {
                    specifiers,
                    source,
                    span,
                    loc: self.node_loc(span),
                }));
            }
        }

        if self.at(SyntaxKind::AsteriskToken) {
            let ns_start = self.token_pos();
            self.next_token()?;
            self.expect_contextual("as")?;
            let local = self.parse_binding_identifier(ctx)?;
            self.declare_import_binding(&local, ctx)?;
            let span = self.finish(ns_start);
            specifiers.push(ImportDeclarationSpecifier::Namespace(
                ImportNamespaceSpecifier {
                    local,
                    span,
                    loc: self.node_loc(span),
                },
            ));
        } else {
            self.expect(SyntaxKind::OpenBraceToken)?;
            while !self.at(SyntaxKind::CloseBraceToken) {
                let spec_start = self.token_pos();
                let imported = self.parse_module_export_name()?;
                let needs_alias = !matches!(
                    imported,
                    ModuleExportName::Identifier(ref id)
                        if SyntaxKind::from_keyword(&id.name).is_none()
                );
                let local = if self.at_contextual("as") {
                    self.next_token()?;
                    self.parse_binding_identifier(ctx)?
                } else if needs_alias {
                    return Err(self.fail(&messages::TOKEN_EXPECTED, &["as"]));
                } else {
                    match &imported {
                        ModuleExportName::Identifier(id) => {
                            self.check_binding_name(&id.name, id.span, ctx)?;
                            id.clone()
                        }
                        ModuleExportName::Literal(_) => unreachable!("string names need an alias"),
                    }
                };
                self.declare_import_binding(&local, ctx)?;
                let span = self.finish(spec_start);
                specifiers.push(ImportDeclarationSpecifier::Named(ImportSpecifier {
                    imported,
                    local,
                    span,
                    loc: self.node_loc(span),
                }));
                if !self.at(SyntaxKind::CloseBraceToken) {
                    self.expect(SyntaxKind::CommaToken)?;
                }
            }
            self.expect(SyntaxKind::CloseBraceToken)?;
        }

        let source = self.parse_from_clause()?;
        self.expect_semicolon()?;
        let span = self.finish(start);
        Ok(Statement::ImportDeclaration(ImportDeclaration {
            specifiers,
            source,
            span,
            loc: self.node_loc(span),
        }))
    }

    fn expect_contextual(&mut self, word: &str) -> Result<()> {
        if self.at_contextual(word) {
            self.next_token()
        } else {
            Err(self.fail(&messages::TOKEN_EXPECTED, &[word]))
        }
    }

    fn parse_from_clause(&mut self) -> Result<Literal> {
        self.expect_contextual("from")?;
        self.parse_module_source()
    }

    fn parse_module_source(&mut self) -> Result<Literal> {
        if !self.at(SyntaxKind::StringLiteral) {
            return Err(self.fail(&messages::TOKEN_EXPECTED, &["string"]));
        }
        self.parse_string_literal_token()
    }

    /// An exported/imported name: identifier name or string literal.
    fn parse_module_export_name(&mut self) -> Result<ModuleExportName> {
        if self.at(SyntaxKind::StringLiteral) {
            Ok(ModuleExportName::Literal(self.parse_string_literal_token()?))
        } else {
            Ok(ModuleExportName::Identifier(self.parse_identifier_name()?))
        }
    }

    fn module_export_name_text(name: &ModuleExportName) -> &str {
        match name {
            ModuleExportName::Identifier(id) => &id.name,
            ModuleExportName::Literal(lit) => match &lit.value {
                LiteralValue::String(s) => s,
                _ => unreachable!("module export names are strings"),
            },
        }
    }

    fn record_export(&mut self, name: &str, span: Span) -> Result<()> {
        if !self.exported_names.insert(name.to_string()) {
            return Err(self.fail_span(&messages::DUPLICATE_EXPORT, &[name], span));
        }
        Ok(())
    }

    fn parse_export_declaration(&mut self, ctx: Context) -> Result<Statement> {
        self.require_module_top_level(ctx)?;
        let start = self.token_pos();
        self.expect(SyntaxKind::ExportKeyword)?;

        // export * [as name] from "mod";
        if self.at(SyntaxKind::AsteriskToken) {
            self.next_token()?;
            let exported = if self.at_contextual("as") {
                self.next_token()?;
                let name = self.parse_module_export_name()?;
                let text = Self::module_export_name_text(&name).to_string();
                let span = match &name {
                    ModuleExportName::Identifier(id) => id.span,
                    ModuleExportName::Literal(lit) => lit.span,
                };
                self.record_export(&text, span)?;
                Some(name)
            } else {
                None
            };
            let source = self.parse_from_clause()?;
            self.expect_semicolon()?;
            let span = self.finish(start);
            return Ok(Statement::ExportAll(ExportAllDeclaration {
                exported,
                source,
                span,
                loc: self.node_loc(span),
            }));
        }

        // export default ...
        if self.at(SyntaxKind::DefaultKeyword) {
            let default_span = Span::new(self.token_pos(), self.token_end());
            self.next_token()?;
            self.record_export("default", default_span)?;
            let declaration = if self.at(SyntaxKind::FunctionKeyword) || self.at_async_function()? {
                let is_async = !self.at(SyntaxKind::FunctionKeyword);
                ExportDefaultKind::Function(self.parse_default_function(ctx, is_async)?)
            } else if self.at(SyntaxKind::ClassKeyword) {
                ExportDefaultKind::Class(self.parse_default_class(ctx)?)
            } else {
                let expr = self.isolate_cover(ctx, |p, c| p.parse_assignment_expression(c))?;
                self.expect_semicolon()?;
                ExportDefaultKind::Expression(Box::new(expr))
            };
            let span = self.finish(start);
            return Ok(Statement::ExportDefault(ExportDefaultDeclaration {
                declaration,
                span,
                loc: self.node_loc(span),
            }));
        }

        // export { spec, ... } [from "mod"];
        if self.at(SyntaxKind::OpenBraceToken) {
            self.next_token()?;
            let mut raw_specifiers = Vec::new();
            while !self.at(SyntaxKind::CloseBraceToken) {
                let spec_start = self.token_pos();
                let local = self.parse_module_export_name()?;
                let exported = if self.at_contextual("as") {
                    self.next_token()?;
                    self.parse_module_export_name()?
                } else {
                    local.clone()
                };
                let span = self.finish(spec_start);
                raw_specifiers.push(ExportSpecifier {
                    local,
                    exported,
                    span,
                    loc: self.node_loc(span),
                });
                if !self.at(SyntaxKind::CloseBraceToken) {
                    self.expect(SyntaxKind::CommaToken)?;
                }
            }
            self.expect(SyntaxKind::CloseBraceToken)?;
            let source = if self.at_contextual("from") {
                Some(self.parse_from_clause()?)
            } else {
                None
            };
            // Without a from clause the local names are references into
            // this module: reserved words and strings are illegal.
            if source.is_none() {
                for spec in &raw_specifiers {
                    match &spec.local {
                        ModuleExportName::Literal(lit) => {
                            return Err(self.fail_span(
                                &messages::MODULE_STRING_NAME_UNPAIRED,
                                &[],
                                lit.span,
                            ))
                        }
                        ModuleExportName::Identifier(id) => {
                            if SyntaxKind::from_keyword(&id.name).is_some() {
                                return Err(self.fail_span(
                                    &messages::UNEXPECTED_RESERVED,
                                    &[&id.name],
                                    id.span,
                                ));
                            }
                        }
                    }
                }
            }
            for spec in &raw_specifiers {
                let text = Self::module_export_name_text(&spec.exported).to_string();
                self.record_export(&text, spec.span)?;
            }
            self.expect_semicolon()?;
            let span = self.finish(start);
            return Ok(Statement::ExportNamed(ExportNamedDeclaration {
                declaration: None,
                specifiers: raw_specifiers,
                source,
                span,
                loc: self.node_loc(span),
            }));
        }

        // export <declaration>
        let declaration = match self.current() {
            SyntaxKind::VarKeyword => self.parse_variable_statement(ctx, DeclarationKind::Var)?,
            SyntaxKind::ConstKeyword => {
                self.parse_variable_statement(ctx, DeclarationKind::Const)?
            }
            SyntaxKind::LetKeyword => self.parse_variable_statement(ctx, DeclarationKind::Let)?,
            SyntaxKind::FunctionKeyword => self.parse_function_declaration(ctx, false)?,
            SyntaxKind::ClassKeyword => self.parse_class_declaration(ctx)?,
            _ => {
                if !self.at_async_function()? {
                    return Err(self.fail(&messages::STATEMENT_EXPECTED, &[]));
                }
                self.parse_function_declaration(ctx, true)?
            }
        };
        let mut exported = Vec::new();
        collect_declared_names(&declaration, &mut exported);
        for (name, span) in exported {
            self.record_export(&name, span)?;
        }
        let span = self.finish(start);
        Ok(Statement::ExportNamed(ExportNamedDeclaration {
            declaration: Some(Box::new(declaration)),
            specifiers: Vec::new(),
            source: None,
            span,
            loc: self.node_loc(span),
        }))
    }

    fn parse_default_function(&mut self, ctx: Context, is_async: bool) -> Result<FunctionDeclaration> {
        let start = self.token_pos();
        if is_async {
            self.next_token()?;
        }
        self.expect(SyntaxKind::FunctionKeyword)?;
        let is_generator = self.eat(SyntaxKind::AsteriskToken)?;
        let id = if self.at(SyntaxKind::OpenParenToken) {
            None
        } else {
            let id = self.parse_binding_identifier(ctx)?;
            self.declare_hoisted_function(&id, ctx)?;
            Some(id)
        };
        let (params, body, _) =
            self.parse_function_tail(ctx, is_async, is_generator, Context::NONE, false)?;
        let span = self.finish(start);
        Ok(FunctionDeclaration {
            id,
            params,
            body,
            generator: is_generator,
            is_async,
            span,
            loc: self.node_loc(span),
        })
    }

    fn parse_default_class(&mut self, ctx: Context) -> Result<ClassDeclaration> {
        let start = self.token_pos();
        self.expect(SyntaxKind::ClassKeyword)?;
        let strict_ctx = ctx.with(Context::STRICT);
        let id = if self.at(SyntaxKind::OpenBraceToken) || self.at(SyntaxKind::ExtendsKeyword) {
            None
        } else {
            let id = self.parse_binding_identifier(strict_ctx)?;
            self.scopes
                .declare_lexical(&id.name, BindingKind::Class, true, self.web_compat())
                .map_err(|conflict| {
                    self.fail_span(&messages::DUPLICATE_BINDING, &[&conflict.name], id.span)
                })?;
            Some(id)
        };
        let (super_class, body) = self.parse_class_tail(strict_ctx)?;
        let span = self.finish(start);
        Ok(ClassDeclaration {
            id,
            super_class,
            body,
            span,
            loc: self.node_loc(span),
        })
    }
}

/// Names bound by an exported declaration, for duplicate-export checks.
fn collect_declared_names(statement: &Statement, out: &mut Vec<(String, Span)>) {
    match statement {
        Statement::VariableDeclaration(decl) => {
            for declarator in &decl.declarations {
                let mut names = Vec::new();
                bound_names(&declarator.id, &mut names);
                out.extend(
                    names
                        .into_iter()
                        .map(|(name, span)| (name.to_string(), span)),
                );
            }
        }
        Statement::FunctionDeclaration(decl) => {
            if let Some(id) = &decl.id {
                out.push((id.name.clone(), id.span));
            }
        }
        Statement::ClassDeclaration(decl) => {
            if let Some(id) = &decl.id {
                out.push((id.name.clone(), id.span));
            }
        }
        _ => {}
    }
}

/// The text of a non-computed property key, for `constructor`/
/// `prototype` restrictions.
fn non_computed_key_name(key: &Expression, computed: bool) -> Option<String> {
    if computed {
        return None;
    }
    match key {
        Expression::Identifier(id) => Some(id.name.clone()),
        Expression::Literal(lit) => match &lit.value {
            LiteralValue::String(s) => Some(s.clone()),
            _ => None,
        },
        _ => None,
    }
}
