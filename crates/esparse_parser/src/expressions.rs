//! The expression grammar: precedence climbing plus the cover-grammar
//! machinery for arrows, destructuring, and parenthesized heads.
//!
//! Ambiguous productions are parsed once as expressions and reinterpreted
//! afterwards (`patterns.rs`); the bookkeeping for deferred legality
//! checks (`{x = 1}` shorthand initializers, duplicate `__proto__`,
//! spread-before-comma) lives on the parser and is resolved either by a
//! conversion or at the nearest isolation boundary.

use crate::context::Context;
use crate::parser::{Parser, Result};
use crate::precedence::{binary_precedence, is_right_associative, OperatorPrecedence};
use crate::scope::{BindingKind, ScopeKind};
use esparse_ast::node::*;
use esparse_ast::syntax_kind::SyntaxKind;
use esparse_ast::types::TokenFlags;
use esparse_diagnostics::messages;

/// A parenthesized (or `async(...)`) head that may become an arrow
/// function's parameter list when `=>` follows.
#[derive(Debug)]
pub(crate) struct ArrowHead {
    pub span: Span,
    pub is_async: bool,
    pub elements: Vec<Expression>,
}

impl<'a> Parser<'a> {
    // ========================================================================
    // Cover-grammar bookkeeping
    // ========================================================================

    /// Run a sub-parse whose result can no longer become a pattern: any
    /// pending cover marker left behind is an error here.
    pub(crate) fn isolate_cover<T>(
        &mut self,
        ctx: Context,
        f: impl FnOnce(&mut Self, Context) -> Result<T>,
    ) -> Result<T> {
        let saved_cover = self.cover_initialized_name.take();
        let saved_proto = self.duplicate_proto.take();
        let value = f(self, ctx)?;
        if let Some(span) = self.cover_initialized_name {
            return Err(self.fail_span(&messages::INVALID_COVER_INITIALIZER, &[], span));
        }
        if let Some(span) = self.duplicate_proto {
            return Err(self.fail_span(&messages::DUPLICATE_PROTO, &[], span));
        }
        self.cover_initialized_name = saved_cover;
        self.duplicate_proto = saved_proto;
        Ok(value)
    }

    /// Run a sub-parse that may still be reinterpreted as a pattern by
    /// an enclosing construct: cover markers propagate upward, earliest
    /// position winning.
    fn inherit_cover<T>(
        &mut self,
        ctx: Context,
        f: impl FnOnce(&mut Self, Context) -> Result<T>,
    ) -> Result<T> {
        let saved_cover = self.cover_initialized_name.take();
        let saved_proto = self.duplicate_proto.take();
        let value = f(self, ctx)?;
        self.cover_initialized_name = saved_cover.or(self.cover_initialized_name);
        self.duplicate_proto = saved_proto.or(self.duplicate_proto);
        Ok(value)
    }

    /// Reject keyword tokens written with unicode escapes when consumed
    /// with their keyword meaning.
    pub(crate) fn check_unescaped_keyword(&self) -> Result<()> {
        if self.current().is_keyword()
            && self.token_flags().contains(TokenFlags::UNICODE_ESCAPE)
        {
            return Err(self.fail(&messages::ESCAPED_KEYWORD, &[]));
        }
        Ok(())
    }

    // ========================================================================
    // Expression entry points
    // ========================================================================

    /// Expression (possibly a comma sequence).
    pub(crate) fn parse_expression(&mut self, ctx: Context) -> Result<Expression> {
        let start = self.token_pos();
        let first = self.inherit_cover(ctx, |p, c| p.parse_assignment_expression(c))?;
        if !self.at(SyntaxKind::CommaToken) {
            return Ok(first);
        }
        let mut expressions = vec![first];
        while self.eat(SyntaxKind::CommaToken)? {
            expressions.push(self.inherit_cover(ctx, |p, c| p.parse_assignment_expression(c))?);
        }
        let span = Span::new(start, self.prev_token_end);
        Ok(Expression::Sequence(SequenceExpression {
            expressions,
            span,
            loc: self.node_loc(span),
        }))
    }

    pub(crate) fn parse_assignment_expression(&mut self, ctx: Context) -> Result<Expression> {
        self.enter_recursion()?;
        let result = self.parse_assignment_inner(ctx);
        self.exit_recursion();
        result
    }

    fn parse_assignment_inner(&mut self, ctx: Context) -> Result<Expression> {
        if ctx.has(Context::IN_GENERATOR) && self.at(SyntaxKind::YieldKeyword) {
            return self.parse_yield_expression(ctx);
        }
        if let Some(arrow) = self.try_parse_ident_arrow(ctx)? {
            return Ok(arrow);
        }

        let start = self.token_pos();
        let expr = self.parse_conditional_expression(ctx)?;

        if self.at(SyntaxKind::EqualsGreaterThanToken) {
            if let Some(head) = self.pending_arrow_head.take() {
                if head.span == expr.span() {
                    return self.parse_arrow_tail(ctx, head);
                }
            }
            return Err(self.unexpected());
        }

        let op_kind = self.current();
        if !op_kind.is_assignment_operator() {
            return Ok(expr);
        }
        if op_kind.is_logical_assignment() && !self.options.next_syntax {
            return Err(self.unexpected());
        }

        let left = if op_kind == SyntaxKind::EqualsToken {
            if matches!(expr, Expression::Object(_) | Expression::Array(_))
                && self.last_paren_primary == Some(expr.span())
            {
                return Err(self.fail_span(&messages::PARENTHESIZED_PATTERN, &[], expr.span()));
            }
            // `(a = b) = c`: an assignment is a valid pattern only as an
            // element default, never as the whole target.
            if matches!(expr, Expression::Assignment(_)) {
                return Err(self.fail_span(&messages::INVALID_ASSIGNMENT_TARGET, &[], expr.span()));
            }
            self.reinterpret_as_assignment_target(expr, ctx)?
        } else {
            // Compound and logical assignments take simple targets only.
            match expr {
                Expression::Identifier(id) => {
                    self.check_assignment_identifier(&id, ctx)?;
                    Pattern::Identifier(id)
                }
                Expression::Member(member) if !member.optional => Pattern::Member(member),
                other => {
                    return Err(self.fail_span(
                        &messages::INVALID_ASSIGNMENT_TARGET,
                        &[],
                        other.span(),
                    ))
                }
            }
        };
        let operator = op_kind.punctuation_text().unwrap().to_string();
        self.next_token()?;
        let right = self.isolate_cover(ctx, |p, c| p.parse_assignment_expression(c))?;
        let span = Span::new(start, self.prev_token_end);
        Ok(Expression::Assignment(AssignmentExpression {
            operator,
            left: Box::new(left),
            right: Box::new(right),
            span,
            loc: self.node_loc(span),
        }))
    }

    fn parse_yield_expression(&mut self, ctx: Context) -> Result<Expression> {
        if ctx.has(Context::IN_PARAMETERS) {
            return Err(self.fail(&messages::YIELD_IN_PARAMETERS, &[]));
        }
        self.check_unescaped_keyword()?;
        let start = self.token_pos();
        self.next_token()?; // yield

        // `yield*` requires an operand; plain `yield` takes one unless
        // ASI-style boundaries intervene (restricted production).
        let delegate = !self.newline_before() && self.eat(SyntaxKind::AsteriskToken)?;
        let argument = if delegate {
            Some(Box::new(self.parse_assignment_expression(ctx)?))
        } else if self.newline_before() || !self.at_expression_start() {
            None
        } else {
            Some(Box::new(self.parse_assignment_expression(ctx)?))
        };
        let span = Span::new(start, self.prev_token_end);
        Ok(Expression::Yield(YieldExpression {
            argument,
            delegate,
            span,
            loc: self.node_loc(span),
        }))
    }

    /// Whether the current token can begin an expression; used by the
    /// restricted productions (`yield`'s operand).
    fn at_expression_start(&self) -> bool {
        match self.current() {
            SyntaxKind::Identifier
            | SyntaxKind::PrivateIdentifier
            | SyntaxKind::NumericLiteral
            | SyntaxKind::BigIntLiteral
            | SyntaxKind::StringLiteral
            | SyntaxKind::NoSubstitutionTemplateLiteral
            | SyntaxKind::TemplateHead
            | SyntaxKind::OpenParenToken
            | SyntaxKind::OpenBracketToken
            | SyntaxKind::OpenBraceToken
            | SyntaxKind::PlusToken
            | SyntaxKind::MinusToken
            | SyntaxKind::TildeToken
            | SyntaxKind::ExclamationToken
            | SyntaxKind::PlusPlusToken
            | SyntaxKind::MinusMinusToken
            | SyntaxKind::SlashToken
            | SyntaxKind::SlashEqualsToken => true,
            kind => kind.is_keyword(),
        }
    }

    // ========================================================================
    // Arrow functions
    // ========================================================================

    /// Detect `x =>`, `async x =>`, and leave everything else alone.
    fn try_parse_ident_arrow(&mut self, ctx: Context) -> Result<Option<Expression>> {
        if !matches!(
            self.current(),
            SyntaxKind::Identifier
                | SyntaxKind::YieldKeyword
                | SyntaxKind::AwaitKeyword
                | SyntaxKind::LetKeyword
        ) {
            return Ok(None);
        }

        let saved = self.scanner.save_state();
        let next = self.scanner.scan();
        let next_newline = self.scanner.has_preceding_line_break();
        let next_kind = match next {
            Ok(kind) => kind,
            Err(_) => {
                self.scanner.restore_state(saved);
                return Ok(None);
            }
        };

        // `ident =>`
        if next_kind == SyntaxKind::EqualsGreaterThanToken && !next_newline {
            self.scanner.restore_state(saved);
            let start = self.token_pos();
            let param = self.parse_binding_identifier(ctx)?;
            return Ok(Some(self.parse_arrow_function(
                ctx,
                start,
                false,
                vec![Pattern::Identifier(param)],
                true,
            )?));
        }

        // `async ident =>` (no line terminator after `async`)
        let is_async_head = self.at_contextual("async")
            && !next_newline
            && matches!(
                next_kind,
                SyntaxKind::Identifier
                    | SyntaxKind::YieldKeyword
                    | SyntaxKind::AwaitKeyword
                    | SyntaxKind::LetKeyword
            );
        if is_async_head {
            let after = self.scanner.scan();
            let after_newline = self.scanner.has_preceding_line_break();
            let is_arrow = matches!(after, Ok(SyntaxKind::EqualsGreaterThanToken)) && !after_newline;
            self.scanner.restore_state(saved);
            if is_arrow {
                let start = self.token_pos();
                self.next_token()?; // async
                let param = self.parse_binding_identifier(ctx.with(Context::IN_ASYNC))?;
                return Ok(Some(self.parse_arrow_function(
                    ctx,
                    start,
                    true,
                    vec![Pattern::Identifier(param)],
                    true,
                )?));
            }
            return Ok(None);
        }

        self.scanner.restore_state(saved);
        Ok(None)
    }

    /// Finish an arrow whose head came from a parenthesized cover.
    fn parse_arrow_tail(&mut self, ctx: Context, head: ArrowHead) -> Result<Expression> {
        if self.newline_before() {
            return Err(self.fail(&messages::NEWLINE_BEFORE_ARROW, &[]));
        }
        let param_ctx = if head.is_async {
            ctx.with(Context::IN_ASYNC)
        } else {
            ctx
        };

        let count = head.elements.len();
        let mut params = Vec::with_capacity(count);
        let mut simple = true;
        for (index, element) in head.elements.into_iter().enumerate() {
            let param = if let Expression::Spread(spread) = element {
                if index + 1 != count {
                    return Err(self.fail_span(&messages::REST_MUST_BE_LAST, &[], spread.span));
                }
                if self.spread_commas.contains(&spread.span.start) {
                    return Err(self.fail_span(&messages::COMMA_AFTER_REST, &[], spread.span));
                }
                if let Expression::Assignment(ref assign) = *spread.argument {
                    return Err(self.fail_span(&messages::REST_WITH_DEFAULT, &[], assign.span));
                }
                let argument = self.reinterpret_as_binding_pattern(*spread.argument, param_ctx)?;
                simple = false;
                Pattern::Rest(RestElement {
                    argument: Box::new(argument),
                    span: spread.span,
                    loc: spread.loc,
                })
            } else {
                let pattern = self.reinterpret_as_binding_pattern(element, param_ctx)?;
                if !matches!(pattern, Pattern::Identifier(_)) {
                    simple = false;
                }
                pattern
            };
            params.push(param);
        }
        self.parse_arrow_function(ctx, head.span.start, head.is_async, params, simple)
    }

    /// Scope setup, parameter validation, and the body of an arrow.
    fn parse_arrow_function(
        &mut self,
        outer_ctx: Context,
        start: u32,
        is_async: bool,
        params: Vec<Pattern>,
        simple: bool,
    ) -> Result<Expression> {
        self.expect(SyntaxKind::EqualsGreaterThanToken)?;

        self.scopes.push(ScopeKind::Function);
        self.labels.enter_function();

        let mut names = Vec::new();
        for param in &params {
            crate::patterns::bound_names(param, &mut names);
        }
        let names: Vec<(String, Span)> = names
            .into_iter()
            .map(|(name, span)| (name.to_string(), span))
            .collect();
        for (name, _) in &names {
            self.scopes.declare_parameter(name, BindingKind::Parameter);
        }

        // Arrows are transparent to `super`, `new.target`, and class
        // initializer restrictions, so those flags survive; generator and
        // async-ness of the caller do not.
        let mut body_ctx = outer_ctx
            .without(
                Context::IN_PARAMETERS
                    | Context::DISALLOW_CALL
                    | Context::IN_GENERATOR
                    | Context::IN_ASYNC
                    | Context::IN_LOOP
                    | Context::IN_SWITCH,
            )
            .with(Context::IN_FUNCTION | Context::ALLOW_IN);
        if is_async {
            body_ctx = body_ctx.with(Context::IN_ASYNC);
        }

        // Arrow parameter lists never tolerate duplicates.
        self.validate_parameters(body_ctx, &names, simple, true)?;

        let (body, expression) = if self.at(SyntaxKind::OpenBraceToken) {
            let was_strict = body_ctx.has(Context::STRICT);
            let block = self.parse_function_body_block(&mut body_ctx, simple)?;
            if body_ctx.has(Context::STRICT) && !was_strict {
                self.validate_parameters(body_ctx, &names, simple, true)?;
            }
            (ArrowBody::Block(block), false)
        } else {
            let expr = self.isolate_cover(body_ctx, |p, c| p.parse_assignment_expression(c))?;
            (ArrowBody::Expression(Box::new(expr)), true)
        };

        self.labels.exit_function();
        self.scopes.pop();

        let span = Span::new(start, self.prev_token_end);
        Ok(Expression::Arrow(ArrowFunctionExpression {
            id: None,
            params,
            body,
            generator: false,
            is_async,
            expression,
            span,
            loc: self.node_loc(span),
        }))
    }

    // ========================================================================
    // Conditional and binary expressions
    // ========================================================================

    fn parse_conditional_expression(&mut self, ctx: Context) -> Result<Expression> {
        let start = self.token_pos();
        let (expr, _) = self.parse_binary_expression(ctx, OperatorPrecedence::LOWEST as u8)?;
        if !self.at(SyntaxKind::QuestionToken) {
            return Ok(expr);
        }
        self.next_token()?;
        let consequent = self.isolate_cover(ctx.with(Context::ALLOW_IN), |p, c| {
            p.parse_assignment_expression(c)
        })?;
        self.expect(SyntaxKind::ColonToken)?;
        let alternate = self.isolate_cover(ctx, |p, c| p.parse_assignment_expression(c))?;
        let span = Span::new(start, self.prev_token_end);
        Ok(Expression::Conditional(ConditionalExpression {
            test: Box::new(expr),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
            span,
            loc: self.node_loc(span),
        }))
    }

    /// Precedence climbing over binary and logical operators. Returns the
    /// expression and whether it is a bare unary form (illegal as an
    /// unparenthesized `**` base).
    fn parse_binary_expression(&mut self, ctx: Context, min: u8) -> Result<(Expression, bool)> {
        let start = self.token_pos();
        let (mut left, mut left_is_unary) = self.parse_unary_expression(ctx)?;

        let mut saw_nullish = false;
        let mut saw_logical = false;
        loop {
            let kind = self.current();
            if kind == SyntaxKind::InKeyword && !ctx.has(Context::ALLOW_IN) {
                break;
            }
            let Some(prec) = binary_precedence(kind) else { break };
            if (prec as u8) < min {
                break;
            }
            if kind.is_keyword() {
                self.check_unescaped_keyword()?;
            }
            if kind == SyntaxKind::AsteriskAsteriskToken && left_is_unary {
                return Err(self.fail(&messages::UNEXPECTED_TOKEN, &["**"]));
            }
            match kind {
                SyntaxKind::QuestionQuestionToken if saw_logical => {
                    return Err(self.fail(&messages::UNEXPECTED_TOKEN, &["??"]))
                }
                SyntaxKind::BarBarToken | SyntaxKind::AmpersandAmpersandToken if saw_nullish => {
                    return Err(self.fail(&messages::UNEXPECTED_TOKEN, &[kind.text()]))
                }
                _ => {}
            }

            let operator = kind
                .punctuation_text()
                .or_else(|| kind.keyword_text())
                .unwrap()
                .to_string();
            self.next_token()?;

            // `??` skips `||`/`&&` on its right so the mixing restriction
            // surfaces at this level; `**` groups right-to-left.
            let rhs_min = if kind == SyntaxKind::QuestionQuestionToken {
                OperatorPrecedence::BitwiseOr as u8
            } else if is_right_associative(kind) {
                prec as u8
            } else {
                prec.next()
            };
            let (right, _) = self.parse_binary_expression(ctx, rhs_min)?;

            // A private name is legal only as the immediate left operand
            // of `in`.
            if matches!(right, Expression::PrivateIdentifier(_)) {
                return Err(self.fail_span(
                    &messages::PRIVATE_NAME_OUTSIDE_CLASS,
                    &[],
                    right.span(),
                ));
            }
            if kind != SyntaxKind::InKeyword
                && matches!(left, Expression::PrivateIdentifier(_))
            {
                return Err(self.fail_span(
                    &messages::PRIVATE_NAME_OUTSIDE_CLASS,
                    &[],
                    left.span(),
                ));
            }

            let span = Span::new(start, self.prev_token_end);
            let loc = self.node_loc(span);
            left = match kind {
                SyntaxKind::QuestionQuestionToken
                | SyntaxKind::BarBarToken
                | SyntaxKind::AmpersandAmpersandToken => {
                    if kind == SyntaxKind::QuestionQuestionToken {
                        saw_nullish = true;
                    } else {
                        saw_logical = true;
                    }
                    Expression::Logical(LogicalExpression {
                        operator,
                        left: Box::new(left),
                        right: Box::new(right),
                        span,
                        loc,
                    })
                }
                _ => Expression::Binary(BinaryExpression {
                    operator,
                    left: Box::new(left),
                    right: Box::new(right),
                    span,
                    loc,
                }),
            };
            left_is_unary = false;
        }
        Ok((left, left_is_unary))
    }

    // ========================================================================
    // Unary and update expressions
    // ========================================================================

    fn parse_unary_expression(&mut self, ctx: Context) -> Result<(Expression, bool)> {
        let start = self.token_pos();
        match self.current() {
            SyntaxKind::DeleteKeyword
            | SyntaxKind::VoidKeyword
            | SyntaxKind::TypeOfKeyword
            | SyntaxKind::PlusToken
            | SyntaxKind::MinusToken
            | SyntaxKind::TildeToken
            | SyntaxKind::ExclamationToken => {
                self.check_unescaped_keyword()?;
                let kind = self.current();
                let operator = kind
                    .punctuation_text()
                    .or_else(|| kind.keyword_text())
                    .unwrap()
                    .to_string();
                self.next_token()?;
                let (argument, _) = self.parse_unary_expression(ctx)?;
                if kind == SyntaxKind::DeleteKeyword {
                    self.check_delete_target(&argument, ctx)?;
                }
                let span = Span::new(start, self.prev_token_end);
                Ok((
                    Expression::Unary(UnaryExpression {
                        operator,
                        argument: Box::new(argument),
                        prefix: true,
                        span,
                        loc: self.node_loc(span),
                    }),
                    true,
                ))
            }
            SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken => {
                let operator = self.current().punctuation_text().unwrap().to_string();
                self.next_token()?;
                let (argument, _) = self.parse_unary_expression(ctx)?;
                self.check_update_target(&argument, ctx)?;
                let span = Span::new(start, self.prev_token_end);
                Ok((
                    Expression::Update(UpdateExpression {
                        operator,
                        argument: Box::new(argument),
                        prefix: true,
                        span,
                        loc: self.node_loc(span),
                    }),
                    false,
                ))
            }
            SyntaxKind::AwaitKeyword if ctx.has(Context::IN_ASYNC) => {
                if ctx.has(Context::IN_PARAMETERS) {
                    return Err(self.fail(&messages::AWAIT_IN_PARAMETERS, &[]));
                }
                self.check_unescaped_keyword()?;
                self.next_token()?;
                let (argument, _) = self.parse_unary_expression(ctx)?;
                let span = Span::new(start, self.prev_token_end);
                Ok((
                    Expression::Await(AwaitExpression {
                        argument: Box::new(argument),
                        span,
                        loc: self.node_loc(span),
                    }),
                    true,
                ))
            }
            _ => self.parse_update_suffix(ctx),
        }
    }

    fn parse_update_suffix(&mut self, ctx: Context) -> Result<(Expression, bool)> {
        let start = self.token_pos();
        let expr = self.parse_left_hand_side_expression(ctx)?;
        if matches!(
            self.current(),
            SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken
        ) && !self.newline_before()
        {
            self.check_update_target(&expr, ctx)?;
            let operator = self.current().punctuation_text().unwrap().to_string();
            self.next_token()?;
            let span = Span::new(start, self.prev_token_end);
            return Ok((
                Expression::Update(UpdateExpression {
                    operator,
                    argument: Box::new(expr),
                    prefix: false,
                    span,
                    loc: self.node_loc(span),
                }),
                false,
            ));
        }
        Ok((expr, false))
    }

    fn check_update_target(&self, target: &Expression, ctx: Context) -> Result<()> {
        match target {
            Expression::Identifier(id) => {
                if ctx.has(Context::STRICT) && matches!(id.name.as_str(), "eval" | "arguments") {
                    return Err(self.fail_span(&messages::STRICT_EVAL_ARGUMENTS, &[], id.span));
                }
                Ok(())
            }
            Expression::Member(member) if !member.optional => Ok(()),
            other => Err(self.fail_span(&messages::INVALID_INCREMENT_TARGET, &[], other.span())),
        }
    }

    fn check_delete_target(&self, target: &Expression, ctx: Context) -> Result<()> {
        match target {
            Expression::Identifier(id) if ctx.has(Context::STRICT) => {
                Err(self.fail_span(&messages::STRICT_DELETE, &[], id.span))
            }
            Expression::Member(member) => {
                if matches!(*member.property, Expression::PrivateIdentifier(_)) {
                    return Err(self.fail_span(&messages::DELETE_PRIVATE_FIELD, &[], member.span));
                }
                Ok(())
            }
            Expression::Chain(chain) => self.check_delete_target(&chain.expression, ctx),
            _ => Ok(()),
        }
    }

    // ========================================================================
    // Left-hand-side expressions: member/call/optional chains
    // ========================================================================

    pub(crate) fn parse_left_hand_side_expression(&mut self, ctx: Context) -> Result<Expression> {
        let start = self.token_pos();
        let expr = match self.current() {
            SyntaxKind::NewKeyword => self.parse_new_expression(ctx)?,
            SyntaxKind::SuperKeyword => self.parse_super_keyword(ctx)?,
            SyntaxKind::ImportKeyword => self.parse_import_call_or_meta(ctx)?,
            _ => self.parse_primary_expression(ctx)?,
        };
        self.parse_call_and_member_chain(ctx, start, expr)
    }

    fn parse_call_and_member_chain(
        &mut self,
        ctx: Context,
        start: u32,
        mut expr: Expression,
    ) -> Result<Expression> {
        let mut has_optional = false;
        let mut first = true;
        loop {
            match self.current() {
                SyntaxKind::DotToken => {
                    self.next_token()?;
                    let property = self.parse_member_property(ctx)?;
                    let span = Span::new(start, self.prev_token_end);
                    expr = Expression::Member(MemberExpression {
                        object: Box::new(expr),
                        property: Box::new(property),
                        computed: false,
                        optional: false,
                        span,
                        loc: self.node_loc(span),
                    });
                }
                SyntaxKind::OpenBracketToken => {
                    self.next_token()?;
                    let property = self.isolate_cover(ctx.with(Context::ALLOW_IN), |p, c| {
                        p.parse_expression(c)
                    })?;
                    self.expect(SyntaxKind::CloseBracketToken)?;
                    let span = Span::new(start, self.prev_token_end);
                    expr = Expression::Member(MemberExpression {
                        object: Box::new(expr),
                        property: Box::new(property),
                        computed: true,
                        optional: false,
                        span,
                        loc: self.node_loc(span),
                    });
                }
                SyntaxKind::QuestionDotToken => {
                    if matches!(expr, Expression::Super(_)) {
                        return Err(self.fail(&messages::SUPER_OUTSIDE_METHOD, &[]));
                    }
                    if ctx.has(Context::DISALLOW_CALL) {
                        return Err(self.fail(&messages::NEW_OPTIONAL_CHAIN, &[]));
                    }
                    has_optional = true;
                    self.next_token()?;
                    match self.current() {
                        SyntaxKind::OpenParenToken => {
                            let arguments = self.parse_arguments(ctx)?;
                            let span = Span::new(start, self.prev_token_end);
                            expr = Expression::Call(CallExpression {
                                callee: Box::new(expr),
                                arguments,
                                optional: true,
                                span,
                                loc: self.node_loc(span),
                            });
                        }
                        SyntaxKind::OpenBracketToken => {
                            self.next_token()?;
                            let property =
                                self.isolate_cover(ctx.with(Context::ALLOW_IN), |p, c| {
                                    p.parse_expression(c)
                                })?;
                            self.expect(SyntaxKind::CloseBracketToken)?;
                            let span = Span::new(start, self.prev_token_end);
                            expr = Expression::Member(MemberExpression {
                                object: Box::new(expr),
                                property: Box::new(property),
                                computed: true,
                                optional: true,
                                span,
                                loc: self.node_loc(span),
                            });
                        }
                        SyntaxKind::NoSubstitutionTemplateLiteral | SyntaxKind::TemplateHead => {
                            return Err(
                                self.fail(&messages::TAGGED_TEMPLATE_OPTIONAL_CHAIN, &[])
                            )
                        }
                        _ => {
                            let property = self.parse_member_property(ctx)?;
                            let span = Span::new(start, self.prev_token_end);
                            expr = Expression::Member(MemberExpression {
                                object: Box::new(expr),
                                property: Box::new(property),
                                computed: false,
                                optional: true,
                                span,
                                loc: self.node_loc(span),
                            });
                        }
                    }
                }
                SyntaxKind::OpenParenToken if !ctx.has(Context::DISALLOW_CALL) => {
                    // `async (` directly at the head is the async-arrow
                    // cover grammar: arguments and parameters at once.
                    if first && self.is_plain_async_identifier(&expr) && !self.newline_before() {
                        match self.parse_async_call_or_arrow_head(ctx, expr)? {
                            AsyncCover::Head(dummy) => return Ok(dummy),
                            AsyncCover::Call(call) => expr = call,
                        }
                    } else {
                        let arguments = self.parse_arguments(ctx)?;
                        let span = Span::new(start, self.prev_token_end);
                        expr = Expression::Call(CallExpression {
                            callee: Box::new(expr),
                            arguments,
                            optional: false,
                            span,
                            loc: self.node_loc(span),
                        });
                    }
                }
                SyntaxKind::NoSubstitutionTemplateLiteral | SyntaxKind::TemplateHead => {
                    if has_optional {
                        return Err(self.fail(&messages::TAGGED_TEMPLATE_OPTIONAL_CHAIN, &[]));
                    }
                    if matches!(expr, Expression::Super(_)) {
                        return Err(self.fail(&messages::SUPER_OUTSIDE_METHOD, &[]));
                    }
                    let quasi = self.parse_template_literal(ctx, true)?;
                    let span = Span::new(start, self.prev_token_end);
                    expr = Expression::TaggedTemplate(TaggedTemplateExpression {
                        tag: Box::new(expr),
                        quasi,
                        span,
                        loc: self.node_loc(span),
                    });
                }
                _ => break,
            }
            first = false;
        }

        if has_optional {
            if ctx.has(Context::DISALLOW_CALL) {
                return Err(self.fail(&messages::NEW_OPTIONAL_CHAIN, &[]));
            }
            let span = Span::new(start, self.prev_token_end);
            expr = Expression::Chain(ChainExpression {
                expression: Box::new(expr),
                span,
                loc: self.node_loc(span),
            });
        }
        Ok(expr)
    }

    /// Member property name after `.` or `?.`: any IdentifierName, or a
    /// private name (class code only).
    fn parse_member_property(&mut self, ctx: Context) -> Result<Expression> {
        if self.at(SyntaxKind::PrivateIdentifier) {
            if !ctx.has(Context::IN_CLASS_BODY) {
                return Err(self.fail(&messages::PRIVATE_NAME_OUTSIDE_CLASS, &[]));
            }
            let start = self.token_pos();
            let name = self.scanner.token_value().to_string();
            self.next_token()?;
            let span = self.finish(start);
            return Ok(Expression::PrivateIdentifier(PrivateIdentifier {
                name,
                span,
                loc: self.node_loc(span),
            }));
        }
        Ok(Expression::Identifier(self.parse_identifier_name()?))
    }

    fn is_plain_async_identifier(&self, expr: &Expression) -> bool {
        matches!(expr, Expression::Identifier(id)
            if id.name == "async"
                && &self.src[id.span.start as usize..id.span.end as usize] == "async")
    }

    /// `async (...)`: parse the parenthesized list once; `=>` afterwards
    /// makes it an async arrow head, anything else a call to `async`.
    fn parse_async_call_or_arrow_head(
        &mut self,
        ctx: Context,
        callee: Expression,
    ) -> Result<AsyncCover> {
        let head_start = callee.span().start;
        let (elements, _trailing) = self.parse_cover_paren_elements(ctx)?;
        if self.at(SyntaxKind::EqualsGreaterThanToken) {
            let span = Span::new(head_start, self.prev_token_end);
            self.pending_arrow_head = Some(ArrowHead {
                span,
                is_async: true,
                elements,
            });
            return Ok(AsyncCover::Head(Expression::Sequence(SequenceExpression {
                expressions: Vec::new(),
                span,
                loc: self.node_loc(span),
            })));
        }
        // A call: spreads are ordinary argument spreads, trailing commas
        // are legal, and any cover markers keep propagating.
        let span = Span::new(head_start, self.prev_token_end);
        Ok(AsyncCover::Call(Expression::Call(CallExpression {
            callee: Box::new(callee),
            arguments: elements,
            optional: false,
            span,
            loc: self.node_loc(span),
        })))
    }

    // ========================================================================
    // new / super / import
    // ========================================================================

    fn parse_new_expression(&mut self, ctx: Context) -> Result<Expression> {
        let start = self.token_pos();
        self.check_unescaped_keyword()?;
        self.expect(SyntaxKind::NewKeyword)?;

        if self.at(SyntaxKind::DotToken) {
            self.next_token()?;
            if !self.at_contextual("target") {
                return Err(self.fail(&messages::INVALID_META_PROPERTY, &[]));
            }
            if !ctx.has(Context::ALLOW_NEW_TARGET) {
                return Err(self.fail(&messages::NEW_TARGET_OUTSIDE_FUNCTION, &[]));
            }
            let property = self.parse_identifier_name()?;
            let span = Span::new(start, self.prev_token_end);
            let meta_span = Span::new(start, start + 3);
            return Ok(Expression::MetaProperty(MetaProperty {
                meta: Identifier {
                    name: "new".to_string(),
                    span: meta_span,
                    loc: self.node_loc(meta_span),
                },
                property,
                span,
                loc: self.node_loc(span),
            }));
        }

        // The callee is a member chain without call consumption: call
        // parentheses belong to `new`, and optional chains are illegal.
        let callee_ctx = ctx.with(Context::DISALLOW_CALL);
        let callee_start = self.token_pos();
        let callee = match self.current() {
            SyntaxKind::NewKeyword => self.parse_new_expression(callee_ctx)?,
            SyntaxKind::SuperKeyword => self.parse_super_keyword(callee_ctx)?,
            SyntaxKind::ImportKeyword => return Err(self.unexpected()),
            _ => self.parse_primary_expression(callee_ctx)?,
        };
        let callee = self.parse_call_and_member_chain(callee_ctx, callee_start, callee)?;

        let arguments = if self.at(SyntaxKind::OpenParenToken) {
            self.parse_arguments(ctx)?
        } else {
            Vec::new()
        };
        let span = Span::new(start, self.prev_token_end);
        Ok(Expression::New(NewExpression {
            callee: Box::new(callee),
            arguments,
            span,
            loc: self.node_loc(span),
        }))
    }

    fn parse_super_keyword(&mut self, ctx: Context) -> Result<Expression> {
        let start = self.token_pos();
        self.check_unescaped_keyword()?;
        self.expect(SyntaxKind::SuperKeyword)?;
        match self.current() {
            SyntaxKind::OpenParenToken if !ctx.has(Context::DISALLOW_CALL) => {
                if !ctx.has(Context::ALLOW_SUPER_CALL) {
                    return Err(self.fail(&messages::SUPER_CALL_OUTSIDE_CONSTRUCTOR, &[]));
                }
            }
            SyntaxKind::DotToken | SyntaxKind::OpenBracketToken => {
                if !ctx.has(Context::ALLOW_SUPER_PROPERTY) {
                    return Err(self.fail(&messages::SUPER_OUTSIDE_METHOD, &[]));
                }
            }
            _ => return Err(self.fail(&messages::SUPER_OUTSIDE_METHOD, &[])),
        }
        let span = self.finish(start);
        Ok(Expression::Super(Super {
            span,
            loc: self.node_loc(span),
        }))
    }

    fn parse_import_call_or_meta(&mut self, ctx: Context) -> Result<Expression> {
        let start = self.token_pos();
        self.check_unescaped_keyword()?;
        self.expect(SyntaxKind::ImportKeyword)?;

        if self.at(SyntaxKind::DotToken) {
            self.next_token()?;
            if !self.at_contextual("meta") {
                return Err(self.fail(&messages::IMPORT_META_OUTSIDE_MODULE, &[]));
            }
            if !ctx.has(Context::MODULE) {
                return Err(self.fail(&messages::IMPORT_META_OUTSIDE_MODULE, &[]));
            }
            let property = self.parse_identifier_name()?;
            let span = Span::new(start, self.prev_token_end);
            let meta_span = Span::new(start, start + 6);
            return Ok(Expression::MetaProperty(MetaProperty {
                meta: Identifier {
                    name: "import".to_string(),
                    span: meta_span,
                    loc: self.node_loc(meta_span),
                },
                property,
                span,
                loc: self.node_loc(span),
            }));
        }

        self.expect(SyntaxKind::OpenParenToken)?;
        if self.at(SyntaxKind::DotDotDotToken) {
            return Err(self.fail(&messages::IMPORT_CALL_ARITY, &[]));
        }
        let source = self.isolate_cover(ctx.with(Context::ALLOW_IN), |p, c| {
            p.parse_assignment_expression(c)
        })?;
        if self.at(SyntaxKind::CommaToken) {
            self.next_token()?;
            if !self.at(SyntaxKind::CloseParenToken) {
                return Err(self.fail(&messages::IMPORT_CALL_ARITY, &[]));
            }
        }
        self.expect(SyntaxKind::CloseParenToken)?;
        let span = Span::new(start, self.prev_token_end);
        Ok(Expression::Import(ImportExpression {
            source: Box::new(source),
            span,
            loc: self.node_loc(span),
        }))
    }

    fn parse_arguments(&mut self, ctx: Context) -> Result<Vec<Expression>> {
        self.expect(SyntaxKind::OpenParenToken)?;
        let mut arguments = Vec::new();
        while !self.at(SyntaxKind::CloseParenToken) {
            let argument = if self.at(SyntaxKind::DotDotDotToken) {
                let start = self.token_pos();
                self.next_token()?;
                let value = self.isolate_cover(ctx.with(Context::ALLOW_IN), |p, c| {
                    p.parse_assignment_expression(c)
                })?;
                let span = Span::new(start, self.prev_token_end);
                Expression::Spread(SpreadElement {
                    argument: Box::new(value),
                    span,
                    loc: self.node_loc(span),
                })
            } else {
                self.isolate_cover(ctx.with(Context::ALLOW_IN), |p, c| {
                    p.parse_assignment_expression(c)
                })?
            };
            arguments.push(argument);
            if !self.at(SyntaxKind::CloseParenToken) {
                self.expect(SyntaxKind::CommaToken)?;
            }
        }
        self.expect(SyntaxKind::CloseParenToken)?;
        Ok(arguments)
    }

    // ========================================================================
    // Primary expressions
    // ========================================================================

    fn parse_primary_expression(&mut self, ctx: Context) -> Result<Expression> {
        match self.current() {
            SyntaxKind::Identifier => {
                if self.at_contextual("async") && self.async_function_follows()? {
                    return self.parse_function_expression(ctx, true);
                }
                Ok(Expression::Identifier(self.parse_identifier_reference(ctx)?))
            }
            SyntaxKind::YieldKeyword | SyntaxKind::AwaitKeyword | SyntaxKind::LetKeyword => {
                Ok(Expression::Identifier(self.parse_identifier_reference(ctx)?))
            }
            SyntaxKind::NumericLiteral | SyntaxKind::BigIntLiteral => {
                self.parse_numeric_literal_token(ctx).map(Expression::Literal)
            }
            SyntaxKind::StringLiteral => {
                let literal = self.parse_string_literal_token()?;
                self.check_string_strict_flags(&literal, ctx)?;
                Ok(Expression::Literal(literal))
            }
            SyntaxKind::TrueKeyword | SyntaxKind::FalseKeyword | SyntaxKind::NullKeyword => {
                self.check_unescaped_keyword()?;
                let start = self.token_pos();
                let kind = self.current();
                let raw = self.scanner.token_raw().to_string();
                self.next_token()?;
                let span = self.finish(start);
                let value = match kind {
                    SyntaxKind::TrueKeyword => LiteralValue::Boolean(true),
                    SyntaxKind::FalseKeyword => LiteralValue::Boolean(false),
                    _ => LiteralValue::Null,
                };
                Ok(Expression::Literal(Literal {
                    value,
                    raw,
                    regex: None,
                    bigint: None,
                    span,
                    loc: self.node_loc(span),
                }))
            }
            SyntaxKind::ThisKeyword => {
                self.check_unescaped_keyword()?;
                let start = self.token_pos();
                self.next_token()?;
                let span = self.finish(start);
                Ok(Expression::This(ThisExpression {
                    span,
                    loc: self.node_loc(span),
                }))
            }
            SyntaxKind::SlashToken | SyntaxKind::SlashEqualsToken => self.parse_regex_literal(),
            SyntaxKind::OpenBracketToken => self.parse_array_literal(ctx),
            SyntaxKind::OpenBraceToken => self.parse_object_literal(ctx),
            SyntaxKind::OpenParenToken => self.parse_cover_paren_expression(ctx),
            SyntaxKind::FunctionKeyword => self.parse_function_expression(ctx, false),
            SyntaxKind::ClassKeyword => self.parse_class_expression(ctx),
            SyntaxKind::NoSubstitutionTemplateLiteral | SyntaxKind::TemplateHead => {
                let template = self.parse_template_literal(ctx, false)?;
                Ok(Expression::Template(template))
            }
            SyntaxKind::PrivateIdentifier => {
                if !ctx.has(Context::IN_CLASS_BODY) {
                    return Err(self.fail(&messages::PRIVATE_NAME_OUTSIDE_CLASS, &[]));
                }
                let start = self.token_pos();
                let name = self.scanner.token_value().to_string();
                self.next_token()?;
                let span = self.finish(start);
                // Only legal immediately left of `in`; the climbing loop
                // enforces the pairing.
                if !self.at(SyntaxKind::InKeyword) || !ctx.has(Context::ALLOW_IN) {
                    return Err(self.fail_span(&messages::PRIVATE_NAME_OUTSIDE_CLASS, &[], span));
                }
                Ok(Expression::PrivateIdentifier(PrivateIdentifier {
                    name,
                    span,
                    loc: self.node_loc(span),
                }))
            }
            SyntaxKind::EndOfFileToken => Err(self.fail(&messages::UNEXPECTED_EOF, &[])),
            kind if kind.is_keyword() => {
                Err(self.fail(&messages::UNEXPECTED_RESERVED, &[self.scanner.token_value()]))
            }
            _ => Err(self.fail(&messages::EXPRESSION_EXPECTED, &[])),
        }
    }

    fn async_function_follows(&mut self) -> Result<bool> {
        let saved = self.scanner.save_state();
        let next = self.scanner.scan();
        let newline = self.scanner.has_preceding_line_break();
        self.scanner.restore_state(saved);
        Ok(matches!(next, Ok(SyntaxKind::FunctionKeyword)) && !newline)
    }

    /// Validate and build an identifier used as an expression.
    pub(crate) fn parse_identifier_reference(&mut self, ctx: Context) -> Result<Identifier> {
        let start = self.token_pos();
        let kind = self.current();
        let name = self.scanner.token_value().to_string();
        match kind {
            SyntaxKind::Identifier => self.check_reference_name(&name, ctx)?,
            SyntaxKind::YieldKeyword => {
                if ctx.has(Context::STRICT) {
                    return Err(self.fail(&messages::UNEXPECTED_RESERVED, &["yield"]));
                }
                if ctx.has(Context::IN_GENERATOR) {
                    return Err(self.fail(&messages::UNEXPECTED_TOKEN, &["yield"]));
                }
            }
            SyntaxKind::AwaitKeyword => {
                if ctx.has(Context::MODULE)
                    || ctx.has(Context::IN_ASYNC)
                    || ctx.has(Context::IN_CLASS_STATIC_BLOCK)
                {
                    return Err(self.fail(&messages::UNEXPECTED_RESERVED, &["await"]));
                }
            }
            SyntaxKind::LetKeyword => {
                if ctx.has(Context::STRICT) {
                    return Err(self.fail(&messages::UNEXPECTED_RESERVED, &["let"]));
                }
            }
            _ => return Err(self.fail(&messages::UNEXPECTED_RESERVED, &[&name])),
        }
        self.next_token()?;
        let span = self.finish(start);
        Ok(Identifier {
            name,
            span,
            loc: self.node_loc(span),
        })
    }

    /// Reference-position rules for plain identifier tokens.
    fn check_reference_name(&self, name: &str, ctx: Context) -> Result<()> {
        match name {
            "implements" | "interface" | "package" | "private" | "protected" | "public"
            | "static" => {
                if ctx.has(Context::STRICT) {
                    return Err(self.fail(&messages::UNEXPECTED_RESERVED, &[name]));
                }
            }
            "arguments" => {
                if ctx.has(Context::IN_CLASS_FIELD_INIT)
                    || ctx.has(Context::IN_CLASS_STATIC_BLOCK)
                {
                    return Err(self.fail(&messages::ARGUMENTS_IN_CLASS_FIELD, &[]));
                }
            }
            _ => {}
        }
        Ok(())
    }

    // ========================================================================
    // Literals
    // ========================================================================

    pub(crate) fn parse_string_literal_token(&mut self) -> Result<Literal> {
        let start = self.token_pos();
        let value = self.scanner.token_value().to_string();
        let raw = self.scanner.token_raw().to_string();
        self.next_token()?;
        let span = self.finish(start);
        Ok(Literal {
            value: LiteralValue::String(value),
            raw,
            regex: None,
            bigint: None,
            span,
            loc: self.node_loc(span),
        })
    }

    /// Legacy escape forms survive scanning but become errors once the
    /// context is known to be strict (or annex B is disabled).
    fn check_string_strict_flags(&self, literal: &Literal, ctx: Context) -> Result<()> {
        let flags = self.string_flags_of(literal.span);
        if ctx.has(Context::STRICT) || !self.web_compat() {
            if flags.contains(TokenFlags::OCTAL_ESCAPE) {
                return Err(self.fail_span(&messages::STRICT_OCTAL_ESCAPE, &[], literal.span));
            }
            if flags.contains(TokenFlags::EIGHT_NINE_ESCAPE) {
                return Err(self.fail_span(&messages::STRICT_EIGHT_NINE_ESCAPE, &[], literal.span));
            }
        }
        Ok(())
    }

    /// The flags of the string token just consumed. The scanner has
    /// moved on, so the flags were captured before `next_token`; this
    /// helper recomputes them from the raw text, which is cheaper than
    /// threading them through every literal call site.
    fn string_flags_of(&self, span: Span) -> TokenFlags {
        let raw = &self.src[span.start as usize..span.end as usize];
        let mut flags = TokenFlags::NONE;
        let bytes = raw.as_bytes();
        let mut i = 0;
        while i + 1 < bytes.len() {
            if bytes[i] == b'\\' {
                match bytes[i + 1] {
                    b'0' => {
                        if matches!(bytes.get(i + 2), Some(b'0'..=b'9')) {
                            flags |= TokenFlags::OCTAL_ESCAPE;
                        }
                        i += 2;
                    }
                    b'1'..=b'7' => {
                        flags |= TokenFlags::OCTAL_ESCAPE;
                        i += 2;
                    }
                    b'8' | b'9' => {
                        flags |= TokenFlags::EIGHT_NINE_ESCAPE;
                        i += 2;
                    }
                    _ => i += 2,
                }
            } else {
                i += 1;
            }
        }
        flags
    }

    fn parse_numeric_literal_token(&mut self, ctx: Context) -> Result<Literal> {
        let start = self.token_pos();
        let flags = self.token_flags();
        if ctx.has(Context::STRICT) || !self.web_compat() {
            if flags.contains(TokenFlags::LEGACY_OCTAL) {
                return Err(self.fail(&messages::STRICT_OCTAL, &[]));
            }
            if flags.contains(TokenFlags::NON_OCTAL_DECIMAL) {
                return Err(self.fail(&messages::STRICT_DECIMAL_WITH_LEADING_ZERO, &[]));
            }
        }
        let is_bigint = self.at(SyntaxKind::BigIntLiteral);
        let raw = self.scanner.token_raw().to_string();
        let (value, bigint) = if is_bigint {
            (LiteralValue::BigInt, Some(self.scanner.token_value().to_string()))
        } else {
            (LiteralValue::Number(self.scanner.token_number()), None)
        };
        self.next_token()?;
        let span = self.finish(start);
        Ok(Literal {
            value,
            raw,
            regex: None,
            bigint,
            span,
            loc: self.node_loc(span),
        })
    }

    fn parse_regex_literal(&mut self) -> Result<Expression> {
        let start = self.token_pos();
        let rescan = self.scanner.rescan_slash_token();
        rescan.map_err(|e| self.locate(e))?;
        let pattern = self.scanner.regex_pattern().to_string();
        let flags = self.scanner.regex_flags().to_string();
        let raw = self.scanner.token_raw().to_string();
        self.next_token()?;
        let span = self.finish(start);
        Ok(Expression::Literal(Literal {
            value: LiteralValue::Regex,
            raw,
            regex: Some(RegexInfo { pattern, flags }),
            bigint: None,
            span,
            loc: self.node_loc(span),
        }))
    }

    // ========================================================================
    // Array and object literals
    // ========================================================================

    fn parse_array_literal(&mut self, ctx: Context) -> Result<Expression> {
        let start = self.token_pos();
        self.expect(SyntaxKind::OpenBracketToken)?;
        let mut elements = Vec::new();
        while !self.at(SyntaxKind::CloseBracketToken) {
            if self.at(SyntaxKind::CommaToken) {
                self.next_token()?;
                elements.push(None);
                continue;
            }
            let element = if self.at(SyntaxKind::DotDotDotToken) {
                let spread_start = self.token_pos();
                self.next_token()?;
                let argument = self.inherit_cover(ctx.with(Context::ALLOW_IN), |p, c| {
                    p.parse_assignment_expression(c)
                })?;
                let span = Span::new(spread_start, self.prev_token_end);
                Expression::Spread(SpreadElement {
                    argument: Box::new(argument),
                    span,
                    loc: self.node_loc(span),
                })
            } else {
                self.inherit_cover(ctx.with(Context::ALLOW_IN), |p, c| {
                    p.parse_assignment_expression(c)
                })?
            };
            let spread_pos = matches!(element, Expression::Spread(_)).then(|| element.span().start);
            elements.push(Some(element));
            if !self.at(SyntaxKind::CloseBracketToken) {
                self.expect(SyntaxKind::CommaToken)?;
                if let Some(pos) = spread_pos {
                    self.spread_commas.insert(pos);
                }
            }
        }
        self.expect(SyntaxKind::CloseBracketToken)?;
        let span = self.finish(start);
        Ok(Expression::Array(ArrayExpression {
            elements,
            span,
            loc: self.node_loc(span),
        }))
    }

    fn parse_object_literal(&mut self, ctx: Context) -> Result<Expression> {
        let start = self.token_pos();
        self.expect(SyntaxKind::OpenBraceToken)?;
        let mut properties = Vec::new();
        let mut proto_count = 0u32;
        while !self.at(SyntaxKind::CloseBraceToken) {
            let member = if self.at(SyntaxKind::DotDotDotToken) {
                let spread_start = self.token_pos();
                self.next_token()?;
                let argument = self.inherit_cover(ctx.with(Context::ALLOW_IN), |p, c| {
                    p.parse_assignment_expression(c)
                })?;
                let span = Span::new(spread_start, self.prev_token_end);
                ObjectMember::Spread(SpreadElement {
                    argument: Box::new(argument),
                    span,
                    loc: self.node_loc(span),
                })
            } else {
                let property = self.parse_object_property(ctx)?;
                if is_proto_definition(&property) {
                    proto_count += 1;
                    if proto_count == 2 {
                        self.duplicate_proto.get_or_insert(property.span);
                    }
                }
                ObjectMember::Property(property)
            };
            let spread_pos = match &member {
                ObjectMember::Spread(spread) => Some(spread.span.start),
                ObjectMember::Property(_) => None,
            };
            properties.push(member);
            if !self.at(SyntaxKind::CloseBraceToken) {
                self.expect(SyntaxKind::CommaToken)?;
                if let Some(pos) = spread_pos {
                    self.spread_commas.insert(pos);
                }
            }
        }
        self.expect(SyntaxKind::CloseBraceToken)?;
        let span = self.finish(start);
        Ok(Expression::Object(ObjectExpression {
            properties,
            span,
            loc: self.node_loc(span),
        }))
    }

    fn parse_object_property(&mut self, ctx: Context) -> Result<Property> {
        let start = self.token_pos();

        // Accessor / async / generator prefixes, each of which can also
        // simply be a property name.
        if (self.at_contextual("get") || self.at_contextual("set"))
            && self.property_modifier_is_prefix()?
        {
            let kind = if self.at_contextual("get") {
                PropertyKind::Get
            } else {
                PropertyKind::Set
            };
            self.next_token()?;
            let (key, computed) = self.parse_property_key(ctx)?;
            let value = self.parse_object_method_value(ctx, false, false)?;
            self.check_accessor_params(kind, &value)?;
            let span = self.finish(start);
            return Ok(Property {
                key: Box::new(key),
                value: Box::new(Expression::Function(value)),
                kind,
                computed,
                method: false,
                shorthand: false,
                span,
                loc: self.node_loc(span),
            });
        }

        let mut is_async = false;
        let mut is_generator = false;
        if self.at_contextual("async") && self.property_modifier_is_prefix()? {
            let saved = self.scanner.save_state();
            self.scanner.scan().map_err(|e| self.locate(e))?;
            let newline = self.scanner.has_preceding_line_break();
            self.scanner.restore_state(saved);
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

        let key_token = self.current();
        let (key, computed) = self.parse_property_key(ctx)?;

        // Method shorthand.
        if self.at(SyntaxKind::OpenParenToken) {
            let value = self.parse_object_method_value(ctx, is_async, is_generator)?;
            let span = self.finish(start);
            return Ok(Property {
                key: Box::new(key),
                value: Box::new(Expression::Function(value)),
                kind: PropertyKind::Init,
                computed,
                method: true,
                shorthand: false,
                span,
                loc: self.node_loc(span),
            });
        }
        if is_async || is_generator {
            return Err(self.fail(&messages::TOKEN_EXPECTED, &["("]));
        }

        // key: value
        if self.eat(SyntaxKind::ColonToken)? {
            let value = self.inherit_cover(ctx.with(Context::ALLOW_IN), |p, c| {
                p.parse_assignment_expression(c)
            })?;
            let span = self.finish(start);
            return Ok(Property {
                key: Box::new(key),
                value: Box::new(value),
                kind: PropertyKind::Init,
                computed,
                method: false,
                shorthand: false,
                span,
                loc: self.node_loc(span),
            });
        }

        // Shorthand property: the key is an identifier reference.
        let Expression::Identifier(ref id) = key else {
            return Err(self.fail(&messages::TOKEN_EXPECTED, &[":"]));
        };
        if key_token != SyntaxKind::Identifier {
            // Keyword tokens: only the contextually unreserved ones work.
            match key_token {
                SyntaxKind::YieldKeyword => {
                    if ctx.has(Context::STRICT) || ctx.has(Context::IN_GENERATOR) {
                        return Err(self.fail_span(
                            &messages::UNEXPECTED_RESERVED,
                            &["yield"],
                            id.span,
                        ));
                    }
                }
                SyntaxKind::AwaitKeyword => {
                    if ctx.has(Context::MODULE) || ctx.has(Context::IN_ASYNC) {
                        return Err(self.fail_span(
                            &messages::UNEXPECTED_RESERVED,
                            &["await"],
                            id.span,
                        ));
                    }
                }
                SyntaxKind::LetKeyword => {
                    if ctx.has(Context::STRICT) {
                        return Err(self.fail_span(
                            &messages::UNEXPECTED_RESERVED,
                            &["let"],
                            id.span,
                        ));
                    }
                }
                _ => {
                    return Err(self.fail_span(
                        &messages::UNEXPECTED_RESERVED,
                        &[&id.name],
                        id.span,
                    ))
                }
            }
        } else {
            self.check_reference_name(&id.name, ctx)?;
        }

        if self.at(SyntaxKind::EqualsToken) {
            // CoverInitializedName: legal only if the whole literal is
            // later reinterpreted as a pattern.
            self.next_token()?;
            let default = self.inherit_cover(ctx.with(Context::ALLOW_IN), |p, c| {
                p.parse_assignment_expression(c)
            })?;
            let span = self.finish(start);
            self.cover_initialized_name.get_or_insert(span);
            let value = Expression::Assignment(AssignmentExpression {
                operator: "=".to_string(),
                left: Box::new(Pattern::Identifier(id.clone())),
                right: Box::new(default),
                span,
                loc: self.node_loc(span),
            });
            return Ok(Property {
                key: Box::new(key),
                value: Box::new(value),
                kind: PropertyKind::Init,
                computed: false,
                method: false,
                shorthand: true,
                span,
                loc: self.node_loc(span),
            });
        }

        let span = self.finish(start);
        let value = Expression::Identifier(id.clone());
        Ok(Property {
            key: Box::new(key),
            value: Box::new(value),
            kind: PropertyKind::Init,
            computed: false,
            method: false,
            shorthand: true,
            span,
            loc: self.node_loc(span),
        })
    }

    /// A `get`/`set`/`async` word starts a method only when a property
    /// name (not a delimiter) follows.
    fn property_modifier_is_prefix(&mut self) -> Result<bool> {
        Ok(!matches!(
            self.peek_token()?,
            SyntaxKind::CommaToken
                | SyntaxKind::CloseBraceToken
                | SyntaxKind::OpenParenToken
                | SyntaxKind::ColonToken
                | SyntaxKind::EqualsToken
        ))
    }

    /// Property keys shared between object literals, classes, and
    /// binding patterns.
    pub(crate) fn parse_property_key(&mut self, ctx: Context) -> Result<(Expression, bool)> {
        match self.current() {
            SyntaxKind::StringLiteral => {
                let literal = self.parse_string_literal_token()?;
                self.check_string_strict_flags(&literal, ctx)?;
                Ok((Expression::Literal(literal), false))
            }
            SyntaxKind::NumericLiteral | SyntaxKind::BigIntLiteral => {
                Ok((Expression::Literal(self.parse_numeric_literal_token(ctx)?), false))
            }
            SyntaxKind::OpenBracketToken => {
                self.next_token()?;
                let key = self.isolate_cover(ctx.with(Context::ALLOW_IN), |p, c| {
                    p.parse_assignment_expression(c)
                })?;
                self.expect(SyntaxKind::CloseBracketToken)?;
                Ok((key, true))
            }
            SyntaxKind::PrivateIdentifier => {
                Err(self.fail(&messages::PRIVATE_NAME_OUTSIDE_CLASS, &[]))
            }
            kind if kind == SyntaxKind::Identifier || kind.is_keyword() => {
                Ok((Expression::Identifier(self.parse_identifier_name()?), false))
            }
            _ => Err(self.fail(&messages::PROPERTY_NAME_EXPECTED, &[])),
        }
    }

    /// The function value of an object-literal method or accessor.
    fn parse_object_method_value(
        &mut self,
        ctx: Context,
        is_async: bool,
        is_generator: bool,
    ) -> Result<FunctionExpression> {
        let start = self.token_pos();
        let (params, body, _) = self.parse_function_tail(
            ctx,
            is_async,
            is_generator,
            Context::ALLOW_SUPER_PROPERTY,
            true,
        )?;
        let span = Span::new(start, self.prev_token_end);
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

    fn check_accessor_params(&self, kind: PropertyKind, value: &FunctionExpression) -> Result<()> {
        match kind {
            PropertyKind::Get => {
                if !value.params.is_empty() {
                    return Err(self.fail_span(&messages::GETTER_PARAMETERS, &[], value.span));
                }
            }
            PropertyKind::Set => {
                if value.params.len() != 1 {
                    return Err(self.fail_span(&messages::SETTER_PARAMETERS, &[], value.span));
                }
                if matches!(value.params[0], Pattern::Rest(_)) {
                    return Err(self.fail_span(&messages::SETTER_REST_PARAMETER, &[], value.span));
                }
            }
            PropertyKind::Init => {}
        }
        Ok(())
    }

    // ========================================================================
    // Templates
    // ========================================================================

    /// Template literal; `tagged` templates tolerate invalid escapes
    /// (their cooked value is absent).
    pub(crate) fn parse_template_literal(
        &mut self,
        ctx: Context,
        tagged: bool,
    ) -> Result<TemplateLiteral> {
        let start = self.token_pos();
        let mut quasis = Vec::new();
        let mut expressions = Vec::new();

        if self.at(SyntaxKind::NoSubstitutionTemplateLiteral) {
            quasis.push(self.template_element(tagged, true)?);
            self.next_token()?;
        } else {
            quasis.push(self.template_element(tagged, false)?);
            self.next_token()?;
            loop {
                expressions.push(self.isolate_cover(ctx.with(Context::ALLOW_IN), |p, c| {
                    p.parse_expression(c)
                })?);
                if !self.at(SyntaxKind::CloseBraceToken) {
                    return Err(self.unexpected());
                }
                let kind = self
                    .scanner
                    .rescan_template_token()
                    .map_err(|e| self.locate(e))?;
                let tail = kind == SyntaxKind::TemplateTail;
                quasis.push(self.template_element(tagged, tail)?);
                self.next_token()?;
                if tail {
                    break;
                }
            }
        }

        let span = Span::new(start, self.prev_token_end);
        Ok(TemplateLiteral {
            quasis,
            expressions,
            span,
            loc: self.node_loc(span),
        })
    }

    /// Build a TemplateElement from the current template token. The span
    /// covers the raw characters, excluding the delimiters.
    fn template_element(&self, tagged: bool, tail: bool) -> Result<TemplateElement> {
        let flags = self.token_flags();
        if !tagged && flags.contains(TokenFlags::INVALID_TEMPLATE_ESCAPE) {
            return Err(self.fail(&messages::INVALID_ESCAPE, &[]));
        }
        let token_start = self.token_pos();
        let token_end = self.token_end();
        let (raw_start, raw_end) = match self.current() {
            SyntaxKind::NoSubstitutionTemplateLiteral => (token_start + 1, token_end - 1),
            SyntaxKind::TemplateHead => (token_start + 1, token_end - 2),
            SyntaxKind::TemplateMiddle => (token_start, token_end - 2),
            _ => (token_start, token_end - 1),
        };
        let raw = self.src[raw_start as usize..raw_end as usize].to_string();
        let cooked = self.scanner.template_cooked().map(str::to_string);
        let span = Span::new(raw_start, raw_end);
        Ok(TemplateElement {
            value: TemplateValue { raw, cooked },
            tail,
            span,
            loc: self.node_loc(span),
        })
    }

    // ========================================================================
    // Parenthesized covers
    // ========================================================================

    /// `(` ... `)` in expression position: a parenthesized expression, a
    /// sequence, or an arrow head — decided by the `=>` that follows.
    fn parse_cover_paren_expression(&mut self, ctx: Context) -> Result<Expression> {
        let start = self.token_pos();
        let (elements, trailing_comma) = self.parse_cover_paren_elements(ctx)?;
        let head_span = Span::new(start, self.prev_token_end);

        if self.at(SyntaxKind::EqualsGreaterThanToken) {
            if self.newline_before() {
                return Err(self.fail(&messages::NEWLINE_BEFORE_ARROW, &[]));
            }
            self.pending_arrow_head = Some(ArrowHead {
                span: head_span,
                is_async: false,
                elements,
            });
            return Ok(Expression::Sequence(SequenceExpression {
                expressions: Vec::new(),
                span: head_span,
                loc: self.node_loc(head_span),
            }));
        }

        // Not an arrow: the contents must form an expression.
        if elements.is_empty() || trailing_comma {
            return Err(self.unexpected());
        }
        if let Some(spread) = elements.iter().find(|e| matches!(e, Expression::Spread(_))) {
            return Err(self.fail_span(&messages::UNEXPECTED_TOKEN, &["..."], spread.span()));
        }
        let mut elements = elements;
        let expr = if elements.len() == 1 {
            let inner = elements.pop().unwrap();
            self.last_paren_primary =
                matches!(inner, Expression::Object(_) | Expression::Array(_))
                    .then(|| inner.span());
            inner
        } else {
            let span = Span::new(
                elements.first().unwrap().span().start,
                elements.last().unwrap().span().end,
            );
            Expression::Sequence(SequenceExpression {
                expressions: elements,
                span,
                loc: self.node_loc(span),
            })
        };
        Ok(expr)
    }

    /// The shared element list of `( ... )` covers: assignment
    /// expressions and spreads, with cover markers inherited.
    fn parse_cover_paren_elements(
        &mut self,
        ctx: Context,
    ) -> Result<(Vec<Expression>, bool)> {
        self.expect(SyntaxKind::OpenParenToken)?;
        let mut elements = Vec::new();
        let mut trailing_comma = false;
        while !self.at(SyntaxKind::CloseParenToken) {
            let element = if self.at(SyntaxKind::DotDotDotToken) {
                let spread_start = self.token_pos();
                self.next_token()?;
                let argument = self.inherit_cover(ctx.with(Context::ALLOW_IN), |p, c| {
                    p.parse_assignment_expression(c)
                })?;
                let span = Span::new(spread_start, self.prev_token_end);
                Expression::Spread(SpreadElement {
                    argument: Box::new(argument),
                    span,
                    loc: self.node_loc(span),
                })
            } else {
                self.inherit_cover(ctx.with(Context::ALLOW_IN), |p, c| {
                    p.parse_assignment_expression(c)
                })?
            };
            let spread_pos =
                matches!(element, Expression::Spread(_)).then(|| element.span().start);
            elements.push(element);
            if self.at(SyntaxKind::CommaToken) {
                self.next_token()?;
                if let Some(pos) = spread_pos {
                    self.spread_commas.insert(pos);
                }
                if self.at(SyntaxKind::CloseParenToken) {
                    trailing_comma = true;
                    break;
                }
            } else {
                break;
            }
        }
        self.expect(SyntaxKind::CloseParenToken)?;
        Ok((elements, trailing_comma))
    }

    // ========================================================================
    // Function and class expressions
    // ========================================================================

    fn parse_function_expression(&mut self, ctx: Context, is_async: bool) -> Result<Expression> {
        let start = self.token_pos();
        if is_async {
            self.next_token()?; // async
        }
        self.check_unescaped_keyword()?;
        self.expect(SyntaxKind::FunctionKeyword)?;
        let is_generator = self.eat(SyntaxKind::AsteriskToken)?;

        // A function expression's name binds inside its own scope, so
        // the function's generator/async flags apply to the name.
        let mut name_ctx = ctx;
        if is_generator {
            name_ctx = name_ctx.with(Context::IN_GENERATOR);
        }
        if is_async {
            name_ctx = name_ctx.with(Context::IN_ASYNC);
        }
        let id = if self.at(SyntaxKind::OpenParenToken) {
            None
        } else {
            Some(self.parse_binding_identifier(name_ctx)?)
        };

        let (params, body, became_strict) =
            self.parse_function_tail(ctx, is_async, is_generator, Context::NONE, false)?;
        if became_strict {
            if let Some(ref id) = id {
                self.check_binding_name(&id.name, id.span, name_ctx.with(Context::STRICT))?;
            }
        }
        let span = Span::new(start, self.prev_token_end);
        Ok(Expression::Function(FunctionExpression {
            id,
            params,
            body,
            generator: is_generator,
            is_async,
            span,
            loc: self.node_loc(span),
        }))
    }

    fn parse_class_expression(&mut self, ctx: Context) -> Result<Expression> {
        let start = self.token_pos();
        self.check_unescaped_keyword()?;
        self.expect(SyntaxKind::ClassKeyword)?;
        let strict_ctx = ctx.with(Context::STRICT);
        let id = if self.at(SyntaxKind::OpenBraceToken) || self.at(SyntaxKind::ExtendsKeyword) {
            None
        } else {
            Some(self.parse_binding_identifier(strict_ctx)?)
        };
        let (super_class, body) = self.parse_class_tail(strict_ctx)?;
        let span = Span::new(start, self.prev_token_end);
        Ok(Expression::Class(ClassExpression {
            id,
            super_class,
            body,
            span,
            loc: self.node_loc(span),
        }))
    }
}

/// Whether a property is a `__proto__: value` definition (shorthand and
/// methods do not set the prototype).
fn is_proto_definition(property: &Property) -> bool {
    if property.computed || property.shorthand || property.method {
        return false;
    }
    if property.kind != PropertyKind::Init {
        return false;
    }
    match property.key.as_ref() {
        Expression::Identifier(id) => id.name == "__proto__",
        Expression::Literal(lit) => {
            matches!(&lit.value, LiteralValue::String(s) if s == "__proto__")
        }
        _ => false,
    }
}

/// Result of the `async(...)` cover parse.
enum AsyncCover {
    /// An arrow head was recorded; the value is the placeholder the
    /// assignment level checks by span.
    Head(Expression),
    /// A plain call to something named `async`.
    Call(Expression),
}
