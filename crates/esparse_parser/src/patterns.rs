//! Pattern reinterpretation: converting already-parsed expression nodes
//! into assignment targets and binding patterns.
//!
//! Cover grammars are resolved here as a second phase: the expression
//! parser builds a provisional tree, and when the surrounding construct
//! turns out to be a destructuring assignment or an arrow parameter
//! list, the tree is converted wholesale. A conversion failure carries
//! the offending sub-node's position. Pattern detection is never
//! special-cased inside the expression grammar itself.

use crate::context::Context;
use crate::parser::Parser;
use esparse_ast::node::*;
use esparse_diagnostics::{messages, ParseError};

type Result<T> = std::result::Result<T, ParseError>;

/// Whether a conversion produces an assignment target (member
/// expressions allowed) or a binding pattern (identifiers only at the
/// leaves).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PatternMode {
    Assignment,
    Binding,
}

impl<'a> Parser<'a> {
    /// Convert an expression into an assignment-target pattern
    /// (`[a, b.c] = x`, for-in/of left-hand sides).
    pub(crate) fn reinterpret_as_assignment_target(
        &mut self,
        expr: Expression,
        ctx: Context,
    ) -> Result<Pattern> {
        let pattern = self.to_pattern(expr, ctx, PatternMode::Assignment)?;
        self.cover_initialized_name = None;
        self.duplicate_proto = None;
        Ok(pattern)
    }

    /// Convert an expression into a binding pattern (arrow parameters).
    pub(crate) fn reinterpret_as_binding_pattern(
        &mut self,
        expr: Expression,
        ctx: Context,
    ) -> Result<Pattern> {
        let pattern = self.to_pattern(expr, ctx, PatternMode::Binding)?;
        self.cover_initialized_name = None;
        self.duplicate_proto = None;
        Ok(pattern)
    }

    fn to_pattern(&mut self, expr: Expression, ctx: Context, mode: PatternMode) -> Result<Pattern> {
        match expr {
            Expression::Identifier(id) => {
                match mode {
                    PatternMode::Assignment => self.check_assignment_identifier(&id, ctx)?,
                    PatternMode::Binding => self.check_binding_name(&id.name, id.span, ctx)?,
                }
                Ok(Pattern::Identifier(id))
            }
            Expression::Member(member) => {
                if mode == PatternMode::Binding {
                    return Err(self.fail_span(
                        &messages::INVALID_BINDING_TARGET,
                        &[],
                        member.span,
                    ));
                }
                if member.optional {
                    return Err(self.fail_span(
                        &messages::INVALID_ASSIGNMENT_TARGET,
                        &[],
                        member.span,
                    ));
                }
                Ok(Pattern::Member(member))
            }
            Expression::Array(array) => self.array_to_pattern(array, ctx, mode),
            Expression::Object(object) => self.object_to_pattern(object, ctx, mode),
            // `[a = 1] = x` arrives with the default parsed as an
            // assignment expression.
            Expression::Assignment(assign) => {
                if assign.operator != "=" {
                    return Err(self.fail_span(
                        &messages::INVALID_DESTRUCTURING_TARGET,
                        &[],
                        assign.span,
                    ));
                }
                if mode == PatternMode::Binding {
                    // The left side was already reinterpreted when the
                    // assignment was built; re-validate it as a binding.
                    self.check_pattern_binds(&assign.left, ctx)?;
                }
                Ok(Pattern::Assignment(AssignmentPattern {
                    left: assign.left,
                    right: assign.right,
                    span: assign.span,
                    loc: assign.loc,
                }))
            }
            other => {
                let message = match mode {
                    PatternMode::Assignment => &messages::INVALID_ASSIGNMENT_TARGET,
                    PatternMode::Binding => &messages::INVALID_BINDING_TARGET,
                };
                Err(self.fail_span(message, &[], other.span()))
            }
        }
    }

    fn array_to_pattern(
        &mut self,
        array: ArrayExpression,
        ctx: Context,
        mode: PatternMode,
    ) -> Result<Pattern> {
        let count = array.elements.len();
        let mut elements = Vec::with_capacity(count);
        for (index, slot) in array.elements.into_iter().enumerate() {
            let Some(element) = slot else {
                elements.push(None);
                continue;
            };
            if let Expression::Spread(spread) = element {
                if index + 1 != count {
                    return Err(self.fail_span(&messages::REST_MUST_BE_LAST, &[], spread.span));
                }
                if self.spread_commas.contains(&spread.span.start) {
                    return Err(self.fail_span(&messages::COMMA_AFTER_REST, &[], spread.span));
                }
                elements.push(Some(self.spread_to_rest(spread, ctx, mode)?));
                continue;
            }
            elements.push(Some(self.to_pattern(element, ctx, mode)?));
        }
        Ok(Pattern::Array(ArrayPattern {
            elements,
            span: array.span,
            loc: array.loc,
        }))
    }

    fn object_to_pattern(
        &mut self,
        object: ObjectExpression,
        ctx: Context,
        mode: PatternMode,
    ) -> Result<Pattern> {
        let count = object.properties.len();
        let mut properties = Vec::with_capacity(count);
        for (index, member) in object.properties.into_iter().enumerate() {
            match member {
                ObjectMember::Spread(spread) => {
                    if index + 1 != count {
                        return Err(self.fail_span(&messages::REST_MUST_BE_LAST, &[], spread.span));
                    }
                    if self.spread_commas.contains(&spread.span.start) {
                        return Err(self.fail_span(&messages::COMMA_AFTER_REST, &[], spread.span));
                    }
                    let rest = self.spread_to_rest(spread, ctx, mode)?;
                    // Object rest targets are a single identifier or, in
                    // assignment position, a member expression. Nested
                    // patterns are not destructured by object rest.
                    if let Pattern::Rest(ref rest_element) = rest {
                        match rest_element.argument.as_ref() {
                            Pattern::Identifier(_) | Pattern::Member(_) => {}
                            other => {
                                return Err(self.fail_span(
                                    &messages::INVALID_DESTRUCTURING_TARGET,
                                    &[],
                                    other.span(),
                                ))
                            }
                        }
                    }
                    properties.push(ObjectPatternMember::Rest(match rest {
                        Pattern::Rest(r) => r,
                        _ => unreachable!("spread_to_rest returns Rest"),
                    }));
                }
                ObjectMember::Property(property) => {
                    if property.kind != PropertyKind::Init || property.method {
                        return Err(self.fail_span(
                            &messages::INVALID_DESTRUCTURING_TARGET,
                            &[],
                            property.span,
                        ));
                    }
                    let value = self.to_pattern(*property.value, ctx, mode)?;
                    properties.push(ObjectPatternMember::Property(AssignmentProperty {
                        key: property.key,
                        value: Box::new(value),
                        kind: PropertyKind::Init,
                        computed: property.computed,
                        method: false,
                        shorthand: property.shorthand,
                        span: property.span,
                        loc: property.loc,
                    }));
                }
            }
        }
        Ok(Pattern::Object(ObjectPattern {
            properties,
            span: object.span,
            loc: object.loc,
        }))
    }

    fn spread_to_rest(
        &mut self,
        spread: SpreadElement,
        ctx: Context,
        mode: PatternMode,
    ) -> Result<Pattern> {
        if let Expression::Assignment(ref assign) = *spread.argument {
            return Err(self.fail_span(&messages::REST_WITH_DEFAULT, &[], assign.span));
        }
        let argument = self.to_pattern(*spread.argument, ctx, mode)?;
        Ok(Pattern::Rest(RestElement {
            argument: Box::new(argument),
            span: spread.span,
            loc: spread.loc,
        }))
    }

    /// Re-validate a pattern produced in assignment mode as a binding
    /// pattern (used when `(a = {b: c.d}) => {}`-style input smuggles a
    /// member expression into a parameter default's target).
    fn check_pattern_binds(&self, pattern: &Pattern, ctx: Context) -> Result<()> {
        match pattern {
            Pattern::Identifier(id) => self.check_binding_name(&id.name, id.span, ctx),
            Pattern::Member(member) => {
                Err(self.fail_span(&messages::INVALID_BINDING_TARGET, &[], member.span))
            }
            Pattern::Array(array) => {
                for element in array.elements.iter().flatten() {
                    self.check_pattern_binds(element, ctx)?;
                }
                Ok(())
            }
            Pattern::Object(object) => {
                for member in &object.properties {
                    match member {
                        ObjectPatternMember::Property(p) => {
                            self.check_pattern_binds(&p.value, ctx)?
                        }
                        ObjectPatternMember::Rest(r) => {
                            self.check_pattern_binds(&r.argument, ctx)?
                        }
                    }
                }
                Ok(())
            }
            Pattern::Rest(rest) => self.check_pattern_binds(&rest.argument, ctx),
            Pattern::Assignment(assign) => self.check_pattern_binds(&assign.left, ctx),
        }
    }

    /// Validate an identifier used as a simple assignment target.
    pub(crate) fn check_assignment_identifier(
        &self,
        id: &Identifier,
        ctx: Context,
    ) -> Result<()> {
        if ctx.has(Context::STRICT) && matches!(id.name.as_str(), "eval" | "arguments") {
            return Err(self.fail_span(&messages::STRICT_EVAL_ARGUMENTS, &[], id.span));
        }
        Ok(())
    }
}

/// Collect the names bound by a pattern, in source order.
pub(crate) fn bound_names<'p>(pattern: &'p Pattern, out: &mut Vec<(&'p str, Span)>) {
    match pattern {
        Pattern::Identifier(id) => out.push((&id.name, id.span)),
        Pattern::Object(object) => {
            for member in &object.properties {
                match member {
                    ObjectPatternMember::Property(p) => bound_names(&p.value, out),
                    ObjectPatternMember::Rest(r) => bound_names(&r.argument, out),
                }
            }
        }
        Pattern::Array(array) => {
            for element in array.elements.iter().flatten() {
                bound_names(element, out);
            }
        }
        Pattern::Rest(rest) => bound_names(&rest.argument, out),
        Pattern::Assignment(assign) => bound_names(&assign.left, out),
        // Member expressions bind nothing; they are assignment targets.
        Pattern::Member(_) => {}
    }
}
