//! Parser integration tests.
//!
//! Verifies tree shapes, positions, and the context-sensitive legality
//! rules: strict mode, binding conflicts, destructuring, ASI, and the
//! module/script split.

use esparse_ast::node::*;
use esparse_parser::{parse_module, parse_script, parse_with_options, ParserOptions, Program};

/// Helper: parse a script, panicking with the error on failure.
fn parse(source: &str) -> Program {
    match parse_script(source) {
        Ok(program) => program,
        Err(err) => panic!("{source}: {err}"),
    }
}

/// Helper: parse a script and expect a failure.
fn parse_err(source: &str) -> esparse_parser::ParseError {
    match parse_script(source) {
        Ok(_) => panic!("expected error: {source}"),
        Err(err) => err,
    }
}

/// Helper: assert the number of top-level statements.
fn assert_statement_count(source: &str, expected: usize) {
    assert_eq!(parse(source).body.len(), expected, "source: {source}");
}

fn strict_options() -> ParserOptions {
    ParserOptions {
        strict: true,
        disable_web_compat: true,
        ..ParserOptions::default()
    }
}

fn next_options() -> ParserOptions {
    ParserOptions {
        next_syntax: true,
        ..ParserOptions::default()
    }
}

// ============================================================================
// Specified end-to-end scenarios
// ============================================================================

#[test]
fn test_throw_statement_shape() {
    let program = parse("throw foo;");
    assert_eq!(program.body.len(), 1);
    let Statement::Throw(ref stmt) = program.body[0] else {
        panic!("expected ThrowStatement");
    };
    assert_eq!(stmt.span.start, 0);
    assert_eq!(stmt.span.end, 10);
    let Expression::Identifier(ref id) = *stmt.argument else {
        panic!("expected Identifier argument");
    };
    assert_eq!(id.name, "foo");
    assert_eq!((id.span.start, id.span.end), (6, 9));
}

#[test]
fn test_catch_parameter_var_exception() {
    parse("try {} catch(e) { var e; }");
    parse_err("try {} catch(e) { let e; }");
    parse_err("try {} catch({e}) { var e; }");
}

#[test]
fn test_lexical_declaration_as_loop_body() {
    parse_err("while (false) let x = 1;");
}

#[test]
fn test_reserved_word_as_pattern_property_key() {
    let program = parse("({enum: x}) => x;");
    let Statement::Expression(ref stmt) = program.body[0] else {
        panic!("expected expression statement");
    };
    let Expression::Arrow(ref arrow) = *stmt.expression else {
        panic!("expected ArrowFunctionExpression");
    };
    assert_eq!(arrow.params.len(), 1);
    let Pattern::Object(ref pattern) = arrow.params[0] else {
        panic!("expected ObjectPattern parameter");
    };
    let ObjectPatternMember::Property(ref property) = pattern.properties[0] else {
        panic!("expected property");
    };
    let Expression::Identifier(ref key) = *property.key else {
        panic!("expected identifier key");
    };
    assert_eq!(key.name, "enum");
    let Pattern::Identifier(ref value) = *property.value else {
        panic!("expected identifier value");
    };
    assert_eq!(value.name, "x");
}

#[test]
fn test_reserved_word_as_binding_target() {
    assert!(parse_with_options("enum = 1;", strict_options()).is_err());
    // `enum` is reserved in sloppy mode as well.
    parse_err("enum = 1;");
}

#[test]
fn test_array_pattern_catch_parameter_with_default() {
    let program = parse("try { throw [,]; } catch ([x = 23]) {}");
    let Statement::Try(ref stmt) = program.body[0] else {
        panic!("expected TryStatement");
    };
    let handler = stmt.handler.as_ref().expect("catch clause");
    let Some(Pattern::Array(ref pattern)) = handler.param else {
        panic!("expected ArrayPattern parameter");
    };
    let Some(Pattern::Assignment(ref element)) = pattern.elements[0] else {
        panic!("expected AssignmentPattern element");
    };
    let Pattern::Identifier(ref target) = *element.left else {
        panic!("expected identifier target");
    };
    assert_eq!(target.name, "x");
    let Expression::Literal(ref default) = *element.right else {
        panic!("expected literal default");
    };
    assert_eq!(default.value, LiteralValue::Number(23.0));
}

#[test]
fn test_binding_conflicts_are_symmetric() {
    parse_err("let x; var x;");
    parse_err("var x; let x;");
    parse_err("let x; let x;");
    parse_err("const x = 1; function x() {}");
    parse_err("class x {} var x;");
}

// ============================================================================
// Variable declarations and scoping
// ============================================================================

#[test]
fn test_variable_declarations() {
    assert_statement_count("var x;", 1);
    assert_statement_count("let x = 1, y = 2;", 1);
    assert_statement_count("const x = 1;", 1);
    parse_err("const x;");
    parse_err("let [a];");
}

#[test]
fn test_pattern_declarations_require_initializers() {
    parse_err("let {a};");
    parse_err("var [a];");
    parse("let {a} = {};");
    parse("var [a] = [];");
}

#[test]
fn test_var_shadowing_rules() {
    parse("var x; { let x; }");
    parse_err("let x; { var x; }");
    parse("function f(a) { var a; }");
    parse_err("function f(a) { let a; }");
    parse("var x; var x;");
    parse("function f() {} function f() {}");
}

#[test]
fn test_let_is_not_a_lexical_binding_name() {
    parse_err("let let;");
    parse_err("const let = 1;");
    parse("var let;");
}

#[test]
fn test_let_as_identifier_in_sloppy_mode() {
    assert_statement_count("let = 1;", 1);
    assert_statement_count("let;", 1);
    assert!(parse_with_options("let = 1;", strict_options()).is_err());
}

// ============================================================================
// Functions and parameters
// ============================================================================

#[test]
fn test_function_declarations() {
    assert_statement_count("function foo() {}", 1);
    assert_statement_count("function add(a, b) { return a + b; }", 1);
    assert_statement_count("async function f() { return await g(); }", 1);
    assert_statement_count("function* gen() { yield 1; }", 1);
    assert_statement_count("async function* agen() { yield await x; }", 1);
}

#[test]
fn test_duplicate_parameters() {
    parse("function f(a, a) {}");
    parse_err("function f(a, a) { 'use strict'; }");
    parse_err("function f(a, [a]) {}");
    parse_err("function f(a, ...a) {}");
    parse_err("(a, a) => a");
    parse_err("({ m(a, a) {} })");
}

#[test]
fn test_use_strict_with_non_simple_parameters() {
    parse_err("function f(a = 1) { 'use strict'; }");
    parse("function f(a = 1) { 'not strict'; }");
}

#[test]
fn test_strict_parameter_names() {
    parse("function f(eval) {}");
    parse_err("function f(eval) { 'use strict'; }");
    parse_err("'use strict'; function f(arguments) {}");
}

#[test]
fn test_rest_parameters() {
    parse("function f(...rest) {}");
    parse("function f(a, ...rest) {}");
    parse_err("function f(...rest, b) {}");
    parse_err("function f(...rest = 1) {}");
}

#[test]
fn test_yield_and_await_restrictions_in_parameters() {
    parse_err("function* g(a = yield) {}");
    parse_err("async function f(a = await b) {}");
    parse("function f(a = yield) {}"); // sloppy non-generator: identifier
}

#[test]
fn test_return_outside_function() {
    parse_err("return 1;");
    parse("function f() { return 1; }");
}

// ============================================================================
// Strict mode
// ============================================================================

#[test]
fn test_strict_mode_is_monotone_in_function_bodies() {
    parse("var x = 010;");
    parse_err("'use strict'; var x = 010;");
    parse_err("function f() { 'use strict'; var x = 010; }");
    // The directive applies to everything after it, including nested
    // constructs.
    parse_err("function f() { 'use strict'; function g() { var y = 010; } }");
}

#[test]
fn test_strict_octal_escapes() {
    parse_err("'use strict'; var s = '\\07';");
    parse("var s = '\\07';");
    parse_err("'use strict'; var s = '\\8';");
}

#[test]
fn test_octal_escape_in_directive_prologue() {
    parse_err("'\\01'; 'use strict';");
    parse("'\\01';");
}

#[test]
fn test_strict_eval_arguments() {
    parse("eval = 1;");
    parse_err("'use strict'; eval = 1;");
    parse_err("'use strict'; arguments = 1;");
    parse_err("'use strict'; eval++;");
    parse_err("'use strict'; var eval;");
}

#[test]
fn test_strict_delete() {
    parse("delete x;");
    parse_err("'use strict'; delete x;");
    parse("'use strict'; delete x.y;");
}

#[test]
fn test_strict_reserved_words() {
    parse("var interface;");
    parse_err("'use strict'; var interface;");
    parse_err("'use strict'; var yield;");
    parse("var yield;");
}

#[test]
fn test_with_statement() {
    parse("with (x) {}");
    parse_err("'use strict'; with (x) {}");
}

// ============================================================================
// Automatic semicolon insertion
// ============================================================================

#[test]
fn test_asi_at_line_breaks() {
    assert_statement_count("a\nb", 2);
    assert_statement_count("a; b", 2);
    parse_err("a b");
}

#[test]
fn test_asi_restricted_productions() {
    let program = parse("function f() { return\n1; }");
    let Statement::FunctionDeclaration(ref decl) = program.body[0] else {
        panic!("expected function");
    };
    let Statement::Return(ref ret) = decl.body.body[0] else {
        panic!("expected return first");
    };
    assert!(ret.argument.is_none());
    assert_eq!(decl.body.body.len(), 2);

    parse_err("throw\nfoo;");

    // Postfix update may not follow a line terminator.
    assert_statement_count("a\n++b", 2);
}

#[test]
fn test_asi_before_closing_brace_and_eof() {
    assert_statement_count("a", 1);
    parse("{ a }");
    parse("do x; while (false)");
}

// ============================================================================
// Control flow
// ============================================================================

#[test]
fn test_if_statement() {
    assert_statement_count("if (a) b; else c;", 1);
    // Annex B: function declarations directly under if, sloppy only.
    parse("if (a) function f() {}");
    parse_err("'use strict'; if (a) function f() {}");
    assert!(parse_with_options("if (a) function f() {}", strict_options()).is_err());
}

#[test]
fn test_loops() {
    assert_statement_count("while (a) b;", 1);
    assert_statement_count("do b; while (a);", 1);
    assert_statement_count("for (var i = 0; i < 10; i++) ;", 1);
    assert_statement_count("for (;;) break;", 1);
    assert_statement_count("for (const x of xs) {}", 1);
    assert_statement_count("for (let k in o) {}", 1);
    assert_statement_count("for (a in b) {}", 1);
    assert_statement_count("for ([a, b] of c) {}", 1);
}

#[test]
fn test_for_in_of_restrictions() {
    parse_err("for (let x = 1 of y) {}");
    parse_err("for (let x = 1 in y) {}");
    parse("for (var x = 1 in y) {}"); // annex B
    assert!(parse_with_options("for (var x = 1 in y) {}", strict_options()).is_err());
    parse_err("for (let x, y of z) {}");
    parse_err("for (let of x) {}");
    parse_err("for (1 in x) {}");
}

#[test]
fn test_for_await() {
    parse("async function f() { for await (const x of y) {} }");
    parse_err("function f() { for await (const x of y) {} }");
    assert!(parse_module("for await (const x of y) {}").is_ok());
}

#[test]
fn test_break_continue_validation() {
    parse("while (1) break;");
    parse("while (1) continue;");
    parse("switch (x) { case 1: break; }");
    parse_err("break;");
    parse_err("continue;");
    parse_err("switch (x) { case 1: continue; }");
    parse_err("function f() { while (1) { g(); } break; }");
}

#[test]
fn test_labels() {
    parse("a: while (1) { continue a; }");
    parse("a: b: while (1) { continue b; }");
    parse("a: { break a; }");
    parse_err("a: { continue a; }");
    parse_err("while (1) { break b; }");
    parse_err("a: a: x;");
    // Labels do not cross function boundaries.
    parse_err("a: while (1) { function f() { break a; } }");
}

#[test]
fn test_switch_single_default() {
    parse("switch (x) { case 1: case 2: break; default: y; }");
    parse_err("switch (x) { default: a; default: b; }");
}

#[test]
fn test_try_statement_forms() {
    parse("try {} catch {}");
    parse("try {} catch (e) {}");
    parse("try {} finally {}");
    parse("try {} catch (e) {} finally {}");
    parse_err("try {}");
    parse_err("try {} catch ([e, e]) {}");
}

// ============================================================================
// Expressions
// ============================================================================

#[test]
fn test_precedence_and_associativity() {
    let program = parse("1 + 2 * 3;");
    let Statement::Expression(ref stmt) = program.body[0] else {
        panic!()
    };
    let Expression::Binary(ref add) = *stmt.expression else {
        panic!("expected binary +");
    };
    assert_eq!(add.operator, "+");
    assert!(matches!(*add.right, Expression::Binary(ref m) if m.operator == "*"));

    // `**` groups right-to-left.
    let program = parse("a ** b ** c;");
    let Statement::Expression(ref stmt) = program.body[0] else {
        panic!()
    };
    let Expression::Binary(ref pow) = *stmt.expression else {
        panic!()
    };
    assert!(matches!(*pow.right, Expression::Binary(ref inner) if inner.operator == "**"));
}

#[test]
fn test_unary_base_of_exponentiation() {
    parse_err("-a ** b;");
    parse("(-a) ** b;");
    parse("-(a ** b);");
}

#[test]
fn test_nullish_mixing_requires_parentheses() {
    parse_err("a ?? b || c;");
    parse_err("a || b ?? c;");
    parse("(a ?? b) || c;");
    parse("a ?? (b || c);");
    parse("a ?? b ?? c;");
}

#[test]
fn test_assignment_targets() {
    parse("a = 1;");
    parse("a.b = 1;");
    parse("a[0] = 1;");
    parse("[a, b] = c;");
    parse("({a, b} = c);");
    parse("[a.b, ...c.d] = e;");
    parse_err("1 = 2;");
    parse_err("a + b = c;");
    parse_err("(a, b) = c;");
    parse_err("a?.b = 1;");
}

#[test]
fn test_compound_assignment_targets() {
    parse("a += 1;");
    parse("a.b *= 2;");
    parse_err("[a] += b;");
    parse_err("({a} = b) = c;");
}

#[test]
fn test_update_targets() {
    parse("a++;");
    parse("--a.b;");
    parse_err("1++;");
    parse_err("++(a + b);");
}

#[test]
fn test_shorthand_initializer_cover() {
    parse("({x = 1} = {});");
    parse("[{x = 1}] = [];");
    parse_err("({x = 1});");
    parse_err("f({x = 1});");
    parse_err("x = {a = 1};");
}

#[test]
fn test_duplicate_proto() {
    parse_err("({__proto__: 1, __proto__: 2});");
    parse("({__proto__: 1, ['__proto__']: 2});");
    parse("({__proto__: 1, __proto__: 2} = x);");
    parse("({__proto__, __proto__: 2});");
}

#[test]
fn test_object_literals() {
    parse("({a: 1, 'b': 2, 3: c, [d]: e, f, g() {}, *h() {}, async i() {}});");
    parse("({get x() {}, set x(v) {}});");
    parse_err("({get x(a) {}});");
    parse_err("({set x() {}});");
    parse_err("({set x(...v) {}});");
    parse("({async: 1});");
    parse("({get: 1, set: 2});");
}

#[test]
fn test_array_literals_and_holes() {
    let program = parse("[1, , 3];");
    let Statement::Expression(ref stmt) = program.body[0] else {
        panic!()
    };
    let Expression::Array(ref array) = *stmt.expression else {
        panic!()
    };
    assert_eq!(array.elements.len(), 3);
    assert!(array.elements[1].is_none());
}

#[test]
fn test_spread_positions() {
    parse("f(...a);");
    parse("[...a];");
    parse("({...a});");
    parse("[...a, b];");
    parse_err("[...a,] = b;");
    parse_err("({...a, b} = c);");
}

#[test]
fn test_sequences_and_parentheses() {
    parse("(a, b, c);");
    parse("(a);");
    parse_err("();");
    parse_err("(a,);");
    parse_err("(...a);");
}

#[test]
fn test_regex_vs_division() {
    parse("var re = /ab+c/g;");
    parse("var q = a / b / c;");
    parse("if (x) /re/.test(y);");
    parse("var s = a /= 2;");
}

#[test]
fn test_template_literals() {
    let program = parse("`a${x}b${y}c`;");
    let Statement::Expression(ref stmt) = program.body[0] else {
        panic!()
    };
    let Expression::Template(ref template) = *stmt.expression else {
        panic!()
    };
    assert_eq!(template.quasis.len(), 3);
    assert_eq!(template.expressions.len(), 2);
    assert!(template.quasis[2].tail);

    parse("tag`a${x}b`;");
    // Invalid escapes are tolerated only in tagged templates.
    parse("tag`\\u{FFFFFFFF}`;");
    parse_err("`\\u{FFFFFFFF}`;");
}

#[test]
fn test_optional_chaining() {
    let program = parse("a?.b.c;");
    let Statement::Expression(ref stmt) = program.body[0] else {
        panic!()
    };
    assert!(matches!(*stmt.expression, Expression::Chain(_)));
    parse("a?.[b];");
    parse("a?.(b);");
    parse_err("new a?.b();");
    parse_err("a?.b`t`;");
}

#[test]
fn test_new_expressions() {
    parse("new Foo;");
    parse("new Foo();");
    parse("new a.b.C(1, 2);");
    parse("new new A()();");
    parse("function f() { new.target; }");
    parse("function f() { () => new.target; }");
    parse_err("new.target;");
    parse_err("() => new.target;");
    parse_err("new.meta;");
}

#[test]
fn test_conditional_expression() {
    parse("a ? b : c;");
    parse("a ? b = 1 : c = 2;");
    parse("a ? b ? c : d : e;");
}

// ============================================================================
// Arrow functions
// ============================================================================

#[test]
fn test_arrow_functions() {
    assert_statement_count("x => x;", 1);
    assert_statement_count("() => 42;", 1);
    assert_statement_count("(a, b) => a + b;", 1);
    assert_statement_count("(a = 1, [b], {c}) => a;", 1);
    assert_statement_count("(a, ...rest) => rest;", 1);
    assert_statement_count("(a,) => a;", 1);
    assert_statement_count("x => ({});", 1);
    assert_statement_count("x => { return x; };", 1);
}

#[test]
fn test_async_arrows() {
    assert_statement_count("async x => x;", 1);
    assert_statement_count("async (a, b) => a + b;", 1);
    assert_statement_count("async () => await f();", 1);
    // `async(...)` without a following arrow is a call.
    let program = parse("async(x);");
    let Statement::Expression(ref stmt) = program.body[0] else {
        panic!()
    };
    assert!(matches!(*stmt.expression, Expression::Call(_)));
}

#[test]
fn test_arrow_restrictions() {
    // No line terminator is permitted before `=>`.
    parse_err("x\n=> x;");
    parse_err("(a, b)\n=> {};");
    parse_err("(...a, b) => {};");
    parse_err("(a = 1) => { 'use strict'; };");
    parse("(a) => { 'use strict'; };");
}

#[test]
fn test_arrow_parameter_reinterpretation_failures() {
    parse_err("(a.b) => {};");
    parse_err("(1) => {};");
    parse_err("({a: 1}) => {};");
    parse_err("(a + b) => {};");
}

// ============================================================================
// Classes
// ============================================================================

#[test]
fn test_class_declarations() {
    assert_statement_count("class A {}", 1);
    assert_statement_count("class B extends A {}", 1);
    assert_statement_count(
        "class C { constructor(x) { this.x = x; } m() {} get g() { return 1; } set s(v) {} }",
        1,
    );
    assert_statement_count("class D { static m() {} static x = 1; }", 1);
    assert_statement_count("class E { x = 1; #p = 2; m() { return this.#p; } }", 1);
}

#[test]
fn test_class_constructor_restrictions() {
    parse_err("class A { constructor() {} constructor() {} }");
    parse_err("class A { get constructor() {} }");
    parse_err("class A { *constructor() {} }");
    parse_err("class A { async constructor() {} }");
    parse_err("class A { constructor = 1; }");
    parse_err("class A { static prototype() {} }");
    parse("class A { static constructor() {} }");
    parse("class A { ['constructor']() {} }");
}

#[test]
fn test_super_rules() {
    parse("class A extends B { constructor() { super(); } }");
    parse_err("class A { constructor() { super(); } }");
    parse("class A { m() { return super.x; } }");
    parse("({ m() { return super.x; } });");
    parse_err("function f() { super.x; }");
    parse_err("super();");
}

#[test]
fn test_private_names() {
    parse("class A { #x; m() { return this.#x; } }");
    parse("class A { #x; m(o) { return #x in o; } }");
    parse_err("class A { #x; #x; }");
    parse("class A { get #x() {} set #x(v) {} }");
    parse_err("class A { #constructor; }");
    parse_err("this.#x;");
    parse_err("class A { m() { delete this.#x; } }");
}

#[test]
fn test_class_is_always_strict() {
    parse_err("class A { m() { var x = 010; } }");
    parse_err("class A { m(eval) {} }");
}

#[test]
fn test_class_field_restrictions() {
    parse_err("class A { x = arguments; }");
    parse("class A { x = () => 1; }");
    parse("function f() { class A { m() { return arguments; } } }");
}

// ============================================================================
// Generators, async, yield, await
// ============================================================================

#[test]
fn test_yield_expressions() {
    parse("function* g() { yield; yield 1; yield* h(); }");
    parse("function* g() { var x = yield; }");
    parse_err("'use strict'; var yield;");
    parse("var x = yield;"); // sloppy: identifier
    parse_err("function* g() { var yield; }");
}

#[test]
fn test_await_rules() {
    parse("async function f() { await g(); }");
    parse("var await = 1;");
    assert!(parse_module("var await = 1;").is_err());
    assert!(parse_module("await 1;").is_ok()); // top-level await
    parse_err("async function f(await) {}");
    parse_err("function f() { 'use strict'; } async function g() { var await; }");
}

// ============================================================================
// Modules
// ============================================================================

#[test]
fn test_import_declarations() {
    assert!(parse_module("import 'm';").is_ok());
    assert!(parse_module("import a from 'm';").is_ok());
    assert!(parse_module("import * as ns from 'm';").is_ok());
    assert!(parse_module("import a, { b, c as d } from 'm';").is_ok());
    assert!(parse_module("import { default as a } from 'm';").is_ok());
    assert!(parse_module("import { default } from 'm';").is_err());
    assert!(parse_script("import a from 'm';").is_err());
}

#[test]
fn test_export_declarations() {
    assert!(parse_module("export var x = 1;").is_ok());
    assert!(parse_module("export function f() {}").is_ok());
    assert!(parse_module("export default 42;").is_ok());
    assert!(parse_module("export default function () {}").is_ok());
    assert!(parse_module("export { a, b as c };").is_ok());
    assert!(parse_module("export * from 'm';").is_ok());
    assert!(parse_module("export * as ns from 'm';").is_ok());
    assert!(parse_module("export { default } from 'm';").is_ok());
    assert!(parse_module("export { default };").is_err());
    assert!(parse_script("export var x;").is_err());
}

#[test]
fn test_duplicate_exports() {
    assert!(parse_module("export var x; export { x };").is_err());
    assert!(parse_module("export default 1; export default 2;").is_err());
    assert!(parse_module("export { a as b, c as b };").is_err());
}

#[test]
fn test_import_bindings_conflict() {
    assert!(parse_module("import { x } from 'm'; let x;").is_err());
    assert!(parse_module("import x from 'm'; import { x } from 'n';").is_err());
}

#[test]
fn test_import_expressions_work_in_scripts() {
    parse("import('m');");
    parse("import('m').then(f);");
    assert!(parse_module("import.meta.url;").is_ok());
    parse_err("import.meta;");
}

#[test]
fn test_module_is_strict() {
    assert!(parse_module("var x = 010;").is_err());
    assert!(parse_module("with (x) {}").is_err());
    // Module top-level function declarations are lexical.
    assert!(parse_module("function f() {} function f() {}").is_err());
    parse("function f() {} function f() {}");
}

// ============================================================================
// Annex B toggles
// ============================================================================

#[test]
fn test_annex_b_function_in_block() {
    parse("{ function f() {} var f; }");
    parse("{ function f() {} function f() {} }");
    parse_err("'use strict'; { function f() {} function f() {} }");
    assert!(
        parse_with_options("{ function f() {} function f() {} }", strict_options()).is_err()
    );
}

#[test]
fn test_annex_b_labelled_function() {
    parse("a: function f() {}");
    parse_err("'use strict'; a: function f() {}");
    parse_err("a: function* f() {}");
}

#[test]
fn test_html_comments_are_script_only() {
    parse("<!-- comment\nx;");
    parse("x;\n--> trailing\ny;");
    assert!(parse_module("<!-- comment\nx;").is_err());
}

#[test]
fn test_disable_web_compat_rejects_legacy_forms() {
    let options = ParserOptions {
        disable_web_compat: true,
        ..ParserOptions::default()
    };
    assert!(parse_with_options("var x = 010;", options).is_err());
    assert!(parse_with_options("try {} catch (e) { var e; }", options).is_err());
    assert!(parse_with_options("if (a) function f() {}", options).is_err());
    parse("var x = 010;");
}

// ============================================================================
// Experimental-grammar gating
// ============================================================================

#[test]
fn test_logical_assignment_gating() {
    parse_err("a ||= b;");
    parse_err("a &&= b;");
    parse_err("a ??= b;");
    assert!(parse_with_options("a ||= b;", next_options()).is_ok());
    assert!(parse_with_options("a ??= b;", next_options()).is_ok());
}

#[test]
fn test_numeric_separator_gating() {
    parse_err("var n = 1_000;");
    assert!(parse_with_options("var n = 1_000_000;", next_options()).is_ok());
    assert!(parse_with_options("var n = 1__0;", next_options()).is_err());
}

#[test]
fn test_static_block_gating() {
    parse_err("class A { static { } }");
    assert!(parse_with_options("class A { static { x; } }", next_options()).is_ok());
    assert!(
        parse_with_options("class A { static { return; } }", next_options()).is_err()
    );
}

// ============================================================================
// JSON surface
// ============================================================================

#[test]
fn test_estree_json_shape() {
    let program = parse("let x = 1;");
    let json = serde_json::to_value(&program).unwrap();
    assert_eq!(json["type"], "Program");
    assert_eq!(json["sourceType"], "script");
    assert_eq!(json["start"], 0);
    assert_eq!(json["end"], 10);
    let decl = &json["body"][0];
    assert_eq!(decl["type"], "VariableDeclaration");
    assert_eq!(decl["kind"], "let");
    let declarator = &decl["declarations"][0];
    assert_eq!(declarator["type"], "VariableDeclarator");
    assert_eq!(declarator["id"]["type"], "Identifier");
    assert_eq!(declarator["id"]["name"], "x");
    assert_eq!(declarator["init"]["type"], "Literal");
    assert_eq!(declarator["init"]["value"], 1.0);
    assert_eq!(declarator["init"]["raw"], "1");
}

#[test]
fn test_arrow_json_shape() {
    let program = parse("x => x;");
    let json = serde_json::to_value(&program).unwrap();
    let arrow = &json["body"][0]["expression"];
    assert_eq!(arrow["type"], "ArrowFunctionExpression");
    assert!(arrow["id"].is_null());
    assert_eq!(arrow["generator"], false);
    assert_eq!(arrow["async"], false);
    assert_eq!(arrow["expression"], true);
    assert_eq!(arrow["params"][0]["type"], "Identifier");
}

#[test]
fn test_directive_json_shape() {
    let program = parse("'use strict';");
    let json = serde_json::to_value(&program).unwrap();
    assert_eq!(json["body"][0]["type"], "ExpressionStatement");
    assert_eq!(json["body"][0]["directive"], "use strict");
}

// ============================================================================
// Positions
// ============================================================================

#[test]
fn test_program_span_covers_input() {
    let source = "  let x = 1;  ";
    let program = parse(source);
    assert_eq!(program.span.start, 0);
    assert_eq!(program.span.end, source.len() as u32);
}

#[test]
fn test_location_tracking() {
    let options = ParserOptions {
        location_tracking: true,
        ..ParserOptions::default()
    };
    let program = parse_with_options("let x = 1;\nlet y = 2;", options).unwrap();
    let Statement::VariableDeclaration(ref second) = program.body[1] else {
        panic!()
    };
    let loc = second.loc.expect("loc requested");
    assert_eq!(loc.start.line, 2);
    assert_eq!(loc.start.column, 0);
    let Pattern::Identifier(ref y) = second.declarations[0].id else {
        panic!()
    };
    let y_loc = y.loc.expect("loc requested");
    assert_eq!(y_loc.start.line, 2);
    assert_eq!(y_loc.start.column, 4);

    // Without the option, loc stays absent.
    let bare = parse("let x = 1;");
    let Statement::VariableDeclaration(ref decl) = bare.body[0] else {
        panic!()
    };
    assert!(decl.loc.is_none());
}

#[test]
fn test_error_positions() {
    let err = parse_err("let x = 1; let x = 2;");
    assert!(err.start >= 11);
    let options = ParserOptions {
        location_tracking: true,
        ..ParserOptions::default()
    };
    let err = parse_with_options("a\nb ===;", options).unwrap_err();
    let loc = err.loc.expect("error loc");
    assert_eq!(loc.line, 2);
}

#[test]
fn test_recursion_limit_is_an_error_not_a_crash() {
    let deep = format!("{}x{}", "(".repeat(200), ")".repeat(200));
    assert!(parse_script(&deep).is_err());
}

// ============================================================================
// Hashbang
// ============================================================================

#[test]
fn test_hashbang_is_skipped() {
    assert_statement_count("#!/usr/bin/env node\nlet x = 1;", 1);
}
