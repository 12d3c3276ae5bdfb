//! ESTree-shaped syntax tree nodes.
//!
//! Every node owns its children (tree, not graph) and carries `start`/`end`
//! byte offsets plus an optional `loc` with 1-based lines and 0-based
//! columns. Serialization is the conventional cross-tool AST JSON shape:
//! a `type` tag followed by the node's fields.

use esparse_core::text::SourceLocation;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Start/end byte offsets of a node, flattened into its JSON object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    #[inline]
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }
}

// ============================================================================
// Program
// ============================================================================

/// The goal symbol the program was parsed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceType {
    Script,
    Module,
}

impl Serialize for SourceType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SourceType::Script => serializer.serialize_str("script"),
            SourceType::Module => serializer.serialize_str("module"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct Program {
    #[serde(rename = "sourceType")]
    pub source_type: SourceType,
    pub body: Vec<Statement>,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Statement {
    Expression(ExpressionStatement),
    Block(BlockStatement),
    Empty(EmptyStatement),
    Debugger(DebuggerStatement),
    With(WithStatement),
    Return(ReturnStatement),
    Labeled(LabeledStatement),
    Break(BreakStatement),
    Continue(ContinueStatement),
    If(IfStatement),
    Switch(SwitchStatement),
    Throw(ThrowStatement),
    Try(TryStatement),
    While(WhileStatement),
    DoWhile(DoWhileStatement),
    For(ForStatement),
    ForIn(ForInStatement),
    ForOf(ForOfStatement),
    VariableDeclaration(VariableDeclaration),
    FunctionDeclaration(FunctionDeclaration),
    ClassDeclaration(ClassDeclaration),
    ImportDeclaration(ImportDeclaration),
    ExportNamed(ExportNamedDeclaration),
    ExportDefault(ExportDefaultDeclaration),
    ExportAll(ExportAllDeclaration),
}

impl Statement {
    /// The byte span of this statement.
    pub fn span(&self) -> Span {
        match self {
            Statement::Expression(n) => n.span,
            Statement::Block(n) => n.span,
            Statement::Empty(n) => n.span,
            Statement::Debugger(n) => n.span,
            Statement::With(n) => n.span,
            Statement::Return(n) => n.span,
            Statement::Labeled(n) => n.span,
            Statement::Break(n) => n.span,
            Statement::Continue(n) => n.span,
            Statement::If(n) => n.span,
            Statement::Switch(n) => n.span,
            Statement::Throw(n) => n.span,
            Statement::Try(n) => n.span,
            Statement::While(n) => n.span,
            Statement::DoWhile(n) => n.span,
            Statement::For(n) => n.span,
            Statement::ForIn(n) => n.span,
            Statement::ForOf(n) => n.span,
            Statement::VariableDeclaration(n) => n.span,
            Statement::FunctionDeclaration(n) => n.span,
            Statement::ClassDeclaration(n) => n.span,
            Statement::ImportDeclaration(n) => n.span,
            Statement::ExportNamed(n) => n.span,
            Statement::ExportDefault(n) => n.span,
            Statement::ExportAll(n) => n.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ExpressionStatement {
    pub expression: Box<Expression>,
    /// Present when this statement is a directive-prologue member
    /// (e.g. `"use strict"`); holds the raw, unescaped directive text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directive: Option<String>,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct BlockStatement {
    pub body: Vec<Statement>,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct EmptyStatement {
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct DebuggerStatement {
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct WithStatement {
    pub object: Box<Expression>,
    pub body: Box<Statement>,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ReturnStatement {
    pub argument: Option<Box<Expression>>,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct LabeledStatement {
    pub label: Identifier,
    pub body: Box<Statement>,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct BreakStatement {
    pub label: Option<Identifier>,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ContinueStatement {
    pub label: Option<Identifier>,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct IfStatement {
    pub test: Box<Expression>,
    pub consequent: Box<Statement>,
    pub alternate: Option<Box<Statement>>,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct SwitchStatement {
    pub discriminant: Box<Expression>,
    pub cases: Vec<SwitchCase>,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct SwitchCase {
    /// `None` for the `default` clause.
    pub test: Option<Box<Expression>>,
    pub consequent: Vec<Statement>,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ThrowStatement {
    pub argument: Box<Expression>,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct TryStatement {
    pub block: BlockStatement,
    pub handler: Option<CatchClause>,
    pub finalizer: Option<BlockStatement>,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct CatchClause {
    /// `None` for the optional-binding form `catch { }`.
    pub param: Option<Pattern>,
    pub body: BlockStatement,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct WhileStatement {
    pub test: Box<Expression>,
    pub body: Box<Statement>,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct DoWhileStatement {
    pub body: Box<Statement>,
    pub test: Box<Expression>,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

/// `for (<init>;;)` — a declaration or an expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ForInit {
    Declaration(VariableDeclaration),
    Expression(Box<Expression>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ForStatement {
    pub init: Option<ForInit>,
    pub test: Option<Box<Expression>>,
    pub update: Option<Box<Expression>>,
    pub body: Box<Statement>,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

/// The left-hand side of `for-in`/`for-of`: a single-declarator
/// declaration or an assignment target pattern.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ForTarget {
    Declaration(VariableDeclaration),
    Pattern(Box<Pattern>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ForInStatement {
    pub left: ForTarget,
    pub right: Box<Expression>,
    pub body: Box<Statement>,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ForOfStatement {
    pub left: ForTarget,
    pub right: Box<Expression>,
    pub body: Box<Statement>,
    #[serde(rename = "await")]
    pub is_await: bool,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

/// `var`, `let`, or `const`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    Var,
    Let,
    Const,
}

impl DeclarationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DeclarationKind::Var => "var",
            DeclarationKind::Let => "let",
            DeclarationKind::Const => "const",
        }
    }

    /// Whether this kind declares block-scoped (lexical) bindings.
    pub fn is_lexical(self) -> bool {
        !matches!(self, DeclarationKind::Var)
    }
}

impl Serialize for DeclarationKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct VariableDeclaration {
    pub declarations: Vec<VariableDeclarator>,
    pub kind: DeclarationKind,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct VariableDeclarator {
    pub id: Pattern,
    pub init: Option<Box<Expression>>,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct FunctionDeclaration {
    /// `None` only for `export default function () {}`.
    pub id: Option<Identifier>,
    pub params: Vec<Pattern>,
    pub body: BlockStatement,
    pub generator: bool,
    #[serde(rename = "async")]
    pub is_async: bool,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ClassDeclaration {
    /// `None` only for `export default class {}`.
    pub id: Option<Identifier>,
    #[serde(rename = "superClass")]
    pub super_class: Option<Box<Expression>>,
    pub body: ClassBody,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

// ============================================================================
// Classes
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ClassBody {
    pub body: Vec<ClassElement>,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ClassElement {
    Method(MethodDefinition),
    Property(PropertyDefinition),
    StaticBlock(StaticBlock),
}

/// `constructor`, plain method, getter, or setter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    Constructor,
    Method,
    Get,
    Set,
}

impl Serialize for MethodKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(match self {
            MethodKind::Constructor => "constructor",
            MethodKind::Method => "method",
            MethodKind::Get => "get",
            MethodKind::Set => "set",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct MethodDefinition {
    pub key: Box<Expression>,
    pub value: FunctionExpression,
    pub kind: MethodKind,
    pub computed: bool,
    #[serde(rename = "static")]
    pub is_static: bool,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct PropertyDefinition {
    pub key: Box<Expression>,
    pub value: Option<Box<Expression>>,
    pub computed: bool,
    #[serde(rename = "static")]
    pub is_static: bool,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct StaticBlock {
    pub body: Vec<Statement>,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

// ============================================================================
// Modules
// ============================================================================

/// An exported or imported name: an identifier, or (since ES2022) a
/// string literal module export name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ModuleExportName {
    Identifier(Identifier),
    Literal(Literal),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ImportDeclarationSpecifier {
    Default(ImportDefaultSpecifier),
    Namespace(ImportNamespaceSpecifier),
    Named(ImportSpecifier),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ImportSpecifier {
    pub imported: ModuleExportName,
    pub local: Identifier,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ImportDefaultSpecifier {
    pub local: Identifier,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ImportNamespaceSpecifier {
    pub local: Identifier,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ImportDeclaration {
    pub specifiers: Vec<ImportDeclarationSpecifier>,
    pub source: Literal,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ExportSpecifier {
    pub local: ModuleExportName,
    pub exported: ModuleExportName,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ExportNamedDeclaration {
    pub declaration: Option<Box<Statement>>,
    pub specifiers: Vec<ExportSpecifier>,
    pub source: Option<Literal>,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

/// `export default <declaration or expression>`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExportDefaultKind {
    Function(FunctionDeclaration),
    Class(ClassDeclaration),
    Expression(Box<Expression>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ExportDefaultDeclaration {
    pub declaration: ExportDefaultKind,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ExportAllDeclaration {
    /// `export * as name from "mod"` binds the namespace to `exported`.
    pub exported: Option<ModuleExportName>,
    pub source: Literal,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Expression {
    Identifier(Identifier),
    PrivateIdentifier(PrivateIdentifier),
    Literal(Literal),
    This(ThisExpression),
    Array(ArrayExpression),
    Object(ObjectExpression),
    Function(FunctionExpression),
    Arrow(ArrowFunctionExpression),
    Class(ClassExpression),
    TaggedTemplate(TaggedTemplateExpression),
    Template(TemplateLiteral),
    Member(MemberExpression),
    Super(Super),
    MetaProperty(MetaProperty),
    New(NewExpression),
    Call(CallExpression),
    Import(ImportExpression),
    Update(UpdateExpression),
    Await(AwaitExpression),
    Unary(UnaryExpression),
    Binary(BinaryExpression),
    Logical(LogicalExpression),
    Conditional(ConditionalExpression),
    Yield(YieldExpression),
    Assignment(AssignmentExpression),
    Sequence(SequenceExpression),
    Spread(SpreadElement),
    Chain(ChainExpression),
}

impl Expression {
    /// The byte span of this expression.
    pub fn span(&self) -> Span {
        match self {
            Expression::Identifier(n) => n.span,
            Expression::PrivateIdentifier(n) => n.span,
            Expression::Literal(n) => n.span,
            Expression::This(n) => n.span,
            Expression::Array(n) => n.span,
            Expression::Object(n) => n.span,
            Expression::Function(n) => n.span,
            Expression::Arrow(n) => n.span,
            Expression::Class(n) => n.span,
            Expression::TaggedTemplate(n) => n.span,
            Expression::Template(n) => n.span,
            Expression::Member(n) => n.span,
            Expression::Super(n) => n.span,
            Expression::MetaProperty(n) => n.span,
            Expression::New(n) => n.span,
            Expression::Call(n) => n.span,
            Expression::Import(n) => n.span,
            Expression::Update(n) => n.span,
            Expression::Await(n) => n.span,
            Expression::Unary(n) => n.span,
            Expression::Binary(n) => n.span,
            Expression::Logical(n) => n.span,
            Expression::Conditional(n) => n.span,
            Expression::Yield(n) => n.span,
            Expression::Assignment(n) => n.span,
            Expression::Sequence(n) => n.span,
            Expression::Spread(n) => n.span,
            Expression::Chain(n) => n.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct Identifier {
    pub name: String,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct PrivateIdentifier {
    /// The name without the leading `#`.
    pub name: String,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

/// The decoded value of a literal token.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    /// Regular expressions carry their parts in `Literal::regex`; the
    /// `value` slot serializes as an empty object.
    Regex,
    /// BigInts carry their digits in `Literal::bigint`; the `value` slot
    /// serializes as null.
    BigInt,
}

impl Serialize for LiteralValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            LiteralValue::Null | LiteralValue::BigInt => serializer.serialize_none(),
            LiteralValue::Boolean(b) => serializer.serialize_bool(*b),
            LiteralValue::Number(n) => serializer.serialize_f64(*n),
            LiteralValue::String(s) => serializer.serialize_str(s),
            LiteralValue::Regex => serializer.serialize_map(Some(0))?.end(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegexInfo {
    pub pattern: String,
    pub flags: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct Literal {
    pub value: LiteralValue,
    pub raw: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regex: Option<RegexInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bigint: Option<String>,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ThisExpression {
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ArrayExpression {
    /// Holes (elisions) are `None` and serialize as null.
    pub elements: Vec<Option<Expression>>,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ObjectMember {
    Property(Property),
    Spread(SpreadElement),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ObjectExpression {
    pub properties: Vec<ObjectMember>,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

/// `init`, getter, or setter property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Init,
    Get,
    Set,
}

impl Serialize for PropertyKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(match self {
            PropertyKind::Init => "init",
            PropertyKind::Get => "get",
            PropertyKind::Set => "set",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct Property {
    pub key: Box<Expression>,
    pub value: Box<Expression>,
    pub kind: PropertyKind,
    pub computed: bool,
    pub method: bool,
    pub shorthand: bool,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct FunctionExpression {
    pub id: Option<Identifier>,
    pub params: Vec<Pattern>,
    pub body: BlockStatement,
    pub generator: bool,
    #[serde(rename = "async")]
    pub is_async: bool,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

/// An arrow body: a block, or a bare expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ArrowBody {
    Block(BlockStatement),
    Expression(Box<Expression>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ArrowFunctionExpression {
    /// Always absent; present for schema compatibility.
    pub id: Option<Identifier>,
    pub params: Vec<Pattern>,
    pub body: ArrowBody,
    /// Always false; present for schema compatibility.
    pub generator: bool,
    #[serde(rename = "async")]
    pub is_async: bool,
    /// True when the body is a bare expression rather than a block.
    pub expression: bool,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ClassExpression {
    pub id: Option<Identifier>,
    #[serde(rename = "superClass")]
    pub super_class: Option<Box<Expression>>,
    pub body: ClassBody,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateValue {
    pub raw: String,
    /// Absent when the chunk contains an invalid escape (only legal in
    /// tagged templates).
    pub cooked: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct TemplateElement {
    pub value: TemplateValue,
    pub tail: bool,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct TemplateLiteral {
    pub quasis: Vec<TemplateElement>,
    pub expressions: Vec<Expression>,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct TaggedTemplateExpression {
    pub tag: Box<Expression>,
    pub quasi: TemplateLiteral,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct MemberExpression {
    pub object: Box<Expression>,
    pub property: Box<Expression>,
    pub computed: bool,
    pub optional: bool,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct Super {
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct MetaProperty {
    pub meta: Identifier,
    pub property: Identifier,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct NewExpression {
    pub callee: Box<Expression>,
    pub arguments: Vec<Expression>,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct CallExpression {
    pub callee: Box<Expression>,
    pub arguments: Vec<Expression>,
    pub optional: bool,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ImportExpression {
    pub source: Box<Expression>,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct UpdateExpression {
    pub operator: String,
    pub argument: Box<Expression>,
    pub prefix: bool,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct AwaitExpression {
    pub argument: Box<Expression>,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct UnaryExpression {
    pub operator: String,
    pub argument: Box<Expression>,
    pub prefix: bool,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct BinaryExpression {
    pub operator: String,
    /// `PrivateIdentifier` is permitted here only for `#name in obj`.
    pub left: Box<Expression>,
    pub right: Box<Expression>,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct LogicalExpression {
    pub operator: String,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ConditionalExpression {
    pub test: Box<Expression>,
    pub consequent: Box<Expression>,
    pub alternate: Box<Expression>,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct YieldExpression {
    pub argument: Option<Box<Expression>>,
    pub delegate: bool,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct AssignmentExpression {
    pub operator: String,
    pub left: Box<Pattern>,
    pub right: Box<Expression>,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct SequenceExpression {
    pub expressions: Vec<Expression>,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct SpreadElement {
    pub argument: Box<Expression>,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ChainExpression {
    pub expression: Box<Expression>,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

// ============================================================================
// Patterns
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Pattern {
    Identifier(Identifier),
    Object(ObjectPattern),
    Array(ArrayPattern),
    Rest(RestElement),
    Assignment(AssignmentPattern),
    /// Valid as an assignment target only, never as a binding.
    Member(MemberExpression),
}

impl Pattern {
    /// The byte span of this pattern.
    pub fn span(&self) -> Span {
        match self {
            Pattern::Identifier(n) => n.span,
            Pattern::Object(n) => n.span,
            Pattern::Array(n) => n.span,
            Pattern::Rest(n) => n.span,
            Pattern::Assignment(n) => n.span,
            Pattern::Member(n) => n.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ObjectPatternMember {
    Property(AssignmentProperty),
    Rest(RestElement),
}

/// A `Property` whose value position holds a pattern; serializes with
/// type `Property` like its expression counterpart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "Property")]
pub struct AssignmentProperty {
    pub key: Box<Expression>,
    pub value: Box<Pattern>,
    pub kind: PropertyKind,
    pub computed: bool,
    pub method: bool,
    pub shorthand: bool,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ObjectPattern {
    pub properties: Vec<ObjectPatternMember>,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ArrayPattern {
    /// Holes (elisions) are `None` and serialize as null.
    pub elements: Vec<Option<Pattern>>,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct RestElement {
    pub argument: Box<Pattern>,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct AssignmentPattern {
    pub left: Box<Pattern>,
    pub right: Box<Expression>,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_serialization() {
        let id = Identifier {
            name: "foo".to_string(),
            span: Span::new(0, 3),
            loc: None,
        };
        let json = serde_json::to_value(&id).unwrap();
        assert_eq!(json["type"], "Identifier");
        assert_eq!(json["name"], "foo");
        assert_eq!(json["start"], 0);
        assert_eq!(json["end"], 3);
        assert!(json.get("loc").is_none());
    }

    #[test]
    fn test_untagged_expression_dispatch() {
        let expr = Expression::This(ThisExpression {
            span: Span::new(0, 4),
            loc: None,
        });
        let json = serde_json::to_value(&expr).unwrap();
        assert_eq!(json["type"], "ThisExpression");
    }

    #[test]
    fn test_assignment_property_renames_to_property() {
        let prop = AssignmentProperty {
            key: Box::new(Expression::Identifier(Identifier {
                name: "x".to_string(),
                span: Span::new(1, 2),
                loc: None,
            })),
            value: Box::new(Pattern::Identifier(Identifier {
                name: "x".to_string(),
                span: Span::new(1, 2),
                loc: None,
            })),
            kind: PropertyKind::Init,
            computed: false,
            method: false,
            shorthand: true,
            span: Span::new(1, 2),
            loc: None,
        };
        let json = serde_json::to_value(&prop).unwrap();
        assert_eq!(json["type"], "Property");
        assert_eq!(json["kind"], "init");
        assert_eq!(json["shorthand"], true);
    }

    #[test]
    fn test_literal_values() {
        let lit = Literal {
            value: LiteralValue::Number(23.0),
            raw: "23".to_string(),
            regex: None,
            bigint: None,
            span: Span::new(0, 2),
            loc: None,
        };
        let json = serde_json::to_value(&lit).unwrap();
        assert_eq!(json["type"], "Literal");
        assert_eq!(json["value"], 23.0);
        assert_eq!(json["raw"], "23");

        let null_lit = Literal {
            value: LiteralValue::Null,
            raw: "null".to_string(),
            regex: None,
            bigint: None,
            span: Span::new(0, 4),
            loc: None,
        };
        let json = serde_json::to_value(&null_lit).unwrap();
        assert!(json["value"].is_null());
    }

    #[test]
    fn test_array_holes_serialize_as_null() {
        let arr = ArrayExpression {
            elements: vec![None],
            span: Span::new(0, 3),
            loc: None,
        };
        let json = serde_json::to_value(&arr).unwrap();
        assert!(json["elements"][0].is_null());
    }
}
