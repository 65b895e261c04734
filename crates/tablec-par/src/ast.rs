//! AST node definitions.
//!
//! Nodes are closed sum types with owned children; every node records its
//! source span. The tree is rooted at [`Module`], whose scope is an
//! insertion-ordered map so re-printing and diagnostics are reproducible.
//! Strings inside nodes are interned [`Symbol`]s, which outlive the tree.

use indexmap::IndexMap;
use tablec_util::{Span, Symbol};

/// A dotted name: one or more identifier parts.
#[derive(Clone, Debug, PartialEq)]
pub struct Qualname {
    pub parts: Vec<Symbol>,
    pub span: Span,
}

impl Qualname {
    /// The dotted spelling, e.g. `io.file.open`.
    pub fn join(&self) -> Symbol {
        if self.parts.len() == 1 {
            return self.parts[0];
        }
        let joined = self
            .parts
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(".");
        Symbol::intern(&joined)
    }
}

/// A single declared identifier.
#[derive(Clone, Debug, PartialEq)]
pub struct Name {
    pub name: Symbol,
    pub span: Span,
}

// ---------------------------------------------------------------------------
// Top level
// ---------------------------------------------------------------------------

/// The root of a parsed file: named declarations plus the test list.
#[derive(Clone, Debug, PartialEq)]
pub struct Module {
    /// Declarations keyed by their module-scope name, in declaration
    /// order. Keys are unique; duplicates are diagnosed at parse time.
    pub scope: IndexMap<Symbol, Item>,
    pub tests: Vec<Test>,
    pub span: Span,
}

/// A module-scope declaration.
#[derive(Clone, Debug, PartialEq)]
pub enum Item {
    Import(Import),
    Func(FuncOverload),
    Const(Const),
    Struct(Struct),
    Macro(MacroDef),
}

impl Item {
    pub fn span(&self) -> Span {
        match self {
            Item::Import(n) => n.span,
            Item::Func(n) => n.span,
            Item::Const(n) => n.span,
            Item::Struct(n) => n.span,
            Item::Macro(n) => n.span,
        }
    }
}

/// An `import` in any of its forms. The parser records intent only; no
/// module graph is resolved here.
#[derive(Clone, Debug, PartialEq)]
pub struct Import {
    /// Local binding name; absent for bare `using` imports.
    pub local_name: Option<Name>,
    /// Dotted module path, when the target is a qualified name.
    pub qualified_name: Option<Qualname>,
    /// Path literal, when the target is a file.
    pub imported_file: Option<Symbol>,
    pub is_using: bool,
    pub span: Span,
}

/// All functions sharing one module-scope name.
///
/// A plain `func` definition lands here as a [`FuncDef`]; the `#overload`
/// directive contributes constituent names instead.
#[derive(Clone, Debug, PartialEq)]
pub struct FuncOverload {
    pub name: Symbol,
    pub members: Vec<OverloadMember>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum OverloadMember {
    Def(FuncDef),
    Named(Name),
}

#[derive(Clone, Debug, PartialEq)]
pub struct FuncDef {
    /// Absent for anonymous functions, which are rejected at module
    /// scope.
    pub name: Option<Name>,
    /// Parameters in declaration order, keyed by name.
    pub params: IndexMap<Symbol, Param>,
    pub ret_type: Option<Type>,
    pub body: Block,
    pub is_pub: bool,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub name: Name,
    pub ty: Option<Type>,
    pub default: Option<Expr>,
    pub is_vararg: bool,
    /// True for parameters declared after the vararg (or after a lone
    /// `...` separator); they can only be supplied by name.
    pub is_kw_only: bool,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Const {
    pub name: Name,
    pub ty: Option<Type>,
    pub value: Expr,
    pub is_pub: bool,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Struct {
    pub name: Name,
    pub constraints: Vec<Expr>,
    /// Fields in declaration order, keyed by name.
    pub fields: IndexMap<Symbol, Field>,
    pub is_pub: bool,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub name: Name,
    pub ty: Type,
    pub default: Option<Expr>,
    /// True for `using` fields, whose members are exposed on the
    /// enclosing struct.
    pub is_using: bool,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MacroDef {
    pub name: Name,
    pub params: Vec<Name>,
    pub body: Block,
    pub is_pub: bool,
    pub span: Span,
}

/// A `#test` block with an optional description string.
#[derive(Clone, Debug, PartialEq)]
pub struct Test {
    pub description: Option<Symbol>,
    pub body: Block,
    pub span: Span,
}

// ---------------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Qualname(Qualname),
    Int(IntLit),
    Float(FloatLit),
    Bool(BoolLit),
    Str(StrLit),
    Char(CharLit),
    Null(NullLit),
    Binop(BinopExpr),
    Unary(UnaryExpr),
    Not(NotExpr),
    And(AndExpr),
    Or(OrExpr),
    Cmp(CmpChain),
    Ternary(TernaryExpr),
    Reref(RerefExpr),
    Broadcast(BroadcastExpr),
    Async(AsyncExpr),
    Await(AwaitExpr),
    Array(ArrayLit),
    Call(CallExpr),
    Subscript(SubscriptExpr),
    Field(FieldExpr),
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Qualname(n) => n.span,
            Expr::Int(n) => n.span,
            Expr::Float(n) => n.span,
            Expr::Bool(n) => n.span,
            Expr::Str(n) => n.span,
            Expr::Char(n) => n.span,
            Expr::Null(n) => n.span,
            Expr::Binop(n) => n.span,
            Expr::Unary(n) => n.span,
            Expr::Not(n) => n.span,
            Expr::And(n) => n.span,
            Expr::Or(n) => n.span,
            Expr::Cmp(n) => n.span,
            Expr::Ternary(n) => n.span,
            Expr::Reref(n) => n.span,
            Expr::Broadcast(n) => n.span,
            Expr::Async(n) => n.span,
            Expr::Await(n) => n.span,
            Expr::Array(n) => n.span,
            Expr::Call(n) => n.span,
            Expr::Subscript(n) => n.span,
            Expr::Field(n) => n.span,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct IntLit {
    pub value: i64,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FloatLit {
    pub value: f64,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BoolLit {
    pub value: bool,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StrLit {
    pub value: Symbol,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CharLit {
    pub value: char,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NullLit {
    pub span: Span,
}

/// A binary operator application. The operator is kept as its source
/// spelling so custom operators need no special casing.
#[derive(Clone, Debug, PartialEq)]
pub struct BinopExpr {
    pub op: Symbol,
    pub lhs: Box<Expr>,
    pub rhs: Box<Expr>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UnaryExpr {
    pub op: Symbol,
    pub expr: Box<Expr>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NotExpr {
    pub expr: Box<Expr>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AndExpr {
    pub lhs: Box<Expr>,
    pub rhs: Box<Expr>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OrExpr {
    pub lhs: Box<Expr>,
    pub rhs: Box<Expr>,
    pub span: Span,
}

/// An n-ary comparison chain: `a < b <= c` keeps one node with operators
/// `[<, <=]` and operands `[a, b, c]`. There is always exactly one more
/// operand than operator.
#[derive(Clone, Debug, PartialEq)]
pub struct CmpChain {
    pub ops: Vec<Symbol>,
    pub operands: Vec<Expr>,
    pub span: Span,
}

/// `value if condition else alternative`. Non-associative.
#[derive(Clone, Debug, PartialEq)]
pub struct TernaryExpr {
    pub condition: Box<Expr>,
    pub true_expr: Box<Expr>,
    pub false_expr: Box<Expr>,
    pub span: Span,
}

/// One or more `@` prefixes taking references of references.
#[derive(Clone, Debug, PartialEq)]
pub struct RerefExpr {
    /// Number of `@`s; always at least one.
    pub levels: u32,
    pub target: Box<Expr>,
    pub span: Span,
}

/// Postfix `[]`: an element-wise (broadcast) application.
#[derive(Clone, Debug, PartialEq)]
pub struct BroadcastExpr {
    pub base: Box<Expr>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AsyncExpr {
    pub expr: Box<Expr>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AwaitExpr {
    pub expr: Box<Expr>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ArrayLit {
    pub elements: Vec<Expr>,
    pub span: Span,
}

/// A function call. Word-operator applications (`x \min y`) are calls
/// with `is_word_op` set and the left operand as the first positional
/// argument.
#[derive(Clone, Debug, PartialEq)]
pub struct CallExpr {
    pub callee: Box<Expr>,
    pub pos_args: Vec<Expr>,
    /// Named arguments in supply order. Keys are unique; duplicates are
    /// diagnosed at parse time.
    pub kw_args: IndexMap<Symbol, Expr>,
    pub is_word_op: bool,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SubscriptExpr {
    pub base: Box<Expr>,
    pub indices: Vec<Index>,
    pub span: Span,
}

/// One comma-separated position inside `[...]`.
#[derive(Clone, Debug, PartialEq)]
pub enum Index {
    Expr(Expr),
    Slice(Slice),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Slice {
    pub start: Option<Expr>,
    pub end: Option<Expr>,
    pub step: Option<Expr>,
    /// Whether the range endpoint is included, per the range token's
    /// flavor.
    pub inclusive: bool,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldExpr {
    pub base: Box<Expr>,
    pub field: Qualname,
    pub span: Span,
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub enum Type {
    Simple(SimpleType),
    Pointer(PointerType),
    Mutable(MutableType),
    Optional(OptionalType),
    Array(ArrayType),
    Func(FuncType),
    Template(TemplateType),
    Union(UnionType),
}

impl Type {
    pub fn span(&self) -> Span {
        match self {
            Type::Simple(n) => n.span,
            Type::Pointer(n) => n.span,
            Type::Mutable(n) => n.span,
            Type::Optional(n) => n.span,
            Type::Array(n) => n.span,
            Type::Func(n) => n.span,
            Type::Template(n) => n.span,
            Type::Union(n) => n.span,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SimpleType {
    pub base: Qualname,
    pub span: Span,
}

/// `@T`, or a bare `@` for an untyped pointer.
#[derive(Clone, Debug, PartialEq)]
pub struct PointerType {
    pub base: Option<Box<Type>>,
    pub span: Span,
}

/// `mut T` / `!T`. Always the outermost of the two wrapping modifiers.
#[derive(Clone, Debug, PartialEq)]
pub struct MutableType {
    pub base: Box<Type>,
    pub span: Span,
}

/// `opt T` / `?T`.
#[derive(Clone, Debug, PartialEq)]
pub struct OptionalType {
    pub base: Box<Type>,
    pub span: Span,
}

/// `[shape]T`.
///
/// An empty shape with `is_dynamic` set is the one-dimensional resizable
/// array; an empty shape without it leaves every extent to run time. A
/// `None` slot in the shape marks that dimension's extent as
/// runtime-determined.
#[derive(Clone, Debug, PartialEq)]
pub struct ArrayType {
    pub elem: Box<Type>,
    pub shape: Vec<Option<Expr>>,
    pub is_dynamic: bool,
    pub span: Span,
}

/// `T => U`, `(T1, T2) => U`, or `() => ()`. A `None` return is the unit
/// function type.
#[derive(Clone, Debug, PartialEq)]
pub struct FuncType {
    pub params: Vec<Type>,
    pub ret: Option<Box<Type>>,
    pub span: Span,
}

/// `Base(arg, ...)` template instantiation.
#[derive(Clone, Debug, PartialEq)]
pub struct TemplateType {
    pub base: Box<Type>,
    pub args: Vec<Type>,
    pub span: Span,
}

/// `A | B | C`, flattened into one node.
#[derive(Clone, Debug, PartialEq)]
pub struct UnionType {
    pub variants: Vec<Type>,
    pub span: Span,
}

// ---------------------------------------------------------------------------
// Statements
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    Expr(Expr),
    Block(Block),
    VarDecl(VarDecl),
    Assign(AssignChain),
    OpAssign(OpAssign),
    If(IfStmt),
    While(WhileLoop),
    For(ForLoop),
    Match(MatchStmt),
    With(WithStmt),
    Return(ReturnStmt),
    Break(BreakStmt),
    Skip(SkipStmt),
    Fail(FailStmt),
    Assert(AssertStmt),
    Defer(DeferStmt),
    Cancel(CancelStmt),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct VarDecl {
    pub name: Name,
    pub ty: Option<Type>,
    pub value: Option<Expr>,
    pub span: Span,
}

/// `a = b = value`: every left-hand side in order, then the final value.
#[derive(Clone, Debug, PartialEq)]
pub struct AssignChain {
    pub targets: Vec<Expr>,
    pub value: Expr,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OpAssign {
    pub target: Expr,
    pub op: Symbol,
    pub value: Expr,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct IfStmt {
    pub condition: Expr,
    pub body: Block,
    pub alternative: Option<ElseArm>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ElseArm {
    If(Box<IfStmt>),
    Block(Block),
}

#[derive(Clone, Debug, PartialEq)]
pub struct WhileLoop {
    pub condition: Expr,
    pub body: Block,
    pub span: Span,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ForMode {
    Normal,
    Parallel,
    Gpu,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ForLoop {
    pub targets: Vec<Name>,
    pub iterables: Vec<Expr>,
    pub label: Option<Name>,
    pub mode: ForMode,
    pub body: Block,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MatchStmt {
    pub scrutinee: Expr,
    pub cases: Vec<MatchCase>,
    pub span: Span,
}

/// One `case` arm. The default `else` arm has no patterns.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchCase {
    pub patterns: Vec<Expr>,
    pub body: Block,
    pub span: Span,
}

/// `with context [as name] { body }`.
#[derive(Clone, Debug, PartialEq)]
pub struct WithStmt {
    pub context: Expr,
    pub binding: Option<Name>,
    pub body: Block,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BreakStmt {
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SkipStmt {
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FailStmt {
    pub value: Option<Expr>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AssertStmt {
    pub condition: Expr,
    pub message: Option<Expr>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DeferStmt {
    pub body: Box<Stmt>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CancelStmt {
    pub target: Qualname,
    pub span: Span,
}
