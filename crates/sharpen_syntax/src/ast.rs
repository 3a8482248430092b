//! Abstract Syntax Tree definitions for C# source.
//!
//! Every node family is a closed sum type. Nodes own their children exclusively (no sharing, no cycles) and carry
//! the byte span of the tokens consumed to build them through [`Spanned`].
//!
//! ## Notes
//! - Nodes are built once, fully populated, after their sub-parse succeeded; the parser never hands out a partially
//!   constructed node.
//! - Parenthesized expressions are kept as explicit [`Expr::Parenthesized`] nodes so a printer can reproduce the
//!   source grouping without re-deriving precedence.
//! - Contextual keywords (`var`, `async`, `where`, ...) only appear in the tree where the grammar gave them meaning;
//!   everywhere else they are plain identifiers.

use sharpen_core::lang::keywords::KeywordId;

/// Source location span (byte offsets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Return `true` if `other` lies entirely inside `self`.
    pub fn contains(self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Shift both offsets right by `offset` bytes.
    pub fn shifted(self, offset: usize) -> Span {
        Span::new(self.start + offset, self.end + offset)
    }
}

/// A node with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// Identifier spelling (verbatim `@` prefixes already stripped by the lexer)
pub type Ident = String;

// ============================================================================
// Compilation unit and namespaces
// ============================================================================

/// Root of a parsed source file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompilationUnit {
    pub externs: Vec<Spanned<Ident>>,
    pub usings: Vec<Spanned<UsingDirective>>,
    /// Global attribute sections (`[assembly: ...]`, `[module: ...]`).
    pub attributes: Vec<Spanned<AttributeSection>>,
    pub members: Vec<Spanned<NamespaceMember>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UsingDirective {
    /// `using System.Text;`
    Namespace(TypeName),
    /// `using static System.Math;`
    Static(TypeName),
    /// `using Json = Newtonsoft.Json;`
    Alias { alias: Ident, target: Spanned<Type> },
}

/// Anything that may appear directly inside a namespace body.
#[derive(Debug, Clone, PartialEq)]
pub enum NamespaceMember {
    Namespace(NamespaceDecl),
    Type(TypeDecl),
    /// Placeholder for a skipped, malformed declaration.
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NamespaceDecl {
    pub name: TypeName,
    /// `namespace A.B;` rather than `namespace A.B { ... }`.
    pub file_scoped: bool,
    pub externs: Vec<Spanned<Ident>>,
    pub usings: Vec<Spanned<UsingDirective>>,
    pub members: Vec<Spanned<NamespaceMember>>,
}

// ============================================================================
// Attributes and modifiers
// ============================================================================

/// `[target: A, B(1)]`
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSection {
    pub target: Option<Ident>,
    pub attributes: Vec<Spanned<Attribute>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: TypeName,
    pub args: Vec<Spanned<Argument>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    New,
    Public,
    Protected,
    Internal,
    Private,
    Abstract,
    Sealed,
    Static,
    Readonly,
    Volatile,
    Virtual,
    Override,
    Extern,
    Unsafe,
    Ref,
    Async,
    Partial,
}

impl Modifier {
    /// Source spelling of the modifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Modifier::New => "new",
            Modifier::Public => "public",
            Modifier::Protected => "protected",
            Modifier::Internal => "internal",
            Modifier::Private => "private",
            Modifier::Abstract => "abstract",
            Modifier::Sealed => "sealed",
            Modifier::Static => "static",
            Modifier::Readonly => "readonly",
            Modifier::Volatile => "volatile",
            Modifier::Virtual => "virtual",
            Modifier::Override => "override",
            Modifier::Extern => "extern",
            Modifier::Unsafe => "unsafe",
            Modifier::Ref => "ref",
            Modifier::Async => "async",
            Modifier::Partial => "partial",
        }
    }
}

// ============================================================================
// Type declarations
// ============================================================================

/// Shared shape of `class`, `struct`, `interface`, `enum` and `delegate` declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    pub attributes: Vec<Spanned<AttributeSection>>,
    pub modifiers: Vec<Spanned<Modifier>>,
    pub name: Ident,
    pub type_params: Vec<Spanned<TypeParam>>,
    /// Base class / interfaces, or the underlying integral type of an enum.
    pub base_list: Vec<Spanned<Type>>,
    pub constraints: Vec<Spanned<ConstraintClause>>,
    pub body: TypeBody,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Class,
    Struct,
    Interface,
}

impl ClassKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ClassKind::Class => "class",
            ClassKind::Struct => "struct",
            ClassKind::Interface => "interface",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeBody {
    Class {
        kind: ClassKind,
        members: Vec<Spanned<MemberDecl>>,
    },
    Enum(Vec<Spanned<EnumMember>>),
    Delegate {
        return_type: Spanned<Type>,
        params: Vec<Spanned<Param>>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumMember {
    pub attributes: Vec<Spanned<AttributeSection>>,
    pub name: Ident,
    pub value: Option<Spanned<Expr>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variance {
    In,
    Out,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeParam {
    pub attributes: Vec<Spanned<AttributeSection>>,
    pub variance: Option<Variance>,
    pub name: Ident,
}

/// `where T : class, IFoo, new()`
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintClause {
    pub param: Ident,
    pub constraints: Vec<Spanned<Constraint>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    Class,
    Struct,
    Unmanaged,
    New,
    Type(Type),
}

// ============================================================================
// Member declarations
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct MemberDecl {
    pub attributes: Vec<Spanned<AttributeSection>>,
    pub modifiers: Vec<Spanned<Modifier>>,
    pub kind: MemberKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MemberKind {
    Field(FieldDecl),
    Constant(FieldDecl),
    /// Field-like event: `event EventHandler Changed;`
    Event(FieldDecl),
    /// Event with `add` / `remove` accessors.
    EventWithAccessors(EventDecl),
    Property(PropertyDecl),
    Indexer(IndexerDecl),
    Method(MethodDecl),
    Constructor(ConstructorDecl),
    Destructor(DestructorDecl),
    Operator(OperatorDecl),
    Conversion(ConversionDecl),
    NestedType(TypeDecl),
    /// `fixed int buffer[16];` (structs only)
    FixedBuffer(FixedBufferDecl),
    /// Placeholder for a skipped, malformed member.
    Error,
}

impl MemberKind {
    /// Human-readable name used in diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            MemberKind::Field(_) => "field",
            MemberKind::Constant(_) => "constant",
            MemberKind::Event(_) | MemberKind::EventWithAccessors(_) => "event",
            MemberKind::Property(_) => "property",
            MemberKind::Indexer(_) => "indexer",
            MemberKind::Method(_) => "method",
            MemberKind::Constructor(_) => "constructor",
            MemberKind::Destructor(_) => "destructor",
            MemberKind::FixedBuffer(_) => "fixed-size buffer",
            MemberKind::Operator(_) => "operator",
            MemberKind::Conversion(_) => "conversion operator",
            MemberKind::NestedType(_) => "nested type",
            MemberKind::Error => "member",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub ty: Spanned<Type>,
    pub declarators: Vec<Spanned<VariableDeclarator>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FixedBufferDecl {
    pub ty: Spanned<Type>,
    pub declarators: Vec<Spanned<FixedBufferDeclarator>>,
}

/// `name[size]`
#[derive(Debug, Clone, PartialEq)]
pub struct FixedBufferDeclarator {
    pub name: Ident,
    pub size: Spanned<Expr>,
}

/// `name` or `name = initializer`
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclarator {
    pub name: Ident,
    pub initializer: Option<Spanned<Expr>>,
}

/// A member name, optionally qualified by an explicitly implemented interface (`IFoo.Bar`).
#[derive(Debug, Clone, PartialEq)]
pub struct MemberName {
    pub interface: Option<TypeName>,
    pub name: Ident,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventDecl {
    pub ty: Spanned<Type>,
    pub name: MemberName,
    pub accessors: Vec<Spanned<Accessor>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDecl {
    pub ty: Spanned<Type>,
    pub name: MemberName,
    pub body: PropertyBody,
    pub initializer: Option<Spanned<Expr>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyBody {
    Accessors(Vec<Spanned<Accessor>>),
    /// `=> expr;`
    Expr(Spanned<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexerDecl {
    pub ty: Spanned<Type>,
    pub interface: Option<TypeName>,
    pub params: Vec<Spanned<Param>>,
    pub body: PropertyBody,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessorKind {
    Get,
    Set,
    Init,
    Add,
    Remove,
}

impl AccessorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AccessorKind::Get => "get",
            AccessorKind::Set => "set",
            AccessorKind::Init => "init",
            AccessorKind::Add => "add",
            AccessorKind::Remove => "remove",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Accessor {
    pub attributes: Vec<Spanned<AttributeSection>>,
    pub modifiers: Vec<Spanned<Modifier>>,
    pub kind: AccessorKind,
    pub body: MethodBody,
}

/// Body of anything callable.
#[derive(Debug, Clone, PartialEq)]
pub enum MethodBody {
    Block(Spanned<Block>),
    /// `=> expr;`
    Expr(Spanned<Expr>),
    /// `;` (abstract, extern, interface and partial members, auto accessors)
    None,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    pub return_type: Spanned<Type>,
    pub name: MemberName,
    pub type_params: Vec<Spanned<TypeParam>>,
    pub params: Vec<Spanned<Param>>,
    pub constraints: Vec<Spanned<ConstraintClause>>,
    pub body: MethodBody,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamModifier {
    Ref,
    Out,
    In,
    This,
    Params,
}

impl ParamModifier {
    pub fn as_str(self) -> &'static str {
        match self {
            ParamModifier::Ref => "ref",
            ParamModifier::Out => "out",
            ParamModifier::In => "in",
            ParamModifier::This => "this",
            ParamModifier::Params => "params",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub attributes: Vec<Spanned<AttributeSection>>,
    pub modifier: Option<ParamModifier>,
    pub ty: Spanned<Type>,
    pub name: Ident,
    pub default: Option<Spanned<Expr>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorDecl {
    pub name: Ident,
    pub params: Vec<Spanned<Param>>,
    pub initializer: Option<Spanned<ConstructorInitializer>>,
    pub body: MethodBody,
}

/// `: base(...)` or `: this(...)`
#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorInitializer {
    pub target: InitializerTarget,
    pub args: Vec<Spanned<Argument>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InitializerTarget {
    Base,
    This,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DestructorDecl {
    pub name: Ident,
    pub body: MethodBody,
}

/// User-defined operator (`public static Vec operator +(Vec a, Vec b)`).
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorDecl {
    pub return_type: Spanned<Type>,
    pub op: OverloadableOp,
    pub params: Vec<Spanned<Param>>,
    pub body: MethodBody,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverloadableOp {
    Plus,
    Minus,
    Not,
    BitNot,
    Increment,
    Decrement,
    True,
    False,
    Mul,
    Div,
    Mod,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
}

impl OverloadableOp {
    pub fn as_str(self) -> &'static str {
        match self {
            OverloadableOp::Plus => "+",
            OverloadableOp::Minus => "-",
            OverloadableOp::Not => "!",
            OverloadableOp::BitNot => "~",
            OverloadableOp::Increment => "++",
            OverloadableOp::Decrement => "--",
            OverloadableOp::True => "true",
            OverloadableOp::False => "false",
            OverloadableOp::Mul => "*",
            OverloadableOp::Div => "/",
            OverloadableOp::Mod => "%",
            OverloadableOp::BitAnd => "&",
            OverloadableOp::BitOr => "|",
            OverloadableOp::BitXor => "^",
            OverloadableOp::Shl => "<<",
            OverloadableOp::Shr => ">>",
            OverloadableOp::Eq => "==",
            OverloadableOp::NotEq => "!=",
            OverloadableOp::Lt => "<",
            OverloadableOp::Gt => ">",
            OverloadableOp::LtEq => "<=",
            OverloadableOp::GtEq => ">=",
        }
    }
}

/// `implicit operator T(S s)` / `explicit operator T(S s)`
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionDecl {
    pub implicit: bool,
    pub target: Spanned<Type>,
    pub params: Vec<Spanned<Param>>,
    pub body: MethodBody,
}

// ============================================================================
// Types
// ============================================================================

/// A possibly qualified, possibly generic name: `global::System.Collections.Generic.List<int>`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeName {
    /// Alias qualifier before `::` (`global`, an extern alias, or a using alias).
    pub alias: Option<Ident>,
    pub segments: Vec<NameSegment>,
}

impl TypeName {
    pub fn simple(name: impl Into<Ident>) -> Self {
        Self {
            alias: None,
            segments: vec![NameSegment {
                name: name.into(),
                type_args: Vec::new(),
            }],
        }
    }

    /// Return the last segment's identifier.
    pub fn last_name(&self) -> &str {
        self.segments.last().map(|s| s.name.as_str()).unwrap_or("")
    }

    /// Return `true` if any segment carries type arguments.
    pub fn is_generic(&self) -> bool {
        self.segments.iter().any(|s| !s.type_args.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NameSegment {
    pub name: Ident,
    pub type_args: Vec<Spanned<Type>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    /// `int`, `string`, `void`, ...
    Predefined(KeywordId),
    Named(TypeName),
    /// One rank specifier; `rank` is the number of dimensions (`[,]` has rank 2).
    Array { element: Box<Spanned<Type>>, rank: usize },
    Nullable(Box<Spanned<Type>>),
    Pointer(Box<Spanned<Type>>),
    Tuple(Vec<Spanned<TupleTypeElement>>),
    /// Missing argument of an unbound generic name (`Dictionary<,>`).
    Omitted,
    /// `ref T` / `ref readonly T` on locals, return types and properties.
    Ref { readonly: bool, ty: Box<Spanned<Type>> },
}

impl Type {
    /// Return `true` if this is the contextual `var` type.
    pub fn is_var(&self) -> bool {
        matches!(self, Type::Named(n) if n.alias.is_none() && n.segments.len() == 1
            && n.segments[0].name == "var" && n.segments[0].type_args.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TupleTypeElement {
    pub ty: Spanned<Type>,
    pub name: Option<Ident>,
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub statements: Vec<Spanned<Statement>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Block(Block),
    /// A lone `;`
    Empty,
    Expression(Spanned<Expr>),
    LocalDeclaration(LocalDeclaration),
    LocalFunction(LocalFunction),
    Labeled {
        label: Ident,
        statement: Box<Spanned<Statement>>,
    },
    If {
        cond: Spanned<Expr>,
        then: Box<Spanned<Statement>>,
        otherwise: Option<Box<Spanned<Statement>>>,
    },
    While {
        cond: Spanned<Expr>,
        body: Box<Spanned<Statement>>,
    },
    Do {
        body: Box<Spanned<Statement>>,
        cond: Spanned<Expr>,
    },
    For {
        init: Option<ForInit>,
        cond: Option<Spanned<Expr>>,
        iterators: Vec<Spanned<Expr>>,
        body: Box<Spanned<Statement>>,
    },
    ForEach {
        is_await: bool,
        ty: Spanned<Type>,
        target: Designation,
        iterable: Spanned<Expr>,
        body: Box<Spanned<Statement>>,
    },
    Switch {
        scrutinee: Spanned<Expr>,
        sections: Vec<Spanned<SwitchSection>>,
    },
    Try {
        block: Spanned<Block>,
        catches: Vec<Spanned<CatchClause>>,
        finally: Option<Spanned<Block>>,
    },
    Using {
        is_await: bool,
        resource: UsingResource,
        body: Box<Spanned<Statement>>,
    },
    Lock {
        target: Spanned<Expr>,
        body: Box<Spanned<Statement>>,
    },
    Fixed {
        declaration: LocalDeclaration,
        body: Box<Spanned<Statement>>,
    },
    Checked(Spanned<Block>),
    Unchecked(Spanned<Block>),
    Unsafe(Spanned<Block>),
    Return(Option<Spanned<Expr>>),
    Break,
    Continue,
    Goto(GotoTarget),
    Throw(Option<Spanned<Expr>>),
    YieldReturn(Spanned<Expr>),
    YieldBreak,
    /// Placeholder for a skipped, malformed statement.
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocalDeclaration {
    pub is_const: bool,
    /// `using var x = ...;`
    pub is_using: bool,
    /// `await using var x = ...;`
    pub is_await: bool,
    pub ty: Spanned<Type>,
    pub declarators: Vec<Spanned<VariableDeclarator>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocalFunction {
    pub modifiers: Vec<Spanned<Modifier>>,
    pub method: MethodDecl,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    Declaration(LocalDeclaration),
    Expressions(Vec<Spanned<Expr>>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchSection {
    pub labels: Vec<Spanned<SwitchLabel>>,
    pub statements: Vec<Spanned<Statement>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SwitchLabel {
    Case {
        pattern: Spanned<Pattern>,
        guard: Option<Spanned<Expr>>,
    },
    Default,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    pub ty: Option<Spanned<Type>>,
    pub name: Option<Ident>,
    /// Exception filter (`when (cond)`).
    pub filter: Option<Spanned<Expr>>,
    pub block: Spanned<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UsingResource {
    Declaration(LocalDeclaration),
    Expr(Spanned<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum GotoTarget {
    Label(Ident),
    Case(Spanned<Expr>),
    Default,
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    Interpolated {
        verbatim: bool,
        parts: Vec<InterpolatedPart>,
    },
    /// Simple name with optional type arguments: `x`, `List<int>`.
    Name {
        name: Ident,
        type_args: Vec<Spanned<Type>>,
    },
    /// `global::System`
    AliasQualified {
        alias: Ident,
        name: Ident,
        type_args: Vec<Spanned<Type>>,
    },
    /// Predefined type used as an expression target (`int.Parse`).
    PredefinedType(KeywordId),
    MemberAccess {
        target: Box<Spanned<Expr>>,
        kind: AccessKind,
        name: Ident,
        type_args: Vec<Spanned<Type>>,
    },
    Invocation {
        target: Box<Spanned<Expr>>,
        args: Vec<Spanned<Argument>>,
    },
    Indexing {
        target: Box<Spanned<Expr>>,
        args: Vec<Spanned<Argument>>,
        /// `a?[i]`
        conditional: bool,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Spanned<Expr>>,
    },
    Postfix {
        op: PostfixOp,
        operand: Box<Spanned<Expr>>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Spanned<Expr>>,
        right: Box<Spanned<Expr>>,
    },
    Conditional {
        cond: Box<Spanned<Expr>>,
        then: Box<Spanned<Expr>>,
        otherwise: Box<Spanned<Expr>>,
    },
    Assignment {
        target: Box<Spanned<Expr>>,
        op: AssignOp,
        value: Box<Spanned<Expr>>,
    },
    Cast {
        ty: Spanned<Type>,
        operand: Box<Spanned<Expr>>,
    },
    Lambda(Box<LambdaExpr>),
    /// `delegate (int x) { ... }`
    AnonymousMethod {
        is_async: bool,
        params: Option<Vec<Spanned<Param>>>,
        body: Spanned<Block>,
    },
    /// `new T(args) { init }` or target-typed `new(args)`.
    ObjectCreation {
        ty: Option<Spanned<Type>>,
        args: Option<Vec<Spanned<Argument>>>,
        initializer: Option<Spanned<Initializer>>,
    },
    /// `new int[3][]`, `new int[] { 1, 2 }`.
    ArrayCreation {
        element: Spanned<Type>,
        sizes: Vec<Spanned<Expr>>,
        /// Trailing rank specifiers (or all of them when `sizes` is empty).
        ranks: Vec<usize>,
        initializer: Option<Spanned<Initializer>>,
    },
    /// `new[] { 1, 2 }`, `new[,] { {1}, {2} }`.
    ImplicitArrayCreation {
        rank: usize,
        initializer: Spanned<Initializer>,
    },
    /// `new { X = 1, y.Z }`
    AnonymousObject(Vec<Spanned<AnonymousMember>>),
    /// Brace-enclosed object, collection or array initializer.
    Initializer(Initializer),
    Query(QueryExpr),
    Switch {
        scrutinee: Box<Spanned<Expr>>,
        arms: Vec<Spanned<SwitchArm>>,
    },
    Is {
        operand: Box<Spanned<Expr>>,
        pattern: Box<Spanned<Pattern>>,
    },
    As {
        operand: Box<Spanned<Expr>>,
        ty: Spanned<Type>,
    },
    Throw(Box<Spanned<Expr>>),
    Tuple(Vec<Spanned<TupleElement>>),
    Parenthesized(Box<Spanned<Expr>>),
    This,
    Base,
    TypeOf(Spanned<Type>),
    SizeOf(Spanned<Type>),
    NameOf(Box<Spanned<Expr>>),
    Checked(Box<Spanned<Expr>>),
    Unchecked(Box<Spanned<Expr>>),
    /// `default` literal or `default(T)`.
    Default(Option<Spanned<Type>>),
    StackAlloc {
        element: Spanned<Type>,
        size: Option<Box<Spanned<Expr>>>,
        initializer: Option<Spanned<Initializer>>,
    },
    /// `a..b`, `..b`, `a..`, `..`
    Range {
        start: Option<Box<Spanned<Expr>>>,
        end: Option<Box<Spanned<Expr>>>,
    },
    /// `var x`, `int x`, `var (a, b)` in out-arguments and deconstruction.
    Declaration {
        ty: Spanned<Type>,
        designation: Designation,
    },
    /// `ref x` as an initializer, return value or conditional branch.
    Ref(Box<Spanned<Expr>>),
    /// Placeholder for an expression that failed to parse.
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Raw spelling, including prefixes, separators and suffixes (`0x_FFu`).
    Int(String),
    Real(String),
    /// Raw spelling including quotes.
    Char(String),
    String(String),
    VerbatimString(String),
    Bool(bool),
    Null,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InterpolatedPart {
    /// Raw text between holes (escaped braces kept as written).
    Text(String),
    Hole {
        expr: Spanned<Expr>,
        alignment: Option<Spanned<Expr>>,
        format: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessKind {
    /// `a.b`
    Dot,
    /// `a?.b`
    NullConditional,
    /// `p->b`
    Pointer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgModifier {
    Ref,
    Out,
    In,
}

impl ArgModifier {
    pub fn as_str(self) -> &'static str {
        match self {
            ArgModifier::Ref => "ref",
            ArgModifier::Out => "out",
            ArgModifier::In => "in",
        }
    }
}

/// Call, index or attribute argument: `name: ref value`.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub name: Option<Ident>,
    pub modifier: Option<ArgModifier>,
    pub value: Spanned<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Plus,
    Minus,
    Not,
    BitNot,
    PreIncrement,
    PreDecrement,
    AddressOf,
    Deref,
    /// `^n`
    IndexFromEnd,
    Await,
}

impl UnaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Plus => "+",
            UnaryOp::Minus => "-",
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "~",
            UnaryOp::PreIncrement => "++",
            UnaryOp::PreDecrement => "--",
            UnaryOp::AddressOf => "&",
            UnaryOp::Deref => "*",
            UnaryOp::IndexFromEnd => "^",
            UnaryOp::Await => "await",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostfixOp {
    Increment,
    Decrement,
    /// Null-forgiving `!`
    NullForgiving,
}

impl PostfixOp {
    pub fn as_str(self) -> &'static str {
        match self {
            PostfixOp::Increment => "++",
            PostfixOp::Decrement => "--",
            PostfixOp::NullForgiving => "!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Coalesce,
    Or,
    And,
    BitOr,
    BitXor,
    BitAnd,
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Shl,
    Shr,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Coalesce => "??",
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::BitAnd => "&",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::LtEq => "<=",
            BinaryOp::GtEq => ">=",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    Coalesce,
}

impl AssignOp {
    pub fn as_str(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Div => "/=",
            AssignOp::Mod => "%=",
            AssignOp::BitAnd => "&=",
            AssignOp::BitOr => "|=",
            AssignOp::BitXor => "^=",
            AssignOp::Shl => "<<=",
            AssignOp::Shr => ">>=",
            AssignOp::Coalesce => "??=",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LambdaExpr {
    pub is_async: bool,
    /// `x => ...` has no parentheses around its single parameter.
    pub parenthesized: bool,
    pub params: Vec<Spanned<LambdaParam>>,
    pub body: LambdaBody,
}

/// Explicitly typed (`ref int x`) or implicitly typed (`x`) lambda parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct LambdaParam {
    pub modifier: Option<ParamModifier>,
    pub ty: Option<Spanned<Type>>,
    pub name: Ident,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LambdaBody {
    Expr(Box<Spanned<Expr>>),
    Block(Spanned<Block>),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Initializer {
    pub entries: Vec<Spanned<InitializerEntry>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InitializerEntry {
    /// `Name = value` (value may itself be an [`Expr::Initializer`]).
    Member { name: Ident, value: Spanned<Expr> },
    /// `[i, j] = value`
    Indexer {
        args: Vec<Spanned<Argument>>,
        value: Spanned<Expr>,
    },
    /// Collection or array element.
    Element(Spanned<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnonymousMember {
    pub name: Option<Ident>,
    pub value: Spanned<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TupleElement {
    pub name: Option<Ident>,
    pub value: Spanned<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchArm {
    pub pattern: Spanned<Pattern>,
    pub guard: Option<Spanned<Expr>>,
    pub body: Spanned<Expr>,
}

/// Target of a declaration pattern or declaration expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Designation {
    Single(Ident),
    Discard,
    Parenthesized(Vec<Designation>),
}

// ============================================================================
// Patterns
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// `_`
    Discard,
    /// `var x`, `var (a, b)`
    Var(Designation),
    /// `int x`
    Declaration { ty: Spanned<Type>, designation: Designation },
    /// `string`
    Type(Spanned<Type>),
    Constant(Spanned<Expr>),
    /// `> 5`
    Relational { op: BinaryOp, value: Spanned<Expr> },
    /// `Point(var x, _) { Y: > 0 } p`; the positional and property parts are each optional.
    Recursive {
        ty: Option<Spanned<Type>>,
        positional: Option<Vec<Spanned<Subpattern>>>,
        properties: Option<Vec<Spanned<Subpattern>>>,
        designation: Option<Designation>,
    },
    Not(Box<Spanned<Pattern>>),
    And(Box<Spanned<Pattern>>, Box<Spanned<Pattern>>),
    Or(Box<Spanned<Pattern>>, Box<Spanned<Pattern>>),
    Parenthesized(Box<Spanned<Pattern>>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Subpattern {
    pub name: Option<Ident>,
    pub pattern: Spanned<Pattern>,
}

// ============================================================================
// Query expressions
// ============================================================================

/// `from x in xs where ... select ...`, stored as the flat clause sequence in source order.
///
/// ## Notes
/// - The first clause is always [`QueryClause::From`].
/// - Every query body ends with `Select` or `Group`; an `Into` continuation starts a new body.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryExpr {
    pub clauses: Vec<Spanned<QueryClause>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryClause {
    From {
        ty: Option<Spanned<Type>>,
        name: Ident,
        source: Spanned<Expr>,
    },
    Let {
        name: Ident,
        value: Spanned<Expr>,
    },
    Where(Spanned<Expr>),
    Join {
        ty: Option<Spanned<Type>>,
        name: Ident,
        source: Spanned<Expr>,
        left: Spanned<Expr>,
        right: Spanned<Expr>,
        into: Option<Ident>,
    },
    OrderBy(Vec<Spanned<Ordering>>),
    Select(Spanned<Expr>),
    Group {
        value: Spanned<Expr>,
        key: Spanned<Expr>,
    },
    /// `into name` continuation.
    Into(Ident),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ordering {
    pub expr: Spanned<Expr>,
    pub direction: Option<OrderDirection>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderDirection {
    Ascending,
    Descending,
}
