//! Define the keyword vocabulary for the C# language.
//!
//! This module is the single source of truth for reserved and contextual words: a stable identifier
//! ([`KeywordId`]) plus a const metadata table ([`KEYWORDS`]) that records canonical spellings, categories,
//! reservation status and the language version that introduced each word.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**.
//! - Only [`Reservation::Reserved`] words are lexed as keyword tokens ([`reserved_from_str`]). Contextual words such
//!   as `var`, `where` or `async` stay identifiers in the token stream and are recognised by the parser in context.
//! - This registry is intentionally **pure** (no AST/IO/side effects).
//!
//! ## Examples
//! ```rust
//! use sharpen_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("while"), Some(KeywordId::While));
//! assert_eq!(keywords::reserved_from_str("var"), None);
//! assert_eq!(keywords::from_str("var"), Some(KeywordId::Var));
//! ```

use super::registry::Since;

/// Stable identifier for every reserved or contextual keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordId {
    // Reserved
    Abstract,
    As,
    Base,
    Bool,
    Break,
    Byte,
    Case,
    Catch,
    Char,
    Checked,
    Class,
    Const,
    Continue,
    Decimal,
    Default,
    Delegate,
    Do,
    Double,
    Else,
    Enum,
    Event,
    Explicit,
    Extern,
    False,
    Finally,
    Fixed,
    Float,
    For,
    Foreach,
    Goto,
    If,
    Implicit,
    In,
    Int,
    Interface,
    Internal,
    Is,
    Lock,
    Long,
    Namespace,
    New,
    Null,
    Object,
    Operator,
    Out,
    Override,
    Params,
    Private,
    Protected,
    Public,
    Readonly,
    Ref,
    Return,
    Sbyte,
    Sealed,
    Short,
    Sizeof,
    Stackalloc,
    Static,
    String,
    Struct,
    Switch,
    This,
    Throw,
    True,
    Try,
    Typeof,
    Uint,
    Ulong,
    Unchecked,
    Unsafe,
    Ushort,
    Using,
    Virtual,
    Void,
    Volatile,
    While,

    // Contextual
    Add,
    Alias,
    And,
    Ascending,
    Async,
    Await,
    By,
    Descending,
    Dynamic,
    Equals,
    From,
    Get,
    Global,
    Group,
    Init,
    Into,
    Join,
    Let,
    Nameof,
    Not,
    On,
    Or,
    Orderby,
    Partial,
    Remove,
    Select,
    Set,
    Unmanaged,
    Value,
    Var,
    When,
    Where,
    Yield,
}

/// High-level grouping for documentation and tooling.
///
/// ## Notes
/// - Categories are metadata only; they do not enforce parsing context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordCategory {
    Statement,
    Declaration,
    Modifier,
    PredefinedType,
    Literal,
    Expression,
    Operator,
    Accessor,
    Query,
    Pattern,
}

/// Whether a word is always a keyword or only in specific syntactic positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reservation {
    /// Never usable as a plain identifier (without `@`).
    Reserved,
    /// An identifier everywhere except the positions where the grammar gives it meaning.
    Contextual,
}

/// Metadata for a keyword.
#[derive(Debug, Clone, Copy)]
pub struct KeywordInfo {
    pub id: KeywordId,
    pub canonical: &'static str,
    pub category: KeywordCategory,
    pub reservation: Reservation,
    pub since: Since,
}

/// Registry of all keywords.
///
/// ## Notes
/// - Reserved words come first, in alphabetical order; contextual words follow.
pub const KEYWORDS: &[KeywordInfo] = &[
    reserved(KeywordId::Abstract, "abstract", KeywordCategory::Modifier, Since(1, 0)),
    reserved(KeywordId::As, "as", KeywordCategory::Operator, Since(1, 0)),
    reserved(KeywordId::Base, "base", KeywordCategory::Expression, Since(1, 0)),
    reserved(KeywordId::Bool, "bool", KeywordCategory::PredefinedType, Since(1, 0)),
    reserved(KeywordId::Break, "break", KeywordCategory::Statement, Since(1, 0)),
    reserved(KeywordId::Byte, "byte", KeywordCategory::PredefinedType, Since(1, 0)),
    reserved(KeywordId::Case, "case", KeywordCategory::Statement, Since(1, 0)),
    reserved(KeywordId::Catch, "catch", KeywordCategory::Statement, Since(1, 0)),
    reserved(KeywordId::Char, "char", KeywordCategory::PredefinedType, Since(1, 0)),
    reserved(KeywordId::Checked, "checked", KeywordCategory::Expression, Since(1, 0)),
    reserved(KeywordId::Class, "class", KeywordCategory::Declaration, Since(1, 0)),
    reserved(KeywordId::Const, "const", KeywordCategory::Modifier, Since(1, 0)),
    reserved(KeywordId::Continue, "continue", KeywordCategory::Statement, Since(1, 0)),
    reserved(KeywordId::Decimal, "decimal", KeywordCategory::PredefinedType, Since(1, 0)),
    reserved(KeywordId::Default, "default", KeywordCategory::Expression, Since(1, 0)),
    reserved(KeywordId::Delegate, "delegate", KeywordCategory::Declaration, Since(1, 0)),
    reserved(KeywordId::Do, "do", KeywordCategory::Statement, Since(1, 0)),
    reserved(KeywordId::Double, "double", KeywordCategory::PredefinedType, Since(1, 0)),
    reserved(KeywordId::Else, "else", KeywordCategory::Statement, Since(1, 0)),
    reserved(KeywordId::Enum, "enum", KeywordCategory::Declaration, Since(1, 0)),
    reserved(KeywordId::Event, "event", KeywordCategory::Declaration, Since(1, 0)),
    reserved(KeywordId::Explicit, "explicit", KeywordCategory::Declaration, Since(1, 0)),
    reserved(KeywordId::Extern, "extern", KeywordCategory::Modifier, Since(1, 0)),
    reserved(KeywordId::False, "false", KeywordCategory::Literal, Since(1, 0)),
    reserved(KeywordId::Finally, "finally", KeywordCategory::Statement, Since(1, 0)),
    reserved(KeywordId::Fixed, "fixed", KeywordCategory::Statement, Since(1, 0)),
    reserved(KeywordId::Float, "float", KeywordCategory::PredefinedType, Since(1, 0)),
    reserved(KeywordId::For, "for", KeywordCategory::Statement, Since(1, 0)),
    reserved(KeywordId::Foreach, "foreach", KeywordCategory::Statement, Since(1, 0)),
    reserved(KeywordId::Goto, "goto", KeywordCategory::Statement, Since(1, 0)),
    reserved(KeywordId::If, "if", KeywordCategory::Statement, Since(1, 0)),
    reserved(KeywordId::Implicit, "implicit", KeywordCategory::Declaration, Since(1, 0)),
    reserved(KeywordId::In, "in", KeywordCategory::Operator, Since(1, 0)),
    reserved(KeywordId::Int, "int", KeywordCategory::PredefinedType, Since(1, 0)),
    reserved(KeywordId::Interface, "interface", KeywordCategory::Declaration, Since(1, 0)),
    reserved(KeywordId::Internal, "internal", KeywordCategory::Modifier, Since(1, 0)),
    reserved(KeywordId::Is, "is", KeywordCategory::Operator, Since(1, 0)),
    reserved(KeywordId::Lock, "lock", KeywordCategory::Statement, Since(1, 0)),
    reserved(KeywordId::Long, "long", KeywordCategory::PredefinedType, Since(1, 0)),
    reserved(KeywordId::Namespace, "namespace", KeywordCategory::Declaration, Since(1, 0)),
    reserved(KeywordId::New, "new", KeywordCategory::Expression, Since(1, 0)),
    reserved(KeywordId::Null, "null", KeywordCategory::Literal, Since(1, 0)),
    reserved(KeywordId::Object, "object", KeywordCategory::PredefinedType, Since(1, 0)),
    reserved(KeywordId::Operator, "operator", KeywordCategory::Declaration, Since(1, 0)),
    reserved(KeywordId::Out, "out", KeywordCategory::Modifier, Since(1, 0)),
    reserved(KeywordId::Override, "override", KeywordCategory::Modifier, Since(1, 0)),
    reserved(KeywordId::Params, "params", KeywordCategory::Modifier, Since(1, 0)),
    reserved(KeywordId::Private, "private", KeywordCategory::Modifier, Since(1, 0)),
    reserved(KeywordId::Protected, "protected", KeywordCategory::Modifier, Since(1, 0)),
    reserved(KeywordId::Public, "public", KeywordCategory::Modifier, Since(1, 0)),
    reserved(KeywordId::Readonly, "readonly", KeywordCategory::Modifier, Since(1, 0)),
    reserved(KeywordId::Ref, "ref", KeywordCategory::Modifier, Since(1, 0)),
    reserved(KeywordId::Return, "return", KeywordCategory::Statement, Since(1, 0)),
    reserved(KeywordId::Sbyte, "sbyte", KeywordCategory::PredefinedType, Since(1, 0)),
    reserved(KeywordId::Sealed, "sealed", KeywordCategory::Modifier, Since(1, 0)),
    reserved(KeywordId::Short, "short", KeywordCategory::PredefinedType, Since(1, 0)),
    reserved(KeywordId::Sizeof, "sizeof", KeywordCategory::Expression, Since(1, 0)),
    reserved(KeywordId::Stackalloc, "stackalloc", KeywordCategory::Expression, Since(1, 0)),
    reserved(KeywordId::Static, "static", KeywordCategory::Modifier, Since(1, 0)),
    reserved(KeywordId::String, "string", KeywordCategory::PredefinedType, Since(1, 0)),
    reserved(KeywordId::Struct, "struct", KeywordCategory::Declaration, Since(1, 0)),
    reserved(KeywordId::Switch, "switch", KeywordCategory::Statement, Since(1, 0)),
    reserved(KeywordId::This, "this", KeywordCategory::Expression, Since(1, 0)),
    reserved(KeywordId::Throw, "throw", KeywordCategory::Statement, Since(1, 0)),
    reserved(KeywordId::True, "true", KeywordCategory::Literal, Since(1, 0)),
    reserved(KeywordId::Try, "try", KeywordCategory::Statement, Since(1, 0)),
    reserved(KeywordId::Typeof, "typeof", KeywordCategory::Expression, Since(1, 0)),
    reserved(KeywordId::Uint, "uint", KeywordCategory::PredefinedType, Since(1, 0)),
    reserved(KeywordId::Ulong, "ulong", KeywordCategory::PredefinedType, Since(1, 0)),
    reserved(KeywordId::Unchecked, "unchecked", KeywordCategory::Expression, Since(1, 0)),
    reserved(KeywordId::Unsafe, "unsafe", KeywordCategory::Modifier, Since(1, 0)),
    reserved(KeywordId::Ushort, "ushort", KeywordCategory::PredefinedType, Since(1, 0)),
    reserved(KeywordId::Using, "using", KeywordCategory::Declaration, Since(1, 0)),
    reserved(KeywordId::Virtual, "virtual", KeywordCategory::Modifier, Since(1, 0)),
    reserved(KeywordId::Void, "void", KeywordCategory::PredefinedType, Since(1, 0)),
    reserved(KeywordId::Volatile, "volatile", KeywordCategory::Modifier, Since(1, 0)),
    reserved(KeywordId::While, "while", KeywordCategory::Statement, Since(1, 0)),
    contextual(KeywordId::Add, "add", KeywordCategory::Accessor, Since(1, 0)),
    contextual(KeywordId::Alias, "alias", KeywordCategory::Declaration, Since(2, 0)),
    contextual(KeywordId::And, "and", KeywordCategory::Pattern, Since(9, 0)),
    contextual(KeywordId::Ascending, "ascending", KeywordCategory::Query, Since(3, 0)),
    contextual(KeywordId::Async, "async", KeywordCategory::Modifier, Since(5, 0)),
    contextual(KeywordId::Await, "await", KeywordCategory::Expression, Since(5, 0)),
    contextual(KeywordId::By, "by", KeywordCategory::Query, Since(3, 0)),
    contextual(KeywordId::Descending, "descending", KeywordCategory::Query, Since(3, 0)),
    contextual(KeywordId::Dynamic, "dynamic", KeywordCategory::PredefinedType, Since(4, 0)),
    contextual(KeywordId::Equals, "equals", KeywordCategory::Query, Since(3, 0)),
    contextual(KeywordId::From, "from", KeywordCategory::Query, Since(3, 0)),
    contextual(KeywordId::Get, "get", KeywordCategory::Accessor, Since(1, 0)),
    contextual(KeywordId::Global, "global", KeywordCategory::Declaration, Since(2, 0)),
    contextual(KeywordId::Group, "group", KeywordCategory::Query, Since(3, 0)),
    contextual(KeywordId::Init, "init", KeywordCategory::Accessor, Since(9, 0)),
    contextual(KeywordId::Into, "into", KeywordCategory::Query, Since(3, 0)),
    contextual(KeywordId::Join, "join", KeywordCategory::Query, Since(3, 0)),
    contextual(KeywordId::Let, "let", KeywordCategory::Query, Since(3, 0)),
    contextual(KeywordId::Nameof, "nameof", KeywordCategory::Expression, Since(6, 0)),
    contextual(KeywordId::Not, "not", KeywordCategory::Pattern, Since(9, 0)),
    contextual(KeywordId::On, "on", KeywordCategory::Query, Since(3, 0)),
    contextual(KeywordId::Or, "or", KeywordCategory::Pattern, Since(9, 0)),
    contextual(KeywordId::Orderby, "orderby", KeywordCategory::Query, Since(3, 0)),
    contextual(KeywordId::Partial, "partial", KeywordCategory::Modifier, Since(2, 0)),
    contextual(KeywordId::Remove, "remove", KeywordCategory::Accessor, Since(1, 0)),
    contextual(KeywordId::Select, "select", KeywordCategory::Query, Since(3, 0)),
    contextual(KeywordId::Set, "set", KeywordCategory::Accessor, Since(1, 0)),
    contextual(KeywordId::Unmanaged, "unmanaged", KeywordCategory::Declaration, Since(7, 3)),
    contextual(KeywordId::Value, "value", KeywordCategory::Accessor, Since(1, 0)),
    contextual(KeywordId::Var, "var", KeywordCategory::PredefinedType, Since(3, 0)),
    contextual(KeywordId::When, "when", KeywordCategory::Statement, Since(6, 0)),
    contextual(KeywordId::Where, "where", KeywordCategory::Declaration, Since(2, 0)),
    contextual(KeywordId::Yield, "yield", KeywordCategory::Statement, Since(2, 0)),
];

/// Canonical spelling.
pub fn as_str(id: KeywordId) -> &'static str {
    info_for(id).canonical
}

/// Category.
pub fn category(id: KeywordId) -> KeywordCategory {
    info_for(id).category
}

/// Return `true` if `id` is a reserved word (lexed as a keyword token).
pub fn is_reserved(id: KeywordId) -> bool {
    info_for(id).reservation == Reservation::Reserved
}

/// Return `true` if `id` names a predefined type (`int`, `string`, `void`, ...).
///
/// ## Notes
/// - Contextual type names (`var`, `dynamic`) are excluded: they lex as identifiers and parse as ordinary names.
pub fn is_predefined_type(id: KeywordId) -> bool {
    let info = info_for(id);
    info.category == KeywordCategory::PredefinedType && info.reservation == Reservation::Reserved
}

/// Full metadata.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: KeywordId) -> &'static KeywordInfo {
    KEYWORDS.iter().find(|k| k.id == id).expect("keyword info missing")
}

/// Lookup by spelling, reserved or contextual.
///
/// ## Returns
/// - `Some(KeywordId)` if the spelling matches this registry.
/// - `None` otherwise.
pub fn from_str(s: &str) -> Option<KeywordId> {
    KEYWORDS.iter().find(|k| k.canonical == s).map(|k| k.id)
}

/// Lookup by spelling, restricted to reserved words.
///
/// This is what the lexer uses: contextual words must remain identifiers.
pub fn reserved_from_str(s: &str) -> Option<KeywordId> {
    KEYWORDS
        .iter()
        .find(|k| k.reservation == Reservation::Reserved && k.canonical == s)
        .map(|k| k.id)
}

// --- helpers -----------------------------------------------------------------

const fn reserved(id: KeywordId, canonical: &'static str, category: KeywordCategory, since: Since) -> KeywordInfo {
    KeywordInfo {
        id,
        canonical,
        category,
        reservation: Reservation::Reserved,
        since,
    }
}

const fn contextual(id: KeywordId, canonical: &'static str, category: KeywordCategory, since: Since) -> KeywordInfo {
    KeywordInfo {
        id,
        canonical,
        category,
        reservation: Reservation::Contextual,
        since,
    }
}
