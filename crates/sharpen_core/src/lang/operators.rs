//! Operator vocabulary.
//!
//! This module defines the canonical C# operator set along with basic metadata such as binary precedence,
//! associativity, and fixity.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**.
//! - Word operators (`is`, `as`, `await`, ...) are keywords; see [`crate::lang::keywords`].
//! - `>>` and `>>=` are single entries here even though the parser may split them into `>` halves when closing
//!   nested type-argument lists.
//! - The conditional operator `?:` is spelled with punctuation and therefore has no entry.
//!
//! ## Examples
//! ```rust
//! use sharpen_core::lang::operators::{self, OperatorId};
//!
//! assert_eq!(operators::from_str("??"), Some(OperatorId::QuestionQuestion));
//! assert!(operators::info_for(OperatorId::Star).precedence > operators::info_for(OperatorId::Plus).precedence);
//! ```

use super::registry::Since;

/// Define how operators associate when chained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Associativity {
    Left,
    Right,
    None,
}

/// Define the primary syntactic position of an operator.
///
/// ## Notes
/// - Several infix operators (`+ - * & ^`) also have prefix forms and `++`/`--` also have postfix forms; the
///   parser owns those distinctions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fixity {
    Infix,
    Prefix,
}

/// Stable identifier for every operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorId {
    // Arithmetic
    Plus,
    Minus,
    Star,
    Slash,
    Percent,

    // Bitwise / logical
    Amp,
    Pipe,
    Caret,
    AmpAmp,
    PipePipe,
    QuestionQuestion,
    Shl,
    Shr,

    // Comparison
    EqEq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,

    // Ranges
    DotDot,

    // Prefix / postfix
    Bang,
    Tilde,
    PlusPlus,
    MinusMinus,

    // Assignment
    Eq,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    AmpEq,
    PipeEq,
    CaretEq,
    ShlEq,
    ShrEq,
    QuestionQuestionEq,
}

/// Metadata for an operator.
///
/// ## Notes
/// - `precedence` is a relative ordering where higher binds tighter. Assignment operators share the lowest level;
///   prefix operators share the highest.
#[derive(Debug, Clone, Copy)]
pub struct OperatorInfo {
    pub id: OperatorId,
    pub spelling: &'static str,
    pub precedence: u8,
    pub associativity: Associativity,
    pub fixity: Fixity,
    pub since: Since,
}

/// Registry of all operators.
pub const OPERATORS: &[OperatorInfo] = &[
    // Arithmetic
    op(OperatorId::Plus, "+", 120, Associativity::Left, Fixity::Infix, Since(1, 0)),
    op(OperatorId::Minus, "-", 120, Associativity::Left, Fixity::Infix, Since(1, 0)),
    op(OperatorId::Star, "*", 130, Associativity::Left, Fixity::Infix, Since(1, 0)),
    op(OperatorId::Slash, "/", 130, Associativity::Left, Fixity::Infix, Since(1, 0)),
    op(OperatorId::Percent, "%", 130, Associativity::Left, Fixity::Infix, Since(1, 0)),
    // Bitwise / logical
    op(OperatorId::Amp, "&", 80, Associativity::Left, Fixity::Infix, Since(1, 0)),
    op(OperatorId::Pipe, "|", 60, Associativity::Left, Fixity::Infix, Since(1, 0)),
    op(OperatorId::Caret, "^", 70, Associativity::Left, Fixity::Infix, Since(1, 0)),
    op(OperatorId::AmpAmp, "&&", 50, Associativity::Left, Fixity::Infix, Since(1, 0)),
    op(OperatorId::PipePipe, "||", 40, Associativity::Left, Fixity::Infix, Since(1, 0)),
    op(OperatorId::QuestionQuestion, "??", 30, Associativity::Right, Fixity::Infix, Since(2, 0)),
    op(OperatorId::Shl, "<<", 110, Associativity::Left, Fixity::Infix, Since(1, 0)),
    op(OperatorId::Shr, ">>", 110, Associativity::Left, Fixity::Infix, Since(1, 0)),
    // Comparison
    op(OperatorId::EqEq, "==", 90, Associativity::Left, Fixity::Infix, Since(1, 0)),
    op(OperatorId::NotEq, "!=", 90, Associativity::Left, Fixity::Infix, Since(1, 0)),
    op(OperatorId::Lt, "<", 100, Associativity::Left, Fixity::Infix, Since(1, 0)),
    op(OperatorId::Gt, ">", 100, Associativity::Left, Fixity::Infix, Since(1, 0)),
    op(OperatorId::LtEq, "<=", 100, Associativity::Left, Fixity::Infix, Since(1, 0)),
    op(OperatorId::GtEq, ">=", 100, Associativity::Left, Fixity::Infix, Since(1, 0)),
    // Ranges
    op(OperatorId::DotDot, "..", 150, Associativity::None, Fixity::Infix, Since(8, 0)),
    // Prefix / postfix
    op(OperatorId::Bang, "!", 160, Associativity::Right, Fixity::Prefix, Since(1, 0)),
    op(OperatorId::Tilde, "~", 160, Associativity::Right, Fixity::Prefix, Since(1, 0)),
    op(OperatorId::PlusPlus, "++", 160, Associativity::Right, Fixity::Prefix, Since(1, 0)),
    op(OperatorId::MinusMinus, "--", 160, Associativity::Right, Fixity::Prefix, Since(1, 0)),
    // Assignment
    op(OperatorId::Eq, "=", 10, Associativity::Right, Fixity::Infix, Since(1, 0)),
    op(OperatorId::PlusEq, "+=", 10, Associativity::Right, Fixity::Infix, Since(1, 0)),
    op(OperatorId::MinusEq, "-=", 10, Associativity::Right, Fixity::Infix, Since(1, 0)),
    op(OperatorId::StarEq, "*=", 10, Associativity::Right, Fixity::Infix, Since(1, 0)),
    op(OperatorId::SlashEq, "/=", 10, Associativity::Right, Fixity::Infix, Since(1, 0)),
    op(OperatorId::PercentEq, "%=", 10, Associativity::Right, Fixity::Infix, Since(1, 0)),
    op(OperatorId::AmpEq, "&=", 10, Associativity::Right, Fixity::Infix, Since(1, 0)),
    op(OperatorId::PipeEq, "|=", 10, Associativity::Right, Fixity::Infix, Since(1, 0)),
    op(OperatorId::CaretEq, "^=", 10, Associativity::Right, Fixity::Infix, Since(1, 0)),
    op(OperatorId::ShlEq, "<<=", 10, Associativity::Right, Fixity::Infix, Since(1, 0)),
    op(OperatorId::ShrEq, ">>=", 10, Associativity::Right, Fixity::Infix, Since(1, 0)),
    op(OperatorId::QuestionQuestionEq, "??=", 10, Associativity::Right, Fixity::Infix, Since(8, 0)),
];

/// Canonical spelling.
pub fn as_str(id: OperatorId) -> &'static str {
    info_for(id).spelling
}

/// Return `true` if `id` is a simple or compound assignment operator.
pub fn is_assignment(id: OperatorId) -> bool {
    info_for(id).precedence == ASSIGNMENT_PRECEDENCE
}

/// Return the full metadata entry for an operator.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: OperatorId) -> &'static OperatorInfo {
    OPERATORS.iter().find(|o| o.id == id).expect("operator info missing")
}

/// Resolve an operator spelling to its identifier.
///
/// ## Notes
/// - Matching is **case-sensitive** and exact (`">>"` resolves to [`OperatorId::Shr`], never to two `>`).
pub fn from_str(spelling: &str) -> Option<OperatorId> {
    OPERATORS.iter().find(|o| o.spelling == spelling).map(|o| o.id)
}

// --- helpers -----------------------------------------------------------------

const ASSIGNMENT_PRECEDENCE: u8 = 10;

const fn op(
    id: OperatorId,
    spelling: &'static str,
    precedence: u8,
    associativity: Associativity,
    fixity: Fixity,
    since: Since,
) -> OperatorInfo {
    OperatorInfo {
        id,
        spelling,
        precedence,
        associativity,
        fixity,
        since,
    }
}
