//! Canonical C# vocabulary shared by the sharpen lexer, parser and tooling.
//!
//! This crate is intentionally small and dependency-free. It holds registry tables with stable IDs for reserved and
//! contextual keywords, operators and punctuation, plus the metadata types those tables share.
//!
//! ## Notes
//!
//! - This is a “vocabulary” crate: **no IO**, no global state, and no AST types.
//! - Syntax rules are enforced by `sharpen_syntax`; the registries only answer “what is this spelling?” and
//!   “what do we know about it?”.

pub mod lang;
