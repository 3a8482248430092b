//! Shareable metadata for `sharpen_core::lang` registries.
//!
//! The `sharpen_core::lang` module is a set of **registry-first** vocabularies: keywords, operators and punctuation.
//! This submodule provides the small, dependency-free metadata types that are reused across all registries.
//!
//! ## Notes
//! - These types are intentionally lightweight and `Copy`-friendly so registries can live in `const` tables.
//! - Metadata is meant for tooling/docs/diagnostics; enforcement of syntax rules still lives in the lexer/parser.
//!
//! ## See also
//! - [`crate::lang::keywords`]
//! - [`crate::lang::operators`]
//! - [`crate::lang::punctuation`]

use std::fmt;

/// Language version a vocabulary item is available since, as `(major, minor)`.
///
/// ## Examples
/// ```rust
/// use sharpen_core::lang::registry::Since;
///
/// let since = Since(7, 3);
/// assert_eq!(since.to_string(), "C# 7.3");
/// assert!(Since(2, 0) < since);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Since(pub u8, pub u8);

impl fmt::Display for Since {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C# {}.{}", self.0, self.1)
    }
}
