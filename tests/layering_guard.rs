//! Layering guardrails for the workspace crates.
//!
//! `sharpen_core` holds the vocabulary and must stay dependency-free; `sharpen_syntax` may use the core but never the
//! `sharpen` facade that sits on top of it. These tests scan the member manifests' `[dependencies]` tables.

/// Dependency names listed in the `[dependencies]` table of `manifest`.
fn main_dependencies(manifest: &str) -> Vec<String> {
    let mut in_dependencies = false;
    let mut names = Vec::new();

    for raw_line in manifest.lines() {
        let line = raw_line.trim();
        // Track when we enter/exit the `[dependencies]` table.
        if line.starts_with('[') {
            in_dependencies = line == "[dependencies]";
            continue;
        }

        if !in_dependencies || line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Strip inline comments for robustness.
        let line_no_comment = line.split('#').next().unwrap_or("").trim();
        if let Some((name, _)) = line_no_comment.split_once('=') {
            names.push(name.trim().to_string());
        }
    }
    names
}

#[test]
fn core_has_no_dependencies() {
    let deps = main_dependencies(include_str!("../crates/sharpen_core/Cargo.toml"));
    assert!(deps.is_empty(), "`sharpen_core` must not depend on anything, found {deps:?}");
}

#[test]
fn syntax_does_not_depend_on_the_facade() {
    let deps = main_dependencies(include_str!("../crates/sharpen_syntax/Cargo.toml"));
    assert!(deps.iter().any(|d| d == "sharpen_core"), "{deps:?}");
    if deps.iter().any(|d| d == "sharpen") {
        panic!("`sharpen` must not appear in sharpen_syntax [dependencies]");
    }
}

#[test]
fn facade_uses_the_member_crates() {
    let deps = main_dependencies(include_str!("../Cargo.toml"));
    for member in ["sharpen_core", "sharpen_syntax"] {
        assert!(deps.iter().any(|d| d == member), "root [dependencies] is missing {member}");
    }
}
