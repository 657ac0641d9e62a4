// src/crawl/scope.rs
// =============================================================================
// This module decides which links belong to the site we are mirroring, and
// turns a link into the file name we save it under.
//
// Two rules live here:
// 1. Scope: a link is "ours" if it is root-relative ("/docs") or if it starts
//    with the base URL followed by a slash.
// 2. Identifier: the part of the link after the base URL, with slashes turned
//    into underscores ("doc/tutorial" -> "doc_tutorial"). The base page itself
//    is always called "home".
//
// Everything in this file is pure string work: no I/O, no hidden state.
// =============================================================================

/// The reserved identifier used for the base page itself.
pub const HOME_IDENTIFIER: &str = "home";

/// The URL prefix that defines "same site" for one crawl.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    base: String,
}

impl Scope {
    /// Builds a scope from a base URL.
    ///
    /// Trailing slashes are trimmed, so `https://go.dev/` and `https://go.dev`
    /// describe the same site.
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        let trimmed = base.trim_end_matches('/');
        Self {
            base: trimmed.to_string(),
        }
    }

    /// The normalized base URL (never ends with `/`).
    pub fn base(&self) -> &str {
        &self.base
    }

    // A link equal to the base, or one that merely shares a string prefix
    // ("https://go.dev/docs" against "https://go.dev/doc"), is out of scope.
    pub fn is_in_scope(&self, link: &str) -> bool {
        if link.starts_with('/') {
            return true;
        }

        link.strip_prefix(self.base.as_str())
            .map(|rest| rest.starts_with('/'))
            .unwrap_or(false)
    }

    /// Makes a root-relative link absolute by prefixing it with the base.
    /// Anything else is returned unchanged.
    pub fn resolve(&self, link: &str) -> String {
        if link.starts_with('/') {
            format!("{}{}", self.base, link)
        } else {
            link.to_string()
        }
    }

    /// Derives the filesystem-safe identifier for a link.
    ///
    /// Examples with base `https://go.dev`:
    ///   `https://go.dev`                            -> `home`
    ///   `https://go.dev/`                           -> `home`
    ///   `https://go.dev/doc/tutorial/web-service-gin` -> `doc_tutorial_web-service-gin`
    pub fn derive_identifier(&self, link: &str) -> String {
        let rest = match link.strip_prefix(self.base.as_str()) {
            Some(rest) if !rest.is_empty() => rest,
            _ => return HOME_IDENTIFIER.to_string(),
        };

        let rest = rest.strip_prefix('/').unwrap_or(rest);
        let rest = rest.strip_suffix('/').unwrap_or(rest);

        if rest.is_empty() {
            return HOME_IDENTIFIER.to_string();
        }

        rest.replace('/', "_")
    }
}
