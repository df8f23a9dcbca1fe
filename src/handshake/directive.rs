//! Path directive parsing.
//!
//! # Responsibilities
//! - Classify a request path into exactly one [`Action`]
//! - Extract the status code encoded in the leading path segment
//!
//! # Path Grammar
//! ```text
//! /{code}-returnshtml          → ServeHtml, status {code} (default 200)
//! /{code}-upgrade[s]           → Upgrade, status {code} (default 101)
//! /101, /redirected            → Upgrade, status 101
//! anything else                → Reject
//! ```
//!
//! The code is read leniently: whatever follows the leading `/` up to the
//! first `-` is parsed as a decimal integer, stopping at the first non-digit.
//! An unusable prefix never fails the request; the action default applies.

const HTML_SUFFIX: &str = "-returnshtml";
const UPGRADE_SUFFIXES: [&str; 2] = ["-upgrade", "-upgrades"];
const FIXED_UPGRADE_PATHS: [&str; 2] = ["/101", "/redirected"];

/// Status used for `-returnshtml` paths without a usable prefix.
pub const DEFAULT_HTML_STATUS: u32 = 200;
/// Status used for upgrade paths without a usable prefix.
pub const DEFAULT_UPGRADE_STATUS: u32 = 101;

/// What the responder should do with a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Plain HTTP response with an HTML body.
    ServeHtml,
    /// Hand-built upgrade response followed by a WebSocket session.
    Upgrade,
    /// 404, no session.
    Reject,
}

/// Parsed intent of a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    source_path: String,
    action: Action,
    status_code: Option<u32>,
}

impl Directive {
    /// Classify a plain HTTP path (no upgrade headers).
    ///
    /// Codes outside the range an HTTP response can carry fall back to
    /// [`DEFAULT_HTML_STATUS`].
    pub fn for_page(path: &str) -> Self {
        if !path.ends_with(HTML_SUFFIX) {
            return Self::reject(path);
        }

        let status = leading_status(path)
            .filter(|code| (100..=999).contains(code))
            .unwrap_or(DEFAULT_HTML_STATUS);

        Self {
            source_path: path.to_string(),
            action: Action::ServeHtml,
            status_code: Some(status),
        }
    }

    /// Classify a path that arrived with upgrade headers.
    pub fn for_upgrade(path: &str) -> Self {
        let status = if UPGRADE_SUFFIXES.iter().any(|suffix| path.ends_with(suffix)) {
            leading_status(path).unwrap_or(DEFAULT_UPGRADE_STATUS)
        } else if FIXED_UPGRADE_PATHS.contains(&path) {
            DEFAULT_UPGRADE_STATUS
        } else {
            return Self::reject(path);
        };

        Self {
            source_path: path.to_string(),
            action: Action::Upgrade,
            status_code: Some(status),
        }
    }

    fn reject(path: &str) -> Self {
        Self {
            source_path: path.to_string(),
            action: Action::Reject,
            status_code: None,
        }
    }

    pub fn source_path(&self) -> &str {
        &self.source_path
    }

    pub fn action(&self) -> Action {
        self.action
    }

    /// Status to advertise; `None` only for [`Action::Reject`].
    pub fn status_code(&self) -> Option<u32> {
        self.status_code
    }
}

/// Best-effort status code from the first path segment.
///
/// Skips leading whitespace and an optional `+`, then reads decimal digits
/// up to the first non-digit. Empty and zero values yield `None`, as do
/// values past `u32::MAX`.
pub fn leading_status(path: &str) -> Option<u32> {
    let rest = path.strip_prefix('/').unwrap_or(path);
    let segment = rest.split('-').next().unwrap_or_default();
    let segment = segment.trim_start();
    let segment = segment.strip_prefix('+').unwrap_or(segment);

    let digits_end = segment
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(segment.len());

    segment[..digits_end]
        .parse::<u32>()
        .ok()
        .filter(|code| *code != 0)
}
