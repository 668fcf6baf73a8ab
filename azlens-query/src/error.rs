//! Query error types and az failure classification.
//!
//! The az CLI reports auth and permission problems only through stderr
//! text, so classification is a pure function over enumerated substring
//! tables rather than scattered ad-hoc checks.

use azlens_core::CoreError;
use azlens_fetch::ProcessError;
use thiserror::Error;

// ============================================================================
// Query Error
// ============================================================================

/// Error type for engine operations.
#[derive(Debug, Error)]
pub enum QueryError {
    /// az exited non-zero or transport failed, with no more specific cause.
    #[error("Command failed: {0}")]
    Execution(String),

    /// Malformed JSON payload.
    #[error("Failed to parse az output: {0}")]
    Parse(#[from] serde_json::Error),

    /// Not logged in to Azure.
    #[error("Not logged in to Azure (run 'az login'): {0}")]
    Auth(String),

    /// Directory-object access denied.
    #[error("Insufficient directory permissions: {0}")]
    Permission(String),

    /// A refresh cycle is already in flight; the request is a no-op.
    #[error("A refresh is already in progress")]
    RefreshInProgress,

    /// Subprocess-level failure (not found, timeout, IO).
    #[error("Process error: {0}")]
    Process(#[from] ProcessError),

    /// Core error.
    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

// ============================================================================
// Failure Classification
// ============================================================================

/// Stderr fragments that indicate a missing or expired login.
const AUTH_PATTERNS: &[&str] = &[
    "az login",
    "aadsts",
    "interactive authentication is needed",
    "refresh token has expired",
    "no subscription found",
];

/// Stderr fragments that indicate denied directory access.
const PERMISSION_PATTERNS: &[&str] = &[
    "authorization_requestdenied",
    "insufficient privileges",
    "status_code 403",
    "forbidden",
];

/// Classifies a failed az invocation from its stderr.
///
/// Matching is case-insensitive substring containment against the tables
/// above; anything unmatched is a plain [`QueryError::Execution`].
pub fn classify_az_failure(stderr: &str) -> QueryError {
    let lowered = stderr.to_lowercase();
    let summary = summarize_stderr(stderr);

    if AUTH_PATTERNS.iter().any(|p| lowered.contains(p)) {
        return QueryError::Auth(summary);
    }
    if PERMISSION_PATTERNS.iter().any(|p| lowered.contains(p)) {
        return QueryError::Permission(summary);
    }
    QueryError::Execution(summary)
}

/// First non-empty stderr line, truncated for display.
fn summarize_stderr(stderr: &str) -> String {
    const MAX_LEN: usize = 200;

    let line = stderr
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("(no stderr)");

    if line.len() > MAX_LEN {
        let cut = line
            .char_indices()
            .take_while(|(i, _)| *i < MAX_LEN)
            .last()
            .map_or(0, |(i, c)| i + c.len_utf8());
        format!("{}…", &line[..cut])
    } else {
        line.to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================
