//! Keyword denylist for raw SQL
//!
//! This is a coarse substring check, not a SQL parser and not a security
//! boundary. It rejects harmless statements that merely mention a denied
//! word (`SELECT 'updated'`) and misses destructive statements spelled
//! without one (`REPLACE INTO`, `INSERT OR REPLACE`, `PRAGMA writable_schema`).

use crate::data::error::DataError;

/// Substrings rejected in raw SQL unless the caller opts in with `unsafe`
pub const DENIED_KEYWORDS: &[&str] = &["drop", "truncate", "delete", "update", "alter"];

/// First denied keyword found anywhere in the lowercased text
pub fn denied_keyword(sql: &str) -> Option<&'static str> {
    let lowered = sql.to_lowercase();
    DENIED_KEYWORDS
        .iter()
        .copied()
        .find(|keyword| lowered.contains(keyword))
}

pub fn ensure_non_destructive(sql: &str) -> Result<(), DataError> {
    match denied_keyword(sql) {
        Some(keyword) => {
            tracing::warn!(%keyword, "Rejected raw SQL containing denied keyword");
            Err(DataError::unsafe_operation(keyword))
        }
        None => Ok(()),
    }
}
