//! Profile reference resolution.
//!
//! Maps a caller-supplied profile reference (URL or bare numeric ID)
//! to the canonical identifier the review source's query protocol
//! expects: `Teacher-{id}` encoded as standard base64.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

lazy_static! {
    // Legacy profile URLs carry `ShowRatings.jsp?tid=1234567`, newer
    // ones `/professor/1234567`.
    static ref TEACHER_ID: Regex = Regex::new(r"(?:tid=|professor/)(\d+)").unwrap();
}

/// Canonical professor identifier usable as a review-source query key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalId(String);

impl CanonicalId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CanonicalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolve a profile reference to the canonical identifier.
///
/// Returns `None` when no numeric ID can be extracted; callers must
/// treat that as "cannot fetch", not as an empty review set. Pure and
/// deterministic: the same reference always yields the same ID.
pub fn resolve(reference: &str) -> Option<CanonicalId> {
    let numeric_id = extract_numeric_id(reference)?;
    let encoded = BASE64.encode(format!("Teacher-{}", numeric_id));
    debug!(reference = %reference, id = %numeric_id, encoded = %encoded, "Resolved profile reference");
    Some(CanonicalId(encoded))
}

fn extract_numeric_id(reference: &str) -> Option<&str> {
    let trimmed = reference.trim();
    if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        // Bare numeric ID supplied directly.
        return Some(trimmed);
    }
    TEACHER_ID
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolves_new_style_url() {
        let id = resolve("https://www.ratemyprofessors.com/professor/12345").unwrap();
        // base64("Teacher-12345")
        assert_eq!(id.as_str(), "VGVhY2hlci0xMjM0NQ==");
    }

    #[test]
    fn test_resolves_legacy_tid_url() {
        let id = resolve("https://www.ratemyprofessors.com/ShowRatings.jsp?tid=12345").unwrap();
        assert_eq!(id.as_str(), "VGVhY2hlci0xMjM0NQ==");
    }

    #[test]
    fn test_resolves_bare_numeric_id() {
        let id = resolve("12345").unwrap();
        assert_eq!(id.as_str(), "VGVhY2hlci0xMjM0NQ==");
    }

    #[test]
    fn test_idempotent() {
        let reference = "https://www.ratemyprofessors.com/professor/987654";
        assert_eq!(resolve(reference), resolve(reference));
    }

    #[test]
    fn test_unresolvable_references() {
        assert_eq!(resolve("https://www.ratemyprofessors.com/school/675"), None);
        assert_eq!(resolve("not a url"), None);
        assert_eq!(resolve(""), None);
    }

    #[test]
    fn test_trailing_path_ignored() {
        let id = resolve("https://www.ratemyprofessors.com/professor/42?utm=x").unwrap();
        assert_eq!(id.as_str(), BASE64.encode("Teacher-42"));
    }
}
