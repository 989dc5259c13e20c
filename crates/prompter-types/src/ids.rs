//! Type-safe identifier wrapper around [`Uuid`].
//!
//! Prompt ids are generated by the broker at submission time and are never
//! reused for the lifetime of the process. Callers only ever see the string
//! form; [`PromptId::parse`] turns it back into an id for lookups.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Unique identifier for a prompt held by the broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PromptId(pub Uuid);

impl PromptId {
    /// Create a new identifier using UUID v7 (time-ordered).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Parse the string form received from a caller or the panel.
    ///
    /// Only the exact form the broker hands out (lowercase, hyphenated)
    /// is accepted. Any other spelling, even of the same UUID, names no
    /// prompt, so callers treat it as unknown.
    pub fn parse(raw: &str) -> Option<Self> {
        let id = Self(Uuid::try_parse(raw).ok()?);
        (id.to_string() == raw).then_some(id)
    }

    /// Return the inner [`Uuid`] value.
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for PromptId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for PromptId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for PromptId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl From<PromptId> for Uuid {
    fn from(id: PromptId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        assert_ne!(PromptId::new(), PromptId::new());
    }

    #[test]
    fn parse_accepts_display_form() {
        let id = PromptId::new();
        assert_eq!(PromptId::parse(&id.to_string()), Some(id));
    }

    #[test]
    fn parse_rejects_other_spellings_of_the_same_uuid() {
        let id = PromptId::new();
        let canonical = id.to_string();
        assert_eq!(PromptId::parse(&canonical.to_uppercase()), None);
        assert_eq!(PromptId::parse(&canonical.replace('-', "")), None);
        assert_eq!(PromptId::parse(&format!("{{{canonical}}}")), None);
        assert_eq!(PromptId::parse(&format!("urn:uuid:{canonical}")), None);
        assert_eq!(PromptId::parse(&format!(" {canonical} ")), None);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(PromptId::parse(""), None);
        assert_eq!(PromptId::parse("not-an-id"), None);
    }
}
