//! In-memory prompt registry.
//!
//! Pure data and transition logic, no I/O and no locking of its own; the
//! [`Broker`](crate::Broker) serializes access. A prompt enters the
//! registry pending, moves to answered at most once, and leaves only
//! through [`Registry::clear_answered`].

use std::collections::HashMap;

use chrono::Utc;
use prompter_types::{PromptId, PromptSummary};

/// A stored prompt plus its insertion sequence number.
///
/// The sequence number breaks ties between prompts created within the
/// same clock tick so that listing order stays stable.
#[derive(Debug, Clone)]
struct Entry {
    prompt: PromptSummary,
    seq: u64,
}

/// The set of known prompts, keyed by id.
#[derive(Debug, Default)]
pub struct Registry {
    prompts: HashMap<PromptId, Entry>,
    next_seq: u64,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new pending prompt and return its freshly allocated id.
    pub fn create(&mut self, message: String, options: Option<Vec<String>>) -> PromptId {
        let mut id = PromptId::new();
        while self.prompts.contains_key(&id) {
            id = PromptId::new();
        }

        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);

        self.prompts.insert(
            id,
            Entry {
                prompt: PromptSummary {
                    id,
                    message,
                    options,
                    created_at: Utc::now(),
                    answer: None,
                },
                seq,
            },
        );
        id
    }

    /// Look up a prompt by id.
    pub fn get(&self, id: &PromptId) -> Option<&PromptSummary> {
        self.prompts.get(id).map(|entry| &entry.prompt)
    }

    /// Record the answer of a pending prompt.
    ///
    /// Returns `false` without touching anything if the id is unknown or
    /// the prompt already has an answer: the first writer wins.
    pub fn set_answer(&mut self, id: &PromptId, answer: &str) -> bool {
        match self.prompts.get_mut(id) {
            Some(entry) if entry.prompt.answer.is_none() => {
                entry.prompt.answer = Some(answer.to_owned());
                true
            }
            _ => false,
        }
    }

    /// Remove every answered prompt and return the removed ids.
    ///
    /// Pending prompts are never removed.
    pub fn clear_answered(&mut self) -> Vec<PromptId> {
        let answered: Vec<PromptId> = self
            .prompts
            .iter()
            .filter(|(_, entry)| entry.prompt.answer.is_some())
            .map(|(id, _)| *id)
            .collect();
        for id in &answered {
            self.prompts.remove(id);
        }
        answered
    }

    /// Snapshot of every prompt, oldest first.
    pub fn list_ordered(&self) -> Vec<PromptSummary> {
        let mut entries: Vec<&Entry> = self.prompts.values().collect();
        entries.sort_by(|a, b| {
            a.prompt
                .created_at
                .cmp(&b.prompt.created_at)
                .then(a.seq.cmp(&b.seq))
        });
        entries.into_iter().map(|entry| entry.prompt.clone()).collect()
    }

    /// Number of stored prompts.
    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    /// Whether the registry holds no prompts.
    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn create_stores_pending_prompt() {
        let mut registry = Registry::new();
        let id = registry.create(String::from("Proceed?"), Some(vec![String::from("y")]));

        let prompt = registry.get(&id).unwrap();
        assert_eq!(prompt.id, id);
        assert_eq!(prompt.message, "Proceed?");
        assert_eq!(prompt.options, Some(vec![String::from("y")]));
        assert!(prompt.is_pending());
    }

    #[test]
    fn create_never_reuses_ids() {
        let mut registry = Registry::new();
        let a = registry.create(String::new(), None);
        let b = registry.create(String::new(), None);
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn first_answer_wins() {
        let mut registry = Registry::new();
        let id = registry.create(String::from("q"), None);

        assert!(registry.set_answer(&id, "a"));
        assert!(!registry.set_answer(&id, "b"));
        assert_eq!(registry.get(&id).unwrap().answer.as_deref(), Some("a"));
    }

    #[test]
    fn empty_string_counts_as_an_answer() {
        let mut registry = Registry::new();
        let id = registry.create(String::from("q"), None);

        assert!(registry.set_answer(&id, ""));
        assert!(!registry.set_answer(&id, "later"));
        assert_eq!(registry.get(&id).unwrap().answer.as_deref(), Some(""));
    }

    #[test]
    fn set_answer_on_unknown_id_fails() {
        let mut registry = Registry::new();
        assert!(!registry.set_answer(&PromptId::new(), "a"));
        assert!(registry.is_empty());
    }

    #[test]
    fn clear_answered_keeps_pending_prompts() {
        let mut registry = Registry::new();
        let answered = registry.create(String::from("one"), None);
        let pending = registry.create(String::from("two"), Some(vec![String::from("x")]));
        registry.set_answer(&answered, "done");

        let removed = registry.clear_answered();

        assert_eq!(removed, vec![answered]);
        assert!(registry.get(&answered).is_none());
        let kept = registry.get(&pending).unwrap();
        assert_eq!(kept.message, "two");
        assert!(kept.is_pending());
    }

    #[test]
    fn list_is_ordered_oldest_first() {
        let mut registry = Registry::new();
        let ids: Vec<PromptId> = (0..5)
            .map(|i| registry.create(format!("prompt {i}"), None))
            .collect();

        let listed: Vec<PromptId> = registry.list_ordered().iter().map(|p| p.id).collect();
        assert_eq!(listed, ids);
    }
}
