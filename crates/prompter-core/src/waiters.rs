//! One-shot signals for callers suspended on a prompt's answer.
//!
//! Each waiting caller owns the receiving half of a
//! [`tokio::sync::oneshot`] channel; the broker keeps the sending halves
//! here, grouped by prompt in registration order. Releasing a prompt
//! fulfils its senders front to back and forgets them.

use std::collections::HashMap;

use prompter_types::PromptId;
use tokio::sync::oneshot;

/// Outstanding answer signals, keyed by prompt.
#[derive(Debug, Default)]
pub struct WaiterSet {
    pending: HashMap<PromptId, Vec<oneshot::Sender<String>>>,
}

impl WaiterSet {
    /// Create an empty waiter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new waiter for `id` and return the half it awaits.
    pub fn register(&mut self, id: PromptId) -> oneshot::Receiver<String> {
        let (tx, rx) = oneshot::channel();
        self.pending.entry(id).or_default().push(tx);
        rx
    }

    /// Fulfil every waiter of `id` with `answer`, oldest first.
    ///
    /// Returns how many waiters were still listening. Waiters whose caller
    /// went away (receiver dropped) are skipped without affecting the rest.
    pub fn release(&mut self, id: &PromptId, answer: &str) -> usize {
        let Some(senders) = self.pending.remove(id) else {
            return 0;
        };
        senders
            .into_iter()
            .map(|tx| tx.send(answer.to_owned()).is_ok())
            .filter(|delivered| *delivered)
            .count()
    }

    /// Number of waiters registered for `id`.
    pub fn outstanding(&self, id: &PromptId) -> usize {
        self.pending.get(id).map_or(0, Vec::len)
    }

    /// Drop every outstanding waiter; their receivers observe a closed
    /// channel. Returns how many were dropped.
    pub fn drain_all(&mut self) -> usize {
        self.pending.drain().map(|(_, senders)| senders.len()).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn release_fulfils_every_waiter_with_the_same_answer() {
        let mut waiters = WaiterSet::new();
        let id = PromptId::new();
        let mut receivers: Vec<_> = (0..3).map(|_| waiters.register(id)).collect();
        assert_eq!(waiters.outstanding(&id), 3);

        assert_eq!(waiters.release(&id, "y"), 3);

        for rx in &mut receivers {
            assert_eq!(rx.try_recv().unwrap(), "y");
        }
        assert_eq!(waiters.outstanding(&id), 0);
    }

    #[test]
    fn release_only_touches_the_named_prompt() {
        let mut waiters = WaiterSet::new();
        let answered = PromptId::new();
        let other = PromptId::new();
        let _a = waiters.register(answered);
        let mut b = waiters.register(other);

        waiters.release(&answered, "y");

        assert!(b.try_recv().is_err());
        assert_eq!(waiters.outstanding(&other), 1);
    }

    #[test]
    fn dropped_receivers_do_not_block_the_others() {
        let mut waiters = WaiterSet::new();
        let id = PromptId::new();
        let gone = waiters.register(id);
        let mut kept = waiters.register(id);
        drop(gone);

        assert_eq!(waiters.release(&id, "n"), 1);
        assert_eq!(kept.try_recv().unwrap(), "n");
    }

    #[test]
    fn release_without_waiters_is_a_no_op() {
        let mut waiters = WaiterSet::new();
        assert_eq!(waiters.release(&PromptId::new(), "y"), 0);
    }

    #[test]
    fn drain_closes_every_receiver() {
        let mut waiters = WaiterSet::new();
        let mut rx = waiters.register(PromptId::new());
        let _other = waiters.register(PromptId::new());

        assert_eq!(waiters.drain_all(), 2);
        assert!(matches!(
            rx.try_recv(),
            Err(oneshot::error::TryRecvError::Closed)
        ));
    }
}
