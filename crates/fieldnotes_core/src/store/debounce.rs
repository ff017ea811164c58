//! Per-field cancel-and-restart debounce for free-text edits.
//!
//! Each key owns its own deadline: an input event replaces the pending value
//! and restarts that key's quiet period without touching any other key. A
//! blur flushes one key immediately.

use crate::model::RecordId;
use std::collections::BTreeMap;

/// Quiet period before a pending edit is persisted.
pub const EDIT_QUIET_PERIOD_MS: i64 = 1_000;

/// Edit event emitted by an editable region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEdit {
    pub id: RecordId,
    pub field: String,
    pub value: String,
}

impl FieldEdit {
    pub fn new(id: RecordId, field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id,
            field: field.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone)]
struct Pending {
    value: String,
    due_at_ms: i64,
}

/// Deadline table keyed by `K`.
#[derive(Debug, Clone)]
pub struct Debouncer<K: Ord + Clone> {
    quiet_period_ms: i64,
    pending: BTreeMap<K, Pending>,
}

impl<K: Ord + Clone> Default for Debouncer<K> {
    fn default() -> Self {
        Self::new(EDIT_QUIET_PERIOD_MS)
    }
}

impl<K: Ord + Clone> Debouncer<K> {
    pub fn new(quiet_period_ms: i64) -> Self {
        Self {
            quiet_period_ms,
            pending: BTreeMap::new(),
        }
    }

    /// Records an input event, cancelling and restarting the key's timer.
    pub fn input(&mut self, key: K, value: impl Into<String>, now_ms: i64) {
        self.pending.insert(
            key,
            Pending {
                value: value.into(),
                due_at_ms: now_ms + self.quiet_period_ms,
            },
        );
    }

    /// Flushes one key immediately, as on loss of focus.
    pub fn flush(&mut self, key: &K) -> Option<String> {
        self.pending.remove(key).map(|pending| pending.value)
    }

    /// Drains every key whose quiet period has elapsed, earliest first.
    pub fn poll(&mut self, now_ms: i64) -> Vec<(K, String)> {
        let mut due: Vec<(i64, K)> = self
            .pending
            .iter()
            .filter(|(_, pending)| pending.due_at_ms <= now_ms)
            .map(|(key, pending)| (pending.due_at_ms, key.clone()))
            .collect();
        due.sort_by_key(|(due_at_ms, _)| *due_at_ms);

        due.into_iter()
            .filter_map(|(_, key)| {
                self.pending
                    .remove(&key)
                    .map(|pending| (key, pending.value))
            })
            .collect()
    }

    /// Cancels one key without persisting.
    pub fn cancel(&mut self, key: &K) -> bool {
        self.pending.remove(key).is_some()
    }

    /// Earliest pending deadline, if any.
    pub fn next_deadline(&self) -> Option<i64> {
        self.pending.values().map(|pending| pending.due_at_ms).min()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

/// Debouncer keyed by record id and field name.
#[derive(Debug, Clone, Default)]
pub struct EditDebouncer {
    inner: Debouncer<(RecordId, String)>,
}

impl EditDebouncer {
    pub fn new(quiet_period_ms: i64) -> Self {
        Self {
            inner: Debouncer::new(quiet_period_ms),
        }
    }

    pub fn input(&mut self, edit: FieldEdit, now_ms: i64) {
        self.inner.input((edit.id, edit.field), edit.value, now_ms);
    }

    pub fn blur(&mut self, id: RecordId, field: &str) -> Option<FieldEdit> {
        let key = (id, field.to_string());
        self.inner
            .flush(&key)
            .map(|value| FieldEdit::new(id, field, value))
    }

    pub fn poll(&mut self, now_ms: i64) -> Vec<FieldEdit> {
        self.inner
            .poll(now_ms)
            .into_iter()
            .map(|((id, field), value)| FieldEdit { id, field, value })
            .collect()
    }

    /// Drops every pending edit for a record, e.g. after it was deleted.
    pub fn forget_record(&mut self, id: RecordId) {
        self.inner.pending.retain(|(pending_id, _), _| *pending_id != id);
    }

    pub fn next_deadline(&self) -> Option<i64> {
        self.inner.next_deadline()
    }

    pub fn pending_len(&self) -> usize {
        self.inner.pending_len()
    }
}

#[cfg(test)]
mod tests {
    use super::{Debouncer, EditDebouncer, FieldEdit};

    #[test]
    fn rapid_inputs_coalesce_into_last_value() {
        let mut debouncer = EditDebouncer::new(1_000);
        debouncer.input(FieldEdit::new(1, "title", "A"), 0);
        debouncer.input(FieldEdit::new(1, "title", "Ab"), 400);
        debouncer.input(FieldEdit::new(1, "title", "Abc"), 900);

        assert!(debouncer.poll(1_899).is_empty());
        let due = debouncer.poll(1_900);
        assert_eq!(due, vec![FieldEdit::new(1, "title", "Abc")]);
        assert_eq!(debouncer.pending_len(), 0);
    }

    #[test]
    fn fields_do_not_restart_each_other() {
        let mut debouncer = EditDebouncer::new(1_000);
        debouncer.input(FieldEdit::new(1, "title", "T"), 0);
        debouncer.input(FieldEdit::new(1, "content", "C"), 800);

        let due = debouncer.poll(1_000);
        assert_eq!(due, vec![FieldEdit::new(1, "title", "T")]);
        assert_eq!(debouncer.next_deadline(), Some(1_800));
    }

    #[test]
    fn blur_flushes_immediately_and_cancels_timer() {
        let mut debouncer = EditDebouncer::new(1_000);
        debouncer.input(FieldEdit::new(7, "notes", "draft"), 0);

        assert_eq!(
            debouncer.blur(7, "notes"),
            Some(FieldEdit::new(7, "notes", "draft"))
        );
        assert!(debouncer.poll(5_000).is_empty());
        assert_eq!(debouncer.blur(7, "notes"), None);
    }

    #[test]
    fn cancel_drops_pending_value() {
        let mut debouncer: Debouncer<&str> = Debouncer::new(10);
        debouncer.input("bio", "hello", 0);
        assert!(debouncer.cancel(&"bio"));
        assert!(debouncer.poll(100).is_empty());
    }
}
