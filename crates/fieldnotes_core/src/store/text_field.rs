//! Single-value raw text fields such as the bio.

use crate::storage::KeyValueStore;
use crate::store::debounce::{Debouncer, EDIT_QUIET_PERIOD_MS};
use crate::store::StoreResult;
use log::{debug, warn};

pub const BIO_KEY: &str = "phd_bio";

/// One raw string stored under a fixed key, with debounced saves.
pub struct TextField<'s> {
    kv: &'s dyn KeyValueStore,
    key: &'static str,
    debouncer: Debouncer<()>,
    editable: bool,
}

impl<'s> TextField<'s> {
    pub fn new(kv: &'s dyn KeyValueStore, key: &'static str) -> Self {
        Self {
            kv,
            key,
            debouncer: Debouncer::new(EDIT_QUIET_PERIOD_MS),
            editable: true,
        }
    }

    pub fn set_editable(&mut self, editable: bool) {
        self.editable = editable;
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Saved value, or `None` when absent or unreadable.
    pub fn load(&self) -> Option<String> {
        match self.kv.get(self.key) {
            Ok(value) => value,
            Err(err) => {
                warn!(
                    "event=text_field_load module=store status=error key={} error={}",
                    self.key, err
                );
                None
            }
        }
    }

    pub fn save(&self, value: &str) -> StoreResult<()> {
        self.kv.set(self.key, value)?;
        debug!(
            "event=text_field_save module=store status=ok key={} bytes={}",
            self.key,
            value.len()
        );
        Ok(())
    }

    /// Records an input event; persisted after the quiet period.
    ///
    /// Ignored while the field is locked.
    pub fn input(&mut self, value: impl Into<String>, now_ms: i64) -> bool {
        if !self.editable {
            return false;
        }
        self.debouncer.input((), value, now_ms);
        true
    }

    /// Persists the pending value immediately. Returns whether a write happened.
    pub fn blur(&mut self) -> StoreResult<bool> {
        match self.debouncer.flush(&()) {
            Some(value) => self.save(&value).map(|()| true),
            None => Ok(false),
        }
    }

    /// Persists the pending value if its quiet period elapsed.
    pub fn poll(&mut self, now_ms: i64) -> StoreResult<bool> {
        match self.debouncer.poll(now_ms).pop() {
            Some(((), value)) => self.save(&value).map(|()| true),
            None => Ok(false),
        }
    }
}
