//! Collection use-case service.
//!
//! # Responsibility
//! - Apply the user-facing error taxonomy on top of `RecordStore`.
//! - Route debounced field edits into store updates.
//! - Re-render the attached container after every successful mutation.
//!
//! # Invariants
//! - Missing required input never creates a record.
//! - Storage failures never change persisted state; they only notify.
//! - A locked collection ignores field input and refuses deletes.

use crate::clock::Clock;
use crate::model::{EditableRecord, Record, RecordId, Searchable, ValidationError};
use crate::notify::NotificationCenter;
use crate::render::{NoopHook, PostRenderHook, RenderSink};
use crate::storage::KeyValueStore;
use crate::store::debounce::{EditDebouncer, FieldEdit};
use crate::store::record_store::RecordStore;
use crate::store::{Confirm, StoreError, StoreResult};
use log::{debug, warn};

/// Shown when a locked region is asked to change.
pub const EDIT_MODE_OFF_MESSAGE: &str = "Turn on edit mode to change this.";

struct Attachment<'s, R> {
    sink: Box<dyn RenderSink<R> + 's>,
    hook: Box<dyn PostRenderHook + 's>,
}

/// One collection plus its edit debouncer and render target.
pub struct CollectionService<'s, R: Record> {
    store: RecordStore<'s, R>,
    edits: EditDebouncer,
    clock: &'s dyn Clock,
    attachment: Option<Attachment<'s, R>>,
    editable: bool,
}

impl<'s, R: Record> CollectionService<'s, R> {
    pub fn open(kv: &'s dyn KeyValueStore, clock: &'s dyn Clock) -> Self {
        Self {
            store: RecordStore::open(kv, clock),
            edits: EditDebouncer::default(),
            clock,
            attachment: None,
            editable: true,
        }
    }

    /// Unlocks or locks field edits and deletes. Pending edits are kept.
    pub fn set_editable(&mut self, editable: bool) {
        self.editable = editable;
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    pub fn store(&self) -> &RecordStore<'s, R> {
        &self.store
    }

    pub fn records(&self) -> &[R] {
        self.store.records()
    }

    /// Attaches the container re-rendered after each mutation and renders once.
    pub fn attach(
        &mut self,
        sink: Box<dyn RenderSink<R> + 's>,
        hook: Option<Box<dyn PostRenderHook + 's>>,
    ) {
        self.attachment = Some(Attachment {
            sink,
            hook: hook.unwrap_or_else(|| Box::new(NoopHook)),
        });
        self.rerender();
    }

    /// Renders an arbitrary view (e.g. a filter result) into the attached container.
    pub fn render_view(&mut self, view: &[R]) {
        if let Some(attachment) = self.attachment.as_mut() {
            self.store
                .render(view, attachment.sink.as_mut(), attachment.hook.as_mut());
        }
    }

    pub fn rerender(&mut self) {
        if let Some(attachment) = self.attachment.as_mut() {
            self.store
                .render_all(attachment.sink.as_mut(), attachment.hook.as_mut());
        }
    }

    pub fn seed(&mut self, defaults: Vec<R>) -> StoreResult<bool> {
        let seeded = self.store.seed_if_empty(defaults)?;
        if seeded {
            self.rerender();
        }
        Ok(seeded)
    }

    /// Adds a record from form input. Returns the new id on success.
    pub fn submit(&mut self, record: R, notices: &mut NotificationCenter) -> Option<RecordId> {
        let now_ms = self.clock.now_ms();
        match self.store.add(record) {
            Ok(id) => {
                self.rerender();
                notices.success("Entry added.", now_ms);
                Some(id)
            }
            Err(err) => {
                report(R::COLLECTION_KEY, "add", &err, notices, now_ms);
                None
            }
        }
    }

    /// Applies a mutator and persists; failures notify and roll back.
    pub fn update<F>(
        &mut self,
        id: RecordId,
        mutator: F,
        notices: &mut NotificationCenter,
    ) -> bool
    where
        F: FnOnce(&mut R) -> Result<(), ValidationError>,
    {
        match self.store.update(id, mutator) {
            Ok(()) => {
                self.rerender();
                true
            }
            Err(err) => {
                report(R::COLLECTION_KEY, "update", &err, notices, self.clock.now_ms());
                false
            }
        }
    }

    /// Deletes after confirmation. Returns whether the record was removed.
    pub fn delete(
        &mut self,
        id: RecordId,
        confirm: &mut dyn Confirm,
        notices: &mut NotificationCenter,
    ) -> bool {
        let now_ms = self.clock.now_ms();
        if !self.editable {
            notices.info(EDIT_MODE_OFF_MESSAGE, now_ms);
            return false;
        }
        match self.store.remove(id, confirm) {
            Ok(true) => {
                self.edits.forget_record(id);
                self.rerender();
                notices.success("Entry deleted.", now_ms);
                true
            }
            Ok(false) => false,
            Err(err) => {
                report(R::COLLECTION_KEY, "delete", &err, notices, now_ms);
                false
            }
        }
    }
}

impl<R: EditableRecord> CollectionService<'_, R> {
    /// Records an input event on an editable region. Returns `false` when locked.
    pub fn input(&mut self, edit: FieldEdit) -> bool {
        if !self.editable {
            debug!(
                "event=collection_input module=service status=locked key={} id={} field={}",
                R::COLLECTION_KEY,
                edit.id,
                edit.field
            );
            return false;
        }
        self.edits.input(edit, self.clock.now_ms());
        true
    }

    /// Persists a region's pending edit immediately (loss of focus).
    pub fn blur(&mut self, id: RecordId, field: &str, notices: &mut NotificationCenter) -> bool {
        match self.edits.blur(id, field) {
            Some(edit) => self.apply(edit, notices),
            None => false,
        }
    }

    /// Persists every edit whose quiet period elapsed. Returns how many applied.
    pub fn flush_due(&mut self, notices: &mut NotificationCenter) -> usize {
        let mut applied = 0;
        for edit in self.edits.poll(self.clock.now_ms()) {
            if self.apply(edit, notices) {
                applied += 1;
            }
        }
        applied
    }

    pub fn pending_edits(&self) -> usize {
        self.edits.pending_len()
    }

    fn apply(&mut self, edit: FieldEdit, notices: &mut NotificationCenter) -> bool {
        let FieldEdit { id, field, value } = edit;
        self.update(id, |record| record.apply_edit(&field, &value), notices)
    }
}

impl<R: Record + Searchable> CollectionService<'_, R> {
    /// Renders the filtered view without touching persisted order.
    pub fn search(&mut self, query: &str) -> Vec<R> {
        let view = self.store.filter(query);
        self.render_view(&view);
        view
    }
}

fn report(
    collection: &str,
    action: &str,
    err: &StoreError,
    notices: &mut NotificationCenter,
    now_ms: i64,
) {
    warn!(
        "event=collection_{action} module=service status=error key={} error={}",
        collection, err
    );
    let message = match err {
        StoreError::Validation(ValidationError::MissingField { field, .. }) => {
            format!("Please fill in the {field} field.")
        }
        StoreError::Validation(other) => other.to_string(),
        StoreError::Storage(storage) => format!("Could not save changes: {storage}"),
        StoreError::NotFound(_) => "That entry no longer exists.".to_string(),
        StoreError::Serialize(serialize) => format!("Could not save changes: {serialize}"),
    };
    notices.error(message, now_ms);
}
