//! "2-minute reads" carousel.
//!
//! # Invariants
//! - Navigation clamps at both ends; there is no wraparound.
//! - Every render, slide switch or add restarts the dwell deadline.
//! - Auto-advance only happens when a next slide exists.
//! - Slide edits share the collection debounce and error reporting.

use crate::clock::Clock;
use crate::model::{Read, RecordId};
use crate::notify::NotificationCenter;
use crate::render::{PostRenderHook, RenderSink};
use crate::service::collection_service::CollectionService;
use crate::storage::KeyValueStore;
use crate::store::debounce::FieldEdit;
use crate::store::StoreResult;
use log::debug;

/// Time a slide stays shown before auto-advancing.
pub const DWELL_MS: i64 = 2 * 60 * 1_000;

pub struct Carousel<'s> {
    reads: CollectionService<'s, Read>,
    clock: &'s dyn Clock,
    index: usize,
    dwell_deadline_ms: i64,
}

impl<'s> Carousel<'s> {
    pub fn open(kv: &'s dyn KeyValueStore, clock: &'s dyn Clock) -> Self {
        Self {
            reads: CollectionService::open(kv, clock),
            clock,
            index: 0,
            dwell_deadline_ms: clock.now_ms() + DWELL_MS,
        }
    }

    /// Seeds the single welcome read on first initialization.
    pub fn seed_if_empty(&mut self, defaults: Vec<Read>) -> StoreResult<bool> {
        let seeded = self.reads.seed(defaults)?;
        if seeded {
            self.show(0);
        }
        Ok(seeded)
    }

    pub fn reads(&self) -> &[Read] {
        self.reads.records()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&Read> {
        self.reads.records().get(self.index)
    }

    pub fn can_prev(&self) -> bool {
        self.index > 0
    }

    pub fn can_next(&self) -> bool {
        self.index + 1 < self.reads().len()
    }

    pub fn dwell_deadline_ms(&self) -> i64 {
        self.dwell_deadline_ms
    }

    /// Moves forward one slide; no-op at the last slide.
    pub fn next(&mut self) -> bool {
        if !self.can_next() {
            return false;
        }
        self.show(self.index + 1);
        true
    }

    /// Moves back one slide; no-op at the first slide.
    pub fn prev(&mut self) -> bool {
        if !self.can_prev() {
            return false;
        }
        self.show(self.index - 1);
        true
    }

    /// Appends a read and jumps to it. Failures notify and leave the slides as they were.
    pub fn add(&mut self, read: Read, notices: &mut NotificationCenter) -> Option<RecordId> {
        let id = self.reads.submit(read, notices)?;
        self.show(self.reads().len() - 1);
        Some(id)
    }

    /// Slide edits are ignored while locked.
    pub fn set_editable(&mut self, editable: bool) {
        self.reads.set_editable(editable);
    }

    pub fn is_editable(&self) -> bool {
        self.reads.is_editable()
    }

    /// Records an input event on a slide's title or content.
    pub fn input(&mut self, edit: FieldEdit) -> bool {
        self.reads.input(edit)
    }

    /// Persists a slide's pending edit immediately.
    pub fn blur(&mut self, id: RecordId, field: &str, notices: &mut NotificationCenter) -> bool {
        self.reads.blur(id, field, notices)
    }

    /// Persists slide edits whose quiet period elapsed.
    pub fn flush_due(&mut self, notices: &mut NotificationCenter) -> usize {
        self.reads.flush_due(notices)
    }

    pub fn pending_edits(&self) -> usize {
        self.reads.pending_edits()
    }

    /// Renders every slide and restarts the dwell deadline.
    pub fn render(&mut self, sink: &mut dyn RenderSink<Read>, hook: &mut dyn PostRenderHook) {
        self.reads.store().render_all(sink, hook);
        self.dwell_deadline_ms = self.clock.now_ms() + DWELL_MS;
    }

    /// Advances when the dwell time elapsed. Returns whether it advanced.
    pub fn poll(&mut self) -> bool {
        if self.clock.now_ms() < self.dwell_deadline_ms {
            return false;
        }
        if self.can_next() {
            debug!(
                "event=carousel_advance module=carousel status=ok from={} to={}",
                self.index,
                self.index + 1
            );
            self.show(self.index + 1);
            return true;
        }
        false
    }

    /// Re-renders the current slide and restarts its dwell deadline.
    pub fn show(&mut self, index: usize) {
        self.index = index.min(self.reads().len().saturating_sub(1));
        self.dwell_deadline_ms = self.clock.now_ms() + DWELL_MS;
    }
}
