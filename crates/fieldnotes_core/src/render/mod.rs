//! One-way rendering contracts.
//!
//! Collections render into a `RenderSink`; the sink only ever sees borrowed
//! records. Edits come back as explicit `FieldEdit` events, never by reading
//! rendered output.

use std::cell::RefCell;
use std::rc::Rc;

/// Container a collection is rendered into.
pub trait RenderSink<R> {
    /// Drops every previously rendered fragment.
    fn clear(&mut self);
    /// Appends the fragment for `record`, shown at one-based `position` of `total`.
    fn append(&mut self, position: usize, total: usize, record: &R);
}

/// Opaque hook run after any render that may introduce math markup.
pub trait PostRenderHook {
    fn after_render(&mut self);
}

/// Hook that does nothing, for pages without math markup.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHook;

impl PostRenderHook for NoopHook {
    fn after_render(&mut self) {}
}

/// External chart renderer fed with a labeled numeric series.
pub trait ChartSink {
    fn draw(&mut self, labels: &[String], values: &[f64]);
}

/// Sink that keeps clones of rendered records; useful for tests and previews.
#[derive(Debug, Clone)]
pub struct CollectingSink<R> {
    pub fragments: Vec<R>,
    pub clear_count: usize,
}

impl<R> Default for CollectingSink<R> {
    fn default() -> Self {
        Self {
            fragments: Vec::new(),
            clear_count: 0,
        }
    }
}

impl<R: Clone> RenderSink<R> for CollectingSink<R> {
    fn clear(&mut self) {
        self.fragments.clear();
        self.clear_count += 1;
    }

    fn append(&mut self, _position: usize, _total: usize, record: &R) {
        self.fragments.push(record.clone());
    }
}

impl<R, S: RenderSink<R>> RenderSink<R> for Rc<RefCell<S>> {
    fn clear(&mut self) {
        self.borrow_mut().clear();
    }

    fn append(&mut self, position: usize, total: usize, record: &R) {
        self.borrow_mut().append(position, total, record);
    }
}

/// Hook that counts invocations.
#[derive(Debug, Default, Clone)]
pub struct CountingHook {
    pub calls: Rc<RefCell<usize>>,
}

impl PostRenderHook for CountingHook {
    fn after_render(&mut self) {
        *self.calls.borrow_mut() += 1;
    }
}
