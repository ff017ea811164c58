//! Generic CRUD store over one persisted collection.
//!
//! # Responsibility
//! - Load/seed/add/update/remove records of one type under one storage key.
//! - Render the collection (or a filtered view) into a sink in order.
//!
//! # Invariants
//! - `load()` never fails: absent or malformed values read as empty.
//! - Rendering never writes to storage.
//! - Ids are unique within the collection and strictly increasing per store.

use crate::clock::Clock;
use crate::model::{Record, RecordId, Searchable};
use crate::render::{PostRenderHook, RenderSink};
use crate::storage::KeyValueStore;
use crate::store::{Confirm, StoreError, StoreResult};
use log::{debug, info, warn};

/// In-memory collection mirrored to one key of the key-value store.
pub struct RecordStore<'s, R: Record> {
    kv: &'s dyn KeyValueStore,
    clock: &'s dyn Clock,
    records: Vec<R>,
    last_issued_id: RecordId,
}

impl<'s, R: Record> RecordStore<'s, R> {
    /// Creates a store and hydrates it from persisted state.
    pub fn open(kv: &'s dyn KeyValueStore, clock: &'s dyn Clock) -> Self {
        let mut store = Self {
            kv,
            clock,
            records: Vec::new(),
            last_issued_id: 0,
        };
        store.hydrate();
        store
    }

    /// Storage key for this collection.
    pub fn key(&self) -> &'static str {
        R::COLLECTION_KEY
    }

    /// Reads and deserializes the persisted collection.
    ///
    /// Absent keys, read failures and malformed JSON all yield an empty
    /// sequence; failures are logged and never surfaced.
    pub fn load(&self) -> Vec<R> {
        let raw = match self.kv.get(R::COLLECTION_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!(
                    "event=collection_load module=store status=error error_code=read_failed key={} error={}",
                    R::COLLECTION_KEY,
                    err
                );
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<R>>(&raw) {
            Ok(records) => records,
            Err(err) => {
                warn!(
                    "event=collection_load module=store status=error error_code=malformed key={} error={}",
                    R::COLLECTION_KEY,
                    err
                );
                Vec::new()
            }
        }
    }

    /// Replaces the in-memory collection with the persisted one.
    pub fn hydrate(&mut self) -> &[R] {
        self.records = self.load();
        debug!(
            "event=collection_hydrate module=store status=ok key={} count={}",
            R::COLLECTION_KEY,
            self.records.len()
        );
        &self.records
    }

    /// Records in insertion order.
    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: RecordId) -> Option<&R> {
        self.records.iter().find(|record| record.id() == id)
    }

    /// Persists `defaults` if this collection was never initialized.
    ///
    /// Returns whether seeding happened. A collection counts as initialized
    /// once it carries the seeded flag or any persisted value, so deleting
    /// every record never brings the sample data back.
    pub fn seed_if_empty(&mut self, defaults: Vec<R>) -> StoreResult<bool> {
        let key = R::COLLECTION_KEY;
        if self.kv.is_seeded(key)? || self.kv.get(key)?.is_some() {
            return Ok(false);
        }

        self.persist(&defaults)?;
        self.kv.mark_seeded(key)?;
        if let Some(max_id) = defaults.iter().map(Record::id).max() {
            self.last_issued_id = self.last_issued_id.max(max_id);
        }
        info!(
            "event=collection_seed module=store status=ok key={} count={}",
            key,
            defaults.len()
        );
        self.records = defaults;
        Ok(true)
    }

    /// Assigns a unique id, appends and persists the whole collection.
    ///
    /// On write failure the record is dropped and prior state kept.
    pub fn add(&mut self, mut record: R) -> StoreResult<RecordId> {
        record.validate()?;
        let id = self.next_id();
        record.set_id(id);
        self.records.push(record);

        if let Err(err) = self.persist(&self.records) {
            self.records.pop();
            return Err(err);
        }

        info!(
            "event=record_add module=store status=ok key={} id={} count={}",
            R::COLLECTION_KEY,
            id,
            self.records.len()
        );
        Ok(id)
    }

    /// Mutates one record in place and persists the whole collection.
    pub fn update<F>(&mut self, id: RecordId, mutator: F) -> StoreResult<()>
    where
        F: FnOnce(&mut R) -> Result<(), crate::model::ValidationError>,
    {
        let index = self.position(id).ok_or(StoreError::NotFound(id))?;
        let previous = self.records[index].clone();

        let outcome = mutator(&mut self.records[index])
            .map_err(StoreError::from)
            .and_then(|()| {
                self.records[index].set_id(id);
                self.persist(&self.records)
            });

        if let Err(err) = outcome {
            self.records[index] = previous;
            return Err(err);
        }

        debug!(
            "event=record_update module=store status=ok key={} id={}",
            R::COLLECTION_KEY,
            id
        );
        Ok(())
    }

    /// Removes one record after explicit confirmation.
    ///
    /// Returns `Ok(false)` when the user declines; nothing changes then.
    pub fn remove(&mut self, id: RecordId, confirm: &mut dyn Confirm) -> StoreResult<bool> {
        let index = self.position(id).ok_or(StoreError::NotFound(id))?;
        let prompt = format!("Delete \"{}\"?", self.records[index].label());
        if !confirm.confirm(&prompt) {
            debug!(
                "event=record_remove module=store status=declined key={} id={}",
                R::COLLECTION_KEY,
                id
            );
            return Ok(false);
        }

        let removed = self.records.remove(index);
        if let Err(err) = self.persist(&self.records) {
            self.records.insert(index, removed);
            return Err(err);
        }

        info!(
            "event=record_remove module=store status=ok key={} id={} count={}",
            R::COLLECTION_KEY,
            id,
            self.records.len()
        );
        Ok(true)
    }

    /// Renders `view` into `sink` in the given order, then runs `hook`.
    ///
    /// Positions passed to the sink are one-based.
    pub fn render(
        &self,
        view: &[R],
        sink: &mut dyn RenderSink<R>,
        hook: &mut dyn PostRenderHook,
    ) {
        sink.clear();
        let total = view.len();
        for (index, record) in view.iter().enumerate() {
            sink.append(index + 1, total, record);
        }
        hook.after_render();
    }

    /// Renders the whole collection.
    pub fn render_all(&self, sink: &mut dyn RenderSink<R>, hook: &mut dyn PostRenderHook) {
        self.render(&self.records, sink, hook);
    }

    fn position(&self, id: RecordId) -> Option<usize> {
        self.records.iter().position(|record| record.id() == id)
    }

    fn next_id(&mut self) -> RecordId {
        let mut candidate = self.clock.now_ms().max(self.last_issued_id + 1);
        while self.records.iter().any(|record| record.id() == candidate) {
            candidate += 1;
        }
        self.last_issued_id = candidate;
        candidate
    }

    fn persist(&self, records: &[R]) -> StoreResult<()> {
        let serialized = serde_json::to_string(records)?;
        self.kv.set(R::COLLECTION_KEY, &serialized)?;
        Ok(())
    }
}

impl<R: Record + Searchable> RecordStore<'_, R> {
    /// Temporary filtered view; a blank query returns every record.
    pub fn filter(&self, query: &str) -> Vec<R> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.records.clone();
        }
        self.records
            .iter()
            .filter(|record| record.matches(&query))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::RecordStore;
    use crate::clock::ManualClock;
    use crate::model::{Paper, Record};
    use crate::storage::MemoryKeyValueStore;

    fn paper(title: &str) -> Paper {
        Paper {
            id: 0,
            title: title.to_string(),
            external_link: "https://arxiv.org".to_string(),
            date_added: 0,
        }
    }

    #[test]
    fn ids_stay_unique_when_clock_does_not_move() {
        let kv = MemoryKeyValueStore::new();
        let clock = ManualClock::new(1_000);
        let mut store = RecordStore::<Paper>::open(&kv, &clock);

        let first = store.add(paper("a")).unwrap();
        let second = store.add(paper("b")).unwrap();
        let third = store.add(paper("c")).unwrap();

        assert_eq!(first, 1_000);
        assert_eq!(second, 1_001);
        assert_eq!(third, 1_002);
        assert!(store.records().iter().all(|record| record.id() >= 1_000));
    }
}
