use crate::error::{Result, TodozError};
use crate::ids::IdAllocator;
use crate::model::{TodoId, TodoRecord};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

/// The whole persisted state: every live record plus the id counter.
///
/// A table is loaded, mutated and saved as one unit inside
/// [`DataStore::transaction`](super::DataStore::transaction), which is what makes
/// "allocate an id and create the record" atomic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TodoTable {
    #[serde(default)]
    next_id: IdAllocator,
    #[serde(default)]
    records: Vec<TodoRecord>,
    #[serde(skip)]
    dirty: bool,
}

impl TodoTable {
    /// Checks a freshly deserialized table and repairs what can be repaired
    /// without losing data: records are put in id order and the counter is
    /// moved past the highest id on file. Duplicate ids mean the file was
    /// edited by hand and cannot be trusted.
    pub fn validated(mut self) -> Result<Self> {
        self.records.sort_by_key(|r| r.id);
        if let Some(pair) = self.records.windows(2).find(|w| w[0].id == w[1].id) {
            return Err(TodozError::StoreUnavailable(format!(
                "corrupt store: id {} appears more than once",
                pair[0].id
            )));
        }
        if let Some(bad) = self
            .records
            .iter()
            .find(|r| r.path.is_empty() || r.text.is_empty())
        {
            return Err(TodozError::StoreUnavailable(format!(
                "corrupt store: record {} has no path or text",
                bad.id
            )));
        }
        if let Some(last) = self.records.last() {
            self.next_id.observe(last.id);
        }
        self.dirty = false;
        Ok(self)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The id the allocator will hand out next.
    pub fn peek_next_id(&self) -> u64 {
        self.next_id.peek()
    }

    /// Reserves an id. It is retired for good even if no record is created with it.
    pub fn next_id(&mut self) -> Result<TodoId> {
        let id = self.next_id.next_id()?;
        self.dirty = true;
        Ok(id)
    }

    /// Makes sure `id` is never handed out, e.g. because a document already
    /// carries it as a tag. Only dirties the table when the counter moves.
    pub fn retire(&mut self, id: TodoId) {
        let before = self.next_id.peek();
        self.next_id.observe(id);
        if self.next_id.peek() != before {
            self.dirty = true;
        }
    }

    pub fn get(&self, id: TodoId) -> Option<&TodoRecord> {
        self.position(id).map(|idx| &self.records[idx])
    }

    pub fn contains(&self, id: TodoId) -> bool {
        self.position(id).is_some()
    }

    /// Always creates a new record with a fresh id.
    pub fn insert(&mut self, path: &str, text: &str, tags: &[String]) -> Result<TodoRecord> {
        if path.is_empty() || text.trim().is_empty() {
            return Err(TodozError::InvalidInput(
                "a todo needs a path and a description".to_string(),
            ));
        }
        let id = self.next_id()?;
        let record = TodoRecord::new(id, path.to_string(), text.to_string(), tags.to_vec());
        debug!(%id, path, text, "inserted todo");
        // Ids only grow, so pushing keeps the records in id order.
        self.records.push(record.clone());
        Ok(record)
    }

    /// Updates text and tags of an existing record. Returns whether anything changed.
    pub fn update(&mut self, id: TodoId, text: &str, tags: &[String]) -> Result<bool> {
        let idx = self.position(id).ok_or(TodozError::NotFound(id))?;
        let record = &mut self.records[idx];
        if !record.differs_from(text, tags) {
            return Ok(false);
        }
        debug!(%id, old = %record.text, new = text, "updated todo");
        record.text = text.to_string();
        record.tags = tags.to_vec();
        record.updated_at = Utc::now();
        self.dirty = true;
        Ok(true)
    }

    /// Idempotent: returns `false` when there was nothing to delete.
    pub fn delete(&mut self, id: TodoId) -> bool {
        match self.position(id) {
            Some(idx) => {
                let removed = self.records.remove(idx);
                debug!(%id, path = %removed.path, "deleted todo");
                self.dirty = true;
                true
            }
            None => false,
        }
    }

    /// Matches an existing record by exact `(path, text)`; when several match the
    /// oldest one wins. Without a match a new record is created.
    pub fn create_or_update(&mut self, path: &str, text: &str, tags: &[String]) -> Result<TodoId> {
        let existing = self
            .records
            .iter()
            .find(|r| r.path == path && r.text == text)
            .map(|r| r.id);

        match existing {
            Some(id) => {
                if let Some(idx) = self.position(id) {
                    let record = &mut self.records[idx];
                    record.tags = tags.to_vec();
                    record.updated_at = Utc::now();
                    self.dirty = true;
                }
                Ok(id)
            }
            None => Ok(self.insert(path, text, tags)?.id),
        }
    }

    pub fn find(&self, path: &str, text: &str) -> Vec<&TodoRecord> {
        self.records
            .iter()
            .filter(|r| r.path == path && r.text == text)
            .collect()
    }

    /// Every record, ordered by path, then creation time, then id.
    pub fn all(&self) -> Vec<TodoRecord> {
        let mut all = self.records.clone();
        all.sort_by(aggregation_order);
        all
    }

    /// Records whose text, tags or path contain every whitespace separated term
    /// (case-insensitive). An empty query matches everything.
    pub fn search(&self, query: &str) -> Vec<TodoRecord> {
        let terms: Vec<String> = query.split_whitespace().map(|t| t.to_lowercase()).collect();
        let mut hits: Vec<TodoRecord> = self
            .records
            .iter()
            .filter(|r| {
                let text = r.text.to_lowercase();
                let path = r.path.to_lowercase();
                terms.iter().all(|term| {
                    text.contains(term.as_str())
                        || path.contains(term.as_str())
                        || r.tags.iter().any(|t| t.to_lowercase().contains(term.as_str()))
                })
            })
            .cloned()
            .collect();
        hits.sort_by(aggregation_order);
        hits
    }

    fn position(&self, id: TodoId) -> Option<usize> {
        self.records.binary_search_by_key(&id, |r| r.id).ok()
    }
}

fn aggregation_order(a: &TodoRecord, b: &TodoRecord) -> Ordering {
    a.path
        .cmp(&b.path)
        .then(a.created_at.cmp(&b.created_at))
        .then(a.id.cmp(&b.id))
}
