use crate::error::{fail, ErrorType, Result};
use crate::model::SearchScope;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::slice::Iter;
use uuid::Uuid;

/// A synthetic identifier assigned to a record when it is created or loaded. It is not persisted;
/// it lets an editing session keep track of a record across index shifts.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// Represents a single row of the data file: one text value per schema column, in schema order.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Record {
    id: RecordId,
    values: Vec<String>,
}

impl Record {
    /// Creates a record with a fresh id.
    pub fn new<S, I>(values: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = S>,
    {
        Self {
            id: RecordId::generate(),
            values: values.into_iter().map(|s| s.into()).collect(),
        }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(|s| s.as_str())
    }

    /// Returns a copy of this record, keeping its id, with the value at `index` replaced.
    pub(crate) fn with_value(&self, index: usize, value: impl Into<String>) -> Result<Self> {
        let mut copy = self.clone();
        match copy.values.get_mut(index) {
            Some(slot) => *slot = value.into(),
            None => fail!(
                ErrorType::Index,
                "Column {index} is out of range for a record with {} values",
                self.len()
            ),
        }
        Ok(copy)
    }

    /// Returns true if the lower-cased `query` appears in the lower-cased text of any column in
    /// `scope`. An empty query always matches.
    ///
    /// Each cell is matched on its own, including for `SearchScope::WholeRow`: a query never
    /// matches text that spans two adjacent cells, unlike a search over the row's joined string.
    pub fn matches(&self, query: &str, scope: &SearchScope) -> bool {
        if query.is_empty() {
            return true;
        }
        let query = query.to_lowercase();
        let hit = |value: &String| value.to_lowercase().contains(&query);
        match scope {
            SearchScope::WholeRow => self.values.iter().any(hit),
            SearchScope::Columns(columns) => columns
                .iter()
                .filter_map(|ix| self.values.get(*ix))
                .any(hit),
        }
    }
}

/// The ordered, in-memory sequence of records. Records are addressed by their position.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Records(Vec<Record>);

impl Records {
    pub fn new(records: Vec<Record>) -> Self {
        Self(records)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.0.get(index)
    }

    pub fn iter(&self) -> Iter<'_, Record> {
        self.0.iter()
    }

    /// The current position of the record with `id`.
    pub fn position(&self, id: RecordId) -> Option<usize> {
        self.0.iter().position(|r| r.id == id)
    }

    /// Adds `record` at the end and returns its index.
    pub fn append(&mut self, record: Record) -> usize {
        self.0.push(record);
        self.0.len() - 1
    }

    /// Overwrites the record at `index`, preserving its position and its id. Returns the record
    /// that was replaced.
    pub fn replace_at(&mut self, index: usize, mut record: Record) -> Result<Record> {
        let len = self.len();
        match self.0.get_mut(index) {
            Some(slot) => {
                record.id = slot.id;
                Ok(std::mem::replace(slot, record))
            }
            None => fail!(
                ErrorType::Index,
                "Cannot replace record {index}, there are only {len} records"
            ),
        }
    }

    /// Removes the record at `index`, shifting later records down by one.
    pub fn delete_at(&mut self, index: usize) -> Result<Record> {
        if index >= self.len() {
            fail!(
                ErrorType::Index,
                "Cannot delete record {index}, there are only {} records",
                self.len()
            );
        }
        Ok(self.0.remove(index))
    }

    /// Puts `record` back at `index`. Used to undo a delete.
    pub(crate) fn insert_at(&mut self, index: usize, record: Record) {
        let index = index.min(self.len());
        self.0.insert(index, record);
    }

    /// Removes the last record. Used to undo an append.
    pub(crate) fn pop(&mut self) -> Option<Record> {
        self.0.pop()
    }

    /// Every record matching `query` within `scope`, paired with its index, in order.
    pub fn filter<'a>(&'a self, query: &str, scope: &SearchScope) -> Vec<(usize, &'a Record)> {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, r)| r.matches(query, scope))
            .collect()
    }
}

impl<'a> IntoIterator for &'a Records {
    type Item = &'a Record;
    type IntoIter = Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<Vec<Record>> for Records {
    fn from(value: Vec<Record>) -> Self {
        Records(value)
    }
}
