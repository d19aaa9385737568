//! The record store: the in-memory sequence of records and the CSV file that backs it.
//!
//! The whole file is read once when the store is opened. Every mutation is followed immediately by
//! a full rewrite of the file from memory; there is no incremental persistence. If the rewrite
//! fails, the mutation is undone in memory so that the two never disagree.

mod file;

use crate::error::{fail, ErrorType, Result};
use crate::model::{Record, Records, Schema, SearchScope};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Owns the ordered sequence of records along with the path and schema of its data file.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
    schema: Schema,
    records: Records,
}

impl RecordStore {
    /// Creates a file at `path` containing only the `schema` header row, unless a file already
    /// exists there. An existing file is left alone even if its header differs; that is detected
    /// by `load`.
    pub fn initialize(path: impl AsRef<Path>, schema: &Schema) -> Result<()> {
        let path = path.as_ref();
        if file::create_if_missing(path, schema)? {
            debug!("Created data file {} with the {} schema", path.display(), schema.version());
        }
        Ok(())
    }

    /// Reads every record after the header row of the file at `path`, in file order.
    ///
    /// # Errors
    /// - `Io` if the file is missing or unreadable.
    /// - `Format` if the file is not a valid table, its header is not `schema`, or a row is wider
    ///   than `schema`.
    pub fn load(path: impl AsRef<Path>, schema: &Schema) -> Result<Records> {
        let path = path.as_ref();
        let records = file::read(path, schema)?;
        debug!("Loaded {} records from {}", records.len(), path.display());
        Ok(records)
    }

    /// Overwrites the file at `path` with the `schema` header row followed by `records`.
    pub fn save(path: impl AsRef<Path>, schema: &Schema, records: &Records) -> Result<()> {
        let path = path.as_ref();
        file::write(path, schema, records)?;
        debug!("Saved {} records to {}", records.len(), path.display());
        Ok(())
    }

    /// Initializes the file at `path` if needed and loads it.
    pub fn open(path: impl Into<PathBuf>, schema: Schema) -> Result<Self> {
        let path = path.into();
        Self::initialize(&path, &schema)?;
        let records = Self::load(&path, &schema)?;
        Ok(Self {
            path,
            schema,
            records,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn records(&self) -> &Records {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    /// Like `get`, but an out-of-range `index` is an `Index` error.
    pub fn require(&self, index: usize) -> Result<&Record> {
        match self.records.get(index) {
            Some(record) => Ok(record),
            None => fail!(
                ErrorType::Index,
                "There is no record {index}, there are only {} records",
                self.len()
            ),
        }
    }

    /// Adds `record` at the end, saves, and returns its index.
    pub fn append(&mut self, record: Record) -> Result<usize> {
        self.check_width(&record)?;
        let index = self.records.append(record);
        if let Err(e) = self.persist() {
            let _ = self.records.pop();
            return Err(e);
        }
        Ok(index)
    }

    /// Overwrites the record at `index` in place, saves, and returns the replaced record.
    pub fn replace_at(&mut self, index: usize, record: Record) -> Result<Record> {
        self.check_width(&record)?;
        let old = self.records.replace_at(index, record)?;
        if let Err(e) = self.persist() {
            let _ = self.records.replace_at(index, old);
            return Err(e);
        }
        Ok(old)
    }

    /// Removes the record at `index`, shifting later records down by one, saves, and returns the
    /// removed record.
    pub fn delete_at(&mut self, index: usize) -> Result<Record> {
        let removed = self.records.delete_at(index)?;
        if let Err(e) = self.persist() {
            self.records.insert_at(index, removed);
            return Err(e);
        }
        Ok(removed)
    }

    /// Every record matching `query` within `scope`, paired with its index, in order.
    pub fn filter(&self, query: &str, scope: &SearchScope) -> Vec<(usize, &Record)> {
        self.records.filter(query, scope)
    }

    fn persist(&self) -> Result<()> {
        Self::save(&self.path, &self.schema, &self.records)
    }

    fn check_width(&self, record: &Record) -> Result<()> {
        if record.len() != self.schema.len() {
            fail!(
                ErrorType::Validation,
                "A record must have {} values for the {} schema, but it has {}",
                self.schema.len(),
                self.schema.version(),
                record.len()
            );
        }
        Ok(())
    }
}
