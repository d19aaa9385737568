//! The editing session: what the entry form does with the record store.
//!
//! A `Session` owns the `RecordStore` and remembers which record, if any, is being edited. The
//! edited record is tracked by its `RecordId` rather than by index, so a record that disappears
//! between `begin_edit` and `submit` results in an `Index` error instead of overwriting whatever
//! record moved into its position.

use crate::error::{fail, ErrorType, Result};
use crate::model::{ColumnKind, EntryDefaults, EntryForm, Record, RecordId, SearchScope};
use crate::store::RecordStore;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// The outcome of `Session::submit`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Submitted {
    /// A new record was added at this index.
    Appended(usize),
    /// The edited record at this index was overwritten.
    Replaced(usize),
}

impl Submitted {
    pub fn index(&self) -> usize {
        match self {
            Submitted::Appended(ix) | Submitted::Replaced(ix) => *ix,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    store: RecordStore,
    scope: SearchScope,
    defaults: EntryDefaults,
    editing: Option<RecordId>,
}

impl Session {
    pub fn new(store: RecordStore, scope: SearchScope, defaults: EntryDefaults) -> Self {
        Self {
            store,
            scope,
            defaults,
            editing: None,
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn scope(&self) -> &SearchScope {
        &self.scope
    }

    /// The id of the record being edited, if any.
    pub fn editing(&self) -> Option<RecordId> {
        self.editing
    }

    /// Marks the record at `index` as being edited and returns a form pre-filled from it.
    pub fn begin_edit(&mut self, index: usize) -> Result<EntryForm> {
        let record = self.store.require(index)?;
        let form = EntryForm::from_record(self.store.schema(), record);
        self.editing = Some(record.id());
        Ok(form)
    }

    /// Forgets the record being edited, so that the next `submit` appends.
    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Validates `form` and either replaces the record being edited or appends a new one. Nothing
    /// is changed if validation fails.
    pub fn submit(&mut self, form: &EntryForm) -> Result<Submitted> {
        let record = form.to_record(self.store.schema(), &self.defaults)?;
        match self.editing {
            Some(id) => {
                let index = match self.store.records().position(id) {
                    Some(ix) => ix,
                    None => {
                        self.editing = None;
                        fail!(ErrorType::Index, "The record being edited no longer exists")
                    }
                };
                let _ = self.store.replace_at(index, record)?;
                self.editing = None;
                debug!("Replaced record {index}");
                Ok(Submitted::Replaced(index))
            }
            None => {
                let index = self.store.append(record)?;
                debug!("Appended record {index}");
                Ok(Submitted::Appended(index))
            }
        }
    }

    /// Deletes the record at `index`. If it was being edited, the edit is cancelled.
    pub fn delete(&mut self, index: usize) -> Result<Record> {
        let removed = self.store.delete_at(index)?;
        if self.editing == Some(removed.id()) {
            self.editing = None;
        }
        Ok(removed)
    }

    /// The records matching `query` within the configured search scope, with their indices.
    pub fn search(&self, query: &str) -> Vec<(usize, &Record)> {
        self.store.filter(query, &self.scope)
    }

    /// The reference file path of the record at `index`, or `None` if it is blank.
    pub fn reference(&self, index: usize) -> Result<Option<PathBuf>> {
        let column = self.reference_column()?;
        let record = self.store.require(index)?;
        Ok(record
            .get(column)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(PathBuf::from))
    }

    /// Stores `path` in the reference column of the record at `index`.
    pub fn set_reference(&mut self, index: usize, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            warn!("The reference file {} does not exist", path.display());
        }
        self.write_reference(index, path.to_string_lossy().to_string())
    }

    /// Blanks the reference column of the record at `index`.
    pub fn clear_reference(&mut self, index: usize) -> Result<()> {
        self.write_reference(index, String::new())
    }

    fn write_reference(&mut self, index: usize, value: String) -> Result<()> {
        let column = self.reference_column()?;
        let record = self.store.require(index)?.with_value(column, value)?;
        let _ = self.store.replace_at(index, record)?;
        Ok(())
    }

    fn reference_column(&self) -> Result<usize> {
        let schema = self.store.schema();
        match schema.first_of(ColumnKind::Reference) {
            Some(ix) => Ok(ix),
            None => fail!(
                ErrorType::Validation,
                "The {} schema has no reference file column",
                schema.version()
            ),
        }
    }
}
