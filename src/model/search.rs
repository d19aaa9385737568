use crate::error::Result;
use crate::model::{Header, Schema, SchemaVersion};
use serde::{Deserialize, Serialize};

/// Which columns a search inspects, as written in `config.json`.
///
/// ```json
/// "search": "whole_row"
/// "search": { "columns": ["Item Description", "Category"] }
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchFields {
    /// Every column of the row.
    WholeRow,
    /// Only the named columns.
    Columns(Vec<Header>),
}

impl SearchFields {
    /// The search behavior each schema version shipped with: the older layouts search the
    /// description and category only, the newer ones search the whole row.
    pub fn default_for(version: SchemaVersion) -> Self {
        match version {
            SchemaVersion::V1 | SchemaVersion::V2 => {
                let schema = Schema::new(version);
                SearchFields::Columns(schema.headers().iter().take(2).cloned().collect())
            }
            SchemaVersion::V3 | SchemaVersion::V4 => SearchFields::WholeRow,
        }
    }

    /// Resolves header names to column indices. Fails if a header is not part of `schema`.
    pub fn resolve(&self, schema: &Schema) -> Result<SearchScope> {
        match self {
            SearchFields::WholeRow => Ok(SearchScope::WholeRow),
            SearchFields::Columns(headers) => headers
                .iter()
                .map(|h| schema.require_index(h))
                .collect::<Result<Vec<usize>>>()
                .map(SearchScope::Columns),
        }
    }
}

/// Which columns a search inspects, resolved against a schema.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum SearchScope {
    WholeRow,
    Columns(Vec<usize>),
}
