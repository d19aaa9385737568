//! Types that represent the core data model, such as `Schema`, `Record` and `Amount`.
mod amount;
mod entry;
mod record;
pub mod schema;
mod search;

pub use amount::{Amount, AmountError};
pub use entry::{EntryDefaults, EntryForm};
pub use record::{Record, RecordId, Records};
pub use schema::{ColumnKind, Header, Schema, SchemaVersion};
pub use search::{SearchFields, SearchScope};
