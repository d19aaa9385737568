//! costbook: record item cost entries into a single-sheet CSV file.
//!
//! The file's header row is one of a few known schema versions. Records are held in memory by a
//! `store::RecordStore` and the whole file is rewritten after each change. A `session::Session`
//! adds the entry form's behavior on top: validation, edit tracking, search and reference files.

pub mod args;
pub mod commands;
mod config;
mod error;
pub mod model;
pub mod session;
pub mod store;
mod utils;


pub use config::{Config, InitOptions};
pub use error::{Error, ErrorType, Result};
