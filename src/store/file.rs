//! Reading and writing the CSV data file. Each function opens the file, reads or writes it
//! completely, and closes it before returning.

use crate::error::{fail, Error, ErrorType, IntoResult, Result};
use crate::model::{Record, Records, Schema};
use anyhow::Context;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::trace;

/// Creates a header-only file at `path` if nothing exists there.
pub(super) fn create_if_missing(path: &Path, schema: &Schema) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    write(path, schema, &Records::default())?;
    Ok(true)
}

/// Reads all records of the file at `path`, which must have `schema` as its header row.
pub(super) fn read(path: &Path, schema: &Schema) -> Result<Records> {
    let file = File::open(path)
        .with_context(|| format!("Unable to open data file {}", path.display()))
        .pub_result(ErrorType::Io)?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(BufReader::new(file));

    let mut rows = reader.records();
    let header: Vec<String> = match rows.next() {
        Some(row) => row
            .map_err(|e| csv_error(e, path))?
            .iter()
            .map(|s| s.to_string())
            .collect(),
        None => fail!(
            ErrorType::Format,
            "The data file {} is empty, it has no header row",
            path.display()
        ),
    };

    if !schema.matches(&header) {
        let found = match Schema::detect(&header) {
            Some(version) => format!("the {version} schema"),
            None => format!("an unknown schema [{}]", header.join(", ")),
        };
        fail!(
            ErrorType::Format,
            "The header of {} does not match the {} schema, it matches {found}",
            path.display(),
            schema.version()
        );
    }

    let len = schema.len();
    let mut records = Vec::new();
    for (row_ix, row) in rows.enumerate() {
        let row = row.map_err(|e| csv_error(e, path))?;
        if row.len() > len {
            fail!(
                ErrorType::Format,
                "A row longer than the headers list was encountered at row {} of {}",
                row_ix + 2,
                path.display()
            );
        }
        let mut values: Vec<String> = row.iter().map(|s| s.to_string()).collect();
        values.resize(len, String::new());
        trace!("Read row {}: {values:?}", row_ix + 2);
        records.push(Record::new(values));
    }
    Ok(Records::new(records))
}

/// Overwrites the file at `path` with the `schema` header row followed by `records`.
pub(super) fn write(path: &Path, schema: &Schema, records: &Records) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Unable to create data file {}", path.display()))
        .pub_result(ErrorType::Io)?;
    let mut writer = csv::Writer::from_writer(BufWriter::new(file));

    writer
        .write_record(schema.headers().iter().map(|h| h.as_ref()))
        .map_err(|e| csv_error(e, path))?;
    for record in records {
        writer
            .write_record(record.values())
            .map_err(|e| csv_error(e, path))?;
    }
    writer
        .flush()
        .with_context(|| format!("Unable to write data file {}", path.display()))
        .pub_result(ErrorType::Io)
}

/// Classifies a `csv` error as either `Io` or `Format`.
fn csv_error(e: csv::Error, path: &Path) -> Error {
    let error_type = match e.kind() {
        csv::ErrorKind::Io(_) => ErrorType::Io,
        _ => ErrorType::Format,
    };
    let context = format!("Unable to process data file {}", path.display());
    Error::new(error_type, anyhow::Error::new(e).context(context))
}
