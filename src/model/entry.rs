//! The data-entry form: raw text per field, validated into a `Record`.

use crate::error::{fail, ErrorType, Result};
use crate::model::schema::TOTAL;
use crate::model::{Amount, ColumnKind, Header, Record, Schema};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Values filled in for blank `Date` and `Logged By` fields.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct EntryDefaults {
    today: NaiveDate,
    logged_by: Option<String>,
}

impl EntryDefaults {
    pub fn new(today: NaiveDate, logged_by: Option<String>) -> Self {
        Self { today, logged_by }
    }

    /// Defaults using the local date.
    pub fn today(logged_by: Option<String>) -> Self {
        Self::new(Local::now().date_naive(), logged_by)
    }

    pub fn date(&self) -> NaiveDate {
        self.today
    }

    pub fn logged_by(&self) -> Option<&str> {
        self.logged_by.as_deref()
    }
}

/// The raw, unvalidated contents of the entry form, keyed by header. Fields which were never set
/// are treated as blank.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryForm {
    fields: BTreeMap<Header, String>,
}

impl EntryForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-fills a form from an existing record, the way the form is populated for an edit.
    pub fn from_record(schema: &Schema, record: &Record) -> Self {
        let fields = schema
            .headers()
            .iter()
            .cloned()
            .zip(record.values().iter().cloned())
            .collect();
        Self { fields }
    }

    pub fn set(&mut self, header: impl Into<Header>, value: impl Into<String>) -> &mut Self {
        let _ = self.fields.insert(header.into(), value.into());
        self
    }

    pub fn get(&self, header: impl AsRef<str>) -> &str {
        self.fields
            .get(&Header::from(header.as_ref()))
            .map(|s| s.as_str())
            .unwrap_or_default()
    }

    /// Blanks every field.
    pub fn clear(&mut self) {
        self.fields.clear();
    }

    /// Validates the form against `schema` and builds the record it describes.
    ///
    /// # Errors
    ///
    /// Returns a `Validation` error, and builds nothing, if:
    /// - a field is set that is not part of `schema`,
    /// - a cost field is not numeric (an empty cost is zero),
    /// - the sum of the cost fields is too large to be stored,
    /// - the description is blank.
    pub fn to_record(&self, schema: &Schema, defaults: &EntryDefaults) -> Result<Record> {
        for header in self.fields.keys() {
            let _ = schema.require_index(header)?;
        }

        // Parse cost fields first so that the total can be computed
        let mut costs = BTreeMap::new();
        for ix in schema.all_of(ColumnKind::Cost) {
            let header = &schema.headers()[ix];
            let raw = self.get(header);
            let amount = match Amount::from_str(raw) {
                Ok(amount) => amount,
                Err(e) => fail!(ErrorType::Validation, "{header} must be numeric: {e}"),
            };
            let _ = costs.insert(ix, amount);
        }
        let sum = costs
            .values()
            .try_fold(Amount::ZERO, |sum, cost| sum.checked_add(*cost));
        let total = match sum {
            Some(total) => total,
            None => {
                let header = schema
                    .first_of(ColumnKind::Total)
                    .map(|ix| schema.headers()[ix].to_string())
                    .unwrap_or_else(|| TOTAL.to_string());
                fail!(
                    ErrorType::Validation,
                    "{header} is too large to be stored, the costs add up to more than {}",
                    Amount::MAX
                )
            }
        };

        let mut values = Vec::with_capacity(schema.len());
        for (ix, (header, kind)) in schema.headers().iter().zip(schema.kinds()).enumerate() {
            let raw = self.get(header).trim();
            let value = match kind {
                ColumnKind::Description => {
                    if raw.is_empty() {
                        fail!(ErrorType::Validation, "{header} is required");
                    }
                    raw.to_string()
                }
                ColumnKind::Text | ColumnKind::Reference => raw.to_string(),
                ColumnKind::Cost => costs
                    .get(&ix)
                    .copied()
                    .unwrap_or_default()
                    .to_string(),
                ColumnKind::Total => total.to_string(),
                ColumnKind::Date => {
                    if raw.is_empty() {
                        defaults.date().format("%Y-%m-%d").to_string()
                    } else {
                        raw.to_string()
                    }
                }
                ColumnKind::LoggedBy => {
                    if raw.is_empty() {
                        defaults.logged_by().unwrap_or_default().to_string()
                    } else {
                        raw.to_string()
                    }
                }
            };
            values.push(value);
        }
        Ok(Record::new(values))
    }
}
