use crate::error::{fail, ErrorType, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub const ITEM_DESCRIPTION: &str = "Item Description";
pub const CATEGORY: &str = "Category";
pub const UNIT: &str = "Unit";
pub const UNIT_COST: &str = "Unit Cost";
pub const MATERIAL: &str = "Material";
pub const LABOR: &str = "Labor";
pub const OTHER: &str = "Other";
pub const TOTAL: &str = "Total";
pub const BRAND: &str = "Brand";
pub const DATE: &str = "Date";
pub const LOGGED_BY: &str = "Logged By";
pub const REFERENCE_FILE: &str = "Reference File";
pub const REMARKS: &str = "Remarks";

/// The known header layouts of the cost data file.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVersion {
    /// A single unit cost, with logged-by and a reference file.
    V1,
    /// Material, labor and other costs with a computed total.
    #[default]
    V2,
    /// `v2` plus logged-by.
    V3,
    /// `v3` plus a reference file.
    V4,
}

serde_plain::derive_display_from_serialize!(SchemaVersion);
serde_plain::derive_fromstr_from_deserialize!(SchemaVersion);

impl SchemaVersion {
    pub const ALL: [SchemaVersion; 4] = [Self::V1, Self::V2, Self::V3, Self::V4];

    fn columns(&self) -> &'static [(&'static str, ColumnKind)] {
        use ColumnKind::*;
        match self {
            SchemaVersion::V1 => &[
                (ITEM_DESCRIPTION, Description),
                (CATEGORY, Text),
                (UNIT, Text),
                (UNIT_COST, Cost),
                (BRAND, Text),
                (DATE, Date),
                (LOGGED_BY, LoggedBy),
                (REFERENCE_FILE, Reference),
                (REMARKS, Text),
            ],
            SchemaVersion::V2 => &[
                (ITEM_DESCRIPTION, Description),
                (CATEGORY, Text),
                (UNIT, Text),
                (MATERIAL, Cost),
                (LABOR, Cost),
                (OTHER, Cost),
                (TOTAL, Total),
                (BRAND, Text),
                (DATE, Date),
                (REMARKS, Text),
            ],
            SchemaVersion::V3 => &[
                (ITEM_DESCRIPTION, Description),
                (CATEGORY, Text),
                (UNIT, Text),
                (MATERIAL, Cost),
                (LABOR, Cost),
                (OTHER, Cost),
                (TOTAL, Total),
                (BRAND, Text),
                (DATE, Date),
                (LOGGED_BY, LoggedBy),
                (REMARKS, Text),
            ],
            SchemaVersion::V4 => &[
                (ITEM_DESCRIPTION, Description),
                (CATEGORY, Text),
                (UNIT, Text),
                (MATERIAL, Cost),
                (LABOR, Cost),
                (OTHER, Cost),
                (TOTAL, Total),
                (BRAND, Text),
                (DATE, Date),
                (LOGGED_BY, LoggedBy),
                (REFERENCE_FILE, Reference),
                (REMARKS, Text),
            ],
        }
    }
}

/// How the values of a column are entered and validated.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// The required, non-blank item description.
    Description,
    /// Free text.
    Text,
    /// A numeric cost input, stored as formatted text.
    Cost,
    /// The sum of the cost columns, computed on entry.
    Total,
    /// A date, defaulting to today.
    Date,
    /// Who logged the entry, defaulting to the configured name.
    LoggedBy,
    /// An optional file-system path to a reference document.
    Reference,
}

serde_plain::derive_display_from_serialize!(ColumnKind);

/// Represents a header in the data file, for example, `Item Description`.
#[derive(Default, Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Header(String);

impl AsRef<str> for Header {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl<S: Into<String>> From<S> for Header {
    fn from(value: S) -> Self {
        Self(value.into())
    }
}

impl FromStr for Header {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(s.into())
    }
}

impl Display for Header {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// The ordered column layout of the data file. The headers are written, exactly, as the first row
/// of the file on every save.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Schema {
    version: SchemaVersion,
    headers: Vec<Header>,
    kinds: Vec<ColumnKind>,
    header_map: HashMap<Header, usize>,
}

impl Schema {
    pub fn new(version: SchemaVersion) -> Self {
        let columns = version.columns();
        let headers: Vec<Header> = columns.iter().map(|(h, _)| Header::from(*h)).collect();
        let kinds = columns.iter().map(|(_, k)| *k).collect();
        let header_map = headers
            .iter()
            .enumerate()
            .map(|(idx, key)| (key.to_owned(), idx))
            .collect();
        Self {
            version,
            headers,
            kinds,
            header_map,
        }
    }

    pub fn version(&self) -> SchemaVersion {
        self.version
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    pub fn kinds(&self) -> &[ColumnKind] {
        &self.kinds
    }

    pub fn kind(&self, index: usize) -> Option<ColumnKind> {
        self.kinds.get(index).copied()
    }

    /// Returns the column index of `header`, if it is part of this schema.
    pub fn index_of(&self, header: impl AsRef<str>) -> Option<usize> {
        self.header_map.get(&Header::from(header.as_ref())).copied()
    }

    /// Like `index_of` but returns a validation error naming the unknown field.
    pub fn require_index(&self, header: impl AsRef<str>) -> Result<usize> {
        let header = header.as_ref();
        match self.index_of(header) {
            Some(ix) => Ok(ix),
            None => fail!(
                ErrorType::Validation,
                "Unknown field '{header}', the {} schema has no such column",
                self.version
            ),
        }
    }

    /// The index of the first column of `kind`.
    pub fn first_of(&self, kind: ColumnKind) -> Option<usize> {
        self.kinds.iter().position(|k| *k == kind)
    }

    /// The indices of every column of `kind`, in schema order.
    pub fn all_of(&self, kind: ColumnKind) -> Vec<usize> {
        self.kinds
            .iter()
            .enumerate()
            .filter(|(_, k)| **k == kind)
            .map(|(ix, _)| ix)
            .collect()
    }

    /// Returns true if `row` is exactly this schema's header row.
    pub fn matches<S: AsRef<str>>(&self, row: &[S]) -> bool {
        row.len() == self.len()
            && row
                .iter()
                .zip(self.headers.iter())
                .all(|(a, b)| a.as_ref() == b.as_ref())
    }

    /// Finds the schema version whose headers exactly match `row`.
    pub fn detect<S: AsRef<str>>(row: &[S]) -> Option<SchemaVersion> {
        SchemaVersion::ALL
            .into_iter()
            .find(|v| Schema::new(*v).matches(row))
    }
}

impl From<SchemaVersion> for Schema {
    fn from(value: SchemaVersion) -> Self {
        Schema::new(value)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_column_counts() {
        assert_eq!(Schema::new(SchemaVersion::V1).len(), 9);
        assert_eq!(Schema::new(SchemaVersion::V2).len(), 10);
        assert_eq!(Schema::new(SchemaVersion::V3).len(), 11);
        assert_eq!(Schema::new(SchemaVersion::V4).len(), 12);
    }

    #[test]
    fn test_headers_are_unique() {
        for v in SchemaVersion::ALL {
            let schema = Schema::new(v);
            assert_eq!(schema.header_map.len(), schema.len(), "{v}");
        }
    }

    #[test]
    fn test_v2_layout() {
        let schema = Schema::new(SchemaVersion::V2);
        let headers: Vec<&str> = schema.headers().iter().map(|h| h.as_ref()).collect();
        assert_eq!(
            headers,
            vec![
                "Item Description",
                "Category",
                "Unit",
                "Material",
                "Labor",
                "Other",
                "Total",
                "Brand",
                "Date",
                "Remarks"
            ]
        );
        assert_eq!(schema.all_of(ColumnKind::Cost), vec![3, 4, 5]);
        assert_eq!(schema.first_of(ColumnKind::Total), Some(6));
        assert_eq!(schema.first_of(ColumnKind::Reference), None);
    }

    #[test]
    fn test_every_version_has_a_description_first() {
        for v in SchemaVersion::ALL {
            assert_eq!(Schema::new(v).kind(0), Some(ColumnKind::Description));
        }
    }

    #[test]
    fn test_index_of() {
        let schema = Schema::new(SchemaVersion::V4);
        assert_eq!(schema.index_of(REFERENCE_FILE), Some(10));
        assert_eq!(schema.index_of("Nope"), None);
        let e = schema.require_index("Nope").unwrap_err();
        assert!(e.is_validation());
        assert!(e.to_string().contains("'Nope'"));
    }

    #[test]
    fn test_detect() {
        let v3 = Schema::new(SchemaVersion::V3);
        assert_eq!(Schema::detect(v3.headers()), Some(SchemaVersion::V3));
        assert_eq!(Schema::detect(&["Item Description", "Category"]), None);
    }

    #[test]
    fn test_matches_is_exact() {
        let schema = Schema::new(SchemaVersion::V2);
        let mut row: Vec<String> = schema.headers().iter().map(|h| h.to_string()).collect();
        assert!(schema.matches(&row));
        row[0] = "item description".to_string();
        assert!(!schema.matches(&row));
    }

    #[test]
    fn test_version_serde() {
        assert_eq!(SchemaVersion::V4.to_string(), "v4");
        assert_eq!("v1".parse::<SchemaVersion>().unwrap(), SchemaVersion::V1);
        assert_eq!(SchemaVersion::default(), SchemaVersion::V2);
    }
}
