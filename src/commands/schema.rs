use crate::commands::Out;
use crate::model::{ColumnKind, Header, SchemaVersion};
use crate::{Config, Result};
use serde::{Deserialize, Serialize};

/// The structured output of `schema`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct SchemaInfo {
    pub version: SchemaVersion,
    pub columns: Vec<ColumnInfo>,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub header: Header,
    pub kind: ColumnKind,
}

/// Describes the active schema: its version and, in order, each column's header and kind.
pub async fn schema(config: Config) -> Result<Out<SchemaInfo>> {
    let schema = config.schema();
    let columns: Vec<ColumnInfo> = schema
        .headers()
        .iter()
        .zip(schema.kinds())
        .map(|(header, kind)| ColumnInfo {
            header: header.clone(),
            kind: *kind,
        })
        .collect();

    let mut message = format!(
        "The data file {} uses the {} schema with {} columns:",
        config.data_path().display(),
        schema.version(),
        columns.len()
    );
    for (ix, column) in columns.iter().enumerate() {
        message.push_str(&format!("\n  {ix}: {} ({})", column.header, column.kind));
    }

    let info = SchemaInfo {
        version: schema.version(),
        columns,
    };
    Ok(Out::new(message, info))
}
