//! List command handler.

use crate::args::ListArgs;
use crate::commands::Out;
use crate::model::Header;
use crate::{Config, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// The structured output of `list`.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub headers: Vec<Header>,
    pub rows: Vec<ListingRow>,
}

/// One matching entry along with its position in the data file.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ListingRow {
    pub index: usize,
    pub values: Vec<String>,
}

/// Lists the entries matching the query, or all of them when the query is blank. The message is
/// a table with the index of each entry in the first column.
pub async fn list(config: Config, args: ListArgs) -> Result<Out<Listing>> {
    let session = config.session()?;
    let headers = session.store().schema().headers().to_vec();
    let rows: Vec<ListingRow> = session
        .search(args.query())
        .into_iter()
        .map(|(index, record)| ListingRow {
            index,
            values: record.values().to_vec(),
        })
        .collect();

    let total = session.store().len();
    let summary = if args.query().trim().is_empty() {
        format!("{} entr{}", total, if total == 1 { "y" } else { "ies" })
    } else {
        format!(
            "{} of {} entr{} matched '{}'",
            rows.len(),
            total,
            if total == 1 { "y" } else { "ies" },
            args.query()
        )
    };

    let listing = Listing { headers, rows };
    let message = if listing.rows.is_empty() {
        summary
    } else {
        format!("{}\n{summary}", render(&listing))
    };
    Ok(Out::new(message, listing))
}

/// Renders `listing` as a left-aligned text table.
fn render(listing: &Listing) -> String {
    let mut columns: Vec<String> = vec!["#".to_string()];
    columns.extend(listing.headers.iter().map(|h| h.to_string()));

    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
    for row in &listing.rows {
        widths[0] = widths[0].max(row.index.to_string().len());
        for (ix, value) in row.values.iter().enumerate() {
            if let Some(w) = widths.get_mut(ix + 1) {
                *w = (*w).max(value.chars().count());
            }
        }
    }

    let mut out = String::new();
    write_line(&mut out, columns.iter().map(String::as_str), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    write_line(&mut out, rule.iter().map(String::as_str), &widths);
    for row in &listing.rows {
        let index = row.index.to_string();
        let cells = std::iter::once(index.as_str()).chain(row.values.iter().map(String::as_str));
        write_line(&mut out, cells, &widths);
    }
    out
}

fn write_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line: Vec<String> = cells
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    let _ = writeln!(out, "{}", line.join(" | ").trim_end());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_list_all() {
        let env = TestEnv::new().await;
        env.insert_test_entries(&["Steel Beam", "Cement", "Rebar"]);

        let out = list(env.config(), ListArgs::default()).await.unwrap();
        let listing = out.structure().unwrap();
        assert_eq!(listing.rows.len(), 3);
        assert_eq!(listing.rows[2].index, 2);
        assert_eq!(listing.rows[2].values[0], "Rebar");
        assert_eq!(listing.headers.len(), 10);
        assert!(out.message().contains("3 entries"));
        assert!(out.message().starts_with("# | Item Description"));
    }

    #[tokio::test]
    async fn test_list_query_keeps_original_index() {
        let env = TestEnv::new().await;
        env.insert_test_entries(&["Steel Beam", "Cement", "steel plate"]);

        let args = ListArgs::new(Some("STEEL".to_string()));
        let out = list(env.config(), args).await.unwrap();
        let indices: Vec<usize> = out
            .structure()
            .unwrap()
            .rows
            .iter()
            .map(|r| r.index)
            .collect();
        assert_eq!(indices, vec![0, 2]);
        assert!(out.message().contains("2 of 3 entries matched 'STEEL'"));
    }

    #[tokio::test]
    async fn test_list_empty() {
        let env = TestEnv::new().await;
        let out = list(env.config(), ListArgs::default()).await.unwrap();
        assert_eq!(out.message(), "0 entries");
        assert!(out.structure().unwrap().rows.is_empty());
    }

    #[test]
    fn test_render_pads_columns() {
        let listing = Listing {
            headers: vec![Header::from("Item"), Header::from("Cost")],
            rows: vec![
                ListingRow {
                    index: 0,
                    values: vec!["Steel Beam".into(), "1,234.50".into()],
                },
                ListingRow {
                    index: 10,
                    values: vec!["Nail".into(), "".into()],
                },
            ],
        };
        let table = render(&listing);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "#  | Item       | Cost");
        assert_eq!(lines[1], "-- | ---------- | --------");
        assert_eq!(lines[2], "0  | Steel Beam | 1,234.50");
        assert_eq!(lines[3], "10 | Nail       |");
    }
}
