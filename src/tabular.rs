use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

/// Read a delimited offering export into candidate rows of nullable cells.
/// Records may have ragged widths; header and footer rows are left for the
/// classifier to reject.
pub fn read_rows(path: &Path) -> Result<Vec<Vec<Option<String>>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    read_all(&mut reader)
}

/// Same reader over an in-memory CSV string (used for the embedded sample).
pub fn rows_from_str(data: &str) -> Result<Vec<Vec<Option<String>>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data.as_bytes());
    read_all(&mut reader)
}

fn read_all<R: Read>(reader: &mut csv::Reader<R>) -> Result<Vec<Vec<Option<String>>>> {
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(|c| Some(c.to_string())).collect());
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_commas_stay_in_one_cell() {
        let rows = rows_from_str("CS5101,\"Fiestas Iquira, Jose Antonio\",resto\n").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), 3);
        assert_eq!(rows[0][1].as_deref(), Some("Fiestas Iquira, Jose Antonio"));
    }

    #[test]
    fn ragged_rows_are_preserved() {
        let rows = rows_from_str("a,b,c\nd,e\n").unwrap();
        assert_eq!(rows[0].len(), 3);
        assert_eq!(rows[1].len(), 2);
    }
}
