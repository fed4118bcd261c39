use std::sync::LazyLock;

use regex::Regex;

/// Course codes: two letters + four digits, three letters + three digits,
/// or two letters + three digits, tried in that order.
static COURSE_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{2}\d{4}|^[A-Z]{3}\d{3}|^[A-Z]{2}\d{3}").unwrap());

/// Text-fallback lines must start with the two-letter + four-digit form.
static TEXT_LINE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z]{2}\d{4}").unwrap());

static MULTI_SPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}").unwrap());

/// Minimum cells for a candidate row to be considered at all.
const MIN_CANDIDATE_CELLS: usize = 8;

/// Cleaned rows narrower than this never reach the catalog builder.
pub const MIN_ROW_CELLS: usize = 12;

/// A data row has at least 8 cells and a course code in the first cell.
/// Everything else on a page (headers, footers, legends) fails here.
pub fn is_data_row(cells: &[Option<String>]) -> bool {
    if cells.len() < MIN_CANDIDATE_CELLS {
        return false;
    }
    let first = cells.first().and_then(|c| c.as_deref()).unwrap_or("").trim();
    COURSE_CODE_RE.is_match(first)
}

/// Clean a candidate row: missing cells become empty strings, embedded
/// newlines collapse to a single space, every cell is trimmed. Returns
/// `None` when the cleaned row cannot carry the full column schema.
pub fn clean_row(cells: &[Option<String>]) -> Option<Vec<String>> {
    let cleaned: Vec<String> = cells
        .iter()
        .map(|c| c.as_deref().unwrap_or("").replace('\n', " ").trim().to_string())
        .collect();
    if cleaned.len() >= MIN_ROW_CELLS {
        Some(cleaned)
    } else {
        None
    }
}

/// Rebuild candidate rows from plain page text, for pages where no table
/// structure is available. Lossy: lines that do not split into the full
/// column schema are dropped silently.
pub fn rows_from_text(text: &str) -> Vec<Vec<String>> {
    text.lines()
        .filter_map(|line| {
            let line = line.trim();
            if line.is_empty() || !TEXT_LINE_RE.is_match(line) {
                return None;
            }
            split_table_line(line)
        })
        .collect()
}

/// Split on runs of two or more whitespace characters; a single tab is the
/// fallback for extractors that keep tab stops instead of padding.
fn split_table_line(line: &str) -> Option<Vec<String>> {
    let mut parts: Vec<String> = MULTI_SPACE_RE.split(line).map(str::to_string).collect();
    if parts.len() < MIN_ROW_CELLS {
        parts = line.split('\t').map(str::to_string).collect();
    }
    if parts.len() >= MIN_ROW_CELLS {
        Some(parts)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[&str]) -> Vec<Option<String>> {
        values.iter().map(|v| Some(v.to_string())).collect()
    }

    #[test]
    fn course_code_pattern() {
        for code in ["CS5101", "GI5101", "ABC123", "AB123"] {
            assert!(COURSE_CODE_RE.is_match(code), "should accept {}", code);
        }
        for code in ["abc123", "A123", "AB12", "1234", ""] {
            assert!(!COURSE_CODE_RE.is_match(code), "should reject {}", code);
        }
    }

    #[test]
    fn data_row_needs_eight_cells() {
        let short = cells(&["CS5101", "a", "b", "c", "d", "e", "f"]);
        assert!(!is_data_row(&short));

        let enough = cells(&["CS5101", "a", "b", "c", "d", "e", "f", "g"]);
        assert!(is_data_row(&enough));
    }

    #[test]
    fn data_row_needs_course_code() {
        let row = cells(&["Horario", "a", "b", "c", "d", "e", "f", "g"]);
        assert!(!is_data_row(&row));
    }

    #[test]
    fn data_row_first_cell_trimmed() {
        let mut row = cells(&["  CS5101  ", "a", "b", "c", "d", "e", "f", "g"]);
        assert!(is_data_row(&row));
        row[0] = None;
        assert!(!is_data_row(&row));
    }

    #[test]
    fn clean_row_normalizes_cells() {
        let mut raw = cells(&[
            " CS5101 ", "Proyecto\nFinal", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l",
        ]);
        raw[4] = None;
        let cleaned = clean_row(&raw).unwrap();
        assert_eq!(cleaned[0], "CS5101");
        assert_eq!(cleaned[1], "Proyecto Final");
        assert_eq!(cleaned[4], "");
    }

    #[test]
    fn clean_row_rejects_narrow_rows() {
        let raw = cells(&["CS5101", "a", "b", "c", "d", "e", "f", "g", "h", "i", "j"]);
        assert!(clean_row(&raw).is_none());
    }

    #[test]
    fn text_line_splits_on_space_runs() {
        let line = "CS5101  Proyecto Final  Fiestas Iquira, Jose Antonio  CS-2021-1  Obligatorio  Sincronico  1  Teoría Virtual 1.04  Mie. 15:00 - 18:00  Semana General  UTEC-BA Virtual 121  7  0";
        let rows = rows_from_text(line);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), 13);
        assert_eq!(rows[0][0], "CS5101");
        assert_eq!(rows[0][7], "Teoría Virtual 1.04");
    }

    #[test]
    fn text_line_falls_back_to_tabs() {
        let line = "CS5101\tProyecto Final\tFiestas Iquira, Jose Antonio\tCS-2021-1\tObligatorio\tSincronico\t1\tTeoría Virtual 1.04\tMie. 15:00 - 18:00\tSemana General\tUTEC-BA Virtual 121\t7\t0";
        let rows = rows_from_text(line);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), 13);
        assert_eq!(rows[0][8], "Mie. 15:00 - 18:00");
    }

    #[test]
    fn text_lines_without_code_are_dropped() {
        let text = "Oferta Académica 2025-1\n\nPágina 3 de 12\nhorario  general  tabla";
        assert!(rows_from_text(text).is_empty());
    }

    #[test]
    fn narrow_text_lines_are_dropped() {
        let rows = rows_from_text("CS5101  Proyecto Final  solo  cuatro  campos");
        assert!(rows.is_empty());
    }
}
