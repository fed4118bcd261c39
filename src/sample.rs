use crate::parser::rows;
use crate::tabular;

/// Embedded example offering: one period's worth of row shapes (virtual
/// subsections, grouped theory pairs, laboratory defaults). Used by the
/// `demo` command, as the `run` fallback, and by tests.
const SAMPLE_CSV: &str = include_str!("../tests/fixtures/oferta_ejemplo.csv");

/// Cleaned sample rows, through the same classify/clean path as `import`.
pub fn rows() -> Vec<Vec<String>> {
    let raw = tabular::rows_from_str(SAMPLE_CSV).expect("embedded sample CSV is well-formed");
    raw.iter()
        .filter(|r| rows::is_data_row(r))
        .filter_map(|r| rows::clean_row(r))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_survives_classification_intact() {
        let rows = rows();
        assert_eq!(rows.len(), 13);
        assert!(rows.iter().all(|r| r.len() == 13));
        assert_eq!(rows[0][0], "CS5101");
        assert_eq!(rows[0][7], "Teoría Virtual 1.04");
    }
}
