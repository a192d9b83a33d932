// ============================================================
// Layer 4 - CSV Loader / Writer
// ============================================================
// Reads a CSV file with a header row into a `Table` and writes
// a `Table` back out.
//
// Column kinds are inferred per column:
//   - every non-empty cell parses as f64 → Numeric (empty → NaN)
//   - anything else                      → Text
//
// Headers and cells go through the Preprocessor first, so stray
// whitespace or a BOM in the header never changes a column name.
//
// Reference: csv crate documentation
//            Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::data::preprocessor::Preprocessor;
use crate::domain::table::{Column, Table};
use crate::domain::traits::DatasetSource;

/// Loads one CSV file. Implements the DatasetSource trait.
pub struct CsvLoader {
    path: PathBuf,
}

impl CsvLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DatasetSource for CsvLoader {
    fn load(&self) -> Result<Table> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)
            .with_context(|| format!("Cannot open CSV '{}'", self.path.display()))?;
        let pre = Preprocessor::new();

        let headers: Vec<String> = reader
            .headers()
            .with_context(|| format!("Cannot read header of '{}'", self.path.display()))?
            .iter()
            .map(|h| pre.clean(h))
            .collect();

        let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
        let mut short_rows = 0usize;

        for (i, record) in reader.records().enumerate() {
            let record = record
                .with_context(|| format!("Bad record {} in '{}'", i + 1, self.path.display()))?;
            if record.len() < headers.len() {
                short_rows += 1;
            }
            for (j, column) in cells.iter_mut().enumerate() {
                column.push(record.get(j).map(|c| pre.clean(c)).unwrap_or_default());
            }
        }

        if short_rows > 0 {
            tracing::warn!(
                "'{}': {} rows had fewer fields than the header; padded with empty cells",
                self.path.display(),
                short_rows
            );
        }

        let mut table = Table::new();
        for (name, raw) in headers.into_iter().zip(cells) {
            table
                .push_column(name, infer_column(raw))
                .with_context(|| format!("Bad header in '{}'", self.path.display()))?;
        }

        tracing::debug!(
            "Loaded '{}' ({} rows, {} columns)",
            self.path.display(),
            table.n_rows(),
            table.n_cols()
        );
        Ok(table)
    }
}

/// Numeric if every non-empty cell parses, text otherwise.
/// An all-empty column is treated as numeric (all NaN).
pub fn infer_column(raw: Vec<String>) -> Column {
    let numeric: Option<Vec<f64>> = raw
        .iter()
        .map(|c| if c.is_empty() { Some(f64::NAN) } else { c.parse::<f64>().ok() })
        .collect();
    match numeric {
        Some(values) => Column::Numeric(values),
        None         => Column::Text(raw),
    }
}

/// Write `table` as CSV with a header row, creating parent directories.
pub fn write_csv(table: &Table, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create '{}'", parent.display()))?;
    }

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Cannot write CSV '{}'", path.display()))?;
    writer.write_record(table.column_names())?;

    let columns: Vec<&Column> = table
        .column_names()
        .iter()
        .filter_map(|n| table.column(n))
        .collect();
    for row in 0..table.n_rows() {
        writer.write_record(columns.iter().map(|c| c.cell_string(row)))?;
    }
    writer.flush()?;

    tracing::debug!("Wrote {} rows to '{}'", table.n_rows(), path.display());
    Ok(())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_infer_column_kinds() {
        let c = infer_column(vec!["1".into(), "".into(), "2.5".into()]);
        let v = c.as_numeric().unwrap();
        assert_eq!(v[0], 1.0);
        assert!(v[1].is_nan());

        let c = infer_column(vec!["1".into(), "kg".into()]);
        assert!(c.as_text().is_some());
    }

    #[test]
    fn test_load_and_write_roundtrip() {
        let dir  = TempDir::new().unwrap();
        let path = dir.path().join("in.csv");
        std::fs::write(&path, "\u{FEFF}Date , Weight\n2020-01-01,100\n2020-01-02,\n").unwrap();

        let table = CsvLoader::new(&path).load().unwrap();
        assert_eq!(table.column_names(), &["Date".to_string(), "Weight".to_string()]);
        assert_eq!(table.n_rows(), 2);
        assert!(table.column("Weight").unwrap().as_numeric().unwrap()[1].is_nan());

        let out = dir.path().join("nested/out.csv");
        write_csv(&table, &out).unwrap();
        let text = std::fs::read_to_string(&out).unwrap();
        assert_eq!(text, "Date,Weight\n2020-01-01,100\n2020-01-02,\n");
    }

    #[test]
    fn test_short_rows_padded() {
        let dir  = TempDir::new().unwrap();
        let path = dir.path().join("short.csv");
        std::fs::write(&path, "a,b\n1\n2,3\n").unwrap();

        let table = CsvLoader::new(&path).load().unwrap();
        assert_eq!(table.n_rows(), 2);
        assert!(table.column("b").unwrap().as_numeric().unwrap()[0].is_nan());
    }

    #[test]
    fn test_missing_file() {
        let err = CsvLoader::new("/no/such/file.csv").load().unwrap_err();
        assert!(err.to_string().contains("/no/such/file.csv"));
    }
}
