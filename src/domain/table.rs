// ============================================================
// Layer 3 - Labeled Table Domain Type
// ============================================================
// A small column-oriented table: every column has a unique name
// and holds either numbers or text. This is the "labeled table"
// that the model wrapper selects feature columns from, and the
// shape that the workout datasets are loaded into.
//
// Missing numeric cells are stored as NaN, missing text cells
// as the empty string, so every column always has n_rows cells.
//
// Reference: Rust Book §8 (Collections), §6 (Enums)

use ndarray::Array2;
use std::collections::HashSet;

use crate::error::TableError;

/// One column of cells, all of the same kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Numeric(Vec<f64>),
    Text(Vec<String>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Text(v)    => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_numeric(&self) -> Option<&[f64]> {
        match self {
            Column::Numeric(v) => Some(v),
            Column::Text(_)    => None,
        }
    }

    pub fn as_text(&self) -> Option<&[String]> {
        match self {
            Column::Text(v)    => Some(v),
            Column::Numeric(_) => None,
        }
    }

    /// Render one cell as a string (used when writing CSV output).
    /// NaN is written as an empty cell.
    pub fn cell_string(&self, row: usize) -> String {
        match self {
            Column::Numeric(v) => {
                let x = v[row];
                if x.is_nan() { String::new() } else { x.to_string() }
            }
            Column::Text(v) => v[row].clone(),
        }
    }

    /// The same cells as text. Text columns are returned unchanged.
    pub fn to_text(&self) -> Column {
        match self {
            Column::Text(_)    => self.clone(),
            Column::Numeric(v) => Column::Text((0..v.len()).map(|i| self.cell_string(i)).collect()),
        }
    }

    /// Keep only the rows whose mask entry is true.
    fn filter(&self, mask: &[bool]) -> Column {
        match self {
            Column::Numeric(v) => Column::Numeric(
                v.iter().zip(mask).filter(|(_, keep)| **keep).map(|(x, _)| *x).collect(),
            ),
            Column::Text(v) => Column::Text(
                v.iter().zip(mask).filter(|(_, keep)| **keep).map(|(x, _)| x.clone()).collect(),
            ),
        }
    }

    /// A column of `n` missing cells of the same kind as `self`.
    fn missing_like(&self, n: usize) -> Column {
        match self {
            Column::Numeric(_) => Column::Numeric(vec![f64::NAN; n]),
            Column::Text(_)    => Column::Text(vec![String::new(); n]),
        }
    }
}

/// A column-oriented table with ordered, unique column names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    names:   Vec<String>,
    columns: Vec<Column>,
}

impl Table {
    /// Create an empty table with no columns and no rows
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column, builder style.
    ///
    /// Fails if the name is already taken or if the column length
    /// differs from the rows already in the table.
    pub fn with_column(mut self, name: impl Into<String>, column: Column) -> Result<Self, TableError> {
        self.push_column(name, column)?;
        Ok(self)
    }

    pub fn push_column(&mut self, name: impl Into<String>, column: Column) -> Result<(), TableError> {
        let name = name.into();
        if self.has_column(&name) {
            return Err(TableError::DuplicateColumn(name));
        }
        if !self.columns.is_empty() && column.len() != self.n_rows() {
            return Err(TableError::RowCountMismatch {
                column:   name,
                expected: self.n_rows(),
                found:    column.len(),
            });
        }
        self.names.push(name);
        self.columns.push(column);
        Ok(())
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| &self.columns[i])
    }

    /// Sub-table restricted to exactly `names`, in that order.
    ///
    /// On failure the error lists every requested name that is not
    /// present, in the order it was requested.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Table, TableError> {
        let missing: Vec<String> = names
            .iter()
            .map(AsRef::as_ref)
            .filter(|n| !self.has_column(n))
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(TableError::MissingColumns(missing));
        }

        let mut out = Table::new();
        for name in names {
            let name = name.as_ref();
            // Presence was checked above
            let column = self.column(name).cloned().ok_or_else(|| {
                TableError::MissingColumns(vec![name.to_string()])
            })?;
            out.push_column(name, column)?;
        }
        Ok(out)
    }

    /// Keep only the rows whose mask entry is true.
    pub fn filter_rows(&self, mask: &[bool]) -> Table {
        Table {
            names:   self.names.clone(),
            columns: self.columns.iter().map(|c| c.filter(mask)).collect(),
        }
    }

    /// Row-major numeric matrix of all columns. Fails on text columns.
    pub fn to_matrix(&self) -> Result<Array2<f64>, TableError> {
        let (rows, cols) = (self.n_rows(), self.n_cols());
        let mut matrix   = Array2::<f64>::zeros((rows, cols));

        for (j, (name, column)) in self.names.iter().zip(&self.columns).enumerate() {
            let values = column
                .as_numeric()
                .ok_or_else(|| TableError::NotNumeric(name.clone()))?;
            for (i, x) in values.iter().enumerate() {
                matrix[[i, j]] = *x;
            }
        }
        Ok(matrix)
    }

    /// Number of distinct non-empty values in a column (NaN is skipped).
    /// Returns 0 when the column does not exist.
    pub fn distinct_count(&self, name: &str) -> usize {
        match self.column(name) {
            Some(Column::Text(v)) => v
                .iter()
                .filter(|s| !s.is_empty())
                .collect::<HashSet<_>>()
                .len(),
            Some(Column::Numeric(v)) => v
                .iter()
                .filter(|x| !x.is_nan())
                .map(|x| x.to_bits())
                .collect::<HashSet<_>>()
                .len(),
            None => 0,
        }
    }

    /// Stack tables vertically on the union of their columns.
    ///
    /// Column order follows first appearance. A table lacking a column
    /// contributes missing cells. Two tables disagreeing on the kind of
    /// a column is an error.
    pub fn concat(tables: &[&Table]) -> Result<Table, TableError> {
        let mut out = Table::new();

        // Union of names, first appearance wins, with the first seen kind
        let mut template: Vec<(String, Column)> = Vec::new();
        for t in tables {
            for (name, column) in t.names.iter().zip(&t.columns) {
                if !template.iter().any(|(n, _)| n == name) {
                    template.push((name.clone(), column.missing_like(0)));
                }
            }
        }

        for (name, kind) in template {
            let mut merged = kind;
            for t in tables {
                let part = match t.column(&name) {
                    Some(c) => c.clone(),
                    None    => merged.missing_like(t.n_rows()),
                };
                merged = match (merged, part) {
                    (Column::Numeric(mut a), Column::Numeric(b)) => { a.extend(b); Column::Numeric(a) }
                    (Column::Text(mut a),    Column::Text(b))    => { a.extend(b); Column::Text(a) }
                    _ => return Err(TableError::KindMismatch(name)),
                };
            }
            out.push_column(name, merged)?;
        }
        Ok(out)
    }
}

/// Input handed to an estimator: either a labeled table (feature
/// selection applies) or a raw matrix (passed through untouched).
#[derive(Debug, Clone, PartialEq)]
pub enum Features {
    Labeled(Table),
    Raw(Array2<f64>),
}

impl Features {
    pub fn n_rows(&self) -> usize {
        match self {
            Features::Labeled(t) => t.n_rows(),
            Features::Raw(m)     => m.nrows(),
        }
    }

    /// Numeric view of the input, whatever its shape.
    pub fn to_matrix(&self) -> Result<Array2<f64>, TableError> {
        match self {
            Features::Labeled(t) => t.to_matrix(),
            Features::Raw(m)     => Ok(m.clone()),
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Features::Labeled(t) => Some(t),
            Features::Raw(_)     => None,
        }
    }
}

impl From<Table> for Features {
    fn from(t: Table) -> Self {
        Features::Labeled(t)
    }
}

impl From<Array2<f64>> for Features {
    fn from(m: Array2<f64>) -> Self {
        Features::Raw(m)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> Table {
        Table::new()
            .with_column("a", Column::Numeric(vec![1.0, 2.0])).unwrap()
            .with_column("b", Column::Numeric(vec![3.0, 4.0])).unwrap()
            .with_column("c", Column::Text(vec!["x".into(), "y".into()])).unwrap()
    }

    #[test]
    fn test_select_keeps_requested_order() {
        let t   = abc();
        let sub = t.select(&["b", "a"]).unwrap();
        assert_eq!(sub.column_names(), &["b".to_string(), "a".to_string()]);
        assert_eq!(sub.n_rows(), 2);
    }

    #[test]
    fn test_select_reports_all_missing() {
        let err = abc().select(&["z", "a", "q"]).unwrap_err();
        assert_eq!(err, TableError::MissingColumns(vec!["z".into(), "q".into()]));
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let err = abc().with_column("a", Column::Numeric(vec![0.0, 0.0])).unwrap_err();
        assert_eq!(err, TableError::DuplicateColumn("a".into()));
    }

    #[test]
    fn test_row_count_mismatch_rejected() {
        let err = abc().with_column("d", Column::Numeric(vec![0.0])).unwrap_err();
        assert!(matches!(err, TableError::RowCountMismatch { expected: 2, found: 1, .. }));
    }

    #[test]
    fn test_to_matrix_rejects_text() {
        assert_eq!(abc().to_matrix().unwrap_err(), TableError::NotNumeric("c".into()));
        let m = abc().select(&["a", "b"]).unwrap().to_matrix().unwrap();
        assert_eq!(m[[1, 0]], 2.0);
        assert_eq!(m[[0, 1]], 3.0);
    }

    #[test]
    fn test_concat_fills_missing_columns() {
        let left  = abc();
        let right = Table::new()
            .with_column("a", Column::Numeric(vec![5.0])).unwrap()
            .with_column("d", Column::Text(vec!["new".into()])).unwrap();

        let all = Table::concat(&[&left, &right]).unwrap();
        assert_eq!(all.n_rows(), 3);
        assert_eq!(all.column_names(), &["a", "b", "c", "d"].map(String::from));
        let b = all.column("b").unwrap().as_numeric().unwrap();
        assert!(b[2].is_nan());
        let d = all.column("d").unwrap().as_text().unwrap();
        assert_eq!(d, &["".to_string(), "".to_string(), "new".to_string()]);
    }

    #[test]
    fn test_distinct_count_skips_empty() {
        let t = Table::new()
            .with_column("w", Column::Text(vec!["a".into(), "a".into(), "".into(), "b".into()]))
            .unwrap();
        assert_eq!(t.distinct_count("w"), 2);
        assert_eq!(t.distinct_count("missing"), 0);
    }

    #[test]
    fn test_filter_rows() {
        let t = abc().filter_rows(&[false, true]);
        assert_eq!(t.n_rows(), 1);
        assert_eq!(t.column("a").unwrap().as_numeric().unwrap(), &[2.0]);
    }
}
