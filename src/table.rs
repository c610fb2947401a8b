//! The in-memory, column-oriented [`Table`] of trait observations.
//!
//! The first column of a long-format phenotype file is the row label (the
//! line or pedigree), kept separately as strings. Every other column holds
//! [`Value`]s: numbers or the missing marker.

use indexmap::IndexMap;

use crate::error::PhenoSplitError;

/// Cell values of trait columns. Missing markers are kept as
/// [`Value::Missing`] and never converted to numbers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value {
    Number(f64),
    Missing,
}

impl Value {
    /// Parse a trimmed cell. Empty cells, the [`MISSING_MARKERS`] and
    /// anything that parses to NaN are missing.
    pub fn parse(cell: &str) -> Result<Self, std::num::ParseFloatError> {
        let cell = cell.trim();
        if is_missing_marker(cell) {
            return Ok(Value::Missing);
        }
        let value = cell.parse::<f64>()?;
        if value.is_nan() {
            Ok(Value::Missing)
        } else {
            Ok(Value::Number(value))
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<Option<f64>> for Value {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Value::Missing, Value::Number)
    }
}

/// Cells read as missing, the same set pandas uses by default.
pub const MISSING_MARKERS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn is_missing_marker(cell: &str) -> bool {
    MISSING_MARKERS.contains(&cell)
        || cell.eq_ignore_ascii_case("na")
        || cell.eq_ignore_ascii_case("nan")
}

/// A named trait column.
#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<Value>,
}

/// A table of trait observations by line.
#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    label_name: String,
    row_labels: Vec<String>,
    columns: Vec<Column>,
}

impl Table {
    /// Create a new table with a row label column and no trait columns.
    pub fn new(label_name: impl Into<String>, row_labels: Vec<String>) -> Self {
        Self {
            label_name: label_name.into(),
            row_labels,
            columns: Vec::new(),
        }
    }

    /// Append a trait column, which must have one value per row and a name
    /// not already in the table.
    pub fn push_column(
        &mut self,
        name: impl Into<String>,
        values: Vec<Value>,
    ) -> Result<(), PhenoSplitError> {
        let name = name.into();
        if self.column(&name).is_some() {
            return Err(PhenoSplitError::DuplicateColumn(name));
        }
        if values.len() != self.row_labels.len() {
            return Err(PhenoSplitError::ColumnLengthMismatch {
                column: name,
                expected: self.row_labels.len(),
                found: values.len(),
            });
        }
        self.columns.push(Column { name, values });
        Ok(())
    }

    /// Build a table from a header (row label first) and rows of
    /// `(label, trait values)`.
    pub fn from_rows<I>(header: &[&str], rows: I) -> Result<Self, PhenoSplitError>
    where
        I: IntoIterator<Item = (String, Vec<Value>)>,
    {
        let (label_name, trait_names) = header.split_first().ok_or(PhenoSplitError::NoData)?;
        let mut row_labels = Vec::new();
        let mut columns: Vec<Vec<Value>> = vec![Vec::new(); trait_names.len()];
        for (i, (label, values)) in rows.into_iter().enumerate() {
            if values.len() != trait_names.len() {
                return Err(PhenoSplitError::RaggedRow {
                    row: i + 1,
                    expected: header.len(),
                    found: values.len() + 1,
                });
            }
            row_labels.push(label);
            for (column, value) in columns.iter_mut().zip(values) {
                column.push(value);
            }
        }
        let mut table = Table::new(*label_name, row_labels);
        for (name, values) in trait_names.iter().zip(columns) {
            table.push_column(*name, values)?;
        }
        Ok(table)
    }

    /// Stack the rows of `other` below this table. The resulting columns
    /// are the union of both tables' columns, in first-seen order; cells
    /// a table has no column for are missing.
    pub fn concat(self, other: Table) -> Result<Table, PhenoSplitError> {
        if self.label_name != other.label_name {
            return Err(PhenoSplitError::MismatchedRowLabel(
                self.label_name,
                other.label_name,
            ));
        }
        let nrows_self = self.nrows();
        let nrows_other = other.nrows();

        let mut merged: IndexMap<String, Vec<Value>> = IndexMap::new();
        for column in self.columns {
            let mut values = column.values;
            values.resize(nrows_self, Value::Missing);
            merged.insert(column.name, values);
        }
        for column in other.columns {
            let values = merged
                .entry(column.name)
                .or_insert_with(|| vec![Value::Missing; nrows_self]);
            values.extend(column.values);
        }
        for values in merged.values_mut() {
            values.resize(nrows_self + nrows_other, Value::Missing);
        }

        let mut row_labels = self.row_labels;
        row_labels.extend(other.row_labels);
        let mut table = Table::new(self.label_name, row_labels);
        for (name, values) in merged {
            table.push_column(name, values)?;
        }
        Ok(table)
    }

    pub fn label_name(&self) -> &str {
        &self.label_name
    }

    pub fn row_labels(&self) -> &[String] {
        &self.row_labels
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    /// Number of rows.
    pub fn nrows(&self) -> usize {
        self.row_labels.len()
    }

    /// Number of columns, including the row label column.
    pub fn ncols(&self) -> usize {
        self.columns.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        self.row_labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_parse() {
        assert_eq!(Value::parse("1.5").unwrap(), Value::Number(1.5));
        assert_eq!(Value::parse(" -2 ").unwrap(), Value::Number(-2.0));
        for marker in [
            "", "NA", "na", "NaN", "nan", "  ", "-nan", "+nan", "-NaN", "N/A", "n/a", "NULL",
            "null", "None", "#N/A", "<NA>", "1.#QNAN",
        ] {
            assert_eq!(Value::parse(marker).unwrap(), Value::Missing, "{:?}", marker);
        }
        assert_eq!(Value::parse("inf").unwrap(), Value::Number(f64::INFINITY));
        assert!(Value::parse("tall").is_err());
    }

    #[test]
    fn test_push_column_length() {
        let mut table = Table::new("Pedigree", vec!["L1".to_string()]);
        let result = table.push_column("weight_FL06", vec![]);
        assert!(matches!(
            result,
            Err(PhenoSplitError::ColumnLengthMismatch { expected: 1, found: 0, .. })
        ));
    }

    #[test]
    fn test_push_column_duplicate() {
        let mut table = Table::new("Pedigree", vec!["L1".to_string()]);
        table.push_column("weight_FL06", vec![Value::Number(1.0)]).unwrap();
        let result = table.push_column("weight_FL06", vec![Value::Number(2.0)]);
        assert!(matches!(
            result,
            Err(PhenoSplitError::DuplicateColumn(name)) if name == "weight_FL06"
        ));
        assert_eq!(table.ncols(), 2);
    }

    #[test]
    fn test_from_rows_ragged() {
        let result = Table::from_rows(
            &["Pedigree", "weight_FL06"],
            vec![("L1".to_string(), vec![Value::Missing, Value::Missing])],
        );
        assert!(matches!(
            result,
            Err(PhenoSplitError::RaggedRow { row: 1, expected: 2, found: 3 })
        ));
    }

    #[test]
    fn test_concat_union() {
        let left = Table::from_rows(
            &["Pedigree", "weight_FL06"],
            vec![("L1".to_string(), vec![Value::Number(1.0)])],
        )
        .unwrap();
        let right = Table::from_rows(
            &["Pedigree", "height_WR10", "weight_FL06"],
            vec![("L2".to_string(), vec![Value::Number(5.0), Value::Number(2.0)])],
        )
        .unwrap();

        let table = left.concat(right).unwrap();
        assert_eq!(table.row_labels(), ["L1", "L2"]);
        assert_eq!(table.ncols(), 3);
        assert_eq!(
            table.column("weight_FL06").unwrap().values,
            vec![Value::Number(1.0), Value::Number(2.0)]
        );
        assert_eq!(
            table.column("height_WR10").unwrap().values,
            vec![Value::Missing, Value::Number(5.0)]
        );
    }

    #[test]
    fn test_concat_label_mismatch() {
        let left = Table::new("Pedigree", vec![]);
        let right = Table::new("Line", vec![]);
        assert!(matches!(
            left.concat(right),
            Err(PhenoSplitError::MismatchedRowLabel(_, _))
        ));
    }
}
