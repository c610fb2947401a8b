//! Reading delimited long-format phenotype files into a [`Table`], using the
//! [`csv`] crate.

use csv::ReaderBuilder;
use tracing::{debug, info};

use super::InputFile;
use crate::error::PhenoSplitError;
use crate::table::{Table, Value};

/// The delimited format of the input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum InputFormat {
    /// comma-separated values
    #[default]
    Csv,
    /// tab-separated values
    Tsv,
}

impl InputFormat {
    pub fn delimiter(&self) -> u8 {
        match self {
            InputFormat::Csv => b',',
            InputFormat::Tsv => b'\t',
        }
    }
}

/// Read one delimited input into a [`Table`].
///
/// The first line is the header and the first column holds the row labels.
/// Lines starting with `#` are skipped and all cells are trimmed.
pub fn read_table(input: &InputFile, format: InputFormat) -> Result<Table, PhenoSplitError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(format.delimiter())
        .has_headers(true)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(input.reader()?);

    let header = reader.headers()?.clone();
    let Some(label_name) = header.get(0) else {
        return Err(PhenoSplitError::NoData);
    };
    let trait_names: Vec<&str> = header.iter().skip(1).collect();

    let mut row_labels = Vec::new();
    let mut columns: Vec<Vec<Value>> = vec![Vec::new(); trait_names.len()];
    for (i, result) in reader.records().enumerate() {
        let record = result?;
        if record.len() != header.len() {
            return Err(PhenoSplitError::RaggedRow {
                row: i + 1,
                expected: header.len(),
                found: record.len(),
            });
        }
        let label = record.get(0).unwrap_or_default();
        for ((cell, values), name) in record.iter().skip(1).zip(columns.iter_mut()).zip(&trait_names) {
            let value = Value::parse(cell).map_err(|_| PhenoSplitError::InvalidValue {
                column: name.to_string(),
                label: label.to_string(),
                value: cell.to_string(),
            })?;
            values.push(value);
        }
        row_labels.push(label.to_string());
    }

    let mut table = Table::new(label_name, row_labels);
    for (name, values) in trait_names.into_iter().zip(columns) {
        table.push_column(name, values)?;
    }
    debug!(
        "read {}: {} lines, {} columns",
        input.name(),
        table.nrows(),
        table.ncols()
    );
    Ok(table)
}

/// Read and concatenate several inputs. With no inputs, standard input is read.
pub fn read_tables(inputs: &[InputFile], format: InputFormat) -> Result<Table, PhenoSplitError> {
    let stdin = [InputFile::new_stdin()];
    let inputs = if inputs.is_empty() { &stdin[..] } else { inputs };

    let mut tables = inputs.iter().map(|input| read_table(input, format));
    let first = tables.next().ok_or(PhenoSplitError::NoData)??;
    let table = tables.try_fold(first, |combined, table| combined.concat(table?))?;
    info!(
        "read {} input(s): {} lines, {} trait columns",
        inputs.len(),
        table.nrows(),
        table.ncols() - 1
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utilities::temp_file_with;

    #[test]
    fn test_read_table() {
        let file = temp_file_with(
            "# phenotypes\nPedigree, weight_FL06 ,height_FL06,weight_WR10\nL1,1,2,NA\nL2,,nan,5.5\n",
        );
        let table = read_table(&InputFile::new(file.path()), InputFormat::Csv).unwrap();
        assert_eq!(table.label_name(), "Pedigree");
        assert_eq!(table.row_labels(), ["L1", "L2"]);
        assert_eq!(table.columns()[0].name, "weight_FL06");
        assert_eq!(
            table.column("weight_WR10").unwrap().values,
            vec![Value::Missing, Value::Number(5.5)]
        );
        assert_eq!(
            table.column("height_FL06").unwrap().values,
            vec![Value::Number(2.0), Value::Missing]
        );
    }

    #[test]
    fn test_read_table_tsv() {
        let file = temp_file_with("Line\tyield_MO06\nA\t3\n");
        let table = read_table(&InputFile::new(file.path()), InputFormat::Tsv).unwrap();
        assert_eq!(table.ncols(), 2);
        assert_eq!(table.column("yield_MO06").unwrap().values, vec![Value::Number(3.0)]);
    }

    #[test]
    fn test_read_table_invalid_value() {
        let file = temp_file_with("Pedigree,weight_FL06\nL1,heavy\n");
        let result = read_table(&InputFile::new(file.path()), InputFormat::Csv);
        assert!(matches!(
            result,
            Err(PhenoSplitError::InvalidValue { column, label, value })
                if column == "weight_FL06" && label == "L1" && value == "heavy"
        ));
    }

    #[test]
    fn test_read_table_ragged() {
        let file = temp_file_with("Pedigree,weight_FL06\nL1,1,2\n");
        let result = read_table(&InputFile::new(file.path()), InputFormat::Csv);
        assert!(matches!(
            result,
            Err(PhenoSplitError::RaggedRow { row: 1, expected: 2, found: 3 })
        ));
    }

    #[test]
    fn test_read_table_pandas_missing_markers() {
        let file = temp_file_with(
            "Pedigree,weight_FL06,height_FL06\nL1,-nan,N/A\nL2,NULL,#N/A\nL3,None,2\n",
        );
        let table = read_table(&InputFile::new(file.path()), InputFormat::Csv).unwrap();
        assert_eq!(
            table.column("weight_FL06").unwrap().values,
            vec![Value::Missing; 3]
        );
        assert_eq!(
            table.column("height_FL06").unwrap().values,
            vec![Value::Missing, Value::Missing, Value::Number(2.0)]
        );
    }

    #[test]
    fn test_read_table_duplicate_header() {
        let file = temp_file_with("Pedigree,weight_FL06,weight_FL06\nL1,1,2\n");
        let result = read_table(&InputFile::new(file.path()), InputFormat::Csv);
        assert!(matches!(
            result,
            Err(PhenoSplitError::DuplicateColumn(name)) if name == "weight_FL06"
        ));

        // the same file followed by another input must not lose a column
        let second = temp_file_with("Pedigree,weight_WR10\nL2,2\n");
        let inputs = [InputFile::new(file.path()), InputFile::new(second.path())];
        let result = read_tables(&inputs, InputFormat::Csv);
        assert!(matches!(result, Err(PhenoSplitError::DuplicateColumn(_))));
    }

    #[test]
    fn test_read_tables_concat() {
        let first = temp_file_with("Pedigree,weight_FL06\nL1,1\n");
        let second = temp_file_with("Pedigree,weight_WR10\nL2,2\n");
        let inputs = [InputFile::new(first.path()), InputFile::new(second.path())];
        let table = read_tables(&inputs, InputFormat::Csv).unwrap();
        assert_eq!(table.nrows(), 2);
        assert_eq!(
            table.column("weight_WR10").unwrap().values,
            vec![Value::Missing, Value::Number(2.0)]
        );
    }
}
