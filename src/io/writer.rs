//! CSV serializing of [`OutputTable`]s.

use csv::WriterBuilder;
use lazy_static::lazy_static;
use std::io::Write;

use crate::error::PhenoSplitError;
use crate::partition::OutputTable;
use crate::table::{Table, Value};

lazy_static! {
    /// The standard split CSV configuration.
    pub static ref SPLIT_CSV: CsvConfig = CsvConfig {
        no_value_string: "NA".to_string(),
    };
}

/// Output configuration, e.g. what to print for [`Value::Missing`].
#[derive(Clone, Debug, PartialEq)]
pub struct CsvConfig {
    pub no_value_string: String,
}

impl Default for CsvConfig {
    fn default() -> Self {
        SPLIT_CSV.clone()
    }
}

impl CsvConfig {
    pub fn format_value(&self, value: &Value) -> String {
        match value {
            Value::Number(x) => x.to_string(),
            Value::Missing => self.no_value_string.clone(),
        }
    }
}

/// Write `table` as CSV: the row label column first, then the renamed trait
/// columns in their retained order.
pub fn write_output_table<W: Write>(
    table: &OutputTable,
    writer: W,
    config: &CsvConfig,
) -> Result<(), PhenoSplitError> {
    let mut writer = WriterBuilder::new().from_writer(writer);
    writer.write_record(std::iter::once(&table.label_name).chain(table.columns.iter()))?;
    for (label, values) in &table.rows {
        let cells = values.iter().map(|value| config.format_value(value));
        writer.write_record(std::iter::once(label.clone()).chain(cells))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write a long-format [`Table`] as CSV, in the layout [`read_table`] reads.
///
/// [`read_table`]: crate::io::read_table
pub fn write_table<W: Write>(
    table: &Table,
    writer: W,
    config: &CsvConfig,
) -> Result<(), PhenoSplitError> {
    let mut writer = WriterBuilder::new().from_writer(writer);
    let names = table.columns().iter().map(|column| column.name.as_str());
    writer.write_record(std::iter::once(table.label_name()).chain(names))?;
    for (i, label) in table.row_labels().iter().enumerate() {
        let cells = table
            .columns()
            .iter()
            .map(|column| config.format_value(&column.values[i]));
        writer.write_record(std::iter::once(label.clone()).chain(cells))?;
    }
    writer.flush()?;
    Ok(())
}

/// Render `table` to an in-memory CSV buffer.
pub fn render_output_table(
    table: &OutputTable,
    config: &CsvConfig,
) -> Result<Vec<u8>, PhenoSplitError> {
    let mut buffer = Vec::new();
    write_output_table(table, &mut buffer, config)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::{CenturyWindow, GrowoutStrictness, IdentifierParser};
    use crate::partition::partition;
    use crate::test_utilities::example_table;

    #[test]
    fn test_render_output_tables() {
        let parser = IdentifierParser::new(GrowoutStrictness::FirstLetter, CenturyWindow::new(2024));
        let partition = partition(&example_table(), &parser).unwrap();

        let fl = render_output_table(&partition["FL_2006"], &CsvConfig::default()).unwrap();
        assert_eq!(String::from_utf8(fl).unwrap(), "Pedigree,weight,height\nL1,1,2\n");

        let wr = render_output_table(&partition["WR_2010"], &CsvConfig::default()).unwrap();
        assert_eq!(String::from_utf8(wr).unwrap(), "Pedigree,weight\nL2,5\n");
    }

    #[test]
    fn test_write_table() {
        let table = example_table();
        let mut buffer = Vec::new();
        write_table(&table, &mut buffer, &CsvConfig::default()).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "Pedigree,weight_FL06,height_FL06,weight_WR10\nL1,1,2,NA\nL2,NA,NA,5\n"
        );
    }

    #[test]
    fn test_render_missing_marker() {
        let table = OutputTable {
            stem: "FL_2006".to_string(),
            identifier: "FL06".to_string(),
            growout: None,
            label_name: "Pedigree".to_string(),
            columns: vec!["weight".to_string(), "height".to_string()],
            rows: vec![("L1".to_string(), vec![Value::Missing, Value::Number(0.25)])],
            n_dropped: 0,
        };
        let config = CsvConfig {
            no_value_string: String::new(),
        };
        let rendered = render_output_table(&table, &config).unwrap();
        assert_eq!(String::from_utf8(rendered).unwrap(), "Pedigree,weight,height\nL1,,0.25\n");
    }
}
