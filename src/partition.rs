//! Splitting a long-format [`Table`] into one [`OutputTable`] per growout.
//!
//! Each trait column is decomposed once with
//! [`IdentifierParser::parse_column`], and columns are grouped by the
//! resulting filename stem. Within a group, columns are renamed to their base
//! trait names and lines with no observation in the group are dropped.

use indexmap::IndexMap;
use tracing::debug;

use crate::error::PhenoSplitError;
use crate::identifier::{Growout, IdentifierParser, TraitColumn};
use crate::table::{Table, Value};

/// Output tables keyed by filename stem, sorted by stem.
pub type Partition = IndexMap<String, OutputTable>;

/// A wide table holding the traits of one growout (or other identifier).
#[derive(Clone, Debug, PartialEq)]
pub struct OutputTable {
    /// The filename stem, e.g. `FL_2006`.
    pub stem: String,
    /// The suffix shared by the source columns, e.g. `FL06`.
    pub identifier: String,
    pub growout: Option<Growout>,
    pub label_name: String,
    /// Base trait names, in input column order.
    pub columns: Vec<String>,
    /// Retained rows as `(row label, values)`.
    pub rows: Vec<(String, Vec<Value>)>,
    /// Number of input lines dropped because all their values were missing.
    pub n_dropped: usize,
}

impl OutputTable {
    pub fn filename(&self) -> String {
        format!("{}.csv", self.stem)
    }

    pub fn nrows(&self) -> usize {
        self.rows.len()
    }

    pub fn row_labels(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|(label, _)| label.as_str())
    }

    /// The value of trait `column` for line `label`, if both are present.
    pub fn get(&self, label: &str, column: &str) -> Option<Value> {
        let j = self.columns.iter().position(|name| name == column)?;
        self.rows
            .iter()
            .find(|(row_label, _)| row_label == label)
            .map(|(_, values)| values[j])
    }
}

/// The columns of one group, before rows are filtered.
struct Group {
    identifier: String,
    growout: Option<Growout>,
    columns: Vec<(usize, TraitColumn)>,
}

/// Partition `table` into one [`OutputTable`] per distinct filename stem.
///
/// # Errors
/// - [`PhenoSplitError::NoData`] if the table has no trait columns or no rows.
/// - [`PhenoSplitError::MismatchedIdentifierCount`] if a filename stem and a
///   column identifier do not correspond one to one.
/// - [`PhenoSplitError::UnsafeFilename`] if a column's stem is empty, `.`,
///   `..` or contains a path separator.
pub fn partition(table: &Table, parser: &IdentifierParser) -> Result<Partition, PhenoSplitError> {
    if table.ncols() < 2 || table.is_empty() {
        return Err(PhenoSplitError::NoData);
    }

    let trait_columns = table
        .columns()
        .iter()
        .map(|column| parser.parse_column(&column.name))
        .collect::<Result<Vec<_>, _>>()?;
    for column in &trait_columns {
        let stem = column.stem();
        if !is_safe_stem(&stem) {
            return Err(PhenoSplitError::UnsafeFilename {
                column: column.name.clone(),
                stem,
            });
        }
    }

    let groups = group_columns(trait_columns)?;

    let mut partition: Partition = groups
        .into_iter()
        .map(|(stem, group)| {
            let output = build_output_table(table, stem.clone(), group);
            debug!(
                "{}: {} traits, {} lines kept, {} dropped",
                output.filename(),
                output.columns.len(),
                output.nrows(),
                output.n_dropped
            );
            (stem, output)
        })
        .collect();
    partition.sort_keys();
    Ok(partition)
}

/// A stem is written as `<outdir>/<stem>.csv`, so it must name a file
/// directly inside the output directory.
fn is_safe_stem(stem: &str) -> bool {
    !(stem.is_empty() || stem == "." || stem == ".." || stem.contains(['/', '\\']))
}

/// Group trait columns by filename stem, checking that stems and identifiers
/// correspond one to one.
fn group_columns(
    trait_columns: Vec<TraitColumn>,
) -> Result<IndexMap<String, Group>, PhenoSplitError> {
    let mut stem_of_identifier: IndexMap<String, String> = IndexMap::new();
    let mut conflict: Option<String> = None;
    let mut groups: IndexMap<String, Group> = IndexMap::new();

    for (index, column) in trait_columns.into_iter().enumerate() {
        let stem = column.stem();
        let known_stem = stem_of_identifier
            .entry(column.identifier.clone())
            .or_insert_with(|| stem.clone());
        let group = groups.entry(stem.clone()).or_insert_with(|| Group {
            identifier: column.identifier.clone(),
            growout: column.growout.clone(),
            columns: Vec::new(),
        });
        if conflict.is_none() && (*known_stem != stem || group.identifier != column.identifier) {
            conflict = Some(column.name.clone());
        }
        group.columns.push((index, column));
    }

    match conflict {
        Some(column) => Err(PhenoSplitError::MismatchedIdentifierCount {
            filenames: groups.len(),
            identifiers: stem_of_identifier.len(),
            column,
        }),
        None => Ok(groups),
    }
}

fn build_output_table(table: &Table, stem: String, group: Group) -> OutputTable {
    let source = table.columns();
    let columns = group
        .columns
        .iter()
        .map(|(_, column)| column.base_name.clone())
        .collect();

    let mut rows = Vec::new();
    let mut n_dropped = 0;
    for (i, label) in table.row_labels().iter().enumerate() {
        let values: Vec<Value> = group
            .columns
            .iter()
            .map(|(j, _)| source[*j].values[i])
            .collect();
        if values.iter().all(Value::is_missing) {
            n_dropped += 1;
        } else {
            rows.push((label.clone(), values));
        }
    }

    OutputTable {
        stem,
        identifier: group.identifier,
        growout: group.growout,
        label_name: table.label_name().to_string(),
        columns,
        rows,
        n_dropped,
    }
}
