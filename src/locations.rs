//! Lookup of location codes (e.g. `FL`) to display names (e.g. `Florida`).

use csv::{ReaderBuilder, StringRecord};
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::PathBuf;

use crate::error::PhenoSplitError;
use crate::io::InputFile;

#[derive(Debug, Deserialize)]
struct LocationRecord {
    code: String,
    name: String,
}

/// A table of location codes and their names. Unknown codes expand to
/// themselves, so an empty table is a valid default.
#[derive(Clone, Debug, Default)]
pub struct LocationTable {
    names: IndexMap<String, String>,
}

impl LocationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a comma-delimited locations file with a header row, where the
    /// first column is the code and the second the name.
    pub fn from_file(filepath: impl Into<PathBuf>) -> Result<Self, PhenoSplitError> {
        let input_file = InputFile::new(filepath);
        let reader = input_file.reader()?;
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .comment(Some(b'#'))
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut table = Self::new();
        for (i, result) in csv_reader.records().enumerate() {
            let record = result?;
            if record.len() < 2 {
                return Err(PhenoSplitError::InvalidLocationFile(format!(
                    "record {} needs a code and a name column",
                    i + 1
                )));
            }
            // any columns after the name are notes, ignored
            let pair = StringRecord::from(vec![&record[0], &record[1]]);
            let location: LocationRecord = pair.deserialize(None)?;
            if table.contains(&location.code) {
                return Err(PhenoSplitError::InvalidLocationFile(format!(
                    "location code '{}' is duplicated",
                    location.code
                )));
            }
            table.insert(location.code, location.name);
        }
        Ok(table)
    }

    pub fn insert(&mut self, code: impl AsRef<str>, name: impl Into<String>) {
        self.names
            .insert(code.as_ref().to_uppercase(), name.into());
    }

    pub fn contains(&self, code: &str) -> bool {
        self.names.contains_key(&code.to_uppercase())
    }

    /// The name of a location code, or the code itself if it is unknown.
    pub fn expand<'a>(&'a self, code: &'a str) -> &'a str {
        self.names
            .get(&code.to_uppercase())
            .map_or(code, |name| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utilities::temp_file_with;

    #[test]
    fn test_expand_fallback() {
        let mut table = LocationTable::new();
        table.insert("FL", "Florida");
        assert_eq!(table.expand("FL"), "Florida");
        assert_eq!(table.expand("fl"), "Florida");
        assert_eq!(table.expand("PU"), "PU");
    }

    #[test]
    fn test_from_file() {
        let file = temp_file_with("Code,Name\nFL,Florida\n# comment\npu,Purdue\n");
        let table = LocationTable::from_file(file.path()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.expand("PU"), "Purdue");
    }

    #[test]
    fn test_from_file_duplicate() {
        let file = temp_file_with("Code,Name\nFL,Florida\nfl,Florida\n");
        let result = LocationTable::from_file(file.path());
        assert!(matches!(result, Err(PhenoSplitError::InvalidLocationFile(_))));
    }
}
