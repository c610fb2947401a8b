//! Test cases and test utility functions.
//!

use rand::{seq::SliceRandom, thread_rng, Rng};
use std::io::Write;
use tempfile::NamedTempFile;

use crate::table::{Table, Value};

/// Location codes used for random growouts.
pub const LOCATIONS: [&str; 8] = ["FL", "WR", "PU", "MO", "IA", "NC", "TX", "NE"];

/// Trait names used for random columns.
pub const TRAITS: [&str; 6] = ["weight", "height", "yield", "B11_lmResid", "oil", "protein"];

/// The small table used throughout the documentation:
///
/// ```text
/// Pedigree,weight_FL06,height_FL06,weight_WR10
/// L1,1,2,NA
/// L2,NA,NA,5
/// ```
pub fn example_table() -> Table {
    Table::from_rows(
        &["Pedigree", "weight_FL06", "height_FL06", "weight_WR10"],
        vec![
            (
                "L1".to_string(),
                vec![Value::Number(1.0), Value::Number(2.0), Value::Missing],
            ),
            (
                "L2".to_string(),
                vec![Value::Missing, Value::Missing, Value::Number(5.0)],
            ),
        ],
    )
    .expect("example table is well formed")
}

/// Build `n` distinct random growout codes, e.g. `FL06`.
pub fn random_growout_codes(n: usize) -> Vec<String> {
    let mut rng = thread_rng();
    let mut codes: Vec<String> = LOCATIONS
        .iter()
        .flat_map(|location| (0..100).map(move |year| format!("{}{:02}", location, year)))
        .collect();
    codes.shuffle(&mut rng);
    codes.truncate(n);
    codes
}

/// Build a random long-format table with `nrows` lines, and `ntraits`
/// trait columns for each of `ngrowouts` growouts. Each value is missing
/// with probability `missing_rate`.
pub fn random_table(nrows: usize, ngrowouts: usize, ntraits: usize, missing_rate: f64) -> Table {
    let mut rng = thread_rng();
    let row_labels = (0..nrows).map(|i| format!("line{}", i + 1)).collect();
    let mut table = Table::new("Pedigree", row_labels);
    for code in random_growout_codes(ngrowouts) {
        for k in 0..ntraits {
            let base = TRAITS[k % TRAITS.len()];
            let trait_name = if k < TRAITS.len() {
                base.to_string()
            } else {
                format!("{}{}", base, k / TRAITS.len())
            };
            let values = (0..nrows)
                .map(|_| {
                    if rng.gen_bool(missing_rate) {
                        Value::Missing
                    } else {
                        Value::Number(f64::from(rng.gen_range(0..10_000u32)) / 100.0)
                    }
                })
                .collect();
            table
                .push_column(format!("{}_{}", trait_name, code), values)
                .expect("random columns have one value per row");
        }
    }
    table
}

/// Create a temporary file holding `contents`.
pub fn temp_file_with(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("could not create temporary file");
    file.write_all(contents.as_bytes())
        .expect("could not write temporary file");
    file
}
