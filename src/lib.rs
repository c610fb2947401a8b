//! Split long-format phenotype tables, where each trait column is named
//! `<trait>_<location><yy>`, into one wide table per location-year growout.

pub mod commands;
pub mod error;
pub mod identifier;
pub mod io;
pub mod locations;
pub mod partition;
pub mod reporting;
pub mod table;
pub mod test_utilities;

/// A full calendar year, e.g. `2006`.
pub type Year = i32;

pub mod prelude {
    pub use crate::error::PhenoSplitError;
    pub use crate::identifier::{
        trait_to_base_name, CenturyWindow, Growout, GrowoutStrictness, IdentifierParser,
        TraitColumn,
    };
    pub use crate::partition::{partition, OutputTable, Partition};
    pub use crate::table::{Column, Table, Value};
}
