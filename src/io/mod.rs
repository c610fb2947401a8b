//! Types and methods for reading input tables and writing split output.

pub mod file;
pub mod output;
pub mod reader;
pub mod writer;

pub use file::{InputFile, OutputFile};
pub use output::write_partition;
pub use reader::{read_table, read_tables, InputFormat};
pub use writer::{render_output_table, write_output_table, write_table, CsvConfig, SPLIT_CSV};
