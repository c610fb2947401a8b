//! Implementations of the `phenosplit` subcommands.

use csv::WriterBuilder;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::{
    io::{read_tables, write_partition, CsvConfig, InputFile, InputFormat, OutputFile},
    locations::LocationTable,
    partition::partition,
    prelude::*,
    reporting::{CommandOutput, Report},
};

/// Options shared by the commands that read long-format input.
#[derive(Clone, Debug, Default)]
pub struct SplitOptions {
    pub format: InputFormat,
    pub parser: IdentifierParser,
    pub csv: CsvConfig,
    pub locations: LocationTable,
}

/// The default output directory, `output_<YYYY_MM_DD_HH_MM_SS>`.
pub fn default_outdir() -> PathBuf {
    PathBuf::from(format!(
        "output_{}",
        chrono::Local::now().format("%Y_%m_%d_%H_%M_%S")
    ))
}

fn input_files(inputs: &[PathBuf]) -> Vec<InputFile> {
    inputs.iter().map(InputFile::new).collect()
}

/// Split long-format inputs into one CSV file per growout in `outdir`.
/// Nothing is written unless every table could be built.
pub fn phenosplit_split(
    inputs: &[PathBuf],
    outdir: &Path,
    options: &SplitOptions,
) -> Result<CommandOutput<Vec<PathBuf>>, PhenoSplitError> {
    let table = read_tables(&input_files(inputs), options.format)?;
    let partition = partition(&table, &options.parser)?;

    let mut report = Report::new();
    for output in partition.values() {
        match &output.growout {
            Some(growout) => info!(
                "{}: {} ({}), {} lines",
                output.filename(),
                options.locations.expand(&growout.location),
                growout.year,
                output.nrows()
            ),
            None => report.add_issue(format!(
                "identifier '{}' is not a location-year code; its traits were written to {}",
                output.identifier,
                output.filename()
            )),
        }
        if output.n_dropped > 0 {
            report.add_issue(format!(
                "{}: {} of {} lines were left out because all their values were missing",
                output.filename(),
                output.n_dropped,
                table.nrows()
            ));
        }
    }

    let paths = write_partition(&partition, outdir, &options.csv)?;
    Ok(CommandOutput::new(paths, report))
}

/// Write a TSV describing how each trait column would be split, without
/// writing any split files.
pub fn phenosplit_inspect(
    inputs: &[PathBuf],
    output: Option<&PathBuf>,
    options: &SplitOptions,
) -> Result<CommandOutput<()>, PhenoSplitError> {
    let table = read_tables(&input_files(inputs), options.format)?;
    let report = Report::new();

    let output_stream = output.map_or(OutputFile::new_stdout(None), |file| {
        OutputFile::new(file, None)
    });
    let mut writer = WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(output_stream.writer()?);

    writer.write_record(["column", "base_name", "identifier", "filename", "location"])?;
    for column in table.columns() {
        let parsed = options.parser.parse_column(&column.name)?;
        let location = parsed
            .growout
            .as_ref()
            .map_or(".", |growout| options.locations.expand(&growout.location));
        writer.write_record([
            parsed.name.as_str(),
            parsed.base_name.as_str(),
            parsed.identifier.as_str(),
            parsed.filename().as_str(),
            location,
        ])?;
    }
    writer.flush()?;
    Ok(CommandOutput::new((), report))
}

/// Write a random long-format table, for benchmarks and testing.
#[cfg(feature = "dev-commands")]
pub fn phenosplit_random_table(
    output: Option<&PathBuf>,
    nrows: usize,
    ngrowouts: usize,
    ntraits: usize,
    missing_rate: f64,
) -> Result<CommandOutput<()>, PhenoSplitError> {
    use crate::{io::write_table, test_utilities::random_table};

    let table = random_table(nrows, ngrowouts, ntraits, missing_rate.clamp(0.0, 1.0));
    let output_stream = output.map_or(OutputFile::new_stdout(None), |file| {
        OutputFile::new(file, None)
    });
    write_table(&table, output_stream.writer()?, &CsvConfig::default())?;
    Ok(CommandOutput::new((), Report::new()))
}
