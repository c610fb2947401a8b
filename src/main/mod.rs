use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use phenosplit::{
    commands::{default_outdir, phenosplit_inspect, phenosplit_split, SplitOptions},
    io::{CsvConfig, InputFormat},
    locations::LocationTable,
    prelude::*,
    reporting::Report,
    Year,
};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[cfg(feature = "dev-commands")]
use phenosplit::commands::phenosplit_random_table;

const INFO: &str = "\
phenosplit: split long-format phenotype tables by location-year growout
usage: phenosplit [--help] <subcommand>

Subcommands:

  split: write one CSV file per growout, with bare trait names as columns.
  inspect: show how each trait column would be split.

";

#[derive(Parser)]
#[clap(name = "phenosplit")]
#[clap(about = INFO)]
struct Cli {
    /// increase output verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Options controlling how input is read and trait columns are parsed.
#[derive(Args)]
struct ParseArgs {
    /// input files to read; standard input is used if none are given
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// the delimited format of the input
    #[arg(short, long, value_enum, default_value_t = InputFormat::Csv)]
    parser: InputFormat,

    /// require both location characters of a growout code to be letters
    #[arg(long)]
    strict_growout: bool,

    /// the reference year for resolving two digit years (default: this year)
    #[arg(long)]
    current_year: Option<Year>,

    /// a CSV file of location codes and names
    #[arg(long)]
    locations: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    Split {
        #[command(flatten)]
        parse: ParseArgs,

        /// the output directory (default: output_<timestamp>)
        #[arg(short, long)]
        outdir: Option<PathBuf>,

        /// the string written for missing values
        #[arg(long, default_value = "NA")]
        na: String,
    },
    Inspect {
        #[command(flatten)]
        parse: ParseArgs,

        /// an optional output file (standard output will be used if not specified)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    #[cfg(feature = "dev-commands")]
    RandomTable {
        /// number of lines
        #[arg(long, default_value_t = 1000)]
        rows: usize,

        /// number of growouts
        #[arg(long, default_value_t = 10)]
        growouts: usize,

        /// number of traits per growout
        #[arg(long, default_value_t = 5)]
        traits: usize,

        /// probability that a value is missing
        #[arg(long, default_value_t = 0.2)]
        missing: f64,

        /// an optional output file (standard output will be used if not specified)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

impl ParseArgs {
    fn options(&self, na: Option<&str>) -> Result<SplitOptions, PhenoSplitError> {
        let strictness = if self.strict_growout {
            GrowoutStrictness::BothLetters
        } else {
            GrowoutStrictness::FirstLetter
        };
        let window = self
            .current_year
            .map_or_else(CenturyWindow::now, CenturyWindow::new);
        let locations = match &self.locations {
            Some(path) => {
                let locations = LocationTable::from_file(path)?;
                if locations.is_empty() {
                    warn!("no location codes found in {}", path.display());
                }
                locations
            }
            None => LocationTable::new(),
        };
        let csv = na.map_or_else(CsvConfig::default, |na| CsvConfig {
            no_value_string: na.to_string(),
        });
        Ok(SplitOptions {
            format: self.parser,
            parser: IdentifierParser::new(strictness, window),
            csv,
            locations,
        })
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();
}

fn print_report(report: &Report) {
    if report.is_empty() {
        return;
    }
    warn!("{} notice(s):", report.issues().len());
    for issue in report.issues() {
        warn!("{}", issue);
    }
}

fn run() -> Result<(), PhenoSplitError> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Some(Commands::Split { parse, outdir, na }) => {
            let options = parse.options(Some(na.as_str()))?;
            let outdir = outdir.clone().unwrap_or_else(default_outdir);
            info!("splitting into {}", outdir.display());
            let output = phenosplit_split(&parse.files, &outdir, &options)?;
            print_report(output.report());
            println!(
                "Created {} files in {}",
                output.value().len(),
                outdir.display()
            );
        }
        Some(Commands::Inspect { parse, output }) => {
            let options = parse.options(None)?;
            let output = phenosplit_inspect(&parse.files, output.as_ref(), &options)?;
            print_report(output.report());
        }
        #[cfg(feature = "dev-commands")]
        Some(Commands::RandomTable {
            rows,
            growouts,
            traits,
            missing,
            output,
        }) => {
            phenosplit_random_table(output.as_ref(), *rows, *growouts, *traits, *missing)?;
        }
        None => {
            println!("{}\n", INFO);
            std::process::exit(1);
        }
    }
    Ok(())
}

fn main() {
    match run() {
        Ok(_) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
