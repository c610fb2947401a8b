//! Input/Output file handling with [`InputFile`] and [`OutputFile`].
//!
//! These types abstract over reading/writing both plaintext and gzip-compressed
//! input/output, and over files and the standard streams.

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// Gzip magic numbers.
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Check if a file is a gzipped by looking for the magic numbers
pub fn is_gzipped_file(file_path: impl AsRef<Path>) -> io::Result<bool> {
    let mut file = File::open(file_path)?;
    let mut buffer = [0; 2];
    match file.read_exact(&mut buffer) {
        Ok(()) => Ok(buffer == GZIP_MAGIC),
        // files shorter than two bytes cannot be gzipped
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(false),
        Err(e) => Err(e),
    }
}

#[derive(Clone, Debug, PartialEq)]
enum InputSource {
    File(PathBuf),
    Stdin,
}

/// Represents an input file.
///
/// This abstracts how data is read in, allowing for both plaintext and
/// gzip-compressed input, from a file or standard input, to be read through a
/// common interface.
#[derive(Clone, Debug)]
pub struct InputFile {
    source: InputSource,
}

impl InputFile {
    /// Constructs a new `InputFile`. Compression is detected from the file
    /// contents, not the extension.
    pub fn new(filepath: impl Into<PathBuf>) -> Self {
        Self {
            source: InputSource::File(filepath.into()),
        }
    }

    /// Constructs a new [`InputFile`] for standard input.
    pub fn new_stdin() -> Self {
        Self {
            source: InputSource::Stdin,
        }
    }

    /// A name for messages: the path, or `<stdin>`.
    pub fn name(&self) -> String {
        match &self.source {
            InputSource::File(path) => path.display().to_string(),
            InputSource::Stdin => "<stdin>".to_string(),
        }
    }

    /// Opens the input and returns a buffered reader, decompressing gzip
    /// input transparently.
    pub fn reader(&self) -> io::Result<BufReader<Box<dyn Read>>> {
        let reader: Box<dyn Read> = match &self.source {
            InputSource::File(path) => {
                let file = File::open(path)?;
                if is_gzipped_file(path)? {
                    Box::new(GzDecoder::new(file))
                } else {
                    Box::new(file)
                }
            }
            InputSource::Stdin => {
                // peek at the stream, since it cannot be reopened
                let mut stdin = BufReader::new(io::stdin());
                let is_gzipped = stdin.fill_buf()?.starts_with(&GZIP_MAGIC);
                if is_gzipped {
                    Box::new(GzDecoder::new(stdin))
                } else {
                    Box::new(stdin)
                }
            }
        };
        Ok(BufReader::new(reader))
    }
}

enum OutputDestination {
    File(PathBuf),
    Stdout,
}

/// Represents an output file.
///
/// This struct is used to handle operations on an output file, such as writing to the file.
/// This abstracts writing both plaintext and gzip-compressed files.
pub struct OutputFile {
    destination: OutputDestination,
    pub header: Option<Vec<String>>,
}

impl OutputFile {
    /// Constructs a new `OutputFile`.
    ///
    /// # Arguments
    ///
    /// * `filepath` - The path to the file. If the file extension is
    /// `.gz`, `OutputFile` will automatically write gzip-compressed output.
    /// * `header` - An optional vector of strings representing commented header lines to be written to the file.
    pub fn new(filepath: impl Into<PathBuf>, header: Option<Vec<String>>) -> Self {
        Self {
            destination: OutputDestination::File(filepath.into()),
            header,
        }
    }

    /// Constructs a new [`OutputFile`] for standard output.
    pub fn new_stdout(header: Option<Vec<String>>) -> Self {
        Self {
            destination: OutputDestination::Stdout,
            header,
        }
    }

    /// Opens the file and returns a writer.
    ///
    /// If the file path ends with ".gz", the file is treated as gzip-compressed, and the
    /// function will handle compression automatically. If a header is set, it will be written
    /// to the file.
    pub fn writer(&self) -> io::Result<Box<dyn Write>> {
        let mut writer: Box<dyn Write> = match &self.destination {
            OutputDestination::File(path) => {
                let is_gzip = path.extension().map_or(false, |ext| ext == "gz");
                if is_gzip {
                    Box::new(BufWriter::new(GzEncoder::new(
                        File::create(path)?,
                        Compression::default(),
                    )))
                } else {
                    Box::new(BufWriter::new(File::create(path)?))
                }
            }
            OutputDestination::Stdout => Box::new(BufWriter::new(io::stdout())),
        };
        // write header if one is set
        if let Some(entries) = &self.header {
            for entry in entries {
                writeln!(writer, "#{}", entry)?;
            }
        }
        Ok(writer)
    }
}
