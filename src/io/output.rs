//! Writing a whole [`Partition`] to an output directory.
//!
//! All tables are rendered to memory before the file system is touched, so a
//! failure while rendering leaves no files behind. A new output directory is
//! assembled under a temporary name next to the target and renamed into place.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::writer::{render_output_table, CsvConfig};
use super::OutputFile;
use crate::error::PhenoSplitError;
use crate::partition::Partition;

/// Write each table of `partition` to `<outdir>/<stem>.csv`, returning the
/// paths written, in partition order.
pub fn write_partition(
    partition: &Partition,
    outdir: &Path,
    config: &CsvConfig,
) -> Result<Vec<PathBuf>, PhenoSplitError> {
    let rendered = partition
        .values()
        .map(|table| {
            let contents = render_output_table(table, config)?;
            Ok::<_, PhenoSplitError>((table.filename(), contents))
        })
        .collect::<Result<Vec<_>, PhenoSplitError>>()?;

    if outdir.exists() {
        if !outdir.is_dir() {
            return Err(PhenoSplitError::OutputPathNotDirectory(
                outdir.display().to_string(),
            ));
        }
        write_into_existing(&rendered, outdir)?;
    } else {
        write_staged(&rendered, outdir)?;
    }

    let paths = rendered
        .iter()
        .map(|(filename, _)| outdir.join(filename))
        .collect();
    info!("wrote {} files to {}", rendered.len(), outdir.display());
    Ok(paths)
}

/// Every target is checked before anything is written: an existing target
/// that is not a regular file fails the whole write. The files are then
/// staged in a temporary directory inside `outdir` and renamed over their
/// targets.
fn write_into_existing(rendered: &[(String, Vec<u8>)], outdir: &Path) -> Result<(), PhenoSplitError> {
    for (filename, _) in rendered {
        let target = outdir.join(filename);
        if target.exists() && !target.is_file() {
            return Err(PhenoSplitError::OutputTargetNotFile(
                target.display().to_string(),
            ));
        }
    }

    let staging = stage(rendered, outdir)?;
    for (filename, _) in rendered {
        let target = outdir.join(filename);
        debug!("moving {} into place", target.display());
        fs::rename(staging.path().join(filename), &target)?;
    }
    Ok(())
}

fn write_staged(rendered: &[(String, Vec<u8>)], outdir: &Path) -> Result<(), PhenoSplitError> {
    let parent = match outdir.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent)?;

    let staging = stage(rendered, &parent)?;
    debug!("moving {} to {}", staging.path().display(), outdir.display());
    fs::rename(staging.path(), outdir)?;
    Ok(())
}

/// Write every rendered file into a fresh temporary directory under `dir`.
/// The directory is removed when the returned handle is dropped.
fn stage(rendered: &[(String, Vec<u8>)], dir: &Path) -> Result<tempfile::TempDir, PhenoSplitError> {
    let staging = tempfile::Builder::new()
        .prefix(".phenosplit-")
        .tempdir_in(dir)?;
    for (filename, contents) in rendered {
        let path = staging.path().join(filename);
        let mut writer = OutputFile::new(&path, None).writer()?;
        writer.write_all(contents)?;
        writer.flush()?;
    }
    Ok(staging)
}
