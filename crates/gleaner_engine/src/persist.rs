//! Filesystem side of the pipeline: output directory checks and atomic
//! image writes.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Make sure the output directory exists and is writable, creating it if
/// missing. Writability is probed with a throwaway temp file.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if !dir.exists() {
        fs::create_dir_all(dir)
            .map_err(|err| PersistError::OutputDir(format!("{}: {err}", dir.display())))?;
    }
    if !dir.is_dir() {
        return Err(PersistError::OutputDir(format!(
            "{} exists but is not a directory",
            dir.display()
        )));
    }
    let probe = NamedTempFile::new_in(dir)
        .map_err(|err| PersistError::OutputDir(format!("{}: {err}", dir.display())))?;
    drop(probe);
    Ok(())
}

/// Writes image bodies into one directory, atomically: the body goes to a
/// temp file first and is renamed into place, so a crash or error never
/// leaves a partial image behind.
pub struct ImageFileWriter {
    dir: PathBuf,
}

impl ImageFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Write `body` as `{dir}/{filename}`, replacing any previous file of
    /// that name. Returns the final path.
    pub fn write(&self, filename: &str, body: &[u8]) -> Result<PathBuf, PersistError> {
        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(body)?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        if target.exists() {
            fs::remove_file(&target)?;
        }
        tmp.persist(&target).map_err(|err| PersistError::Io(err.error))?;
        Ok(target)
    }
}
