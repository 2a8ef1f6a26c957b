mod file;

pub use file::read_file;

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("input is not a file: {}", .path.display())]
    NotAFile { path: PathBuf },
}
