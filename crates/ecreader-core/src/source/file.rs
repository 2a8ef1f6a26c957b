use std::fs;
use std::path::Path;

use super::SourceError;

/// Read a whole input file into memory.
///
/// The file handle is closed before this returns, on success and on error.
pub fn read_file(path: &Path) -> Result<Vec<u8>, SourceError> {
    let meta = fs::metadata(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if !meta.is_file() {
        return Err(SourceError::NotAFile {
            path: path.to_path_buf(),
        });
    }
    fs::read(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::read_file;
    use crate::source::SourceError;

    #[test]
    fn missing_file_is_io_error() {
        let path = std::env::temp_dir().join("ecreader_missing_input_file.mpr");
        let err = read_file(&path).unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
        assert!(err.to_string().contains("ecreader_missing_input_file.mpr"));
    }

    #[test]
    fn directory_is_rejected() {
        let err = read_file(&std::env::temp_dir()).unwrap_err();
        assert!(matches!(err, SourceError::NotAFile { .. }));
    }
}
