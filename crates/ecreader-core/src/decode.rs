use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::mpr::{self, MprError};
use crate::source::{SourceError, read_file};
use crate::{DOCUMENT_VERSION, DecodeOptions, InputInfo, MprFile};

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
    #[error("Decode error: {0}")]
    Mpr(#[from] MprError),
}

impl DecodeError {
    /// Decoding failure with module context removed, if this is one.
    pub fn mpr_kind(&self) -> Option<&MprError> {
        match self {
            DecodeError::Mpr(err) => Some(err.root_cause()),
            DecodeError::Source(_) => None,
        }
    }
}

/// Read and decode an `.mpr` file with default options.
pub fn decode_mpr_file(path: &Path) -> Result<MprFile, DecodeError> {
    decode_mpr_file_with(path, &DecodeOptions::default())
}

pub fn decode_mpr_file_with(path: &Path, options: &DecodeOptions) -> Result<MprFile, DecodeError> {
    let bytes = read_file(path)?;
    debug!(path = %path.display(), bytes = bytes.len(), "read input file");
    let mut file = decode_mpr_bytes(&bytes, options)?;
    file.input = Some(InputInfo {
        path: path.display().to_string(),
        bytes: bytes.len() as u64,
    });
    Ok(file)
}

/// Decode an in-memory `.mpr` buffer.
pub fn decode_mpr_bytes(bytes: &[u8], options: &DecodeOptions) -> Result<MprFile, DecodeError> {
    let modules = mpr::parse_mpr(bytes, options.encoding)?;
    Ok(MprFile {
        document_version: DOCUMENT_VERSION,
        input: None,
        modules,
    })
}
