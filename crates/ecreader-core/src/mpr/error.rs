use thiserror::Error;

/// Errors returned by `.mpr` framing and module decoding.
///
/// Every variant is fatal: decoding stops at the first error and no partial
/// module list is returned. Errors raised while handling a specific module
/// are wrapped in [`MprError::InModule`]; use [`MprError::root_cause`] to get
/// at the underlying kind.
///
/// # Examples
/// ```
/// use ecreader_core::mpr::MprError;
///
/// let err = MprError::UnsupportedDataVersion { version: 7 };
/// assert!(err.to_string().contains("unsupported data module version 7"));
/// ```
#[derive(Debug, Error)]
pub enum MprError {
    #[error("bad magic: input does not start with the modular file preamble")]
    BadMagic,
    #[error("truncated buffer at offset {offset:#x}: need {needed} bytes, {available} available")]
    TruncatedBuffer {
        offset: usize,
        needed: usize,
        available: usize,
    },
    #[error("unknown module kind {name:?}")]
    UnknownModuleKind { name: String },
    #[error("unknown technique id {id:#04x}")]
    UnknownTechnique { id: u8 },
    /// Zero or several candidate offsets declare a field count the technique
    /// knows. `matched` lists the candidates that did.
    #[error(
        "parameter offset for technique {technique} is not unique: matched {matched:?}, probed counts {probed:?}, expected one of {expected:?}"
    )]
    AmbiguousParameterOffset {
        technique: &'static str,
        probed: Vec<(usize, Option<u16>)>,
        expected: Vec<usize>,
        matched: Vec<usize>,
    },
    #[error("unknown column id {id:#06x} (previous column: {})", .previous.unwrap_or("none"))]
    UnknownColumn {
        id: u16,
        previous: Option<&'static str>,
    },
    #[error("column name {name:?} appears twice (id {id:#06x})")]
    DuplicateColumn { id: u16, name: &'static str },
    #[error("{row_count} rows declared with an empty row schema")]
    EmptyRowSchema { row_count: u32 },
    #[error("unsupported data module version {version}")]
    UnsupportedDataVersion { version: u32 },
    #[error("unknown text encoding label {label:?}")]
    UnknownEncoding { label: String },
    #[error("module {index} ({name:?}): {source}")]
    InModule {
        index: usize,
        name: String,
        source: Box<MprError>,
    },
}

impl MprError {
    /// Wrap an error with the index and short name of the module it came from.
    pub fn in_module(self, index: usize, name: impl Into<String>) -> Self {
        MprError::InModule {
            index,
            name: name.into(),
            source: Box::new(self),
        }
    }

    /// Strip module context and return the specific error kind.
    pub fn root_cause(&self) -> &MprError {
        let mut err = self;
        while let MprError::InModule { source, .. } = err {
            err = source;
        }
        err
    }

    /// Index of the module the error was raised in, if any.
    pub fn module_index(&self) -> Option<usize> {
        match self {
            MprError::InModule { index, .. } => Some(*index),
            _ => None,
        }
    }
}
