//! ecreader core library for decoding EC-Lab `.mpr` modular files.
//!
//! This crate implements the decoding pipeline used by the CLI: the file is
//! read into memory in one go (`source`), split into modules by the framer,
//! and each module body is decoded by kind (layout/reader/parser layers in
//! `mpr`). Decoding is byte-oriented and side-effect free; all I/O is
//! isolated in `source`.
//!
//! Invariants:
//! - Framing advances by exactly each header's declared body length.
//! - Data rows keep file order and carry one value per schema column.
//! - The first error aborts decoding; no partial module lists are returned.
//!
//! # Examples
//! ```no_run
//! use std::path::Path;
//!
//! use ecreader_core::decode_mpr_file;
//!
//! let file = decode_mpr_file(Path::new("run.mpr"))?;
//! if let Some(data) = file.data() {
//!     println!("{} rows", data.rows.len());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use encoding_rs::Encoding;
use serde::Serialize;

mod decode;
pub mod mpr;
mod source;

pub use decode::{DecodeError, decode_mpr_bytes, decode_mpr_file, decode_mpr_file_with};
pub use source::{SourceError, read_file};

use mpr::{Data, Log, Loop, Module, ModuleBody, MprError, Settings};

/// Current JSON document schema version.
pub const DOCUMENT_VERSION: u32 = 1;
/// Label of the encoding used for embedded strings unless configured.
pub const DEFAULT_ENCODING: &str = "windows-1252";

/// Decoding configuration.
///
/// # Examples
/// ```
/// use ecreader_core::DecodeOptions;
///
/// let options = DecodeOptions::from_label("latin1").unwrap();
/// assert_eq!(options.encoding.name(), "windows-1252");
/// assert!(DecodeOptions::from_label("not-an-encoding").is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DecodeOptions {
    /// Encoding of names, comments and other strings inside module bodies.
    pub encoding: &'static Encoding,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            encoding: encoding_rs::WINDOWS_1252,
        }
    }
}

impl DecodeOptions {
    /// Resolve a WHATWG encoding label such as `"utf-8"` or `"cp1252"`.
    pub fn from_label(label: &str) -> Result<Self, MprError> {
        Encoding::for_label(label.trim().as_bytes())
            .map(|encoding| Self { encoding })
            .ok_or_else(|| MprError::UnknownEncoding {
                label: label.to_string(),
            })
    }
}

/// Input file metadata embedded in decoded documents.
///
/// # Examples
/// ```
/// use ecreader_core::InputInfo;
///
/// let input = InputInfo {
///     path: "run.mpr".to_string(),
///     bytes: 1024,
/// };
/// assert_eq!(input.bytes, 1024);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputInfo {
    /// Input path as provided to the decoder.
    pub path: String,
    /// Input size in bytes.
    pub bytes: u64,
}

/// A decoded `.mpr` file: its modules in file order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MprFile {
    /// Document schema version (not the binary version).
    pub document_version: u32,
    /// Present when decoded from a path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<InputInfo>,
    pub modules: Vec<Module>,
}

impl MprFile {
    /// First settings module, if any.
    pub fn settings(&self) -> Option<&Settings> {
        self.modules.iter().find_map(|module| match &module.body {
            ModuleBody::Settings(settings) => Some(settings),
            _ => None,
        })
    }

    /// First data module, if any.
    pub fn data(&self) -> Option<&Data> {
        self.modules.iter().find_map(|module| match &module.body {
            ModuleBody::Data(data) => Some(data),
            _ => None,
        })
    }

    /// First log module, if any.
    pub fn log(&self) -> Option<&Log> {
        self.modules.iter().find_map(|module| match &module.body {
            ModuleBody::Log(log) => Some(log),
            _ => None,
        })
    }

    /// First loop module, if any.
    pub fn loops(&self) -> Option<&Loop> {
        self.modules.iter().find_map(|module| match &module.body {
            ModuleBody::Loop(loops) => Some(loops),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mpr::layout;

    #[test]
    fn document_omits_input_when_none() {
        let file = MprFile {
            document_version: DOCUMENT_VERSION,
            input: None,
            modules: Vec::new(),
        };
        let value = serde_json::to_value(&file).expect("document json");
        assert!(value.get("input").is_none());
        assert_eq!(value["document_version"], 1);
    }

    #[test]
    fn loop_module_serializes_with_kind_tag() {
        let mut bytes = layout::MAGIC.to_vec();
        bytes.extend_from_slice(layout::MODULE_MARKER);
        bytes.extend_from_slice(b"VMP loop  ");
        bytes.extend_from_slice(&[b' '; 25]);
        bytes.extend_from_slice(&8u32.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(b"01/01/22");
        bytes.extend_from_slice(&1u32.to_le_bytes());
        bytes.extend_from_slice(&7u32.to_le_bytes());

        let file = decode_mpr_bytes(&bytes, &DecodeOptions::default()).expect("decode");
        assert_eq!(file.loops().map(|l| l.indices.clone()), Some(vec![7]));
        assert!(file.data().is_none());

        let value = serde_json::to_value(&file).expect("document json");
        let body = &value["modules"][0]["body"];
        assert_eq!(body["kind"], "loop");
        assert_eq!(body["indices"][0], 7);
        assert_eq!(value["modules"][0]["header"]["short_name"], "VMP loop  ");
    }

    #[test]
    fn default_encoding_matches_label() {
        let options = DecodeOptions::default();
        assert_eq!(options.encoding.name(), "windows-1252");
        assert_eq!(
            DecodeOptions::from_label(DEFAULT_ENCODING).unwrap().encoding,
            options.encoding
        );
    }
}
