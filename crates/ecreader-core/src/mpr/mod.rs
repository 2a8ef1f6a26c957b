//! EC-Lab `.mpr` modular file decoding.
//!
//! A file is a fixed preamble followed by a stream of modules, each a
//! `"MODULE"` marker, a fixed header and a body of exactly the declared
//! length. Bodies are decoded by kind:
//! - settings: technique, fixed-offset settings and the technique parameter
//!   block, whose offset is found by probing a short candidate list
//! - data: a row schema built from column ids, then packed rows at a
//!   header-version dependent offset, with bit-packed flags unpacked per row
//! - log: fixed-offset fields
//! - loop: row indices of loop iteration starts
//!
//! The module follows the crate's layered structure: `layout` holds offsets,
//! literals and field tables, `reader` the bounds-checked little-endian
//! access, the body modules the decoding, and `error` the failure kinds.
//! Decoding is pure; file access lives in `source`.

pub mod columns;
pub mod data;
pub mod error;
pub mod framer;
pub mod header;
pub mod layout;
pub mod log;
pub mod loops;
pub mod parser;
pub mod reader;
pub mod settings;
pub mod techniques;
pub mod value;

pub use columns::{Column, ColumnSchema, FlagField};
pub use data::{Data, Row};
pub use error::MprError;
pub use framer::{Framed, RawModule, frame};
pub use header::{ModuleHeader, ModuleKind};
pub use log::Log;
pub use loops::Loop;
pub use parser::{Module, ModuleBody, decode_body, parse_mpr};
pub use reader::MprReader;
pub use settings::Settings;
pub use value::{Record, ScalarType, Value};
