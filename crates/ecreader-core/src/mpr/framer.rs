use tracing::trace;

use super::error::MprError;
use super::header::{ModuleHeader, ModuleKind};
use super::layout;
use super::reader::MprReader;

/// A module split out of the file but not yet decoded.
#[derive(Debug, Clone)]
pub struct RawModule<'a> {
    /// Position in the module stream, starting at 0.
    pub index: usize,
    /// File offset of the module marker.
    pub offset: usize,
    pub header: ModuleHeader,
    pub kind: ModuleKind,
    pub body: &'a [u8],
}

/// Result of framing: the modules plus whatever follows the last one.
#[derive(Debug, Clone)]
pub struct Framed<'a> {
    pub modules: Vec<RawModule<'a>>,
    pub trailing: &'a [u8],
}

/// Split a whole-file buffer into modules.
///
/// The stream ends at the first position that does not hold the module
/// marker, including end of input. Each body is exactly `header.length`
/// bytes; the next marker is expected right after it.
///
/// # Errors
/// `BadMagic` when the preamble does not match byte for byte. Header and body
/// truncation and unknown module kinds are returned wrapped in
/// [`MprError::InModule`].
pub fn frame<'a>(reader: &MprReader<'a>) -> Result<Framed<'a>, MprError> {
    if !reader.matches_at(0, layout::MAGIC) {
        return Err(MprError::BadMagic);
    }

    let mut modules = Vec::new();
    let mut cursor = layout::MAGIC.len();
    while reader.matches_at(cursor, layout::MODULE_MARKER) {
        let index = modules.len();
        let header_offset = cursor + layout::MODULE_MARKER.len();
        let header =
            ModuleHeader::read(reader, header_offset).map_err(|err| err.in_module(index, ""))?;
        let kind = header
            .kind()
            .map_err(|err| err.in_module(index, header.short_name.clone()))?;
        let body_offset = header_offset + layout::HEADER_LEN;
        let body = reader
            .read_slice(body_offset, header.length as usize)
            .map_err(|err| err.in_module(index, header.short_name.clone()))?;
        trace!(
            index,
            offset = cursor,
            kind = ?kind,
            length = header.length,
            "framed module"
        );
        modules.push(RawModule {
            index,
            offset: cursor,
            header,
            kind,
            body,
        });
        cursor = body_offset + body.len();
    }

    let trailing = reader.read_slice(cursor, reader.len() - cursor)?;
    Ok(Framed { modules, trailing })
}
