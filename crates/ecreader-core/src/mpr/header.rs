use serde::Serialize;

use super::error::MprError;
use super::layout;
use super::reader::MprReader;

/// Fixed header preceding every module body.
///
/// Name and date fields keep their padding exactly as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleHeader {
    pub short_name: String,
    pub long_name: String,
    /// Exact byte length of the body that follows.
    pub length: u32,
    pub version: u32,
    pub date: String,
}

impl ModuleHeader {
    pub fn read(reader: &MprReader<'_>, offset: usize) -> Result<Self, MprError> {
        reader.read_slice(offset, layout::HEADER_LEN)?;
        let text = |range: std::ops::Range<usize>| {
            reader.read_text(offset + range.start, range.end - range.start)
        };
        Ok(Self {
            short_name: text(layout::SHORT_NAME_RANGE)?,
            long_name: text(layout::LONG_NAME_RANGE)?,
            length: reader.read_u32_le(offset + layout::LENGTH_OFFSET)?,
            version: reader.read_u32_le(offset + layout::VERSION_OFFSET)?,
            date: text(layout::DATE_RANGE)?,
        })
    }

    pub fn kind(&self) -> Result<ModuleKind, MprError> {
        ModuleKind::from_short_name(&self.short_name).ok_or_else(|| MprError::UnknownModuleKind {
            name: self.short_name.clone(),
        })
    }
}

/// The four module kinds found in `.mpr` files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKind {
    Settings,
    Data,
    Log,
    Loop,
}

impl ModuleKind {
    /// Match a padded short name exactly.
    pub fn from_short_name(name: &str) -> Option<Self> {
        match name {
            layout::SETTINGS_SHORT_NAME => Some(ModuleKind::Settings),
            layout::DATA_SHORT_NAME => Some(ModuleKind::Data),
            layout::LOG_SHORT_NAME => Some(ModuleKind::Log),
            layout::LOOP_SHORT_NAME => Some(ModuleKind::Loop),
            _ => None,
        }
    }

    pub fn short_name(self) -> &'static str {
        match self {
            ModuleKind::Settings => layout::SETTINGS_SHORT_NAME,
            ModuleKind::Data => layout::DATA_SHORT_NAME,
            ModuleKind::Log => layout::LOG_SHORT_NAME,
            ModuleKind::Loop => layout::LOOP_SHORT_NAME,
        }
    }
}
