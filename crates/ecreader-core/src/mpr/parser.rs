use encoding_rs::Encoding;
use serde::Serialize;
use tracing::debug;

use super::data::{Data, decode_data};
use super::error::MprError;
use super::framer::{RawModule, frame};
use super::header::{ModuleHeader, ModuleKind};
use super::log::{Log, decode_log};
use super::loops::{Loop, decode_loop};
use super::reader::MprReader;
use super::settings::{Settings, decode_settings};

/// A framed and decoded module.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Module {
    pub header: ModuleHeader,
    pub body: ModuleBody,
}

impl Module {
    pub fn kind(&self) -> ModuleKind {
        self.body.kind()
    }
}

/// Decoded module body, one variant per module kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModuleBody {
    Settings(Settings),
    Data(Data),
    Log(Log),
    Loop(Loop),
}

impl ModuleBody {
    pub fn kind(&self) -> ModuleKind {
        match self {
            ModuleBody::Settings(_) => ModuleKind::Settings,
            ModuleBody::Data(_) => ModuleKind::Data,
            ModuleBody::Log(_) => ModuleKind::Log,
            ModuleBody::Loop(_) => ModuleKind::Loop,
        }
    }
}

/// Decode the body of a framed module according to its kind.
pub fn decode_body(raw: &RawModule<'_>, encoding: &'static Encoding) -> Result<ModuleBody, MprError> {
    let reader = MprReader::new(raw.body, encoding);
    let body = match raw.kind {
        ModuleKind::Settings => ModuleBody::Settings(decode_settings(&reader)?),
        ModuleKind::Data => ModuleBody::Data(decode_data(&reader, raw.header.version)?),
        ModuleKind::Log => ModuleBody::Log(decode_log(&reader)?),
        ModuleKind::Loop => ModuleBody::Loop(decode_loop(&reader)?),
    };
    Ok(body)
}

/// Frame and decode a whole `.mpr` buffer.
///
/// Stops at the first error; module-level errors carry the module index and
/// short name.
pub fn parse_mpr(buffer: &[u8], encoding: &'static Encoding) -> Result<Vec<Module>, MprError> {
    let reader = MprReader::new(buffer, encoding);
    let framed = frame(&reader)?;
    debug!(
        modules = framed.modules.len(),
        trailing = framed.trailing.len(),
        "framed modules"
    );

    framed
        .modules
        .into_iter()
        .map(|raw| {
            let body = decode_body(&raw, encoding)
                .map_err(|err| err.in_module(raw.index, raw.header.short_name.clone()))?;
            debug!(index = raw.index, kind = ?raw.kind, "decoded module");
            Ok(Module {
                header: raw.header,
                body,
            })
        })
        .collect()
}
