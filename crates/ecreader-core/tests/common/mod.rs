#![allow(dead_code)]

use ecreader_core::mpr::layout;

/// In-memory `.mpr` file builder for tests.
pub struct MprBuilder {
    bytes: Vec<u8>,
}

impl MprBuilder {
    pub fn new() -> Self {
        Self {
            bytes: layout::MAGIC.to_vec(),
        }
    }

    pub fn module(mut self, short_name: &[u8; 10], version: u32, body: &[u8]) -> Self {
        self.bytes.extend_from_slice(layout::MODULE_MARKER);
        self.bytes.extend_from_slice(short_name);
        let mut long_name = [b' '; 25];
        long_name[..15].copy_from_slice(b"BioLogic module");
        self.bytes.extend_from_slice(&long_name);
        self.bytes.extend_from_slice(&(body.len() as u32).to_le_bytes());
        self.bytes.extend_from_slice(&version.to_le_bytes());
        self.bytes.extend_from_slice(b"10/01/21");
        self.bytes.extend_from_slice(body);
        self
    }

    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.bytes
    }
}

pub fn loop_body(indices: &[u32]) -> Vec<u8> {
    let mut body = (indices.len() as u32).to_le_bytes().to_vec();
    for index in indices {
        body.extend_from_slice(&index.to_le_bytes());
    }
    body
}

/// Settings body for the OCV technique (id 0x0b, 8 parameter fields) with the
/// parameter block at `param_offset`. Each sequence sets only `tR`.
pub fn ocv_settings_body(param_offset: usize, tr: &[f32]) -> Vec<u8> {
    const RECORD_LEN: usize = 26;
    let mut body = vec![0u8; param_offset + 4 + RECORD_LEN * tr.len() + 16];
    body[0] = 0x0b;
    let comment = b"cell A";
    body[0x0007] = comment.len() as u8;
    body[0x0008..0x0008 + comment.len()].copy_from_slice(comment);
    body[0x0211..0x0215].copy_from_slice(&1.5f32.to_le_bytes());
    body[param_offset..param_offset + 2].copy_from_slice(&(tr.len() as u16).to_le_bytes());
    body[param_offset + 2..param_offset + 4].copy_from_slice(&8u16.to_le_bytes());
    for (i, value) in tr.iter().enumerate() {
        let at = param_offset + 4 + i * RECORD_LEN;
        body[at..at + 4].copy_from_slice(&value.to_le_bytes());
    }
    body
}

/// Data body with columns flags(mode, error), time/s (f64), I/mA (f32).
pub fn data_body(version: u32, rows: &[(u8, f64, f32)]) -> Vec<u8> {
    let ids: [u16; 4] = [0x0004, 0x0001, 0x0008, 0x0003];
    let mut body = (rows.len() as u32).to_le_bytes().to_vec();
    body.push(ids.len() as u8);
    for id in ids {
        body.extend_from_slice(&id.to_le_bytes());
    }
    let offset = match version {
        2 => layout::ROWS_OFFSET_V2,
        _ => layout::ROWS_OFFSET_V3,
    };
    body.resize(offset, 0);
    for (flags, time, current) in rows {
        body.extend_from_slice(&time.to_le_bytes());
        body.push(*flags);
        body.extend_from_slice(&current.to_le_bytes());
    }
    body
}

pub fn log_body(ole_timestamp: f64, host: &[u8]) -> Vec<u8> {
    let mut body = vec![0u8; 0x0923];
    body[0x0009..0x000b].copy_from_slice(&1u16.to_le_bytes());
    body[0x0249..0x0251].copy_from_slice(&ole_timestamp.to_le_bytes());
    body[0x0351] = host.len() as u8;
    body[0x0352..0x0352 + host.len()].copy_from_slice(host);
    body
}
