use encoding_rs::Encoding;

use super::error::MprError;
use super::value::{Field, Record, ScalarType, Value};

/// Bounds-checked little-endian reader over a module body or whole file.
///
/// All reads take an explicit offset; the reader itself holds no cursor, so
/// one reader can be shared by independent lookups into the same buffer.
/// Strings are decoded with the configured encoding and are never trimmed.
pub struct MprReader<'a> {
    buf: &'a [u8],
    encoding: &'static Encoding,
}

impl<'a> MprReader<'a> {
    pub fn new(buf: &'a [u8], encoding: &'static Encoding) -> Self {
        Self { buf, encoding }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    pub fn read_slice(&self, offset: usize, len: usize) -> Result<&'a [u8], MprError> {
        offset
            .checked_add(len)
            .and_then(|end| self.buf.get(offset..end))
            .ok_or(MprError::TruncatedBuffer {
                offset,
                needed: len,
                available: self.buf.len().saturating_sub(offset),
            })
    }

    /// Compare the bytes at `offset` with `expected`; running out of buffer
    /// counts as a mismatch.
    pub fn matches_at(&self, offset: usize, expected: &[u8]) -> bool {
        self.read_slice(offset, expected.len())
            .is_ok_and(|bytes| bytes == expected)
    }

    fn read_array<const N: usize>(&self, offset: usize) -> Result<[u8; N], MprError> {
        let bytes = self.read_slice(offset, N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, MprError> {
        Ok(self.read_array::<1>(offset)?[0])
    }

    pub fn read_u16_le(&self, offset: usize) -> Result<u16, MprError> {
        self.read_array(offset).map(u16::from_le_bytes)
    }

    pub fn read_u32_le(&self, offset: usize) -> Result<u32, MprError> {
        self.read_array(offset).map(u32::from_le_bytes)
    }

    pub fn read_f32_le(&self, offset: usize) -> Result<f32, MprError> {
        self.read_array(offset).map(f32::from_le_bytes)
    }

    pub fn read_f64_le(&self, offset: usize) -> Result<f64, MprError> {
        self.read_array(offset).map(f64::from_le_bytes)
    }

    pub fn read_u16_array(&self, offset: usize, count: usize) -> Result<Vec<u16>, MprError> {
        let bytes = self.read_slice(offset, array_len(offset, 2, count)?)?;
        Ok(bytes
            .chunks_exact(2)
            .map(|chunk| u16::from_le_bytes([chunk[0], chunk[1]]))
            .collect())
    }

    pub fn read_u32_array(&self, offset: usize, count: usize) -> Result<Vec<u32>, MprError> {
        let bytes = self.read_slice(offset, array_len(offset, 4, count)?)?;
        Ok(bytes
            .chunks_exact(4)
            .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect())
    }

    /// Fixed-width string, decoded but not trimmed.
    pub fn read_text(&self, offset: usize, len: usize) -> Result<String, MprError> {
        let bytes = self.read_slice(offset, len)?;
        let (text, _) = self.encoding.decode_without_bom_handling(bytes);
        Ok(text.into_owned())
    }

    /// Length byte `L` followed by `L` bytes of text.
    pub fn read_pascal_string(&self, offset: usize) -> Result<String, MprError> {
        let len = self.read_u8(offset)? as usize;
        self.read_slice(offset, len + 1)?;
        self.read_text(offset + 1, len)
    }

    /// Decode one value and return it with the number of bytes consumed.
    pub fn read_value(&self, offset: usize, ty: ScalarType) -> Result<(Value, usize), MprError> {
        let value = match ty {
            ScalarType::U8 => Value::U8(self.read_u8(offset)?),
            ScalarType::U16 => Value::U16(self.read_u16_le(offset)?),
            ScalarType::U32 => Value::U32(self.read_u32_le(offset)?),
            ScalarType::F32 => Value::F32(self.read_f32_le(offset)?),
            ScalarType::F64 => Value::F64(self.read_f64_le(offset)?),
            ScalarType::Text(len) => Value::Text(self.read_text(offset, len)?),
            ScalarType::Pascal => {
                let text = self.read_pascal_string(offset)?;
                let consumed = 1 + self.read_u8(offset)? as usize;
                return Ok((Value::Text(text), consumed));
            }
        };
        let consumed = ty.fixed_size().unwrap_or_default();
        Ok((value, consumed))
    }

    pub fn read_scalar(&self, offset: usize, ty: ScalarType) -> Result<Value, MprError> {
        self.read_value(offset, ty).map(|(value, _)| value)
    }

    /// Decode a packed record, fields back to back in declared order.
    pub fn read_record(
        &self,
        offset: usize,
        fields: &[Field],
    ) -> Result<(Record, usize), MprError> {
        let mut record = Record::with_capacity(fields.len());
        let mut cursor = offset;
        for &(name, ty) in fields {
            let (value, consumed) = self.read_value(cursor, ty)?;
            record.push(name, value);
            cursor += consumed;
        }
        Ok((record, cursor - offset))
    }

    pub fn read_records(
        &self,
        offset: usize,
        fields: &[Field],
        count: usize,
    ) -> Result<Vec<Record>, MprError> {
        let mut records = Vec::with_capacity(count.min(self.buf.len()));
        let mut cursor = offset;
        for _ in 0..count {
            let (record, consumed) = self.read_record(cursor, fields)?;
            records.push(record);
            cursor += consumed;
        }
        Ok(records)
    }

    /// Decode a table of values stored at independent fixed offsets.
    pub fn read_table(&self, table: &[(usize, &'static str, ScalarType)]) -> Result<Record, MprError> {
        let mut record = Record::with_capacity(table.len());
        for &(offset, name, ty) in table {
            record.push(name, self.read_scalar(offset, ty)?);
        }
        Ok(record)
    }
}

fn array_len(offset: usize, width: usize, count: usize) -> Result<usize, MprError> {
    width.checked_mul(count).ok_or(MprError::TruncatedBuffer {
        offset,
        needed: usize::MAX,
        available: 0,
    })
}
