use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};
use tracing::debug;

use super::columns::ColumnSchema;
use super::error::MprError;
use super::layout;
use super::reader::MprReader;
use super::value::Value;

/// One measurement sample.
///
/// `values` follows the schema column order, including the raw `flags` byte.
/// `flags` holds the derived flag fields in schema flag order.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub values: Vec<Value>,
    pub flags: Vec<u8>,
}

/// Decoded data module. Rows are kept in file order.
///
/// Serialized rows are maps keyed by column name, followed by the derived
/// flag fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Data {
    pub row_count: u32,
    pub column_count: u8,
    pub schema: ColumnSchema,
    pub rows: Vec<Row>,
}

impl Data {
    /// Value of a column or derived flag field in a given row.
    pub fn get(&self, row: usize, name: &str) -> Option<Value> {
        let row = self.rows.get(row)?;
        if let Some(position) = self.schema.column_position(name) {
            return row.values.get(position).cloned();
        }
        let position = self.schema.flag_position(name)?;
        row.flags.get(position).copied().map(Value::U8)
    }

    /// All values of a column or derived flag field, in row order.
    pub fn column(&self, name: &str) -> Option<Vec<Value>> {
        if self.schema.column_position(name).is_none() && self.schema.flag_position(name).is_none()
        {
            return None;
        }
        (0..self.rows.len()).map(|row| self.get(row, name)).collect()
    }

    /// Schema columns followed by derived flag names.
    pub fn column_names(&self) -> Vec<&'static str> {
        self.schema
            .columns()
            .iter()
            .map(|column| column.name)
            .chain(self.schema.flags().iter().map(|flag| flag.name))
            .collect()
    }
}

/// Decode a data module body for the given module header version.
///
/// # Errors
/// `UnknownColumn` from schema construction, `UnsupportedDataVersion` for
/// versions other than 2 and 3, `TruncatedBuffer` when the declared rows run
/// past the body.
pub fn decode_data(reader: &MprReader<'_>, version: u32) -> Result<Data, MprError> {
    let row_count = reader.read_u32_le(layout::ROW_COUNT_OFFSET)?;
    let column_count = reader.read_u8(layout::COLUMN_COUNT_OFFSET)?;
    let ids = reader.read_u16_array(layout::COLUMN_IDS_OFFSET, column_count as usize)?;
    let schema = ColumnSchema::build(&ids)?;
    if schema.row_size() == 0 && row_count > 0 {
        return Err(MprError::EmptyRowSchema { row_count });
    }

    let offset = layout::rows_offset(version).ok_or(MprError::UnsupportedDataVersion { version })?;
    debug!(
        row_count,
        columns = schema.len(),
        flags = schema.flags().len(),
        offset,
        "reading data rows"
    );

    let row_size = schema.row_size();
    let total = row_size
        .checked_mul(row_count as usize)
        .ok_or(MprError::TruncatedBuffer {
            offset,
            needed: usize::MAX,
            available: reader.len().saturating_sub(offset),
        })?;
    reader.read_slice(offset, total)?;

    let mut rows = Vec::with_capacity((row_count as usize).min(reader.len()));
    for index in 0..row_count as usize {
        rows.push(decode_row(reader, &schema, offset + index * row_size)?);
    }

    Ok(Data {
        row_count,
        column_count,
        schema,
        rows,
    })
}

impl Serialize for Data {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Data", 4)?;
        state.serialize_field("row_count", &self.row_count)?;
        state.serialize_field("column_count", &self.column_count)?;
        state.serialize_field("schema", &self.schema)?;
        state.serialize_field(
            "rows",
            &NamedRows {
                schema: &self.schema,
                rows: &self.rows,
            },
        )?;
        state.end()
    }
}

struct NamedRows<'a> {
    schema: &'a ColumnSchema,
    rows: &'a [Row],
}

impl Serialize for NamedRows<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.rows.iter().map(|row| NamedRow {
            schema: self.schema,
            row,
        }))
    }
}

struct NamedRow<'a> {
    schema: &'a ColumnSchema,
    row: &'a Row,
}

impl Serialize for NamedRow<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map =
            serializer.serialize_map(Some(self.row.values.len() + self.row.flags.len()))?;
        for (column, value) in self.schema.columns().iter().zip(&self.row.values) {
            map.serialize_entry(column.name, value)?;
        }
        for (flag, value) in self.schema.flags().iter().zip(&self.row.flags) {
            map.serialize_entry(flag.name, value)?;
        }
        map.end()
    }
}

fn decode_row(reader: &MprReader<'_>, schema: &ColumnSchema, offset: usize) -> Result<Row, MprError> {
    let mut values = Vec::with_capacity(schema.len());
    let mut cursor = offset;
    for column in schema.columns() {
        let (value, consumed) = reader.read_value(cursor, column.ty)?;
        values.push(value);
        cursor += consumed;
    }

    let flags = match schema.flags_index().map(|index| &values[index]) {
        Some(Value::U8(byte)) => schema.flags().iter().map(|flag| flag.extract(*byte)).collect(),
        _ => Vec::new(),
    };
    Ok(Row { values, flags })
}
