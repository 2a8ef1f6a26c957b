use serde::ser::{Serialize, SerializeMap, Serializer};

/// Primitive on-disk types used by the static layout tables.
///
/// Numeric types are little-endian. `Pascal` is a length-prefixed string and
/// `Text(n)` a fixed-width, untrimmed string of `n` bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarType {
    U8,
    U16,
    U32,
    F32,
    F64,
    Pascal,
    Text(usize),
}

impl ScalarType {
    /// Encoded width in bytes, or `None` when the width is stored in the data.
    pub const fn fixed_size(self) -> Option<usize> {
        match self {
            ScalarType::U8 => Some(1),
            ScalarType::U16 => Some(2),
            ScalarType::U32 | ScalarType::F32 => Some(4),
            ScalarType::F64 => Some(8),
            ScalarType::Pascal => None,
            ScalarType::Text(len) => Some(len),
        }
    }
}

/// Named field of a packed record layout.
pub type Field = (&'static str, ScalarType);

/// Decoded scalar or string value.
///
/// # Examples
/// ```
/// use ecreader_core::mpr::Value;
///
/// let value = Value::U16(3);
/// assert_eq!(value.as_f64(), Some(3.0));
/// assert_eq!(value.as_str(), None);
/// ```
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum Value {
    U8(u8),
    U16(u16),
    U32(u32),
    F32(f32),
    F64(f64),
    Text(String),
}

impl Value {
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::U8(v) => Some(v.into()),
            Value::U16(v) => Some(v.into()),
            Value::U32(v) => Some(v.into()),
            Value::F32(v) => Some(v.into()),
            Value::F64(v) => Some(v),
            Value::Text(_) => None,
        }
    }

    /// Unsigned integer value; floats and strings yield `None`.
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Value::U8(v) => Some(v.into()),
            Value::U16(v) => Some(v.into()),
            Value::U32(v) => Some(v.into()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Ordered set of named values, in layout order.
///
/// Serializes as a map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    entries: Vec<(&'static str, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, name: &'static str, value: Value) {
        self.entries.push((name, value));
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.entries.iter().map(|(name, value)| (*name, value))
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
