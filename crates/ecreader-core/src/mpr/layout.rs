use super::value::ScalarType;

/// File preamble: ASCII title, SUB, space padding and four NUL bytes.
pub const MAGIC: &[u8; 52] = b"BIO-LOGIC MODULAR FILE\x1a                         \x00\x00\x00\x00";
pub const MODULE_MARKER: &[u8; 6] = b"MODULE";

pub const SHORT_NAME_RANGE: std::ops::Range<usize> = 0..10;
pub const LONG_NAME_RANGE: std::ops::Range<usize> = 10..35;
pub const LENGTH_OFFSET: usize = 35;
pub const VERSION_OFFSET: usize = 39;
pub const DATE_RANGE: std::ops::Range<usize> = 43..51;
pub const HEADER_LEN: usize = 51;

pub const SETTINGS_SHORT_NAME: &str = "VMP Set   ";
pub const DATA_SHORT_NAME: &str = "VMP data  ";
pub const LOG_SHORT_NAME: &str = "VMP LOG   ";
pub const LOOP_SHORT_NAME: &str = "VMP loop  ";

// Settings module.
pub const TECHNIQUE_ID_OFFSET: usize = 0x0000;
pub const PARAM_OFFSET_CANDIDATES: [usize; 3] = [0x0572, 0x1845, 0x1846];
pub const PARAM_SEQUENCE_COUNT_OFFSET: usize = 0x0000;
pub const PARAM_FIELD_COUNT_OFFSET: usize = 0x0002;
pub const PARAM_RECORDS_OFFSET: usize = 0x0004;

pub const SETTINGS_FIELDS: &[(usize, &str, ScalarType)] = &[
    (0x0007, "comments", ScalarType::Pascal),
    (0x0107, "active_material_mass", ScalarType::F32),
    (0x010b, "at_x", ScalarType::F32),
    (0x010f, "molecular_weight", ScalarType::F32),
    (0x0113, "atomic_weight", ScalarType::F32),
    (0x0117, "acquisition_start", ScalarType::F32),
    (0x011b, "e_transferred", ScalarType::U16),
    (0x011e, "electrode_material", ScalarType::Pascal),
    (0x01c0, "electrolyte", ScalarType::Pascal),
    (0x0211, "electrode_area", ScalarType::F32),
    (0x0215, "reference_electrode", ScalarType::Pascal),
    (0x024c, "characteristic_mass", ScalarType::F32),
    (0x025c, "battery_capacity", ScalarType::F32),
    (0x0260, "battery_capacity_unit", ScalarType::U8),
];

// Data module.
pub const ROW_COUNT_OFFSET: usize = 0x0000;
pub const COLUMN_COUNT_OFFSET: usize = 0x0004;
pub const COLUMN_IDS_OFFSET: usize = 0x0005;
pub const ROWS_OFFSET_V2: usize = 0x0195;
pub const ROWS_OFFSET_V3: usize = 0x0196;

/// Start of the row array for a data module of the given header version.
pub fn rows_offset(version: u32) -> Option<usize> {
    match version {
        2 => Some(ROWS_OFFSET_V2),
        3 => Some(ROWS_OFFSET_V3),
        _ => None,
    }
}

// Log module. Older firmware leaves some of these unset; the bytes are
// read regardless.
pub const LOG_FIELDS: &[(usize, &str, ScalarType)] = &[
    (0x0009, "channel_number", ScalarType::U16),
    (0x00ab, "channel_sn", ScalarType::U16),
    (0x01f8, "ewe_ctrl_min", ScalarType::F32),
    (0x01fc, "ewe_ctrl_max", ScalarType::F32),
    (0x0249, "ole_timestamp", ScalarType::F64),
    (0x0251, "filename", ScalarType::Pascal),
    (0x0351, "host", ScalarType::Pascal),
    (0x0384, "address", ScalarType::Pascal),
    (0x03b7, "ec_lab_version", ScalarType::Pascal),
    (0x03be, "server_version", ScalarType::Pascal),
    (0x03c5, "interpreter_version", ScalarType::Pascal),
    (0x03cf, "device_sn", ScalarType::Pascal),
    (0x0922, "averaging_points", ScalarType::U8),
];

// Loop module.
pub const LOOP_COUNT_OFFSET: usize = 0x0000;
pub const LOOP_INDICES_OFFSET: usize = 0x0004;
