//! Data column tables and row schema construction.

use serde::Serialize;

use super::error::MprError;
use super::value::ScalarType;

use ScalarType::{F32, F64, U8, U16, U32};

/// Name of the synthetic byte column shared by all flag fields.
pub const FLAGS_COLUMN: &str = "flags";

/// One stored column of a data row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Column {
    /// Column id from the file; `None` for the synthetic flags column.
    pub id: Option<u16>,
    pub name: &'static str,
    #[serde(rename = "type")]
    pub ty: ScalarType,
}

/// Sub-field packed into the flags byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FlagField {
    pub id: u16,
    pub name: &'static str,
    pub mask: u8,
    pub shift: u8,
}

impl FlagField {
    pub fn extract(&self, flags: u8) -> u8 {
        (flags & self.mask) >> self.shift
    }
}

/// Row layout of a data module, fixed before any row is decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSchema {
    columns: Vec<Column>,
    flags: Vec<FlagField>,
    #[serde(skip)]
    flags_index: Option<usize>,
    row_size: usize,
}

impl ColumnSchema {
    /// Build the schema described by a sequence of column ids.
    ///
    /// Flag ids add the shared `flags` column the first time one is seen and
    /// register a flag field; a repeated flag id is ignored.
    ///
    /// Some names are shared by ids that store the same quantity in different
    /// file versions. Two of them in one schema would make lookups by name
    /// ambiguous, so column names are unique within a schema.
    ///
    /// # Errors
    /// `UnknownColumn` for an id found in neither table, naming the column
    /// resolved just before it. `DuplicateColumn` when a name repeats.
    pub fn build(ids: &[u16]) -> Result<Self, MprError> {
        let mut columns: Vec<Column> = Vec::with_capacity(ids.len());
        let mut flags: Vec<FlagField> = Vec::new();
        let mut flags_index = None;

        for &id in ids {
            if let Some(flag) = flag_field(id) {
                if flags_index.is_none() {
                    flags_index = Some(columns.len());
                    columns.push(Column {
                        id: None,
                        name: FLAGS_COLUMN,
                        ty: U8,
                    });
                }
                if !flags.iter().any(|existing| existing.id == id) {
                    flags.push(flag);
                }
            } else if let Some(column) = data_column(id) {
                if columns.iter().any(|existing| existing.name == column.name) {
                    return Err(MprError::DuplicateColumn {
                        id,
                        name: column.name,
                    });
                }
                columns.push(column);
            } else {
                return Err(MprError::UnknownColumn {
                    id,
                    previous: columns.last().map(|column| column.name),
                });
            }
        }

        let row_size = columns
            .iter()
            .map(|column| column.ty.fixed_size().unwrap_or_default())
            .sum();
        Ok(Self {
            columns,
            flags,
            flags_index,
            row_size,
        })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn flags(&self) -> &[FlagField] {
        &self.flags
    }

    /// Position of the `flags` column within a row, if present.
    pub fn flags_index(&self) -> Option<usize> {
        self.flags_index
    }

    /// Packed byte size of one row.
    pub fn row_size(&self) -> usize {
        self.row_size
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column_position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.name == name)
    }

    pub fn flag_position(&self, name: &str) -> Option<usize> {
        self.flags.iter().position(|flag| flag.name == name)
    }
}

pub fn data_column(id: u16) -> Option<Column> {
    DATA_COLUMNS
        .iter()
        .find(|(column_id, _, _)| *column_id == id)
        .map(|&(id, name, ty)| Column {
            id: Some(id),
            name,
            ty,
        })
}

pub fn flag_field(id: u16) -> Option<FlagField> {
    FLAG_COLUMNS
        .iter()
        .find(|(flag_id, _, _, _)| *flag_id == id)
        .map(|&(id, name, mask, shift)| FlagField {
            id,
            name,
            mask,
            shift,
        })
}

// Bit 0x40 is unassigned; it shows up on the final row of a run.
static FLAG_COLUMNS: &[(u16, &str, u8, u8)] = &[
    (0x0001, "mode", 0x03, 0),
    (0x0002, "ox/red", 0x04, 2),
    (0x0003, "error", 0x08, 3),
    (0x0015, "control changes", 0x10, 4),
    (0x001f, "Ns changes", 0x20, 5),
    (0x0041, "counter inc.", 0x80, 7),
];

static DATA_COLUMNS: &[(u16, &str, ScalarType)] = &[
    (0x0004, "time/s", F64),
    (0x0005, "control/V/mA", F32),
    (0x0006, "Ewe/V", F32),
    (0x0007, "dq/mA.h", F64),
    (0x0008, "I/mA", F32),
    (0x0009, "Ece/V", F32),
    (0x000b, "<I>/mA", F64),
    (0x000d, "(Q-Qo)/mA.h", F64),
    (0x0010, "Analog IN 1/V", F32),
    (0x0011, "Analog IN 2/V", F32),
    (0x0013, "control/V", F32),
    (0x0014, "control/mA", F32),
    (0x0017, "dQ/mA.h", F64),
    (0x0018, "cycle number", F64),
    (0x0020, "freq/Hz", F32),
    (0x0021, "|Ewe|/V", F32),
    (0x0022, "|I|/A", F32),
    (0x0023, "Phase(Z)/deg", F32),
    (0x0024, "|Z|/Ohm", F32),
    (0x0025, "Re(Z)/Ohm", F32),
    (0x0026, "-Im(Z)/Ohm", F32),
    (0x0027, "I Range", U16),
    (0x0046, "P/W", F32),
    (0x004a, "Energy/W.h", F64),
    (0x004b, "Analog OUT/V", F32),
    (0x004c, "<I>/mA", F32),
    (0x004d, "<Ewe>/V", F32),
    (0x004e, "Cs-2/µF-2", F32),
    (0x0060, "|Ece|/V", F32),
    (0x0062, "Phase(Zce)/deg", F32),
    (0x0063, "|Zce|/Ohm", F32),
    (0x0064, "Re(Zce)/Ohm", F32),
    (0x0065, "-Im(Zce)/Ohm", F32),
    (0x007b, "Energy charge/W.h", F64),
    (0x007c, "Energy discharge/W.h", F64),
    (0x007d, "Capacitance charge/µF", F64),
    (0x007e, "Capacitance discharge/µF", F64),
    (0x0083, "Ns", U16),
    (0x00a3, "|Estack|/V", F32),
    (0x00a8, "Rcmp/Ohm", F32),
    (0x00a9, "Cs/µF", F32),
    (0x00ac, "Cp/µF", F32),
    (0x00ad, "Cp-2/µF-2", F32),
    (0x00ae, "<Ewe>/V", F32),
    (0x00f1, "|E1|/V", F32),
    (0x00f2, "|E2|/V", F32),
    (0x010f, "Phase(Z1) / deg", F32),
    (0x0110, "Phase(Z2) / deg", F32),
    (0x012d, "|Z1|/Ohm", F32),
    (0x012e, "|Z2|/Ohm", F32),
    (0x014b, "Re(Z1)/Ohm", F32),
    (0x014c, "Re(Z2)/Ohm", F32),
    (0x0169, "-Im(Z1)/Ohm", F32),
    (0x016a, "-Im(Z2)/Ohm", F32),
    (0x0187, "<E1>/V", F32),
    (0x0188, "<E2>/V", F32),
    (0x01a6, "Phase(Zstack)/deg", F32),
    (0x01a7, "|Zstack|/Ohm", F32),
    (0x01a8, "Re(Zstack)/Ohm", F32),
    (0x01a9, "-Im(Zstack)/Ohm", F32),
    (0x01aa, "<Estack>/V", F32),
    (0x01ae, "Phase(Zwe-ce)/deg", F32),
    (0x01af, "|Zwe-ce|/Ohm", F32),
    (0x01b0, "Re(Zwe-ce)/Ohm", F32),
    (0x01b1, "-Im(Zwe-ce)/Ohm", F32),
    (0x01b2, "(Q-Qo)/C", F32),
    (0x01b3, "dQ/C", F32),
    (0x01b9, "<Ece>/V", F32),
    (0x01ce, "Temperature/°C", F32),
    (0x01d3, "Q charge/discharge/mA.h", F64),
    (0x01d4, "half cycle", U32),
    (0x01d5, "z cycle", U32),
    (0x01d7, "<Ece>/V", F32),
    (0x01d9, "THD Ewe/%", F32),
    (0x01da, "THD I/%", F32),
    (0x01dc, "NSD Ewe/%", F32),
    (0x01dd, "NSD I/%", F32),
    (0x01df, "NSR Ewe/%", F32),
    (0x01e0, "NSR I/%", F32),
    (0x01e6, "|Ewe h2|/V", F32),
    (0x01e7, "|Ewe h3|/V", F32),
    (0x01e8, "|Ewe h4|/V", F32),
    (0x01e9, "|Ewe h5|/V", F32),
    (0x01ea, "|Ewe h6|/V", F32),
    (0x01eb, "|Ewe h7|/V", F32),
    (0x01ec, "|I h2|/A", F32),
    (0x01ed, "|I h3|/A", F32),
    (0x01ee, "|I h4|/A", F32),
    (0x01ef, "|I h5|/A", F32),
    (0x01f0, "|I h6|/A", F32),
    (0x01f1, "|I h7|/A", F32),
];
