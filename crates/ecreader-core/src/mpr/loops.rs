use serde::Serialize;

use super::error::MprError;
use super::layout;
use super::reader::MprReader;

/// Decoded loop module: data row indices at which each loop iteration starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Loop {
    pub index_count: u32,
    pub indices: Vec<u32>,
}

impl Loop {
    /// Half-open row ranges between consecutive loop boundaries.
    pub fn ranges(&self) -> Vec<std::ops::Range<u32>> {
        self.indices
            .windows(2)
            .map(|pair| pair[0]..pair[1])
            .collect()
    }
}

pub fn decode_loop(reader: &MprReader<'_>) -> Result<Loop, MprError> {
    let index_count = reader.read_u32_le(layout::LOOP_COUNT_OFFSET)?;
    let indices = reader.read_u32_array(layout::LOOP_INDICES_OFFSET, index_count as usize)?;
    Ok(Loop {
        index_count,
        indices,
    })
}
