use serde::Serialize;
use tracing::debug;

use super::error::MprError;
use super::layout;
use super::reader::MprReader;
use super::techniques::{self, Technique};
use super::value::{Field, Record};

/// Decoded settings module.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    pub technique_id: u8,
    pub technique: &'static str,
    /// Fixed-offset settings, present whatever the technique.
    pub fixed_fields: Record,
    /// Body offset at which the parameter block was found.
    pub param_offset: usize,
    /// One record per parameter sequence, in acquisition order.
    pub params: Vec<Record>,
}

/// Decode a settings module body.
///
/// # Errors
/// `UnknownTechnique` for an unregistered technique id,
/// `AmbiguousParameterOffset` unless exactly one candidate offset declares a
/// field count the technique knows, `TruncatedBuffer` when a field runs past the body.
pub fn decode_settings(reader: &MprReader<'_>) -> Result<Settings, MprError> {
    let technique_id = reader.read_u8(layout::TECHNIQUE_ID_OFFSET)?;
    let technique = techniques::lookup(technique_id)?;
    let fixed_fields = reader.read_table(layout::SETTINGS_FIELDS)?;

    let (param_offset, fields) = locate_params(reader, technique)?;
    let sequences =
        reader.read_u16_le(param_offset + layout::PARAM_SEQUENCE_COUNT_OFFSET)? as usize;
    debug!(
        technique = technique.name,
        param_offset, sequences, "reading parameter sequences"
    );
    let params = reader.read_records(
        param_offset + layout::PARAM_RECORDS_OFFSET,
        fields,
        sequences,
    )?;

    Ok(Settings {
        technique_id,
        technique: technique.name,
        fixed_fields,
        param_offset,
        params,
    })
}

/// Find the parameter block by probing every candidate offset.
///
/// A candidate matches when its declared field count selects a layout of the
/// technique; one lying past the end of the body is a miss. Exactly one
/// candidate must match.
pub fn locate_params(
    reader: &MprReader<'_>,
    technique: &Technique,
) -> Result<(usize, &'static [Field]), MprError> {
    let mut probed = Vec::with_capacity(layout::PARAM_OFFSET_CANDIDATES.len());
    let mut matches = Vec::new();
    for offset in layout::PARAM_OFFSET_CANDIDATES {
        let count = reader
            .read_u16_le(offset + layout::PARAM_FIELD_COUNT_OFFSET)
            .ok();
        probed.push((offset, count));
        if let Some(fields) = count.and_then(|count| technique.layout.resolve(count as usize)) {
            matches.push((offset, fields));
        }
    }

    match matches.as_slice() {
        [found] => Ok(*found),
        _ => Err(MprError::AmbiguousParameterOffset {
            technique: technique.name,
            probed,
            expected: technique.layout.cardinalities(),
            matched: matches.iter().map(|(offset, _)| *offset).collect(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::decode_settings;
    use crate::mpr::error::MprError;
    use crate::mpr::layout;
    use crate::mpr::reader::MprReader;
    use crate::mpr::value::Value;
    use encoding_rs::WINDOWS_1252;

    const OCV_FIELDS: usize = 8;

    fn body(technique: u8, len: usize) -> Vec<u8> {
        let mut body = vec![0u8; len];
        body[0] = technique;
        body
    }

    fn write_ocv_params(body: &mut [u8], offset: usize, field_count: u16, tr: &[f32]) {
        body[offset..offset + 2].copy_from_slice(&(tr.len() as u16).to_le_bytes());
        body[offset + 2..offset + 4].copy_from_slice(&field_count.to_le_bytes());
        let mut cursor = offset + 4;
        for value in tr {
            body[cursor..cursor + 4].copy_from_slice(&value.to_le_bytes());
            // tR, dER/dt, two unit bytes, then four more f32
            cursor += 4 + 4 + 1 + 1 + 4 * 4;
        }
    }

    #[test]
    fn decodes_fixed_fields_and_params() {
        let mut body = body(0x0b, 0x0600);
        let comment = b"hello";
        body[0x0007] = comment.len() as u8;
        body[0x0008..0x0008 + comment.len()].copy_from_slice(comment);
        body[0x0107..0x010b].copy_from_slice(&0.25f32.to_le_bytes());
        body[0x011b..0x011d].copy_from_slice(&2u16.to_le_bytes());
        body[0x0260] = 1;
        write_ocv_params(&mut body, 0x0572, OCV_FIELDS as u16, &[10.0, 20.0]);

        let settings = decode_settings(&MprReader::new(&body, WINDOWS_1252)).unwrap();
        assert_eq!(settings.technique, "OCV");
        assert_eq!(settings.technique_id, 0x0b);
        assert_eq!(
            settings.fixed_fields.get("comments"),
            Some(&Value::Text("hello".to_string()))
        );
        assert_eq!(
            settings.fixed_fields.get("active_material_mass"),
            Some(&Value::F32(0.25))
        );
        assert_eq!(
            settings.fixed_fields.get("e_transferred"),
            Some(&Value::U16(2))
        );
        assert_eq!(settings.fixed_fields.len(), layout::SETTINGS_FIELDS.len());
        assert_eq!(settings.param_offset, 0x0572);
        assert_eq!(settings.params.len(), 2);
        for record in &settings.params {
            assert_eq!(record.len(), OCV_FIELDS);
        }
        assert_eq!(settings.params[1].get("tR"), Some(&Value::F32(20.0)));
    }

    #[test]
    fn probes_later_candidate() {
        let mut body = body(0x0b, 0x1900);
        write_ocv_params(&mut body, 0x1846, OCV_FIELDS as u16, &[1.0]);
        let settings = decode_settings(&MprReader::new(&body, WINDOWS_1252)).unwrap();
        assert_eq!(settings.param_offset, 0x1846);
        assert_eq!(settings.params.len(), 1);
    }

    #[test]
    fn selects_variant_by_field_count() {
        let mut body = body(0x04, 0x1900);
        body[0x1845..0x1847].copy_from_slice(&0u16.to_le_bytes());
        body[0x1847..0x1849].copy_from_slice(&35u16.to_le_bytes());
        let settings = decode_settings(&MprReader::new(&body, WINDOWS_1252)).unwrap();
        assert_eq!(settings.technique, "GCPL");
        assert_eq!(settings.param_offset, 0x1845);
        assert!(settings.params.is_empty());
    }

    #[test]
    fn no_matching_count_is_an_error() {
        let mut body = body(0x0b, 0x0600);
        write_ocv_params(&mut body, 0x0572, 3, &[]);
        let err = decode_settings(&MprReader::new(&body, WINDOWS_1252)).unwrap_err();
        match err {
            MprError::AmbiguousParameterOffset {
                technique,
                probed,
                expected,
                matched,
            } => {
                assert_eq!(technique, "OCV");
                assert_eq!(expected, vec![OCV_FIELDS]);
                assert!(matched.is_empty());
                assert_eq!(probed[0], (0x0572, Some(3)));
                assert_eq!(probed[1], (0x1845, None));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn two_matching_candidates_are_ambiguous() {
        let mut body = body(0x0b, 0x1900);
        write_ocv_params(&mut body, 0x0572, OCV_FIELDS as u16, &[1.0]);
        write_ocv_params(&mut body, 0x1845, OCV_FIELDS as u16, &[2.0]);
        let err = decode_settings(&MprReader::new(&body, WINDOWS_1252)).unwrap_err();
        match err {
            MprError::AmbiguousParameterOffset {
                matched, probed, ..
            } => {
                assert_eq!(matched, vec![0x0572, 0x1845]);
                assert_eq!(probed.len(), 3);
                assert_eq!(probed[0], (0x0572, Some(OCV_FIELDS as u16)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_technique() {
        let body = body(0xee, 0x0600);
        let err = decode_settings(&MprReader::new(&body, WINDOWS_1252)).unwrap_err();
        assert!(matches!(err, MprError::UnknownTechnique { id: 0xee }));
    }

    #[test]
    fn truncated_parameter_block() {
        let mut body = body(0x0b, 0x0580);
        write_ocv_params(&mut body, 0x0572, OCV_FIELDS as u16, &[]);
        body[0x0572..0x0574].copy_from_slice(&4u16.to_le_bytes());
        let err = decode_settings(&MprReader::new(&body, WINDOWS_1252)).unwrap_err();
        assert!(matches!(err, MprError::TruncatedBuffer { .. }));
    }
}
