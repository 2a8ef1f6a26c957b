use serde::Serialize;
use time::{Duration, OffsetDateTime, PrimitiveDateTime, format_description::well_known::Rfc3339};

use super::error::MprError;
use super::layout;
use super::reader::MprReader;
use super::value::Record;

/// Decoded log module.
///
/// The format does not flag absent fields; values not meaningful for a
/// given run come back as whatever bytes sit at their offsets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Log {
    pub fields: Record,
}

impl Log {
    /// Acquisition start as RFC3339, from the OLE automation date field.
    pub fn started_at(&self) -> Option<String> {
        let days = self.fields.get("ole_timestamp")?.as_f64()?;
        ole_date_to_rfc3339(days)
    }
}

pub fn decode_log(reader: &MprReader<'_>) -> Result<Log, MprError> {
    let fields = reader.read_table(layout::LOG_FIELDS)?;
    Ok(Log { fields })
}

/// Convert an OLE automation date (fractional days since 1899-12-30) to
/// RFC3339. The stored value carries no zone and is rendered as UTC.
pub fn ole_date_to_rfc3339(days: f64) -> Option<String> {
    if !days.is_finite() {
        return None;
    }
    let epoch = PrimitiveDateTime::new(
        time::Date::from_calendar_date(1899, time::Month::December, 30).ok()?,
        time::Time::MIDNIGHT,
    )
    .assume_utc();
    let millis = (days * 86_400_000.0).round();
    if millis.abs() > i64::MAX as f64 {
        return None;
    }
    let at: OffsetDateTime = epoch.checked_add(Duration::milliseconds(millis as i64))?;
    at.format(&Rfc3339).ok()
}

#[cfg(test)]
mod tests {
    use super::{decode_log, ole_date_to_rfc3339};
    use crate::mpr::error::MprError;
    use crate::mpr::reader::MprReader;
    use crate::mpr::value::Value;
    use encoding_rs::WINDOWS_1252;

    fn pascal(body: &mut [u8], offset: usize, text: &[u8]) {
        body[offset] = text.len() as u8;
        body[offset + 1..offset + 1 + text.len()].copy_from_slice(text);
    }

    #[test]
    fn decodes_fixed_fields() {
        let mut body = vec![0u8; 0x0923];
        body[0x0009..0x000b].copy_from_slice(&3u16.to_le_bytes());
        body[0x0249..0x0251].copy_from_slice(&44197.5f64.to_le_bytes());
        pascal(&mut body, 0x0251, b"C:\\data\\run.mpr");
        pascal(&mut body, 0x03b7, b"11.36");
        body[0x0922] = 4;

        let log = decode_log(&MprReader::new(&body, WINDOWS_1252)).unwrap();
        assert_eq!(log.fields.get("channel_number"), Some(&Value::U16(3)));
        assert_eq!(
            log.fields.get("filename"),
            Some(&Value::Text("C:\\data\\run.mpr".to_string()))
        );
        assert_eq!(
            log.fields.get("ec_lab_version"),
            Some(&Value::Text("11.36".to_string()))
        );
        assert_eq!(log.fields.get("averaging_points"), Some(&Value::U8(4)));
        assert_eq!(log.started_at().as_deref(), Some("2021-01-01T12:00:00Z"));
    }

    #[test]
    fn short_body_is_truncated() {
        let body = vec![0u8; 0x0900];
        let err = decode_log(&MprReader::new(&body, WINDOWS_1252)).unwrap_err();
        assert!(matches!(
            err,
            MprError::TruncatedBuffer { offset: 0x0922, .. }
        ));
    }

    #[test]
    fn ole_dates() {
        assert_eq!(
            ole_date_to_rfc3339(25569.0).as_deref(),
            Some("1970-01-01T00:00:00Z")
        );
        assert_eq!(ole_date_to_rfc3339(f64::NAN), None);
    }
}
