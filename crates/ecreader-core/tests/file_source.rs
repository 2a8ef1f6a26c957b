mod common;

use std::fs;

use common::{MprBuilder, loop_body};
use ecreader_core::{DecodeError, SourceError, decode_mpr_file};
use tempfile::TempDir;

#[test]
fn decodes_from_path_and_records_input() {
    let temp = TempDir::new().expect("tempdir");
    let path = temp.path().join("run.mpr");
    let bytes = MprBuilder::new()
        .module(b"VMP loop  ", 0, &loop_body(&[0, 4, 9]))
        .build();
    fs::write(&path, &bytes).expect("write fixture");

    let file = decode_mpr_file(&path).expect("decode");
    let input = file.input.as_ref().expect("input info");
    assert_eq!(input.bytes, bytes.len() as u64);
    assert!(input.path.ends_with("run.mpr"));
    assert_eq!(file.loops().map(|l| l.indices.len()), Some(3));
}

#[test]
fn missing_file_is_a_source_error() {
    let temp = TempDir::new().expect("tempdir");
    let err = decode_mpr_file(&temp.path().join("missing.mpr")).unwrap_err();
    assert!(matches!(err, DecodeError::Source(SourceError::Io { .. })));
}

#[test]
fn truncated_file_is_rejected() {
    let temp = TempDir::new().expect("tempdir");
    let path = temp.path().join("truncated.mpr");
    fs::write(&path, b"BIO-LOGIC MODULAR").expect("write fixture");

    let err = decode_mpr_file(&path).unwrap_err();
    assert!(matches!(err, DecodeError::Mpr(_)));
    assert!(err.to_string().contains("bad magic"));
}
