//! Snapshot tests for the generated fob header.
//!
//! The header is consumed verbatim by the firmware preprocessor, so the
//! rendered text is compared byte-for-byte against fixture files.

use std::path::Path;

use pretty_assertions::assert_eq;

use fobgen::header::{DeviceMode, FobHeader, Pairing, emit_header};
use fobgen::secrets::SecretStore;

const FIXTURES: &str = "tests/fixtures/headers";

fn fixture(name: &str) -> String {
    std::fs::read_to_string(Path::new(FIXTURES).join(name)).unwrap()
}

#[test]
fn snapshot_unpaired_header() {
    assert_eq!(FobHeader::unpaired().render(), fixture("expected_unpaired.h"));
}

#[test]
fn snapshot_paired_header() {
    let store_path = Path::new(FIXTURES).join("secrets.json");
    let store = SecretStore::open(&store_path).unwrap();

    let header = FobHeader::paired(7, "1234", &store, &store_path).unwrap();

    assert_eq!(header.render(), fixture("expected_paired.h"));
}

#[test]
fn snapshot_paired_header_written_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let header_path = dir.path().join("secrets.h");
    let mode = DeviceMode::Paired(Pairing {
        car_id: 7,
        pin: "1234".to_string(),
        secret_file: Path::new(FIXTURES).join("secrets.json"),
    });

    emit_header(&mode, &header_path).unwrap();

    assert_eq!(
        std::fs::read_to_string(&header_path).unwrap(),
        fixture("expected_paired.h")
    );
}

#[test]
fn snapshot_unpaired_overwrites_previous_header() {
    let dir = tempfile::tempdir().unwrap();
    let header_path = dir.path().join("secrets.h");
    std::fs::write(&header_path, fixture("expected_paired.h")).unwrap();

    emit_header(&DeviceMode::Unpaired, &header_path).unwrap();

    assert_eq!(
        std::fs::read_to_string(&header_path).unwrap(),
        fixture("expected_unpaired.h")
    );
}
