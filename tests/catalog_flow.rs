use fengshui::core::data::{ELEMENT_TYPE_TAG, ElementPatch, FormationPatch};
use fengshui::{
    AppError, Auspiciousness, Catalog, Category, JsonFileStorage, Polarity, Record, RecordFields,
    RecordPatch,
};
use std::path::Path;

fn open(dir: &Path) -> Catalog {
    let mut catalog = Catalog::new(JsonFileStorage::new(dir.join("catalog.json")));
    catalog.load().unwrap();
    catalog
}

fn gate(name: &str) -> Record {
    RecordFields {
        name: Some(name.to_string()),
        element: Some("Thổ".to_string()),
        ..Default::default()
    }
    .into_record(Category::Gate)
}

#[test]
fn create_appends_exactly_once_in_every_category() {
    let dir = tempfile::tempdir().unwrap();
    let mut catalog = open(dir.path());

    for category in Category::ALL {
        let first = RecordFields {
            name: Some("first".to_string()),
            ..Default::default()
        }
        .into_record(category);
        let second = RecordFields {
            name: Some("second".to_string()),
            ..Default::default()
        }
        .into_record(category);

        catalog.create(first).unwrap();
        catalog.create(second.clone()).unwrap();

        let records = catalog.records(category);
        assert_eq!(records.last(), Some(&second));
        assert_eq!(records.iter().filter(|r| r.id() == second.id()).count(), 1);
    }
}

#[test]
fn update_with_absent_id_leaves_sequence_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let mut catalog = open(dir.path());
    catalog.create(gate("Sinh Môn")).unwrap();
    let before = catalog.records(Category::Gate);

    let patch = RecordPatch::Gate(ElementPatch {
        name: Some("Tử Môn".to_string()),
        ..Default::default()
    });
    assert!(!catalog.update(Category::Gate, "no-such-id", &patch).unwrap());
    assert_eq!(catalog.records(Category::Gate), before);
}

#[test]
fn delete_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let mut catalog = open(dir.path());
    let record = gate("Đỗ Môn");
    let id = record.id().to_string();
    catalog.create(record).unwrap();
    catalog.create(gate("Thương Môn")).unwrap();

    assert!(catalog.delete(Category::Gate, &id).unwrap().is_some());
    let after_first = catalog.store().clone();
    assert!(catalog.delete(Category::Gate, &id).unwrap().is_none());
    assert_eq!(catalog.store(), &after_first);
}

#[test]
fn persist_then_load_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let mut catalog = open(dir.path());
    catalog.create(gate("Khai Môn")).unwrap();
    catalog
        .create(
            RecordFields {
                name: Some("Thiên Nhuế".to_string()),
                yin_yang: Some(Polarity::Am),
                description: Some("Bệnh tinh".to_string()),
                ..Default::default()
            }
            .into_record(Category::Star),
        )
        .unwrap();
    catalog
        .create(
            RecordFields {
                name: Some("Kỳ Nghi Tương Hợp".to_string()),
                auspiciousness: Some(Auspiciousness::Cat),
                ..Default::default()
            }
            .into_record(Category::Formation),
        )
        .unwrap();
    catalog.persist().unwrap();

    let reloaded = open(dir.path());
    assert_eq!(reloaded.store(), catalog.store());
}

#[test]
fn import_maps_legacy_yin_to_am() {
    let dir = tempfile::tempdir().unwrap();
    let mut catalog = open(dir.path());
    catalog
        .import(r#"{"CửuTinh":[{"id":"1","yinYang":"Yin"}]}"#)
        .unwrap();

    let Some(Record::Star(star)) = catalog.find(Category::Star, "1") else {
        panic!("imported star missing");
    };
    assert_eq!(star.element_type, ELEMENT_TYPE_TAG);
    assert_eq!(star.yin_yang, Polarity::Am);
}

#[test]
fn import_maps_other_polarity_to_duong() {
    let dir = tempfile::tempdir().unwrap();
    let mut catalog = open(dir.path());
    catalog
        .import(r#"{"CửuTinh":[{"id":"1","yinYang":"Unknown"}]}"#)
        .unwrap();

    let Some(Record::Star(star)) = catalog.find(Category::Star, "1") else {
        panic!("imported star missing");
    };
    assert_eq!(star.yin_yang, Polarity::Duong);
}

#[test]
fn import_maps_auspiciousness() {
    let dir = tempfile::tempdir().unwrap();
    let mut catalog = open(dir.path());

    catalog
        .import(r#"{"CáchCục":[{"id":"1","auspiciousness":"Inauspicious"}]}"#)
        .unwrap();
    let Some(Record::Formation(formation)) = catalog.find(Category::Formation, "1") else {
        panic!("imported formation missing");
    };
    assert_eq!(formation.auspiciousness, Auspiciousness::Hung);

    catalog
        .import(r#"{"CáchCục":[{"id":"1","auspiciousness":"Weird"}]}"#)
        .unwrap();
    let Some(Record::Formation(formation)) = catalog.find(Category::Formation, "1") else {
        panic!("imported formation missing");
    };
    assert_eq!(formation.auspiciousness, Auspiciousness::TuyThuoc);
}

#[test]
fn malformed_import_keeps_prior_state_and_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut catalog = open(dir.path());
    catalog.create(gate("Cảnh Môn")).unwrap();
    let before = catalog.store().clone();
    let file_before = std::fs::read_to_string(dir.path().join("catalog.json")).unwrap();

    let err = catalog.import("{not json").unwrap_err();
    assert!(matches!(err, AppError::ImportParse(_)));
    assert_eq!(catalog.store(), &before);
    assert_eq!(
        std::fs::read_to_string(dir.path().join("catalog.json")).unwrap(),
        file_before
    );
}

#[test]
fn imported_data_survives_reload_with_unknown_fields() {
    let dir = tempfile::tempdir().unwrap();
    let mut catalog = open(dir.path());
    catalog
        .import(
            r#"{
                "BátThần": [{"id": "s1", "name": "Huyền Vũ", "palace": 1}],
                "CáchCục": [{"id": "f1", "name": "Tam Kỳ Đắc Sử", "auspiciousness": "Auspicious"}]
            }"#,
        )
        .unwrap();

    let reloaded = open(dir.path());
    let Some(Record::Spirit(spirit)) = reloaded.find(Category::Spirit, "s1") else {
        panic!("imported spirit missing");
    };
    assert_eq!(spirit.extra.get("palace"), Some(&serde_json::json!(1)));
    assert_eq!(reloaded.store(), catalog.store());
}

#[test]
fn corrupt_data_file_reports_decode_error_and_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("catalog.json"), "{\"BátMôn\": [{]").unwrap();

    let mut catalog = Catalog::new(JsonFileStorage::new(dir.path().join("catalog.json")));
    assert!(matches!(catalog.load(), Err(AppError::Decode(_))));
    assert!(catalog.store().is_empty());
}

#[test]
fn failed_persist_keeps_update_in_memory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    let mut catalog = open(dir.path());
    let record = RecordFields {
        name: Some("Long Độn".to_string()),
        ..Default::default()
    }
    .into_record(Category::Formation);
    let id = record.id().to_string();
    catalog.create(record).unwrap();

    // Swap the data file for a directory so the next write fails
    std::fs::remove_file(&path).unwrap();
    std::fs::create_dir(&path).unwrap();

    let patch = RecordPatch::Formation(FormationPatch {
        auspiciousness: Some(Auspiciousness::Hung),
        ..Default::default()
    });
    let err = catalog.update(Category::Formation, &id, &patch).unwrap_err();
    assert!(matches!(err, AppError::Write(_)));

    let Some(Record::Formation(formation)) = catalog.find(Category::Formation, &id) else {
        panic!("formation missing");
    };
    assert_eq!(formation.auspiciousness, Auspiciousness::Hung);
}
