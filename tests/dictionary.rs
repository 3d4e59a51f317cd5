use std::io::Write;
use std::path::Path;

use foodlens::{analyze, build_index, DictionaryError, MatchConfig, Strategy};
use tempfile::NamedTempFile;

const WRAPPED: &str = r#"{
  "metadata": {"count": 4, "strategy": "Multi-Language Fallback"},
  "data": [
    {"id": "E102", "name": "Tartrazin", "type": "additive", "risk_level": "High",
     "note": "Hiperaktivite riski (Tartrazin).", "keywords": ["e102", "e-102", "tartrazine"]},
    {"id": "E330", "name_tr": "Sitrik asit", "name_en": "Citric acid", "type": "additive",
     "risk_level": "Unknown", "dietary_status": "Vegan", "keywords": ["sitrik asit"]},
    {"id": "en:broken", "name_tr": "", "name_en": ""},
    "not an object"
  ]
}"#;

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn wrapped_document_builds_and_counts_skips() {
    let file = write_temp(WRAPPED);
    let index = build_index(file.path(), MatchConfig::default(), None).unwrap();
    let stats = index.stats();
    assert_eq!(stats.entries, 2);
    assert_eq!(stats.skipped_entries, 2);
    assert_eq!(stats.collisions, 0);

    let records = analyze(&index, "icindekiler: sitrik asid, e-102 tartrazin.");
    let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["E330", "E102"]);
    assert_eq!(records[0].match_strategy, Strategy::Lexical);
    assert_eq!(records[0].dietary_status, "Vegan");
    assert_eq!(records[1].description, "Hiperaktivite riski (Tartrazin).");
}

#[test]
fn bare_array_document_is_accepted() {
    let file = write_temp(r#"[{"id": "milk", "name_en": "Milk", "type": "allergen"}]"#);
    let index = build_index(file.path(), MatchConfig::default(), None).unwrap();
    assert_eq!(analyze(&index, "Ingredients: MILK")[0].id, "milk");
}

#[test]
fn missing_file_is_unavailable() {
    let err = build_index(
        Path::new("/definitely/not/here.json"),
        MatchConfig::default(),
        None,
    )
    .unwrap_err();
    assert!(matches!(err, DictionaryError::Unavailable { .. }));
}

#[test]
fn invalid_json_is_malformed() {
    let file = write_temp("{not json");
    let err = build_index(file.path(), MatchConfig::default(), None).unwrap_err();
    assert!(matches!(err, DictionaryError::Malformed(_)));
}

#[test]
fn object_without_data_is_rejected() {
    let file = write_temp(r#"{"items": []}"#);
    let err = build_index(file.path(), MatchConfig::default(), None).unwrap_err();
    assert!(matches!(err, DictionaryError::UnsupportedShape));
}

#[test]
fn invalid_config_is_rejected_at_build() {
    let file = write_temp("[]");
    let config = MatchConfig {
        semantic_threshold: 140.0,
        ..MatchConfig::default()
    };
    let err = build_index(file.path(), config, None).unwrap_err();
    assert!(matches!(err, DictionaryError::Config(_)));
}
