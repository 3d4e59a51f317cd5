mod common;

use std::{sync::Arc, thread};

use foodlens::{analyze, Strategy};

#[test]
fn snack_label_yields_additives_in_label_order() {
    let index = common::index();
    let records = analyze(
        &index,
        "İçindekiler: Mısır irmiği, palm yağı, E621, E631, tuz.",
    );
    let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["E621", "E631"]);
    assert!(records.iter().all(|r| r.match_strategy == Strategy::Exact));
    assert!(records.iter().all(|r| r.match_score == 100));
}

#[test]
fn misspelled_preservative_matches_lexically() {
    let index = common::index();
    let records = analyze(&index, "icindekiler: potesyum sorbat.");
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.id, "E202");
    assert_eq!(record.match_strategy, Strategy::Lexical);
    assert!(record.match_score < 100);
    assert!(f64::from(record.match_score) >= index.config().lexical_high_threshold);
    assert_eq!(record.detected_keyword, "potasyum sorbat");
}

#[test]
fn repeated_substance_is_reported_once_at_first_position() {
    let index = common::index();
    let records = analyze(
        &index,
        "Ingredients: potasyum sorbat, süt, potesyum sorbat",
    );
    let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["E202", "milk"]);
    assert_eq!(records[0].match_strategy, Strategy::Exact);

    let reversed = analyze(&index, "Ingredients: potesyum sorbat, süt, potasyum sorbat");
    assert_eq!(reversed.len(), 2);
    assert_eq!(reversed[0].id, "E202");
    assert_eq!(reversed[0].match_strategy, Strategy::Lexical);
}

#[test]
fn hyphenated_and_bracketed_codes_hit_exact_tier() {
    let index = common::index();
    let records = analyze(&index, "Aroma verici (E-621), koruyucu [e 202]");
    let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["E621", "E202"]);
    assert!(records.iter().all(|r| r.match_strategy == Strategy::Exact));
}

#[test]
fn degenerate_inputs_return_empty_results() {
    let index = common::index();
    for text in ["", "   ", "\n\n", "İçindekiler:", "a, b, c", "((((", "...."] {
        assert!(analyze(&index, text).is_empty(), "{text:?}");
    }
}

#[test]
fn display_name_falls_back_to_secondary() {
    let index = foodlens::DictionaryIndex::build(
        vec![foodlens::SubstanceEntry::new("E330", "").with_secondary_name("Citric acid")],
        foodlens::MatchConfig::default(),
    )
    .unwrap();
    let records = analyze(&index, "Ingredients: water, citric acid");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "Citric acid");
}

#[test]
fn index_is_shared_across_threads() {
    let index = Arc::new(common::index());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let index = Arc::clone(&index);
            thread::spawn(move || analyze(&index, "İçindekiler: E621, süt, E631."))
        })
        .collect();
    for handle in handles {
        let records = handle.join().unwrap();
        let ids: Vec<_> = records.iter().map(|r| r.id.clone()).collect();
        assert_eq!(ids, ["E621", "milk", "E631"]);
    }
}

#[test]
fn result_record_shape() {
    let index = common::index();
    let records = analyze(&index, "İçindekiler: E621.");
    insta::assert_json_snapshot!(records[0], @r###"
    {
      "id": "E621",
      "name": "Monosodyum glutamat",
      "category": "additive",
      "risk_level": "Medium",
      "dietary_status": "Unknown",
      "description": "",
      "match_score": 100,
      "match_strategy": "exact",
      "detected_keyword": "e621"
    }
    "###);
}
