//! End-to-end tests over the public API: raw records through
//! supervision to the training-data exports.

use biosup::attrs::{registry, VocabularyStore};
use biosup::export::{export_mrc, render_bio, TagScheme};
use biosup::record::{PersonRecord, RawValue};
use biosup::supervise::{Supervisor, SupervisorConfig};
use biosup::vocab::{collect_values, VocabConfig, Vocabulary};

fn sample_record() -> PersonRecord {
    PersonRecord {
        name: "张三".to_string(),
        summary: Some("张三，男，汉族，1990年3月生于北京。".to_string()),
        paragraphs: vec!["毕业院校：清华大学".to_string()],
        infobox: [
            ("性别".to_string(), RawValue::from("男")),
            ("民族".to_string(), RawValue::from("汉族")),
            ("出生日期".to_string(), RawValue::from("1990年3月")),
        ]
        .into_iter()
        .collect(),
    }
}

fn supervisor(min_attributes: usize) -> Supervisor {
    Supervisor::new(
        registry(&VocabularyStore::default()),
        SupervisorConfig {
            min_attributes,
            infer_from_text: false,
        },
    )
}

#[test]
fn supervise_then_export_bio() {
    let report = supervisor(2).run(&[sample_record()]);
    assert_eq!(report.records.len(), 1);

    let labeled = &report.records[0];
    assert_eq!(labeled.infobox["性别"], RawValue::Scalar("男".to_string()));
    assert_eq!(labeled.infobox["民族"], RawValue::Scalar("汉族".to_string()));
    assert_eq!(
        labeled.infobox["出生日期"],
        RawValue::Scalar("1990年3月".to_string())
    );

    let doc = render_bio(&report.records, TagScheme::Bioes);
    assert!(doc.contains("男\tS-性别"));
    assert!(doc.contains("汉\tB-民族"));
    assert!(doc.contains("族\tE-民族"));
    assert!(doc.contains("张\tO"));
    assert!(doc.ends_with('\n'));
}

#[test]
fn supervise_then_export_mrc() {
    let report = supervisor(2).run(&[sample_record()]);
    let split = export_mrc(&report.records, TagScheme::Bioes, 1);
    let all = format!("{}\n{}\n{}", split.train, split.test, split.dev);
    assert!(all.contains("该人物的性别是什么?"));
    assert!(all.contains("该人物的民族是什么?"));
}

#[test]
fn below_threshold_records_are_dropped() {
    let mut record = sample_record();
    record.infobox.remove("民族");
    record.infobox.remove("出生日期");
    let report = supervisor(2).run(&[record]);
    assert!(report.records.is_empty());
}

#[test]
fn stats_track_match_sources() {
    let report = supervisor(1).run(&[sample_record()]);
    let gender = report
        .stats
        .iter()
        .find(|s| s.attribute == "性别")
        .unwrap();
    assert_eq!(gender.recognized, 1);
    assert_eq!(gender.summary_matches, 1);
    assert_eq!(gender.paragraph_matches, 0);
}

#[test]
fn vocabulary_cache_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nation.json");
    let records = vec![sample_record(), sample_record()];
    let pattern = regex::Regex::new("民族").unwrap();

    let built = Vocabulary::load_or_build(
        &path,
        || collect_values(&records, &pattern),
        VocabConfig::default(),
    )
    .unwrap();
    assert!(built.contains("汉族"));
    assert!(path.exists());

    // Second call hits the cache, not the builder.
    let reloaded = Vocabulary::load_or_build(&path, Vec::new, VocabConfig::default()).unwrap();
    assert_eq!(reloaded.entries(), built.entries());
}

#[test]
fn eval_records_accept_predict_field_name() {
    let json = r#"[{"gold":{"性别":"男"},"predict":{"性别":"男"}}]"#;
    let records: Vec<biosup::EvalRecord> = serde_json::from_str(json).unwrap();
    let report =
        biosup::Evaluator::new(registry(&VocabularyStore::default())).evaluate(&records);
    assert_eq!(report.scores["性别"].right_count, 1);
}
