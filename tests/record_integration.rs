//! Integration tests for session files, result files, config files and the
//! contract record

use alua::core::{load_result, load_samples, save_result, Analyzer, ContractRecord};
use alua::{AnalysisConfig, ConfigError};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Write;

fn write_session(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("session.jsonl");
    let mut file = std::fs::File::create(&path).unwrap();

    writeln!(
        file,
        r#"{{"TIMESTAMP": 0.0, "SCL0": 200, "SCL1": 300, "SLIDER0": 400, "SLIDER1": 420, "RELAZIONI_P0": ["AMICALE"], "RELAZIONI_P1": ["FRIENDSHIP", "LAVORATIVA"]}}"#
    )
    .unwrap();
    writeln!(file, "{{ broken").unwrap();
    writeln!(file).unwrap();
    for i in 0..=80 {
        let t = 6.0 + i as f64 * 0.5;
        let scl0 = if i <= 40 { 200.0 } else { 215.0 };
        writeln!(file, r#"{{"TIMESTAMP": {t}, "SCL0": {scl0}, "SCL1": 300.0}}"#).unwrap();
    }
    path
}

#[test]
fn test_file_to_record_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let session = load_samples(write_session(dir.path())).unwrap();
    assert_eq!(session.len(), 82);

    let mut rng = StdRng::seed_from_u64(5);
    let analyzer = Analyzer::default();
    let result = analyzer.analyze_with_rng(&session, &mut rng).unwrap();
    let record = ContractRecord::build(&result, &analyzer.config().record_base_url, &mut rng);

    assert_eq!(result.weak_link.id, 0);
    assert!(record.link.starts_with("https://alua-gamma.vercel.app/?scl0="));
    assert!(record.link.contains("&btn0=3&btn1=2%2C3&"));
    assert!(record.link.contains("&sl0=400&sl1=420&"));
    assert!(record.link.contains("&bad=0&"));
    assert!(record.link.ends_with(&format!("&id={}", record.id)));

    let out = dir.path().join("results");
    let path = save_result(&result, &record, &out).unwrap();
    let stored = load_result(&path).unwrap();

    assert_eq!(stored.record, record);
    assert_eq!(stored.result.arousal, result.arousal);
    assert_eq!(stored.result.snapshot, result.snapshot);
    assert_eq!(stored.result.computed_at, result.computed_at);
}

#[test]
fn test_same_seed_same_record() {
    let dir = tempfile::tempdir().unwrap();
    let session = load_samples(write_session(dir.path())).unwrap();
    let analyzer = Analyzer::default();

    let build = |seed| {
        let mut rng = StdRng::seed_from_u64(seed);
        let result = analyzer.analyze_with_rng(&session, &mut rng).unwrap();
        ContractRecord::build(&result, "https://example.test/", &mut rng)
    };
    assert_eq!(build(3).id, build(3).id);
    assert_ne!(build(3).id, build(4).id);
}

#[test]
fn test_config_file_overrides_subset() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"arousal_threshold": 0.10, "empty_buttons_score": 0.5}"#).unwrap();

    let config = AnalysisConfig::from_json_file(&path).unwrap();
    assert_eq!(config.arousal_threshold, 0.10);
    assert_eq!(config.empty_buttons_score, 0.5);
    assert_eq!(config.dead_floor, 10.0);

    // 7.5% rise no longer counts
    let session = load_samples(write_session(dir.path())).unwrap();
    let result = Analyzer::new(config)
        .analyze_with_rng(&session, &mut StdRng::seed_from_u64(0))
        .unwrap();
    assert!(!result.arousal.persona0.arousal);
    assert_eq!(result.weak_link.id, -1);
}

#[test]
fn test_invalid_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"weight_scl": 0.9}"#).unwrap();

    let err = AnalysisConfig::from_json_file(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));

    std::fs::write(&path, "not json").unwrap();
    let err = AnalysisConfig::from_json_file(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}
