//! Session input (JSONL) and result output (pretty JSON)

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::record::ContractRecord;
use crate::error::StorageError;
use crate::types::{Sample, ScoreResult};

/// Result file contents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredResult {
    pub result: ScoreResult,
    pub record: ContractRecord,
}

#[derive(Serialize)]
struct StoredRef<'a> {
    result: &'a ScoreResult,
    record: &'a ContractRecord,
}

/// Parse newline-delimited samples; blank and corrupt lines are skipped
pub fn parse_samples(text: &str) -> Vec<Sample> {
    let mut skipped = 0usize;
    let samples: Vec<Sample> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| match serde_json::from_str::<Sample>(line) {
            Ok(sample) => Some(sample),
            Err(_) => {
                skipped += 1;
                None
            }
        })
        .collect();

    if skipped > 0 {
        tracing::warn!(target: "storage", skipped, kept = samples.len(), "corrupt session lines skipped");
    }
    samples
}

/// Load a session file
pub fn load_samples(path: impl AsRef<Path>) -> Result<Vec<Sample>, StorageError> {
    let text = std::fs::read_to_string(path)?;
    Ok(parse_samples(&text))
}

/// Write `result_<UTC timestamp>_<contract id>.json` into `dir`, returning its path
pub fn save_result(
    result: &ScoreResult,
    record: &ContractRecord,
    dir: impl AsRef<Path>,
) -> Result<PathBuf, StorageError> {
    let dir = dir.as_ref();
    let filename = format!(
        "result_{}_{}.json",
        result.computed_at.format("%Y%m%d_%H%M%S"),
        record.id
    );
    let path = dir.join(filename);

    let json = serde_json::to_string_pretty(&StoredRef { result, record })?;
    std::fs::create_dir_all(dir)?;
    std::fs::write(&path, json)?;

    tracing::debug!(target: "storage", path = %path.display(), "result saved");
    Ok(path)
}

/// Load a result file written by `save_result`
pub fn load_result(path: impl AsRef<Path>) -> Result<StoredResult, StorageError> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::analyzer::Analyzer;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const SESSION: &str = r#"{"TIMESTAMP": 0.0, "SCL0": 210.5, "SCL1": 300, "SLIDER0": 512, "SLIDER1": 500, "RELAZIONI_P0": ["FAMILY"], "RELAZIONI_P1": []}

{"TIMESTAMP": 0.1, "SCL0": 211.0
not json at all
{"TIMESTAMP": 0.2, "SCL0": 212.0, "SCL1": 301}
"#;

    #[test]
    fn test_parse_skips_blank_and_corrupt() {
        let samples = parse_samples(SESSION);
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].slider0, 512);
        assert_eq!(samples[0].relations0, vec!["FAMILY".to_string()]);
        assert_eq!(samples[1].timestamp, 0.2);
        assert_eq!(samples[1].slider0, 0);
        assert!(samples[1].relations1.is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_samples("/definitely/not/here.jsonl").unwrap_err();
        assert!(matches!(err, StorageError::Io(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.jsonl");
        std::fs::write(&path, SESSION).unwrap();

        assert_eq!(load_samples(&path).unwrap().len(), 2);
    }

    #[test]
    fn test_save_and_load_result() {
        let samples = parse_samples(SESSION);
        let mut rng = StdRng::seed_from_u64(21);
        let result = Analyzer::default().analyze_with_rng(&samples, &mut rng).unwrap();
        let record = ContractRecord::build(&result, crate::RECORD_BASE_URL, &mut rng);

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("results");
        let path = save_result(&result, &record, &out).unwrap();

        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("result_"));
        assert!(name.ends_with(&format!("_{}.json", record.id)));

        let stored = load_result(&path).unwrap();
        assert_eq!(stored.record, record);
        assert_eq!(stored.result.compatibility, result.compatibility);
        assert_eq!(stored.result.session_digest, result.session_digest);
    }
}
