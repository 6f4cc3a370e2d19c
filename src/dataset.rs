//! Per-domain JSONL readers, normalized to `(claim, label)` pairs.
//!
//! Records whose label does not map into {SUPPORTS, REFUTES} are dropped
//! silently; that is a filtering policy, not an error. Original file order is
//! preserved.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{CheckError, Result};
use crate::types::{ClaimCase, Label};

/// Checking task, which selects the claim file and its field layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Domain {
    /// Climate-change claims; label field is `claim_label`.
    Climate,
    /// Hate-speech detection claims; SciFact-style fields.
    Hsd,
    /// Public-health claims; SciFact-style fields.
    Health,
    /// Social-bias claims; SciFact-style fields.
    Sbic,
    /// COVID claims; labels use the SUPPORTED/REFUTED vocabulary.
    Covid,
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Domain::Climate => "climate",
            Domain::Hsd => "hsd",
            Domain::Health => "health",
            Domain::Sbic => "sbic",
            Domain::Covid => "covid",
        };
        write!(f, "{name}")
    }
}

impl Domain {
    pub fn claims_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(format!("{self}_claims.jsonl"))
    }
}

#[derive(Deserialize)]
struct ClimateRow {
    claim: String,
    claim_label: String,
}

#[derive(Deserialize)]
struct ScifactRow {
    claim: String,
    label: String,
}

fn extract_case(domain: Domain, line: &str) -> std::result::Result<(String, String), serde_json::Error> {
    match domain {
        Domain::Climate => {
            let row: ClimateRow = serde_json::from_str(line)?;
            Ok((row.claim, row.claim_label))
        }
        // covid shares the scifact field layout; only its label vocabulary
        // differs, and Label::from_raw absorbs that.
        Domain::Hsd | Domain::Health | Domain::Sbic | Domain::Covid => {
            let row: ScifactRow = serde_json::from_str(line)?;
            Ok((row.claim, row.label))
        }
    }
}

/// Read `{data_dir}/{domain}_claims.jsonl` and keep the two recognized
/// classes. Evidence sets are reserved and always `None` for now.
pub fn load_dataset(domain: Domain, data_dir: &Path) -> Result<Vec<ClaimCase>> {
    let path = domain.claims_path(data_dir);
    let text = std::fs::read_to_string(&path).map_err(|e| CheckError::io(&path, e))?;

    let mut dataset = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let (claim, raw_label) = extract_case(domain, line).map_err(|source| {
            CheckError::MalformedRecord { path: path.clone(), line: lineno + 1, source }
        })?;
        if let Some(label) = Label::from_raw(&raw_label) {
            dataset.push(ClaimCase { claim, label, evidence: None });
        }
    }
    tracing::info!(domain = %domain, size = dataset.len(), "dataset loaded");
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_jsonl(lines: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let mut f = std::fs::File::create(dir.path().join("hsd_claims.jsonl")).unwrap();
        for l in lines {
            writeln!(f, "{l}").unwrap();
        }
        dir
    }

    #[test]
    fn filters_unrecognized_labels_preserving_order() {
        let dir = write_jsonl(&[
            r#"{"claim":"a","label":"SUPPORTS"}"#,
            r#"{"claim":"b","label":"NEUTRAL"}"#,
            r#"{"claim":"c","label":"REFUTES"}"#,
        ]);
        let ds = load_dataset(Domain::Hsd, dir.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds[0].claim, "a");
        assert_eq!(ds[0].label, Label::Supports);
        assert_eq!(ds[1].claim, "c");
        assert_eq!(ds[1].label, Label::Refutes);
    }

    #[test]
    fn covid_vocabulary_maps_through() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("covid_claims.jsonl"),
            r#"{"claim":"masks work","label":"SUPPORTED"}
{"claim":"5g spreads it","label":"REFUTED"}
"#,
        )
        .unwrap();
        let ds = load_dataset(Domain::Covid, dir.path()).unwrap();
        assert_eq!(ds[0].label, Label::Supports);
        assert_eq!(ds[1].label, Label::Refutes);
    }

    #[test]
    fn malformed_line_is_an_error_with_position() {
        let dir = write_jsonl(&[r#"{"claim":"a","label":"SUPPORTS"}"#, "not json"]);
        let err = load_dataset(Domain::Hsd, dir.path()).unwrap_err();
        match err {
            CheckError::MalformedRecord { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }
}
