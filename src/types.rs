use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The two verdict classes recognized by every dataset and every prompting
/// mode. Anything else is filtered out at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Label {
    Supports,
    Refutes,
}

impl Label {
    /// Map a raw dataset label through the shared vocabulary. Returns `None`
    /// for unrecognized classes (e.g. NEUTRAL), which the loader drops.
    pub fn from_raw(raw: &str) -> Option<Self> {
        match raw {
            "SUPPORTS" | "SUPPORTED" => Some(Label::Supports),
            "REFUTES" | "REFUTED" => Some(Label::Refutes),
            _ => None,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Supports => write!(f, "SUPPORTS"),
            Label::Refutes => write!(f, "REFUTES"),
        }
    }
}

/// Prompting strategy for the verification query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Mode {
    /// Single zero-shot fairness question.
    Zero,
    /// Fact-probe: surface the most suspicious fact first, then verify.
    Fp,
    /// Chain-of-thought with a few-shot exemplar block.
    Cot,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Zero => write!(f, "zero"),
            Mode::Fp => write!(f, "fp"),
            Mode::Cot => write!(f, "cot"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimCase {
    pub claim: String,
    pub label: Label,
    /// Evidence titles from the source corpus. Reserved; no current dataset
    /// populates it.
    pub evidence: Option<BTreeSet<String>>,
}

/// Generation parameters sent with every gateway request.
#[derive(Debug, Clone, Copy)]
pub struct GenParams {
    pub temperature: f32,
    pub max_tokens: u16,
    pub n: u8,
}

pub const RECORD_SENTINEL: &str = "----------------------------------------------------";

/// One per claim, append-only. Renders to the fixed labeled-line block the
/// offline scorer and analyzer re-parse.
#[derive(Debug, Clone)]
pub struct VerificationRecord {
    pub index: usize,
    pub total: usize,
    pub claim: String,
    pub label: Label,
    pub probe_text: Option<String>,
    pub verify_text: String,
    pub prediction: Label,
    pub running_correct: f64,
    pub running_accuracy: f64,
}

impl VerificationRecord {
    /// Six labeled lines plus the sentinel line. Records are later joined
    /// with a single newline, so the trailing `\n` here yields the blank
    /// line the scorer splits on.
    pub fn render(&self) -> String {
        let lines = [
            format!(
                "---- {} / {} -- crr = {}, acc = {}",
                self.index, self.total, self.running_correct, self.running_accuracy
            ),
            format!("---- Claim: {}", self.claim),
            format!("---- Label: {}", self.label),
            format!("---- QA_str: {}", self.probe_text.as_deref().unwrap_or("None")),
            format!("---- Verifi_str: {}", self.verify_text),
            format!("---- Prediction: {}", self.prediction),
            format!("{RECORD_SENTINEL}\n"),
        ];
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_label_mapping_covers_both_vocabularies() {
        assert_eq!(Label::from_raw("SUPPORTS"), Some(Label::Supports));
        assert_eq!(Label::from_raw("SUPPORTED"), Some(Label::Supports));
        assert_eq!(Label::from_raw("REFUTED"), Some(Label::Refutes));
        assert_eq!(Label::from_raw("NEUTRAL"), None);
        assert_eq!(Label::from_raw("supports"), None);
    }

    #[test]
    fn record_renders_labeled_lines_and_sentinel() {
        let rec = VerificationRecord {
            index: 0,
            total: 4,
            claim: "The sky is green.".into(),
            label: Label::Refutes,
            probe_text: None,
            verify_text: "No, that is wrong.".into(),
            prediction: Label::Refutes,
            running_correct: 1.0,
            running_accuracy: 1.0,
        };
        let txt = rec.render();
        assert!(txt.contains("---- Claim: The sky is green."));
        assert!(txt.contains("---- Label: REFUTES"));
        assert!(txt.contains("---- QA_str: None"));
        assert!(txt.contains("---- Prediction: REFUTES"));
        assert!(txt.ends_with(&format!("{RECORD_SENTINEL}\n")));
    }
}
