//! Offline scoring over a persisted check log.
//!
//! The per-record classifier here is a two-way keyword search, not a parser:
//! a chunk either literally contains `Label: SUPPORTS` or it is a REFUTES
//! label, and the same for the prediction line. Malformed chunks therefore
//! classify as REFUTES/REFUTES. That tolerance is intentional and must stay
//! compatible with historical log artifacts.

use crate::error::{CheckError, Result};
use crate::types::{Label, RECORD_SENTINEL};

/// Per-case indicator tuple: label-is-refutes, prediction-is-refutes,
/// correct, correct-and-refutes.
pub fn evaluate_case(case_text: &str) -> (bool, bool, bool, bool) {
    let label = if case_text.contains("Label: SUPPORTS") {
        Label::Supports
    } else {
        Label::Refutes
    };
    let pred = if case_text.contains("Prediction: SUPPORTS") {
        Label::Supports
    } else {
        Label::Refutes
    };
    let correct = label == pred;
    (
        label == Label::Refutes,
        pred == Label::Refutes,
        correct,
        correct && label == Label::Refutes,
    )
}

/// Split a log into per-case chunks on the sentinel delimiter.
pub fn split_cases(log_text: &str) -> Vec<&str> {
    log_text.split(&format!("{RECORD_SENTINEL}\n\n")).collect()
}

/// Counts accumulated over all records of a run, with REFUTES as the
/// positive class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreAggregate {
    pub true_refutes: usize,
    pub predicted_refutes: usize,
    pub correct: usize,
    pub correct_refutes: usize,
}

impl ScoreAggregate {
    pub fn from_log(log_text: &str) -> Self {
        let mut agg = ScoreAggregate::default();
        for case in split_cases(log_text) {
            let (true_r, pred_r, crr, crr_r) = evaluate_case(case);
            agg.true_refutes += true_r as usize;
            agg.predicted_refutes += pred_r as usize;
            agg.correct += crr as usize;
            agg.correct_refutes += crr_r as usize;
        }
        agg
    }

    /// Recall, precision and F1 over the REFUTES class. A zero denominator
    /// makes F1 undefined and is surfaced as an error rather than 0 or NaN.
    pub fn f_score(&self) -> Result<FScore> {
        if self.true_refutes == 0 || self.predicted_refutes == 0 {
            return Err(CheckError::DegenerateScore {
                true_refutes: self.true_refutes,
                predicted_refutes: self.predicted_refutes,
            });
        }
        let recall = self.correct_refutes as f64 / self.true_refutes as f64;
        let precision = self.correct_refutes as f64 / self.predicted_refutes as f64;
        if recall + precision == 0.0 {
            return Err(CheckError::DegenerateScore {
                true_refutes: self.true_refutes,
                predicted_refutes: self.predicted_refutes,
            });
        }
        let f1 = 2.0 * recall * precision / (recall + precision);
        Ok(FScore { recall, precision, f1 })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FScore {
    pub recall: f64,
    pub precision: f64,
    pub f1: f64,
}

/// Score a persisted log file: the independent re-derivation of the live
/// run's metric.
pub fn score_log_file(path: &std::path::Path) -> Result<FScore> {
    let text = std::fs::read_to_string(path).map_err(|e| CheckError::io(path, e))?;
    ScoreAggregate::from_log(&text).f_score()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_classifier_defaults_to_refutes() {
        let (true_r, pred_r, crr, crr_r) = evaluate_case("garbage chunk");
        assert!(true_r && pred_r && crr && crr_r);

        let (true_r, pred_r, crr, crr_r) =
            evaluate_case("---- Label: SUPPORTS\n---- Prediction: REFUTES");
        assert!(!true_r);
        assert!(pred_r);
        assert!(!crr);
        assert!(!crr_r);
    }

    #[test]
    fn f_score_from_known_counts() {
        let agg = ScoreAggregate {
            true_refutes: 10,
            predicted_refutes: 8,
            correct: 0,
            correct_refutes: 6,
        };
        let s = agg.f_score().unwrap();
        assert!((s.recall - 0.6).abs() < 1e-9);
        assert!((s.precision - 0.75).abs() < 1e-9);
        assert!((s.f1 - 2.0 * 0.6 * 0.75 / 1.35).abs() < 1e-9);
    }

    #[test]
    fn degenerate_counts_error_instead_of_nan() {
        let agg = ScoreAggregate { true_refutes: 0, predicted_refutes: 5, ..Default::default() };
        assert!(matches!(agg.f_score(), Err(CheckError::DegenerateScore { .. })));

        let agg = ScoreAggregate { true_refutes: 5, predicted_refutes: 0, ..Default::default() };
        assert!(matches!(agg.f_score(), Err(CheckError::DegenerateScore { .. })));
    }

    #[test]
    fn aggregates_across_sentinel_separated_chunks() {
        let log = format!(
            "---- Label: REFUTES\n---- Prediction: REFUTES\n{RECORD_SENTINEL}\n\n\
             ---- Label: SUPPORTS\n---- Prediction: SUPPORTS\n{RECORD_SENTINEL}\n"
        );
        let agg = ScoreAggregate::from_log(&log);
        assert_eq!(agg.true_refutes, 1);
        assert_eq!(agg.predicted_refutes, 1);
        assert_eq!(agg.correct, 2);
        assert_eq!(agg.correct_refutes, 1);
    }
}
