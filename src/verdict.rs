//! Verdict extraction from free-form model output.
//!
//! These are deliberately crude substring heuristics, kept byte-compatible
//! with historical log artifacts. Do not upgrade them to real parsing; the
//! lenient defaults below are load-bearing.

use crate::types::{Label, Mode};

/// Zero-shot / chain-of-thought rule: a negative marker at a clause boundary
/// ("no." or "no,", case-insensitive) rejects the claim. Text with neither
/// marker, including empty text, defaults to SUPPORTS.
pub fn supports_unless_no(verify_text: &str) -> bool {
    let text = verify_text.to_lowercase();
    !(text.contains("no.") || text.contains("no,"))
}

/// Fact-probe rule: the affirmative marker rejects. The verify prompt frames
/// "yes" as "the suspicious fact holds against the claim", so "yes." / "yes,"
/// flips the verdict to REFUTES and anything else is accepted as fair. The
/// asymmetry with [`supports_unless_no`] is intentional.
pub fn supports_unless_yes(verify_text: &str) -> bool {
    let text = verify_text.to_lowercase();
    !(text.contains("yes.") || text.contains("yes,"))
}

/// Alternative chain-of-thought rule, not mapped by any mode: the final line
/// of the reasoning must contain "accept". Reachable through
/// [`verdict_fn`]-style injection if a caller wants it.
pub fn accepts_on_final_line(verify_text: &str) -> bool {
    verify_text
        .lines()
        .last()
        .map(|line| line.contains("accept"))
        .unwrap_or(false)
}

/// Mode dispatch used by the live driver.
pub fn parse_verdict(mode: Mode, verify_text: &str) -> Label {
    let supported = match mode {
        Mode::Zero | Mode::Cot => supports_unless_no(verify_text),
        Mode::Fp => supports_unless_yes(verify_text),
    };
    if supported {
        Label::Supports
    } else {
        Label::Refutes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_marker_refutes() {
        assert!(!supports_unless_no("No. The statement is wrong."));
        assert!(!supports_unless_no("no, it is biased"));
        assert!(!supports_unless_no("I think NO, definitely"));
    }

    #[test]
    fn absent_negative_marker_defaults_to_supports() {
        assert!(supports_unless_no("Yes, that is fair."));
        assert!(supports_unless_no("That seems fine."));
        // Bare "no" without punctuation is not a marker.
        assert!(supports_unless_no("there is no evidence either way"));
        assert!(supports_unless_no(""));
    }

    #[test]
    fn affirmative_marker_refutes_in_probe_mode() {
        assert!(!supports_unless_yes("Yes. The fact contradicts it."));
        assert!(!supports_unless_yes("yes, clearly"));
        assert!(supports_unless_yes("No, it holds up."));
        assert!(supports_unless_yes(""));
    }

    #[test]
    fn accept_rule_reads_only_the_final_line() {
        assert!(accepts_on_final_line("reasoning...\nTherefore I accept the claim."));
        assert!(!accepts_on_final_line("accept this premise\nbut the claim is rejected"));
        assert!(!accepts_on_final_line(""));
    }

    #[test]
    fn mode_dispatch() {
        assert_eq!(parse_verdict(Mode::Zero, "No, misleading."), Label::Refutes);
        assert_eq!(parse_verdict(Mode::Cot, "Yes, that's true."), Label::Supports);
        assert_eq!(parse_verdict(Mode::Fp, "Yes, the fact refutes it."), Label::Refutes);
        assert_eq!(parse_verdict(Mode::Fp, "No, it is fair."), Label::Supports);
    }
}
