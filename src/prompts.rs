//! Outbound query construction, one builder method per prompting step.
//!
//! The instruction strings are fixed configuration (see [`crate::config`]);
//! the claim slot-in formats below are part of the log/scoring contract and
//! must not be reworded.

use crate::config::{self, CheckConfig};
use crate::retrieve::RetrievedDoc;
use crate::types::Mode;

/// A fully built gateway query: system instruction plus user prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub system: String,
    pub user: String,
}

pub struct PromptBuilder {
    cot_exemplar: String,
    probe_exemplar: String,
}

impl PromptBuilder {
    pub fn new(cfg: &CheckConfig) -> Self {
        Self {
            cot_exemplar: cfg.cot_exemplar.clone(),
            probe_exemplar: cfg.probe_exemplar.clone(),
        }
    }

    fn fairness_question(claim: &str) -> String {
        format!("Someone said: {claim}\nQuestion: Is it fair to say that?\nAnswer:")
    }

    /// The main verification query for modes `zero` and `cot`. In `cot` the
    /// few-shot exemplar block is prepended verbatim.
    pub fn verify_query(&self, mode: Mode, claim: &str) -> Query {
        let question = Self::fairness_question(claim);
        match mode {
            Mode::Zero => Query { system: config::ZERO_SYSTEM.into(), user: question },
            Mode::Cot => Query {
                system: config::COT_SYSTEM.into(),
                user: format!("{}\n\n{question}", self.cot_exemplar),
            },
            Mode::Fp => unreachable!("fp builds its query from the probe output"),
        }
    }

    /// Step 1 of the `fp` dialogue: ask the model to surface and check the
    /// most suspicious fact in the claim. Retrieved background passages, when
    /// a retriever is injected, are prepended to the exemplar block.
    pub fn probe_query(&self, claim: &str, background: Option<&str>) -> Query {
        let question = Self::fairness_question(claim);
        let user = match background {
            Some(bg) if !bg.is_empty() => {
                format!("{bg}\n\n{}\n\n{question}", self.probe_exemplar)
            }
            _ => format!("{}\n\n{question}", self.probe_exemplar),
        };
        Query { system: config::PROBE_SYSTEM.into(), user }
    }

    /// Step 2 of the `fp` dialogue: re-ask fairness with the probe output
    /// concatenated into context.
    pub fn fp_verify_query(&self, claim: &str, probe_output: &str) -> Query {
        Query {
            system: config::FP_VERIFY_SYSTEM.into(),
            user: format!(
                "Someone said: {claim}\n{probe_output}\nYes/no question: Is it fair to say that?"
            ),
        }
    }
}

/// Collapse retrieval hits into a background block: document bodies with the
/// title line stripped, joined by blank lines.
pub fn build_background(hits: &[RetrievedDoc]) -> String {
    hits.iter()
        .map(|doc| doc.contents.splitn(2, '\n').nth(1).unwrap_or("").to_string())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CheckConfig;

    fn builder_with(cot: &str, probe: &str) -> PromptBuilder {
        let mut cfg = CheckConfig::new("test-model");
        cfg.cot_exemplar = cot.into();
        cfg.probe_exemplar = probe.into();
        PromptBuilder::new(&cfg)
    }

    #[test]
    fn zero_query_has_fixed_shape() {
        let b = builder_with("", "");
        let q = b.verify_query(Mode::Zero, "Cats are liquid");
        assert_eq!(
            q.user,
            "Someone said: Cats are liquid\nQuestion: Is it fair to say that?\nAnswer:"
        );
        assert_eq!(q.system, config::ZERO_SYSTEM);
    }

    #[test]
    fn cot_query_prepends_exemplars() {
        let b = builder_with("Example 1: ...", "");
        let q = b.verify_query(Mode::Cot, "c");
        assert!(q.user.starts_with("Example 1: ...\n\nSomeone said: c"));
    }

    #[test]
    fn fp_verify_concatenates_probe_output() {
        let b = builder_with("", "");
        let q = b.fp_verify_query("c", "Related climate fact: ...");
        assert_eq!(
            q.user,
            "Someone said: c\nRelated climate fact: ...\nYes/no question: Is it fair to say that?"
        );
    }

    #[test]
    fn background_strips_title_lines() {
        let hits = vec![
            RetrievedDoc { docid: "a".into(), contents: "Title A\nbody a".into() },
            RetrievedDoc { docid: "b".into(), contents: "Title B\nbody b".into() },
        ];
        assert_eq!(build_background(&hits), "body a\n\nbody b");
    }
}
