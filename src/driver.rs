//! The live evaluation loop: prompt, (probe,) answer, score, log.
//!
//! Strictly sequential: the gateway call for claim i+1 never starts before
//! claim i's record is appended, so the persisted log order is reproducible.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::CheckConfig;
use crate::error::{CheckError, Result};
use crate::llm::Llm;
use crate::prompts::{build_background, PromptBuilder, Query};
use crate::retrieve::Retriever;
use crate::types::{ClaimCase, Label, Mode, VerificationRecord};
use crate::verdict::parse_verdict;

/// Output artifact locations for one experiment, namespaced by task, mode and
/// experiment tag.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub log: PathBuf,
    pub wrong_list: PathBuf,
    pub verify_list: PathBuf,
}

impl ArtifactPaths {
    pub fn new(log_dir: &Path, task: &str, mode: Mode, exp_name: &str) -> Self {
        Self {
            log: log_dir.join(format!("{task}_{mode}_check_{exp_name}.log")),
            wrong_list: log_dir.join(format!("{task}_{mode}_wrong_list_{exp_name}.json")),
            verify_list: log_dir.join(format!("{task}_{mode}_verify_list_{exp_name}.json")),
        }
    }
}

#[derive(Debug)]
pub struct RunSummary {
    pub accuracy: f64,
    pub processed: usize,
    pub wrong_indices: Vec<usize>,
    pub records: Vec<VerificationRecord>,
    /// Set when verbose mode stopped the run after the first claim; no
    /// artifacts were written.
    pub debug_stopped: bool,
}

pub struct Verifier {
    llm: Arc<dyn Llm>,
    retriever: Option<Arc<dyn Retriever>>,
    prompts: PromptBuilder,
    cfg: CheckConfig,
}

impl Verifier {
    pub fn new(
        llm: Arc<dyn Llm>,
        retriever: Option<Arc<dyn Retriever>>,
        cfg: CheckConfig,
    ) -> Self {
        let prompts = PromptBuilder::new(&cfg);
        Self { llm, retriever, prompts, cfg }
    }

    async fn chat_first(&self, query: &Query) -> anyhow::Result<String> {
        let mut texts = self.llm.chat(&query.system, &query.user, &self.cfg.params).await?;
        Ok(texts.remove(0))
    }

    /// Step 1 of the `fp` dialogue. Retrieval problems degrade to an
    /// exemplar-only probe; a failed probe query itself is escalated.
    async fn probe(&self, claim: &str) -> anyhow::Result<String> {
        let background = match &self.retriever {
            Some(r) => match r.retrieve(claim).await {
                Ok(hits) => Some(build_background(&hits)),
                Err(err) => {
                    tracing::warn!(error = %err, "retrieval failed; probing without background");
                    None
                }
            },
            None => None,
        };
        let query = self.prompts.probe_query(claim, background.as_deref());
        let text = self.chat_first(&query).await?;
        Ok(text.trim().to_string())
    }

    /// Walk the dataset once, in order, and return the overall accuracy. With
    /// `verbose` the loop stops after the first claim without persisting
    /// anything.
    pub async fn verify_dataset(
        &self,
        dataset: &[ClaimCase],
        mode: Mode,
        out: &ArtifactPaths,
        verbose: bool,
    ) -> Result<RunSummary> {
        let num_case = dataset.len();
        let mut crr = 0.0f64;
        let mut records: Vec<VerificationRecord> = Vec::with_capacity(num_case);
        let mut wrong_indices: Vec<usize> = Vec::new();
        let mut verify_str_list: Vec<String> = Vec::with_capacity(num_case);

        for (i, case) in dataset.iter().enumerate() {
            let (probe_text, query) = match mode {
                Mode::Zero | Mode::Cot => (None, self.prompts.verify_query(mode, &case.claim)),
                Mode::Fp => {
                    let qa = self
                        .probe(&case.claim)
                        .await
                        .map_err(|source| CheckError::ProbeFailed { index: i, source })?;
                    let query = self.prompts.fp_verify_query(&case.claim, &qa);
                    (Some(qa), query)
                }
            };

            let verify_text = self
                .chat_first(&query)
                .await
                .map_err(|source| CheckError::GatewayExhausted { index: i, source })?;

            // The probe text is the interesting artifact in fp mode.
            verify_str_list.push(match (&probe_text, mode) {
                (Some(qa), Mode::Fp) => qa.clone(),
                _ => verify_text.clone(),
            });

            let prediction = parse_verdict(mode, &verify_text);

            if verbose {
                println!("{}", case.claim);
                println!("{}", case.label);
                println!("--");
                println!("{}", probe_text.as_deref().unwrap_or("None"));
                println!("--");
                println!("{verify_text}");
                println!("pred = {prediction}");
                println!("--");
                println!("{}", query.user);
                return Ok(RunSummary {
                    accuracy: 0.0,
                    processed: 1,
                    wrong_indices,
                    records,
                    debug_stopped: true,
                });
            }

            if prediction == case.label {
                crr += 1.0;
            } else {
                wrong_indices.push(i);
            }

            records.push(VerificationRecord {
                index: i,
                total: num_case,
                claim: case.claim.clone(),
                label: case.label,
                probe_text,
                verify_text,
                prediction,
                running_correct: crr,
                running_accuracy: crr / (i + 1) as f64,
            });

            if i % self.cfg.heartbeat_every == 0 {
                tracing::info!(processed = i + 1, "claims processed");
            }
        }

        self.persist(&records, &wrong_indices, &verify_str_list, out)?;

        Ok(RunSummary {
            accuracy: crr / num_case.max(1) as f64,
            processed: num_case,
            wrong_indices,
            records,
            debug_stopped: false,
        })
    }

    /// All three artifacts are written at end-of-run. The log goes through a
    /// temp file and rename so a crash cannot leave a partial record behind.
    fn persist(
        &self,
        records: &[VerificationRecord],
        wrong_indices: &[usize],
        verify_str_list: &[String],
        out: &ArtifactPaths,
    ) -> Result<()> {
        let log_text = records.iter().map(VerificationRecord::render).collect::<Vec<_>>().join("\n");
        let tmp = out.log.with_extension("log.tmp");
        std::fs::write(&tmp, log_text).map_err(|e| CheckError::io(&tmp, e))?;
        std::fs::rename(&tmp, &out.log).map_err(|e| CheckError::io(&out.log, e))?;

        std::fs::write(&out.wrong_list, serde_json::to_string(wrong_indices)?)
            .map_err(|e| CheckError::io(&out.wrong_list, e))?;
        std::fs::write(&out.verify_list, serde_json::to_string(verify_str_list)?)
            .map_err(|e| CheckError::io(&out.verify_list, e))?;
        Ok(())
    }
}
