use std::path::Path;
use std::time::Duration;

use crate::types::GenParams;

/// Per-mode system instructions, kept verbatim from the original prompt set.
pub const ZERO_SYSTEM: &str = "Analysis if the claim is factual and fair.";
pub const COT_SYSTEM: &str =
    "Let's think step by step and answer the question as the examples according to scientific or social facts.";
pub const PROBE_SYSTEM: &str =
    "Find the most suspicious information of the statement and check scientific or social fact as the examples.";
pub const FP_VERIFY_SYSTEM: &str =
    "Analyze if the statement is fair according to the fact and context. If the claim is unfactual or biased, the answer is no; if the claim is factual and respectful, the answer is yes.";

/// When to give up on a failing gateway call. `max_attempts: None` retries
/// forever; callers wanting bounded runtime wrap the run with a deadline.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: Option<u32>,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: None, backoff: Duration::from_secs(2) }
    }
}

/// Everything the driver needs beyond the dataset itself. Replaces the
/// original's ambient globals (API key file, prompt files read at call
/// sites).
#[derive(Debug, Clone)]
pub struct CheckConfig {
    pub model_id: String,
    pub params: GenParams,
    /// Few-shot exemplar block prepended in `cot` mode.
    pub cot_exemplar: String,
    /// Worked probe examples prepended to the `fp` probe query.
    pub probe_exemplar: String,
    pub retry: RetryPolicy,
    /// Progress heartbeat interval, in claims.
    pub heartbeat_every: usize,
}

impl CheckConfig {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            params: GenParams { temperature: 0.1, max_tokens: 128, n: 1 },
            cot_exemplar: String::new(),
            probe_exemplar: String::new(),
            retry: RetryPolicy::default(),
            heartbeat_every: 100,
        }
    }

    /// Load the exemplar blocks from the prompt directory. Missing files
    /// leave the corresponding block empty, which degrades `cot`/`fp` to
    /// exemplar-free prompting rather than failing.
    pub fn load_exemplars(mut self, prompt_dir: &Path) -> Self {
        if let Ok(text) = std::fs::read_to_string(prompt_dir.join("ent_cot.txt")) {
            self.cot_exemplar = text;
        }
        if let Ok(text) = std::fs::read_to_string(prompt_dir.join("verify_prompts.txt")) {
            self.probe_exemplar = text;
        }
        self
    }
}
