use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CheckError>;

/// Errors that can end a checking run or an offline scoring pass.
#[derive(Error, Debug)]
pub enum CheckError {
    /// The fact-probe sub-query failed. Fatal for the whole run; the index
    /// names the claim being processed when the gateway gave up.
    #[error("probe step failed at sample {index}: {source}")]
    ProbeFailed {
        index: usize,
        #[source]
        source: anyhow::Error,
    },

    /// The gateway exhausted its retry budget on the main verification query.
    #[error("gateway gave up at sample {index}: {source}")]
    GatewayExhausted {
        index: usize,
        #[source]
        source: anyhow::Error,
    },

    /// F1 is undefined: no REFUTES cases in the ground truth, or no REFUTES
    /// predictions. Surfaced instead of a silent 0 or NaN.
    #[error("F1 undefined: {true_refutes} REFUTES labels, {predicted_refutes} REFUTES predictions")]
    DegenerateScore {
        true_refutes: usize,
        predicted_refutes: usize,
    },

    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed dataset line {line} in {path}: {source}")]
    MalformedRecord {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CheckError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CheckError::Io { path: path.into(), source }
    }
}
