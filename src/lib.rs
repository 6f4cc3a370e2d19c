//! Unified language safety checking with LLM judges.
//!
//! Walks a labeled claim dataset, asks a chat model whether each claim is
//! fair under one of three prompting strategies, extracts a binary verdict
//! from the free-form reply, and recomputes REFUTES-class F1 and per-category
//! accuracy offline from the persisted check log.

pub mod analysis;
pub mod config;
pub mod dataset;
pub mod driver;
pub mod error;
pub mod llm;
pub mod prompts;
pub mod retrieve;
pub mod scoring;
pub mod types;
pub mod verdict;

pub use config::{CheckConfig, RetryPolicy};
pub use driver::{ArtifactPaths, RunSummary, Verifier};
pub use error::{CheckError, Result};
pub use types::{ClaimCase, GenParams, Label, Mode, VerificationRecord};
