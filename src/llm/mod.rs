pub mod openai;

use anyhow::Result;

use crate::types::GenParams;

/// The model gateway. One blocking-from-the-caller's-view operation; the
/// driver awaits full completion before touching the next claim.
#[async_trait::async_trait]
pub trait Llm: Send + Sync {
    /// Returns one string per requested candidate (`params.n`), in choice
    /// order.
    async fn chat(&self, system: &str, prompt: &str, params: &GenParams) -> Result<Vec<String>>;
}
