use anyhow::{anyhow, Result};
use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use tokio::time::sleep;

use super::Llm;
use crate::config::RetryPolicy;
use crate::types::GenParams;

/// OpenAI-compatible chat gateway. Transient failures are classified for the
/// log and retried under the injected policy; with the default policy this
/// loops forever, which is the intended behavior for an offline batch job.
#[derive(Clone)]
pub struct LlmClient {
    client: Client<OpenAIConfig>,
    model: String,
    retry: RetryPolicy,
}

fn failure_class(err: &OpenAIError) -> &'static str {
    match err {
        OpenAIError::ApiError(api) => {
            if api.message.contains("rate limit")
                || api.r#type.as_deref() == Some("rate_limit_error")
            {
                "rate-limit"
            } else {
                "api"
            }
        }
        OpenAIError::Reqwest(_) => "network",
        OpenAIError::JSONDeserialize(_) => "malformed-response",
        _ => "other",
    }
}

impl LlmClient {
    pub fn new(
        model: String,
        base_url: Option<String>,
        api_key: Option<String>,
        retry: RetryPolicy,
    ) -> Self {
        let mut cfg = OpenAIConfig::default();
        if let Some(url) = base_url {
            cfg = cfg.with_api_base(url);
        }
        if let Some(key) = api_key {
            cfg = cfg.with_api_key(key);
        }
        Self { client: Client::with_config(cfg), model, retry }
    }

    async fn chat_once(
        &self,
        system: &str,
        prompt: &str,
        params: &GenParams,
    ) -> std::result::Result<Vec<String>, OpenAIError> {
        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system)
                .build()?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()?
                .into(),
        ];
        let req = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(params.temperature)
            .max_tokens(params.max_tokens)
            .n(params.n)
            .build()?;
        let resp = self.client.chat().create(req).await?;
        Ok(resp
            .choices
            .into_iter()
            .map(|c| c.message.content.unwrap_or_default().trim().to_string())
            .collect())
    }
}

#[async_trait::async_trait]
impl Llm for LlmClient {
    async fn chat(&self, system: &str, prompt: &str, params: &GenParams) -> Result<Vec<String>> {
        let mut attempts = 0u32;
        loop {
            let err = match self.chat_once(system, prompt, params).await {
                Ok(texts) if !texts.is_empty() => return Ok(texts),
                Ok(_) => anyhow!("response carried no choices"),
                Err(err) => {
                    tracing::warn!(class = failure_class(&err), error = %err, "chat error; retrying");
                    anyhow!(err)
                }
            };
            attempts += 1;
            if let Some(max) = self.retry.max_attempts {
                if attempts >= max {
                    return Err(err.context(format!("gateway failed after {max} attempts")));
                }
            }
            sleep(self.retry.backoff).await;
        }
    }
}
