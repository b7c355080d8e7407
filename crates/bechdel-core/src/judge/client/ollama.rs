use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{LlmClient, LlmResponse};
use crate::config::JudgeConfig;

/// Client for a local or remote Ollama server.
pub struct OllamaClient {
    model: String,
    host: String,
    temperature: f32,
    max_tokens: u32,
    client: reqwest::Client,
}

impl OllamaClient {
    pub fn new(config: &JudgeConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            model: config.model.clone(),
            host: config.host.trim_end_matches('/').to_string(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            client,
        })
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn complete(&self, prompt: &str, system: Option<&str>) -> anyhow::Result<LlmResponse> {
        let url = format!("{}/api/generate", self.host);

        let body = GenerateRequest {
            model: &self.model,
            prompt,
            system,
            stream: false,
            options: GenerateOptions {
                temperature: self.temperature,
                num_predict: self.max_tokens,
            },
        };

        let resp = self.client.post(&url).json(&body).send().await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let detail = resp.text().await.unwrap_or_default();
            anyhow::bail!("ollama generate error (status {status}): {detail}");
        }

        let parsed: GenerateResponse = resp.json().await?;
        Ok(LlmResponse {
            text: parsed.response,
            provider: "ollama".to_string(),
            model: self.model.clone(),
        })
    }

    fn provider_name(&self) -> &'static str {
        "ollama"
    }
}
