use std::future::Future;

use anyhow::{anyhow, Result};
use serde_json::{json, Value};

/**
 * \brief 文本生成后端。每次调用只针对一个模型，不做重试。
 */
pub trait GenerationBackend: Send + Sync {
    /**
     * \brief 以指定模型与温度生成一次完整回复。
     */
    fn generate(
        &self,
        model: &str,
        prompt: &str,
        temperature: f32,
    ) -> impl Future<Output = Result<String>> + Send;

    /**
     * \brief 列出当前凭据可用的模型。
     */
    fn list_models(&self) -> impl Future<Output = Result<Vec<String>>> + Send;
}

/**
 * \brief Google Generative Language REST 后端。
 */
#[derive(Debug, Clone)]
pub struct GeminiBackend {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
}

impl GeminiBackend {
    pub fn new(api_base: &str, api_key: impl Into<String>) -> Self {
        GeminiBackend {
            client: reqwest::Client::new(),
            api_base: normalize_gemini_base(api_base),
            api_key: api_key.into(),
        }
    }
}

impl GenerationBackend for GeminiBackend {
    async fn generate(&self, model: &str, prompt: &str, temperature: f32) -> Result<String> {
        let url = format!("{}/models/{}:generateContent", self.api_base, model);
        let body = generate_body(prompt, temperature);

        let resp = self
            .client
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(anyhow!("gemini request failed: {} -> {}", status, text));
        }
        let v: Value = resp.json().await?;
        Ok(extract_gemini_content(&v))
    }

    async fn list_models(&self) -> Result<Vec<String>> {
        let url = format!("{}/models", self.api_base);
        let resp = self
            .client
            .get(url)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(anyhow!("gemini list models failed: {} -> {}", status, text));
        }
        parse_gemini_model_list(resp.json().await?)
    }
}

fn generate_body(prompt: &str, temperature: f32) -> Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [{"text": prompt}]
        }],
        "generationConfig": {
            "temperature": temperature
        }
    })
}

fn extract_gemini_content(v: &Value) -> String {
    if let Some(candidates) = v.get("candidates").and_then(|c| c.as_array()) {
        if let Some(first) = candidates.first() {
            if let Some(content) = first.get("content") {
                if let Some(parts) = content.get("parts").and_then(|p| p.as_array()) {
                    return parts
                        .iter()
                        .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
                        .collect::<Vec<_>>()
                        .join("");
                }
            }
        }
    }
    String::new()
}

fn normalize_gemini_base(api_base: &str) -> String {
    let trimmed = api_base.trim_end_matches('/');
    if trimmed.ends_with("/v1")
        || trimmed.ends_with("/v1beta")
        || trimmed.contains("/v1/")
        || trimmed.contains("/v1beta/")
    {
        trimmed.to_string()
    } else {
        format!("{}/v1beta", trimmed)
    }
}

/**
 * \brief 模型名去掉 "models/" 前缀，与候选列表的写法保持一致。
 */
fn parse_gemini_model_list(v: Value) -> Result<Vec<String>> {
    if let Some(arr) = v.get("models").and_then(|x| x.as_array()) {
        Ok(arr
            .iter()
            .filter_map(|item| item.get("name").and_then(|s| s.as_str()))
            .map(|s| s.trim_start_matches("models/").to_string())
            .collect())
    } else {
        Err(anyhow!("unexpected gemini models payload: {}", v))
    }
}
