use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::{
    AnomalyDetectionInput, AnomalyReport, ApiDiscoveryInput, DiscoveryReport,
};

/// Text-in, text-out generative model
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(&self, system: &str, prompt: &str) -> AppResult<String>;
}

/// Configuration for an OpenAI-compatible chat completions endpoint
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Base URL for the API (e.g., "http://localhost:11434/v1")
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
    pub temperature: f32,
}

/// Chat completions client (Ollama, LM Studio, OpenAI and friends)
pub struct OpenAiCompatibleModel {
    config: ModelConfig,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

impl OpenAiCompatibleModel {
    pub fn new(config: ModelConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl GenerativeModel for OpenAiCompatibleModel {
    async fn generate(&self, system: &str, prompt: &str) -> AppResult<String> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.config.temperature,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let mut builder = self
            .client
            .post(format!(
                "{}/chat/completions",
                self.config.base_url.trim_end_matches('/')
            ))
            .json(&request);

        if let Some(api_key) = &self.config.api_key {
            builder = builder.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "model {} returned {}: {}",
                self.config.model,
                status,
                body.chars().take(300).collect::<String>()
            )));
        }

        let body: ChatResponse = response.json().await?;
        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| AppError::Upstream("model returned no content".to_string()))
    }
}

const ANOMALY_SYSTEM: &str = "You are an API security analyst. \
Respond with a single JSON object and nothing else.";

const DISCOVERY_SYSTEM: &str = "You are an API inventory assistant. \
Respond with a single JSON object and nothing else.";

fn anomaly_prompt(input: &AnomalyDetectionInput) -> String {
    format!(
        "Analyze the traffic of the API \"{name}\"{endpoint} for anomalies such as \
error spikes, latency outliers, unusual callers, enumeration or data exfiltration.\n\n\
Baseline behaviour:\n{baseline}\n\n\
Traffic logs:\n{logs}\n\n\
Return JSON of the form \
{{\"summary\": string, \"anomalies\": [{{\"title\": string, \"description\": string, \
\"severity\": \"low\"|\"medium\"|\"high\"|\"critical\", \"recommendation\": string}}]}}. \
Use an empty anomalies array when nothing stands out.",
        name = input.api_name.trim(),
        endpoint = input
            .endpoint
            .as_deref()
            .map(|e| format!(" ({})", e.trim()))
            .unwrap_or_default(),
        baseline = input.baseline.as_deref().unwrap_or("unknown"),
        logs = input.traffic_logs.trim(),
    )
}

fn discovery_prompt(input: &ApiDiscoveryInput) -> String {
    format!(
        "Identify the distinct HTTP APIs exercised in the following sample taken from {source}. \
Collapse concrete identifiers in paths into placeholders like /users/{{id}}.\n\n\
Sample:\n{sample}\n\n\
Return JSON of the form \
{{\"apis\": [{{\"name\": string, \"method\": string, \"endpoint\": string starting with \"/\", \
\"description\": string, \"confidence\": number between 0 and 1}}]}}.",
        source = input.source.trim(),
        sample = input.traffic_sample.trim(),
    )
}

/// The JSON object inside model output, tolerating code fences and chatter
pub fn extract_json(output: &str) -> Option<&str> {
    let start = output.find('{')?;
    let end = output.rfind('}')?;
    (end > start).then(|| &output[start..=end])
}

fn parse_output<T: DeserializeOwned>(output: &str) -> AppResult<T> {
    let json = extract_json(output)
        .ok_or_else(|| AppError::Upstream("model output contains no JSON object".to_string()))?;

    serde_json::from_str(json).map_err(|e| {
        AppError::Upstream(format!("model output does not match the expected schema: {}", e))
    })
}

fn ensure_valid(errors: Vec<String>) -> AppResult<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Upstream(format!(
            "model output failed validation: {}",
            errors.join("; ")
        )))
    }
}

/// Prompt flows backed by a generative model
pub struct AiService;

impl AiService {
    pub async fn detect_anomalies(
        model: &dyn GenerativeModel,
        input: &AnomalyDetectionInput,
    ) -> AppResult<AnomalyReport> {
        let errors = input.validate();
        if !errors.is_empty() {
            return Err(AppError::InvalidInput(errors));
        }

        let output = model
            .generate(ANOMALY_SYSTEM, &anomaly_prompt(input))
            .await?;
        let report: AnomalyReport = parse_output(&output)?;
        ensure_valid(report.validate())?;

        tracing::info!(
            "Anomaly detection for {} found {} anomalies",
            input.api_name,
            report.anomalies.len()
        );
        Ok(report)
    }

    pub async fn discover_apis(
        model: &dyn GenerativeModel,
        input: &ApiDiscoveryInput,
    ) -> AppResult<DiscoveryReport> {
        let errors = input.validate();
        if !errors.is_empty() {
            return Err(AppError::InvalidInput(errors));
        }

        let output = model
            .generate(DISCOVERY_SYSTEM, &discovery_prompt(input))
            .await?;
        let report: DiscoveryReport = parse_output(&output)?;
        ensure_valid(report.validate())?;

        tracing::info!("API discovery found {} candidates", report.apis.len());
        Ok(report.normalized())
    }
}
