use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const HTTP_METHODS: [&str; 7] = ["GET", "POST", "PUT", "PATCH", "DELETE", "HEAD", "OPTIONS"];

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyDetectionInput {
    pub api_name: String,
    pub endpoint: Option<String>,
    /// Raw traffic logs or metrics, any textual shape
    pub traffic_logs: String,
    /// Description of normal behaviour, if known
    pub baseline: Option<String>,
}

impl AnomalyDetectionInput {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.api_name.trim().is_empty() {
            errors.push("apiName is required".to_string());
        }
        if self.traffic_logs.trim().is_empty() {
            errors.push("trafficLogs is required".to_string());
        }
        errors
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Anomaly {
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyReport {
    pub summary: String,
    #[serde(default)]
    pub anomalies: Vec<Anomaly>,
}

impl AnomalyReport {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.summary.trim().is_empty() {
            errors.push("summary is empty".to_string());
        }
        for (i, anomaly) in self.anomalies.iter().enumerate() {
            if anomaly.title.trim().is_empty() {
                errors.push(format!("anomalies[{}].title is empty", i));
            }
            if anomaly.description.trim().is_empty() {
                errors.push(format!("anomalies[{}].description is empty", i));
            }
        }
        errors
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiDiscoveryInput {
    /// Where the sample came from, e.g. "gateway access log"
    pub source: String,
    pub traffic_sample: String,
}

impl ApiDiscoveryInput {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.source.trim().is_empty() {
            errors.push("source is required".to_string());
        }
        if self.traffic_sample.trim().is_empty() {
            errors.push("trafficSample is required".to_string());
        }
        errors
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveredApi {
    pub name: String,
    pub method: String,
    pub endpoint: String,
    pub description: Option<String>,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryReport {
    #[serde(default)]
    pub apis: Vec<DiscoveredApi>,
}

impl DiscoveryReport {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        for (i, api) in self.apis.iter().enumerate() {
            if api.name.trim().is_empty() {
                errors.push(format!("apis[{}].name is empty", i));
            }
            if !HTTP_METHODS.contains(&api.method.to_ascii_uppercase().as_str()) {
                errors.push(format!("apis[{}].method '{}' is not an HTTP method", i, api.method));
            }
            if !api.endpoint.starts_with('/') {
                errors.push(format!("apis[{}].endpoint must start with '/'", i));
            }
            if !(0.0..=1.0).contains(&api.confidence) {
                errors.push(format!("apis[{}].confidence must be within 0..=1", i));
            }
        }
        errors
    }

    /// Upper-case methods so they line up with catalog entries
    pub fn normalized(mut self) -> Self {
        for api in &mut self.apis {
            api.method = api.method.to_ascii_uppercase();
        }
        self
    }
}
