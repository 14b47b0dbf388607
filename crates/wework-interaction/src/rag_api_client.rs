//! RagApiClient - REST client for the WeWork RAG chat service.
//!
//! The service exposes three endpoints:
//! - `POST /chat` answers a member query
//! - `GET /health` liveness probe
//! - `GET /status` readiness details
//!
//! Only `/chat` feeds the conversation; the probes are diagnostics for hosts.

use crate::AssistantBackend;
use crate::failure::ResolveFailure;
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use wework_core::config::WidgetConfig;

/// Body of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RagChatRequest {
    pub query: String,
    pub membership_type: String,
    pub context: RequestContext,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestContext {
    pub source: String,
    /// RFC 3339 UTC with millisecond precision.
    pub timestamp: String,
}

/// Payload returned by `POST /chat`, successful or not.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RagChatResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub metadata: Option<ResponseMetadata>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResponseMetadata {
    pub processing_time: Option<f64>,
    pub query_length: Option<u64>,
    pub response_length: Option<u64>,
    pub membership_type: Option<String>,
    pub model: Option<String>,
}

impl RagChatResponse {
    /// Extracts the reply text, treating a falsy success flag or a missing
    /// reply as a semantic failure.
    pub fn into_reply(self) -> Result<String, ResolveFailure> {
        if !self.success {
            let reason = self
                .error
                .unwrap_or_else(|| "service reported success: false".to_string());
            return Err(ResolveFailure::Semantic(reason));
        }
        self.response
            .ok_or_else(|| ResolveFailure::semantic("response field missing from payload"))
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub service: String,
    #[serde(default)]
    pub rag_initialized: bool,
    #[serde(default)]
    pub openai_initialized: Option<bool>,
}

/// Body of `GET /status`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServiceStatus {
    pub service: String,
    #[serde(default)]
    pub rag_initialized: bool,
    #[serde(default)]
    pub ready_for_queries: bool,
    #[serde(default)]
    pub api_key_configured: Option<bool>,
    #[serde(default)]
    pub openai_initialized: Option<bool>,
}

/// Client for the RAG chat service.
#[derive(Debug, Clone)]
pub struct RagApiClient {
    client: Client,
    base_url: String,
    membership_type: String,
    source: String,
}

impl RagApiClient {
    /// Creates a client for the service rooted at `base_url`.
    pub fn new(
        base_url: impl Into<String>,
        membership_type: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            membership_type: membership_type.into(),
            source: source.into(),
        }
    }

    pub fn from_config(config: &WidgetConfig) -> Self {
        Self::new(&config.base_url, &config.membership_type, &config.source)
    }

    pub fn chat_url(&self) -> String {
        format!("{}/chat", self.base_url)
    }

    /// Builds the fixed-shape request body for `message`.
    pub fn build_request(&self, message: &str) -> RagChatRequest {
        RagChatRequest {
            query: message.to_string(),
            membership_type: self.membership_type.clone(),
            context: RequestContext {
                source: self.source.clone(),
                timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            },
        }
    }

    /// Sends one query to `POST /chat`.
    ///
    /// Returns the parsed payload even when it reports `success: false`;
    /// transport errors, non-2xx statuses and unparseable bodies are errors.
    pub async fn send_to_rag_api(&self, message: &str) -> Result<RagChatResponse, ResolveFailure> {
        tracing::debug!(query = %message, url = %self.chat_url(), "sending query to RAG API");

        let response = self
            .client
            .post(self.chat_url())
            .header("Content-Type", "application/json")
            .json(&self.build_request(message))
            .send()
            .await
            .map_err(|e| ResolveFailure::transport(format!("RAG API request failed: {e}")))?;

        tracing::debug!(status = %response.status(), "RAG API responded");
        read_json(response).await
    }

    /// Probes `GET /health`.
    pub async fn health(&self) -> Result<HealthReport, ResolveFailure> {
        self.get_json(&format!("{}/health", self.base_url)).await
    }

    /// Fetches `GET /status`.
    pub async fn status(&self) -> Result<ServiceStatus, ResolveFailure> {
        self.get_json(&format!("{}/status", self.base_url)).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ResolveFailure> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ResolveFailure::transport(format!("GET {url} failed: {e}")))?;
        read_json(response).await
    }
}

/// Rejects non-2xx statuses, then parses the body as JSON.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ResolveFailure> {
    let status = response.status();
    if !status.is_success() {
        return Err(ResolveFailure::Protocol {
            status: status.as_u16(),
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| ResolveFailure::transport(format!("Failed to read response body: {e}")))?;
    Ok(serde_json::from_str(&body)?)
}

#[async_trait]
impl AssistantBackend for RagApiClient {
    fn name(&self) -> &str {
        "rag-api"
    }

    async fn ask(&self, query: &str) -> Result<String, ResolveFailure> {
        self.send_to_rag_api(query).await?.into_reply()
    }
}
