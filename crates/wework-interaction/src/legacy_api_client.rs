//! LegacySupportClient - the older help-and-support category suggestion API.
//!
//! Kept for hosts that still wire it up. It never feeds the conversation and
//! never fails: errors become a fixed `{"error": ...}` payload.

use crate::failure::ResolveFailure;
use reqwest::Client;
use serde::Serialize;
use serde_json::{Value, json};
use wework_core::config::{LegacyApiConfig, WidgetConfig};

/// Error text returned in place of a payload when the call fails.
pub const LEGACY_UNAVAILABLE: &str = "Unable to process request at the moment. Please try again.";

const REQUEST_TYPE: &str = "HELP_AND_SUPPORT";

#[derive(Debug, Serialize)]
struct LegacyRequest<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    data: LegacyRequestData<'a>,
}

#[derive(Debug, Serialize)]
struct LegacyRequestData<'a> {
    membership_type: &'a str,
    description: &'a str,
    options: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct LegacySupportClient {
    client: Client,
    endpoint: String,
    api_key: String,
    membership_type: String,
}

impl LegacySupportClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        membership_type: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            membership_type: membership_type.into(),
        }
    }

    /// Builds a client when the config carries legacy credentials.
    pub fn from_config(config: &WidgetConfig) -> Option<Self> {
        config
            .legacy
            .as_ref()
            .map(|LegacyApiConfig { endpoint, api_key }| {
                Self::new(endpoint, api_key, &config.membership_type)
            })
    }

    /// Posts `message` as a help-and-support description and returns the raw
    /// JSON reply, or `{"error": LEGACY_UNAVAILABLE}` on any failure.
    pub async fn send_to_api(&self, message: &str) -> Value {
        match self.try_send(message).await {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(error = %err, kind = err.kind(), "legacy API call failed");
                json!({ "error": LEGACY_UNAVAILABLE })
            }
        }
    }

    async fn try_send(&self, message: &str) -> Result<Value, ResolveFailure> {
        let body = LegacyRequest {
            kind: REQUEST_TYPE,
            data: LegacyRequestData {
                membership_type: &self.membership_type,
                description: message,
                options: Vec::new(),
            },
        };

        // The status code is not checked: the service reports errors in the body.
        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .header("x-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ResolveFailure::transport(format!("legacy API request failed: {e}")))?;

        let text = response
            .text()
            .await
            .map_err(|e| ResolveFailure::transport(format!("Failed to read response body: {e}")))?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{StubServer, body_of, unreachable_base_url};

    #[tokio::test]
    async fn posts_help_and_support_payload() {
        let server = StubServer::respond(
            "200 OK",
            r#"{"category": "IT", "subcategory": "Wi-Fi"}"#,
        )
        .await;
        let client = LegacySupportClient::new(
            format!("{}/suggest", server.base_url()),
            "key-123",
            "All Access",
        );

        let reply = client.send_to_api("wifi keeps dropping").await;
        assert_eq!(reply["category"], "IT");

        let request = server.finish().await;
        assert!(request.starts_with("POST /suggest HTTP/1.1"));
        assert!(request.to_lowercase().contains("x-api-key: key-123"));

        let body = body_of(&request);
        assert_eq!(body["type"], "HELP_AND_SUPPORT");
        assert_eq!(body["data"]["membership_type"], "All Access");
        assert_eq!(body["data"]["description"], "wifi keeps dropping");
        assert_eq!(body["data"]["options"], json!([]));
    }

    #[tokio::test]
    async fn failure_yields_error_payload() {
        let base_url = unreachable_base_url().await;
        let client = LegacySupportClient::new(base_url, "key", "All Access");

        let reply = client.send_to_api("anything").await;
        assert_eq!(reply, json!({ "error": LEGACY_UNAVAILABLE }));
    }

    #[test]
    fn built_only_when_configured() {
        let mut config = WidgetConfig::default();
        assert!(LegacySupportClient::from_config(&config).is_none());

        config.legacy = Some(LegacyApiConfig {
            endpoint: "https://support.example.com".into(),
            api_key: "k".into(),
        });
        assert!(LegacySupportClient::from_config(&config).is_some());
    }
}
