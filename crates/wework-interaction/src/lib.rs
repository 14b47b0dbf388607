//! Outbound calls of the chat widget and the resolver built on them.

pub mod failure;
pub mod legacy_api_client;
pub mod rag_api_client;
pub mod resolver;

#[cfg(test)]
mod test_support;

use async_trait::async_trait;

pub use failure::ResolveFailure;
pub use legacy_api_client::{LEGACY_UNAVAILABLE, LegacySupportClient};
pub use rag_api_client::{HealthReport, RagApiClient, RagChatResponse, ServiceStatus};
pub use resolver::ResponseResolver;

/// A remote assistant that answers one query per call.
///
/// Implementations perform a single attempt and classify any failure; they
/// never substitute a reply of their own.
#[async_trait]
pub trait AssistantBackend: Send + Sync {
    /// Identifier used in log fields.
    fn name(&self) -> &str;

    /// Sends `query` and returns the assistant's reply text.
    async fn ask(&self, query: &str) -> Result<String, ResolveFailure>;
}
