//! HTTP client for the agent backend.
//!
//! The services depend on the [`AgentBackend`] and [`ContactsBackend`]
//! traits rather than on [`HttpBackend`] directly, so tests can substitute
//! in-memory fakes and embedders can bring their own transport.

use std::future::Future;
use std::pin::Pin;

use tracing::debug;

use crate::contacts::record::ContactRecord;
use crate::core::config::ConsoleConfig;
use crate::core::errors::{ConsoleError, ConsoleResult};

use super::types::{AgentReply, ContactsUpdateRequest, RunRequest, RunResponse, StatusReply};

/// Boxed future type for backend operations.
pub type BackendFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Transport for conversation turns.
pub trait AgentBackend: Send + Sync {
    /// Run one agent turn carrying `user_query` and decode the reply.
    fn run_turn(&self, user_query: &str) -> BackendFuture<'_, ConsoleResult<AgentReply>>;
}

/// Transport for the contact roster.
pub trait ContactsBackend: Send + Sync {
    /// Fetch the full roster in server order.
    fn list_contacts(&self) -> BackendFuture<'_, ConsoleResult<Vec<ContactRecord>>>;

    /// Replace the server roster wholesale with `contacts`.
    fn replace_contacts(
        &self,
        contacts: Vec<ContactRecord>,
    ) -> BackendFuture<'_, ConsoleResult<()>>;

    /// Delete one record keyed by `name`.
    fn delete_contact(&self, name: &str) -> BackendFuture<'_, ConsoleResult<()>>;
}

/// Reqwest-backed implementation of both backend traits.
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Build the backend client from configuration.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be constructed.
    pub fn new(config: &ConsoleConfig) -> ConsoleResult<Self> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.trimmed_base().to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }
}

impl AgentBackend for HttpBackend {
    fn run_turn(&self, user_query: &str) -> BackendFuture<'_, ConsoleResult<AgentReply>> {
        let user_query = user_query.to_string();
        Box::pin(async move {
            let response = self
                .client
                .post(self.endpoint("run"))
                .json(&RunRequest {
                    user_query: &user_query,
                })
                .send()
                .await?;
            let response = check_status(response).await?;
            let decoded: RunResponse = response.json().await?;
            Ok(AgentReply::from(decoded.output))
        })
    }
}

impl ContactsBackend for HttpBackend {
    fn list_contacts(&self) -> BackendFuture<'_, ConsoleResult<Vec<ContactRecord>>> {
        Box::pin(async move {
            let response = self.client.get(self.endpoint("contacts")).send().await?;
            let response = check_status(response).await?;
            let contacts: Vec<ContactRecord> = response.json().await?;
            debug!("fetched {} contacts", contacts.len());
            Ok(contacts)
        })
    }

    fn replace_contacts(
        &self,
        contacts: Vec<ContactRecord>,
    ) -> BackendFuture<'_, ConsoleResult<()>> {
        Box::pin(async move {
            let response = self
                .client
                .post(self.endpoint("update_contacts"))
                .json(&ContactsUpdateRequest {
                    contacts: &contacts,
                })
                .send()
                .await?;
            let response = check_status(response).await?;
            let reply: StatusReply = response.json().await.unwrap_or_default();
            debug!(
                "roster replaced: {} ({})",
                reply.status,
                reply.message.unwrap_or_default()
            );
            Ok(())
        })
    }

    fn delete_contact(&self, name: &str) -> BackendFuture<'_, ConsoleResult<()>> {
        let path = delete_path(name);
        Box::pin(async move {
            let response = self.client.delete(self.endpoint(&path)).send().await?;
            check_status(response).await?;
            Ok(())
        })
    }
}

/// Pass a successful response through, or turn a non-2xx response into a
/// [`ConsoleError::BackendStatus`] carrying whatever message the body held.
async fn check_status(response: reqwest::Response) -> ConsoleResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ConsoleError::BackendStatus {
        status: status.as_u16(),
        message: error_detail(&body),
    })
}

/// Extract a human-readable message from an error body.
///
/// The backend wraps errors as `{"detail": "..."}`; anything else is used
/// as raw text.
fn error_detail(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(detail) = value.get("detail").and_then(|v| v.as_str()) {
            return detail.to_string();
        }
    }
    body.trim().to_string()
}

/// Path segment for a delete keyed by `name`, percent-encoded.
fn delete_path(name: &str) -> String {
    format!("contacts/{}", urlencoding::encode(name))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_path_encoding() {
        assert_eq!(delete_path("Alice"), "contacts/Alice");
        assert_eq!(delete_path("A B/C"), "contacts/A%20B%2FC");
    }

    #[test]
    fn test_error_detail_json() {
        assert_eq!(error_detail(r#"{"detail":"agent crashed"}"#), "agent crashed");
    }

    #[test]
    fn test_error_detail_raw() {
        assert_eq!(error_detail("  Bad Gateway \n"), "Bad Gateway");
        assert_eq!(error_detail(""), "");
    }

    #[test]
    fn test_endpoint_join() {
        let backend = HttpBackend::new(
            &ConsoleConfig::new().with_base_url("http://127.0.0.1:8000/"),
        )
        .unwrap();
        assert_eq!(backend.endpoint("run"), "http://127.0.0.1:8000/run");
    }
}
