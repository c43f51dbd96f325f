use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use tracing::{info, warn};

/// Outbound side: delivers one human-readable message.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: &str) -> Result<()>;
}

/// Posts `{"content": "<message>"}` to a chat webhook (Discord-style).
pub struct WebhookNotifier {
    url: String,
    client: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }
}

pub fn payload(message: &str) -> serde_json::Value {
    serde_json::json!({ "content": message })
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, message: &str) -> Result<()> {
        let resp = self.client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .body(payload(message).to_string())
            .send()
            .await
            .context("webhook request failed")?;

        let status = resp.status();
        if !status.is_success() {
            warn!(status = %status, "webhook: delivery failed");
            bail!(
                "Failed to send webhook: {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("")
            );
        }

        info!(status = %status, "webhook: delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_payload_has_single_content_field() {
        let body = payload("✅ Print finished successfully!");
        let obj = body.as_object().unwrap();
        assert_eq!(obj.len(), 1);
        assert_eq!(obj["content"], "✅ Print finished successfully!");
    }

    #[tokio::test]
    async fn test_notify_posts_json_content() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/hooks/printer"))
            .and(header("Content-Type", "application/json"))
            .and(body_json(serde_json::json!({ "content": "⏸️ Print paused." })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let hook = WebhookNotifier::new(format!("{}/hooks/printer", server.uri()), reqwest::Client::new());
        hook.notify("⏸️ Print paused.").await.unwrap();
    }

    #[tokio::test]
    async fn test_notify_rejects_non_success() {
        for code in [400, 429, 500] {
            let server = MockServer::start().await;

            Mock::given(method("POST"))
                .respond_with(ResponseTemplate::new(code))
                .expect(1)
                .mount(&server)
                .await;

            let hook = WebhookNotifier::new(server.uri(), reqwest::Client::new());
            let err = hook.notify("✅ Print finished successfully!").await.unwrap_err();
            assert!(err.to_string().contains(&code.to_string()));
        }
    }

    #[test]
    fn test_payload_escapes_quotes() {
        let text = payload(r#"file "a".gcode"#).to_string();
        assert_eq!(text, r#"{"content":"file \"a\".gcode"}"#);
    }
}
