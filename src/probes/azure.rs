//! Azure Cognitive Services key probe.
//!
//! Keys ride in the `Ocp-Apim-Subscription-Key` header. Azure error
//! bodies carry a top-level `error` object; some endpoints return
//! non-JSON bodies on success, which is treated as "no error signal".

use async_trait::async_trait;
use serde_json::Value;

use super::{run_endpoint, Credential, ProbeResult, ProviderProbe};
use crate::transport::{ProbeRequest, Transport};

pub struct AzureProbe;

const KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const VISION_PAYLOAD: &str = r#"{"url":"https://example.com/image.jpg"}"#;

fn endpoints(key: &str) -> Vec<(&'static str, ProbeRequest)> {
    vec![
        (
            "Bing Search API",
            ProbeRequest::get("https://api.bing.microsoft.com/v7.0/search?q=seattle")
                .header(KEY_HEADER, key),
        ),
        (
            "Computer Vision API",
            ProbeRequest::post(
                "https://westcentralus.api.cognitive.microsoft.com/vision/v3.2/analyze?visualFeatures=Description",
                VISION_PAYLOAD,
            )
            .header(KEY_HEADER, key)
            .header("Content-Type", "application/json"),
        ),
    ]
}

/// A top-level `error` object is the signal; its `message` field is
/// preferred, falling back to the object's JSON string form. Non-JSON
/// bodies are tolerated as "no error".
fn extract_error(body: &str) -> Option<String> {
    let parsed: Value = serde_json::from_str(body).ok()?;
    let error = parsed.get("error")?;
    Some(
        error
            .get("message")
            .and_then(Value::as_str)
            .map(String::from)
            .unwrap_or_else(|| error.to_string()),
    )
}

#[async_trait]
impl ProviderProbe for AzureProbe {
    fn provider_id(&self) -> &str {
        "azure"
    }

    fn display_name(&self) -> &str {
        "Azure"
    }

    async fn run(&self, credential: &Credential, transport: &dyn Transport) -> Vec<ProbeResult> {
        let key = credential.primary();
        let mut results = Vec::with_capacity(2);
        for (name, request) in endpoints(key) {
            results.push(
                run_endpoint(self.display_name(), name, request, transport, |_, body| {
                    extract_error(body)
                })
                .await,
            );
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_object_message() {
        let body = r#"{"error":{"code":"401","message":"Access denied due to invalid subscription key."}}"#;
        assert_eq!(
            extract_error(body),
            Some("Access denied due to invalid subscription key.".to_string())
        );
    }

    #[test]
    fn test_error_object_without_message_uses_string_form() {
        let body = r#"{"error":{"statusCode":401}}"#;
        assert_eq!(extract_error(body), Some(r#"{"statusCode":401}"#.to_string()));
    }

    #[test]
    fn test_non_json_body_is_tolerated() {
        assert_eq!(extract_error("PONG"), None);
    }

    #[test]
    fn test_success_body_is_clean() {
        let body = r#"{"webPages":{"value":[]}}"#;
        assert_eq!(extract_error(body), None);
    }
}
