//! Google API key probe.
//!
//! Google Cloud keys are scoped per API, so one key is exercised
//! against four services. Google also signals logical errors inside
//! 200 responses two different ways: a non-"OK" top-level `status`
//! field (Maps style) and a top-level `error` object (Cloud style).
//! The `error.message` check runs second so it supersedes the
//! status-derived message when both are present.

use async_trait::async_trait;
use serde_json::Value;

use super::{run_endpoint, Credential, ProbeResult, ProviderProbe};
use crate::transport::{ProbeRequest, Transport};

pub struct GoogleProbe;

const VISION_PAYLOAD: &str = r#"{"requests":[{"image":{"source":{"imageUri":"https://example.com/image.jpg"}},"features":[{"type":"LABEL_DETECTION","maxResults":1}]}]}"#;

fn endpoints(key: &str) -> Vec<(&'static str, ProbeRequest)> {
    vec![
        (
            "Maps Geocoding API",
            ProbeRequest::get(format!(
                "https://maps.googleapis.com/maps/api/geocode/json?address=New+York&key={key}"
            )),
        ),
        (
            "YouTube Data API",
            ProbeRequest::get(format!(
                "https://www.googleapis.com/youtube/v3/search?part=snippet&maxResults=1&key={key}"
            )),
        ),
        (
            "Cloud Vision API",
            ProbeRequest::post(
                format!("https://vision.googleapis.com/v1/images:annotate?key={key}"),
                VISION_PAYLOAD,
            )
            .header("Content-Type", "application/json"),
        ),
        (
            "Translate API",
            ProbeRequest::get(format!(
                "https://translation.googleapis.com/language/translate/v2?key={key}&q=hello&target=es"
            )),
        ),
    ]
}

/// Pull Google's embedded error signal out of a response body.
/// Applied to every response regardless of status so that non-2xx
/// bodies still contribute a readable message.
fn extract_error(body: &str) -> Option<String> {
    let parsed: Value = serde_json::from_str(body).ok()?;

    let mut message = None;
    if let Some(status) = parsed["status"].as_str() {
        if status != "OK" {
            message = Some(
                parsed["error_message"]
                    .as_str()
                    .map(String::from)
                    .unwrap_or_else(|| format!("API returned status: {}", status)),
            );
        }
    }

    // Checked second: a structured error object wins over the status field.
    if parsed["error"].is_object() {
        if let Some(m) = parsed["error"]["message"].as_str() {
            message = Some(m.to_string());
        }
    }

    message
}

#[async_trait]
impl ProviderProbe for GoogleProbe {
    fn provider_id(&self) -> &str {
        "google"
    }

    fn display_name(&self) -> &str {
        "Google"
    }

    async fn run(&self, credential: &Credential, transport: &dyn Transport) -> Vec<ProbeResult> {
        let key = credential.primary();
        let mut results = Vec::with_capacity(4);
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
    fn test_ok_status_is_clean() {
        assert_eq!(extract_error(r#"{"status":"OK","results":[]}"#), None);
    }

    #[test]
    fn test_non_ok_status_uses_error_message_field() {
        let body = r#"{"status":"REQUEST_DENIED","error_message":"The provided API key is invalid."}"#;
        assert_eq!(
            extract_error(body),
            Some("The provided API key is invalid.".to_string())
        );
    }

    #[test]
    fn test_non_ok_status_without_message_is_synthesized() {
        let body = r#"{"status":"OVER_QUERY_LIMIT"}"#;
        assert_eq!(
            extract_error(body),
            Some("API returned status: OVER_QUERY_LIMIT".to_string())
        );
    }

    #[test]
    fn test_error_object_message() {
        let body = r#"{"error":{"code":403,"message":"quota exceeded"}}"#;
        assert_eq!(extract_error(body), Some("quota exceeded".to_string()));
    }

    #[test]
    fn test_error_object_supersedes_status_field() {
        let body = r#"{"status":"REQUEST_DENIED","error_message":"denied","error":{"message":"key expired"}}"#;
        assert_eq!(extract_error(body), Some("key expired".to_string()));
    }

    #[test]
    fn test_non_json_body_has_no_signal() {
        assert_eq!(extract_error("<html>gateway error</html>"), None);
    }

    #[test]
    fn test_endpoint_order_is_fixed() {
        let names: Vec<&str> = endpoints("k").into_iter().map(|(n, _)| n).collect();
        assert_eq!(
            names,
            vec![
                "Maps Geocoding API",
                "YouTube Data API",
                "Cloud Vision API",
                "Translate API"
            ]
        );
    }
}
