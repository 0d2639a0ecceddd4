//! QQ "different dimension me" provider adapter.
//!
//! Implements the core `TransformPort` over the AI-processor HTTP endpoint:
//! one signed POST per request, a single attempt, no retries. The response
//! envelope carries its payload double-encoded (`extra` is a JSON document
//! inside the outer JSON string).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use cartoon_core::{errors::Error, ports::TransformPort, Result};

pub mod sign;

/// Fixed provider endpoint.
pub const ENDPOINT: &str =
    "https://ai.tu.qq.com/trpc.shadow_cv.ai_processor_cgi.AIProcessorCgi/Process";

/// Business identifier the provider routes on.
pub const BUSI_ID: &str = "different_dimension_me_img_entry";

/// `Origin` header value, also the prefix of the sign input.
pub(crate) const ORIGIN: &str = "https://h5.tu.qq.com";

/// Shared-secret suffix of the sign input (published by the provider's web
/// client, not actually secret).
pub(crate) const SIGN_SECRET: &str = "HQ31X02e";

const SIGN_VERSION: &str = "v1";

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct TransformRequest {
    #[serde(rename = "busiId")]
    busi_id: String,
    images: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    code: i64,
    #[serde(default)]
    msg: String,
    /// Double-encoded; only meaningful when `code == 0`.
    #[serde(default)]
    extra: String,
}

#[derive(Debug, Deserialize)]
struct ExtraPayload {
    img_urls: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct CartoonClient {
    endpoint: String,
    http: reqwest::Client,
}

impl CartoonClient {
    pub fn new() -> Self {
        Self::with_endpoint(ENDPOINT)
    }

    /// Point the client at a different endpoint (tests).
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Submit one base64-encoded image and return the result image URLs in
    /// provider order.
    pub async fn transform(&self, encoded_image: &str) -> Result<Vec<String>> {
        let body = serde_json::to_vec(&TransformRequest {
            busi_id: BUSI_ID.to_string(),
            images: vec![encoded_image.to_string()],
        })
        .map_err(|e| Error::Decode(format!("request serialization failed: {e}")))?;

        tracing::debug!(bytes = body.len(), "provider request");

        // The sign token binds the request to the exact serialized body
        // length, so it must be computed after serialization.
        let resp = self
            .http
            .post(&self.endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(reqwest::header::ORIGIN, ORIGIN)
            .header("x-sign-version", SIGN_VERSION)
            .header("x-sign-value", sign::sign(body.len()))
            .body(body)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("provider request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(Error::Transport(format!(
                "provider returned status {}",
                resp.status()
            )));
        }

        // The envelope is small; read it whole before parsing.
        let raw = resp
            .bytes()
            .await
            .map_err(|e| Error::Transport(format!("provider response read failed: {e}")))?;

        tracing::debug!(bytes = raw.len(), "provider response");

        let envelope: Envelope = serde_json::from_slice(&raw)
            .map_err(|e| Error::Decode(format!("provider envelope: {e}")))?;

        if envelope.code != 0 {
            return Err(Error::Provider {
                code: envelope.code,
                message: envelope.msg,
            });
        }

        let extra: ExtraPayload = serde_json::from_str(&envelope.extra)
            .map_err(|e| Error::Decode(format!("provider extra payload: {e}")))?;

        Ok(extra.img_urls)
    }
}

impl Default for CartoonClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TransformPort for CartoonClient {
    async fn transform(&self, encoded_image: &str) -> Result<Vec<String>> {
        CartoonClient::transform(self, encoded_image).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_round_trips_byte_for_byte() {
        let req = TransformRequest {
            busi_id: BUSI_ID.to_string(),
            images: vec!["aGVsbG8=".to_string()],
        };

        let bytes = serde_json::to_vec(&req).unwrap();
        assert_eq!(
            std::str::from_utf8(&bytes).unwrap(),
            r#"{"busiId":"different_dimension_me_img_entry","images":["aGVsbG8="]}"#
        );

        let back: TransformRequest = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(back, req);
    }

    #[test]
    fn extra_payload_is_double_encoded() {
        let envelope: Envelope = serde_json::from_str(
            r#"{"code":0,"msg":"ok","extra":"{\"img_urls\":[\"https://x/1.png\",\"https://x/2.png\"]}"}"#,
        )
        .unwrap();
        assert_eq!(envelope.code, 0);

        let extra: ExtraPayload = serde_json::from_str(&envelope.extra).unwrap();
        assert_eq!(extra.img_urls, ["https://x/1.png", "https://x/2.png"]);
    }

    #[test]
    fn envelope_tolerates_missing_extra() {
        let envelope: Envelope =
            serde_json::from_str(r#"{"code":1100,"msg":"image rejected"}"#).unwrap();
        assert_eq!(envelope.code, 1100);
        assert_eq!(envelope.msg, "image rejected");
        assert!(envelope.extra.is_empty());
    }
}
