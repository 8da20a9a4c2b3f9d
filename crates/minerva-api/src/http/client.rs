//! HTTP gateway struct, request building, and response parsing.

use minerva_common::GatewayError;

use crate::{ConverseMode, ConverseRequest, ConverseResponse};

use super::config::GatewayConfig;

/// Gateway over the remote inference API.
pub struct HttpGateway {
    pub(crate) config: GatewayConfig,
    pub(crate) http: reqwest::Client,
}

impl HttpGateway {
    pub fn new(config: GatewayConfig) -> Self {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .expect("failed to build HTTP client");
        Self { config, http }
    }

    pub(crate) fn validate_url(&self) -> String {
        format!("{}/users/me", self.config.base_url)
    }

    pub(crate) fn converse_url(&self, project: &str, mode: ConverseMode) -> String {
        format!(
            "{}/projects/{}/{}",
            self.config.base_url,
            project,
            mode.endpoint()
        )
    }

    /// Build the JSON body for a chat/question call. The text field name
    /// depends on the endpoint; optional parameters are omitted entirely
    /// when unset so the server applies its own defaults.
    pub(crate) fn build_converse_body(
        &self,
        mode: ConverseMode,
        request: &ConverseRequest,
    ) -> serde_json::Value {
        let text_field = match mode {
            ConverseMode::Chat => "message",
            ConverseMode::Question => "question",
        };

        let mut body = serde_json::json!({ text_field: request.text });

        if let Some(ref id) = request.id {
            if !id.is_empty() {
                body["id"] = serde_json::json!(id);
            }
        }
        if let Some(k) = request.k {
            body["k"] = serde_json::json!(k);
        }
        if let Some(score) = request.score {
            body["score"] = serde_json::json!(score);
        }
        if let Some(ref system) = request.system {
            if !system.is_empty() {
                body["system"] = serde_json::json!(system);
            }
        }

        body
    }

    /// Parse a chat/question response body.
    pub(crate) fn parse_converse_response(
        &self,
        mode: ConverseMode,
        json: serde_json::Value,
    ) -> Result<ConverseResponse, GatewayError> {
        let answer_field = match mode {
            ConverseMode::Chat => "response",
            ConverseMode::Question => "answer",
        };

        let text = json[answer_field]
            .as_str()
            .ok_or_else(|| GatewayError::Parse(format!("missing '{answer_field}' in response")))?
            .to_string();

        let id = json["id"].as_str().unwrap_or("").to_string();

        let mut aux = serde_json::Map::new();
        for key in ["sources", "image"] {
            if let Some(value) = json.get(key) {
                if !value.is_null() {
                    aux.insert(key.to_string(), value.clone());
                }
            }
        }
        let aux = if aux.is_empty() {
            None
        } else {
            Some(serde_json::Value::Object(aux))
        };

        Ok(ConverseResponse { id, text, aux })
    }
}
