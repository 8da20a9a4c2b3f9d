//! ApiGateway trait implementation for HttpGateway.

use async_trait::async_trait;
use tracing::debug;

use minerva_common::GatewayError;

use crate::{ApiGateway, ConverseMode, ConverseRequest, ConverseResponse, ValidationInfo};

use super::client::HttpGateway;

fn network_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout
    } else {
        GatewayError::Network(e.to_string())
    }
}

#[async_trait]
impl ApiGateway for HttpGateway {
    async fn validate(&self, credential: &str) -> Result<ValidationInfo, GatewayError> {
        let url = self.validate_url();
        debug!(url = %url, "credential validation request");

        let response = self
            .http
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, format!("Basic {credential}"))
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(GatewayError::Unauthorized);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        // The body is optional; an empty or non-JSON 200 still validates.
        let text = response.text().await.unwrap_or_default();
        let info = serde_json::from_str::<ValidationInfo>(&text).unwrap_or_default();
        Ok(info)
    }

    async fn converse(
        &self,
        credential: &str,
        project: &str,
        mode: ConverseMode,
        request: &ConverseRequest,
    ) -> Result<ConverseResponse, GatewayError> {
        let url = self.converse_url(project, mode);
        let body = self.build_converse_body(mode, request);

        debug!(url = %url, chained = request.id.is_some(), "converse request");

        let response = self
            .http
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, format!("Basic {credential}"))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(GatewayError::Unauthorized);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| GatewayError::Parse(e.to_string()))?;

        self.parse_converse_response(mode, json)
    }
}
