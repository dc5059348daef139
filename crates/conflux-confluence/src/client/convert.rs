//! Content body conversion via the Confluence API.

use serde::Deserialize;
use tracing::{debug, info, warn};

use super::ConfluenceClient;
use crate::convert::{ConversionService, ConvertRequest};
use crate::error::ConvertError;

#[derive(Deserialize)]
struct ConvertResponse {
    value: Option<String>,
}

impl ConfluenceClient {
    fn convert_url(&self, request: &ConvertRequest) -> String {
        format!("{}/contentbody/convert/{}", self.api_url(), request.to)
    }
}

impl ConversionService for ConfluenceClient {
    fn convert(&self, request: &ConvertRequest) -> Result<String, ConvertError> {
        let url = self.convert_url(request);

        info!("Converting content from {} to {}", request.from, request.to);

        let payload_bytes = serde_json::to_vec(request)?;

        let response = self
            .agent
            .post(&url)
            .header("Authorization", &self.auth.header())
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .send(&payload_bytes[..])?;

        let status = response.status().as_u16();
        let mut body_reader = response.into_body();

        if status >= 400 {
            let error_body = body_reader
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            warn!(status, "Conversion request failed");
            return Err(ConvertError::from_status(status, &error_body));
        }

        let converted: ConvertResponse = body_reader.read_json()?;
        let value = converted.value.ok_or(ConvertError::MissingValue)?;
        debug!("Converted {} bytes into {} bytes", request.value.len(), value.len());
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::client::Auth;
    use crate::representation::Representation;

    #[test]
    fn test_convert_url_uses_target() {
        let client = ConfluenceClient::new(
            "https://confluence.example.com",
            Auth::Bearer("t".to_owned()),
            Duration::from_secs(1),
        );
        let request = ConvertRequest {
            value: String::new(),
            from: Representation::Storage,
            to: Representation::View,
        };
        assert_eq!(
            client.convert_url(&request),
            "https://confluence.example.com/rest/api/contentbody/convert/view"
        );
    }

    #[test]
    fn test_response_without_value() {
        let response: ConvertResponse =
            serde_json::from_str(r#"{"representation":"view"}"#).unwrap();
        assert!(response.value.is_none());
        let response: ConvertResponse =
            serde_json::from_str(r#"{"value":"<p>x</p>","representation":"view"}"#).unwrap();
        assert_eq!(response.value.as_deref(), Some("<p>x</p>"));
    }
}
