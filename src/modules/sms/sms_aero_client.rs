//! SMS Aero HTTP API client (`/v2/sms/send`)

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::config::SmsConfig;

/// Direct channel: delivered under the registered sender signature
const CHANNEL: &str = "DIRECT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsMessage {
    pub phone: String,
    pub text: String,
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    numbers: Vec<&'a str>,
    sign: &'a str,
    text: &'a str,
    channel: &'static str,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum SmsError {
    #[error("Failed to reach SMS gateway: {0}")]
    Transport(String),

    #[error("SMS gateway rejected the message: {0}")]
    Rejected(String),

    #[error("Failed to parse SMS gateway response: {0}")]
    Parse(String),
}

/// Anything that can deliver a text message to a phone
#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send(&self, message: &SmsMessage) -> Result<(), SmsError>;
}

pub struct SmsAeroClient {
    base_url: String,
    login: String,
    api_key: String,
    sign: String,
    client: reqwest::Client,
}

impl SmsAeroClient {
    pub fn new(config: &SmsConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            login: config.login.clone(),
            api_key: config.api_key.clone(),
            sign: config.sign.clone(),
            client: reqwest::Client::new(),
        }
    }

    fn request<'a>(&'a self, message: &'a SmsMessage) -> SendRequest<'a> {
        SendRequest {
            numbers: vec![message.phone.as_str()],
            sign: &self.sign,
            text: &message.text,
            channel: CHANNEL,
        }
    }
}

#[async_trait]
impl SmsSender for SmsAeroClient {
    async fn send(&self, message: &SmsMessage) -> Result<(), SmsError> {
        let url = format!("{}/v2/sms/send", self.base_url);

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.login, Some(&self.api_key))
            .json(&self.request(message))
            .send()
            .await
            .map_err(|e| SmsError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SmsError::Rejected(format!("HTTP {} - {}", status, body)));
        }

        let body: SendResponse = response
            .json()
            .await
            .map_err(|e| SmsError::Parse(e.to_string()))?;

        if !body.success {
            return Err(SmsError::Rejected(
                body.message.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }

        tracing::debug!("SMS accepted by gateway for {}", message.phone);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config() -> SmsConfig {
        SmsConfig {
            base_url: "https://gate.smsaero.ru/".to_string(),
            login: "login".to_string(),
            api_key: "key".to_string(),
            sign: "SMS Aero".to_string(),
            developer_mode: false,
            code_ttl: Duration::from_secs(300),
        }
    }

    #[test]
    fn test_request_uses_sign_and_direct_channel() {
        let client = SmsAeroClient::new(&config());
        let message = SmsMessage {
            phone: "79991234567".to_string(),
            text: "Code: 123456".to_string(),
        };

        let body = serde_json::to_value(client.request(&message)).unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "numbers": ["79991234567"],
                "sign": "SMS Aero",
                "text": "Code: 123456",
                "channel": "DIRECT"
            })
        );
        assert_eq!(client.base_url, "https://gate.smsaero.ru");
    }

    #[test]
    fn test_failure_response_parses() {
        let body: SendResponse =
            serde_json::from_str(r#"{"success": false, "data": null, "message": "Validation error."}"#)
                .unwrap();

        assert!(!body.success);
        assert_eq!(body.message.as_deref(), Some("Validation error."));
    }
}
