use std::sync::Arc;

use tokio::task::JoinHandle;

use super::sms_aero_client::{SmsMessage, SmsSender};

/// Fire-and-forget SMS delivery.
///
/// In developer mode messages are written to the log instead of the gateway.
pub struct SmsService {
    sender: Arc<dyn SmsSender>,
    developer_mode: bool,
}

impl SmsService {
    pub fn new(sender: Arc<dyn SmsSender>, developer_mode: bool) -> Self {
        Self {
            sender,
            developer_mode,
        }
    }

    /// Queues `text` for `phone` and returns at once. Delivery errors are
    /// logged and never reach the caller.
    pub fn send_verify_sms(&self, phone: &str, text: &str) -> JoinHandle<()> {
        let message = SmsMessage {
            phone: phone.to_string(),
            text: text.to_string(),
        };

        if self.developer_mode {
            tracing::info!(
                phone = %message.phone,
                text = %message.text,
                "Developer mode, SMS not delivered"
            );
            return tokio::spawn(async {});
        }

        let sender = self.sender.clone();
        tokio::spawn(async move {
            match sender.send(&message).await {
                Ok(()) => tracing::info!("SMS sent to {}", message.phone),
                Err(e) => tracing::error!("Failed to send SMS to {}: {}", message.phone, e),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::RecordingSmsSender;

    #[tokio::test]
    async fn test_message_is_delivered_in_background() {
        let sender = Arc::new(RecordingSmsSender::default());
        let service = SmsService::new(sender.clone(), false);

        service
            .send_verify_sms("79991234567", "hello")
            .await
            .unwrap();

        let sent = sender.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].phone, "79991234567");
        assert_eq!(sent[0].text, "hello");
    }

    #[tokio::test]
    async fn test_developer_mode_skips_delivery() {
        let sender = Arc::new(RecordingSmsSender::default());
        let service = SmsService::new(sender.clone(), true);

        service.send_verify_sms("79991234567", "hello").await.unwrap();

        assert!(sender.sent().await.is_empty());
    }

    #[tokio::test]
    async fn test_delivery_failure_does_not_propagate() {
        let sender = Arc::new(RecordingSmsSender::failing());
        let service = SmsService::new(sender, false);

        assert!(service.send_verify_sms("79991234567", "hello").await.is_ok());
    }
}
