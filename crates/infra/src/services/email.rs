use super::{get_env_var, IChannelSender};
use paypulse_domain::DeliveryOutcome;
use reqwest::Client;
use std::time::Duration;
use tracing::{info, warn};

const SEND_TIMEOUT_SECS: u64 = 10;

/// Sends reminder emails through an HTTP mail API: a bearer-authorized JSON
/// POST with from/to/subject/html fields.
pub struct EmailSender {
    client: Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl EmailSender {
    pub fn new(api_url: String, api_key: String, from: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(SEND_TIMEOUT_SECS))
            .build()
            .expect("To build the email http client");

        Self {
            client,
            api_url,
            api_key,
            from,
        }
    }

    pub fn create_from_env() -> Self {
        Self::new(
            get_env_var("EMAIL_API_URL"),
            get_env_var("EMAIL_API_KEY"),
            get_env_var("EMAIL_FROM"),
        )
    }
}

#[async_trait::async_trait]
impl IChannelSender for EmailSender {
    async fn send(&self, address: &str, message: &str) -> DeliveryOutcome {
        let body = serde_json::json!({
            "from": format!("PayPulse <{}>", self.from),
            "to": address,
            "subject": "Payment Reminder",
            "html": format!(
                "<h3>Payment Reminder</h3><p>{}</p><br /><p>PayPulse</p>",
                message
            ),
        });

        match self
            .client
            .post(&self.api_url)
            .header("authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
        {
            Ok(res) if res.status().is_success() => {
                info!("Email sent to {}", address);
                DeliveryOutcome::Delivered
            }
            Ok(res) => {
                warn!(
                    "Email api rejected message to {}: status {}",
                    address,
                    res.status()
                );
                DeliveryOutcome::Failed(format!("email api returned status {}", res.status()))
            }
            Err(e) => {
                warn!("Email api request error: {:?}", e);
                DeliveryOutcome::Failed(format!("email api request error: {}", e))
            }
        }
    }
}
