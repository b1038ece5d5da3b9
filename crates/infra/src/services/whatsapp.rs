use super::{get_env_var, IChannelSender};
use paypulse_domain::DeliveryOutcome;
use reqwest::Client;
use std::time::Duration;
use tracing::{info, warn};

const API_BASE_URL: &str = "https://api.twilio.com/2010-04-01";
const SEND_TIMEOUT_SECS: u64 = 10;

/// Sends WhatsApp messages through the Twilio Messages API. Twilio expects a
/// form-encoded POST with basic auth and recipients prefixed `whatsapp:`.
pub struct WhatsAppSender {
    client: Client,
    account_sid: String,
    auth_token: String,
    from: String,
}

impl WhatsAppSender {
    pub fn new(account_sid: String, auth_token: String, from: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(SEND_TIMEOUT_SECS))
            .build()
            .expect("To build the whatsapp http client");

        Self {
            client,
            account_sid,
            auth_token,
            from,
        }
    }

    pub fn create_from_env() -> Self {
        Self::new(
            get_env_var("TWILIO_ACCOUNT_SID"),
            get_env_var("TWILIO_AUTH_TOKEN"),
            get_env_var("TWILIO_WHATSAPP_FROM"),
        )
    }
}

#[async_trait::async_trait]
impl IChannelSender for WhatsAppSender {
    async fn send(&self, address: &str, message: &str) -> DeliveryOutcome {
        let params = [
            ("From", self.from.clone()),
            ("To", format!("whatsapp:{}", address)),
            ("Body", message.to_string()),
        ];

        match self
            .client
            .post(&format!(
                "{}/Accounts/{}/Messages.json",
                API_BASE_URL, self.account_sid
            ))
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&params)
            .send()
            .await
        {
            Ok(res) if res.status().is_success() => {
                info!("WhatsApp sent to {}", address);
                DeliveryOutcome::Delivered
            }
            Ok(res) => {
                warn!(
                    "Twilio rejected whatsapp message to {}: status {}",
                    address,
                    res.status()
                );
                DeliveryOutcome::Failed(format!("twilio returned status {}", res.status()))
            }
            Err(e) => {
                warn!("Twilio request error: {:?}", e);
                DeliveryOutcome::Failed(format!("twilio request error: {}", e))
            }
        }
    }
}
