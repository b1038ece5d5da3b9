mod email;
mod inmemory;
mod whatsapp;

pub use email::EmailSender;
pub use inmemory::InMemoryChannelSender;
use paypulse_domain::{DeliveryChannel, DeliveryOutcome};
use std::sync::Arc;
pub use whatsapp::WhatsAppSender;

/// One send attempt over one notification transport. Implementations never
/// retry internally, and a transport that rejects the message answers with a
/// `Failed` outcome instead of an error.
#[async_trait::async_trait]
pub trait IChannelSender: Send + Sync {
    async fn send(&self, address: &str, message: &str) -> DeliveryOutcome;
}

/// The configured sender for each delivery channel.
#[derive(Clone)]
pub struct ChannelSenders {
    pub email: Arc<dyn IChannelSender>,
    pub whatsapp: Arc<dyn IChannelSender>,
}

impl ChannelSenders {
    pub fn create_from_env() -> Self {
        Self {
            email: Arc::new(EmailSender::create_from_env()),
            whatsapp: Arc::new(WhatsAppSender::create_from_env()),
        }
    }

    /// Recording senders that always deliver, for tests.
    pub fn create_inmemory() -> Self {
        Self {
            email: Arc::new(InMemoryChannelSender::new()),
            whatsapp: Arc::new(InMemoryChannelSender::new()),
        }
    }

    pub fn sender_for(&self, channel: DeliveryChannel) -> &dyn IChannelSender {
        match channel {
            DeliveryChannel::Email => self.email.as_ref(),
            DeliveryChannel::WhatsApp => self.whatsapp.as_ref(),
        }
    }
}

fn get_env_var(key: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| panic!("{} env var to be present.", key))
}
