use super::IChannelSender;
use paypulse_domain::DeliveryOutcome;
use std::sync::Mutex;

/// Recording sender for tests: remembers every (address, message) pair it was
/// asked to deliver and answers with a canned outcome.
pub struct InMemoryChannelSender {
    sent: Mutex<Vec<(String, String)>>,
    failure: Option<String>,
}

impl InMemoryChannelSender {
    /// A sender whose every attempt is `Delivered`.
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failure: None,
        }
    }

    /// A sender whose every attempt is `Failed` with the given reason.
    pub fn failing(reason: &str) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failure: Some(reason.to_string()),
        }
    }

    pub fn send_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn sent_to(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(address, _)| address.clone())
            .collect()
    }
}

impl Default for InMemoryChannelSender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IChannelSender for InMemoryChannelSender {
    async fn send(&self, address: &str, message: &str) -> DeliveryOutcome {
        self.sent
            .lock()
            .unwrap()
            .push((address.to_string(), message.to_string()));
        match &self.failure {
            Some(reason) => DeliveryOutcome::Failed(reason.clone()),
            None => DeliveryOutcome::Delivered,
        }
    }
}
