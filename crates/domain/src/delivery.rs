use std::fmt::Display;

/// A concrete transport a reminder message can go out on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeliveryChannel {
    Email,
    WhatsApp,
}

impl Display for DeliveryChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Email => write!(f, "email"),
            Self::WhatsApp => write!(f, "whatsapp"),
        }
    }
}

/// The result of one send attempt on one channel. A transport that rejects
/// the message is a `Failed` outcome, not an error: the delivery worker needs
/// to tell "channel said no" apart from "something in our code blew up".
#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryOutcome {
    Delivered,
    Failed(String),
}

impl DeliveryOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }
}
