use crate::delivery::DeliveryChannel;
use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

/// Which transport(s) the user asked to be reminded on. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReminderChannel {
    Email,
    WhatsApp,
    Both,
}

impl ReminderChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "EMAIL",
            Self::WhatsApp => "WHATSAPP",
            Self::Both => "BOTH",
        }
    }
}

impl Display for ReminderChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug)]
#[error("Invalid reminder channel: {0}")]
pub struct InvalidReminderChannelError(String);

impl FromStr for ReminderChannel {
    type Err = InvalidReminderChannelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EMAIL" => Ok(Self::Email),
            "WHATSAPP" => Ok(Self::WhatsApp),
            "BOTH" => Ok(Self::Both),
            _ => Err(InvalidReminderChannelError(s.to_string())),
        }
    }
}

/// Lifecycle of a `Reminder`: PENDING -> PROCESSING -> { SENT, FAILED }.
/// SENT and FAILED are never left again by this service; a FAILED reminder
/// only becomes deliverable again if an operator resets it to PENDING.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReminderStatus {
    Pending,
    Processing,
    Sent,
    Failed,
}

impl ReminderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Processing => "PROCESSING",
            Self::Sent => "SENT",
            Self::Failed => "FAILED",
        }
    }
}

impl Display for ReminderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug)]
#[error("Invalid reminder status: {0}")]
pub struct InvalidReminderStatusError(String);

impl FromStr for ReminderStatus {
    type Err = InvalidReminderStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "PROCESSING" => Ok(Self::Processing),
            "SENT" => Ok(Self::Sent),
            "FAILED" => Ok(Self::Failed),
            _ => Err(InvalidReminderStatusError(s.to_string())),
        }
    }
}

/// A `Reminder` is one scheduled notification for one user: a message that
/// should go out on the requested channel(s) once `remind_at` has passed.
/// The record is owned by the store; workers only ever hold a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
    pub id: ID,
    pub user_id: String,
    pub channel: ReminderChannel,
    /// Destination for the email channel. Must be populated at creation when
    /// `channel` is EMAIL or BOTH.
    pub email: Option<String>,
    /// Destination for the WhatsApp channel. Must be populated at creation
    /// when `channel` is WHATSAPP or BOTH.
    pub phone: Option<String>,
    pub message: String,
    /// The timestamp in millis at which the user wanted to be reminded.
    pub remind_at: i64,
    pub status: ReminderStatus,
    /// Number of failed delivery cycles so far. Only ever goes up.
    pub retry_count: i64,
}

impl Reminder {
    /// The channels this reminder is supposed to go out on.
    pub fn required_channels(&self) -> Vec<DeliveryChannel> {
        match self.channel {
            ReminderChannel::Email => vec![DeliveryChannel::Email],
            ReminderChannel::WhatsApp => vec![DeliveryChannel::WhatsApp],
            ReminderChannel::Both => vec![DeliveryChannel::Email, DeliveryChannel::WhatsApp],
        }
    }

    /// The address field backing the given channel, when populated.
    pub fn address_for(&self, channel: DeliveryChannel) -> Option<&str> {
        match channel {
            DeliveryChannel::Email => self.email.as_deref(),
            DeliveryChannel::WhatsApp => self.phone.as_deref(),
        }
    }

    /// PENDING -> PROCESSING. Returns whether this caller took the claim;
    /// any other current status means someone else already owns the record.
    pub fn claim(&mut self) -> bool {
        if self.status != ReminderStatus::Pending {
            return false;
        }
        self.status = ReminderStatus::Processing;
        true
    }

    /// PROCESSING -> SENT. Unconditional: the caller holds the claim.
    pub fn record_sent(&mut self) {
        self.status = ReminderStatus::Sent;
    }

    /// PROCESSING -> FAILED. `retry_count` goes up by one on every failed
    /// cycle and never resets.
    pub fn record_failure(&mut self) {
        self.status = ReminderStatus::Failed;
        self.retry_count += 1;
    }
}

impl Entity for Reminder {
    fn id(&self) -> &ID {
        &self.id
    }
}
