use paypulse_domain::{Reminder, ReminderChannel, ReminderStatus, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReminderDTO {
    pub id: ID,
    pub user_id: String,
    pub channel: ReminderChannel,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub message: String,
    pub remind_at: i64,
    pub status: ReminderStatus,
    pub retry_count: i64,
}

impl ReminderDTO {
    pub fn new(reminder: Reminder) -> Self {
        Self {
            id: reminder.id.clone(),
            user_id: reminder.user_id,
            channel: reminder.channel,
            email: reminder.email,
            phone: reminder.phone,
            message: reminder.message,
            remind_at: reminder.remind_at,
            status: reminder.status,
            retry_count: reminder.retry_count,
        }
    }
}
