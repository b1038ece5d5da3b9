use crate::dtos::ReminderDTO;
use paypulse_domain::{Reminder, ReminderChannel};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderResponse {
    pub reminder: ReminderDTO,
}

impl ReminderResponse {
    pub fn new(reminder: Reminder) -> Self {
        Self {
            reminder: ReminderDTO::new(reminder),
        }
    }
}

pub mod create_reminder {
    use super::*;

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub user_id: String,
        pub channel: ReminderChannel,
        pub email: Option<String>,
        pub phone: Option<String>,
        pub message: String,
        pub remind_at: i64,
    }

    pub type APIResponse = ReminderResponse;
}
