use super::IReminderRepo;
use crate::repos::shared::inmemory_repo::*;
use paypulse_domain::{Reminder, ReminderStatus, ID};

pub struct InMemoryReminderRepo {
    reminders: std::sync::Mutex<Vec<Reminder>>,
}

impl InMemoryReminderRepo {
    pub fn new() -> Self {
        Self {
            reminders: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IReminderRepo for InMemoryReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()> {
        insert(reminder, &self.reminders);
        Ok(())
    }

    async fn find_due(&self, _cutoff: i64) -> anyhow::Result<Vec<Reminder>> {
        Ok(find_by(&self.reminders, |reminder| {
            reminder.status == ReminderStatus::Pending
        }))
    }

    async fn claim(&self, reminder_id: &ID) -> anyhow::Result<bool> {
        // The whole compare-and-set happens under one lock, mirroring the
        // single conditional UPDATE the postgres repo issues
        let mut reminders = self.reminders.lock().unwrap();
        for reminder in reminders.iter_mut() {
            if reminder.id == *reminder_id {
                return Ok(reminder.claim());
            }
        }
        Ok(false)
    }

    async fn mark_sent(&self, reminder_id: &ID) -> anyhow::Result<()> {
        update_one(reminder_id, &self.reminders, |reminder| {
            reminder.record_sent()
        });
        Ok(())
    }

    async fn mark_failed(&self, reminder_id: &ID) -> anyhow::Result<()> {
        update_one(reminder_id, &self.reminders, |reminder| {
            reminder.record_failure()
        });
        Ok(())
    }

    async fn find(&self, reminder_id: &ID) -> Option<Reminder> {
        find(reminder_id, &self.reminders)
    }
}
