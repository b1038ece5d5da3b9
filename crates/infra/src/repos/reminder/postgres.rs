use super::IReminderRepo;
use paypulse_domain::{Reminder, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;

pub struct PostgresReminderRepo {
    pool: PgPool,
}

impl PostgresReminderRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ReminderRaw {
    reminder_uid: Uuid,
    user_id: String,
    channel: String,
    email: Option<String>,
    phone: Option<String>,
    message: String,
    remind_at: i64,
    status: String,
    retry_count: i64,
}

impl From<ReminderRaw> for Reminder {
    fn from(e: ReminderRaw) -> Self {
        Self {
            id: e.reminder_uid.into(),
            user_id: e.user_id,
            channel: e.channel.parse().unwrap(),
            email: e.email,
            phone: e.phone,
            message: e.message,
            remind_at: e.remind_at,
            status: e.status.parse().unwrap(),
            retry_count: e.retry_count,
        }
    }
}

#[async_trait::async_trait]
impl IReminderRepo for PostgresReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO reminders
            (reminder_uid, user_id, channel, email, phone, message, remind_at, status, retry_count)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(reminder.id.inner_ref())
        .bind(&reminder.user_id)
        .bind(reminder.channel.as_str())
        .bind(&reminder.email)
        .bind(&reminder.phone)
        .bind(&reminder.message)
        .bind(reminder.remind_at)
        .bind(reminder.status.as_str())
        .bind(reminder.retry_count)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to insert reminder: {:?}. DB returned error: {:?}",
                reminder, e
            );
            e
        })?;
        Ok(())
    }

    async fn find_due(&self, _cutoff: i64) -> anyhow::Result<Vec<Reminder>> {
        // Status is the only selection criterion here
        let reminders: Vec<ReminderRaw> = sqlx::query_as(
            r#"
            SELECT * FROM reminders
            WHERE status = 'PENDING'
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Unable to query due reminders. DB returned error: {:?}", e);
            e
        })?;

        Ok(reminders.into_iter().map(|r| r.into()).collect())
    }

    async fn claim(&self, reminder_id: &ID) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE reminders
            SET status = 'PROCESSING'
            WHERE reminder_uid = $1 AND status = 'PENDING'
            "#,
        )
        .bind(reminder_id.inner_ref())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to claim reminder: {}. DB returned error: {:?}",
                reminder_id, e
            );
            e
        })?;

        Ok(res.rows_affected() == 1)
    }

    async fn mark_sent(&self, reminder_id: &ID) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE reminders
            SET status = 'SENT'
            WHERE reminder_uid = $1
            "#,
        )
        .bind(reminder_id.inner_ref())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to mark reminder: {} as sent. DB returned error: {:?}",
                reminder_id, e
            );
            e
        })?;
        Ok(())
    }

    async fn mark_failed(&self, reminder_id: &ID) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE reminders
            SET status = 'FAILED',
            retry_count = retry_count + 1
            WHERE reminder_uid = $1
            "#,
        )
        .bind(reminder_id.inner_ref())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to mark reminder: {} as failed. DB returned error: {:?}",
                reminder_id, e
            );
            e
        })?;
        Ok(())
    }

    async fn find(&self, reminder_id: &ID) -> Option<Reminder> {
        let res: Option<ReminderRaw> = sqlx::query_as(
            r#"
            SELECT * FROM reminders
            WHERE reminder_uid = $1
            "#,
        )
        .bind(reminder_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            error!(
                "Unable to find reminder: {}. DB returned error: {:?}",
                reminder_id, e
            );
            None
        });

        res.map(|r| r.into())
    }
}
