mod reminder;
mod shared;

pub use reminder::IReminderRepo;
use reminder::{InMemoryReminderRepo, PostgresReminderRepo};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct Repos {
    pub reminders: Arc<dyn IReminderRepo>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        // This is needed to make sure that db is ready when opening server
        info!("DB CHECKING CONNECTION ...");
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(connection_string)
            .await?;
        info!("DB CHECKING CONNECTION ... [done]");

        Ok(Self {
            reminders: Arc::new(PostgresReminderRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            reminders: Arc::new(InMemoryReminderRepo::new()),
        }
    }
}
