mod inmemory;
mod postgres;

pub use inmemory::InMemoryReminderRepo;
use paypulse_domain::{Reminder, ID};
pub use postgres::PostgresReminderRepo;

#[async_trait::async_trait]
pub trait IReminderRepo: Send + Sync {
    /// Insert a freshly created PENDING reminder.
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()>;

    /// Every reminder eligible for delivery right now. Selection is by
    /// PENDING status alone: `remind_at` is not compared against the cutoff,
    /// so a reminder is due from the moment it is created, and a FAILED
    /// reminder is never selected again until something external resets it
    /// to PENDING.
    async fn find_due(&self, cutoff: i64) -> anyhow::Result<Vec<Reminder>>;

    /// Atomically move one reminder PENDING -> PROCESSING and report whether
    /// this caller won the claim. Losing the race is not an error. The
    /// transition must be a single conditional update at the storage layer:
    /// scheduler instances in different processes race on the same record
    /// and exactly one may deliver it.
    async fn claim(&self, reminder_id: &ID) -> anyhow::Result<bool>;

    /// PROCESSING -> SENT for a claimed reminder.
    async fn mark_sent(&self, reminder_id: &ID) -> anyhow::Result<()>;

    /// PROCESSING -> FAILED for a claimed reminder, incrementing its retry
    /// count by one.
    async fn mark_failed(&self, reminder_id: &ID) -> anyhow::Result<()>;

    async fn find(&self, reminder_id: &ID) -> Option<Reminder>;
}
