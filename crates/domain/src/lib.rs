mod delivery;
mod reminder;
mod shared;

pub use delivery::{DeliveryChannel, DeliveryOutcome};
pub use reminder::{Reminder, ReminderChannel, ReminderStatus};
pub use shared::entity::{Entity, ID};
