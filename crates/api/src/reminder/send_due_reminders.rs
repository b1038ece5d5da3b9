use super::deliver_reminder::DeliverReminderUseCase;
use crate::shared::usecase::{execute, UseCase};
use futures::future::join_all;
use paypulse_domain::Reminder;
use paypulse_infra::PayPulseContext;
use tracing::warn;

/// One scheduler tick: claim every due reminder and run the delivery worker
/// for each claimed one. Reminders within a tick are processed concurrently,
/// each under its own claim, and a failure on one never stops the others.
/// Overlapping ticks, or other scheduler processes polling the same store,
/// race per record on the claim and the loser just skips.
#[derive(Debug)]
pub struct SendDueRemindersUseCase;

/// What one tick did, for the scheduler log.
#[derive(Debug, Default, PartialEq)]
pub struct TickSummary {
    pub claimed: usize,
    pub sent: usize,
    pub failed: usize,
    /// Reminders observed as due but claimed by somebody else first.
    pub skipped: usize,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    StorageError,
}

enum ItemResult {
    Sent,
    Failed,
    Skipped,
}

async fn claim_and_deliver(reminder: Reminder, ctx: &PayPulseContext) -> ItemResult {
    match ctx.repos.reminders.claim(&reminder.id).await {
        Ok(true) => {}
        Ok(false) => return ItemResult::Skipped,
        Err(e) => {
            warn!(
                "Could not claim reminder {}: {:?}. Leaving it for the next tick",
                reminder.id, e
            );
            return ItemResult::Skipped;
        }
    }

    let reminder_id = reminder.id.clone();
    let usecase = DeliverReminderUseCase { reminder };
    match execute(usecase, ctx).await {
        Ok(report) if report.delivered => ItemResult::Sent,
        Ok(_) => ItemResult::Failed,
        Err(e) => {
            // The delivery worker only errors on store writes; the record is
            // left for operational recovery and the rest of the batch goes on
            warn!("Delivery of reminder {} errored: {:?}", reminder_id, e);
            ItemResult::Failed
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for SendDueRemindersUseCase {
    type Response = TickSummary;

    type Error = UseCaseError;

    const NAME: &'static str = "SendDueReminders";

    async fn execute(&mut self, ctx: &PayPulseContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_timestamp_millis();
        let due = ctx
            .repos
            .reminders
            .find_due(now)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        let deliveries = due
            .into_iter()
            .map(|reminder| claim_and_deliver(reminder, ctx));
        let results = join_all(deliveries).await;

        let mut summary = TickSummary::default();
        for result in results {
            match result {
                ItemResult::Sent => {
                    summary.claimed += 1;
                    summary.sent += 1;
                }
                ItemResult::Failed => {
                    summary.claimed += 1;
                    summary.failed += 1;
                }
                ItemResult::Skipped => summary.skipped += 1,
            }
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::reminder::create_reminder::CreateReminderUseCase;
    use paypulse_domain::{ReminderChannel, ReminderStatus};
    use paypulse_infra::InMemoryChannelSender;
    use std::sync::Arc;

    async fn create_email_reminder(ctx: &PayPulseContext) -> Reminder {
        let usecase = CreateReminderUseCase {
            user_id: "user-1".into(),
            channel: ReminderChannel::Email,
            email: Some("a@x.com".into()),
            phone: None,
            message: "Pay now".into(),
            remind_at: ctx.sys.get_timestamp_millis(),
        };
        execute(usecase, ctx).await.unwrap()
    }

    #[actix_web::test]
    async fn a_tick_without_due_reminders_does_nothing() {
        let ctx = PayPulseContext::create_inmemory();

        let summary = execute(SendDueRemindersUseCase, &ctx).await.unwrap();

        assert_eq!(summary, TickSummary::default());
    }

    #[actix_web::test]
    async fn a_tick_delivers_a_due_reminder() {
        let mut ctx = PayPulseContext::create_inmemory();
        let email_sender = Arc::new(InMemoryChannelSender::new());
        ctx.channels.email = email_sender.clone();

        let reminder = create_email_reminder(&ctx).await;

        let summary = execute(SendDueRemindersUseCase, &ctx).await.unwrap();
        assert_eq!(
            summary,
            TickSummary {
                claimed: 1,
                sent: 1,
                failed: 0,
                skipped: 0
            }
        );

        let delivered = ctx.repos.reminders.find(&reminder.id).await.unwrap();
        assert_eq!(delivered.status, ReminderStatus::Sent);
        assert_eq!(delivered.retry_count, 0);
        assert_eq!(email_sender.send_count(), 1);
        assert_eq!(email_sender.sent_to(), vec!["a@x.com".to_string()]);
    }

    #[actix_web::test]
    async fn a_failed_delivery_is_not_attempted_again_on_the_next_tick() {
        let mut ctx = PayPulseContext::create_inmemory();
        let email_sender = Arc::new(InMemoryChannelSender::failing("mailbox unavailable"));
        ctx.channels.email = email_sender.clone();

        let reminder = create_email_reminder(&ctx).await;

        let summary = execute(SendDueRemindersUseCase, &ctx).await.unwrap();
        assert_eq!(summary.failed, 1);

        let failed = ctx.repos.reminders.find(&reminder.id).await.unwrap();
        assert_eq!(failed.status, ReminderStatus::Failed);
        assert_eq!(failed.retry_count, 1);

        // The record is FAILED, not PENDING, so the next tick leaves it alone
        let summary = execute(SendDueRemindersUseCase, &ctx).await.unwrap();
        assert_eq!(summary, TickSummary::default());
        assert_eq!(email_sender.send_count(), 1);
        assert_eq!(
            ctx.repos
                .reminders
                .find(&reminder.id)
                .await
                .unwrap()
                .retry_count,
            1
        );
    }

    #[actix_web::test]
    async fn a_sent_reminder_is_never_delivered_twice() {
        let mut ctx = PayPulseContext::create_inmemory();
        let email_sender = Arc::new(InMemoryChannelSender::new());
        ctx.channels.email = email_sender.clone();

        create_email_reminder(&ctx).await;

        execute(SendDueRemindersUseCase, &ctx).await.unwrap();
        let summary = execute(SendDueRemindersUseCase, &ctx).await.unwrap();

        assert_eq!(summary, TickSummary::default());
        assert_eq!(email_sender.send_count(), 1);
    }

    #[actix_web::test]
    async fn concurrent_ticks_deliver_a_reminder_exactly_once() {
        let mut ctx = PayPulseContext::create_inmemory();
        let email_sender = Arc::new(InMemoryChannelSender::new());
        ctx.channels.email = email_sender.clone();

        let reminder = create_email_reminder(&ctx).await;

        let (first, second) = futures::join!(
            execute(SendDueRemindersUseCase, &ctx),
            execute(SendDueRemindersUseCase, &ctx),
        );
        let (first, second) = (first.unwrap(), second.unwrap());

        // Both ticks may observe the record, but only one wins the claim
        assert_eq!(first.sent + second.sent, 1);
        assert_eq!(email_sender.send_count(), 1);
        assert_eq!(
            ctx.repos.reminders.find(&reminder.id).await.unwrap().status,
            ReminderStatus::Sent
        );
    }

    #[actix_web::test]
    async fn each_reminder_in_a_batch_is_isolated_from_the_others() {
        let mut ctx = PayPulseContext::create_inmemory();
        let email_sender = Arc::new(InMemoryChannelSender::new());
        let whatsapp_sender = Arc::new(InMemoryChannelSender::failing("blocked number"));
        ctx.channels.email = email_sender.clone();
        ctx.channels.whatsapp = whatsapp_sender.clone();

        let email_reminder = create_email_reminder(&ctx).await;
        let whatsapp_reminder = execute(
            CreateReminderUseCase {
                user_id: "user-2".into(),
                channel: ReminderChannel::WhatsApp,
                email: None,
                phone: Some("+4712345678".into()),
                message: "Pay now".into(),
                remind_at: ctx.sys.get_timestamp_millis(),
            },
            &ctx,
        )
        .await
        .unwrap();

        let summary = execute(SendDueRemindersUseCase, &ctx).await.unwrap();

        // The failing whatsapp delivery does not affect the email one
        assert_eq!(summary.claimed, 2);
        assert_eq!(summary.sent, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(
            ctx.repos
                .reminders
                .find(&email_reminder.id)
                .await
                .unwrap()
                .status,
            ReminderStatus::Sent
        );
        assert_eq!(
            ctx.repos
                .reminders
                .find(&whatsapp_reminder.id)
                .await
                .unwrap()
                .status,
            ReminderStatus::Failed
        );
    }
}
