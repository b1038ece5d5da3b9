use crate::shared::usecase::UseCase;
use paypulse_domain::{DeliveryChannel, DeliveryOutcome, Reminder};
use paypulse_infra::PayPulseContext;
use tracing::warn;

/// Delivery worker for one claimed reminder: sends on every required channel
/// that has an address, aggregates the outcomes and records the resulting
/// terminal state.
///
/// Two policy quirks worth knowing about:
/// - A required channel whose address field is empty is skipped rather than
///   failing the delivery, so a BOTH reminder carrying only an email address
///   is SENT once that email goes out.
/// - A reminder marked FAILED is not picked up by later ticks; it stays
///   FAILED until something external resets it to PENDING.
#[derive(Debug)]
pub struct DeliverReminderUseCase {
    pub reminder: Reminder,
}

#[derive(Debug)]
pub struct DeliveryReport {
    /// Outcome per attempted channel. Channels skipped for lack of an
    /// address do not appear here.
    pub outcomes: Vec<(DeliveryChannel, DeliveryOutcome)>,
    pub delivered: bool,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeliverReminderUseCase {
    type Response = DeliveryReport;

    type Error = UseCaseError;

    const NAME: &'static str = "DeliverReminder";

    async fn execute(&mut self, ctx: &PayPulseContext) -> Result<Self::Response, Self::Error> {
        let mut outcomes = Vec::new();
        for channel in self.reminder.required_channels() {
            let address = match self.reminder.address_for(channel) {
                Some(address) => address,
                // A missing address skips the channel, it does not fail the
                // delivery
                None => continue,
            };

            let outcome = ctx
                .channels
                .sender_for(channel)
                .send(address, &self.reminder.message)
                .await;
            if let DeliveryOutcome::Failed(reason) = &outcome {
                warn!(
                    "Delivery of reminder {} on {} failed: {}",
                    self.reminder.id, channel, reason
                );
            }
            outcomes.push((channel, outcome));
        }

        let delivered = outcomes.iter().all(|(_, outcome)| outcome.is_delivered());
        if delivered {
            ctx.repos
                .reminders
                .mark_sent(&self.reminder.id)
                .await
                .map_err(|_| UseCaseError::StorageError)?;
        } else {
            ctx.repos
                .reminders
                .mark_failed(&self.reminder.id)
                .await
                .map_err(|_| UseCaseError::StorageError)?;
        }

        Ok(DeliveryReport {
            outcomes,
            delivered,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::usecase::execute;
    use paypulse_domain::{ReminderChannel, ReminderStatus};
    use paypulse_infra::InMemoryChannelSender;
    use std::sync::Arc;

    struct TestContext {
        ctx: PayPulseContext,
        email_sender: Arc<InMemoryChannelSender>,
        whatsapp_sender: Arc<InMemoryChannelSender>,
    }

    fn setup(
        email_sender: InMemoryChannelSender,
        whatsapp_sender: InMemoryChannelSender,
    ) -> TestContext {
        let mut ctx = PayPulseContext::create_inmemory();
        let email_sender = Arc::new(email_sender);
        let whatsapp_sender = Arc::new(whatsapp_sender);
        ctx.channels.email = email_sender.clone();
        ctx.channels.whatsapp = whatsapp_sender.clone();

        TestContext {
            ctx,
            email_sender,
            whatsapp_sender,
        }
    }

    async fn claimed_reminder(
        ctx: &PayPulseContext,
        channel: ReminderChannel,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> Reminder {
        let reminder = Reminder {
            id: Default::default(),
            user_id: "user-1".into(),
            channel,
            email: email.map(|e| e.to_string()),
            phone: phone.map(|p| p.to_string()),
            message: "Pay now".into(),
            remind_at: 1000,
            status: ReminderStatus::Pending,
            retry_count: 0,
        };
        ctx.repos.reminders.insert(&reminder).await.unwrap();
        assert!(ctx.repos.reminders.claim(&reminder.id).await.unwrap());
        ctx.repos.reminders.find(&reminder.id).await.unwrap()
    }

    #[actix_web::test]
    async fn a_successful_send_marks_the_reminder_sent() {
        let TestContext {
            ctx, email_sender, ..
        } = setup(
            InMemoryChannelSender::new(),
            InMemoryChannelSender::new(),
        );
        let reminder = claimed_reminder(&ctx, ReminderChannel::Email, Some("a@x.com"), None).await;
        let reminder_id = reminder.id.clone();

        let report = execute(DeliverReminderUseCase { reminder }, &ctx)
            .await
            .unwrap();

        assert!(report.delivered);
        assert_eq!(report.outcomes.len(), 1);
        assert_eq!(email_sender.send_count(), 1);
        assert_eq!(email_sender.sent_to(), vec!["a@x.com".to_string()]);

        let stored = ctx.repos.reminders.find(&reminder_id).await.unwrap();
        assert_eq!(stored.status, ReminderStatus::Sent);
        assert_eq!(stored.retry_count, 0);
    }

    #[actix_web::test]
    async fn both_with_only_an_email_address_counts_as_fully_delivered() {
        let TestContext {
            ctx,
            email_sender,
            whatsapp_sender,
        } = setup(
            InMemoryChannelSender::new(),
            InMemoryChannelSender::new(),
        );
        // No phone on a BOTH reminder: the whatsapp leg is skipped entirely
        let reminder = claimed_reminder(&ctx, ReminderChannel::Both, Some("a@x.com"), None).await;
        let reminder_id = reminder.id.clone();

        let report = execute(DeliverReminderUseCase { reminder }, &ctx)
            .await
            .unwrap();

        assert!(report.delivered);
        assert_eq!(report.outcomes.len(), 1);
        assert_eq!(email_sender.send_count(), 1);
        assert_eq!(whatsapp_sender.send_count(), 0);
        assert_eq!(
            ctx.repos.reminders.find(&reminder_id).await.unwrap().status,
            ReminderStatus::Sent
        );
    }

    #[actix_web::test]
    async fn one_failing_channel_fails_the_whole_delivery() {
        let TestContext {
            ctx,
            email_sender,
            whatsapp_sender,
        } = setup(
            InMemoryChannelSender::failing("mailbox unavailable"),
            InMemoryChannelSender::new(),
        );
        let reminder = claimed_reminder(
            &ctx,
            ReminderChannel::Both,
            Some("a@x.com"),
            Some("+4712345678"),
        )
        .await;
        let reminder_id = reminder.id.clone();

        let report = execute(DeliverReminderUseCase { reminder }, &ctx)
            .await
            .unwrap();

        // Both channels were attempted, the whatsapp leg even succeeded, but
        // the failed email leg fails the delivery as a whole
        assert!(!report.delivered);
        assert_eq!(report.outcomes.len(), 2);
        assert_eq!(email_sender.send_count(), 1);
        assert_eq!(whatsapp_sender.send_count(), 1);

        let stored = ctx.repos.reminders.find(&reminder_id).await.unwrap();
        assert_eq!(stored.status, ReminderStatus::Failed);
        assert_eq!(stored.retry_count, 1);
    }

    #[actix_web::test]
    async fn every_failed_cycle_bumps_the_retry_count() {
        let TestContext { ctx, .. } = setup(
            InMemoryChannelSender::failing("mailbox unavailable"),
            InMemoryChannelSender::new(),
        );
        let reminder = claimed_reminder(&ctx, ReminderChannel::Email, Some("a@x.com"), None).await;
        let reminder_id = reminder.id.clone();

        execute(
            DeliverReminderUseCase {
                reminder: reminder.clone(),
            },
            &ctx,
        )
        .await
        .unwrap();
        assert_eq!(
            ctx.repos
                .reminders
                .find(&reminder_id)
                .await
                .unwrap()
                .retry_count,
            1
        );

        // A second failed cycle on the same record keeps counting up
        execute(DeliverReminderUseCase { reminder }, &ctx)
            .await
            .unwrap();
        let stored = ctx.repos.reminders.find(&reminder_id).await.unwrap();
        assert_eq!(stored.status, ReminderStatus::Failed);
        assert_eq!(stored.retry_count, 2);
    }
}
