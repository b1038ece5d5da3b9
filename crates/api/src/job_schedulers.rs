use crate::reminder::send_due_reminders::SendDueRemindersUseCase;
use crate::shared::usecase::execute;
use actix_web::rt::time::interval;
use paypulse_infra::PayPulseContext;
use std::time::Duration;
use tracing::{debug, info};

/// Starts the periodic delivery loop. Every tick runs as its own task so a
/// slow tick never delays the timer; overlapping ticks are safe because each
/// reminder is claimed before it is delivered.
pub fn start_send_reminders_job(ctx: PayPulseContext) {
    actix_web::rt::spawn(async move {
        let mut interval = interval(Duration::from_millis(
            ctx.config.send_reminders_interval_millis,
        ));
        loop {
            interval.tick().await;
            let context = ctx.clone();
            actix_web::rt::spawn(send_reminders(context));
        }
    });
}

async fn send_reminders(context: PayPulseContext) {
    debug!("Checking due reminders");

    // Errors are already logged by the usecase layer; a failed tick is simply
    // retried by the next one
    if let Ok(summary) = execute(SendDueRemindersUseCase, &context).await {
        if summary.claimed > 0 {
            info!(
                "Reminder tick: {} claimed, {} sent, {} failed, {} skipped",
                summary.claimed, summary.sent, summary.failed, summary.skipped
            );
        }
    }
}
