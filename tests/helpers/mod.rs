use paypulse_api::Application;
use paypulse_infra::PayPulseContext;

pub struct TestApp {
    pub address: String,
    pub ctx: PayPulseContext,
}

/// Spin up the real application on a random port over the in-memory context.
/// The returned context shares the store with the running server, so tests
/// can observe what the scheduler did to the records they created over HTTP.
pub async fn spawn_app() -> TestApp {
    let mut ctx = PayPulseContext::create_inmemory();
    ctx.config.port = 0;
    // A short interval keeps the delivery assertions from waiting long
    ctx.config.send_reminders_interval_millis = 50;

    let application = Application::new(ctx.clone())
        .await
        .expect("Failed to build application");
    let address = format!("http://127.0.0.1:{}", application.port());

    actix_web::rt::spawn(application.start());

    TestApp { address, ctx }
}
