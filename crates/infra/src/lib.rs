mod config;
mod repos;
mod services;
mod system;

pub use config::Config;
pub use repos::{IReminderRepo, Repos};
pub use services::{
    ChannelSenders, EmailSender, IChannelSender, InMemoryChannelSender, WhatsAppSender,
};
use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
pub use system::ISys;
use system::RealSys;

#[derive(Clone)]
pub struct PayPulseContext {
    pub repos: Repos,
    pub channels: ChannelSenders,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
}

struct ContextParams {
    pub postgres_connection_string: String,
}

impl PayPulseContext {
    async fn create(params: ContextParams) -> Self {
        let repos = Repos::create_postgres(&params.postgres_connection_string)
            .await
            .expect("Postgres credentials must be set and valid");
        Self {
            repos,
            channels: ChannelSenders::create_from_env(),
            config: Config::new(),
            sys: Arc::new(RealSys {}),
        }
    }

    /// Context over in-memory repos and recording channel senders. Used by
    /// the test suites; nothing here touches the network or a database.
    pub fn create_inmemory() -> Self {
        Self {
            repos: Repos::create_inmemory(),
            channels: ChannelSenders::create_inmemory(),
            config: Config::new(),
            sys: Arc::new(RealSys {}),
        }
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> PayPulseContext {
    PayPulseContext::create(ContextParams {
        postgres_connection_string: get_psql_connection_string(),
    })
    .await
}

fn get_psql_connection_string() -> String {
    const PSQL_CONNECTION_STRING: &str = "DATABASE_URL";

    std::env::var(PSQL_CONNECTION_STRING)
        .unwrap_or_else(|_| panic!("{} env var to be present.", PSQL_CONNECTION_STRING))
}

pub async fn run_migration() -> Result<(), MigrateError> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&get_psql_connection_string())
        .await
        .expect("TO CONNECT TO POSTGRES");

    sqlx::migrate!().run(&pool).await
}
