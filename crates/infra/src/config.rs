use tracing::warn;

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// How often the scheduler looks for due reminders, in millis.
    /// Every tick claims and delivers whatever is PENDING at that moment.
    pub send_reminders_interval_millis: u64,
}

impl Config {
    pub fn new() -> Self {
        let default_port = "5000";
        let port = std::env::var("PORT").unwrap_or(default_port.into());
        let port = match port.parse::<usize>() {
            Ok(port) => port,
            Err(_) => {
                warn!(
                    "The given PORT: {} is not valid, falling back to the default port: {}.",
                    port, default_port
                );
                default_port.parse::<usize>().unwrap()
            }
        };
        let default_interval: u64 = 5000;
        let send_reminders_interval_millis = match std::env::var("SEND_REMINDERS_INTERVAL_MILLIS") {
            Ok(interval) => match interval.parse::<u64>() {
                Ok(interval) if interval > 0 => interval,
                _ => {
                    warn!(
                        "The given SEND_REMINDERS_INTERVAL_MILLIS: {} is not valid, falling back to the default interval: {} millis.",
                        interval, default_interval
                    );
                    default_interval
                }
            },
            Err(_) => default_interval,
        };
        Self {
            port,
            send_reminders_interval_millis,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
