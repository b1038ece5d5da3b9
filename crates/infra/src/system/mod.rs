use chrono::Utc;

/// Clock seam: the scheduler asks this for "now" instead of the system time,
/// which lets tests pin the timestamp.
pub trait ISys: Send + Sync {
    /// The current timestamp in millis
    fn get_timestamp_millis(&self) -> i64;
}

/// The real wall clock, used outside of tests
pub struct RealSys {}
impl ISys for RealSys {
    fn get_timestamp_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}
