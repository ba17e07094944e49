use chrono::NaiveDateTime;

use crate::utils::{local_from_ts, truncate_to_hour};

pub trait TimeProvider: Send + Sync {
    fn now(&self) -> i64; // Returns the current time as a Unix UTC timestamp

    /// Local wall-clock time of `now()` with minutes and seconds zeroed.
    fn current_hour(&self) -> NaiveDateTime {
        truncate_to_hour(local_from_ts(self.now()))
    }
}

#[derive(Debug)]
pub struct RealTimeProvider;

impl TimeProvider for RealTimeProvider {
    fn now(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

#[cfg(test)]
mod test {
    use super::{RealTimeProvider, TimeProvider};
    use chrono::Timelike;

    #[test]
    fn current_hour_is_truncated() {
        let hour = RealTimeProvider.current_hour();
        assert_eq!(hour.minute(), 0);
        assert_eq!(hour.second(), 0);
        assert_eq!(hour.nanosecond(), 0);
    }
}
