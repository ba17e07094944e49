use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDateTime, NaiveTime, TimeZone, Timelike};
use tracing_subscriber::{
    fmt::{format::Writer, time::FormatTime},
    EnvFilter,
};

use crate::time::TimeProvider;

pub const TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn display_time(time: NaiveDateTime) -> String {
    time.format(TS_FORMAT).to_string()
}

/// Local wall-clock time for a Unix UTC timestamp. Falls back to UTC if the
/// local zone has no mapping for it.
pub fn local_from_ts(ts: i64) -> NaiveDateTime {
    match Local.timestamp_opt(ts, 0).earliest() {
        Some(local) => local.naive_local(),
        None => DateTime::from_timestamp(ts, 0).map(|utc| utc.naive_utc()).unwrap_or_default(),
    }
}

pub fn truncate_to_hour(time: NaiveDateTime) -> NaiveDateTime {
    let hour = NaiveTime::from_hms_opt(time.hour(), 0, 0).unwrap_or_default();
    NaiveDateTime::new(time.date(), hour)
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

pub struct TimeFormatter<T: TimeProvider> {
    pub time_provider: Arc<T>,
}

impl<T: TimeProvider> FormatTime for TimeFormatter<T> {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", display_time(local_from_ts(self.time_provider.now())))
    }
}

/// Installs the global subscriber. Log level comes from `RUST_LOG` (default `info`).
/// When a time provider is given, log lines are stamped with its clock.
pub fn start_log<T: TimeProvider + 'static>(time_provider: Option<Arc<T>>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);
    // a second call (tests) keeps the first subscriber
    _ = match time_provider {
        Some(time_provider) => builder.with_timer(TimeFormatter { time_provider }).try_init(),
        None => builder.try_init(),
    };
}
