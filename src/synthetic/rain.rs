use std::ops::{Range, RangeInclusive};

use rand::{seq::index, Rng};
use serde::Serialize;
use tracing::debug;

use crate::error::AppError;

pub const EVENT_COUNT: RangeInclusive<usize> = 2..=4;
/// Events never fall in the first or last day of the series.
pub const EDGE_MARGIN_HOURS: usize = 24;
/// inches
pub const EVENT_AMOUNT: Range<f64> = 0.2..1.0;

/// A single infiltration pulse at an hour offset from the start of the series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RainEvent {
    pub hour: usize,
    pub amount: f64,
}

impl RainEvent {
    pub fn new(hour: usize, amount: f64) -> Self {
        Self { hour, amount }
    }

    /// Hours elapsed since the event while its infiltration tail is active
    /// (strictly after the event hour, strictly before `tail_hours` later).
    pub fn hours_into_tail(&self, hour: usize, tail_hours: usize) -> Option<usize> {
        let since = hour.checked_sub(self.hour)?;
        (since > 0 && since < tail_hours).then_some(since)
    }
}

/// Draws 2-4 events at distinct hours in `[24, n_hours - 24)`, each with an
/// amount in `[0.2, 1.0)`. Fails when the window is too short for the drawn count.
pub fn draw_rain_events<R: Rng + ?Sized>(rng: &mut R, n_hours: usize) -> Result<Vec<RainEvent>, AppError> {
    let n_events = rng.gen_range(EVENT_COUNT);
    let window = n_hours.saturating_sub(EDGE_MARGIN_HOURS).saturating_sub(EDGE_MARGIN_HOURS);
    if window < n_events {
        return Err(AppError::InvalidArgument(format!(
            "{} hours leave room for {} rain event hour(s), {} requested",
            n_hours, window, n_events
        )));
    }

    let hours = index::sample(rng, window, n_events).into_vec();
    let events: Vec<RainEvent> = hours
        .into_iter()
        .map(|h| RainEvent::new(h + EDGE_MARGIN_HOURS, rng.gen_range(EVENT_AMOUNT)))
        .collect();
    debug!("Rain events: {:?}", events);
    Ok(events)
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    #[test]
    fn events_within_window() {
        for seed in 0..50 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let n_hours = 14 * 24 + 1;
            let events = draw_rain_events(&mut rng, n_hours).unwrap();
            assert!(EVENT_COUNT.contains(&events.len()));
            let hours: HashSet<usize> = events.iter().map(|e| e.hour).collect();
            assert_eq!(hours.len(), events.len(), "hours must be distinct");
            for e in &events {
                assert!(e.hour >= 24 && e.hour < n_hours - 24, "hour {}", e.hour);
                assert!(e.amount >= 0.2 && e.amount < 1.0, "amount {}", e.amount);
            }
        }
    }

    #[test]
    fn same_seed_same_events() {
        let a = draw_rain_events(&mut ChaCha8Rng::seed_from_u64(7), 241).unwrap();
        let b = draw_rain_events(&mut ChaCha8Rng::seed_from_u64(7), 241).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn short_horizon_is_rejected() {
        // two days: the window holds a single hour
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(matches!(draw_rain_events(&mut rng, 49), Err(AppError::InvalidArgument(_))));
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(matches!(draw_rain_events(&mut rng, 25), Err(AppError::InvalidArgument(_))));
    }

    #[test]
    fn three_days_is_enough() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert!(draw_rain_events(&mut rng, 73).is_ok());
    }

    #[test]
    fn tail_window_is_exclusive() {
        let e = RainEvent::new(10, 0.5);
        assert_eq!(e.hours_into_tail(10, 12), None);
        assert_eq!(e.hours_into_tail(9, 12), None);
        assert_eq!(e.hours_into_tail(11, 12), Some(1));
        assert_eq!(e.hours_into_tail(21, 12), Some(11));
        assert_eq!(e.hours_into_tail(22, 12), None);
    }
}
