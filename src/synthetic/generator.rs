use std::sync::Arc;

use chrono::{NaiveDateTime, TimeDelta, Timelike};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use tracing::{debug, info};

use crate::{
    config::{Config, DEFAULT_TEXTURE},
    error::AppError,
    soil::resolve_texture,
    time::TimeProvider,
    utils::{display_time, round_to},
};

use super::{
    moisture::{simulate_moisture, DEEP, MID, SHALLOW},
    rain::draw_rain_events,
    series::{SensorRecord, SensorSeries},
    temperature::{air_temperature, canopy_temperature},
};

pub const DEFAULT_DAYS: u32 = 14;
pub const DEFAULT_SEED: u64 = 42;
pub const MOISTURE_DECIMALS: i32 = 4;
pub const TEMP_DECIMALS: i32 = 1;

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorParams {
    pub days: u32,
    pub soil_texture: String,
    pub include_rain_events: bool,
    /// None: seeded from OS entropy, not reproducible
    pub seed: Option<u64>,
}

impl Default for GeneratorParams {
    fn default() -> Self {
        Self {
            days: DEFAULT_DAYS,
            soil_texture: DEFAULT_TEXTURE.to_owned(),
            include_rain_events: true,
            seed: Some(DEFAULT_SEED),
        }
    }
}

impl GeneratorParams {
    pub fn new(days: u32, soil_texture: &str, include_rain_events: bool, seed: Option<u64>) -> Self {
        Self { days, soil_texture: soil_texture.to_owned(), include_rain_events, seed }
    }
}

/// Hourly samples for `days` of history, both ends included.
pub fn n_hours(days: u32) -> usize {
    days as usize * 24 + 1
}

fn gaussian(std_dev: f64, channel: &str) -> Result<Normal<f64>, AppError> {
    if !std_dev.is_finite() || std_dev < 0.0 {
        return Err(AppError::InvalidArgument(format!("{} noise std {} must be finite and >= 0", channel, std_dev)));
    }
    Normal::new(0.0, std_dev).map_err(|e| AppError::InvalidArgument(format!("{} noise: {}", channel, e)))
}

pub struct SeriesGenerator<T: TimeProvider> {
    pub config: Arc<Config>,
    pub time_provider: Arc<T>,
}

impl<T: TimeProvider> SeriesGenerator<T> {
    pub fn new(config: Arc<Config>, time_provider: Arc<T>) -> Self {
        Self { config, time_provider }
    }

    /// Series ending at the current local hour.
    pub fn generate(&self, params: &GeneratorParams) -> Result<SensorSeries, AppError> {
        self.generate_at(params, self.time_provider.current_hour())
    }

    /// Series of `days * 24 + 1` hourly samples ending at `end`. With a seed, every
    /// value (rain events and noise included) is reproducible.
    pub fn generate_at(&self, params: &GeneratorParams, end: NaiveDateTime) -> Result<SensorSeries, AppError> {
        if params.days == 0 {
            return Err(AppError::InvalidArgument("days must be positive".to_owned()));
        }
        let sensor = &self.config.sensor;
        let moisture_noise = gaussian(sensor.moisture_noise_std, "moisture")?;
        let air_noise = gaussian(sensor.temp_noise_std, "air temperature")?;
        let canopy_noise = gaussian(sensor.temp_noise_std * 0.5, "canopy temperature")?;

        let (texture, soil) = resolve_texture(&self.config.soil, &params.soil_texture);
        let n_hours = n_hours(params.days);
        let start = TimeDelta::try_days(params.days as i64)
            .and_then(|span| end.checked_sub_signed(span))
            .ok_or_else(|| AppError::InvalidArgument(format!("{} days of history is out of range", params.days)))?;
        let timestamps: Vec<NaiveDateTime> = (0..n_hours).map(|i| start + TimeDelta::hours(i as i64)).collect();
        let hours_of_day: Vec<u32> = timestamps.iter().map(|t| t.hour()).collect();

        let mut rng = match params.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        let rain_events = if params.include_rain_events { draw_rain_events(&mut rng, n_hours)? } else { Vec::new() };

        let mut moisture = simulate_moisture(&soil, &hours_of_day, &rain_events);
        for depth in [SHALLOW, MID, DEEP] {
            for level in moisture.depth_mut(depth).iter_mut() {
                *level = soil.clamp(*level + moisture_noise.sample(&mut rng));
            }
        }

        let air = air_temperature(&hours_of_day, &air_noise, &mut rng);
        let canopy = canopy_temperature(&air, &moisture.shallow, &moisture.mid, &soil, &canopy_noise, &mut rng);

        // clamp after rounding so the published values never leave the band
        let publish = |vwc: f64| soil.clamp(round_to(vwc, MOISTURE_DECIMALS));
        let records: Vec<SensorRecord> = (0..n_hours)
            .map(|i| SensorRecord {
                timestamp: timestamps[i],
                moisture_shallow: publish(moisture.shallow[i]),
                moisture_mid: publish(moisture.mid[i]),
                moisture_deep: publish(moisture.deep[i]),
                canopy_temp_c: round_to(canopy[i], TEMP_DECIMALS),
                air_temp_c: round_to(air[i], TEMP_DECIMALS),
            })
            .collect();

        debug!("Series window {} .. {}", display_time(start), display_time(end));
        info!(
            "Generated {} hourly records for {} ({} rain events, seed {:?})",
            records.len(),
            texture,
            rain_events.len(),
            params.seed
        );
        Ok(SensorSeries::new(texture.to_owned(), soil, rain_events, records))
    }
}
