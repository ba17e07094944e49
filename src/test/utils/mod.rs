pub mod mock_time;

use crate::{config::Config, synthetic::generator::SeriesGenerator};
use mock_time::{fixed_time_provider, MockTimeProvider};
use std::sync::Arc;

pub type MockGenerator = SeriesGenerator<MockTimeProvider>;

pub fn set_generator(config: Config, now: i64) -> MockGenerator {
    SeriesGenerator::new(Arc::new(config), fixed_time_provider(now))
}

/// Generator with all noise switched off, for checks against the bare simulation.
pub fn set_quiet_generator(now: i64) -> MockGenerator {
    let mut config = Config::default();
    config.sensor.moisture_noise_std = 0.0;
    config.sensor.temp_noise_std = 0.0;
    set_generator(config, now)
}
