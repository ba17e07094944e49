use std::{sync::Arc, time::Duration};

use moka::sync::Cache;
use tracing::debug;

use crate::{
    error::AppError,
    soil::resolve_texture,
    synthetic::{
        generator::{GeneratorParams, SeriesGenerator, DEFAULT_SEED},
        series::SensorSeries,
    },
    time::TimeProvider,
};

pub const CACHE_CAPACITY: u64 = 64;

/// Time-boxed memo of generated series keyed by (days, resolved texture), generated
/// with rain events on and the default seed.
pub struct SeriesCache {
    entries: Cache<(u32, String), Arc<SensorSeries>>,
}

impl SeriesCache {
    pub fn new(ttl_secs: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();
        Self { entries }
    }

    pub fn get_or_generate<G: TimeProvider>(
        &self, generator: &SeriesGenerator<G>, days: u32, texture: &str,
    ) -> Result<Arc<SensorSeries>, AppError> {
        let (resolved, _) = resolve_texture(&generator.config.soil, texture);
        let key = (days, resolved.to_owned());
        if let Some(series) = self.entries.get(&key) {
            debug!("Cache hit for {} days of {}", days, resolved);
            return Ok(series);
        }

        let params = GeneratorParams::new(days, resolved, true, Some(DEFAULT_SEED));
        let series = Arc::new(generator.generate(&params)?);
        self.entries.insert(key, series.clone());
        Ok(series)
    }

    /// Drops every entry so the next request regenerates.
    pub fn clear(&self) {
        debug!("Clearing cached series");
        self.entries.invalidate_all();
    }

    /// Live entries, after pending evictions have run.
    pub fn len(&self) -> usize {
        self.entries.run_pending_tasks();
        self.entries.entry_count() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
