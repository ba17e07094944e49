use chrono::NaiveDateTime;
use serde::Serialize;

use crate::{
    config::Field,
    error::AppError,
    synthetic::series::{SensorRecord, SensorSeries},
    utils::round_to,
};

/// The comparison reading sits this many rows back from the end of the series.
pub const DELTA_LOOKBACK_ROWS: usize = 24;
/// Rows in the raw data table.
pub const RECENT_ROWS: usize = 48;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurrentConditions {
    pub timestamp: NaiveDateTime,
    pub moisture_shallow: f64,
    pub moisture_mid: f64,
    pub moisture_deep: f64,
    pub canopy_temp_c: f64,
    pub air_temp_c: f64,
}

impl From<&SensorRecord> for CurrentConditions {
    fn from(r: &SensorRecord) -> Self {
        Self {
            timestamp: r.timestamp,
            moisture_shallow: r.moisture_shallow,
            moisture_mid: r.moisture_mid,
            moisture_deep: r.moisture_deep,
            canopy_temp_c: r.canopy_temp_c,
            air_temp_c: r.air_temp_c,
        }
    }
}

/// Latest readings plus their recent change, as shown in a metrics row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionsSummary {
    #[serde(flatten)]
    pub current: CurrentConditions,
    pub delta_shallow: Option<f64>,
    pub delta_mid: Option<f64>,
    pub delta_deep: Option<f64>,
    /// Positive when the canopy runs warmer than air (water stress).
    pub canopy_minus_air_c: f64,
}

pub fn current_conditions(series: &SensorSeries) -> Result<CurrentConditions, AppError> {
    series.latest().map(CurrentConditions::from).ok_or(AppError::EmptySeries)
}

pub fn conditions_summary(series: &SensorSeries) -> Result<ConditionsSummary, AppError> {
    let current = current_conditions(series)?;
    let reference = series.len().checked_sub(DELTA_LOOKBACK_ROWS).map(|i| &series.records()[i]);
    let delta = |pick: fn(&SensorRecord) -> f64, now: f64| reference.map(|r| round_to(now - pick(r), 4));

    Ok(ConditionsSummary {
        delta_shallow: delta(|r| r.moisture_shallow, current.moisture_shallow),
        delta_mid: delta(|r| r.moisture_mid, current.moisture_mid),
        delta_deep: delta(|r| r.moisture_deep, current.moisture_deep),
        canopy_minus_air_c: round_to(current.canopy_temp_c - current.air_temp_c, 1),
        current,
    })
}

/// Newest-first slice of the last `n` readings.
pub fn recent_readings(series: &SensorSeries, n: usize) -> Vec<SensorRecord> {
    series.tail(n).iter().rev().copied().collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldOverview {
    /// "name | crop | growth stage"
    pub headline: String,
    pub name: String,
    pub crop: String,
    pub growth_stage: String,
    pub latitude: f64,
    pub longitude: f64,
    pub acreage: f64,
    pub texture: String,
    pub field_capacity: f64,
    pub wilting_point: f64,
}

/// Dashboard header for a field and the soil its series was generated on.
pub fn field_overview(field: &Field, series: &SensorSeries) -> FieldOverview {
    let soil = series.soil();
    FieldOverview {
        headline: format!("{} | {} | {}", field.name, field.crop, field.growth_stage),
        name: field.name.clone(),
        crop: field.crop.clone(),
        growth_stage: field.growth_stage.clone(),
        latitude: field.latitude,
        longitude: field.longitude,
        acreage: field.acreage,
        texture: series.texture().to_owned(),
        field_capacity: soil.field_capacity,
        wilting_point: soil.wilting_point,
    }
}
