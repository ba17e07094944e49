use std::io::Write;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::{soil::SoilProperties, utils::display_time};

use super::rain::RainEvent;

pub const CSV_HEADER: &str = "timestamp,moisture_shallow,moisture_mid,moisture_deep,canopy_temp_c,air_temp_c";

/// One hourly reading. Moisture in cm3/cm3, temperatures in degC.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SensorRecord {
    pub timestamp: NaiveDateTime,
    pub moisture_shallow: f64,
    pub moisture_mid: f64,
    pub moisture_deep: f64,
    pub canopy_temp_c: f64,
    pub air_temp_c: f64,
}

impl SensorRecord {
    pub fn csv_row(&self) -> String {
        format!(
            "{},{:.4},{:.4},{:.4},{:.1},{:.1}",
            display_time(self.timestamp),
            self.moisture_shallow,
            self.moisture_mid,
            self.moisture_deep,
            self.canopy_temp_c,
            self.air_temp_c
        )
    }
}

/// Output of one generator call. Read-only once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorSeries {
    texture: String,
    soil: SoilProperties,
    rain_events: Vec<RainEvent>,
    records: Vec<SensorRecord>,
}

impl SensorSeries {
    pub(crate) fn new(
        texture: String, soil: SoilProperties, rain_events: Vec<RainEvent>, records: Vec<SensorRecord>,
    ) -> Self {
        Self { texture, soil, rain_events, records }
    }

    /// Resolved texture class (after any fallback).
    pub fn texture(&self) -> &str {
        &self.texture
    }

    pub fn soil(&self) -> &SoilProperties {
        &self.soil
    }

    pub fn rain_events(&self) -> &[RainEvent] {
        &self.rain_events
    }

    pub fn records(&self) -> &[SensorRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn latest(&self) -> Option<&SensorRecord> {
        self.records.last()
    }

    /// The last `n` records (all of them if the series is shorter).
    pub fn tail(&self, n: usize) -> &[SensorRecord] {
        &self.records[self.records.len().saturating_sub(n)..]
    }

    pub fn write_csv<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        writeln!(w, "{}", CSV_HEADER)?;
        for record in &self.records {
            writeln!(w, "{}", record.csv_row())?;
        }
        Ok(())
    }

    pub fn to_csv(&self) -> String {
        let mut out = Vec::with_capacity(self.records.len() * 64);
        // writing to a Vec cannot fail
        _ = self.write_csv(&mut out);
        String::from_utf8_lossy(&out).into_owned()
    }
}
