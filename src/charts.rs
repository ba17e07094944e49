//! Chart specifications built from a sensor series.
//!
//! These are plain data for whatever front end draws them: traces of
//! (timestamp, value) points plus horizontal reference lines. Nothing here
//! renders.

use serde::Serialize;

use crate::{
    config::{Display, WaterBalance},
    synthetic::series::{SensorRecord, SensorSeries},
    utils::display_time,
};

/// Rows shown by the depth profile chart.
pub const PROFILE_WINDOW_ROWS: usize = 72;
pub const MOISTURE_Y_RANGE: (f64, f64) = (0.0, 0.50);

const AIR_COLOR: &str = "#3498db";
const CANOPY_COLOR: &str = "#e74c3c";
const DIFFERENTIAL_FILL: &str = "rgba(231, 76, 60, 0.2)";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Fill {
    /// Closed polygon through the trace's own points.
    ToSelf,
    /// Stacked on the previous trace of the same chart.
    Stacked,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dash {
    Dash,
    Dot,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    pub name: String,
    pub color: String,
    pub x: Vec<String>,
    pub y: Vec<f64>,
    pub fill: Option<Fill>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdLine {
    pub label: String,
    pub value: f64,
    pub color: String,
    pub dash: Dash,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub y_range: Option<(f64, f64)>,
    pub traces: Vec<Trace>,
    pub thresholds: Vec<ThresholdLine>,
}

fn timestamps(records: &[SensorRecord]) -> Vec<String> {
    records.iter().map(|r| display_time(r.timestamp)).collect()
}

fn trace(name: &str, color: String, records: &[SensorRecord], pick: impl Fn(&SensorRecord) -> f64) -> Trace {
    Trace { name: name.to_owned(), color, x: timestamps(records), y: records.iter().map(pick).collect(), fill: None }
}

/// Moisture at the three depths, with field capacity, wilting point and refill
/// point reference lines when `show_thresholds` is set.
pub fn soil_moisture_chart(
    series: &SensorSeries, water_balance: &WaterBalance, display: &Display, show_thresholds: bool,
) -> ChartSpec {
    let records = series.records();
    let traces = vec![
        trace("Shallow", display.color("depth_shallow"), records, |r| r.moisture_shallow),
        trace("Mid", display.color("depth_mid"), records, |r| r.moisture_mid),
        trace("Deep", display.color("depth_deep"), records, |r| r.moisture_deep),
    ];

    let mut thresholds = Vec::new();
    if show_thresholds {
        let soil = series.soil();
        thresholds.push(ThresholdLine {
            label: "Field Capacity".to_owned(),
            value: soil.field_capacity,
            color: display.color("saturated"),
            dash: Dash::Dash,
        });
        thresholds.push(ThresholdLine {
            label: "Wilting Point".to_owned(),
            value: soil.wilting_point,
            color: display.color("critical"),
            dash: Dash::Dash,
        });
        thresholds.push(ThresholdLine {
            label: format!("Refill Point ({:.0}% MAD)", water_balance.mad_threshold * 100.0),
            value: soil.refill_point(water_balance.mad_threshold),
            color: display.color("warning"),
            dash: Dash::Dot,
        });
    }

    ChartSpec {
        title: format!("Soil Moisture by Depth ({})", series.texture()),
        x_title: "Date/Time".to_owned(),
        y_title: "Volumetric Water Content (cm3/cm3)".to_owned(),
        y_range: Some(MOISTURE_Y_RANGE),
        traces,
        thresholds,
    }
}

/// Air and canopy temperature. The third trace outlines the band between them
/// (canopy forward, air reversed) so it can be filled.
pub fn temperature_chart(series: &SensorSeries) -> ChartSpec {
    let records = series.records();
    let air = trace("Air Temperature", AIR_COLOR.to_owned(), records, |r| r.air_temp_c);
    let canopy = trace("Canopy Temperature", CANOPY_COLOR.to_owned(), records, |r| r.canopy_temp_c);

    let x: Vec<String> = canopy.x.iter().chain(air.x.iter().rev()).cloned().collect();
    let y: Vec<f64> = canopy.y.iter().chain(air.y.iter().rev()).copied().collect();
    let band = Trace {
        name: "Tc - Ta Differential".to_owned(),
        color: DIFFERENTIAL_FILL.to_owned(),
        x,
        y,
        fill: Some(Fill::ToSelf),
    };

    ChartSpec {
        title: "Canopy & Air Temperature".to_owned(),
        x_title: "Date/Time".to_owned(),
        y_title: "Temperature (degC)".to_owned(),
        y_range: None,
        traces: vec![air, canopy, band],
        thresholds: Vec::new(),
    }
}

/// Last 72 hours as stacked bands: deep, then mid over deep, then shallow over mid.
/// The stack top at each hour equals the shallow reading.
pub fn depth_profile_chart(series: &SensorSeries, display: &Display) -> ChartSpec {
    let recent = series.tail(PROFILE_WINDOW_ROWS);
    let mut traces = vec![
        trace("Deep", display.color("depth_deep"), recent, |r| r.moisture_deep),
        trace("Mid", display.color("depth_mid"), recent, |r| r.moisture_mid - r.moisture_deep),
        trace("Shallow", display.color("depth_shallow"), recent, |r| r.moisture_shallow - r.moisture_mid),
    ];
    for t in traces.iter_mut() {
        t.fill = Some(Fill::Stacked);
    }

    ChartSpec {
        title: "Soil Moisture Profile (Last 72 Hours)".to_owned(),
        x_title: "Date/Time".to_owned(),
        y_title: "Cumulative VWC".to_owned(),
        y_range: None,
        traces,
        thresholds: Vec::new(),
    }
}
