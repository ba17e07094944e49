//! Synthetic soil-moisture and canopy-temperature readings.
//!
//! The simulation steps hour by hour: evapotranspiration drains the three
//! sensor depths (shallow fastest), rain pulses infiltrate with a delayed tail
//! at depth, and temperatures follow a diurnal cycle. Canopy temperature rises
//! with moisture stress.

pub mod generator;
pub mod moisture;
pub mod rain;
pub mod series;
pub mod temperature;

/// Starting level as a fraction of total available water.
pub const INITIAL_TAW_FRACTION: f64 = 0.70;

/// Peak hourly ET (in/hour).
pub const PEAK_ET_RATE: f64 = 0.012;
/// Empirical ET depth to volumetric change conversion.
pub const ET_TO_VOLUMETRIC: f64 = 6.0;
/// Diurnal ET window (local hour of day, inclusive).
pub const ET_WINDOW: (u32, u32) = (6, 20);

/// Shallow, mid, deep.
pub const DEPLETION_FACTORS: [f64; 3] = [1.0, 0.6, 0.3];
/// Immediate infiltration per unit of rain, by depth.
pub const INFILTRATION_FACTORS: [f64; 3] = [0.08, 0.04, 0.02];
/// Continued infiltration per unit of rain, mid and deep only.
pub const TAIL_INFILTRATION: (f64, f64) = (0.003, 0.002);
pub const TAIL_HOURS: usize = 12;

pub const BASE_AIR_TEMP_C: f64 = 30.0;
pub const DAILY_TEMP_AMPLITUDE_C: f64 = 8.0;
/// Daylight window of the air temperature curve (local hour of day, inclusive).
pub const DAYLIGHT_WINDOW: (u32, u32) = (6, 18);

/// Canopy offset is `WET_CANOPY_OFFSET_C + STRESS_CANOPY_SPAN_C * stress`.
pub const WET_CANOPY_OFFSET_C: f64 = -2.0;
pub const STRESS_CANOPY_SPAN_C: f64 = 7.0;
