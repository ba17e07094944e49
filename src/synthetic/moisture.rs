use std::f64::consts::PI;

use crate::soil::SoilProperties;

use super::{
    rain::RainEvent, DEPLETION_FACTORS, ET_TO_VOLUMETRIC, ET_WINDOW, INFILTRATION_FACTORS, INITIAL_TAW_FRACTION,
    PEAK_ET_RATE, TAIL_HOURS, TAIL_INFILTRATION,
};

pub const SHALLOW: usize = 0;
pub const MID: usize = 1;
pub const DEEP: usize = 2;

/// Hourly volumetric water content at the three sensor depths.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoistureProfile {
    pub shallow: Vec<f64>,
    pub mid: Vec<f64>,
    pub deep: Vec<f64>,
}

impl MoistureProfile {
    pub fn with_capacity(n: usize) -> Self {
        Self { shallow: Vec::with_capacity(n), mid: Vec::with_capacity(n), deep: Vec::with_capacity(n) }
    }

    pub fn len(&self) -> usize {
        self.shallow.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shallow.is_empty()
    }

    pub fn depth(&self, depth: usize) -> &[f64] {
        match depth {
            SHALLOW => &self.shallow,
            MID => &self.mid,
            _ => &self.deep,
        }
    }

    pub fn depth_mut(&mut self, depth: usize) -> &mut Vec<f64> {
        match depth {
            SHALLOW => &mut self.shallow,
            MID => &mut self.mid,
            _ => &mut self.deep,
        }
    }

    fn push(&mut self, levels: [f64; 3]) {
        self.shallow.push(levels[SHALLOW]);
        self.mid.push(levels[MID]);
        self.deep.push(levels[DEEP]);
    }
}

/// ET multiplier for a local hour of day: a sine hump over 6..=20 peaking at 13, zero at night.
pub fn diurnal_et_factor(hour_of_day: u32) -> f64 {
    if (ET_WINDOW.0..=ET_WINDOW.1).contains(&hour_of_day) {
        let span = (ET_WINDOW.1 - ET_WINDOW.0) as f64;
        (PI * (hour_of_day - ET_WINDOW.0) as f64 / span).sin()
    } else {
        0.0
    }
}

/// Volumetric loss at the shallow sensor for one hour.
pub fn hourly_et_depletion(hour_of_day: u32) -> f64 {
    PEAK_ET_RATE * diurnal_et_factor(hour_of_day) / ET_TO_VOLUMETRIC
}

/// Noise-free moisture dynamics. `hours_of_day[i]` is the local hour of sample `i`;
/// sample 0 holds the initial level and every later sample derives from the one before.
pub fn simulate_moisture(soil: &SoilProperties, hours_of_day: &[u32], rain_events: &[RainEvent]) -> MoistureProfile {
    let n_hours = hours_of_day.len();
    let mut profile = MoistureProfile::with_capacity(n_hours);
    if n_hours == 0 {
        return profile;
    }

    let initial = soil.wilting_point + INITIAL_TAW_FRACTION * soil.total_available_water();
    let mut levels = [initial; 3];
    profile.push(levels);

    for (i, &hour_of_day) in hours_of_day.iter().enumerate().skip(1) {
        let et = hourly_et_depletion(hour_of_day);
        for (level, factor) in levels.iter_mut().zip(DEPLETION_FACTORS) {
            *level -= et * factor;
        }

        for event in rain_events {
            if event.hour == i {
                for (level, factor) in levels.iter_mut().zip(INFILTRATION_FACTORS) {
                    *level += event.amount * factor;
                }
            } else if let Some(since) = event.hours_into_tail(i, TAIL_HOURS) {
                let decay = (TAIL_HOURS - since) as f64 / TAIL_HOURS as f64;
                levels[MID] += event.amount * TAIL_INFILTRATION.0 * decay;
                levels[DEEP] += event.amount * TAIL_INFILTRATION.1 * decay;
            }
        }

        for level in levels.iter_mut() {
            *level = soil.clamp(*level);
        }
        profile.push(levels);
    }
    profile
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{config::Soil, soil::get_soil_properties};
    use approx::assert_relative_eq;

    fn clock_hours(n: usize) -> Vec<u32> {
        (0..n).map(|i| (i % 24) as u32).collect()
    }

    #[test]
    fn diurnal_shape() {
        assert_eq!(diurnal_et_factor(0), 0.0);
        assert_eq!(diurnal_et_factor(5), 0.0);
        assert_eq!(diurnal_et_factor(6), 0.0);
        assert_eq!(diurnal_et_factor(21), 0.0);
        assert_relative_eq!(diurnal_et_factor(13), 1.0, epsilon = 1e-12);
        assert!(diurnal_et_factor(20).abs() < 1e-12);
        assert_relative_eq!(diurnal_et_factor(10), diurnal_et_factor(16), epsilon = 1e-12);
        assert_relative_eq!(hourly_et_depletion(13), 0.002, epsilon = 1e-12);
    }

    #[test]
    fn starts_at_seventy_percent_of_taw() {
        let soil = get_soil_properties(&Soil::default(), "Silt Loam");
        let p = simulate_moisture(&soil, &clock_hours(3), &[]);
        assert_relative_eq!(p.shallow[0], 0.13 + 0.7 * 0.2, epsilon = 1e-12);
        assert_eq!(p.shallow[0], p.mid[0]);
        assert_eq!(p.mid[0], p.deep[0]);
    }

    #[test]
    fn dry_run_never_rises() {
        let soil = get_soil_properties(&Soil::default(), "Sand");
        let p = simulate_moisture(&soil, &clock_hours(25), &[]);
        assert_eq!(p.len(), 25);
        for depth in [SHALLOW, MID, DEEP] {
            let series = p.depth(depth);
            assert!(series.windows(2).all(|w| w[1] <= w[0]), "depth {} rose", depth);
        }
        // shallow dries fastest
        assert!(p.shallow[24] < p.mid[24]);
        assert!(p.mid[24] < p.deep[24]);
    }

    #[test]
    fn rain_pulse_beats_et_extrapolation() {
        let soil = get_soil_properties(&Soil::default(), "Silt Loam");
        let hours = clock_hours(48);
        let p = simulate_moisture(&soil, &hours, &[RainEvent::new(10, 1.0)]);
        let extrapolated = p.shallow[9] - hourly_et_depletion(hours[10]);
        assert!(p.shallow[10] > extrapolated);
        assert_relative_eq!(p.shallow[10], extrapolated + 0.08, epsilon = 1e-12);
        assert_relative_eq!(p.mid[10], p.mid[9] - 0.6 * hourly_et_depletion(10) + 0.04, epsilon = 1e-12);
    }

    #[test]
    fn infiltration_tail_reaches_mid_and_deep_only() {
        let soil = get_soil_properties(&Soil::default(), "Clay");
        // night hours: no ET, only the tail moves the series
        let hours = vec![0u32; 30];
        let p = simulate_moisture(&soil, &hours, &[RainEvent::new(5, 0.5)]);
        assert_eq!(p.shallow[6], p.shallow[5]);
        assert_relative_eq!(p.mid[6] - p.mid[5], 0.5 * 0.003 * 11.0 / 12.0, epsilon = 1e-12);
        assert_relative_eq!(p.deep[16] - p.deep[15], 0.5 * 0.002 * 1.0 / 12.0, epsilon = 1e-12);
        // tail over after 12 hours
        assert_eq!(p.mid[17], p.mid[16]);
        assert_eq!(p.deep[17], p.deep[16]);
    }

    #[test]
    fn levels_stay_within_bounds() {
        let soil = get_soil_properties(&Soil::default(), "Sand");
        let (lo, hi) = soil.moisture_bounds();

        let dry = simulate_moisture(&soil, &clock_hours(10 * 24 + 1), &[]);
        assert_eq!(*dry.shallow.last().unwrap(), lo);

        let storms: Vec<RainEvent> = (1..6).map(|h| RainEvent::new(h, 1.0)).collect();
        let wet = simulate_moisture(&soil, &clock_hours(10), &storms);
        assert_eq!(wet.shallow[5], hi);
        for depth in [SHALLOW, MID, DEEP] {
            for v in dry.depth(depth).iter().chain(wet.depth(depth)) {
                assert!(*v >= lo && *v <= hi);
            }
        }
    }

    #[test]
    fn empty_input() {
        let soil = get_soil_properties(&Soil::default(), "Loam");
        assert!(simulate_moisture(&soil, &[], &[]).is_empty());
    }
}
