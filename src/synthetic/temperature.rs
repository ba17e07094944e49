use std::f64::consts::PI;

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::soil::SoilProperties;

use super::{BASE_AIR_TEMP_C, DAILY_TEMP_AMPLITUDE_C, DAYLIGHT_WINDOW, STRESS_CANOPY_SPAN_C, WET_CANOPY_OFFSET_C};

/// Moisture stress in [0, 1]: 0 at field capacity or wetter, 1 at wilting point or drier.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct StressIndex(f64);

impl StressIndex {
    pub fn new(raw: f64) -> Self {
        // NaN counts as fully wet
        Self(if raw.is_nan() { 0.0 } else { raw.clamp(0.0, 1.0) })
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

pub fn air_temperature_base(hour_of_day: u32) -> f64 {
    if (DAYLIGHT_WINDOW.0..=DAYLIGHT_WINDOW.1).contains(&hour_of_day) {
        let half_day = (DAYLIGHT_WINDOW.1 - DAYLIGHT_WINDOW.0) as f64;
        BASE_AIR_TEMP_C + DAILY_TEMP_AMPLITUDE_C * (PI * (hour_of_day - DAYLIGHT_WINDOW.0) as f64 / half_day).sin()
    } else {
        BASE_AIR_TEMP_C - DAILY_TEMP_AMPLITUDE_C * 0.5
    }
}

pub fn moisture_stress(avg_moisture: f64, soil: &SoilProperties) -> StressIndex {
    StressIndex::new(1.0 - (avg_moisture - soil.wilting_point) / soil.total_available_water())
}

/// Canopy minus air temperature: transpiring plants run 2 degC cooler, stressed ones up to 5 degC warmer.
pub fn canopy_offset(stress: StressIndex) -> f64 {
    WET_CANOPY_OFFSET_C + STRESS_CANOPY_SPAN_C * stress.value()
}

pub fn air_temperature<R: Rng + ?Sized>(hours_of_day: &[u32], noise: &Normal<f64>, rng: &mut R) -> Vec<f64> {
    let base: Vec<f64> = hours_of_day.iter().map(|&h| air_temperature_base(h)).collect();
    base.into_iter().map(|t| t + noise.sample(rng)).collect()
}

/// Canopy temperature from air temperature and the mean of the shallow and mid readings.
pub fn canopy_temperature<R: Rng + ?Sized>(
    air: &[f64], shallow: &[f64], mid: &[f64], soil: &SoilProperties, noise: &Normal<f64>, rng: &mut R,
) -> Vec<f64> {
    let base: Vec<f64> = air
        .iter()
        .zip(shallow.iter().zip(mid))
        .map(|(t, (s, m))| t + canopy_offset(moisture_stress((s + m) / 2.0, soil)))
        .collect();
    base.into_iter().map(|t| t + noise.sample(rng)).collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{config::Soil, soil::get_soil_properties};
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn diurnal_air_curve() {
        assert_eq!(air_temperature_base(3), 26.0);
        assert_eq!(air_temperature_base(19), 26.0);
        assert_relative_eq!(air_temperature_base(6), 30.0, epsilon = 1e-12);
        assert_relative_eq!(air_temperature_base(12), 38.0, epsilon = 1e-12);
        assert_relative_eq!(air_temperature_base(18), 30.0, epsilon = 1e-9);
    }

    #[test]
    fn stress_is_clipped() {
        let soil = get_soil_properties(&Soil::default(), "Loam");
        assert_eq!(moisture_stress(0.5, &soil).value(), 0.0);
        assert_eq!(moisture_stress(0.0, &soil).value(), 1.0);
        assert_eq!(moisture_stress(soil.field_capacity, &soil).value(), 0.0);
        assert_relative_eq!(moisture_stress(soil.refill_point(0.5), &soil).value(), 0.5, epsilon = 1e-12);
        assert_eq!(StressIndex::new(f64::NAN).value(), 0.0);
        for raw in [-3.0, -0.1, 0.0, 0.4, 1.0, 1.7, f64::INFINITY, f64::NEG_INFINITY] {
            let s = StressIndex::new(raw).value();
            assert!((0.0..=1.0).contains(&s), "{} -> {}", raw, s);
        }
    }

    #[test]
    fn canopy_offset_range() {
        assert_eq!(canopy_offset(StressIndex::new(0.0)), -2.0);
        assert_eq!(canopy_offset(StressIndex::new(1.0)), 5.0);
        assert_eq!(canopy_offset(StressIndex::new(9.0)), 5.0);
    }

    #[test]
    fn zero_noise_gives_exact_curves() {
        let soil = get_soil_properties(&Soil::default(), "Silt Loam");
        let quiet = Normal::new(0.0, 0.0).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let hours = [0u32, 12];
        let air = air_temperature(&hours, &quiet, &mut rng);
        assert_eq!(air[0], 26.0);
        let wet = [soil.field_capacity; 2];
        let dry = [soil.wilting_point; 2];
        let canopy_wet = canopy_temperature(&air, &wet, &wet, &soil, &quiet, &mut rng);
        let canopy_dry = canopy_temperature(&air, &dry, &dry, &soil, &quiet, &mut rng);
        assert_relative_eq!(canopy_wet[1], air[1] - 2.0, epsilon = 1e-12);
        assert_relative_eq!(canopy_dry[1], air[1] + 5.0, epsilon = 1e-12);
    }
}
