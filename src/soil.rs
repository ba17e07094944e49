use serde::Serialize;
use tracing::debug;

use crate::config::Soil;

/// Volumetric water content bounds of a soil texture (cm3/cm3).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SoilProperties {
    pub field_capacity: f64,
    pub wilting_point: f64,
}

impl SoilProperties {
    pub fn new(field_capacity: f64, wilting_point: f64) -> Result<Self, String> {
        if !(0.0..=1.0).contains(&field_capacity) || !(0.0..=1.0).contains(&wilting_point) {
            return Err(format!("fc {} / pwp {} outside [0, 1]", field_capacity, wilting_point));
        }
        if field_capacity <= wilting_point {
            return Err(format!("field capacity {} must exceed wilting point {}", field_capacity, wilting_point));
        }
        Ok(Self { field_capacity, wilting_point })
    }

    /// TAW = FC - PWP
    pub fn total_available_water(&self) -> f64 {
        self.field_capacity - self.wilting_point
    }

    /// Physically realistic band the simulated readings are kept in.
    pub fn moisture_bounds(&self) -> (f64, f64) {
        (self.wilting_point * 0.8, self.field_capacity * 1.05)
    }

    pub fn clamp(&self, vwc: f64) -> f64 {
        let (lo, hi) = self.moisture_bounds();
        vwc.clamp(lo, hi)
    }

    /// Level at which `mad` (fraction of TAW) has been depleted.
    pub fn refill_point(&self, mad: f64) -> f64 {
        self.wilting_point + mad * self.total_available_water()
    }
}

/// Resolves a texture name to its canonical name and properties. Unknown names
/// resolve to the table's default texture.
pub fn resolve_texture<'a>(soil: &'a Soil, texture: &str) -> (&'a str, SoilProperties) {
    let entry = match soil.get(texture) {
        Some(entry) => entry,
        None => {
            debug!("Unknown soil texture '{}', using '{}'", texture, soil.default_texture);
            // validated config always contains its default; the first row is the last resort
            match soil.get(&soil.default_texture).or(soil.textures.first()) {
                Some(entry) => entry,
                None => return (crate::config::DEFAULT_TEXTURE, fallback_properties()),
            }
        }
    };
    let props = SoilProperties { field_capacity: entry.field_capacity, wilting_point: entry.wilting_point };
    (entry.name.as_str(), props)
}

pub fn get_soil_properties(soil: &Soil, texture: &str) -> SoilProperties {
    resolve_texture(soil, texture).1
}

// Silt Loam
fn fallback_properties() -> SoilProperties {
    SoilProperties { field_capacity: 0.33, wilting_point: 0.13 }
}
