pub mod run_options;

use std::{collections::BTreeMap, fs};

use run_options::Args;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{error::AppError, soil::SoilProperties};

pub const CONFIG_FILE: &str = "./fta.toml";
pub const DEFAULT_TEXTURE: &str = "Silt Loam";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Field {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub acreage: f64,
    pub crop: String,
    pub growth_stage: String,
}

impl Default for Field {
    fn default() -> Self {
        Self {
            name: "Demo Research Field".to_owned(),
            latitude: 34.15,
            longitude: -102.05,
            acreage: 125.0,
            crop: "Corn".to_owned(),
            growth_stage: "V12 (Rapid Vegetative)".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Texture {
    pub name: String,
    pub field_capacity: f64,
    pub wilting_point: f64,
}

impl Texture {
    fn new(name: &str, field_capacity: f64, wilting_point: f64) -> Self {
        Self { name: name.to_owned(), field_capacity, wilting_point }
    }
}

/// Hydraulic properties by texture class (USDA NRCS typical ranges).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Soil {
    pub default_texture: String,
    pub textures: Vec<Texture>,
}

impl Default for Soil {
    fn default() -> Self {
        Self {
            default_texture: DEFAULT_TEXTURE.to_owned(),
            textures: vec![
                Texture::new("Sand", 0.12, 0.04),
                Texture::new("Loamy Sand", 0.14, 0.06),
                Texture::new("Sandy Loam", 0.23, 0.10),
                Texture::new("Loam", 0.27, 0.12),
                Texture::new("Silt Loam", 0.33, 0.13),
                Texture::new("Sandy Clay Loam", 0.26, 0.15),
                Texture::new("Clay Loam", 0.32, 0.20),
                Texture::new("Silty Clay Loam", 0.37, 0.22),
                Texture::new("Clay", 0.43, 0.29),
            ],
        }
    }
}

impl Soil {
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.textures.iter().map(|t| t.name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&Texture> {
        self.textures.iter().find(|t| t.name == name)
    }

    /// Every entry must satisfy `0 <= wilting_point < field_capacity <= 1`, and the
    /// default texture must be one of them.
    pub fn validate(&self) -> Result<(), AppError> {
        for t in &self.textures {
            SoilProperties::new(t.field_capacity, t.wilting_point)
                .map_err(|e| AppError::InvalidArgument(format!("texture '{}': {}", t.name, e)))?;
        }
        if self.get(&self.default_texture).is_none() {
            return Err(AppError::InvalidArgument(format!(
                "default texture '{}' is not in the texture table",
                self.default_texture
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Sensor {
    /// volumetric, +-1.5%
    pub moisture_noise_std: f64,
    /// degC
    pub temp_noise_std: f64,
}

impl Default for Sensor {
    fn default() -> Self {
        Self { moisture_noise_std: 0.015, temp_noise_std: 0.8 }
    }
}

#[derive(Copy, Clone, Debug, Deserialize)]
#[serde(default)]
pub struct WaterBalance {
    /// Management Allowable Depletion, fraction of TAW
    pub mad_threshold: f64,
}

impl Default for WaterBalance {
    fn default() -> Self {
        Self { mad_threshold: 0.50 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Display {
    pub days_history: u32,
    pub cache_ttl_secs: u64,
    pub colors: BTreeMap<String, String>,
}

impl Default for Display {
    fn default() -> Self {
        let colors = [
            ("critical", "#e74c3c"),
            ("warning", "#f39c12"),
            ("optimal", "#27ae60"),
            ("saturated", "#3498db"),
            ("depth_shallow", "#e74c3c"),
            ("depth_mid", "#f39c12"),
            ("depth_deep", "#27ae60"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect();
        Self { days_history: 14, cache_ttl_secs: 300, colors }
    }
}

impl Display {
    pub fn color(&self, key: &str) -> String {
        self.colors.get(key).cloned().unwrap_or_else(|| "#888888".to_owned())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub field: Field,
    pub soil: Soil,
    pub sensor: Sensor,
    pub water_balance: WaterBalance,
    pub display: Display,
}

impl Config {
    pub fn load(args: &Args) -> Result<Self, AppError> {
        if let Some(cfg_str) = &args.cfg_str {
            return Self::load_from_str(cfg_str);
        }
        if !args.cfg_file.exists() {
            warn!("Config file {} not found. Proceeding with defaults.", args.cfg_file.display());
            return Ok(Self::default());
        }
        let config_content = fs::read_to_string(&args.cfg_file)?;
        Self::load_from_str(&config_content)
    }

    pub fn load_from_str(config_str: &str) -> Result<Self, AppError> {
        let config: Config = toml::from_str(config_str)?;
        config.soil.validate()?;
        Ok(config)
    }
}
