use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::cost::{RegionalPrices, VehicleProfile, VehicleTable};
use crate::optimizer::{EngineConfig, DEFAULT_DEMAND_SCORE, DEFAULT_HANDLING_RATE};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineSection,
    #[serde(default)]
    pub fuel: FuelConfig,
    #[serde(default)]
    pub vehicles: VehiclesConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSection {
    #[serde(default = "default_handling_rate")]
    pub default_handling_rate: f64,
    #[serde(default = "default_demand_score")]
    pub default_demand_score: f64,
    /// Region used when a request names none.
    #[serde(default)]
    pub default_region: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FuelConfig {
    /// Extra or replacement price-per-litre entries keyed by region.
    #[serde(default)]
    pub regions: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehiclesConfig {
    #[serde(default)]
    pub fallback: VehicleProfile,
    #[serde(default)]
    pub profiles: BTreeMap<String, VehicleProfile>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CatalogConfig {
    /// JSON destinations file; the built-in catalog is used when empty.
    #[serde(default)]
    pub destinations_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub destinations_path: Option<PathBuf>,
    pub default_region: Option<String>,
}

impl Config {
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config/krishi-route/config.toml")
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(|p| p.to_path_buf())
            .unwrap_or_else(Self::default_path);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("failed reading config: {}", path.display()))?;
        Self::from_toml(&data)
            .with_context(|| format!("failed parsing TOML config: {}", path.display()))
    }

    pub fn from_toml(data: &str) -> Result<Self> {
        Ok(toml::from_str(data)?)
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(path) = overrides.destinations_path {
            self.catalog.destinations_path = path.display().to_string();
        }
        if let Some(region) = overrides.default_region {
            self.engine.default_region = Some(region);
        }
    }

    pub fn write_template(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed creating config directory: {}", parent.display())
            })?;
        }
        fs::write(path, Self::default_template())
            .with_context(|| format!("failed writing config template: {}", path.display()))
    }

    pub fn resolved_destinations_path(&self) -> Option<PathBuf> {
        let raw = self.catalog.destinations_path.trim();
        if raw.is_empty() {
            None
        } else {
            Some(expand_tilde(raw))
        }
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            default_handling_rate: positive_or(
                self.engine.default_handling_rate,
                DEFAULT_HANDLING_RATE,
            ),
            default_demand_score: positive_or(
                self.engine.default_demand_score,
                DEFAULT_DEMAND_SCORE,
            ),
            regional_prices: RegionalPrices::with_defaults().with_overrides(&self.fuel.regions),
            vehicles: VehicleTable::with_defaults()
                .with_fallback(self.vehicles.fallback)
                .with_overrides(&self.vehicles.profiles),
        }
    }

    pub fn default_template() -> String {
        let template = r#"[engine]
default_handling_rate = 150.0
default_demand_score = 50.0
# default_region = "Maharashtra"

[fuel.regions]
# Add or replace price-per-litre entries; "default" is the fallback.
# Delhi = 94.72
default = 100.0

[vehicles.fallback]
efficiency = 12.0
base_rate = 15.0
capacity = 30.0

# [vehicles.profiles.miniTruck]
# efficiency = 12.0
# base_rate = 15.0
# capacity = 30.0

[catalog]
destinations_path = ""

[server]
host = "127.0.0.1"
port = 3001
"#;
        template.to_string()
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

fn positive_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            default_handling_rate: default_handling_rate(),
            default_demand_score: default_demand_score(),
            default_region: None,
        }
    }
}

impl Default for VehiclesConfig {
    fn default() -> Self {
        Self {
            fallback: VehicleProfile::FALLBACK,
            profiles: BTreeMap::new(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_handling_rate() -> f64 {
    DEFAULT_HANDLING_RATE
}

fn default_demand_score() -> f64 {
    DEFAULT_DEMAND_SCORE
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3001
}
