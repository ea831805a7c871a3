use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub enum VehicleClass {
    Bike,
    Auto,
    MiniTruck,
    LargeTruck,
    Tractor,
    Other(String),
}

impl VehicleClass {
    pub fn as_slug(&self) -> &str {
        match self {
            Self::Bike => "bike",
            Self::Auto => "auto",
            Self::MiniTruck => "miniTruck",
            Self::LargeTruck => "largeTruck",
            Self::Tractor => "tractor",
            Self::Other(name) => name,
        }
    }
}

impl Display for VehicleClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_slug())
    }
}

#[derive(Debug, Error)]
#[error("vehicle class must not be empty")]
pub struct VehicleParseError;

impl FromStr for VehicleClass {
    type Err = VehicleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let normalized = trimmed.to_ascii_lowercase().replace(['-', '_', ' '], "");
        let class = match normalized.as_str() {
            "bike" | "twowheeler" => Self::Bike,
            "auto" | "threewheeler" => Self::Auto,
            "minitruck" | "smalltruck" => Self::MiniTruck,
            "largetruck" => Self::LargeTruck,
            "tractor" | "animalcart" => Self::Tractor,
            "" => return Err(VehicleParseError),
            _ => Self::Other(trimmed.to_string()),
        };
        Ok(class)
    }
}

impl TryFrom<String> for VehicleClass {
    type Error = VehicleParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<VehicleClass> for String {
    fn from(value: VehicleClass) -> Self {
        value.as_slug().to_string()
    }
}

/// Fixed operating constants of a vehicle class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleProfile {
    /// Kilometres per litre.
    pub efficiency: f64,
    /// Currency per kilometre for driver and wear.
    pub base_rate: f64,
    /// Maximum payload in quintals.
    pub capacity: f64,
}

impl VehicleProfile {
    pub const FALLBACK: VehicleProfile = VehicleProfile {
        efficiency: 12.0,
        base_rate: 15.0,
        capacity: 30.0,
    };

    pub fn is_usable(&self) -> bool {
        self.efficiency.is_finite()
            && self.efficiency > 0.0
            && self.base_rate.is_finite()
            && self.base_rate >= 0.0
            && self.capacity.is_finite()
            && self.capacity > 0.0
    }
}

impl Default for VehicleProfile {
    fn default() -> Self {
        Self::FALLBACK
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VehicleTable {
    profiles: BTreeMap<VehicleClass, VehicleProfile>,
    fallback: VehicleProfile,
}

impl VehicleTable {
    pub fn with_defaults() -> Self {
        let profiles = [
            (VehicleClass::Bike, 45.0, 3.5, 1.0),
            (VehicleClass::Auto, 22.0, 7.0, 3.0),
            (VehicleClass::MiniTruck, 12.0, 15.0, 30.0),
            (VehicleClass::LargeTruck, 8.0, 25.0, 100.0),
            (VehicleClass::Tractor, 6.0, 12.0, 20.0),
        ]
        .into_iter()
        .map(|(class, efficiency, base_rate, capacity)| {
            (
                class,
                VehicleProfile {
                    efficiency,
                    base_rate,
                    capacity,
                },
            )
        })
        .collect();
        Self {
            profiles,
            fallback: VehicleProfile::FALLBACK,
        }
    }

    pub fn with_fallback(mut self, fallback: VehicleProfile) -> Self {
        if fallback.is_usable() {
            self.fallback = fallback;
        }
        self
    }

    /// Adds or replaces profiles keyed by vehicle name. Unusable profiles are ignored.
    pub fn with_overrides(mut self, overrides: &BTreeMap<String, VehicleProfile>) -> Self {
        for (name, profile) in overrides {
            let Ok(class) = name.parse::<VehicleClass>() else {
                continue;
            };
            if profile.is_usable() {
                self.profiles.insert(class, *profile);
            }
        }
        self
    }

    /// Constants for `class`, or the fallback tuple when the class is unknown.
    pub fn constants(&self, class: &VehicleClass) -> VehicleProfile {
        self.profiles.get(class).copied().unwrap_or(self.fallback)
    }

    pub fn fallback(&self) -> VehicleProfile {
        self.fallback
    }

    pub fn entries(&self) -> impl Iterator<Item = (&VehicleClass, &VehicleProfile)> {
        self.profiles.iter()
    }
}

impl Default for VehicleTable {
    fn default() -> Self {
        Self::with_defaults()
    }
}
