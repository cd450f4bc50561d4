use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::translation::{EntityType, Localizable};

/// Administrative kind of a province-level region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProvinceType {
    Province,
    City,
}

impl ProvinceType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Province => "PROVINCE",
            Self::City => "CITY",
        }
    }
}

impl fmt::Display for ProvinceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProvinceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PROVINCE" => Ok(Self::Province),
            "CITY" => Ok(Self::City),
            other => Err(format!("Unknown province type: {other}")),
        }
    }
}

/// A province or city belonging to a country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Province {
    pub id: String,
    /// Parent country; must exist in the local store.
    pub country_id: String,
    pub name: String,
    pub province_type: ProvinceType,
    pub total_schools: u32,
    pub latitude: f64,
    pub longitude: f64,
    pub last_updated: DateTime<Utc>,
}

impl Localizable for Province {
    const ENTITY_TYPE: EntityType = EntityType::Province;

    fn entity_id(&self) -> &str {
        &self.id
    }

    fn default_name(&self) -> &str {
        &self.name
    }
}
