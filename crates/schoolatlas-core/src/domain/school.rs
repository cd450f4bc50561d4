//! School entity and its localized accessors.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::translation::{EntityType, Localizable, Localized, PROGRAMS_KEY, REQUIREMENTS_KEY};

/// Level or kind of institution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SchoolType {
    Primary,
    Secondary,
    University,
    Technical,
    Vocational,
}

impl SchoolType {
    pub const ALL: [Self; 5] = [
        Self::Primary,
        Self::Secondary,
        Self::University,
        Self::Technical,
        Self::Vocational,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "PRIMARY",
            Self::Secondary => "SECONDARY",
            Self::University => "UNIVERSITY",
            Self::Technical => "TECHNICAL",
            Self::Vocational => "VOCATIONAL",
        }
    }
}

impl fmt::Display for SchoolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchoolType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == upper)
            .ok_or_else(|| format!("Unknown school type: {s}"))
    }
}

/// A school belonging to a province.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct School {
    pub id: String,
    /// Parent province; must exist in the local store.
    pub province_id: String,
    pub name: String,
    pub school_type: SchoolType,
    pub description: String,
    pub established_year: Option<i32>,
    pub website: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Yearly tuition in the catalog's reference currency.
    pub annual_fees: f64,
    /// Average rating, 0.0 to 5.0.
    pub rating: f32,
    /// Percentage of applicants admitted, when published.
    pub acceptance_rate: Option<u8>,
    pub image_urls: Vec<String>,
    pub facilities: Vec<String>,
    pub programs: Vec<String>,
    pub admission_requirements: Vec<String>,
    /// Intake name to deadline, as Unix epoch milliseconds.
    pub application_deadlines: BTreeMap<String, i64>,
    pub academic_calendar: BTreeMap<String, String>,
    /// Local-only bookmark flag; never overwritten by remote refreshes.
    pub is_favorite: bool,
    pub last_updated: DateTime<Utc>,
}

impl School {
    /// Earliest published application deadline, if any.
    pub fn earliest_deadline(&self) -> Option<i64> {
        self.application_deadlines.values().min().copied()
    }
}

impl Localizable for School {
    const ENTITY_TYPE: EntityType = EntityType::School;

    fn entity_id(&self) -> &str {
        &self.id
    }

    fn default_name(&self) -> &str {
        &self.name
    }

    fn default_description(&self) -> Option<&str> {
        Some(&self.description)
    }
}

impl Localized<School> {
    /// Translated programs, or the school's own list.
    pub fn programs(&self) -> Vec<String> {
        self.info_list(PROGRAMS_KEY)
            .unwrap_or_else(|| self.entity.programs.clone())
    }

    /// Translated admission requirements, or the school's own list.
    pub fn admission_requirements(&self) -> Vec<String> {
        self.info_list(REQUIREMENTS_KEY)
            .unwrap_or_else(|| self.entity.admission_requirements.clone())
    }
}
