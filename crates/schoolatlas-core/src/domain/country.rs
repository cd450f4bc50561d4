use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::translation::{EntityType, Localizable};

/// A country in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub id: String,
    pub name: String,
    /// ISO 3166 alpha-2 code.
    pub code: String,
    pub flag_url: String,
    pub total_schools: u32,
    /// When this row was last written from the remote catalog.
    pub last_updated: DateTime<Utc>,
}

impl Localizable for Country {
    const ENTITY_TYPE: EntityType = EntityType::Country;

    fn entity_id(&self) -> &str {
        &self.id
    }

    fn default_name(&self) -> &str {
        &self.name
    }
}
