//! Translation overlay and the localized view of catalog entities.
//!
//! Translations are sparse: a missing row for `(entity_id, entity_type,
//! language)` means the entity's default-language fields are shown unchanged.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::language::Language;

/// Kind of entity a translation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    Country,
    Province,
    School,
}

impl EntityType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Country => "COUNTRY",
            Self::Province => "PROVINCE",
            Self::School => "SCHOOL",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "COUNTRY" => Ok(Self::Country),
            "PROVINCE" => Ok(Self::Province),
            "SCHOOL" => Ok(Self::School),
            other => Err(format!("Unknown entity type: {other}")),
        }
    }
}

/// A translated name/description for one entity in one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    pub entity_id: String,
    pub entity_type: EntityType,
    pub language: Language,
    pub name: String,
    pub description: Option<String>,
    /// Free-form extras; schools use `programs` and `requirements`
    /// (comma-separated).
    #[serde(default)]
    pub additional_info: BTreeMap<String, String>,
}

/// Additional-info key holding comma-separated translated programs.
pub const PROGRAMS_KEY: &str = "programs";

/// Additional-info key holding comma-separated translated admission requirements.
pub const REQUIREMENTS_KEY: &str = "requirements";

/// An entity that can carry a translation overlay.
pub trait Localizable {
    /// Translation rows for this entity use this type tag.
    const ENTITY_TYPE: EntityType;

    fn entity_id(&self) -> &str;

    fn default_name(&self) -> &str;

    fn default_description(&self) -> Option<&str> {
        None
    }
}

/// An entity joined with its translation for the active language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Localized<T> {
    pub entity: T,
    /// Translated name, or the entity's default name.
    pub name: String,
    /// Translated description, or the entity's default description.
    pub description: Option<String>,
    /// Translation extras; empty when no translation exists.
    pub additional_info: BTreeMap<String, String>,
}

impl<T: Localizable> Localized<T> {
    /// Join `entity` with an optional translation, falling back to defaults.
    pub fn new(entity: T, translation: Option<&Translation>) -> Self {
        match translation {
            Some(t) => Self {
                name: t.name.clone(),
                description: t
                    .description
                    .clone()
                    .or_else(|| entity.default_description().map(str::to_string)),
                additional_info: t.additional_info.clone(),
                entity,
            },
            None => Self::untranslated(entity),
        }
    }

    /// The default-language view of an entity.
    pub fn untranslated(entity: T) -> Self {
        Self {
            name: entity.default_name().to_string(),
            description: entity.default_description().map(str::to_string),
            additional_info: BTreeMap::new(),
            entity,
        }
    }

    pub fn id(&self) -> &str {
        self.entity.entity_id()
    }

    /// Split a comma-separated additional-info entry, if present.
    pub(crate) fn info_list(&self, key: &str) -> Option<Vec<String>> {
        self.additional_info.get(key).map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
    }
}

/// Join every entity with its matching translation, preserving input order.
///
/// `translations` should already be narrowed to one language; rows for other
/// entity types are ignored.
pub fn localize_all<T: Localizable>(entities: Vec<T>, translations: &[Translation]) -> Vec<Localized<T>> {
    let by_id: HashMap<&str, &Translation> = translations
        .iter()
        .filter(|t| t.entity_type == T::ENTITY_TYPE)
        .map(|t| (t.entity_id.as_str(), t))
        .collect();

    entities
        .into_iter()
        .map(|entity| {
            let translation = by_id.get(entity.entity_id()).copied();
            Localized::new(entity, translation)
        })
        .collect()
}
