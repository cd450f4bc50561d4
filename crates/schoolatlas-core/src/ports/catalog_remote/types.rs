//! DTOs returned by the remote catalog port.

use crate::domain::{Country, Province, Translation};

/// A remote entity split into its domain row and its translation rows.
#[derive(Debug, Clone, PartialEq)]
pub struct WithTranslations<T> {
    pub entity: T,
    pub translations: Vec<Translation>,
}

impl<T> WithTranslations<T> {
    pub const fn new(entity: T, translations: Vec<Translation>) -> Self {
        Self {
            entity,
            translations,
        }
    }

    /// Split a batch into entity rows and a flat list of translations.
    pub fn unzip(items: Vec<Self>) -> (Vec<T>, Vec<Translation>) {
        let mut entities = Vec::with_capacity(items.len());
        let mut translations = Vec::new();
        for item in items {
            entities.push(item.entity);
            translations.extend(item.translations);
        }
        (entities, translations)
    }
}

/// A single country with the provinces the detail endpoint embeds.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryDetails {
    pub country: WithTranslations<Country>,
    pub provinces: Vec<WithTranslations<Province>>,
}
