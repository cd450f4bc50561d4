//! Settings domain types and validation.
//!
//! User preferences persisted across sessions: browsing language, list sort
//! orders, the last school filters and remote paging. These are pure domain
//! types with no infrastructure dependencies.

use serde::{Deserialize, Serialize};

use crate::domain::{
    CountrySortOrder, DEFAULT_PAGE_SIZE, Language, MAX_PAGE_SIZE, MAX_RATING, ProvinceSortOrder,
    SchoolFilters,
};

/// Default base URL of the remote school catalog.
pub const DEFAULT_API_BASE_URL: &str = "https://api.africanschools.com/v1/";

/// Application settings structure.
///
/// All fields are optional to support partial updates and graceful defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Language catalog content is requested and displayed in.
    pub language: Option<Language>,

    /// Sort order of the country list.
    pub country_sort_order: Option<CountrySortOrder>,

    /// Sort order of province lists.
    pub province_sort_order: Option<ProvinceSortOrder>,

    /// Last school filters, restored when a school list opens.
    pub school_filters: Option<SchoolFilters>,

    /// Items requested per remote page (1-100).
    pub page_size: Option<u32>,

    /// Override for the remote catalog base URL.
    pub api_base_url: Option<String>,
}

impl Settings {
    /// Create settings with sensible defaults.
    #[must_use]
    pub const fn with_defaults() -> Self {
        Self {
            language: Some(Language::English),
            country_sort_order: Some(CountrySortOrder::NameAsc),
            province_sort_order: Some(ProvinceSortOrder::NameAsc),
            school_filters: None,
            page_size: Some(DEFAULT_PAGE_SIZE),
            api_base_url: None,
        }
    }

    /// Get the effective language (with default fallback).
    #[must_use]
    pub fn effective_language(&self) -> Language {
        self.language.unwrap_or_default()
    }

    /// Get the effective page size (with default fallback).
    #[must_use]
    pub fn effective_page_size(&self) -> u32 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// Get the effective base URL (with default fallback).
    #[must_use]
    pub fn effective_api_base_url(&self) -> &str {
        self.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL)
    }

    /// Merge another settings into this one, only updating fields that are Some.
    pub fn merge(&mut self, other: &SettingsUpdate) {
        if let Some(language) = other.language {
            self.language = language;
        }
        if let Some(order) = other.country_sort_order {
            self.country_sort_order = order;
        }
        if let Some(order) = other.province_sort_order {
            self.province_sort_order = order;
        }
        if let Some(ref filters) = other.school_filters {
            self.school_filters.clone_from(filters);
        }
        if let Some(size) = other.page_size {
            self.page_size = size;
        }
        if let Some(ref url) = other.api_base_url {
            self.api_base_url.clone_from(url);
        }
    }
}

/// Partial settings update.
///
/// Each field is `Option<Option<T>>`:
/// - `None` = don't change this field
/// - `Some(None)` = set field to None/null
/// - `Some(Some(value))` = set field to value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub language: Option<Option<Language>>,
    pub country_sort_order: Option<Option<CountrySortOrder>>,
    pub province_sort_order: Option<Option<ProvinceSortOrder>>,
    pub school_filters: Option<Option<SchoolFilters>>,
    pub page_size: Option<Option<u32>>,
    pub api_base_url: Option<Option<String>>,
}

/// Settings validation error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SettingsError {
    #[error("Page size must be between 1 and {MAX_PAGE_SIZE}, got {0}")]
    InvalidPageSize(u32),

    #[error("API base URL must start with http:// or https://, got '{0}'")]
    InvalidBaseUrl(String),

    #[error("Rating range must lie within 0-{MAX_RATING} with min <= max, got {min}-{max}")]
    InvalidRatingRange { min: f64, max: f64 },

    #[error("Fee range must be non-negative with min <= max, got {min}-{max}")]
    InvalidFeeRange { min: f64, max: f64 },
}

/// Validate settings values.
pub fn validate_settings(settings: &Settings) -> Result<(), SettingsError> {
    if let Some(size) = settings.page_size {
        if !(1..=MAX_PAGE_SIZE).contains(&size) {
            return Err(SettingsError::InvalidPageSize(size));
        }
    }

    if let Some(url) = settings.api_base_url.as_deref() {
        let trimmed = url.trim();
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(SettingsError::InvalidBaseUrl(url.to_string()));
        }
    }

    if let Some(filters) = &settings.school_filters {
        let rating = filters.rating_range;
        if rating.min < 0.0 || rating.max > MAX_RATING || rating.min > rating.max {
            return Err(SettingsError::InvalidRatingRange {
                min: rating.min,
                max: rating.max,
            });
        }
        if let Some(fees) = filters.fee_range {
            if fees.min < 0.0 || fees.min > fees.max {
                return Err(SettingsError::InvalidFeeRange {
                    min: fees.min,
                    max: fees.max,
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RangeValues, SchoolSortOrder};

    #[test]
    fn test_default_settings() {
        let settings = Settings::with_defaults();
        assert_eq!(settings.language, Some(Language::English));
        assert_eq!(settings.page_size, Some(DEFAULT_PAGE_SIZE));
        assert_eq!(settings.country_sort_order, Some(CountrySortOrder::NameAsc));
        assert!(settings.school_filters.is_none());
        assert_eq!(settings.effective_api_base_url(), DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_validate_settings_valid() {
        assert!(validate_settings(&Settings::with_defaults()).is_ok());
        assert!(validate_settings(&Settings::default()).is_ok());
    }

    #[test]
    fn test_validate_page_size_bounds() {
        for bad in [0, MAX_PAGE_SIZE + 1] {
            let settings = Settings {
                page_size: Some(bad),
                ..Default::default()
            };
            assert!(matches!(
                validate_settings(&settings),
                Err(SettingsError::InvalidPageSize(n)) if n == bad
            ));
        }
    }

    #[test]
    fn test_validate_base_url() {
        let settings = Settings {
            api_base_url: Some("ftp://example.com".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            validate_settings(&settings),
            Err(SettingsError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn test_validate_school_filter_ranges() {
        let settings = Settings {
            school_filters: Some(SchoolFilters {
                rating_range: RangeValues::new(4.0, 6.0),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(matches!(
            validate_settings(&settings),
            Err(SettingsError::InvalidRatingRange { .. })
        ));

        let settings = Settings {
            school_filters: Some(SchoolFilters {
                fee_range: Some(RangeValues::new(500.0, 100.0)),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(matches!(
            validate_settings(&settings),
            Err(SettingsError::InvalidFeeRange { .. })
        ));
    }

    #[test]
    fn test_merge_settings() {
        let mut settings = Settings::with_defaults();
        let update = SettingsUpdate {
            language: Some(Some(Language::Zulu)),
            page_size: Some(None),
            school_filters: Some(Some(SchoolFilters {
                sort_order: SchoolSortOrder::RatingDesc,
                ..Default::default()
            })),
            ..Default::default()
        };
        settings.merge(&update);

        assert_eq!(settings.language, Some(Language::Zulu));
        assert_eq!(settings.page_size, None);
        assert_eq!(settings.effective_page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(
            settings.school_filters.map(|f| f.sort_order),
            Some(SchoolSortOrder::RatingDesc)
        );
        // Unchanged
        assert_eq!(settings.country_sort_order, Some(CountrySortOrder::NameAsc));
    }

    #[test]
    fn test_settings_json_round_trip_tolerates_missing_fields() {
        let settings: Settings = serde_json::from_str(r#"{"language":"YORUBA"}"#).unwrap();
        assert_eq!(settings.effective_language(), Language::Yoruba);
        assert_eq!(settings.page_size, None);
    }
}
