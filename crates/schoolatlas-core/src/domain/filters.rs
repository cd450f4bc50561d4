//! Filter criteria, sort orders and the pure list transformations that
//! apply them.
//!
//! Every function here is synchronous and side-effect free: the same
//! snapshot with the same criteria always yields the same list. State
//! holders recompute from the full snapshot on each parameter change.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::country::Country;
use super::province::{Province, ProvinceType};
use super::school::{School, SchoolType};
use super::translation::Localized;

/// Highest rating a school can have.
pub const MAX_RATING: f64 = 5.0;

// ─────────────────────────────────────────────────────────────────────────────
// Ranges and sort orders
// ─────────────────────────────────────────────────────────────────────────────

/// A range of numeric values with min and max (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeValues {
    pub min: f64,
    pub max: f64,
}

impl RangeValues {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CountrySortOrder {
    #[default]
    NameAsc,
    NameDesc,
    SchoolsAsc,
    SchoolsDesc,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProvinceSortOrder {
    #[default]
    NameAsc,
    NameDesc,
    SchoolsAsc,
    SchoolsDesc,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SchoolSortOrder {
    #[default]
    NameAsc,
    NameDesc,
    RatingAsc,
    RatingDesc,
    FeesAsc,
    FeesDesc,
    /// Earliest application deadline first; schools without one go last.
    DeadlineAsc,
    DeadlineDesc,
}

// ─────────────────────────────────────────────────────────────────────────────
// Filter criteria
// ─────────────────────────────────────────────────────────────────────────────

/// User-selected criteria for a province's school list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchoolFilters {
    /// Allowed school types; empty allows all.
    pub types: BTreeSet<SchoolType>,
    pub rating_range: RangeValues,
    /// Fee bounds; `None` disables the fee filter.
    pub fee_range: Option<RangeValues>,
    /// Every listed facility must be present.
    pub required_facilities: BTreeSet<String>,
    /// Every listed program must be offered.
    pub required_programs: BTreeSet<String>,
    pub min_established_year: Option<i32>,
    pub sort_order: SchoolSortOrder,
}

impl Default for SchoolFilters {
    fn default() -> Self {
        Self {
            types: BTreeSet::new(),
            rating_range: RangeValues::new(0.0, MAX_RATING),
            fee_range: None,
            required_facilities: BTreeSet::new(),
            required_programs: BTreeSet::new(),
            min_established_year: None,
            sort_order: SchoolSortOrder::default(),
        }
    }
}

impl SchoolFilters {
    fn active_flags(&self) -> [bool; 6] {
        [
            !self.types.is_empty(),
            self.rating_range != RangeValues::new(0.0, MAX_RATING),
            self.fee_range.is_some(),
            !self.required_facilities.is_empty(),
            !self.required_programs.is_empty(),
            self.min_established_year.is_some(),
        ]
    }

    /// Whether any criterion narrows the list. Sort order does not count.
    pub fn has_active_filters(&self) -> bool {
        self.active_flags().into_iter().any(|f| f)
    }

    pub fn active_filter_count(&self) -> usize {
        self.active_flags().into_iter().filter(|f| *f).count()
    }

    fn matches(&self, school: &Localized<School>) -> bool {
        let entity = &school.entity;

        if !self.types.is_empty() && !self.types.contains(&entity.school_type) {
            return false;
        }
        if !self.rating_range.contains(f64::from(entity.rating)) {
            return false;
        }
        if let Some(range) = self.fee_range {
            if !range.contains(entity.annual_fees) {
                return false;
            }
        }
        if let Some(min_year) = self.min_established_year {
            if entity.established_year.is_none_or(|year| year < min_year) {
                return false;
            }
        }
        if !contains_all(&entity.facilities, &self.required_facilities) {
            return false;
        }
        self.required_programs.is_empty()
            || contains_all(&school.programs(), &self.required_programs)
    }
}

/// Criteria for a country's province list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvinceFilters {
    pub types: BTreeSet<ProvinceType>,
    /// Bounds on `total_schools`; `None` disables the filter.
    pub school_count_range: Option<RangeValues>,
    pub sort_order: ProvinceSortOrder,
}

impl ProvinceFilters {
    pub fn has_active_filters(&self) -> bool {
        !self.types.is_empty() || self.school_count_range.is_some()
    }

    fn matches(&self, province: &Localized<Province>) -> bool {
        let entity = &province.entity;
        (self.types.is_empty() || self.types.contains(&entity.province_type))
            && self
                .school_count_range
                .is_none_or(|range| range.contains(f64::from(entity.total_schools)))
    }
}

/// Scope of a catalog-wide school search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchFilters {
    pub country_id: Option<String>,
    pub province_id: Option<String>,
    pub school_type: Option<SchoolType>,
}

/// A search query plus its scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolSearch {
    pub query: String,
    #[serde(flatten)]
    pub filters: SearchFilters,
}

impl SchoolSearch {
    pub fn new(query: impl Into<String>, filters: SearchFilters) -> Self {
        Self {
            query: query.into(),
            filters,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Pure list transformations
// ─────────────────────────────────────────────────────────────────────────────

/// Apply search text, filters and sort order to a school snapshot.
///
/// The search text matches the localized name or description,
/// case-insensitively.
pub fn filter_and_sort_schools(
    snapshot: &[Localized<School>],
    query: &str,
    filters: &SchoolFilters,
) -> Vec<Localized<School>> {
    let needle = query.trim().to_lowercase();
    let mut result: Vec<Localized<School>> = snapshot
        .iter()
        .filter(|school| {
            needle.is_empty()
                || contains_ci(&school.name, &needle)
                || school
                    .description
                    .as_deref()
                    .is_some_and(|d| contains_ci(d, &needle))
        })
        .filter(|school| filters.matches(school))
        .cloned()
        .collect();

    result.sort_by(|a, b| compare_schools(a, b, filters.sort_order));
    result
}

/// Apply search text and sort order to a country snapshot.
pub fn filter_and_sort_countries(
    snapshot: &[Localized<Country>],
    query: &str,
    order: CountrySortOrder,
) -> Vec<Localized<Country>> {
    let needle = query.trim().to_lowercase();
    let mut result: Vec<Localized<Country>> = snapshot
        .iter()
        .filter(|c| needle.is_empty() || contains_ci(&c.name, &needle))
        .cloned()
        .collect();

    result.sort_by(|a, b| {
        let primary = match order {
            CountrySortOrder::NameAsc => by_name(a, b),
            CountrySortOrder::NameDesc => by_name(b, a),
            CountrySortOrder::SchoolsAsc => a.entity.total_schools.cmp(&b.entity.total_schools),
            CountrySortOrder::SchoolsDesc => b.entity.total_schools.cmp(&a.entity.total_schools),
        };
        primary.then_with(|| a.entity.id.cmp(&b.entity.id))
    });
    result
}

/// Apply search text, filters and sort order to a province snapshot.
pub fn filter_and_sort_provinces(
    snapshot: &[Localized<Province>],
    query: &str,
    filters: &ProvinceFilters,
) -> Vec<Localized<Province>> {
    let needle = query.trim().to_lowercase();
    let mut result: Vec<Localized<Province>> = snapshot
        .iter()
        .filter(|p| needle.is_empty() || contains_ci(&p.name, &needle))
        .filter(|p| filters.matches(p))
        .cloned()
        .collect();

    result.sort_by(|a, b| {
        let primary = match filters.sort_order {
            ProvinceSortOrder::NameAsc => by_name(a, b),
            ProvinceSortOrder::NameDesc => by_name(b, a),
            ProvinceSortOrder::SchoolsAsc => a.entity.total_schools.cmp(&b.entity.total_schools),
            ProvinceSortOrder::SchoolsDesc => b.entity.total_schools.cmp(&a.entity.total_schools),
        };
        primary.then_with(|| a.entity.id.cmp(&b.entity.id))
    });
    result
}

/// School types present in a snapshot, for building type pickers.
pub fn available_school_types(snapshot: &[Localized<School>]) -> BTreeSet<SchoolType> {
    snapshot.iter().map(|s| s.entity.school_type).collect()
}

fn compare_schools(a: &Localized<School>, b: &Localized<School>, order: SchoolSortOrder) -> Ordering {
    let (x, y) = (&a.entity, &b.entity);
    let primary = match order {
        SchoolSortOrder::NameAsc => by_name(a, b),
        SchoolSortOrder::NameDesc => by_name(b, a),
        SchoolSortOrder::RatingAsc => x.rating.total_cmp(&y.rating),
        SchoolSortOrder::RatingDesc => y.rating.total_cmp(&x.rating),
        SchoolSortOrder::FeesAsc => x.annual_fees.total_cmp(&y.annual_fees),
        SchoolSortOrder::FeesDesc => y.annual_fees.total_cmp(&x.annual_fees),
        SchoolSortOrder::DeadlineAsc => missing_last(x.earliest_deadline(), y.earliest_deadline(), false),
        SchoolSortOrder::DeadlineDesc => missing_last(x.earliest_deadline(), y.earliest_deadline(), true),
    };
    primary.then_with(|| x.id.cmp(&y.id))
}

fn by_name<T>(a: &Localized<T>, b: &Localized<T>) -> Ordering {
    a.name.to_lowercase().cmp(&b.name.to_lowercase())
}

fn missing_last(a: Option<i64>, b: Option<i64>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) if descending => b.cmp(&a),
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn contains_ci(haystack: &str, lowered_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowered_needle)
}

fn contains_all(available: &[String], required: &BTreeSet<String>) -> bool {
    required.iter().all(|want| {
        available
            .iter()
            .any(|have| have.trim().eq_ignore_ascii_case(want.trim()))
    })
}
