//! Conversions from wire types into core domain rows.
//!
//! Every entity arrives with an inline `translations` map; parsing splits
//! it into the entity row plus one `Translation` row per known language.
//! `last_updated` is stamped with the time of parsing.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use schoolatlas_core::{
    Country, CountryDetails, EntityType, Language, Page, Province, ProvinceType, School,
    SchoolType, Translation, WithTranslations,
};
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::models::{ApiCountry, ApiCountryDetails, ApiPage, ApiProvince, ApiSchool, ApiTranslations};

// ============================================================================
// Translations
// ============================================================================

/// Flatten a wire translation map into rows for `entity_id`.
///
/// Keys that are not a known language are dropped. Rows come out sorted by
/// language so results are stable.
pub fn parse_translations(
    entity_id: &str,
    entity_type: EntityType,
    translations: ApiTranslations,
) -> Vec<Translation> {
    let mut rows: Vec<Translation> = translations
        .into_iter()
        .filter_map(|(key, value)| match key.parse::<Language>() {
            Ok(language) => Some(Translation {
                entity_id: entity_id.to_string(),
                entity_type,
                language,
                name: value.name,
                description: value.description,
                additional_info: value.additional_info.into_iter().collect(),
            }),
            Err(_) => {
                debug!(entity_id, %entity_type, language = %key, "Skipping unknown translation language");
                None
            }
        })
        .collect();
    rows.sort_by_key(|t| t.language.as_str());
    rows
}

// ============================================================================
// Entities
// ============================================================================

pub fn parse_country(country: ApiCountry, now: DateTime<Utc>) -> WithTranslations<Country> {
    let translations = parse_translations(&country.id, EntityType::Country, country.translations);
    WithTranslations::new(
        Country {
            id: country.id,
            name: country.name,
            code: country.code,
            flag_url: country.flag_url,
            total_schools: country.total_schools,
            last_updated: now,
        },
        translations,
    )
}

pub fn parse_province(
    province: ApiProvince,
    now: DateTime<Utc>,
) -> ApiResult<WithTranslations<Province>> {
    let province_type: ProvinceType = province
        .province_type
        .parse()
        .map_err(|message| ApiError::InvalidResponse { message })?;
    let translations =
        parse_translations(&province.id, EntityType::Province, province.translations);

    Ok(WithTranslations::new(
        Province {
            id: province.id,
            country_id: province.country_id,
            name: province.name,
            province_type,
            total_schools: province.total_schools,
            latitude: province.coordinates.latitude,
            longitude: province.coordinates.longitude,
            last_updated: now,
        },
        translations,
    ))
}

pub fn parse_school(school: ApiSchool, now: DateTime<Utc>) -> ApiResult<WithTranslations<School>> {
    let school_type: SchoolType = school
        .school_type
        .parse()
        .map_err(|message| ApiError::InvalidResponse { message })?;
    let translations = parse_translations(&school.id, EntityType::School, school.translations);

    Ok(WithTranslations::new(
        School {
            id: school.id,
            province_id: school.province_id,
            name: school.name,
            school_type,
            description: school.description,
            established_year: school.established_year,
            website: school.website,
            email: school.email,
            phone: school.phone,
            address: school.address,
            latitude: school.coordinates.latitude,
            longitude: school.coordinates.longitude,
            annual_fees: school.annual_fees,
            rating: school.rating,
            acceptance_rate: school.acceptance_rate,
            image_urls: school.image_urls,
            facilities: school.facilities,
            programs: school.programs,
            admission_requirements: school.admission_requirements,
            application_deadlines: school.application_deadlines.into_iter().collect::<BTreeMap<_, _>>(),
            academic_calendar: school.academic_calendar.into_iter().collect(),
            // Local-only flag; the repository keeps the stored value.
            is_favorite: false,
            last_updated: now,
        },
        translations,
    ))
}

// ============================================================================
// Responses
// ============================================================================

pub fn parse_countries(countries: Vec<ApiCountry>) -> Vec<WithTranslations<Country>> {
    let now = Utc::now();
    countries.into_iter().map(|c| parse_country(c, now)).collect()
}

pub fn parse_country_details(details: ApiCountryDetails) -> ApiResult<CountryDetails> {
    let now = Utc::now();
    let provinces = details
        .provinces
        .into_iter()
        .map(|p| parse_province(p, now))
        .collect::<ApiResult<Vec<_>>>()?;
    Ok(CountryDetails {
        country: parse_country(details.country, now),
        provinces,
    })
}

pub fn parse_provinces(provinces: Vec<ApiProvince>) -> ApiResult<Vec<WithTranslations<Province>>> {
    let now = Utc::now();
    provinces.into_iter().map(|p| parse_province(p, now)).collect()
}

pub fn parse_school_page(page: ApiPage<ApiSchool>) -> ApiResult<Page<WithTranslations<School>>> {
    let now = Utc::now();
    let items = page
        .items
        .into_iter()
        .map(|s| parse_school(s, now))
        .collect::<ApiResult<Vec<_>>>()?;
    Ok(Page {
        items,
        total_items: page.total_items,
        page: page.page,
        total_pages: page.total_pages,
    })
}
