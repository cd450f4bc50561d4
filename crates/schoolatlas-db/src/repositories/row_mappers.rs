//! Row mapping helpers for `SQLite` queries.

use chrono::{DateTime, NaiveDateTime, Utc};
use schoolatlas_core::{
    Country, EntityType, Language, Province, RepositoryError, School, Translation,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

/// Shared SELECT column list for country queries.
pub const COUNTRY_SELECT_COLUMNS: &str =
    "id, name, code, flag_url, total_schools, last_updated";

/// Shared SELECT column list for province queries.
pub const PROVINCE_SELECT_COLUMNS: &str = "id, country_id, name, province_type, total_schools, latitude, longitude, last_updated";

/// Shared SELECT column list for school queries, qualified for joins.
pub const SCHOOL_SELECT_COLUMNS: &str = "s.id, s.province_id, s.name, s.school_type, s.description, s.established_year, s.website, s.email, s.phone, s.address, s.latitude, s.longitude, s.annual_fees, s.rating, s.acceptance_rate, s.image_urls, s.facilities, s.programs, s.admission_requirements, s.application_deadlines, s.academic_calendar, s.is_favorite, s.last_updated";

/// Helper to parse datetime strings that may have "UTC" suffix.
pub fn parse_datetime(datetime_str: Option<String>) -> Option<DateTime<Utc>> {
    datetime_str.and_then(|s| {
        let trimmed = s.trim_end_matches(" UTC");
        NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f")
            .map(|dt| DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc))
            .ok()
    })
}

/// Storage form of a timestamp, readable by [`parse_datetime`].
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_string()
}

/// `%needle%` with `%`, `_` and `\` in the needle escaped. Pair with
/// `ESCAPE '\'`.
pub fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.trim().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Classify a sqlx failure, keeping constraint violations distinct.
pub fn storage_error(err: sqlx::Error) -> RepositoryError {
    if let Some(db) = err.as_database_error() {
        if db.is_foreign_key_violation() {
            return RepositoryError::Constraint(db.message().to_string());
        }
        if db.is_unique_violation() {
            return RepositoryError::AlreadyExists(db.message().to_string());
        }
    }
    RepositoryError::Storage(err.to_string())
}

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, RepositoryError> {
    serde_json::to_string(value).map_err(|e| RepositoryError::Serialization(e.to_string()))
}

fn from_json<T: DeserializeOwned>(column: &str, json: &str) -> Result<T, RepositoryError> {
    serde_json::from_str(json)
        .map_err(|e| RepositoryError::Serialization(format!("{column}: {e}")))
}

fn get<'r, T>(row: &'r SqliteRow, column: &str) -> Result<T, RepositoryError>
where
    T: sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    row.try_get(column)
        .map_err(|e| RepositoryError::Storage(format!("{column}: {e}")))
}

fn get_count(row: &SqliteRow, column: &str) -> Result<u32, RepositoryError> {
    let raw: i64 = get(row, column)?;
    u32::try_from(raw).map_err(|_| RepositoryError::Storage(format!("{column} out of range: {raw}")))
}

fn get_timestamp(row: &SqliteRow, column: &str) -> Result<DateTime<Utc>, RepositoryError> {
    let raw: Option<String> = get(row, column)?;
    Ok(parse_datetime(raw).unwrap_or_else(Utc::now))
}

fn parse_enum<T>(column: &str, raw: &str) -> Result<T, RepositoryError>
where
    T: std::str::FromStr<Err = String>,
{
    raw.parse()
        .map_err(|e| RepositoryError::Serialization(format!("{column}: {e}")))
}

/// Parse a database row into a Country.
pub fn row_to_country(row: &SqliteRow) -> Result<Country, RepositoryError> {
    Ok(Country {
        id: get(row, "id")?,
        name: get(row, "name")?,
        code: get(row, "code")?,
        flag_url: get(row, "flag_url")?,
        total_schools: get_count(row, "total_schools")?,
        last_updated: get_timestamp(row, "last_updated")?,
    })
}

/// Parse a database row into a Province.
pub fn row_to_province(row: &SqliteRow) -> Result<Province, RepositoryError> {
    let province_type: String = get(row, "province_type")?;
    Ok(Province {
        id: get(row, "id")?,
        country_id: get(row, "country_id")?,
        name: get(row, "name")?,
        province_type: parse_enum("province_type", &province_type)?,
        total_schools: get_count(row, "total_schools")?,
        latitude: get(row, "latitude")?,
        longitude: get(row, "longitude")?,
        last_updated: get_timestamp(row, "last_updated")?,
    })
}

/// Parse a database row into a School.
pub fn row_to_school(row: &SqliteRow) -> Result<School, RepositoryError> {
    let school_type: String = get(row, "school_type")?;
    let rating: f64 = get(row, "rating")?;
    let acceptance_rate: Option<i64> = get(row, "acceptance_rate")?;
    let established_year: Option<i64> = get(row, "established_year")?;
    let image_urls: String = get(row, "image_urls")?;
    let facilities: String = get(row, "facilities")?;
    let programs: String = get(row, "programs")?;
    let requirements: String = get(row, "admission_requirements")?;
    let deadlines: String = get(row, "application_deadlines")?;
    let calendar: String = get(row, "academic_calendar")?;
    #[allow(clippy::cast_possible_truncation)]
    let rating = rating as f32;

    Ok(School {
        id: get(row, "id")?,
        province_id: get(row, "province_id")?,
        name: get(row, "name")?,
        school_type: parse_enum("school_type", &school_type)?,
        description: get(row, "description")?,
        established_year: established_year.and_then(|y| i32::try_from(y).ok()),
        website: get(row, "website")?,
        email: get(row, "email")?,
        phone: get(row, "phone")?,
        address: get(row, "address")?,
        latitude: get(row, "latitude")?,
        longitude: get(row, "longitude")?,
        annual_fees: get(row, "annual_fees")?,
        rating,
        acceptance_rate: acceptance_rate.and_then(|r| u8::try_from(r).ok()),
        image_urls: from_json("image_urls", &image_urls)?,
        facilities: from_json("facilities", &facilities)?,
        programs: from_json("programs", &programs)?,
        admission_requirements: from_json("admission_requirements", &requirements)?,
        application_deadlines: from_json("application_deadlines", &deadlines)?,
        academic_calendar: from_json("academic_calendar", &calendar)?,
        is_favorite: get(row, "is_favorite")?,
        last_updated: get_timestamp(row, "last_updated")?,
    })
}

/// Parse a database row into a Translation.
pub fn row_to_translation(row: &SqliteRow) -> Result<Translation, RepositoryError> {
    let entity_type: String = get(row, "entity_type")?;
    let language: String = get(row, "language")?;
    let additional_info: String = get(row, "additional_info")?;

    Ok(Translation {
        entity_id: get(row, "entity_id")?,
        entity_type: parse_enum::<EntityType>("entity_type", &entity_type)?,
        language: language
            .parse::<Language>()
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?,
        name: get(row, "name")?,
        description: get(row, "description")?,
        additional_info: from_json("additional_info", &additional_info)?,
    })
}
