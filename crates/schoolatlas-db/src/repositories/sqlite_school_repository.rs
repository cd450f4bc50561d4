//! `SQLite` implementation of the `SchoolRepository` trait.
//!
//! List and map fields are stored as JSON text. `is_favorite` is written on
//! first insert only; later upserts leave it untouched.

use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use schoolatlas_core::{RepositoryError, School, SchoolRepository, SchoolSearch, SchoolType};

use super::row_mappers::{
    SCHOOL_SELECT_COLUMNS, format_datetime, like_pattern, row_to_school, storage_error, to_json,
};

/// `SQLite` implementation of the `SchoolRepository` trait.
pub struct SqliteSchoolRepository {
    pool: SqlitePool,
}

impl SqliteSchoolRepository {
    /// Create a new `SQLite` school repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch(
        &self,
        mut builder: QueryBuilder<'_, Sqlite>,
    ) -> Result<Vec<School>, RepositoryError> {
        builder.push(" ORDER BY s.name COLLATE NOCASE, s.id");
        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)?;

        rows.iter().map(row_to_school).collect()
    }
}

fn select() -> QueryBuilder<'static, Sqlite> {
    QueryBuilder::new(format!(
        "SELECT {SCHOOL_SELECT_COLUMNS} FROM schools s JOIN provinces p ON p.id = s.province_id WHERE 1 = 1"
    ))
}

#[async_trait]
impl SchoolRepository for SqliteSchoolRepository {
    async fn list_by_province(
        &self,
        province_id: &str,
        school_type: Option<SchoolType>,
    ) -> Result<Vec<School>, RepositoryError> {
        let mut builder = select();
        builder.push(" AND s.province_id = ").push_bind(province_id.to_string());
        if let Some(school_type) = school_type {
            builder.push(" AND s.school_type = ").push_bind(school_type.as_str());
        }
        self.fetch(builder).await
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<School>, RepositoryError> {
        let mut builder = select();
        builder.push(" AND s.id = ").push_bind(id.to_string());
        Ok(self.fetch(builder).await?.into_iter().next())
    }

    async fn search(&self, search: &SchoolSearch) -> Result<Vec<School>, RepositoryError> {
        let mut builder = select();

        let pattern = like_pattern(&search.query);
        builder.push(" AND (");
        for (i, column) in ["s.name", "s.description", "s.programs", "s.facilities"]
            .into_iter()
            .enumerate()
        {
            if i > 0 {
                builder.push(" OR ");
            }
            builder
                .push(column)
                .push(" LIKE ")
                .push_bind(pattern.clone())
                .push(" ESCAPE '\\'");
        }
        builder.push(")");

        let filters = &search.filters;
        if let Some(country_id) = &filters.country_id {
            builder.push(" AND p.country_id = ").push_bind(country_id.clone());
        }
        if let Some(province_id) = &filters.province_id {
            builder.push(" AND s.province_id = ").push_bind(province_id.clone());
        }
        if let Some(school_type) = filters.school_type {
            builder.push(" AND s.school_type = ").push_bind(school_type.as_str());
        }

        self.fetch(builder).await
    }

    async fn favorites(&self) -> Result<Vec<School>, RepositoryError> {
        let mut builder = select();
        builder.push(" AND s.is_favorite = 1");
        self.fetch(builder).await
    }

    async fn toggle_favorite(&self, id: &str) -> Result<bool, RepositoryError> {
        let favorite: Option<bool> = sqlx::query_scalar(
            "UPDATE schools SET is_favorite = NOT is_favorite WHERE id = ? RETURNING is_favorite",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        favorite.ok_or_else(|| RepositoryError::NotFound(format!("School with id {id}")))
    }

    async fn upsert_many(&self, schools: &[School]) -> Result<usize, RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(storage_error)?;

        let mut stored = 0;
        for school in schools {
            let result = sqlx::query(
                r#"
                INSERT INTO schools (
                    id, province_id, name, school_type, description, established_year,
                    website, email, phone, address, latitude, longitude, annual_fees,
                    rating, acceptance_rate, image_urls, facilities, programs,
                    admission_requirements, application_deadlines, academic_calendar,
                    is_favorite, last_updated
                )
                SELECT ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?
                WHERE EXISTS (SELECT 1 FROM provinces WHERE id = ?)
                ON CONFLICT(id) DO UPDATE SET
                    province_id = excluded.province_id,
                    name = excluded.name,
                    school_type = excluded.school_type,
                    description = excluded.description,
                    established_year = excluded.established_year,
                    website = excluded.website,
                    email = excluded.email,
                    phone = excluded.phone,
                    address = excluded.address,
                    latitude = excluded.latitude,
                    longitude = excluded.longitude,
                    annual_fees = excluded.annual_fees,
                    rating = excluded.rating,
                    acceptance_rate = excluded.acceptance_rate,
                    image_urls = excluded.image_urls,
                    facilities = excluded.facilities,
                    programs = excluded.programs,
                    admission_requirements = excluded.admission_requirements,
                    application_deadlines = excluded.application_deadlines,
                    academic_calendar = excluded.academic_calendar,
                    last_updated = excluded.last_updated
                "#,
            )
            .bind(&school.id)
            .bind(&school.province_id)
            .bind(&school.name)
            .bind(school.school_type.as_str())
            .bind(&school.description)
            .bind(school.established_year)
            .bind(&school.website)
            .bind(&school.email)
            .bind(&school.phone)
            .bind(&school.address)
            .bind(school.latitude)
            .bind(school.longitude)
            .bind(school.annual_fees)
            .bind(f64::from(school.rating))
            .bind(school.acceptance_rate.map(i64::from))
            .bind(to_json(&school.image_urls)?)
            .bind(to_json(&school.facilities)?)
            .bind(to_json(&school.programs)?)
            .bind(to_json(&school.admission_requirements)?)
            .bind(to_json(&school.application_deadlines)?)
            .bind(to_json(&school.academic_calendar)?)
            .bind(school.is_favorite)
            .bind(format_datetime(&school.last_updated))
            .bind(&school.province_id)
            .execute(&mut *tx)
            .await
            .map_err(storage_error)?;

            if result.rows_affected() == 0 {
                debug!(
                    school_id = %school.id,
                    province_id = %school.province_id,
                    "Skipping school of uncached province"
                );
            } else {
                stored += 1;
            }
        }

        tx.commit()
            .await
            .map_err(storage_error)?;

        Ok(stored)
    }

    async fn delete_by_province(&self, province_id: &str) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM schools WHERE province_id = ?")
            .bind(province_id)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::TestDb;
    use chrono::{TimeZone, Utc};
    use schoolatlas_core::{
        Country, CountryRepository, Province, ProvinceRepository, ProvinceType, SearchFilters,
    };
    use std::collections::BTreeMap;

    fn school(id: &str, province_id: &str, name: &str) -> School {
        School {
            id: id.to_string(),
            province_id: province_id.to_string(),
            name: name.to_string(),
            school_type: SchoolType::Secondary,
            description: "Day and boarding".to_string(),
            established_year: Some(1902),
            website: Some(format!("https://{id}.example")),
            email: None,
            phone: None,
            address: "1 Main Road".to_string(),
            latitude: -33.96,
            longitude: 18.46,
            annual_fees: 5400.5,
            rating: 4.5,
            acceptance_rate: Some(35),
            image_urls: vec!["https://img.example/1.jpg".to_string()],
            facilities: vec!["Library".to_string(), "Pool".to_string()],
            programs: vec!["Mathematics".to_string()],
            admission_requirements: vec!["Interview".to_string()],
            application_deadlines: BTreeMap::from([("term1".to_string(), 1_735_689_600_000)]),
            academic_calendar: BTreeMap::from([("start".to_string(), "January".to_string())]),
            is_favorite: false,
            last_updated: Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap(),
        }
    }

    fn province(id: &str, country_id: &str) -> Province {
        Province {
            id: id.to_string(),
            country_id: country_id.to_string(),
            name: id.to_uppercase(),
            province_type: ProvinceType::Province,
            total_schools: 0,
            latitude: 0.0,
            longitude: 0.0,
            last_updated: Utc::now(),
        }
    }

    async fn db() -> TestDb {
        let db = TestDb::new().await.unwrap();
        let countries: Vec<Country> = ["za", "ke"]
            .into_iter()
            .map(|id| Country {
                id: id.to_string(),
                name: id.to_uppercase(),
                code: id.to_uppercase(),
                flag_url: String::new(),
                total_schools: 0,
                last_updated: Utc::now(),
            })
            .collect();
        db.country_repository().upsert_many(&countries).await.unwrap();
        db.province_repository()
            .upsert_many(&[province("wc", "za"), province("gp", "za"), province("nbi", "ke")])
            .await
            .unwrap();
        db
    }

    #[tokio::test]
    async fn test_round_trip_preserves_all_fields() {
        let db = db().await;
        let repo = db.school_repository();
        let original = school("rbhs", "wc", "Rondebosch Boys");
        repo.upsert_many(std::slice::from_ref(&original)).await.unwrap();

        assert_eq!(repo.get_by_id("rbhs").await.unwrap(), Some(original));
    }

    #[tokio::test]
    async fn test_upsert_keeps_favorite_flag() {
        let db = db().await;
        let repo = db.school_repository();
        repo.upsert_many(&[school("s1", "wc", "Wynberg")]).await.unwrap();
        assert!(repo.toggle_favorite("s1").await.unwrap());

        let mut fresh = school("s1", "wc", "Wynberg Boys");
        fresh.rating = 3.5;
        repo.upsert_many(&[fresh]).await.unwrap();

        let stored = repo.get_by_id("s1").await.unwrap().unwrap();
        assert!(stored.is_favorite);
        assert_eq!(stored.name, "Wynberg Boys");
        assert_eq!(stored.rating, 3.5);
    }

    #[tokio::test]
    async fn test_upsert_skips_orphans() {
        let db = db().await;
        let repo = db.school_repository();
        let stored = repo
            .upsert_many(&[school("s1", "wc", "Wynberg"), school("s2", "lagos", "Kings")])
            .await
            .unwrap();
        assert_eq!(stored, 1);
        assert!(repo.get_by_id("s2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_by_province_with_type() {
        let db = db().await;
        let repo = db.school_repository();
        let mut uct = school("uct", "wc", "UCT");
        uct.school_type = SchoolType::University;
        repo.upsert_many(&[uct, school("s1", "wc", "Wynberg"), school("s2", "gp", "Pretoria")])
            .await
            .unwrap();

        assert_eq!(repo.list_by_province("wc", None).await.unwrap().len(), 2);
        let universities = repo
            .list_by_province("wc", Some(SchoolType::University))
            .await
            .unwrap();
        assert_eq!(universities.len(), 1);
        assert_eq!(universities[0].id, "uct");
    }

    #[tokio::test]
    async fn test_search_matches_programs_and_scopes_by_country() {
        let db = db().await;
        let repo = db.school_repository();
        let mut alliance = school("ahs", "nbi", "Alliance High");
        alliance.programs = vec!["Robotics".to_string()];
        repo.upsert_many(&[alliance, school("s1", "wc", "Wynberg")])
            .await
            .unwrap();

        let by_program = repo
            .search(&SchoolSearch::new("robot", SearchFilters::default()))
            .await
            .unwrap();
        assert_eq!(by_program.len(), 1);

        let scoped = repo
            .search(&SchoolSearch::new(
                "library",
                SearchFilters {
                    country_id: Some("za".to_string()),
                    ..Default::default()
                },
            ))
            .await
            .unwrap();
        let ids: Vec<&str> = scoped.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["s1"]);
    }

    #[tokio::test]
    async fn test_favorites_and_toggle_missing() {
        let db = db().await;
        let repo = db.school_repository();
        repo.upsert_many(&[school("s1", "wc", "Wynberg"), school("s2", "wc", "Bishops")])
            .await
            .unwrap();
        repo.toggle_favorite("s2").await.unwrap();

        let favorites = repo.favorites().await.unwrap();
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].id, "s2");

        assert!(!repo.toggle_favorite("s2").await.unwrap());
        assert!(repo.favorites().await.unwrap().is_empty());
        assert!(matches!(
            repo.toggle_favorite("ghost").await,
            Err(RepositoryError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_by_province() {
        let db = db().await;
        let repo = db.school_repository();
        repo.upsert_many(&[school("s1", "wc", "Wynberg"), school("s2", "gp", "Pretoria")])
            .await
            .unwrap();
        assert_eq!(repo.delete_by_province("wc").await.unwrap(), 1);
        assert_eq!(repo.list_by_province("gp", None).await.unwrap().len(), 1);
    }
}
