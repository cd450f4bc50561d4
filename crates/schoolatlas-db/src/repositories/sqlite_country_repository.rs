//! `SQLite` implementation of the `CountryRepository` trait.

use async_trait::async_trait;
use sqlx::SqlitePool;

use schoolatlas_core::{Country, CountryRepository, RepositoryError};

use super::row_mappers::{
    COUNTRY_SELECT_COLUMNS, format_datetime, like_pattern, row_to_country, storage_error,
};

/// `SQLite` implementation of the `CountryRepository` trait.
pub struct SqliteCountryRepository {
    pool: SqlitePool,
}

impl SqliteCountryRepository {
    /// Create a new `SQLite` country repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CountryRepository for SqliteCountryRepository {
    async fn list(&self) -> Result<Vec<Country>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {COUNTRY_SELECT_COLUMNS} FROM countries ORDER BY name COLLATE NOCASE, id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        rows.iter().map(row_to_country).collect()
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Country>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {COUNTRY_SELECT_COLUMNS} FROM countries WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        row.as_ref().map(row_to_country).transpose()
    }

    async fn search(&self, query: &str) -> Result<Vec<Country>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {COUNTRY_SELECT_COLUMNS} FROM countries \
             WHERE name LIKE ? ESCAPE '\\' \
             ORDER BY name COLLATE NOCASE, id"
        ))
        .bind(like_pattern(query))
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        rows.iter().map(row_to_country).collect()
    }

    async fn upsert_many(&self, countries: &[Country]) -> Result<usize, RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(storage_error)?;

        for country in countries {
            sqlx::query(
                r#"
                INSERT INTO countries (id, name, code, flag_url, total_schools, last_updated)
                VALUES (?, ?, ?, ?, ?, ?)
                ON CONFLICT(id) DO UPDATE SET
                    name = excluded.name,
                    code = excluded.code,
                    flag_url = excluded.flag_url,
                    total_schools = excluded.total_schools,
                    last_updated = excluded.last_updated
                "#,
            )
            .bind(&country.id)
            .bind(&country.name)
            .bind(&country.code)
            .bind(&country.flag_url)
            .bind(i64::from(country.total_schools))
            .bind(format_datetime(&country.last_updated))
            .execute(&mut *tx)
            .await
            .map_err(storage_error)?;
        }

        tx.commit()
            .await
            .map_err(storage_error)?;

        Ok(countries.len())
    }

    async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM countries WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("Country with id {id}")));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup::setup_test_database;
    use chrono::{TimeZone, Utc};

    fn country(id: &str, name: &str, total: u32) -> Country {
        Country {
            id: id.to_string(),
            name: name.to_string(),
            code: id.to_uppercase(),
            flag_url: format!("https://flags.example/{id}.png"),
            total_schools: total,
            last_updated: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    async fn repo() -> SqliteCountryRepository {
        SqliteCountryRepository::new(setup_test_database().await.unwrap())
    }

    #[tokio::test]
    async fn test_upsert_and_list_sorted_by_name() {
        let repo = repo().await;
        let written = repo
            .upsert_many(&[country("ng", "Nigeria", 50), country("gh", "Ghana", 10)])
            .await
            .unwrap();
        assert_eq!(written, 2);

        let all = repo.list().await.unwrap();
        let names: Vec<&str> = all.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Ghana", "Nigeria"]);
        assert_eq!(all[0], country("gh", "Ghana", 10));
    }

    #[tokio::test]
    async fn test_upsert_is_idempotent() {
        let repo = repo().await;
        let batch = [country("ke", "Kenya", 30)];
        repo.upsert_many(&batch).await.unwrap();
        repo.upsert_many(&batch).await.unwrap();
        assert_eq!(repo.list().await.unwrap(), batch.to_vec());

        repo.upsert_many(&[country("ke", "Kenya", 31)]).await.unwrap();
        let stored = repo.get_by_id("ke").await.unwrap().unwrap();
        assert_eq!(stored.total_schools, 31);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_substring() {
        let repo = repo().await;
        repo.upsert_many(&[
            country("za", "South Africa", 10),
            country("ss", "South Sudan", 2),
            country("so", "Somalia", 3),
        ])
        .await
        .unwrap();

        let found = repo.search("SOUTH").await.unwrap();
        assert_eq!(found.len(), 2);
        assert!(repo.search("100%").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let repo = repo().await;
        assert!(repo.get_by_id("zz").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let repo = repo().await;
        repo.upsert_many(&[country("ke", "Kenya", 30)]).await.unwrap();
        repo.delete("ke").await.unwrap();
        assert!(matches!(
            repo.delete("ke").await,
            Err(RepositoryError::NotFound(_))
        ));
    }
}
