//! `SQLite` implementation of the `ProvinceRepository` trait.

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::debug;

use schoolatlas_core::{Province, ProvinceRepository, RepositoryError};

use super::row_mappers::{PROVINCE_SELECT_COLUMNS, format_datetime, row_to_province, storage_error};

/// `SQLite` implementation of the `ProvinceRepository` trait.
pub struct SqliteProvinceRepository {
    pool: SqlitePool,
}

impl SqliteProvinceRepository {
    /// Create a new `SQLite` province repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProvinceRepository for SqliteProvinceRepository {
    async fn list_by_country(&self, country_id: &str) -> Result<Vec<Province>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {PROVINCE_SELECT_COLUMNS} FROM provinces \
             WHERE country_id = ? ORDER BY name COLLATE NOCASE, id"
        ))
        .bind(country_id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        rows.iter().map(row_to_province).collect()
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Province>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {PROVINCE_SELECT_COLUMNS} FROM provinces WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        row.as_ref().map(row_to_province).transpose()
    }

    async fn upsert_many(&self, provinces: &[Province]) -> Result<usize, RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(storage_error)?;

        // The WHERE EXISTS guard turns an orphan into a no-op instead of a
        // foreign key failure that would abort the whole batch.
        let mut stored = 0;
        for province in provinces {
            let result = sqlx::query(
                r#"
                INSERT INTO provinces
                    (id, country_id, name, province_type, total_schools, latitude, longitude, last_updated)
                SELECT ?, ?, ?, ?, ?, ?, ?, ?
                WHERE EXISTS (SELECT 1 FROM countries WHERE id = ?)
                ON CONFLICT(id) DO UPDATE SET
                    country_id = excluded.country_id,
                    name = excluded.name,
                    province_type = excluded.province_type,
                    total_schools = excluded.total_schools,
                    latitude = excluded.latitude,
                    longitude = excluded.longitude,
                    last_updated = excluded.last_updated
                "#,
            )
            .bind(&province.id)
            .bind(&province.country_id)
            .bind(&province.name)
            .bind(province.province_type.as_str())
            .bind(i64::from(province.total_schools))
            .bind(province.latitude)
            .bind(province.longitude)
            .bind(format_datetime(&province.last_updated))
            .bind(&province.country_id)
            .execute(&mut *tx)
            .await
            .map_err(storage_error)?;

            if result.rows_affected() == 0 {
                debug!(
                    province_id = %province.id,
                    country_id = %province.country_id,
                    "Skipping province of uncached country"
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

    async fn delete_by_country(&self, country_id: &str) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM provinces WHERE country_id = ?")
            .bind(country_id)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;

        Ok(result.rows_affected())
    }
}
