//! Repository for the `powers` catalog.

use std::collections::HashSet;

use sqlx::PgPool;
use t20_core::powers::PowerCategory;
use t20_core::types::DbId;

use crate::models::power::{CreatePower, Power};

const COLUMNS: &str = "id, name, description, category, prerequisites, created_at, updated_at";

const JOIN_COLUMNS: &str =
    "p.id, p.name, p.description, p.category, p.prerequisites, p.created_at, p.updated_at";

pub struct PowerRepo;

impl PowerRepo {
    pub async fn create(pool: &PgPool, input: &CreatePower) -> Result<Power, sqlx::Error> {
        let query = format!(
            "INSERT INTO powers (name, description, category, prerequisites)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Power>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.category)
            .bind(&input.prerequisites)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Power>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM powers WHERE id = $1");
        sqlx::query_as::<_, Power>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Power>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM powers ORDER BY name ASC");
        sqlx::query_as::<_, Power>(&query).fetch_all(pool).await
    }

    pub async fn list_by_category(
        pool: &PgPool,
        category: PowerCategory,
    ) -> Result<Vec<Power>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM powers WHERE category = $1 ORDER BY name ASC");
        sqlx::query_as::<_, Power>(&query)
            .bind(category.as_str())
            .fetch_all(pool)
            .await
    }

    /// Powers associated with an origin.
    pub async fn list_for_origin(
        pool: &PgPool,
        origin_id: DbId,
    ) -> Result<Vec<Power>, sqlx::Error> {
        let query = format!(
            "SELECT {JOIN_COLUMNS} FROM powers p
             JOIN origin_powers op ON op.power_id = p.id
             WHERE op.origin_id = $1
             ORDER BY p.name"
        );
        sqlx::query_as::<_, Power>(&query)
            .bind(origin_id)
            .fetch_all(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM powers WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Return the subset of `ids` present in the catalog.
    pub async fn find_existing_ids(
        pool: &PgPool,
        ids: &[DbId],
    ) -> Result<HashSet<DbId>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(HashSet::new());
        }
        let rows = sqlx::query_scalar::<_, DbId>("SELECT id FROM powers WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().collect())
    }
}
