//! Repository for the `deities` table and its devotee abilities.

use sqlx::PgPool;
use t20_core::types::DbId;

use crate::models::ability::AbilityOwner;
use crate::models::deity::{CreateDeity, Deity, DeityWithDetails, UpdateDeity};
use crate::repositories::AbilityRepo;

const COLUMNS: &str = "id, name, description, domain, alignment, created_at, updated_at";

pub struct DeityRepo;

impl DeityRepo {
    pub async fn create(pool: &PgPool, input: &CreateDeity) -> Result<Deity, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO deities (name, description, domain, alignment)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let deity = sqlx::query_as::<_, Deity>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.domain)
            .bind(&input.alignment)
            .fetch_one(&mut *tx)
            .await?;

        AbilityRepo::replace_inner(&mut tx, AbilityOwner::Deity, deity.id, &input.abilities)
            .await?;

        tx.commit().await?;
        Ok(deity)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Deity>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM deities WHERE id = $1");
        sqlx::query_as::<_, Deity>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_id_with_details(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<DeityWithDetails>, sqlx::Error> {
        let Some(deity) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let abilities = AbilityRepo::list_for_owner(pool, AbilityOwner::Deity, deity.id).await?;
        Ok(Some(DeityWithDetails { deity, abilities }))
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Deity>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM deities ORDER BY name ASC");
        sqlx::query_as::<_, Deity>(&query).fetch_all(pool).await
    }

    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateDeity,
    ) -> Result<Option<Deity>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE deities SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                domain = COALESCE($4, domain),
                alignment = COALESCE($5, alignment)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let deity = sqlx::query_as::<_, Deity>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.domain)
            .bind(&input.alignment)
            .fetch_optional(&mut *tx)
            .await?;

        if let (Some(deity), Some(abilities)) = (&deity, &input.abilities) {
            AbilityRepo::replace_inner(&mut tx, AbilityOwner::Deity, deity.id, abilities).await?;
        }

        tx.commit().await?;
        Ok(deity)
    }

    /// Characters devoted to a deleted deity keep existing with no deity.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM deities WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
