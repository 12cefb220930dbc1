//! Repository for the `origins` table and its abilities, automatic skills and
//! associated powers.

use sqlx::PgPool;
use t20_core::types::DbId;

use crate::models::ability::AbilityOwner;
use crate::models::origin::{CreateOrigin, Origin, OriginWithDetails, UpdateOrigin};
use crate::repositories::{
    replace_links_inner, AbilityRepo, CharacterSkillRepo, PowerRepo, SkillRepo,
};

const COLUMNS: &str = "id, name, description, created_at, updated_at";

pub struct OriginRepo;

impl OriginRepo {
    pub async fn create(pool: &PgPool, input: &CreateOrigin) -> Result<Origin, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO origins (name, description) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        let origin = sqlx::query_as::<_, Origin>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(&mut *tx)
            .await?;

        AbilityRepo::replace_inner(&mut tx, AbilityOwner::Origin, origin.id, &input.abilities)
            .await?;
        replace_links_inner(
            &mut tx,
            "origin_skills",
            "origin_id",
            "skill_id",
            origin.id,
            &input.skill_ids,
        )
        .await?;
        replace_links_inner(
            &mut tx,
            "origin_powers",
            "origin_id",
            "power_id",
            origin.id,
            &input.power_ids,
        )
        .await?;

        tx.commit().await?;
        Ok(origin)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Origin>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM origins WHERE id = $1");
        sqlx::query_as::<_, Origin>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_id_with_details(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<OriginWithDetails>, sqlx::Error> {
        let Some(origin) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let abilities = AbilityRepo::list_for_owner(pool, AbilityOwner::Origin, origin.id).await?;
        let skills = SkillRepo::list_for_origin(pool, origin.id).await?;
        let powers = PowerRepo::list_for_origin(pool, origin.id).await?;
        Ok(Some(OriginWithDetails {
            origin,
            abilities,
            skills,
            powers,
        }))
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Origin>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM origins ORDER BY name ASC");
        sqlx::query_as::<_, Origin>(&query).fetch_all(pool).await
    }

    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateOrigin,
    ) -> Result<Option<Origin>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE origins SET
                name = COALESCE($2, name),
                description = COALESCE($3, description)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let origin = sqlx::query_as::<_, Origin>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_optional(&mut *tx)
            .await?;

        if let Some(ref origin) = origin {
            if let Some(ref abilities) = input.abilities {
                AbilityRepo::replace_inner(&mut tx, AbilityOwner::Origin, origin.id, abilities)
                    .await?;
            }
            if let Some(ref skill_ids) = input.skill_ids {
                replace_links_inner(
                    &mut tx,
                    "origin_skills",
                    "origin_id",
                    "skill_id",
                    origin.id,
                    skill_ids,
                )
                .await?;
                CharacterSkillRepo::resync_for_owner_inner(
                    &mut tx,
                    AbilityOwner::Origin,
                    origin.id,
                )
                .await?;
            }
            if let Some(ref power_ids) = input.power_ids {
                replace_links_inner(
                    &mut tx,
                    "origin_powers",
                    "origin_id",
                    "power_id",
                    origin.id,
                    power_ids,
                )
                .await?;
            }
        }

        tx.commit().await?;
        Ok(origin)
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM origins WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
