//! Repository for the `races` table and its abilities and automatic skills.

use sqlx::types::Json;
use sqlx::PgPool;
use t20_core::types::DbId;

use crate::models::ability::AbilityOwner;
use crate::models::race::{CreateRace, Race, RaceWithDetails, UpdateRace};
use crate::repositories::{replace_links_inner, AbilityRepo, CharacterSkillRepo, SkillRepo};

const COLUMNS: &str = "id, name, attribute_bonuses, attribute_penalty, size, speed, description, \
    created_at, updated_at";

pub struct RaceRepo;

impl RaceRepo {
    /// Insert a race with its abilities and automatic skills in one transaction.
    pub async fn create(pool: &PgPool, input: &CreateRace) -> Result<Race, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO races (name, attribute_bonuses, attribute_penalty, size, speed, description)
             VALUES ($1, $2, $3, COALESCE($4, 'Médio'), COALESCE($5, 9), $6)
             RETURNING {COLUMNS}"
        );
        let race = sqlx::query_as::<_, Race>(&query)
            .bind(&input.name)
            .bind(Json(&input.attribute_bonuses))
            .bind(input.attribute_penalty.as_ref().map(Json))
            .bind(&input.size)
            .bind(input.speed)
            .bind(&input.description)
            .fetch_one(&mut *tx)
            .await?;

        AbilityRepo::replace_inner(&mut tx, AbilityOwner::Race, race.id, &input.abilities).await?;
        Self::set_skills_inner(&mut tx, race.id, &input.skill_ids).await?;

        tx.commit().await?;
        Ok(race)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Race>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM races WHERE id = $1");
        sqlx::query_as::<_, Race>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_id_with_details(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<RaceWithDetails>, sqlx::Error> {
        match Self::find_by_id(pool, id).await? {
            Some(race) => Ok(Some(Self::with_details(pool, race).await?)),
            None => Ok(None),
        }
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Race>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM races ORDER BY name ASC");
        sqlx::query_as::<_, Race>(&query).fetch_all(pool).await
    }

    /// List every race with its abilities and automatic skills.
    pub async fn list_with_details(pool: &PgPool) -> Result<Vec<RaceWithDetails>, sqlx::Error> {
        let races = Self::list(pool).await?;
        let mut result = Vec::with_capacity(races.len());
        for race in races {
            result.push(Self::with_details(pool, race).await?);
        }
        Ok(result)
    }

    /// Update a race. Present ability and skill lists replace the stored ones;
    /// a new skill list also drops character choices it now grants.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateRace,
    ) -> Result<Option<Race>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE races SET
                name = COALESCE($2, name),
                attribute_bonuses = COALESCE($3, attribute_bonuses),
                attribute_penalty = COALESCE($4, attribute_penalty),
                size = COALESCE($5, size),
                speed = COALESCE($6, speed),
                description = COALESCE($7, description)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let race = sqlx::query_as::<_, Race>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.attribute_bonuses.as_ref().map(Json))
            .bind(input.attribute_penalty.as_ref().map(Json))
            .bind(&input.size)
            .bind(input.speed)
            .bind(&input.description)
            .fetch_optional(&mut *tx)
            .await?;

        if let Some(ref race) = race {
            if let Some(ref abilities) = input.abilities {
                AbilityRepo::replace_inner(&mut tx, AbilityOwner::Race, race.id, abilities).await?;
            }
            if let Some(ref skill_ids) = input.skill_ids {
                Self::set_skills_inner(&mut tx, race.id, skill_ids).await?;
                CharacterSkillRepo::resync_for_owner_inner(&mut tx, AbilityOwner::Race, race.id)
                    .await?;
            }
        }

        tx.commit().await?;
        Ok(race)
    }

    /// Delete a race. Fails with a foreign-key violation while characters use it.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM races WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn with_details(pool: &PgPool, race: Race) -> Result<RaceWithDetails, sqlx::Error> {
        let abilities = AbilityRepo::list_for_owner(pool, AbilityOwner::Race, race.id).await?;
        let skills = SkillRepo::list_for_race(pool, race.id).await?;
        Ok(RaceWithDetails {
            race,
            abilities,
            skills,
        })
    }

    async fn set_skills_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        race_id: DbId,
        skill_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        replace_links_inner(tx, "race_skills", "race_id", "skill_id", race_id, skill_ids).await
    }
}
