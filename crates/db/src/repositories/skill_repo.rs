//! Repository for the `skills` catalog and the skill link tables of races,
//! classes and origins.

use std::collections::HashSet;

use sqlx::PgPool;
use t20_core::skills::SkillEntitlements;
use t20_core::types::DbId;

use crate::models::skill::{CreateSkill, Skill};

const COLUMNS: &str = "id, name, attribute, description, created_at, updated_at";

/// Skill columns qualified with the `s` alias for JOIN queries.
const JOIN_COLUMNS: &str =
    "s.id, s.name, s.attribute, s.description, s.created_at, s.updated_at";

pub struct SkillRepo;

impl SkillRepo {
    pub async fn create(pool: &PgPool, input: &CreateSkill) -> Result<Skill, sqlx::Error> {
        let query = format!(
            "INSERT INTO skills (name, attribute, description)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Skill>(&query)
            .bind(&input.name)
            .bind(&input.attribute)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Skill>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM skills WHERE id = $1");
        sqlx::query_as::<_, Skill>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the whole catalog, ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Skill>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM skills ORDER BY name ASC");
        sqlx::query_as::<_, Skill>(&query).fetch_all(pool).await
    }

    /// Delete a skill. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM skills WHERE id = $1")
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
        let rows = sqlx::query_scalar::<_, DbId>("SELECT id FROM skills WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().collect())
    }

    // -----------------------------------------------------------------------
    // Grants by reference entity
    // -----------------------------------------------------------------------

    /// Automatic skills of a race.
    pub async fn list_for_race(pool: &PgPool, race_id: DbId) -> Result<Vec<Skill>, sqlx::Error> {
        let query = format!(
            "SELECT {JOIN_COLUMNS} FROM skills s
             JOIN race_skills rs ON rs.skill_id = s.id
             WHERE rs.race_id = $1
             ORDER BY s.name"
        );
        sqlx::query_as::<_, Skill>(&query)
            .bind(race_id)
            .fetch_all(pool)
            .await
    }

    /// Automatic skills of an origin.
    pub async fn list_for_origin(
        pool: &PgPool,
        origin_id: DbId,
    ) -> Result<Vec<Skill>, sqlx::Error> {
        let query = format!(
            "SELECT {JOIN_COLUMNS} FROM skills s
             JOIN origin_skills os ON os.skill_id = s.id
             WHERE os.origin_id = $1
             ORDER BY s.name"
        );
        sqlx::query_as::<_, Skill>(&query)
            .bind(origin_id)
            .fetch_all(pool)
            .await
    }

    /// Selectable (`automatic = false`) or automatic skills of a class.
    pub async fn list_for_class(
        pool: &PgPool,
        class_id: DbId,
        automatic: bool,
    ) -> Result<Vec<Skill>, sqlx::Error> {
        let query = format!(
            "SELECT {JOIN_COLUMNS} FROM skills s
             JOIN class_skills cs ON cs.skill_id = s.id
             WHERE cs.class_id = $1 AND cs.is_automatic = $2
             ORDER BY s.name"
        );
        sqlx::query_as::<_, Skill>(&query)
            .bind(class_id)
            .bind(automatic)
            .fetch_all(pool)
            .await
    }

    /// Gather everything the entitlement check needs for one combination of
    /// race, class and origin.
    ///
    /// Returns `None` if the class does not exist.
    pub async fn load_entitlements(
        pool: &PgPool,
        race_id: DbId,
        class_id: DbId,
        origin_id: DbId,
    ) -> Result<Option<SkillEntitlements>, sqlx::Error> {
        let class: Option<(String, i32)> =
            sqlx::query_as("SELECT name, skill_choice_cap FROM classes WHERE id = $1")
                .bind(class_id)
                .fetch_optional(pool)
                .await?;
        let Some((class_name, cap)) = class else {
            return Ok(None);
        };

        let class_rows: Vec<(DbId, bool)> =
            sqlx::query_as("SELECT skill_id, is_automatic FROM class_skills WHERE class_id = $1")
                .bind(class_id)
                .fetch_all(pool)
                .await?;

        let race_automatic =
            sqlx::query_scalar::<_, DbId>("SELECT skill_id FROM race_skills WHERE race_id = $1")
                .bind(race_id)
                .fetch_all(pool)
                .await?;

        let origin_automatic = sqlx::query_scalar::<_, DbId>(
            "SELECT skill_id FROM origin_skills WHERE origin_id = $1",
        )
        .bind(origin_id)
        .fetch_all(pool)
        .await?;

        let (automatic, selectable): (Vec<_>, Vec<_>) =
            class_rows.into_iter().partition(|(_, is_automatic)| *is_automatic);

        Ok(Some(SkillEntitlements {
            class_name,
            class_choice_cap: usize::try_from(cap).unwrap_or(0),
            class_selectable: selectable.into_iter().map(|(id, _)| id).collect(),
            class_automatic: automatic.into_iter().map(|(id, _)| id).collect(),
            race_automatic: race_automatic.into_iter().collect(),
            origin_automatic: origin_automatic.into_iter().collect(),
        }))
    }
}
