//! Repository for the `classes` table and its abilities and skill sets.

use sqlx::PgPool;
use t20_core::types::DbId;

use crate::models::ability::AbilityOwner;
use crate::models::class::{
    Class, ClassSkills, ClassWithDetails, CreateClass, UpdateClass, UpdateClassStats,
};
use crate::repositories::{AbilityRepo, CharacterSkillRepo, SkillRepo};

const COLUMNS: &str = "id, name, hp_per_level, mp_per_level, primary_attribute, \
    skill_choice_cap, description, created_at, updated_at";

/// Skill choice cap applied when a class is created without one.
pub const DEFAULT_SKILL_CHOICE_CAP: i32 = 2;

pub struct ClassRepo;

impl ClassRepo {
    /// Insert a class with its abilities and skill sets in one transaction.
    pub async fn create(pool: &PgPool, input: &CreateClass) -> Result<Class, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO classes
                (name, hp_per_level, mp_per_level, primary_attribute, skill_choice_cap, description)
             VALUES ($1, $2, $3, $4, COALESCE($5, {DEFAULT_SKILL_CHOICE_CAP}), $6)
             RETURNING {COLUMNS}"
        );
        let class = sqlx::query_as::<_, Class>(&query)
            .bind(&input.name)
            .bind(input.hp_per_level)
            .bind(input.mp_per_level)
            .bind(&input.primary_attribute)
            .bind(input.skill_choice_cap)
            .bind(&input.description)
            .fetch_one(&mut *tx)
            .await?;

        AbilityRepo::replace_inner(&mut tx, AbilityOwner::Class, class.id, &input.abilities)
            .await?;
        Self::set_skills_inner(
            &mut tx,
            class.id,
            &input.selectable_skill_ids,
            &input.automatic_skill_ids,
        )
        .await?;

        tx.commit().await?;
        Ok(class)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Class>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM classes WHERE id = $1");
        sqlx::query_as::<_, Class>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_id_with_details(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ClassWithDetails>, sqlx::Error> {
        let Some(class) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let abilities = AbilityRepo::list_for_owner(pool, AbilityOwner::Class, class.id).await?;
        let selectable_skills = SkillRepo::list_for_class(pool, class.id, false).await?;
        let automatic_skills = SkillRepo::list_for_class(pool, class.id, true).await?;
        Ok(Some(ClassWithDetails {
            class,
            abilities,
            selectable_skills,
            automatic_skills,
        }))
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Class>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM classes ORDER BY name ASC");
        sqlx::query_as::<_, Class>(&query).fetch_all(pool).await
    }

    /// Update a class. Only non-`None` fields are applied; skill sets are
    /// replaced together when either list is present, after which the stored
    /// choices of the class's characters are re-synced.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateClass,
    ) -> Result<Option<Class>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE classes SET
                name = COALESCE($2, name),
                hp_per_level = COALESCE($3, hp_per_level),
                mp_per_level = COALESCE($4, mp_per_level),
                primary_attribute = COALESCE($5, primary_attribute),
                skill_choice_cap = COALESCE($6, skill_choice_cap),
                description = COALESCE($7, description)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let class = sqlx::query_as::<_, Class>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.hp_per_level)
            .bind(input.mp_per_level)
            .bind(&input.primary_attribute)
            .bind(input.skill_choice_cap)
            .bind(&input.description)
            .fetch_optional(&mut *tx)
            .await?;

        if let Some(ref class) = class {
            if let Some(ref abilities) = input.abilities {
                AbilityRepo::replace_inner(&mut tx, AbilityOwner::Class, class.id, abilities)
                    .await?;
            }
            if input.replaces_skills() {
                Self::set_skills_inner(
                    &mut tx,
                    class.id,
                    input.selectable_skill_ids.as_deref().unwrap_or_default(),
                    input.automatic_skill_ids.as_deref().unwrap_or_default(),
                )
                .await?;
                let dropped = CharacterSkillRepo::resync_for_owner_inner(
                    &mut tx,
                    AbilityOwner::Class,
                    class.id,
                )
                .await?;
                if dropped > 0 {
                    tracing::info!(
                        class_id = class.id,
                        dropped,
                        "Dropped character skill choices now granted automatically"
                    );
                }
            }
        }

        tx.commit().await?;
        Ok(class)
    }

    /// Update only the per-level hit and mana points.
    pub async fn update_stats(
        pool: &PgPool,
        id: DbId,
        input: &UpdateClassStats,
    ) -> Result<Option<Class>, sqlx::Error> {
        let query = format!(
            "UPDATE classes SET hp_per_level = $2, mp_per_level = $3
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Class>(&query)
            .bind(id)
            .bind(input.hp_per_level)
            .bind(input.mp_per_level)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM classes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Cap, selectable and automatic skills of a class.
    pub async fn skills(pool: &PgPool, id: DbId) -> Result<Option<ClassSkills>, sqlx::Error> {
        let Some(class) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        Ok(Some(ClassSkills {
            class_id: class.id,
            skill_choice_cap: class.skill_choice_cap,
            selectable: SkillRepo::list_for_class(pool, class.id, false).await?,
            automatic: SkillRepo::list_for_class(pool, class.id, true).await?,
        }))
    }

    /// Replace both skill sets within an existing transaction.
    async fn set_skills_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        class_id: DbId,
        selectable: &[DbId],
        automatic: &[DbId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM class_skills WHERE class_id = $1")
            .bind(class_id)
            .execute(&mut **tx)
            .await?;

        let sets = [(selectable, false), (automatic, true)];
        for (skill_ids, is_automatic) in sets {
            for &skill_id in skill_ids {
                sqlx::query(
                    "INSERT INTO class_skills (class_id, skill_id, is_automatic)
                     VALUES ($1, $2, $3)
                     ON CONFLICT DO NOTHING",
                )
                .bind(class_id)
                .bind(skill_id)
                .bind(is_automatic)
                .execute(&mut **tx)
                .await?;
            }
        }

        Ok(())
    }
}
