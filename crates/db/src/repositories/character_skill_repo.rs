//! Repository for the `character_skills` table.

use sqlx::PgPool;
use t20_core::skills::SkillGrant;
use t20_core::types::DbId;

use crate::models::ability::AbilityOwner;
use crate::models::skill::CharacterSkill;

pub struct CharacterSkillRepo;

impl CharacterSkillRepo {
    /// Stored skill choices of a character, ordered by skill name.
    pub async fn list(
        pool: &PgPool,
        character_id: DbId,
    ) -> Result<Vec<CharacterSkill>, sqlx::Error> {
        sqlx::query_as::<_, CharacterSkill>(
            "SELECT cs.skill_id, s.name, s.attribute, cs.source, cs.created_at
             FROM character_skills cs
             JOIN skills s ON s.id = cs.skill_id
             WHERE cs.character_id = $1
             ORDER BY s.name",
        )
        .bind(character_id)
        .fetch_all(pool)
        .await
    }

    /// Replace every stored skill choice of a character.
    pub async fn replace(
        pool: &PgPool,
        character_id: DbId,
        grants: &[SkillGrant],
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        Self::replace_inner(&mut tx, character_id, grants).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Replace skill choices within an existing transaction.
    pub(crate) async fn replace_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        character_id: DbId,
        grants: &[SkillGrant],
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "DELETE FROM character_skills WHERE character_id = $1 AND source IN ('class', 'race')",
        )
        .bind(character_id)
        .execute(&mut **tx)
        .await?;

        for grant in grants {
            sqlx::query(
                "INSERT INTO character_skills (character_id, skill_id, source) VALUES ($1, $2, $3)",
            )
            .bind(character_id)
            .bind(grant.skill_id)
            .bind(grant.source.as_str())
            .execute(&mut **tx)
            .await?;
        }

        Ok(())
    }

    /// Largest number of stored choices any character of a class holds
    /// among `selectable`. Zero when no character has such a choice.
    pub async fn max_choices_within(
        pool: &PgPool,
        class_id: DbId,
        selectable: &[DbId],
    ) -> Result<i64, sqlx::Error> {
        let (max,): (Option<i64>,) = sqlx::query_as(
            "SELECT MAX(n) FROM (
                SELECT COUNT(*) AS n
                FROM character_skills cs
                JOIN characters c ON c.id = cs.character_id
                WHERE c.class_id = $1 AND cs.skill_id = ANY($2)
                GROUP BY cs.character_id
             ) per_character",
        )
        .bind(class_id)
        .bind(selectable)
        .fetch_one(pool)
        .await?;
        Ok(max.unwrap_or(0))
    }

    /// Bring the stored choices of every character using a race, class or
    /// origin back in line with its current skill sets.
    ///
    /// Choices that are now automatic are deleted; the rest are re-tagged
    /// `class` when the character's class offers them and `race` otherwise.
    /// Deities grant no skills, so `AbilityOwner::Deity` is a no-op.
    pub(crate) async fn resync_for_owner_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        owner: AbilityOwner,
        owner_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        if owner == AbilityOwner::Deity {
            return Ok(0);
        }
        let column = owner.owner_column();

        let dropped = sqlx::query(&format!(
            "DELETE FROM character_skills cs
             USING characters c
             WHERE cs.character_id = c.id
               AND c.{column} = $1
               AND (
                   EXISTS (SELECT 1 FROM race_skills rs
                           WHERE rs.race_id = c.race_id AND rs.skill_id = cs.skill_id)
                OR EXISTS (SELECT 1 FROM origin_skills os
                           WHERE os.origin_id = c.origin_id AND os.skill_id = cs.skill_id)
                OR EXISTS (SELECT 1 FROM class_skills k
                           WHERE k.class_id = c.class_id AND k.is_automatic
                             AND k.skill_id = cs.skill_id)
               )"
        ))
        .bind(owner_id)
        .execute(&mut **tx)
        .await?
        .rows_affected();

        sqlx::query(&format!(
            "UPDATE character_skills cs
             SET source = tagged.source
             FROM (
                SELECT cs2.character_id, cs2.skill_id,
                       CASE WHEN EXISTS (
                           SELECT 1 FROM class_skills k
                           WHERE k.class_id = c.class_id AND NOT k.is_automatic
                             AND k.skill_id = cs2.skill_id
                       ) THEN 'class' ELSE 'race' END AS source
                FROM character_skills cs2
                JOIN characters c ON c.id = cs2.character_id
                WHERE c.{column} = $1
             ) tagged
             WHERE cs.character_id = tagged.character_id
               AND cs.skill_id = tagged.skill_id
               AND cs.source <> tagged.source"
        ))
        .bind(owner_id)
        .execute(&mut **tx)
        .await?;

        Ok(dropped)
    }
}
