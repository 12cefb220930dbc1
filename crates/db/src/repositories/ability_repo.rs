//! Repository for the `race_abilities`, `class_abilities`, `origin_abilities`
//! and `deity_abilities` tables.
//!
//! The four tables share one shape; [`AbilityOwner`] selects the table and
//! its owner column.

use sqlx::PgPool;
use t20_core::types::DbId;

use crate::models::ability::{Ability, AbilityOwner, CreateAbility};

fn columns(owner: AbilityOwner) -> String {
    format!(
        "id, {} AS owner_id, name, description, level, is_optional, created_at, updated_at",
        owner.owner_column()
    )
}

pub struct AbilityRepo;

impl AbilityRepo {
    /// All abilities of one owner, ordered by unlock level then name.
    pub async fn list_for_owner(
        pool: &PgPool,
        owner: AbilityOwner,
        owner_id: DbId,
    ) -> Result<Vec<Ability>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM {} WHERE {} = $1 ORDER BY level, name",
            columns(owner),
            owner.table(),
            owner.owner_column()
        );
        sqlx::query_as::<_, Ability>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Abilities of one owner unlocked at or below `level`.
    pub async fn list_unlocked(
        pool: &PgPool,
        owner: AbilityOwner,
        owner_id: DbId,
        level: i32,
    ) -> Result<Vec<Ability>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM {} WHERE {} = $1 AND level <= $2 ORDER BY level, name",
            columns(owner),
            owner.table(),
            owner.owner_column()
        );
        sqlx::query_as::<_, Ability>(&query)
            .bind(owner_id)
            .bind(level)
            .fetch_all(pool)
            .await
    }

    /// Replace all abilities of one owner within an existing transaction.
    pub(crate) async fn replace_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        owner: AbilityOwner,
        owner_id: DbId,
        abilities: &[CreateAbility],
    ) -> Result<(), sqlx::Error> {
        sqlx::query(&format!(
            "DELETE FROM {} WHERE {} = $1",
            owner.table(),
            owner.owner_column()
        ))
        .bind(owner_id)
        .execute(&mut **tx)
        .await?;

        let insert = format!(
            "INSERT INTO {} ({}, name, description, level, is_optional)
             VALUES ($1, $2, $3, COALESCE($4, 1), COALESCE($5, false))",
            owner.table(),
            owner.owner_column()
        );
        for ability in abilities {
            sqlx::query(&insert)
                .bind(owner_id)
                .bind(&ability.name)
                .bind(&ability.description)
                .bind(ability.level)
                .bind(ability.is_optional)
                .execute(&mut **tx)
                .await?;
        }

        Ok(())
    }
}
