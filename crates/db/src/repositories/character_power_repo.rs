//! Repository for the `character_powers` table.

use sqlx::PgPool;
use t20_core::powers::PowerSource;
use t20_core::types::DbId;

use crate::models::power::CharacterPower;

pub struct CharacterPowerRepo;

impl CharacterPowerRepo {
    /// Stored powers of one source (`class` or `deity`), ordered by name.
    pub async fn list(
        pool: &PgPool,
        character_id: DbId,
        source: PowerSource,
    ) -> Result<Vec<CharacterPower>, sqlx::Error> {
        sqlx::query_as::<_, CharacterPower>(
            "SELECT cp.power_id, p.name, p.category, cp.source, cp.level, cp.created_at
             FROM character_powers cp
             JOIN powers p ON p.id = cp.power_id
             WHERE cp.character_id = $1 AND cp.source = $2
             ORDER BY p.name",
        )
        .bind(character_id)
        .bind(source.as_str())
        .fetch_all(pool)
        .await
    }

    /// Replace all powers of one source, stamping each row with `level`.
    ///
    /// An empty `power_ids` clears the source.
    pub async fn replace(
        pool: &PgPool,
        character_id: DbId,
        source: PowerSource,
        power_ids: &[DbId],
        level: i32,
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        Self::replace_inner(&mut tx, character_id, source, power_ids, level).await?;
        tx.commit().await?;
        Ok(())
    }

    pub(crate) async fn replace_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        character_id: DbId,
        source: PowerSource,
        power_ids: &[DbId],
        level: i32,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM character_powers WHERE character_id = $1 AND source = $2")
            .bind(character_id)
            .bind(source.as_str())
            .execute(&mut **tx)
            .await?;

        for &power_id in power_ids {
            sqlx::query(
                "INSERT INTO character_powers (character_id, power_id, source, level)
                 VALUES ($1, $2, $3, $4)
                 ON CONFLICT DO NOTHING",
            )
            .bind(character_id)
            .bind(power_id)
            .bind(source.as_str())
            .bind(level)
            .execute(&mut **tx)
            .await?;
        }

        Ok(())
    }
}
