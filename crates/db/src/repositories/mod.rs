//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Multi-row writes run in a
//! single transaction and expose a `*_inner` helper taking the transaction.

pub mod ability_repo;
pub mod character_power_repo;
pub mod character_repo;
pub mod character_skill_repo;
pub mod class_repo;
pub mod deity_repo;
pub mod origin_repo;
pub mod power_repo;
pub mod race_repo;
pub mod skill_repo;

pub use ability_repo::AbilityRepo;
pub use character_power_repo::CharacterPowerRepo;
pub use character_repo::CharacterRepo;
pub use character_skill_repo::CharacterSkillRepo;
pub use class_repo::ClassRepo;
pub use deity_repo::DeityRepo;
pub use origin_repo::OriginRepo;
pub use power_repo::PowerRepo;
pub use race_repo::RaceRepo;
pub use skill_repo::SkillRepo;

use t20_core::types::DbId;

/// Replace the rows of a two-column link table for one owner.
///
/// `table`, `owner_column` and `item_column` are compile-time constants of
/// the calling repository, never user input.
pub(crate) async fn replace_links_inner(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    table: &str,
    owner_column: &str,
    item_column: &str,
    owner_id: DbId,
    item_ids: &[DbId],
) -> Result<(), sqlx::Error> {
    sqlx::query(&format!("DELETE FROM {table} WHERE {owner_column} = $1"))
        .bind(owner_id)
        .execute(&mut **tx)
        .await?;

    let insert = format!(
        "INSERT INTO {table} ({owner_column}, {item_column}) VALUES ($1, $2) ON CONFLICT DO NOTHING"
    );
    for &item_id in item_ids {
        sqlx::query(&insert)
            .bind(owner_id)
            .bind(item_id)
            .execute(&mut **tx)
            .await?;
    }

    Ok(())
}
