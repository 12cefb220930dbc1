//! Repository for the `characters` table.

use sqlx::PgPool;
use t20_core::ownership::{CallerIdentity, OwnerStamp};
use t20_core::powers::PowerSource;
use t20_core::types::DbId;

use crate::models::character::{Character, CharacterGrants, CharacterInput};
use crate::repositories::{CharacterPowerRepo, CharacterSkillRepo};

const COLUMNS: &str = "id, name, level, strength, agility, fortitude, intellect, wisdom, charisma, \
    race_id, class_id, origin_id, deity_id, racial_choices, session_token, network_address, \
    created_by_type, created_at, updated_at";

pub struct CharacterRepo;

impl CharacterRepo {
    /// Insert a character, its owner stamp and any grants in one transaction.
    ///
    /// Grants must already be validated; power rows are stamped with
    /// `input.level`.
    pub async fn create(
        pool: &PgPool,
        input: &CharacterInput,
        racial_choices: &serde_json::Value,
        stamp: &OwnerStamp,
        grants: CharacterGrants<'_>,
    ) -> Result<Character, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO characters
                (name, level, strength, agility, fortitude, intellect, wisdom, charisma,
                 race_id, class_id, origin_id, deity_id, racial_choices,
                 session_token, network_address, created_by_type)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
             RETURNING {COLUMNS}"
        );
        let attrs = &input.attributes;
        let character = sqlx::query_as::<_, Character>(&query)
            .bind(&input.name)
            .bind(input.level)
            .bind(attrs.strength)
            .bind(attrs.agility)
            .bind(attrs.fortitude)
            .bind(attrs.intellect)
            .bind(attrs.wisdom)
            .bind(attrs.charisma)
            .bind(input.race_id)
            .bind(input.class_id)
            .bind(input.origin_id)
            .bind(input.deity_id)
            .bind(racial_choices)
            .bind(&stamp.session_token)
            .bind(&stamp.network_address)
            .bind(stamp.created_by.as_str())
            .fetch_one(&mut *tx)
            .await?;

        Self::write_grants_inner(&mut tx, character.id, input.level, grants).await?;

        tx.commit().await?;
        Ok(character)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Character>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM characters WHERE id = $1");
        sqlx::query_as::<_, Character>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a character visible to `caller`.
    ///
    /// A character owned by someone else is reported as absent.
    pub async fn find_owned(
        pool: &PgPool,
        id: DbId,
        caller: &CallerIdentity,
    ) -> Result<Option<Character>, sqlx::Error> {
        let character = Self::find_by_id(pool, id).await?;
        Ok(character.filter(|c| c.owner_stamp().is_owned_by(caller)))
    }

    /// Characters whose session token or network address matches `caller`,
    /// newest first. Anonymous callers get an empty list.
    pub async fn list_owned(
        pool: &PgPool,
        caller: &CallerIdentity,
    ) -> Result<Vec<Character>, sqlx::Error> {
        if caller.is_anonymous() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {COLUMNS} FROM characters
             WHERE session_token = $1 OR network_address = $2
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Character>(&query)
            .bind(&caller.session_token)
            .bind(&caller.network_address)
            .fetch_all(pool)
            .await
    }

    /// Fully replace a character's fields and any submitted grant lists.
    ///
    /// The owner stamp is left untouched. Returns `None` if no row with the
    /// given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &CharacterInput,
        racial_choices: &serde_json::Value,
        grants: CharacterGrants<'_>,
    ) -> Result<Option<Character>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE characters SET
                name = $2, level = $3,
                strength = $4, agility = $5, fortitude = $6,
                intellect = $7, wisdom = $8, charisma = $9,
                race_id = $10, class_id = $11, origin_id = $12, deity_id = $13,
                racial_choices = $14
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let attrs = &input.attributes;
        let character = sqlx::query_as::<_, Character>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.level)
            .bind(attrs.strength)
            .bind(attrs.agility)
            .bind(attrs.fortitude)
            .bind(attrs.intellect)
            .bind(attrs.wisdom)
            .bind(attrs.charisma)
            .bind(input.race_id)
            .bind(input.class_id)
            .bind(input.origin_id)
            .bind(input.deity_id)
            .bind(racial_choices)
            .fetch_optional(&mut *tx)
            .await?;

        if let Some(ref character) = character {
            Self::write_grants_inner(&mut tx, character.id, input.level, grants).await?;
        }

        tx.commit().await?;
        Ok(character)
    }

    /// Delete a character and, by cascade, its grants.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM characters WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Point every character stamped with `network_address` at a new session
    /// token. Returns the number of rows updated.
    pub async fn reassociate_session(
        pool: &PgPool,
        network_address: &str,
        session_token: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE characters SET session_token = $1
             WHERE network_address = $2
               AND (session_token IS NULL OR session_token <> $1)",
        )
        .bind(session_token)
        .bind(network_address)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Fully replace the `racial_choices` document.
    pub async fn update_racial_choices(
        pool: &PgPool,
        id: DbId,
        racial_choices: &serde_json::Value,
    ) -> Result<Option<Character>, sqlx::Error> {
        let query = format!(
            "UPDATE characters SET racial_choices = $2
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Character>(&query)
            .bind(id)
            .bind(racial_choices)
            .fetch_optional(pool)
            .await
    }

    async fn write_grants_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        character_id: DbId,
        level: i32,
        grants: CharacterGrants<'_>,
    ) -> Result<(), sqlx::Error> {
        if let Some(skills) = grants.skills {
            CharacterSkillRepo::replace_inner(tx, character_id, skills).await?;
        }
        if let Some(power_ids) = grants.class_power_ids {
            CharacterPowerRepo::replace_inner(tx, character_id, PowerSource::Class, power_ids, level)
                .await?;
        }
        if let Some(power_ids) = grants.deity_power_ids {
            CharacterPowerRepo::replace_inner(tx, character_id, PowerSource::Deity, power_ids, level)
                .await?;
        }
        Ok(())
    }
}
