//! Handler for `GET /characters/{id}/sheet`.
//!
//! Assembles a [`CharacterSheet`] from the stored character and its
//! reference data, then hands it to the configured [`SheetRenderer`]
//! (`format=json` returns the view model instead).
//!
//! [`SheetRenderer`]: t20_core::sheet::SheetRenderer

use std::collections::HashMap;

use axum::extract::State;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use t20_core::attributes::Attribute;
use t20_core::powers::PowerSource;
use t20_core::sheet::{CharacterSheet, SheetAbilityRow, SheetOptions, SheetSkillRow};
use t20_core::stats::derive_stats;
use t20_core::types::DbId;
use t20_db::models::ability::{Ability, AbilityOwner};
use t20_db::models::character::Character;
use t20_db::models::power::CharacterPower;
use t20_db::repositories::{
    AbilityRepo, CharacterPowerRepo, CharacterSkillRepo, ClassRepo, DeityRepo, OriginRepo,
    RaceRepo, SkillRepo,
};

use super::character::{find_owned, progression};
use crate::error::{AppError, AppResult};
use crate::extract::{AppPath, AppQuery};
use crate::middleware::owner::Owner;
use crate::response::DataResponse;
use crate::state::AppState;

/// Source label for skills the character has without choosing them.
const AUTOMATIC_SOURCE: &str = "automatic";

#[derive(Debug, Default, Deserialize)]
pub struct SheetQuery {
    /// `single` (default) or `double`.
    pub layout: Option<String>,
    /// Comma-separated extra sections: `skills,inventory,notes,history`.
    pub sections: Option<String>,
    /// `json` for the view model; anything else renders the document.
    pub format: Option<String>,
}

impl SheetQuery {
    fn wants_json(&self) -> bool {
        self.format
            .as_deref()
            .is_some_and(|f| f.trim().eq_ignore_ascii_case("json"))
    }
}

/// GET /api/v1/characters/{id}/sheet
pub async fn render(
    State(state): State<AppState>,
    Owner(caller): Owner,
    AppPath(id): AppPath<DbId>,
    AppQuery(query): AppQuery<SheetQuery>,
) -> AppResult<Response> {
    let options = SheetOptions::parse(query.layout.as_deref(), query.sections.as_deref())?;
    let character = find_owned(&state, id, &caller).await?;
    let sheet = build_sheet(&state, &character).await?;

    if query.wants_json() {
        return Ok(Json(DataResponse { data: sheet }).into_response());
    }

    let renderer = &state.sheet_renderer;
    let bytes = renderer.render(&sheet, &options)?;
    let disposition = format!(
        "inline; filename=\"{}-sheet.{}\"",
        file_stem(&sheet.name),
        renderer.file_extension()
    );
    tracing::debug!(character_id = id, bytes = bytes.len(), "Character sheet rendered");

    Ok((
        [
            (CONTENT_TYPE, renderer.content_type().to_string()),
            (CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

/// ASCII-only, lowercase download name derived from the character name.
fn file_stem(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    if stem.is_empty() {
        "character".to_string()
    } else {
        stem
    }
}

fn missing(entity: &'static str, id: DbId) -> AppError {
    AppError::InternalError(format!("Character references missing {entity} {id}"))
}

async fn build_sheet(state: &AppState, character: &Character) -> AppResult<CharacterSheet> {
    let pool = &state.pool;
    let race = RaceRepo::find_by_id(pool, character.race_id)
        .await?
        .ok_or_else(|| missing("race", character.race_id))?;
    let class = ClassRepo::find_by_id(pool, character.class_id)
        .await?
        .ok_or_else(|| missing("class", character.class_id))?;
    let origin = OriginRepo::find_by_id(pool, character.origin_id)
        .await?
        .ok_or_else(|| missing("origin", character.origin_id))?;
    let deity = match character.deity_id {
        Some(deity_id) => DeityRepo::find_by_id(pool, deity_id).await?,
        None => None,
    };

    let attributes = character.attributes();
    let stats = derive_stats(
        &attributes,
        &progression(&class),
        &race.name,
        character.level,
        &state.stat_rules,
    )?;

    // Trained skills: chosen ones keep their source, granted ones are
    // labelled automatic.
    let mut trained: HashMap<DbId, String> = CharacterSkillRepo::list(pool, character.id)
        .await?
        .into_iter()
        .map(|s| (s.skill_id, s.source))
        .collect();
    let automatic = [
        SkillRepo::list_for_race(pool, race.id).await?,
        SkillRepo::list_for_origin(pool, origin.id).await?,
        SkillRepo::list_for_class(pool, class.id, true).await?,
    ];
    for skill in automatic.iter().flatten() {
        trained
            .entry(skill.id)
            .or_insert_with(|| AUTOMATIC_SOURCE.to_string());
    }

    let skills = SkillRepo::list(pool)
        .await?
        .into_iter()
        .map(|skill| {
            let source = trained.remove(&skill.id);
            SheetSkillRow {
                attribute: skill.attribute.parse::<Attribute>().ok(),
                name: skill.name,
                trained: source.is_some(),
                source,
            }
        })
        .collect();

    let class_powers =
        power_names(CharacterPowerRepo::list(pool, character.id, PowerSource::Class).await?);
    let deity_powers =
        power_names(CharacterPowerRepo::list(pool, character.id, PowerSource::Deity).await?);

    let mut abilities = Vec::new();
    let mut owners = vec![
        (AbilityOwner::Race, race.id, race.name.clone()),
        (AbilityOwner::Class, class.id, class.name.clone()),
        (AbilityOwner::Origin, origin.id, origin.name.clone()),
    ];
    if let Some(deity) = &deity {
        owners.push((AbilityOwner::Deity, deity.id, deity.name.clone()));
    }
    for (owner, owner_id, granted_by) in owners {
        let unlocked = AbilityRepo::list_unlocked(pool, owner, owner_id, character.level).await?;
        abilities.extend(unlocked.into_iter().map(|a| ability_row(a, &granted_by)));
    }

    Ok(CharacterSheet {
        name: character.name.clone(),
        level: character.level,
        race: race.name,
        class: class.name.clone(),
        origin: origin.name,
        deity: deity.map(|d| d.name),
        attributes: CharacterSheet::attribute_rows(&attributes),
        stats,
        skills,
        class_powers,
        deity_powers,
        abilities,
    })
}

fn power_names(powers: Vec<CharacterPower>) -> Vec<String> {
    powers.into_iter().map(|p| p.name).collect()
}

fn ability_row(ability: Ability, granted_by: &str) -> SheetAbilityRow {
    SheetAbilityRow {
        name: ability.name,
        granted_by: granted_by.to_string(),
        level: Some(ability.level),
        description: ability.description,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_stem_is_ascii_and_collapses_separators() {
        assert_eq!(file_stem("Thorin Escudo-de-Carvalho"), "thorin-escudo-de-carvalho");
        assert_eq!(file_stem("Ânia  d'Valkaria"), "nia-d-valkaria");
        assert_eq!(file_stem("???"), "character");
    }

    #[test]
    fn only_json_format_returns_the_view_model() {
        let query = |format: Option<&str>| SheetQuery {
            format: format.map(Into::into),
            ..Default::default()
        };
        assert!(query(Some("json")).wants_json());
        assert!(query(Some(" JSON ")).wants_json());
        assert!(!query(Some("txt")).wants_json());
        assert!(!query(None).wants_json());
    }

    #[test]
    fn missing_reference_is_internal() {
        assert!(matches!(
            missing("race", 3),
            AppError::InternalError(msg) if msg.contains("race 3")
        ));
    }
}
