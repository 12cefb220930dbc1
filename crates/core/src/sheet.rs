//! Printable character sheets.
//!
//! [`CharacterSheet`] is a flat view model assembled from a stored character
//! and its reference data. A [`SheetRenderer`] turns it into bytes; the
//! shipped [`TextSheetRenderer`] produces a paginated plain-text sheet.

use std::fmt::Write as _;
use std::str::FromStr;

use serde::Serialize;

use crate::attributes::{Attribute, Attributes};
use crate::error::CoreError;
use crate::stats::DerivedStats;

const SHEET_TITLE: &str = "CHARACTER SHEET - TORMENTA20";
const SHEET_WIDTH: usize = 64;
const PAGE_BREAK: char = '\u{0C}';
const BLANK_LINES_PER_SECTION: usize = 6;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetLayout {
    /// Core blocks plus only the requested sections.
    #[default]
    Single,
    /// Two pages with every section.
    Double,
}

impl FromStr for SheetLayout {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" => Ok(Self::Single),
            "double" => Ok(Self::Double),
            other => Err(CoreError::Validation(format!(
                "Unknown sheet layout '{other}', expected single or double"
            ))),
        }
    }
}

/// Optional blocks of a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetSection {
    Skills,
    Inventory,
    Notes,
    History,
}

impl SheetSection {
    pub const ALL: [SheetSection; 4] = [
        SheetSection::Skills,
        SheetSection::Inventory,
        SheetSection::Notes,
        SheetSection::History,
    ];
}

impl FromStr for SheetSection {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "skills" => Ok(Self::Skills),
            "inventory" => Ok(Self::Inventory),
            "notes" => Ok(Self::Notes),
            "history" => Ok(Self::History),
            other => Err(CoreError::Validation(format!("Unknown sheet section '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SheetOptions {
    pub layout: SheetLayout,
    /// Requested sections, in order. Ignored by the double layout.
    pub sections: Vec<SheetSection>,
}

impl SheetOptions {
    /// Parse query-string style options: `layout=double`, `sections=skills,notes`.
    pub fn parse(layout: Option<&str>, sections: Option<&str>) -> Result<Self, CoreError> {
        let layout = match layout.map(str::trim).filter(|s| !s.is_empty()) {
            Some(l) => l.parse()?,
            None => SheetLayout::default(),
        };

        let mut parsed = Vec::new();
        for name in sections.unwrap_or_default().split(',') {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            let section: SheetSection = name.parse()?;
            if !parsed.contains(&section) {
                parsed.push(section);
            }
        }

        Ok(Self {
            layout,
            sections: parsed,
        })
    }

    /// Sections to render after the core blocks, per page.
    fn pages(&self) -> Vec<Vec<SheetSection>> {
        match self.layout {
            SheetLayout::Single => vec![self.sections.clone()],
            SheetLayout::Double => vec![
                vec![SheetSection::Skills],
                vec![SheetSection::Inventory, SheetSection::Notes, SheetSection::History],
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// View model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetAttributeRow {
    pub attribute: Attribute,
    pub value: i32,
    pub modifier: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetSkillRow {
    pub name: String,
    pub attribute: Option<Attribute>,
    pub trained: bool,
    /// `class`, `race` or `automatic` for trained skills.
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetAbilityRow {
    pub name: String,
    /// Race, class, origin or deity name that grants it.
    pub granted_by: String,
    pub level: Option<i32>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharacterSheet {
    pub name: String,
    pub level: i32,
    pub race: String,
    pub class: String,
    pub origin: String,
    pub deity: Option<String>,
    pub attributes: Vec<SheetAttributeRow>,
    pub stats: DerivedStats,
    pub skills: Vec<SheetSkillRow>,
    pub class_powers: Vec<String>,
    pub deity_powers: Vec<String>,
    pub abilities: Vec<SheetAbilityRow>,
}

impl CharacterSheet {
    pub fn attribute_rows(attributes: &Attributes) -> Vec<SheetAttributeRow> {
        Attribute::ALL
            .into_iter()
            .map(|attribute| SheetAttributeRow {
                attribute,
                value: attributes.get(attribute),
                modifier: attributes.modifier(attribute),
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Renderers
// ---------------------------------------------------------------------------

/// Turns a sheet into a document.
pub trait SheetRenderer: Send + Sync {
    /// MIME type of the bytes produced by [`SheetRenderer::render`].
    fn content_type(&self) -> &'static str;

    /// File extension used in download names.
    fn file_extension(&self) -> &'static str;

    fn render(&self, sheet: &CharacterSheet, options: &SheetOptions) -> Result<Vec<u8>, CoreError>;
}

/// Plain-text renderer. Pages are separated by a form feed.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextSheetRenderer;

impl SheetRenderer for TextSheetRenderer {
    fn content_type(&self) -> &'static str {
        "text/plain; charset=utf-8"
    }

    fn file_extension(&self) -> &'static str {
        "txt"
    }

    fn render(&self, sheet: &CharacterSheet, options: &SheetOptions) -> Result<Vec<u8>, CoreError> {
        let mut out = String::new();
        for (page, sections) in options.pages().into_iter().enumerate() {
            if page == 0 {
                write_core_blocks(&mut out, sheet).map_err(fmt_error)?;
            } else {
                out.push(PAGE_BREAK);
            }
            for section in sections {
                write_section(&mut out, sheet, section).map_err(fmt_error)?;
            }
        }
        Ok(out.into_bytes())
    }
}

fn fmt_error(e: std::fmt::Error) -> CoreError {
    CoreError::Internal(format!("Failed to render sheet: {e}"))
}

fn heading(out: &mut String, title: &str) -> std::fmt::Result {
    writeln!(out)?;
    writeln!(out, "{title}")?;
    writeln!(out, "{}", "-".repeat(SHEET_WIDTH))
}

fn write_core_blocks(out: &mut String, sheet: &CharacterSheet) -> std::fmt::Result {
    writeln!(out, "{}", "=".repeat(SHEET_WIDTH))?;
    writeln!(out, "{SHEET_TITLE:^SHEET_WIDTH$}")?;
    writeln!(out, "{}", "=".repeat(SHEET_WIDTH))?;

    writeln!(out, "Name:   {:<24} Level:  {}", sheet.name, sheet.level)?;
    writeln!(out, "Race:   {:<24} Class:  {}", sheet.race, sheet.class)?;
    writeln!(
        out,
        "Origin: {:<24} Deity:  {}",
        sheet.origin,
        sheet.deity.as_deref().unwrap_or("-")
    )?;

    heading(out, "ATTRIBUTES")?;
    for row in &sheet.attributes {
        writeln!(
            out,
            "{:<6} {:>3}   ({:+})",
            row.attribute.abbreviation(),
            row.value,
            row.modifier
        )?;
    }

    heading(out, "COMBAT")?;
    writeln!(out, "Hit points:  {}", sheet.stats.hit_points)?;
    writeln!(out, "Mana points: {}", sheet.stats.mana_points)?;
    writeln!(out, "Defense:     {}", sheet.stats.defense)?;

    if !sheet.class_powers.is_empty() || !sheet.deity_powers.is_empty() {
        heading(out, "POWERS")?;
        for name in &sheet.class_powers {
            writeln!(out, "[class] {name}")?;
        }
        for name in &sheet.deity_powers {
            writeln!(out, "[deity] {name}")?;
        }
    }

    if !sheet.abilities.is_empty() {
        heading(out, "ABILITIES")?;
        for ability in &sheet.abilities {
            match ability.level {
                Some(level) => writeln!(out, "{} ({}, level {level})", ability.name, ability.granted_by)?,
                None => writeln!(out, "{} ({})", ability.name, ability.granted_by)?,
            }
        }
    }

    Ok(())
}

fn write_section(out: &mut String, sheet: &CharacterSheet, section: SheetSection) -> std::fmt::Result {
    match section {
        SheetSection::Skills => {
            heading(out, "SKILLS")?;
            for skill in &sheet.skills {
                let mark = if skill.trained { "[x]" } else { "[ ]" };
                let attribute = skill.attribute.map(Attribute::abbreviation).unwrap_or("-");
                write!(out, "{mark} {:<20} {:<5}", skill.name, attribute)?;
                match &skill.source {
                    Some(source) => writeln!(out, " {source}")?,
                    None => writeln!(out)?,
                }
            }
        }
        SheetSection::Inventory => blank_section(out, "INVENTORY")?,
        SheetSection::Notes => blank_section(out, "NOTES")?,
        SheetSection::History => blank_section(out, "HISTORY")?,
    }
    Ok(())
}

fn blank_section(out: &mut String, title: &str) -> std::fmt::Result {
    heading(out, title)?;
    for _ in 0..BLANK_LINES_PER_SECTION {
        writeln!(out, "{}", "_".repeat(SHEET_WIDTH))?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
