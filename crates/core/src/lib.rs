//! Tormenta20 rules engine.
//!
//! Pure domain logic with no I/O: attribute bounds, derived stat
//! computation, skill and power entitlement, soft ownership and the
//! character sheet view model.

pub mod attributes;
pub mod error;
pub mod ownership;
pub mod powers;
pub mod racial_choices;
pub mod sheet;
pub mod skills;
pub mod stats;
pub mod types;
