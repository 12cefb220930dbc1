//! Row structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) where the resource is editable

pub mod ability;
pub mod character;
pub mod class;
pub mod deity;
pub mod origin;
pub mod power;
pub mod race;
pub mod skill;
