pub mod ability;
pub mod character;
pub mod character_grants;
pub mod class;
pub mod deity;
pub mod origin;
pub mod power;
pub mod race;
pub mod sheet;
pub mod skill;
