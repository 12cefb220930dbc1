//! Request middleware and the extractors that read what it stores.
//!
//! - [`owner::resolve_owner`] -- Resolves the caller's session and address.
//! - [`owner::Owner`] -- Extracts the resolved [`t20_core::ownership::CallerIdentity`].

pub mod owner;
