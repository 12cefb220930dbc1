//! Background tasks.
//!
//! Tasks here are detached with `tokio::spawn`; their outcome is logged and
//! never reaches the request that triggered them.

pub mod session_reassociation;
