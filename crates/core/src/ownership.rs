//! Soft ownership of characters.
//!
//! A character is stamped at creation with the caller's session token and
//! network address. A later caller may see it when either value matches.
//! Addresses are taken from forwarding headers and can be spoofed; this is
//! a convenience scoping, not authentication.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// How a character's owner stamp was formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreatedByType {
    Session,
    Address,
    Hybrid,
}

impl CreatedByType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Session => "session",
            Self::Address => "address",
            Self::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for CreatedByType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CreatedByType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "session" => Ok(Self::Session),
            "address" => Ok(Self::Address),
            "hybrid" => Ok(Self::Hybrid),
            other => Err(CoreError::Validation(format!("Unknown owner stamp type '{other}'"))),
        }
    }
}

/// Identity presented by the current request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallerIdentity {
    pub session_token: Option<String>,
    pub network_address: Option<String>,
}

impl CallerIdentity {
    pub fn new(session_token: Option<String>, network_address: Option<String>) -> Self {
        Self {
            session_token: session_token.filter(|s| !s.is_empty()),
            network_address: network_address.filter(|s| !s.is_empty()),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.session_token.is_none() && self.network_address.is_none()
    }

    /// The stamp a character created by this caller receives.
    ///
    /// Returns `None` for an anonymous caller.
    pub fn stamp(&self) -> Option<OwnerStamp> {
        let created_by = match (&self.session_token, &self.network_address) {
            (Some(_), Some(_)) => CreatedByType::Hybrid,
            (Some(_), None) => CreatedByType::Session,
            (None, Some(_)) => CreatedByType::Address,
            (None, None) => return None,
        };
        Some(OwnerStamp {
            session_token: self.session_token.clone(),
            network_address: self.network_address.clone(),
            created_by,
        })
    }
}

/// Owner stamp persisted on a character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerStamp {
    pub session_token: Option<String>,
    pub network_address: Option<String>,
    pub created_by: CreatedByType,
}

impl OwnerStamp {
    /// Session tokens match OR network addresses match. Absent values never
    /// match each other.
    pub fn is_owned_by(&self, caller: &CallerIdentity) -> bool {
        let same = |a: &Option<String>, b: &Option<String>| matches!((a, b), (Some(x), Some(y)) if x == y);
        same(&self.session_token, &caller.session_token)
            || same(&self.network_address, &caller.network_address)
    }
}
