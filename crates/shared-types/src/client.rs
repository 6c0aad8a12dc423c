//! Client names.
//!
//! A client is identified by its trimmed name compared case-insensitively:
//! `"Acme "`, `"ACME"` and `"acme"` are the same client. The first spelling
//! registered is the one displayed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A non-empty, trimmed client name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClientName(String);

impl ClientName {
    /// Normalize raw input. Blank input yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Display spelling.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Identity key used for comparisons and indexing.
    pub fn key(&self) -> String {
        self.0.to_uppercase()
    }

    /// Case-insensitive comparison against raw text.
    pub fn matches(&self, raw: &str) -> bool {
        self.key() == raw.trim().to_uppercase()
    }
}

impl PartialEq for ClientName {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for ClientName {}

impl Hash for ClientName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for ClientName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ClientName {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| "client name must not be blank".to_string())
    }
}

impl From<ClientName> for String {
    fn from(value: ClientName) -> Self {
        value.0
    }
}
