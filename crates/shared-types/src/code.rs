//! # Code Parser
//!
//! Turns raw scanned text into the `(reference, serial)` natural key.
//!
//! A valid code is exactly two non-empty parts separated by `|`, for example
//! `OG971390|202630010002`. Surrounding whitespace on either part is ignored;
//! case is preserved.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::CodeError;

/// Separator between reference and serial.
pub const CODE_SEPARATOR: char = '|';

/// Natural key of a unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitKey {
    /// Product reference (model number).
    pub reference: String,
    /// Serial number of the physical unit.
    pub serial: String,
}

impl UnitKey {
    /// Build a key from already-validated parts.
    pub fn new(reference: impl Into<String>, serial: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            serial: serial.into(),
        }
    }
}

impl fmt::Display for UnitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.reference, CODE_SEPARATOR, self.serial)
    }
}

/// Parse a scanned code into its natural key.
pub fn parse_code(raw: &str) -> Result<UnitKey, CodeError> {
    let parts: Vec<&str> = raw.split(CODE_SEPARATOR).collect();

    match parts.as_slice() {
        [_] => Err(CodeError::MissingSeparator { raw: raw.to_string() }),
        [reference, serial] => {
            let reference = reference.trim();
            let serial = serial.trim();
            if reference.is_empty() {
                return Err(CodeError::EmptyPart {
                    raw: raw.to_string(),
                    field: "reference",
                });
            }
            if serial.is_empty() {
                return Err(CodeError::EmptyPart {
                    raw: raw.to_string(),
                    field: "serial",
                });
            }
            Ok(UnitKey::new(reference, serial))
        }
        _ => Err(CodeError::TooManyParts {
            raw: raw.to_string(),
            parts: parts.len(),
        }),
    }
}
