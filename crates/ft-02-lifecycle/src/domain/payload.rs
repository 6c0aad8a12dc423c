//! # Transition Payloads
//!
//! Stage-specific data collected by the caller before a transition can be
//! applied, and the validation that decides whether it is complete.

use serde::{Deserialize, Serialize};

/// Data supplied alongside a scan.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransitionPayload {
    /// Plain scan.
    #[default]
    None,
    /// Fields for DISPATCHED → INSTALLED.
    Install(InstallData),
    /// Fields for INSTALLED → UNINSTALLED.
    Uninstall(UninstallData),
}

/// Installation fields.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallData {
    /// Vehicle plate.
    pub plate: String,
    /// Odometer at installation.
    pub odometer: String,
    /// Person who fitted the unit.
    pub installer_name: String,
}

/// Removal fields.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UninstallData {
    /// Odometer at removal.
    pub odometer: String,
}

/// Which payload the caller must collect, and which fields were missing or
/// invalid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RequiredData {
    /// Installation fields are needed.
    InstallData {
        /// Offending field names
        missing: Vec<&'static str>,
    },
    /// Removal fields are needed.
    UninstallData {
        /// Offending field names
        missing: Vec<&'static str>,
    },
}

/// Installation fields after validation (trimmed).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidInstall {
    /// Vehicle plate.
    pub plate: String,
    /// Odometer at installation.
    pub odometer: String,
    /// Person who fitted the unit.
    pub installer_name: String,
}

/// Whether `raw` is a non-negative whole number of kilometres.
///
/// Only plain digits are accepted; `u64::from_str` alone would let `+7` in.
pub fn is_valid_odometer(raw: &str) -> bool {
    let raw = raw.trim();
    !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) && raw.parse::<u64>().is_ok()
}

/// Validate the payload for DISPATCHED → INSTALLED.
pub fn validate_install(
    payload: &TransitionPayload,
    min_installer_len: usize,
) -> Result<ValidInstall, RequiredData> {
    let data = match payload {
        TransitionPayload::Install(data) => data,
        _ => {
            return Err(RequiredData::InstallData {
                missing: vec!["plate", "odometer", "installer_name"],
            })
        }
    };

    let mut missing = Vec::new();
    if data.plate.trim().is_empty() {
        missing.push("plate");
    }
    if !is_valid_odometer(&data.odometer) {
        missing.push("odometer");
    }
    if data.installer_name.trim().chars().count() < min_installer_len {
        missing.push("installer_name");
    }

    if !missing.is_empty() {
        return Err(RequiredData::InstallData { missing });
    }
    Ok(ValidInstall {
        plate: data.plate.trim().to_string(),
        odometer: data.odometer.trim().to_string(),
        installer_name: data.installer_name.trim().to_string(),
    })
}

/// Validate the payload for INSTALLED → UNINSTALLED, returning the odometer.
pub fn validate_uninstall(payload: &TransitionPayload) -> Result<String, RequiredData> {
    match payload {
        TransitionPayload::Uninstall(data) if is_valid_odometer(&data.odometer) => {
            Ok(data.odometer.trim().to_string())
        }
        _ => Err(RequiredData::UninstallData {
            missing: vec!["odometer"],
        }),
    }
}
