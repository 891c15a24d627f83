#![forbid(unsafe_code)]

//! Tunable picker settings.
//!
//! Every field defaults to the behavior pages expect out of the box, so
//! `PickerSettings::default()` needs no configuration file. With the
//! `settings-file` feature the same struct loads from TOML or JSON:
//!
//! ```toml
//! # varpick.toml
//! reject_flash_ms = 300
//! hint_message = "Now tap the target zone to place it"
//! drag_effect = "move"
//! # mode_override = "touch"
//! ```
//!
//! ```rust,ignore
//! let settings = PickerSettings::from_toml_file("varpick.toml")?;
//! let settings = PickerSettings::from_json_str(json)?;
//! ```

use core::time::Duration;
#[cfg(feature = "settings-file")]
use std::path::{Path, PathBuf};

#[cfg(feature = "settings-file")]
use serde::{Deserialize, Serialize};
use varpick_core::{DropEffect, InteractionMode};

/// Default flash duration for rejected placements.
pub const DEFAULT_REJECT_FLASH_MS: u64 = 300;

/// Default instruction shown after a tap selection.
pub const DEFAULT_HINT_MESSAGE: &str = "Now tap the target zone to place it";

/// Picker settings.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "settings-file", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "settings-file", serde(default))]
pub struct PickerSettings {
    /// How long a rejecting zone keeps the `wrong` mark, in milliseconds.
    pub reject_flash_ms: u64,
    /// Text of the tap-mode hint.
    pub hint_message: String,
    /// `effectAllowed` for drag starts.
    pub drag_effect: DropEffect,
    /// Force a mode instead of detecting it from the environment.
    pub mode_override: Option<InteractionMode>,
}

impl Default for PickerSettings {
    fn default() -> Self {
        Self {
            reject_flash_ms: DEFAULT_REJECT_FLASH_MS,
            hint_message: DEFAULT_HINT_MESSAGE.to_owned(),
            drag_effect: DropEffect::Move,
            mode_override: None,
        }
    }
}

impl PickerSettings {
    /// Rejection flash as a duration.
    #[must_use]
    pub const fn reject_flash(&self) -> Duration {
        Duration::from_millis(self.reject_flash_ms)
    }

    /// Validate all settings are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the settings
    /// are valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.reject_flash_ms == 0 {
            errors.push("reject_flash_ms must be > 0".into());
        }
        if self.reject_flash_ms > 10_000 {
            errors.push(format!(
                "reject_flash_ms must be <= 10000, got {}",
                self.reject_flash_ms
            ));
        }
        if self.hint_message.trim().is_empty() {
            errors.push("hint_message must not be blank".into());
        }
        errors
    }

    /// Load from a TOML string.
    #[cfg(feature = "settings-file")]
    pub fn from_toml_str(s: &str) -> Result<Self, SettingsError> {
        toml::from_str::<Self>(s)
            .map_err(|e| SettingsError::Syntax {
                format: "TOML",
                message: e.to_string(),
            })?
            .checked()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "settings-file")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        Self::from_toml_str(&read_settings(path.as_ref())?)
    }

    /// Load from a JSON string.
    #[cfg(feature = "settings-file")]
    pub fn from_json_str(s: &str) -> Result<Self, SettingsError> {
        serde_json::from_str::<Self>(s)
            .map_err(|e| SettingsError::Syntax {
                format: "JSON",
                message: e.to_string(),
            })?
            .checked()
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "settings-file")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        Self::from_json_str(&read_settings(path.as_ref())?)
    }

    /// `self` if [`validate`](Self::validate) finds nothing to report.
    pub fn checked(self) -> Result<Self, SettingsError> {
        let problems = self.validate();
        if problems.is_empty() {
            Ok(self)
        } else {
            Err(SettingsError::Invalid(problems))
        }
    }
}

#[cfg(feature = "settings-file")]
fn read_settings(path: &Path) -> Result<String, SettingsError> {
    std::fs::read_to_string(path).map_err(|source| SettingsError::Unreadable {
        path: path.to_path_buf(),
        source,
    })
}

/// Why picker settings could not be loaded.
#[derive(Debug)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[cfg(feature = "settings-file")]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The text is not well-formed `format` (TOML or JSON).
    #[cfg(feature = "settings-file")]
    Syntax {
        format: &'static str,
        message: String,
    },
    /// Parsed, but some values are out of range.
    Invalid(Vec<String>),
}

impl core::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            #[cfg(feature = "settings-file")]
            Self::Unreadable { path, source } => {
                write!(f, "cannot read settings from {}: {source}", path.display())
            }
            #[cfg(feature = "settings-file")]
            Self::Syntax { format, message } => write!(f, "malformed {format} settings: {message}"),
            Self::Invalid(problems) => write!(f, "invalid settings: {}", problems.join("; ")),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            #[cfg(feature = "settings-file")]
            Self::Unreadable { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let settings = PickerSettings::default();
        assert!(settings.validate().is_empty());
        assert_eq!(settings.reject_flash(), Duration::from_millis(300));
        assert_eq!(settings.hint_message, "Now tap the target zone to place it");
        assert_eq!(settings.drag_effect, DropEffect::Move);
        assert_eq!(settings.mode_override, None);
    }

    #[test]
    fn validation_reports_every_problem() {
        let settings = PickerSettings {
            reject_flash_ms: 0,
            hint_message: "  ".into(),
            ..PickerSettings::default()
        };
        let errors = settings.validate();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("reject_flash_ms"));
        assert!(errors[1].contains("hint_message"));
    }

    #[test]
    fn checked_reports_problems() {
        let err = PickerSettings {
            hint_message: String::new(),
            ..PickerSettings::default()
        }
        .checked()
        .unwrap_err();
        assert_eq!(err.to_string(), "invalid settings: hint_message must not be blank");
        assert!(PickerSettings::default().checked().is_ok());
    }

    #[cfg(feature = "settings-file")]
    #[test]
    fn toml_partial_uses_defaults() {
        let settings = PickerSettings::from_toml_str(
            "reject_flash_ms = 450\nmode_override = \"touch\"\n",
        )
        .expect("valid toml");
        assert_eq!(settings.reject_flash(), Duration::from_millis(450));
        assert_eq!(settings.mode_override, Some(InteractionMode::Touch));
        assert_eq!(settings.hint_message, DEFAULT_HINT_MESSAGE);
    }

    #[cfg(feature = "settings-file")]
    #[test]
    fn json_roundtrip_and_rejection() {
        let settings = PickerSettings::from_json_str(r#"{"drag_effect":"copy"}"#).expect("valid");
        assert_eq!(settings.drag_effect, DropEffect::Copy);

        let err = PickerSettings::from_json_str(r#"{"reject_flash_ms":0}"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));

        let err = PickerSettings::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, SettingsError::Syntax { format: "JSON", .. }));
    }

    #[cfg(feature = "settings-file")]
    #[test]
    fn missing_file_names_the_path() {
        let err = PickerSettings::from_toml_file("/nonexistent/varpick.toml").unwrap_err();
        assert!(matches!(err, SettingsError::Unreadable { .. }));
        assert!(err.to_string().contains("/nonexistent/varpick.toml"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
