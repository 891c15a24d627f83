#![forbid(unsafe_code)]

//! Interaction capability detection.
//!
//! The picker runs in exactly one [`InteractionMode`] per session. The mode is
//! derived once from [`EnvironmentSignals`] reported by the host and is never
//! re-evaluated: drag listeners and tap listeners are never mixed.
//!
//! # Signals
//!
//! - `touch_start_event`: the environment exposes a touch-start event.
//! - `max_touch_points` / `ms_max_touch_points`: two spellings of the same
//!   capability; the first one present and positive wins.
//!
//! Any positive signal selects [`InteractionMode::Touch`].

use std::fmt;
use std::str::FromStr;

use crate::command::{HostCommand, Mark};

/// Session-wide input handling mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum InteractionMode {
    /// Pointer-primary: drag and drop.
    #[default]
    Pointer,
    /// Touch-primary: tap to select, tap a zone to place.
    Touch,
}

impl InteractionMode {
    #[must_use]
    pub const fn is_touch(self) -> bool {
        matches!(self, Self::Touch)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pointer => "pointer",
            Self::Touch => "touch",
        }
    }

    /// Root marker the host should apply for styling, if any.
    #[must_use]
    pub const fn root_marker(self) -> Option<HostCommand> {
        match self {
            Self::Touch => Some(HostCommand::MarkRoot {
                mark: Mark::TouchDevice,
            }),
            Self::Pointer => None,
        }
    }
}

impl fmt::Display for InteractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for unrecognized mode names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseModeError(String);

impl fmt::Display for ParseModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown interaction mode: {}", self.0)
    }
}

impl std::error::Error for ParseModeError {}

impl FromStr for InteractionMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pointer" | "mouse" | "drag" => Ok(Self::Pointer),
            "touch" | "tap" => Ok(Self::Touch),
            other => Err(ParseModeError(other.to_owned())),
        }
    }
}

/// Capability signals sampled by the host at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnvironmentSignals {
    /// `'ontouchstart' in window`.
    pub touch_start_event: bool,
    /// `navigator.maxTouchPoints`, when exposed.
    pub max_touch_points: Option<u32>,
    /// `navigator.msMaxTouchPoints`, when exposed.
    pub ms_max_touch_points: Option<u32>,
}

impl EnvironmentSignals {
    /// Desktop environment with no touch capability.
    #[must_use]
    pub const fn pointer_only() -> Self {
        Self {
            touch_start_event: false,
            max_touch_points: Some(0),
            ms_max_touch_points: None,
        }
    }

    /// Touch screen reporting `points` simultaneous contacts.
    #[must_use]
    pub const fn touch_screen(points: u32) -> Self {
        Self {
            touch_start_event: true,
            max_touch_points: Some(points),
            ms_max_touch_points: None,
        }
    }

    /// Touch point count from the first property that is present and positive.
    #[must_use]
    pub fn touch_points(&self) -> Option<u32> {
        self.max_touch_points
            .filter(|&points| points > 0)
            .or(self.ms_max_touch_points.filter(|&points| points > 0))
    }
}

/// Resolve the interaction mode from environment signals.
#[must_use]
pub fn detect(signals: &EnvironmentSignals) -> InteractionMode {
    let mode = if signals.touch_start_event || signals.touch_points().is_some() {
        InteractionMode::Touch
    } else {
        InteractionMode::Pointer
    };
    tracing::debug!(
        touch_start = signals.touch_start_event,
        touch_points = signals.touch_points().unwrap_or(0),
        mode = mode.as_str(),
        "interaction capability detected"
    );
    mode
}
