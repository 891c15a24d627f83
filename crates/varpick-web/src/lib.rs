#![forbid(unsafe_code)]

//! `varpick-web` is the host-driven drag/tap token picker.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding page (JS) pushes DOM events and token
//!   pool mutations; the picker answers with [`HostCommand`] lists.
//! - **Deterministic time**: the host advances a monotonic clock explicitly,
//!   which releases transient marks.
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.
//!
//! This crate intentionally does not bind to `wasm-bindgen`. A thin JS shim
//! forwards events (optionally as JSON through the `input-parser` feature)
//! and applies the returned commands to the DOM.
//!
//! [`HostCommand`]: varpick_core::HostCommand

pub mod dispatch;
#[cfg(feature = "input-parser")]
pub mod input_parser;
pub mod picker;
pub mod registry;
pub mod settings;
pub mod strategy;
pub mod transient;
pub mod zone;

use core::time::Duration;

use varpick_core::ElementId;

pub use dispatch::{
    PickerDispatch, PickerIgnoredReason, PickerInput, PickerLogEntry, PickerOutcome, PickerPhase,
    TapTarget,
};
pub use picker::{Picker, PickerConfig};
pub use settings::PickerSettings;
pub use zone::Verdict;

/// Configuration error reported by [`Picker::init`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerError {
    /// The same element was configured as two zones.
    DuplicateZone(ElementId),
    /// A zone element is also the token pool.
    PoolIsZone(ElementId),
    /// Settings failed [`PickerSettings::validate`].
    InvalidSettings(Vec<String>),
}

impl core::fmt::Display for PickerError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::DuplicateZone(element) => write!(f, "zone {element} configured twice"),
            Self::PoolIsZone(element) => {
                write!(f, "element {element} is both the token pool and a zone")
            }
            Self::InvalidSettings(errors) => write!(f, "invalid settings: {}", errors.join("; ")),
        }
    }
}

impl std::error::Error for PickerError {}

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Current monotonic time.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Set current monotonic time. Earlier values are ignored.
    pub fn set(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}
