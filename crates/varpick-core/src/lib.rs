// Forbid unsafe in production; deny in tests.
#![cfg_attr(not(test), forbid(unsafe_code))]
#![cfg_attr(test, deny(unsafe_code))]

//! Core: element handles, host commands, capability detection, and selection.
//!
//! # Role in varpick
//! `varpick-core` holds the host-independent pieces of the token picker. It
//! knows nothing about event routing; `varpick-web` composes these pieces
//! into the drag/tap controller a page drives.
//!
//! # Primary responsibilities
//! - **Elements**: opaque [`ElementId`] handles, token descriptors, zone kinds.
//! - **Commands**: [`HostCommand`] values describing every effect the host
//!   must apply (marks, listeners, drag data, hint visibility).
//! - **Capability detection**: one-shot [`InteractionMode`] resolution.
//! - **Selection**: the single tap-mode selection and the shared hint.

pub mod capability;
pub mod command;
pub mod element;
pub mod hint;
pub mod selection;

pub use capability::{EnvironmentSignals, InteractionMode, ParseModeError, detect};
pub use command::{CommandQueue, DropEffect, HandlerSet, HostCommand, Mark};
pub use element::{ElementId, TokenElement, TokenRef, ZoneKind};
pub use hint::{HintPresenter, HintSnapshot};
pub use selection::{SelectionChange, SelectionState};
