#![forbid(unsafe_code)]

//! Zone controller and the shared acceptance protocol.
//!
//! Both interaction strategies end a placement attempt the same way:
//!
//! 1. If a validator is configured and rejects `(token, kind)`, the zone is
//!    flashed with [`Mark::Wrong`] for the configured delay and nothing else
//!    happens.
//! 2. Otherwise the placement callback runs exactly once with
//!    `(token, kind)`.
//!
//! Only the event that triggers the attempt differs between modes. A
//! validator that panics is not caught; the panic reaches the host.

use core::fmt;
use core::time::Duration;

use varpick_core::{CommandQueue, ElementId, HandlerSet, HostCommand, Mark, ZoneKind};

use crate::strategy::{InteractionStrategy, Strategy};
use crate::transient::TransientMarks;

/// Result of the acceptance protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// The placement callback ran.
    Placed,
    /// The validator refused; the zone flashed.
    Rejected,
}

/// Placement callback: `(token_id, zone_kind)`.
pub type DropCallback = Box<dyn FnMut(&str, &ZoneKind)>;
/// Validator callback: `(token_id, zone_kind) -> accept`.
pub type ValidateCallback = Box<dyn FnMut(&str, &ZoneKind) -> bool>;

/// Caller-supplied placement callbacks.
pub struct PlacementCallbacks {
    on_drop: DropCallback,
    validate: Option<ValidateCallback>,
}

impl fmt::Debug for PlacementCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlacementCallbacks")
            .field("validate", &self.validate.is_some())
            .finish_non_exhaustive()
    }
}

impl PlacementCallbacks {
    pub fn new(on_drop: impl FnMut(&str, &ZoneKind) + 'static) -> Self {
        Self {
            on_drop: Box::new(on_drop),
            validate: None,
        }
    }

    /// Builder: install a validator. Without one every placement is accepted.
    #[must_use]
    pub fn with_validator(mut self, validate: impl FnMut(&str, &ZoneKind) -> bool + 'static) -> Self {
        self.validate = Some(Box::new(validate));
        self
    }

    #[must_use]
    pub fn has_validator(&self) -> bool {
        self.validate.is_some()
    }

    fn accepts(&mut self, token: &str, kind: &ZoneKind) -> bool {
        self.validate
            .as_mut()
            .is_none_or(|validate| validate(token, kind))
    }

    fn place(&mut self, token: &str, kind: &ZoneKind) {
        (self.on_drop)(token, kind);
    }
}

/// Everything the acceptance protocol needs besides the zone itself.
#[derive(Debug)]
pub struct Acceptance<'a> {
    pub callbacks: &'a mut PlacementCallbacks,
    pub marks: &'a mut TransientMarks,
    pub now: Duration,
    pub reject_flash: Duration,
}

/// One configured destination zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneController {
    element: ElementId,
    kind: ZoneKind,
    drag_over: bool,
}

impl ZoneController {
    #[must_use]
    pub fn new(element: ElementId, kind: impl Into<ZoneKind>) -> Self {
        Self {
            element,
            kind: kind.into(),
            drag_over: false,
        }
    }

    #[must_use]
    pub const fn element(&self) -> ElementId {
        self.element
    }

    #[must_use]
    pub const fn kind(&self) -> &ZoneKind {
        &self.kind
    }

    /// True while the zone shows the drop-candidate mark.
    #[must_use]
    pub const fn is_drop_candidate(&self) -> bool {
        self.drag_over
    }

    /// Attach the strategy's zone listeners.
    pub fn attach(&self, strategy: &Strategy, out: &mut CommandQueue) -> HandlerSet {
        strategy.attach_zone(self.element, out)
    }

    /// Drag entered or moved over the zone: allow the drop and mark it.
    pub fn hover(&mut self, out: &mut CommandQueue) {
        out.push(HostCommand::PreventDefault);
        if !self.drag_over {
            self.drag_over = true;
            out.push(HostCommand::AddMark {
                element: self.element,
                mark: Mark::DragOver,
            });
        }
    }

    /// Drag left the zone (or dropped on it): remove the candidate mark.
    pub fn unhover(&mut self, out: &mut CommandQueue) {
        if self.drag_over {
            self.drag_over = false;
            out.push(HostCommand::RemoveMark {
                element: self.element,
                mark: Mark::DragOver,
            });
        }
    }

    /// Run the acceptance protocol for `token` on this zone.
    pub fn accept(&self, token: &str, ctx: Acceptance<'_>, out: &mut CommandQueue) -> Verdict {
        if !ctx.callbacks.accepts(token, &self.kind) {
            tracing::debug!(
                token,
                zone = self.kind.as_str(),
                element = self.element.get(),
                "placement rejected"
            );
            ctx.marks
                .flash(self.element, Mark::Wrong, ctx.now, ctx.reject_flash, out);
            return Verdict::Rejected;
        }
        tracing::info!(token, zone = self.kind.as_str(), "token placed");
        ctx.callbacks.place(token, &self.kind);
        Verdict::Placed
    }
}
