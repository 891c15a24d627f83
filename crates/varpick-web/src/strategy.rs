#![forbid(unsafe_code)]

//! Interaction strategies.
//!
//! The session's [`InteractionMode`] is resolved once and turned into a
//! [`Strategy`]: either [`DragStrategy`] (pointer drag and drop) or
//! [`TapStrategy`] (tap to select, tap a zone to place). Both expose the same
//! attachment contract through [`InteractionStrategy`], so a token or zone
//! only ever receives the listener family of the active mode.
//!
//! Drag handling keeps no state between events: the payload travels in the
//! browser's drag data. Tap handling owns the selection transitions.

use varpick_core::{
    CommandQueue, DropEffect, ElementId, HandlerSet, HintPresenter, HostCommand,
    InteractionMode, Mark, SelectionChange, SelectionState, TokenElement, TokenRef,
};

use crate::dispatch::TapTarget;
use crate::settings::PickerSettings;
use crate::zone::{Acceptance, Verdict, ZoneController};

/// Attachment contract shared by both strategies.
pub trait InteractionStrategy {
    /// Mode this strategy implements.
    fn mode(&self) -> InteractionMode;

    /// Listeners installed on every enabled token.
    fn token_handlers(&self) -> HandlerSet;

    /// Listeners installed on every zone.
    fn zone_handlers(&self) -> HandlerSet;

    /// Emit the listener attachment for one token.
    fn attach_token(&self, token: &TokenElement, out: &mut CommandQueue) -> HandlerSet {
        let handlers = self.token_handlers();
        out.push(HostCommand::Listen {
            element: token.element,
            handlers,
        });
        handlers
    }

    /// Emit the listener attachment for one zone.
    fn attach_zone(&self, zone: ElementId, out: &mut CommandQueue) -> HandlerSet {
        let handlers = self.zone_handlers();
        out.push(HostCommand::Listen {
            element: zone,
            handlers,
        });
        handlers
    }
}

// ---------------------------------------------------------------------------
// Drag
// ---------------------------------------------------------------------------

/// Pointer-mode strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragStrategy {
    effect: DropEffect,
}

impl DragStrategy {
    #[must_use]
    pub const fn new(effect: DropEffect) -> Self {
        Self { effect }
    }

    #[must_use]
    pub const fn effect(&self) -> DropEffect {
        self.effect
    }

    /// Token picked up: publish its identifier as drag data and mark it.
    pub fn drag_start(&self, token: &TokenRef, out: &mut CommandQueue) {
        out.push(HostCommand::SetDragData {
            element: token.element,
            data: token.id.clone(),
            effect: self.effect,
        });
        out.push(HostCommand::AddMark {
            element: token.element,
            mark: Mark::Dragging,
        });
    }

    /// Drag finished, whatever the outcome.
    pub fn drag_end(&self, token: ElementId, out: &mut CommandQueue) {
        out.push(HostCommand::RemoveMark {
            element: token,
            mark: Mark::Dragging,
        });
    }

    /// Dropped on `zone`; missing drag data reads as an empty identifier.
    pub fn drop(
        &self,
        zone: &mut ZoneController,
        data: Option<&str>,
        ctx: Acceptance<'_>,
        out: &mut CommandQueue,
    ) -> (String, Verdict) {
        out.push(HostCommand::PreventDefault);
        zone.unhover(out);
        let token = data.unwrap_or_default();
        let verdict = zone.accept(token, ctx, out);
        (token.to_owned(), verdict)
    }
}

impl InteractionStrategy for DragStrategy {
    fn mode(&self) -> InteractionMode {
        InteractionMode::Pointer
    }

    fn token_handlers(&self) -> HandlerSet {
        HandlerSet::DRAG_SOURCE
    }

    fn zone_handlers(&self) -> HandlerSet {
        HandlerSet::DROP_TARGET
    }
}

// ---------------------------------------------------------------------------
// Tap
// ---------------------------------------------------------------------------

/// Touch-mode strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TapStrategy {
    hint_message: String,
}

impl TapStrategy {
    #[must_use]
    pub fn new(hint_message: impl Into<String>) -> Self {
        Self {
            hint_message: hint_message.into(),
        }
    }

    #[must_use]
    pub fn hint_message(&self) -> &str {
        &self.hint_message
    }

    /// Token tapped: intercept the event and toggle the selection.
    pub fn tap_token(
        &self,
        token: TokenRef,
        selection: &mut SelectionState,
        hint: &HintPresenter,
        out: &mut CommandQueue,
    ) -> SelectionChange {
        out.intercept();
        selection.select(token, hint, &self.hint_message, out)
    }

    /// Zone tapped. Returns `None` (and leaves the event alone) when nothing
    /// is selected.
    ///
    /// The selection is cleared before the acceptance protocol runs, so it is
    /// empty afterwards whatever the verdict, and the placement callback
    /// already observes an empty selection.
    pub fn tap_zone(
        &self,
        zone: &ZoneController,
        selection: &mut SelectionState,
        hint: &HintPresenter,
        ctx: Acceptance<'_>,
        out: &mut CommandQueue,
    ) -> Option<(TokenRef, Verdict)> {
        if selection.is_empty() {
            return None;
        }
        out.intercept();
        let token = selection.take(hint, out)?;
        let verdict = zone.accept(&token.id, ctx, out);
        Some((token, verdict))
    }

    /// Document-level tap. Clears the selection unless the tap landed inside
    /// a token or zone; returns `None` in that case.
    pub fn tap_document(
        &self,
        target: TapTarget,
        selection: &mut SelectionState,
        hint: &HintPresenter,
        out: &mut CommandQueue,
    ) -> Option<SelectionChange> {
        match target {
            TapTarget::Token(_) | TapTarget::Zone(_) => None,
            TapTarget::Outside => Some(selection.clear(hint, out)),
        }
    }
}

impl InteractionStrategy for TapStrategy {
    fn mode(&self) -> InteractionMode {
        InteractionMode::Touch
    }

    fn token_handlers(&self) -> HandlerSet {
        HandlerSet::TAP
    }

    fn zone_handlers(&self) -> HandlerSet {
        HandlerSet::TAP
    }
}

// ---------------------------------------------------------------------------
// Strategy
// ---------------------------------------------------------------------------

/// The strategy selected once for the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    Drag(DragStrategy),
    Tap(TapStrategy),
}

impl Strategy {
    /// Build the strategy for `mode` using the picker settings.
    #[must_use]
    pub fn for_mode(mode: InteractionMode, settings: &PickerSettings) -> Self {
        match mode {
            InteractionMode::Pointer => Self::Drag(DragStrategy::new(settings.drag_effect)),
            InteractionMode::Touch => Self::Tap(TapStrategy::new(settings.hint_message.clone())),
        }
    }

    #[must_use]
    pub const fn as_drag(&self) -> Option<&DragStrategy> {
        match self {
            Self::Drag(drag) => Some(drag),
            Self::Tap(_) => None,
        }
    }

    #[must_use]
    pub const fn as_tap(&self) -> Option<&TapStrategy> {
        match self {
            Self::Tap(tap) => Some(tap),
            Self::Drag(_) => None,
        }
    }
}

impl InteractionStrategy for Strategy {
    fn mode(&self) -> InteractionMode {
        match self {
            Self::Drag(drag) => drag.mode(),
            Self::Tap(tap) => tap.mode(),
        }
    }

    fn token_handlers(&self) -> HandlerSet {
        match self {
            Self::Drag(drag) => drag.token_handlers(),
            Self::Tap(tap) => tap.token_handlers(),
        }
    }

    fn zone_handlers(&self) -> HandlerSet {
        match self {
            Self::Drag(drag) => drag.zone_handlers(),
            Self::Tap(tap) => tap.zone_handlers(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transient::TransientMarks;
    use crate::zone::PlacementCallbacks;
    use core::time::Duration;
    use pretty_assertions::assert_eq;

    fn el(raw: u32) -> ElementId {
        ElementId::new(raw)
    }

    #[test]
    fn strategies_never_share_listener_families() {
        let settings = PickerSettings::default();
        let drag = Strategy::for_mode(InteractionMode::Pointer, &settings);
        let tap = Strategy::for_mode(InteractionMode::Touch, &settings);
        assert!(!drag.token_handlers().intersects(tap.token_handlers()));
        assert!(!drag.zone_handlers().intersects(tap.zone_handlers()));
        assert_eq!(drag.mode(), InteractionMode::Pointer);
        assert_eq!(tap.mode(), InteractionMode::Touch);
        assert!(drag.as_tap().is_none());
        assert!(tap.as_drag().is_none());
    }

    #[test]
    fn drag_start_publishes_identifier() {
        let drag = DragStrategy::new(DropEffect::Move);
        let mut out = CommandQueue::new();
        drag.drag_start(&TokenRef::new(el(1), "x2"), &mut out);
        drag.drag_end(el(1), &mut out);
        assert_eq!(
            out.take(),
            vec![
                HostCommand::SetDragData {
                    element: el(1),
                    data: "x2".into(),
                    effect: DropEffect::Move
                },
                HostCommand::AddMark {
                    element: el(1),
                    mark: Mark::Dragging
                },
                HostCommand::RemoveMark {
                    element: el(1),
                    mark: Mark::Dragging
                },
            ]
        );
    }

    #[test]
    fn drop_without_data_forwards_empty_identifier() {
        let drag = DragStrategy::new(DropEffect::Move);
        let mut seen = Vec::new();
        let mut callbacks = PlacementCallbacks::new(|_, _| {});
        let mut marks = TransientMarks::new();
        let mut zone = ZoneController::new(el(30), "predictor");
        let mut out = CommandQueue::new();
        let (token, verdict) = drag.drop(
            &mut zone,
            None,
            Acceptance {
                callbacks: &mut callbacks,
                marks: &mut marks,
                now: Duration::ZERO,
                reject_flash: Duration::from_millis(300),
            },
            &mut out,
        );
        seen.push(token);
        assert_eq!(seen, vec![String::new()]);
        assert_eq!(verdict, Verdict::Placed);
        assert_eq!(out.as_slice().first(), Some(&HostCommand::PreventDefault));
    }

    #[test]
    fn tap_zone_without_selection_leaves_event_alone() {
        let tap = TapStrategy::new("hint");
        let mut selection = SelectionState::new();
        let hint = HintPresenter::global();
        let mut callbacks = PlacementCallbacks::new(|_, _| panic!("must not place"));
        let mut marks = TransientMarks::new();
        let zone = ZoneController::new(el(31), "response");
        let mut out = CommandQueue::new();
        let result = tap.tap_zone(
            &zone,
            &mut selection,
            &hint,
            Acceptance {
                callbacks: &mut callbacks,
                marks: &mut marks,
                now: Duration::ZERO,
                reject_flash: Duration::from_millis(300),
            },
            &mut out,
        );
        assert_eq!(result, None);
        assert!(out.is_empty());
    }

    #[test]
    fn document_tap_inside_targets_keeps_selection() {
        let tap = TapStrategy::new("hint");
        let mut selection = SelectionState::new();
        let hint = HintPresenter::global();
        let mut out = CommandQueue::new();
        tap.tap_token(TokenRef::new(el(1), "a"), &mut selection, &hint, &mut out);

        assert_eq!(
            tap.tap_document(TapTarget::Token(el(2)), &mut selection, &hint, &mut out),
            None
        );
        assert_eq!(
            tap.tap_document(TapTarget::Zone(el(9)), &mut selection, &hint, &mut out),
            None
        );
        assert!(selection.is_selected(el(1)));

        assert_eq!(
            tap.tap_document(TapTarget::Outside, &mut selection, &hint, &mut out),
            Some(SelectionChange::Cleared {
                previous: Some(el(1))
            })
        );
        assert!(selection.is_empty());
    }
}
