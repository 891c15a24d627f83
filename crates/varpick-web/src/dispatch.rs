#![forbid(unsafe_code)]

//! Inputs accepted by the picker and the records it returns for each one.
//!
//! Every call into [`Picker`](crate::Picker) produces a [`PickerDispatch`]:
//! the ordered host commands to apply plus a [`PickerLogEntry`] explaining
//! what happened (or why the input was ignored).

use core::time::Duration;

use varpick_core::{ElementId, HostCommand, TokenElement, ZoneKind};

use crate::zone::Verdict;

/// Where a tap landed, as resolved by the host's hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TapTarget {
    /// Inside a token element (enabled or not).
    Token(ElementId),
    /// Inside a zone element.
    Zone(ElementId),
    /// Anywhere else in the document.
    Outside,
}

/// One host event, in a form that can be queued or replayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerInput {
    /// The token pool changed; `tokens` is its current content.
    Mutation { tokens: Vec<TokenElement> },
    DragStart { token: ElementId },
    DragEnd { token: ElementId },
    DragEnter { zone: ElementId },
    DragOver { zone: ElementId },
    DragLeave { zone: ElementId },
    /// `data` is the `text/plain` drag data, if the browser exposed any.
    Drop {
        zone: ElementId,
        data: Option<String>,
    },
    Tap { target: TapTarget },
    Tick { now: Duration },
}

/// Lifecycle phase recorded for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PickerPhase {
    Scan,
    DragStart,
    DragEnd,
    DragEnter,
    DragOver,
    DragLeave,
    Drop,
    TapToken,
    TapZone,
    TapDocument,
    Tick,
}

/// Deterministic reason why an incoming event was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PickerIgnoredReason {
    /// The element has no listener for this event (unscanned or disabled).
    NotAttached,
    /// The event belongs to the other interaction mode.
    WrongMode,
    /// The element is not a configured zone.
    UnknownZone,
    /// A zone was tapped with nothing selected.
    NothingSelected,
    /// A document tap landed inside a token or zone.
    InsideTarget,
}

/// Outcome category for one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerOutcome {
    /// A scan attached listeners to `attached` new tokens.
    Scanned { attached: usize },
    /// Only visual state changed (drag feedback).
    Marked,
    /// A tap selected `token`.
    Selected { token: ElementId },
    /// The selection was emptied without a placement attempt.
    Deselected { previous: Option<ElementId> },
    /// The acceptance protocol ran.
    Placement {
        token: String,
        zone: ZoneKind,
        verdict: Verdict,
    },
    /// Transient marks were released.
    Released { count: usize },
    Ignored(PickerIgnoredReason),
}

/// Structured log record for one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerLogEntry {
    pub phase: PickerPhase,
    pub sequence: u64,
    pub element: Option<ElementId>,
    pub outcome: PickerOutcome,
}

/// Result of one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerDispatch {
    pub commands: Vec<HostCommand>,
    pub log: PickerLogEntry,
}

impl PickerDispatch {
    #[must_use]
    pub const fn outcome(&self) -> &PickerOutcome {
        &self.log.outcome
    }

    #[must_use]
    pub const fn is_ignored(&self) -> bool {
        matches!(self.log.outcome, PickerOutcome::Ignored(_))
    }

    /// Verdict of the acceptance protocol, if it ran.
    #[must_use]
    pub fn verdict(&self) -> Option<Verdict> {
        match self.log.outcome {
            PickerOutcome::Placement { verdict, .. } => Some(verdict),
            _ => None,
        }
    }

    /// True when the host must stop the event from reaching document listeners.
    #[must_use]
    pub fn stops_propagation(&self) -> bool {
        self.commands.contains(&HostCommand::StopPropagation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(outcome: PickerOutcome) -> PickerDispatch {
        PickerDispatch {
            commands: Vec::new(),
            log: PickerLogEntry {
                phase: PickerPhase::Drop,
                sequence: 1,
                element: None,
                outcome,
            },
        }
    }

    #[test]
    fn verdict_only_for_placements() {
        let placed = entry(PickerOutcome::Placement {
            token: "x1".into(),
            zone: ZoneKind::from("predictor"),
            verdict: Verdict::Placed,
        });
        assert_eq!(placed.verdict(), Some(Verdict::Placed));
        assert!(!placed.is_ignored());

        let ignored = entry(PickerOutcome::Ignored(PickerIgnoredReason::UnknownZone));
        assert_eq!(ignored.verdict(), None);
        assert!(ignored.is_ignored());
        assert!(!ignored.stops_propagation());
    }
}
