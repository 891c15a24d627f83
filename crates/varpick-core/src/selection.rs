#![forbid(unsafe_code)]

//! Tap-mode selection state.
//!
//! # Invariants
//!
//! 1. At most one token is selected at any time.
//! 2. Selecting a different token first clears the previous one (its
//!    `selected` mark is removed before the new one is added).
//! 3. Selecting the already-selected token is a toggle and leaves the state
//!    empty.
//! 4. [`SelectionState::select`] and [`SelectionState::clear`] are the only
//!    mutators.
//!
//! Drag mode never touches this state.

use crate::command::{CommandQueue, HostCommand, Mark};
use crate::element::{ElementId, TokenRef};
use crate::hint::HintPresenter;

/// Result of a selection transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionChange {
    /// `token` is now selected; `replaced` was selected before.
    Selected {
        token: ElementId,
        replaced: Option<ElementId>,
    },
    /// The selection is empty; `previous` was selected before, if anything.
    Cleared { previous: Option<ElementId> },
}

/// Holder of the single selected token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    current: Option<TokenRef>,
}

impl SelectionState {
    #[must_use]
    pub const fn new() -> Self {
        Self { current: None }
    }

    #[must_use]
    pub fn current(&self) -> Option<&TokenRef> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }

    #[must_use]
    pub fn is_selected(&self, element: ElementId) -> bool {
        self.current
            .as_ref()
            .is_some_and(|token| token.element == element)
    }

    /// Select `token`, or toggle it off when it is already selected.
    pub fn select(
        &mut self,
        token: TokenRef,
        hint: &HintPresenter,
        hint_message: &str,
        out: &mut CommandQueue,
    ) -> SelectionChange {
        if self.is_selected(token.element) {
            return self.clear(hint, out);
        }
        let replaced = match self.clear(hint, out) {
            SelectionChange::Cleared { previous } => previous,
            SelectionChange::Selected { .. } => None,
        };
        let element = token.element;
        out.push(HostCommand::AddMark {
            element,
            mark: Mark::Selected,
        });
        self.current = Some(token);
        hint.show(hint_message, out);
        SelectionChange::Selected {
            token: element,
            replaced,
        }
    }

    /// Empty the selection. Safe to call when nothing is selected.
    pub fn clear(&mut self, hint: &HintPresenter, out: &mut CommandQueue) -> SelectionChange {
        let previous = self.current.take().map(|token| {
            out.push(HostCommand::RemoveMark {
                element: token.element,
                mark: Mark::Selected,
            });
            token.element
        });
        hint.hide(out);
        SelectionChange::Cleared { previous }
    }

    /// Remove and return the selected token, clearing marks and hint.
    pub fn take(&mut self, hint: &HintPresenter, out: &mut CommandQueue) -> Option<TokenRef> {
        let token = self.current.clone();
        self.clear(hint, out);
        token
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MSG: &str = "Now tap the target zone to place it";

    fn token(raw: u32, id: &str) -> TokenRef {
        TokenRef::new(ElementId::new(raw), id)
    }

    #[test]
    fn select_marks_token_and_shows_hint() {
        let hint = HintPresenter::global();
        let mut state = SelectionState::new();
        let mut out = CommandQueue::new();

        let change = state.select(token(1, "x1"), &hint, MSG, &mut out);
        assert_eq!(
            change,
            SelectionChange::Selected {
                token: ElementId::new(1),
                replaced: None
            }
        );
        assert_eq!(state.current(), Some(&token(1, "x1")));
        assert!(hint.is_visible());
        assert!(out.as_slice().contains(&HostCommand::AddMark {
            element: ElementId::new(1),
            mark: Mark::Selected
        }));
    }

    #[test]
    fn selecting_another_token_unmarks_the_first() {
        let hint = HintPresenter::global();
        let mut state = SelectionState::new();
        let mut out = CommandQueue::new();
        state.select(token(1, "a"), &hint, MSG, &mut out);
        out.take();

        let change = state.select(token(2, "b"), &hint, MSG, &mut out);
        assert_eq!(
            change,
            SelectionChange::Selected {
                token: ElementId::new(2),
                replaced: Some(ElementId::new(1))
            }
        );
        assert_eq!(
            out.take(),
            vec![
                HostCommand::RemoveMark {
                    element: ElementId::new(1),
                    mark: Mark::Selected
                },
                HostCommand::HideHint,
                HostCommand::AddMark {
                    element: ElementId::new(2),
                    mark: Mark::Selected
                },
                HostCommand::ShowHint { text: MSG.into() },
            ]
        );
        assert!(state.is_selected(ElementId::new(2)));
        assert!(!state.is_selected(ElementId::new(1)));
    }

    #[test]
    fn reselecting_same_token_toggles_off() {
        let hint = HintPresenter::global();
        let mut state = SelectionState::new();
        let mut out = CommandQueue::new();
        state.select(token(7, "x"), &hint, MSG, &mut out);
        let change = state.select(token(7, "x"), &hint, MSG, &mut out);
        assert_eq!(
            change,
            SelectionChange::Cleared {
                previous: Some(ElementId::new(7))
            }
        );
        assert!(state.is_empty());
        assert!(!hint.is_visible());
    }

    #[test]
    fn clear_is_idempotent() {
        let hint = HintPresenter::global();
        let mut state = SelectionState::new();
        let mut out = CommandQueue::new();
        assert_eq!(
            state.clear(&hint, &mut out),
            SelectionChange::Cleared { previous: None }
        );
        // Hint never shown on this thread, so nothing to hide.
        assert!(out.is_empty());
        assert_eq!(
            state.clear(&hint, &mut out),
            SelectionChange::Cleared { previous: None }
        );
        assert!(state.is_empty());
    }

    #[test]
    fn take_returns_token_and_clears() {
        let hint = HintPresenter::global();
        let mut state = SelectionState::new();
        let mut out = CommandQueue::new();
        state.select(token(3, "z"), &hint, MSG, &mut out);
        assert_eq!(state.take(&hint, &mut out), Some(token(3, "z")));
        assert!(state.is_empty());
        assert_eq!(state.take(&hint, &mut out), None);
    }
}
