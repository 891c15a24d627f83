#![forbid(unsafe_code)]

//! The instructional hint shown while a token is selected in tap mode.
//!
//! There is exactly one hint element per UI thread no matter how many pickers
//! are active. [`HintPresenter::global`] hands out handles to it; the element
//! itself is created on the first [`HintPresenter::show`] and then lives until
//! the thread (the page) goes away. `hide` never destroys it.

use std::cell::RefCell;
use std::rc::Rc;

use crate::command::{CommandQueue, HostCommand};

#[derive(Debug, Clone, Default)]
struct HintElement {
    text: String,
    visible: bool,
}

/// Read-only view of the hint element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HintSnapshot {
    pub text: String,
    pub visible: bool,
}

thread_local! {
    static GLOBAL_HINT: HintPresenter = HintPresenter {
        slot: Rc::new(RefCell::new(None)),
    };
}

/// Handle to the shared hint element.
///
/// Selections are per picker but the element is not: when one picker clears
/// its selection it hides the hint even if another picker on the same page
/// still has a token selected. The next `show` from any picker makes it
/// visible again with that picker's message.
#[derive(Debug, Clone)]
pub struct HintPresenter {
    slot: Rc<RefCell<Option<HintElement>>>,
}

impl HintPresenter {
    /// Handle to this thread's hint element.
    #[must_use]
    pub fn global() -> Self {
        GLOBAL_HINT.with(Clone::clone)
    }

    /// Create the element if needed, set its text and make it visible.
    pub fn show(&self, message: &str, out: &mut CommandQueue) {
        let mut slot = self.slot.borrow_mut();
        let element = slot.get_or_insert_with(HintElement::default);
        message.clone_into(&mut element.text);
        element.visible = true;
        out.push(HostCommand::ShowHint {
            text: message.to_owned(),
        });
    }

    /// Make the element invisible. No-op if it was never created.
    pub fn hide(&self, out: &mut CommandQueue) {
        if let Some(element) = self.slot.borrow_mut().as_mut() {
            element.visible = false;
            out.push(HostCommand::HideHint);
        }
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.slot
            .borrow()
            .as_ref()
            .is_some_and(|element| element.visible)
    }

    #[must_use]
    pub fn snapshot(&self) -> Option<HintSnapshot> {
        self.slot.borrow().as_ref().map(|element| HintSnapshot {
            text: element.text.clone(),
            visible: element.visible,
        })
    }

    /// True when both handles point at the same element.
    #[must_use]
    pub fn shares_element_with(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.slot, &other.slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hide_before_show_is_silent() {
        let hint = HintPresenter::global();
        let mut out = CommandQueue::new();
        hint.hide(&mut out);
        assert!(out.is_empty());
        assert_eq!(hint.snapshot(), None);
    }

    #[test]
    fn show_then_hide_keeps_element() {
        let hint = HintPresenter::global();
        let mut out = CommandQueue::new();
        hint.show("Now tap the target zone to place it", &mut out);
        assert!(hint.is_visible());

        hint.hide(&mut out);
        assert!(!hint.is_visible());
        assert_eq!(
            hint.snapshot(),
            Some(HintSnapshot {
                text: "Now tap the target zone to place it".into(),
                visible: false,
            })
        );
        assert_eq!(
            out.take(),
            vec![
                HostCommand::ShowHint {
                    text: "Now tap the target zone to place it".into()
                },
                HostCommand::HideHint,
            ]
        );
    }

    #[test]
    fn handles_share_one_element() {
        let a = HintPresenter::global();
        let b = HintPresenter::global();
        assert!(a.shares_element_with(&b));

        let mut out = CommandQueue::new();
        a.show("first", &mut out);
        b.show("second", &mut out);
        assert_eq!(a.snapshot().map(|s| s.text), Some("second".to_owned()));
    }
}
