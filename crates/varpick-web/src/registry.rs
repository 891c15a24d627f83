#![forbid(unsafe_code)]

//! Token registry: idempotent listener attachment for the token pool.
//!
//! The host reports the pool's current tokens once at startup and again after
//! every structural mutation (its `MutationObserver` callback forwards the
//! new token list). Each scan walks the list and, for every element not yet
//! set up, records the setup marker and attaches the active strategy's token
//! listeners. Rescans after any number of mutations never attach twice.
//!
//! Disabled tokens are marked as set up but receive no listeners, so a token
//! that is later re-enabled stays inert.
//!
//! Every scan carries the pool's whole content. Elements missing from it lose
//! their setup marker, so a handle the host later reuses for a new element is
//! set up afresh with the new element's identifier.

use ahash::{AHashMap, AHashSet};
use varpick_core::{CommandQueue, ElementId, HandlerSet, TokenElement, TokenRef};

use crate::strategy::{InteractionStrategy, Strategy};

/// Listener state of one set-up token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachedToken {
    /// Identifier captured at setup time (empty when the element had none).
    pub id: String,
    pub handlers: HandlerSet,
}

/// Counters for one scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Tokens that received listeners in this scan.
    pub attached: usize,
    /// Tokens skipped because they were already set up.
    pub already_set_up: usize,
    /// Tokens set up without listeners because they were disabled.
    pub disabled: usize,
    /// Previously set-up elements no longer in the pool.
    pub removed: usize,
}

/// Setup markers and attached listeners for one token pool.
#[derive(Debug, Clone)]
pub struct TokenRegistry {
    pool: ElementId,
    setup: AHashSet<ElementId>,
    attached: AHashMap<ElementId, AttachedToken>,
}

impl TokenRegistry {
    #[must_use]
    pub fn new(pool: ElementId) -> Self {
        Self {
            pool,
            setup: AHashSet::new(),
            attached: AHashMap::new(),
        }
    }

    /// Container element this registry watches.
    #[must_use]
    pub const fn pool(&self) -> ElementId {
        self.pool
    }

    /// Walk the pool's current tokens and attach listeners to new ones.
    pub fn scan<I>(&mut self, tokens: I, strategy: &Strategy, out: &mut CommandQueue) -> ScanReport
    where
        I: IntoIterator<Item = TokenElement>,
    {
        let mut report = ScanReport::default();
        let mut present = AHashSet::with_capacity(self.setup.len());
        for token in tokens {
            present.insert(token.element);
            if !self.setup.insert(token.element) {
                report.already_set_up += 1;
                continue;
            }
            if token.disabled {
                report.disabled += 1;
                continue;
            }
            let handlers = strategy.attach_token(&token, out);
            tracing::debug!(
                element = token.element.get(),
                id = token.label(),
                mode = strategy.mode().as_str(),
                "token listeners attached"
            );
            self.attached.insert(
                token.element,
                AttachedToken {
                    id: token.label().to_owned(),
                    handlers,
                },
            );
            report.attached += 1;
        }

        let before = self.setup.len();
        self.setup.retain(|element| present.contains(element));
        self.attached.retain(|element, _| present.contains(element));
        report.removed = before - self.setup.len();
        if report.removed > 0 {
            tracing::debug!(removed = report.removed, "tokens left the pool");
        }
        report
    }

    /// True once the element has been seen by a scan (enabled or not).
    #[must_use]
    pub fn is_set_up(&self, element: ElementId) -> bool {
        self.setup.contains(&element)
    }

    #[must_use]
    pub fn get(&self, element: ElementId) -> Option<&AttachedToken> {
        self.attached.get(&element)
    }

    /// Listeners attached to `element`, if it has any.
    #[must_use]
    pub fn handlers(&self, element: ElementId) -> Option<HandlerSet> {
        self.attached.get(&element).map(|token| token.handlers)
    }

    /// Reference to `element` if it carries `required` listeners.
    #[must_use]
    pub fn token_with(&self, element: ElementId, required: HandlerSet) -> Option<TokenRef> {
        self.attached
            .get(&element)
            .filter(|token| token.handlers.contains(required))
            .map(|token| TokenRef::new(element, token.id.clone()))
    }

    /// Number of tokens carrying listeners.
    #[must_use]
    pub fn attached_len(&self) -> usize {
        self.attached.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::{DragStrategy, TapStrategy};
    use pretty_assertions::assert_eq;
    use varpick_core::{DropEffect, HostCommand};

    fn el(raw: u32) -> ElementId {
        ElementId::new(raw)
    }

    fn drag() -> Strategy {
        Strategy::Drag(DragStrategy::new(DropEffect::Move))
    }

    fn tap() -> Strategy {
        Strategy::Tap(TapStrategy::new("hint"))
    }

    #[test]
    fn first_scan_attaches_mode_listeners() {
        let mut registry = TokenRegistry::new(el(100));
        let mut out = CommandQueue::new();
        let report = registry.scan(
            [TokenElement::new(el(1), "x1"), TokenElement::new(el(2), "x2")],
            &drag(),
            &mut out,
        );
        assert_eq!(report.attached, 2);
        assert_eq!(
            out.take(),
            vec![
                HostCommand::Listen {
                    element: el(1),
                    handlers: HandlerSet::DRAG_SOURCE
                },
                HostCommand::Listen {
                    element: el(2),
                    handlers: HandlerSet::DRAG_SOURCE
                },
            ]
        );
        assert_eq!(registry.handlers(el(1)), Some(HandlerSet::DRAG_SOURCE));
    }

    #[test]
    fn rescan_is_idempotent() {
        let mut registry = TokenRegistry::new(el(100));
        let mut out = CommandQueue::new();
        let tokens = vec![TokenElement::new(el(1), "x1")];
        registry.scan(tokens.clone(), &tap(), &mut out);
        out.take();

        let report = registry.scan(tokens, &tap(), &mut out);
        assert_eq!(report.attached, 0);
        assert_eq!(report.already_set_up, 1);
        assert!(out.is_empty());
        assert_eq!(registry.attached_len(), 1);
    }

    #[test]
    fn disabled_tokens_are_marked_but_inert() {
        let mut registry = TokenRegistry::new(el(100));
        let mut out = CommandQueue::new();
        let report = registry.scan([TokenElement::new(el(3), "dim").disabled()], &tap(), &mut out);
        assert_eq!(report.disabled, 1);
        assert!(out.is_empty());
        assert!(registry.is_set_up(el(3)));
        assert_eq!(registry.handlers(el(3)), None);

        // Re-enabled later: still no listeners.
        let report = registry.scan([TokenElement::new(el(3), "dim")], &tap(), &mut out);
        assert_eq!(report.already_set_up, 1);
        assert_eq!(registry.handlers(el(3)), None);
    }

    #[test]
    fn removed_tokens_are_forgotten() {
        let mut registry = TokenRegistry::new(el(100));
        let mut out = CommandQueue::new();
        registry.scan(
            [TokenElement::new(el(1), "x1"), TokenElement::new(el(2), "x2")],
            &drag(),
            &mut out,
        );
        out.take();

        let report = registry.scan([TokenElement::new(el(2), "x2")], &drag(), &mut out);
        assert_eq!(report.removed, 1);
        assert_eq!(report.already_set_up, 1);
        assert!(!registry.is_set_up(el(1)));
        assert_eq!(registry.handlers(el(1)), None);
        assert_eq!(registry.attached_len(), 1);
        assert!(out.is_empty());
    }

    #[test]
    fn reused_handle_is_set_up_with_new_identifier() {
        let mut registry = TokenRegistry::new(el(100));
        let mut out = CommandQueue::new();
        registry.scan([TokenElement::new(el(1), "x1")], &drag(), &mut out);
        registry.scan(Vec::<TokenElement>::new(), &drag(), &mut out);
        out.take();

        let report = registry.scan([TokenElement::new(el(1), "y9")], &drag(), &mut out);
        assert_eq!(report.attached, 1);
        assert_eq!(
            out.take(),
            vec![HostCommand::Listen {
                element: el(1),
                handlers: HandlerSet::DRAG_SOURCE
            }]
        );
        assert_eq!(
            registry.token_with(el(1), HandlerSet::DRAG_START),
            Some(TokenRef::new(el(1), "y9"))
        );
        assert_eq!(registry.attached_len(), 1);
    }

    #[test]
    fn identifier_is_captured_at_setup() {
        let mut registry = TokenRegistry::new(el(100));
        let mut out = CommandQueue::new();
        registry.scan([TokenElement::anonymous(el(4))], &tap(), &mut out);
        assert_eq!(
            registry.token_with(el(4), HandlerSet::TAP),
            Some(TokenRef::new(el(4), ""))
        );
        assert_eq!(registry.token_with(el(4), HandlerSet::DRAG_START), None);
    }
}
