#![forbid(unsafe_code)]

//! Picker facade: wiring and event routing for one token pool.
//!
//! [`Picker::init`] resolves the interaction mode, attaches every zone,
//! scans the pool once and returns the startup commands. Afterwards the host
//! forwards DOM events to the matching method (or queues [`PickerInput`]
//! values for [`Picker::dispatch`]) and applies the commands in each
//! returned [`PickerDispatch`].
//!
//! # Invariants
//!
//! 1. The mode never changes after `init`; events of the other mode are
//!    ignored with [`PickerIgnoredReason::WrongMode`].
//! 2. A token receives listeners at most once while it stays in the pool,
//!    whatever the rescan history.
//! 3. The selection is empty in pointer mode, and empty after every tap
//!    placement attempt in touch mode.
//! 4. `on_drop` runs exactly once per accepted placement and never for a
//!    rejected one.

use core::time::Duration;

use varpick_core::{
    CommandQueue, ElementId, EnvironmentSignals, HandlerSet, HintPresenter, InteractionMode,
    SelectionChange, SelectionState, TokenElement, TokenRef, ZoneKind, capability,
};

use crate::dispatch::{
    PickerDispatch, PickerIgnoredReason, PickerInput, PickerLogEntry, PickerOutcome, PickerPhase,
    TapTarget,
};
use crate::registry::TokenRegistry;
use crate::settings::PickerSettings;
use crate::strategy::Strategy;
use crate::transient::TransientMarks;
use crate::zone::{Acceptance, PlacementCallbacks, ZoneController};
use crate::{DeterministicClock, PickerError};

/// Caller configuration for one picker.
#[derive(Debug)]
pub struct PickerConfig {
    /// Container holding the token elements.
    pub token_pool: ElementId,
    zones: Vec<(ElementId, ZoneKind)>,
    callbacks: PlacementCallbacks,
    pub settings: PickerSettings,
}

impl PickerConfig {
    /// Start a configuration; `on_drop` receives every accepted placement.
    pub fn new(token_pool: ElementId, on_drop: impl FnMut(&str, &ZoneKind) + 'static) -> Self {
        Self {
            token_pool,
            zones: Vec::new(),
            callbacks: PlacementCallbacks::new(on_drop),
            settings: PickerSettings::default(),
        }
    }

    /// Builder: add a destination zone tagged `kind`.
    #[must_use]
    pub fn zone(mut self, element: ElementId, kind: impl Into<ZoneKind>) -> Self {
        self.zones.push((element, kind.into()));
        self
    }

    /// Builder: install a placement validator.
    #[must_use]
    pub fn validate_with(
        mut self,
        validate: impl FnMut(&str, &ZoneKind) -> bool + 'static,
    ) -> Self {
        self.callbacks = self.callbacks.with_validator(validate);
        self
    }

    /// Builder: replace the settings. They are validated by [`Picker::init`].
    #[must_use]
    pub fn settings(mut self, settings: PickerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Builder: force an interaction mode instead of detecting it.
    #[must_use]
    pub fn mode_override(mut self, mode: InteractionMode) -> Self {
        self.settings.mode_override = Some(mode);
        self
    }

    fn check(&self) -> Result<(), PickerError> {
        let problems = self.settings.validate();
        if !problems.is_empty() {
            return Err(PickerError::InvalidSettings(problems));
        }
        for (index, (element, _)) in self.zones.iter().enumerate() {
            if *element == self.token_pool {
                return Err(PickerError::PoolIsZone(*element));
            }
            if self.zones[..index].iter().any(|(other, _)| other == element) {
                return Err(PickerError::DuplicateZone(*element));
            }
        }
        Ok(())
    }
}

/// Dual-mode token picker bound to one pool and its zones.
#[derive(Debug)]
pub struct Picker {
    mode: InteractionMode,
    strategy: Strategy,
    registry: TokenRegistry,
    zones: Vec<ZoneController>,
    selection: SelectionState,
    hint: HintPresenter,
    marks: TransientMarks,
    clock: DeterministicClock,
    callbacks: PlacementCallbacks,
    settings: PickerSettings,
    next_sequence: u64,
}

impl Picker {
    /// Wire a picker and perform the initial scan of `tokens`.
    ///
    /// The returned dispatch carries the startup commands: the root marker
    /// (touch mode only), zone listeners, then token listeners.
    ///
    /// Fails on invalid settings, a zone configured twice, or a zone that is
    /// also the token pool.
    pub fn init<I>(
        config: PickerConfig,
        signals: &EnvironmentSignals,
        tokens: I,
    ) -> Result<(Self, PickerDispatch), PickerError>
    where
        I: IntoIterator<Item = TokenElement>,
    {
        config.check()?;
        let PickerConfig {
            token_pool,
            zones,
            callbacks,
            settings,
        } = config;

        let mode = settings
            .mode_override
            .unwrap_or_else(|| capability::detect(signals));
        tracing::info!(
            mode = mode.as_str(),
            overridden = settings.mode_override.is_some(),
            zones = zones.len(),
            pool = token_pool.get(),
            "picker initialized"
        );

        let strategy = Strategy::for_mode(mode, &settings);
        let mut out = CommandQueue::new();
        if let Some(marker) = mode.root_marker() {
            out.push(marker);
        }
        let zones: Vec<ZoneController> = zones
            .into_iter()
            .map(|(element, kind)| {
                let zone = ZoneController::new(element, kind);
                zone.attach(&strategy, &mut out);
                zone
            })
            .collect();

        let mut picker = Self {
            mode,
            strategy,
            registry: TokenRegistry::new(token_pool),
            zones,
            selection: SelectionState::new(),
            hint: HintPresenter::global(),
            marks: TransientMarks::new(),
            clock: DeterministicClock::new(),
            callbacks,
            settings,
            next_sequence: 1,
        };
        let report = picker.registry.scan(tokens, &picker.strategy, &mut out);
        let dispatch = picker.finish(
            PickerPhase::Scan,
            Some(token_pool),
            PickerOutcome::Scanned {
                attached: report.attached,
            },
            out,
        );
        Ok((picker, dispatch))
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Interaction mode resolved at `init`.
    #[must_use]
    pub const fn mode(&self) -> InteractionMode {
        self.mode
    }

    /// Currently selected token (touch mode only).
    #[must_use]
    pub fn selection(&self) -> Option<&TokenRef> {
        self.selection.current()
    }

    #[must_use]
    pub const fn registry(&self) -> &TokenRegistry {
        &self.registry
    }

    #[must_use]
    pub fn zones(&self) -> &[ZoneController] {
        &self.zones
    }

    #[must_use]
    pub fn zone(&self, element: ElementId) -> Option<&ZoneController> {
        self.zones.iter().find(|zone| zone.element() == element)
    }

    #[must_use]
    pub const fn hint(&self) -> &HintPresenter {
        &self.hint
    }

    /// Marks waiting for their release deadline.
    #[must_use]
    pub const fn pending_marks(&self) -> &TransientMarks {
        &self.marks
    }

    #[must_use]
    pub const fn now(&self) -> Duration {
        self.clock.now()
    }

    #[must_use]
    pub const fn settings(&self) -> &PickerSettings {
        &self.settings
    }

    // -----------------------------------------------------------------------
    // Pool
    // -----------------------------------------------------------------------

    /// Rescan after the pool changed; `tokens` is the pool's whole content.
    ///
    /// Already set-up tokens are skipped and tokens no longer listed are
    /// forgotten.
    pub fn rescan<I>(&mut self, tokens: I) -> PickerDispatch
    where
        I: IntoIterator<Item = TokenElement>,
    {
        let mut out = CommandQueue::new();
        let report = self.registry.scan(tokens, &self.strategy, &mut out);
        if report.attached > 0 || report.removed > 0 {
            tracing::debug!(
                attached = report.attached,
                already_set_up = report.already_set_up,
                disabled = report.disabled,
                removed = report.removed,
                "pool rescanned"
            );
        }
        self.finish(
            PickerPhase::Scan,
            Some(self.registry.pool()),
            PickerOutcome::Scanned {
                attached: report.attached,
            },
            out,
        )
    }

    // -----------------------------------------------------------------------
    // Pointer mode
    // -----------------------------------------------------------------------

    pub fn drag_start(&mut self, token: ElementId) -> PickerDispatch {
        let mut out = CommandQueue::new();
        let outcome = match (
            &self.strategy,
            self.registry.token_with(token, HandlerSet::DRAG_START),
        ) {
            (Strategy::Tap(_), _) => PickerOutcome::Ignored(PickerIgnoredReason::WrongMode),
            (Strategy::Drag(_), None) => PickerOutcome::Ignored(PickerIgnoredReason::NotAttached),
            (Strategy::Drag(drag), Some(token_ref)) => {
                drag.drag_start(&token_ref, &mut out);
                PickerOutcome::Marked
            }
        };
        self.finish(PickerPhase::DragStart, Some(token), outcome, out)
    }

    pub fn drag_end(&mut self, token: ElementId) -> PickerDispatch {
        let mut out = CommandQueue::new();
        let outcome = match &self.strategy {
            Strategy::Tap(_) => PickerOutcome::Ignored(PickerIgnoredReason::WrongMode),
            Strategy::Drag(drag) => {
                if self.registry.token_with(token, HandlerSet::DRAG_END).is_some() {
                    drag.drag_end(token, &mut out);
                    PickerOutcome::Marked
                } else {
                    PickerOutcome::Ignored(PickerIgnoredReason::NotAttached)
                }
            }
        };
        self.finish(PickerPhase::DragEnd, Some(token), outcome, out)
    }

    pub fn drag_enter(&mut self, zone: ElementId) -> PickerDispatch {
        self.hover_zone(PickerPhase::DragEnter, zone, true)
    }

    pub fn drag_over(&mut self, zone: ElementId) -> PickerDispatch {
        self.hover_zone(PickerPhase::DragOver, zone, true)
    }

    pub fn drag_leave(&mut self, zone: ElementId) -> PickerDispatch {
        self.hover_zone(PickerPhase::DragLeave, zone, false)
    }

    fn hover_zone(&mut self, phase: PickerPhase, zone: ElementId, over: bool) -> PickerDispatch {
        let mut out = CommandQueue::new();
        let outcome = match &self.strategy {
            Strategy::Tap(_) => PickerOutcome::Ignored(PickerIgnoredReason::WrongMode),
            Strategy::Drag(_) => match self.zones.iter_mut().find(|z| z.element() == zone) {
                None => PickerOutcome::Ignored(PickerIgnoredReason::UnknownZone),
                Some(controller) => {
                    if over {
                        controller.hover(&mut out);
                    } else {
                        controller.unhover(&mut out);
                    }
                    PickerOutcome::Marked
                }
            },
        };
        self.finish(phase, Some(zone), outcome, out)
    }

    /// Drop on `zone` carrying `data` (the `text/plain` drag data).
    pub fn drop(&mut self, zone: ElementId, data: Option<&str>) -> PickerDispatch {
        let mut out = CommandQueue::new();
        let now = self.clock.now();
        let reject_flash = self.settings.reject_flash();
        let outcome = match &self.strategy {
            Strategy::Tap(_) => PickerOutcome::Ignored(PickerIgnoredReason::WrongMode),
            Strategy::Drag(drag) => match self.zones.iter_mut().find(|z| z.element() == zone) {
                None => PickerOutcome::Ignored(PickerIgnoredReason::UnknownZone),
                Some(controller) => {
                    let ctx = Acceptance {
                        callbacks: &mut self.callbacks,
                        marks: &mut self.marks,
                        now,
                        reject_flash,
                    };
                    let (token, verdict) = drag.drop(controller, data, ctx, &mut out);
                    PickerOutcome::Placement {
                        token,
                        zone: controller.kind().clone(),
                        verdict,
                    }
                }
            },
        };
        self.finish(PickerPhase::Drop, Some(zone), outcome, out)
    }

    // -----------------------------------------------------------------------
    // Touch mode
    // -----------------------------------------------------------------------

    /// Route a tap to the listener under `target`.
    ///
    /// Taps that a token or zone does not intercept bubble to the document
    /// listener, which ignores anything inside a token or zone, so only
    /// [`TapTarget::Outside`] reaches it with an effect.
    pub fn tap(&mut self, target: TapTarget) -> PickerDispatch {
        match target {
            TapTarget::Token(token) => self.tap_token(token),
            TapTarget::Zone(zone) => self.tap_zone(zone),
            TapTarget::Outside => self.tap_document(target),
        }
    }

    pub fn tap_token(&mut self, token: ElementId) -> PickerDispatch {
        let mut out = CommandQueue::new();
        let outcome = match (
            &self.strategy,
            self.registry.token_with(token, HandlerSet::TAP),
        ) {
            (Strategy::Drag(_), _) => PickerOutcome::Ignored(PickerIgnoredReason::WrongMode),
            (Strategy::Tap(_), None) => PickerOutcome::Ignored(PickerIgnoredReason::NotAttached),
            (Strategy::Tap(tap), Some(token_ref)) => {
                match tap.tap_token(token_ref, &mut self.selection, &self.hint, &mut out) {
                    SelectionChange::Selected { token, .. } => PickerOutcome::Selected { token },
                    SelectionChange::Cleared { previous } => PickerOutcome::Deselected { previous },
                }
            }
        };
        self.finish(PickerPhase::TapToken, Some(token), outcome, out)
    }

    pub fn tap_zone(&mut self, zone: ElementId) -> PickerDispatch {
        let mut out = CommandQueue::new();
        let now = self.clock.now();
        let reject_flash = self.settings.reject_flash();
        let outcome = match &self.strategy {
            Strategy::Drag(_) => PickerOutcome::Ignored(PickerIgnoredReason::WrongMode),
            Strategy::Tap(tap) => match self.zones.iter().find(|z| z.element() == zone) {
                None => PickerOutcome::Ignored(PickerIgnoredReason::UnknownZone),
                Some(controller) => {
                    let ctx = Acceptance {
                        callbacks: &mut self.callbacks,
                        marks: &mut self.marks,
                        now,
                        reject_flash,
                    };
                    match tap.tap_zone(controller, &mut self.selection, &self.hint, ctx, &mut out)
                    {
                        None => PickerOutcome::Ignored(PickerIgnoredReason::NothingSelected),
                        Some((token, verdict)) => PickerOutcome::Placement {
                            token: token.id,
                            zone: controller.kind().clone(),
                            verdict,
                        },
                    }
                }
            },
        };
        self.finish(PickerPhase::TapZone, Some(zone), outcome, out)
    }

    /// Document-level tap listener (touch mode only).
    pub fn tap_document(&mut self, target: TapTarget) -> PickerDispatch {
        let mut out = CommandQueue::new();
        let outcome = match &self.strategy {
            Strategy::Drag(_) => PickerOutcome::Ignored(PickerIgnoredReason::WrongMode),
            Strategy::Tap(tap) => {
                match tap.tap_document(target, &mut self.selection, &self.hint, &mut out) {
                    None => PickerOutcome::Ignored(PickerIgnoredReason::InsideTarget),
                    Some(SelectionChange::Cleared { previous }) => {
                        PickerOutcome::Deselected { previous }
                    }
                    Some(SelectionChange::Selected { token, .. }) => {
                        PickerOutcome::Selected { token }
                    }
                }
            }
        };
        let element = match target {
            TapTarget::Token(element) | TapTarget::Zone(element) => Some(element),
            TapTarget::Outside => None,
        };
        self.finish(PickerPhase::TapDocument, element, outcome, out)
    }

    // -----------------------------------------------------------------------
    // Time
    // -----------------------------------------------------------------------

    /// Move the clock to `now` and release due transient marks.
    pub fn tick(&mut self, now: Duration) -> PickerDispatch {
        self.clock.set(now);
        let mut out = CommandQueue::new();
        let count = self.marks.expire(self.clock.now(), &mut out);
        self.finish(PickerPhase::Tick, None, PickerOutcome::Released { count }, out)
    }

    /// Advance the clock by `dt` and release due transient marks.
    pub fn advance(&mut self, dt: Duration) -> PickerDispatch {
        let now = self.clock.now().saturating_add(dt);
        self.tick(now)
    }

    /// Apply one queued host input.
    pub fn dispatch(&mut self, input: PickerInput) -> PickerDispatch {
        match input {
            PickerInput::Mutation { tokens } => self.rescan(tokens),
            PickerInput::DragStart { token } => self.drag_start(token),
            PickerInput::DragEnd { token } => self.drag_end(token),
            PickerInput::DragEnter { zone } => self.drag_enter(zone),
            PickerInput::DragOver { zone } => self.drag_over(zone),
            PickerInput::DragLeave { zone } => self.drag_leave(zone),
            PickerInput::Drop { zone, data } => self.drop(zone, data.as_deref()),
            PickerInput::Tap { target } => self.tap(target),
            PickerInput::Tick { now } => self.tick(now),
        }
    }

    fn finish(
        &mut self,
        phase: PickerPhase,
        element: Option<ElementId>,
        outcome: PickerOutcome,
        mut out: CommandQueue,
    ) -> PickerDispatch {
        let sequence = self.next_sequence;
        self.next_sequence = self.next_sequence.saturating_add(1);
        if let PickerOutcome::Ignored(reason) = &outcome {
            tracing::trace!(
                sequence,
                phase = ?phase,
                element = element.map(ElementId::get),
                reason = ?reason,
                "input ignored"
            );
        }
        PickerDispatch {
            commands: out.take(),
            log: PickerLogEntry {
                phase,
                sequence,
                element,
                outcome,
            },
        }
    }
}
