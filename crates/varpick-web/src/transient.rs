#![forbid(unsafe_code)]

//! Fixed-delay release of cosmetic marks.
//!
//! A rejected placement flashes the zone with [`Mark::Wrong`] and schedules
//! its removal. Schedules are independent: a second rejection before the
//! first release does not cancel or extend anything, so the earliest release
//! removes the class and later ones re-remove it harmlessly.

use core::time::Duration;

use varpick_core::{CommandQueue, ElementId, HostCommand, Mark};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingRelease {
    element: ElementId,
    mark: Mark,
    deadline: Duration,
}

/// Marks waiting for their release deadline.
#[derive(Debug, Clone, Default)]
pub struct TransientMarks {
    pending: Vec<PendingRelease>,
}

impl TransientMarks {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    /// Add `mark` to `element` now and schedule its removal after `delay`.
    pub fn flash(
        &mut self,
        element: ElementId,
        mark: Mark,
        now: Duration,
        delay: Duration,
        out: &mut CommandQueue,
    ) {
        out.push(HostCommand::AddMark { element, mark });
        self.pending.push(PendingRelease {
            element,
            mark,
            deadline: now.saturating_add(delay),
        });
    }

    /// Release every mark whose deadline is at or before `now`.
    ///
    /// Returns the number of releases; removals are emitted in deadline order.
    pub fn expire(&mut self, now: Duration, out: &mut CommandQueue) -> usize {
        let mut due: Vec<PendingRelease> = Vec::new();
        self.pending.retain(|release| {
            if release.deadline <= now {
                due.push(*release);
                false
            } else {
                true
            }
        });
        due.sort_by_key(|release| release.deadline);
        for release in &due {
            out.push(HostCommand::RemoveMark {
                element: release.element,
                mark: release.mark,
            });
        }
        due.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Earliest pending deadline, for hosts that schedule a single timer.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.iter().map(|release| release.deadline).min()
    }

    /// True when `mark` on `element` is waiting for release.
    #[must_use]
    pub fn is_pending(&self, element: ElementId, mark: Mark) -> bool {
        self.pending
            .iter()
            .any(|release| release.element == element && release.mark == mark)
    }
}
