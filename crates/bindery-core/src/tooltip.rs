#![forbid(unsafe_code)]

//! Tooltip notification: how a failing check is surfaced on a field.
//!
//! The engine never draws anything itself. A failing validation hands the
//! installed [`TooltipNotifier`] a target surface and a message; the notifier
//! decides what (if anything) to do with them. [`TooltipTarget`] is the
//! narrow surface a field exposes: its disabled/read-only flags, a validity
//! message slot, and a focus-and-report action.
//!
//! [`DeferredTooltip`] is the standard notifier. It marks the target invalid
//! immediately, then defers the focus-and-report step by a short delay
//! ([`DEFAULT_REPORT_DELAY`], 10ms) so the mark lands before focus moves.
//! The host drives the delay by calling [`DeferredTooltip::pump`] from its
//! tick, or [`DeferredTooltip::flush`] to fire everything at once.
//!
//! # Invariants
//!
//! 1. An empty message or an absent target is a complete no-op: nothing is
//!    set, cleared, or scheduled.
//! 2. A disabled or read-only target has its validity *cleared*, never set;
//!    no report is scheduled. Stale marks from a previous state cannot
//!    linger on a surface that can no longer show them.
//! 3. Reports fire in scheduling order once due.
//!
//! # Failure Modes
//!
//! - Target dropped before its report fires: the queued `Rc` keeps it alive
//!   until the report runs; the report acts on a detached surface.
//! - Re-entrant `show` from inside `focus_and_report`: allowed; the queue
//!   borrow is released before targets are invoked.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use web_time::Instant;

/// Delay between marking a target invalid and focus-and-report.
pub const DEFAULT_REPORT_DELAY: Duration = Duration::from_millis(10);

/// The surface a field exposes to the tooltip notifier.
pub trait TooltipTarget {
    /// Whether the surface currently rejects interaction entirely.
    fn is_disabled(&self) -> bool;

    /// Whether the surface is visible but not editable.
    fn is_read_only(&self) -> bool;

    /// Mark the surface invalid with `message`.
    fn set_validity(&self, message: &str);

    /// Clear any validity mark.
    fn clear_validity(&self);

    /// Bring the surface into focus and present its validity state.
    fn focus_and_report(&self);
}

/// Collaborator that surfaces validation failures on a target.
pub trait TooltipNotifier {
    /// Present `message` on `target`, subject to the notifier's own rules.
    fn show(&self, target: Option<Rc<dyn TooltipTarget>>, message: &str);
}

struct PendingReport {
    due: Instant,
    target: Rc<dyn TooltipTarget>,
}

/// Standard notifier: immediate validity mark, deferred focus-and-report.
pub struct DeferredTooltip {
    delay: Duration,
    pending: RefCell<Vec<PendingReport>>,
}

impl DeferredTooltip {
    #[must_use]
    pub fn new() -> Self {
        Self::with_delay(DEFAULT_REPORT_DELAY)
    }

    #[must_use]
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            pending: RefCell::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Reports scheduled but not yet fired.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Fire every report whose delay has elapsed. Returns how many fired.
    pub fn pump(&self) -> usize {
        let now = Instant::now();
        self.fire(|report| report.due <= now)
    }

    /// Fire every queued report regardless of due time. Returns how many
    /// fired.
    pub fn flush(&self) -> usize {
        self.fire(|_| true)
    }

    /// Drop queued reports without firing them.
    pub fn cancel_pending(&self) {
        self.pending.borrow_mut().clear();
    }

    fn fire(&self, ready: impl Fn(&PendingReport) -> bool) -> usize {
        let mut queue = self.pending.borrow_mut();
        let mut due = Vec::new();
        let mut keep = Vec::with_capacity(queue.len());
        for report in queue.drain(..) {
            if ready(&report) {
                due.push(report);
            } else {
                keep.push(report);
            }
        }
        *queue = keep;
        // Release the borrow: a report may re-enter show().
        drop(queue);

        let fired = due.len();
        for report in due {
            report.target.focus_and_report();
        }
        fired
    }
}

impl Default for DeferredTooltip {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DeferredTooltip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredTooltip")
            .field("delay", &self.delay)
            .field("pending", &self.pending_count())
            .finish()
    }
}

impl TooltipNotifier for DeferredTooltip {
    fn show(&self, target: Option<Rc<dyn TooltipTarget>>, message: &str) {
        if message.is_empty() {
            return;
        }
        let Some(target) = target else {
            return;
        };

        if target.is_disabled() || target.is_read_only() {
            target.clear_validity();
            return;
        }

        target.set_validity(message);
        tracing::debug!(message, delay_ms = self.delay.as_millis() as u64, "tooltip scheduled");
        self.pending.borrow_mut().push(PendingReport {
            due: Instant::now() + self.delay,
            target,
        });
    }
}
