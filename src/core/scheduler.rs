//! Redraw scheduler - coalesces redraw requests into one pass per frame.
//!
//! Scroll, drag-move, reveal and settle timers all call
//! [`RedrawRequester::request_redraw`] as often as they like. The host's
//! frame callback then calls [`RedrawScheduler::run_frame`], which runs the
//! geometry pass at most once and only if something asked for it.
//!
//! The pending flag is cleared before the pass runs, so a request issued
//! during a pass lands in the next frame instead of being lost.

use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug, Default)]
struct SchedulerState {
    pending: Cell<bool>,
    in_pass: Cell<bool>,
    requests: Cell<u64>,
    frames: Cell<u64>,
}

/// Holds `in_pass` for the duration of a pass, unwinding included.
struct PassGuard<'a> {
    state: &'a SchedulerState,
}

impl<'a> PassGuard<'a> {
    fn enter(state: &'a SchedulerState) -> Self {
        state.in_pass.set(true);
        Self { state }
    }
}

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        self.state.in_pass.set(false);
    }
}

/// Cloneable handle for trigger sources.
#[derive(Clone, Debug)]
pub struct RedrawRequester {
    state: Rc<SchedulerState>,
}

impl RedrawRequester {
    /// Ask for a redraw on the next frame.
    ///
    /// Returns true if this call scheduled the frame, false if one was
    /// already pending.
    pub fn request_redraw(&self) -> bool {
        self.state.requests.set(self.state.requests.get() + 1);
        if self.state.pending.replace(true) {
            return false;
        }
        log::trace!("RedrawScheduler: frame scheduled");
        true
    }
}

#[derive(Debug, Default)]
pub struct RedrawScheduler {
    state: Rc<SchedulerState>,
}

impl RedrawScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requester(&self) -> RedrawRequester {
        RedrawRequester {
            state: Rc::clone(&self.state),
        }
    }

    pub fn request_redraw(&self) -> bool {
        self.requester().request_redraw()
    }

    /// True when the host should deliver a frame callback.
    pub fn is_pending(&self) -> bool {
        self.state.pending.get()
    }

    /// Frame callback entry point. Runs `pass` if a redraw is pending.
    ///
    /// Re-entrant calls (a frame callback fired from inside a pass) are
    /// refused so passes never overlap.
    pub fn run_frame<R>(&self, pass: impl FnOnce() -> R) -> Option<R> {
        if self.state.in_pass.get() || !self.state.pending.replace(false) {
            return None;
        }
        let _guard = PassGuard::enter(&self.state);
        let result = pass();
        self.state.frames.set(self.state.frames.get() + 1);
        Some(result)
    }

    /// Total redraw requests seen.
    pub fn requests(&self) -> u64 {
        self.state.requests.get()
    }

    /// Total passes run.
    pub fn frames(&self) -> u64 {
        self.state.frames.get()
    }
}
