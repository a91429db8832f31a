//! The self-rescheduling animation loop, made stoppable.
//!
//! The host owns the frame clock. [`SimulationLoop::frame`] is what the host
//! calls when a frame fires; it renders and, unless cancelled, asks the
//! [`FrameScheduler`] for the next one. Cancellation is checked both before
//! rendering and before re-scheduling, so a cancelled loop neither draws nor
//! keeps itself alive.

use std::cell::Cell;
use std::rc::Rc;

use log::info;

use crate::error::BackdropError;
use crate::field::ParticleField;
use crate::simulation::{render_frame, FrameStats};
use crate::surface::Surface;

/// "Run the loop again at the next display refresh."
///
/// Not a fixed-interval timer: in the browser this is
/// `requestAnimationFrame`, which also pauses while the page is hidden.
pub trait FrameScheduler {
    fn request_frame(&mut self);

    /// Withdraws requests that have not fired yet.
    fn cancel_pending(&mut self) {}
}

/// Scheduler driven by hand: requests are counted and consumed explicitly.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    pending: usize,
    total_requests: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes one pending request. Returns `false` when none is pending.
    pub fn take_pending(&mut self) -> bool {
        if self.pending == 0 {
            return false;
        }
        self.pending -= 1;
        true
    }

    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn total_requests(&self) -> u64 {
        self.total_requests
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) {
        self.pending += 1;
        self.total_requests += 1;
    }

    fn cancel_pending(&mut self) {
        self.pending = 0;
    }
}

/// Shared cancellation flag. Clones observe the same flag.
///
/// Single-threaded by construction: the loop lives on the page's one thread.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
    Cancelled,
}

/// The per-frame driver with an explicit start/cancel contract.
///
/// The loop never holds the field: it is borrowed for the duration of one
/// [`frame`](Self::frame) call, so the host may replace it between frames.
#[derive(Debug)]
pub struct SimulationLoop<F> {
    scheduler: F,
    token: CancelToken,
    state: LoopState,
    frames: u64,
}

impl<F: FrameScheduler> SimulationLoop<F> {
    pub fn new(scheduler: F) -> Self {
        Self {
            scheduler,
            token: CancelToken::new(),
            state: LoopState::Idle,
            frames: 0,
        }
    }

    /// Requests the first frame.
    ///
    /// A cancelled loop may be started again; it gets a fresh token, so
    /// tokens handed out before the restart no longer control it.
    pub fn start(&mut self) -> Result<(), BackdropError> {
        if self.state() == LoopState::Running {
            return Err(BackdropError::LoopAlreadyRunning);
        }
        if self.token.is_cancelled() {
            // an external cancel leaves the last request outstanding
            self.scheduler.cancel_pending();
            self.token = CancelToken::new();
        }
        self.state = LoopState::Running;
        info!("simulation loop started");
        self.scheduler.request_frame();
        Ok(())
    }

    /// Stops the loop and withdraws the outstanding frame request.
    pub fn cancel(&mut self) {
        self.token.cancel();
        self.scheduler.cancel_pending();
        if self.state != LoopState::Cancelled {
            self.state = LoopState::Cancelled;
            info!("simulation loop cancelled after {} frames", self.frames);
        }
    }

    /// A handle the owning view can keep to cancel the loop on teardown.
    pub fn cancel_token(&self) -> CancelToken {
        self.token.clone()
    }

    pub fn state(&self) -> LoopState {
        if self.token.is_cancelled() {
            LoopState::Cancelled
        } else {
            self.state
        }
    }

    pub fn is_running(&self) -> bool {
        self.state() == LoopState::Running
    }

    /// Frames rendered since construction.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut F {
        &mut self.scheduler
    }

    /// Handles one fired frame.
    ///
    /// Returns `None` without touching the surface when the loop is not
    /// running. Otherwise renders, then re-schedules unless the token was
    /// cancelled during the frame.
    pub fn frame<S: Surface + ?Sized>(
        &mut self,
        field: &mut ParticleField,
        surface: &mut S,
    ) -> Option<FrameStats> {
        if !self.is_running() {
            return None;
        }
        let stats = render_frame(field, surface);
        self.frames += 1;
        if self.token.is_cancelled() {
            self.state = LoopState::Cancelled;
        } else {
            self.scheduler.request_frame();
        }
        Some(stats)
    }
}

impl SimulationLoop<ManualScheduler> {
    /// Runs up to `max_frames` frames, one per pending request.
    ///
    /// Stops early if the loop is cancelled or nothing is pending.
    pub fn run_frames<S: Surface + ?Sized>(
        &mut self,
        field: &mut ParticleField,
        surface: &mut S,
        max_frames: u64,
    ) -> Vec<FrameStats> {
        let mut out = Vec::new();
        while (out.len() as u64) < max_frames && self.scheduler.take_pending() {
            match self.frame(field, surface) {
                Some(stats) => out.push(stats),
                None => break,
            }
        }
        out
    }
}
