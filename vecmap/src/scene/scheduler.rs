//! Start/stop state machine for the render loop.
//!
//! The host owns the actual display-refresh mechanism (for browsers,
//! `requestAnimationFrame`); the scheduler guarantees that at most one frame
//! is outstanding, that `stop` cancels exactly that frame, and that viewport
//! changes only take effect between frames.

use crate::model::Viewport;
use std::fmt::Debug;

/// Source of display-refresh callbacks.
pub trait FrameHost {
    type Handle: Copy + PartialEq + Debug;

    /// Ask for one callback on the next refresh; `None` if the host cannot
    /// deliver one.
    fn request_frame(&mut self) -> Option<Self::Handle>;

    /// Withdraw a previously requested callback.
    fn cancel_frame(&mut self, handle: Self::Handle);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerState<H> {
    Idle,
    Running(H),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTick {
    /// 0-based index among rendered frames.
    pub index: u64,
    pub timestamp_ms: f64,
    /// Time since the previous rendered frame; 0 for the first frame after a start.
    pub dt_ms: f64,
    pub viewport: Viewport,
}

#[derive(Clone, Debug)]
pub struct FrameScheduler<H> {
    state: SchedulerState<H>,
    viewport: Viewport,
    pending_viewport: Option<Viewport>,
    last_ts: Option<f64>,
    frames: u64,
    requests: u64,
    cancellations: u64,
}

impl<H: Copy + PartialEq + Debug> Default for FrameScheduler<H> {
    fn default() -> Self {
        FrameScheduler::new(Viewport::default())
    }
}

impl<H: Copy + PartialEq + Debug> FrameScheduler<H> {
    pub fn new(viewport: Viewport) -> FrameScheduler<H> {
        FrameScheduler {
            state: SchedulerState::Idle,
            viewport,
            pending_viewport: None,
            last_ts: None,
            frames: 0,
            requests: 0,
            cancellations: 0,
        }
    }

    pub fn state(&self) -> SchedulerState<H> {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, SchedulerState::Running(_))
    }

    /// Viewport used by the most recent (or next, if none yet) frame.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Latest requested viewport, applied or not.
    pub fn target_viewport(&self) -> Viewport {
        self.pending_viewport.unwrap_or(self.viewport)
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    pub fn requests(&self) -> u64 {
        self.requests
    }

    pub fn cancellations(&self) -> u64 {
        self.cancellations
    }

    /// Idle -> Running. Returns false if already running or if the host
    /// refused the first frame.
    pub fn start<F: FrameHost<Handle = H>>(&mut self, host: &mut F) -> bool {
        if self.is_running() {
            return false;
        }
        self.last_ts = None;
        if !self.schedule(host) {
            return false;
        }
        log::debug!("frame scheduler started");
        true
    }

    /// Running -> Idle, cancelling the single outstanding request. Idempotent.
    pub fn stop<F: FrameHost<Handle = H>>(&mut self, host: &mut F) -> bool {
        match self.state {
            SchedulerState::Running(handle) => {
                host.cancel_frame(handle);
                self.cancellations += 1;
                self.state = SchedulerState::Idle;
                log::debug!("frame scheduler stopped after {} frames", self.frames);
                true
            }
            SchedulerState::Idle => false,
        }
    }

    /// Record a new viewport; takes effect at the start of the next frame.
    pub fn resize(&mut self, viewport: Viewport) {
        self.pending_viewport = Some(viewport);
    }

    /// Handle a fired frame callback: render once, then request the next frame.
    ///
    /// Returns false (and renders nothing) when the scheduler is idle, which
    /// covers callbacks that outlive a stop.
    pub fn tick<F, R>(&mut self, host: &mut F, timestamp_ms: f64, render: R) -> bool
    where
        F: FrameHost<Handle = H>,
        R: FnOnce(&FrameTick),
    {
        if !self.is_running() {
            return false;
        }
        if let Some(vp) = self.pending_viewport.take() {
            self.viewport = vp;
        }
        let dt_ms = match self.last_ts {
            Some(prev) if timestamp_ms.is_finite() && timestamp_ms >= prev => timestamp_ms - prev,
            _ => 0.0,
        };
        if timestamp_ms.is_finite() {
            self.last_ts = Some(timestamp_ms);
        }
        let tick = FrameTick { index: self.frames, timestamp_ms, dt_ms, viewport: self.viewport };
        render(&tick);
        self.frames += 1;
        self.schedule(host);
        true
    }

    fn schedule<F: FrameHost<Handle = H>>(&mut self, host: &mut F) -> bool {
        self.requests += 1;
        match host.request_frame() {
            Some(handle) => {
                self.state = SchedulerState::Running(handle);
                true
            }
            None => {
                log::warn!("host refused a frame request; scheduler idle");
                self.state = SchedulerState::Idle;
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingHost {
        next: u32,
        outstanding: Vec<u32>,
        cancelled: Vec<u32>,
        refuse_after: Option<u32>,
    }

    impl FrameHost for CountingHost {
        type Handle = u32;
        fn request_frame(&mut self) -> Option<u32> {
            if self.refuse_after.map_or(false, |n| self.next >= n) {
                return None;
            }
            self.next += 1;
            self.outstanding.push(self.next);
            Some(self.next)
        }
        fn cancel_frame(&mut self, handle: u32) {
            self.outstanding.retain(|h| *h != handle);
            self.cancelled.push(handle);
        }
    }

    #[test]
    fn start_twice_requests_once() {
        let mut host = CountingHost::default();
        let mut s: FrameScheduler<u32> = FrameScheduler::default();
        assert!(s.start(&mut host));
        assert!(!s.start(&mut host));
        assert_eq!(host.outstanding.len(), 1);
        assert_eq!(s.state(), SchedulerState::Running(1));
    }

    #[test]
    fn stop_cancels_exactly_the_pending_frame() {
        let mut host = CountingHost::default();
        let mut s: FrameScheduler<u32> = FrameScheduler::default();
        s.start(&mut host);
        s.tick(&mut host, 16.0, |_| {});
        s.tick(&mut host, 32.0, |_| {});
        assert!(s.stop(&mut host));
        assert!(!s.stop(&mut host));
        assert_eq!(host.cancelled, vec![3]);
        assert_eq!(s.cancellations(), 1);
    }

    #[test]
    fn resize_applies_on_next_tick() {
        let mut host = CountingHost::default();
        let mut s: FrameScheduler<u32> = FrameScheduler::new(Viewport::new(100.0, 50.0));
        s.start(&mut host);
        s.resize(Viewport::new(200.0, 100.0));
        assert_eq!(s.viewport(), Viewport::new(100.0, 50.0));
        assert_eq!(s.target_viewport(), Viewport::new(200.0, 100.0));
        let mut seen = None;
        s.tick(&mut host, 0.0, |t| seen = Some(t.viewport));
        assert_eq!(seen, Some(Viewport::new(200.0, 100.0)));
    }

    #[test]
    fn refused_request_leaves_scheduler_idle() {
        let mut host = CountingHost { refuse_after: Some(0), ..CountingHost::default() };
        let mut s: FrameScheduler<u32> = FrameScheduler::default();
        assert!(!s.start(&mut host));
        assert!(!s.is_running());

        let mut host = CountingHost { refuse_after: Some(2), ..CountingHost::default() };
        assert!(s.start(&mut host));
        assert!(s.tick(&mut host, 16.0, |_| {}));
        assert!(s.is_running());
        let mut rendered = false;
        assert!(s.tick(&mut host, 32.0, |_| rendered = true));
        assert!(rendered);
        assert_eq!(s.state(), SchedulerState::Idle);
        assert!(!s.stop(&mut host));
        assert!(host.cancelled.is_empty());
    }

    #[test]
    fn dt_resets_after_restart() {
        let mut host = CountingHost::default();
        let mut s: FrameScheduler<u32> = FrameScheduler::default();
        s.start(&mut host);
        let mut dts = Vec::new();
        s.tick(&mut host, 100.0, |t| dts.push(t.dt_ms));
        s.tick(&mut host, 116.0, |t| dts.push(t.dt_ms));
        s.stop(&mut host);
        s.start(&mut host);
        s.tick(&mut host, 5000.0, |t| dts.push(t.dt_ms));
        assert_eq!(dts, vec![0.0, 16.0, 0.0]);
    }
}
