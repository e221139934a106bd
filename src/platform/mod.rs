//! Platform abstraction layer
//!
//! The countdown is driven by a one-shot display-refresh callback that the
//! game renews every frame while a level is in play. Browsers provide this as
//! `requestAnimationFrame` (see `main.rs`); the terminal front-end and tests
//! use [`ManualScheduler`] and deliver frames themselves.

/// Identifies one requested frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i64);

/// Source of display-refresh callbacks
pub trait FrameScheduler {
    /// Ask for one callback on the next frame
    fn request_frame(&mut self) -> FrameHandle;
    /// Withdraw a callback that has not fired yet
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Scheduler whose frames are delivered by the caller's own loop
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: i64,
    pending: Option<FrameHandle>,
    /// Total cancellations (for diagnostics/tests)
    pub cancelled: u32,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// The frame currently waiting to fire, if any
    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Fire the pending frame, returning its handle
    pub fn take_pending(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
            self.cancelled += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_then_take() {
        let mut scheduler = ManualScheduler::new();
        let handle = scheduler.request_frame();
        assert_eq!(scheduler.pending(), Some(handle));
        assert_eq!(scheduler.take_pending(), Some(handle));
        assert_eq!(scheduler.pending(), None);
    }

    #[test]
    fn test_cancel_only_matching_handle() {
        let mut scheduler = ManualScheduler::new();
        let first = scheduler.request_frame();
        let second = scheduler.request_frame();
        assert_ne!(first, second);

        scheduler.cancel_frame(first);
        assert_eq!(scheduler.pending(), Some(second));
        assert_eq!(scheduler.cancelled, 0);

        scheduler.cancel_frame(second);
        assert_eq!(scheduler.pending(), None);
        assert_eq!(scheduler.cancelled, 1);
    }
}
