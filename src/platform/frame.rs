//! Recurring per-frame callbacks with an explicit cancel handle
//!
//! A [`FrameLoop`] runs one frame body per scheduled callback and asks for
//! the next callback only after the body has run, so frames never overlap.
//! Dropping the loop cancels whatever request is still pending.

/// Something that can schedule a single future frame callback
pub trait FrameScheduler {
    type Handle: Copy + std::fmt::Debug;

    /// Ask for one callback on the next display refresh
    fn request_frame(&mut self) -> Self::Handle;

    /// Withdraw a request that has not fired yet
    fn cancel_frame(&mut self, handle: Self::Handle);
}

/// Owns the pending frame request of one looping component
#[derive(Debug)]
pub struct FrameLoop<S: FrameScheduler> {
    scheduler: S,
    pending: Option<S::Handle>,
    frames_run: u64,
}

impl<S: FrameScheduler> FrameLoop<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            pending: None,
            frames_run: 0,
        }
    }

    /// Schedule the first frame; no-op if already running
    pub fn start(&mut self) {
        if self.pending.is_none() {
            self.pending = Some(self.scheduler.request_frame());
        }
    }

    /// Claim the callback that just fired
    ///
    /// Returns false if the loop was cancelled, in which case the caller must
    /// not run a frame body.
    pub fn begin_frame(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Schedule the next frame after a body has run
    pub fn end_frame(&mut self) {
        self.frames_run += 1;
        self.pending = Some(self.scheduler.request_frame());
    }

    /// Stop the loop, withdrawing the pending request
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            log::debug!("Cancelling frame request {:?}", handle);
            self.scheduler.cancel_frame(handle);
        }
    }

    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    pub fn frames_run(&self) -> u64 {
        self.frames_run
    }
}

impl<S: FrameScheduler> Drop for FrameLoop<S> {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Scheduler driven by hand; clones share the same bookkeeping
///
/// Used by the native demo and by tests to observe requests and
/// cancellations.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    inner: std::rc::Rc<std::cell::RefCell<ManualQueue>>,
}

#[derive(Debug, Default)]
struct ManualQueue {
    next_handle: u32,
    pending: Vec<u32>,
    cancelled: u32,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests that have neither fired nor been cancelled
    pub fn pending(&self) -> usize {
        self.inner.borrow().pending.len()
    }

    pub fn cancelled(&self) -> u32 {
        self.inner.borrow().cancelled
    }

    /// Fire every pending request (they are consumed)
    pub fn fire(&self) -> usize {
        let mut queue = self.inner.borrow_mut();
        let fired = queue.pending.len();
        queue.pending.clear();
        fired
    }
}

impl FrameScheduler for ManualScheduler {
    type Handle = u32;

    fn request_frame(&mut self) -> u32 {
        let mut queue = self.inner.borrow_mut();
        queue.next_handle += 1;
        let handle = queue.next_handle;
        queue.pending.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: u32) {
        let mut queue = self.inner.borrow_mut();
        queue.pending.retain(|&h| h != handle);
        queue.cancelled += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_request_per_frame() {
        let scheduler = ManualScheduler::new();
        let mut frame_loop = FrameLoop::new(scheduler.clone());

        frame_loop.start();
        frame_loop.start();
        assert_eq!(scheduler.pending(), 1);

        for _ in 0..3 {
            assert_eq!(scheduler.fire(), 1);
            assert!(frame_loop.begin_frame());
            frame_loop.end_frame();
        }
        assert_eq!(scheduler.pending(), 1);
        assert_eq!(frame_loop.frames_run(), 3);
    }

    #[test]
    fn test_cancel_withdraws_request() {
        let scheduler = ManualScheduler::new();
        let mut frame_loop = FrameLoop::new(scheduler.clone());
        frame_loop.start();

        frame_loop.cancel();
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(scheduler.cancelled(), 1);
        assert!(!frame_loop.is_running());
        assert!(!frame_loop.begin_frame());
    }

    #[test]
    fn test_drop_cancels() {
        let scheduler = ManualScheduler::new();
        {
            let mut frame_loop = FrameLoop::new(scheduler.clone());
            frame_loop.start();
        }
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(scheduler.cancelled(), 1);
    }
}
