//! Host scheduling hooks: next-frame callbacks and resize listeners.
//!
//! The frame loop never sleeps or spawns. It asks a [`FrameScheduler`] for
//! one callback before the next presented frame, runs exactly one step when
//! that callback arrives, and asks again. Cancelling a token means a late
//! callback for it is ignored.
//!
//! [`ManualScheduler`] is the host used by tests and headless rendering:
//! frames fire only when the driver pops them.

use std::collections::VecDeque;

/// Handle for one requested frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameToken(pub u64);

/// Handle for an attached resize listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// The host side of the frame loop.
pub trait FrameScheduler {
    /// Requests one callback before the next presented frame.
    fn request_frame(&mut self) -> FrameToken;

    /// Cancels a pending callback. Unknown or already-fired tokens are ignored.
    fn cancel_frame(&mut self, token: FrameToken);

    /// Starts delivering container resize notifications.
    fn attach_resize(&mut self) -> ListenerId;

    /// Stops delivering resize notifications for `id`.
    fn detach_resize(&mut self, id: ListenerId);
}

/// A scheduler driven by hand: requested frames queue up until popped.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    pending: VecDeque<FrameToken>,
    listeners: Vec<ListenerId>,
    requested: u64,
    cancelled: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Pops the oldest pending frame, as the host would when it presents.
    pub fn next_due(&mut self) -> Option<FrameToken> {
        self.pending.pop_front()
    }

    /// Frames requested and not yet fired or cancelled.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Resize listeners currently attached.
    pub fn listeners(&self) -> &[ListenerId] {
        &self.listeners
    }

    /// Total frames ever requested.
    pub fn requested(&self) -> u64 {
        self.requested
    }

    /// Total pending frames ever cancelled.
    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameToken {
        let token = FrameToken(self.allocate());
        self.pending.push_back(token);
        self.requested += 1;
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        let before = self.pending.len();
        self.pending.retain(|t| *t != token);
        if self.pending.len() < before {
            self.cancelled += 1;
        }
    }

    fn attach_resize(&mut self) -> ListenerId {
        let id = ListenerId(self.allocate());
        self.listeners.push(id);
        id
    }

    fn detach_resize(&mut self, id: ListenerId) {
        self.listeners.retain(|l| *l != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_fire_in_request_order() {
        let mut s = ManualScheduler::new();
        let a = s.request_frame();
        let b = s.request_frame();
        assert_ne!(a, b);
        assert_eq!(s.next_due(), Some(a));
        assert_eq!(s.next_due(), Some(b));
        assert_eq!(s.next_due(), None);
    }

    #[test]
    fn cancelled_frame_never_fires() {
        let mut s = ManualScheduler::new();
        let a = s.request_frame();
        s.cancel_frame(a);
        assert_eq!(s.pending(), 0);
        assert_eq!(s.cancelled(), 1);
        assert_eq!(s.next_due(), None);
    }

    #[test]
    fn cancelling_unknown_token_is_a_no_op() {
        let mut s = ManualScheduler::new();
        s.request_frame();
        s.cancel_frame(FrameToken(999));
        assert_eq!(s.pending(), 1);
        assert_eq!(s.cancelled(), 0);
    }

    #[test]
    fn resize_listeners_attach_and_detach() {
        let mut s = ManualScheduler::new();
        let id = s.attach_resize();
        assert_eq!(s.listeners(), &[id]);
        s.detach_resize(id);
        assert!(s.listeners().is_empty());
    }

    #[test]
    fn scheduler_is_object_safe() {
        let mut s = ManualScheduler::new();
        let host: &mut dyn FrameScheduler = &mut s;
        host.request_frame();
        assert_eq!(s.requested(), 1);
    }
}
