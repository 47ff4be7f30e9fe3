//! Frame scheduling and time sources.
//!
//! The renderer never sleeps or waits itself: it asks a [`FrameScheduler`]
//! for the next frame and a host loop decides when that frame is due. Tests
//! drive the same renderer by taking due frames by hand with a [`FixedClock`].

use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::fmt;

/// Token identifying one scheduled redraw
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnimationHandle(u64);

impl fmt::Display for AnimationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "frame#{}", self.0)
    }
}

/// Cancellable one-shot frame requests, like `requestAnimationFrame`
pub trait FrameScheduler {
    /// Ask for one more frame
    fn request_frame(&mut self) -> AnimationHandle;

    /// Drop a pending request. Unknown or already fired handles are ignored.
    fn cancel(&mut self, handle: AnimationHandle);

    /// Number of requests not yet fired or cancelled
    fn pending(&self) -> usize;

    /// Fire the oldest pending request
    fn take_due(&mut self) -> Option<AnimationHandle>;
}

/// In-process frame queue
#[derive(Debug, Default)]
pub struct FrameQueue {
    next_id: u64,
    pending: BTreeSet<AnimationHandle>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self, handle: AnimationHandle) -> bool {
        self.pending.contains(&handle)
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&mut self) -> AnimationHandle {
        self.next_id += 1;
        let handle = AnimationHandle(self.next_id);
        self.pending.insert(handle);
        handle
    }

    fn cancel(&mut self, handle: AnimationHandle) {
        if self.pending.remove(&handle) {
            tracing::trace!(%handle, "Cancelled frame");
        }
    }

    fn pending(&self) -> usize {
        self.pending.len()
    }

    fn take_due(&mut self) -> Option<AnimationHandle> {
        self.pending.pop_first()
    }
}

/// Source of the current instant
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually advanced clock
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    pub fn advance(&mut self, by: chrono::Duration) {
        self.now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}
