use std::time::{Duration, Instant};

/// One animation tick handed to the frame callback
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameTick {
    /// Monotonic time since the scheduler was created
    pub timestamp: Duration,
    /// Sequential frame number, starting at 0
    pub frame: u64,
}

/// Single-slot frame registration, the native stand-in for an animation-frame
/// request.
///
/// The window layer asks for a redraw only while a registration is pending and
/// calls [`FrameScheduler::fire`] when the redraw arrives. Cancelling withdraws
/// the registration; a frame already in progress still completes.
pub struct FrameScheduler {
    origin: Instant,
    pending: bool,
    frame: u64,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::with_origin(Instant::now())
    }

    pub fn with_origin(origin: Instant) -> Self {
        Self {
            origin,
            pending: false,
            frame: 0,
        }
    }

    /// Register for the next frame; returns false if already registered
    pub fn schedule(&mut self) -> bool {
        let newly = !self.pending;
        self.pending = true;
        newly
    }

    /// Withdraw the pending registration, if any
    pub fn cancel(&mut self) {
        if self.pending {
            log::debug!("Frame registration cancelled at frame {}", self.frame);
        }
        self.pending = false;
    }

    pub fn is_scheduled(&self) -> bool {
        self.pending
    }

    /// Consume the registration. Returns `None` when nothing was scheduled,
    /// e.g. a stray redraw after cancellation.
    pub fn fire(&mut self, now: Instant) -> Option<FrameTick> {
        if !self.pending {
            return None;
        }
        self.pending = false;

        let tick = FrameTick {
            timestamp: now.saturating_duration_since(self.origin),
            frame: self.frame,
        };
        self.frame += 1;
        Some(tick)
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fire_requires_registration() {
        let origin = Instant::now();
        let mut scheduler = FrameScheduler::with_origin(origin);
        assert_eq!(scheduler.fire(origin), None);

        assert!(scheduler.schedule());
        assert!(!scheduler.schedule());
        let tick = scheduler.fire(origin + Duration::from_millis(16)).unwrap();
        assert_eq!(tick.frame, 0);
        assert_eq!(tick.timestamp, Duration::from_millis(16));

        // registration is one-shot
        assert_eq!(scheduler.fire(origin + Duration::from_millis(32)), None);
    }

    #[test]
    fn test_cancel_withdraws_registration() {
        let origin = Instant::now();
        let mut scheduler = FrameScheduler::with_origin(origin);
        scheduler.schedule();
        scheduler.cancel();
        assert!(!scheduler.is_scheduled());
        assert_eq!(scheduler.fire(origin), None);
    }

    #[test]
    fn test_timestamps_are_monotonic() {
        let origin = Instant::now();
        let mut scheduler = FrameScheduler::with_origin(origin);
        let mut last = Duration::ZERO;
        for ms in [5u64, 21, 37, 54] {
            scheduler.schedule();
            let tick = scheduler.fire(origin + Duration::from_millis(ms)).unwrap();
            assert!(tick.timestamp >= last);
            last = tick.timestamp;
        }
        scheduler.schedule();
        assert_eq!(scheduler.fire(origin + Duration::from_millis(60)).unwrap().frame, 4);
    }
}
