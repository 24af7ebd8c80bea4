use std::time::{Duration, Instant};

/// Coalescing buffer for rapid-fire scroll positions.
///
/// Retains only the most recent offset per window; superseded intermediate
/// positions are dropped, never processed. This is not a queue.
#[derive(Debug)]
pub struct ScrollCoalescer {
    window: Duration,
    pending: Option<(f64, Instant)>,
}

impl ScrollCoalescer {
    pub const DEFAULT_WINDOW: Duration = Duration::from_millis(100);

    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Record a scroll position, replacing any position not yet flushed.
    pub fn push(&mut self, offset: f64, now: Instant) {
        self.pending = Some((offset, now));
    }

    /// Flush the latest position once the window has elapsed since it was
    /// recorded. Returns `None` while the window is still open or when
    /// nothing is pending.
    pub fn poll(&mut self, now: Instant) -> Option<f64> {
        match self.pending {
            Some((offset, at)) if now.duration_since(at) >= self.window => {
                self.pending = None;
                Some(offset)
            }
            _ => None,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_none()
    }
}

impl Default for ScrollCoalescer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WINDOW)
    }
}
