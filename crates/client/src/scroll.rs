use tokio_util::sync::CancellationToken;

/// Fraction of the sentinel that must be visible to count as intersecting.
pub const DEFAULT_THRESHOLD: f32 = 0.1;

/// Infinite-scroll trigger: reports when the end-of-list sentinel becomes
/// visible. Once disconnected it never fires again.
#[derive(Debug, Clone)]
pub struct ScrollTrigger {
    threshold: f32,
    cancel: CancellationToken,
}

impl Default for ScrollTrigger {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl ScrollTrigger {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            cancel: CancellationToken::new(),
        }
    }

    /// Feed an intersection ratio (0.0 hidden .. 1.0 fully visible).
    pub fn observe(&self, ratio: f32) -> bool {
        !self.cancel.is_cancelled() && ratio > 0.0 && ratio >= self.threshold
    }

    pub fn disconnect(&self) {
        self.cancel.cancel();
    }

    pub fn is_connected(&self) -> bool {
        !self.cancel.is_cancelled()
    }
}
