/// Turns cumulative `(received, transmitted)` counters into per-tick deltas.
///
/// Only the previous sample is kept. The first sample has nothing to compare
/// against and yields `(0, 0)`; a counter that goes backwards (interface
/// reset) also yields zero for that direction.
///
/// # Examples
///
/// ```
/// use i3jazz_collector::delta::DeltaTracker;
///
/// let mut tracker = DeltaTracker::new();
/// assert_eq!(tracker.advance(100, 200), (0, 0));
/// assert_eq!(tracker.advance(150, 260), (50, 60));
/// ```
#[derive(Debug, Default, Clone)]
pub struct DeltaTracker {
    previous: Option<(u64, u64)>,
}

impl DeltaTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, received: u64, transmitted: u64) -> (u64, u64) {
        let delta = match self.previous {
            Some((prev_rx, prev_tx)) => (
                received.saturating_sub(prev_rx),
                transmitted.saturating_sub(prev_tx),
            ),
            None => (0, 0),
        };
        self.previous = Some((received, transmitted));
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sample_is_neutral() {
        let mut tracker = DeltaTracker::new();
        assert_eq!(tracker.advance(1_000_000, 2_000_000), (0, 0));
    }

    #[test]
    fn reports_difference_from_previous_sample_only() {
        let mut tracker = DeltaTracker::new();
        tracker.advance(100, 200);
        assert_eq!(tracker.advance(150, 260), (50, 60));
        assert_eq!(tracker.advance(150, 300), (0, 40));
    }

    #[test]
    fn counter_reset_does_not_underflow() {
        let mut tracker = DeltaTracker::new();
        tracker.advance(500, 500);
        assert_eq!(tracker.advance(10, 600), (0, 100));
        assert_eq!(tracker.advance(30, 600), (20, 0));
    }

    #[test]
    fn trackers_do_not_share_state() {
        let mut a = DeltaTracker::new();
        let mut b = DeltaTracker::new();
        a.advance(100, 100);
        assert_eq!(b.advance(400, 400), (0, 0));
        assert_eq!(a.advance(110, 120), (10, 20));
    }
}
