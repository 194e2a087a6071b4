//! Square-count tracker
//!
//! Counts rising edges on the center line sensor. Two edges mark the
//! entry and exit of one square, so a move of `n` squares completes at
//! exactly `2 * n` edges. Edge counting, not elapsed time, is
//! authoritative for move completion.

/// Result of one tracker sample
#[derive(Debug, Clone, Copy, Default)]
pub struct TrackerEvent {
    /// This tick saw a rising edge on the center sensor
    pub edge: bool,
    /// This edge completed a full square (every second edge)
    pub square_crossed: bool,
}

/// Edge detector and square counter for the center sensor
#[derive(Debug, Clone)]
pub struct SquareTracker {
    prev_center: bool,
    target_squares: u8,
    edge_count: u8,
    complete: bool,
}

impl SquareTracker {
    pub fn new() -> Self {
        Self {
            prev_center: false,
            target_squares: 0,
            edge_count: 0,
            complete: false,
        }
    }

    /// Latch a square count and restart edge counting.
    ///
    /// The edge detector history is primed with the current sensor state
    /// so a line the robot is already standing on does not count.
    pub fn load(&mut self, squares: u8, center_now: bool) {
        self.target_squares = squares;
        self.edge_count = 0;
        // A zero-square load has nothing to count
        self.complete = squares == 0;
        self.prev_center = center_now;
        log::debug!("SquareTracker: loaded {} squares", squares);
    }

    /// Advance the edge detector with this tick's center sensor sample
    pub fn sample(&mut self, center: bool) -> TrackerEvent {
        let rising = center && !self.prev_center;
        self.prev_center = center;

        if !rising || self.complete {
            return TrackerEvent::default();
        }

        self.edge_count += 1;
        let square_crossed = self.edge_count % 2 == 0;
        if self.edge_count == 2 * self.target_squares {
            self.complete = true;
            log::debug!(
                "SquareTracker: move complete after {} edges",
                self.edge_count
            );
        }

        TrackerEvent {
            edge: true,
            square_crossed,
        }
    }

    /// Latched once the edge count reaches twice the loaded square count
    pub fn move_complete(&self) -> bool {
        self.complete
    }

    /// Rising edges seen since the last load
    pub fn edge_count(&self) -> u8 {
        self.edge_count
    }

    /// Stopped exactly on a detected line at the board's edge
    pub fn off_board(speed_stopped: bool, center: bool) -> bool {
        speed_stopped && center
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for SquareTracker {
    fn default() -> Self {
        Self::new()
    }
}
