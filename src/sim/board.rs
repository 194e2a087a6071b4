//! Board floor and line-sensor model
//!
//! Positions are in square units. Guide lines run across the board every
//! half square (through square centers and along square boundaries), so
//! traversing one full square crosses exactly two lines. Beyond each
//! board edge lies a painted border region that keeps the center sensor
//! triggered, which is how the robot recognizes it has left the board.
//!
//! The rig models travel along the y axis, which is all the calibration
//! routine and the shipped scenarios need. Lateral drift is measured
//! against the vertical guide line the robot follows.

use crate::sensors::SensorSnapshot;

/// Half-square spacing between guide lines
const LINE_SPACING: f32 = 0.5;

/// Distance past the last boundary where the border paint begins
const BORDER_OFFSET: f32 = 0.25;

/// Board geometry and floor sensor model
#[derive(Debug, Clone)]
pub struct Board {
    /// Squares per side
    squares: u8,
    /// Guide-line width in square units
    line_width: f32,
}

impl Board {
    pub fn new(squares: u8, line_width: f32) -> Self {
        Self {
            squares,
            line_width,
        }
    }

    /// Is the center sensor over a guide line or the border paint?
    pub fn center_triggered(&self, y: f32) -> bool {
        let extent = self.squares as f32;
        if y >= extent + BORDER_OFFSET || y <= -BORDER_OFFSET {
            return true;
        }
        // Nearest half-square line, clamped to the board
        let nearest = (y / LINE_SPACING).round() * LINE_SPACING;
        if !(0.0..=extent).contains(&nearest) {
            return false;
        }
        (y - nearest).abs() <= self.line_width / 2.0
    }

    /// Side-sensor triggers from lateral drift across the guide line.
    ///
    /// Returns (left, right). `guide_x` is the vertical line the robot
    /// is following; drifting east of it trips the right sensor,
    /// drifting west the left.
    pub fn drift_triggers(&self, x: f32, guide_x: f32) -> (bool, bool) {
        let drift = x - guide_x;
        let half = self.line_width / 2.0;
        (drift < -half, drift > half)
    }

    /// Populate the floor portion of a sensor snapshot
    pub fn sense(&self, snapshot: &mut SensorSnapshot, x: f32, y: f32, guide_x: f32) {
        let (left, right) = self.drift_triggers(x, guide_x);
        snapshot.left = left;
        snapshot.right = right;
        snapshot.center = self.center_triggered(y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> Board {
        Board::new(5, 0.12)
    }

    #[test]
    fn test_lines_every_half_square() {
        let board = board();
        assert!(board.center_triggered(0.5));
        assert!(board.center_triggered(1.0));
        assert!(board.center_triggered(2.52));
        assert!(!board.center_triggered(0.75));
        assert!(!board.center_triggered(1.2));
    }

    #[test]
    fn test_line_width() {
        let board = board();
        assert!(board.center_triggered(1.06));
        assert!(!board.center_triggered(1.07));
        assert!(board.center_triggered(0.94));
    }

    #[test]
    fn test_border_paint_past_edge() {
        let board = board();
        // Last on-board line sits at the boundary itself
        assert!(board.center_triggered(5.0));
        // Gap between the boundary line and the border paint
        assert!(!board.center_triggered(5.2));
        // Border paint is continuous
        assert!(board.center_triggered(5.25));
        assert!(board.center_triggered(6.3));
        assert!(board.center_triggered(-0.4));
    }

    #[test]
    fn test_drift_triggers() {
        let board = board();
        assert_eq!(board.drift_triggers(2.5, 2.5), (false, false));
        assert_eq!(board.drift_triggers(2.6, 2.5), (false, true));
        assert_eq!(board.drift_triggers(2.4, 2.5), (true, false));
    }
}
