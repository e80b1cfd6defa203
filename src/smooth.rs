// Exponential moving average over the cursor position.

use crate::types::Point;

/// Damps landmark jitter: `state = m * state + (1 - m) * point`.
///
/// A frame without a cursor forgets the state, so the first point after the
/// hand reappears is used as-is instead of being dragged from the old spot.
pub struct CursorSmoother {
    momentum: f32,
    state: Option<(f32, f32)>,
}

impl CursorSmoother {
    /// `momentum` is clamped to `[0, 0.99]`; 0 disables smoothing.
    pub fn new(momentum: f32) -> Self {
        Self { momentum: momentum.clamp(0.0, 0.99), state: None }
    }

    pub fn update(&mut self, point: Option<Point>) -> Option<Point> {
        let Some(p) = point else {
            self.state = None;
            return None;
        };
        let (px, py) = (p.x as f32, p.y as f32);
        let (x, y) = match self.state {
            Some((sx, sy)) => {
                let m = self.momentum;
                (m * sx + (1.0 - m) * px, m * sy + (1.0 - m) * py)
            }
            None => (px, py),
        };
        self.state = Some((x, y));
        Some(Point::new(x as i32, y as i32))
    }
}
