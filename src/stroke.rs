// Turns per-frame gestures into strokes on the canvas.
//
// Two states only: pen down with a remembered position, or pen up. A
// segment is drawn only between two consecutive drawing frames, so losing
// the hand or pausing never produces a line jumping across the frame.

use crate::canvas::Canvas;
use crate::gesture::Gesture;
use crate::types::Point;

/// What `StrokeAccumulator::apply` did this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrokeAction {
    /// Connected the previous fingertip position to the current one.
    Segment { from: Point, to: Point },
    /// Pen just went down; marked the spot without connecting anything.
    Dab(Point),
    /// Pen up; nothing drawn.
    Lifted,
    /// Canvas wiped.
    Cleared,
}

pub struct StrokeAccumulator {
    canvas: Canvas,
    last: Option<Point>,
}

impl StrokeAccumulator {
    pub fn new(canvas: Canvas) -> Self {
        Self { canvas, last: None }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Last drawing position, if the pen is down.
    pub fn last_position(&self) -> Option<Point> {
        self.last
    }

    /// Match the canvas to the frame size; a new size drops the strokes and
    /// lifts the pen.
    pub fn fit_to(&mut self, width: usize, height: usize) {
        if self.canvas.resize_if_needed(width, height) {
            self.last = None;
        }
    }

    /// Advance one frame.
    pub fn apply(&mut self, gesture: Gesture, cursor: Option<Point>) -> StrokeAction {
        match (gesture, cursor) {
            (Gesture::Draw, Some(to)) => match self.last.replace(to) {
                Some(from) => {
                    self.canvas.draw_segment(from, to);
                    StrokeAction::Segment { from, to }
                }
                None => {
                    self.canvas.dab(to);
                    StrokeAction::Dab(to)
                }
            },
            (Gesture::Clear, _) => {
                self.canvas.clear();
                self.last = None;
                StrokeAction::Cleared
            }
            // Pause, Unknown, or Draw without a fingertip
            _ => {
                self.last = None;
                StrokeAction::Lifted
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INK: u32 = 0x00_00_FF_00;

    fn acc() -> StrokeAccumulator {
        StrokeAccumulator::new(Canvas::new(80, 80, INK, 4))
    }

    fn px(acc: &StrokeAccumulator, x: i32, y: i32) -> u32 {
        acc.canvas().image().get(x, y).unwrap()
    }

    #[test]
    fn consecutive_draw_frames_connect() {
        let mut a = acc();
        let p1 = Point::new(10, 10);
        let p2 = Point::new(20, 10);
        let p3 = Point::new(30, 10);
        assert_eq!(a.apply(Gesture::Draw, Some(p1)), StrokeAction::Dab(p1));
        assert_eq!(a.apply(Gesture::Draw, Some(p2)), StrokeAction::Segment { from: p1, to: p2 });
        assert_eq!(a.apply(Gesture::Draw, Some(p3)), StrokeAction::Segment { from: p2, to: p3 });
        for x in 10..=30 {
            assert_eq!(px(&a, x, 10), INK, "x={x}");
        }
        assert_eq!(a.last_position(), Some(p3));
    }

    #[test]
    fn pause_then_draw_does_not_connect() {
        let mut a = acc();
        a.apply(Gesture::Draw, Some(Point::new(10, 40)));
        assert_eq!(a.apply(Gesture::Pause, Some(Point::new(25, 40))), StrokeAction::Lifted);
        assert_eq!(a.last_position(), None);
        let p = Point::new(40, 40);
        assert_eq!(a.apply(Gesture::Draw, Some(p)), StrokeAction::Dab(p));
        assert_eq!(px(&a, 25, 40), 0);
    }

    #[test]
    fn lost_hand_leaves_a_gap() {
        let mut a = acc();
        a.apply(Gesture::Draw, Some(Point::new(5, 5)));
        a.apply(Gesture::Unknown, None);
        a.apply(Gesture::Draw, Some(Point::new(50, 50)));
        assert_eq!(px(&a, 5, 5), INK);
        assert_eq!(px(&a, 50, 50), INK);
        assert_eq!(px(&a, 27, 27), 0);
        assert_eq!(px(&a, 40, 40), 0);
    }

    #[test]
    fn draw_without_cursor_lifts_the_pen() {
        let mut a = acc();
        a.apply(Gesture::Draw, Some(Point::new(5, 5)));
        assert_eq!(a.apply(Gesture::Draw, None), StrokeAction::Lifted);
        assert_eq!(a.last_position(), None);
    }

    #[test]
    fn open_palm_wipes_everything() {
        let mut a = acc();
        a.apply(Gesture::Draw, Some(Point::new(10, 10)));
        a.apply(Gesture::Draw, Some(Point::new(60, 60)));
        assert_eq!(a.apply(Gesture::Clear, Some(Point::new(30, 30))), StrokeAction::Cleared);
        assert!(a.canvas().is_blank());
        assert_eq!(a.last_position(), None);
    }

    #[test]
    fn clear_is_idempotent() {
        let mut a = acc();
        a.apply(Gesture::Draw, Some(Point::new(10, 10)));
        a.apply(Gesture::Clear, None);
        a.apply(Gesture::Clear, None);
        assert!(a.canvas().is_blank());
    }

    #[test]
    fn resize_lifts_the_pen() {
        let mut a = acc();
        a.apply(Gesture::Draw, Some(Point::new(10, 10)));
        a.fit_to(80, 80);
        assert!(a.last_position().is_some());
        a.fit_to(40, 30);
        assert_eq!(a.last_position(), None);
        assert!(a.canvas().is_blank());
    }
}
