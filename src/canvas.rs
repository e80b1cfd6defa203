// The persistent drawing surface.
// `ink` holds how much of each pixel the strokes cover; `surface` is the same
// strokes rendered on black for the "Canvas" window. The compositor blends
// with `ink`, so anti-aliased rims fade into the camera image instead of
// showing up as a dark outline.

use crate::types::{FrameBuffer, Mask, Point, lerp_rgb};

pub struct Canvas {
    surface: FrameBuffer,
    ink: Mask,
    color: u32,      // 0x00RRGGBB stroke color
    radius: f32,     // half the stroke width, in pixels
}

impl Canvas {
    pub fn new(width: usize, height: usize, color: u32, stroke_width: u32) -> Self {
        Self {
            surface: FrameBuffer::blank(width, height),
            ink: Mask::empty(width, height),
            color,
            radius: stroke_width.max(1) as f32 / 2.0,
        }
    }

    pub fn width(&self) -> usize {
        self.surface.width
    }

    pub fn height(&self) -> usize {
        self.surface.height
    }

    pub fn color(&self) -> u32 {
        self.color
    }

    /// Raw canvas pixels (what the "Canvas" window shows).
    pub fn image(&self) -> &FrameBuffer {
        &self.surface
    }

    /// Stroke coverage per pixel.
    pub fn coverage(&self) -> &Mask {
        &self.ink
    }

    /// Start over with a blank surface when the camera changes resolution.
    /// Returns true if the surface was re-created.
    pub fn resize_if_needed(&mut self, width: usize, height: usize) -> bool {
        if width == self.surface.width && height == self.surface.height {
            return false;
        }
        log::info!(
            "canvas resized {}x{} -> {width}x{height}, strokes dropped",
            self.surface.width,
            self.surface.height
        );
        self.surface = FrameBuffer::blank(width, height);
        self.ink = Mask::empty(width, height);
        true
    }

    /// Wipe every stroke.
    pub fn clear(&mut self) {
        self.surface.pixels.fill(0);
        self.ink.alpha.fill(0.0);
    }

    pub fn is_blank(&self) -> bool {
        self.ink.alpha.iter().all(|&a| a <= 0.0)
    }

    /// Anti-aliased stroke from `a` to `b` with round caps.
    pub fn draw_segment(&mut self, a: Point, b: Point) {
        let r = self.radius;
        let reach = r.ceil() as i32 + 1;
        let x0 = a.x.min(b.x).saturating_sub(reach).max(0);
        let y0 = a.y.min(b.y).saturating_sub(reach).max(0);
        let x1 = a.x.max(b.x).saturating_add(reach).min(self.surface.width as i32 - 1);
        let y1 = a.y.max(b.y).saturating_add(reach).min(self.surface.height as i32 - 1);

        for y in y0..=y1 {
            for x in x0..=x1 {
                let d = distance_to_segment(x as f32, y as f32, a, b);
                // Full inside the core, fading over one pixel at the rim.
                let coverage = (r + 0.5 - d).clamp(0.0, 1.0);
                let idx = y as usize * self.surface.width + x as usize;
                if coverage <= self.ink.alpha[idx] {
                    continue;
                }
                self.ink.alpha[idx] = coverage;
                self.surface.pixels[idx] = lerp_rgb(0, self.color, coverage);
            }
        }
    }

    /// A single round mark at `p` (a zero-length stroke).
    pub fn dab(&mut self, p: Point) {
        self.draw_segment(p, p);
    }
}

/// Euclidean distance from (px,py) to the closed segment a-b.
fn distance_to_segment(px: f32, py: f32, a: Point, b: Point) -> f32 {
    let (ax, ay) = (a.x as f32, a.y as f32);
    let (dx, dy) = (b.x as f32 - ax, b.y as f32 - ay);
    let len2 = dx * dx + dy * dy;
    let t = if len2 == 0.0 {
        0.0
    } else {
        (((px - ax) * dx + (py - ay) * dy) / len2).clamp(0.0, 1.0)
    };
    let (cx, cy) = (ax + t * dx, ay + t * dy);
    ((px - cx).powi(2) + (py - cy).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORANGE: u32 = 0x00_FF_BF_00;

    fn canvas() -> Canvas {
        Canvas::new(64, 64, ORANGE, 6)
    }

    #[test]
    fn starts_blank() {
        assert!(canvas().is_blank());
    }

    #[test]
    fn segment_paints_its_core_and_nothing_far_away() {
        let mut c = canvas();
        c.draw_segment(Point::new(10, 10), Point::new(30, 10));
        for x in 10..=30 {
            assert_eq!(c.image().get(x, 10), Some(ORANGE), "x={x}");
        }
        assert_eq!(c.image().get(20, 30), Some(0));
        assert_eq!(c.image().get(40, 10), Some(0));
    }

    #[test]
    fn rim_is_partially_blended() {
        let mut c = canvas();
        c.draw_segment(Point::new(10, 20), Point::new(40, 20));
        // radius 3: d=2 is solid, d=3 is half covered, d=4 is untouched
        assert_eq!(c.image().get(20, 22), Some(ORANGE));
        let rim = c.image().get(20, 23).unwrap();
        assert!(rim != 0 && rim != ORANGE, "rim pixel {rim:06x}");
        assert_eq!(c.image().get(20, 24), Some(0));
    }

    #[test]
    fn strokes_clip_at_edges() {
        let mut c = canvas();
        c.draw_segment(Point::new(-20, -20), Point::new(100, 100));
        assert_eq!(c.image().get(0, 0), Some(ORANGE));
        assert_eq!(c.image().get(63, 63), Some(ORANGE));
    }

    #[test]
    fn rim_coverage_is_partial_and_does_not_stack() {
        let mut c = canvas();
        c.draw_segment(Point::new(10, 20), Point::new(40, 20));
        c.draw_segment(Point::new(10, 20), Point::new(40, 20));
        let a = c.coverage().alpha[23 * 64 + 20];
        assert!((a - 0.5).abs() < 1e-6, "alpha={a}");
        assert_eq!(c.coverage().alpha[20 * 64 + 20], 1.0);
    }

    #[test]
    fn extreme_coordinates_do_not_overflow() {
        let mut c = canvas();
        c.dab(Point::new(i32::MAX, i32::MAX));
        c.dab(Point::new(i32::MIN, i32::MIN));
        c.draw_segment(Point::new(i32::MAX, 5), Point::new(i32::MAX, 60));
        assert!(c.is_blank());
        c.dab(Point::new(32, 32));
        assert!(!c.is_blank());
    }

    #[test]
    fn stroke_fully_outside_is_a_no_op() {
        let mut c = canvas();
        c.draw_segment(Point::new(-50, -50), Point::new(-40, -50));
        assert!(c.is_blank());
    }

    #[test]
    fn clear_twice_stays_blank() {
        let mut c = canvas();
        c.dab(Point::new(32, 32));
        assert!(!c.is_blank());
        c.clear();
        assert!(c.is_blank());
        c.clear();
        assert!(c.is_blank());
    }

    #[test]
    fn resize_resets_only_on_change() {
        let mut c = canvas();
        c.dab(Point::new(5, 5));
        assert!(!c.resize_if_needed(64, 64));
        assert!(!c.is_blank());
        assert!(c.resize_if_needed(32, 16));
        assert_eq!((c.width(), c.height()), (32, 16));
        assert!(c.is_blank());
    }

    #[test]
    fn distance_handles_degenerate_segment() {
        let p = Point::new(3, 4);
        assert_eq!(distance_to_segment(0.0, 0.0, p, p), 5.0);
    }
}
