// Builds the picture shown in the main window:
// live camera + strokes + hand skeleton + cursor marker + HUD text.

use crate::canvas::Canvas;
use crate::draw::{draw_line_2px, draw_ring, draw_text_5x7, fill_circle};
use crate::error::Error;
use crate::gamma::GammaLut;
use crate::gesture::Gesture;
use crate::hand::{HAND_CONNECTIONS, HandLandmarks};
use crate::types::{FrameBuffer, Point};

const BONE_COLOR: u32 = 0x00_FF_FF_FF;
const JOINT_COLOR: u32 = 0x00_FF_00_00;
const CURSOR_RADIUS: i32 = 12;

/// Cursor color for each gesture.
pub fn gesture_color(gesture: Gesture) -> u32 {
    match gesture {
        Gesture::Draw => 0x00_00_FF_00,
        Gesture::Pause => 0x00_FF_00_00,
        Gesture::Clear => 0x00_FF_FF_00,
        Gesture::Unknown => 0x00_FF_FF_FF,
    }
}

/// Blend the canvas strokes over the frame, weighting each pixel by how much
/// of it the strokes cover. Uncovered pixels leave the frame untouched.
pub fn overlay_canvas(
    frame: &mut FrameBuffer,
    canvas: &Canvas,
    opacity: f32,
    lut: &GammaLut,
) -> Result<(), Error> {
    let ink = canvas.coverage();
    if frame.width != ink.width || frame.height != ink.height {
        return Err(Error::CameraFrame(format!(
            "overlay: frame {}x{} vs canvas {}x{}",
            frame.width, frame.height, ink.width, ink.height
        )));
    }
    let color = canvas.color();
    for (dst, &a) in frame.pixels.iter_mut().zip(&ink.alpha) {
        if a > 0.0 {
            *dst = lut.mix(*dst, color, opacity * a);
        }
    }
    Ok(())
}

/// Bones and joints of the detected hand.
pub fn draw_skeleton(frame: &mut FrameBuffer, hand: &HandLandmarks) {
    let pts = hand.to_pixels(frame.width, frame.height);
    for (a, b) in HAND_CONNECTIONS {
        draw_line_2px(frame, pts[a], pts[b], BONE_COLOR);
    }
    for &p in &pts {
        fill_circle(frame, p, 4, JOINT_COLOR);
    }
}

/// Ring plus a solid center where the brush is.
pub fn draw_cursor(frame: &mut FrameBuffer, at: Point, color: u32) {
    draw_ring(frame, at, CURSOR_RADIUS, 2, color);
    fill_circle(frame, at, (CURSOR_RADIUS / 2).max(2), color);
}

/// Stacked status lines in the top-left corner.
pub fn draw_hud(frame: &mut FrameBuffer, lines: &[&str]) {
    let mut y = 8;
    for line in lines {
        draw_text_5x7(frame, 8, y, line, 0x00_FF_FF_FF);
        y += 12;
    }
}
