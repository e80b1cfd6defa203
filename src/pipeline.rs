// One frame of the air-canvas loop, minus the windows.
//
// detect hand -> classify pose -> smooth cursor -> update strokes ->
// composite strokes, skeleton and cursor onto the frame.

use crate::canvas::Canvas;
use crate::compose::{draw_cursor, draw_skeleton, gesture_color, overlay_canvas};
use crate::config::Config;
use crate::error::Error;
use crate::gamma::GammaLut;
use crate::gesture::{Gesture, classify};
use crate::hand::{HandLandmarks, LandmarkProvider, landmarks};
use crate::smooth::CursorSmoother;
use crate::stroke::{StrokeAccumulator, StrokeAction};
use crate::types::{FrameBuffer, Point};

/// What happened in one frame.
#[derive(Debug)]
pub struct FrameOutcome {
    pub gesture: Gesture,
    pub cursor: Option<Point>,
    pub action: StrokeAction,
    pub hand: Option<HandLandmarks>,
}

pub struct Pipeline<P> {
    provider: P,
    smoother: CursorSmoother,
    strokes: StrokeAccumulator,
    lut: GammaLut,
    overlay_alpha: f32,
    last_gesture: Gesture,
}

impl<P: LandmarkProvider> Pipeline<P> {
    pub fn new(provider: P, config: &Config, width: usize, height: usize) -> Self {
        Self {
            provider,
            smoother: CursorSmoother::new(config.smoothing),
            strokes: StrokeAccumulator::new(Canvas::new(
                width,
                height,
                config.stroke_color,
                config.stroke_width,
            )),
            lut: GammaLut::new(),
            overlay_alpha: config.overlay_alpha,
            last_gesture: Gesture::Unknown,
        }
    }

    pub fn canvas(&self) -> &Canvas {
        self.strokes.canvas()
    }

    /// Run detection and stroke update on `frame`, then draw the overlay
    /// into it.
    pub fn process(&mut self, frame: &mut FrameBuffer) -> Result<FrameOutcome, Error> {
        self.strokes.fit_to(frame.width, frame.height);

        let hand = self.provider.detect(frame)?;
        if let Some(h) = &hand {
            let tip = h.get(landmarks::INDEX_FINGER_TIP);
            log::trace!(
                "{} hand, score {:.2}, index tip ({:.3},{:.3},{:.3})",
                h.handedness, h.confidence, tip.x, tip.y, tip.z
            );
        }
        let gesture = classify(hand.as_ref());
        let raw = hand.as_ref().map(|h| h.index_tip(frame.width, frame.height));
        let cursor = self.smoother.update(raw);
        let action = self.strokes.apply(gesture, cursor);

        if gesture != self.last_gesture {
            log::debug!("gesture {} -> {gesture}", self.last_gesture);
            if gesture == Gesture::Clear {
                log::info!("canvas cleared");
            }
            self.last_gesture = gesture;
        }

        overlay_canvas(frame, self.strokes.canvas(), self.overlay_alpha, &self.lut)?;
        if let Some(h) = &hand {
            draw_skeleton(frame, h);
        }
        if let Some(c) = cursor {
            draw_cursor(frame, c, gesture_color(gesture));
        }

        Ok(FrameOutcome { gesture, cursor, action, hand })
    }
}
