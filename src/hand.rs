// Hand landmark data and the provider interface.
// Landmarks follow the MediaPipe hand model: 21 points per hand, x/y
// normalized to the frame size, z a relative depth (wrist = 0).

use crate::error::Error;
use crate::types::{FrameBuffer, Point};

/// Hand landmark indices used here (MediaPipe hand landmark model convention).
pub mod landmarks {
    pub const INDEX_FINGER_PIP: usize = 6;
    pub const INDEX_FINGER_TIP: usize = 8;
    pub const MIDDLE_FINGER_PIP: usize = 10;
    pub const MIDDLE_FINGER_TIP: usize = 12;
    pub const RING_FINGER_PIP: usize = 14;
    pub const RING_FINGER_TIP: usize = 16;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_TIP: usize = 20;

    pub const COUNT: usize = 21;
}

/// Furthest a normalized x/y may sit outside the frame and still be trusted.
/// The detector reports slightly negative or >1 values for fingers that
/// leave the picture; anything beyond this is garbage.
pub const MAX_NORMALIZED: f32 = 2.0;

/// Bones of the hand skeleton, as pairs of landmark indices.
pub const HAND_CONNECTIONS: [(usize, usize); 23] = [
    (0, 1), (1, 2), (2, 3), (3, 4),
    (0, 5), (5, 6), (6, 7), (7, 8),
    (0, 9), (9, 10), (10, 11), (11, 12),
    (0, 13), (13, 14), (14, 15), (15, 16),
    (0, 17), (17, 18), (18, 19), (19, 20),
    (5, 9), (9, 13), (13, 17),
];

/// A single hand landmark.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    /// 0.0 to 1.0, normalized to image width
    pub x: f32,
    /// 0.0 to 1.0, normalized to image height
    pub y: f32,
    /// Depth relative to the wrist
    pub z: f32,
}

impl Landmark {
    /// Finite, and x/y within `MAX_NORMALIZED` of the frame.
    pub fn is_plausible(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.z.is_finite()
            && self.x.abs() <= MAX_NORMALIZED
            && self.y.abs() <= MAX_NORMALIZED
    }

    /// Pixel position inside a `width` x `height` frame (truncating, like the
    /// detector's own overlay code). x/y are clamped to +-MAX_NORMALIZED first
    /// so callers never see coordinates near the i32 limits.
    pub fn to_pixel(&self, width: usize, height: usize) -> Point {
        let x = self.x.clamp(-MAX_NORMALIZED, MAX_NORMALIZED);
        let y = self.y.clamp(-MAX_NORMALIZED, MAX_NORMALIZED);
        Point::new((x * width as f32) as i32, (y * height as f32) as i32)
    }
}

/// One detected hand.
#[derive(Clone, Debug)]
pub struct HandLandmarks {
    pub landmarks: [Landmark; landmarks::COUNT],
    /// Detector confidence, 0.0 to 1.0
    pub confidence: f32,
    /// "Left" or "Right" as reported by the detector
    pub handedness: String,
}

impl HandLandmarks {
    pub fn get(&self, index: usize) -> &Landmark {
        &self.landmarks[index]
    }

    /// Index fingertip in pixel coordinates; this is the brush position.
    pub fn index_tip(&self, width: usize, height: usize) -> Point {
        self.landmarks[landmarks::INDEX_FINGER_TIP].to_pixel(width, height)
    }

    /// All landmarks as pixel coordinates, for the skeleton overlay.
    pub fn to_pixels(&self, width: usize, height: usize) -> Vec<Point> {
        self.landmarks.iter().map(|lm| lm.to_pixel(width, height)).collect()
    }
}

/// Anything that can find (at most) one hand in a frame.
pub trait LandmarkProvider {
    /// `Ok(None)` means "no hand in this frame", which is not an error.
    fn detect(&mut self, frame: &FrameBuffer) -> Result<Option<HandLandmarks>, Error>;
}
