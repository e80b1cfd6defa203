// Pose classification from a single frame's landmarks.
//
// A finger counts as extended when its tip sits higher in the image than its
// PIP joint (image y grows downward). The thumb is ignored.
//
//   index only            -> Draw
//   no finger (fist)      -> Pause
//   all four (open palm)  -> Clear
//   anything else/no hand -> Unknown
//
// There is no debouncing: every frame is classified on its own.

use std::fmt;

use crate::hand::{HandLandmarks, landmarks};

/// The classified pose of the current frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gesture {
    /// Index finger pointing: the pen is down.
    Draw,
    /// Fist: the pen is up.
    Pause,
    /// Open palm: wipe the canvas.
    Clear,
    /// No hand, or an ambiguous pose. Treated like `Pause`.
    Unknown,
}

impl Gesture {
    pub fn label(self) -> &'static str {
        match self {
            Gesture::Draw => "DRAW",
            Gesture::Pause => "PAUSE",
            Gesture::Clear => "CLEAR",
            Gesture::Unknown => "IDLE",
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Extended (`true`) / folded (`false`) per non-thumb finger.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FingerStates {
    pub index: bool,
    pub middle: bool,
    pub ring: bool,
    pub pinky: bool,
}

const FINGERS: [(usize, usize); 4] = [
    (landmarks::INDEX_FINGER_TIP, landmarks::INDEX_FINGER_PIP),
    (landmarks::MIDDLE_FINGER_TIP, landmarks::MIDDLE_FINGER_PIP),
    (landmarks::RING_FINGER_TIP, landmarks::RING_FINGER_PIP),
    (landmarks::PINKY_TIP, landmarks::PINKY_PIP),
];

impl FingerStates {
    pub fn from_hand(hand: &HandLandmarks) -> Self {
        let [index, middle, ring, pinky] =
            FINGERS.map(|(tip, pip)| hand.get(tip).y < hand.get(pip).y);
        Self { index, middle, ring, pinky }
    }

    /// Gesture for these finger states.
    pub fn gesture(self) -> Gesture {
        match (self.index, self.middle, self.ring, self.pinky) {
            (true, false, false, false) => Gesture::Draw,
            (false, false, false, false) => Gesture::Pause,
            (true, true, true, true) => Gesture::Clear,
            _ => Gesture::Unknown,
        }
    }
}

/// Classify the current frame. `None` (no hand) is always `Gesture::Unknown`.
pub fn classify(hand: Option<&HandLandmarks>) -> Gesture {
    match hand {
        Some(hand) => FingerStates::from_hand(hand).gesture(),
        None => Gesture::Unknown,
    }
}
