// One error type for the whole app.
// Every variant states *where* things went wrong.
use std::fmt::{self, Display};

#[derive(Debug)]
pub enum Error {
    Config(String),       // An AIR_CANVAS_* variable could not be parsed
    WindowInit(String),   // Creating a window failed
    WindowUpdate(String), // Updating a window buffer failed
    CameraInit(String),   // Opening/starting the camera failed
    CameraFrame(String),  // Grabbing/decoding a frame failed
    DetectorInit(String), // Starting the landmark helper failed
    Detector(String),     // Talking to the landmark helper failed
    Snapshot(String),     // Writing a PNG snapshot failed
}

impl Display for Error {
    // This decides how the error is printed to your console.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(s) => write!(f, "Config error: {s}"),
            Error::WindowInit(s) => write!(f, "Window init error: {s}"),
            Error::WindowUpdate(s) => write!(f, "Window update error: {s}"),
            Error::CameraInit(s) => write!(f, "Camera init error: {s}"),
            Error::CameraFrame(s) => write!(f, "Camera frame error: {s}"),
            Error::DetectorInit(s) => write!(f, "Detector init error: {s}"),
            Error::Detector(s) => write!(f, "Detector error: {s}"),
            Error::Snapshot(s) => write!(f, "Snapshot error: {s}"),
        }
    }
}

impl std::error::Error for Error {}
