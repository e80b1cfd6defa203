// Air Canvas: draw in the air with your index finger.
// • Point with the index finger: draw.
// • Make a fist: pen up.
// • Open palm: wipe the canvas.
// • S saves PNG snapshots, Q or ESC quits (Ctrl+C works too).
//
// Two windows: the mirrored camera with strokes, skeleton and cursor on top,
// and the bare canvas.

mod camera;
mod canvas;
mod compose;
mod config;
mod detector;
mod draw;
mod error;
mod gamma;
mod gesture;
mod hand;
mod pipeline;
mod smooth;
mod snapshot;
mod stroke;
mod types;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use anyhow::Context;
use log::LevelFilter;

use camera::{CameraCapture, FrameSource};
use compose::draw_hud;
use config::Config;
use detector::MediaPipeProcess;
use draw::Drawer;
use error::Error;
use pipeline::Pipeline;

fn init_logger() {
    env_logger::Builder::new()
        .filter(Some(env!("CARGO_CRATE_NAME")), LevelFilter::Info)
        .parse_default_env()
        .try_init()
        .ok();
}

fn main() -> anyhow::Result<()> {
    init_logger();
    run()
}

/// A frame that fails after Ctrl+C is part of shutting down, not a crash.
fn frame_error_ends_quietly(err: Error, interrupted: bool) -> Result<(), Error> {
    if interrupted {
        log::info!("interrupted while processing a frame ({err}), shutting down");
        Ok(())
    } else {
        Err(err)
    }
}

fn run() -> anyhow::Result<()> {
    let config = Config::from_env().context("reading AIR_CANVAS_* settings")?;
    log::debug!("{config:?}");

    // Ctrl+C only flips a flag; the loop notices it and shuts down cleanly.
    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = Arc::clone(&stop);
        ctrlc::set_handler(move || stop.store(true, Ordering::SeqCst))
            .context("installing Ctrl+C handler")?;
    }

    /* --- Camera, detector, windows --- */
    let mut cam = CameraCapture::new(config.camera_index, config.width, config.height)
        .context("unable to access the webcam, make sure a camera is connected")?;
    let (w, h) = cam.resolution();
    let (w, h) = (w as usize, h as usize);

    let detector = MediaPipeProcess::spawn(&config.python, &config.detector_script, config.confidence)
        .context("starting the hand landmark detector")?;

    let mut main_window = Drawer::new("Air Canvas", w, h)?;
    let mut canvas_window = Drawer::new("Canvas", w, h)?;

    let mut pipeline = Pipeline::new(detector, &config, w, h);

    /* --- HUD / FPS --- */
    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;
    let mut hud_fps_text = String::from("FPS: 0.0");

    /* ------------------------------ Main loop ------------------------------ */
    loop {
        if stop.load(Ordering::SeqCst) {
            log::info!("interrupted, shutting down");
            break;
        }
        if !main_window.is_open() || !canvas_window.is_open() {
            break;
        }
        if main_window.quit_pressed() || canvas_window.quit_pressed() {
            break;
        }

        // A dead stream ends the session; it is not retried.
        let mut frame = match cam.read() {
            Ok(frame) => frame,
            Err(e) => {
                log::warn!("stream ended or cannot read from webcam ({e}), exiting");
                break;
            }
        };
        frame.flip_horizontal();

        let outcome = match pipeline.process(&mut frame) {
            Ok(outcome) => outcome,
            Err(e) => {
                frame_error_ends_quietly(e, stop.load(Ordering::SeqCst))?;
                break;
            }
        };

        log::trace!("{:?}", outcome.action);
        let gesture_line = match (&outcome.hand, outcome.cursor) {
            (Some(hand), Some(c)) => format!(
                "Gesture: {} | {} {},{}",
                outcome.gesture, hand.handedness, c.x, c.y
            ),
            _ => format!("Gesture: {} | no hand", outcome.gesture),
        };
        draw_hud(
            &mut frame,
            &[
                &gesture_line,
                "Index = draw, fist = stop, palm = clear",
                "S = save, Q/Esc = quit",
                &hud_fps_text,
            ],
        );

        main_window.present(&frame)?;
        canvas_window.present(pipeline.canvas().image())?;

        if main_window.s_pressed_once() || canvas_window.s_pressed_once() {
            match snapshot::save_pair(&config.snapshot_dir, &frame, pipeline.canvas().image()) {
                Ok([a, b]) => log::info!("saved {} and {}", a.display(), b.display()),
                Err(e) => log::warn!("{e}"),
            }
        }

        frames_this_second += 1;
        let now = Instant::now();
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            let fps = frames_this_second as f32 / secs;
            log::info!("FPS: {fps:.1}");
            hud_fps_text = format!("FPS: {fps:.1}");
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    // Dropping the pipeline stops the helper, dropping `cam` releases the stream,
    // and the windows close with their drawers.
    log::info!("bye");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detector_failure_after_ctrl_c_is_a_clean_exit() {
        let err = Error::Detector("helper closed its output".into());
        assert!(frame_error_ends_quietly(err, true).is_ok());
    }

    #[test]
    fn detector_failure_without_ctrl_c_is_reported() {
        let err = Error::Detector("helper closed its output".into());
        assert!(matches!(frame_error_ends_quietly(err, false), Err(Error::Detector(_))));
    }
}
