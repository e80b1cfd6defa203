// Hand landmarks from MediaPipe, running in a helper process.
//
// There is no MediaPipe for Rust, so a small Python script
// (scripts/hand_landmarks.py) owns the model. The protocol is strictly
// request/response over the child's stdio:
//
//   1. on startup the helper prints READY;
//   2. per frame we write width, height, channels as little-endian u32,
//      then width * height * 3 RGB bytes;
//   3. the helper answers with one JSON line:
//      {"hands": [{"handedness": "Right", "score": 0.97, "landmarks": [{"x":..,"y":..,"z":..}, ...]}], "error": null}
//
// The helper runs in its own process group so a Ctrl+C in the terminal only
// reaches us; we stop it ourselves on drop.

use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use serde::Deserialize;

use crate::error::Error;
use crate::hand::{HandLandmarks, Landmark, LandmarkProvider, landmarks};
use crate::types::FrameBuffer;

#[derive(Deserialize, Debug)]
struct LandmarkJson {
    x: f32,
    y: f32,
    #[serde(default)]
    z: f32,
}

#[derive(Deserialize, Debug)]
struct HandJson {
    handedness: String,
    score: f32,
    landmarks: Vec<LandmarkJson>,
}

#[derive(Deserialize, Debug)]
struct DetectionResult {
    #[serde(default)]
    hands: Vec<HandJson>,
    #[serde(default)]
    error: Option<String>,
}

/// Landmark provider backed by the MediaPipe helper process.
pub struct MediaPipeProcess {
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    confidence_threshold: f32,
}

impl MediaPipeProcess {
    /// Start `python script` and wait for it to report `READY`.
    pub fn spawn(python: &Path, script: &Path, confidence_threshold: f32) -> Result<Self, Error> {
        if !script.exists() {
            return Err(Error::DetectorInit(format!(
                "hand landmark helper not found at {}",
                script.display()
            )));
        }

        log::info!("starting hand landmark helper: {} {}", python.display(), script.display());

        let mut cmd = Command::new(python);
        cmd.arg(script)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }
        let mut process = cmd
            .spawn()
            .map_err(|e| Error::DetectorInit(format!("spawn {}: {e}", python.display())))?;

        let (Some(stdin), Some(stdout)) = (process.stdin.take(), process.stdout.take()) else {
            let _ = process.kill();
            return Err(Error::DetectorInit("helper stdio not captured".into()));
        };
        let mut stdout = BufReader::new(stdout);

        let mut ready = String::new();
        let failure = match stdout.read_line(&mut ready) {
            Err(e) => Some(format!("waiting for READY: {e}")),
            Ok(_) if ready.trim() != "READY" => {
                Some(format!("helper did not signal READY, got {:?}", ready.trim()))
            }
            Ok(_) => None,
        };
        if let Some(msg) = failure {
            let _ = process.kill();
            let _ = process.wait();
            return Err(Error::DetectorInit(msg));
        }

        log::info!("hand landmark helper ready (min confidence {confidence_threshold:.2})");

        Ok(Self {
            process,
            stdin,
            stdout,
            confidence_threshold: confidence_threshold.clamp(0.0, 1.0),
        })
    }

    /// OS process id of the helper.
    pub fn id(&self) -> u32 {
        self.process.id()
    }

    fn send_frame(&mut self, frame: &FrameBuffer) -> std::io::Result<()> {
        let header = [frame.width as u32, frame.height as u32, 3u32];
        for v in header {
            self.stdin.write_all(&v.to_le_bytes())?;
        }
        self.stdin.write_all(&frame.to_rgb_bytes())?;
        self.stdin.flush()
    }
}

impl LandmarkProvider for MediaPipeProcess {
    fn detect(&mut self, frame: &FrameBuffer) -> Result<Option<HandLandmarks>, Error> {
        if frame.width == 0 || frame.height == 0 {
            return Ok(None);
        }

        self.send_frame(frame)
            .map_err(|e| Error::Detector(format!("send frame: {e}")))?;

        let mut response = String::new();
        let n = self
            .stdout
            .read_line(&mut response)
            .map_err(|e| Error::Detector(format!("read response: {e}")))?;
        if n == 0 {
            return Err(Error::Detector("helper closed its output".into()));
        }

        parse_response(&response, self.confidence_threshold)
    }
}

impl Drop for MediaPipeProcess {
    fn drop(&mut self) {
        let _ = self.process.kill();
        let _ = self.process.wait();
        log::debug!("hand landmark helper stopped");
    }
}

/// Decode one response line and pick the first hand that qualifies.
fn parse_response(line: &str, confidence_threshold: f32) -> Result<Option<HandLandmarks>, Error> {
    let result: DetectionResult = serde_json::from_str(line.trim())
        .map_err(|e| Error::Detector(format!("bad response {:?}: {e}", line.trim())))?;

    if let Some(error) = result.error {
        log::warn!("hand landmark helper reported: {error}");
        return Ok(None);
    }

    for hand in result.hands {
        if hand.score < confidence_threshold {
            log::trace!("skipping {} hand, score {:.2}", hand.handedness, hand.score);
            continue;
        }
        if hand.landmarks.len() != landmarks::COUNT {
            log::warn!("expected {} landmarks, got {}", landmarks::COUNT, hand.landmarks.len());
            continue;
        }

        let mut lms = [Landmark::default(); landmarks::COUNT];
        for (slot, lm) in lms.iter_mut().zip(&hand.landmarks) {
            *slot = Landmark { x: lm.x, y: lm.y, z: lm.z };
        }
        if !lms.iter().all(Landmark::is_plausible) {
            log::warn!("dropping {} hand with out-of-range landmarks", hand.handedness);
            continue;
        }

        return Ok(Some(HandLandmarks {
            landmarks: lms,
            confidence: hand.score,
            handedness: hand.handedness,
        }));
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand_json(score: f32, count: usize) -> String {
        let lms: Vec<String> = (0..count)
            .map(|i| format!(r#"{{"x":{},"y":0.5,"z":0.0}}"#, i as f32 / 100.0))
            .collect();
        format!(
            r#"{{"handedness":"Left","score":{score},"landmarks":[{}]}}"#,
            lms.join(",")
        )
    }

    #[test]
    fn accepts_a_confident_hand() {
        let line = format!(r#"{{"hands":[{}],"error":null}}"#, hand_json(0.95, 21));
        let hand = parse_response(&line, 0.7).unwrap().unwrap();
        assert_eq!(hand.handedness, "Left");
        assert_eq!(hand.landmarks[landmarks::INDEX_FINGER_TIP].x, 0.08);
        assert_eq!(hand.confidence, 0.95);
    }

    #[test]
    fn empty_result_is_no_hand() {
        assert!(parse_response(r#"{"hands":[]}"#, 0.5).unwrap().is_none());
    }

    #[test]
    fn low_score_is_skipped_in_favor_of_next() {
        let line = format!(
            r#"{{"hands":[{},{}]}}"#,
            hand_json(0.2, 21),
            hand_json(0.8, 21)
        );
        let hand = parse_response(&line, 0.5).unwrap().unwrap();
        assert_eq!(hand.confidence, 0.8);
    }

    #[test]
    fn wrong_landmark_count_is_skipped() {
        let line = format!(r#"{{"hands":[{}]}}"#, hand_json(0.9, 20));
        assert!(parse_response(&line, 0.5).unwrap().is_none());
    }

    #[test]
    fn helper_error_is_no_hand() {
        let line = r#"{"hands":[],"error":"decode failed"}"#;
        assert!(parse_response(line, 0.5).unwrap().is_none());
    }

    #[test]
    fn garbage_is_a_detector_error() {
        assert!(matches!(parse_response("Traceback (most recent call last):", 0.5), Err(Error::Detector(_))));
    }

    #[test]
    fn out_of_range_landmarks_are_dropped() {
        let good = hand_json(0.9, 21);
        for bad in ["1e10", "1e39", "-3.5"] {
            let hand = good.replacen(r#""x":0.08"#, &format!(r#""x":{bad}"#), 1);
            let line = format!(r#"{{"hands":[{hand}]}}"#);
            assert!(!matches!(parse_response(&line, 0.5), Ok(Some(_))), "x={bad}");
        }
        // one bad hand does not hide a good one behind it
        let wild = good.replacen(r#""x":0.08"#, r#""x":1e10"#, 1);
        let line = format!(r#"{{"hands":[{wild},{good}]}}"#);
        assert!(parse_response(&line, 0.5).unwrap().is_some());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn helper_runs_in_its_own_process_group() {
        let script = std::env::temp_dir().join(format!("air-canvas-helper-{}.sh", std::process::id()));
        std::fs::write(&script, "echo READY\nexec sleep 30\n").unwrap();
        let helper = MediaPipeProcess::spawn(Path::new("sh"), &script, 0.5).unwrap();
        let pid = helper.id();
        let stat = std::fs::read_to_string(format!("/proc/{pid}/stat")).unwrap();
        // fields after the ")" that closes the command name: state ppid pgrp ...
        let rest = &stat[stat.rfind(')').unwrap() + 2..];
        let pgrp: u32 = rest.split_whitespace().nth(2).unwrap().parse().unwrap();
        assert_eq!(pgrp, pid);
        drop(helper);
        std::fs::remove_file(&script).ok();
    }

    #[test]
    fn missing_helper_script_fails_to_start() {
        let err = MediaPipeProcess::spawn(
            Path::new("python3"),
            Path::new("/definitely/not/here/hand_landmarks.py"),
            0.5,
        );
        assert!(matches!(err, Err(Error::DetectorInit(_))));
    }
}
