// Runtime settings.
// There are no command-line flags; every knob has a default and can be
// overridden with an AIR_CANVAS_* environment variable.

use std::path::PathBuf;
use std::str::FromStr;

use crate::error::Error;

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub camera_index: u32,
    pub width: u32,
    pub height: u32,
    /// 0x00RRGGBB
    pub stroke_color: u32,
    pub stroke_width: u32,
    /// How strongly strokes cover the camera image, 0..=1.
    pub overlay_alpha: f32,
    /// Cursor EMA momentum, 0 = off.
    pub smoothing: f32,
    /// Minimum detector score for a hand to count.
    pub confidence: f32,
    pub python: PathBuf,
    pub detector_script: PathBuf,
    pub snapshot_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            camera_index: 0,
            width: 640,
            height: 480,
            stroke_color: 0x00_FF_BF_00,
            stroke_width: 6,
            overlay_alpha: 0.8,
            smoothing: 0.75,
            confidence: 0.7,
            python: PathBuf::from("python3"),
            detector_script: PathBuf::from("scripts/hand_landmarks.py"),
            snapshot_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let mut cfg = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("AIR_CANVAS_CAMERA") {
            cfg.camera_index = parse("AIR_CANVAS_CAMERA", &v)?;
        }
        if let Some(v) = get("AIR_CANVAS_WIDTH") {
            cfg.width = parse("AIR_CANVAS_WIDTH", &v)?;
        }
        if let Some(v) = get("AIR_CANVAS_HEIGHT") {
            cfg.height = parse("AIR_CANVAS_HEIGHT", &v)?;
        }
        if let Some(v) = get("AIR_CANVAS_STROKE_COLOR") {
            cfg.stroke_color = parse_hex_color(&v)?;
        }
        if let Some(v) = get("AIR_CANVAS_STROKE_WIDTH") {
            cfg.stroke_width = parse("AIR_CANVAS_STROKE_WIDTH", &v)?;
            if cfg.stroke_width == 0 {
                return Err(Error::Config("AIR_CANVAS_STROKE_WIDTH must be at least 1".into()));
            }
        }
        if let Some(v) = get("AIR_CANVAS_OVERLAY_ALPHA") {
            let a = parse_finite("AIR_CANVAS_OVERLAY_ALPHA", &v)?;
            if !(0.0..=1.0).contains(&a) {
                return Err(Error::Config(format!("AIR_CANVAS_OVERLAY_ALPHA={v} is outside 0..=1")));
            }
            cfg.overlay_alpha = a;
        }
        if let Some(v) = get("AIR_CANVAS_SMOOTHING") {
            let m = parse_finite("AIR_CANVAS_SMOOTHING", &v)?;
            cfg.smoothing = m.clamp(0.0, 0.99);
        }
        if let Some(v) = get("AIR_CANVAS_CONFIDENCE") {
            let c = parse_finite("AIR_CANVAS_CONFIDENCE", &v)?;
            cfg.confidence = c.clamp(0.0, 1.0);
        }
        if let Some(v) = get("AIR_CANVAS_PYTHON") {
            cfg.python = PathBuf::from(v);
        }
        if let Some(v) = get("AIR_CANVAS_DETECTOR_SCRIPT") {
            cfg.detector_script = PathBuf::from(v);
        }
        if let Some(v) = get("AIR_CANVAS_SNAPSHOT_DIR") {
            cfg.snapshot_dir = PathBuf::from(v);
        }
        Ok(cfg)
    }
}

fn parse<T>(key: &str, value: &str) -> Result<T, Error>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| Error::Config(format!("{key}={value}: {e}")))
}

/// A float that is an actual number (no NaN or infinity).
fn parse_finite(key: &str, value: &str) -> Result<f32, Error> {
    let x: f32 = parse(key, value)?;
    if !x.is_finite() {
        return Err(Error::Config(format!("{key}={value}: not a finite number")));
    }
    Ok(x)
}

/// `RRGGBB`, optionally prefixed with `#` or `0x`. Black is refused: the
/// canvas window is black, so black ink would never show.
fn parse_hex_color(value: &str) -> Result<u32, Error> {
    let v = value.trim();
    let hex = v
        .strip_prefix('#')
        .or_else(|| v.strip_prefix("0x"))
        .unwrap_or(v);
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::Config(format!("AIR_CANVAS_STROKE_COLOR={value}: expected RRGGBB")));
    }
    let color = u32::from_str_radix(hex, 16)
        .map_err(|e| Error::Config(format!("AIR_CANVAS_STROKE_COLOR={value}: {e}")))?;
    if color == 0 {
        return Err(Error::Config(format!(
            "AIR_CANVAS_STROKE_COLOR={value}: black strokes are invisible on the canvas"
        )));
    }
    Ok(color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from(pairs: &[(&str, &str)]) -> Result<Config, Error> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(from(&[]).unwrap(), Config::default());
    }

    #[test]
    fn overrides_apply() {
        let cfg = from(&[
            ("AIR_CANVAS_CAMERA", "2"),
            ("AIR_CANVAS_WIDTH", "1280"),
            ("AIR_CANVAS_HEIGHT", " 720 "),
            ("AIR_CANVAS_STROKE_COLOR", "#00ff7f"),
            ("AIR_CANVAS_STROKE_WIDTH", "10"),
            ("AIR_CANVAS_SMOOTHING", "3"),
            ("AIR_CANVAS_DETECTOR_SCRIPT", "/opt/hands.py"),
        ])
        .unwrap();
        assert_eq!(cfg.camera_index, 2);
        assert_eq!((cfg.width, cfg.height), (1280, 720));
        assert_eq!(cfg.stroke_color, 0x00_00_FF_7F);
        assert_eq!(cfg.stroke_width, 10);
        assert_eq!(cfg.smoothing, 0.99);
        assert_eq!(cfg.detector_script, PathBuf::from("/opt/hands.py"));
    }

    #[test]
    fn blank_values_are_ignored() {
        assert_eq!(from(&[("AIR_CANVAS_CAMERA", "  ")]).unwrap().camera_index, 0);
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(matches!(from(&[("AIR_CANVAS_CAMERA", "front")]), Err(Error::Config(_))));
        assert!(matches!(from(&[("AIR_CANVAS_STROKE_COLOR", "orange")]), Err(Error::Config(_))));
        assert!(matches!(from(&[("AIR_CANVAS_STROKE_COLOR", "FFF")]), Err(Error::Config(_))));
        assert!(matches!(from(&[("AIR_CANVAS_STROKE_WIDTH", "0")]), Err(Error::Config(_))));
        assert!(matches!(from(&[("AIR_CANVAS_OVERLAY_ALPHA", "1.5")]), Err(Error::Config(_))));
        assert!(matches!(from(&[("AIR_CANVAS_STROKE_COLOR", "+FFFFF")]), Err(Error::Config(_))));
    }

    #[test]
    fn non_numbers_and_black_ink_are_rejected() {
        for key in ["AIR_CANVAS_OVERLAY_ALPHA", "AIR_CANVAS_SMOOTHING", "AIR_CANVAS_CONFIDENCE"] {
            for bad in ["NaN", "inf", "-inf"] {
                assert!(matches!(from(&[(key, bad)]), Err(Error::Config(_))), "{key}={bad}");
            }
        }
        assert!(matches!(from(&[("AIR_CANVAS_STROKE_COLOR", "000000")]), Err(Error::Config(_))));
        assert!(matches!(from(&[("AIR_CANVAS_STROKE_COLOR", "#000000")]), Err(Error::Config(_))));
        assert_eq!(from(&[("AIR_CANVAS_STROKE_COLOR", "000001")]).unwrap().stroke_color, 1);
    }
}
