// PNG snapshots of what's on screen (S key).

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use image::{ImageBuffer, Rgb, RgbImage};

use crate::error::Error;
use crate::types::FrameBuffer;

/// Copy a 0x00RRGGBB buffer into an `image` RGB image.
pub fn to_rgb_image(fb: &FrameBuffer) -> Result<RgbImage, Error> {
    ImageBuffer::<Rgb<u8>, Vec<u8>>::from_raw(fb.width as u32, fb.height as u32, fb.to_rgb_bytes())
        .ok_or_else(|| Error::Snapshot(format!("{}x{} buffer has the wrong length", fb.width, fb.height)))
}

/// Write `<dir>/air-canvas-<stamp>-composite.png` and `...-canvas.png`.
/// Returns both paths.
pub fn save_pair(
    dir: &Path,
    composite: &FrameBuffer,
    canvas: &FrameBuffer,
) -> Result<[PathBuf; 2], Error> {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let paths = [
        dir.join(format!("air-canvas-{stamp}-composite.png")),
        dir.join(format!("air-canvas-{stamp}-canvas.png")),
    ];
    for (path, fb) in paths.iter().zip([composite, canvas]) {
        to_rgb_image(fb)?
            .save(path)
            .map_err(|e| Error::Snapshot(format!("{}: {e}", path.display())))?;
    }
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_keeps_channels() {
        let fb = FrameBuffer { width: 2, height: 1, pixels: vec![0x00_FF_00_00, 0x00_00_80_FF] };
        let img = to_rgb_image(&fb).unwrap();
        assert_eq!(img.get_pixel(0, 0), &Rgb([255, 0, 0]));
        assert_eq!(img.get_pixel(1, 0), &Rgb([0, 128, 255]));
    }

    #[test]
    fn inconsistent_buffer_is_rejected() {
        let fb = FrameBuffer { width: 3, height: 3, pixels: vec![0; 4] };
        assert!(matches!(to_rgb_image(&fb), Err(Error::Snapshot(_))));
    }

    #[test]
    fn saves_two_readable_pngs() {
        let dir = std::env::temp_dir().join(format!("air-canvas-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let a = FrameBuffer { width: 4, height: 3, pixels: vec![0x00_10_20_30; 12] };
        let b = FrameBuffer::blank(4, 3);
        let paths = save_pair(&dir, &a, &b).unwrap();
        for p in &paths {
            let img = image::open(p).unwrap();
            assert_eq!(img.to_rgb8().dimensions(), (4, 3));
        }
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
