// Core types shared by the capture, drawing and compositing steps.

#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the frame is on screen (pixels)
    pub height: usize,     // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    /// An all-black frame (every pixel 0).
    pub fn blank(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }

    /// Pixel at (x,y), or None when outside the frame.
    pub fn get(&self, x: i32, y: i32) -> Option<u32> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }

    /// Mirror the frame left-to-right in place (selfie view).
    pub fn flip_horizontal(&mut self) {
        if self.width == 0 {
            return;
        }
        for row in self.pixels.chunks_exact_mut(self.width) {
            row.reverse();
        }
    }

    /// Unpack into tightly packed RGB bytes (3 per pixel, row-major).
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 3);
        for &px in &self.pixels {
            let [r, g, b] = unpack_rgb(px);
            out.extend_from_slice(&[r, g, b]);
        }
        out
    }
}

/// Per-pixel ink coverage in [0,1]; 0 = nothing drawn, 1 = solid stroke.
#[derive(Clone)]
pub struct Mask {
    pub width: usize,
    pub height: usize,
    pub alpha: Vec<f32>,   // length = width * height
}

impl Mask {
    pub fn empty(width: usize, height: usize) -> Self {
        Self { width, height, alpha: vec![0.0; width * height] }
    }
}

/// Integer pixel coordinate (may lie outside the frame; drawing clips).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[inline]
pub fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

#[inline]
pub fn unpack_rgb(px: u32) -> [u8; 3] {
    [((px >> 16) & 0xFF) as u8, ((px >> 8) & 0xFF) as u8, (px & 0xFF) as u8]
}

/// Mix `over` onto `under` by `t` in [0,1], per channel.
#[inline]
pub fn lerp_rgb(under: u32, over: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let a = unpack_rgb(under);
    let b = unpack_rgb(over);
    let mix = |i: usize| (a[i] as f32 + (b[i] as f32 - a[i] as f32) * t).round() as u8;
    pack_rgb(mix(0), mix(1), mix(2))
}
