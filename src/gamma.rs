// Lookup tables for gamma-correct mixing of two 0x00RRGGBB pixels.
// Mixing in linear light keeps stroke edges from looking dark or haloed
// where they meet the camera image.

use crate::types::{pack_rgb, unpack_rgb};

pub struct GammaLut {
    // sRGB(0..255) -> linear (0..1)
    srgb_to_linear: [f32; 256],
    // linear(0..1) -> sRGB(0..255), index = (linear * 4095).round()
    linear_to_srgb: [u8; 4096],
}

impl GammaLut {
    /// Build both tables once at startup.
    pub fn new() -> Self {
        let mut s2l = [0.0f32; 256];
        for (v, slot) in s2l.iter_mut().enumerate() {
            let c = v as f32 / 255.0;
            *slot = if c <= 0.04045 { c / 12.92 } else { ((c + 0.055) / 1.055).powf(2.4) };
        }

        let mut l2s = [0u8; 4096];
        for (i, slot) in l2s.iter_mut().enumerate() {
            let l = i as f32 / 4095.0;
            let s = if l <= 0.003_130_8 { 12.92 * l } else { 1.055 * l.powf(1.0 / 2.4) - 0.055 };
            *slot = (s * 255.0).round().clamp(0.0, 255.0) as u8;
        }

        Self { srgb_to_linear: s2l, linear_to_srgb: l2s }
    }

    #[inline]
    fn to_linear(&self, v: u8) -> f32 {
        self.srgb_to_linear[v as usize]
    }

    #[inline]
    fn to_srgb(&self, l: f32) -> u8 {
        self.linear_to_srgb[(l.clamp(0.0, 1.0) * 4095.0).round() as usize]
    }

    /// `over` on top of `under` with opacity `t`, mixed in linear light.
    pub fn mix(&self, under: u32, over: u32, t: f32) -> u32 {
        let t = t.clamp(0.0, 1.0);
        if t <= 0.0 {
            return under;
        }
        if t >= 1.0 {
            return over;
        }
        let a = unpack_rgb(under);
        let b = unpack_rgb(over);
        let ch = |i: usize| {
            let l = (1.0 - t) * self.to_linear(a[i]) + t * self.to_linear(b[i]);
            self.to_srgb(l)
        };
        pack_rgb(ch(0), ch(1), ch(2))
    }
}
