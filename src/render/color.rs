use colorsys::{Hsl, Rgb};

/// Straight (non-premultiplied) sRGB color with components in `[0, 1]`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Rgba = Rgba::rgb(1.0, 1.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Fully saturated, mid-lightness color for a hue in degrees
    pub fn from_hue(hue: f64) -> Self {
        let rgb = Rgb::from(Hsl::new(hue.rem_euclid(360.0), 100.0, 50.0, None));
        Self::rgb(
            (rgb.red() / 255.0) as f32,
            (rgb.green() / 255.0) as f32,
            (rgb.blue() / 255.0) as f32,
        )
    }

    /// Convert to linear space for sRGB render targets
    pub fn to_linear(self) -> Self {
        fn channel(c: f32) -> f32 {
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        Self {
            r: channel(self.r),
            g: channel(self.g),
            b: channel(self.b),
            a: self.a,
        }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}
