//! Two-colour palette used by renderers. Purely cosmetic: nothing in the
//! simulation reads it.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    /// Shifts every channel one slot to the right: `(r, g, b) -> (b, r, g)`.
    pub fn rotate(self) -> Self {
        let [r, g, b] = self.0;
        Self([b, r, g])
    }

    /// Channels scaled to `0.0..=1.0`, alpha fixed at 1.
    pub fn to_f32(self) -> [f32; 4] {
        let [r, g, b] = self.0;
        [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]
    }

    /// Same as [`Rgb::to_f32`] but decoded from sRGB, for sRGB render targets
    /// that re-encode on write.
    pub fn to_linear_f32(self) -> [f32; 4] {
        let [r, g, b, a] = self.to_f32();
        [srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b), a]
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub cell_color: Rgb,
    pub grid_line_color: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            cell_color: Rgb::new(0, 255, 65),
            grid_line_color: Rgb::new(0, 143, 17),
        }
    }
}

impl Palette {
    pub fn cycle(&mut self) {
        self.cell_color = self.cell_color.rotate();
        self.grid_line_color = self.grid_line_color.rotate();
    }
}
