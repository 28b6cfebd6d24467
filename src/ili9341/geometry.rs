use embedded_graphics::pixelcolor::{Rgb565, RgbColor};
use embedded_graphics::prelude::{Point, Size};
use embedded_graphics::primitives::Rectangle;

use crate::{HEIGHT, WIDTH};

/// Where the logical frame lands on the native panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelGeometry {
    /// Native panel width in pixels
    pub native_width: u32,
    /// Native panel height in pixels
    pub native_height: u32,
    /// Native pixels per logical pixel, both axes
    pub scale: u32,
    /// Native column of logical x = 0
    pub offset_x: i32,
    /// Native row of logical y = 0
    pub offset_y: i32,
}

impl PanelGeometry {
    /// 320x240 ILI9341, frame shown at 256x128 in the middle
    pub const ILI9341: PanelGeometry = PanelGeometry::new(320, 240, 2);

    /// Geometry with the scaled frame centered on the panel
    pub const fn new(native_width: u32, native_height: u32, scale: u32) -> Self {
        let offset_x = (native_width as i32 - (WIDTH as u32 * scale) as i32) / 2;
        let offset_y = (native_height as i32 - (HEIGHT as u32 * scale) as i32) / 2;
        PanelGeometry {
            native_width,
            native_height,
            scale,
            offset_x,
            offset_y,
        }
    }

    /// The native rectangle covered by the frame
    pub fn active_area(&self) -> Rectangle {
        Rectangle::new(
            Point::new(self.offset_x, self.offset_y),
            Size::new(WIDTH as u32 * self.scale, HEIGHT as u32 * self.scale),
        )
    }

    /// One pixel outside the active area on every side
    pub(crate) fn border(&self) -> Rectangle {
        let area = self.active_area();
        Rectangle::new(
            area.top_left - Point::new(1, 1),
            area.size + Size::new(2, 2),
        )
    }

    /// The native block showing logical pixel (x, y)
    ///
    /// With `flip180` both axes are mirrored first.
    pub fn block(&self, x: usize, y: usize, flip180: bool) -> Rectangle {
        let (x, y) = if flip180 {
            (WIDTH - 1 - x, HEIGHT - 1 - y)
        } else {
            (x, y)
        };
        let scale = self.scale as i32;
        Rectangle::new(
            Point::new(
                self.offset_x + x as i32 * scale,
                self.offset_y + y as i32 * scale,
            ),
            Size::new_equal(self.scale),
        )
    }
}

impl Default for PanelGeometry {
    fn default() -> Self {
        PanelGeometry::ILI9341
    }
}

/// Colours of the emulated monochrome panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Lit pixels
    pub foreground: Rgb565,
    /// Dark pixels and everything outside the frame
    pub background: Rgb565,
    /// Outline around the active area
    pub border: Rgb565,
}

impl Palette {
    /// Dark grey, 0x7BEF
    pub const DARK_GREY: Rgb565 = Rgb565::new(15, 31, 15);
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            foreground: Rgb565::WHITE,
            background: Rgb565::BLACK,
            border: Palette::DARK_GREY,
        }
    }
}
