use display_interface::DisplayError;
use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::primitives::{Primitive, PrimitiveStyle};
use embedded_graphics::Drawable;

use super::geometry::{Palette, PanelGeometry};
use crate::transport::PageTransport;
use crate::{FRAME_SIZE, NUM_PAGES, PAGE_SIZE};

/// Page transport that paints SH1106 pages onto a colour panel
///
/// A copy of every page received is kept, so switching flip mode on a running
/// panel repaints the current image in the new orientation right away.
pub struct Ili9341Emulation<D> {
    target: D,
    geometry: PanelGeometry,
    palette: Palette,
    shadow: [[u8; PAGE_SIZE]; NUM_PAGES],
    flip180: bool,
    initialized: bool,
}

impl<D> Ili9341Emulation<D>
where
    D: DrawTarget<Color = Rgb565>,
{
    /// Emulate on a 320x240 ILI9341, white on black
    pub fn new(target: D) -> Self {
        Self::with_config(target, PanelGeometry::ILI9341, Palette::default())
    }

    /// Emulate with an explicit geometry and palette
    pub fn with_config(target: D, geometry: PanelGeometry, palette: Palette) -> Self {
        Ili9341Emulation {
            target,
            geometry,
            palette,
            shadow: [[0; PAGE_SIZE]; NUM_PAGES],
            flip180: false,
            initialized: false,
        }
    }

    /// Panel geometry in use
    pub fn geometry(&self) -> &PanelGeometry {
        &self.geometry
    }

    /// Colours in use
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Last bytes received for page `index`
    pub fn page(&self, index: usize) -> Option<&[u8; PAGE_SIZE]> {
        self.shadow.get(index)
    }

    /// The underlying draw target
    pub fn target(&self) -> &D {
        &self.target
    }

    /// The underlying draw target, for drawing outside the active area
    pub fn target_mut(&mut self) -> &mut D {
        &mut self.target
    }

    /// Give the draw target back
    pub fn release(self) -> D {
        self.target
    }

    /// Repaint a whole frame at once
    ///
    /// Ignored until the panel has been initialised.
    pub fn update_display(&mut self, frame: &[u8; FRAME_SIZE]) -> Result<(), DisplayError> {
        if !self.initialized {
            log::debug!("Frame update before init ignored");
            return Ok(());
        }
        for (index, page) in frame.chunks_exact(PAGE_SIZE).enumerate() {
            self.shadow[index].copy_from_slice(page);
        }
        self.repaint()
    }

    fn repaint(&mut self) -> Result<(), DisplayError> {
        (0..NUM_PAGES).try_for_each(|index| self.paint_page(index))
    }

    fn paint_page(&mut self, index: usize) -> Result<(), DisplayError> {
        let page = self.shadow[index];
        for (column, &byte) in page.iter().enumerate() {
            for bit in 0..8 {
                let color = if (byte >> bit) & 1 != 0 {
                    self.palette.foreground
                } else {
                    self.palette.background
                };
                let block = self.geometry.block(column, index * 8 + bit, self.flip180);
                self.target
                    .fill_solid(&block, color)
                    .map_err(|_| DisplayError::BusWriteError)?;
            }
        }
        Ok(())
    }
}

impl<D> PageTransport for Ili9341Emulation<D>
where
    D: DrawTarget<Color = Rgb565>,
{
    fn init(&mut self) -> Result<(), DisplayError> {
        log::info!(
            "Initializing ILI9341 emulation, scale {} at ({}, {})",
            self.geometry.scale,
            self.geometry.offset_x,
            self.geometry.offset_y
        );
        self.shadow = [[0; PAGE_SIZE]; NUM_PAGES];
        self.target.clear(self.palette.background).map_err(|_| {
            log::error!("Failed to clear the ILI9341");
            DisplayError::BusWriteError
        })?;
        self.geometry
            .border()
            .into_styled(PrimitiveStyle::with_stroke(self.palette.border, 1))
            .draw(&mut self.target)
            .map_err(|_| DisplayError::BusWriteError)?;
        self.initialized = true;
        Ok(())
    }

    /// Blank the active area only, the border stays
    fn clear(&mut self) -> Result<(), DisplayError> {
        if !self.initialized {
            return Ok(());
        }
        self.shadow = [[0; PAGE_SIZE]; NUM_PAGES];
        let area = self.geometry.active_area();
        self.target
            .fill_solid(&area, self.palette.background)
            .map_err(|_| DisplayError::BusWriteError)
    }

    fn send_page(&mut self, index: usize, data: &[u8]) -> bool {
        if !self.initialized {
            log::warn!("Page {} sent before init", index);
            return false;
        }
        if index >= NUM_PAGES || data.len() != PAGE_SIZE {
            log::warn!("Rejecting page {} of {} bytes", index, data.len());
            return false;
        }

        self.shadow[index].copy_from_slice(data);
        match self.paint_page(index) {
            Ok(()) => true,
            Err(e) => {
                log::error!("Failed to paint page {}: {:?}", index, e);
                false
            }
        }
    }

    fn set_flip_mode(&mut self, flip180: bool) -> Result<(), DisplayError> {
        if self.flip180 == flip180 {
            return Ok(());
        }
        log::info!("ILI9341 emulation flip mode {}", flip180);
        self.flip180 = flip180;
        if self.initialized {
            self.repaint()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_graphics::pixelcolor::RgbColor;
    use embedded_graphics::prelude::{OriginDimensions, Pixel, Point, Size};

    const NATIVE_WIDTH: usize = 320;
    const NATIVE_HEIGHT: usize = 240;

    /// Native framebuffer standing in for the TFT
    struct Screen {
        pixels: Vec<Rgb565>,
        writes: usize,
    }

    impl Screen {
        fn new() -> Self {
            Screen {
                pixels: vec![Rgb565::RED; NATIVE_WIDTH * NATIVE_HEIGHT],
                writes: 0,
            }
        }

        fn at(&self, x: usize, y: usize) -> Rgb565 {
            self.pixels[y * NATIVE_WIDTH + x]
        }
    }

    impl OriginDimensions for Screen {
        fn size(&self) -> Size {
            Size::new(NATIVE_WIDTH as u32, NATIVE_HEIGHT as u32)
        }
    }

    impl DrawTarget for Screen {
        type Color = Rgb565;
        type Error = Infallible;

        fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            for Pixel(Point { x, y }, color) in pixels {
                if (0..NATIVE_WIDTH as i32).contains(&x) && (0..NATIVE_HEIGHT as i32).contains(&y)
                {
                    self.pixels[y as usize * NATIVE_WIDTH + x as usize] = color;
                    self.writes += 1;
                }
            }
            Ok(())
        }
    }

    #[derive(Debug)]
    struct Unplugged;

    impl OriginDimensions for Unplugged {
        fn size(&self) -> Size {
            Size::new(NATIVE_WIDTH as u32, NATIVE_HEIGHT as u32)
        }
    }

    impl DrawTarget for Unplugged {
        type Color = Rgb565;
        type Error = ();

        fn draw_iter<I>(&mut self, _pixels: I) -> Result<(), ()>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            Err(())
        }
    }

    fn panel() -> Ili9341Emulation<Screen> {
        let mut panel = Ili9341Emulation::new(Screen::new());
        panel.init().unwrap();
        panel
    }

    /// Colour of the block showing logical pixel (x, y), checked on all corners
    fn logical(panel: &Ili9341Emulation<Screen>, x: usize, y: usize) -> Rgb565 {
        let (nx, ny) = (32 + 2 * x, 56 + 2 * y);
        let screen = panel.target();
        let color = screen.at(nx, ny);
        assert_eq!(screen.at(nx + 1, ny), color);
        assert_eq!(screen.at(nx, ny + 1), color);
        assert_eq!(screen.at(nx + 1, ny + 1), color);
        color
    }

    #[test]
    fn test_refuses_pages_before_init() {
        let mut panel = Ili9341Emulation::new(Screen::new());
        assert!(!panel.send_page(0, &[0xFF; PAGE_SIZE]));
        assert_eq!(panel.target().writes, 0);
        assert!(panel.clear().is_ok());
        assert_eq!(panel.target().writes, 0);
    }

    #[test]
    fn test_init_clears_and_draws_border() {
        let panel = panel();
        let screen = panel.target();
        assert_eq!(screen.at(0, 0), Rgb565::BLACK);
        assert_eq!(screen.at(319, 239), Rgb565::BLACK);
        assert_eq!(screen.at(31, 55), Palette::DARK_GREY);
        assert_eq!(screen.at(288, 184), Palette::DARK_GREY);
        assert_eq!(screen.at(150, 55), Palette::DARK_GREY);
        assert_eq!(screen.at(31, 100), Palette::DARK_GREY);
        assert_eq!(screen.at(32, 56), Rgb565::BLACK);
        assert_eq!(screen.at(30, 54), Rgb565::BLACK);
    }

    #[test]
    fn test_page_bits_become_scaled_blocks() {
        let mut panel = panel();
        let mut page = [0u8; PAGE_SIZE];
        page[0] = 0b0000_0101;
        page[127] = 0x80;
        assert!(panel.send_page(2, &page));

        assert_eq!(logical(&panel, 0, 16), Rgb565::WHITE);
        assert_eq!(logical(&panel, 0, 17), Rgb565::BLACK);
        assert_eq!(logical(&panel, 0, 18), Rgb565::WHITE);
        assert_eq!(logical(&panel, 1, 16), Rgb565::BLACK);
        assert_eq!(logical(&panel, 127, 23), Rgb565::WHITE);
        // neighbours outside the page are untouched
        assert_eq!(logical(&panel, 0, 15), Rgb565::BLACK);
        assert_eq!(panel.page(2), Some(&page));
    }

    #[test]
    fn test_rejects_out_of_range_page() {
        let mut panel = panel();
        let writes = panel.target().writes;
        assert!(!panel.send_page(NUM_PAGES, &[0xFF; PAGE_SIZE]));
        assert!(!panel.send_page(0, &[0xFF; 3]));
        assert_eq!(panel.target().writes, writes);
    }

    #[test]
    fn test_flip_mirrors_both_axes() {
        let mut panel = panel();
        panel.set_flip_mode(true).unwrap();
        let mut page = [0u8; PAGE_SIZE];
        page[0] = 0x01;
        assert!(panel.send_page(0, &page));

        assert_eq!(logical(&panel, 127, 63), Rgb565::WHITE);
        assert_eq!(logical(&panel, 0, 0), Rgb565::BLACK);
    }

    #[test]
    fn test_flip_toggle_repaints_current_image() {
        let mut panel = panel();
        let mut page = [0u8; PAGE_SIZE];
        page[0] = 0x01;
        assert!(panel.send_page(0, &page));
        assert_eq!(logical(&panel, 0, 0), Rgb565::WHITE);

        panel.set_flip_mode(true).unwrap();
        assert_eq!(logical(&panel, 0, 0), Rgb565::BLACK);
        assert_eq!(logical(&panel, 127, 63), Rgb565::WHITE);

        panel.set_flip_mode(false).unwrap();
        assert_eq!(logical(&panel, 0, 0), Rgb565::WHITE);
        assert_eq!(logical(&panel, 127, 63), Rgb565::BLACK);
    }

    #[test]
    fn test_clear_blanks_active_area_only() {
        let mut panel = panel();
        assert!(panel.send_page(4, &[0xFF; PAGE_SIZE]));
        panel.target_mut().pixels[0] = Rgb565::GREEN;

        panel.clear().unwrap();
        assert_eq!(logical(&panel, 64, 35), Rgb565::BLACK);
        assert_eq!(panel.page(4), Some(&[0u8; PAGE_SIZE]));
        assert_eq!(panel.target().at(31, 55), Palette::DARK_GREY);
        assert_eq!(panel.target().at(0, 0), Rgb565::GREEN);
    }

    #[test]
    fn test_update_display_paints_whole_frame() {
        let mut panel = panel();
        let mut frame = [0u8; FRAME_SIZE];
        frame[0] = 0x01;
        frame[FRAME_SIZE - 1] = 0x80;
        panel.update_display(&frame).unwrap();

        assert_eq!(logical(&panel, 0, 0), Rgb565::WHITE);
        assert_eq!(logical(&panel, 127, 63), Rgb565::WHITE);
        assert_eq!(logical(&panel, 64, 32), Rgb565::BLACK);
    }

    #[test]
    fn test_custom_palette() {
        let palette = Palette {
            foreground: Rgb565::YELLOW,
            background: Rgb565::BLUE,
            border: Rgb565::RED,
        };
        let mut panel = Ili9341Emulation::with_config(Screen::new(), PanelGeometry::ILI9341, palette);
        panel.init().unwrap();
        assert!(panel.send_page(0, &[0x01; PAGE_SIZE]));
        assert_eq!(logical(&panel, 5, 0), Rgb565::YELLOW);
        assert_eq!(logical(&panel, 5, 1), Rgb565::BLUE);
        assert_eq!(panel.target().at(31, 55), Rgb565::RED);
    }

    #[test]
    fn test_draw_errors_surface() {
        let mut panel = Ili9341Emulation::new(Unplugged);
        assert!(matches!(panel.init(), Err(DisplayError::BusWriteError)));
        assert!(!panel.send_page(0, &[0; PAGE_SIZE]));
    }
}
