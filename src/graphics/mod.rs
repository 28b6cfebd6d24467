//! Drawing into one bound frame
//!
//! A [`Graphics`] context borrows one frame for the length of a draw session;
//! [`Graphics::begin`] and [`Graphics::end`] bracket that session. All
//! coordinates are logical pixels. Anything outside the 128x64 area is
//! silently skipped: drawing never fails and never panics.
//!
//! The context is also an `embedded-graphics` [`DrawTarget`] with
//! [`BinaryColor`], so the primitives and mono fonts of that crate can be
//! mixed with the native calls below.

pub mod font;

use core::convert::Infallible;
use core::fmt;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

use crate::{FRAME_SIZE, HEIGHT, WIDTH};

/// Whether [`Graphics::begin`] zeroes the frame first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearFrame {
    /// Draw over the previous contents
    Disable,
    /// Start from an empty frame
    Enable,
}

/// Drawing context bound to one frame
pub struct Graphics<'a> {
    frame: &'a mut [u8; FRAME_SIZE],
    print_x: i32,
    print_y: i32,
}

#[inline]
fn locate(x: i32, y: i32) -> Option<(usize, u8)> {
    if x < 0 || y < 0 || x >= WIDTH as i32 || y >= HEIGHT as i32 {
        return None;
    }
    let (x, y) = (x as usize, y as usize);
    Some(((y / 8) * WIDTH + x, 1 << (y % 8)))
}

/// Clip the half-open span `start..start + len` to `0..limit`
#[inline]
fn clip_span(start: i32, len: i32, limit: usize) -> Option<(usize, usize)> {
    if len <= 0 {
        return None;
    }
    let lo = start.max(0);
    let hi = start.saturating_add(len).min(limit as i32);
    if lo >= hi {
        return None;
    }
    Some((lo as usize, hi as usize))
}

const OUT_LEFT: u8 = 1;
const OUT_RIGHT: u8 = 2;
const OUT_TOP: u8 = 4;
const OUT_BOTTOM: u8 = 8;

fn outcode(x: i64, y: i64) -> u8 {
    let mut code = 0;
    if x < 0 {
        code |= OUT_LEFT;
    } else if x >= WIDTH as i64 {
        code |= OUT_RIGHT;
    }
    if y < 0 {
        code |= OUT_TOP;
    } else if y >= HEIGHT as i64 {
        code |= OUT_BOTTOM;
    }
    code
}

/// Cohen-Sutherland clip of a segment to the frame, `None` if it misses
fn clip_line(x0: i32, y0: i32, x1: i32, y1: i32) -> Option<(i32, i32, i32, i32)> {
    let (mut x0, mut y0, mut x1, mut y1) = (
        i64::from(x0),
        i64::from(y0),
        i64::from(x1),
        i64::from(y1),
    );
    let (x_max, y_max) = (WIDTH as i64 - 1, HEIGHT as i64 - 1);
    let mut code0 = outcode(x0, y0);
    let mut code1 = outcode(x1, y1);

    // every pass pins one end to an edge, so a handful of passes settle it
    for _ in 0..8 {
        if code0 | code1 == 0 {
            return Some((x0 as i32, y0 as i32, x1 as i32, y1 as i32));
        }
        if code0 & code1 != 0 {
            return None;
        }
        let code = if code0 != 0 { code0 } else { code1 };
        // products of two 33-bit spans need 66 bits
        let along = |from: i64, span: i64, num: i64, den: i64| -> i64 {
            (i128::from(from) + i128::from(span) * i128::from(num) / i128::from(den)) as i64
        };
        let (x, y) = if code & OUT_TOP != 0 {
            (along(x0, x1 - x0, -y0, y1 - y0), 0)
        } else if code & OUT_BOTTOM != 0 {
            (along(x0, x1 - x0, y_max - y0, y1 - y0), y_max)
        } else if code & OUT_LEFT != 0 {
            (0, along(y0, y1 - y0, -x0, x1 - x0))
        } else {
            (x_max, along(y0, y1 - y0, x_max - x0, x1 - x0))
        };
        if code == code0 {
            (x0, y0) = (x, y);
            code0 = outcode(x0, y0);
        } else {
            (x1, y1) = (x, y);
            code1 = outcode(x1, y1);
        }
    }
    None
}

/// Rounded integer square root
fn round_sqrt(v: i64) -> i64 {
    if v <= 0 {
        return 0;
    }
    // Newton from above
    let mut x = v;
    let mut next = (x + 1) / 2;
    while next < x {
        x = next;
        next = (x + v / x) / 2;
    }
    if v - x * x > x {
        x + 1
    } else {
        x
    }
}

impl<'a> Graphics<'a> {
    /// Bind `frame` and reset the print position to the top-left corner
    pub fn begin(frame: &'a mut [u8; FRAME_SIZE], clear_frame: ClearFrame) -> Self {
        if clear_frame == ClearFrame::Enable {
            frame.fill(0);
        }
        Graphics {
            frame,
            print_x: 0,
            print_y: 0,
        }
    }

    /// Finish the session and release the frame
    pub fn end(self) {}

    /// The bound frame
    pub fn frame(&self) -> &[u8; FRAME_SIZE] {
        self.frame
    }

    /// Whether the pixel at (`x`, `y`) is set; `false` outside the frame
    pub fn pixel(&self, x: i32, y: i32) -> bool {
        locate(x, y).is_some_and(|(index, mask)| self.frame[index] & mask != 0)
    }

    /// Turn the pixel at (`x`, `y`) on
    pub fn set_pixel(&mut self, x: i32, y: i32) {
        if let Some((index, mask)) = locate(x, y) {
            self.frame[index] |= mask;
        }
    }

    /// Turn the pixel at (`x`, `y`) off
    pub fn clear_pixel(&mut self, x: i32, y: i32) {
        if let Some((index, mask)) = locate(x, y) {
            self.frame[index] &= !mask;
        }
    }

    fn invert_pixel(&mut self, x: i32, y: i32) {
        if let Some((index, mask)) = locate(x, y) {
            self.frame[index] ^= mask;
        }
    }

    /// Set `w` pixels to the right of (`x`, `y`), inclusive
    pub fn draw_hline(&mut self, x: i32, y: i32, w: i32) {
        if y < 0 || y >= HEIGHT as i32 {
            return;
        }
        let Some((x0, x1)) = clip_span(x, w, WIDTH) else {
            return;
        };
        let row = (y as usize / 8) * WIDTH;
        let mask = 1 << (y as usize % 8);
        for byte in &mut self.frame[row + x0..row + x1] {
            *byte |= mask;
        }
    }

    /// Set `h` pixels down from (`x`, `y`), inclusive
    pub fn draw_vline(&mut self, x: i32, y: i32, h: i32) {
        if x < 0 || x >= WIDTH as i32 {
            return;
        }
        let Some((y0, y1)) = clip_span(y, h, HEIGHT) else {
            return;
        };
        for y in y0..y1 {
            self.frame[(y / 8) * WIDTH + x as usize] |= 1 << (y % 8);
        }
    }

    fn plot(&mut self, x: i64, y: i64) {
        if let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y)) {
            self.set_pixel(x, y);
        }
    }

    /// Bresenham line, both end points included
    ///
    /// A line leaving the frame is clipped to it first, so only the visible
    /// part is walked.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        let Some((x0, y0, x1, y1)) = clip_line(x0, y0, x1, y1) else {
            return;
        };
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);

        loop {
            self.set_pixel(x, y);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Solid `w` x `h` block
    pub fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32) {
        let Some((y0, y1)) = clip_span(y, h, HEIGHT) else {
            return;
        };
        for row in y0..y1 {
            self.draw_hline(x, row as i32, w);
        }
    }

    /// Outline of a `w` x `h` rectangle
    pub fn draw_frame(&mut self, x: i32, y: i32, w: i32, h: i32) {
        if w <= 0 || h <= 0 {
            return;
        }
        self.draw_hline(x, y, w);
        if h > 1 {
            self.draw_hline(x, y.saturating_add(h - 1), w);
        }
        self.draw_vline(x, y.saturating_add(1), h - 2);
        if w > 1 {
            self.draw_vline(x.saturating_add(w - 1), y.saturating_add(1), h - 2);
        }
    }

    /// Toggle every pixel of a `w` x `h` block
    pub fn invert_rect(&mut self, x: i32, y: i32, w: i32, h: i32) {
        let (Some((x0, x1)), Some((y0, y1))) = (clip_span(x, w, WIDTH), clip_span(y, h, HEIGHT))
        else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                self.invert_pixel(x as i32, y as i32);
            }
        }
    }

    /// Midpoint circle outline of radius `r`. Radius 0 is a single pixel.
    ///
    /// The octant is only walked over the rows and columns that can reach
    /// the frame, so huge or far away circles cost no more than small ones.
    pub fn draw_circle(&mut self, cx: i32, cy: i32, r: i32) {
        if r < 0 {
            return;
        }
        let (cx, cy, r) = (i64::from(cx), i64::from(cy), i64::from(r));
        let (width, height) = (WIDTH as i64, HEIGHT as i64);
        if cx + r < 0 || cx - r >= width || cy + r < 0 || cy - r >= height {
            return;
        }

        // offsets along the minor axis that land inside the frame, for the
        // octants mirrored across each axis
        let mut spans = [
            (-cy, height - 1 - cy),
            (cy - height + 1, cy),
            (-cx, width - 1 - cx),
            (cx - width + 1, cx),
        ];
        spans.sort_unstable();

        let mut next = 0;
        for (lo, hi) in spans {
            let lo = lo.max(next);
            if hi < lo {
                continue;
            }
            next = hi + 1;

            // midpoint state at row `lo`: x = round(sqrt(r^2 - y^2)) and
            // err = x^2 - x + (y + 1)^2 - r^2
            let mut y = lo;
            if y > r {
                break;
            }
            let mut x = round_sqrt(r * r - y * y);
            let mut err = x * x - x + (y + 1) * (y + 1) - r * r;

            while x >= y && y <= hi {
                self.plot(cx + x, cy + y);
                self.plot(cx + y, cy + x);
                self.plot(cx - y, cy + x);
                self.plot(cx - x, cy + y);
                self.plot(cx - x, cy - y);
                self.plot(cx - y, cy - x);
                self.plot(cx + y, cy - x);
                self.plot(cx + x, cy - y);

                y += 1;
                if err < 0 {
                    err += 2 * y + 1;
                } else {
                    x -= 1;
                    err += 2 * (y - x) + 1;
                }
            }
        }
    }

    /// OR `w` columns of 8-pixel-tall bitmap data in at (`x`, `y`)
    ///
    /// `data` uses the frame layout, one byte per column, bit 0 on top.
    /// `y` need not be page aligned.
    pub fn draw_bitmap8(&mut self, x: i32, y: i32, w: i32, data: &[u8]) {
        let columns = data.iter().take(w.max(0) as usize);
        for (dx, &column) in (0..).zip(columns) {
            for bit in 0..8 {
                if column & (1 << bit) != 0 {
                    self.set_pixel(x.saturating_add(dx), y.saturating_add(bit));
                }
            }
        }
    }

    /// Move the text cursor
    pub fn set_print_pos(&mut self, x: i32, y: i32) {
        self.print_x = x;
        self.print_y = y;
    }

    /// Column where the next character goes
    pub fn print_x(&self) -> i32 {
        self.print_x
    }

    /// Top row of the next character
    pub fn print_y(&self) -> i32 {
        self.print_y
    }

    /// Draw one character and advance by one glyph cell. No wrapping.
    pub fn print_char(&mut self, c: char) {
        let glyph = font::glyph(c);
        self.draw_bitmap8(self.print_x, self.print_y, font::GLYPH_WIDTH as i32, glyph);
        self.print_x = self.print_x.saturating_add(font::ADVANCE);
    }

    /// Print every character of `s`
    pub fn print_str(&mut self, s: &str) {
        for c in s.chars() {
            self.print_char(c);
        }
    }

    /// Print `n` in decimal
    pub fn print_int(&mut self, n: i32) {
        self.printf(format_args!("{}", n));
    }

    /// Formatted print at the text cursor, e.g.
    /// `gfx.printf(format_args!("Frame: {}", count))`
    pub fn printf(&mut self, args: fmt::Arguments<'_>) {
        // write_str below never fails
        let _ = fmt::Write::write_fmt(self, args);
    }

    /// [`Graphics::print_str`] starting at (`x`, `y`)
    pub fn draw_str(&mut self, x: i32, y: i32, s: &str) {
        self.set_print_pos(x, y);
        self.print_str(s);
    }
}

impl fmt::Write for Graphics<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.print_str(s);
        Ok(())
    }
}

impl OriginDimensions for Graphics<'_> {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl DrawTarget for Graphics<'_> {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if color.is_on() {
                self.set_pixel(point.x, point.y);
            } else {
                self.clear_pixel(point.x, point.y);
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.frame.fill(if color.is_on() { 0xFF } else { 0x00 });
        Ok(())
    }
}
