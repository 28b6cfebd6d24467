//! SH1106 Emulation on an ILI9341 TFT
//!
//! The 320x240 colour panel shows the 128x64 frame at twice its size,
//! centered, with a thin frame around the active area. Every lit bit becomes
//! a `scale x scale` block in the foreground colour, every dark bit the same
//! block in the background colour.
//!
//! ### Usage
//! The emulation draws through any `embedded-graphics` [`DrawTarget`] with
//! [`Rgb565`] pixels, so the actual ILI9341 driver stays outside this crate:
//!
//! 1. build the TFT driver (for example `mipidsi` over `display-interface-spi`)
//! 1. wrap it with [`Ili9341Emulation::new`], or
//!    [`Ili9341Emulation::with_config`] for another panel size or palette
//! 1. hand the emulation to [`crate::Display::new`] like any other transport
//!
//! [`DrawTarget`]: embedded_graphics::draw_target::DrawTarget
//! [`Rgb565`]: embedded_graphics::pixelcolor::Rgb565

mod emulation;
mod geometry;

pub use emulation::Ili9341Emulation;
pub use geometry::{Palette, PanelGeometry};
