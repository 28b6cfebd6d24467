//! Paged monochrome display pipeline
//!
//! Application code draws into a 128x64 one-bit frame, the frame is handed over
//! through a small ring of buffers, and a cooperative driver streams it out one
//! 8-pixel page at a time to whatever panel is wired in.
//!
//! Two panel transports are included:
//!
//! - [`sh1106::Sh1106`] drives the native SH1106 OLED over SPI.
//! - [`ili9341::Ili9341Emulation`] renders the same pages upscaled and
//!   letterboxed on a colour TFT, through any
//!   [`embedded_graphics`](https://github.com/jamwaffles/embedded-graphics)
//!   draw target (for example an ILI9341 driven by `mipidsi`).
//!
//! ### Usage
//! Nothing in the pipeline blocks. To get a frame on the panel you:
//!
//! 1. build a [`display::Display`] around a transport and call
//!    [`display::Display::init`]
//! 1. draw a frame with [`display::Display::draw_frame`] (or the
//!    [`display::Display::begin_frame`] guard)
//! 1. call [`display::Display::service`] from the periodic loop; every call
//!    sends at most one page
//!
//! ### Frame format
//! A frame is [`NUM_PAGES`] pages of [`PAGE_SIZE`] bytes. Each byte is one
//! column of a page, bit 0 being the topmost row. This is the byte order the
//! SH1106 expects on the wire and every transport consumes it unchanged.
#![cfg_attr(not(test), no_std)]
#![deny(missing_docs)]
#![allow(clippy::pedantic)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

pub mod display;
pub mod framebuffer;
pub mod graphics;
pub mod ili9341;
pub mod paged_driver;
pub mod sh1106;
pub mod transport;

/// Logical display width, pixels horizontally
pub const WIDTH: usize = 128;

/// Logical display height, pixels vertically
pub const HEIGHT: usize = 64;

/// Number of 8-pixel-tall pages in a frame
pub const NUM_PAGES: usize = HEIGHT / 8;

/// Bytes in one page, one byte per column
pub const PAGE_SIZE: usize = WIDTH;

/// Bytes in one frame
pub const FRAME_SIZE: usize = WIDTH * HEIGHT / 8;

pub use crate::display::{Display, FrameWriter};
pub use crate::framebuffer::FrameBuffer;
pub use crate::graphics::{ClearFrame, Graphics};
pub use crate::ili9341::{Ili9341Emulation, Palette, PanelGeometry};
pub use crate::paged_driver::{PagedDisplayDriver, Transfer};
pub use crate::sh1106::Sh1106;
pub use crate::transport::PageTransport;

pub use display_interface::DisplayError;
