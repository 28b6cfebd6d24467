//! SH1106 OLED Page Transport
//!
//! Used in the common 1.3" 128x64 OLED modules with an SPI interface.
//!
//! The controller RAM is 132 columns wide and most modules wire the glass to
//! columns 2..130, hence [`DEFAULT_OFFSET`]. Some modules start at column 0;
//! use [`crate::PageTransport::adjust_offset`] for those.
//!
//! ### Usage
//! The SH1106 takes pages in exactly the frame layout, so a page goes out as
//! three addressing commands followed by the 128 data bytes:
//!
//! 1. build the transport with [`driver::Sh1106::new`] from an
//!    `embedded-hal` SPI device, a DC pin, a reset pin and a delay
//! 1. hand it to [`crate::Display::new`]; `init` resets and configures the
//!    controller
//!
//! 180 degree rotation is done by the controller itself through the segment
//! remap and COM scan direction, no pixel data is rewritten.

pub mod driver;
pub mod interface;

mod cmd;
mod flag;

pub use cmd::Cmd;
pub use driver::Sh1106;
pub use flag::Flag;

/// Column offset of the visible area inside the 132 column RAM
pub const DEFAULT_OFFSET: u8 = 2;
