//! One display: frame ring, page transfer and drawing, owned together
//!
//! ```
//! # use paged_display::{Display, PageTransport, DisplayError};
//! # struct Null;
//! # impl PageTransport for Null {
//! #     fn init(&mut self) -> Result<(), DisplayError> { Ok(()) }
//! #     fn clear(&mut self) -> Result<(), DisplayError> { Ok(()) }
//! #     fn send_page(&mut self, _: usize, _: &[u8]) -> bool { true }
//! #     fn set_flip_mode(&mut self, _: bool) -> Result<(), DisplayError> { Ok(()) }
//! # }
//! let mut display: Display<_> = Display::new(Null);
//! display.init()?;
//!
//! display.draw_frame(true, |gfx| {
//!     gfx.draw_frame(0, 0, 128, 64);
//!     gfx.draw_str(8, 8, "OK");
//! });
//!
//! // from the periodic loop
//! while !display.is_idle() {
//!     display.service();
//! }
//! # Ok::<(), DisplayError>(())
//! ```

use core::ops::{Deref, DerefMut};

use display_interface::DisplayError;

use crate::framebuffer::{FrameBuffer, PendingWrite};
use crate::graphics::{ClearFrame, Graphics};
use crate::paged_driver::{PagedDisplayDriver, Transfer};
use crate::transport::PageTransport;
use crate::FRAME_SIZE;

/// A panel transport fed from a ring of `N` frames
pub struct Display<T, const N: usize = 2> {
    frame_buffer: FrameBuffer<FRAME_SIZE, N>,
    driver: PagedDisplayDriver<T>,
}

impl<T: PageTransport, const N: usize> Display<T, N> {
    /// Build the pipeline around `transport`. Call [`Display::init`] before use.
    pub fn new(transport: T) -> Self {
        Display {
            frame_buffer: FrameBuffer::new(),
            driver: PagedDisplayDriver::new(transport),
        }
    }

    /// Empty the ring, drop any transfer and initialise the panel
    pub fn init(&mut self) -> Result<(), DisplayError> {
        self.frame_buffer.init();
        self.driver.init()
    }

    /// See [`PageTransport::adjust_offset`]
    pub fn adjust_offset(&mut self, offset: u8) -> Result<(), DisplayError> {
        self.driver.transport_mut().adjust_offset(offset)
    }

    /// See [`PageTransport::set_flip_mode`]
    pub fn set_flip_mode(&mut self, flip180: bool) -> Result<(), DisplayError> {
        self.driver.transport_mut().set_flip_mode(flip180)
    }

    /// See [`PageTransport::set_contrast`]
    pub fn set_contrast(&mut self, contrast: u8) -> Result<(), DisplayError> {
        self.driver.transport_mut().set_contrast(contrast)
    }

    /// See [`PageTransport::change_speed`]
    pub fn change_speed(&mut self, hz: u32) {
        self.driver.transport_mut().change_speed(hz);
    }

    /// Advance the transfer by at most one page
    ///
    /// A frame that finished sending goes back to the ring, and when nothing
    /// is in flight the oldest committed frame is picked up; its first page
    /// goes out on the next call.
    pub fn service(&mut self) -> Transfer {
        let Display {
            frame_buffer,
            driver,
        } = self;

        let status = match frame_buffer.acquire_readable() {
            Some(frame) if driver.frame_valid() => driver.update(frame),
            _ => Transfer::Idle,
        };
        if status == Transfer::Complete {
            frame_buffer.commit_read();
        }

        if !driver.frame_valid() {
            if let Some(frame) = frame_buffer.acquire_readable() {
                driver.begin(frame);
            }
        }
        status
    }

    /// Flush the transport and report whether nothing is left to send
    pub fn flush(&mut self) -> bool {
        self.driver.flush() && !self.frame_buffer.readable()
    }

    /// No frame in flight and none waiting
    pub fn is_idle(&self) -> bool {
        !self.driver.frame_valid() && !self.frame_buffer.readable()
    }

    /// Start drawing the next frame
    ///
    /// The frame comes cleared. With `wait` set and every frame still queued,
    /// the transfer is serviced until one is released; otherwise `None` is
    /// returned and the frame is skipped.
    pub fn begin_frame(&mut self, wait: bool) -> Option<FrameWriter<'_, N>> {
        if wait {
            while !self.frame_buffer.writeable() {
                self.service();
            }
        }
        let Some((frame, pending)) = self.frame_buffer.split_writable() else {
            log::trace!("No free frame, skipping");
            return None;
        };
        Some(FrameWriter {
            gfx: Graphics::begin(frame, ClearFrame::Enable),
            pending: Some(pending),
        })
    }

    /// Draw one frame with `draw` and queue it
    ///
    /// Returns `false` when the frame was skipped, see [`Display::begin_frame`].
    pub fn draw_frame<F>(&mut self, wait: bool, draw: F) -> bool
    where
        F: FnOnce(&mut Graphics<'_>),
    {
        match self.begin_frame(wait) {
            Some(mut writer) => {
                draw(&mut *writer);
                writer.end();
                true
            }
            None => false,
        }
    }

    /// The frame ring
    pub fn frame_buffer(&self) -> &FrameBuffer<FRAME_SIZE, N> {
        &self.frame_buffer
    }

    /// The panel transport
    pub fn transport(&self) -> &T {
        self.driver.transport()
    }

    /// The panel transport
    pub fn transport_mut(&mut self) -> &mut T {
        self.driver.transport_mut()
    }

    /// Give the transport back
    pub fn release(self) -> T {
        self.driver.into_transport()
    }
}

/// Drawing access to a frame taken from a [`Display`]
///
/// The frame is queued for sending by [`FrameWriter::end`], or when the writer
/// goes out of scope.
pub struct FrameWriter<'a, const N: usize = 2> {
    gfx: Graphics<'a>,
    pending: Option<PendingWrite<'a, N>>,
}

impl<const N: usize> FrameWriter<'_, N> {
    /// Stop drawing and queue the frame
    pub fn end(mut self) {
        self.commit();
    }

    fn commit(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.commit();
        }
    }
}

impl<'a, const N: usize> Deref for FrameWriter<'a, N> {
    type Target = Graphics<'a>;

    fn deref(&self) -> &Self::Target {
        &self.gfx
    }
}

impl<const N: usize> DerefMut for FrameWriter<'_, N> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.gfx
    }
}

impl<const N: usize> Drop for FrameWriter<'_, N> {
    fn drop(&mut self) {
        self.commit();
    }
}
