//! The seam between the paged pipeline and a physical panel

use display_interface::DisplayError;

/// A panel that accepts the frame one page at a time
///
/// Every page is [`crate::PAGE_SIZE`] bytes, one byte per column, bit 0 the
/// top row of the page. Controls a panel does not have are accepted and
/// ignored; the default implementations do exactly that.
pub trait PageTransport {
    /// Bring the panel up. Must be called before the first page is sent.
    fn init(&mut self) -> Result<(), DisplayError>;

    /// Blank the panel contents
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Finish whatever the transport still has queued
    fn flush(&mut self) {}

    /// Try to send page `index`
    ///
    /// Returns `false` when the transport cannot take the page right now; the
    /// caller keeps the page and offers the same bytes again later. Returns
    /// `true` once the bytes have been consumed and the slice is no longer
    /// needed.
    fn send_page(&mut self, index: usize, data: &[u8]) -> bool;

    /// Panel RAM column offset, for controllers with more columns than pixels
    fn adjust_offset(&mut self, _offset: u8) -> Result<(), DisplayError> {
        Ok(())
    }

    /// Bus clock, in Hz
    fn change_speed(&mut self, _hz: u32) {}

    /// Rotate the image by 180 degrees
    fn set_flip_mode(&mut self, flip180: bool) -> Result<(), DisplayError>;

    /// Panel contrast or brightness
    fn set_contrast(&mut self, _contrast: u8) -> Result<(), DisplayError> {
        Ok(())
    }
}

impl<T: PageTransport + ?Sized> PageTransport for &mut T {
    fn init(&mut self) -> Result<(), DisplayError> {
        (**self).init()
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        (**self).clear()
    }

    fn flush(&mut self) {
        (**self).flush();
    }

    fn send_page(&mut self, index: usize, data: &[u8]) -> bool {
        (**self).send_page(index, data)
    }

    fn adjust_offset(&mut self, offset: u8) -> Result<(), DisplayError> {
        (**self).adjust_offset(offset)
    }

    fn change_speed(&mut self, hz: u32) {
        (**self).change_speed(hz);
    }

    fn set_flip_mode(&mut self, flip180: bool) -> Result<(), DisplayError> {
        (**self).set_flip_mode(flip180)
    }

    fn set_contrast(&mut self, contrast: u8) -> Result<(), DisplayError> {
        (**self).set_contrast(contrast)
    }
}
