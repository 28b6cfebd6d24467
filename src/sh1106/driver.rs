//! SH1106 Page Transport Implementation
//!
//! ## Page writes
//!
//! Every page starts with `0xB0 | page` followed by the column address split
//! into its low nibble (`0x00 | lo`) and high nibble (`0x10 | hi`). The
//! column address is the configured offset; the controller then auto
//! increments through the 128 data bytes.
//!
//! ## Flip mode
//!
//! Normal orientation is segment remap reversed (`0xA1`) with COM scan
//! decrementing (`0xC8`), because the modules mount the glass upside down
//! relative to the RAM. Flipped is `0xA0` / `0xC0`.

use display_interface::DisplayError;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;

use crate::sh1106::interface::DisplayInterface;
use crate::sh1106::{cmd::Cmd, flag::Flag, DEFAULT_OFFSET};
use crate::transport::PageTransport;
use crate::{NUM_PAGES, PAGE_SIZE};

/// SH1106 OLED over four-wire SPI
///
/// ## Type Parameters
///
/// - `SPI` - SPI device for communication
/// - `DC` - Data/Command output pin
/// - `RST` - Reset output pin
/// - `DELAY` - Delay provider for the reset pulse
pub struct Sh1106<SPI, DC, RST, DELAY> {
    /// The display interface
    interface: DisplayInterface<SPI, DC, RST, DELAY>,
    offset: u8,
    flip180: bool,
    contrast: u8,
    initialized: bool,
}

impl<SPI, DC, RST, DELAY> Sh1106<SPI, DC, RST, DELAY>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    /// Create the transport. The controller is left alone until `init`.
    pub fn new(spi: SPI, dc: DC, rst: RST, delay: DELAY) -> Self {
        Sh1106 {
            interface: DisplayInterface::new(spi, dc, rst, delay),
            offset: DEFAULT_OFFSET,
            flip180: false,
            contrast: Flag::CONTRAST_DEFAULT,
            initialized: false,
        }
    }

    /// Release the bus and pins
    pub fn release(self) -> (SPI, DC, RST, DELAY) {
        self.interface.release()
    }

    /// Current column offset
    pub fn offset(&self) -> u8 {
        self.offset
    }

    /// Whether 180 degree rotation is selected
    pub fn flip_mode(&self) -> bool {
        self.flip180
    }

    fn orientation(&self) -> [u8; 2] {
        if self.flip180 {
            [Cmd::SEGMENT_REMAP_NORMAL, Cmd::COM_SCAN_INCREMENT]
        } else {
            [Cmd::SEGMENT_REMAP_REVERSED, Cmd::COM_SCAN_DECREMENT]
        }
    }

    /// Point the RAM write address at `column` of `page`
    fn set_address(&mut self, page: u8, column: u8) -> Result<(), DisplayError> {
        self.interface.cmd(&[
            Cmd::SET_PAGE_ADDRESS | (page & 0x07),
            Cmd::SET_LOWER_COLUMN | (column & 0x0F),
            Cmd::SET_HIGHER_COLUMN | (column >> 4),
        ])
    }

    fn write_page(&mut self, index: usize, data: &[u8]) -> Result<(), DisplayError> {
        self.set_address(index as u8, self.offset)?;
        self.interface.data(data)
    }
}

impl<SPI, DC, RST, DELAY> PageTransport for Sh1106<SPI, DC, RST, DELAY>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    fn init(&mut self) -> Result<(), DisplayError> {
        log::info!("Initializing SH1106 (offset {}, flip {})", self.offset, self.flip180);

        self.interface.reset()?;

        let [segment_remap, com_scan] = self.orientation();
        self.interface.cmd(&[
            Cmd::DISPLAY_OFF,
            Cmd::SET_CLOCK_DIVIDE,
            Flag::CLOCK_DIVIDE_DEFAULT,
            Cmd::SET_MULTIPLEX_RATIO,
            Flag::MULTIPLEX_64,
            Cmd::SET_DISPLAY_OFFSET,
            Flag::DISPLAY_OFFSET_NONE,
            Cmd::SET_START_LINE,
            Cmd::DC_DC_CONTROL,
            Flag::DC_DC_ON,
            Cmd::SET_PUMP_VOLTAGE | Flag::PUMP_VOLTAGE_8V0,
            segment_remap,
            com_scan,
            Cmd::SET_COM_PINS,
            Flag::COM_PINS_ALTERNATIVE,
            Cmd::SET_CONTRAST,
            self.contrast,
            Cmd::SET_PRECHARGE_PERIOD,
            Flag::PRECHARGE_DEFAULT,
            Cmd::SET_VCOM_DESELECT,
            Flag::VCOM_DESELECT_DEFAULT,
            Cmd::DISPLAY_FOLLOWS_RAM,
            Cmd::NORMAL_DISPLAY,
        ])?;

        self.initialized = true;
        self.clear()?;
        self.interface.cmd(&[Cmd::DISPLAY_ON])?;
        Ok(())
    }

    /// Zero the whole 132 column RAM, including the columns outside the glass
    fn clear(&mut self) -> Result<(), DisplayError> {
        for page in 0..Flag::PAGE_COUNT {
            self.set_address(page, 0)?;
            self.interface
                .data_x_times(0x00, usize::from(Flag::RAM_COLUMNS))?;
        }
        Ok(())
    }

    fn send_page(&mut self, index: usize, data: &[u8]) -> bool {
        if index >= NUM_PAGES || data.len() != PAGE_SIZE {
            log::warn!("Rejecting page {} of {} bytes", index, data.len());
            return false;
        }
        match self.write_page(index, data) {
            Ok(()) => true,
            Err(e) => {
                log::error!("Failed to send page {}: {:?}", index, e);
                false
            }
        }
    }

    fn adjust_offset(&mut self, offset: u8) -> Result<(), DisplayError> {
        let max = Flag::RAM_COLUMNS - PAGE_SIZE as u8;
        if offset > max {
            return Err(DisplayError::OutOfBoundsError);
        }
        self.offset = offset;
        Ok(())
    }

    fn set_flip_mode(&mut self, flip180: bool) -> Result<(), DisplayError> {
        log::info!("SH1106 flip mode {}", flip180);
        self.flip180 = flip180;
        if self.initialized {
            let orientation = self.orientation();
            self.interface.cmd(&orientation)?;
        }
        Ok(())
    }

    fn set_contrast(&mut self, contrast: u8) -> Result<(), DisplayError> {
        self.contrast = contrast;
        if self.initialized {
            self.interface.cmd(&[Cmd::SET_CONTRAST, contrast])?;
        }
        Ok(())
    }
}
