//! SPI connection to the SH1106
use display_interface::DisplayError;
use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

const RESET_DELAY_MS: u32 = 10;
const CHUNK_SIZE: usize = 32;

/// Four-wire SPI connection: the SPI device (with its chip select), a
/// Data/Command pin and a reset pin
pub struct DisplayInterface<SPI, DC, RST, DELAY> {
    /// SPI device
    spi: SPI,
    /// Data/Command Control Pin (High for data, Low for command)
    dc: DC,
    /// Pin for Reseting
    rst: RST,
    /// Delay provider for the reset pulse
    delay: DELAY,
}

impl<SPI, DC, RST, DELAY> DisplayInterface<SPI, DC, RST, DELAY> {
    /// Wrap the bus and pins. Nothing is sent until the first command.
    pub fn new(spi: SPI, dc: DC, rst: RST, delay: DELAY) -> Self {
        DisplayInterface {
            spi,
            dc,
            rst,
            delay,
        }
    }

    /// Give the bus and pins back
    pub fn release(self) -> (SPI, DC, RST, DELAY) {
        (self.spi, self.dc, self.rst, self.delay)
    }
}

impl<SPI, DC, RST, DELAY> DisplayInterface<SPI, DC, RST, DELAY>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    /// Send command bytes. SH1106 command arguments are commands too.
    pub(crate) fn cmd(&mut self, commands: &[u8]) -> Result<(), DisplayError> {
        // low for commands
        self.dc.set_low().map_err(|_| DisplayError::DCError)?;

        match self.spi.write(commands) {
            Ok(()) => Ok(()),
            Err(e) => {
                log::error!("SPI write error for command {:02X?}: {:?}", commands, e);
                Err(DisplayError::BusWriteError)
            }
        }
    }

    /// Send display RAM data
    pub(crate) fn data(&mut self, data: &[u8]) -> Result<(), DisplayError> {
        // high for data
        self.dc.set_high().map_err(|_| DisplayError::DCError)?;
        self.spi.write(data).map_err(|e| {
            log::error!("SPI write error for {} data bytes: {:?}", data.len(), e);
            DisplayError::BusWriteError
        })
    }

    /// Send the same data byte `repetitions` times
    pub(crate) fn data_x_times(&mut self, val: u8, repetitions: usize) -> Result<(), DisplayError> {
        self.dc.set_high().map_err(|_| DisplayError::DCError)?;

        let buffer = [val; CHUNK_SIZE];
        let mut remaining = repetitions;
        while remaining > 0 {
            let n = remaining.min(CHUNK_SIZE);
            self.spi.write(&buffer[..n]).map_err(|e| {
                log::error!("SPI write error for {} repeated bytes: {:?}", n, e);
                DisplayError::BusWriteError
            })?;
            remaining -= n;
        }
        Ok(())
    }

    /// Pulse the reset line
    pub(crate) fn reset(&mut self) -> Result<(), DisplayError> {
        self.rst.set_high().map_err(|_| DisplayError::RSError)?;
        self.delay.delay_ms(1);
        self.rst.set_low().map_err(|_| DisplayError::RSError)?;
        self.delay.delay_ms(RESET_DELAY_MS);
        self.rst.set_high().map_err(|_| DisplayError::RSError)?;
        self.delay.delay_ms(RESET_DELAY_MS);
        Ok(())
    }
}
