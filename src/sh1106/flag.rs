/// Argument bytes for the SH1106 commands in [`super::cmd::Cmd`].
pub struct Flag;
#[allow(missing_docs)]
impl Flag {
    // Clock Divide (0xD5): divide ratio 1, oscillator frequency +15%
    pub const CLOCK_DIVIDE_DEFAULT: u8 = 0x80;

    // Multiplex Ratio (0xA8): 64 lines
    pub const MULTIPLEX_64: u8 = 0x3F;

    // Display Offset (0xD3)
    pub const DISPLAY_OFFSET_NONE: u8 = 0x00;

    // DC-DC Control (0xAD)
    pub const DC_DC_ON: u8 = 0x8B;

    // Pump Voltage (0x30 | n)
    pub const PUMP_VOLTAGE_8V0: u8 = 0x02;

    // COM Pins (0xDA): alternative configuration
    pub const COM_PINS_ALTERNATIVE: u8 = 0x12;

    // Contrast (0x81)
    pub const CONTRAST_DEFAULT: u8 = 0xCF;

    // Precharge Period (0xD9): discharge 15 clocks, precharge 1 clock
    pub const PRECHARGE_DEFAULT: u8 = 0xF1;

    // VCOM Deselect (0xDB)
    pub const VCOM_DESELECT_DEFAULT: u8 = 0x40;

    // Page count and RAM width of the controller
    pub const PAGE_COUNT: u8 = 8;
    pub const RAM_COLUMNS: u8 = 132;
}
