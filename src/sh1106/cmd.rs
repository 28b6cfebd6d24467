/// SH1106 command bytes, sent with DC low
pub struct Cmd;
#[allow(missing_docs)]
impl Cmd {
    // Addressing, low bits carry the argument
    pub const SET_LOWER_COLUMN: u8 = 0x00;
    pub const SET_HIGHER_COLUMN: u8 = 0x10;
    pub const SET_PUMP_VOLTAGE: u8 = 0x30;
    pub const SET_START_LINE: u8 = 0x40;
    pub const SET_PAGE_ADDRESS: u8 = 0xB0;

    // Followed by one argument byte, also sent in command mode
    pub const SET_CONTRAST: u8 = 0x81;
    pub const SET_MULTIPLEX_RATIO: u8 = 0xA8;
    pub const DC_DC_CONTROL: u8 = 0xAD;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_CLOCK_DIVIDE: u8 = 0xD5;
    pub const SET_PRECHARGE_PERIOD: u8 = 0xD9;
    pub const SET_COM_PINS: u8 = 0xDA;
    pub const SET_VCOM_DESELECT: u8 = 0xDB;

    // Single byte
    pub const SEGMENT_REMAP_NORMAL: u8 = 0xA0;
    pub const SEGMENT_REMAP_REVERSED: u8 = 0xA1;
    pub const DISPLAY_FOLLOWS_RAM: u8 = 0xA4;
    pub const NORMAL_DISPLAY: u8 = 0xA6;
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const COM_SCAN_INCREMENT: u8 = 0xC0;
    pub const COM_SCAN_DECREMENT: u8 = 0xC8;
}

/*
SH1106 datasheet, commands used by this driver:
0x00/0x10 - Column address low/high nibble
0x30 - Pump voltage (0x30..0x33)
0x40 - Display start line
0x81 - Contrast
0xA0/0xA1 - Segment remap
0xA4 - Display follows RAM
0xA6 - Normal display
0xA8 - Multiplex ratio
0xAD - DC-DC on/off
0xAE/0xAF - Display off/on
0xB0 - Page address (0xB0..0xB7)
0xC0/0xC8 - COM scan direction
0xD3 - Display offset
0xD5 - Clock divide ratio
0xD9 - Precharge period
0xDA - COM pins configuration
0xDB - VCOM deselect level
*/
