//! SH1106 OLED Display Driver
//!
//! Driver for 128x64 SH1106-based OLED displays via I2C, used as the status
//! display. Text is rendered with `embedded-graphics` into a page-organized
//! frame buffer, one 8-pixel page per text row.

use camera_core::{DisplayError, StatusDisplay};
use embedded_graphics::mono_font::ascii::FONT_5X8;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};

/// SH1106 I2C address (typically 0x3C or 0x3D)
pub const SH1106_ADDR: u8 = 0x3C;

/// Display dimensions
const WIDTH: usize = 128;
const HEIGHT: usize = 64;
const PAGES: usize = HEIGHT / 8;

/// SH1106 commands
mod cmd {
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const SET_CONTRAST: u8 = 0x81;
    pub const SET_NORMAL: u8 = 0xA6;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_COM_PINS: u8 = 0xDA;
    pub const SET_VCOM_DETECT: u8 = 0xDB;
    pub const SET_CLOCK_DIV: u8 = 0xD5;
    pub const SET_PRECHARGE: u8 = 0xD9;
    pub const SET_MUX_RATIO: u8 = 0xA8;
    pub const SET_LOW_COLUMN: u8 = 0x00;
    pub const SET_HIGH_COLUMN: u8 = 0x10;
    pub const SET_PAGE_ADDR: u8 = 0xB0;
    pub const SET_START_LINE: u8 = 0x40;
    pub const SET_SEG_REMAP: u8 = 0xA1;
    pub const SET_COM_SCAN_DEC: u8 = 0xC8;
    pub const SET_CHARGE_PUMP: u8 = 0x8D;
}

/// SH1106 OLED driver
pub struct Sh1106<I2C> {
    i2c: I2C,
    /// Frame buffer (1 bit per pixel, organized as pages)
    buffer: [[u8; WIDTH]; PAGES],
}

impl<I2C> Sh1106<I2C>
where
    I2C: embedded_hal_async::i2c::I2c,
{
    /// Create a new SH1106 driver
    pub fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            buffer: [[0; WIDTH]; PAGES],
        }
    }

    /// Initialize the display and blank it
    pub async fn init(&mut self) -> Result<(), I2C::Error> {
        let init_cmds: &[u8] = &[
            cmd::DISPLAY_OFF,
            cmd::SET_CLOCK_DIV,
            0x80, // Default clock
            cmd::SET_MUX_RATIO,
            0x3F, // 64 lines
            cmd::SET_DISPLAY_OFFSET,
            0x00,
            cmd::SET_START_LINE,
            cmd::SET_CHARGE_PUMP,
            0x14,                  // Enable charge pump
            cmd::SET_SEG_REMAP,    // Flip horizontally
            cmd::SET_COM_SCAN_DEC, // Flip vertically
            cmd::SET_COM_PINS,
            0x12, // Alternative COM config
            cmd::SET_CONTRAST,
            0xCF,
            cmd::SET_PRECHARGE,
            0xF1,
            cmd::SET_VCOM_DETECT,
            0x40,
            cmd::SET_NORMAL,
            cmd::DISPLAY_ON,
        ];

        for &c in init_cmds {
            self.command(c).await?;
        }

        self.buffer = [[0; WIDTH]; PAGES];
        self.flush().await
    }

    async fn command(&mut self, cmd: u8) -> Result<(), I2C::Error> {
        self.i2c.write(SH1106_ADDR, &[0x00, cmd]).await
    }

    /// Flush the frame buffer to the display
    pub async fn flush(&mut self) -> Result<(), I2C::Error> {
        for page in 0..PAGES {
            self.flush_page(page).await?;
        }
        Ok(())
    }

    async fn flush_page(&mut self, page: usize) -> Result<(), I2C::Error> {
        self.command(cmd::SET_PAGE_ADDR | page as u8).await?;
        // SH1106 RAM is 132 columns wide; the panel starts at column 2
        self.command(cmd::SET_LOW_COLUMN | 2).await?;
        self.command(cmd::SET_HIGH_COLUMN).await?;

        let mut data = [0u8; WIDTH + 1];
        data[0] = 0x40; // Data mode
        data[1..].copy_from_slice(&self.buffer[page]);
        self.i2c.write(SH1106_ADDR, &data).await
    }
}

impl<I2C> OriginDimensions for Sh1106<I2C> {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl<I2C> DrawTarget for Sh1106<I2C> {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<P>(&mut self, pixels: P) -> Result<(), Self::Error>
    where
        P: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            let (Ok(x), Ok(y)) = (usize::try_from(point.x), usize::try_from(point.y)) else {
                continue;
            };
            if x >= WIDTH || y >= HEIGHT {
                continue;
            }
            let bit = 1u8 << (y % 8);
            let cell = &mut self.buffer[y / 8][x];
            if color.is_on() {
                *cell |= bit;
            } else {
                *cell &= !bit;
            }
        }
        Ok(())
    }
}

impl<I2C> StatusDisplay for Sh1106<I2C>
where
    I2C: embedded_hal_async::i2c::I2c,
{
    async fn clear(&mut self) -> Result<(), DisplayError> {
        self.buffer = [[0; WIDTH]; PAGES];
        self.flush().await.map_err(|_| DisplayError::Bus)
    }

    async fn draw_text(&mut self, row: u8, text: &str) -> Result<(), DisplayError> {
        let page = usize::from(row);
        if page >= PAGES {
            return Err(DisplayError::OutOfBounds);
        }

        self.buffer[page] = [0; WIDTH];
        let style = MonoTextStyle::new(&FONT_5X8, BinaryColor::On);
        let origin = Point::new(0, (page * 8) as i32);
        Text::with_baseline(text, origin, style, Baseline::Top)
            .draw(self)
            .ok();

        self.flush_page(page).await.map_err(|_| DisplayError::Bus)
    }
}
