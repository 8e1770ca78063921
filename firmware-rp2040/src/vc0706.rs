//! VC0706 serial JPEG camera.
//!
//! The module speaks the VC0706 command protocol over a dedicated UART:
//! requests are `56 <serial> <cmd> <len> <args...>`, replies are
//! `76 <serial> <cmd> <status> <len> <data...>`. The camera always produces
//! JPEG; the requested pixel format selects color or black-and-white output.
//!
//! # Pins
//!
//! Uses UART0 at 38400 baud:
//! - GPIO 0: TX (to camera RX)
//! - GPIO 1: RX (from camera TX)

use camera_core::camera_proto::{FrameSize, PixelFormat};
use camera_core::Sensor;
use embassy_rp::uart::{Async, Error as UartError, Uart};
use embassy_time::{with_timeout, Duration, Timer};

/// Camera UART baud rate after power-on.
pub const BAUD_RATE: u32 = 38_400;

const SERIAL: u8 = 0x00;
const REQUEST: u8 = 0x56;
const REPLY: u8 = 0x76;

/// VC0706 command codes
mod cmd {
    pub const RESET: u8 = 0x26;
    pub const READ_FBUF: u8 = 0x32;
    pub const GET_FBUF_LEN: u8 = 0x34;
    pub const FBUF_CTRL: u8 = 0x36;
    pub const WRITE_DATA: u8 = 0x31;
    pub const COLOR_CTRL: u8 = 0x3C;
}

/// Frame buffer control arguments
mod fbuf {
    pub const STOP_CURRENT: u8 = 0x00;
    pub const RESUME: u8 = 0x03;
}

const COLOR_MODE_COLOR: u8 = 0x01;
const COLOR_MODE_MONO: u8 = 0x02;

/// How long the camera gets to answer one request.
const REPLY_TIMEOUT: Duration = Duration::from_millis(200);
/// Boot time after a reset; the camera prints a banner meanwhile.
const BOOT_TIME: Duration = Duration::from_millis(500);
/// Bytes fetched per `READ_FBUF` request.
const READ_CHUNK: usize = 64;
/// Transfer delay argument of `READ_FBUF`, in units of 0.01 ms.
const READ_DELAY: [u8; 2] = [0x00, 0x0A];
/// Upper bound on banner bytes drained after a reset.
const MAX_BANNER: usize = 256;

/// Errors reported by the camera driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum Vc0706Error {
    /// UART receive error.
    Uart(UartError),
    /// The camera did not answer in time.
    Timeout,
    /// The reply did not echo the request.
    UnexpectedReply,
    /// The camera answered with a non-zero status.
    Status(u8),
    /// The compressed frame does not fit the image buffer.
    FrameTooLarge(u32),
}

/// Driver for a VC0706 camera module.
pub struct Vc0706<'d> {
    uart: Uart<'d, Async>,
    /// `COLOR_CTRL` mode, re-applied after every reset.
    color_mode: u8,
}

impl<'d> Vc0706<'d> {
    /// Create a driver. The UART must be configured for [`BAUD_RATE`].
    #[must_use]
    pub fn new(uart: Uart<'d, Async>) -> Self {
        Self {
            uart,
            color_mode: COLOR_MODE_COLOR,
        }
    }

    /// Send one request and read its reply header.
    ///
    /// Reply data, if any, is read into `reply`; returns its length.
    async fn command(&mut self, code: u8, args: &[u8], reply: &mut [u8]) -> Result<usize, Vc0706Error> {
        let mut frame = [0u8; 16];
        let len = 4 + args.len();
        frame[..4].copy_from_slice(&[REQUEST, SERIAL, code, args.len() as u8]);
        frame[4..len].copy_from_slice(args);
        self.uart
            .write(&frame[..len])
            .await
            .map_err(Vc0706Error::Uart)?;

        let mut header = [0u8; 5];
        self.read_exact(&mut header).await?;
        if header[..3] != [REPLY, SERIAL, code] {
            return Err(Vc0706Error::UnexpectedReply);
        }
        if header[3] != 0 {
            return Err(Vc0706Error::Status(header[3]));
        }

        let data_len = usize::from(header[4]);
        let data = reply
            .get_mut(..data_len)
            .ok_or(Vc0706Error::UnexpectedReply)?;
        self.read_exact(data).await?;
        Ok(data_len)
    }

    async fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), Vc0706Error> {
        if buf.is_empty() {
            return Ok(());
        }
        with_timeout(REPLY_TIMEOUT, self.uart.read(buf))
            .await
            .map_err(|_| Vc0706Error::Timeout)?
            .map_err(Vc0706Error::Uart)
    }

    /// Discard whatever the camera sends until it goes quiet.
    async fn drain(&mut self) {
        let mut byte = [0u8; 1];
        for _ in 0..MAX_BANNER {
            match with_timeout(Duration::from_millis(10), self.uart.read(&mut byte)).await {
                Ok(Ok(())) => {}
                _ => break,
            }
        }
    }

    /// Write one byte of the camera's register space.
    async fn write_register(&mut self, register: [u8; 2], value: u8) -> Result<(), Vc0706Error> {
        // device type 1 (chip register), 1 data byte
        let args = [0x04, 0x01, register[0], register[1], value];
        self.command(cmd::WRITE_DATA, &args, &mut []).await?;
        Ok(())
    }

    async fn frame_control(&mut self, action: u8) -> Result<(), Vc0706Error> {
        self.command(cmd::FBUF_CTRL, &[action], &mut []).await?;
        Ok(())
    }

    async fn frame_length(&mut self) -> Result<u32, Vc0706Error> {
        let mut reply = [0u8; 4];
        let len = self.command(cmd::GET_FBUF_LEN, &[0x00], &mut reply).await?;
        if len != reply.len() {
            return Err(Vc0706Error::UnexpectedReply);
        }
        Ok(u32::from_be_bytes(reply))
    }

    /// Copy `out.len()` bytes of the frozen frame starting at `address`.
    async fn read_frame(&mut self, address: u32, out: &mut [u8]) -> Result<(), Vc0706Error> {
        let mut args = [0u8; 12];
        args[0] = 0x00; // current frame
        args[1] = 0x0A; // data over UART
        args[2..6].copy_from_slice(&address.to_be_bytes());
        args[6..10].copy_from_slice(&(out.len() as u32).to_be_bytes());
        args[10..12].copy_from_slice(&READ_DELAY);
        self.command(cmd::READ_FBUF, &args, &mut []).await?;

        self.read_exact(out).await?;

        let mut trailer = [0u8; 5];
        self.read_exact(&mut trailer).await?;
        if trailer[..3] != [REPLY, SERIAL, cmd::READ_FBUF] {
            return Err(Vc0706Error::UnexpectedReply);
        }
        Ok(())
    }

    async fn apply_color_mode(&mut self) -> Result<(), Vc0706Error> {
        // control by UART, then color mode
        self.command(cmd::COLOR_CTRL, &[0x01, self.color_mode], &mut [])
            .await?;
        Ok(())
    }

    async fn read_image(&mut self, quality: u8, out: &mut [u8]) -> Result<usize, Vc0706Error> {
        self.write_register([0x12, 0x04], compression_ratio(quality))
            .await?;
        self.frame_control(fbuf::STOP_CURRENT).await?;

        let len = self.frame_length().await?;
        let size = usize::try_from(len).map_err(|_| Vc0706Error::FrameTooLarge(len))?;
        let image = out.get_mut(..size).ok_or(Vc0706Error::FrameTooLarge(len))?;

        let mut address = 0u32;
        for chunk in image.chunks_mut(READ_CHUNK) {
            self.read_frame(address, chunk).await?;
            address += chunk.len() as u32;
        }
        Ok(size)
    }
}

/// Map JPEG quality (0-100) onto the VC0706 compression ratio, where
/// `0x00` is the least compression.
fn compression_ratio(quality: u8) -> u8 {
    let quality = u16::from(quality.min(100));
    (0xFF - quality * 0xFF / 100) as u8
}

impl Sensor for Vc0706<'_> {
    type Error = Vc0706Error;

    async fn reset(&mut self) -> Result<(), Self::Error> {
        self.command(cmd::RESET, &[], &mut []).await?;
        Timer::after(BOOT_TIME).await;
        self.drain().await;
        self.apply_color_mode().await
    }

    async fn set_pixel_format(&mut self, format: PixelFormat) -> Result<(), Self::Error> {
        self.color_mode = match format {
            PixelFormat::Rgb565 => COLOR_MODE_COLOR,
            PixelFormat::Grayscale => COLOR_MODE_MONO,
        };
        self.apply_color_mode().await
    }

    async fn set_frame_size(&mut self, size: FrameSize) -> Result<(), Self::Error> {
        let code = match size {
            FrameSize::Vga => 0x00,
            FrameSize::Qvga => 0x11,
            FrameSize::Qqvga => 0x22,
        };
        self.write_register([0x00, 0x19], code).await?;
        // The new size applies from the next reset
        self.reset().await
    }

    async fn skip_frames(&mut self, duration_ms: u32) -> Result<(), Self::Error> {
        Timer::after_millis(u64::from(duration_ms)).await;
        Ok(())
    }

    async fn capture_jpeg(&mut self, quality: u8, out: &mut [u8]) -> Result<usize, Self::Error> {
        let result = self.read_image(quality, out).await;
        // Always unfreeze, even after a failed transfer
        let resumed = self.frame_control(fbuf::RESUME).await;
        let len = result?;
        resumed?;
        Ok(len)
    }
}
