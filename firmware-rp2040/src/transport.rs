//! UART link to the host controller.
//!
//! # Pins
//!
//! Uses UART1 by default:
//! - GPIO 8: TX
//! - GPIO 9: RX

use camera_core::{Transport, TransportError};
use embassy_rp::uart::{Async, Error as UartError, Uart};
use embassy_time::{with_timeout, Duration};

/// Convert UART errors to [`TransportError`].
///
/// This is a helper function instead of a `From` impl to avoid orphan rule issues
/// (both `UartError` and `TransportError` are defined in external crates).
#[inline]
fn uart_error_to_transport_error(e: UartError) -> TransportError {
    match e {
        UartError::Overrun => TransportError::Overrun,
        UartError::Framing | UartError::Break => TransportError::Framing,
        _ => TransportError::Io,
    }
}

/// Host link over a full-duplex DMA UART.
pub struct UartTransport<'d> {
    uart: Uart<'d, Async>,
}

impl<'d> UartTransport<'d> {
    #[must_use]
    pub fn new(uart: Uart<'d, Async>) -> Self {
        Self { uart }
    }
}

impl Transport for UartTransport<'_> {
    /// Reads a single byte per call; the framer buffers across calls.
    async fn read(&mut self, buf: &mut [u8], timeout_ms: u32) -> Result<usize, TransportError> {
        let Some(byte) = buf.first_mut() else {
            return Ok(0);
        };

        let mut rx = [0u8; 1];
        match with_timeout(
            Duration::from_millis(u64::from(timeout_ms)),
            self.uart.read(&mut rx),
        )
        .await
        {
            Ok(Ok(())) => {
                *byte = rx[0];
                Ok(1)
            }
            Ok(Err(e)) => Err(uart_error_to_transport_error(e)),
            Err(_) => Ok(0),
        }
    }

    async fn write_all(&mut self, data: &[u8]) -> Result<(), TransportError> {
        self.uart
            .write(data)
            .await
            .map_err(uart_error_to_transport_error)
    }
}
