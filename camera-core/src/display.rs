//! Status display capability.

use core::future::Future;

/// Error type for display operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// The display did not acknowledge a bus transfer.
    Bus,
    /// Text could not be placed (row off-screen).
    OutOfBounds,
}

impl core::fmt::Display for DisplayError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Bus => write!(f, "display bus error"),
            Self::OutOfBounds => write!(f, "text out of bounds"),
        }
    }
}

/// Async trait for a small text status display.
///
/// Status output is advisory: callers log failures and carry on.
pub trait StatusDisplay {
    /// Blank the whole display.
    fn clear(&mut self) -> impl Future<Output = Result<(), DisplayError>>;

    /// Replace the contents of text row `row` with `text` and show it.
    fn draw_text(&mut self, row: u8, text: &str) -> impl Future<Output = Result<(), DisplayError>>;
}

/// A device without a display.
impl<D: StatusDisplay> StatusDisplay for Option<D> {
    async fn clear(&mut self) -> Result<(), DisplayError> {
        match self {
            Some(display) => display.clear().await,
            None => Ok(()),
        }
    }

    async fn draw_text(&mut self, row: u8, text: &str) -> Result<(), DisplayError> {
        match self {
            Some(display) => display.draw_text(row, text).await,
            None => Ok(()),
        }
    }
}
