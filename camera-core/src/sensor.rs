//! Image sensor capability and reset sequencing.

use core::fmt::Debug;
use core::future::Future;

use camera_proto::{FrameSize, PixelFormat};

/// Async trait for the image sensor.
///
/// The engine never interprets `Error`; faults are passed through to the
/// caller untranslated.
pub trait Sensor {
    /// Sensor-specific error type.
    type Error: Debug;

    /// Return the sensor to its power-on configuration.
    fn reset(&mut self) -> impl Future<Output = Result<(), Self::Error>>;

    /// Select the pixel format for subsequent frames.
    fn set_pixel_format(&mut self, format: PixelFormat)
        -> impl Future<Output = Result<(), Self::Error>>;

    /// Select the frame size for subsequent frames.
    fn set_frame_size(&mut self, size: FrameSize) -> impl Future<Output = Result<(), Self::Error>>;

    /// Discard frames for `duration_ms` while exposure settles.
    fn skip_frames(&mut self, duration_ms: u32) -> impl Future<Output = Result<(), Self::Error>>;

    /// Acquire one frame, JPEG-compress it at `quality` (0-100) into `out`,
    /// and return the compressed length.
    ///
    /// The returned length must not exceed `out.len()`.
    fn capture_jpeg(
        &mut self,
        quality: u8,
        out: &mut [u8],
    ) -> impl Future<Output = Result<usize, Self::Error>>;
}

/// Applies reset requests to a [`Sensor`] and forwards captures.
pub struct SensorSession<S> {
    sensor: S,
    settle_ms: u32,
}

impl<S: Sensor> SensorSession<S> {
    /// Wrap a sensor. `settle_ms` is the exposure settle time after a reset.
    pub fn new(sensor: S, settle_ms: u32) -> Self {
        Self { sensor, settle_ms }
    }

    /// Reset the sensor, apply format and size, then let exposure settle.
    ///
    /// The settle step runs on every reset, including one that repeats the
    /// current configuration.
    ///
    /// # Errors
    ///
    /// Stops at the first failing step and returns the sensor's error.
    pub async fn reset(&mut self, format: PixelFormat, size: FrameSize) -> Result<(), S::Error> {
        self.sensor.reset().await?;
        self.sensor.set_pixel_format(format).await?;
        self.sensor.set_frame_size(size).await?;
        self.sensor.skip_frames(self.settle_ms).await
    }

    /// Capture one JPEG frame into `out`.
    ///
    /// # Errors
    ///
    /// Returns the sensor's error.
    pub async fn capture(&mut self, quality: u8, out: &mut [u8]) -> Result<usize, S::Error> {
        self.sensor.capture_jpeg(quality, out).await
    }

    /// Get a reference to the sensor.
    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    /// Get a mutable reference to the sensor.
    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::test_support::{block_on, MockSensor, SensorCall};
    use std::vec;

    #[test]
    fn test_reset_sequence() {
        let mut session = SensorSession::new(MockSensor::new(0), 100);
        block_on(session.reset(PixelFormat::Grayscale, FrameSize::Vga)).unwrap();

        assert_eq!(
            session.sensor().calls,
            vec![
                SensorCall::Reset,
                SensorCall::PixelFormat(PixelFormat::Grayscale),
                SensorCall::FrameSize(FrameSize::Vga),
                SensorCall::SkipFrames(100),
            ]
        );
    }

    #[test]
    fn test_repeated_reset_settles_again() {
        let mut session = SensorSession::new(MockSensor::new(0), 50);
        block_on(session.reset(PixelFormat::Rgb565, FrameSize::Qqvga)).unwrap();
        block_on(session.reset(PixelFormat::Rgb565, FrameSize::Qqvga)).unwrap();

        let settles = session
            .sensor()
            .calls
            .iter()
            .filter(|c| matches!(c, SensorCall::SkipFrames(50)))
            .count();
        assert_eq!(settles, 2);
    }

    #[test]
    fn test_capture_forwards_quality() {
        let mut session = SensorSession::new(MockSensor::new(10), 0);
        let mut out = [0u8; 32];
        assert_eq!(block_on(session.capture(42, &mut out)), Ok(10));
        assert_eq!(session.sensor().calls, vec![SensorCall::Capture(42)]);
    }

    #[test]
    fn test_capture_fault_passed_through() {
        let mut sensor = MockSensor::new(10);
        sensor.fail_capture = true;
        let mut session = SensorSession::new(sensor, 0);
        let mut out = [0u8; 32];
        assert!(block_on(session.capture(80, &mut out)).is_err());
    }
}
