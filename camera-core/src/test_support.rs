//! Mock collaborators and a minimal executor shared by the unit tests.

extern crate std;

use core::cell::Cell;
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};
use std::collections::VecDeque;
use std::string::String;
use std::vec::Vec;

use camera_proto::{FrameSize, PixelFormat};

use crate::clock::Clock;
use crate::display::{DisplayError, StatusDisplay};
use crate::illumination::Light;
use crate::profile::BusScanner;
use crate::sensor::Sensor;
use crate::transport::{Transport, TransportError};

// Helper to run a future to completion (simple blocking executor)
pub fn block_on<F: Future>(mut f: F) -> F::Output {
    fn noop_raw_waker() -> RawWaker {
        fn noop(_: *const ()) {}
        fn clone(_: *const ()) -> RawWaker {
            noop_raw_waker()
        }
        static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, noop, noop, noop);
        RawWaker::new(core::ptr::null(), &VTABLE)
    }

    let waker = unsafe { Waker::from_raw(noop_raw_waker()) };
    let mut cx = Context::from_waker(&waker);

    // SAFETY: We don't move f after pinning
    let mut f = unsafe { Pin::new_unchecked(&mut f) };

    loop {
        match f.as_mut().poll(&mut cx) {
            Poll::Ready(result) => return result,
            Poll::Pending => {
                panic!("Mock future returned Pending unexpectedly");
            }
        }
    }
}

/// Scripted host link. Each queued chunk is returned by one read; an empty
/// chunk (or an empty queue) reads as a timeout.
#[derive(Default)]
pub struct MockTransport {
    incoming: VecDeque<Vec<u8>>,
    pub written: Vec<u8>,
    read_error: Option<TransportError>,
    pub reads: usize,
}

impl MockTransport {
    pub fn with_input(chunks: Vec<Vec<u8>>) -> Self {
        Self {
            incoming: chunks.into(),
            ..Self::default()
        }
    }

    pub fn push_input(&mut self, bytes: &[u8]) {
        self.incoming.push_back(bytes.to_vec());
    }

    pub fn fail_next_read(&mut self, error: TransportError) {
        self.read_error = Some(error);
    }

    /// Take everything written so far.
    pub fn take_written(&mut self) -> Vec<u8> {
        core::mem::take(&mut self.written)
    }
}

impl Transport for MockTransport {
    fn read(
        &mut self,
        buf: &mut [u8],
        _timeout_ms: u32,
    ) -> impl Future<Output = Result<usize, TransportError>> {
        self.reads += 1;
        let result = if let Some(error) = self.read_error.take() {
            Err(error)
        } else {
            match self.incoming.front_mut() {
                Some(chunk) => {
                    let n = chunk.len().min(buf.len());
                    buf[..n].copy_from_slice(&chunk[..n]);
                    chunk.drain(..n);
                    if chunk.is_empty() {
                        self.incoming.pop_front();
                    }
                    Ok(n)
                }
                None => Ok(0),
            }
        };
        core::future::ready(result)
    }

    fn write_all(&mut self, data: &[u8]) -> impl Future<Output = Result<(), TransportError>> {
        self.written.extend_from_slice(data);
        core::future::ready(Ok(()))
    }
}

/// Manually advanced clock.
#[derive(Default)]
pub struct MockClock {
    now: Cell<u64>,
}

impl MockClock {
    pub fn set(&self, now_ms: u64) {
        self.now.set(now_ms);
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorCall {
    Reset,
    PixelFormat(PixelFormat),
    FrameSize(FrameSize),
    SkipFrames(u32),
    Capture(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockSensorError;

/// Sensor producing a deterministic image of `image_len` bytes.
pub struct MockSensor {
    pub calls: Vec<SensorCall>,
    pub image_len: usize,
    pub fail_capture: bool,
    /// Length to report instead of the bytes actually written.
    pub claimed_len: Option<usize>,
    captures: u8,
}

impl MockSensor {
    pub fn new(image_len: usize) -> Self {
        Self {
            calls: Vec::new(),
            image_len,
            fail_capture: false,
            claimed_len: None,
            captures: 0,
        }
    }

    /// Byte `i` of the `n`th captured image (1-based).
    pub fn image_byte(n: u8, i: usize) -> u8 {
        (i as u8).wrapping_mul(7).wrapping_add(n)
    }
}

impl Sensor for MockSensor {
    type Error = MockSensorError;

    async fn reset(&mut self) -> Result<(), Self::Error> {
        self.calls.push(SensorCall::Reset);
        Ok(())
    }

    async fn set_pixel_format(&mut self, format: PixelFormat) -> Result<(), Self::Error> {
        self.calls.push(SensorCall::PixelFormat(format));
        Ok(())
    }

    async fn set_frame_size(&mut self, size: FrameSize) -> Result<(), Self::Error> {
        self.calls.push(SensorCall::FrameSize(size));
        Ok(())
    }

    async fn skip_frames(&mut self, duration_ms: u32) -> Result<(), Self::Error> {
        self.calls.push(SensorCall::SkipFrames(duration_ms));
        Ok(())
    }

    async fn capture_jpeg(&mut self, quality: u8, out: &mut [u8]) -> Result<usize, Self::Error> {
        self.calls.push(SensorCall::Capture(quality));
        if self.fail_capture {
            return Err(MockSensorError);
        }
        self.captures = self.captures.wrapping_add(1);
        let len = self.image_len.min(out.len());
        for (i, byte) in out[..len].iter_mut().enumerate() {
            *byte = Self::image_byte(self.captures, i);
        }
        Ok(self.claimed_len.unwrap_or(len))
    }
}

#[derive(Default)]
pub struct MockLight {
    pub on: bool,
    pub switches: usize,
}

impl Light for MockLight {
    fn set(&mut self, on: bool) {
        if self.on != on {
            self.switches += 1;
        }
        self.on = on;
    }
}

#[derive(Default)]
pub struct MockDisplay {
    pub clears: usize,
    pub rows: Vec<(u8, String)>,
    pub fail: bool,
}

impl StatusDisplay for MockDisplay {
    async fn clear(&mut self) -> Result<(), DisplayError> {
        if self.fail {
            return Err(DisplayError::Bus);
        }
        self.clears += 1;
        self.rows.clear();
        Ok(())
    }

    async fn draw_text(&mut self, row: u8, text: &str) -> Result<(), DisplayError> {
        if self.fail {
            return Err(DisplayError::Bus);
        }
        self.rows.retain(|(r, _)| *r != row);
        self.rows.push((row, text.into()));
        Ok(())
    }
}

/// Bus with a fixed set of responding addresses.
pub struct MockBus {
    pub devices: Vec<u8>,
}

impl BusScanner for MockBus {
    fn probe(&mut self, address: u8) -> bool {
        self.devices.contains(&address)
    }
}
