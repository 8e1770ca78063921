//! Newline framing over a [`Transport`].
//!
//! The framer accumulates bytes until `\n` and hands out one normalized line
//! at a time. A partial line survives a read timeout and is completed on a
//! later poll.

use camera_proto::MAX_LINE_LENGTH;
use heapless::Vec;

use crate::transport::{Transport, TransportError};

/// Bytes pulled from the transport per read.
const RX_CHUNK: usize = 64;

/// Outcome of a single [`LineFramer::poll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineEvent {
    /// A complete line is available through [`LineFramer::line`].
    Line,
    /// Nothing completed this tick.
    NoData,
    /// A line was terminated but is unusable (empty, starts with NUL,
    /// non-ASCII, or longer than [`MAX_LINE_LENGTH`]) and was dropped.
    Garbage,
}

/// Splits the host byte stream into request lines.
pub struct LineFramer {
    line: Vec<u8, MAX_LINE_LENGTH>,
    /// Drop everything up to the next `\n`.
    discarding: bool,
    /// Trimmed bounds of the completed line, if one is pending.
    ready: Option<(usize, usize)>,
    rx: [u8; RX_CHUNK],
    rx_start: usize,
    rx_end: usize,
}

impl LineFramer {
    /// Create an empty framer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            line: Vec::new(),
            discarding: false,
            ready: None,
            rx: [0; RX_CHUNK],
            rx_start: 0,
            rx_end: 0,
        }
    }

    /// Poll the transport for the next line.
    ///
    /// Waits at most `timeout_ms` for each read and consumes at most
    /// `MAX_LINE_LENGTH + 1` bytes, so a stream without newlines cannot hold
    /// the caller indefinitely. Bytes following a completed line are kept for
    /// the next poll.
    ///
    /// # Errors
    ///
    /// Propagates transport errors. The line being assembled when the error
    /// occurs is dropped up to its newline; an error between lines loses
    /// nothing.
    pub async fn poll<T: Transport>(
        &mut self,
        transport: &mut T,
        timeout_ms: u32,
    ) -> Result<LineEvent, TransportError> {
        if self.ready.take().is_some() {
            self.line.clear();
        }

        for _ in 0..=MAX_LINE_LENGTH {
            if self.rx_start == self.rx_end {
                let n = match transport.read(&mut self.rx, timeout_ms).await {
                    Ok(n) => n.min(RX_CHUNK),
                    Err(e) => {
                        // Only a line already in progress is corrupted
                        self.discarding |= !self.line.is_empty();
                        self.line.clear();
                        return Err(e);
                    }
                };
                if n == 0 {
                    return Ok(LineEvent::NoData);
                }
                self.rx_start = 0;
                self.rx_end = n;
            }

            let byte = self.rx[self.rx_start];
            self.rx_start += 1;

            if let Some(event) = self.push(byte) {
                return Ok(event);
            }
        }

        Ok(LineEvent::NoData)
    }

    /// The line completed by the last poll that returned [`LineEvent::Line`].
    ///
    /// Empty when no line is pending.
    #[must_use]
    pub fn line(&self) -> &str {
        match self.ready {
            // ASCII was checked when the line completed
            Some((start, end)) => core::str::from_utf8(&self.line[start..end]).unwrap_or_default(),
            None => "",
        }
    }

    /// Drop any partial or pending line and buffered bytes.
    pub fn reset(&mut self) {
        self.line.clear();
        self.discarding = false;
        self.ready = None;
        self.rx_start = 0;
        self.rx_end = 0;
    }

    fn push(&mut self, byte: u8) -> Option<LineEvent> {
        if byte == b'\n' {
            let event = if self.discarding {
                self.line.clear();
                LineEvent::Garbage
            } else {
                self.complete()
            };
            self.discarding = false;
            return Some(event);
        }

        if !self.discarding && self.line.push(byte).is_err() {
            self.line.clear();
            self.discarding = true;
        }
        None
    }

    fn complete(&mut self) -> LineEvent {
        let usable = self.line.first().is_some_and(|&b| b != 0) && self.line.is_ascii();
        let bounds = usable.then(|| trim_bounds(&self.line)).flatten();

        match bounds {
            Some(bounds) => {
                self.ready = Some(bounds);
                LineEvent::Line
            }
            None => {
                self.line.clear();
                LineEvent::Garbage
            }
        }
    }
}

impl Default for LineFramer {
    fn default() -> Self {
        Self::new()
    }
}

/// Bounds of `bytes` without leading/trailing ASCII whitespace, or `None`
/// when nothing remains.
fn trim_bounds(bytes: &[u8]) -> Option<(usize, usize)> {
    let start = bytes.iter().position(|b| !b.is_ascii_whitespace())?;
    let end = bytes.iter().rposition(|b| !b.is_ascii_whitespace())? + 1;
    Some((start, end))
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::test_support::{block_on, MockTransport};
    use std::vec;

    fn poll(framer: &mut LineFramer, transport: &mut MockTransport) -> LineEvent {
        block_on(framer.poll(transport, 10)).unwrap()
    }

    #[test]
    fn test_complete_line() {
        let mut transport = MockTransport::with_input(vec![b"cmd=PING msg=hi\n".to_vec()]);
        let mut framer = LineFramer::new();

        assert_eq!(poll(&mut framer, &mut transport), LineEvent::Line);
        assert_eq!(framer.line(), "cmd=PING msg=hi");
        assert_eq!(poll(&mut framer, &mut transport), LineEvent::NoData);
        assert_eq!(framer.line(), "");
    }

    #[test]
    fn test_line_is_trimmed() {
        let mut transport = MockTransport::with_input(vec![b"  cmd=PING msg=hi \r\n".to_vec()]);
        let mut framer = LineFramer::new();

        assert_eq!(poll(&mut framer, &mut transport), LineEvent::Line);
        assert_eq!(framer.line(), "cmd=PING msg=hi");
    }

    #[test]
    fn test_partial_line_survives_timeout() {
        let mut transport = MockTransport::with_input(vec![
            b"cmd=PI".to_vec(),
            vec![],
            b"NG msg=x\n".to_vec(),
        ]);
        let mut framer = LineFramer::new();

        assert_eq!(poll(&mut framer, &mut transport), LineEvent::NoData);
        assert_eq!(poll(&mut framer, &mut transport), LineEvent::Line);
        assert_eq!(framer.line(), "cmd=PING msg=x");
    }

    #[test]
    fn test_two_lines_in_one_read() {
        let mut transport = MockTransport::with_input(vec![b"first\nsecond\n".to_vec()]);
        let mut framer = LineFramer::new();

        assert_eq!(poll(&mut framer, &mut transport), LineEvent::Line);
        assert_eq!(framer.line(), "first");
        assert_eq!(poll(&mut framer, &mut transport), LineEvent::Line);
        assert_eq!(framer.line(), "second");
    }

    #[test]
    fn test_garbage_lines() {
        let mut transport = MockTransport::with_input(vec![
            b"\n".to_vec(),
            b"   \r\n".to_vec(),
            b"\x00cmd=PING msg=a\n".to_vec(),
            b"cmd=PING msg=\xC3\xA9\n".to_vec(),
            b"cmd=PING msg=ok\n".to_vec(),
        ]);
        let mut framer = LineFramer::new();

        for _ in 0..4 {
            assert_eq!(poll(&mut framer, &mut transport), LineEvent::Garbage);
        }
        assert_eq!(poll(&mut framer, &mut transport), LineEvent::Line);
        assert_eq!(framer.line(), "cmd=PING msg=ok");
    }

    #[test]
    fn test_overlong_line_dropped_entirely() {
        let mut long = vec![b'a'; MAX_LINE_LENGTH + 40];
        long.push(b'\n');
        let mut transport =
            MockTransport::with_input(vec![long, b"cmd=PING msg=after\n".to_vec()]);
        let mut framer = LineFramer::new();

        // The first poll stops at its byte budget before the newline arrives
        assert_eq!(poll(&mut framer, &mut transport), LineEvent::NoData);
        assert_eq!(poll(&mut framer, &mut transport), LineEvent::Garbage);
        assert_eq!(poll(&mut framer, &mut transport), LineEvent::Line);
        assert_eq!(framer.line(), "cmd=PING msg=after");
    }

    #[test]
    fn test_max_length_line_accepted() {
        let mut line = vec![b'x'; MAX_LINE_LENGTH];
        line.push(b'\n');
        let mut transport = MockTransport::with_input(vec![line]);
        let mut framer = LineFramer::new();

        assert_eq!(poll(&mut framer, &mut transport), LineEvent::Line);
        assert_eq!(framer.line().len(), MAX_LINE_LENGTH);
    }

    #[test]
    fn test_transport_error_drops_partial_line() {
        let mut transport = MockTransport::with_input(vec![b"cmd=PI".to_vec()]);
        let mut framer = LineFramer::new();
        assert_eq!(poll(&mut framer, &mut transport), LineEvent::NoData);

        transport.fail_next_read(TransportError::Framing);
        assert_eq!(
            block_on(framer.poll(&mut transport, 10)),
            Err(TransportError::Framing)
        );

        transport.push_input(b"NG msg=x\ncmd=PING msg=y\n");
        assert_eq!(poll(&mut framer, &mut transport), LineEvent::Garbage);
        assert_eq!(poll(&mut framer, &mut transport), LineEvent::Line);
        assert_eq!(framer.line(), "cmd=PING msg=y");
    }

    #[test]
    fn test_transport_error_between_lines_keeps_next_line() {
        let mut transport = MockTransport::with_input(vec![b"cmd=PING msg=a\n".to_vec()]);
        let mut framer = LineFramer::new();
        assert_eq!(poll(&mut framer, &mut transport), LineEvent::Line);

        transport.fail_next_read(TransportError::Overrun);
        assert_eq!(
            block_on(framer.poll(&mut transport, 10)),
            Err(TransportError::Overrun)
        );

        transport.push_input(b"cmd=PING msg=b\n");
        assert_eq!(poll(&mut framer, &mut transport), LineEvent::Line);
        assert_eq!(framer.line(), "cmd=PING msg=b");
    }

    #[test]
    fn test_reset_clears_state() {
        let mut transport = MockTransport::with_input(vec![b"partial".to_vec()]);
        let mut framer = LineFramer::new();
        assert_eq!(poll(&mut framer, &mut transport), LineEvent::NoData);

        framer.reset();
        transport.push_input(b"fresh\n");
        assert_eq!(poll(&mut framer, &mut transport), LineEvent::Line);
        assert_eq!(framer.line(), "fresh");
    }
}
