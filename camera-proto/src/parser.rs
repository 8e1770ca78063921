//! Request line parser.
//!
//! A request is a single ASCII line of space-separated `key=value` tokens,
//! led by a `cmd=<NAME>` token:
//!
//! ```text
//! cmd=RESET-REQ pixformat=<RGB565|GRAYSCALE> framesize=<VGA|QVGA|QQVGA>
//! cmd=SNAPSHOT-REQ format=<JPEG> quality=<0-100>
//! cmd=DATA-REQ seq=<uint> offset=<uint> length=<uint>
//! cmd=PING msg=<token>
//! ```
//!
//! The four grammars are tried in that fixed order. The `cmd=` token may sit
//! anywhere in the line; its fields must follow it immediately and in order.
//! When a command token appears more than once, each occurrence is tried in
//! turn.
//! Anything after the last field is ignored. Tokens are case-sensitive.

use crate::command::{Command, Token};
use crate::types::{CommandKind, FrameSize, PixelFormat, SnapshotFormat};

/// Maximum line length for the protocol (excluding the newline).
pub const MAX_LINE_LENGTH: usize = 128;

/// Highest accepted JPEG quality.
pub const MAX_QUALITY: u32 = 100;

/// Why a line did not produce a [`Command`].
///
/// Every variant is a silent drop on the wire; the distinction only feeds
/// logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// No known `cmd=` token in the line.
    Unrecognized,
    /// A known command whose fields do not fit its grammar
    /// (missing, misnamed, empty, or non-numeric where a number is required).
    Malformed,
    /// Well-formed, but a value is outside the supported set
    /// (unknown pixel format or frame size, quality above 100).
    Unsupported,
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Unrecognized => write!(f, "unrecognized command"),
            Self::Malformed => write!(f, "malformed fields"),
            Self::Unsupported => write!(f, "unsupported value"),
        }
    }
}

type Matcher = fn(&str) -> Result<Option<Command>, ParseError>;

/// Matchers in the order they are attempted.
const MATCHERS: [Matcher; 4] = [match_reset, match_snapshot, match_data_request, match_ping];

/// Parse a request line (line ending already removed or not, either works).
///
/// Returns the first grammar that matches. A grammar whose command token is
/// present but whose fields are bad counts as a non-match and the remaining
/// grammars are still tried; its error is reported only if nothing matches.
///
/// # Example
///
/// ```
/// use camera_proto::{parse_command, Command};
///
/// let cmd = parse_command("cmd=DATA-REQ seq=3 offset=0 length=512").unwrap();
/// assert_eq!(
///     cmd,
///     Command::DataRequest { sequence: 3, offset: 0, length: 512 }
/// );
/// ```
pub fn parse_command(line: &str) -> Result<Command, ParseError> {
    let mut first_error = None;

    for matcher in MATCHERS {
        match matcher(line) {
            Ok(Some(command)) => return Ok(command),
            Ok(None) => {}
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }

    Err(first_error.unwrap_or(ParseError::Unrecognized))
}

/// Parse raw line bytes. Non-ASCII input is [`ParseError::Unrecognized`].
pub fn parse_command_bytes(line: &[u8]) -> Result<Command, ParseError> {
    if !line.is_ascii() {
        return Err(ParseError::Unrecognized);
    }
    let text = core::str::from_utf8(line).map_err(|_| ParseError::Unrecognized)?;
    parse_command(text)
}

fn match_reset(line: &str) -> Result<Option<Command>, ParseError> {
    match_fields(line, CommandKind::Reset, |fields| {
        let pixformat = fields.value("pixformat")?;
        let framesize = fields.value("framesize")?;

        let pixel_format = PixelFormat::from_token(pixformat).ok_or(ParseError::Unsupported)?;
        let frame_size = FrameSize::from_token(framesize).ok_or(ParseError::Unsupported)?;

        Ok(Command::Reset {
            pixel_format,
            frame_size,
        })
    })
}

fn match_snapshot(line: &str) -> Result<Option<Command>, ParseError> {
    match_fields(line, CommandKind::Snapshot, |fields| {
        let format = SnapshotFormat::from_token(fields.value("format")?);
        let quality = parse_u32(fields.value("quality")?)?;
        if quality > MAX_QUALITY {
            return Err(ParseError::Unsupported);
        }

        Ok(Command::Snapshot {
            format,
            // Bounded by MAX_QUALITY above
            quality: quality as u8,
        })
    })
}

fn match_data_request(line: &str) -> Result<Option<Command>, ParseError> {
    match_fields(line, CommandKind::DataRequest, |fields| {
        let sequence = parse_u32(fields.value("seq")?)?;
        let offset = parse_u32(fields.value("offset")?)?;
        let length = parse_u32(fields.value("length")?)?;

        Ok(Command::DataRequest {
            sequence,
            offset,
            length,
        })
    })
}

fn match_ping(line: &str) -> Result<Option<Command>, ParseError> {
    match_fields(line, CommandKind::Ping, |fields| {
        let msg = fields.value("msg")?;
        let mut message = Token::new();
        message.push_str(msg).map_err(|_| ParseError::Malformed)?;

        Ok(Command::Ping { message })
    })
}

/// Try `parse` after every `cmd=<NAME>` token for `kind`, left to right.
///
/// `Ok(None)` when the command token never appears. When it appears but no
/// occurrence is followed by valid fields, the first occurrence's error wins.
fn match_fields<'a, F>(line: &'a str, kind: CommandKind, parse: F) -> Result<Option<Command>, ParseError>
where
    F: Fn(&mut Fields<'a>) -> Result<Command, ParseError>,
{
    let mut tokens = tokenize(line);
    let mut first_error = None;

    while let Some(token) = tokens.next() {
        if token.strip_prefix("cmd=") != Some(kind.request_name()) {
            continue;
        }
        let mut fields = Fields {
            tokens: tokens.clone(),
        };
        match parse(&mut fields) {
            Ok(command) => return Ok(Some(command)),
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }

    first_error.map_or(Ok(None), Err)
}

/// Field cursor positioned just after a `cmd=<NAME>` token.
struct Fields<'a> {
    tokens: core::str::Split<'a, fn(char) -> bool>,
}

impl<'a> Fields<'a> {
    /// Take the next token, which must be `key=<non-empty value>`.
    fn value(&mut self, key: &str) -> Result<&'a str, ParseError> {
        let token = self.tokens.next().ok_or(ParseError::Malformed)?;
        let value = token
            .strip_prefix(key)
            .and_then(|rest| rest.strip_prefix('='))
            .ok_or(ParseError::Malformed)?;

        if value.is_empty() {
            return Err(ParseError::Malformed);
        }
        Ok(value)
    }
}

/// Split on single ASCII whitespace characters. Consecutive separators yield
/// empty tokens, which never satisfy a field.
#[inline]
fn tokenize(line: &str) -> core::str::Split<'_, fn(char) -> bool> {
    let is_separator: fn(char) -> bool = |c| c.is_ascii_whitespace();
    line.split(is_separator)
}

/// Parse a non-negative decimal integer. No sign, no whitespace, no overflow.
#[inline]
fn parse_u32(s: &str) -> Result<u32, ParseError> {
    if s.is_empty() {
        return Err(ParseError::Malformed);
    }

    let mut value: u32 = 0;
    for b in s.bytes() {
        if !b.is_ascii_digit() {
            return Err(ParseError::Malformed);
        }
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add((b - b'0') as u32))
            .ok_or(ParseError::Malformed)?;
    }

    Ok(value)
}
