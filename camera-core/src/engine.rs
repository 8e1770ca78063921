//! ProtocolEngine: serves host requests against the camera peripherals.

use core::fmt::{Debug, Write as _};

use camera_proto::{
    parse_command, Command, CommandKind, FrameSize, PixelFormat, Response, Serialize,
    SerializeError, SnapshotFormat, MAX_MESSAGE_SIZE,
};

use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::display::StatusDisplay;
use crate::framer::{LineEvent, LineFramer};
use crate::illumination::{IlluminationController, Light};
use crate::profile::DeviceProfile;
use crate::sensor::{Sensor, SensorSession};
use crate::session::Session;
use crate::snapshot::SnapshotError;
use crate::transport::{Transport, TransportError};

/// Title shown on the status display.
pub const DISPLAY_TITLE: &str = "CameraServer";

const TITLE_ROW: u8 = 0;
const CONFIG_ROW: u8 = 1;
const IMAGE_ROW: u8 = 2;

/// The peripherals the engine drives besides the host link.
pub struct Peripherals<S, L, D> {
    pub sensor: S,
    /// Illumination LED, `None` when the board has none.
    pub light: L,
    /// Status display, `None` when the board has none.
    pub display: D,
}

/// What a single [`ProtocolEngine::process_one`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollOutcome {
    /// No line this tick.
    Idle,
    /// No line for the configured number of polls; a housekeeping pass ran.
    Housekeeping,
    /// The framer dropped an unusable line.
    Discarded,
    /// A line arrived but matched no request grammar.
    Ignored,
    /// A well-formed request was refused without a response.
    Rejected(CommandKind),
    /// A request was served.
    Handled(CommandKind),
}

/// Error type for engine operations.
///
/// None of these are fatal: [`ProtocolEngine::run`] logs them and keeps
/// polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError<E> {
    /// Error from the host link.
    Transport(TransportError),
    /// Error from the sensor, passed through untranslated.
    Sensor(E),
    /// A response line did not fit its buffer.
    Serialize(SerializeError),
    /// The sensor reported more bytes than the image buffer holds.
    ImageOverflow,
}

impl<E: Debug> core::fmt::Display for EngineError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Sensor(e) => write!(f, "sensor: {e:?}"),
            Self::Serialize(e) => write!(f, "serialize: {e}"),
            Self::ImageOverflow => write!(f, "image larger than buffer"),
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: Debug> defmt::Format for EngineError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Transport(e) => defmt::write!(f, "Transport({})", e),
            Self::Sensor(e) => defmt::write!(f, "Sensor({})", defmt::Debug2Format(e)),
            Self::Serialize(e) => defmt::write!(f, "Serialize({})", e),
            Self::ImageOverflow => defmt::write!(f, "ImageOverflow"),
        }
    }
}

impl<E> From<TransportError> for EngineError<E> {
    fn from(err: TransportError) -> Self {
        Self::Transport(err)
    }
}

impl<E> From<SerializeError> for EngineError<E> {
    fn from(err: SerializeError) -> Self {
        Self::Serialize(err)
    }
}

impl<E> From<SnapshotError> for EngineError<E> {
    fn from(err: SnapshotError) -> Self {
        match err {
            SnapshotError::TooLarge => Self::ImageOverflow,
        }
    }
}

/// Serves the line protocol on one host link.
///
/// Each [`process_one`](Self::process_one) call polls the link once, handles
/// at most one request, and advances the illumination timer. Requests are
/// served strictly in arrival order; rejected requests produce no output.
pub struct ProtocolEngine<'a, T, S, L, D, C> {
    transport: T,
    framer: LineFramer,
    sensor: SensorSession<S>,
    illumination: IlluminationController<L>,
    display: D,
    clock: C,
    session: Session<'a>,
    profile: DeviceProfile,
    config: EngineConfig,
    polls_without_line: u32,
}

impl<'a, T, S, L, D, C> ProtocolEngine<'a, T, S, L, D, C>
where
    T: Transport,
    S: Sensor,
    L: Light,
    D: StatusDisplay,
    C: Clock,
{
    /// Create an engine. `storage` holds captured images.
    pub fn new(
        transport: T,
        peripherals: Peripherals<S, L, D>,
        clock: C,
        storage: &'a mut [u8],
        profile: DeviceProfile,
        config: EngineConfig,
    ) -> Self {
        Self {
            transport,
            framer: LineFramer::new(),
            sensor: SensorSession::new(peripherals.sensor, profile.settle_ms),
            illumination: IlluminationController::new(
                peripherals.light,
                config.illumination_hold_ms,
            ),
            display: peripherals.display,
            clock,
            session: Session::new(
                storage,
                profile.default_pixel_format,
                profile.default_frame_size,
            ),
            profile,
            config,
            polls_without_line: 0,
        }
    }

    /// Bring the peripherals to their startup state: reset the sensor to the
    /// profile defaults and draw the status screen.
    ///
    /// # Errors
    ///
    /// Returns the sensor's error if the reset fails.
    pub async fn start(&mut self) -> Result<(), EngineError<S::Error>> {
        info!(
            "starting on {} board, buffer {} bytes",
            self.profile.model.name(),
            self.session.snapshot().capacity()
        );

        if let Err(e) = self.display.clear().await {
            warn!("display clear failed: {:?}", e);
        }
        self.show(TITLE_ROW, DISPLAY_TITLE).await;

        let (format, size) = (self.session.pixel_format, self.session.frame_size);
        self.sensor
            .reset(format, size)
            .await
            .map_err(EngineError::Sensor)?;
        self.show_config(format, size).await;
        Ok(())
    }

    /// Run the engine, serving requests indefinitely.
    ///
    /// This method never returns under normal operation.
    pub async fn run(&mut self) -> ! {
        loop {
            if let Err(e) = self.process_one().await {
                error!("engine error: {:?}", e);
            }
        }
    }

    /// Poll the host link once and serve at most one request.
    ///
    /// Returns what happened for testing purposes.
    ///
    /// # Errors
    ///
    /// Transport, sensor and serialization failures. The session stays
    /// consistent after any of them.
    pub async fn process_one(&mut self) -> Result<PollOutcome, EngineError<S::Error>> {
        let event = self
            .framer
            .poll(&mut self.transport, self.config.poll_timeout_ms)
            .await;

        if self.illumination.tick(self.clock.now_ms()) {
            trace!("illumination off");
        }

        match event? {
            LineEvent::Line => {
                self.polls_without_line = 0;
                self.dispatch_line().await
            }
            LineEvent::Garbage => {
                trace!("dropped unusable line");
                Ok(self.count_idle_poll().unwrap_or(PollOutcome::Discarded))
            }
            LineEvent::NoData => Ok(self.count_idle_poll().unwrap_or(PollOutcome::Idle)),
        }
    }

    /// Returns [`PollOutcome::Housekeeping`] when the liveness interval has
    /// elapsed.
    fn count_idle_poll(&mut self) -> Option<PollOutcome> {
        self.polls_without_line = self.polls_without_line.saturating_add(1);
        if self.polls_without_line < self.config.liveness_polls {
            return None;
        }
        self.polls_without_line = 0;
        self.housekeeping();
        Some(PollOutcome::Housekeeping)
    }

    /// Runs in place of an empty request line when the host has been quiet.
    fn housekeeping(&mut self) {
        trace!(
            "idle housekeeping, seq {}, light {}",
            self.session.last_sequence(),
            self.illumination.is_on()
        );
    }

    async fn dispatch_line(&mut self) -> Result<PollOutcome, EngineError<S::Error>> {
        let command = match parse_command(self.framer.line()) {
            Ok(command) => command,
            Err(e) => {
                trace!("ignored line: {:?}", e);
                return Ok(PollOutcome::Ignored);
            }
        };
        let kind = command.kind();
        debug!("request {}", kind.request_name());

        let handled = match command {
            Command::Reset {
                pixel_format,
                frame_size,
            } => self.handle_reset(pixel_format, frame_size).await?,
            Command::Snapshot { format, quality } => self.handle_snapshot(format, quality).await?,
            Command::DataRequest {
                sequence,
                offset,
                length,
            } => self.handle_data_request(sequence, offset, length).await?,
            Command::Ping { message } => {
                send(&mut self.transport, &Response::Pong { message: message.as_str() }).await?;
                true
            }
        };

        Ok(if handled {
            PollOutcome::Handled(kind)
        } else {
            PollOutcome::Rejected(kind)
        })
    }

    async fn handle_reset(
        &mut self,
        format: PixelFormat,
        size: FrameSize,
    ) -> Result<bool, EngineError<S::Error>> {
        if let Err(e) = self.sensor.reset(format, size).await {
            warn!("sensor reset failed");
            return Err(EngineError::Sensor(e));
        }
        self.session.pixel_format = format;
        self.session.frame_size = size;

        send(&mut self.transport, &Response::ResetOk).await?;
        self.show_config(format, size).await;
        Ok(true)
    }

    async fn handle_snapshot(
        &mut self,
        format: SnapshotFormat,
        quality: u8,
    ) -> Result<bool, EngineError<S::Error>> {
        if format != SnapshotFormat::Jpeg {
            trace!("snapshot format not supported");
            return Ok(false);
        }

        let sequence = self.session.begin_capture();
        self.illumination.signal_active(self.clock.now_ms());

        let storage = self.session.snapshot_mut().begin();
        let len = match self.sensor.capture(quality, storage).await {
            Ok(len) => len,
            Err(e) => {
                warn!("capture {} failed", sequence);
                return Err(EngineError::Sensor(e));
            }
        };
        let image = self.session.snapshot_mut().commit(sequence, len)?;
        debug!("captured seq {} size {}", image.sequence, image.len);

        send(
            &mut self.transport,
            &Response::Snapshot {
                sequence: image.sequence,
                size: image.len,
            },
        )
        .await?;

        let mut status: heapless::String<32> = heapless::String::new();
        if write!(status, "#{} {}B", image.sequence, image.len).is_ok() {
            self.show(IMAGE_ROW, &status).await;
        }
        Ok(true)
    }

    async fn handle_data_request(
        &mut self,
        sequence: u32,
        offset: u32,
        length: u32,
    ) -> Result<bool, EngineError<S::Error>> {
        let Some(chunk) = self.session.snapshot().chunk(sequence, offset, length) else {
            trace!("data request out of range: seq {} offset {} length {}", sequence, offset, length);
            return Ok(false);
        };

        let header = Response::Data {
            sequence: chunk.sequence,
            offset: chunk.offset,
            length: chunk.length,
            crc32: chunk.crc32,
        };
        send(&mut self.transport, &header).await?;
        self.transport.write_all(chunk.bytes).await?;
        Ok(true)
    }

    async fn show_config(&mut self, format: PixelFormat, size: FrameSize) {
        let mut status: heapless::String<32> = heapless::String::new();
        if write!(status, "{} {}", format.as_str(), size.as_str()).is_ok() {
            self.show(CONFIG_ROW, &status).await;
        }
    }

    /// Best-effort status output.
    async fn show(&mut self, row: u8, text: &str) {
        if let Err(e) = self.display.draw_text(row, text).await {
            warn!("display update failed: {:?}", e);
        }
    }

    /// The protocol state.
    pub fn session(&self) -> &Session<'a> {
        &self.session
    }

    pub fn profile(&self) -> &DeviceProfile {
        &self.profile
    }

    pub fn illumination(&self) -> &IlluminationController<L> {
        &self.illumination
    }

    /// Get a reference to the host link.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Get a mutable reference to the host link.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn sensor(&self) -> &S {
        self.sensor.sensor()
    }

    pub fn sensor_mut(&mut self) -> &mut S {
        self.sensor.sensor_mut()
    }

    pub fn display(&self) -> &D {
        &self.display
    }
}

/// Serialize one response line and write it to the link.
async fn send<T: Transport, E>(
    transport: &mut T,
    response: &Response<'_>,
) -> Result<(), EngineError<E>> {
    let mut buf = [0u8; MAX_MESSAGE_SIZE];
    let len = response.serialize(&mut buf)?;
    transport.write_all(&buf[..len]).await?;
    Ok(())
}
