//! Engine timing configuration.

/// Timing knobs for [`ProtocolEngine`](crate::ProtocolEngine).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EngineConfig {
    /// Longest wait for host bytes in one poll.
    pub poll_timeout_ms: u32,
    /// Consecutive polls without a line before a housekeeping pass.
    pub liveness_polls: u32,
    /// How long the illumination LED stays on after the last capture start.
    pub illumination_hold_ms: u64,
}

impl EngineConfig {
    pub const DEFAULT: Self = Self {
        poll_timeout_ms: 10,
        liveness_polls: 1000,
        illumination_hold_ms: 2000,
    };
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
