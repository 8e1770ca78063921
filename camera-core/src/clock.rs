//! Monotonic time source.

/// Monotonic millisecond clock.
///
/// Only differences between readings are meaningful; the epoch is
/// implementation-defined (boot time on the device).
pub trait Clock {
    /// Milliseconds elapsed since an arbitrary fixed point.
    fn now_ms(&self) -> u64;
}

impl<C: Clock> Clock for &C {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}
