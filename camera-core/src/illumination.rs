//! Illumination LED with a hold timer.
//!
//! The light turns on when a capture starts and stays on until no capture has
//! started for the hold period, so back-to-back snapshots do not flicker it.

/// On/off output driving the illumination LED.
pub trait Light {
    /// Switch the light on or off.
    fn set(&mut self, on: bool);
}

/// A device without an illumination LED.
impl<L: Light> Light for Option<L> {
    fn set(&mut self, on: bool) {
        if let Some(light) = self {
            light.set(on);
        }
    }
}

/// Current illumination state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IlluminationState {
    Off,
    /// On since the last capture start at `since_ms`.
    On { since_ms: u64 },
}

/// Debounced on/off controller for a [`Light`].
pub struct IlluminationController<L> {
    light: L,
    state: IlluminationState,
    hold_ms: u64,
}

impl<L: Light> IlluminationController<L> {
    /// Create a controller and switch the light off.
    pub fn new(mut light: L, hold_ms: u64) -> Self {
        light.set(false);
        Self {
            light,
            state: IlluminationState::Off,
            hold_ms,
        }
    }

    /// A capture is starting: switch on if off, and restart the hold period.
    pub fn signal_active(&mut self, now_ms: u64) {
        if self.state == IlluminationState::Off {
            self.light.set(true);
        }
        self.state = IlluminationState::On { since_ms: now_ms };
    }

    /// Advance the timer. Returns `true` if this call switched the light off.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        match self.state {
            IlluminationState::On { since_ms } if now_ms.saturating_sub(since_ms) >= self.hold_ms => {
                self.light.set(false);
                self.state = IlluminationState::Off;
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn state(&self) -> IlluminationState {
        self.state
    }

    #[must_use]
    pub fn is_on(&self) -> bool {
        matches!(self.state, IlluminationState::On { .. })
    }

    /// Get a reference to the light.
    pub fn light(&self) -> &L {
        &self.light
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockLight;

    #[test]
    fn test_starts_off() {
        let controller = IlluminationController::new(MockLight::default(), 2000);
        assert_eq!(controller.state(), IlluminationState::Off);
        assert!(!controller.light().on);
    }

    #[test]
    fn test_hold_period() {
        let mut controller = IlluminationController::new(MockLight::default(), 2000);
        controller.signal_active(1000);
        assert!(controller.light().on);

        assert!(!controller.tick(1000));
        assert!(!controller.tick(2999));
        assert!(controller.is_on());

        assert!(controller.tick(3000));
        assert!(!controller.light().on);
        assert!(!controller.tick(3001), "switches off exactly once");
        assert!(!controller.tick(10_000));
        assert_eq!(controller.light().switches, 2);
    }

    #[test]
    fn test_signal_rearms_without_toggling() {
        let mut controller = IlluminationController::new(MockLight::default(), 2000);
        controller.signal_active(0);
        controller.signal_active(1500);
        assert_eq!(controller.state(), IlluminationState::On { since_ms: 1500 });

        assert!(!controller.tick(3000));
        assert!(controller.tick(3500));
        assert_eq!(controller.light().switches, 2);
    }

    #[test]
    fn test_clock_going_backwards_keeps_light_on() {
        let mut controller = IlluminationController::new(MockLight::default(), 2000);
        controller.signal_active(5000);
        assert!(!controller.tick(100));
        assert!(controller.is_on());
    }

    #[test]
    fn test_absent_light() {
        let mut controller = IlluminationController::new(None::<MockLight>, 10);
        controller.signal_active(0);
        assert!(controller.is_on());
        assert!(controller.tick(10));
        assert!(controller.light().is_none());
    }
}
