// Haptic feedback capability
//
// Haptics accompany the rest phase. The pattern policy lives in the
// implementation, not the engine: requests of one second or less issue a
// single pulse, longer requests run a repeating 500ms-on/500ms-off pattern
// for the whole duration.

use std::time::Duration;

use tracing::debug;

/// Pattern segment length for long pulses
pub const PATTERN_SEGMENT: Duration = Duration::from_millis(500);

/// Haptic output collaborator.
///
/// A missing vibration motor degrades silently: implementations log and
/// return rather than failing the run.
pub trait Haptics: Send + Sync {
    /// Vibrate for `duration`, applying the pattern policy.
    fn pulse(&self, duration: Duration);

    /// Stop any ongoing vibration.
    fn stop(&self);
}

/// Haptics that log what a motor would do.
#[derive(Debug, Clone, Default)]
pub struct ConsoleHaptics;

impl Haptics for ConsoleHaptics {
    fn pulse(&self, duration: Duration) {
        if duration <= Duration::from_secs(1) {
            debug!("haptics: single pulse for {:?}", duration);
        } else {
            debug!(
                "haptics: repeating {:?} on/off pattern for {:?}",
                PATTERN_SEGMENT, duration
            );
        }
    }

    fn stop(&self) {
        debug!("haptics: stop");
    }
}

/// Haptics that do nothing.
#[derive(Debug, Clone, Default)]
pub struct NullHaptics;

impl Haptics for NullHaptics {
    fn pulse(&self, _duration: Duration) {}

    fn stop(&self) {}
}
