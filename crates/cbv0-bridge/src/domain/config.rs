//! Runtime settings of the report synthesizer.
//!
//! [`SynthesizerConfig`] is a plain struct with no I/O.  The infrastructure
//! layer builds it from the TOML file and CLI flags; tests build it from
//! [`Default`] and override single fields.

use std::time::Duration;

/// Timing and filtering parameters of the HID state machine.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizerConfig {
    /// Spacing of mouse / gamepad reports.
    pub tick_interval: Duration,
    /// How long a momentary press (`op = Press`) stays down.
    pub press_duration: Duration,
    /// How long a bare trigger action stays down.
    pub pulse_duration: Duration,
    /// Upper bound on a legacy `WAIT_n`.
    pub max_wait: Duration,
    /// Stick deadzone on the 8-bit scale.
    pub deadzone: u8,
    /// Weight of the new stick sample per filter step, `0.0..=1.0`.
    pub smoothing: f32,
    /// Analog trigger values at or above this press the digital trigger.
    pub trigger_threshold: u8,
}

impl SynthesizerConfig {
    /// Tick interval for a rate in Hz.  Zero is treated as 1 Hz.
    pub fn interval_for_hz(hz: u32) -> Duration {
        Duration::from_secs(1) / hz.max(1)
    }
}

impl Default for SynthesizerConfig {
    /// | Field             | Default        |
    /// |-------------------|----------------|
    /// | tick_interval     | 8 ms (125 Hz)  |
    /// | press_duration    | 40 ms          |
    /// | pulse_duration    | 150 ms         |
    /// | max_wait          | 2 s            |
    /// | deadzone          | 3              |
    /// | smoothing         | 0.78           |
    /// | trigger_threshold | 128            |
    fn default() -> Self {
        Self {
            tick_interval: Self::interval_for_hz(125),
            press_duration: Duration::from_millis(40),
            pulse_duration: Duration::from_millis(150),
            max_wait: Duration::from_millis(2000),
            deadzone: 3,
            smoothing: 0.78,
            trigger_threshold: 128,
        }
    }
}
