//! ReportSynthesizer: the bridge-side HID state machine.
//!
//! Applies decoded [`Command`]s to [`HidState`] and decides when each device's
//! report is written to the [`HidReportSink`]:
//!
//! | Device | When a report is written |
//! |--------|--------------------------|
//! | Keyboard | immediately, on every accepted key event |
//! | Mouse buttons | immediately, when the button mask changes |
//! | Mouse motion | on the next pacing tick, accumulated deltas drained at once |
//! | Gamepad | on the next pacing tick, only when something changed |
//!
//! Timed releases are queued in a [`DeferredQueue`] and executed from
//! [`poll`](ReportSynthesizer::poll); nothing in here ever sleeps.
//!
//! # Why does the keyboard skip pacing? (for beginners)
//!
//! A key event is rare compared to mouse motion or stick samples, and
//! collapsing two of them into one report would lose a keystroke (a press and
//! release inside the same tick would cancel out).  Mouse motion, on the other
//! hand, can be summed without losing anything, and only the latest gamepad
//! state matters, so both are safe to batch.

use std::sync::Arc;
use std::time::{Duration, Instant};

use cbv0_core::semantics::{resolve_key, GamepadButton, MouseButton};
use cbv0_core::{ActionOp, Command};
use thiserror::Error;
use tracing::{debug, info, trace, warn};

use crate::application::deferred::{ControlAction, DeferredAction, DeferredQueue};
use crate::application::pacer::Pacer;
use crate::domain::config::SynthesizerConfig;
use crate::domain::filters::{apply_deadzone, quantize_axis};
use crate::domain::hid_state::HidState;
use crate::domain::reports::{GamepadReport, KeyboardReport, MouseReport};

/// Error type for HID output writes.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Writing a report to the endpoint failed.
    #[error("failed to write {endpoint} report: {source}")]
    Io {
        endpoint: &'static str,
        #[source]
        source: std::io::Error,
    },
    /// The endpoint could not be used at all.
    #[error("output endpoint unavailable: {0}")]
    Unavailable(String),
}

/// Destination of finished HID reports.
///
/// The production implementation writes to the USB gadget endpoints; tests
/// use a recording sink or a mockall mock.
#[cfg_attr(test, mockall::automock)]
pub trait HidReportSink: Send + Sync {
    /// Writes one 8-byte keyboard report.
    fn send_keyboard(&self, report: &KeyboardReport) -> Result<(), SinkError>;

    /// Writes one 3-byte mouse report.
    fn send_mouse(&self, report: &MouseReport) -> Result<(), SinkError>;

    /// Writes one 7-byte gamepad report.
    fn send_gamepad(&self, report: &GamepadReport) -> Result<(), SinkError>;
}

/// The HID state machine and its output schedule.
pub struct ReportSynthesizer {
    state: HidState,
    config: SynthesizerConfig,
    sink: Arc<dyn HidReportSink>,
    deferred: DeferredQueue,
    pacer: Pacer,
    restart_requested: bool,
}

impl ReportSynthesizer {
    /// Creates a synthesizer with neutral state.
    pub fn new(config: SynthesizerConfig, sink: Arc<dyn HidReportSink>) -> Self {
        Self {
            state: HidState::neutral(),
            pacer: Pacer::new(config.tick_interval),
            config,
            sink,
            deferred: DeferredQueue::new(),
            restart_requested: false,
        }
    }

    pub fn state(&self) -> &HidState {
        &self.state
    }

    pub fn config(&self) -> &SynthesizerConfig {
        &self.config
    }

    /// Number of scheduled actions not yet executed.
    pub fn pending_actions(&self) -> usize {
        self.deferred.len()
    }

    /// Due time of the earliest scheduled action.
    pub fn next_deferred_due(&self) -> Option<Instant> {
        self.deferred.next_due()
    }

    /// `true` once a hard reset has been executed.
    pub fn restart_requested(&self) -> bool {
        self.restart_requested
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    /// Applies one command at time `now`.
    ///
    /// `op = Press` applies the hold immediately and schedules the matching
    /// release (`press_ms` later, `pulse_ms` for trigger actions).  Invalid
    /// button ids and unknown key names are absorbed without a report.
    pub fn apply(&mut self, cmd: &Command, now: Instant) {
        debug!(?cmd, "apply");
        match op_of(cmd) {
            Some(ActionOp::Press) => {
                if self.apply_now(&with_op(cmd, ActionOp::Hold)) {
                    let hold_for = self.hold_duration(cmd);
                    self.deferred.schedule(
                        now + hold_for,
                        DeferredAction::Apply(with_op(cmd, ActionOp::Release)),
                    );
                }
            }
            _ => {
                self.apply_now(cmd);
            }
        }
    }

    /// Replaces the whole mouse button mask (heuristic one-byte payloads).
    /// A report is written only if the mask changed.
    pub fn replace_mouse_buttons(&mut self, mask: u8) {
        if self.state.mouse.replace_buttons(mask) {
            self.send_mouse(&self.state.mouse.button_report());
        }
    }

    /// Queues an action for `due`.
    pub fn schedule(&mut self, due: Instant, action: DeferredAction) {
        self.deferred.schedule(due, action);
    }

    /// Executes a device-control directive now.
    pub fn control(&mut self, action: ControlAction) {
        match action {
            ControlAction::SoftReset => self.soft_reset(),
            ControlAction::HardReset => {
                warn!("hard reset requested; bridge will restart");
                self.restart_requested = true;
            }
        }
    }

    /// Releases everything and writes neutral reports on all three endpoints.
    ///
    /// Scheduled actions stay queued: a release that comes due later finds the
    /// state already released and changes nothing.
    pub fn soft_reset(&mut self) {
        info!("soft reset: releasing all inputs");
        if !self.deferred.is_empty() {
            debug!(pending = self.deferred.len(), "scheduled actions stay queued");
        }
        self.state = HidState::neutral();
        self.send_keyboard(&KeyboardReport::default());
        self.send_mouse(&MouseReport::default());
        self.send_gamepad(&GamepadReport::neutral());
    }

    // ── Clock ─────────────────────────────────────────────────────────────────

    /// Runs every scheduled action due at `now`, then writes paced mouse and
    /// gamepad reports if a tick is due.
    pub fn poll(&mut self, now: Instant) {
        while let Some(action) = self.deferred.pop_due(now) {
            trace!(?action, "deferred action due");
            match action {
                DeferredAction::Apply(cmd) => self.apply(&cmd, now),
                DeferredAction::Control(control) => self.control(control),
            }
        }
        if self.pacer.try_tick(now) {
            self.flush_paced();
        }
    }

    fn flush_paced(&mut self) {
        if self.state.mouse.has_motion() {
            let report = self.state.mouse.take_motion_report();
            self.send_mouse(&report);
        }
        if self.state.gamepad.needs_report() {
            let report = self.state.gamepad.take_report();
            self.send_gamepad(&report);
        }
    }

    // ── Mutations ─────────────────────────────────────────────────────────────

    /// Applies a non-`Press` command.  Returns `false` if it was rejected.
    fn apply_now(&mut self, cmd: &Command) -> bool {
        match cmd {
            Command::KeyEvent { op, key } => {
                let binding = resolve_key(key);
                if binding.is_noop() {
                    debug!(key = %key, "unknown key name absorbed");
                    return false;
                }
                match op {
                    ActionOp::Release => self.state.keyboard.release(binding),
                    _ => self.state.keyboard.press(binding),
                }
                self.send_keyboard(&self.state.keyboard.report());
            }
            Command::MouseDelta { dx, dy } => self.state.mouse.add_delta(*dx, *dy),
            Command::MouseButton { op, button } => {
                let Some(button) = MouseButton::from_id(*button) else {
                    warn!(button, "unknown mouse button id");
                    return false;
                };
                let pressed = *op != ActionOp::Release;
                if self.state.mouse.set_buttons(button.bit(), pressed) {
                    self.send_mouse(&self.state.mouse.button_report());
                }
            }
            Command::GamepadButton { op, button } => {
                let Some(button) = GamepadButton::from_id(*button) else {
                    warn!(button, "unknown gamepad button id");
                    return false;
                };
                self.state.gamepad.set_button(button, *op != ActionOp::Release);
            }
            Command::GamepadStick { side, x, y } => {
                let (x8, y8) =
                    apply_deadzone(quantize_axis(*x), quantize_axis(*y), self.config.deadzone);
                self.state
                    .gamepad
                    .blend_stick_sample(*side, x8, y8, self.config.smoothing);
            }
            Command::GamepadTrigger { side, value } => {
                let pressed = *value >= self.config.trigger_threshold;
                self.state
                    .gamepad
                    .set_button(GamepadButton::for_trigger(*side), pressed);
            }
            Command::TriggerAction { op, side } => {
                self.state
                    .gamepad
                    .set_button(GamepadButton::for_trigger(*side), *op != ActionOp::Release);
            }
        }
        true
    }

    fn hold_duration(&self, cmd: &Command) -> Duration {
        match cmd {
            Command::TriggerAction { .. } => self.config.pulse_duration,
            _ => self.config.press_duration,
        }
    }

    // ── Output ────────────────────────────────────────────────────────────────
    // Sink failures are logged and dropped; the next report carries the
    // complete state again.

    fn send_keyboard(&self, report: &KeyboardReport) {
        debug!(bytes = ?report.as_bytes(), "keyboard report");
        if let Err(e) = self.sink.send_keyboard(report) {
            warn!("keyboard report dropped: {e}");
        }
    }

    fn send_mouse(&self, report: &MouseReport) {
        debug!(bytes = ?report.as_bytes(), "mouse report");
        if let Err(e) = self.sink.send_mouse(report) {
            warn!("mouse report dropped: {e}");
        }
    }

    fn send_gamepad(&self, report: &GamepadReport) {
        debug!(bytes = ?report.as_bytes(), "gamepad report");
        if let Err(e) = self.sink.send_gamepad(report) {
            warn!("gamepad report dropped: {e}");
        }
    }
}

/// The op of commands that carry one.
fn op_of(cmd: &Command) -> Option<ActionOp> {
    match cmd {
        Command::KeyEvent { op, .. }
        | Command::MouseButton { op, .. }
        | Command::GamepadButton { op, .. }
        | Command::TriggerAction { op, .. } => Some(*op),
        _ => None,
    }
}

/// A copy of `cmd` with its op replaced.  Commands without an op are cloned.
fn with_op(cmd: &Command, op: ActionOp) -> Command {
    let mut out = cmd.clone();
    match &mut out {
        Command::KeyEvent { op: o, .. }
        | Command::MouseButton { op: o, .. }
        | Command::GamepadButton { op: o, .. }
        | Command::TriggerAction { op: o, .. } => *o = op,
        _ => {}
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::hid_output::mock::RecordingSink;
    use cbv0_core::Side;

    const TICK: Duration = Duration::from_millis(8);

    fn synth_with_recorder() -> (ReportSynthesizer, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::new());
        let synth = ReportSynthesizer::new(SynthesizerConfig::default(), sink.clone());
        (synth, sink)
    }

    fn key(op: ActionOp, name: &str) -> Command {
        Command::KeyEvent {
            op,
            key: name.into(),
        }
    }

    // ── Pacing (mockall) ──────────────────────────────────────────────────────

    #[test]
    fn test_burst_of_setters_yields_one_report_per_interval() {
        // Arrange – exactly one mouse and one gamepad report may be written
        let mut sink = MockHidReportSink::new();
        sink.expect_send_mouse().times(1).returning(|_| Ok(()));
        sink.expect_send_gamepad().times(1).returning(|_| Ok(()));
        sink.expect_send_keyboard().never();
        let mut synth = ReportSynthesizer::new(SynthesizerConfig::default(), Arc::new(sink));
        let t0 = Instant::now();
        synth.poll(t0);

        // Act – 1,000 setters inside one interval
        for i in 0..1000u16 {
            let t = t0 + Duration::from_micros(u64::from(i) * 7);
            synth.apply(&Command::MouseDelta { dx: 1, dy: 0 }, t);
            synth.apply(
                &Command::GamepadStick { side: Side::Left, x: (i * 30) as i16, y: 0 },
                t,
            );
            synth.poll(t);
        }
        synth.poll(t0 + TICK);

        // Assert – expectations are verified when the mock drops
    }

    #[test]
    fn test_every_keyboard_setter_writes_its_own_report() {
        // Arrange
        let mut sink = MockHidReportSink::new();
        sink.expect_send_keyboard().times(4).returning(|_| Ok(()));
        let mut synth = ReportSynthesizer::new(SynthesizerConfig::default(), Arc::new(sink));
        let now = Instant::now();

        // Act
        synth.apply(&key(ActionOp::Hold, "a"), now);
        synth.apply(&key(ActionOp::Hold, "a"), now);
        synth.apply(&key(ActionOp::Release, "a"), now);
        synth.apply(&key(ActionOp::Release, "a"), now);
    }

    #[test]
    fn test_sink_errors_do_not_stop_the_synthesizer() {
        // Arrange
        let mut sink = MockHidReportSink::new();
        sink.expect_send_keyboard()
            .times(2)
            .returning(|_| Err(SinkError::Unavailable("unplugged".into())));
        let mut synth = ReportSynthesizer::new(SynthesizerConfig::default(), Arc::new(sink));
        let now = Instant::now();

        // Act
        synth.apply(&key(ActionOp::Hold, "shift"), now);
        synth.apply(&key(ActionOp::Hold, "b"), now);

        // Assert – state still advanced
        assert_eq!(synth.state().keyboard.report().modifiers, 0x02);
        assert_eq!(synth.state().keyboard.report().keys[0], 0x05);
    }

    // ── State and timing (recording sink) ─────────────────────────────────────

    #[test]
    fn test_gamepad_button_is_sent_on_next_tick() {
        // Arrange
        let (mut synth, sink) = synth_with_recorder();
        let t0 = Instant::now();
        synth.poll(t0);

        // Act
        synth.apply(&Command::GamepadButton { op: ActionOp::Hold, button: 0 }, t0);
        let before_tick = sink.gamepad_reports().len();
        synth.poll(t0 + TICK);

        // Assert
        assert_eq!(before_tick, 0);
        let reports = sink.gamepad_reports();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].buttons & 0x0001, 0x0001);
    }

    #[test]
    fn test_momentary_key_press_releases_after_press_ms() {
        // Arrange
        let (mut synth, sink) = synth_with_recorder();
        let t0 = Instant::now();

        // Act
        synth.apply(&key(ActionOp::Press, "enter"), t0);
        synth.poll(t0 + Duration::from_millis(39));
        let held = sink.keyboard_reports();
        synth.poll(t0 + Duration::from_millis(40));

        // Assert
        assert_eq!(held.len(), 1);
        assert_eq!(held[0].keys[0], 0x28);
        let reports = sink.keyboard_reports();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[1], KeyboardReport::default());
        assert_eq!(synth.pending_actions(), 0);
    }

    #[test]
    fn test_unknown_key_press_schedules_nothing() {
        let (mut synth, sink) = synth_with_recorder();
        synth.apply(&key(ActionOp::Press, "hyperkey"), Instant::now());
        assert!(sink.keyboard_reports().is_empty());
        assert_eq!(synth.pending_actions(), 0);
    }

    #[test]
    fn test_mouse_button_report_only_on_change() {
        let (mut synth, sink) = synth_with_recorder();
        let now = Instant::now();

        synth.apply(&Command::MouseButton { op: ActionOp::Hold, button: 0 }, now);
        synth.apply(&Command::MouseButton { op: ActionOp::Hold, button: 0 }, now);
        synth.apply(&Command::MouseButton { op: ActionOp::Release, button: 0 }, now);

        let reports = sink.mouse_reports();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].as_bytes(), [1, 0, 0]);
        assert_eq!(reports[1].as_bytes(), [0, 0, 0]);
    }

    #[test]
    fn test_mouse_deltas_are_drained_once_per_tick() {
        // Arrange
        let (mut synth, sink) = synth_with_recorder();
        let t0 = Instant::now();
        synth.poll(t0);

        // Act
        synth.apply(&Command::MouseDelta { dx: 100, dy: -3 }, t0);
        synth.apply(&Command::MouseDelta { dx: 100, dy: -3 }, t0);
        synth.poll(t0 + TICK);
        synth.poll(t0 + TICK * 2);

        // Assert – clamped to 127, then nothing left to send
        let reports = sink.mouse_reports();
        assert_eq!(reports.len(), 1);
        assert_eq!((reports[0].dx, reports[0].dy), (127, -6));
    }

    #[test]
    fn test_analog_trigger_thresholds_at_half_scale() {
        let (mut synth, _sink) = synth_with_recorder();
        let now = Instant::now();

        synth.apply(&Command::GamepadTrigger { side: Side::Right, value: 128 }, now);
        assert_eq!(synth.state().gamepad.buttons(), 1 << 7);

        synth.apply(&Command::GamepadTrigger { side: Side::Right, value: 127 }, now);
        assert_eq!(synth.state().gamepad.buttons(), 0);
    }

    #[test]
    fn test_trigger_pulse_uses_pulse_duration() {
        // Arrange
        let (mut synth, _sink) = synth_with_recorder();
        let t0 = Instant::now();

        // Act
        synth.apply(&Command::TriggerAction { op: ActionOp::Press, side: Side::Left }, t0);
        synth.poll(t0 + Duration::from_millis(100));
        let mid_pulse = synth.state().gamepad.buttons();
        synth.poll(t0 + Duration::from_millis(150));

        // Assert
        assert_eq!(mid_pulse, 1 << 6);
        assert_eq!(synth.state().gamepad.buttons(), 0);
    }

    #[test]
    fn test_small_stick_sample_is_zeroed() {
        let (mut synth, _sink) = synth_with_recorder();
        synth.apply(
            &Command::GamepadStick { side: Side::Left, x: 700, y: -500 },
            Instant::now(),
        );
        assert_eq!(synth.state().gamepad.axes(), [0, 0, 0, 0]);
    }

    #[test]
    fn test_stick_samples_within_one_tick_are_each_blended() {
        // Arrange
        let (mut synth, sink) = synth_with_recorder();
        let t0 = Instant::now();
        synth.poll(t0);

        // Act – 25600 quantizes to 100, then the stick returns to center
        synth.apply(
            &Command::GamepadStick { side: Side::Left, x: 25600, y: 0 },
            t0 + Duration::from_millis(1),
        );
        synth.apply(
            &Command::GamepadStick { side: Side::Left, x: 0, y: 0 },
            t0 + Duration::from_millis(2),
        );
        synth.poll(t0 + TICK);
        synth.poll(t0 + TICK * 2);

        // Assert – one report, carrying both samples folded in
        let xs: Vec<i8> = sink.gamepad_reports().iter().map(|r| r.left_x).collect();
        assert_eq!(xs, vec![17]);
    }

    #[test]
    fn test_soft_reset_writes_neutral_reports() {
        // Arrange
        let (mut synth, sink) = synth_with_recorder();
        let now = Instant::now();
        synth.apply(&key(ActionOp::Hold, "a"), now);
        synth.apply(&Command::MouseButton { op: ActionOp::Hold, button: 2 }, now);
        synth.apply(&Command::GamepadButton { op: ActionOp::Hold, button: 9 }, now);

        // Act
        synth.control(ControlAction::SoftReset);

        // Assert
        assert_eq!(synth.state(), &HidState::neutral());
        assert_eq!(sink.keyboard_reports().last(), Some(&KeyboardReport::default()));
        assert_eq!(sink.mouse_reports().last(), Some(&MouseReport::default()));
        assert_eq!(sink.gamepad_reports().last(), Some(&GamepadReport::neutral()));
        assert!(!synth.restart_requested());
    }

    #[test]
    fn test_soft_reset_keeps_scheduled_releases() {
        // Arrange – a click whose release is still pending
        let (mut synth, sink) = synth_with_recorder();
        let t0 = Instant::now();
        synth.apply(&Command::MouseButton { op: ActionOp::Press, button: 0 }, t0);

        // Act
        synth.soft_reset();
        let pending = synth.pending_actions();
        synth.poll(t0 + Duration::from_millis(40));

        // Assert – the late release finds nothing held and writes nothing
        assert_eq!(pending, 1);
        assert_eq!(synth.pending_actions(), 0);
        let bytes: Vec<_> = sink.mouse_reports().iter().map(|r| r.as_bytes()).collect();
        assert_eq!(bytes, vec![[1, 0, 0], [0, 0, 0]]);
    }

    #[test]
    fn test_hard_reset_only_sets_restart_flag() {
        let (mut synth, sink) = synth_with_recorder();
        synth.control(ControlAction::HardReset);
        assert!(synth.restart_requested());
        assert!(sink.keyboard_reports().is_empty());
    }

    #[test]
    fn test_invalid_gamepad_button_is_rejected() {
        let (mut synth, _sink) = synth_with_recorder();
        synth.apply(
            &Command::GamepadButton { op: ActionOp::Press, button: 16 },
            Instant::now(),
        );
        assert_eq!(synth.pending_actions(), 0);
        assert!(!synth.state().gamepad.needs_report());
    }
}
