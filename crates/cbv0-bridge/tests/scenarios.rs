//! End-to-end tests: datagram bytes in, recorded HID reports out.
//!
//! Each test drives the public [`Dispatcher`] API with explicit timestamps, so
//! timing is deterministic and nothing sleeps.

use std::sync::Arc;
use std::time::{Duration, Instant};

use cbv0_bridge::application::{DispatchOutcome, Dispatcher, ReportSynthesizer};
use cbv0_bridge::domain::{HidState, SynthesizerConfig};
use cbv0_bridge::infrastructure::hid_output::mock::{RecordingSink, SentReport};
use cbv0_core::{ActionOp, Command, FrameEncoder, MessageType, Side};

const TICK: Duration = Duration::from_millis(8);

struct Harness {
    dispatcher: Dispatcher,
    sink: Arc<RecordingSink>,
    encoder: FrameEncoder,
    t0: Instant,
}

impl Harness {
    fn new() -> Self {
        let sink = Arc::new(RecordingSink::new());
        let synth = ReportSynthesizer::new(SynthesizerConfig::default(), sink.clone());
        let mut dispatcher = Dispatcher::new(synth);
        let t0 = Instant::now();
        // Consume the first tick so the next one is at t0 + TICK.
        dispatcher.poll(t0);
        Self {
            dispatcher,
            sink,
            encoder: FrameEncoder::new(),
            t0,
        }
    }

    fn at(&self, ms: u64) -> Instant {
        self.t0 + Duration::from_millis(ms)
    }

    fn send(&mut self, cmd: &Command, ms: u64) -> DispatchOutcome {
        let bytes = self.encoder.encode(cmd).expect("command encodes");
        let now = self.at(ms);
        self.dispatcher.handle_datagram(&bytes, now)
    }
}

#[test]
fn test_scenario_gamepad_button_reaches_next_tick() {
    // Arrange
    let mut h = Harness::new();

    // Act
    let outcome = h.send(&Command::GamepadButton { op: ActionOp::Hold, button: 0 }, 1);
    h.dispatcher.poll(h.t0 + TICK);

    // Assert
    assert_eq!(outcome, DispatchOutcome::Applied(MessageType::GamepadButton));
    let reports = h.sink.gamepad_reports();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].buttons & 0x0001, 0x0001);
}

#[test]
fn test_scenario_corrupted_final_byte_is_rejected() {
    // Arrange – a 7-byte frame: header, one payload byte, CRC
    let mut h = Harness::new();
    let mut bytes = h.encoder.encode_raw(0x7F, vec![0b111]);
    assert_eq!(bytes.len(), 7);
    bytes[6] = bytes[6].wrapping_add(1);

    // Act
    let outcome = h.dispatcher.handle_datagram(&bytes, h.at(1));
    h.dispatcher.poll(h.t0 + TICK);

    // Assert
    assert_eq!(outcome, DispatchOutcome::DroppedChecksum);
    assert_eq!(h.dispatcher.synthesizer().state(), &HidState::neutral());
    assert!(h.sink.is_empty());
}

#[test]
fn test_scenario_legacy_click_with_wait() {
    // Arrange
    let mut h = Harness::new();
    let line = b"MOUSE_LEFT_DOWN,WAIT_50,MOUSE_LEFT_UP";

    // Act
    let outcome = h.dispatcher.handle_datagram(line, h.at(0));
    let pressed = h.dispatcher.synthesizer().state().mouse.buttons();
    for ms in (8..=64).step_by(8) {
        h.dispatcher.poll(h.at(ms));
    }

    // Assert
    assert_eq!(outcome, DispatchOutcome::LegacyLine);
    assert_eq!(pressed, 0b001);
    assert_eq!(h.dispatcher.synthesizer().state().mouse.buttons(), 0);
    let bytes: Vec<_> = h.sink.mouse_reports().iter().map(|r| r.as_bytes()).collect();
    assert_eq!(bytes, vec![[1, 0, 0], [0, 0, 0]]);
}

#[test]
fn test_scenario_stick_quantizes_and_settles() {
    // Arrange
    let mut h = Harness::new();
    let sample = Command::GamepadStick { side: Side::Left, x: 16000, y: -16000 };

    // Act – the same sample once per tick
    for tick in 1..=4u32 {
        h.send(&sample, u64::from(tick) * 8 - 7);
        h.dispatcher.poll(h.t0 + TICK * tick);
    }
    for tick in 5..=8 {
        h.dispatcher.poll(h.t0 + TICK * tick);
    }

    // Assert – 16000 / 256 = 62, reached after four samples, then silence
    assert_eq!(h.dispatcher.synthesizer().state().gamepad.axes(), [62, -62, 0, 0]);
    let xs: Vec<i8> = h.sink.gamepad_reports().iter().map(|r| r.left_x).collect();
    assert_eq!(xs, vec![48, 59, 61, 62]);
    let last = h.sink.gamepad_reports().last().copied().expect("reports sent");
    assert_eq!((last.left_x, last.left_y), (62, -62));
}

#[test]
fn test_scenario_one_byte_heuristic_mask() {
    // Arrange
    let mut h = Harness::new();
    let bytes = h.encoder.encode_raw(0xEE, vec![0b011]);

    // Act
    let outcome = h.dispatcher.handle_datagram(&bytes, h.at(1));

    // Assert
    assert_eq!(outcome, DispatchOutcome::HeuristicButtons);
    let mask = h.dispatcher.synthesizer().state().mouse.buttons();
    assert_eq!(mask & 0b001, 0b001, "left");
    assert_eq!(mask & 0b010, 0b010, "right");
    assert_eq!(mask & 0b100, 0, "middle");
}

#[test]
fn test_thousand_mouse_frames_in_one_interval_give_one_report() {
    // Arrange
    let mut h = Harness::new();

    // Act
    for _ in 0..1000 {
        h.send(&Command::MouseDelta { dx: 1, dy: -1 }, 2);
        h.dispatcher.poll(h.at(3));
    }
    h.dispatcher.poll(h.t0 + TICK);

    // Assert
    let reports = h.sink.mouse_reports();
    assert_eq!(reports.len(), 1);
    assert_eq!((reports[0].dx, reports[0].dy), (127, -127));
}

#[test]
fn test_keyboard_reports_are_not_paced() {
    // Arrange
    let mut h = Harness::new();

    // Act
    for name in ["ctrl", "c"] {
        h.send(&Command::KeyEvent { op: ActionOp::Hold, key: name.into() }, 1);
    }
    for name in ["c", "ctrl"] {
        h.send(&Command::KeyEvent { op: ActionOp::Release, key: name.into() }, 1);
    }

    // Assert – four reports without a single tick
    let bytes: Vec<_> = h.sink.keyboard_reports().iter().map(|r| r.as_bytes()).collect();
    assert_eq!(
        bytes,
        vec![
            [0x01, 0, 0, 0, 0, 0, 0, 0],
            [0x01, 0, 0x06, 0, 0, 0, 0, 0],
            [0x01, 0, 0, 0, 0, 0, 0, 0],
            [0x00, 0, 0, 0, 0, 0, 0, 0],
        ]
    );
}

#[test]
fn test_gamepad_press_is_released_without_blocking() {
    // Arrange
    let mut h = Harness::new();

    // Act – a press, then an unrelated frame arrives during the hold
    h.send(&Command::GamepadButton { op: ActionOp::Press, button: 1 }, 1);
    h.send(&Command::MouseButton { op: ActionOp::Hold, button: 2 }, 5);
    for tick in 1..=6 {
        h.dispatcher.poll(h.t0 + TICK * tick);
    }

    // Assert
    let buttons: Vec<u16> = h.sink.gamepad_reports().iter().map(|r| r.buttons).collect();
    assert_eq!(buttons, vec![0x0002, 0x0000]);
    assert_eq!(h.dispatcher.synthesizer().state().mouse.buttons(), 0b100);
}

#[test]
fn test_soft_reset_line_releases_everything() {
    // Arrange
    let mut h = Harness::new();
    h.send(&Command::KeyEvent { op: ActionOp::Hold, key: "shift".into() }, 1);
    h.send(&Command::GamepadButton { op: ActionOp::Hold, button: 12 }, 1);

    // Act
    h.dispatcher.handle_datagram(b"SOFT_RESET", h.at(2));

    // Assert
    assert_eq!(h.dispatcher.synthesizer().state(), &HidState::neutral());
    let last_three: Vec<_> = h.sink.all().into_iter().rev().take(3).collect();
    assert!(matches!(last_three[0], SentReport::Gamepad(g) if g.hat == 8));
    assert!(matches!(last_three[1], SentReport::Mouse(m) if m.buttons == 0));
    assert!(matches!(last_three[2], SentReport::Keyboard(k) if k.modifiers == 0));
}
