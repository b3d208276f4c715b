//! Stick conditioning: quantization to the report's 8-bit range, deadzone,
//! and the one-pole smoothing filter.
//!
//! # Why smooth at all? (for beginners)
//!
//! Stick samples arrive over Wi-Fi at irregular intervals.  Copying each
//! sample straight into the report makes the host see a jittery stick.  A
//! one-pole low-pass filter moves the axis most of the way (78% by default)
//! toward each accepted sample, so a stick held in one place settles within a
//! handful of samples:
//!
//! ```text
//! samples of 62:  0 → 48 → 59 → 61 → 62
//! ```

/// Scales a full-range i16 axis to i8 by dividing by 256 (toward zero).
pub fn quantize_axis(value: i16) -> i8 {
    (value / 256) as i8
}

/// Zeroes a stick sample whose larger component is below `deadzone`.
///
/// The check is on the quantized values, so `deadzone` is on the 8-bit scale.
pub fn apply_deadzone(x: i8, y: i8, deadzone: u8) -> (i8, i8) {
    let magnitude = x.unsigned_abs().max(y.unsigned_abs());
    if magnitude < deadzone {
        (0, 0)
    } else {
        (x, y)
    }
}

/// One filter step from `current` toward `target`.
///
/// `weight` is the share of the remaining distance covered per step, clamped
/// to `[0, 1]`.  The step is at least one count whenever the axis is not yet
/// on target, so the filter always converges.
pub fn smooth_step(current: i8, target: i8, weight: f32) -> i8 {
    let diff = i16::from(target) - i16::from(current);
    if diff == 0 {
        return target;
    }
    let weight = if weight.is_nan() { 1.0 } else { weight.clamp(0.0, 1.0) };
    let mut step = (f32::from(diff) * weight).round() as i16;
    if step == 0 {
        step = diff.signum();
    }
    (i16::from(current) + step).clamp(i16::from(i8::MIN), i16::from(i8::MAX)) as i8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantize_divides_by_256_toward_zero() {
        assert_eq!(quantize_axis(16000), 62);
        assert_eq!(quantize_axis(-16000), -62);
        assert_eq!(quantize_axis(i16::MAX), 127);
        assert_eq!(quantize_axis(i16::MIN), -128);
        assert_eq!(quantize_axis(255), 0);
    }

    #[test]
    fn test_small_samples_fall_into_deadzone() {
        // Arrange / Act / Assert
        assert_eq!(apply_deadzone(2, -2, 3), (0, 0));
        assert_eq!(apply_deadzone(3, 0, 3), (3, 0));
        assert_eq!(apply_deadzone(1, 50, 3), (1, 50));
    }

    #[test]
    fn test_deadzone_of_zero_passes_everything() {
        assert_eq!(apply_deadzone(0, 1, 0), (0, 1));
    }

    #[test]
    fn test_smoothing_converges_on_step_input() {
        // Arrange
        let mut axis = 0i8;
        let mut trace = vec![axis];

        // Act
        while axis != 62 {
            axis = smooth_step(axis, 62, 0.78);
            trace.push(axis);
        }

        // Assert
        assert_eq!(trace, vec![0, 48, 59, 61, 62]);
    }

    #[test]
    fn test_smoothing_converges_downward() {
        let mut axis = 0i8;
        for _ in 0..4 {
            axis = smooth_step(axis, -62, 0.78);
        }
        assert_eq!(axis, -62);
    }

    #[test]
    fn test_tiny_weight_still_makes_progress() {
        assert_eq!(smooth_step(10, 11, 0.1), 11);
        assert_eq!(smooth_step(10, 9, 0.1), 9);
    }

    #[test]
    fn test_full_weight_jumps_to_target() {
        assert_eq!(smooth_step(-128, 127, 1.0), 127);
    }
}
