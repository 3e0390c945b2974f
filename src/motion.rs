//! Pure animation curves.
//!
//! Every motion in the stack is a time-driven interpolation from a start
//! pose to an end pose. These helpers turn (start, now, duration) into a
//! normalized progress and shape it with an easing curve. No clocks.

use std::f32::consts::PI;
use std::time::Duration;

/// Normalized progress of a motion, clamped to [0, 1].
///
/// A zero-length motion is complete immediately.
pub fn progress(started: Duration, now: Duration, duration: Duration) -> f32 {
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = now.saturating_sub(started);
    (elapsed.as_secs_f32() / duration.as_secs_f32()).clamp(0.0, 1.0)
}

/// True once `now` is at or past the end of the motion.
pub fn is_finished(started: Duration, now: Duration, duration: Duration) -> bool {
    now.saturating_sub(started) >= duration
}

pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

/// Map `x` from `[in_lo, in_hi]` onto `[out_lo, out_hi]`, clamping at the ends.
pub fn interpolate_clamped(x: f32, (in_lo, in_hi): (f32, f32), (out_lo, out_hi): (f32, f32)) -> f32 {
    if in_hi == in_lo {
        return out_lo;
    }
    let t = ((x - in_lo) / (in_hi - in_lo)).clamp(0.0, 1.0);
    lerp(out_lo, out_hi, t)
}

/// Decelerating curve for timed motions (commit, flip, promotion).
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Damped spring: overshoots slightly, then rests exactly at 1 when t = 1.
pub fn spring(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (-3.0 * t).exp() * (1.5 * PI * t).cos()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn progress_is_clamped() {
        assert_eq!(progress(ms(100), ms(50), ms(200)), 0.0);
        assert_eq!(progress(ms(100), ms(200), ms(200)), 0.5);
        assert_eq!(progress(ms(100), ms(900), ms(200)), 1.0);
    }

    #[test]
    fn zero_duration_is_complete() {
        assert_eq!(progress(ms(10), ms(10), Duration::ZERO), 1.0);
        assert!(is_finished(ms(10), ms(10), Duration::ZERO));
    }

    #[test]
    fn is_finished_at_exact_end() {
        assert!(!is_finished(ms(0), ms(299), ms(300)));
        assert!(is_finished(ms(0), ms(300), ms(300)));
    }

    #[test]
    fn interpolate_clamps_outside_range() {
        let range = (-400.0, 400.0);
        let out = (-15.0, 15.0);
        assert_eq!(interpolate_clamped(0.0, range, out), 0.0);
        assert_eq!(interpolate_clamped(200.0, range, out), 7.5);
        assert_eq!(interpolate_clamped(-1000.0, range, out), -15.0);
        assert_eq!(interpolate_clamped(1000.0, range, out), 15.0);
    }

    #[test]
    fn curves_hit_their_endpoints() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert_eq!(spring(0.0), 0.0);
        assert!((spring(1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn spring_overshoots_mid_motion() {
        let peak = (1..100).map(|i| spring(i as f32 / 100.0)).fold(0.0, f32::max);
        assert!(peak > 1.0);
        assert!(peak < 1.15);
    }
}
