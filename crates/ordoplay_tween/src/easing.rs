// SPDX-License-Identifier: MIT OR Apache-2.0
//! Easing curves and interpolation helpers.
//!
//! Curve shapes follow the formulas catalogued at easings.net. Every curve
//! returns exactly `0.0` at `t <= 0` and exactly `1.0` at `t >= 1`, whatever
//! its overshoot in between.

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Named easing curve shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EasingFunction {
    /// Exponential-sine oscillation at both ends
    #[default]
    EaseInOutElastic,
    /// Exponential-sine oscillation settling at the end
    EaseOutElastic,
    /// Decaying bounces at the end
    EaseOutBounce,
    /// Growing bounces at the start
    EaseInBounce,
    /// `t^5`
    EaseInQuint,
    /// `1 - (1 - t)^5`
    EaseOutQuint,
    /// Cubic overshoot at both ends
    EaseInOutBack,
    /// Cubic overshoot at the end
    EaseOutBack,
}

impl EasingFunction {
    /// All curve shapes
    pub fn all() -> &'static [EasingFunction] {
        &[
            EasingFunction::EaseInOutElastic,
            EasingFunction::EaseOutElastic,
            EasingFunction::EaseOutBounce,
            EasingFunction::EaseInBounce,
            EasingFunction::EaseInQuint,
            EasingFunction::EaseOutQuint,
            EasingFunction::EaseInOutBack,
            EasingFunction::EaseOutBack,
        ]
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::EaseInOutElastic => "EaseInOutElastic",
            Self::EaseOutElastic => "EaseOutElastic",
            Self::EaseOutBounce => "EaseOutBounce",
            Self::EaseInBounce => "EaseInBounce",
            Self::EaseInQuint => "EaseInQuint",
            Self::EaseOutQuint => "EaseOutQuint",
            Self::EaseInOutBack => "EaseInOutBack",
            Self::EaseOutBack => "EaseOutBack",
        }
    }

    /// Evaluate the curve at progress `t`
    pub fn evaluate(&self, t: f32) -> f32 {
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }

        match self {
            Self::EaseInOutElastic => ease_in_out_elastic(t),
            Self::EaseOutElastic => ease_out_elastic(t),
            Self::EaseOutBounce => ease_out_bounce(t),
            Self::EaseInBounce => 1.0 - ease_out_bounce(1.0 - t),
            Self::EaseInQuint => t * t * t * t * t,
            Self::EaseOutQuint => 1.0 - (1.0 - t).powi(5),
            Self::EaseInOutBack => ease_in_out_back(t),
            Self::EaseOutBack => ease_out_back(t),
        }
    }

    /// Evaluate the curve and raise the result to `intensity`
    pub fn evaluate_with_intensity(&self, t: f32, intensity: f32) -> f32 {
        apply_intensity(self.evaluate(t), intensity)
    }
}

/// Raise an eased value to an intensity exponent.
///
/// Plain `value ^ intensity`, except a negative value (undershoot of the
/// back/elastic curves) under a fractional exponent keeps its sign instead
/// of becoming NaN.
pub fn apply_intensity(value: f32, intensity: f32) -> f32 {
    if intensity == 1.0 {
        value
    } else if value >= 0.0 || intensity.fract() == 0.0 {
        value.powf(intensity)
    } else {
        -(-value).powf(intensity)
    }
}

fn ease_in_out_elastic(t: f32) -> f32 {
    let c5 = (2.0 * PI) / 4.5;

    if t < 0.5 {
        -(2f32.powf(20.0 * t - 10.0) * ((20.0 * t - 11.125) * c5).sin()) / 2.0
    } else {
        (2f32.powf(-20.0 * t + 10.0) * ((20.0 * t - 11.125) * c5).sin()) / 2.0 + 1.0
    }
}

fn ease_out_elastic(t: f32) -> f32 {
    let c4 = (2.0 * PI) / 3.0;

    2f32.powf(-10.0 * t) * ((t * 10.0 - 0.75) * c4).sin() + 1.0
}

fn ease_out_bounce(t: f32) -> f32 {
    let n1 = 7.5625;
    let d1 = 2.75;

    if t < 1.0 / d1 {
        n1 * t * t
    } else if t < 2.0 / d1 {
        let t = t - 1.5 / d1;
        n1 * t * t + 0.75
    } else if t < 2.5 / d1 {
        let t = t - 2.25 / d1;
        n1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / d1;
        n1 * t * t + 0.984_375
    }
}

fn ease_in_out_back(t: f32) -> f32 {
    let c1 = 1.70158;
    let c2 = c1 * 1.525;

    if t < 0.5 {
        ((2.0 * t).powi(2) * ((c2 + 1.0) * 2.0 * t - c2)) / 2.0
    } else {
        ((2.0 * t - 2.0).powi(2) * ((c2 + 1.0) * (t * 2.0 - 2.0) + c2) + 2.0) / 2.0
    }
}

fn ease_out_back(t: f32) -> f32 {
    let c1 = 1.70158;
    let c3 = c1 + 1.0;

    1.0 + c3 * (t - 1.0).powi(3) + c1 * (t - 1.0).powi(2)
}

/// Interpolation utilities
pub struct Interpolation;

impl Interpolation {
    /// Linear interpolation between two floats
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    /// Interpolate Vec3
    pub fn lerp_vec3(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
        [
            Self::lerp(a[0], b[0], t),
            Self::lerp(a[1], b[1], t),
            Self::lerp(a[2], b[2], t),
        ]
    }

    /// Interpolate Vec4
    pub fn lerp_vec4(a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
        [
            Self::lerp(a[0], b[0], t),
            Self::lerp(a[1], b[1], t),
            Self::lerp(a[2], b[2], t),
            Self::lerp(a[3], b[3], t),
        ]
    }

    /// Offset `start` by `range * value` per axis
    pub fn offset_vec3(start: [f32; 3], range: [f32; 3], value: f32) -> [f32; 3] {
        [
            start[0] + range[0] * value,
            start[1] + range[1] * value,
            start[2] + range[2] * value,
        ]
    }

    /// Spherical linear interpolation for quaternions
    pub fn slerp(a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
        let mut dot = a[0] * b[0] + a[1] * b[1] + a[2] * b[2] + a[3] * b[3];

        // Take the short way round
        let mut b = b;
        if dot < 0.0 {
            b = [-b[0], -b[1], -b[2], -b[3]];
            dot = -dot;
        }

        if dot > 0.9995 {
            let result = Self::lerp_vec4(a, b, t);
            let len = (result[0] * result[0]
                + result[1] * result[1]
                + result[2] * result[2]
                + result[3] * result[3])
                .sqrt();
            return [result[0] / len, result[1] / len, result[2] / len, result[3] / len];
        }

        let theta_0 = dot.acos();
        let theta = theta_0 * t;
        let sin_theta = theta.sin();
        let sin_theta_0 = theta_0.sin();

        let s0 = theta.cos() - dot * sin_theta / sin_theta_0;
        let s1 = sin_theta / sin_theta_0;

        [
            a[0] * s0 + b[0] * s1,
            a[1] * s0 + b[1] * s1,
            a[2] * s0 + b[2] * s1,
            a[3] * s0 + b[3] * s1,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_are_exact() {
        for curve in EasingFunction::all() {
            assert!(curve.evaluate(0.0).abs() < 1e-5, "{} at 0", curve.name());
            assert!((curve.evaluate(1.0) - 1.0).abs() < 1e-5, "{} at 1", curve.name());
            assert_eq!(curve.evaluate(0.0), 0.0);
            assert_eq!(curve.evaluate(1.0), 1.0);
        }
    }

    #[test]
    fn test_no_nan_across_range() {
        for curve in EasingFunction::all() {
            for i in 0..=1000 {
                let t = i as f32 / 1000.0;
                assert!(curve.evaluate(t).is_finite(), "{} at {t}", curve.name());
            }
        }
    }

    #[test]
    fn test_known_values() {
        assert!((EasingFunction::EaseInQuint.evaluate(0.5) - 0.03125).abs() < 1e-6);
        assert!((EasingFunction::EaseOutQuint.evaluate(0.5) - 0.96875).abs() < 1e-6);
        assert!((EasingFunction::EaseInOutElastic.evaluate(0.5) - 0.5).abs() < 1e-4);
        // Bounce segment boundary: n1 * (1/d1)^2 == 1
        assert!((EasingFunction::EaseOutBounce.evaluate(1.0 / 2.75) - 1.0).abs() < 1e-5);
        assert!(
            (EasingFunction::EaseInBounce.evaluate(0.3)
                - (1.0 - EasingFunction::EaseOutBounce.evaluate(0.7)))
            .abs()
                < 1e-6
        );
    }

    #[test]
    fn test_back_curves_overshoot() {
        let peak = (1..100)
            .map(|i| EasingFunction::EaseOutBack.evaluate(i as f32 / 100.0))
            .fold(f32::MIN, f32::max);
        assert!(peak > 1.0);

        let dip = (1..50)
            .map(|i| EasingFunction::EaseInOutBack.evaluate(i as f32 / 100.0))
            .fold(f32::MAX, f32::min);
        assert!(dip < 0.0);
    }

    #[test]
    fn test_intensity_one_is_identity() {
        for curve in EasingFunction::all() {
            for i in 0..=20 {
                let t = i as f32 / 20.0;
                assert_eq!(curve.evaluate_with_intensity(t, 1.0), curve.evaluate(t));
            }
        }
    }

    #[test]
    fn test_intensity_sharpens_inside_unit_range() {
        for curve in EasingFunction::all() {
            for i in 1..20 {
                let t = i as f32 / 20.0;
                let base = curve.evaluate(t);
                if base > 0.0 && base < 1.0 {
                    for k in [1.5, 2.0, 4.0] {
                        assert!(
                            curve.evaluate_with_intensity(t, k) < base,
                            "{} at {t} with k={k}",
                            curve.name()
                        );
                    }
                }
            }
            assert_eq!(curve.evaluate_with_intensity(0.0, 3.0), 0.0);
            assert_eq!(curve.evaluate_with_intensity(1.0, 3.0), 1.0);
        }
    }

    #[test]
    fn test_integer_intensity_is_plain_power() {
        let base = EasingFunction::EaseInOutBack.evaluate(0.1);
        assert!(base < 0.0);
        let squared = EasingFunction::EaseInOutBack.evaluate_with_intensity(0.1, 2.0);
        assert_eq!(squared, base.powf(2.0));
        assert!(squared > 0.0);

        let cubed = EasingFunction::EaseInOutBack.evaluate_with_intensity(0.1, 3.0);
        assert_eq!(cubed, base.powf(3.0));
        assert!(cubed < 0.0);
    }

    #[test]
    fn test_intensity_keeps_sign_of_undershoot() {
        let v = apply_intensity(-0.25, 1.5);
        assert!(v.is_finite());
        assert!(v < 0.0);
        assert!((v + 0.125).abs() < 1e-6);
    }

    #[test]
    fn test_lerp() {
        assert_eq!(Interpolation::lerp(0.0, 10.0, 0.5), 5.0);
        assert_eq!(
            Interpolation::lerp_vec3([0.0, 0.0, 0.0], [2.0, 4.0, 6.0], 0.5),
            [1.0, 2.0, 3.0]
        );
        assert_eq!(
            Interpolation::offset_vec3([1.0, 1.0, 1.0], [2.0, 0.0, -2.0], 0.5),
            [2.0, 1.0, 0.0]
        );
    }

    #[test]
    fn test_slerp_endpoints() {
        let a = [0.0, 0.0, 0.0, 1.0];
        let half = std::f32::consts::FRAC_1_SQRT_2;
        let b = [0.0, half, 0.0, half];

        let start = Interpolation::slerp(a, b, 0.0);
        let end = Interpolation::slerp(a, b, 1.0);
        for i in 0..4 {
            assert!((start[i] - a[i]).abs() < 1e-5);
            assert!((end[i] - b[i]).abs() < 1e-5);
        }
    }
}
