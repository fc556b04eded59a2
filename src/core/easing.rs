//! Easing curves for snap-back and sparkle animations.

use std::f32::consts::TAU;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Easing {
    Linear,
    /// Elastic out with overshoot. `amplitude` clamps to [1, 10], `period` to [0.1, 2].
    ElasticOut { amplitude: f32, period: f32 },
    /// CSS-style `cubic-bezier(x1, y1, x2, y2)`.
    CubicBezier { x1: f32, y1: f32, x2: f32, y2: f32 },
}

impl Easing {
    /// Snap-back curve: elastic out, amplitude 1, period 0.6.
    pub const fn snap_back() -> Self {
        Easing::ElasticOut {
            amplitude: 1.0,
            period: 0.6,
        }
    }

    /// Sparkle curve: `cubic-bezier(.2, .9, .2, 1)`.
    pub const fn sparkle() -> Self {
        Easing::CubicBezier {
            x1: 0.2,
            y1: 0.9,
            x2: 0.2,
            y2: 1.0,
        }
    }

    /// Map linear progress `t` to eased progress. `t` is clamped to [0, 1];
    /// the result may leave that range for overshooting curves.
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Easing::Linear => t,
            Easing::ElasticOut { amplitude, period } => elastic_out(t, amplitude, period),
            Easing::CubicBezier { x1, y1, x2, y2 } => cubic_bezier(t, x1, y1, x2, y2),
        }
    }
}

fn elastic_in(t: f32, amplitude: f32, period: f32) -> f32 {
    if t == 0.0 || t == 1.0 {
        return t;
    }
    let a = amplitude.clamp(1.0, 10.0);
    let p = period.clamp(0.1, 2.0);
    let s = p / TAU * (1.0 / a).asin();
    -a * 2f32.powf(10.0 * (t - 1.0)) * (((t - 1.0) - s) * TAU / p).sin()
}

fn elastic_out(t: f32, amplitude: f32, period: f32) -> f32 {
    1.0 - elastic_in(1.0 - t, amplitude, period)
}

#[inline]
fn bezier_axis(s: f32, p1: f32, p2: f32) -> f32 {
    // B(s) for control values 0, p1, p2, 1
    let u = 1.0 - s;
    3.0 * u * u * s * p1 + 3.0 * u * s * s * p2 + s * s * s
}

#[inline]
fn bezier_axis_slope(s: f32, p1: f32, p2: f32) -> f32 {
    let u = 1.0 - s;
    3.0 * u * u * p1 + 6.0 * u * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
}

fn cubic_bezier(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    if t == 0.0 || t == 1.0 {
        return t;
    }

    // Newton first, bisection when the slope flattens out.
    let mut s = t;
    for _ in 0..8 {
        let err = bezier_axis(s, x1, x2) - t;
        if err.abs() < 1e-6 {
            return bezier_axis(s, y1, y2);
        }
        let slope = bezier_axis_slope(s, x1, x2);
        if slope.abs() < 1e-6 {
            break;
        }
        s -= err / slope;
    }

    let (mut lo, mut hi) = (0.0f32, 1.0f32);
    s = t;
    for _ in 0..32 {
        let x = bezier_axis(s, x1, x2);
        if (x - t).abs() < 1e-6 {
            break;
        }
        if x < t {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) * 0.5;
    }
    bezier_axis(s, y1, y2)
}
