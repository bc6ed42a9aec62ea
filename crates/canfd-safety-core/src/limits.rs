//! Constant actuation-limit profiles.
//!
//! Profiles are plain data: vehicle modules declare them as `const` items and
//! hand them to the limiters in [`torque`](crate::torque),
//! [`angle`](crate::angle) and [`longitudinal`](crate::longitudinal).

use serde::{Deserialize, Serialize};

/// Piecewise-linear rate table: `values[i]` applies at `breakpoints[i]`.
///
/// Breakpoints must be monotonically increasing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleRateLookup {
    /// Input breakpoints (vehicle speed, m/s).
    pub breakpoints: [f32; 3],
    /// Rate bound at each breakpoint (degrees per frame).
    pub values: [f32; 3],
}

impl AngleRateLookup {
    /// Linear interpolation, clamped to the first and last points.
    ///
    /// ```
    /// use canfd_safety_core::AngleRateLookup;
    ///
    /// let lut = AngleRateLookup { breakpoints: [0., 5., 25.], values: [2.5, 1.5, 0.2] };
    /// assert!((lut.interpolate(-1.0) - 2.5).abs() < 1e-6);
    /// assert!((lut.interpolate(2.5) - 2.0).abs() < 1e-6);
    /// assert!((lut.interpolate(100.0) - 0.2).abs() < 1e-6);
    /// ```
    pub fn interpolate(&self, x: f32) -> f32 {
        let points = self.breakpoints.iter().zip(self.values.iter());
        let mut prev: Option<(f32, f32)> = None;

        for (&bx, &by) in points {
            match prev {
                None if x <= bx => return by,
                Some((x0, y0)) if x < bx => {
                    let dx = (bx - x0).max(0.0001);
                    return ((by - y0) * (x - x0) / dx) + y0;
                }
                _ => {}
            }
            prev = Some((bx, by));
        }

        prev.map_or(0.0, |(_, y)| y)
    }
}

/// Steering limits for both torque- and angle-commanded racks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SteeringLimits {
    /// Absolute torque bound (raw units).
    pub max_steer: i32,
    /// Maximum change against the value sampled at the last realtime window.
    pub max_rt_delta: i32,
    /// Realtime window length (µs).
    pub max_rt_interval: u32,
    /// Maximum per-frame increase in magnitude.
    pub max_rate_up: i32,
    /// Maximum per-frame decrease in magnitude.
    pub max_rate_down: i32,
    /// Driver torque that is tolerated before the bound starts shrinking.
    pub driver_torque_allowance: i32,
    /// Scale applied to driver torque beyond the allowance.
    pub driver_torque_multiplier: i32,

    /// Consecutive valid-request frames required before a request cut.
    pub min_valid_request_frames: u32,
    /// Consecutive frames the request bit may be low while torque is nonzero.
    pub max_invalid_request_frames: u32,
    /// Minimum time between request cuts (µs).
    pub min_valid_request_rt_interval: u32,
    /// Whether request cuts are tolerated at all.
    pub has_steer_req_tolerance: bool,

    /// Degrees → raw angle units.
    pub angle_deg_to_can: f32,
    /// Allowed angle increase per frame, by vehicle speed.
    pub angle_rate_up_lookup: AngleRateLookup,
    /// Allowed angle decrease per frame, by vehicle speed.
    pub angle_rate_down_lookup: AngleRateLookup,
    /// When inactive, require a zero angle instead of tracking the measurement.
    pub inactive_angle_is_zero: bool,
}

/// Acceleration bounds in raw command units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LongitudinalLimits {
    /// Highest allowed acceleration.
    pub max_accel: i32,
    /// Lowest allowed acceleration (strongest braking).
    pub min_accel: i32,
    /// Value that means "no request"; always allowed.
    pub inactive_accel: i32,
}
