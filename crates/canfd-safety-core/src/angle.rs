//! Steering angle command limiter.

use crate::limits::SteeringLimits;
use crate::max_limit_check;
use crate::state::{VEHICLE_SPEED_FACTOR, VehicleState};

/// Limiter memory carried between angle command frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AngleCmdState {
    desired_angle_last: i32,
}

impl AngleCmdState {
    /// Last commanded angle, accepted or not.
    pub fn desired_angle_last(&self) -> i32 {
        self.desired_angle_last
    }

    /// Checks one angle command. Returns `true` on violation.
    ///
    /// While active, the per-frame change is bounded by the speed-dependent
    /// rate tables. While inactive, the command must stay within one raw unit
    /// of the measured angle (or be zero, per profile).
    pub fn check(
        &mut self,
        desired_angle: i32,
        steer_control_enabled: bool,
        limits: &SteeringLimits,
        vehicle: &VehicleState,
    ) -> bool {
        let mut violation = false;

        if vehicle.controls_allowed && steer_control_enabled {
            // Fudge speed down so our bound is never tighter than the planner's.
            let fudged_speed = (vehicle.vehicle_speed.min() as f32 / VEHICLE_SPEED_FACTOR) - 1.0;
            let delta_angle_up =
                (limits.angle_rate_up_lookup.interpolate(fudged_speed) * limits.angle_deg_to_can + 1.0) as i32;
            let delta_angle_down =
                (limits.angle_rate_down_lookup.interpolate(fudged_speed) * limits.angle_deg_to_can + 1.0) as i32;

            let last = self.desired_angle_last;
            let highest = last.saturating_add(if last > 0 { delta_angle_up } else { delta_angle_down });
            let lowest = last.saturating_sub(if last >= 0 { delta_angle_down } else { delta_angle_up });

            violation |= max_limit_check(desired_angle, highest, lowest);
        }
        self.desired_angle_last = desired_angle;

        if !steer_control_enabled {
            violation |= if limits.inactive_angle_is_zero {
                desired_angle != 0
            } else {
                max_limit_check(
                    desired_angle,
                    vehicle.angle_meas.max().saturating_add(1),
                    vehicle.angle_meas.min().saturating_sub(1),
                )
            };
        }

        violation |= !vehicle.controls_allowed && steer_control_enabled;

        violation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limits::AngleRateLookup;

    const LIMITS: SteeringLimits = SteeringLimits {
        max_steer: 0,
        max_rt_delta: 0,
        max_rt_interval: 0,
        max_rate_up: 0,
        max_rate_down: 0,
        driver_torque_allowance: 0,
        driver_torque_multiplier: 0,
        min_valid_request_frames: 0,
        max_invalid_request_frames: 0,
        min_valid_request_rt_interval: 0,
        has_steer_req_tolerance: false,
        angle_deg_to_can: 10.0,
        angle_rate_up_lookup: AngleRateLookup {
            breakpoints: [0., 5., 25.],
            values: [2.5, 1.5, 0.2],
        },
        angle_rate_down_lookup: AngleRateLookup {
            breakpoints: [0., 5., 25.],
            values: [5., 2.0, 0.3],
        },
        inactive_angle_is_zero: false,
    };

    fn engaged() -> VehicleState {
        VehicleState {
            controls_allowed: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_standstill_rate_bounds() {
        let v = engaged();
        let mut st = AngleCmdState::default();
        // From zero the down table applies in both directions: 5.0 * 10 + 1.
        assert!(!st.check(51, true, &LIMITS, &v));
        // Moving away from zero now uses the up table: 2.5 * 10 + 1.
        assert!(!st.check(77, true, &LIMITS, &v));
        assert!(st.check(104, true, &LIMITS, &v));
    }

    #[test]
    fn test_speed_tightens_rate() {
        let mut v = engaged();
        for _ in 0..6 {
            v.update_vehicle_speed(26.0);
        }
        let mut st = AngleCmdState::default();
        // fudged speed 25 m/s: down delta = 0.3 * 10 + 1 = 4.
        assert!(!st.check(4, true, &LIMITS, &v));
        let mut st = AngleCmdState::default();
        assert!(st.check(5, true, &LIMITS, &v));
    }

    #[test]
    fn test_inactive_must_track_measurement() {
        let mut v = engaged();
        for _ in 0..6 {
            v.angle_meas.update(300);
        }
        let mut st = AngleCmdState::default();
        assert!(!st.check(301, false, &LIMITS, &v));
        assert!(!st.check(299, false, &LIMITS, &v));
        assert!(st.check(302, false, &LIMITS, &v));
        assert!(st.check(0, false, &LIMITS, &v));
    }

    #[test]
    fn test_active_without_authority_is_violation() {
        let v = VehicleState::default();
        let mut st = AngleCmdState::default();
        assert!(st.check(0, true, &LIMITS, &v));
        assert!(!st.check(0, false, &LIMITS, &v));
    }
}
