//! Driver-limited steering torque limiter.
//!
//! Enforces, per commanded frame:
//!
//! 1. an absolute bound of `max_steer`
//! 2. a rate bound against the previous command, shrunk toward zero while the
//!    driver is overpowering the rack
//! 3. a realtime bound against the command sampled at the start of the
//!    current `max_rt_interval` window
//! 4. zero torque without control authority
//! 5. request-bit sequencing: the request bit may only drop while torque is
//!    nonzero for a bounded number of frames, after a run of valid frames
//!
//! Any violation, or loss of authority, resets the limiter to zero.

use crate::limits::SteeringLimits;
use crate::sample::Sample;
use crate::state::VehicleState;
use crate::{Micros, max_limit_check, ts_elapsed};

/// Limiter memory carried between torque command frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TorqueCmdState {
    desired_torque_last: i32,
    rt_torque_last: i32,
    ts_torque_check_last: Micros,
    valid_steer_req_count: u32,
    invalid_steer_req_count: u32,
    ts_steer_req_mismatch_last: Micros,
}

impl TorqueCmdState {
    /// Last command accepted into the rate check.
    pub fn desired_torque_last(&self) -> i32 {
        self.desired_torque_last
    }

    /// Consecutive frames with a matching request bit (saturating).
    pub fn valid_steer_req_count(&self) -> u32 {
        self.valid_steer_req_count
    }

    /// Consecutive frames with the request bit low while torque is nonzero.
    pub fn invalid_steer_req_count(&self) -> u32 {
        self.invalid_steer_req_count
    }

    /// Checks one torque command. Returns `true` on violation.
    pub fn check(
        &mut self,
        desired_torque: i32,
        steer_req: bool,
        limits: &SteeringLimits,
        vehicle: &VehicleState,
        now: Micros,
    ) -> bool {
        let mut violation = false;

        if vehicle.controls_allowed {
            let max_torque = limits.max_steer;
            violation |= max_limit_check(desired_torque, max_torque, -max_torque);

            violation |= driver_limit_check(
                desired_torque,
                self.desired_torque_last,
                &vehicle.torque_driver,
                limits,
            );
            self.desired_torque_last = desired_torque;

            violation |= rt_rate_limit_check(desired_torque, self.rt_torque_last, limits.max_rt_delta);

            if ts_elapsed(now, self.ts_torque_check_last) > limits.max_rt_interval {
                self.rt_torque_last = desired_torque;
                self.ts_torque_check_last = now;
            }
        }

        if !vehicle.controls_allowed && desired_torque != 0 {
            violation = true;
        }

        let steer_req_mismatch = !steer_req && desired_torque != 0;
        if !limits.has_steer_req_tolerance {
            violation |= steer_req_mismatch;
        } else if steer_req_mismatch {
            if self.invalid_steer_req_count == 0 {
                // Cutting requires a run of valid frames and enough time since the last cut.
                if self.valid_steer_req_count < limits.min_valid_request_frames {
                    violation = true;
                }
                if ts_elapsed(now, self.ts_steer_req_mismatch_last)
                    < limits.min_valid_request_rt_interval
                {
                    violation = true;
                }
            } else if self.invalid_steer_req_count >= limits.max_invalid_request_frames {
                violation = true;
            }

            self.valid_steer_req_count = 0;
            self.ts_steer_req_mismatch_last = now;
            self.invalid_steer_req_count = self
                .invalid_steer_req_count
                .saturating_add(1)
                .min(limits.max_invalid_request_frames);
        } else {
            self.valid_steer_req_count = self
                .valid_steer_req_count
                .saturating_add(1)
                .min(limits.min_valid_request_frames);
            self.invalid_steer_req_count = 0;
        }

        if violation || !vehicle.controls_allowed {
            *self = Self {
                ts_torque_check_last: now,
                ts_steer_req_mismatch_last: now,
                ..Self::default()
            };
        }

        violation
    }
}

/// Rate bound that tightens toward zero while the driver opposes the command.
fn driver_limit_check(val: i32, val_last: i32, driver: &Sample, limits: &SteeringLimits) -> bool {
    let max_val = limits.max_steer;
    let allowance = limits.driver_torque_allowance;
    let factor = limits.driver_torque_multiplier;

    let highest_allowed_rl = val_last.max(0).saturating_add(limits.max_rate_up);
    let lowest_allowed_rl = val_last.min(0).saturating_sub(limits.max_rate_up);

    let driver_max_limit = max_val.saturating_add(allowance.saturating_add(driver.max()).saturating_mul(factor));
    let driver_min_limit = (-max_val).saturating_add((-allowance).saturating_add(driver.min()).saturating_mul(factor));

    let highest_allowed = highest_allowed_rl.min(
        val_last
            .saturating_sub(limits.max_rate_down)
            .max(driver_max_limit.max(0)),
    );
    let lowest_allowed = lowest_allowed_rl.max(
        val_last
            .saturating_add(limits.max_rate_down)
            .min(driver_min_limit.min(0)),
    );

    max_limit_check(val, highest_allowed, lowest_allowed)
}

fn rt_rate_limit_check(val: i32, val_last: i32, max_rt_delta: i32) -> bool {
    let highest = val_last.max(0).saturating_add(max_rt_delta);
    let lowest = val_last.min(0).saturating_sub(max_rt_delta);
    max_limit_check(val, highest, lowest)
}
