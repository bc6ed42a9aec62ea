//! Outbound hook: actuation limits and command-content policy.

use canfd_safety_core::{
    AngleRateLookup, CanFrame, LongitudinalLimits, Micros, SafetyState, SteeringLimits,
    longitudinal_accel_checks,
};
use tracing::debug;

use crate::config::HyundaiCanfdConfig;
use crate::ids::{addr, button};
use crate::signals;

/// Steering limits shared by every Hyundai CAN-FD variant.
///
/// The EPS faults when held at high angle for too long, so the request bit may
/// be cut for two frames while torque is held, at most once every 89 frames.
pub const HYUNDAI_CANFD_STEERING_LIMITS: SteeringLimits = SteeringLimits {
    max_steer: 270,
    max_rt_delta: 112,
    max_rt_interval: 250_000,
    max_rate_up: 2,
    max_rate_down: 3,
    driver_torque_allowance: 250,
    driver_torque_multiplier: 2,
    min_valid_request_frames: 89,
    max_invalid_request_frames: 2,
    min_valid_request_rt_interval: 810_000,
    has_steer_req_tolerance: true,
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

/// Acceleration limits (cm/s²).
pub const HYUNDAI_LONG_LIMITS: LongitudinalLimits = LongitudinalLimits {
    max_accel: 200,
    min_accel: -350,
    inactive_accel: 0,
};

/// Returns `true` when `frame` may be transmitted.
///
/// Addresses without a rule here are allowed; the allow-list is enforced by
/// the engine before this runs.
pub fn tx_hook(
    config: &HyundaiCanfdConfig,
    frame: &CanFrame,
    state: &mut SafetyState,
    now: Micros,
) -> bool {
    let address = frame.addr();
    let mut violation = false;

    if address == config.tx_steer_addr() {
        violation |= steer_violation(config, frame, state, now);
    }

    if address == addr::CRUISE_BUTTONS {
        let code = frame.byte(2) & 0x7;
        let allowed = (code == button::CANCEL && state.vehicle.cruise_engaged_prev)
            || (code == button::RESUME && state.vehicle.controls_allowed);
        if !allowed {
            debug!(code, "cruise button denied");
        }
        violation |= !allowed;
    }

    if address == addr::ADAS_DIAG && config.lka_steering() && !signals::is_tester_present(frame) {
        debug!("non tester-present payload on ADAS diagnostic address");
        violation = true;
    }

    if address == addr::SCC_CONTROL {
        violation |= accel_violation(config, frame, state);
    }

    !violation
}

fn steer_violation(
    config: &HyundaiCanfdConfig,
    frame: &CanFrame,
    state: &mut SafetyState,
    now: Micros,
) -> bool {
    let limits = &HYUNDAI_CANFD_STEERING_LIMITS;
    let violation = if config.angle_steering() {
        let (desired_angle, active) = signals::lkas_angle_cmd(frame);
        state.angle_cmd.check(desired_angle, active, limits, &state.vehicle)
    } else {
        let (desired_torque, steer_req) = signals::lkas_torque_cmd(frame);
        state
            .torque_cmd
            .check(desired_torque, steer_req, limits, &state.vehicle, now)
    };
    if violation {
        debug!(addr = format_args!("{:#x}", frame.addr()), "steering command violates limits");
    }
    violation
}

fn accel_violation(config: &HyundaiCanfdConfig, frame: &CanFrame, state: &SafetyState) -> bool {
    let (accel_raw, accel_val) = signals::accel_cmd(frame);
    let violation = if config.longitudinal() {
        longitudinal_accel_checks(accel_raw, &HYUNDAI_LONG_LIMITS, &state.vehicle)
            | longitudinal_accel_checks(accel_val, &HYUNDAI_LONG_LIMITS, &state.vehicle)
    } else {
        // Without longitudinal this address is only used to cancel.
        accel_raw != 0 || accel_val != 0
    };
    if violation {
        debug!(accel_raw, accel_val, longitudinal = config.longitudinal(), "accel command denied");
    }
    violation
}
