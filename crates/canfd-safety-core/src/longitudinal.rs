//! Longitudinal acceleration bound check.

use crate::limits::LongitudinalLimits;
use crate::max_limit_check;
use crate::state::VehicleState;

/// Returns `true` when `desired_accel` violates `limits`.
///
/// The inactive value is always allowed. Any other value needs longitudinal
/// authority and must lie within `[min_accel, max_accel]`.
pub fn longitudinal_accel_checks(
    desired_accel: i32,
    limits: &LongitudinalLimits,
    vehicle: &VehicleState,
) -> bool {
    let accel_valid = vehicle.longitudinal_allowed()
        && !max_limit_check(desired_accel, limits.max_accel, limits.min_accel);
    let accel_inactive = desired_accel == limits.inactive_accel;
    !(accel_valid || accel_inactive)
}
