//! Convenience re-exports for safety-module authors.
//!
//! # Example
//!
//! ```
//! use canfd_safety_core::prelude::*;
//!
//! let mut vehicle = VehicleState::default();
//! vehicle.pcm_cruise_check(true);
//! assert!(vehicle.controls_allowed);
//! ```

pub use crate::angle::AngleCmdState;
pub use crate::crc::{CRC16_CCITT_POLY, Crc16Lut};
pub use crate::engine::SafetyEngine;
pub use crate::error::{FrameError, FrameResult};
pub use crate::frame::{CANFD_MAX_LEN, CanFrame, is_valid_canfd_len};
pub use crate::hooks::{CanMsg, SafetyConfig, SafetyHooks, SafetyState, msg_allowed};
pub use crate::limits::{AngleRateLookup, LongitudinalLimits, SteeringLimits};
pub use crate::longitudinal::longitudinal_accel_checks;
pub use crate::rx_check::{RxCheck, RxChecker, RxMessage};
pub use crate::state::VehicleState;
pub use crate::torque::TorqueCmdState;
pub use crate::{Micros, max_limit_check, to_signed, ts_elapsed};
