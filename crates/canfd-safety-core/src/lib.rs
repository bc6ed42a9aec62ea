//! Shared safety core for CAN-FD actuation gatekeepers.
//!
//! Vehicle-specific safety modules plug into this crate through the
//! [`SafetyHooks`] trait. The crate provides everything those modules consume
//! but do not own:
//!
//! - [`frame`]: bounds-safe view of one CAN-FD frame
//! - [`sample`]: smoothed driver torque / measured angle / speed trackers
//! - [`state`]: vehicle state and control-authority bookkeeping
//! - [`crc`]: CRC-16 lookup table generation
//! - [`limits`], [`torque`], [`angle`], [`longitudinal`]: actuation limiters
//! - [`rx_check`]: per-address counter, checksum and frequency validation
//! - [`engine`]: the dispatcher that wires all of the above to a hook set
//!
//! # RT Safety
//!
//! Every hook path is bounded and allocation-free. Allocation only happens
//! when an engine is constructed and its address-check table is copied in.
//!
//! # Example
//!
//! ```
//! use canfd_safety_core::prelude::*;
//!
//! let frame = CanFrame::new(0x1a0, 0, &[0u8; 32])?;
//! assert_eq!(frame.len(), 32);
//! assert_eq!(frame.bytes_le(0, 2), 0);
//! # Ok::<(), FrameError>(())
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod angle;
pub mod crc;
pub mod engine;
pub mod error;
pub mod frame;
pub mod hooks;
pub mod limits;
pub mod longitudinal;
pub mod prelude;
pub mod rx_check;
pub mod sample;
pub mod state;
pub mod torque;

pub use angle::AngleCmdState;
pub use crc::{CRC16_CCITT_POLY, Crc16Lut};
pub use engine::SafetyEngine;
pub use error::{FrameError, FrameResult};
pub use frame::{CANFD_MAX_LEN, CanFrame, is_valid_canfd_len};
pub use hooks::{CanMsg, SafetyConfig, SafetyHooks, SafetyState, msg_allowed};
pub use limits::{AngleRateLookup, LongitudinalLimits, SteeringLimits};
pub use longitudinal::longitudinal_accel_checks;
pub use rx_check::{MAX_WRONG_COUNTERS, RxCheck, RxCheckStatus, RxChecker, RxMessage};
pub use sample::{MAX_SAMPLE_VALS, Sample};
pub use state::{VEHICLE_SPEED_FACTOR, VehicleState};
pub use torque::TorqueCmdState;

/// Monotonic microsecond timestamp, wrapping at `u32::MAX` like a hardware timer.
pub type Micros = u32;

/// Elapsed microseconds between two wrapping timestamps.
#[inline]
pub fn ts_elapsed(now: Micros, then: Micros) -> u32 {
    now.wrapping_sub(then)
}

/// Returns `true` when `val` lies outside `[min, max]`.
#[inline]
pub fn max_limit_check(val: i32, max: i32, min: i32) -> bool {
    (val > max) || (val < min)
}

/// Sign-extends the low `bits` bits of `raw`.
///
/// ```
/// assert_eq!(canfd_safety_core::to_signed(0x3FFF, 14), -1);
/// assert_eq!(canfd_safety_core::to_signed(0x1FFF, 14), 0x1FFF);
/// ```
#[inline]
pub fn to_signed(raw: u32, bits: u32) -> i32 {
    match bits {
        0 => 0,
        1..=31 => {
            let shift = 32 - bits;
            ((raw << shift) as i32) >> shift
        }
        _ => raw as i32,
    }
}
