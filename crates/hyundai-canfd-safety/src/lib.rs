//! Safety hooks for Hyundai, Kia and Genesis cars on CAN-FD.
//!
//! The module sits between the driver-assistance computer and the car's
//! buses. For each frame it:
//!
//! - **rx**: decodes driver torque, steering angle, pedals, wheel speed,
//!   cruise buttons and SCC state into the shared [`VehicleState`], and flags
//!   stock-ECU traffic that the harness should have isolated
//! - **tx**: limits steering torque or angle, gates cruise buttons on control
//!   authority, restricts the ADAS diagnostic address to tester-present, and
//!   bounds acceleration requests (or allows only a cancel)
//! - **fwd**: relays bus 0 to bus 2 and bus 2 to bus 0, withholding camera
//!   messages openpilot replaces
//!
//! Configuration is a `u16` parameter resolved once into a
//! [`HyundaiCanfdConfig`] and one of six [`Variant`]s; see [`config`].
//!
//! [`VehicleState`]: canfd_safety_core::VehicleState
//!
//! # Example
//!
//! ```
//! use hyundai_canfd_safety::prelude::*;
//!
//! let mut engine = HyundaiCanfd::from(HyundaiParamFlags::CANFD_LKA_STEERING).into_engine();
//!
//! let mut buf = [0u8; 8];
//! encode::tester_present(&mut buf);
//! let frame = CanFrame::new(addr::ADAS_DIAG, bus::ECAN, &buf)?;
//! // Tester present is only on the allow-list when longitudinal is owned.
//! assert!(!engine.tx(&frame, 0));
//! # Ok::<(), FrameError>(())
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod config;
pub mod cruise;
pub mod error;
pub mod fwd;
pub mod hooks;
pub mod ids;
pub mod prelude;
pub mod rx;
pub mod signals;
pub mod tx;

pub use config::{HyundaiCanfdConfig, HyundaiCanfdParams, HyundaiParamFlags, PowertrainType, Variant};
pub use error::{ConfigError, ConfigResult};
pub use hooks::HyundaiCanfd;
pub use tx::{HYUNDAI_CANFD_STEERING_LIMITS, HYUNDAI_LONG_LIMITS};
