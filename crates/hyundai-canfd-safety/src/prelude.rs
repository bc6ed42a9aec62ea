//! Convenience re-exports for harnesses and tools.
//!
//! # Example
//!
//! ```
//! use hyundai_canfd_safety::prelude::*;
//!
//! let engine = HyundaiCanfd::from(HyundaiParamFlags::CAMERA_SCC).into_engine();
//! assert_eq!(engine.hooks().config().variant(), Variant::CameraScc);
//! assert_eq!(engine.fwd(0, 0x12a), Some(2));
//! ```

pub use crate::config::{
    HyundaiCanfdConfig, HyundaiCanfdParams, HyundaiParamFlags, PowertrainType, Variant,
};
pub use crate::error::{ConfigError, ConfigResult};
pub use crate::hooks::HyundaiCanfd;
pub use crate::ids::{addr, bus, button};
pub use crate::signals::{ButtonState, encode};
pub use crate::tx::{HYUNDAI_CANFD_STEERING_LIMITS, HYUNDAI_LONG_LIMITS};

pub use canfd_safety_core::prelude::*;
