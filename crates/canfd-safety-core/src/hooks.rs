//! The seam between the shared core and a vehicle-specific safety module.

use crate::angle::AngleCmdState;
use crate::frame::CanFrame;
use crate::rx_check::RxCheck;
use crate::state::VehicleState;
use crate::torque::TorqueCmdState;
use crate::Micros;

/// One entry of a transmit allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CanMsg {
    /// Frame identifier.
    pub addr: u32,
    /// Destination bus.
    pub bus: u8,
    /// Exact payload length.
    pub len: u8,
}

impl CanMsg {
    /// Allow-list entry for `addr` on `bus` with payload length `len`.
    pub const fn new(addr: u32, bus: u8, len: u8) -> Self {
        Self { addr, bus, len }
    }
}

/// Returns `true` when `frame` matches an allow-list entry exactly.
pub fn msg_allowed(frame: &CanFrame, allowed: &[CanMsg]) -> bool {
    allowed.iter().any(|m| {
        m.addr == frame.addr() && m.bus == frame.bus() && usize::from(m.len) == frame.len()
    })
}

/// Address-check table and transmit allow-list selected at init.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SafetyConfig {
    /// Inbound address checks.
    pub rx_checks: Vec<RxCheck>,
    /// Outbound allow-list.
    pub tx_msgs: &'static [CanMsg],
}

/// Mutable context threaded through every hook call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SafetyState {
    /// Trusted vehicle state, written by rx hooks.
    pub vehicle: VehicleState,
    /// Torque limiter memory.
    pub torque_cmd: TorqueCmdState,
    /// Angle limiter memory.
    pub angle_cmd: AngleCmdState,
}

/// Vehicle-specific safety logic driven by [`SafetyEngine`](crate::SafetyEngine).
///
/// Implementations hold only immutable configuration. All mutable state lives
/// in the [`SafetyState`] the engine passes in, and the engine guarantees the
/// hooks are never invoked concurrently.
pub trait SafetyHooks {
    /// Address checks and allow-list for this configuration.
    fn safety_config(&self) -> SafetyConfig;

    /// Consumes a validated inbound frame.
    ///
    /// Returns `true` when the frame shows a stock controller that should have
    /// been isolated.
    fn rx(&self, frame: &CanFrame, state: &mut SafetyState) -> bool;

    /// Decides whether an outbound frame may be transmitted.
    fn tx(&self, frame: &CanFrame, state: &mut SafetyState, now: Micros) -> bool;

    /// Destination bus for a frame received on `bus`, or `None` to drop it.
    fn fwd(&self, bus: u8, addr: u32) -> Option<u8>;

    /// Rolling counter embedded in `frame`, if this module defines one.
    fn counter(&self, _frame: &CanFrame) -> Option<u8> {
        None
    }

    /// Checksum carried by `frame`, if this module defines one.
    fn checksum(&self, _frame: &CanFrame) -> Option<u32> {
        None
    }

    /// Checksum `frame` should carry, if this module defines one.
    fn compute_checksum(&self, _frame: &CanFrame) -> Option<u32> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FrameError;

    const TX: &[CanMsg] = &[CanMsg::new(0x12a, 0, 16), CanMsg::new(0x1cf, 2, 8)];

    #[test]
    fn test_msg_allowed_requires_exact_match() -> Result<(), FrameError> {
        assert!(msg_allowed(&CanFrame::new(0x12a, 0, &[0; 16])?, TX));
        assert!(!msg_allowed(&CanFrame::new(0x12a, 1, &[0; 16])?, TX));
        assert!(!msg_allowed(&CanFrame::new(0x12a, 0, &[0; 8])?, TX));
        assert!(!msg_allowed(&CanFrame::new(0x1aa, 2, &[0; 8])?, TX));
        Ok(())
    }
}
