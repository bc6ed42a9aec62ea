//! Dispatcher that owns the safety state and drives a [`SafetyHooks`] set.
//!
//! The engine is the only writer of [`SafetyState`]. Callers feed it inbound
//! frames with [`SafetyEngine::rx`], ask permission for outbound frames with
//! [`SafetyEngine::tx`], route gateway traffic with [`SafetyEngine::fwd`] and
//! run the freshness pass with [`SafetyEngine::tick`].

use tracing::debug;

use crate::Micros;
use crate::frame::CanFrame;
use crate::hooks::{CanMsg, SafetyHooks, SafetyState, msg_allowed};
use crate::rx_check::RxChecker;

/// Safety state plus the hook set that interprets it.
#[derive(Debug, Clone)]
pub struct SafetyEngine<H> {
    hooks: H,
    state: SafetyState,
    rx_checker: RxChecker,
    tx_msgs: &'static [CanMsg],
}

impl<H: SafetyHooks> SafetyEngine<H> {
    /// Installs `hooks` with fresh state and its address-check table.
    pub fn new(hooks: H) -> Self {
        let config = hooks.safety_config();
        Self {
            rx_checker: RxChecker::new(&config.rx_checks),
            tx_msgs: config.tx_msgs,
            state: SafetyState::default(),
            hooks,
        }
    }

    /// Processes one inbound frame. Returns `true` if it passed the address check.
    ///
    /// Frames that fail the check never reach the rx hook and revoke authority.
    pub fn rx(&mut self, frame: &CanFrame, now: Micros) -> bool {
        let valid = self
            .rx_checker
            .validate(frame, &self.hooks, &mut self.state.vehicle, now);
        if valid {
            let stock_ecu_detected = self.hooks.rx(frame, &mut self.state);
            self.state.vehicle.generic_rx_checks(stock_ecu_detected);
        }
        valid
    }

    /// Returns `true` when `frame` may be sent.
    pub fn tx(&mut self, frame: &CanFrame, now: Micros) -> bool {
        if self.state.vehicle.relay_malfunction {
            debug!(addr = format_args!("{:#x}", frame.addr()), "tx blocked: relay malfunction");
            return false;
        }
        if !msg_allowed(frame, self.tx_msgs) {
            debug!(
                addr = format_args!("{:#x}", frame.addr()),
                bus = frame.bus(),
                len = frame.len(),
                "tx blocked: not on allow-list"
            );
            return false;
        }
        let allowed = self.hooks.tx(frame, &mut self.state, now);
        if !allowed {
            debug!(addr = format_args!("{:#x}", frame.addr()), "tx blocked by safety hook");
        }
        allowed
    }

    /// Destination bus for a frame received on `bus`, or `None` to drop it.
    pub fn fwd(&self, bus: u8, addr: u32) -> Option<u8> {
        if self.state.vehicle.relay_malfunction {
            return None;
        }
        self.hooks.fwd(bus, addr)
    }

    /// Periodic freshness pass over the address-check table.
    pub fn tick(&mut self, now: Micros) -> bool {
        self.rx_checker.tick(&mut self.state.vehicle, now)
    }

    /// The installed hook set.
    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    /// Current safety state.
    pub fn state(&self) -> &SafetyState {
        &self.state
    }

    /// Mutable safety state, for harnesses that need to seed authority.
    pub fn state_mut(&mut self) -> &mut SafetyState {
        &mut self.state
    }

    /// Address-check table and its runtime status.
    pub fn rx_checker(&self) -> &RxChecker {
        &self.rx_checker
    }

    /// Outbound allow-list of the installed configuration.
    pub fn tx_msgs(&self) -> &'static [CanMsg] {
        self.tx_msgs
    }
}
