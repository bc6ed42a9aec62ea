//! [`SafetyHooks`] implementation tying the module together.

use canfd_safety_core::{
    CanFrame, Crc16Lut, Micros, SafetyConfig, SafetyEngine, SafetyHooks, SafetyState,
};

use crate::config::{HyundaiCanfdConfig, HyundaiCanfdParams, HyundaiParamFlags};
use crate::error::ConfigResult;
use crate::{fwd, rx, signals, tx};

/// Hyundai CAN-FD safety hooks for one resolved configuration.
#[derive(Debug, Clone)]
pub struct HyundaiCanfd {
    config: HyundaiCanfdConfig,
}

impl HyundaiCanfd {
    /// Hooks for an already resolved configuration.
    pub fn new(config: HyundaiCanfdConfig) -> Self {
        Self { config }
    }

    /// Hooks for a raw safety parameter, ignoring unknown bits.
    pub fn from_param(param: u16) -> Self {
        Self::new(HyundaiCanfdConfig::from_raw(param))
    }

    /// Hooks for a raw safety parameter.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownBits`](crate::ConfigError::UnknownBits)
    /// when the parameter sets bits that name no flag.
    pub fn try_from_param(param: u16) -> ConfigResult<Self> {
        HyundaiCanfdConfig::try_from_raw(param).map(Self::new)
    }

    /// Hooks for named parameters.
    pub fn from_params(params: &HyundaiCanfdParams) -> Self {
        Self::new(HyundaiCanfdConfig::from_params(params))
    }

    /// Resolved configuration.
    pub fn config(&self) -> &HyundaiCanfdConfig {
        &self.config
    }

    /// CRC table used for checksum verification.
    pub fn crc(&self) -> &'static Crc16Lut {
        &signals::CANFD_CRC
    }

    /// Wraps the hooks in a fresh [`SafetyEngine`].
    pub fn into_engine(self) -> SafetyEngine<Self> {
        SafetyEngine::new(self)
    }
}

impl From<HyundaiParamFlags> for HyundaiCanfd {
    fn from(flags: HyundaiParamFlags) -> Self {
        Self::new(HyundaiCanfdConfig::from_flags(flags))
    }
}

impl SafetyHooks for HyundaiCanfd {
    fn safety_config(&self) -> SafetyConfig {
        SafetyConfig {
            rx_checks: self.config.variant().rx_checks(),
            tx_msgs: self.config.variant().tx_msgs(),
        }
    }

    fn rx(&self, frame: &CanFrame, state: &mut SafetyState) -> bool {
        rx::rx_hook(&self.config, frame, &mut state.vehicle)
    }

    fn tx(&self, frame: &CanFrame, state: &mut SafetyState, now: Micros) -> bool {
        tx::tx_hook(&self.config, frame, state, now)
    }

    fn fwd(&self, bus: u8, addr: u32) -> Option<u8> {
        fwd::fwd_hook(&self.config, bus, addr)
    }

    fn counter(&self, frame: &CanFrame) -> Option<u8> {
        Some(signals::counter(frame))
    }

    fn checksum(&self, frame: &CanFrame) -> Option<u32> {
        Some(signals::checksum(frame))
    }

    fn compute_checksum(&self, frame: &CanFrame) -> Option<u32> {
        Some(u32::from(signals::canfd_checksum(
            &signals::CANFD_CRC,
            frame.addr(),
            frame.payload(),
        )))
    }
}
