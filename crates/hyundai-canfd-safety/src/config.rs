//! Safety parameter decoding and variant selection.
//!
//! The harness hands the module a `u16` bitfield once at startup. It is
//! resolved here into an immutable [`HyundaiCanfdConfig`], which picks exactly
//! one [`Variant`]. The variant owns the address-check table and the transmit
//! allow-list; nothing is reconfigured afterwards.

use bitflags::bitflags;
use canfd_safety_core::{CanMsg, RxCheck, RxMessage};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};
use crate::ids::{addr, bus};

bitflags! {
    /// Safety parameter bits.
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct HyundaiParamFlags: u16 {
        /// Gas pedal comes from the EV accelerator report.
        const EV_GAS                 = 1;
        /// Gas pedal comes from the hybrid accelerator report.
        const HYBRID_GAS             = 2;
        /// openpilot owns longitudinal control.
        const LONGITUDINAL           = 4;
        /// SCC_CONTROL is produced by the camera.
        const CAMERA_SCC             = 8;
        /// Lateral control uses the split LKAS message (ADAS ECU on bus 1).
        const CANFD_LKA_STEERING     = 16;
        /// Cruise buttons use the alternate message layout.
        const CANFD_ALT_BUTTONS      = 32;
        /// LKAS moves to its alternate address.
        const CANFD_LKA_STEERING_ALT = 128;
        /// Lateral commands are angles instead of torques.
        const CANFD_ANGLE_STEERING   = 256;
    }
}

/// Parameter flags as named booleans, for loading from configuration files.
///
/// Unknown keys are rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HyundaiCanfdParams {
    /// See [`HyundaiParamFlags::EV_GAS`].
    pub ev_gas: bool,
    /// See [`HyundaiParamFlags::HYBRID_GAS`].
    pub hybrid_gas: bool,
    /// See [`HyundaiParamFlags::LONGITUDINAL`].
    pub longitudinal: bool,
    /// See [`HyundaiParamFlags::CAMERA_SCC`].
    pub camera_scc: bool,
    /// See [`HyundaiParamFlags::CANFD_LKA_STEERING`].
    pub lka_steering: bool,
    /// See [`HyundaiParamFlags::CANFD_ALT_BUTTONS`].
    pub alt_buttons: bool,
    /// See [`HyundaiParamFlags::CANFD_LKA_STEERING_ALT`].
    pub lka_steering_alt: bool,
    /// See [`HyundaiParamFlags::CANFD_ANGLE_STEERING`].
    pub angle_steering: bool,
}

impl HyundaiCanfdParams {
    /// Packs the booleans into the parameter bitfield.
    pub fn flags(&self) -> HyundaiParamFlags {
        let mut flags = HyundaiParamFlags::empty();
        flags.set(HyundaiParamFlags::EV_GAS, self.ev_gas);
        flags.set(HyundaiParamFlags::HYBRID_GAS, self.hybrid_gas);
        flags.set(HyundaiParamFlags::LONGITUDINAL, self.longitudinal);
        flags.set(HyundaiParamFlags::CAMERA_SCC, self.camera_scc);
        flags.set(HyundaiParamFlags::CANFD_LKA_STEERING, self.lka_steering);
        flags.set(HyundaiParamFlags::CANFD_ALT_BUTTONS, self.alt_buttons);
        flags.set(HyundaiParamFlags::CANFD_LKA_STEERING_ALT, self.lka_steering_alt);
        flags.set(HyundaiParamFlags::CANFD_ANGLE_STEERING, self.angle_steering);
        flags
    }
}

impl From<HyundaiParamFlags> for HyundaiCanfdParams {
    fn from(flags: HyundaiParamFlags) -> Self {
        Self {
            ev_gas: flags.contains(HyundaiParamFlags::EV_GAS),
            hybrid_gas: flags.contains(HyundaiParamFlags::HYBRID_GAS),
            longitudinal: flags.contains(HyundaiParamFlags::LONGITUDINAL),
            camera_scc: flags.contains(HyundaiParamFlags::CAMERA_SCC),
            lka_steering: flags.contains(HyundaiParamFlags::CANFD_LKA_STEERING),
            alt_buttons: flags.contains(HyundaiParamFlags::CANFD_ALT_BUTTONS),
            lka_steering_alt: flags.contains(HyundaiParamFlags::CANFD_LKA_STEERING_ALT),
            angle_steering: flags.contains(HyundaiParamFlags::CANFD_ANGLE_STEERING),
        }
    }
}

/// Which accelerator report carries the gas pedal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowertrainType {
    /// Combustion: ACCELERATOR_BRAKE_ALT.
    #[default]
    Ice,
    /// Hybrid: ACCELERATOR_ALT.
    Hybrid,
    /// Electric: ACCELERATOR.
    Ev,
}

impl PowertrainType {
    /// EV takes precedence when both gas flags are set.
    pub fn from_flags(flags: HyundaiParamFlags) -> Self {
        if flags.contains(HyundaiParamFlags::EV_GAS) {
            Self::Ev
        } else if flags.contains(HyundaiParamFlags::HYBRID_GAS) {
            Self::Hybrid
        } else {
            Self::Ice
        }
    }
}

/// The six supported wiring/feature combinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Longitudinal owned, split LKAS steering, ADAS ECU disabled over UDS.
    LongitudinalLka,
    /// Longitudinal owned, combined LFA steering with camera SCC.
    LongitudinalLfa,
    /// Stock longitudinal, split LKAS steering at the default address.
    Lka,
    /// Stock longitudinal, split LKAS steering at the alternate address.
    LkaAlt,
    /// Stock longitudinal, LFA steering, SCC from the radar on bus 0.
    RadarScc,
    /// Stock longitudinal, LFA steering, SCC from the camera on bus 2.
    CameraScc,
}

impl Variant {
    /// Every variant, in selection order.
    pub const ALL: [Self; 6] = [
        Self::LongitudinalLka,
        Self::LongitudinalLfa,
        Self::Lka,
        Self::LkaAlt,
        Self::RadarScc,
        Self::CameraScc,
    ];

    /// Address-check table for this variant.
    pub fn rx_checks(self) -> Vec<RxCheck> {
        let (pt_bus, scc_bus) = match self {
            Self::LongitudinalLka => (bus::ECAN, None),
            Self::LongitudinalLfa => (bus::MAIN, None),
            Self::Lka | Self::LkaAlt => (bus::ECAN, Some(bus::ECAN)),
            Self::RadarScc => (bus::MAIN, Some(bus::MAIN)),
            Self::CameraScc => (bus::MAIN, Some(bus::CAM)),
        };
        let mut checks = common_rx_checks(pt_bus).to_vec();
        checks.extend(scc_bus.map(scc_rx_check));
        checks
    }

    /// Transmit allow-list for this variant.
    pub fn tx_msgs(self) -> &'static [CanMsg] {
        match self {
            Self::LongitudinalLka => LKA_STEERING_LONG_TX_MSGS,
            Self::Lka => LKA_STEERING_TX_MSGS,
            Self::LkaAlt => LKA_STEERING_ALT_TX_MSGS,
            Self::LongitudinalLfa | Self::RadarScc | Self::CameraScc => LFA_STEERING_TX_MSGS,
        }
    }
}

/// Pedal, speed, torque, button and angle reports present on every variant.
pub const fn common_rx_checks(pt_bus: u8) -> [RxCheck; 6] {
    [
        RxCheck::any_of(
            RxMessage::new(addr::ACCELERATOR, pt_bus, 32)
                .with_checksum(true)
                .with_max_counter(0xff)
                .with_frequency(100),
            RxMessage::new(addr::ACCELERATOR_BRAKE_ALT, pt_bus, 32)
                .with_checksum(true)
                .with_max_counter(0xff)
                .with_frequency(100),
            RxMessage::new(addr::ACCELERATOR_ALT, pt_bus, 32)
                .with_checksum(true)
                .with_max_counter(0xff)
                .with_frequency(100),
        ),
        RxCheck::single(
            RxMessage::new(addr::TCS, pt_bus, 24)
                .with_checksum(true)
                .with_max_counter(0xff)
                .with_frequency(50),
        ),
        RxCheck::single(
            RxMessage::new(addr::WHEEL_SPEEDS, pt_bus, 24)
                .with_checksum(true)
                .with_max_counter(0xff)
                .with_frequency(100),
        ),
        RxCheck::single(
            RxMessage::new(addr::MDPS, pt_bus, 24)
                .with_checksum(true)
                .with_max_counter(0xff)
                .with_frequency(100),
        ),
        RxCheck::either(
            RxMessage::new(addr::CRUISE_BUTTONS, pt_bus, 8)
                .with_max_counter(0xf)
                .with_frequency(50),
            RxMessage::new(addr::CRUISE_BUTTONS_ALT, pt_bus, 16)
                .with_max_counter(0xff)
                .with_frequency(50),
        ),
        RxCheck::single(
            RxMessage::new(addr::STEERING_SENSORS, pt_bus, 16)
                .with_checksum(true)
                .with_max_counter(0xff)
                .with_frequency(100),
        ),
    ]
}

/// SCC_CONTROL, from the ADAS ECU, radar or camera depending on `scc_bus`.
pub const fn scc_rx_check(scc_bus: u8) -> RxCheck {
    RxCheck::single(
        RxMessage::new(addr::SCC_CONTROL, scc_bus, 32)
            .with_checksum(true)
            .with_max_counter(0xff)
            .with_frequency(50),
    )
}

/// Split LKAS steering, default address.
pub static LKA_STEERING_TX_MSGS: &[CanMsg] = &[
    CanMsg::new(addr::LKAS, bus::MAIN, 16),
    CanMsg::new(addr::CRUISE_BUTTONS, bus::ECAN, 8),
    CanMsg::new(addr::CAM_0X2A4, bus::MAIN, 24),
];

/// Split LKAS steering, alternate address.
pub static LKA_STEERING_ALT_TX_MSGS: &[CanMsg] = &[
    CanMsg::new(addr::LKAS_ALT, bus::MAIN, 32),
    CanMsg::new(addr::CRUISE_BUTTONS, bus::ECAN, 8),
    CanMsg::new(addr::CAM_0X362, bus::MAIN, 32),
];

/// Split LKAS steering with the ADAS ECU knocked out; its traffic is replaced on bus 1.
pub static LKA_STEERING_LONG_TX_MSGS: &[CanMsg] = &[
    CanMsg::new(addr::LKAS, bus::MAIN, 16),
    CanMsg::new(addr::CRUISE_BUTTONS, bus::ECAN, 8),
    CanMsg::new(addr::CAM_0X2A4, bus::MAIN, 24),
    CanMsg::new(addr::ADRV_0X51, bus::MAIN, 32),
    CanMsg::new(addr::ADAS_DIAG, bus::ECAN, 8),
    CanMsg::new(addr::LFA, bus::ECAN, 16),
    CanMsg::new(addr::ADRV_0X160, bus::ECAN, 16),
    CanMsg::new(addr::LFAHDA_CLUSTER, bus::ECAN, 16),
    CanMsg::new(addr::SCC_CONTROL, bus::ECAN, 32),
    CanMsg::new(addr::ADRV_0X1EA, bus::ECAN, 32),
    CanMsg::new(addr::ADRV_0X200, bus::ECAN, 8),
    CanMsg::new(addr::ADRV_0X345, bus::ECAN, 8),
    CanMsg::new(addr::ADRV_0X1DA, bus::ECAN, 32),
];

/// Combined LFA steering.
pub static LFA_STEERING_TX_MSGS: &[CanMsg] = &[
    CanMsg::new(addr::LFA, bus::MAIN, 16),
    CanMsg::new(addr::SCC_CONTROL, bus::MAIN, 32),
    CanMsg::new(addr::CRUISE_BUTTONS, bus::CAM, 8),
    CanMsg::new(addr::LFAHDA_CLUSTER, bus::MAIN, 16),
];

/// Resolved, immutable module configuration.
///
/// Only constructible through the decoders below, so the variant always
/// agrees with the flags and the longitudinal override cannot be skipped.
/// It serializes for diagnostics but does not deserialize.
///
/// ```compile_fail
/// use hyundai_canfd_safety::HyundaiCanfdConfig;
///
/// // Radar SCC with LFA steering cannot be given longitudinal control.
/// let forced = HyundaiCanfdConfig {
///     longitudinal: true,
///     ..HyundaiCanfdConfig::default()
/// };
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HyundaiCanfdConfig {
    powertrain: PowertrainType,
    longitudinal: bool,
    camera_scc: bool,
    lka_steering: bool,
    lka_steering_alt: bool,
    alt_buttons: bool,
    angle_steering: bool,
    variant: Variant,
}

impl HyundaiCanfdConfig {
    /// Decodes a raw parameter, ignoring unknown bits.
    pub fn from_raw(param: u16) -> Self {
        let flags = HyundaiParamFlags::from_bits_truncate(param);
        let unknown = param & !HyundaiParamFlags::all().bits();
        if unknown != 0 {
            debug!(param, unknown, "ignoring unknown safety parameter bits");
        }
        Self::from_flags(flags)
    }

    /// Decodes a raw parameter, rejecting unknown bits.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownBits`] if any bit names no flag.
    pub fn try_from_raw(param: u16) -> ConfigResult<Self> {
        HyundaiParamFlags::from_bits(param)
            .map(Self::from_flags)
            .ok_or(ConfigError::UnknownBits(param & !HyundaiParamFlags::all().bits()))
    }

    /// Resolves flags into a configuration and selects the variant.
    ///
    /// Longitudinal control is forced off for radar-SCC cars with LFA
    /// steering; no variant supports that combination.
    pub fn from_flags(flags: HyundaiParamFlags) -> Self {
        let lka_steering = flags.contains(HyundaiParamFlags::CANFD_LKA_STEERING);
        let camera_scc = flags.contains(HyundaiParamFlags::CAMERA_SCC);
        let lka_steering_alt = flags.contains(HyundaiParamFlags::CANFD_LKA_STEERING_ALT);

        let mut longitudinal = flags.contains(HyundaiParamFlags::LONGITUDINAL);
        if longitudinal && !lka_steering && !camera_scc {
            warn!("longitudinal control unsupported on radar-SCC cars with LFA steering, forcing off");
            longitudinal = false;
        }

        let variant = match (longitudinal, lka_steering) {
            (true, true) => Variant::LongitudinalLka,
            (true, false) => Variant::LongitudinalLfa,
            (false, true) if lka_steering_alt => Variant::LkaAlt,
            (false, true) => Variant::Lka,
            (false, false) if camera_scc => Variant::CameraScc,
            (false, false) => Variant::RadarScc,
        };

        let config = Self {
            powertrain: PowertrainType::from_flags(flags),
            longitudinal,
            camera_scc,
            lka_steering,
            lka_steering_alt,
            alt_buttons: flags.contains(HyundaiParamFlags::CANFD_ALT_BUTTONS),
            angle_steering: flags.contains(HyundaiParamFlags::CANFD_ANGLE_STEERING),
            variant,
        };
        info!(
            ?variant,
            longitudinal,
            pt_bus = config.pt_bus(),
            scc_bus = config.scc_bus(),
            powertrain = ?config.powertrain,
            "hyundai canfd safety configured"
        );
        config
    }

    /// Builds a configuration from named parameters.
    pub fn from_params(params: &HyundaiCanfdParams) -> Self {
        Self::from_flags(params.flags())
    }

    /// Gas pedal source.
    pub fn powertrain(&self) -> PowertrainType {
        self.powertrain
    }

    /// openpilot owns longitudinal control, after the unsupported-combination override.
    pub fn longitudinal(&self) -> bool {
        self.longitudinal
    }

    /// SCC_CONTROL comes from the camera.
    pub fn camera_scc(&self) -> bool {
        self.camera_scc
    }

    /// Split LKAS steering.
    pub fn lka_steering(&self) -> bool {
        self.lka_steering
    }

    /// LKAS at its alternate address.
    pub fn lka_steering_alt(&self) -> bool {
        self.lka_steering_alt
    }

    /// Alternate cruise button layout.
    pub fn alt_buttons(&self) -> bool {
        self.alt_buttons
    }

    /// Angle instead of torque lateral commands.
    pub fn angle_steering(&self) -> bool {
        self.angle_steering
    }

    /// Selected variant.
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Bus carrying the powertrain reports.
    pub fn pt_bus(&self) -> u8 {
        if self.lka_steering { bus::ECAN } else { bus::MAIN }
    }

    /// Bus carrying SCC_CONTROL.
    pub fn scc_bus(&self) -> u8 {
        if self.camera_scc { bus::CAM } else { self.pt_bus() }
    }

    /// Split LKAS address.
    pub fn lka_addr(&self) -> u32 {
        if self.lka_steering_alt { addr::LKAS_ALT } else { addr::LKAS }
    }

    /// Camera LFA display address paired with [`lka_addr`](Self::lka_addr).
    pub fn lfa_display_addr(&self) -> u32 {
        if self.lka_steering_alt { addr::CAM_0X362 } else { addr::CAM_0X2A4 }
    }

    /// Cruise button address tracked on the powertrain bus.
    pub fn button_addr(&self) -> u32 {
        if self.alt_buttons { addr::CRUISE_BUTTONS_ALT } else { addr::CRUISE_BUTTONS }
    }

    /// Steering command address whose presence on bus 0 means the stock
    /// controller is still talking.
    pub fn stock_steer_addr(&self) -> u32 {
        if self.lka_steering { self.lka_addr() } else { addr::LFA }
    }

    /// Steering command address the tx hook limits.
    ///
    /// With longitudinal on LKA-steering cars the ADAS ECU is disabled and
    /// lateral is sent through LFA on bus 1 instead.
    pub fn tx_steer_addr(&self) -> u32 {
        if self.lka_steering && !self.longitudinal {
            self.lka_addr()
        } else {
            addr::LFA
        }
    }
}

impl Default for HyundaiCanfdConfig {
    fn default() -> Self {
        Self::from_flags(HyundaiParamFlags::empty())
    }
}

impl From<HyundaiParamFlags> for HyundaiCanfdConfig {
    fn from(flags: HyundaiParamFlags) -> Self {
        Self::from_flags(flags)
    }
}
