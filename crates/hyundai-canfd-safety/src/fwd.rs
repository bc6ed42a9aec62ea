//! Gateway forwarding between the vehicle bus (0) and the camera bus (2).

use crate::config::HyundaiCanfdConfig;
use crate::ids::{addr, bus};

/// Destination for a frame received on `src_bus`, or `None` to drop it.
///
/// Camera traffic that openpilot replaces is withheld from the vehicle bus.
pub fn fwd_hook(config: &HyundaiCanfdConfig, src_bus: u8, address: u32) -> Option<u8> {
    match src_bus {
        bus::MAIN => Some(bus::CAM),
        bus::CAM if !blocked_from_camera(config, address) => Some(bus::MAIN),
        _ => None,
    }
}

fn blocked_from_camera(config: &HyundaiCanfdConfig, address: u32) -> bool {
    if config.lka_steering() {
        address == config.lka_addr() || address == config.lfa_display_addr()
    } else {
        address == addr::LFA
            || address == addr::LFAHDA_CLUSTER
            || (config.longitudinal() && address == addr::SCC_CONTROL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HyundaiParamFlags;

    #[test]
    fn test_vehicle_bus_always_forwards() {
        let config = HyundaiCanfdConfig::default();
        for a in [addr::LFA, addr::SCC_CONTROL, 0x7ff] {
            assert_eq!(fwd_hook(&config, 0, a), Some(2));
        }
        assert_eq!(fwd_hook(&config, 1, addr::LFA), None);
        assert_eq!(fwd_hook(&config, 3, addr::LFA), None);
    }

    #[test]
    fn test_lka_alt_blocks_paired_display() {
        let config = HyundaiCanfdConfig::from_flags(
            HyundaiParamFlags::CANFD_LKA_STEERING | HyundaiParamFlags::CANFD_LKA_STEERING_ALT,
        );
        assert_eq!(fwd_hook(&config, 2, addr::LKAS_ALT), None);
        assert_eq!(fwd_hook(&config, 2, addr::CAM_0X362), None);
        assert_eq!(fwd_hook(&config, 2, addr::LKAS), Some(0));
        assert_eq!(fwd_hook(&config, 2, addr::CAM_0X2A4), Some(0));
        assert_eq!(fwd_hook(&config, 2, addr::LFA), Some(0));
    }

    #[test]
    fn test_scc_blocked_only_with_longitudinal() {
        let stock = HyundaiCanfdConfig::from_flags(HyundaiParamFlags::CAMERA_SCC);
        assert_eq!(fwd_hook(&stock, 2, addr::SCC_CONTROL), Some(0));
        let long = HyundaiCanfdConfig::from_flags(
            HyundaiParamFlags::CAMERA_SCC | HyundaiParamFlags::LONGITUDINAL,
        );
        assert_eq!(fwd_hook(&long, 2, addr::SCC_CONTROL), None);
        assert_eq!(fwd_hook(&long, 2, addr::LFAHDA_CLUSTER), None);
    }
}
