//! Inbound hook: decodes trusted vehicle state and flags stock-ECU traffic.

use canfd_safety_core::{CanFrame, VehicleState};

use crate::config::HyundaiCanfdConfig;
use crate::cruise::{cruise_buttons_check, cruise_state_check};
use crate::ids::{addr, bus};
use crate::signals;

/// Updates `vehicle` from one validated inbound frame.
///
/// Returns `true` when the frame is evidence that a stock controller which
/// should be silenced is still transmitting.
pub fn rx_hook(config: &HyundaiCanfdConfig, frame: &CanFrame, vehicle: &mut VehicleState) -> bool {
    let address = frame.addr();

    if frame.bus() == config.pt_bus() {
        match address {
            addr::MDPS => vehicle.torque_driver.update(signals::driver_torque(frame)),
            addr::STEERING_SENSORS => vehicle.angle_meas.update(signals::steering_angle(frame)),
            addr::TCS => vehicle.brake_pressed = signals::brake_pressed(frame),
            addr::WHEEL_SPEEDS => {
                vehicle.vehicle_moving = signals::vehicle_moving(frame);
                vehicle.update_vehicle_speed(signals::vehicle_speed_ms(frame));
            }
            a if a == config.button_addr() => {
                if let Some(state) = signals::cruise_buttons(frame) {
                    cruise_buttons_check(vehicle, state, config.longitudinal());
                }
            }
            _ => {}
        }

        if let Some(pressed) = signals::gas_pressed(frame, config.powertrain()) {
            vehicle.gas_pressed = pressed;
        }
    }

    if frame.bus() == config.scc_bus() && address == addr::SCC_CONTROL {
        cruise_state_check(vehicle, signals::cruise_engaged(frame), config.longitudinal());
    }

    stock_ecu_detected(config, frame)
}

/// Stock steering on bus 0, or (with longitudinal) stock SCC where the
/// factory controller would send it.
pub fn stock_ecu_detected(config: &HyundaiCanfdConfig, frame: &CanFrame) -> bool {
    let steer = frame.addr() == config.stock_steer_addr() && frame.bus() == bus::MAIN;
    let scc = config.longitudinal()
        && frame.addr() == addr::SCC_CONTROL
        && frame.bus() == if config.lka_steering() { bus::ECAN } else { bus::MAIN };
    steer || scc
}
