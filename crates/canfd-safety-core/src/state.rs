//! Vehicle-state trackers shared between rx hooks, tx hooks and the engine.
//!
//! Only rx hooks write these fields, and only from frames that passed the
//! address check. Tx hooks read them.

use tracing::warn;

use crate::sample::Sample;

/// Vehicle speed samples are stored as m/s multiplied by this factor.
pub const VEHICLE_SPEED_FACTOR: f32 = 1000.0;

/// Trusted vehicle state decoded from inbound frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VehicleState {
    /// Control authority granted by the driver.
    pub controls_allowed: bool,
    /// Latched when a stock controller is seen on a bus the harness should isolate.
    pub relay_malfunction: bool,

    /// Accelerator pedal pressed.
    pub gas_pressed: bool,
    /// `gas_pressed` as of the previous rx-check pass.
    pub gas_pressed_prev: bool,
    /// Brake pedal pressed.
    pub brake_pressed: bool,
    /// `brake_pressed` as of the previous rx-check pass.
    pub brake_pressed_prev: bool,
    /// Any wheel above the standstill threshold.
    pub vehicle_moving: bool,

    /// Stock cruise engaged on the previous cruise-state frame.
    pub cruise_engaged_prev: bool,
    /// Last cruise button code seen.
    pub cruise_button_prev: u8,
    /// Last main-switch state seen.
    pub main_button_prev: bool,

    /// Driver-applied steering torque (raw units).
    pub torque_driver: Sample,
    /// Measured steering angle (raw units).
    pub angle_meas: Sample,
    /// Vehicle speed, m/s × [`VEHICLE_SPEED_FACTOR`].
    pub vehicle_speed: Sample,
}

impl VehicleState {
    /// Records a new vehicle speed in m/s.
    pub fn update_vehicle_speed(&mut self, speed_ms: f32) {
        self.vehicle_speed
            .update((speed_ms * VEHICLE_SPEED_FACTOR).round() as i32);
    }

    /// Tracks stock cruise engagement: authority is granted on the rising
    /// edge and revoked whenever cruise is not engaged.
    pub fn pcm_cruise_check(&mut self, cruise_engaged: bool) {
        if !cruise_engaged {
            self.controls_allowed = false;
        }
        if cruise_engaged && !self.cruise_engaged_prev {
            self.controls_allowed = true;
        }
        self.cruise_engaged_prev = cruise_engaged;
    }

    /// Pedal-override and anti-spoof bookkeeping, run after every rx hook.
    pub fn generic_rx_checks(&mut self, stock_ecu_detected: bool) {
        if self.gas_pressed && !self.gas_pressed_prev {
            self.controls_allowed = false;
        }
        self.gas_pressed_prev = self.gas_pressed;

        if self.brake_pressed && (!self.brake_pressed_prev || self.vehicle_moving) {
            self.controls_allowed = false;
        }
        self.brake_pressed_prev = self.brake_pressed;

        if stock_ecu_detected {
            if !self.relay_malfunction {
                warn!("stock ECU detected on isolated bus, latching relay malfunction");
            }
            self.relay_malfunction = true;
            self.controls_allowed = false;
        }
    }

    /// Longitudinal commands require authority and no gas override.
    #[inline]
    pub fn longitudinal_allowed(&self) -> bool {
        self.controls_allowed && !self.gas_pressed_prev
    }
}
