//! Shared harness for the hook integration tests.
//!
//! Frames sent through [`Harness::rx`] get a correct rolling counter and
//! checksum, so they pass the address checks and reach the rx hook.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::collections::HashMap;

use hyundai_canfd_safety::prelude::*;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Installs a test-writer subscriber once per binary.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_test_writer()
        .try_init()
        .ok(); // Ignore error if already initialized
}

pub struct Harness {
    pub engine: SafetyEngine<HyundaiCanfd>,
    counters: HashMap<(u32, u8), u8>,
    pub now: Micros,
}

impl Harness {
    pub fn new(flags: HyundaiParamFlags) -> Self {
        init_tracing();
        Self {
            engine: HyundaiCanfd::from(flags).into_engine(),
            counters: HashMap::new(),
            now: 0,
        }
    }

    pub fn config(&self) -> HyundaiCanfdConfig {
        *self.engine.hooks().config()
    }

    pub fn pt_bus(&self) -> u8 {
        self.config().pt_bus()
    }

    pub fn scc_bus(&self) -> u8 {
        self.config().scc_bus()
    }

    pub fn vehicle(&self) -> &VehicleState {
        &self.engine.state().vehicle
    }

    pub fn set_controls_allowed(&mut self, allowed: bool) {
        self.engine.state_mut().vehicle.controls_allowed = allowed;
    }

    /// Counter, then checksum for frames long enough to carry one.
    pub fn seal(&mut self, address: u32, bus: u8, buf: &mut [u8]) {
        let max = if buf.len() == 8 { 0xF } else { 0xFF };
        let counter = self.counters.entry((address, bus)).or_insert(0);
        *counter = if *counter >= max { 0 } else { *counter + 1 };
        encode::counter(buf, *counter);
        if buf.len() > 8 {
            encode::seal(self.engine.hooks().crc(), address, buf);
        }
    }

    /// Seals and feeds one inbound frame; returns the address-check verdict.
    pub fn rx(&mut self, address: u32, bus: u8, mut buf: Vec<u8>) -> Result<bool, FrameError> {
        self.seal(address, bus, &mut buf);
        let frame = CanFrame::new(address, bus, &buf)?;
        self.now += 10_000;
        Ok(self.engine.rx(&frame, self.now))
    }

    /// Feeds one inbound frame exactly as given.
    pub fn rx_raw(&mut self, address: u32, bus: u8, buf: &[u8]) -> Result<bool, FrameError> {
        let frame = CanFrame::new(address, bus, buf)?;
        self.now += 10_000;
        Ok(self.engine.rx(&frame, self.now))
    }

    pub fn tx(&mut self, address: u32, bus: u8, buf: &[u8]) -> Result<bool, FrameError> {
        let frame = CanFrame::new(address, bus, buf)?;
        Ok(self.engine.tx(&frame, self.now))
    }

    pub fn tx_at(&mut self, address: u32, bus: u8, buf: &[u8], now: Micros) -> Result<bool, FrameError> {
        let frame = CanFrame::new(address, bus, buf)?;
        Ok(self.engine.tx(&frame, now))
    }

    // Inbound frame builders.

    pub fn driver_torque(&mut self, torque: i32) -> Result<bool, FrameError> {
        let mut buf = vec![0u8; 24];
        encode::driver_torque(&mut buf, torque);
        let bus = self.pt_bus();
        self.rx(addr::MDPS, bus, buf)
    }

    pub fn steering_angle(&mut self, wire: i16) -> Result<bool, FrameError> {
        let mut buf = vec![0u8; 16];
        encode::steering_angle(&mut buf, wire);
        let bus = self.pt_bus();
        self.rx(addr::STEERING_SENSORS, bus, buf)
    }

    pub fn gas(&mut self, powertrain: PowertrainType, pressed: bool) -> Result<bool, FrameError> {
        let mut buf = vec![0u8; 32];
        let address = match powertrain {
            PowertrainType::Ev => {
                encode::gas_ev(&mut buf, pressed);
                addr::ACCELERATOR
            }
            PowertrainType::Hybrid => {
                encode::gas_hybrid(&mut buf, pressed);
                addr::ACCELERATOR_ALT
            }
            PowertrainType::Ice => {
                encode::gas_ice(&mut buf, pressed);
                addr::ACCELERATOR_BRAKE_ALT
            }
        };
        let bus = self.pt_bus();
        self.rx(address, bus, buf)
    }

    pub fn brake(&mut self, pressed: bool) -> Result<bool, FrameError> {
        let mut buf = vec![0u8; 24];
        encode::brake_pressed(&mut buf, pressed);
        let bus = self.pt_bus();
        self.rx(addr::TCS, bus, buf)
    }

    pub fn wheel_speeds(&mut self, fl: u16, rr: u16) -> Result<bool, FrameError> {
        let mut buf = vec![0u8; 24];
        encode::wheel_speeds(&mut buf, fl, rr);
        let bus = self.pt_bus();
        self.rx(addr::WHEEL_SPEEDS, bus, buf)
    }

    pub fn cruise_status(&mut self, status: u8) -> Result<bool, FrameError> {
        let mut buf = vec![0u8; 32];
        encode::cruise_status(&mut buf, status);
        let bus = self.scc_bus();
        self.rx(addr::SCC_CONTROL, bus, buf)
    }

    pub fn buttons(&mut self, code: u8, main: bool) -> Result<bool, FrameError> {
        let bus = self.pt_bus();
        if self.config().alt_buttons() {
            let mut buf = vec![0u8; 16];
            encode::cruise_buttons_alt(&mut buf, code, main);
            self.rx(addr::CRUISE_BUTTONS_ALT, bus, buf)
        } else {
            let mut buf = vec![0u8; 8];
            encode::cruise_buttons(&mut buf, code, main);
            self.rx(addr::CRUISE_BUTTONS, bus, buf)
        }
    }
}

// Outbound payload builders.

pub fn torque_cmd(len: usize, torque: i32, steer_req: bool) -> Vec<u8> {
    let mut buf = vec![0u8; len];
    encode::lkas_torque_cmd(&mut buf, torque, steer_req);
    buf
}

pub fn angle_cmd(len: usize, wire: i16, active: bool) -> Vec<u8> {
    let mut buf = vec![0u8; len];
    encode::lkas_angle_cmd(&mut buf, wire, active);
    buf
}

pub fn accel_cmd(accel_raw: i32, accel_val: i32) -> Vec<u8> {
    let mut buf = vec![0u8; 32];
    encode::accel_cmd(&mut buf, accel_raw, accel_val);
    buf
}

pub fn button_cmd(code: u8) -> Vec<u8> {
    let mut buf = vec![0u8; 8];
    encode::cruise_buttons(&mut buf, code, false);
    buf
}
