//! Frame identifiers, bus indices and fixed signal constants.
//!
//! Names follow the message names used on the Hyundai CAN-FD platform
//! (ACCELERATOR, WHEEL_SPEEDS, SCC_CONTROL, ...). Bus indices are those of the
//! harness: 0 is the vehicle side, 2 the camera side, 1 the ADAS/ECAN bus on
//! LKA-steering cars.

/// Frame identifiers.
pub mod addr {
    /// ACCELERATOR (EV pedal report).
    pub const ACCELERATOR: u32 = 0x35;
    /// ACCELERATOR_BRAKE_ALT (ICE pedal report).
    pub const ACCELERATOR_BRAKE_ALT: u32 = 0x100;
    /// ACCELERATOR_ALT (hybrid pedal report).
    pub const ACCELERATOR_ALT: u32 = 0x105;
    /// TCS (brake pressed).
    pub const TCS: u32 = 0x175;
    /// WHEEL_SPEEDS.
    pub const WHEEL_SPEEDS: u32 = 0xa0;
    /// MDPS (driver torque).
    pub const MDPS: u32 = 0xea;
    /// STEERING_SENSORS (measured angle).
    pub const STEERING_SENSORS: u32 = 0x125;
    /// CRUISE_BUTTONS (default layout).
    pub const CRUISE_BUTTONS: u32 = 0x1cf;
    /// CRUISE_BUTTONS_ALT.
    pub const CRUISE_BUTTONS_ALT: u32 = 0x1aa;
    /// SCC_CONTROL (cruise state inbound, acceleration command outbound).
    pub const SCC_CONTROL: u32 = 0x1a0;

    /// LKAS (split lateral command).
    pub const LKAS: u32 = 0x50;
    /// LKAS_ALT.
    pub const LKAS_ALT: u32 = 0x110;
    /// LFA (combined lateral command).
    pub const LFA: u32 = 0x12a;
    /// LFAHDA_CLUSTER (HUD icons).
    pub const LFAHDA_CLUSTER: u32 = 0x1e0;
    /// CAM_0x2A4, camera LFA display paired with LKAS.
    pub const CAM_0X2A4: u32 = 0x2a4;
    /// CAM_0x362, camera LFA display paired with LKAS_ALT.
    pub const CAM_0X362: u32 = 0x362;
    /// Diagnostic request address of the ADAS ECU.
    pub const ADAS_DIAG: u32 = 0x730;

    /// ADRV_0x51.
    pub const ADRV_0X51: u32 = 0x51;
    /// ADRV_0x160.
    pub const ADRV_0X160: u32 = 0x160;
    /// ADRV_0x1ea.
    pub const ADRV_0X1EA: u32 = 0x1ea;
    /// ADRV_0x200.
    pub const ADRV_0X200: u32 = 0x200;
    /// ADRV_0x345.
    pub const ADRV_0X345: u32 = 0x345;
    /// ADRV_0x1da.
    pub const ADRV_0X1DA: u32 = 0x1da;
}

/// Harness bus indices.
pub mod bus {
    /// Vehicle-side powertrain bus.
    pub const MAIN: u8 = 0;
    /// ECAN bus on LKA-steering cars.
    pub const ECAN: u8 = 1;
    /// Camera-side bus.
    pub const CAM: u8 = 2;
}

/// Cruise button codes.
pub mod button {
    /// No button pressed.
    pub const NONE: u8 = 0;
    /// RES+.
    pub const RESUME: u8 = 1;
    /// SET-.
    pub const SET: u8 = 2;
    /// CANCEL.
    pub const CANCEL: u8 = 4;
}

/// Wheel speed (raw, 0.03125 km/h per unit) above which the vehicle is moving.
pub const STANDSTILL_THRESHOLD: u32 = 12;

/// Wheel speed scale in km/h per raw unit.
pub const WHEEL_SPEED_KPH_PER_UNIT: f32 = 0.031_25;

/// Tester-present payload allowed on [`addr::ADAS_DIAG`], as two little-endian words.
pub const TESTER_PRESENT: (u32, u32) = (0x0080_3E02, 0);

/// Raw bias of the accelerator command fields on SCC_CONTROL.
pub const ACCEL_BIAS: i32 = 1023;

/// Raw bias of the torque command field on LKAS/LFA.
pub const TORQUE_CMD_BIAS: i32 = 1024;

/// Raw bias of the driver torque field on MDPS.
pub const TORQUE_DRIVER_BIAS: i32 = 4095;

/// Value of the 2-bit LKA_ACTIVE field that requests angle control.
pub const ANGLE_REQ_ACTIVE: u8 = 2;
