//! Bit-exact signal decoders for the Hyundai CAN-FD frames the hooks inspect.
//!
//! Each decoder documents its byte/bit span. Bit positions are absolute and
//! LSB-first within each byte, as returned by [`CanFrame::bit`]. The
//! [`encode`] module mirrors every decoder for building test and fuzz frames.

use canfd_safety_core::{CRC16_CCITT_POLY, CanFrame, Crc16Lut, to_signed};

use crate::config::PowertrainType;
use crate::ids::{
    ACCEL_BIAS, ANGLE_REQ_ACTIVE, STANDSTILL_THRESHOLD, TESTER_PRESENT, TORQUE_CMD_BIAS,
    TORQUE_DRIVER_BIAS, addr,
};
use crate::tx::HYUNDAI_CANFD_STEERING_LIMITS;

/// Raw angle units per degree on the LKAS angle command and the angle sensor,
/// taken from the steering limit profile.
#[allow(clippy::cast_possible_truncation, reason = "profile factor is a whole number")]
pub const ANGLE_SCALE: i32 = HYUNDAI_CANFD_STEERING_LIMITS.angle_deg_to_can as i32;

/// Rolling counter: byte 1 high nibble on 8-byte frames, byte 2 otherwise.
pub fn counter(frame: &CanFrame) -> u8 {
    if frame.len() == 8 {
        frame.byte(1) >> 4
    } else {
        frame.byte(2)
    }
}

/// Transmitted checksum: bytes 0..2, little-endian.
pub fn checksum(frame: &CanFrame) -> u32 {
    frame.bytes_le(0, 2)
}

/// CRC-16/CCITT table used by every checksummed frame, built at compile time.
pub static CANFD_CRC: Crc16Lut = Crc16Lut::new(CRC16_CCITT_POLY);

/// CRC-16 over `payload[2..]`, then the address low and high bytes, with a
/// length-dependent final XOR (0x819D for 24 bytes, 0x9F5B for 32 bytes).
pub fn canfd_checksum(lut: &Crc16Lut, address: u32, payload: &[u8]) -> u16 {
    let crc = lut.checksum(0, payload.get(2..).unwrap_or(&[]));
    let crc = lut.update(crc, (address & 0xFF) as u8);
    let crc = lut.update(crc, ((address >> 8) & 0xFF) as u8);
    match payload.len() {
        24 => crc ^ 0x819D,
        32 => crc ^ 0x9F5B,
        _ => crc,
    }
}

/// MDPS driver torque: 13 bits at bytes 10..12, bias 4095.
pub fn driver_torque(frame: &CanFrame) -> i32 {
    let raw = (i32::from(frame.byte(11) & 0x1F) << 8) | i32::from(frame.byte(10));
    raw - TORQUE_DRIVER_BIAS
}

/// STEERING_SENSORS angle: signed 16 bits, big-endian at bytes 3..5, ×−10.
pub fn steering_angle(frame: &CanFrame) -> i32 {
    let raw = (u32::from(frame.byte(3)) << 8) | u32::from(frame.byte(4));
    to_signed(raw, 16) * -ANGLE_SCALE
}

/// Cruise button code and main-switch state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonState {
    /// 3-bit button code.
    pub button: u8,
    /// Main (cruise on/off) switch.
    pub main: bool,
}

/// CRUISE_BUTTONS (byte 2 bits 0..3, main at bit 19) or CRUISE_BUTTONS_ALT
/// (byte 4 bits 4..7, main at bit 34). `None` for any other address.
pub fn cruise_buttons(frame: &CanFrame) -> Option<ButtonState> {
    match frame.addr() {
        addr::CRUISE_BUTTONS => Some(ButtonState {
            button: frame.byte(2) & 0x7,
            main: frame.bit(19),
        }),
        addr::CRUISE_BUTTONS_ALT => Some(ButtonState {
            button: (frame.byte(4) >> 4) & 0x7,
            main: frame.bit(34),
        }),
        _ => None,
    }
}

/// Accelerator pressed, decoded from the one report `powertrain` uses.
///
/// Returns `None` when `frame` is not that report, so reports for the other
/// powertrains are ignored even when they appear on the bus.
pub fn gas_pressed(frame: &CanFrame, powertrain: PowertrainType) -> Option<bool> {
    match (powertrain, frame.addr()) {
        (PowertrainType::Ev, addr::ACCELERATOR) => Some(frame.byte(5) != 0),
        (PowertrainType::Hybrid, addr::ACCELERATOR_ALT) => {
            Some(frame.bit(103) || frame.byte(13) != 0 || frame.bit(112))
        }
        (PowertrainType::Ice, addr::ACCELERATOR_BRAKE_ALT) => Some(frame.bit(176)),
        _ => None,
    }
}

/// TCS brake pressed: bit 81.
pub fn brake_pressed(frame: &CanFrame) -> bool {
    frame.bit(81)
}

/// Front-left and rear-right wheel speeds (raw), bytes 8..10 and 14..16.
pub fn wheel_speeds(frame: &CanFrame) -> (u32, u32) {
    (frame.bytes_le(8, 2), frame.bytes_le(14, 2))
}

/// Either wheel above the standstill threshold.
pub fn vehicle_moving(frame: &CanFrame) -> bool {
    let (fl, rr) = wheel_speeds(frame);
    fl > STANDSTILL_THRESHOLD || rr > STANDSTILL_THRESHOLD
}

/// Mean wheel speed in m/s.
pub fn vehicle_speed_ms(frame: &CanFrame) -> f32 {
    let (fl, rr) = wheel_speeds(frame);
    ((fl + rr) as f32 / 2.0) * crate::ids::WHEEL_SPEED_KPH_PER_UNIT / 3.6
}

/// SCC_CONTROL cruise status: byte 8 bits 4..7.
pub fn cruise_status(frame: &CanFrame) -> u8 {
    (frame.byte(8) >> 4) & 0x7
}

/// Status 1 (engaged) or 2 (engaged, driver override).
pub fn cruise_engaged(frame: &CanFrame) -> bool {
    matches!(cruise_status(frame), 1 | 2)
}

/// LKAS angle command: `(desired_angle, active)`.
///
/// LKA_ACTIVE is byte 9 bits 5..7 (active when 2); the angle is a signed
/// 14-bit field over byte 10 bits 0..6 and byte 11, scaled ×−10.
pub fn lkas_angle_cmd(frame: &CanFrame) -> (i32, bool) {
    let active = ((frame.byte(9) >> 5) & 0x3) == ANGLE_REQ_ACTIVE;
    let raw = (u32::from(frame.byte(10) & 0x3F) << 8) | u32::from(frame.byte(11));
    (to_signed(raw, 14) * -ANGLE_SCALE, active)
}

/// LKAS/LFA torque command: `(desired_torque, steer_req)`.
///
/// Torque is 11 bits over byte 5 bits 1..8 and byte 6 bits 0..4, bias 1024;
/// the request bit is bit 52.
pub fn lkas_torque_cmd(frame: &CanFrame) -> (i32, bool) {
    let raw = (i32::from(frame.byte(6) & 0xF) << 7) | i32::from(frame.byte(5) >> 1);
    (raw - TORQUE_CMD_BIAS, frame.bit(52))
}

/// SCC_CONTROL acceleration fields: `(accel_raw, accel_val)`, both bias 1023.
///
/// `aReqRaw` is 11 bits over byte 16 and byte 17 bits 0..3; `aReqValue` is
/// byte 17 bits 4..8 followed by byte 18.
pub fn accel_cmd(frame: &CanFrame) -> (i32, i32) {
    let raw = (i32::from(frame.byte(17) & 0x7) << 8) | i32::from(frame.byte(16));
    let val = (i32::from(frame.byte(18)) << 4) | i32::from(frame.byte(17) >> 4);
    (raw - ACCEL_BIAS, val - ACCEL_BIAS)
}

/// Exactly `02 3E 80 00 00 00 00 00`.
pub fn is_tester_present(frame: &CanFrame) -> bool {
    (frame.bytes_le(0, 4), frame.bytes_le(4, 4)) == TESTER_PRESENT
}

/// Payload writers mirroring the decoders above.
///
/// Writers take the payload buffer and touch only their own bits. Values are
/// masked to field width, so out-of-range inputs wrap as they would on the wire.
pub mod encode {
    use canfd_safety_core::Crc16Lut;

    use super::{ACCEL_BIAS, ANGLE_REQ_ACTIVE, TORQUE_CMD_BIAS, TORQUE_DRIVER_BIAS};

    fn put(buf: &mut [u8], index: usize, mask: u8, value: u8) {
        if let Some(b) = buf.get_mut(index) {
            *b = (*b & !mask) | (value & mask);
        }
    }

    fn put_bit(buf: &mut [u8], bit: usize, set: bool) {
        let mask = 1u8 << (bit % 8);
        put(buf, bit / 8, mask, if set { mask } else { 0 });
    }

    /// Writes the rolling counter.
    pub fn counter(buf: &mut [u8], counter: u8) {
        if buf.len() == 8 {
            put(buf, 1, 0xF0, counter << 4);
        } else {
            put(buf, 2, 0xFF, counter);
        }
    }

    /// Computes the CAN-FD checksum for `address` and writes it to bytes 0..2.
    pub fn seal(lut: &Crc16Lut, address: u32, buf: &mut [u8]) {
        let [lo, hi] = super::canfd_checksum(lut, address, buf).to_le_bytes();
        put(buf, 0, 0xFF, lo);
        put(buf, 1, 0xFF, hi);
    }

    /// MDPS driver torque.
    pub fn driver_torque(buf: &mut [u8], torque: i32) {
        let raw = torque.wrapping_add(TORQUE_DRIVER_BIAS);
        put(buf, 10, 0xFF, (raw & 0xFF) as u8);
        put(buf, 11, 0x1F, ((raw >> 8) & 0x1F) as u8);
    }

    /// STEERING_SENSORS angle, as the wire value in tenths of a degree.
    pub fn steering_angle(buf: &mut [u8], wire: i16) {
        let [hi, lo] = wire.to_be_bytes();
        put(buf, 3, 0xFF, hi);
        put(buf, 4, 0xFF, lo);
    }

    /// CRUISE_BUTTONS payload.
    pub fn cruise_buttons(buf: &mut [u8], button: u8, main: bool) {
        put(buf, 2, 0x7, button);
        put_bit(buf, 19, main);
    }

    /// CRUISE_BUTTONS_ALT payload.
    pub fn cruise_buttons_alt(buf: &mut [u8], button: u8, main: bool) {
        put(buf, 4, 0x70, button << 4);
        put_bit(buf, 34, main);
    }

    /// ACCELERATOR (EV) pedal.
    pub fn gas_ev(buf: &mut [u8], pressed: bool) {
        put(buf, 5, 0xFF, u8::from(pressed));
    }

    /// ACCELERATOR_ALT (hybrid) pedal, via bit 103.
    pub fn gas_hybrid(buf: &mut [u8], pressed: bool) {
        put_bit(buf, 103, pressed);
    }

    /// ACCELERATOR_BRAKE_ALT (ICE) pedal.
    pub fn gas_ice(buf: &mut [u8], pressed: bool) {
        put_bit(buf, 176, pressed);
    }

    /// TCS brake pedal.
    pub fn brake_pressed(buf: &mut [u8], pressed: bool) {
        put_bit(buf, 81, pressed);
    }

    /// WHEEL_SPEEDS front-left and rear-right (raw).
    pub fn wheel_speeds(buf: &mut [u8], fl: u16, rr: u16) {
        let [fl0, fl1] = fl.to_le_bytes();
        let [rr0, rr1] = rr.to_le_bytes();
        put(buf, 8, 0xFF, fl0);
        put(buf, 9, 0xFF, fl1);
        put(buf, 14, 0xFF, rr0);
        put(buf, 15, 0xFF, rr1);
    }

    /// SCC_CONTROL cruise status.
    pub fn cruise_status(buf: &mut [u8], status: u8) {
        put(buf, 8, 0x70, status << 4);
    }

    /// LKAS angle command, as the wire value in tenths of a degree (14 bits).
    pub fn lkas_angle_cmd(buf: &mut [u8], wire: i16, active: bool) {
        let raw = (wire as u16) & 0x3FFF;
        let state = if active { ANGLE_REQ_ACTIVE } else { 1 };
        put(buf, 9, 0x60, state << 5);
        put(buf, 10, 0x3F, (raw >> 8) as u8);
        put(buf, 11, 0xFF, (raw & 0xFF) as u8);
    }

    /// LKAS/LFA torque command.
    pub fn lkas_torque_cmd(buf: &mut [u8], torque: i32, steer_req: bool) {
        let raw = torque.wrapping_add(TORQUE_CMD_BIAS) & 0x7FF;
        put(buf, 5, 0xFE, ((raw & 0x7F) << 1) as u8);
        put(buf, 6, 0x0F, ((raw >> 7) & 0xF) as u8);
        put_bit(buf, 52, steer_req);
    }

    /// SCC_CONTROL acceleration fields (both 11 bits).
    pub fn accel_cmd(buf: &mut [u8], accel_raw: i32, accel_val: i32) {
        let raw = accel_raw.wrapping_add(ACCEL_BIAS) & 0x7FF;
        let val = accel_val.wrapping_add(ACCEL_BIAS) & 0x7FF;
        put(buf, 16, 0xFF, (raw & 0xFF) as u8);
        put(buf, 17, 0x07, ((raw >> 8) & 0x7) as u8);
        put(buf, 17, 0xF0, ((val & 0xF) << 4) as u8);
        put(buf, 18, 0xFF, ((val >> 4) & 0x7F) as u8);
    }

    /// Tester-present payload for the ADAS diagnostic address.
    pub fn tester_present(buf: &mut [u8]) {
        for (i, b) in [0x02, 0x3E, 0x80, 0, 0, 0, 0, 0].into_iter().enumerate() {
            put(buf, i, 0xFF, b);
        }
    }
}
