//! Immutable, bounds-safe view of one CAN-FD frame.
//!
//! Reads past the payload return zero, matching the zero-padded 64-byte
//! buffer the harness hands to the hooks.

use crate::error::{FrameError, FrameResult};

/// Largest CAN-FD payload.
pub const CANFD_MAX_LEN: usize = 64;

/// Highest bus index on the harness (0..=3).
pub const MAX_BUS: u8 = 3;

/// Highest 29-bit extended identifier.
pub const MAX_ADDR: u32 = 0x1FFF_FFFF;

/// Payload length for each DLC code.
pub const DLC_TO_LEN: [u8; 16] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 12, 16, 20, 24, 32, 48, 64];

/// Returns `true` when `len` is encodable as a CAN-FD DLC.
pub fn is_valid_canfd_len(len: usize) -> bool {
    DLC_TO_LEN.iter().any(|&l| usize::from(l) == len)
}

/// One frame as seen by the safety hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanFrame {
    addr: u32,
    bus: u8,
    len: u8,
    data: [u8; CANFD_MAX_LEN],
}

impl CanFrame {
    /// Builds a frame from an address, bus index and payload.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError`] if the payload length is not a CAN-FD length,
    /// the address exceeds 29 bits, or the bus index is above [`MAX_BUS`].
    pub fn new(addr: u32, bus: u8, payload: &[u8]) -> FrameResult<Self> {
        if !is_valid_canfd_len(payload.len()) {
            return Err(FrameError::InvalidLength(payload.len()));
        }
        if addr > MAX_ADDR {
            return Err(FrameError::InvalidAddress(addr));
        }
        if bus > MAX_BUS {
            return Err(FrameError::BusOutOfRange(bus));
        }

        let mut data = [0u8; CANFD_MAX_LEN];
        for (dst, src) in data.iter_mut().zip(payload) {
            *dst = *src;
        }

        Ok(Self {
            addr,
            bus,
            len: payload.len() as u8,
            data,
        })
    }

    /// Frame identifier.
    #[inline]
    pub fn addr(&self) -> u32 {
        self.addr
    }

    /// Source (rx) or destination (tx) bus index.
    #[inline]
    pub fn bus(&self) -> u8 {
        self.bus
    }

    /// Payload length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        usize::from(self.len)
    }

    /// Returns `true` for zero-length frames.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Payload bytes (exactly [`len`](Self::len) long).
    pub fn payload(&self) -> &[u8] {
        self.data.get(..self.len()).unwrap_or(&[])
    }

    /// Byte at `index`, or zero beyond the buffer.
    #[inline]
    pub fn byte(&self, index: usize) -> u8 {
        self.data.get(index).copied().unwrap_or(0)
    }

    /// Bit at absolute position `bit`, LSB-first within each byte.
    #[inline]
    pub fn bit(&self, bit: usize) -> bool {
        ((self.byte(bit / 8) >> (bit % 8)) & 1) != 0
    }

    /// Up to four bytes starting at `start`, packed little-endian.
    pub fn bytes_le(&self, start: usize, count: usize) -> u32 {
        (0..count.min(4)).fold(0u32, |acc, i| {
            acc | (u32::from(self.byte(start + i)) << (8 * i))
        })
    }
}
