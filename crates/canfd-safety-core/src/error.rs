//! Error types for frame construction.
//!
//! Hooks never fail: every decision reduces to allow/deny. The only fallible
//! surface is building a [`CanFrame`](crate::CanFrame) from untrusted input.

use thiserror::Error;

/// Errors returned when a frame cannot be represented on a CAN-FD bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FrameError {
    /// Payload length is not one of the lengths a CAN-FD DLC can encode.
    #[error("invalid CAN-FD payload length: {0}")]
    InvalidLength(usize),

    /// Address does not fit in a 29-bit extended identifier.
    #[error("address {0:#x} exceeds 29-bit identifier range")]
    InvalidAddress(u32),

    /// Bus index is beyond the harness's bus count.
    #[error("bus index {0} out of range (max {max})", max = crate::frame::MAX_BUS)]
    BusOutOfRange(u8),
}

/// Result alias for frame construction.
pub type FrameResult<T> = Result<T, FrameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            FrameError::InvalidLength(9).to_string(),
            "invalid CAN-FD payload length: 9"
        );
        assert!(
            FrameError::InvalidAddress(0x2000_0000)
                .to_string()
                .contains("0x20000000")
        );
        assert!(FrameError::BusOutOfRange(7).to_string().contains("max 3"));
    }
}
