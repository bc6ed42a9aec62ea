//! Configuration errors.

use thiserror::Error;

/// Errors from strict decoding of the safety parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Bits that name no known flag were set.
    #[error("unknown safety parameter bits: {0:#06x}")]
    UnknownBits(u16),
}

/// Result alias for configuration decoding.
pub type ConfigResult<T> = Result<T, ConfigError>;
