//! Our error types for the SM72445.
//!
//! Errors only arise at construction time; once a [`Gains`](crate::conversion::Gains)
//! exists, every runtime operation either succeeds or reports a transport
//! failure as `None`.

use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

/// Construction-time precondition violations.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum Error {
    /// A signal-conditioning gain was zero, negative, or non-finite. A zero
    /// gain would divide by zero in the unit conversions.
    #[error("gain must be a positive finite ratio")]
    InvalidGain,
    /// The analogue supply voltage was zero, negative, or non-finite.
    #[error("reference voltage must be positive and finite")]
    InvalidReferenceVoltage,
}
