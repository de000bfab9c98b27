//! Error types for crrlattice-rs.
//!
//! Every failure the lattice engine can report is a deterministic input
//! error: it is detected synchronously at the offending call, before any
//! partial work. There is no recovery path inside the engine; the caller
//! must supply corrected parameters.

use thiserror::Error;

/// The top-level error type used throughout crrlattice-rs.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// A construction or valuation argument outside the model's valid
    /// domain: non-positive period count, maturity, or spot, a negative
    /// volatility, or a derived risk-neutral probability outside `[0, 1]`
    /// (an arbitrage-inconsistent combination of rate, dividend,
    /// volatility, and step size).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// An exercise schedule shorter than the non-terminal layers a
    /// valuation sweep must visit.
    #[error("dimension mismatch: exercise schedule covers {actual} layers, {expected} required")]
    DimensionMismatch {
        /// Layers the sweep must visit (the tree's period count).
        expected: usize,
        /// Layers the supplied schedule covers.
        actual: usize,
    },

    /// The node arena for the requested period count cannot be allocated.
    ///
    /// The node count grows quadratically in the period count; this is
    /// reported explicitly rather than truncating the lattice.
    #[error("resource exhaustion: {0}")]
    ResourceExhaustion(String),
}

/// Shorthand `Result` type used throughout crrlattice-rs.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Validates a parameter precondition.
///
/// Returns `Err(Error::InvalidParameter(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use crr_core::{ensure, errors::Error};
/// fn positive(x: f64) -> crr_core::errors::Result<f64> {
///     ensure!(x > 0.0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1.0).is_ok());
/// assert!(positive(-1.0).is_err());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::InvalidParameter(
                format!($($msg)*)
            ));
        }
    };
}

/// Reports an invalid parameter unconditionally.
///
/// Returns `Err(Error::InvalidParameter(...))` immediately.
///
/// # Example
/// ```
/// use crr_core::{fail, errors::Error};
/// fn always_err() -> crr_core::errors::Result<()> {
///     fail!("unsupported configuration");
/// }
/// assert!(always_err().is_err());
/// ```
#[macro_export]
macro_rules! fail {
    ($($msg:tt)*) => {
        return Err($crate::errors::Error::InvalidParameter(format!($($msg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_parameter_display() {
        let e = Error::InvalidParameter("period count must be positive, got 0".into());
        assert_eq!(
            e.to_string(),
            "invalid parameter: period count must be positive, got 0"
        );
    }

    #[test]
    fn dimension_mismatch_display() {
        let e = Error::DimensionMismatch {
            expected: 12,
            actual: 10,
        };
        assert_eq!(
            e.to_string(),
            "dimension mismatch: exercise schedule covers 10 layers, 12 required"
        );
    }

    #[test]
    fn ensure_macro_passes_and_fails() {
        fn check(x: f64) -> Result<f64> {
            ensure!(x >= 0.0, "x must be non-negative, got {x}");
            Ok(x.sqrt())
        }
        assert!(check(4.0).is_ok());
        assert!(matches!(check(-1.0), Err(Error::InvalidParameter(_))));
    }
}
