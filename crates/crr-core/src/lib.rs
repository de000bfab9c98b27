//! # crr-core
//!
//! Core types and error definitions for crrlattice-rs.
//!
//! This crate provides the building blocks shared across the workspace –
//! primitive type aliases and the error taxonomy of the lattice engine.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Public modules ───────────────────────────────────────────────────────────

/// Error types and the `ensure!` / `fail!` macros.
pub mod errors;

// ── Primitive type aliases ────────────────────────────────────────────────────

/// Floating-point type used throughout the library.
pub type Real = f64;

/// Alias used for array sizes / indices.
pub type Size = usize;

/// A continuously-compounded rate expressed as a decimal (e.g. 0.05 = 5 %).
pub type Rate = Real;

/// An annualized volatility level expressed as a decimal.
pub type Volatility = Real;

/// A per-step discount factor in [0, 1].
pub type DiscountFactor = Real;

/// A transition probability in [0, 1].
pub type Probability = Real;

/// A time measurement in years.
pub type Time = Real;

// ── Re-exports for convenience ────────────────────────────────────────────────

pub use errors::{Error, Result};
