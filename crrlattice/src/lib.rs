//! # crrlattice
//!
//! A Cox-Ross-Rubinstein binomial lattice engine for derivative pricing.
//!
//! This crate is a **façade** that re-exports the public items of the
//! underlying workspace crates. Application code should depend on this
//! crate rather than the individual `crr-*` crates.
//!
//! ## Quick start
//!
//! ```toml
//! [dependencies]
//! crrlattice = "0.1"
//! ```
//!
//! ```rust
//! use crrlattice::instruments::{OptionType, VanillaPayoff};
//! use crrlattice::lattice::LatticeTree;
//!
//! // S0 = 100, vol = 20 %, one year to maturity, 100 steps, r = 5 %.
//! let mut tree = LatticeTree::new(100.0, 0.2, 1.0, 100, 0.05, 0.0)?;
//! let put = tree.price_american(100.0, &VanillaPayoff::new(OptionType::Put))?;
//! assert!(put > 0.0);
//! # Ok::<(), crrlattice::core::Error>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Core types, aliases, and error definitions.
pub use crr_core as core;

/// Payoff, exercise-schedule, and barrier contracts.
pub use crr_instruments as instruments;

/// The binomial lattice engine.
pub use crr_lattice as lattice;
