//! # crr-instruments
//!
//! The contracts the lattice engine needs from its callers: payoff
//! functions, exercise schedules, and barrier bands.
//!
//! The engine itself lives in `crr-lattice`; everything here is the thin,
//! replaceable layer it is polymorphic over.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod barrier;
pub mod exercise;
pub mod payoff;

pub use barrier::Barrier;
pub use exercise::{ExerciseSchedule, ExerciseType};
pub use payoff::{
    AssetOrNothingPayoff, BinaryPayoff, OptionType, Payoff, VanillaPayoff,
};
