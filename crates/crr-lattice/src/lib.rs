//! # crr-lattice
//!
//! A discrete-time lattice engine pricing derivative contracts by backward
//! induction over a recombining Cox-Ross-Rubinstein binomial tree.
//!
//! # Overview
//!
//! * [`LatticeTree`] — owns the triangular node arena for one parameter set
//!   (spot, volatility, maturity, periods, rate, dividend yield), derives
//!   the CRR constants (up factor, risk-neutral probability, per-step
//!   discount), and drives the valuation sweeps
//! * [`LatticeNode`] — a single vertex holding a spot and a computed value,
//!   with index links to its two successors one period forward
//!
//! Valuation entry points on [`LatticeTree`]:
//!
//! * [`price`](LatticeTree::price) — vanilla / American / Bermudan /
//!   barrier options under a caller-supplied exercise schedule
//! * [`price_european`](LatticeTree::price_european) /
//!   [`price_american`](LatticeTree::price_american) — common schedules
//! * [`price_shout`](LatticeTree::price_shout) — shout options (nested
//!   sub-lattice repricing at every non-terminal node)
//! * [`price_compound`](LatticeTree::price_compound) — options on options
//!   (two-stage sweep with an inflection layer)
//!
//! A constructed tree can be repriced any number of times with different
//! payoff / exercise / barrier arguments; every sweep rewrites all node
//! values from scratch, amortizing lattice construction across options
//! that share the same underlying dynamics.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod node;
mod tree;

pub use node::LatticeNode;
pub use tree::LatticeTree;
