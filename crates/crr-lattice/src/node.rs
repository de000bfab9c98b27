//! Lattice vertices and the per-node valuation rules.

use crr_core::{errors::Result, DiscountFactor, Probability, Rate, Real, Size, Time, Volatility};
use crr_instruments::{Barrier, Payoff};

use crate::tree::LatticeTree;

/// Indices of a node's two successors in the owning tree's arena.
///
/// Successor links are arena indices rather than references, so link
/// validity is structural: the tree can be moved or cloned freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Children {
    pub up: Size,
    pub down: Size,
}

/// The remaining term a shout re-strikes over.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ResidualTerm {
    pub maturity: Time,
    pub elapsed: Time,
    pub vol: Volatility,
    pub periods_left: Size,
    pub rate: Rate,
    pub dividend: Rate,
}

/// A single lattice vertex: an underlying price and, once a sweep has
/// reached it, an option value.
///
/// A node's value is defined only after both of its successors (if any)
/// have values; sweep ordering in [`LatticeTree`] enforces this, not the
/// node itself.
#[derive(Debug, Clone)]
pub struct LatticeNode {
    spot: Real,
    value: Option<Real>,
    children: Option<Children>,
}

impl LatticeNode {
    pub(crate) fn new(spot: Real) -> Self {
        Self {
            spot,
            value: None,
            children: None,
        }
    }

    /// The underlying price at this vertex.
    pub fn spot(&self) -> Real {
        self.spot
    }

    /// The option value at this vertex, or `None` if no sweep has reached
    /// it yet.
    pub fn value(&self) -> Option<Real> {
        self.value
    }

    /// Arena indices of the up/down successors; `None` exactly at the
    /// maturity layer.
    pub fn successors(&self) -> Option<(Size, Size)> {
        self.children.map(|c| (c.up, c.down))
    }

    /// Whether this node sits on the maturity layer.
    pub fn is_terminal(&self) -> bool {
        self.children.is_none()
    }

    /// Overwrite the spot. Compound pricing re-bases inflection-layer nodes
    /// on the inner option's value.
    pub(crate) fn set_spot(&mut self, spot: Real) {
        self.spot = spot;
    }

    /// Store the successor indices; called once per non-terminal node
    /// during tree construction.
    pub(crate) fn link(&mut self, up: Size, down: Size) {
        self.children = Some(Children { up, down });
    }

    /// Apply the backward-induction valuation rule at this node.
    ///
    /// `successors` carries the already-computed up/down child values,
    /// fetched by the tree; `None` at the maturity layer. Precedence:
    ///
    /// 1. spot strictly outside the barrier band — knocked out, value 0;
    /// 2. terminal node — the payoff itself;
    /// 3. otherwise the discounted risk-neutral expectation of the
    ///    successors, floored at the payoff when `exercisable`.
    pub(crate) fn valuate(
        &mut self,
        successors: Option<(Real, Real)>,
        q: Probability,
        discount: DiscountFactor,
        payoff: &dyn Payoff,
        strike: Real,
        exercisable: bool,
        barrier: &Barrier,
    ) {
        if barrier.knocks_out(self.spot) {
            self.value = Some(0.0);
            return;
        }
        match successors {
            None => self.value = Some(payoff.value(self.spot, strike)),
            Some((up, down)) => {
                let continuation = discount * (q * up + (1.0 - q) * down);
                self.value = Some(if exercisable {
                    continuation.max(payoff.value(self.spot, strike))
                } else {
                    continuation
                });
            }
        }
    }

    /// Apply the shout valuation rule at this (non-terminal) node.
    ///
    /// Shouting locks in the intrinsic value and grants a fresh European
    /// option on the residual term, struck at this node's spot: a transient
    /// sub-lattice is built over `maturity − elapsed` with `periods_left`
    /// steps and priced with the same payoff function. The node's value is
    /// the better of shouting and ordinary continuation. Sub-lattices carry
    /// no exercise rights, no barriers, and no nested shouts.
    pub(crate) fn shout_valuate(
        &mut self,
        successors: (Real, Real),
        q: Probability,
        discount: DiscountFactor,
        payoff: &dyn Payoff,
        strike: Real,
        residual: &ResidualTerm,
    ) -> Result<()> {
        let mut restruck = LatticeTree::new(
            self.spot,
            residual.vol,
            residual.maturity - residual.elapsed,
            residual.periods_left,
            residual.rate,
            residual.dividend,
        )?;
        let resale = restruck.price_european(self.spot, payoff)?;

        let shout = payoff.value(self.spot, strike) + resale;
        let continuation = discount * (q * successors.0 + (1.0 - q) * successors.1);
        self.value = Some(shout.max(continuation));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use crr_instruments::{OptionType, VanillaPayoff};

    fn call() -> VanillaPayoff {
        VanillaPayoff::new(OptionType::Call)
    }

    #[test]
    fn fresh_node_has_no_value() {
        let n = LatticeNode::new(100.0);
        assert_eq!(n.value(), None);
        assert!(n.is_terminal());
    }

    #[test]
    fn terminal_valuation_is_the_payoff() {
        let mut n = LatticeNode::new(110.0);
        n.valuate(None, 0.5, 0.99, &call(), 100.0, false, &Barrier::none());
        assert_abs_diff_eq!(n.value().unwrap(), 10.0, epsilon = 1e-15);
    }

    #[test]
    fn knockout_overrides_terminal_payoff() {
        let mut n = LatticeNode::new(130.0);
        n.valuate(None, 0.5, 0.99, &call(), 100.0, true, &Barrier::up_out(120.0));
        assert_eq!(n.value(), Some(0.0));
    }

    #[test]
    fn continuation_is_the_discounted_expectation() {
        let mut n = LatticeNode::new(100.0);
        n.link(1, 2);
        n.valuate(
            Some((10.0, 2.0)),
            0.6,
            0.95,
            &call(),
            100.0,
            false,
            &Barrier::none(),
        );
        assert_abs_diff_eq!(n.value().unwrap(), 0.95 * (0.6 * 10.0 + 0.4 * 2.0), epsilon = 1e-15);
    }

    #[test]
    fn exercise_floors_continuation_at_the_payoff() {
        let mut n = LatticeNode::new(115.0);
        n.link(1, 2);
        n.valuate(
            Some((10.0, 2.0)),
            0.6,
            0.95,
            &call(),
            100.0,
            true,
            &Barrier::none(),
        );
        // Intrinsic 15 beats the continuation value 6.46.
        assert_abs_diff_eq!(n.value().unwrap(), 15.0, epsilon = 1e-15);
    }

    #[test]
    fn shout_value_on_a_one_period_residual() {
        // Residual term of one period: the freshly-struck at-the-money call
        // on the sub-lattice is worth d·q·S·(u−1) by hand.
        let spot = 100.0;
        let (vol, rate) = (0.2, 0.05);
        let residual = ResidualTerm {
            maturity: 1.0,
            elapsed: 0.5,
            vol,
            periods_left: 1,
            rate,
            dividend: 0.0,
        };
        let dt: Time = 0.5;
        let u = (vol * dt.sqrt()).exp();
        let d = 1.0 / u;
        let q = ((rate * dt).exp() - d) / (u - d);
        let disc = (-rate * dt).exp();
        let resale = disc * q * spot * (u - 1.0);

        let mut n = LatticeNode::new(spot);
        n.link(1, 2);
        // Successor values low enough that shouting wins.
        n.shout_valuate((1.0, 0.0), q, disc, &call(), 90.0, &residual)
            .unwrap();
        let intrinsic = 10.0;
        assert_abs_diff_eq!(n.value().unwrap(), intrinsic + resale, epsilon = 1e-12);
    }

    #[test]
    fn shout_keeps_continuation_when_better() {
        let residual = ResidualTerm {
            maturity: 1.0,
            elapsed: 0.5,
            vol: 0.2,
            periods_left: 1,
            rate: 0.05,
            dividend: 0.0,
        };
        let mut n = LatticeNode::new(100.0);
        n.link(1, 2);
        // Deep out of the money: intrinsic 0, resale small, continuation huge.
        n.shout_valuate((80.0, 60.0), 0.5, 0.99, &call(), 200.0, &residual)
            .unwrap();
        assert_abs_diff_eq!(n.value().unwrap(), 0.99 * 70.0, epsilon = 1e-12);
    }
}
