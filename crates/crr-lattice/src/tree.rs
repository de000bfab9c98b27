//! The recombining binomial tree and its valuation sweeps.

use crr_core::{
    ensure,
    errors::{Error, Result},
    DiscountFactor, Probability, Rate, Real, Size, Time, Volatility,
};
use crr_instruments::{Barrier, ExerciseSchedule, Payoff};

use crate::node::{LatticeNode, ResidualTerm};

/// A recombining Cox-Ross-Rubinstein binomial tree.
///
/// The tree has `periods + 1` layers, layer `l` holding `l + 1` nodes, for
/// `(periods+1)(periods+2)/2` nodes in total, stored layer-major in a
/// single arena. Node `(l, d)` (`d` down-moves after `l` steps) carries
/// `spot_at(l, d) = S0 · u^(l − 2d)`, and links to the nodes `l + 1` and
/// `l + 2` positions ahead in the arena (the up and down continuations
/// starting the next layer).
///
/// Model constants derived at construction:
///
/// * time step `Δt = maturity / periods`
/// * up factor `u = exp(vol · √Δt)`, down factor `1/u`
/// * risk-neutral probability `q = (exp((r − div)·Δt) − 1/u) / (u − 1/u)`
/// * per-step discount `exp(−r·Δt)`
///
/// `q ∉ [0, 1]` means the inputs admit arbitrage and is rejected, as are
/// non-positive periods, maturity, or spot, all before any node is built.
///
/// The arena and the derived constants are fixed for the tree's lifetime;
/// valuation sweeps only rewrite node values, so one tree can reprice any
/// number of options on the same underlying dynamics.
#[derive(Debug, Clone)]
pub struct LatticeTree {
    nodes: Vec<LatticeNode>,
    periods: Size,
    dt: Time,
    up: Real,
    q: Probability,
    discount: DiscountFactor,
    maturity: Time,
    vol: Volatility,
    rate: Rate,
    dividend: Rate,
}

impl LatticeTree {
    /// Build the lattice for one set of underlying dynamics.
    ///
    /// `dividend` is a continuous dividend yield; pass 0 for a
    /// non-dividend-paying underlying.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidParameter`] — `periods == 0`, `maturity <= 0`,
    ///   `spot <= 0`, `vol < 0`, or a derived `q` outside `[0, 1]`.
    /// * [`Error::ResourceExhaustion`] — the quadratic node count
    ///   overflows, or the arena cannot be reserved.
    pub fn new(
        spot: Real,
        vol: Volatility,
        maturity: Time,
        periods: Size,
        rate: Rate,
        dividend: Rate,
    ) -> Result<Self> {
        ensure!(periods >= 1, "period count must be positive");
        ensure!(maturity > 0.0, "maturity must be positive, got {maturity}");
        ensure!(spot > 0.0, "spot must be positive, got {spot}");
        ensure!(vol >= 0.0, "volatility must be non-negative, got {vol}");

        let dt = maturity / periods as Real;
        let up = (vol * dt.sqrt()).exp();
        let down = 1.0 / up;
        // With vol = 0 the lattice is a constant-spot chain and every q
        // prices identically; pin it rather than evaluate 0/0.
        let q = if vol == 0.0 {
            0.5
        } else {
            (((rate - dividend) * dt).exp() - down) / (up - down)
        };
        ensure!(
            (0.0..=1.0).contains(&q),
            "risk-neutral probability {q:.6} outside [0, 1]: rate {rate}, dividend {dividend}, \
             volatility {vol} and step {dt} admit arbitrage"
        );
        let discount = (-rate * dt).exp();

        let node_count = triangular_node_count(periods).ok_or_else(|| {
            Error::ResourceExhaustion(format!(
                "node count for {periods} periods overflows the address space"
            ))
        })?;

        let mut nodes: Vec<LatticeNode> = Vec::new();
        nodes.try_reserve_exact(node_count).map_err(|e| {
            Error::ResourceExhaustion(format!(
                "cannot reserve {node_count} lattice nodes: {e}"
            ))
        })?;

        for layer in 0..=periods {
            for depth in 0..=layer {
                let index = nodes.len();
                let mut node =
                    LatticeNode::new(spot * up.powi(layer as i32 - 2 * depth as i32));
                if layer < periods {
                    node.link(index + layer + 1, index + layer + 2);
                }
                nodes.push(node);
            }
        }

        Ok(Self {
            nodes,
            periods,
            dt,
            up,
            q,
            discount,
            maturity,
            vol,
            rate,
            dividend,
        })
    }

    // ── Accessors ────────────────────────────────────────────────────────

    /// Number of time steps.
    pub fn periods(&self) -> Size {
        self.periods
    }

    /// Total number of nodes, `(periods+1)(periods+2)/2`.
    pub fn node_count(&self) -> Size {
        self.nodes.len()
    }

    /// Time increment per step.
    pub fn dt(&self) -> Time {
        self.dt
    }

    /// Up factor `u`; the down factor is `1/u`.
    pub fn up_factor(&self) -> Real {
        self.up
    }

    /// Probability of an up-move under the pricing measure.
    pub fn risk_neutral_probability(&self) -> Probability {
        self.q
    }

    /// Per-step present-value multiplier `exp(−r·Δt)`.
    pub fn discount_factor(&self) -> DiscountFactor {
        self.discount
    }

    /// The node at `(layer, depth)`, or `None` if out of range.
    pub fn node(&self, layer: Size, depth: Size) -> Option<&LatticeNode> {
        (layer <= self.periods && depth <= layer)
            .then(|| &self.nodes[Self::index(layer, depth)])
    }

    /// The underlying price at `(layer, depth)`, or `None` if out of range.
    pub fn spot_at(&self, layer: Size, depth: Size) -> Option<Real> {
        self.node(layer, depth).map(LatticeNode::spot)
    }

    // ── Valuation entry points ───────────────────────────────────────────

    /// Price a single option by backward induction.
    ///
    /// `schedule` states, per non-terminal layer, whether early exercise is
    /// permitted there (all-false: European; all-true: American; selective:
    /// Bermudan); the maturity layer always takes the terminal payoff.
    /// A spot strictly outside `barrier` zeroes its node unconditionally.
    ///
    /// Returns the root node's value.
    ///
    /// # Errors
    ///
    /// [`Error::DimensionMismatch`] — `schedule` covers fewer layers than
    /// the tree has periods. Extra layers are ignored.
    pub fn price(
        &mut self,
        strike: Real,
        payoff: &dyn Payoff,
        schedule: &ExerciseSchedule,
        barrier: Barrier,
    ) -> Result<Real> {
        if schedule.len() < self.periods {
            return Err(Error::DimensionMismatch {
                expected: self.periods,
                actual: schedule.len(),
            });
        }

        for layer in (0..=self.periods).rev() {
            for depth in 0..=layer {
                let index = Self::index(layer, depth);
                let successors = self.successor_values(index);
                let exercisable = layer < self.periods && schedule.exercisable(layer);
                self.nodes[index].valuate(
                    successors,
                    self.q,
                    self.discount,
                    payoff,
                    strike,
                    exercisable,
                    &barrier,
                );
            }
        }
        Ok(self.root_value())
    }

    /// Price a European option: no early exercise, no barriers.
    pub fn price_european(&mut self, strike: Real, payoff: &dyn Payoff) -> Result<Real> {
        let schedule = ExerciseSchedule::european(self.periods);
        self.price(strike, payoff, &schedule, Barrier::none())
    }

    /// Price an American option: early exercise at every layer, no barriers.
    pub fn price_american(&mut self, strike: Real, payoff: &dyn Payoff) -> Result<Real> {
        let schedule = ExerciseSchedule::american(self.periods);
        self.price(strike, payoff, &schedule, Barrier::none())
    }

    /// Price a shout option.
    ///
    /// The holder may shout at any non-terminal node, locking in the
    /// intrinsic value and receiving a fresh European option on the
    /// residual term struck at the prevailing spot. Shout availability is
    /// continuous (not gated by an exercise schedule), and shout options
    /// carry no barriers; use [`price`](Self::price) for those.
    ///
    /// Every non-terminal node reprices a transient sub-lattice, so the
    /// total work is cubic in the period count; budget accordingly for
    /// large trees.
    pub fn price_shout(&mut self, strike: Real, payoff: &dyn Payoff) -> Result<Real> {
        for layer in (0..=self.periods).rev() {
            for depth in 0..=layer {
                let index = Self::index(layer, depth);
                if layer == self.periods {
                    self.nodes[index].valuate(
                        None,
                        self.q,
                        self.discount,
                        payoff,
                        strike,
                        false,
                        &Barrier::none(),
                    );
                } else {
                    let successors = self
                        .successor_values(index)
                        .expect("non-terminal node has successors");
                    let residual = ResidualTerm {
                        maturity: self.maturity,
                        elapsed: layer as Real * self.dt,
                        vol: self.vol,
                        periods_left: self.periods - layer,
                        rate: self.rate,
                        dividend: self.dividend,
                    };
                    self.nodes[index].shout_valuate(
                        successors,
                        self.q,
                        self.discount,
                        payoff,
                        strike,
                        &residual,
                    )?;
                }
            }
        }
        Ok(self.root_value())
    }

    /// Price a European compound option: a mother option on a daughter
    /// option.
    ///
    /// The daughter, struck at `strike_daughter` under `payoff_daughter`,
    /// matures at the tree's own maturity; the mother, struck at
    /// `strike_mother` under `payoff_mother`, matures at `maturity_mother`.
    /// The sweep values the daughter back to the inflection layer
    /// `⌊periods · maturity_mother / maturity⌋`, re-bases each node there
    /// on the daughter's value with a pure payoff evaluation (discount
    /// factor zero: the daughter's risk-neutral value becomes a
    /// deterministic new underlying with no further discounting at that
    /// instant), then values the mother back to the root.
    ///
    /// Returns the root node's value. The inflection layer's spots are
    /// restored afterwards, so the tree can keep repricing.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] — `maturity_mother` outside
    /// `(0, maturity]`.
    pub fn price_compound(
        &mut self,
        strike_mother: Real,
        strike_daughter: Real,
        maturity_mother: Time,
        payoff_mother: &dyn Payoff,
        payoff_daughter: &dyn Payoff,
    ) -> Result<Real> {
        ensure!(
            maturity_mother > 0.0 && maturity_mother <= self.maturity,
            "mother maturity {maturity_mother} outside (0, {}]",
            self.maturity
        );
        let inflection = (self.periods as Real * maturity_mother / self.maturity) as Size;
        let none = Barrier::none();
        let mut saved_spots: Vec<Real> = Vec::with_capacity(inflection + 1);

        for layer in (0..=self.periods).rev() {
            for depth in 0..=layer {
                let index = Self::index(layer, depth);
                let successors = self.successor_values(index);
                if layer >= inflection {
                    self.nodes[index].valuate(
                        successors,
                        self.q,
                        self.discount,
                        payoff_daughter,
                        strike_daughter,
                        false,
                        &none,
                    );
                    if layer == inflection {
                        // The daughter's value becomes the mother's
                        // underlying; zero discount reduces the revaluation
                        // to the payoff itself.
                        let daughter = self.nodes[index]
                            .value()
                            .expect("daughter value written this iteration");
                        saved_spots.push(self.nodes[index].spot());
                        self.nodes[index].set_spot(daughter);
                        self.nodes[index].valuate(
                            successors,
                            self.q,
                            0.0,
                            payoff_mother,
                            strike_mother,
                            true,
                            &none,
                        );
                    }
                } else {
                    self.nodes[index].valuate(
                        successors,
                        self.q,
                        self.discount,
                        payoff_mother,
                        strike_mother,
                        false,
                        &none,
                    );
                }
            }
        }

        for (depth, spot) in saved_spots.into_iter().enumerate() {
            self.nodes[Self::index(inflection, depth)].set_spot(spot);
        }
        Ok(self.root_value())
    }

    // ── Internals ────────────────────────────────────────────────────────

    /// Arena index of node `(layer, depth)`.
    fn index(layer: Size, depth: Size) -> Size {
        layer * (layer + 1) / 2 + depth
    }

    /// The already-computed values of a node's successors; `None` at the
    /// maturity layer.
    fn successor_values(&self, index: Size) -> Option<(Real, Real)> {
        self.nodes[index].successors().map(|(up, down)| {
            let up = self.nodes[up]
                .value()
                .expect("up successor valued before its parent");
            let down = self.nodes[down]
                .value()
                .expect("down successor valued before its parent");
            (up, down)
        })
    }

    fn root_value(&self) -> Real {
        self.nodes[0].value().expect("sweep ends at the root")
    }
}

// ─── Helper functions ─────────────────────────────────────────────────────────

/// `(periods+1)(periods+2)/2` without intermediate overflow, or `None` when
/// the count exceeds the address space.
fn triangular_node_count(periods: Size) -> Option<Size> {
    let a = periods.checked_add(1)?;
    let b = periods.checked_add(2)?;
    if a % 2 == 0 {
        (a / 2).checked_mul(b)
    } else {
        a.checked_mul(b / 2)
    }
}
