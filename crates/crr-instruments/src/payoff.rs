//! Option payoff functions.
//!
//! A payoff maps an underlying price and a strike to the amount the option
//! holder receives at exercise. The engine invokes payoffs only at terminal
//! valuation and at shout/compound evaluation points; it never inspects
//! their internals.
//!
//! Unlike a striked payoff object, the strike is an argument of
//! [`Payoff::value`] rather than payoff state: the engine supplies it per
//! valuation call, and the compound pricer reuses a single payoff under
//! two strikes.

use crr_core::Real;
use std::fmt;

/// Option type (call or put).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionType {
    /// A call option (right to buy).
    Call,
    /// A put option (right to sell).
    Put,
}

impl OptionType {
    /// +1 for Call, −1 for Put.
    pub fn sign(self) -> Real {
        match self {
            OptionType::Call => 1.0,
            OptionType::Put => -1.0,
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::Call => write!(f, "Call"),
            OptionType::Put => write!(f, "Put"),
        }
    }
}

/// A pure payoff function `(spot, strike) → amount`.
///
/// Implementations must be deterministic; the engine may evaluate a payoff
/// any number of times during a sweep.
pub trait Payoff: fmt::Debug + Send + Sync {
    /// Compute the payoff for an underlying at `spot` against `strike`.
    fn value(&self, spot: Real, strike: Real) -> Real;

    /// Human-readable name.
    fn name(&self) -> &str;

    /// Human-readable description.
    fn description(&self) -> String {
        self.name().to_string()
    }
}

/// Plain vanilla payoff: `max(φ(S − K), 0)` where `φ = +1` for Call, `−1`
/// for Put.
#[derive(Debug, Clone, Copy)]
pub struct VanillaPayoff {
    /// Option type.
    pub option_type: OptionType,
}

impl VanillaPayoff {
    /// Create a new vanilla payoff.
    pub fn new(option_type: OptionType) -> Self {
        Self { option_type }
    }
}

impl Payoff for VanillaPayoff {
    fn value(&self, spot: Real, strike: Real) -> Real {
        (self.option_type.sign() * (spot - strike)).max(0.0)
    }

    fn name(&self) -> &str {
        "Vanilla"
    }

    fn description(&self) -> String {
        format!("{} {}", self.name(), self.option_type)
    }
}

/// Binary (cash-or-nothing) payoff: pays 1 if strictly in the money.
///
/// `payoff = 1` if `φ(S − K) > 0`, else 0. At `S = K` the option pays
/// nothing for either type.
#[derive(Debug, Clone, Copy)]
pub struct BinaryPayoff {
    /// Option type.
    pub option_type: OptionType,
}

impl BinaryPayoff {
    /// Create a new binary payoff.
    pub fn new(option_type: OptionType) -> Self {
        Self { option_type }
    }
}

impl Payoff for BinaryPayoff {
    fn value(&self, spot: Real, strike: Real) -> Real {
        if self.option_type.sign() * (spot - strike) > 0.0 {
            1.0
        } else {
            0.0
        }
    }

    fn name(&self) -> &str {
        "Binary"
    }
}

/// Asset-or-nothing payoff: pays the underlying price if strictly in the
/// money.
///
/// `payoff = S` if `φ(S − K) > 0`, else 0. A call with strike 0 degenerates
/// to an identity pass-through of any positive underlying value.
#[derive(Debug, Clone, Copy)]
pub struct AssetOrNothingPayoff {
    /// Option type.
    pub option_type: OptionType,
}

impl AssetOrNothingPayoff {
    /// Create a new asset-or-nothing payoff.
    pub fn new(option_type: OptionType) -> Self {
        Self { option_type }
    }
}

impl Payoff for AssetOrNothingPayoff {
    fn value(&self, spot: Real, strike: Real) -> Real {
        if self.option_type.sign() * (spot - strike) > 0.0 {
            spot
        } else {
            0.0
        }
    }

    fn name(&self) -> &str {
        "AssetOrNothing"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn vanilla_call() {
        let p = VanillaPayoff::new(OptionType::Call);
        assert!((p.value(110.0, 100.0) - 10.0).abs() < 1e-15);
        assert!((p.value(90.0, 100.0) - 0.0).abs() < 1e-15);
        assert!((p.value(100.0, 100.0) - 0.0).abs() < 1e-15);
    }

    #[test]
    fn vanilla_put() {
        let p = VanillaPayoff::new(OptionType::Put);
        assert!((p.value(90.0, 100.0) - 10.0).abs() < 1e-15);
        assert!((p.value(110.0, 100.0) - 0.0).abs() < 1e-15);
    }

    #[test]
    fn binary_is_strict_at_the_strike() {
        let call = BinaryPayoff::new(OptionType::Call);
        let put = BinaryPayoff::new(OptionType::Put);
        assert_eq!(call.value(100.0, 100.0), 0.0);
        assert_eq!(put.value(100.0, 100.0), 0.0);
        assert_eq!(call.value(100.1, 100.0), 1.0);
        assert_eq!(put.value(99.9, 100.0), 1.0);
    }

    #[test]
    fn asset_or_nothing_put() {
        let p = AssetOrNothingPayoff::new(OptionType::Put);
        assert!((p.value(90.0, 100.0) - 90.0).abs() < 1e-15);
        assert!((p.value(110.0, 100.0) - 0.0).abs() < 1e-15);
    }

    #[test]
    fn asset_or_nothing_call_with_zero_strike_is_identity() {
        let p = AssetOrNothingPayoff::new(OptionType::Call);
        assert!((p.value(42.5, 0.0) - 42.5).abs() < 1e-15);
        assert_eq!(p.value(0.0, 0.0), 0.0);
    }

    #[test]
    fn descriptions() {
        let p = VanillaPayoff::new(OptionType::Put);
        assert_eq!(p.description(), "Vanilla Put");
        assert_eq!(BinaryPayoff::new(OptionType::Call).description(), "Binary");
    }

    proptest! {
        /// A vanilla payoff is non-negative and dominated by the larger of
        /// spot and strike.
        #[test]
        fn vanilla_payoff_bounds(spot in 0.0..1e6f64, strike in 0.0..1e6f64) {
            for ot in [OptionType::Call, OptionType::Put] {
                let v = VanillaPayoff::new(ot).value(spot, strike);
                prop_assert!(v >= 0.0);
                prop_assert!(v <= spot.max(strike));
            }
        }

        /// Exactly one of a binary call/put pair pays off away from the
        /// strike.
        #[test]
        fn binary_pair_partitions(spot in 0.0..1e6f64, strike in 0.0..1e6f64) {
            prop_assume!((spot - strike).abs() > 1e-9);
            let call = BinaryPayoff::new(OptionType::Call).value(spot, strike);
            let put = BinaryPayoff::new(OptionType::Put).value(spot, strike);
            prop_assert_eq!(call + put, 1.0);
        }
    }
}
