//! Exercise schedules.
//!
//! A schedule holds one flag per non-terminal tree layer stating whether
//! early exercise is permitted there. The maturity layer always takes the
//! terminal payoff and is not part of the schedule.

use crr_core::{ensure, errors::Result, Size};
use std::fmt;

/// Type of exercise right, classified from a schedule's flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExerciseType {
    /// No early exercise; exercisable only at expiry.
    European,
    /// Exercisable at every layer up to expiry.
    American,
    /// Exercisable at a proper subset of layers.
    Bermudan,
}

/// Early-exercise permissions, one flag per non-terminal layer.
///
/// The length must cover the period count of the tree it is used with;
/// a shorter schedule is rejected at the pricing call with
/// [`Error::DimensionMismatch`](crr_core::Error::DimensionMismatch).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseSchedule {
    flags: Vec<bool>,
}

impl ExerciseSchedule {
    /// A European schedule: no early exercise at any of `periods` layers.
    pub fn european(periods: Size) -> Self {
        Self {
            flags: vec![false; periods],
        }
    }

    /// An American schedule: early exercise at every one of `periods` layers.
    pub fn american(periods: Size) -> Self {
        Self {
            flags: vec![true; periods],
        }
    }

    /// A Bermudan schedule: early exercise only at the given layers.
    ///
    /// Layers outside `0..periods` are rejected.
    pub fn bermudan(periods: Size, layers: &[Size]) -> Result<Self> {
        let mut flags = vec![false; periods];
        for &layer in layers {
            ensure!(
                layer < periods,
                "exercise layer {layer} outside the schedule's {periods} layers"
            );
            flags[layer] = true;
        }
        Ok(Self { flags })
    }

    /// A schedule from raw per-layer flags.
    pub fn from_flags(flags: Vec<bool>) -> Self {
        Self { flags }
    }

    /// Number of layers covered.
    pub fn len(&self) -> Size {
        self.flags.len()
    }

    /// Whether the schedule covers no layers.
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Whether early exercise is permitted at `layer`.
    ///
    /// # Panics
    /// Panics if `layer` is out of range; pricing calls validate the length
    /// before sweeping.
    pub fn exercisable(&self, layer: Size) -> bool {
        self.flags[layer]
    }

    /// The raw per-layer flags.
    pub fn as_slice(&self) -> &[bool] {
        &self.flags
    }

    /// Classify the schedule by its flags.
    pub fn exercise_type(&self) -> ExerciseType {
        if self.flags.iter().all(|&f| !f) {
            ExerciseType::European
        } else if self.flags.iter().all(|&f| f) {
            ExerciseType::American
        } else {
            ExerciseType::Bermudan
        }
    }
}

impl fmt::Display for ExerciseSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.exercise_type() {
            ExerciseType::European => write!(f, "European({} layers)", self.len()),
            ExerciseType::American => write!(f, "American({} layers)", self.len()),
            ExerciseType::Bermudan => {
                let count = self.flags.iter().filter(|&&x| x).count();
                write!(f, "Bermudan({count} of {} layers)", self.len())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn european_schedule() {
        let s = ExerciseSchedule::european(12);
        assert_eq!(s.len(), 12);
        assert_eq!(s.exercise_type(), ExerciseType::European);
        assert!(!s.exercisable(0));
        assert!(!s.exercisable(11));
    }

    #[test]
    fn american_schedule() {
        let s = ExerciseSchedule::american(12);
        assert_eq!(s.exercise_type(), ExerciseType::American);
        assert!(s.exercisable(0));
        assert!(s.exercisable(11));
    }

    #[test]
    fn bermudan_schedule() {
        let s = ExerciseSchedule::bermudan(12, &[3, 6, 9]).unwrap();
        assert_eq!(s.exercise_type(), ExerciseType::Bermudan);
        assert!(s.exercisable(3));
        assert!(!s.exercisable(4));
    }

    #[test]
    fn bermudan_rejects_out_of_range_layer() {
        assert!(ExerciseSchedule::bermudan(12, &[12]).is_err());
    }

    #[test]
    fn classification_of_edge_schedules() {
        // All layers marked: American, not Bermudan.
        let s = ExerciseSchedule::bermudan(4, &[0, 1, 2, 3]).unwrap();
        assert_eq!(s.exercise_type(), ExerciseType::American);
        // Empty schedule (single-period tree priced as European).
        assert_eq!(
            ExerciseSchedule::european(0).exercise_type(),
            ExerciseType::European
        );
    }

    #[test]
    fn display() {
        let s = ExerciseSchedule::bermudan(12, &[3, 6]).unwrap();
        assert_eq!(s.to_string(), "Bermudan(2 of 12 layers)");
    }
}
