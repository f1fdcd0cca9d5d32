use num::Float;
use serde::{Deserialize, Serialize};

use crate::error::{FuzzyError, Result};
use crate::math::simpson;
use crate::membership::MembershipFunction;

/// Number of subintervals used when integrating for the centroid.
pub const CENTROID_SUBINTERVALS: usize = 50;

/// And operator method for combining the propositions of a fuzzy rule premise.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AndOp {
    #[default]
    Min,
    Prod,
}

impl AndOp {
    pub fn call<F: Float>(self, u: F, v: F) -> F {
        match self {
            Self::Min => CompositionOp::Min.call(u, v),
            Self::Prod => CompositionOp::Prod.call(u, v),
        }
    }
}

/// Or operator method for combining the propositions of a fuzzy rule premise.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrOp {
    #[default]
    Max,
    /// Probabilistic or: `u + v - u * v`
    ProbOr,
}

impl OrOp {
    pub fn call<F: Float>(self, u: F, v: F) -> F {
        match self {
            Self::Max => CompositionOp::Max.call(u, v),
            Self::ProbOr => u + v - u * v,
        }
    }
}

/// How a set of membership functions is folded into a single one.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositionOp {
    Min,
    Max,
    Prod,
    Sum,
}

impl CompositionOp {
    /// Folds two values. `Min` and `Max` return NaN when either side is NaN.
    pub fn call<F: Float>(self, u: F, v: F) -> F {
        match self {
            Self::Min | Self::Max if u.is_nan() || v.is_nan() => F::nan(),
            Self::Min => F::min(u, v),
            Self::Max => F::max(u, v),
            Self::Prod => u * v,
            Self::Sum => u + v,
        }
    }
}

/// Implication operator method for deriving a rule's output membership from
/// its truth value.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImplicationOp {
    /// Truncate the conclusion at the truth value
    #[default]
    Min,
    /// Scale the conclusion by the truth value
    Prod,
}

impl ImplicationOp {
    pub fn composition(self) -> CompositionOp {
        match self {
            Self::Min => CompositionOp::Min,
            Self::Prod => CompositionOp::Prod,
        }
    }
}

/// Method for aggregating the consequences of the fuzzy rules
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationOp {
    #[default]
    Max,
    Sum,
}

impl AggregationOp {
    pub fn composition(self) -> CompositionOp {
        match self {
            Self::Max => CompositionOp::Max,
            Self::Sum => CompositionOp::Sum,
        }
    }
}

/// Method for defuzzificating the resulting membership function.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefuzzificationOp {
    /// Center of Gravity
    #[default]
    Cog,
    /// Bisector of Area
    Boa,
    /// Mean of the values for which the membership function is maximum
    Mom,
}

impl DefuzzificationOp {
    /// Reduces `membership` over `[min, max]` to a crisp value.
    ///
    /// The centroid is not guarded against a membership function with zero
    /// area; in that case the result is NaN.
    pub fn call(self, membership: &dyn MembershipFunction, min: f64, max: f64) -> Result<f64> {
        match self {
            Self::Cog => {
                let num = simpson(|x| x * membership.value(x), min, max, CENTROID_SUBINTERVALS);
                let den = simpson(|x| membership.value(x), min, max, CENTROID_SUBINTERVALS);

                Ok(num / den)
            },
            Self::Boa | Self::Mom => Err(FuzzyError::UnsupportedDefuzzification(self)),
        }
    }
}

#[test]
fn test_combinators() {
    assert_eq!(AndOp::Min.call(0.3, 0.6), 0.3);
    assert_eq!(AndOp::Prod.call(0.5, 0.5), 0.25);
    assert_eq!(OrOp::Max.call(0.3, 0.6), 0.6);
    assert_eq!(OrOp::ProbOr.call(0.5, 0.5), 0.75);
    assert_eq!(CompositionOp::Sum.call(0.5, 0.75), 1.25);
    assert_eq!(ImplicationOp::Prod.composition(), CompositionOp::Prod);
    assert_eq!(AggregationOp::Sum.composition(), CompositionOp::Sum);
}

#[test]
fn test_nan_propagates() {
    assert!(CompositionOp::Min.call(f64::NAN, 0.5).is_nan());
    assert!(CompositionOp::Max.call(0.5, f64::NAN).is_nan());
    assert!(AndOp::Min.call(f64::NAN, 0.).is_nan());
    assert!(OrOp::Max.call(1., f64::NAN).is_nan());
}

#[test]
fn test_unsupported_defuzzification() {
    use crate::membership::Triangular;

    let tri = Triangular::new(0., 5., 10.).unwrap();

    assert_eq!(
        DefuzzificationOp::Boa.call(&tri, 0., 10.),
        Err(FuzzyError::UnsupportedDefuzzification(DefuzzificationOp::Boa))
    );
    assert_eq!(
        DefuzzificationOp::Mom.call(&tri, 0., 10.),
        Err(FuzzyError::UnsupportedDefuzzification(DefuzzificationOp::Mom))
    );
}

#[test]
fn test_centroid_of_zero_area_is_not_finite() {
    use crate::membership::Constant;

    let zero = Constant::new(0.).unwrap();
    let centroid = DefuzzificationOp::Cog.call(&zero, 0., 10.).unwrap();

    assert!(centroid.is_nan());
}
