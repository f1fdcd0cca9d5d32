//! Membership functions mapping a crisp value to a degree of membership.
//!
//! Values are expected to lie in `[0, 1]` but are not clamped: a [`Composite`]
//! summing several functions may exceed one.

use std::fmt::Debug;
use std::sync::Arc;

use crate::error::{FuzzyError, Result};
use crate::math::interp;
use crate::ops::CompositionOp;

pub trait MembershipFunction: Debug + Send + Sync {
    /// Degree of membership of `x`
    fn value(&self, x: f64) -> f64;
}

impl<M: MembershipFunction + ?Sized> MembershipFunction for Arc<M> {
    fn value(&self, x: f64) -> f64 {
        (**self).value(x)
    }
}

impl<M: MembershipFunction + ?Sized> MembershipFunction for Box<M> {
    fn value(&self, x: f64) -> f64 {
        (**self).value(x)
    }
}

fn check_ascending(points: &[f64]) -> Result<()> {
    if points.windows(2).all(|w| w[0] <= w[1]) {
        Ok(())
    } else {
        Err(FuzzyError::InvalidControlPoints(format!("{points:?} are not in ascending order")))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangular {
    x1: f64,
    x2: f64,
    x3: f64,
}

impl Triangular {
    /// Requires `x1 <= x2 <= x3`
    pub fn new(x1: f64, x2: f64, x3: f64) -> Result<Self> {
        check_ascending(&[x1, x2, x3])?;

        Ok(Self { x1, x2, x3 })
    }

    pub fn points(&self) -> (f64, f64, f64) {
        (self.x1, self.x2, self.x3)
    }

    /// Approximates this triangle with a gaussian centered on the peak whose
    /// 2.5 sigma spans half of the base.
    pub fn to_normal(&self) -> Normal {
        Normal::new(self.x2, (self.x3 - self.x1) / 5.)
    }
}

impl MembershipFunction for Triangular {
    fn value(&self, x: f64) -> f64 {
        let Self { x1, x2, x3 } = *self;

        if x == x2 && (x == x1 || x == x3) {
            1.
        } else if x <= x1 || x >= x3 {
            0.
        } else if x == x2 {
            1.
        } else if x < x2 {
            (x - x1) / (x2 - x1)
        } else {
            (x3 - x) / (x3 - x2)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Trapezoid {
    x1: f64,
    x2: f64,
    x3: f64,
    x4: f64,
}

impl Trapezoid {
    /// Requires `x1 <= x2 <= x3 <= x4`
    pub fn new(x1: f64, x2: f64, x3: f64, x4: f64) -> Result<Self> {
        check_ascending(&[x1, x2, x3, x4])?;

        Ok(Self { x1, x2, x3, x4 })
    }

    pub fn points(&self) -> (f64, f64, f64, f64) {
        (self.x1, self.x2, self.x3, self.x4)
    }
}

impl MembershipFunction for Trapezoid {
    fn value(&self, x: f64) -> f64 {
        let Self { x1, x2, x3, x4 } = *self;

        if (x == x1 && x == x2) || (x == x3 && x == x4) {
            1.
        } else if x <= x1 || x >= x4 {
            0.
        } else if x2 <= x && x <= x3 {
            1.
        } else if x < x2 {
            (x - x1) / (x2 - x1)
        } else {
            (x4 - x) / (x4 - x3)
        }
    }
}

/// Gaussian bump centered on `b`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Normal {
    b: f64,
    sigma: f64,
}

impl Normal {
    pub fn new(b: f64, sigma: f64) -> Self {
        Self { b, sigma }
    }

    pub fn center(&self) -> f64 {
        self.b
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }
}

impl Default for Normal {
    fn default() -> Self {
        Self::new(0., 1.)
    }
}

impl MembershipFunction for Normal {
    fn value(&self, x: f64) -> f64 {
        let d = x - self.b;

        f64::exp(-d * d / (2. * self.sigma * self.sigma))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Constant(f64);

impl Constant {
    /// Requires `value` in `[0, 1]`
    pub fn new(value: f64) -> Result<Self> {
        if !(0. ..=1.).contains(&value) {
            return Err(FuzzyError::ConstantOutOfRange(value));
        }

        Ok(Self(value))
    }

    /// Truth values produced by evaluation are already within `[0, 1]`.
    pub(crate) fn truth(value: f64) -> Self {
        Self(value)
    }
}

impl MembershipFunction for Constant {
    fn value(&self, _x: f64) -> f64 {
        self.0
    }
}

/// Membership given as `(x, membership)` points joined by straight lines. The
/// first and last memberships extend to the rest of the universe.
#[derive(Clone, Debug, PartialEq)]
pub struct PiecewiseLinear(Vec<(f64, f64)>);

impl PiecewiseLinear {
    pub fn new(points: impl Into<Vec<(f64, f64)>>) -> Result<Self> {
        let points = points.into();

        if points.is_empty() {
            return Err(FuzzyError::InvalidControlPoints("no points given".into()));
        }

        let xs: Vec<f64> = points.iter().map(|(x, _)| *x).collect();

        check_ascending(&xs)?;

        Ok(Self(points))
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.0
    }
}

impl MembershipFunction for PiecewiseLinear {
    fn value(&self, x: f64) -> f64 {
        interp(x, &self.0)
    }
}

/// Several membership functions folded into one by a [`CompositionOp`]
#[derive(Clone, Debug)]
pub struct Composite {
    op: CompositionOp,
    functions: Vec<Arc<dyn MembershipFunction>>,
}

impl Composite {
    pub fn new(op: CompositionOp, functions: Vec<Arc<dyn MembershipFunction>>) -> Self {
        Self { op, functions }
    }

    pub fn op(&self) -> CompositionOp {
        self.op
    }

    pub fn functions(&self) -> &[Arc<dyn MembershipFunction>] {
        &self.functions
    }

    pub fn push(&mut self, function: Arc<dyn MembershipFunction>) {
        self.functions.push(function);
    }
}

impl MembershipFunction for Composite {
    fn value(&self, x: f64) -> f64 {
        let mut values = self.functions.iter().map(|f| f.value(x));

        match values.next() {
            Some(first) => values.fold(first, |acc, v| self.op.call(acc, v)),
            None => 0.,
        }
    }
}
