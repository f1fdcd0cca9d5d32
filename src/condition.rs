//! The IF part of a rule: `variable is term` propositions combined with
//! and/or into a tree.
//!
//! ```
//! # use fuzzy_rules::*;
//! # fn main() -> Result<(), FuzzyError> {
//! let mut fs = MamdaniSystem::new();
//! let service = fs.add_input("service", 0. ..=10.)?;
//! let poor = fs.add_term(service, "poor", Triangular::new(-5., 0., 5.)?)?;
//! let food = fs.add_input("food", 0. ..=10.)?;
//! let rancid = fs.add_term(food, "rancid", Trapezoid::new(0., 0., 1., 3.)?)?;
//!
//! let condition = service.is(poor).or(food.is(rancid).hedge(Hedge::Very));
//! # Ok(())
//! # }
//! ```

use crate::error::{FuzzyError, Result};
use crate::ops::{AndOp, OrOp};
use crate::variable::{TermKey, VariableKey};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Operator {
    And,
    Or,
}

/// Unary modifier reshaping a membership degree
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Hedge {
    #[default]
    None,
    /// Cube root
    Slightly,
    /// Square root
    Somewhat,
    /// Square
    Very,
    /// Cube
    Extremely,
}

impl Hedge {
    pub fn apply(self, v: f64) -> f64 {
        match self {
            Self::None => v,
            Self::Slightly => v.powf(1. / 3.),
            Self::Somewhat => v.sqrt(),
            Self::Very => v * v,
            Self::Extremely => v * v * v,
        }
    }

    pub(crate) fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "slightly" => Some(Self::Slightly),
            "somewhat" => Some(Self::Somewhat),
            "very" => Some(Self::Very),
            "extremely" => Some(Self::Extremely),
            _ => None,
        }
    }
}

/// `variable is [not] [hedge] term`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SingleCondition {
    pub variable: VariableKey,
    pub term: TermKey,
    pub not: bool,
    pub hedge: Hedge,
}

/// Child conditions linked by a single operator
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Combination {
    op: Operator,
    not: bool,
    children: Vec<Condition>,
}

impl Combination {
    /// Fails when `children` is empty
    pub fn new(op: Operator, children: Vec<Condition>) -> Result<Self> {
        if children.is_empty() {
            return Err(FuzzyError::EmptyCombination);
        }

        Ok(Self { op, not: false, children })
    }

    pub fn op(&self) -> Operator {
        self.op
    }

    pub fn is_negated(&self) -> bool {
        self.not
    }

    pub fn children(&self) -> &[Condition] {
        &self.children
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Condition {
    Single(SingleCondition),
    Combination(Combination),
}

impl Condition {
    pub fn and(self, rhs: Condition) -> Self {
        Self::combine(Operator::And, self, rhs)
    }

    pub fn or(self, rhs: Condition) -> Self {
        Self::combine(Operator::Or, self, rhs)
    }

    fn combine(op: Operator, lhs: Condition, rhs: Condition) -> Self {
        Condition::Combination(Combination {
            op,
            not: false,
            children: vec![lhs, rhs],
        })
    }

    /// Links all `conditions` with `and`. Fails when there are none.
    pub fn all(conditions: impl IntoIterator<Item = Condition>) -> Result<Self> {
        Combination::new(Operator::And, conditions.into_iter().collect()).map(Condition::Combination)
    }

    /// Links all `conditions` with `or`. Fails when there are none.
    pub fn any(conditions: impl IntoIterator<Item = Condition>) -> Result<Self> {
        Combination::new(Operator::Or, conditions.into_iter().collect()).map(Condition::Combination)
    }

    /// Toggles negation of this condition
    pub fn not(mut self) -> Self {
        match &mut self {
            Condition::Single(single) => single.not = !single.not,
            Condition::Combination(comb) => comb.not = !comb.not,
        }

        self
    }

    /// Sets the hedge of a single condition. A hedge on a combination is
    /// applied to each of its single conditions that has no hedge yet.
    pub fn hedge(mut self, hedge: Hedge) -> Self {
        fn fill(condition: &mut Condition, hedge: Hedge) {
            match condition {
                Condition::Single(single) if single.hedge == Hedge::None => single.hedge = hedge,
                Condition::Single(_) => {},
                Condition::Combination(comb) => comb.children.iter_mut().for_each(|c| fill(c, hedge)),
            }
        }

        match &mut self {
            Condition::Single(single) => single.hedge = hedge,
            combination => fill(combination, hedge),
        }

        self
    }

    /// All single conditions in the tree, left to right
    pub fn propositions(&self) -> Vec<&SingleCondition> {
        let mut props = Vec::new();

        fn parse<'p>(condition: &'p Condition, out: &mut Vec<&'p SingleCondition>) {
            match condition {
                Condition::Single(single) => out.push(single),
                Condition::Combination(comb) => {
                    for child in &comb.children {
                        parse(child, out);
                    }
                },
            }
        }

        parse(self, &mut props);

        props
    }

    /// Truth value of this condition given the membership of each
    /// proposition's term.
    pub fn evaluate(&self, and_op: AndOp, or_op: OrOp, membership: &impl Fn(&SingleCondition) -> f64) -> f64 {
        match self {
            Condition::Single(single) => {
                let value = single.hedge.apply(membership(single));

                if single.not {
                    1. - value
                } else {
                    value
                }
            },
            Condition::Combination(comb) => {
                let mut values = comb
                    .children
                    .iter()
                    .map(|child| child.evaluate(and_op, or_op, membership));
                let Some(first) = values.next() else {
                    unreachable!("combinations are never empty");
                };
                let value = values.fold(first, |acc, v| match comb.op {
                    Operator::And => and_op.call(acc, v),
                    Operator::Or => or_op.call(acc, v),
                });

                if comb.not {
                    1. - value
                } else {
                    value
                }
            },
        }
    }
}

impl From<SingleCondition> for Condition {
    fn from(single: SingleCondition) -> Self {
        Condition::Single(single)
    }
}

impl From<Combination> for Condition {
    fn from(comb: Combination) -> Self {
        Condition::Combination(comb)
    }
}

impl VariableKey {
    /// The proposition `self is term`
    pub fn is(self, term: TermKey) -> Condition {
        Condition::Single(SingleCondition {
            variable: self,
            term,
            not: false,
            hedge: Hedge::None,
        })
    }
}
