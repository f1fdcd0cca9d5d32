use crate::condition::Condition;
use crate::sugeno::{FunctionKey, OutputKey};
use crate::variable::{TermKey, VariableKey};

/// The THEN part of a rule: `variable is value`
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Conclusion<V, T> {
    pub variable: V,
    pub value: T,
}

/// Common view over the rules of both inference styles
pub trait FuzzyRule {
    type Variable: Copy + Eq;
    type Value: Copy + Eq;

    fn condition(&self) -> &Condition;

    fn conclusion(&self) -> Conclusion<Self::Variable, Self::Value>;
}

/// Rule of a Mamdani system. Created with `MamdaniSystem::rule` or
/// `MamdaniSystem::parse_rule`.
#[derive(Clone, Debug, PartialEq)]
pub struct MamdaniRule {
    pub(crate) condition: Condition,
    pub(crate) conclusion: Conclusion<VariableKey, TermKey>,
    pub(crate) weight: f64,
}

impl MamdaniRule {
    pub(crate) fn new(condition: Condition, conclusion: Conclusion<VariableKey, TermKey>) -> Self {
        Self {
            condition,
            conclusion,
            weight: 1.,
        }
    }

    // REVIEW: The weight is carried along but the pipeline does not scale by it
    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }
}

impl FuzzyRule for MamdaniRule {
    type Variable = VariableKey;
    type Value = TermKey;

    fn condition(&self) -> &Condition {
        &self.condition
    }

    fn conclusion(&self) -> Conclusion<VariableKey, TermKey> {
        self.conclusion
    }
}

/// Rule of a Sugeno system. Created with `SugenoSystem::rule` or
/// `SugenoSystem::parse_rule`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SugenoRule {
    pub(crate) condition: Condition,
    pub(crate) conclusion: Conclusion<OutputKey, FunctionKey>,
}

impl FuzzyRule for SugenoRule {
    type Variable = OutputKey;
    type Value = FunctionKey;

    fn condition(&self) -> &Condition {
        &self.condition
    }

    fn conclusion(&self) -> Conclusion<OutputKey, FunctionKey> {
        self.conclusion
    }
}

/// Ordered rule base
#[derive(Clone, Debug)]
pub struct Rules<R>(pub(crate) Vec<R>);

impl<R> Default for Rules<R> {
    fn default() -> Self {
        Rules(Vec::new())
    }
}

impl<R> Rules<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.0.iter()
    }

    pub(crate) fn push(&mut self, rule: R) {
        self.0.push(rule);
    }
}

impl<'r, R> IntoIterator for &'r Rules<R> {
    type Item = &'r R;
    type IntoIter = std::slice::Iter<'r, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
