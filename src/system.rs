use std::collections::HashMap;
use std::ops::RangeInclusive;

use tracing::trace;

use crate::condition::Condition;
use crate::error::{FuzzyError, Result};
use crate::inputs::Inputs;
use crate::membership::MembershipFunction;
use crate::names::Named;
use crate::ops::{AndOp, OrOp};
use crate::parser::TermVocabulary;
use crate::rules::{FuzzyRule, Rules};
use crate::variable::{FuzzyVariable, TermKey, VariableKey, Variables};

/// Membership of every term of every input variable for one set of crisp inputs
pub type Fuzzified = HashMap<(VariableKey, TermKey), f64>;

/// State and evaluation shared by Mamdani and Sugeno systems: the input
/// variables and the and/or methods used on rule conditions.
#[derive(Debug, Default)]
pub struct FuzzySystem {
    pub(crate) variables: Variables,
    inputs: Vec<VariableKey>,
    and_op: AndOp,
    or_op: OrOp,
}

impl FuzzySystem {
    pub fn new(and_op: AndOp, or_op: OrOp) -> Self {
        Self {
            and_op,
            or_op,
            ..Self::default()
        }
    }

    pub fn add_input(&mut self, name: impl Into<String>, universe_range: RangeInclusive<f64>) -> Result<VariableKey> {
        let key = self.variables.add(name, universe_range)?;

        self.inputs.push(key);

        Ok(key)
    }

    pub fn add_term(
        &mut self,
        var: VariableKey,
        name: impl Into<String>,
        membership: impl MembershipFunction + 'static,
    ) -> Result<TermKey> {
        self.variables.add_term(var, name, membership)
    }

    /// Input variable keys in insertion order
    pub fn inputs(&self) -> &[VariableKey] {
        &self.inputs
    }

    pub fn is_input(&self, key: VariableKey) -> bool {
        self.inputs.contains(&key)
    }

    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    pub fn variable(&self, key: VariableKey) -> Option<&FuzzyVariable> {
        self.variables.get(key)
    }

    pub fn input_by_name(&self, name: &str) -> Result<VariableKey> {
        self.inputs
            .iter()
            .copied()
            .find(|key| self.variables.get(*key).is_some_and(|var| var.name() == name))
            .ok_or_else(|| FuzzyError::VariableNotFound(name.to_owned()))
    }

    pub fn term_by_name(&self, var: VariableKey, name: &str) -> Result<TermKey> {
        self.variables.term_by_name(var, name)
    }

    pub fn and_op(&self) -> AndOp {
        self.and_op
    }

    pub fn or_op(&self) -> OrOp {
        self.or_op
    }

    pub fn set_and_op(&mut self, and_op: AndOp) {
        self.and_op = and_op;
    }

    pub fn set_or_op(&mut self, or_op: OrOp) {
        self.or_op = or_op;
    }

    /// Checks that exactly the input variables have values, each within its
    /// domain.
    pub fn validate_inputs(&self, inputs: &Inputs) -> Result<()> {
        if inputs.len() != self.inputs.len() {
            return Err(FuzzyError::InputCount {
                expected: self.inputs.len(),
                found: inputs.len(),
            });
        }

        for key in &self.inputs {
            let var = self.variables.get(*key).expect("input variables are never removed");
            let Some(value) = inputs.get(*key) else {
                return Err(FuzzyError::MissingInput(var.name().to_owned()));
            };

            if !var.contains(value) {
                return Err(FuzzyError::InputOutOfRange {
                    variable: var.name().to_owned(),
                    value,
                    min: var.min(),
                    max: var.max(),
                });
            }
        }

        Ok(())
    }

    /// Converts crisp inputs into the membership of each input term
    pub fn fuzzify(&self, inputs: &Inputs) -> Result<Fuzzified> {
        self.validate_inputs(inputs)?;

        let mut fuzzified = HashMap::new();

        for key in &self.inputs {
            let value = inputs.0[key];

            for (term_key, term) in self.variables.terms_of(*key) {
                let membership = term.membership().value(value);

                trace!(variable = %self.variables.name_of(*key), term = term.name(), membership);

                fuzzified.insert((*key, term_key), membership);
            }
        }

        Ok(fuzzified)
    }

    /// Truth value of a condition tree. Fails with `ForeignTerm` when a
    /// proposition refers to a term that is missing from `fuzzified`.
    pub fn evaluate(&self, condition: &Condition, fuzzified: &Fuzzified) -> Result<f64> {
        let missing = condition
            .propositions()
            .into_iter()
            .find(|single| !fuzzified.contains_key(&(single.variable, single.term)));

        if let Some(single) = missing {
            return Err(FuzzyError::ForeignTerm(self.variables.name_of(single.variable)));
        }

        Ok(condition.evaluate(self.and_op, self.or_op, &|single| {
            fuzzified[&(single.variable, single.term)]
        }))
    }

    /// Truth value of every rule, in rule order
    pub fn evaluate_conditions<R: FuzzyRule>(&self, rules: &Rules<R>, fuzzified: &Fuzzified) -> Result<Vec<f64>> {
        rules
            .iter()
            .enumerate()
            .map(|(i, rule)| {
                let truth = self.evaluate(rule.condition(), fuzzified)?;

                trace!(rule = i, truth);

                Ok(truth)
            })
            .collect()
    }

    /// Checks that every proposition refers to an input variable of this
    /// system and one of its own terms.
    pub(crate) fn validate_condition(&self, condition: &Condition) -> Result<()> {
        for single in condition.propositions() {
            if !self.is_input(single.variable) {
                return Err(FuzzyError::ForeignVariable(self.variables.name_of(single.variable)));
            }

            if !self.variables.owns(single.variable, single.term) {
                return Err(FuzzyError::ForeignTerm(self.variables.name_of(single.variable)));
            }
        }

        Ok(())
    }

    pub(crate) fn input_vocabulary(&self) -> Vec<TermVocabulary<'_>> {
        self.vocabulary(&self.inputs)
    }

    /// Names of `keys` and of their terms, for the rule parser
    pub(crate) fn vocabulary(&self, keys: &[VariableKey]) -> Vec<TermVocabulary<'_>> {
        keys.iter()
            .map(|key| TermVocabulary {
                name: self.variables.get(*key).map_or("", |var| var.name()),
                key: *key,
                values: self
                    .variables
                    .terms_of(*key)
                    .map(|(term_key, term)| (term.name(), term_key))
                    .collect(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::membership::Triangular;

    fn system() -> (FuzzySystem, VariableKey, VariableKey) {
        let mut fs = FuzzySystem::default();
        let service = fs.add_input("service", 0. ..=10.).unwrap();
        let food = fs.add_input("food", 0. ..=10.).unwrap();

        fs.add_term(service, "poor", Triangular::new(-5., 0., 5.).unwrap()).unwrap();
        fs.add_term(service, "good", Triangular::new(0., 5., 10.).unwrap()).unwrap();
        fs.add_term(food, "good", Triangular::new(5., 10., 15.).unwrap()).unwrap();

        (fs, service, food)
    }

    #[test]
    fn test_fuzzify() {
        let (fs, service, food) = system();
        let fuzzified = fs.fuzzify(&Inputs::from([(service, 2.5), (food, 10.)])).unwrap();
        let poor = fs.term_by_name(service, "poor").unwrap();
        let good = fs.term_by_name(service, "good").unwrap();
        let food_good = fs.term_by_name(food, "good").unwrap();

        assert_eq!(fuzzified.len(), 3);
        assert_eq!(fuzzified[&(service, poor)], 0.5);
        assert_eq!(fuzzified[&(service, good)], 0.5);
        assert_eq!(fuzzified[&(food, food_good)], 1.);
    }

    #[test]
    fn test_fuzzify_validation() {
        let (fs, service, food) = system();

        assert_eq!(
            fs.fuzzify(&Inputs::from([(service, 1.)])),
            Err(FuzzyError::InputCount { expected: 2, found: 1 })
        );
        assert_eq!(
            fs.fuzzify(&Inputs::from([(service, 1.), (food, 10.5)])),
            Err(FuzzyError::InputOutOfRange {
                variable: "food".into(),
                value: 10.5,
                min: 0.,
                max: 10.
            })
        );
        assert!(fs.fuzzify(&Inputs::from([(service, 0.), (food, 10.)])).is_ok());
    }

    #[test]
    fn test_missing_input() {
        let (mut fs, service, _food) = system();
        let extra = fs.variables.add("unrelated", 0. ..=1.).unwrap();

        assert_eq!(
            fs.fuzzify(&Inputs::from([(service, 1.), (extra, 0.5)])),
            Err(FuzzyError::MissingInput("food".into()))
        );
    }

    #[test]
    fn test_lookup() {
        let (fs, service, _) = system();

        assert_eq!(fs.input_by_name("service"), Ok(service));
        assert_eq!(fs.input_by_name("tips"), Err(FuzzyError::VariableNotFound("tips".into())));
    }

    #[test]
    fn test_evaluate_and_validate() {
        let (fs, service, food) = system();
        let poor = fs.term_by_name(service, "poor").unwrap();
        let food_good = fs.term_by_name(food, "good").unwrap();
        let fuzzified = fs.fuzzify(&Inputs::from([(service, 2.5), (food, 7.5)])).unwrap();
        let cond = service.is(poor).and(food.is(food_good).not());

        assert_eq!(fs.evaluate(&cond, &fuzzified), Ok(0.5));
        assert!(fs.validate_condition(&cond).is_ok());
        assert_eq!(
            fs.validate_condition(&food.is(poor)),
            Err(FuzzyError::ForeignTerm("food".into()))
        );
    }

    #[test]
    fn test_evaluate_unfuzzified_term() {
        let (mut fs, service, food) = system();
        let tips = fs.variables.add("tips", 0. ..=30.).unwrap();
        let cheap = fs.add_term(tips, "cheap", Triangular::new(0., 5., 10.).unwrap()).unwrap();
        let fuzzified = fs.fuzzify(&Inputs::from([(service, 2.5), (food, 7.5)])).unwrap();

        assert_eq!(
            fs.evaluate(&tips.is(cheap), &fuzzified),
            Err(FuzzyError::ForeignTerm("tips".into()))
        );
    }
}
