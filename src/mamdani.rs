//! Mamdani inference: each rule concludes a term of an output variable, the
//! concluded terms are clipped or scaled by the rule truth, merged per output
//! variable and reduced to a crisp value.
//!
//! ```
//! # use fuzzy_rules::*;
//! # fn main() -> Result<(), FuzzyError> {
//! let mut fs = MamdaniSystem::new();
//! let service = fs.add_input("service", 0. ..=10.)?;
//! fs.add_term(service, "poor", Triangular::new(-5., 0., 5.)?)?;
//! fs.add_term(service, "good", Triangular::new(0., 5., 10.)?)?;
//! let tips = fs.add_output("tips", 0. ..=30.)?;
//! fs.add_term(tips, "cheap", Triangular::new(0., 5., 10.)?)?;
//! fs.add_term(tips, "average", Triangular::new(10., 15., 20.)?)?;
//!
//! for rule in ["if service is poor then tips is cheap", "if service is good then tips is average"] {
//!     let rule = fs.parse_rule(rule)?;
//!     fs.add_rule(rule)?;
//! }
//!
//! let outputs = fs.calculate(&Inputs::from([(service, 5.)]))?;
//!
//! assert!((outputs.get(tips).unwrap() - 15.).abs() < 1e-9);
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::condition::Condition;
use crate::config::MamdaniConfig;
use crate::error::{FuzzyError, Result};
use crate::inputs::Inputs;
use crate::membership::{Composite, Constant, MembershipFunction};
use crate::names::Named;
use crate::ops::{AggregationOp, AndOp, DefuzzificationOp, ImplicationOp, OrOp};
use crate::outputs::Outputs;
use crate::parser::parse_rule;
use crate::rules::{Conclusion, FuzzyRule, MamdaniRule, Rules};
use crate::system::{Fuzzified, FuzzySystem};
use crate::variable::{FuzzyVariable, TermKey, VariableKey};

#[derive(Debug, Default)]
pub struct MamdaniSystem {
    system: FuzzySystem,
    outputs: Vec<VariableKey>,
    rules: Rules<MamdaniRule>,
    implication: ImplicationOp,
    aggregation: AggregationOp,
    defuzzification: DefuzzificationOp,
}

impl MamdaniSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MamdaniConfig) -> Self {
        Self {
            system: FuzzySystem::new(config.and, config.or),
            implication: config.implication,
            aggregation: config.aggregation,
            defuzzification: config.defuzzification,
            ..Self::default()
        }
    }

    pub fn config(&self) -> MamdaniConfig {
        MamdaniConfig {
            and: self.system.and_op(),
            or: self.system.or_op(),
            implication: self.implication,
            aggregation: self.aggregation,
            defuzzification: self.defuzzification,
        }
    }

    pub fn set_and_op(&mut self, and_op: AndOp) {
        self.system.set_and_op(and_op);
    }

    pub fn set_or_op(&mut self, or_op: OrOp) {
        self.system.set_or_op(or_op);
    }

    pub fn set_implication(&mut self, implication: ImplicationOp) {
        self.implication = implication;
    }

    pub fn set_aggregation(&mut self, aggregation: AggregationOp) {
        self.aggregation = aggregation;
    }

    pub fn set_defuzzification(&mut self, defuzzification: DefuzzificationOp) {
        self.defuzzification = defuzzification;
    }

    /// The shared input side of this system
    pub fn system(&self) -> &FuzzySystem {
        &self.system
    }

    pub fn add_input(&mut self, name: impl Into<String>, universe_range: RangeInclusive<f64>) -> Result<VariableKey> {
        self.system.add_input(name, universe_range)
    }

    /// Adds an output variable. Input and output variables share one name
    /// space.
    pub fn add_output(&mut self, name: impl Into<String>, universe_range: RangeInclusive<f64>) -> Result<VariableKey> {
        let key = self.system.variables.add(name, universe_range)?;

        self.outputs.push(key);

        Ok(key)
    }

    /// Adds a term to an input or output variable
    pub fn add_term(
        &mut self,
        var: VariableKey,
        name: impl Into<String>,
        membership: impl MembershipFunction + 'static,
    ) -> Result<TermKey> {
        self.system.add_term(var, name, membership)
    }

    /// Output variable keys in insertion order
    pub fn outputs(&self) -> &[VariableKey] {
        &self.outputs
    }

    pub fn variable(&self, key: VariableKey) -> Option<&FuzzyVariable> {
        self.system.variable(key)
    }

    pub fn input_by_name(&self, name: &str) -> Result<VariableKey> {
        self.system.input_by_name(name)
    }

    pub fn output_by_name(&self, name: &str) -> Result<VariableKey> {
        self.outputs
            .iter()
            .copied()
            .find(|key| self.system.variable(*key).is_some_and(|var| var.name() == name))
            .ok_or_else(|| FuzzyError::VariableNotFound(name.to_owned()))
    }

    pub fn term_by_name(&self, var: VariableKey, name: &str) -> Result<TermKey> {
        self.system.term_by_name(var, name)
    }

    /// Creates a rule after checking that every key it mentions belongs to
    /// this system.
    pub fn rule(&self, condition: Condition, variable: VariableKey, term: TermKey) -> Result<MamdaniRule> {
        let rule = MamdaniRule::new(
            condition,
            Conclusion {
                variable,
                value: term,
            },
        );

        self.validate_rule(&rule)?;

        Ok(rule)
    }

    pub fn parse_rule(&self, rule: &str) -> Result<MamdaniRule> {
        let inputs = self.system.input_vocabulary();
        let outputs = self.system.vocabulary(&self.outputs);
        let (condition, conclusion) = parse_rule(rule, &inputs, &outputs)?;

        debug!(rule, "parsed mamdani rule");

        Ok(MamdaniRule::new(condition, conclusion))
    }

    /// Appends a rule. Rules made by another system are rejected.
    pub fn add_rule(&mut self, rule: MamdaniRule) -> Result<()> {
        self.validate_rule(&rule)?;
        self.rules.push(rule);

        Ok(())
    }

    pub fn rules(&self) -> &Rules<MamdaniRule> {
        &self.rules
    }

    fn validate_rule(&self, rule: &MamdaniRule) -> Result<()> {
        self.system.validate_condition(rule.condition())?;

        let Conclusion { variable, value } = rule.conclusion();
        let name = self.system.variables().name_of(variable);

        if !self.outputs.contains(&variable) {
            return Err(FuzzyError::ForeignVariable(name));
        }

        if !self.system.variables().owns(variable, value) {
            return Err(FuzzyError::ForeignTerm(name));
        }

        Ok(())
    }

    /// Truth value of every rule, in rule order
    pub fn evaluate_conditions(&self, fuzzified: &Fuzzified) -> Result<Vec<f64>> {
        self.system.evaluate_conditions(&self.rules, fuzzified)
    }

    /// Output membership of every rule: its concluded term limited by the
    /// rule's truth value.
    pub fn implicate(&self, truths: &[f64]) -> Vec<Composite> {
        self.rules
            .iter()
            .zip(truths)
            .map(|(rule, truth)| {
                let term = self
                    .system
                    .variables()
                    .term(rule.conclusion.value)
                    .expect("rule terms are validated");

                let truth: Arc<dyn MembershipFunction> = Arc::new(Constant::truth(*truth));

                Composite::new(self.implication.composition(), vec![truth, term.membership().clone()])
            })
            .collect()
    }

    /// Merges the implicated memberships of the rules concluding each output
    /// variable. Outputs without rules get an empty composite.
    pub fn aggregate(&self, implicated: Vec<Composite>) -> HashMap<VariableKey, Composite> {
        let mut aggregated: HashMap<_, _> = self
            .outputs
            .iter()
            .map(|key| (*key, Composite::new(self.aggregation.composition(), Vec::new())))
            .collect();

        for (rule, membership) in self.rules.iter().zip(implicated) {
            if let Some(composite) = aggregated.get_mut(&rule.conclusion.variable) {
                composite.push(Arc::new(membership));
            }
        }

        aggregated
    }

    /// Crisp value of every output variable
    pub fn defuzzify(&self, aggregated: &HashMap<VariableKey, Composite>) -> Result<Outputs<VariableKey>> {
        let mut results = HashMap::with_capacity(aggregated.len());

        for (key, membership) in aggregated {
            let var = self.system.variable(*key).expect("output variables are never removed");
            let result = self.defuzzification.call(membership, var.min(), var.max())?;

            trace!(variable = var.name(), result);

            results.insert(*key, result);
        }

        Ok(Outputs::new(results))
    }

    pub fn calculate(&self, inputs: &Inputs) -> Result<Outputs<VariableKey>> {
        if self.rules.is_empty() {
            return Err(FuzzyError::NoRules);
        }

        debug!(rules = self.rules.len(), "mamdani calculation");

        let fuzzified = self.system.fuzzify(inputs)?;
        let truths = self.evaluate_conditions(&fuzzified)?;
        let implicated = self.implicate(&truths);
        let aggregated = self.aggregate(implicated);

        self.defuzzify(&aggregated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::membership::{Normal, Trapezoid, Triangular};

    struct Tips {
        fs: MamdaniSystem,
        service: VariableKey,
        food: VariableKey,
        tips: VariableKey,
    }

    fn tips() -> Tips {
        let mut fs = MamdaniSystem::new();
        let service = fs.add_input("service", 0. ..=10.).unwrap();
        let food = fs.add_input("food", 0. ..=10.).unwrap();
        let tips = fs.add_output("tips", 0. ..=30.).unwrap();

        fs.add_term(service, "poor", Triangular::new(-5., 0., 5.).unwrap()).unwrap();
        fs.add_term(service, "good", Triangular::new(0., 5., 10.).unwrap()).unwrap();
        fs.add_term(service, "excellent", Triangular::new(5., 10., 15.).unwrap()).unwrap();
        fs.add_term(food, "rancid", Trapezoid::new(0., 0., 1., 3.).unwrap()).unwrap();
        fs.add_term(food, "delicious", Trapezoid::new(7., 9., 10., 10.).unwrap()).unwrap();
        fs.add_term(tips, "cheap", Triangular::new(0., 5., 10.).unwrap()).unwrap();
        fs.add_term(tips, "average", Triangular::new(10., 15., 20.).unwrap()).unwrap();
        fs.add_term(tips, "generous", Triangular::new(20., 25., 30.).unwrap()).unwrap();

        Tips { fs, service, food, tips }
    }

    #[test]
    fn test_config() {
        let config = MamdaniConfig {
            and: AndOp::Prod,
            implication: ImplicationOp::Prod,
            ..Default::default()
        };
        let mut fs = MamdaniSystem::with_config(config);

        assert_eq!(fs.config(), config);

        fs.set_aggregation(AggregationOp::Sum);
        fs.set_or_op(OrOp::ProbOr);

        assert_eq!(fs.config().aggregation, AggregationOp::Sum);
        assert_eq!(fs.system().or_op(), OrOp::ProbOr);
    }

    #[test]
    fn test_names() {
        let Tips { mut fs, service, tips, .. } = tips();

        assert_eq!(fs.output_by_name("tips"), Ok(tips));
        assert_eq!(fs.output_by_name("service"), Err(FuzzyError::VariableNotFound("service".into())));
        assert_eq!(fs.input_by_name("tips"), Err(FuzzyError::VariableNotFound("tips".into())));
        assert_eq!(fs.add_output("service", 0. ..=1.), Err(FuzzyError::DuplicateName("service".into())));
        assert_eq!(fs.add_input("tips", 0. ..=1.), Err(FuzzyError::DuplicateName("tips".into())));
        assert_eq!(fs.outputs(), &[tips]);
        assert_eq!(fs.system().inputs().len(), 2);
        assert!(fs.term_by_name(service, "poor").is_ok());
    }

    #[test]
    fn test_rule_validation() {
        let Tips {
            fs, service, food, tips, ..
        } = tips();
        let poor = fs.term_by_name(service, "poor").unwrap();
        let cheap = fs.term_by_name(tips, "cheap").unwrap();
        let rancid = fs.term_by_name(food, "rancid").unwrap();

        assert!(fs.rule(service.is(poor), tips, cheap).is_ok());
        assert_eq!(
            fs.rule(service.is(poor), tips, rancid),
            Err(FuzzyError::ForeignTerm("tips".into()))
        );
        assert_eq!(
            fs.rule(service.is(poor), food, rancid),
            Err(FuzzyError::ForeignVariable("food".into()))
        );
        assert_eq!(
            fs.rule(tips.is(cheap), tips, cheap),
            Err(FuzzyError::ForeignVariable("tips".into()))
        );
        assert!(matches!(
            fs.parse_rule("if tips is cheap then service is poor"),
            Err(FuzzyError::Parse(_))
        ));
    }

    #[test]
    fn test_rule_weight() {
        let Tips { fs, service, tips, .. } = tips();
        let rule = fs.parse_rule("if service is poor then tips is cheap").unwrap();

        assert_eq!(rule.weight(), 1.);
        assert_eq!(rule.with_weight(0.5).weight(), 0.5);

        let poor = fs.term_by_name(service, "poor").unwrap();
        let cheap = fs.term_by_name(tips, "cheap").unwrap();

        assert_eq!(fs.rule(service.is(poor), tips, cheap).unwrap().weight(), 1.);
    }

    #[test]
    fn test_pipeline_stages() {
        let Tips {
            mut fs,
            service,
            food,
            tips,
        } = tips();

        for rule in [
            "if (service is poor) or (food is rancid) then tips is cheap",
            "if service is good then tips is average",
            "if (service is excellent) or (food is delicious) then tips is generous",
        ] {
            let rule = fs.parse_rule(rule).unwrap();

            fs.add_rule(rule).unwrap();
        }

        let inputs = Inputs::from([(service, 5.), (food, 5.)]);
        let fuzzified = fs.system().fuzzify(&inputs).unwrap();
        let truths = fs.evaluate_conditions(&fuzzified).unwrap();

        assert_eq!(truths, vec![0., 1., 0.]);

        let implicated = fs.implicate(&truths);

        assert_eq!(implicated.len(), 3);
        assert_eq!(implicated[0].value(5.), 0.);
        assert_eq!(implicated[1].value(15.), 1.);
        assert_eq!(implicated[1].value(12.5), 0.5);

        let aggregated = fs.aggregate(implicated);

        assert_eq!(aggregated[&tips].functions().len(), 3);
        assert_eq!(aggregated[&tips].value(15.), 1.);

        let outputs = fs.defuzzify(&aggregated).unwrap();

        assert!((outputs.get(tips).unwrap() - 15.).abs() < 1e-9);
        assert_eq!(fs.calculate(&inputs).unwrap(), outputs);
    }

    #[test]
    fn test_no_rules() {
        let Tips { fs, service, food, .. } = tips();

        assert_eq!(
            fs.calculate(&Inputs::from([(service, 5.), (food, 5.)])),
            Err(FuzzyError::NoRules)
        );
    }

    #[test]
    fn test_zero_area_centroid() {
        let Tips {
            mut fs,
            service,
            food,
            tips,
        } = tips();
        let rule = fs.parse_rule("if service is excellent then tips is generous").unwrap();

        fs.add_rule(rule).unwrap();

        let outputs = fs.calculate(&Inputs::from([(service, 0.), (food, 5.)])).unwrap();

        assert!(!outputs.get(tips).unwrap().is_finite());
    }

    #[test]
    fn test_nan_truth_reaches_the_output() {
        let Tips {
            mut fs,
            service,
            food,
            tips,
        } = tips();
        // Zero spread: the membership at the center is 0 / 0
        fs.add_term(service, "exact", Normal::new(5., 0.)).unwrap();

        let rule = fs.parse_rule("if service is exact then tips is average").unwrap();

        fs.add_rule(rule).unwrap();

        let outputs = fs.calculate(&Inputs::from([(service, 5.), (food, 5.)])).unwrap();

        assert!(outputs.get(tips).unwrap().is_nan());
    }

    #[test]
    fn test_unsupported_defuzzification() {
        let Tips {
            mut fs,
            service,
            food,
            ..
        } = tips();
        let rule = fs.parse_rule("if service is good then tips is average").unwrap();

        fs.add_rule(rule).unwrap();
        fs.set_defuzzification(DefuzzificationOp::Boa);

        assert_eq!(
            fs.calculate(&Inputs::from([(service, 5.), (food, 5.)])),
            Err(FuzzyError::UnsupportedDefuzzification(DefuzzificationOp::Boa))
        );
    }

    #[test]
    fn test_product_implication() {
        let Tips {
            mut fs,
            service,
            food,
            tips,
        } = tips();
        let rule = fs.parse_rule("if service is good then tips is average").unwrap();

        fs.add_rule(rule).unwrap();
        fs.set_implication(ImplicationOp::Prod);

        let inputs = Inputs::from([(service, 2.5), (food, 5.)]);
        let fuzzified = fs.system().fuzzify(&inputs).unwrap();
        let implicated = fs.implicate(&fs.evaluate_conditions(&fuzzified).unwrap());

        assert_eq!(implicated[0].value(15.), 0.5);
        assert_eq!(implicated[0].value(12.5), 0.25);

        // Scaling keeps the shape, so the symmetric centroid is unchanged
        let result = fs.calculate(&inputs).unwrap().get(tips).unwrap();

        assert!((result - 15.).abs() < 1e-9, "{result}");
    }
}
