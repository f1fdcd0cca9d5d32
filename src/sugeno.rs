//! Sugeno inference: each rule concludes a function of the crisp inputs and
//! the result is the truth-weighted average of the concluded function values.
//!
//! ```
//! # use fuzzy_rules::*;
//! # fn main() -> Result<(), FuzzyError> {
//! let mut fs = SugenoSystem::new();
//! let error = fs.add_input("SpeedError", -20. ..=20.)?;
//! let zero = fs.add_term(error, "zero", Triangular::new(-5., 0., 5.)?)?;
//! let faster = fs.add_term(error, "faster", Triangular::new(0., 20., 20.)?)?;
//! let accelerate = fs.add_output("Accelerate")?;
//! let keep = fs.linear_function_from_slice(&[0., 0.])?;
//! let brake = fs.linear_function_from_slice(&[-1.])?;
//! let keep = fs.add_function(accelerate, "keep", keep)?;
//! let brake = fs.add_function(accelerate, "brake", brake)?;
//!
//! let rule = fs.rule(error.is(zero), accelerate, keep)?;
//! fs.add_rule(rule)?;
//! let rule = fs.parse_rule("if SpeedError is faster then Accelerate is brake")?;
//! fs.add_rule(rule)?;
//!
//! let outputs = fs.calculate(&Inputs::from([(error, 0.)]))?;
//!
//! assert_eq!(outputs.get(accelerate), Some(0.));
//! # let _ = (faster, brake);
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::ops::RangeInclusive;

use slotmap::{new_key_type, SlotMap};
use tracing::{debug, trace};

use crate::condition::Condition;
use crate::config::SugenoConfig;
use crate::error::{FuzzyError, Result};
use crate::inputs::Inputs;
use crate::membership::MembershipFunction;
use crate::names::{validate_name, Named};
use crate::ops::{AndOp, OrOp};
use crate::outputs::Outputs;
use crate::parser::{parse_rule, Vocabulary};
use crate::rules::{Conclusion, Rules, SugenoRule};
use crate::system::{Fuzzified, FuzzySystem};
use crate::variable::{TermKey, VariableKey};

new_key_type! {
    /// An output variable key of a Sugeno system
    pub struct OutputKey;

    /// An output function key, unique across all output variables of a system
    pub struct FunctionKey;
}

/// Linear combination of the input values plus a constant
#[derive(Clone, Debug, PartialEq)]
pub struct LinearFunction {
    coefficients: HashMap<VariableKey, f64>,
    constant: f64,
}

impl LinearFunction {
    pub fn coefficient(&self, var: VariableKey) -> f64 {
        self.coefficients.get(&var).copied().unwrap_or_default()
    }

    pub fn constant(&self) -> f64 {
        self.constant
    }

    /// `Σ coefficient · input + constant`. Inputs without a value contribute
    /// nothing.
    pub fn evaluate(&self, inputs: &Inputs) -> f64 {
        self.coefficients
            .iter()
            .map(|(var, coefficient)| coefficient * inputs.get(*var).unwrap_or_default())
            .sum::<f64>()
            + self.constant
    }
}

/// Function of the crisp inputs concluded by a Sugeno rule
#[derive(Clone, Debug, PartialEq)]
pub enum OutputFunction {
    Linear(LinearFunction),
}

impl OutputFunction {
    pub fn evaluate(&self, inputs: &Inputs) -> f64 {
        match self {
            Self::Linear(linear) => linear.evaluate(inputs),
        }
    }
}

impl From<LinearFunction> for OutputFunction {
    fn from(linear: LinearFunction) -> Self {
        Self::Linear(linear)
    }
}

/// Output variable of a Sugeno system. It has named functions instead of
/// terms and no domain.
#[derive(Debug)]
pub struct SugenoVariable {
    name: String,
    functions: Vec<FunctionKey>,
}

impl SugenoVariable {
    /// Function keys in insertion order
    pub fn functions(&self) -> &[FunctionKey] {
        &self.functions
    }
}

impl Named for SugenoVariable {
    fn name(&self) -> &str {
        &self.name
    }
}

/// A named output function owned by exactly one output variable
#[derive(Debug)]
pub struct NamedFunction {
    name: String,
    output: OutputKey,
    function: OutputFunction,
}

impl NamedFunction {
    pub fn output(&self) -> OutputKey {
        self.output
    }

    pub fn function(&self) -> &OutputFunction {
        &self.function
    }
}

impl Named for NamedFunction {
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Default)]
pub struct SugenoSystem {
    system: FuzzySystem,
    outputs: SlotMap<OutputKey, SugenoVariable>,
    functions: SlotMap<FunctionKey, NamedFunction>,
    rules: Rules<SugenoRule>,
}

impl SugenoSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SugenoConfig) -> Self {
        Self {
            system: FuzzySystem::new(config.and, config.or),
            ..Self::default()
        }
    }

    pub fn config(&self) -> SugenoConfig {
        SugenoConfig {
            and: self.system.and_op(),
            or: self.system.or_op(),
        }
    }

    pub fn set_and_op(&mut self, and_op: AndOp) {
        self.system.set_and_op(and_op);
    }

    pub fn set_or_op(&mut self, or_op: OrOp) {
        self.system.set_or_op(or_op);
    }

    /// The shared input side of this system
    pub fn system(&self) -> &FuzzySystem {
        &self.system
    }

    pub fn add_input(&mut self, name: impl Into<String>, universe_range: RangeInclusive<f64>) -> Result<VariableKey> {
        let name = name.into();

        if self.output_by_name(&name).is_ok() {
            return Err(FuzzyError::DuplicateName(name));
        }

        self.system.add_input(name, universe_range)
    }

    pub fn add_term(
        &mut self,
        var: VariableKey,
        name: impl Into<String>,
        membership: impl MembershipFunction + 'static,
    ) -> Result<TermKey> {
        self.system.add_term(var, name, membership)
    }

    /// Adds an output variable. Its name must differ from every input and
    /// output variable name.
    pub fn add_output(&mut self, name: impl Into<String>) -> Result<OutputKey> {
        let name = validate_name(name)?;

        if self.system.variables().by_name(&name).is_some() || self.output_by_name(&name).is_ok() {
            return Err(FuzzyError::DuplicateName(name));
        }

        Ok(self.outputs.insert(SugenoVariable {
            name,
            functions: Vec::new(),
        }))
    }

    /// Builds a linear function from per-input coefficients. Inputs that are
    /// not listed get a zero coefficient.
    pub fn linear_function(
        &self,
        coefficients: impl IntoIterator<Item = (VariableKey, f64)>,
        constant: f64,
    ) -> Result<LinearFunction> {
        let coefficients = coefficients
            .into_iter()
            .map(|(var, coefficient)| {
                if self.system.is_input(var) {
                    Ok((var, coefficient))
                } else {
                    Err(FuzzyError::ForeignVariable(self.system.variables().name_of(var)))
                }
            })
            .collect::<Result<_>>()?;

        Ok(LinearFunction { coefficients, constant })
    }

    /// Builds a linear function from coefficients listed in input order,
    /// optionally followed by the constant.
    pub fn linear_function_from_slice(&self, values: &[f64]) -> Result<LinearFunction> {
        let inputs = self.system.inputs();
        let constant = match values.len() {
            n if n == inputs.len() => 0.,
            n if n == inputs.len() + 1 => values[n - 1],
            found => {
                return Err(FuzzyError::CoefficientCount {
                    expected: inputs.len(),
                    found,
                })
            },
        };

        Ok(LinearFunction {
            coefficients: inputs.iter().copied().zip(values.iter().copied()).collect(),
            constant,
        })
    }

    /// Attaches a named function to an output variable
    pub fn add_function(
        &mut self,
        output: OutputKey,
        name: impl Into<String>,
        function: impl Into<OutputFunction>,
    ) -> Result<FunctionKey> {
        let name = validate_name(name)?;
        let var = self
            .outputs
            .get(output)
            .ok_or_else(|| FuzzyError::ForeignVariable(format!("{output:?}")))?;

        if self.function_by_name(output, &name).is_ok() {
            return Err(FuzzyError::DuplicateName(format!("{}.{name}", var.name)));
        }

        let key = self.functions.insert(NamedFunction {
            name,
            output,
            function: function.into(),
        });

        self.outputs[output].functions.push(key);

        Ok(key)
    }

    pub fn input_by_name(&self, name: &str) -> Result<VariableKey> {
        self.system.input_by_name(name)
    }

    pub fn output_by_name(&self, name: &str) -> Result<OutputKey> {
        self.outputs
            .iter()
            .find(|(_, var)| var.name == name)
            .map(|(key, _)| key)
            .ok_or_else(|| FuzzyError::VariableNotFound(name.to_owned()))
    }

    pub fn term_by_name(&self, var: VariableKey, name: &str) -> Result<TermKey> {
        self.system.term_by_name(var, name)
    }

    pub fn function_by_name(&self, output: OutputKey, name: &str) -> Result<FunctionKey> {
        let var = self
            .outputs
            .get(output)
            .ok_or_else(|| FuzzyError::ForeignVariable(format!("{output:?}")))?;

        var.functions
            .iter()
            .copied()
            .find(|key| self.functions[*key].name == name)
            .ok_or_else(|| FuzzyError::FunctionNotFound {
                variable: var.name.clone(),
                function: name.to_owned(),
            })
    }

    pub fn output(&self, key: OutputKey) -> Option<&SugenoVariable> {
        self.outputs.get(key)
    }

    pub fn function(&self, key: FunctionKey) -> Option<&NamedFunction> {
        self.functions.get(key)
    }

    /// Output variable keys
    pub fn outputs(&self) -> impl Iterator<Item = OutputKey> + '_ {
        self.outputs.keys()
    }

    /// Creates a rule after checking that every key it mentions belongs to
    /// this system.
    pub fn rule(&self, condition: Condition, output: OutputKey, function: FunctionKey) -> Result<SugenoRule> {
        let rule = SugenoRule {
            condition,
            conclusion: Conclusion {
                variable: output,
                value: function,
            },
        };

        self.validate_rule(&rule)?;

        Ok(rule)
    }

    pub fn parse_rule(&self, rule: &str) -> Result<SugenoRule> {
        let inputs = self.system.input_vocabulary();
        let outputs: Vec<_> = self
            .outputs
            .iter()
            .map(|(key, var)| Vocabulary {
                name: var.name.as_str(),
                key,
                values: var
                    .functions
                    .iter()
                    .map(|function| (self.functions[*function].name.as_str(), *function))
                    .collect(),
            })
            .collect();
        let (condition, conclusion) = parse_rule(rule, &inputs, &outputs)?;

        debug!(rule, "parsed sugeno rule");

        Ok(SugenoRule { condition, conclusion })
    }

    /// Appends a rule. Rules made by another system are rejected.
    pub fn add_rule(&mut self, rule: SugenoRule) -> Result<()> {
        self.validate_rule(&rule)?;
        self.rules.push(rule);

        Ok(())
    }

    pub fn rules(&self) -> &Rules<SugenoRule> {
        &self.rules
    }

    fn validate_rule(&self, rule: &SugenoRule) -> Result<()> {
        self.system.validate_condition(&rule.condition)?;

        let Conclusion { variable, value } = rule.conclusion;
        let var = self
            .outputs
            .get(variable)
            .ok_or_else(|| FuzzyError::ForeignVariable(format!("{variable:?}")))?;

        if !self.functions.get(value).is_some_and(|f| f.output == variable) {
            return Err(FuzzyError::ForeignTerm(var.name.clone()));
        }

        Ok(())
    }

    /// Truth value of every rule, in rule order
    pub fn evaluate_conditions(&self, fuzzified: &Fuzzified) -> Result<Vec<f64>> {
        self.system.evaluate_conditions(&self.rules, fuzzified)
    }

    /// Value of every output function for the crisp inputs
    pub fn evaluate_functions(&self, inputs: &Inputs) -> HashMap<FunctionKey, f64> {
        self.functions
            .iter()
            .map(|(key, function)| {
                let value = function.function.evaluate(inputs);

                trace!(function = function.name(), value);

                (key, value)
            })
            .collect()
    }

    /// Weighted average of the concluded function values per output variable.
    /// An output variable whose rules all have zero truth yields 0.
    pub fn combine_result(&self, truths: &[f64], function_values: &HashMap<FunctionKey, f64>) -> Outputs<OutputKey> {
        let mut sums: HashMap<OutputKey, (f64, f64)> = self.outputs.keys().map(|key| (key, (0., 0.))).collect();

        for (rule, truth) in self.rules.iter().zip(truths) {
            let Conclusion { variable, value } = rule.conclusion;
            let (num, den) = sums.get_mut(&variable).expect("rule outputs are validated");

            *num += truth * function_values[&value];
            *den += truth;
        }

        let results = sums
            .into_iter()
            .map(|(key, (num, den))| {
                let result = if den == 0. { 0. } else { num / den };

                trace!(variable = self.outputs[key].name(), result);

                (key, result)
            })
            .collect();

        Outputs::new(results)
    }

    pub fn calculate(&self, inputs: &Inputs) -> Result<Outputs<OutputKey>> {
        if self.rules.is_empty() {
            return Err(FuzzyError::NoRules);
        }

        debug!(rules = self.rules.len(), "sugeno calculation");

        let fuzzified = self.system.fuzzify(inputs)?;
        let truths = self.evaluate_conditions(&fuzzified)?;
        let function_values = self.evaluate_functions(inputs);

        Ok(self.combine_result(&truths, &function_values))
    }
}
