//! Fuzzy inference with Mamdani and Sugeno systems.
//!
//! Variables, terms and rules are added to a system incrementally. Rules are
//! either built from keys or parsed from text such as
//! `if (service is poor) or (food is rancid) then tips is cheap`. A system
//! then maps crisp inputs to crisp outputs with [`MamdaniSystem::calculate`]
//! or [`SugenoSystem::calculate`].
//!
//! ```
//! use fuzzy_rules::*;
//!
//! # fn main() -> Result<(), FuzzyError> {
//! let mut fs = MamdaniSystem::new();
//!
//! let service = fs.add_input("service", 0. ..=10.)?;
//! let poor = fs.add_term(service, "poor", Triangular::new(-5., 0., 5.)?)?;
//! fs.add_term(service, "good", Triangular::new(0., 5., 10.)?)?;
//! fs.add_term(service, "excellent", Triangular::new(5., 10., 15.)?)?;
//!
//! let food = fs.add_input("food", 0. ..=10.)?;
//! let rancid = fs.add_term(food, "rancid", Trapezoid::new(0., 0., 1., 3.)?)?;
//! fs.add_term(food, "delicious", Trapezoid::new(7., 9., 10., 10.)?)?;
//!
//! let tips = fs.add_output("tips", 0. ..=30.)?;
//! let cheap = fs.add_term(tips, "cheap", Triangular::new(0., 5., 10.)?)?;
//! fs.add_term(tips, "average", Triangular::new(10., 15., 20.)?)?;
//! fs.add_term(tips, "generous", Triangular::new(20., 25., 30.)?)?;
//!
//! let rule = fs.rule(service.is(poor).or(food.is(rancid)), tips, cheap)?;
//! fs.add_rule(rule)?;
//!
//! for rule in [
//!     "if service is good then tips is average",
//!     "if (service is excellent) or (food is delicious) then tips is generous",
//! ] {
//!     let rule = fs.parse_rule(rule)?;
//!     fs.add_rule(rule)?;
//! }
//!
//! let outputs = fs.calculate(&Inputs::from([(service, 3.), (food, 8.)]))?;
//! let tip = outputs.get(tips).unwrap();
//!
//! assert!(tip > 5. && tip < 25.);
//! # Ok(())
//! # }
//! ```

mod condition;
mod config;
mod error;
mod inputs;
mod lexer;
mod linspace;
mod mamdani;
mod math;
mod membership;
mod names;
mod ops;
mod outputs;
mod parser;
mod rules;
mod sugeno;
mod system;
mod variable;

pub use condition::{Combination, Condition, Hedge, Operator, SingleCondition};
pub use config::{MamdaniConfig, SugenoConfig};
pub use error::{FuzzyError, ParseError, Result};
pub use inputs::Inputs;
pub use mamdani::MamdaniSystem;
pub use membership::{Composite, Constant, MembershipFunction, Normal, PiecewiseLinear, Trapezoid, Triangular};
pub use names::{is_valid_name, Named, KEYWORDS};
pub use ops::{
    AggregationOp, AndOp, CompositionOp, DefuzzificationOp, ImplicationOp, OrOp, CENTROID_SUBINTERVALS,
};
pub use outputs::Outputs;
pub use rules::{Conclusion, FuzzyRule, MamdaniRule, Rules, SugenoRule};
pub use sugeno::{FunctionKey, LinearFunction, NamedFunction, OutputFunction, OutputKey, SugenoSystem, SugenoVariable};
pub use system::{Fuzzified, FuzzySystem};
pub use variable::{FuzzyVariable, Term, TermKey, VariableKey, Variables};
