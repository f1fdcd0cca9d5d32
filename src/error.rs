use thiserror::Error;

use crate::ops::DefuzzificationOp;

/// The common error type used by this crate
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FuzzyError {
    /// A variable, term or function name is empty, contains characters other
    /// than letters, digits and `_`, or is a rule language keyword
    #[error("Invalid name: '{0}'")]
    InvalidName(String),

    /// The lower bound of a variable's domain is above its upper bound
    #[error("Invalid domain for '{name}': minimum {min} is greater than maximum {max}")]
    InvalidDomain { name: String, min: f64, max: f64 },

    /// A name is already taken in the scope it was added to
    #[error("Duplicate name: '{0}'")]
    DuplicateName(String),

    /// Membership function control points are not in ascending order
    #[error("Invalid control points: {0}")]
    InvalidControlPoints(String),

    /// A constant membership value outside of [0, 1]
    #[error("Constant membership value {0} is outside of [0, 1]")]
    ConstantOutOfRange(f64),

    /// A positional coefficient list that matches neither the number of
    /// inputs nor the number of inputs plus a constant
    #[error("Expected {expected} or {} coefficients, found {found}", .expected + 1)]
    CoefficientCount { expected: usize, found: usize },

    /// A key that does not refer to a variable of the expected kind in this
    /// system
    #[error("Variable is not part of this system: {0}")]
    ForeignVariable(String),

    /// A term or function key that is unknown or belongs to another variable
    #[error("Term does not belong to variable '{0}'")]
    ForeignTerm(String),

    /// An and/or combination built without any child conditions
    #[error("A combination of conditions needs at least one child")]
    EmptyCombination,

    #[error("Variable not found: '{0}'")]
    VariableNotFound(String),

    #[error("Term '{term}' not found in variable '{variable}'")]
    TermNotFound { variable: String, term: String },

    #[error("Function '{function}' not found in variable '{variable}'")]
    FunctionNotFound { variable: String, function: String },

    /// The number of supplied inputs differs from the number of input variables
    #[error("Expected {expected} input values, found {found}")]
    InputCount { expected: usize, found: usize },

    #[error("Value for the '{0}' variable is missing")]
    MissingInput(String),

    #[error("Value {value} for the '{variable}' variable is outside of [{min}, {max}]")]
    InputOutOfRange {
        variable: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Evaluation requires at least one rule
    #[error("There should be at least one rule")]
    NoRules,

    #[error("Defuzzification method {0:?} is not supported")]
    UnsupportedDefuzzification(DefuzzificationOp),

    /// A rule could not be parsed
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}

/// Errors produced while parsing the textual rule language
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Rule cannot be empty")]
    EmptyRule,

    /// Two lexemes share a spelling in a way that cannot be disambiguated
    #[error("Found more than one lexeme with the same name: '{0}'")]
    LexemeCollision(String),

    #[error("Unknown identifier: '{0}'")]
    UnknownIdentifier(String),

    #[error("'if' should be the first identifier")]
    MissingIf,

    #[error("'then' identifier not found")]
    MissingThen,

    #[error("Condition part of the rule not found")]
    EmptyCondition,

    #[error("Conclusion part of the rule not found")]
    EmptyConclusion,

    /// A `variable is ...` clause that ends early or lacks `is`
    #[error("Condition started with '{0}' is incorrect")]
    MalformedCondition(String),

    #[error("The variable '{0}' in the condition part must be an input variable")]
    NotAnInputVariable(String),

    #[error("The variable '{0}' in the conclusion part must be an output variable")]
    NotAnOutputVariable(String),

    /// A term that does not belong to the variable it is compared with
    #[error("Wrong identifier '{0}' for variable '{1}'")]
    TermMismatch(String, String),

    #[error("Lexeme '{0}' found at the wrong place in the condition part of the rule")]
    MisplacedLexeme(String),

    #[error("Parenthesis error")]
    UnbalancedParenthesis,

    #[error("And/or operations cannot be mixed at one nesting level")]
    MixedOperators,

    /// Parentheses in the condition part nest deeper than the given limit
    #[error("Parentheses cannot be nested more than {0} levels deep")]
    NestingTooDeep(usize),

    /// An `and`/`or` with nothing after it
    #[error("Error at '{0}' in the condition part")]
    DanglingOperator(String),

    #[error("'{1}' cannot go after '{0}'")]
    UnexpectedSequence(String, String),

    #[error("Conclusion part of the rule should be in form: 'variable is term'")]
    MalformedConclusion,
}

pub type Result<T, E = FuzzyError> = std::result::Result<T, E>;
