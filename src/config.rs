//! Method selection for the inference pipelines.
//!
//! Both structures deserialize with defaults for missing fields, so a
//! partial document is enough:
//!
//! ```
//! # use fuzzy_rules::*;
//! let config: MamdaniConfig = serde_json::from_str(r#"{ "and": "prod", "aggregation": "sum" }"#).unwrap();
//!
//! assert_eq!(config.and, AndOp::Prod);
//! assert_eq!(config.or, OrOp::Max);
//! assert_eq!(config.aggregation, AggregationOp::Sum);
//! ```

use serde::{Deserialize, Serialize};

use crate::ops::{AggregationOp, AndOp, DefuzzificationOp, ImplicationOp, OrOp};

/// Methods used by a Mamdani system
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MamdaniConfig {
    pub and: AndOp,
    pub or: OrOp,
    pub implication: ImplicationOp,
    pub aggregation: AggregationOp,
    pub defuzzification: DefuzzificationOp,
}

/// Methods used by a Sugeno system
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SugenoConfig {
    pub and: AndOp,
    pub or: OrOp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MamdaniConfig::default();

        assert_eq!(config.and, AndOp::Min);
        assert_eq!(config.or, OrOp::Max);
        assert_eq!(config.implication, ImplicationOp::Min);
        assert_eq!(config.aggregation, AggregationOp::Max);
        assert_eq!(config.defuzzification, DefuzzificationOp::Cog);
        assert_eq!(SugenoConfig::default(), SugenoConfig { and: AndOp::Min, or: OrOp::Max });
    }

    #[test]
    fn test_json() {
        let config = MamdaniConfig {
            implication: ImplicationOp::Prod,
            defuzzification: DefuzzificationOp::Mom,
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();

        assert!(json.contains(r#""implication":"prod""#));
        assert!(json.contains(r#""defuzzification":"mom""#));
        assert_eq!(serde_json::from_str::<MamdaniConfig>(&json).unwrap(), config);

        let sugeno: SugenoConfig = serde_json::from_str(r#"{ "or": "prob_or" }"#).unwrap();

        assert_eq!(sugeno.and, AndOp::Min);
        assert_eq!(sugeno.or, OrOp::ProbOr);
        assert!(serde_json::from_str::<SugenoConfig>(r#"{ "and": "minimum" }"#).is_err());
    }
}
