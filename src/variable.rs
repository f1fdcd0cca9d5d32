use std::ops::RangeInclusive;
use std::sync::Arc;

use slotmap::{new_key_type, SlotMap};

use crate::error::{FuzzyError, Result};
use crate::membership::MembershipFunction;
use crate::names::{validate_name, Named};

new_key_type! {
    /// A variable key
    pub struct VariableKey;

    /// A term key, unique across all variables of a system
    pub struct TermKey;
}

/// A linguistic variable over a closed numeric domain
#[derive(Debug)]
pub struct FuzzyVariable {
    name: String,
    min: f64,
    max: f64,
    terms: Vec<TermKey>,
}

impl FuzzyVariable {
    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    /// Term keys in insertion order
    pub fn terms(&self) -> &[TermKey] {
        &self.terms
    }
}

impl Named for FuzzyVariable {
    fn name(&self) -> &str {
        &self.name
    }
}

/// A named membership function owned by exactly one variable
#[derive(Debug)]
pub struct Term {
    name: String,
    variable: VariableKey,
    membership: Arc<dyn MembershipFunction>,
}

impl Term {
    /// The variable this term belongs to
    pub fn variable(&self) -> VariableKey {
        self.variable
    }

    pub fn membership(&self) -> &Arc<dyn MembershipFunction> {
        &self.membership
    }
}

impl Named for Term {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Storage for the fuzzy variables of a system and their terms
#[derive(Debug, Default)]
pub struct Variables {
    vars: SlotMap<VariableKey, FuzzyVariable>,
    terms: SlotMap<TermKey, Term>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: impl Into<String>, universe_range: RangeInclusive<f64>) -> Result<VariableKey> {
        let name = validate_name(name)?;
        let min = *universe_range.start();
        let max = *universe_range.end();

        // Also rejects NaN bounds
        if !(min <= max) {
            return Err(FuzzyError::InvalidDomain { name, min, max });
        }

        if self.by_name(&name).is_some() {
            return Err(FuzzyError::DuplicateName(name));
        }

        Ok(self.vars.insert(FuzzyVariable {
            name,
            min,
            max,
            terms: Vec::new(),
        }))
    }

    pub fn add_term(
        &mut self,
        var_key: VariableKey,
        name: impl Into<String>,
        membership: impl MembershipFunction + 'static,
    ) -> Result<TermKey> {
        let name = validate_name(name)?;
        let var = self
            .vars
            .get(var_key)
            .ok_or_else(|| FuzzyError::ForeignVariable(format!("{var_key:?}")))?;

        if self.term_by_name(var_key, &name).is_ok() {
            return Err(FuzzyError::DuplicateName(format!("{}.{name}", var.name)));
        }

        let key = self.terms.insert(Term {
            name,
            variable: var_key,
            membership: Arc::new(membership),
        });

        self.vars[var_key].terms.push(key);

        Ok(key)
    }

    pub fn get(&self, key: VariableKey) -> Option<&FuzzyVariable> {
        self.vars.get(key)
    }

    pub fn term(&self, key: TermKey) -> Option<&Term> {
        self.terms.get(key)
    }

    /// Terms of a variable in insertion order
    pub fn terms_of(&self, key: VariableKey) -> impl Iterator<Item = (TermKey, &Term)> + '_ {
        self.vars
            .get(key)
            .into_iter()
            .flat_map(|var| var.terms.iter())
            .map(move |term_key| (*term_key, &self.terms[*term_key]))
    }

    pub fn by_name(&self, name: &str) -> Option<VariableKey> {
        self.vars.iter().find(|(_, var)| var.name == name).map(|(key, _)| key)
    }

    pub fn term_by_name(&self, var_key: VariableKey, name: &str) -> Result<TermKey> {
        let var = self
            .vars
            .get(var_key)
            .ok_or_else(|| FuzzyError::ForeignVariable(format!("{var_key:?}")))?;

        self.terms_of(var_key)
            .find(|(_, term)| term.name == name)
            .map(|(key, _)| key)
            .ok_or_else(|| FuzzyError::TermNotFound {
                variable: var.name.clone(),
                term: name.to_owned(),
            })
    }

    /// Whether `term` exists and belongs to `var`
    pub fn owns(&self, var: VariableKey, term: TermKey) -> bool {
        self.terms.get(term).is_some_and(|t| t.variable == var)
    }

    pub(crate) fn name_of(&self, key: VariableKey) -> String {
        self.vars
            .get(key)
            .map_or_else(|| format!("{key:?}"), |var| var.name.clone())
    }
}
