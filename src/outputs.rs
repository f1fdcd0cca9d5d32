use std::collections::HashMap;
use std::hash::Hash;

/// Crisp results, one per output variable
#[derive(Clone, Debug, PartialEq)]
pub struct Outputs<K: Eq + Hash>(HashMap<K, f64>);

impl<K: Copy + Eq + Hash> Outputs<K> {
    pub(crate) fn new(values: HashMap<K, f64>) -> Self {
        Self(values)
    }

    pub fn get(&self, var: K) -> Option<f64> {
        self.0.get(&var).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, f64)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }
}
