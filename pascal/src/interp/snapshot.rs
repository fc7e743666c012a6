//! Final global state of a run

use super::env::Scope;
use super::Value;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// Name → value pairs in declaration order
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket<T> {
    entries: Vec<(String, T)>,
}

impl<T> Bucket<T> {
    pub fn new() -> Self {
        Bucket {
            entries: Vec::new(),
        }
    }

    fn insert(&mut self, name: &str, value: T) {
        self.entries.push((name.to_string(), value));
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }
}

impl<T> Default for Bucket<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Serialize> Serialize for Bucket<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Snapshot of the global scope after a successful run, partitioned by value kind.
///
/// Only global variables that were assigned at least once appear.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct RunResult {
    pub integers: Bucket<i64>,
    pub reals: Bucket<f64>,
    pub booleans: Bucket<bool>,
    pub strings: Bucket<String>,
}

impl RunResult {
    pub(crate) fn from_scope(scope: &Scope) -> Self {
        let mut result = RunResult::default();
        for binding in scope.bindings() {
            match &binding.value {
                Some(Value::Integer(n)) => result.integers.insert(&binding.name, *n),
                Some(Value::Real(x)) => result.reals.insert(&binding.name, *x),
                Some(Value::Boolean(b)) => result.booleans.insert(&binding.name, *b),
                Some(Value::Str(s)) => result.strings.insert(&binding.name, s.clone()),
                None => {}
            }
        }
        result
    }

    pub fn is_empty(&self) -> bool {
        self.integers.is_empty()
            && self.reals.is_empty()
            && self.booleans.is_empty()
            && self.strings.is_empty()
    }
}

impl fmt::Display for RunResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, n) in self.integers.iter() {
            writeln!(f, "{name}: INTEGER = {n}")?;
        }
        for (name, x) in self.reals.iter() {
            writeln!(f, "{name}: REAL = {x}")?;
        }
        for (name, b) in self.booleans.iter() {
            writeln!(f, "{name}: BOOLEAN = {b}")?;
        }
        for (name, s) in self.strings.iter() {
            writeln!(f, "{name}: STRING = '{s}'")?;
        }
        Ok(())
    }
}
