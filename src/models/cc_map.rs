//! Condition-category to diagnosis mapping
//!
//! A `CcMap` is owned by a single calculation and threaded by value through
//! mapping, edits and hierarchy resolution.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Mapping from CC code to the diagnosis codes that produced it
///
/// A CC is never stored with an empty diagnosis set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CcMap {
    inner: BTreeMap<String, BTreeSet<String>>,
}

impl CcMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `dx` produced `cc`
    pub fn insert(&mut self, cc: &str, dx: &str) {
        self.inner
            .entry(cc.to_string())
            .or_default()
            .insert(dx.to_string());
    }

    /// Remove `dx` from `cc`, dropping the CC when it becomes empty
    ///
    /// Returns true when the diagnosis was present.
    pub fn remove_diagnosis(&mut self, cc: &str, dx: &str) -> bool {
        let Some(codes) = self.inner.get_mut(cc) else {
            return false;
        };
        let removed = codes.remove(dx);
        if codes.is_empty() {
            self.inner.remove(cc);
        }
        removed
    }

    /// Remove a CC and all of its diagnoses
    pub fn remove_cc(&mut self, cc: &str) -> Option<BTreeSet<String>> {
        self.inner.remove(cc)
    }

    #[must_use]
    pub fn contains(&self, cc: &str) -> bool {
        self.inner.contains_key(cc)
    }

    /// Diagnoses recorded under a CC
    #[must_use]
    pub fn diagnoses(&self, cc: &str) -> Option<&BTreeSet<String>> {
        self.inner.get(cc)
    }

    /// CC codes in sorted order
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(String::as_str)
    }

    /// `(cc, dx)` pairs in sorted order
    #[must_use]
    pub fn pairs(&self) -> Vec<(String, String)> {
        self.inner
            .iter()
            .flat_map(|(cc, dxs)| dxs.iter().map(move |dx| (cc.clone(), dx.clone())))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeSet<String>)> {
        self.inner.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for CcMap {
    fn from_iter<T: IntoIterator<Item = (&'a str, &'a str)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (cc, dx) in iter {
            map.insert(cc, dx);
        }
        map
    }
}
