//! Access-control lists attached to a device asset.
//!
//! An [`AccessList`] is a set: membership matters, order and duplicates do
//! not. On the wire it is a JSON array in ascending order, so the same set
//! always encodes to the same bytes. `null` and a missing field both decode
//! as the empty list.

use std::collections::btree_set;
use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};

/// A set of principals (device ids or user emails).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct AccessList(BTreeSet<String>);

impl AccessList {
    /// Create an empty access list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether `principal` is a member.
    pub fn contains(&self, principal: &str) -> bool {
        self.0.contains(principal)
    }

    /// Add a principal. Returns `false` if it was already present.
    pub fn insert(&mut self, principal: impl Into<String>) -> bool {
        self.0.insert(principal.into())
    }

    /// Remove a principal. Returns `false` if it was absent.
    pub fn remove(&mut self, principal: &str) -> bool {
        self.0.remove(principal)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate members in ascending order.
    pub fn iter(&self) -> btree_set::Iter<'_, String> {
        self.0.iter()
    }

    /// The members as an ordered sequence.
    pub fn to_vec(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }
}

impl<'de> Deserialize<'de> for AccessList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let entries = Option::<Vec<String>>::deserialize(deserializer)?;
        Ok(entries.into_iter().flatten().collect())
    }
}

impl<S: Into<String>> FromIterator<S> for AccessList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>> Extend<S> for AccessList {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.0.extend(iter.into_iter().map(Into::into));
    }
}

impl<'a> IntoIterator for &'a AccessList {
    type Item = &'a String;
    type IntoIter = btree_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for AccessList {
    type Item = String;
    type IntoIter = btree_set::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
