//! Identifier sets.

use std::collections::BTreeSet;
use std::collections::btree_set;

/// A set of subject identifiers.
///
/// Backed by a `BTreeSet`, so iteration yields identifiers in lexicographic
/// (byte) order. Callers must only rely on membership; the ordering is what
/// the keep-list writer uses to produce a sorted ID file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierSet(BTreeSet<String>);

impl IdentifierSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses newline-delimited identifiers: each line is trimmed and blank
    /// lines are skipped.
    pub fn from_lines(text: &str) -> Self {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    /// Inserts an identifier, returning `false` if it was already present.
    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        self.0.insert(id.into())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    #[must_use]
    pub fn intersection(&self, other: &IdentifierSet) -> IdentifierSet {
        // Walk the smaller set and probe the larger one.
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small
            .0
            .iter()
            .filter(|id| large.0.contains(*id))
            .cloned()
            .collect()
    }
}

impl FromIterator<String> for IdentifierSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a str> for IdentifierSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self(iter.into_iter().map(str::to_string).collect())
    }
}

impl<'a> IntoIterator for &'a IdentifierSet {
    type Item = &'a String;
    type IntoIter = btree_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Intersection of the three identifier sources.
pub fn intersect3(a: &IdentifierSet, b: &IdentifierSet, c: &IdentifierSet) -> IdentifierSet {
    a.intersection(b).intersection(c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn from_lines_trims_and_skips_blanks() {
        let ids = IdentifierSet::from_lines("  s1\n\ns2  \r\n   \ns1\n");
        assert_eq!(ids.len(), 2);
        assert!(ids.contains("s1"));
        assert!(ids.contains("s2"));
    }

    #[test]
    fn iteration_is_lexicographic() {
        let ids: IdentifierSet = ["10", "2", "1", "b", "A"].into_iter().collect();
        let ordered: Vec<&str> = ids.iter().collect();
        assert_eq!(ordered, vec!["1", "10", "2", "A", "b"]);
    }

    #[test]
    fn intersect3_keeps_only_shared() {
        let cov: IdentifierSet = ["1", "2"].into_iter().collect();
        let phe: IdentifierSet = ["2", "3"].into_iter().collect();
        let geno: IdentifierSet = ["2", "4"].into_iter().collect();
        let common = intersect3(&cov, &phe, &geno);
        assert_eq!(common.iter().collect::<Vec<_>>(), vec!["2"]);
    }

    proptest! {
        #[test]
        fn intersect3_is_argument_order_independent(
            a in proptest::collection::vec("[a-d][0-3]", 0..12),
            b in proptest::collection::vec("[a-d][0-3]", 0..12),
            c in proptest::collection::vec("[a-d][0-3]", 0..12),
        ) {
            let a: IdentifierSet = a.into_iter().collect();
            let b: IdentifierSet = b.into_iter().collect();
            let c: IdentifierSet = c.into_iter().collect();
            let abc = intersect3(&a, &b, &c);
            prop_assert_eq!(&abc, &intersect3(&c, &a, &b));
            prop_assert_eq!(&abc, &intersect3(&b, &c, &a));
            for id in abc.iter() {
                prop_assert!(a.contains(id) && b.contains(id) && c.contains(id));
            }
        }
    }
}
