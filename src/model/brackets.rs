use std::collections::{BTreeMap, BTreeSet};

use crate::error::{MixingError, Result};

/// Age bracket scheme: bracket id -> the single-year ages it contains, in order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AgeBrackets {
    brackets: BTreeMap<usize, Vec<usize>>,
}

impl AgeBrackets {
    /// Wrap a scheme as given. Nothing is checked; see [`AgeBrackets::validate`].
    pub fn new(brackets: BTreeMap<usize, Vec<usize>>) -> Self {
        Self { brackets }
    }

    /// Wrap a scheme and check that it partitions `0..=max_age`.
    pub fn try_new(brackets: BTreeMap<usize, Vec<usize>>) -> Result<Self> {
        let scheme = Self::new(brackets);
        scheme.validate()?;
        Ok(scheme)
    }

    /// Contiguous brackets from inclusive `(min_age, max_age)` bounds, with ids
    /// assigned `0..n` in the given order.
    pub fn from_bounds(bounds: &[(usize, usize)]) -> Result<Self> {
        let brackets = bounds
            .iter()
            .enumerate()
            .map(|(b, &(lo, hi))| (b, (lo..=hi).collect()))
            .collect();
        Self::try_new(brackets)
    }

    /// Number of brackets.
    pub fn len(&self) -> usize {
        self.brackets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brackets.is_empty()
    }

    pub fn get(&self, bracket: usize) -> Option<&[usize]> {
        self.brackets.get(&bracket).map(Vec::as_slice)
    }

    pub fn ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.brackets.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &[usize])> {
        self.brackets.iter().map(|(b, ages)| (*b, ages.as_slice()))
    }

    pub fn max_age(&self) -> Option<usize> {
        self.brackets.values().flatten().copied().max()
    }

    /// Human readable `lo-hi` label per bracket, in id order.
    pub fn labels(&self) -> Vec<String> {
        self.brackets
            .values()
            .map(|ages| match (ages.iter().min(), ages.iter().max()) {
                (Some(lo), Some(hi)) if lo == hi => lo.to_string(),
                (Some(lo), Some(hi)) => format!("{lo}-{hi}"),
                _ => String::new(),
            })
            .collect()
    }

    /// Check the scheme is a partition of `0..=max_age`: no bracket is empty,
    /// no age sits in two brackets and every age up to the maximum is covered.
    pub fn validate(&self) -> Result<()> {
        let mut owner: BTreeMap<usize, usize> = BTreeMap::new();
        for (&b, ages) in &self.brackets {
            if ages.is_empty() {
                return Err(MixingError::EmptyBracket(b));
            }
            for &a in ages {
                if let Some(first) = owner.insert(a, b) {
                    return Err(MixingError::BracketOverlap { age: a, first, second: b });
                }
            }
        }
        // owner keys are sorted, so the first key that is not its own index is a gap
        if let Some(age) = owner.keys().enumerate().find(|(i, a)| i != *a).map(|(i, _)| i) {
            return Err(MixingError::BracketGap { age });
        }
        Ok(())
    }

    pub fn age_by_brackets(&self) -> AgeToBracket {
        age_by_brackets(self)
    }
}

/// Inverse of an [`AgeBrackets`] scheme: single-year age -> bracket id.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AgeToBracket {
    map: BTreeMap<usize, usize>,
}

impl AgeToBracket {
    pub fn bracket_of(&self, age: usize) -> Result<usize> {
        self.map
            .get(&age)
            .copied()
            .ok_or_else(|| MixingError::missing("bracket for age", age))
    }

    pub fn get(&self, age: usize) -> Option<usize> {
        self.map.get(&age).copied()
    }

    /// Distinct bracket ids that at least one age maps to, ascending.
    pub fn bracket_ids(&self) -> BTreeSet<usize> {
        self.map.values().copied().collect()
    }

    pub fn num_brackets(&self) -> usize {
        self.bracket_ids().len()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.map.iter().map(|(a, b)| (*a, *b))
    }
}

impl FromIterator<(usize, usize)> for AgeToBracket {
    fn from_iter<T: IntoIterator<Item = (usize, usize)>>(iter: T) -> Self {
        Self { map: iter.into_iter().collect() }
    }
}

/// Map every age of every bracket to its bracket id.
///
/// Brackets are visited in id order, so an age listed in more than one bracket
/// ends up in the last of them. Use [`AgeBrackets::validate`] to reject such
/// schemes instead.
pub fn age_by_brackets(age_brackets: &AgeBrackets) -> AgeToBracket {
    age_brackets
        .iter()
        .flat_map(|(b, ages)| ages.iter().map(move |&a| (a, b)))
        .collect()
}
