//! Per-age counts to per-bracket counts, and fine brackets to coarse ones.

use std::collections::BTreeMap;

use log::debug;

use crate::error::{MixingError, Result};
use crate::model::brackets::{AgeBrackets, AgeToBracket};

/// Single-year age -> count or weight.
pub type AgeCount = BTreeMap<usize, f64>;

/// Bracket id -> count or weight.
pub type BracketCount = BTreeMap<usize, f64>;

/// Sum per-age counts into their brackets.
///
/// The result has an entry for every bracket in `age_by_brackets`, zero when no
/// input age falls in it. Every age in `ages` must have a bracket.
pub fn aggregate_ages(ages: &AgeCount, age_by_brackets: &AgeToBracket) -> Result<BracketCount> {
    let mut aggregate: BracketCount =
        age_by_brackets.bracket_ids().into_iter().map(|b| (b, 0.0)).collect();
    for (&a, &count) in ages {
        let b = age_by_brackets.bracket_of(a)?;
        *aggregate.entry(b).or_insert(0.0) += count;
    }
    Ok(aggregate)
}

/// Re-aggregate counts bucketed by `larger_brackets` into the coarser
/// `smaller_brackets`.
///
/// Only coarsening is possible: a scheme with more brackets than the source
/// fails with [`MixingError::UnsupportedDirection`]. Each larger bracket must
/// sit entirely inside one smaller bracket; this is checked up front and a split
/// bracket fails with [`MixingError::StructuralMismatch`]. The whole value of a
/// larger bracket then goes to the smaller bracket holding its first age.
pub fn aggregate_conversion(
    larger_aggregate_ages: &BracketCount,
    larger_brackets: &AgeBrackets,
    smaller_brackets: &AgeBrackets,
    age_by_larger: &AgeToBracket,
    age_by_smaller: &AgeToBracket,
) -> Result<BracketCount> {
    check_direction(larger_brackets, smaller_brackets)?;
    check_alignment(larger_brackets, age_by_larger, age_by_smaller)?;
    fold_into_smaller(larger_aggregate_ages, larger_brackets, smaller_brackets, age_by_smaller)
}

fn check_direction(larger: &AgeBrackets, smaller: &AgeBrackets) -> Result<()> {
    if larger.len() < smaller.len() {
        return Err(MixingError::UnsupportedDirection {
            larger: larger.len(),
            smaller: smaller.len(),
        });
    }
    Ok(())
}

/// Every larger bracket must map, age by age, to a single smaller bracket, and
/// `age_by_larger` must agree with the larger scheme.
pub fn check_alignment(
    larger_brackets: &AgeBrackets,
    age_by_larger: &AgeToBracket,
    age_by_smaller: &AgeToBracket,
) -> Result<()> {
    for (lb, ages) in larger_brackets.iter() {
        let Some(&first) = ages.first() else {
            return Err(MixingError::EmptyBracket(lb));
        };
        let target = age_by_smaller.bracket_of(first)?;
        for &a in ages {
            if age_by_larger.get(a) != Some(lb) {
                return Err(MixingError::StructuralMismatch(format!(
                    "age {a} of bracket {lb} is indexed under bracket {:?}",
                    age_by_larger.get(a)
                )));
            }
            let sb = age_by_smaller.bracket_of(a)?;
            if sb != target {
                return Err(MixingError::StructuralMismatch(format!(
                    "bracket {lb} is split between brackets {target} and {sb}"
                )));
            }
        }
    }
    Ok(())
}

fn fold_into_smaller(
    larger_aggregate_ages: &BracketCount,
    larger_brackets: &AgeBrackets,
    smaller_brackets: &AgeBrackets,
    age_by_smaller: &AgeToBracket,
) -> Result<BracketCount> {
    let mut smaller: BracketCount = smaller_brackets.ids().map(|b| (b, 0.0)).collect();
    for (lb, ages) in larger_brackets.iter() {
        let representative = *ages.first().ok_or(MixingError::EmptyBracket(lb))?;
        let sb = age_by_smaller.bracket_of(representative)?;
        let value = larger_aggregate_ages
            .get(&lb)
            .copied()
            .ok_or_else(|| MixingError::missing("count for bracket", lb))?;
        *smaller
            .get_mut(&sb)
            .ok_or_else(|| MixingError::missing("smaller bracket", sb))? += value;
    }
    Ok(smaller)
}

/// A fine and a coarse bracket scheme held together with both age indexes,
/// checked once for direction and alignment.
#[derive(Debug, Clone)]
pub struct BracketConversion {
    larger: AgeBrackets,
    smaller: AgeBrackets,
    age_by_larger: AgeToBracket,
    age_by_smaller: AgeToBracket,
}

impl BracketConversion {
    pub fn new(larger: AgeBrackets, smaller: AgeBrackets) -> Result<Self> {
        check_direction(&larger, &smaller)?;
        let age_by_larger = larger.age_by_brackets();
        let age_by_smaller = smaller.age_by_brackets();
        check_alignment(&larger, &age_by_larger, &age_by_smaller)?;
        debug!(
            "bracket conversion ready: {} brackets -> {} brackets",
            larger.len(),
            smaller.len()
        );
        Ok(Self { larger, smaller, age_by_larger, age_by_smaller })
    }

    pub fn convert(&self, larger_aggregate_ages: &BracketCount) -> Result<BracketCount> {
        fold_into_smaller(larger_aggregate_ages, &self.larger, &self.smaller, &self.age_by_smaller)
    }

    pub fn larger(&self) -> &AgeBrackets {
        &self.larger
    }

    pub fn smaller(&self) -> &AgeBrackets {
        &self.smaller
    }

    pub fn age_by_larger(&self) -> &AgeToBracket {
        &self.age_by_larger
    }

    pub fn age_by_smaller(&self) -> &AgeToBracket {
        &self.age_by_smaller
    }
}
