use std::collections::BTreeMap;

use crate::error::{MixingError, Result};

/// Scale the values of `d` so they sum to one.
///
/// A map whose values sum to zero has no distribution; it is returned
/// unchanged instead of being filled with NaN.
pub fn normalize<K: Ord + Clone>(d: &BTreeMap<K, f64>) -> BTreeMap<K, f64> {
    let total: f64 = d.values().sum();
    if total == 0.0 {
        return d.clone();
    }
    d.iter().map(|(k, v)| (k.clone(), v / total)).collect()
}

/// Normalized age profile of the ages `age_min..=age_max`.
///
/// Every age in the range must be present in `age_dictionary`.
pub fn norm_age_group(
    age_dictionary: &BTreeMap<usize, f64>,
    age_min: usize,
    age_max: usize,
) -> Result<BTreeMap<usize, f64>> {
    let group = (age_min..=age_max)
        .map(|a| {
            age_dictionary
                .get(&a)
                .map(|v| (a, *v))
                .ok_or_else(|| MixingError::missing("age", a))
        })
        .collect::<Result<BTreeMap<_, _>>>()?;
    Ok(normalize(&group))
}
