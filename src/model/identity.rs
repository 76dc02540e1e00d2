use std::collections::{BTreeMap, HashMap};

/// Anything that carries a single-year age, such as a synthesized person record.
pub trait Aged {
    fn age(&self) -> usize;
}

/// Identifiers grouped by age, from `(id, age)` pairs.
///
/// Every age from 0 to the oldest age present gets a list, empty or not. Ids
/// keep the order in which they were supplied. No input gives an empty index.
pub fn ids_by_age<I>(age_by_id: impl IntoIterator<Item = (I, usize)>) -> BTreeMap<usize, Vec<I>> {
    let pairs: Vec<(I, usize)> = age_by_id.into_iter().collect();
    let Some(max_age) = pairs.iter().map(|(_, age)| *age).max() else {
        return BTreeMap::new();
    };
    let mut index: BTreeMap<usize, Vec<I>> = (0..=max_age).map(|a| (a, Vec::new())).collect();
    for (id, age) in pairs {
        index.entry(age).or_default().push(id);
    }
    index
}

/// Identifiers grouped by the age on their record.
///
/// Only ages that occur get a bucket. Buckets come out in the order their age
/// was first seen, and ids within a bucket in input order.
pub fn uids_by_age<'a, I, R>(popdict: impl IntoIterator<Item = (I, &'a R)>) -> Vec<(usize, Vec<I>)>
where
    R: Aged + 'a,
{
    let mut slot: HashMap<usize, usize> = HashMap::new();
    let mut buckets: Vec<(usize, Vec<I>)> = Vec::new();
    for (uid, record) in popdict {
        let age = record.age();
        let i = *slot.entry(age).or_insert_with(|| {
            buckets.push((age, Vec::new()));
            buckets.len() - 1
        });
        buckets[i].1.push(uid);
    }
    buckets
}
