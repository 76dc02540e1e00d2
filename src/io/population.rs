use std::collections::btree_map::Entry;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::model::aggregate::AgeCount;

#[derive(Debug, Deserialize)]
struct AgeRow {
    age: usize,
    count: f64,
}

/// Load a single-year age distribution from a CSV file with columns `age,count`.
/// Negative counts are clamped to zero; an age listed twice is an error.
pub fn load_age_distribution_csv(path: impl AsRef<Path>) -> anyhow::Result<AgeCount> {
    let path = path.as_ref();
    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open age distribution CSV: {}", path.display()))?;
    let mut ages = AgeCount::new();
    for result in rdr.deserialize::<AgeRow>() {
        let row = result.with_context(|| format!("Bad row in {}", path.display()))?;
        match ages.entry(row.age) {
            Entry::Vacant(e) => {
                e.insert(row.count.max(0.0));
            }
            Entry::Occupied(_) => {
                anyhow::bail!("age {} listed twice in {}", row.age, path.display())
            }
        }
    }
    Ok(ages)
}
