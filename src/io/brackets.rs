use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::model::brackets::AgeBrackets;

#[derive(Debug, Deserialize)]
struct BracketRow {
    bracket: usize,
    min_age: usize,
    max_age: usize,
}

/// Load an age bracket scheme from a CSV file with columns
/// `bracket,min_age,max_age` (bounds inclusive). The scheme must partition the
/// ages from 0 up to the oldest bracket bound.
pub fn load_age_brackets_csv(path: impl AsRef<Path>) -> anyhow::Result<AgeBrackets> {
    let path = path.as_ref();
    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open age bracket CSV: {}", path.display()))?;
    let mut brackets: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for result in rdr.deserialize::<BracketRow>() {
        let row = result.with_context(|| format!("Bad row in {}", path.display()))?;
        anyhow::ensure!(
            row.min_age <= row.max_age,
            "bracket {} has min_age > max_age",
            row.bracket
        );
        anyhow::ensure!(
            brackets.insert(row.bracket, (row.min_age..=row.max_age).collect()).is_none(),
            "bracket {} listed twice in {}",
            row.bracket,
            path.display()
        );
    }
    AgeBrackets::try_new(brackets)
        .with_context(|| format!("Invalid age brackets in {}", path.display()))
}
