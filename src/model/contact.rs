//! Contact-matrix transforms: bracket aggregation, total <-> per-capita
//! conversion, homogeneous community mixing and per-setting combination.

use std::collections::BTreeMap;
use std::fmt::Display;

use log::{debug, warn};

use crate::error::{MixingError, Result};
use crate::math::matrix::ContactMatrix;
use crate::model::brackets::AgeToBracket;

/// Block-sum a symmetric per-age matrix into a per-bracket matrix.
///
/// Cell `[bi][bj]` of the result is the sum of `m[i][j]` over every age `i` in
/// bracket `bi` and `j` in bracket `bj`, so total volume is preserved. Only
/// meaningful for total-contact matrices: do not use it on a community matrix,
/// whose entries are per-capita rates.
///
/// Every row index of `m` needs a bracket, and bracket ids must run `0..n`.
pub fn aggregate_matrix(
    m: &ContactMatrix,
    age_by_brackets: &AgeToBracket,
) -> Result<ContactMatrix> {
    let ids = age_by_brackets.bracket_ids();
    let num_brackets = ids.len();
    if let Some((expected, found)) = ids.iter().enumerate().find(|(i, b)| *i != **b) {
        return Err(MixingError::StructuralMismatch(format!(
            "bracket ids must be 0..{num_brackets}, found {found} where {expected} was expected"
        )));
    }

    let bracket: Vec<usize> = (0..m.dim())
        .map(|age| age_by_brackets.bracket_of(age))
        .collect::<Result<_>>()?;

    let mut out = ContactMatrix::zeros(num_brackets);
    for (i, row) in m.rows().iter().enumerate() {
        for (j, v) in row.iter().enumerate() {
            out[(bracket[i], bracket[j])] += v;
        }
    }
    debug!("aggregated {0}x{0} matrix into {1}x{1}", m.dim(), num_brackets);
    Ok(out)
}

/// Per-capita matrix for the average member of each cohort: row `a` of the
/// total-contact matrix divided by the size of cohort `a`.
///
/// Cohorts missing from `aggregate_sizes` keep their row as is. A listed size
/// that is zero, negative or not finite is an error, as is a cohort index past
/// the matrix dimension.
pub fn to_asymmetric(
    symmetric_matrix: &ContactMatrix,
    aggregate_sizes: &BTreeMap<usize, f64>,
) -> Result<ContactMatrix> {
    let mut m = symmetric_matrix.clone();
    for (&a, &size) in aggregate_sizes {
        if !(size.is_finite() && size > 0.0) {
            return Err(MixingError::DegenerateInput(format!("cohort {a} has size {size}")));
        }
        scale_row(&mut m, a, 1.0 / size)?;
    }
    Ok(m)
}

/// Inverse of [`to_asymmetric`]: row `a` multiplied by the size of cohort `a`.
pub fn to_symmetric(
    asymmetric_matrix: &ContactMatrix,
    aggregate_sizes: &BTreeMap<usize, f64>,
) -> Result<ContactMatrix> {
    let mut m = asymmetric_matrix.clone();
    for (&a, &size) in aggregate_sizes {
        if !(size.is_finite() && size >= 0.0) {
            return Err(MixingError::DegenerateInput(format!("cohort {a} has size {size}")));
        }
        scale_row(&mut m, a, size)?;
    }
    Ok(m)
}

fn scale_row(m: &mut ContactMatrix, row: usize, factor: f64) -> Result<()> {
    if row >= m.dim() {
        return Err(MixingError::ShapeMismatch {
            expected: m.dim(),
            found: format!("cohort index {row}"),
        });
    }
    m.row_mut(row).iter_mut().for_each(|v| *v *= factor);
    Ok(())
}

/// Homogeneous mixing matrix: everyone meets everyone else in proportion to
/// population size.
///
/// `M[i][j] = (n_i * n_j - [i == j] * n_i) / (N - 1)` where `N` is the total
/// population. The result is symmetric. Requires `N > 1`.
pub fn symmetric_community_matrix(ages: &[f64]) -> Result<ContactMatrix> {
    let total: f64 = ages.iter().sum();
    if !(total > 1.0) {
        return Err(MixingError::DegenerateInput(format!(
            "community mixing needs a population above 1, got {total}"
        )));
    }
    let denom = total - 1.0;
    Ok(ContactMatrix::from_fn(ages.len(), |i, j| {
        let mut v = ages[i] * ages[j];
        if i == j {
            v -= ages[i];
        }
        v / denom
    }))
}

/// Weighted sum of per-setting matrices.
///
/// Only settings listed in `weight_by_setting` contribute; each of them needs a
/// `num_brackets x num_brackets` matrix in `matrix_by_setting`.
pub fn combine<K: Ord + Display>(
    matrix_by_setting: &BTreeMap<K, ContactMatrix>,
    weight_by_setting: &BTreeMap<K, f64>,
    num_brackets: usize,
) -> Result<ContactMatrix> {
    for setting in matrix_by_setting.keys().filter(|s| !weight_by_setting.contains_key(*s)) {
        warn!("no weight for setting {setting}, its matrix is left out");
    }

    let mut m = ContactMatrix::zeros(num_brackets);
    for (setting, &w) in weight_by_setting {
        let layer = matrix_by_setting
            .get(setting)
            .ok_or_else(|| MixingError::missing("matrix for setting", setting))?;
        if layer.dim() != num_brackets {
            return Err(MixingError::ShapeMismatch {
                expected: num_brackets,
                found: format!("{0}x{0} for setting {setting}", layer.dim()),
            });
        }
        m.add_scaled(layer, w)?;
    }
    Ok(m)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::brackets::AgeBrackets;
    use approx::assert_relative_eq;

    fn matrix(rows: &[&[f64]]) -> ContactMatrix {
        ContactMatrix::from_rows(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    #[test]
    fn aggregate_matrix_block_sums() {
        let m = ContactMatrix::from_fn(3, |i, j| (i * 3 + j) as f64);
        let scheme = AgeBrackets::new([(0, vec![0, 1]), (1, vec![2])].into_iter().collect());
        let agg = aggregate_matrix(&m, &scheme.age_by_brackets()).unwrap();
        // rows 0,1 x cols 0,1 -> 0+1+3+4
        assert_eq!(agg.rows(), &[vec![8.0, 7.0], vec![13.0, 8.0]]);
        assert_eq!(agg.sum(), m.sum());
    }

    #[test]
    fn aggregate_matrix_needs_dense_ids() {
        let m = ContactMatrix::zeros(2);
        let sparse: AgeToBracket = [(0, 0), (1, 2)].into_iter().collect();
        assert!(matches!(aggregate_matrix(&m, &sparse), Err(MixingError::StructuralMismatch(_))));

        let short: AgeToBracket = [(0, 0)].into_iter().collect();
        assert!(matches!(aggregate_matrix(&m, &short), Err(MixingError::MissingKey { .. })));
    }

    #[test]
    fn asymmetric_divides_rows() {
        let m = matrix(&[&[4.0, 2.0], &[2.0, 6.0]]);
        let sizes: BTreeMap<usize, f64> = [(0, 2.0), (1, 4.0)].into_iter().collect();
        let a = to_asymmetric(&m, &sizes).unwrap();
        assert_eq!(a.rows(), &[vec![2.0, 1.0], vec![0.5, 1.5]]);
        assert_eq!(to_symmetric(&a, &sizes).unwrap(), m);
    }

    #[test]
    fn asymmetric_rejects_empty_cohort_and_bad_index() {
        let m = ContactMatrix::zeros(2);
        let zero: BTreeMap<usize, f64> = [(0, 0.0)].into_iter().collect();
        assert!(matches!(to_asymmetric(&m, &zero), Err(MixingError::DegenerateInput(_))));

        let outside: BTreeMap<usize, f64> = [(5, 1.0)].into_iter().collect();
        assert!(matches!(to_asymmetric(&m, &outside), Err(MixingError::ShapeMismatch { .. })));
    }

    #[test]
    fn community_matrix_values() {
        let m = symmetric_community_matrix(&[2.0, 3.0]).unwrap();
        assert_relative_eq!(m[(0, 0)], 0.5);
        assert_relative_eq!(m[(0, 1)], 1.5);
        assert_relative_eq!(m[(1, 0)], 1.5);
        assert_relative_eq!(m[(1, 1)], 1.5);
    }

    #[test]
    fn community_matrix_needs_population() {
        assert!(symmetric_community_matrix(&[1.0]).is_err());
        assert!(symmetric_community_matrix(&[]).is_err());
    }

    #[test]
    fn combine_weighted_settings() {
        let layers: BTreeMap<&str, ContactMatrix> = [
            ("a", matrix(&[&[1.0, 2.0], &[2.0, 1.0]])),
            ("b", matrix(&[&[3.0, 0.0], &[0.0, 3.0]])),
        ]
        .into_iter()
        .collect();
        let weights: BTreeMap<&str, f64> = [("a", 0.5), ("b", 0.5)].into_iter().collect();
        let m = combine(&layers, &weights, 2).unwrap();
        assert_eq!(m.rows(), &[vec![2.0, 1.0], vec![1.0, 2.0]]);
    }

    #[test]
    fn combine_ignores_unweighted_and_checks_shapes() {
        let layers: BTreeMap<&str, ContactMatrix> =
            [("a", matrix(&[&[1.0]])), ("b", ContactMatrix::zeros(2))].into_iter().collect();

        let only_a: BTreeMap<&str, f64> = [("a", 2.0)].into_iter().collect();
        assert_eq!(combine(&layers, &only_a, 1).unwrap().rows(), &[vec![2.0]]);

        let both: BTreeMap<&str, f64> = [("a", 1.0), ("b", 1.0)].into_iter().collect();
        assert!(matches!(
            combine(&layers, &both, 1),
            Err(MixingError::ShapeMismatch { expected: 1, .. })
        ));

        let missing: BTreeMap<&str, f64> = [("c", 1.0)].into_iter().collect();
        assert!(matches!(combine(&layers, &missing, 1), Err(MixingError::MissingKey { .. })));
    }
}
