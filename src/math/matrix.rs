use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::error::{MixingError, Result};
use crate::math::linalg::spectral_radius_power_iteration;

/// Square contact matrix indexed by cohort (single-year age or bracket id) on
/// both axes.
///
/// The same type carries symmetric (total contact volume) and asymmetric
/// (per-capita rate) matrices; which one a value holds is up to the operation
/// that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct ContactMatrix {
    rows: Vec<Vec<f64>>,
}

impl ContactMatrix {
    /// Build from row vectors. Fails unless the input is non-empty and n x n.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n = rows.len();
        if n == 0 {
            return Err(MixingError::EmptyMatrix);
        }
        if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != n) {
            return Err(MixingError::NotSquare { rows: n, row, len: r.len() });
        }
        Ok(Self { rows })
    }

    pub fn zeros(n: usize) -> Self {
        Self { rows: vec![vec![0.0; n]; n] }
    }

    pub fn from_fn(n: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let rows = (0..n).map(|i| (0..n).map(|j| f(i, j)).collect()).collect();
        Self { rows }
    }

    /// Number of cohorts along each axis.
    pub fn dim(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.rows[i]
    }

    pub(crate) fn row_mut(&mut self, i: usize) -> &mut [f64] {
        &mut self.rows[i]
    }

    pub fn into_rows(self) -> Vec<Vec<f64>> {
        self.rows
    }

    /// Sum of every cell.
    pub fn sum(&self) -> f64 {
        self.rows.iter().flatten().sum()
    }

    pub fn scaled(&self, w: f64) -> Self {
        let rows = self.rows.iter().map(|r| r.iter().map(|v| v * w).collect()).collect();
        Self { rows }
    }

    /// `self += w * other`. Both matrices must have the same dimension.
    pub fn add_scaled(&mut self, other: &ContactMatrix, w: f64) -> Result<()> {
        if other.dim() != self.dim() {
            return Err(MixingError::ShapeMismatch {
                expected: self.dim(),
                found: format!("{0}x{0}", other.dim()),
            });
        }
        for (dst, src) in self.rows.iter_mut().zip(&other.rows) {
            for (d, s) in dst.iter_mut().zip(src) {
                *d += w * s;
            }
        }
        Ok(())
    }

    pub fn mul_vec(&self, x: &[f64]) -> Vec<f64> {
        self.rows
            .iter()
            .map(|r| r.iter().zip(x).map(|(a, b)| a * b).sum())
            .collect()
    }

    /// True when `|M[i][j] - M[j][i]| <= tol` for every pair.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        let n = self.dim();
        (0..n).all(|i| (i + 1..n).all(|j| (self.rows[i][j] - self.rows[j][i]).abs() <= tol))
    }

    /// Dominant eigenvalue, the quantity R0 scales with in the SEIR family of models.
    pub fn spectral_radius(&self) -> f64 {
        spectral_radius_power_iteration(self, 10_000, 1e-10)
    }
}

impl Index<(usize, usize)> for ContactMatrix {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        &self.rows[i][j]
    }
}

impl IndexMut<(usize, usize)> for ContactMatrix {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f64 {
        &mut self.rows[i][j]
    }
}

impl TryFrom<Vec<Vec<f64>>> for ContactMatrix {
    type Error = MixingError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self> {
        Self::from_rows(rows)
    }
}

impl From<ContactMatrix> for Vec<Vec<f64>> {
    fn from(m: ContactMatrix) -> Self {
        m.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_ragged_and_empty() {
        assert_eq!(ContactMatrix::from_rows(vec![]), Err(MixingError::EmptyMatrix));
        let err = ContactMatrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert_eq!(err, MixingError::NotSquare { rows: 2, row: 1, len: 1 });
    }

    #[test]
    fn add_scaled_checks_dimension() {
        let mut a = ContactMatrix::zeros(2);
        let b = ContactMatrix::zeros(3);
        assert!(matches!(
            a.add_scaled(&b, 1.0),
            Err(MixingError::ShapeMismatch { expected: 2, .. })
        ));

        let c = ContactMatrix::from_rows(vec![vec![1.0, 2.0], vec![2.0, 1.0]]).unwrap();
        a.add_scaled(&c, 2.0).unwrap();
        assert_eq!(a.rows(), &[vec![2.0, 4.0], vec![4.0, 2.0]]);
        assert_eq!(a.sum(), 12.0);
    }

    #[test]
    fn symmetry_check() {
        let sym = ContactMatrix::from_fn(4, |i, j| (i + j) as f64);
        assert!(sym.is_symmetric(0.0));
        let mut asym = sym.clone();
        asym[(0, 3)] += 1.0;
        assert!(!asym.is_symmetric(1e-9));
    }

    #[test]
    fn serde_round_trip_validates_shape() {
        let m = ContactMatrix::from_rows(vec![vec![1.0, 0.5], vec![0.5, 2.0]]).unwrap();
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "[[1.0,0.5],[0.5,2.0]]");
        let back: ContactMatrix = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
        assert!(serde_json::from_str::<ContactMatrix>("[[1.0,2.0],[3.0]]").is_err());
    }
}
