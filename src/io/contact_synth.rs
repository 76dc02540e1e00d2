use crate::math::matrix::ContactMatrix;

/// Synthetic per-age contact matrix for tests and demos.
///
/// Not meant to be realistic. The matrix is symmetric with the most contact on
/// the diagonal, decaying exponentially with age difference.
pub fn synthetic_contact_matrix(n_age: usize) -> ContactMatrix {
    ContactMatrix::from_fn(n_age, |i, j| {
        let d = i.abs_diff(j) as f64;
        10.0 * (-0.7 * d).exp() + 0.5
    })
}
