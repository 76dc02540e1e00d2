use crate::error::{MixingError, Result};
use crate::math::matrix::ContactMatrix;

/// Baseline transmission rate giving a target R0 for contact matrix C and mean
/// infectious duration 1/gamma.
///
/// R0 = spectral_radius(beta * C / gamma), so beta = R0 * gamma / spectral_radius(C).
pub fn transmission_rate_for_r0(contact: &ContactMatrix, gamma: f64, r0: f64) -> Result<f64> {
    let rho = contact.spectral_radius();
    if !(rho > 0.0) {
        return Err(MixingError::DegenerateInput(format!(
            "contact matrix has spectral radius {rho}"
        )));
    }
    Ok(r0 * gamma / rho)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn scales_with_spectral_radius() {
        let c = ContactMatrix::from_rows(vec![vec![4.0, 0.0], vec![0.0, 2.0]]).unwrap();
        assert_relative_eq!(transmission_rate_for_r0(&c, 0.2, 2.0).unwrap(), 0.1, epsilon = 1e-9);
    }

    #[test]
    fn zero_matrix_is_degenerate() {
        assert!(transmission_rate_for_r0(&ContactMatrix::zeros(2), 0.2, 2.0).is_err());
    }
}
