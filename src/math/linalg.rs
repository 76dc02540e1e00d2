use crate::math::matrix::ContactMatrix;

/// Power iteration estimate of the spectral radius (dominant eigenvalue) of a
/// non-negative contact matrix.
///
/// The estimate is the Rayleigh quotient of the current iterate; iteration
/// stops once two successive estimates differ by less than `tol`.
pub fn spectral_radius_power_iteration(m: &ContactMatrix, max_iter: usize, tol: f64) -> f64 {
    let n = m.dim();
    if n == 0 {
        return 0.0;
    }

    let mut x = vec![1.0 / (n as f64); n];
    let mut estimate = 0.0;

    for _ in 0..max_iter {
        let y = m.mul_vec(&x);
        let num: f64 = y.iter().zip(&x).map(|(a, b)| a * b).sum();
        let den: f64 = x.iter().map(|v| v * v).sum();
        let lambda = if den > 0.0 { num / den } else { 0.0 };

        let norm = y.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            x = y.into_iter().map(|v| v / norm).collect();
        }
        if (lambda - estimate).abs() < tol {
            return lambda;
        }
        estimate = lambda;
    }
    estimate
}
