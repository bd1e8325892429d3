//! Special functions for the Sommerfeld/Norton ground-wave model.

use crate::common::constants::{
    CPLX_01, FBAR_ASYMPTOTIC_SWITCH, SERIES_CUTOFF, SQRT_PI, TWO_OVER_SQRT_PI,
};
use num_complex::Complex64;

/// Sommerfeld attenuation function of the numerical distance `p`
/// (legacy `fbar`),
/// `F(p) = 1 - j sqrt(pi p) e^{-p} erfc(j sqrt(p))`.
///
/// Power series in `z = j sqrt(p)` for `|z| <= 3`, six-term asymptotic
/// expansion beyond, with the reflection term for `Re z < 0`. The series
/// truncation (1e-12 relative) and the switch radius are calibrated
/// against the legacy reference.
pub fn attenuation_function(p: Complex64) -> Complex64 {
    let mut z = CPLX_01 * p.sqrt();

    if z.norm() <= FBAR_ASYMPTOTIC_SWITCH {
        let zs = z * z;
        let mut sum = z;
        let mut pow = z;
        for i in 1..=100 {
            pow = -pow * zs / i as f64;
            let term = pow / (2.0 * i as f64 + 1.0);
            sum += term;
            let tms = (term * term.conj()).re;
            let sms = (sum * sum.conj()).re;
            if tms / sms < SERIES_CUTOFF {
                break;
            }
        }
        return 1.0 - (1.0 - sum * TWO_OVER_SQRT_PI) * z * zs.exp() * SQRT_PI;
    }

    let minus = z.re < 0.0;
    if minus {
        z = -z;
    }
    let zs = 0.5 / (z * z);
    let mut sum = Complex64::new(0.0, 0.0);
    let mut term = Complex64::new(1.0, 0.0);
    for i in 1..=6 {
        term = -term * (2.0 * i as f64 - 1.0) * zs;
        sum += term;
    }
    if minus {
        sum -= 2.0 * SQRT_PI * z * (z * z).exp();
    }
    -sum
}

#[cfg(test)]
mod tests {
    use super::attenuation_function;
    use num_complex::Complex64;

    #[test]
    fn small_numerical_distance_approaches_unity() {
        let f = attenuation_function(Complex64::new(1.0e-10, 0.0));
        assert!((f.re - 1.0).abs() <= 1.0e-4, "re = {}", f.re);
        assert!(f.im.abs() <= 1.0e-4);
    }

    #[test]
    fn large_real_distance_matches_leading_asymptotic_term() {
        let p = Complex64::new(1.0e3, 0.0);
        let f = attenuation_function(p);
        // F(p) ~ -1/(2p) - 3/(4p^2) for large p; the neglected
        // 15/(8p^3) term sits well below the tolerance at this distance
        let expected = -1.0 / (2.0 * p) - 3.0 / (4.0 * p * p);
        assert!((f - expected).norm() <= 1.0e-4 * expected.norm());
    }

    #[test]
    fn magnitude_decreases_with_numerical_distance() {
        let near = attenuation_function(Complex64::new(0.01, 0.0)).norm();
        let mid = attenuation_function(Complex64::new(1.0, 0.0)).norm();
        let far = attenuation_function(Complex64::new(50.0, 0.0)).norm();
        assert!(near > mid && mid > far);
    }

    #[test]
    fn series_and_asymptotic_branches_agree_near_the_switch() {
        // |z| = |j sqrt(p)| = 3 at p = 9; probe either side of the switch
        let inside = attenuation_function(Complex64::new(8.9, 0.1));
        let outside = attenuation_function(Complex64::new(9.1, 0.1));
        assert!(
            (inside - outside).norm() <= 0.05 * inside.norm().max(outside.norm()),
            "inside = {inside}, outside = {outside}"
        );
    }
}
