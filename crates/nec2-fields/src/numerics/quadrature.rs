//! Adaptive quadrature for oscillatory field integrands without closed
//! forms.
//!
//! This is the recursive-doubling Simpson/Romberg refinement shared by the
//! legacy `intx`, `hfk` and `rom2` integrators: evaluate with N and 2N
//! subintervals, compare the Richardson-extrapolated estimates, accept when
//! both real and imaginary parts converge, otherwise double the subinterval
//! count from the last accepted boundary, reusing endpoint samples. After
//! four consecutive accepted steps the interval is re-doubled to recover
//! speed on smooth stretches.

use crate::common::constants::{
    HALVING_STREAK, MAX_SUBDIVISIONS, QUADRATURE_TOLERANCE,
};
use num_complex::Complex64;

/// Relative convergence error of two successive estimates (legacy `test`),
/// with the denominator floored at `dmin` and a 1e-37 underflow guard.
pub(crate) fn convergence_error(coarse: Complex64, fine: Complex64, dmin: f64) -> (f64, f64) {
    let mut den = fine.re.abs();
    let im = fine.im.abs();
    if den < im {
        den = im;
    }
    if den < dmin {
        den = dmin;
    }
    if den < 1.0e-37 {
        return (0.0, 0.0);
    }
    (
        ((coarse.re - fine.re) / den).abs(),
        ((coarse.im - fine.im) / den).abs(),
    )
}

fn within_tolerance(coarse: Complex64, fine: Complex64, dmin: f64) -> bool {
    let (re, im) = convergence_error(coarse, fine, dmin);
    re <= QUADRATURE_TOLERANCE && im <= QUADRATURE_TOLERANCE
}

/// Integrate `N` complex components of `integrand` over `[a, b]` to the
/// engine tolerance. On exceeding the subdivision cap the best available
/// estimate is accepted and a step-size-limited diagnostic is emitted;
/// the result may be less accurate but the computation proceeds.
pub(crate) fn integrate_doubling<const N: usize, F>(
    mut integrand: F,
    a: f64,
    b: f64,
    dmin: f64,
    what: &str,
) -> [Complex64; N]
where
    F: FnMut(f64) -> [Complex64; N],
{
    let zero = Complex64::new(0.0, 0.0);
    let mut sum = [zero; N];
    let s = b - a;
    if s <= 0.0 {
        return sum;
    }

    let ep = s / (10.0 * MAX_SUBDIVISIONS as f64);
    let zend = b - ep;
    let mut z = a;
    let mut ns: usize = 1;
    let mut nt: i32 = 0;
    let mut dz = 0.0;
    let mut dzot = 0.0;

    let mut g1 = integrand(z);
    let mut g3 = [zero; N];
    let mut g5 = [zero; N];
    let mut t01 = [zero; N];
    let mut t10 = [zero; N];
    let mut t20 = [zero; N];
    let mut refine = true;

    loop {
        if refine {
            dz = s / ns as f64;
            if z + dz > b {
                dz = b - z;
                if dz.abs() <= ep {
                    return sum;
                }
            }
            dzot = dz * 0.5;
            g3 = integrand(z + dzot);
            g5 = integrand(z + dz);
        }

        // three-point estimate and its Richardson extrapolation
        let mut converged = true;
        for i in 0..N {
            let t00 = (g1[i] + g5[i]) * dzot;
            t01[i] = (t00 + g3[i] * dz) * 0.5;
            t10[i] = (t01[i] * 4.0 - t00) / 3.0;
            if !within_tolerance(t01[i], t10[i], dmin) {
                converged = false;
            }
        }

        if converged {
            for i in 0..N {
                sum[i] += t10[i];
            }
            nt += 2;
            z += dz;
            if z >= zend {
                return sum;
            }
            g1 = g5;
            if nt >= HALVING_STREAK && ns > 1 {
                ns /= 2;
                nt = 1;
            }
            refine = true;
            continue;
        }

        // five-point estimate
        let g2 = integrand(z + dz * 0.25);
        let g4 = integrand(z + dz * 0.75);
        let mut converged = true;
        for i in 0..N {
            let t02 = (t01[i] + (g2[i] + g4[i]) * dzot) * 0.5;
            let t11 = (t02 * 4.0 - t01[i]) / 3.0;
            t20[i] = (t11 * 16.0 - t10[i]) / 15.0;
            if !within_tolerance(t11, t20[i], dmin) {
                converged = false;
            }
        }

        if !converged {
            nt = 0;
            if ns < MAX_SUBDIVISIONS {
                ns *= 2;
                dz = s / ns as f64;
                dzot = dz * 0.5;
                g5 = g3;
                g3 = g2;
                refine = false;
                continue;
            }
            tracing::warn!(target: "nec2_fields::quadrature", z, what, "step size limited");
        }

        for i in 0..N {
            sum[i] += t20[i];
        }
        nt += 1;
        z += dz;
        if z >= zend {
            return sum;
        }
        g1 = g5;
        if nt >= HALVING_STREAK && ns > 1 {
            ns /= 2;
            nt = 1;
        }
        refine = true;
    }
}

#[cfg(test)]
mod tests {
    use super::{convergence_error, integrate_doubling};
    use crate::common::constants::QUADRATURE_TOLERANCE;
    use num_complex::Complex64;
    use std::f64::consts::PI;

    #[test]
    fn convergence_error_floors_denominator() {
        let coarse = Complex64::new(1.0, 0.0);
        let fine = Complex64::new(1.0e-6, 0.0);
        let (re, _) = convergence_error(coarse, fine, 0.5);
        assert!((re - (1.0 - 1.0e-6) / 0.5).abs() <= 1.0e-12);
    }

    #[test]
    fn convergence_error_guards_underflow() {
        let tiny = Complex64::new(1.0e-40, 1.0e-40);
        assert_eq!(convergence_error(tiny, tiny * 0.5, 0.0), (0.0, 0.0));
    }

    #[test]
    fn sinusoid_converges_to_closed_form_before_the_cap() {
        let mut evaluations = 0usize;
        let result: [Complex64; 1] = integrate_doubling(
            |z| {
                evaluations += 1;
                [Complex64::new((3.0 * z).sin(), (3.0 * z).cos())]
            },
            0.0,
            PI,
            0.0,
            "sinusoid",
        );
        // integral of sin(3z) over [0, pi] is 2/3, of cos(3z) is 0
        assert!(
            (result[0].re - 2.0 / 3.0).abs() <= QUADRATURE_TOLERANCE,
            "re = {}",
            result[0].re
        );
        assert!(result[0].im.abs() <= QUADRATURE_TOLERANCE);
        // far fewer samples than the worst-case subdivision count
        assert!(evaluations < 4096, "evaluations = {evaluations}");
    }

    #[test]
    fn oscillatory_kernel_with_many_periods_still_converges() {
        let result: [Complex64; 1] = integrate_doubling(
            |z| [Complex64::new((40.0 * z).cos(), 0.0)],
            0.0,
            1.0,
            0.0,
            "fast cosine",
        );
        let expected = (40.0f64).sin() / 40.0;
        assert!((result[0].re - expected).abs() <= 5.0 * QUADRATURE_TOLERANCE);
    }

    #[test]
    fn degenerate_interval_integrates_to_zero() {
        let result: [Complex64; 2] =
            integrate_doubling(|_| [Complex64::new(1.0, 1.0); 2], 1.0, 1.0, 0.0, "empty");
        assert_eq!(result[0], Complex64::new(0.0, 0.0));
        assert_eq!(result[1], Complex64::new(0.0, 0.0));
    }
}
