//! Near-field sampling over rectangular or spherical grids (legacy
//! `nfpat`) and the total-field reduction (legacy `Near_Field_Total`).

use crate::common::constants::DEG_TO_RAD;
use crate::domain::errors::FieldError;
use crate::sampling::assembly::FieldEngine;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Grid coordinate system. For `Rectangular` the axes are x, y, z in
/// physical units. For `Spherical` axis 0 is the radial distance in
/// physical units, axis 1 the azimuth and axis 2 the elevation-from-zenith
/// angle, both in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GridKind {
    Rectangular,
    Spherical,
}

/// Sampling grid: `count` points per axis starting at `start` with
/// spacing `step`. Axis 0 varies fastest in the output ordering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub kind: GridKind,
    pub start: [f64; 3],
    pub step: [f64; 3],
    pub count: [usize; 3],
}

impl GridSpec {
    pub fn len(&self) -> usize {
        self.count[0] * self.count[1] * self.count[2]
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldQuantity {
    Electric,
    Magnetic,
}

/// Reduction of a complex field vector to a real total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TotalFieldMode {
    /// Time-frozen field at the given phase angle in radians; the legacy
    /// snapshot display is `phase = 0`.
    Snapshot { phase: f64 },
    /// Peak of the rotating total field vector over a full cycle.
    Peak,
}

/// Sampled near-field pattern, one entry per grid point in axis-0-fastest
/// order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearFieldPattern {
    pub quantity: FieldQuantity,
    /// Field point coordinates in physical units.
    pub points: Vec<[f64; 3]>,
    /// Component magnitudes.
    pub magnitude: Vec<[f64; 3]>,
    /// Component phase angles in radians.
    pub phase: Vec<[f64; 3]>,
    /// Real component values at the reduction instant.
    pub component: Vec<[f64; 3]>,
    /// Total field vector value per point.
    pub total: Vec<f64>,
    /// Largest total over the grid.
    pub max_total: f64,
    /// Largest distance of any field point from the origin.
    pub r_max: f64,
    /// Freshness flag for consumers holding a previously sampled pattern;
    /// set when a full grid pass completes.
    pub valid: bool,
}

/// Total field vector reduction at one point: the instantaneous (or
/// peak-instant) real components and the total magnitude.
pub fn total_field_sample(e: [Complex64; 3], mode: TotalFieldMode) -> ([f64; 3], f64) {
    match mode {
        TotalFieldMode::Snapshot { phase } => {
            let comp = [
                e[0].norm() * (phase + e[0].arg()).cos(),
                e[1].norm() * (phase + e[1].arg()).cos(),
                e[2].norm() * (phase + e[2].arg()).cos(),
            ];
            let total = (comp[0] * comp[0] + comp[1] * comp[1] + comp[2] * comp[2]).sqrt();
            (comp, total)
        }
        TotalFieldMode::Peak => {
            let m = [e[0].norm(), e[1].norm(), e[2].norm()];
            let f = [e[0].arg(), e[1].arg(), e[2].arg()];
            let m2 = [m[0] * m[0], m[1] * m[1], m[2] * m[2]];
            let cp = m2[0] * (2.0 * f[0]).cos() + m2[1] * (2.0 * f[1]).cos()
                + m2[2] * (2.0 * f[2]).cos();
            let sp = m2[0] * (2.0 * f[0]).sin() + m2[1] * (2.0 * f[1]).sin()
                + m2[2] * (2.0 * f[2]).sin();
            let tp = (cp * cp + sp * sp).sqrt();
            let wt = (-sp).atan2(cp) / 2.0;
            let comp = [
                m[0] * (wt + f[0]).cos(),
                m[1] * (wt + f[1]).cos(),
                m[2] * (wt + f[2]).cos(),
            ];
            let total = ((m2[0] + m2[1] + m2[2] + tp) / 2.0).sqrt();
            (comp, total)
        }
    }
}

impl FieldEngine<'_> {
    /// Sample the E or H field over a grid of points. Grid coordinates
    /// are physical; they are converted to wavelengths before evaluation.
    pub fn sample_grid(
        &self,
        grid: &GridSpec,
        quantity: FieldQuantity,
        mode: TotalFieldMode,
    ) -> Result<NearFieldPattern, FieldError> {
        if grid.is_empty() {
            return Err(FieldError::EmptyGrid {
                nx: grid.count[0],
                ny: grid.count[1],
                nz: grid.count[2],
            });
        }

        let len = grid.len();
        let mut pattern = NearFieldPattern {
            quantity,
            points: Vec::with_capacity(len),
            magnitude: Vec::with_capacity(len),
            phase: Vec::with_capacity(len),
            component: Vec::with_capacity(len),
            total: Vec::with_capacity(len),
            max_total: 0.0,
            r_max: 0.0,
            valid: false,
        };
        let wlam = self.structure().wavelength;
        tracing::debug!(
            target: "nec2_fields::sampling",
            ?quantity,
            points = len,
            "sampling near-field grid"
        );

        for i in 0..grid.count[2] {
            let znrt = grid.start[2] + i as f64 * grid.step[2];
            let (cth, sth) = match grid.kind {
                GridKind::Spherical => {
                    let t = DEG_TO_RAD * znrt;
                    (t.cos(), t.sin())
                }
                GridKind::Rectangular => (0.0, 0.0),
            };

            for j in 0..grid.count[1] {
                let ynrt = grid.start[1] + j as f64 * grid.step[1];
                let (cph, sph) = match grid.kind {
                    GridKind::Spherical => {
                        let p = DEG_TO_RAD * ynrt;
                        (p.cos(), p.sin())
                    }
                    GridKind::Rectangular => (0.0, 0.0),
                };

                for k in 0..grid.count[0] {
                    let xnrt = grid.start[0] + k as f64 * grid.step[0];
                    let [xob, yob, zob] = match grid.kind {
                        GridKind::Spherical => {
                            [xnrt * sth * cph, xnrt * sth * sph, xnrt * cth]
                        }
                        GridKind::Rectangular => [xnrt, ynrt, znrt],
                    };

                    let point = [xob / wlam, yob / wlam, zob / wlam];
                    let e = match quantity {
                        FieldQuantity::Electric => self.electric_field(point),
                        FieldQuantity::Magnetic => self.magnetic_field(point),
                    };
                    let (comp, total) = total_field_sample(e, mode);

                    pattern.points.push([xob, yob, zob]);
                    let r = (xob * xob + yob * yob + zob * zob).sqrt();
                    if pattern.r_max < r {
                        pattern.r_max = r;
                    }
                    pattern
                        .magnitude
                        .push([e[0].norm(), e[1].norm(), e[2].norm()]);
                    pattern.phase.push([e[0].arg(), e[1].arg(), e[2].arg()]);
                    pattern.component.push(comp);
                    if pattern.max_total < total {
                        pattern.max_total = total;
                    }
                    pattern.total.push(total);
                }
            }
        }

        pattern.valid = true;
        Ok(pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::{total_field_sample, TotalFieldMode};
    use num_complex::Complex64;
    use std::f64::consts::PI;

    fn peak_by_sweep(e: [Complex64; 3]) -> f64 {
        let mut max = 0.0f64;
        let mut phase = 0.0;
        while phase < 2.0 * PI {
            let (_, total) = total_field_sample(e, TotalFieldMode::Snapshot { phase });
            if total > max {
                max = total;
            }
            phase += 1.0e-4;
        }
        max
    }

    #[test]
    fn peak_matches_a_brute_force_phase_sweep() {
        let e = [
            Complex64::new(1.3, -0.4),
            Complex64::new(-0.2, 0.9),
            Complex64::new(0.5, 0.55),
        ];
        let (_, analytic) = total_field_sample(e, TotalFieldMode::Peak);
        let swept = peak_by_sweep(e);
        assert!(
            (analytic - swept).abs() <= 1.0e-4 * analytic,
            "analytic {analytic}, swept {swept}"
        );
    }

    #[test]
    fn linear_polarization_peak_is_the_vector_magnitude() {
        // all components in phase: the field vector oscillates along a
        // fixed line and peaks at its magnitude
        let e = [
            Complex64::new(3.0, 0.0),
            Complex64::new(4.0, 0.0),
            Complex64::new(0.0, 0.0),
        ];
        let (comp, total) = total_field_sample(e, TotalFieldMode::Peak);
        assert!((total - 5.0).abs() <= 1.0e-12);
        assert!((comp[0].abs() - 3.0).abs() <= 1.0e-12);
        assert!((comp[1].abs() - 4.0).abs() <= 1.0e-12);
    }

    #[test]
    fn circular_polarization_peak_is_one_component() {
        // equal quadrature components rotate; the total never exceeds the
        // single-component magnitude
        let e = [
            Complex64::new(2.0, 0.0),
            Complex64::new(0.0, 2.0),
            Complex64::new(0.0, 0.0),
        ];
        let (_, total) = total_field_sample(e, TotalFieldMode::Peak);
        assert!((total - 2.0).abs() <= 1.0e-12, "total = {total}");
    }

    #[test]
    fn snapshot_at_zero_phase_takes_real_parts() {
        let e = [
            Complex64::new(1.0, 5.0),
            Complex64::new(-2.0, 0.5),
            Complex64::new(0.25, -0.1),
        ];
        let (comp, total) = total_field_sample(e, TotalFieldMode::Snapshot { phase: 0.0 });
        for axis in 0..3 {
            assert!((comp[axis] - e[axis].re).abs() <= 1.0e-12);
        }
        let expected = (1.0f64 + 4.0 + 0.0625).sqrt();
        assert!((total - expected).abs() <= 1.0e-12);
    }
}
