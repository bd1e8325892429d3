//! Near H-field kernels of a wire segment (legacy `gh`, `hfk`, `hsflx`
//! and `hsfld`).

use crate::common::constants::{
    CPLX_00, CPLX_01, CPLX_10, EIGHT_PI, ETA, HSFLX_SERIES_SWITCH, J_TWO_PI,
    MIN_HORIZONTAL_SEPARATION, MIN_RADIAL_DISTANCE, TWO_PI,
};
use crate::domain::context::{FieldTriple, SourceContext};
use crate::domain::ground::{GroundKind, GroundModel};
use crate::numerics::quadrature::integrate_doubling;
use num_complex::Complex64;

/// H field integrand of a filament of uniform current (legacy `gh`).
fn h_integrand(zk: f64, zpka: f64, rhks: f64) -> Complex64 {
    let zd = zk - zpka;
    let rs = rhks + zd * zd;
    let r = rs.sqrt();
    let ckr = r.cos();
    let skr = r.sin();
    let rr2 = 1.0 / rs;
    let rr3 = rr2 / r;
    Complex64::new(skr * rr2 + ckr * rr3, ckr * rr2 - skr * rr3)
}

/// H field of a uniform current filament by numerical integration
/// (legacy `hfk`); arguments are in radians (`k z`).
fn uniform_current_h(el1: f64, el2: f64, rhk: f64, zpka: f64) -> Complex64 {
    let rhks = rhk * rhk;
    let [sum] = integrate_doubling(
        |zk| [h_integrand(zk, zpka, rhks)],
        el1,
        el2,
        0.0,
        "uniform-current H",
    );
    sum * (rhk * 0.5)
}

/// Azimuthal H field of the constant, sine and cosine current
/// distributions on a segment (legacy `hsflx`). The sine and cosine terms
/// have closed forms; near the segment axis a series form replaces them
/// to avoid cancellation, and on the axis all components vanish.
pub(crate) fn segment_h_basis(s: f64, rh: f64, zpx: f64) -> (Complex64, Complex64, Complex64) {
    if rh < MIN_RADIAL_DISTANCE {
        return (CPLX_00, CPLX_00, CPLX_00);
    }

    let fjk = -J_TWO_PI;
    let (zp, hss) = if zpx >= 0.0 { (zpx, 1.0) } else { (-zpx, -1.0) };
    let dh = 0.5 * s;
    let z1 = zp + dh;
    let z2a = zp - dh;
    let rhz = if z2a >= 1.0e-7 { rh / z2a } else { 1.0 };
    let dk = TWO_PI * dh;
    let cdk = dk.cos();
    let sdk = dk.sin();
    let hpk = uniform_current_h(-dk, dk, rh * TWO_PI, zp * TWO_PI);

    if rhz >= HSFLX_SERIES_SWITCH {
        let rh2 = rh * rh;
        let r1 = (rh2 + z1 * z1).sqrt();
        let r2 = (rh2 + z2a * z2a).sqrt();
        let ekr1 = (fjk * r1).exp();
        let ekr2 = (fjk * r2).exp();
        let t1 = z1 * ekr1 / r1;
        let t2 = z2a * ekr2 / r2;
        let cons = -CPLX_01 / (2.0 * TWO_PI * rh);
        let hps = (cdk * (ekr2 - ekr1) - CPLX_01 * sdk * (t2 + t1)) * hss * cons;
        let hpc = (-sdk * (ekr2 + ekr1) - CPLX_01 * cdk * (t2 - t1)) * cons;
        return (hpk, hps, hpc);
    }

    let ekr1 = Complex64::new(cdk, sdk) / (z2a * z2a);
    let ekr2 = Complex64::new(cdk, -sdk) / (z1 * z1);
    let t1 = TWO_PI * (1.0 / z1 - 1.0 / z2a);
    let t2 = (fjk * zp).exp() * rh / EIGHT_PI;
    let hps = t2 * (t1 + (ekr1 + ekr2) * sdk) * hss;
    let hpc = t2 * (-CPLX_01 * t1 + (ekr1 - ekr2) * cdk);
    (hpk, hps, hpc)
}

/// Near H field of one segment with constant, sine and cosine currents,
/// ground effect included (legacy `hsfld`).
pub(crate) fn segment_h_field(
    ctx: &SourceContext,
    ground: &GroundModel,
    obs: [f64; 3],
    obs_radius: f64,
) -> FieldTriple {
    let [xi, yi, zi] = obs;
    let [cabj, sabj, salpj] = ctx.direction;
    let xij = xi - ctx.position[0];
    let yij = yi - ctx.position[1];
    let ai = obs_radius;
    let mut out = FieldTriple::zero();
    let mut rfl = -1.0f64;

    for ip in 0..ground.image_count() {
        rfl = -rfl;
        let salpr = salpj * rfl;
        let zij = zi - rfl * ctx.position[2];
        let zp = xij * cabj + yij * sabj + zij * salpr;
        let mut rhox = xij - cabj * zp;
        let mut rhoy = yij - sabj * zp;
        let mut rhoz = zij - salpr * zp;
        let rh = (rhox * rhox + rhoy * rhoy + rhoz * rhoz + ai * ai).sqrt();

        if rh <= MIN_RADIAL_DISTANCE {
            out = FieldTriple::zero();
            continue;
        }

        rhox /= rh;
        rhoy /= rh;
        rhoz /= rh;
        let phx = sabj * rhoz - salpr * rhoy;
        let phy = salpr * rhox - cabj * rhoz;
        let phz = cabj * rhoy - sabj * rhox;

        let (hpk, hps, hpc) = segment_h_basis(ctx.length, rh, zp);

        if ip == 1 {
            let plane = match ground.plane() {
                Some(plane) => plane,
                None => break,
            };

            if plane.kind != GroundKind::Perfect {
                let mut zratx = plane.zrati;
                let rmag = (zp * zp + rh * rh).sqrt();
                let xymag = (xij * xij + yij * yij).sqrt();

                if let Some(screen) = &plane.screen {
                    // radial wire screen modification at the specular point
                    let zj = ctx.position[2];
                    let xspec = (xi * zj + zi * ctx.position[0]) / (zi + zj);
                    let yspec = (yi * zj + zi * ctx.position[1]) / (zi + zj);
                    let t2 = screen.spacing_radius();
                    let rhospc = (xspec * xspec + yspec * yspec + t2 * t2).sqrt();
                    if rhospc <= screen.screen_radius {
                        let zscrn =
                            screen.impedance_coefficient() * rhospc * (rhospc / t2).ln();
                        zratx = (zscrn * plane.zrati) / (ETA * plane.zrati + zscrn);
                    }
                }

                // reflection coefficients when ground is specified
                let (px, py, cth, rrv);
                if xymag <= MIN_HORIZONTAL_SEPARATION {
                    px = 0.0;
                    py = 0.0;
                    cth = 1.0;
                    rrv = CPLX_10;
                } else {
                    px = -yij / xymag;
                    py = xij / xymag;
                    cth = zij / rmag;
                    rrv = (1.0 - zratx * zratx * (1.0 - cth * cth)).sqrt();
                }

                let rrh = zratx * cth;
                let rrh = -(rrh - rrv) / (rrh + rrv);
                let rrv = zratx * rrv;
                let rrv = (cth - rrv) / (cth + rrv);
                let qy = (phx * px + phy * py) * (rrv - rrh);
                let qx = qy * px + phx * rrh;
                let qy = qy * py + phy * rrh;
                let qz = phz * rrh;
                for axis in 0..3 {
                    let q = [qx, qy, qz][axis];
                    out.constant[axis] -= hpk * q;
                    out.sine[axis] -= hps * q;
                    out.cosine[axis] -= hpc * q;
                }
                continue;
            }

            for axis in 0..3 {
                let ph = [phx, phy, phz][axis];
                out.constant[axis] -= hpk * ph;
                out.sine[axis] -= hps * ph;
                out.cosine[axis] -= hpc * ph;
            }
            continue;
        }

        out.constant = [hpk * phx, hpk * phy, hpk * phz];
        out.sine = [hps * phx, hps * phy, hps * phz];
        out.cosine = [hpc * phx, hpc * phy, hpc * phz];
    }

    out
}

#[cfg(test)]
mod tests {
    use super::{segment_h_basis, uniform_current_h};
    use crate::common::constants::TWO_PI;

    #[test]
    fn on_axis_field_vanishes() {
        let (hpk, hps, hpc) = segment_h_basis(0.1, 0.0, 0.3);
        assert_eq!(hpk.norm(), 0.0);
        assert_eq!(hps.norm(), 0.0);
        assert_eq!(hpc.norm(), 0.0);
    }

    #[test]
    fn uniform_current_recovers_the_static_law_close_in() {
        // k rho << 1 at mid-segment: H of a finite filament approaches the
        // magnetostatic  I/(4 pi rho) * 2 sin(atan(dh/rho)) form, which in
        // the scaled variables used here is rho_k/2 * integral
        let rh = 1.0e-3;
        let dh = 0.05;
        let dk = TWO_PI * dh;
        let rhk = TWO_PI * rh;
        let h = uniform_current_h(-dk, dk, rhk, 0.0);
        let expected = dk / (rhk * (rhk * rhk + dk * dk).sqrt());
        assert!(
            (h.re - expected).abs() <= 1.0e-3 * expected,
            "re = {}, expected {expected}",
            h.re
        );
    }

    #[test]
    fn series_branch_joins_the_closed_form() {
        // rh/z2a straddling the 1e-3 switch
        let s = 0.02;
        let zp = 0.5;
        let z2a = zp - 0.5 * s;
        let (_, ps_a, pc_a) = segment_h_basis(s, z2a * 1.001e-3, zp);
        let (_, ps_b, pc_b) = segment_h_basis(s, z2a * 0.999e-3, zp);
        assert!((ps_a - ps_b).norm() <= 0.02 * ps_a.norm().max(ps_b.norm()));
        assert!((pc_a - pc_b).norm() <= 0.02 * pc_a.norm().max(pc_b.norm()));
    }

    #[test]
    fn sine_field_is_odd_in_the_axial_offset() {
        let (_, ps_pos, pc_pos) = segment_h_basis(0.1, 0.05, 0.4);
        let (_, ps_neg, pc_neg) = segment_h_basis(0.1, 0.05, -0.4);
        assert!((ps_pos + ps_neg).norm() <= 1.0e-10 * ps_pos.norm());
        assert!((pc_pos - pc_neg).norm() <= 1.0e-10 * pc_pos.norm());
    }
}
