//! Closed-form near-field kernels of a current-carrying wire segment.
//!
//! Ports of the legacy NEC2 `gx`/`gxx` end Green's functions, the `eksc`
//! thin-wire and `ekscx` extended-thin-wire filament kernels, the `intx`
//! filament potential integral and the `efld` ground-effect assembly.

use crate::common::constants::{
    CPLX_00, CPLX_10, ETA, GF_SERIES_SWITCH, MIN_HORIZONTAL_PROJECTION,
    MIN_HORIZONTAL_SEPARATION, MIN_RADIAL_DISTANCE, NEAR_IMAGE_VALIDITY, PI, TWO_PI,
    WIRE_KERNEL_SCALE,
};
use crate::domain::context::{FieldTriple, SourceContext};
use crate::domain::geometry::SegmentEndKind;
use crate::domain::ground::{GroundKind, GroundModel, SommerfeldTable};
use crate::groundwave::{ground_element_field, integrate_ground_field, NortonContext};
use crate::numerics::quadrature::integrate_doubling;
use num_complex::Complex64;

/// Near fields of one segment in source-local cylindrical components:
/// axial (`ez*`) and radial (`er*`) terms for the sine, cosine and
/// constant basis functions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct CylindricalFields {
    pub ezs: Complex64,
    pub ers: Complex64,
    pub ezc: Complex64,
    pub erc: Complex64,
    pub ezk: Complex64,
    pub erk: Complex64,
}

/// Segment-end contributions for the thin-wire form (legacy `gx`):
/// `g = exp(-jkr)/r` and its scaled radial derivative.
pub(crate) fn segment_end_green(zz: f64, rh: f64, xk: f64) -> (Complex64, Complex64) {
    let r2 = zz * zz + rh * rh;
    let r = r2.sqrt();
    let rkz = xk * r;
    let gz = Complex64::new(rkz.cos(), -rkz.sin()) / r;
    let gzp = -Complex64::new(1.0, rkz) * gz / r2;
    (gz, gzp)
}

/// Segment-end contributions for the extended thin-wire form
/// (legacy `gxx`), with radius-squared correction terms. `swapped` marks
/// the stabilized evaluation where the roles of wire radius and
/// perpendicular distance have been exchanged.
pub(crate) struct ExtendedEndGreens {
    pub g1: Complex64,
    pub g1p: Complex64,
    pub g2: Complex64,
    pub g2p: Complex64,
    pub g3: Complex64,
    pub gzp: Complex64,
}

pub(crate) fn extended_end_green(
    zz: f64,
    rh: f64,
    a: f64,
    a2: f64,
    xk: f64,
    swapped: bool,
) -> ExtendedEndGreens {
    let r2 = zz * zz + rh * rh;
    let r = r2.sqrt();
    let r4 = r2 * r2;
    let rk = xk * r;
    let rk2 = rk * rk;
    let rh2 = rh * rh;
    let t1 = 0.25 * a2 * rh2 / r4;
    let t2 = 0.5 * a2 / r2;
    let c1 = Complex64::new(1.0, rk);
    let c2 = 3.0 * c1 - rk2;
    let c3 = Complex64::new(6.0, rk) * rk2 - 15.0 * c1;
    let mut gz = Complex64::new(rk.cos(), -rk.sin()) / r;

    let mut g2 = gz * (1.0 + t1 * c2);
    let g1 = g2 - t2 * c1 * gz;
    gz /= r2;
    let mut g2p = gz * (t1 * c3 - c1);
    let mut gzp = t2 * c2 * gz;
    let mut g3 = g2p + gzp;
    let g1p = g3 * zz;

    if !swapped {
        g3 = (g3 + gzp) * rh;
        gzp = -zz * c1 * gz;
        if rh <= MIN_RADIAL_DISTANCE {
            g2 = CPLX_00;
            g2p = CPLX_00;
        } else {
            g2 /= rh;
            g2p = g2p * zz / rh;
        }
        return ExtendedEndGreens {
            g1,
            g1p,
            g2,
            g2p,
            g3,
            gzp,
        };
    }

    let t2 = 0.5 * a;
    let g2s = -t2 * c1 * gz;
    let mut g2ps = t2 * gz * c2 / r2;
    let g3s = rh2 * g2ps - a * gz * c1;
    g2ps *= zz;
    let gzps = -zz * c1 * gz;
    ExtendedEndGreens {
        g1,
        g1p,
        g2: g2s,
        g2p: g2ps,
        g3: g3s,
        gzp: gzps,
    }
}

/// Integrand `exp(jkr)/(kr)` of the filament potential (legacy `gf`).
/// For the self term the `1/(kr)` singularity is subtracted analytically;
/// a small-argument series takes over below `kr = 0.2`.
fn green_integrand(zk: f64, zpk: f64, rkb2: f64, self_term: bool) -> Complex64 {
    let zdk = zk - zpk;
    let rk = (rkb2 + zdk * zdk).sqrt();
    let si = rk.sin() / rk;
    let co = if !self_term {
        rk.cos() / rk
    } else if rk >= GF_SERIES_SWITCH {
        (rk.cos() - 1.0) / rk
    } else {
        let rks = rk * rk;
        ((-1.38888889e-3 * rks + 4.16666667e-2) * rks - 0.5) * rk
    };
    Complex64::new(co, si)
}

/// Numerical integral of `exp(jkr)/(kr)` along the segment (legacy
/// `intx`). For the self term only the lower half is integrated (the
/// integrand is even about the observation point) and the removed
/// singularity is restored in closed form.
pub(crate) fn filament_green_integral(
    shk: f64,
    rhk: f64,
    zpk: f64,
    self_term: bool,
) -> (f64, f64) {
    let upper = if self_term { 0.0 } else { shk };
    let [sum] = integrate_doubling(
        |zk| [green_integrand(zk, zpk, rhk * rhk, self_term)],
        -shk,
        upper,
        0.0,
        "filament potential",
    );
    let mut cint = sum.re;
    let mut sint = sum.im;
    if self_term {
        cint = 2.0 * (cint + (((rhk * rhk + shk * shk).sqrt() + shk) / rhk).ln());
        sint *= 2.0;
    }
    (cint, sint)
}

/// E field of sine, cosine and constant current filaments by the
/// thin-wire approximation (legacy `eksc`).
pub(crate) fn thin_wire_fields(
    s: f64,
    z: f64,
    rh: f64,
    xk: f64,
    self_term: bool,
) -> CylindricalFields {
    let zpk = xk * z;
    let rhk = xk * rh;
    let sh = 0.5 * s;
    let shk = xk * sh;
    let ss = shk.sin();
    let cs = shk.cos();
    let z2a = sh - z;
    let z1a = -(sh + z);
    let (gz1, gp1) = segment_end_green(z1a, rh, xk);
    let (gz2, gp2) = segment_end_green(z2a, rh, xk);
    let mut gzp1 = gp1 * z1a;
    let mut gzp2 = gp2 * z2a;

    let ezs = WIRE_KERNEL_SCALE * ((gz2 - gz1) * cs * xk - (gzp2 + gzp1) * ss);
    let ezc = -WIRE_KERNEL_SCALE * ((gz2 + gz1) * ss * xk + (gzp2 - gzp1) * cs);
    let erk = WIRE_KERNEL_SCALE * (gp2 - gp1) * rh;
    let (cint, sint) = filament_green_integral(shk, rhk, zpk, self_term);
    let ezk = -WIRE_KERNEL_SCALE * (gzp2 - gzp1 + xk * xk * Complex64::new(cint, -sint));
    gzp1 *= z1a;
    gzp2 *= z2a;

    let (ers, erc) = if rh >= MIN_RADIAL_DISTANCE {
        (
            -WIRE_KERNEL_SCALE * ((gzp2 + gzp1 + gz2 + gz1) * ss - (z2a * gz2 - z1a * gz1) * cs * xk)
                / rh,
            -WIRE_KERNEL_SCALE * ((gzp2 - gzp1 + gz2 - gz1) * cs + (z2a * gz2 + z1a * gz1) * ss * xk)
                / rh,
        )
    } else {
        (CPLX_00, CPLX_00)
    };

    CylindricalFields {
        ezs,
        ers,
        ezc,
        erc,
        ezk,
        erk,
    }
}

/// E field of sine, cosine and constant current filaments by the extended
/// thin-wire approximation (legacy `ekscx`). When the perpendicular
/// distance is smaller than the wire radius the two are exchanged to keep
/// the series expansion in its stable region; ends classified as
/// junctions fall back to the plain thin-wire end form.
#[allow(clippy::too_many_arguments)]
pub(crate) fn extended_thin_wire_fields(
    bx: f64,
    s: f64,
    z: f64,
    rhx: f64,
    xk: f64,
    self_term: bool,
    end1: SegmentEndKind,
    end2: SegmentEndKind,
) -> CylindricalFields {
    let (rh, b, swapped) = if rhx >= bx {
        (rhx, bx, false)
    } else {
        (bx, rhx, true)
    };

    let sh = 0.5 * s;
    let zpk = xk * z;
    let rhk = xk * rh;
    let shk = xk * sh;
    let ss = shk.sin();
    let cs = shk.cos();
    let z2a = sh - z;
    let z1a = -(sh + z);
    let a2 = b * b;

    let end_greens = |za: f64, extended: bool| -> ExtendedEndGreens {
        if extended {
            extended_end_green(za, rh, b, a2, xk, swapped)
        } else {
            let (gz, grk) = segment_end_green(za, rhx, xk);
            let gzp = grk * za;
            ExtendedEndGreens {
                g1: gz,
                g1p: gzp,
                g2: gz / rhx,
                g2p: gzp / rhx,
                g3: grk * rhx,
                gzp: CPLX_00,
            }
        }
    };

    let e1 = end_greens(z1a, end1.uses_extended_expansion());
    let e2 = end_greens(z2a, end2.uses_extended_expansion());

    let ezs = WIRE_KERNEL_SCALE * ((e2.g1 - e1.g1) * cs * xk - (e2.g1p + e1.g1p) * ss);
    let ezc = -WIRE_KERNEL_SCALE * ((e2.g1 + e1.g1) * ss * xk + (e2.g1p - e1.g1p) * cs);
    let ers = -WIRE_KERNEL_SCALE
        * ((z2a * e2.g2p + z1a * e1.g2p + e2.g2 + e1.g2) * ss
            - (z2a * e2.g2 - z1a * e1.g2) * cs * xk);
    let erc = -WIRE_KERNEL_SCALE
        * ((z2a * e2.g2p - z1a * e1.g2p + e2.g2 - e1.g2) * cs
            + (z2a * e2.g2 + z1a * e1.g2) * ss * xk);
    let erk = WIRE_KERNEL_SCALE * (e2.g3 - e1.g3);
    let (cint, sint) = filament_green_integral(shk, rhk, zpk, self_term);
    let bk = b * xk;
    let bk2 = bk * bk * 0.25;
    let ezk = -WIRE_KERNEL_SCALE
        * (e2.g1p - e1.g1p + xk * xk * (1.0 - bk2) * Complex64::new(cint, -sint)
            - bk2 * (e2.gzp - e1.gzp));

    CylindricalFields {
        ezs,
        ers,
        ezc,
        erc,
        ezk,
        erk,
    }
}

fn reflect_tangential(
    tx: &mut Complex64,
    ty: &mut Complex64,
    tz: &mut Complex64,
    px: f64,
    py: f64,
    refs: Complex64,
    refps: Complex64,
) {
    let ep = px * *tx + py * *ty;
    let epx = px * ep;
    let epy = py * ep;
    *tx = refs * *tx + refps * epx;
    *ty = refs * *ty + refps * epy;
    *tz = refs * *tz;
}

/// Near E field of one segment with sine, cosine and constant currents,
/// ground effect included (legacy `efld`). `obs_radius` is the radius of
/// the wire the observation point lies on, or zero.
pub(crate) fn segment_electric_field(
    ctx: &SourceContext,
    ground: &GroundModel,
    table: Option<&dyn SommerfeldTable>,
    obs: [f64; 3],
    obs_radius: f64,
    self_term: bool,
) -> FieldTriple {
    let [xi, yi, zi] = obs;
    let [cabj, sabj, salpj] = ctx.direction;
    let ai = obs_radius;
    let xij = xi - ctx.position[0];
    let yij = yi - ctx.position[1];
    let mut out = FieldTriple::zero();
    let mut rfl = -1.0f64;
    let mut self_flag = self_term;

    for ip in 0..ground.image_count() {
        if ip == 1 {
            self_flag = false;
        }
        rfl = -rfl;
        let salpr = salpj * rfl;
        let zij = zi - rfl * ctx.position[2];
        let zp = xij * cabj + yij * sabj + zij * salpr;
        let mut rhox = xij - cabj * zp;
        let mut rhoy = yij - sabj * zp;
        let mut rhoz = zij - salpr * zp;
        let rh = (rhox * rhox + rhoy * rhoy + rhoz * rhoz + ai * ai).sqrt();
        if rh <= MIN_RADIAL_DISTANCE {
            rhox = 0.0;
            rhoy = 0.0;
            rhoz = 0.0;
        } else {
            rhox /= rh;
            rhoy /= rh;
            rhoz /= rh;
        }

        let r = (zp * zp + rh * rh).sqrt();
        let fields;
        let (mut txs, mut tys, mut tzs) = (CPLX_00, CPLX_00, CPLX_00);
        if r >= ctx.lumped_threshold {
            // lumped current element approximation for large separations
            let rmag = TWO_PI * r;
            let cth = zp / r;
            let px = rh / r;
            let gk = Complex64::new(rmag.cos(), -rmag.sin());
            let py = TWO_PI * r * r;
            let tyk = ETA * cth * gk * Complex64::new(1.0, -1.0 / rmag) / py;
            let tzk = ETA * px * gk * Complex64::new(1.0, rmag - 1.0 / rmag) / (2.0 * py);
            let tez = tyk * cth - tzk * px;
            let ter = tyk * px + tzk * cth;
            let moment = (PI * ctx.length).sin() / PI;
            fields = CylindricalFields {
                ezs: CPLX_00,
                ers: CPLX_00,
                ezc: tez * moment,
                erc: ter * moment,
                ezk: tez * ctx.length,
                erk: ter * ctx.length,
            };
        } else {
            fields = if !ctx.extended_thin_wire {
                thin_wire_fields(ctx.length, zp, rh, TWO_PI, self_flag)
            } else {
                extended_thin_wire_fields(
                    ctx.radius,
                    ctx.length,
                    zp,
                    rh,
                    TWO_PI,
                    self_flag,
                    ctx.end1,
                    ctx.end2,
                )
            };
            txs = fields.ezs * cabj + fields.ers * rhox;
            tys = fields.ezs * sabj + fields.ers * rhoy;
            tzs = fields.ezs * salpr + fields.ers * rhoz;
        }

        let mut txk = fields.ezk * cabj + fields.erk * rhox;
        let mut tyk = fields.ezk * sabj + fields.erk * rhoy;
        let mut tzk = fields.ezk * salpr + fields.erk * rhoz;
        let mut txc = fields.ezc * cabj + fields.erc * rhox;
        let mut tyc = fields.ezc * sabj + fields.erc * rhoy;
        let mut tzc = fields.ezc * salpr + fields.erc * rhoz;

        if ip == 1 {
            let plane = match ground.plane() {
                Some(plane) => plane,
                None => break,
            };

            if plane.kind == GroundKind::Finite {
                let mut zratx = plane.zrati;
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

                // reflection coefficients for the specified ground
                let (px, py, cth, zrsin);
                if xymag <= MIN_HORIZONTAL_SEPARATION {
                    px = 0.0;
                    py = 0.0;
                    cth = 1.0;
                    zrsin = CPLX_10;
                } else {
                    px = -yij / xymag;
                    py = xij / xymag;
                    cth = zij / r;
                    zrsin = (1.0 - zratx * zratx * (1.0 - cth * cth)).sqrt();
                }
                let refs = (cth - zratx * zrsin) / (cth + zratx * zrsin);
                let refps = -(zratx * cth - zrsin) / (zratx * cth + zrsin) - refs;
                reflect_tangential(&mut txk, &mut tyk, &mut tzk, px, py, refs, refps);
                reflect_tangential(&mut txs, &mut tys, &mut tzs, px, py, refs, refps);
                reflect_tangential(&mut txc, &mut tyc, &mut tzc, px, py, refs, refps);
            }

            let frati = plane.frati;
            out.constant[0] -= txk * frati;
            out.constant[1] -= tyk * frati;
            out.constant[2] -= tzk * frati;
            out.sine[0] -= txs * frati;
            out.sine[1] -= tys * frati;
            out.sine[2] -= tzs * frati;
            out.cosine[0] -= txc * frati;
            out.cosine[1] -= tyc * frati;
            out.cosine[2] -= tzc * frati;
        } else {
            out.constant = [txk, tyk, tzk];
            out.sine = [txs, tys, tzs];
            out.cosine = [txc, tyc, tzc];
        }
    }

    let plane = match ground.plane() {
        Some(plane) if plane.kind == GroundKind::SommerfeldNorton => plane,
        _ => return out,
    };

    // field due to ground by the Sommerfeld/Norton model
    let sn = (cabj * cabj + sabj * sabj).sqrt();
    let (sn, xsn, ysn) = if sn >= MIN_HORIZONTAL_PROJECTION {
        (sn, cabj / sn, sabj / sn)
    } else {
        (0.0, 1.0, 0.0)
    };

    // displace the observation point to the wire surface
    let zij = zi + ctx.position[2];
    let salpr = -salpj;
    let rhox = sabj * zij - salpr * yij;
    let rhoy = salpr * xij - cabj * zij;
    let rhoz = cabj * yij - sabj * xij;
    let rho2 = rhox * rhox + rhoy * rhoy + rhoz * rhoz;
    let observation = if rho2 <= MIN_RADIAL_DISTANCE {
        [xi - ai * ysn, yi + ai * xsn, zi]
    } else {
        let mut f = ai / rho2.sqrt();
        if rhoz < 0.0 {
            f = -f;
        }
        [xi + f * rhox, yi + f * rhoy, zi + f * rhoz]
    };

    let r = xij * xij + yij * yij + zij * zij;
    let mut t: [Complex64; 9];
    if r <= NEAR_IMAGE_VALIDITY {
        // near the source the interpolated ground field is integrated
        // over the segment
        let norton = NortonContext {
            observation,
            xsn,
            ysn,
            sn,
            interpolate: true,
        };
        let k = out.constant;
        let dmin = 0.01
            * ((k[0] * k[0].conj() + k[1] * k[1].conj() + k[2] * k[2].conj()).re).sqrt();
        let shaf = 0.5 * ctx.length;
        t = integrate_ground_field(ctx, &norton, plane, table, -shaf, shaf, dmin);
    } else {
        // Norton field equations with the lumped current element
        let norton = NortonContext {
            observation,
            xsn,
            ysn,
            sn,
            interpolate: false,
        };
        t = ground_element_field(ctx, &norton, plane, table, 0.0);

        let zp = xij * cabj + yij * sabj + zij * salpr;
        let rh = r - zp * zp;
        let dmin = if rh <= MIN_RADIAL_DISTANCE {
            0.0
        } else {
            (rh / (rh + ai * ai)).sqrt()
        };
        if dmin <= NEAR_IMAGE_VALIDITY {
            // blend toward the axial component close to the wire axis
            let px = 1.0 - dmin;
            for base in [0usize, 3, 6] {
                let ter = (t[base] * cabj + t[base + 1] * sabj + t[base + 2] * salpr) * px;
                t[base] = t[base] * dmin + ter * cabj;
                t[base + 1] = t[base + 1] * dmin + ter * sabj;
                t[base + 2] = t[base + 2] * dmin + ter * salpr;
            }
        }
    }

    out.add_assign(&FieldTriple::from_flat(t));
    out
}
