//! Sommerfeld/Norton ground-wave field of a current element over a
//! lossy ground plane.
//!
//! `norton_surface_wave` ports the legacy `gwave` routine, which
//! evaluates the Norton surface-wave formulas (K. A. Norton, Proc. IRE,
//! Sept. 1937). `ground_element_field` ports `sflds`: the ground
//! contribution of one point on a source segment, either by Norton's
//! asymptotic field with the current lumped at the segment center, or by
//! interpolation in precomputed Sommerfeld integral tables close to the
//! source.

use crate::common::constants::{
    CPLX_00, GROUND_WAVE_SCALE, HALF_PI, J_TWO_PI, PI, TWO_PI, WIRE_KERNEL_SCALE,
};
use crate::domain::context::SourceContext;
use crate::domain::ground::{GroundPlane, SommerfeldTable};
use crate::numerics::quadrature::integrate_doubling;
use crate::numerics::special::attenuation_function;
use num_complex::Complex64;

/// Geometry of the source element and observation point for the Norton
/// formulas. Heights and ranges are in wavelengths; `xx1`/`xx2` carry
/// `exp(-jkR)` for the direct and image rays, `u` the surface impedance
/// ratio of the ground.
pub(crate) struct GroundWaveGeometry {
    pub zmh: f64,
    pub zph: f64,
    pub r1: f64,
    pub r2: f64,
    pub xx1: Complex64,
    pub xx2: Complex64,
    pub u: Complex64,
    pub u2: Complex64,
}

pub(crate) struct GroundWaveFields {
    pub erv: Complex64,
    pub ezv: Complex64,
    pub erh: Complex64,
    pub ezh: Complex64,
    pub eph: Complex64,
}

/// E field of a unit current element over ground, surface wave included.
pub(crate) fn norton_surface_wave(g: &GroundWaveGeometry) -> GroundWaveFields {
    let sppp = g.zmh / g.r1;
    let sppp2 = sppp * sppp;
    let cppp2 = (1.0 - sppp2).max(1.0e-20);
    let cppp = cppp2.sqrt();
    let spp = g.zph / g.r2;
    let spp2 = spp * spp;
    let cpp2 = (1.0 - spp2).max(1.0e-20);
    let cpp = cpp2.sqrt();

    let rk1 = -J_TWO_PI * g.r1;
    let rk2 = -J_TWO_PI * g.r2;
    let t1 = 1.0 - g.u2 * cpp2;
    let t2 = t1.sqrt();
    let t3 = (1.0 - 1.0 / rk1) / rk1;
    let t4 = (1.0 - 1.0 / rk2) / rk2;
    let p1 = rk2 * g.u2 * t1 / (2.0 * cpp2);
    let rv = (spp - g.u * t2) / (spp + g.u * t2);
    let omr = 1.0 - rv;
    let w = 4.0 * p1 / (omr * omr);
    let f = attenuation_function(w);
    let q1 = rk2 * t1 / (2.0 * g.u2 * cpp2);
    let rh = (t2 - g.u * spp) / (t2 + g.u * spp);
    let v_den = 1.0 + rh;
    let v = 4.0 * q1 / (v_den * v_den);
    let gbar = attenuation_function(v);
    let xr1 = g.xx1 / g.r1;
    let xr2 = g.xx2 / g.r2;
    let scale = -GROUND_WAVE_SCALE;

    let x1 = cppp2 * xr1;
    let x2 = rv * cpp2 * xr2;
    let x3 = omr * cpp2 * f * xr2;
    let x4 = g.u * t2 * spp * 2.0 * xr2 / rk2;
    let x5 = xr1 * t3 * (1.0 - 3.0 * sppp2);
    let x6 = xr2 * t4 * (1.0 - 3.0 * spp2);
    let ezv = (x1 + x2 + x3 - x4 - x5 - x6) * scale;

    let x1 = sppp * cppp * xr1;
    let x2 = rv * spp * cpp * xr2;
    let x3 = cpp * omr * g.u * t2 * f * xr2;
    let x4 = spp * cpp * omr * xr2 / rk2;
    let x5 = 3.0 * sppp * cppp * t3 * xr1;
    let x6 = cpp * g.u * t2 * omr * xr2 / rk2 * 0.5;
    let x7 = 3.0 * spp * cpp * t4 * xr2;
    let erv = -(x1 + x2 - x3 + x4 - x5 + x6 - x7) * scale;
    let ezh = -(x1 - x2 + x3 - x4 - x5 - x6 + x7) * scale;

    let x1 = sppp2 * xr1;
    let x2 = rv * spp2 * xr2;
    let x4 = g.u2 * t1 * omr * f * xr2;
    let x5 = t3 * (1.0 - 3.0 * cppp2) * xr1;
    let x6 = t4 * (1.0 - 3.0 * cpp2) * (1.0 - g.u2 * (1.0 + rv) - g.u2 * omr * f) * xr2;
    let x7 = g.u2
        * cpp2
        * omr
        * (1.0 - 1.0 / rk2)
        * (f * (g.u2 * t1 - spp2 - 1.0 / rk2) + 1.0 / rk2)
        * xr2;
    let erh = (x1 - x2 - x4 - x5 + x6 + x7) * scale;

    let x1 = xr1;
    let x2 = rh * xr2;
    let x3 = (rh + 1.0) * gbar * xr2;
    let x4 = t3 * xr1;
    let x5 = t4 * (1.0 - g.u2 * (1.0 + rv) - g.u2 * omr * f) * xr2;
    let x6 = 0.5 * g.u2 * omr * (f * (g.u2 * t1 - spp2 - 1.0 / rk2) + 1.0 / rk2) * xr2 / rk2;
    let eph = -(x1 - x2 + x3 - x4 + x5 + x6) * scale;

    GroundWaveFields {
        erv,
        ezv,
        erh,
        ezh,
        eph,
    }
}

/// Observation-side scratch shared by the ground-field evaluations along
/// one segment. `sn`, `xsn`, `ysn` project the segment onto the ground
/// plane; `interpolate` selects the Sommerfeld table path over Norton's
/// asymptotic form.
pub(crate) struct NortonContext {
    pub observation: [f64; 3],
    pub xsn: f64,
    pub ysn: f64,
    pub sn: f64,
    pub interpolate: bool,
}

/// Ground contribution of the source point at arc position `t` along the
/// segment, as nine x,y,z components for the constant, sine and cosine
/// current bases (legacy `sflds`).
pub(crate) fn ground_element_field(
    ctx: &SourceContext,
    norton: &NortonContext,
    plane: &GroundPlane,
    table: Option<&dyn SommerfeldTable>,
    t: f64,
) -> [Complex64; 9] {
    let [xo, yo, zo] = norton.observation;
    let xt = ctx.position[0] + t * ctx.direction[0];
    let yt = ctx.position[1] + t * ctx.direction[1];
    let zt = ctx.position[2] + t * ctx.direction[2];
    let salpj = ctx.direction[2];

    let mut rhx = xo - xt;
    let mut rhy = yo - yt;
    let rhs = rhx * rhx + rhy * rhy;
    let rho = rhs.sqrt();
    let (phx, phy);
    if rho <= 0.0 {
        rhx = 1.0;
        rhy = 0.0;
        phx = 0.0;
        phy = 1.0;
    } else {
        rhx /= rho;
        rhy /= rho;
        phx = -rhy;
        phy = rhx;
    }

    let mut cph = rhx * norton.xsn + rhy * norton.ysn;
    let mut sph = rhy * norton.xsn - rhx * norton.ysn;
    if cph.abs() < 1.0e-10 {
        cph = 0.0;
    }
    if sph.abs() < 1.0e-10 {
        sph = 0.0;
    }

    let zph = zo + zt;
    let zphs = zph * zph;
    let r2s = rhs + zphs;
    let r2 = r2s.sqrt();
    let rk = r2 * TWO_PI;
    let mut xx2 = Complex64::new(rk.cos(), -rk.sin());
    let mut e = [CPLX_00; 9];

    let table = if norton.interpolate { table } else { None };
    match table {
        None => {
            // Norton approximation; the current is lumped at the segment
            // center with the moment of each distribution
            let geometry = GroundWaveGeometry {
                zmh: 1.0,
                zph,
                r1: 1.0,
                r2,
                xx1: CPLX_00,
                xx2,
                u: plane.zrati,
                u2: plane.zrati * plane.zrati,
            };
            let wave = norton_surface_wave(&geometry);

            let mut et = -WIRE_KERNEL_SCALE * plane.frati * xx2 / (r2s * r2);
            let er = 2.0 * et * Complex64::new(1.0, rk);
            et *= Complex64::new(1.0 - rk * rk, rk);
            let hrv = (er + et) * rho * zph / r2s;
            let hzv = (zphs * er - rhs * et) / r2s;
            let hrh = (rhs * er - zphs * et) / r2s;

            let erv = (wave.erv - hrv) * salpj;
            let ezv = (wave.ezv - hzv) * salpj;
            let erh = (wave.erh + hrh) * norton.sn * cph;
            let ezh = (wave.ezh + hrv) * norton.sn * cph;
            let eph = (wave.eph + et) * norton.sn * sph;
            let erh = erv + erh;

            e[0] = (erh * rhx + eph * phx) * ctx.length;
            e[1] = (erh * rhy + eph * phy) * ctx.length;
            e[2] = (ezv + ezh) * ctx.length;
            let sfac = PI * ctx.length;
            let sfac = sfac.sin() / sfac;
            e[6] = e[0] * sfac;
            e[7] = e[1] * sfac;
            e[8] = e[2] * sfac;
        }
        Some(table) => {
            // interpolate in the Sommerfeld integral tables, then combine
            // vertical and horizontal components into x,y,z and restore
            // the exp(-jkr)/r factor
            let thet = if rho >= 1.0e-12 {
                (zph / rho).atan()
            } else {
                HALF_PI
            };
            let c = table.fields(r2, thet);
            xx2 /= r2;
            let sfac = norton.sn * cph;
            let erh = xx2 * (salpj * c.erv + sfac * c.erh);
            let ezh = xx2 * (salpj * c.ezv - sfac * c.erv);
            let eph = norton.sn * sph * xx2 * c.eph;

            e[0] = erh * rhx + eph * phx;
            e[1] = erh * rhy + eph * phy;
            e[2] = ezh;
            let rk = TWO_PI * t;
            let sfac = rk.sin();
            e[3] = e[0] * sfac;
            e[4] = e[1] * sfac;
            e[5] = e[2] * sfac;
            let sfac = rk.cos();
            e[6] = e[0] * sfac;
            e[7] = e[1] * sfac;
            e[8] = e[2] * sfac;
        }
    }

    e
}

/// Ground field integrated over the source segment (legacy `rom2` with
/// the `sflds` integrand).
pub(crate) fn integrate_ground_field(
    ctx: &SourceContext,
    norton: &NortonContext,
    plane: &GroundPlane,
    table: Option<&dyn SommerfeldTable>,
    a: f64,
    b: f64,
    dmin: f64,
) -> [Complex64; 9] {
    integrate_doubling(
        |t| ground_element_field(ctx, norton, plane, table, t),
        a,
        b,
        dmin,
        "ground wave",
    )
}
