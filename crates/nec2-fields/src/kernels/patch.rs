//! Field kernels of surface patches (legacy `unere`, `hintg`, `pcint`).

use crate::common::constants::{
    CPLX_00, CPLX_10, FOUR_PI, MIN_HORIZONTAL_SEPARATION, PATCH_COINCIDENCE_FLOOR,
    PATCH_KERNEL_SCALE, PATCH_QUADRATURE_POINTS, TWO_PI,
};
use crate::domain::context::PatchSource;
use crate::domain::ground::{GroundKind, GroundModel};
use num_complex::Complex64;

/// Fields of the unit currents in the two tangent directions of a patch.
pub(crate) struct PatchFieldPair {
    pub t1: [Complex64; 3],
    pub t2: [Complex64; 3],
}

impl PatchFieldPair {
    fn zero() -> Self {
        PatchFieldPair {
            t1: [CPLX_00; 3],
            t2: [CPLX_00; 3],
        }
    }
}

/// E field of unit currents in the t1 and t2 directions on a patch
/// (legacy `unere`). `image` evaluates the contribution of the patch
/// image below the ground plane, with the plane's reflection applied.
pub(crate) fn patch_unit_e_field(
    patch: &PatchSource,
    ground: &GroundModel,
    image: bool,
    obs: [f64; 3],
) -> PatchFieldPair {
    let mut zr = patch.position[2];
    let mut t1zr = patch.tangent1[2];
    let mut t2zr = patch.tangent2[2];
    if image {
        zr = -zr;
        t1zr = -t1zr;
        t2zr = -t2zr;
    }

    let rx = obs[0] - patch.position[0];
    let ry = obs[1] - patch.position[1];
    let rz = obs[2] - zr;
    let r2 = rx * rx + ry * ry + rz * rz;
    if r2 <= PATCH_COINCIDENCE_FLOOR {
        return PatchFieldPair::zero();
    }

    let r = r2.sqrt();
    let tt1 = -TWO_PI * r;
    let tt2 = tt1 * tt1;
    let rt = r2 * r;
    let er = Complex64::new(tt1.sin(), -tt1.cos()) * (PATCH_KERNEL_SCALE * patch.area);
    let q1 = Complex64::new(tt2 - 1.0, tt1) * er / rt;
    let q2 = Complex64::new(3.0 - tt2, -3.0 * tt1) * er / (rt * r2);

    let project = |tx: f64, ty: f64, tz: f64| -> [Complex64; 3] {
        let er = q2 * (tx * rx + ty * ry + tz * rz);
        [q1 * tx + er * rx, q1 * ty + er * ry, q1 * tz + er * rz]
    };
    let mut t1 = project(patch.tangent1[0], patch.tangent1[1], t1zr);
    let mut t2 = project(patch.tangent2[0], patch.tangent2[1], t2zr);

    if !image {
        return PatchFieldPair { t1, t2 };
    }
    let plane = match ground.plane() {
        Some(plane) => plane,
        None => return PatchFieldPair { t1, t2 },
    };

    if plane.kind == GroundKind::Perfect {
        for axis in 0..3 {
            t1[axis] = -t1[axis];
            t2[axis] = -t2[axis];
        }
        return PatchFieldPair { t1, t2 };
    }

    let xymag = (rx * rx + ry * ry).sqrt();
    let (px, py, cth, rrv);
    if xymag <= MIN_HORIZONTAL_SEPARATION {
        px = 0.0;
        py = 0.0;
        cth = 1.0;
        rrv = CPLX_10;
    } else {
        px = -ry / xymag;
        py = rx / xymag;
        cth = rz / (xymag * xymag + rz * rz).sqrt();
        rrv = (1.0 - plane.zrati * plane.zrati * (1.0 - cth * cth)).sqrt();
    }
    let rrh = plane.zrati * cth;
    let rrh = (rrh - rrv) / (rrh + rrv);
    let rrv = plane.zrati * rrv;
    let rrv = -(cth - rrv) / (cth + rrv);

    for t in [&mut t1, &mut t2] {
        let edp = (t[0] * px + t[1] * py) * (rrh - rrv);
        t[0] = t[0] * rrv + edp * px;
        t[1] = t[1] * rrv + edp * py;
        t[2] = t[2] * rrv;
    }
    PatchFieldPair { t1, t2 }
}

/// H field of the unit tangential currents on a patch, direct and ground
/// image rays summed (legacy `hintg`).
pub(crate) fn patch_h_field(
    patch: &PatchSource,
    ground: &GroundModel,
    obs: [f64; 3],
) -> PatchFieldPair {
    let rx = obs[0] - patch.position[0];
    let ry = obs[1] - patch.position[1];
    let mut rfl = -1.0f64;
    let mut out = PatchFieldPair::zero();

    for ip in 0..ground.image_count() {
        rfl = -rfl;
        let rz = obs[2] - patch.position[2] * rfl;
        let rsq = rx * rx + ry * ry + rz * rz;
        if rsq < PATCH_COINCIDENCE_FLOOR {
            continue;
        }

        let r = rsq.sqrt();
        let rk = TWO_PI * r;
        let cr = rk.cos();
        let sr = rk.sin();
        let gam = -(Complex64::new(cr, -sr) + rk * Complex64::new(sr, cr))
            / (FOUR_PI * rsq * r)
            * patch.area;
        let ex = gam * rx;
        let ey = gam * ry;
        let ez = gam * rz;
        let t1zr = patch.tangent1[2] * rfl;
        let t2zr = patch.tangent2[2] * rfl;
        let mut f1 = [
            ey * t1zr - ez * patch.tangent1[1],
            ez * patch.tangent1[0] - ex * t1zr,
            ex * patch.tangent1[1] - ey * patch.tangent1[0],
        ];
        let mut f2 = [
            ey * t2zr - ez * patch.tangent2[1],
            ez * patch.tangent2[0] - ex * t2zr,
            ex * patch.tangent2[1] - ey * patch.tangent2[0],
        ];

        if ip == 1 {
            let plane = match ground.plane() {
                Some(plane) => plane,
                None => break,
            };

            if plane.kind == GroundKind::Perfect {
                for axis in 0..3 {
                    f1[axis] = -f1[axis];
                    f2[axis] = -f2[axis];
                }
            } else {
                let xymag = (rx * rx + ry * ry).sqrt();
                let (pxx, pyy, cth, rrv);
                if xymag <= MIN_HORIZONTAL_SEPARATION {
                    pxx = 0.0;
                    pyy = 0.0;
                    cth = 1.0;
                    rrv = CPLX_10;
                } else {
                    pxx = -ry / xymag;
                    pyy = rx / xymag;
                    cth = rz / r;
                    rrv = (1.0 - plane.zrati * plane.zrati * (1.0 - cth * cth)).sqrt();
                }
                let rrh = plane.zrati * cth;
                let rrh = (rrh - rrv) / (rrh + rrv);
                let rrv = plane.zrati * rrv;
                let rrv = -(cth - rrv) / (cth + rrv);
                for f in [&mut f1, &mut f2] {
                    let gam = (f[0] * pxx + f[1] * pyy) * (rrv - rrh);
                    f[0] = f[0] * rrh + gam * pxx;
                    f[1] = f[1] * rrh + gam * pyy;
                    f[2] = f[2] * rrh;
                }
            }
        }

        for axis in 0..3 {
            out.t1[axis] += f1[axis];
            out.t2[axis] += f2[axis];
        }
    }

    out
}

/// Integral over the patches at a wire connection point (legacy `pcint`):
/// a fixed 10 by 10 grid over the four joined patches around the
/// connection, returning the interaction components for the connected
/// segment. The caller is the interaction-matrix fill for structures
/// where a wire terminates on a surface, which consumes the four
/// per-patch weights for each tangent direction plus the combined
/// singular term.
pub fn patch_connection_field(
    patch: &PatchSource,
    ground: &GroundModel,
    image: bool,
    obs: [f64; 3],
    obs_direction: [f64; 3],
) -> [Complex64; 9] {
    let nint = PATCH_QUADRATURE_POINTS;
    let d = patch.area.sqrt() * 0.5;
    let ds = 4.0 * d / nint as f64;
    let da = ds * ds;
    let gcon = 1.0 / patch.area;
    let fcon = 1.0 / (2.0 * TWO_PI * d);
    let [cabi, sabi, salpi] = obs_direction;

    let mut s1 = d + ds * 0.5;
    let mut xss = patch.position[0] + s1 * (patch.tangent1[0] + patch.tangent2[0]);
    let mut yss = patch.position[1] + s1 * (patch.tangent1[1] + patch.tangent2[1]);
    let mut zss = patch.position[2] + s1 * (patch.tangent1[2] + patch.tangent2[2]);
    s1 += d;
    let s2x = s1;
    let mut e = [CPLX_00; 9];

    for _ in 0..nint {
        s1 -= ds;
        let mut s2 = s2x;
        xss -= ds * patch.tangent1[0];
        yss -= ds * patch.tangent1[1];
        zss -= ds * patch.tangent1[2];
        let mut cell = PatchSource {
            position: [xss, yss, zss],
            tangent1: patch.tangent1,
            tangent2: patch.tangent2,
            area: da,
        };

        for _ in 0..nint {
            s2 -= ds;
            cell.position[0] -= ds * patch.tangent2[0];
            cell.position[1] -= ds * patch.tangent2[1];
            cell.position[2] -= ds * patch.tangent2[2];
            let pair = patch_unit_e_field(&cell, ground, image, obs);
            let exk = pair.t1[0] * cabi + pair.t1[1] * sabi + pair.t1[2] * salpi;
            let exs = pair.t2[0] * cabi + pair.t2[1] * sabi + pair.t2[2] * salpi;
            let g1 = (d + s1) * (d + s2) * gcon;
            let g2 = (d - s1) * (d + s2) * gcon;
            let g3 = (d - s1) * (d - s2) * gcon;
            let g4 = (d + s1) * (d - s2) * gcon;
            let f2 = (s1 * s1 + s2 * s2) * TWO_PI;
            let f1 = s1 / f2 - (g1 - g2 - g3 + g4) * fcon;
            let f2 = s2 / f2 - (g1 + g2 - g3 - g4) * fcon;
            e[0] += exk * g1;
            e[1] += exk * g2;
            e[2] += exk * g3;
            e[3] += exk * g4;
            e[4] += exs * g1;
            e[5] += exs * g2;
            e[6] += exs * g3;
            e[7] += exs * g4;
            e[8] += exk * f1 + exs * f2;
        }
    }

    e
}
