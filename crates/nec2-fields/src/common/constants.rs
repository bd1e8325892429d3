//! NEC2 physical constants and calibrated switch points.
//!
//! The numeric values are inherited from the legacy NEC2 field routines and
//! are calibrated against its reference outputs. They must not be "improved":
//! changing a threshold changes which algorithm evaluates a given geometry
//! and therefore changes physical results.

use num_complex::Complex64;

pub const PI: f64 = 3.141592654;
pub const TWO_PI: f64 = 6.283185308;
pub const HALF_PI: f64 = 1.570796327;
pub const FOUR_PI: f64 = 12.56637062;
pub const EIGHT_PI: f64 = 25.13274123;
/// Degrees to radians (legacy `TA`).
pub const DEG_TO_RAD: f64 = 1.745329252e-02;
/// Radians to degrees (legacy `TD`).
pub const RAD_TO_DEG: f64 = 57.29577951;
/// Free-space wave impedance in ohms, to legacy precision.
pub const ETA: f64 = 376.73;
pub const SQRT_PI: f64 = 1.772453851;
pub const TWO_OVER_SQRT_PI: f64 = 1.128379167;

pub const CPLX_00: Complex64 = Complex64::new(0.0, 0.0);
pub const CPLX_01: Complex64 = Complex64::new(0.0, 1.0);
pub const CPLX_10: Complex64 = Complex64::new(1.0, 0.0);
/// `j 2 pi`, the propagation factor per unit wavelength.
pub const J_TWO_PI: Complex64 = Complex64::new(0.0, TWO_PI);
/// `j eta / (8 pi^2)`, the thin-wire kernel scale (legacy `CONST1`).
pub const WIRE_KERNEL_SCALE: Complex64 = Complex64::new(0.0, 4.771341189);
/// `eta / (8 pi^2)`, the patch dipole scale (legacy `CONST2`).
pub const PATCH_KERNEL_SCALE: f64 = 4.771341188;
/// `j eta / 2`, the ground-wave scale (legacy `CONST4`).
pub const GROUND_WAVE_SCALE: Complex64 = Complex64::new(0.0, 188.365);

/// Perpendicular distances below this fraction of a wavelength are snapped
/// to axial-only geometry to avoid near-singular division.
pub const MIN_RADIAL_DISTANCE: f64 = 1.0e-10;
/// Horizontal source/observer separations below this are treated as a
/// vertical specular ray when forming ground reflection coefficients.
pub const MIN_HORIZONTAL_SEPARATION: f64 = 1.0e-6;
/// Squared distance below which a patch and an observation point are
/// coincident and the patch field is exactly zero.
pub const PATCH_COINCIDENCE_FLOOR: f64 = 1.0e-20;
/// Validity radius (normalized, squared units) of the near-exact-image
/// approximation; beyond it the Norton asymptotic ground wave is used,
/// below it the ground field is integrated over the segment.
pub const NEAR_IMAGE_VALIDITY: f64 = 0.95;
/// Default lumped-current-element separation threshold in wavelengths
/// (legacy `rkh`).
pub const DEFAULT_LUMPED_THRESHOLD: f64 = 1.0;
/// `kr` below this uses the small-argument series of the regularized
/// thin-wire integrand.
pub const GF_SERIES_SWITCH: f64 = 0.2;
/// `rh/z` ratio below which the closed-form segment H field switches to its
/// small-radius series branch.
pub const HSFLX_SERIES_SWITCH: f64 = 1.0e-3;
/// Direction cosines with a horizontal projection smaller than this are
/// treated as exactly vertical in the Sommerfeld/Norton setup.
pub const MIN_HORIZONTAL_PROJECTION: f64 = 1.0e-5;
/// `|j sqrt(p)|` above this switches the ground-wave attenuation function
/// from its power series to the asymptotic expansion.
pub const FBAR_ASYMPTOTIC_SWITCH: f64 = 3.0;
/// Relative series term cutoff for the attenuation function (legacy `ACCS`).
pub const SERIES_CUTOFF: f64 = 1.0e-12;

/// Relative tolerance of the adaptive quadrature engine (legacy `rx`).
pub const QUADRATURE_TOLERANCE: f64 = 1.0e-4;
/// Subdivision cap of the adaptive quadrature engine (legacy `nma`).
pub const MAX_SUBDIVISIONS: usize = 65_536;
/// Accepted-step streak after which the quadrature interval is re-doubled
/// (legacy `nts`).
pub const HALVING_STREAK: i32 = 4;
/// Grid dimension of the fixed wire-to-patch connection quadrature.
pub const PATCH_QUADRATURE_POINTS: usize = 10;

/// Alignment cosine above which two connected segments are electrically
/// continuous for extended-thin-wire end classification.
pub const ALIGNMENT_COSINE: f64 = 0.999999;
/// Relative radius mismatch above which connected segments form a junction.
pub const RADIUS_MATCH_TOLERANCE: f64 = 1.0e-6;
/// Connection codes above this value mark a segment end attached to a
/// surface patch.
pub const PATCH_CONNECTION_SENTINEL: i32 = 10_000;
