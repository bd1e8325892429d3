//! Ground plane model shared by every field kernel.
//!
//! The model state is immutable for the duration of one field computation
//! pass; it is set once per structure and frequency.

use crate::common::constants::CPLX_01;
use num_complex::Complex64;

/// Ground treatment selected by the legacy `iperf` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroundKind {
    /// Reflection-coefficient approximation for a finitely conducting
    /// ground (`iperf <= 0`).
    Finite,
    /// Perfectly conducting ground (`iperf = 1`).
    Perfect,
    /// Sommerfeld/Norton exact ground (`iperf = 2`): perfect-type image
    /// scaled by the image ratio, plus a ground-wave correction.
    SommerfeldNorton,
}

/// Radial-wire ground screen, modeled as a local modification of the
/// effective ground impedance inside the screen radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialScreen {
    /// Number of radial wires (legacy `nradl`).
    pub wire_count: u32,
    /// Screen radius in wavelengths (legacy `scrwl`).
    pub screen_radius: f64,
    /// Radius of the screen wires in wavelengths (legacy `scrwr`).
    pub wire_radius: f64,
}

impl RadialScreen {
    /// Per-wire inductive impedance coefficient, `j 3 pi / (4 n)`
    /// (legacy `t1`).
    pub fn impedance_coefficient(&self) -> Complex64 {
        CPLX_01 * 2.356194491 / f64::from(self.wire_count)
    }

    /// Effective wire-spacing radius `n * scrwr` (legacy `t2`).
    pub fn spacing_radius(&self) -> f64 {
        self.wire_radius * f64::from(self.wire_count)
    }
}

/// A ground plane at z = 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundPlane {
    pub kind: GroundKind,
    /// Complex ground impedance ratio `1/sqrt(eps_c)` (legacy `zrati`);
    /// zero for a perfect conductor.
    pub zrati: Complex64,
    /// Image-current ratio (legacy `frati`): unity except for the
    /// Sommerfeld ground, where it is `(eps_c - 1)/(eps_c + 1)`.
    pub frati: Complex64,
    pub screen: Option<RadialScreen>,
}

impl GroundPlane {
    pub fn perfect() -> Self {
        Self {
            kind: GroundKind::Perfect,
            zrati: Complex64::new(0.0, 0.0),
            frati: Complex64::new(1.0, 0.0),
            screen: None,
        }
    }

    pub fn finite(zrati: Complex64, screen: Option<RadialScreen>) -> Self {
        Self {
            kind: GroundKind::Finite,
            zrati,
            frati: Complex64::new(1.0, 0.0),
            screen,
        }
    }

    pub fn sommerfeld_norton(zrati: Complex64, frati: Complex64) -> Self {
        Self {
            kind: GroundKind::SommerfeldNorton,
            zrati,
            frati,
            screen: None,
        }
    }
}

/// Symmetry state of the whole computation (legacy `ksymp`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GroundModel {
    FreeSpace,
    Plane(GroundPlane),
}

impl GroundModel {
    pub fn plane(&self) -> Option<&GroundPlane> {
        match self {
            GroundModel::FreeSpace => None,
            GroundModel::Plane(plane) => Some(plane),
        }
    }

    /// Number of source terms per element: direct only, or direct plus
    /// ground image.
    pub fn image_count(&self) -> usize {
        match self {
            GroundModel::FreeSpace => 1,
            GroundModel::Plane(_) => 2,
        }
    }
}

/// Interpolated Sommerfeld ground-field components at one specular-ray
/// geometry: vertical-dipole (`erv`, `ezv`) and horizontal-dipole (`erh`,
/// `eph`) terms, without the `exp(-jkr)/r` range factor.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SommerfeldComponents {
    pub erv: Complex64,
    pub ezv: Complex64,
    pub erh: Complex64,
    pub eph: Complex64,
}

/// Consumer side of the precomputed Sommerfeld integral tables. Table
/// generation is an upstream concern; the engine only interpolates.
pub trait SommerfeldTable {
    /// Fields at range `r` (wavelengths) and elevation angle `theta`
    /// (radians) of the observation point above the specular point.
    fn fields(&self, r: f64, theta: f64) -> SommerfeldComponents;
}
