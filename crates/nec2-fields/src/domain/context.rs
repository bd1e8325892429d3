//! Per-source-element scratch state.
//!
//! The legacy code kept this in the process-wide `dataj` common block with
//! an implicit one-active-evaluation contract. Here every kernel receives
//! the context by reference, so concurrent evaluations simply own separate
//! contexts.

use crate::common::constants::{CPLX_00, DEFAULT_LUMPED_THRESHOLD};
use crate::domain::geometry::{Patch, Segment, SegmentEndKind};
use num_complex::Complex64;

/// Working state for one wire-segment source element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceContext {
    /// Source midpoint (legacy `xj`, `yj`, `zj`), wavelengths.
    pub position: [f64; 3],
    /// Direction cosines (legacy `cabj`, `sabj`, `salpj`).
    pub direction: [f64; 3],
    /// Segment length (legacy `s`), wavelengths.
    pub length: f64,
    /// Wire radius (legacy `b`), wavelengths.
    pub radius: f64,
    /// Extended-thin-wire selector (legacy `iexk`).
    pub extended_thin_wire: bool,
    /// End classifications (legacy `ind1`, `ind2`).
    pub end1: SegmentEndKind,
    pub end2: SegmentEndKind,
    /// Separation beyond which the lumped current-element approximation
    /// replaces the closed forms (legacy `rkh`), wavelengths.
    pub lumped_threshold: f64,
}

impl SourceContext {
    /// Load the context from a segment, with end treatment filled in by the
    /// assembly driver when the extended approximation is active.
    pub fn from_segment(segment: &Segment) -> Self {
        Self {
            position: segment.midpoint,
            direction: segment.direction,
            length: segment.length,
            radius: segment.radius,
            extended_thin_wire: false,
            end1: SegmentEndKind::Open,
            end2: SegmentEndKind::Open,
            lumped_threshold: DEFAULT_LUMPED_THRESHOLD,
        }
    }
}

/// Working state for one surface-patch source element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatchSource {
    pub position: [f64; 3],
    pub tangent1: [f64; 3],
    pub tangent2: [f64; 3],
    /// Patch area (reused as the sub-cell area by the connection
    /// quadrature), square wavelengths.
    pub area: f64,
}

impl PatchSource {
    pub fn from_patch(patch: &Patch) -> Self {
        Self {
            position: patch.centroid,
            tangent1: patch.tangent1,
            tangent2: patch.tangent2,
            area: patch.area,
        }
    }
}

/// Complex (Ex, Ey, Ez) contributions of one element for the constant,
/// sine and cosine basis functions. Always zeroed before an element's
/// contribution is computed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldTriple {
    pub constant: [Complex64; 3],
    pub sine: [Complex64; 3],
    pub cosine: [Complex64; 3],
}

impl FieldTriple {
    pub fn zero() -> Self {
        Self {
            constant: [CPLX_00; 3],
            sine: [CPLX_00; 3],
            cosine: [CPLX_00; 3],
        }
    }

    /// Weight the three basis contributions by an element's solved current
    /// coefficients and fold them into a point accumulator.
    pub fn accumulate_weighted(
        &self,
        acc: &mut [Complex64; 3],
        constant: Complex64,
        sine: Complex64,
        cosine: Complex64,
    ) {
        for axis in 0..3 {
            acc[axis] +=
                self.constant[axis] * constant + self.sine[axis] * sine + self.cosine[axis] * cosine;
        }
    }

    /// View as the legacy nine-element layout: constant xyz, sine xyz,
    /// cosine xyz.
    pub fn from_flat(e: [Complex64; 9]) -> Self {
        Self {
            constant: [e[0], e[1], e[2]],
            sine: [e[3], e[4], e[5]],
            cosine: [e[6], e[7], e[8]],
        }
    }

    pub fn add_assign(&mut self, other: &FieldTriple) {
        for axis in 0..3 {
            self.constant[axis] += other.constant[axis];
            self.sine[axis] += other.sine[axis];
            self.cosine[axis] += other.cosine[axis];
        }
    }
}
