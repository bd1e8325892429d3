//! Wire/patch structure geometry consumed by the field kernels.
//!
//! All lengths are normalized to wavelengths, matching the legacy NEC2
//! convention where the geometry tables are scaled by `wlam` before any
//! field evaluation. Observation points handed to the sampling driver are
//! in physical units and are normalized on entry.

use serde::{Deserialize, Serialize};

/// One thin-wire segment of the solved structure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Segment midpoint, in wavelengths.
    pub midpoint: [f64; 3],
    /// Direction cosines of the segment axis (legacy `cab`, `sab`, `salp`).
    pub direction: [f64; 3],
    /// Segment length in wavelengths (legacy `si`).
    pub length: f64,
    /// Wire radius in wavelengths (legacy `bi`).
    pub radius: f64,
    /// Connection code of end one (legacy `icon1`): `0` open, `+k` joined to
    /// end two of segment `k` (one-based), `-k` joined to end one of segment
    /// `k`, values above [`PATCH_CONNECTION_SENTINEL`] attached to a patch.
    ///
    /// [`PATCH_CONNECTION_SENTINEL`]: crate::common::constants::PATCH_CONNECTION_SENTINEL
    pub connection1: i32,
    /// Connection code of end two (legacy `icon2`), same encoding.
    pub connection2: i32,
}

/// One flat surface patch, modeled as a pair of orthogonal tangential
/// dipoles scaled by the patch area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Patch {
    /// Patch centroid, in wavelengths.
    pub centroid: [f64; 3],
    /// First tangent unit vector (legacy `t1`).
    pub tangent1: [f64; 3],
    /// Second tangent unit vector (legacy `t2`).
    pub tangent2: [f64; 3],
    /// Patch area in square wavelengths (legacy `pbi`).
    pub area: f64,
}

/// The solved structure: geometry only, currents live in
/// [`SolvedCurrents`](crate::domain::SolvedCurrents).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    pub segments: Vec<Segment>,
    pub patches: Vec<Patch>,
    /// Wavelength in physical units (legacy `wlam`), used to normalize
    /// observation coordinates.
    pub wavelength: f64,
}

/// Electrical classification of a segment end, driving the extended
/// thin-wire treatment (legacy `ind1`/`ind2` values 0, 1 and 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SegmentEndKind {
    /// Joined to a collinear segment of matching radius; the current is
    /// continuous across the end and no end correction applies.
    Continuous,
    /// Free end.
    #[default]
    Open,
    /// Junction with a bent or radius-mismatched neighbor, or a patch
    /// attachment; the extended end correction falls back to the plain
    /// thin-wire form at this end.
    Junction,
}

impl SegmentEndKind {
    /// Whether the extended end expansion is evaluated at this end.
    pub fn uses_extended_expansion(self) -> bool {
        !matches!(self, SegmentEndKind::Junction)
    }
}
