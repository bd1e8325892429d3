//! Near- and far-field evaluation engine for method-of-moments antenna
//! solutions in the NEC2 formulation.
//!
//! The crate consumes a solved structure (wire segments with
//! constant/sine/cosine current coefficients, surface patches with
//! surface-current vectors) and evaluates electric and magnetic near
//! fields at arbitrary points, over rectangular or spherical sampling
//! grids, in free space or over a ground plane (perfectly conducting,
//! reflection-coefficient, or Sommerfeld/Norton). Far-field gain
//! post-processing (polarization weighting and display scaling) lives in
//! [`farfield`].
//!
//! Numeric switch points and constants reproduce the legacy NEC2 field
//! routines; see [`common::constants`].

pub mod common;
pub mod domain;
pub mod farfield;
mod groundwave;
mod kernels;
pub mod numerics;
pub mod sampling;

pub use domain::{
    FieldError, GroundKind, GroundModel, GroundPlane, Patch, RadialScreen, Segment,
    SegmentEndKind, SolvedCurrents, SommerfeldComponents, SommerfeldTable, Structure,
};
pub use farfield::{
    inverse_scale_gain, polarization_factor, polarized_gain, scale_gain, GainScaling, Polarization,
};
pub use kernels::patch_connection_field;
pub use sampling::{
    total_field_sample, EngineOptions, FieldEngine, FieldQuantity, GridKind, GridSpec,
    NearFieldPattern, TotalFieldMode,
};
