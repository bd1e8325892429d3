//! Solved current coefficients produced by the (external) matrix-solve
//! stage and consumed read-only by the field engine.

use num_complex::Complex64;

/// Per-element complex current weights.
///
/// Each wire segment carries three basis-function weights: constant
/// (legacy `air + j aii`), sine (`bir + j bii`) and cosine
/// (`cir + j cii`). Each patch carries one complex surface-current vector
/// (the legacy `cur` triplets appended after the wire unknowns); the
/// kernels project it onto the patch tangents.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SolvedCurrents {
    pub constant: Vec<Complex64>,
    pub sine: Vec<Complex64>,
    pub cosine: Vec<Complex64>,
    pub patch: Vec<[Complex64; 3]>,
}

impl SolvedCurrents {
    /// Uniform unit constant current on `segments` wire segments, no
    /// patches. Convenient for canonical test structures.
    pub fn unit_constant(segments: usize) -> Self {
        Self {
            constant: vec![Complex64::new(1.0, 0.0); segments],
            sine: vec![Complex64::new(0.0, 0.0); segments],
            cosine: vec![Complex64::new(0.0, 0.0); segments],
            patch: Vec::new(),
        }
    }

    pub fn segment_count(&self) -> usize {
        self.constant.len()
    }

    pub fn is_consistent(&self) -> bool {
        self.sine.len() == self.constant.len() && self.cosine.len() == self.constant.len()
    }
}
