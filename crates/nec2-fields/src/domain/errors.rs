#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldError {
    #[error("near-field grid requires at least one sample per axis, got {nx}x{ny}x{nz}")]
    EmptyGrid { nx: usize, ny: usize, nz: usize },
    #[error("structure wavelength must be finite and positive, got {value}")]
    InvalidWavelength { value: f64 },
    #[error("segment current coefficients cover {actual} segments, structure has {expected}")]
    SegmentCurrentMismatch { expected: usize, actual: usize },
    #[error("patch current vectors cover {actual} patches, structure has {expected}")]
    PatchCurrentMismatch { expected: usize, actual: usize },
    #[error("segment {segment} end {end} connection code {code} points outside the {count}-segment table")]
    InvalidConnection {
        segment: usize,
        end: u8,
        code: i32,
        count: usize,
    },
    #[error("Sommerfeld-Norton ground requires an interpolation table for the near region")]
    MissingSommerfeldTable,
}
