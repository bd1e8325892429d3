pub mod context;
pub mod currents;
pub mod errors;
pub mod geometry;
pub mod ground;

pub use context::{FieldTriple, PatchSource, SourceContext};
pub use currents::SolvedCurrents;
pub use errors::FieldError;
pub use geometry::{Patch, Segment, SegmentEndKind, Structure};
pub use ground::{
    GroundKind, GroundModel, GroundPlane, RadialScreen, SommerfeldComponents, SommerfeldTable,
};
