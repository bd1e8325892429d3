//! Field assembly over all source elements and grid sampling drivers.

mod assembly;
mod grid;

pub use assembly::{EngineOptions, FieldEngine};
pub use grid::{
    total_field_sample, FieldQuantity, GridKind, GridSpec, NearFieldPattern, TotalFieldMode,
};
