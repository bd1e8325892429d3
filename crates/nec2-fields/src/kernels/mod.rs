pub(crate) mod hfield;
pub(crate) mod patch;
pub(crate) mod segment;

pub use patch::patch_connection_field;
