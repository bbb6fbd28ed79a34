/// Canvas, color and geometry primitives.
pub mod core;
/// Crate error type.
pub mod error;
pub(crate) mod math;
