//! Patch document inspection.

pub mod index;

pub use index::PatchIndex;
