//! Rendering of sweep results for humans and for the plotting layer.

pub mod json;
pub mod terminal;
