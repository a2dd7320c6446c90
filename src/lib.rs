//! Treeline - procedural forests and tile-based vegetation lifecycle

pub mod core;
pub mod map;
pub mod simulation;
pub mod vegetation;

#[cfg(test)]
pub(crate) mod test_support;
