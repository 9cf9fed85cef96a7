//! Small containers used by the engine.

pub mod bitset;
