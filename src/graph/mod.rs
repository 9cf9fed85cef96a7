//! Graph utilities.

pub mod fragment;
pub mod rings;

pub use fragment::Fragment;
pub use rings::RingInfo;
