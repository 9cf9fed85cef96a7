pub mod canon;
pub mod core;
pub mod graph;
pub mod utils;

pub mod prelude {
    pub use crate::canon::{
        chiral_rank_atoms, chiral_rank_mol_atoms, rank_atoms, rank_atoms_seeded,
        rank_fragment_atoms, rank_mol_atoms, CanonAtoms, RankConfig, RankError,
    };
    pub use crate::core::*;
    pub use crate::graph::{Fragment, RingInfo};
}

#[cfg(test)]
mod tests;
