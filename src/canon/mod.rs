//! Canonical atom ranking by partition refinement.
//!
//! Ranking starts with every atom in one partition (or with caller-chosen partitions), refines on
//! atom invariants alone, then on neighborhoods until nothing more splits, and finally forces any
//! remaining ties apart so the ranks are a permutation.

use crate::core::{Atom, Bond};
use crate::graph::{Fragment, RingInfo};
use crate::utils::bitset::BitSet;
use petgraph::visit::*;
use thiserror::Error;
use tracing::{debug, instrument};

pub mod atoms;
pub mod compare;
pub mod refine;
pub mod sort;

pub use atoms::{BondHolder, CanonAtom, CanonAtoms};
pub use compare::{AtomCompare, AtomComparator, ChiralAtomComparator, CompareContext};
pub use refine::{Link, Partitions, Worklist};
pub use sort::hanoi_sort;

/// Per-atom flags.
pub type AtomSet = BitSet<usize, 4>;

/// Which invariants take part in ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankConfig {
    pub isotopes: bool,
    /// Compare CIP labels, chiral tag presence, and bond stereo
    pub chirality: bool,
    pub ring_stereo: bool,
    /// Refine on neighborhoods after the atoms themselves
    pub neighbors: bool,
    /// Force a total order
    pub break_ties: bool,
}
impl RankConfig {
    /// Everything on, gives a total order.
    pub const fn new() -> Self {
        Self {
            isotopes: true,
            chirality: true,
            ring_stereo: true,
            neighbors: true,
            break_ties: true,
        }
    }
    /// Leave symmetric atoms tied, useful for finding symmetry classes.
    pub const fn ties() -> Self {
        Self {
            break_ties: false,
            ..Self::new()
        }
    }
    pub const fn with_isotopes(mut self, isotopes: bool) -> Self {
        self.isotopes = isotopes;
        self
    }
    /// Ring stereo follows chirality.
    pub const fn with_chirality(mut self, chirality: bool) -> Self {
        self.chirality = chirality;
        self.ring_stereo = chirality;
        self
    }
    pub const fn with_ring_stereo(mut self, ring_stereo: bool) -> Self {
        self.ring_stereo = ring_stereo;
        self
    }
    pub const fn with_neighbors(mut self, neighbors: bool) -> Self {
        self.neighbors = neighbors;
        self
    }
    pub const fn with_break_ties(mut self, break_ties: bool) -> Self {
        self.break_ties = break_ties;
        self
    }
}
impl Default for RankConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RankError {
    #[error("expected a label for each of {expected} atoms, found {found}")]
    LabelCount { expected: usize, found: usize },
    #[error("expected a seed for each of {expected} atoms, found {found}")]
    SeedCount { expected: usize, found: usize },
    #[error("fragment refers to atom {atom}, but there are only {atoms} atoms")]
    FragmentOutOfBounds { atom: usize, atoms: usize },
}

fn rank_partitions(mut parts: Partitions, cfg: RankConfig) -> Vec<usize> {
    let cmp = AtomComparator::from_config(&cfg);
    parts.activate();
    parts.refine(&cmp, false);
    let cmp = cmp.with_nbrs(cfg.neighbors);
    if cfg.neighbors {
        parts.activate();
        parts.refine(&cmp, true);
    }
    debug!(partitions = parts.num_partitions(), "refined to a fixed point");
    if cfg.break_ties {
        parts.break_ties(&cmp);
    }
    parts.into_ranks()
}

/// Rank the atoms of a snapshot. The result is indexed by atom.
#[instrument(level = "debug", skip_all, fields(atoms = atoms.len()))]
pub fn rank_atoms(atoms: &CanonAtoms, cfg: RankConfig) -> Vec<usize> {
    rank_partitions(Partitions::single(atoms.as_slice()), cfg)
}

/// Rank the atoms of a snapshot, starting from the partitions given by `seeds`. Atoms with a lower
/// seed always rank lower.
#[instrument(level = "debug", skip_all, fields(atoms = atoms.len()))]
pub fn rank_atoms_seeded(
    atoms: &CanonAtoms,
    seeds: &[usize],
    cfg: RankConfig,
) -> Result<Vec<usize>, RankError> {
    Partitions::seeded(atoms.as_slice(), seeds).map(|parts| rank_partitions(parts, cfg))
}

/// Rank for stereo parity. Ties are left in place.
#[instrument(level = "debug", skip_all, fields(atoms = atoms.len()))]
pub fn chiral_rank_atoms(atoms: &CanonAtoms) -> Vec<usize> {
    let mut parts = Partitions::single(atoms.as_slice());
    let cmp = ChiralAtomComparator::new();
    parts.activate();
    parts.refine(&cmp, false);
    let cmp = cmp.with_nbrs(true);
    parts.activate();
    parts.refine(&cmp, true);
    debug!(partitions = parts.num_partitions(), "refined to a fixed point");
    parts.into_ranks()
}

/// Rank every atom of a molecule.
pub fn rank_mol_atoms<G>(graph: G, cfg: RankConfig) -> Vec<usize>
where
    G: Data<NodeWeight = Atom, EdgeWeight = Bond>
        + IntoNodeReferences
        + IntoEdgeReferences
        + NodeCompactIndexable,
{
    rank_atoms(&CanonAtoms::from_graph(graph), cfg)
}

/// Rank the atoms of a fragment, optionally overriding every atom's chemistry with a label.
///
/// Nothing outside the fragment affects the ranks of atoms in it, and those atoms take the ranks
/// `0..k`. Atoms outside of it rank after them in no meaningful order.
#[instrument(level = "debug", skip_all, fields(atoms = graph.node_count(), in_play = fragment.atom_count()))]
pub fn rank_fragment_atoms<G, S>(
    graph: G,
    fragment: &Fragment,
    labels: Option<&[S]>,
    cfg: RankConfig,
) -> Result<Vec<usize>, RankError>
where
    G: Data<NodeWeight = Atom, EdgeWeight = Bond>
        + IntoNodeReferences
        + IntoEdgeReferences
        + NodeCompactIndexable,
    S: AsRef<str>,
{
    let n = graph.node_count();
    if let Some(atom) = fragment.atoms().find(|&a| a >= n) {
        return Err(RankError::FragmentOutOfBounds { atom, atoms: n });
    }
    let rings = RingInfo::perceive_filtered(graph, |id, a, b| {
        fragment.contains_bond(id) && fragment.contains_atom(a) && fragment.contains_atom(b)
    });
    let mut atoms = CanonAtoms::fragment(graph, &rings, fragment);
    if let Some(labels) = labels {
        atoms.set_labels(labels)?;
    }
    Ok(rank_atoms(&atoms, cfg))
}

/// Rank every atom of a molecule for stereo parity.
pub fn chiral_rank_mol_atoms<G>(graph: G) -> Vec<usize>
where
    G: Data<NodeWeight = Atom, EdgeWeight = Bond>
        + IntoNodeReferences
        + IntoEdgeReferences
        + NodeCompactIndexable,
{
    chiral_rank_atoms(&CanonAtoms::from_graph(graph))
}
