//! Atom and bond subsets of a molecule.

use crate::utils::bitset::BitSet;
use petgraph::visit::*;

/// A subset of a molecule's atoms and bonds.
///
/// Atoms are node indices, bonds are positions in the graph's `edge_references()` order (which
/// is `EdgeIndex::index()` for a `Graph`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    atoms: BitSet<usize, 2>,
    bonds: BitSet<usize, 2>,
}
impl Fragment {
    pub const fn new() -> Self {
        Self {
            atoms: BitSet::new(),
            bonds: BitSet::new(),
        }
    }
    pub fn from_parts(
        atoms: impl IntoIterator<Item = usize>,
        bonds: impl IntoIterator<Item = usize>,
    ) -> Self {
        Self {
            atoms: atoms.into_iter().collect(),
            bonds: bonds.into_iter().collect(),
        }
    }
    /// The given atoms and every bond between two of them.
    pub fn induced<G: IntoEdgeReferences + NodeIndexable>(
        graph: G,
        atoms: impl IntoIterator<Item = usize>,
    ) -> Self {
        let atoms: BitSet<usize, 2> = atoms.into_iter().collect();
        let bonds = graph
            .edge_references()
            .enumerate()
            .filter(|(_, e)| {
                atoms.get(graph.to_index(e.source())) && atoms.get(graph.to_index(e.target()))
            })
            .map(|(id, _)| id)
            .collect();
        Self { atoms, bonds }
    }
    /// The given bonds and the atoms at their ends.
    pub fn from_bonds<G: IntoEdgeReferences + NodeIndexable>(
        graph: G,
        bonds: impl IntoIterator<Item = usize>,
    ) -> Self {
        let bonds: BitSet<usize, 2> = bonds.into_iter().collect();
        let atoms = graph
            .edge_references()
            .enumerate()
            .filter(|(id, _)| bonds.get(*id))
            .flat_map(|(_, e)| [graph.to_index(e.source()), graph.to_index(e.target())])
            .collect();
        Self { atoms, bonds }
    }

    pub fn add_atom(&mut self, atom: usize) {
        self.atoms.set(atom, true);
    }
    pub fn add_bond(&mut self, bond: usize) {
        self.bonds.set(bond, true);
    }
    pub fn contains_atom(&self, atom: usize) -> bool {
        self.atoms.get(atom)
    }
    pub fn contains_bond(&self, bond: usize) -> bool {
        self.bonds.get(bond)
    }
    pub fn atom_count(&self) -> usize {
        self.atoms.count_ones()
    }
    pub fn bond_count(&self) -> usize {
        self.bonds.count_ones()
    }
    pub fn atoms(&self) -> impl Iterator<Item = usize> + '_ {
        self.atoms.iter_ones()
    }
    pub fn bonds(&self) -> impl Iterator<Item = usize> + '_ {
        self.bonds.iter_ones()
    }
}
