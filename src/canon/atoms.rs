//! The invariant snapshot: everything the comparators look at, pulled out of the molecule once.

use super::RankError;
use crate::core::*;
use crate::graph::{Fragment, RingInfo};
use petgraph::visit::*;
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::ops::Index;
use tracing::{debug, instrument};

/// A bond, seen from one of its atoms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BondHolder {
    pub kind: BondKind,
    pub stereo: BondStereo,
    /// The atom at the far end
    pub nbr: usize,
    /// The symmetry class of `nbr`. Only meaningful inside a comparison, where it's refreshed
    /// from the live ranks.
    pub nbr_class: usize,
}
impl BondHolder {
    pub const fn new(kind: BondKind, stereo: BondStereo, nbr: usize) -> Self {
        Self {
            kind,
            stereo,
            nbr,
            nbr_class: 0,
        }
    }
    /// Compare by bond kind, then stereo, then neighbor class. Classes are divided by `div`
    /// first, so a coarse pass can ignore the low part of the class.
    pub fn compare(&self, other: &Self, div: usize) -> Ordering {
        self.kind
            .cmp(&other.kind)
            .then(self.stereo.cmp(&other.stereo))
            .then_with(|| (self.nbr_class / div).cmp(&(other.nbr_class / div)))
    }
}

/// Invariants of a single atom.
#[derive(Debug, Clone)]
pub struct CanonAtom {
    pub atom: Atom,
    pub degree: usize,
    pub total_hs: u8,
    pub ring_members: u8,
    /// Some neighbor is a ring stereo atom
    pub has_ring_nbr: bool,
    pub is_ring_stereo: bool,
    /// Part of the fragment being ranked. Always true for whole-molecule snapshots.
    pub in_play: bool,
    pub nbrs: SmallVec<usize, 4>,
    /// Overrides chemistry when both atoms in a comparison have one
    pub label: Option<Box<str>>,
    pub bonds: SmallVec<BondHolder, 4>,
}
impl CanonAtom {
    fn new(atom: Atom, ring_members: u8, in_play: bool) -> Self {
        Self {
            atom,
            degree: 0,
            total_hs: atom.hydrogens(),
            ring_members,
            has_ring_nbr: false,
            is_ring_stereo: atom.chiral_tag().is_chiral() && atom.data.ring_stereo(),
            in_play,
            nbrs: SmallVec::new(),
            label: None,
            bonds: SmallVec::new(),
        }
    }
    fn push_bond(&mut self, bond: Bond, nbr: usize) {
        self.degree += 1;
        self.nbrs.push(nbr);
        self.bonds.push(BondHolder::new(bond.kind, bond.stereo, nbr));
    }

    #[inline(always)]
    pub fn cip_code(&self) -> u8 {
        self.atom.cip().code()
    }
    /// Only the presence of a tag is comparable, its value depends on neighbor order.
    #[inline(always)]
    pub fn has_chiral_tag(&self) -> bool {
        self.atom.chiral_tag().is_chiral()
    }
}

/// The invariant snapshot of a molecule, reusable across ranking configurations.
#[derive(Debug, Clone, Default)]
pub struct CanonAtoms {
    atoms: Vec<CanonAtom>,
    fragment: bool,
}
impl CanonAtoms {
    /// Build a snapshot, perceiving rings along the way.
    pub fn from_graph<G>(graph: G) -> Self
    where
        G: Data<NodeWeight = Atom, EdgeWeight = Bond>
            + IntoNodeReferences
            + IntoEdgeReferences
            + NodeCompactIndexable,
    {
        let rings = RingInfo::perceive(graph);
        Self::with_rings(graph, &rings)
    }
    /// Build a snapshot with ring membership from `rings`.
    #[instrument(level = "debug", skip_all, fields(atoms = graph.node_count()))]
    pub fn with_rings<G>(graph: G, rings: &RingInfo) -> Self
    where
        G: Data<NodeWeight = Atom, EdgeWeight = Bond>
            + IntoNodeReferences
            + IntoEdgeReferences
            + NodeCompactIndexable,
    {
        Self::build(graph, rings, None)
    }
    /// Build a snapshot of a fragment. Atoms outside of it stay in the snapshot but have no bonds
    /// and never affect how the fragment's atoms rank.
    #[instrument(level = "debug", skip_all, fields(atoms = graph.node_count(), in_play = fragment.atom_count()))]
    pub fn fragment<G>(graph: G, rings: &RingInfo, fragment: &Fragment) -> Self
    where
        G: Data<NodeWeight = Atom, EdgeWeight = Bond>
            + IntoNodeReferences
            + IntoEdgeReferences
            + NodeCompactIndexable,
    {
        Self::build(graph, rings, Some(fragment))
    }

    fn build<G>(graph: G, rings: &RingInfo, fragment: Option<&Fragment>) -> Self
    where
        G: Data<NodeWeight = Atom, EdgeWeight = Bond>
            + IntoNodeReferences
            + IntoEdgeReferences
            + NodeCompactIndexable,
    {
        let n = graph.node_count();
        let mut raw = vec![Atom::default(); n];
        for node in graph.node_references() {
            raw[graph.to_index(node.id())] = *node.weight();
        }
        let mut atoms: Vec<CanonAtom> = raw
            .into_iter()
            .enumerate()
            .map(|(i, atom)| {
                let in_play = fragment.map_or(true, |f| f.contains_atom(i));
                CanonAtom::new(atom, rings.num_atom_rings(i), in_play)
            })
            .collect();
        for (id, edge) in graph.edge_references().enumerate() {
            let a = graph.to_index(edge.source());
            let b = graph.to_index(edge.target());
            if a == b {
                continue;
            }
            if let Some(f) = fragment {
                if !(f.contains_bond(id) && atoms[a].in_play && atoms[b].in_play) {
                    continue;
                }
            }
            let bond = *edge.weight();
            atoms[a].push_bond(bond, b);
            atoms[b].push_bond(bond, a);
        }
        for i in 0..n {
            let has_ring_nbr = atoms[i].nbrs.iter().any(|&j| atoms[j].is_ring_stereo);
            atoms[i].has_ring_nbr = has_ring_nbr;
        }
        debug!(
            bonds = atoms.iter().map(|a| a.degree).sum::<usize>() / 2,
            "built invariant snapshot"
        );
        Self {
            atoms,
            fragment: fragment.is_some(),
        }
    }

    /// Attach an override label to every atom. Atoms with labels are ordered by label instead of
    /// by their chemistry.
    pub fn set_labels<S: AsRef<str>>(&mut self, labels: &[S]) -> Result<(), RankError> {
        if labels.len() != self.atoms.len() {
            return Err(RankError::LabelCount {
                expected: self.atoms.len(),
                found: labels.len(),
            });
        }
        for (atom, label) in self.atoms.iter_mut().zip(labels) {
            atom.label = Some(label.as_ref().into());
        }
        Ok(())
    }
    pub fn clear_labels(&mut self) {
        for atom in &mut self.atoms {
            atom.label = None;
        }
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }
    /// Whether this snapshot was built for a fragment.
    pub fn is_fragment(&self) -> bool {
        self.fragment
    }
    pub fn as_slice(&self) -> &[CanonAtom] {
        &self.atoms
    }
    pub fn iter(&self) -> std::slice::Iter<'_, CanonAtom> {
        self.atoms.iter()
    }
}
impl Index<usize> for CanonAtoms {
    type Output = CanonAtom;
    fn index(&self, idx: usize) -> &CanonAtom {
        &self.atoms[idx]
    }
}
impl<'a> IntoIterator for &'a CanonAtoms {
    type Item = &'a CanonAtom;
    type IntoIter = std::slice::Iter<'a, CanonAtom>;
    fn into_iter(self) -> Self::IntoIter {
        self.atoms.iter()
    }
}
