
mod model;
mod rings;
mod utils;

use crate::core::*;
use petgraph::prelude::*;
use rand::prelude::*;

/// Build a molecule from atoms and `(a, b, kind)` bonds.
pub fn mol_with(
    atoms: impl IntoIterator<Item = Atom>,
    bonds: impl IntoIterator<Item = (usize, usize, BondKind)>,
) -> MoleculeGraph {
    let mut graph = MoleculeGraph::default();
    let nodes: Vec<_> = atoms.into_iter().map(|a| graph.add_node(a)).collect();
    for (a, b, kind) in bonds {
        graph.add_edge(nodes[a], nodes[b], Bond::new(kind));
    }
    graph
}

/// Build a molecule from atomic numbers and single bonds.
pub fn mol(protons: &[u8], bonds: &[(usize, usize)]) -> MoleculeGraph {
    mol_with(
        protons.iter().map(|&p| Atom::new(p)),
        bonds.iter().map(|&(a, b)| (a, b, BondKind::Single)),
    )
}

/// A ring of `n` identical atoms, atom `i` bonded to `i + 1`.
pub fn ring(protons: u8, n: usize, kind: BondKind) -> MoleculeGraph {
    mol_with(
        std::iter::repeat(Atom::new(protons)).take(n),
        (0..n).map(|i| (i, (i + 1) % n, kind)),
    )
}

pub fn benzene() -> MoleculeGraph {
    ring(6, 6, BondKind::Aromatic)
}

pub fn toluene() -> MoleculeGraph {
    let mut graph = benzene();
    let methyl = graph.add_node(Atom::new(6));
    graph.add_edge(NodeIndex::new(0), methyl, Bond::new(BondKind::Single));
    graph
}

pub fn naphthalene() -> MoleculeGraph {
    mol_with(
        std::iter::repeat(Atom::new(6)).take(10),
        [
            (0, 1),
            (1, 2),
            (2, 3),
            (3, 4),
            (4, 5),
            (5, 0),
            (4, 6),
            (6, 7),
            (7, 8),
            (8, 9),
            (9, 5),
        ]
        .map(|(a, b)| (a, b, BondKind::Aromatic)),
    )
}

pub fn cubane() -> MoleculeGraph {
    mol(
        &[6; 8],
        &[
            (0, 1),
            (1, 2),
            (2, 3),
            (3, 0),
            (4, 5),
            (5, 6),
            (6, 7),
            (7, 4),
            (0, 4),
            (1, 5),
            (2, 6),
            (3, 7),
        ],
    )
}

/// K3,3: atoms 0-2 each bonded to atoms 3-5. All nine four-membered rings are equivalent.
pub fn k33() -> MoleculeGraph {
    let bonds: Vec<_> = (0..3).flat_map(|a| (3..6).map(move |b| (a, b))).collect();
    mol(&[6; 6], &bonds)
}

/// Bridgeheads 0-3, with a methylene between every pair of them.
pub fn adamantane() -> MoleculeGraph {
    mol(
        &[6; 10],
        &[
            (0, 4),
            (4, 1),
            (0, 5),
            (5, 2),
            (0, 6),
            (6, 3),
            (1, 7),
            (7, 2),
            (1, 8),
            (8, 3),
            (2, 9),
            (9, 3),
        ],
    )
}

/// Renumber a molecule so atom `i` becomes atom `perm[i]`. Bonds are reordered and flipped by
/// `rng` too, since neither should matter.
pub fn permuted(graph: &MoleculeGraph, perm: &[usize], rng: &mut impl Rng) -> MoleculeGraph {
    let mut atoms = vec![Atom::default(); graph.node_count()];
    for idx in graph.node_indices() {
        atoms[perm[idx.index()]] = graph[idx];
    }
    let mut bonds: Vec<_> = graph
        .edge_references()
        .map(|e| {
            let a = perm[e.source().index()];
            let b = perm[e.target().index()];
            if rng.gen() {
                (a, b, *e.weight())
            } else {
                (b, a, *e.weight())
            }
        })
        .collect();
    bonds.shuffle(rng);
    let mut out = MoleculeGraph::default();
    for atom in atoms {
        out.add_node(atom);
    }
    for (a, b, bond) in bonds {
        out.add_edge(NodeIndex::new(a), NodeIndex::new(b), bond);
    }
    out
}

/// A random renumbering of `0..n`.
pub fn random_perm(n: usize, rng: &mut impl Rng) -> Vec<usize> {
    let mut perm: Vec<usize> = (0..n).collect();
    perm.shuffle(rng);
    perm
}

/// The molecule renumbered by its ranks: atoms in rank order and sorted bonds between ranks.
/// Two molecules have the same canonical form exactly when their ranks agree up to symmetry.
pub fn canonical_form(
    graph: &MoleculeGraph,
    ranks: &[usize],
) -> (Vec<Atom>, Vec<(usize, usize, Bond)>) {
    let mut atoms = vec![Atom::default(); ranks.len()];
    for idx in graph.node_indices() {
        atoms[ranks[idx.index()]] = graph[idx];
    }
    let mut bonds: Vec<_> = graph
        .edge_references()
        .map(|e| {
            let a = ranks[e.source().index()];
            let b = ranks[e.target().index()];
            (a.min(b), a.max(b), *e.weight())
        })
        .collect();
    bonds.sort_by_key(|&(a, b, _)| (a, b));
    (atoms, bonds)
}

#[track_caller]
pub fn assert_permutation(ranks: &[usize]) {
    let mut sorted = ranks.to_vec();
    sorted.sort_unstable();
    assert_eq!(sorted, (0..ranks.len()).collect::<Vec<_>>(), "ranks: {ranks:?}");
}
