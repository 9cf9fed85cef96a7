//! Ring perception, reduced to what ranking needs: the rings each atom belongs to.
//!
//! Rings are the *relevant cycles* of the graph, the cycles that can't be written as a sum (over
//! GF(2), as edge sets) of strictly shorter cycles. Unlike a single smallest set of smallest
//! rings, this set doesn't depend on how the atoms are numbered, so neither do the counts.

use crate::utils::bitset::BitSet;
use ahash::AHashSet;
use petgraph::unionfind::UnionFind;
use petgraph::visit::*;
use smallvec::{smallvec, SmallVec};
use std::collections::VecDeque;
use tracing::{debug, instrument};

type EdgeSet = BitSet<usize, 2>;
type NodeSet = BitSet<usize, 2>;
type Adjacency = Vec<SmallVec<(usize, usize), 4>>;

/// Shortest paths out of a root that only pass through atoms numbered below it.
///
/// Every relevant cycle is made of two such paths out of its highest-numbered atom, so rooting
/// the search there finds each one exactly once.
#[derive(Debug, Clone)]
struct PathDag {
    root: usize,
    dist: Vec<usize>,
    preds: Vec<SmallVec<(usize, usize), 2>>,
}
impl PathDag {
    fn new(adj: &Adjacency, root: usize, queue: &mut VecDeque<usize>) -> Self {
        let n = adj.len();
        let mut dist = vec![usize::MAX; n];
        let mut preds = vec![SmallVec::new(); n];
        dist[root] = 0;
        queue.clear();
        queue.push_back(root);
        while let Some(node) = queue.pop_front() {
            // every predecessor of `node` was popped before it
            let reached = node == root || !preds[node].is_empty();
            for &(next, ei) in &adj[node] {
                if dist[next] == usize::MAX {
                    dist[next] = dist[node] + 1;
                    queue.push_back(next);
                }
                if reached && next < root && dist[next] == dist[node] + 1 {
                    preds[next].push((node, ei));
                }
            }
        }
        Self { root, dist, preds }
    }

    fn contains(&self, node: usize) -> bool {
        node == self.root || !self.preds[node].is_empty()
    }

    /// One path out to `node`, as its bonds and its atoms other than the root.
    fn first_path(&self, node: usize, bonds: usize) -> (EdgeSet, NodeSet) {
        let mut edges = EdgeSet::with_capacity(bonds);
        let mut atoms = NodeSet::with_capacity(self.dist.len());
        let mut cur = node;
        while let Some(&(p, e)) = self.preds[cur].first() {
            atoms.set(cur, true);
            edges.set(e, true);
            cur = p;
        }
        (edges, atoms)
    }

    /// Every path out to `node`, as bond sets.
    fn all_paths(&self, node: usize, bonds: usize) -> Vec<EdgeSet> {
        if node == self.root {
            return vec![EdgeSet::with_capacity(bonds)];
        }
        self.preds[node]
            .iter()
            .flat_map(|&(p, e)| {
                self.all_paths(p, bonds).into_iter().map(move |mut path| {
                    path.set(e, true);
                    path
                })
            })
            .collect()
    }
}

/// Cycles made of a path out to each of two ends, closed by the bond between them or by two
/// bonds meeting at a shared atom. All members have the same length and differ only by sums of
/// shorter cycles, so the prototype decides relevance for the whole family.
#[derive(Debug, Clone)]
struct Family {
    len: usize,
    dag: usize,
    ends: (usize, usize),
    closing: SmallVec<usize, 2>,
    prototype: EdgeSet,
}
impl Family {
    fn members(&self, dag: &PathDag, bonds: usize) -> Vec<EdgeSet> {
        let right = dag.all_paths(self.ends.1, bonds);
        let mut out = Vec::new();
        for left in dag.all_paths(self.ends.0, bonds) {
            for path in &right {
                let mut set = left.clone();
                set ^= path;
                for &e in &self.closing {
                    set.set(e, true);
                }
                out.push(set);
            }
        }
        out
    }
}

/// Collect the families rooted at `dag.root`. Families whose paths share an atom besides the
/// root hold no relevant cycles and are skipped.
fn find_families(
    adj: &Adjacency,
    dag: &PathDag,
    index: usize,
    bonds: usize,
    out: &mut Vec<Family>,
) {
    let mut push = |ends: (usize, usize), closing: SmallVec<usize, 2>, len: usize| {
        let (mut prototype, left) = dag.first_path(ends.0, bonds);
        let (right_edges, right) = dag.first_path(ends.1, bonds);
        if left.iter_ones().any(|a| right.get(a)) {
            return;
        }
        prototype ^= &right_edges;
        for &e in &closing {
            prototype.set(e, true);
        }
        out.push(Family {
            len,
            dag: index,
            ends,
            closing,
            prototype,
        });
    };
    for y in 0..dag.root {
        if !dag.contains(y) {
            continue;
        }
        let d = dag.dist[y];
        for &(z, e) in &adj[y] {
            if z < y && dag.contains(z) && dag.dist[z] == d {
                push((y, z), smallvec![e], 2 * d + 1);
            }
        }
        let preds = &dag.preds[y];
        for (i, &(p, ep)) in preds.iter().enumerate() {
            for &(q, eq) in &preds[(i + 1)..] {
                push((p, q), smallvec![ep, eq], 2 * d);
            }
        }
    }
}

/// Ring membership for every atom of a graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RingInfo {
    counts: Vec<u8>,
    rings: Vec<Vec<usize>>,
    cycles: usize,
}
impl RingInfo {
    /// Use ring counts computed elsewhere.
    pub fn from_counts(counts: Vec<u8>) -> Self {
        Self {
            counts,
            rings: Vec::new(),
            cycles: 0,
        }
    }
    /// Perceive the rings of a whole graph.
    pub fn perceive<G: NodeCompactIndexable + IntoEdgeReferences>(graph: G) -> Self {
        Self::perceive_filtered(graph, |_, _, _| true)
    }
    /// Perceive rings using only the bonds `keep` accepts. It's called with the bond id (its
    /// position in `edge_references()`) and the indices of both ends.
    #[instrument(level = "debug", skip_all, fields(atoms = graph.node_count()))]
    pub fn perceive_filtered<G, F>(graph: G, mut keep: F) -> Self
    where
        G: NodeCompactIndexable + IntoEdgeReferences,
        F: FnMut(usize, usize, usize) -> bool,
    {
        let n = graph.node_count();
        let mut adj: Adjacency = vec![SmallVec::new(); n];
        let mut edges = Vec::new();
        let mut union = UnionFind::new(n);
        let mut cycles = 0;
        for (id, edge) in graph.edge_references().enumerate() {
            let a = graph.to_index(edge.source());
            let b = graph.to_index(edge.target());
            // a second bond between the same atoms doesn't close a ring
            if a == b || !keep(id, a, b) || adj[a].iter().any(|&(x, _)| x == b) {
                continue;
            }
            let ei = edges.len();
            edges.push((a, b));
            adj[a].push((b, ei));
            adj[b].push((a, ei));
            if !union.union(a, b) {
                cycles += 1;
            }
        }
        let mut out = Self {
            counts: vec![0; n],
            rings: Vec::new(),
            cycles,
        };
        if cycles == 0 {
            return out;
        }

        let bonds = edges.len();
        let mut dags = Vec::new();
        let mut families = Vec::new();
        let mut queue = VecDeque::new();
        for root in 0..n {
            if adj[root].len() < 2 {
                continue;
            }
            let dag = PathDag::new(&adj, root, &mut queue);
            let before = families.len();
            find_families(&adj, &dag, dags.len(), bonds, &mut families);
            if families.len() > before {
                dags.push(dag);
            }
        }
        families.sort_by_key(|f| f.len);

        // rows are kept reduced against every earlier pivot
        let mut basis: Vec<(usize, EdgeSet)> = Vec::with_capacity(cycles);
        let mut seen = AHashSet::new();
        let mut start = 0;
        while start < families.len() {
            let len = families[start].len;
            let end = start
                + families[start..]
                    .iter()
                    .take_while(|f| f.len == len)
                    .count();
            let shorter = basis.len();
            let relevant: Vec<&Family> = families[start..end]
                .iter()
                .filter(|f| !reduce(&basis[..shorter], f.prototype.clone()).all_zero())
                .collect();
            for family in relevant {
                for member in family.members(&dags[family.dag], bonds) {
                    if seen.insert(member.clone()) {
                        out.add_ring(&member, &edges);
                    }
                }
                let reduced = reduce(&basis, family.prototype.clone());
                if let Some(pivot) = reduced.first_one() {
                    basis.push((pivot, reduced));
                }
            }
            // anything longer is a sum of what we have
            if basis.len() == cycles {
                break;
            }
            start = end;
        }
        debug!(
            rings = out.rings.len(),
            families = families.len(),
            cycles,
            "perceived rings"
        );
        out
    }

    fn add_ring(&mut self, set: &EdgeSet, edges: &[(usize, usize)]) {
        let mut atoms: Vec<usize> = set
            .iter_ones()
            .flat_map(|e| {
                let (a, b) = edges[e];
                [a, b]
            })
            .collect();
        atoms.sort_unstable();
        atoms.dedup();
        for &a in &atoms {
            self.counts[a] = self.counts[a].saturating_add(1);
        }
        self.rings.push(atoms);
    }

    /// How many rings contain this atom. Atoms out of range are in no rings.
    pub fn num_atom_rings(&self, atom: usize) -> u8 {
        self.counts.get(atom).copied().unwrap_or(0)
    }
    pub fn is_in_ring(&self, atom: usize) -> bool {
        self.num_atom_rings(atom) > 0
    }
    /// The sorted atoms of each perceived ring. Empty if built with `from_counts`.
    pub fn rings(&self) -> &[Vec<usize>] {
        &self.rings
    }
    /// The cyclomatic number of the perceived bonds. Zero if built with `from_counts`.
    pub fn num_cycles(&self) -> usize {
        self.cycles
    }
    pub fn len(&self) -> usize {
        self.rings.len()
    }
    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }
}

fn reduce(rows: &[(usize, EdgeSet)], mut set: EdgeSet) -> EdgeSet {
    for (pivot, row) in rows {
        if set.get(*pivot) {
            set ^= row;
        }
    }
    set
}
