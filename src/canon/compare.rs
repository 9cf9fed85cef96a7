//! Three-way comparators over atom ids.
//!
//! A comparator is an immutable configuration. Everything that changes while ranking (the live
//! ranks) comes in through a [`CompareContext`] on each call.

use super::atoms::{BondHolder, CanonAtom};
use super::RankConfig;
use crate::core::BondStereo;
use smallvec::SmallVec;
use std::cmp::Ordering;

/// Multiplier for the neighbor rank in the ring neighbor code, the neighbor's position is added.
pub const RING_NBR_STRIDE: u64 = 1_000_000;

type Neighborhood = SmallVec<BondHolder, 8>;

/// What a comparator gets to see: the snapshot and the current rank of every atom.
#[derive(Debug, Clone, Copy)]
pub struct CompareContext<'a> {
    pub atoms: &'a [CanonAtom],
    pub ranks: &'a [usize],
}
impl<'a> CompareContext<'a> {
    pub fn new(atoms: &'a [CanonAtom], ranks: &'a [usize]) -> Self {
        assert_eq!(
            atoms.len(),
            ranks.len(),
            "rank vector doesn't match the invariant snapshot"
        );
        Self { atoms, ranks }
    }

    /// Zero unless a neighbor is a ring stereo atom, in which case it combines the first such
    /// neighbor's rank with its position among this atom's neighbors.
    pub fn ring_nbr_code(&self, i: usize) -> u64 {
        let atom = &self.atoms[i];
        if !atom.has_ring_nbr {
            return 0;
        }
        atom.nbrs
            .iter()
            .position(|&n| self.atoms[n].is_ring_stereo)
            .map_or(0, |pos| {
                self.ranks[atom.nbrs[pos]] as u64 * RING_NBR_STRIDE + pos as u64
            })
    }

    /// The bonds of an atom with fresh neighbor classes, sorted in descending order.
    fn neighborhood<F: Fn(&BondHolder) -> BondHolder>(&self, i: usize, refresh: F) -> Neighborhood {
        let mut out: Neighborhood = self.atoms[i].bonds.iter().map(refresh).collect();
        out.sort_unstable_by(|a, b| b.compare(a, 1));
        out
    }
}

/// A three-way comparison between two distinct atoms.
///
/// Implementations must be a strict weak ordering, and calling them with `i == j` is a bug.
pub trait AtomCompare {
    fn compare(&self, ctx: CompareContext<'_>, i: usize, j: usize) -> Ordering;
}

impl<C: AtomCompare + ?Sized> AtomCompare for &C {
    fn compare(&self, ctx: CompareContext<'_>, i: usize, j: usize) -> Ordering {
        C::compare(self, ctx, i, j)
    }
}

/// Atoms outside of a fragment tie with each other and go after everything in it.
fn play_order(a: &CanonAtom, b: &CanonAtom) -> Option<Ordering> {
    match (a.in_play, b.in_play) {
        (false, false) => Some(Ordering::Equal),
        (true, false) => Some(Ordering::Less),
        (false, true) => Some(Ordering::Greater),
        (true, true) => None,
    }
}

/// Compare over the common prefix only.
fn prefix_compare(a: &[BondHolder], b: &[BondHolder], div: usize) -> Ordering {
    a.iter()
        .zip(b)
        .map(|(x, y)| x.compare(y, div))
        .find(|o| o.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// The comparator used for general canonical ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtomComparator {
    pub isotopes: bool,
    pub chirality: bool,
    pub ring_stereo: bool,
    pub use_nbrs: bool,
}
impl AtomComparator {
    pub const fn new() -> Self {
        Self {
            isotopes: true,
            chirality: true,
            ring_stereo: true,
            use_nbrs: false,
        }
    }
    pub const fn from_config(cfg: &RankConfig) -> Self {
        Self {
            isotopes: cfg.isotopes,
            chirality: cfg.chirality,
            ring_stereo: cfg.ring_stereo,
            use_nbrs: false,
        }
    }
    pub const fn with_nbrs(mut self, use_nbrs: bool) -> Self {
        self.use_nbrs = use_nbrs;
        self
    }

    fn base_compare(&self, ctx: CompareContext<'_>, i: usize, j: usize) -> Ordering {
        let (a, b) = (&ctx.atoms[i], &ctx.atoms[j]);
        let ord = ctx.ranks[i].cmp(&ctx.ranks[j]);
        if ord.is_ne() {
            return ord;
        }
        if let Some(ord) = play_order(a, b) {
            return ord;
        }
        let ord = a.degree.cmp(&b.degree);
        if ord.is_ne() {
            return ord;
        }
        if let (Some(la), Some(lb)) = (&a.label, &b.label) {
            return la.cmp(lb);
        }
        let ord = a
            .atom
            .protons
            .cmp(&b.atom.protons)
            .then_with(|| {
                if self.isotopes {
                    a.atom.isotope.cmp(&b.atom.isotope)
                } else {
                    Ordering::Equal
                }
            })
            .then(a.total_hs.cmp(&b.total_hs))
            .then(a.atom.charge.cmp(&b.atom.charge))
            // the count, not just whether it's in a ring, or fused systems like
            // *12*3*1*3*4*5*4*52 can't be told apart
            .then(a.ring_members.cmp(&b.ring_members));
        if ord.is_ne() {
            return ord;
        }
        if self.chirality {
            let ord = a
                .cip_code()
                .cmp(&b.cip_code())
                .then(a.has_chiral_tag().cmp(&b.has_chiral_tag()));
            if ord.is_ne() {
                return ord;
            }
        }
        if self.ring_stereo && a.ring_members > 0 && b.ring_members > 0 {
            return ctx.ring_nbr_code(i).cmp(&ctx.ring_nbr_code(j));
        }
        // bond stereo is handled with the neighbors
        Ordering::Equal
    }
}
impl Default for AtomComparator {
    fn default() -> Self {
        Self::new()
    }
}
impl AtomCompare for AtomComparator {
    fn compare(&self, ctx: CompareContext<'_>, i: usize, j: usize) -> Ordering {
        assert_ne!(i, j, "atom {i} compared against itself");
        if !(ctx.atoms[i].in_play || ctx.atoms[j].in_play) {
            return Ordering::Equal;
        }
        let ord = self.base_compare(ctx, i, j);
        if ord.is_ne() || !self.use_nbrs {
            return ord;
        }
        let refresh = |b: &BondHolder| BondHolder {
            stereo: if self.chirality {
                b.stereo
            } else {
                BondStereo::None
            },
            nbr_class: ctx.ranks[b.nbr],
            ..*b
        };
        let ni = ctx.neighborhood(i, refresh);
        let nj = ctx.neighborhood(j, refresh);
        prefix_compare(&ni, &nj, 1).then(ni.len().cmp(&nj.len()))
    }
}

/// The comparator used to rank atoms for stereo parity. Neighbors are grouped by element
/// before their ranks are considered.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ChiralAtomComparator {
    pub use_nbrs: bool,
}
impl ChiralAtomComparator {
    pub const fn new() -> Self {
        Self { use_nbrs: false }
    }
    pub const fn with_nbrs(mut self, use_nbrs: bool) -> Self {
        self.use_nbrs = use_nbrs;
        self
    }

    fn base_compare(&self, ctx: CompareContext<'_>, i: usize, j: usize) -> Ordering {
        let (a, b) = (&ctx.atoms[i], &ctx.atoms[j]);
        let ord = ctx.ranks[i].cmp(&ctx.ranks[j]);
        if ord.is_ne() {
            return ord;
        }
        if let Some(ord) = play_order(a, b) {
            return ord;
        }
        a.atom
            .protons
            .cmp(&b.atom.protons)
            .then(a.atom.isotope.cmp(&b.atom.isotope))
            .then(a.cip_code().cmp(&b.cip_code()))
    }
}
impl AtomCompare for ChiralAtomComparator {
    fn compare(&self, ctx: CompareContext<'_>, i: usize, j: usize) -> Ordering {
        assert_ne!(i, j, "atom {i} compared against itself");
        let ord = self.base_compare(ctx, i, j);
        if ord.is_ne() || !self.use_nbrs {
            return ord;
        }
        // classes are `protons * stride + rank + 1`, dividing by the stride leaves the element
        let stride = ctx.atoms.len() + 1;
        let refresh = |b: &BondHolder| BondHolder {
            nbr_class: ctx.atoms[b.nbr].atom.protons as usize * stride + ctx.ranks[b.nbr] + 1,
            ..*b
        };
        let ni = ctx.neighborhood(i, refresh);
        let nj = ctx.neighborhood(j, refresh);
        prefix_compare(&ni, &nj, stride)
            .then_with(|| prefix_compare(&ni, &nj, 1))
            .then(ni.len().cmp(&nj.len()))
    }
}
