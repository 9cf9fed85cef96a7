//! Partition refinement over the order permutation.
//!
//! A partition is a contiguous run of `order`. Every member's rank is the offset of the run, and
//! only the atom at that offset (the head) has a nonzero entry in `count`.

use super::atoms::CanonAtom;
use super::compare::{AtomCompare, CompareContext};
use super::sort::hanoi_sort;
use super::{AtomSet, RankError};
use itertools::Itertools;
use tracing::{debug, trace};

/// Where a partition stands in the worklist.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Link {
    /// Not queued
    #[default]
    Idle,
    /// Queued, and nothing comes after it
    Last,
    /// Queued, followed by this partition
    Next(usize),
}

/// The partitions waiting to be refined, as a stack threaded through a per-atom link table.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Worklist {
    head: Option<usize>,
    links: Vec<Link>,
}
impl Worklist {
    pub fn new(n: usize) -> Self {
        Self {
            head: None,
            links: vec![Link::Idle; n],
        }
    }
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }
    pub fn is_queued(&self, part: usize) -> bool {
        self.links[part] != Link::Idle
    }
    pub fn link(&self, part: usize) -> Link {
        self.links[part]
    }
    /// Queue a partition by its head. Returns false if it was already queued.
    pub fn push(&mut self, part: usize) -> bool {
        if self.is_queued(part) {
            return false;
        }
        self.links[part] = self.head.map_or(Link::Last, Link::Next);
        self.head = Some(part);
        true
    }
    pub fn pop(&mut self) -> Option<usize> {
        let part = self.head?;
        self.head = match std::mem::take(&mut self.links[part]) {
            Link::Next(next) => Some(next),
            Link::Last => None,
            Link::Idle => panic!("partition {part} is at the head of the worklist but isn't queued"),
        };
        Some(part)
    }
    pub fn clear(&mut self) {
        while self.pop().is_some() {}
    }
}

/// The mutable state of one ranking run.
#[derive(Debug, Clone)]
pub struct Partitions<'a> {
    atoms: &'a [CanonAtom],
    ranks: Vec<usize>,
    order: Vec<usize>,
    count: Vec<usize>,
    worklist: Worklist,
    dirty: AtomSet,
    touched: AtomSet,
    scratch: Vec<usize>,
}
impl<'a> Partitions<'a> {
    /// Every atom in one partition.
    pub fn single(atoms: &'a [CanonAtom]) -> Self {
        let n = atoms.len();
        let mut count = vec![0; n];
        if let Some(c) = count.first_mut() {
            *c = n;
        }
        Self {
            atoms,
            ranks: vec![0; n],
            order: (0..n).collect(),
            count,
            worklist: Worklist::new(n),
            dirty: AtomSet::with_capacity(n),
            touched: AtomSet::with_capacity(n),
            scratch: vec![0; n],
        }
    }
    /// Start from caller-chosen partitions: atoms with equal seeds share one, and partitions are
    /// ordered by seed.
    pub fn seeded(atoms: &'a [CanonAtom], seeds: &[usize]) -> Result<Self, RankError> {
        if seeds.len() != atoms.len() {
            return Err(RankError::SeedCount {
                expected: atoms.len(),
                found: seeds.len(),
            });
        }
        let mut out = Self::single(atoms);
        let Self {
            ranks,
            order,
            count,
            ..
        } = &mut out;
        order.sort_by_key(|&i| seeds[i]);
        count.fill(0);
        let mut start = 0;
        for (_, run) in &order.iter().chunk_by(|&&i| seeds[i]) {
            let run = run.copied().collect_vec();
            count[run[0]] = run.len();
            for &i in &run {
                ranks[i] = start;
            }
            start += run.len();
        }
        Ok(out)
    }

    /// Queue every partition with more than one member and mark every atom dirty.
    pub fn activate(&mut self) {
        self.worklist.clear();
        let n = self.order.len();
        let mut i = 0;
        while i < n {
            let head = self.order[i];
            let len = self.count[head];
            if len > 1 {
                self.worklist.push(head);
            }
            i += len.max(1);
        }
        self.dirty.fill(n);
    }

    /// Split queued partitions until the worklist runs dry. With `propagate`, partitions next to
    /// a split get queued again.
    pub fn refine<C: AtomCompare>(&mut self, cmp: &C, propagate: bool) {
        let Self {
            atoms,
            ranks,
            order,
            count,
            worklist,
            dirty,
            touched,
            scratch,
        } = self;
        let atoms = *atoms;
        while let Some(part) = worklist.pop() {
            let len = count[part];
            let offset = ranks[part];
            let run = &mut order[offset..(offset + len)];
            {
                let ctx = CompareContext::new(atoms, ranks);
                hanoi_sort(run, scratch, count, dirty, |i, j| cmp.compare(ctx, i, j));
            }
            for &i in run.iter() {
                dirty.set(i, false);
            }
            // the first run keeps its rank
            let first = count[run[0]];
            if first == len {
                continue;
            }
            let mut class = offset;
            for (k, &i) in run.iter().enumerate().skip(first) {
                if count[i] != 0 {
                    class = offset + k;
                }
                ranks[i] = class;
                for &nbr in &atoms[i].nbrs {
                    dirty.set(nbr, true);
                }
            }
            trace!(
                partition = part,
                offset,
                len,
                parts = run.iter().filter(|&&i| count[i] != 0).count(),
                "split partition"
            );
            if propagate {
                for &i in &run[first..] {
                    for &nbr in &atoms[i].nbrs {
                        touched.set(ranks[nbr], true);
                    }
                }
                queue_touched(order, count, worklist, touched);
            }
        }
    }

    /// Force every remaining partition apart, refining after each forced split. Returns how many
    /// splits had to be forced.
    pub fn break_ties<C: AtomCompare>(&mut self, cmp: &C) -> usize {
        let n = self.order.len();
        let atoms = self.atoms;
        let mut splits = 0;
        let mut i = 0;
        while i < n {
            let head = self.order[i];
            let len = self.count[head];
            if len <= 1 {
                i += 1;
                continue;
            }
            // the last member gets the last rank, then look at this position again
            let offset = self.ranks[head] + len - 1;
            let promoted = self.order[offset];
            self.ranks[promoted] = offset;
            self.count[head] = len - 1;
            self.count[promoted] = 1;
            splits += 1;
            trace!(atom = promoted, rank = offset, "forced a split");
            if atoms[promoted].nbrs.is_empty() {
                continue;
            }
            for &nbr in &atoms[promoted].nbrs {
                self.dirty.set(nbr, true);
                self.touched.set(self.ranks[nbr], true);
            }
            queue_touched(
                &self.order,
                &self.count,
                &mut self.worklist,
                &mut self.touched,
            );
            self.refine(cmp, true);
        }
        debug!(splits, "broke ties");
        splits
    }

    pub fn num_partitions(&self) -> usize {
        self.count.iter().filter(|&&c| c != 0).count()
    }
    /// Every partition is a singleton.
    pub fn is_discrete(&self) -> bool {
        self.num_partitions() == self.order.len()
    }
    pub fn ranks(&self) -> &[usize] {
        &self.ranks
    }
    pub fn order(&self) -> &[usize] {
        &self.order
    }
    /// Partition sizes, nonzero only for heads.
    pub fn count(&self) -> &[usize] {
        &self.count
    }
    pub fn worklist(&self) -> &Worklist {
        &self.worklist
    }
    pub fn into_ranks(self) -> Vec<usize> {
        self.ranks
    }
}

/// Queue the multi-member partitions starting at each touched offset, then clear the offsets.
fn queue_touched(order: &[usize], count: &[usize], worklist: &mut Worklist, touched: &mut AtomSet) {
    for pos in touched.iter_ones() {
        let head = order[pos];
        if count[head] > 1 {
            worklist.push(head);
        }
    }
    touched.clear();
}
