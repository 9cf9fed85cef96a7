//! The refinement primitive: a merge sort that also records the length of each run of tied
//! atoms.
//!
//! `count` is indexed by atom id. After sorting, the first atom of each run of ties holds the
//! length of the run and every other atom in it holds zero. Pairs where neither atom is dirty
//! are taken as tied without asking the comparator.

use super::AtomSet;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Base,
    Scratch,
}
impl Side {
    fn other(self) -> Self {
        match self {
            Self::Base => Self::Scratch,
            Self::Scratch => Self::Base,
        }
    }
}

struct Buffers<'a> {
    base: &'a mut [usize],
    scratch: &'a mut [usize],
}
impl Buffers<'_> {
    #[inline(always)]
    fn at(&self, side: Side, idx: usize) -> usize {
        match side {
            Side::Base => self.base[idx],
            Side::Scratch => self.scratch[idx],
        }
    }
    /// Move `len` ids, the ranges may overlap if they're on the same side.
    fn copy(&mut self, from: Side, src: usize, len: usize, to: Side, dst: usize) {
        match (from, to) {
            (Side::Base, Side::Base) => self.base.copy_within(src..(src + len), dst),
            (Side::Scratch, Side::Scratch) => self.scratch.copy_within(src..(src + len), dst),
            (Side::Base, Side::Scratch) => {
                self.scratch[dst..(dst + len)].copy_from_slice(&self.base[src..(src + len)])
            }
            (Side::Scratch, Side::Base) => {
                self.base[dst..(dst + len)].copy_from_slice(&self.scratch[src..(src + len)])
            }
        }
    }
}

#[inline(always)]
fn tied_or<F: FnMut(usize, usize) -> Ordering>(
    dirty: &AtomSet,
    a: usize,
    b: usize,
    compare: &mut F,
) -> Ordering {
    if dirty.get(a) || dirty.get(b) {
        compare(a, b)
    } else {
        Ordering::Equal
    }
}

/// Sort `base` in place. `scratch` needs to be at least as long as `base`.
pub fn hanoi_sort<F: FnMut(usize, usize) -> Ordering>(
    base: &mut [usize],
    scratch: &mut [usize],
    count: &mut [usize],
    dirty: &AtomSet,
    mut compare: F,
) {
    let len = base.len();
    assert!(
        scratch.len() >= len,
        "scratch buffer is too small: {} < {len}",
        scratch.len()
    );
    let scratch = &mut scratch[..len];
    if hanoi(base, scratch, count, dirty, &mut compare) {
        base.copy_from_slice(scratch);
    }
}

/// Returns whether the sorted result ended up in `scratch`.
fn hanoi<F: FnMut(usize, usize) -> Ordering>(
    base: &mut [usize],
    scratch: &mut [usize],
    count: &mut [usize],
    dirty: &AtomSet,
    compare: &mut F,
) -> bool {
    let nel = base.len();
    match nel {
        0 => return false,
        1 => {
            count[base[0]] = 1;
            return false;
        }
        2 => {
            let (a, b) = (base[0], base[1]);
            match tied_or(dirty, a, b, compare) {
                Ordering::Equal => {
                    count[a] = 2;
                    count[b] = 0;
                }
                Ordering::Less => {
                    count[a] = 1;
                    count[b] = 1;
                }
                Ordering::Greater => {
                    count[a] = 1;
                    count[b] = 1;
                    base.swap(0, 1);
                }
            }
            return false;
        }
        _ => {}
    }

    let half = nel / 2;
    let first = if hanoi(&mut base[..half], &mut scratch[..half], count, dirty, compare) {
        Side::Scratch
    } else {
        Side::Base
    };
    let second = if hanoi(&mut base[half..], &mut scratch[half..], count, dirty, compare) {
        Side::Scratch
    } else {
        Side::Base
    };
    // write to whichever side the first half isn't on
    let out = first.other();
    let mut bufs = Buffers { base, scratch };
    merge(&mut bufs, (first, half), (second, nel - half), out, count, dirty, compare);
    out == Side::Scratch
}

/// Merge two sorted halves, run by run. The first half starts at 0, the second at `half`.
fn merge<F: FnMut(usize, usize) -> Ordering>(
    bufs: &mut Buffers,
    (side1, mut n1): (Side, usize),
    (side2, mut n2): (Side, usize),
    out: Side,
    count: &mut [usize],
    dirty: &AtomSet,
    compare: &mut F,
) {
    let mut s1 = 0;
    let mut s2 = n1;
    let mut ptr = 0;
    loop {
        let a = bufs.at(side1, s1);
        let b = bufs.at(side2, s2);
        debug_assert_ne!(a, b, "atom {a} appears in both halves");
        let ord = tied_or(dirty, a, b, compare);
        let len1 = count[a];
        let len2 = count[b];
        debug_assert!(len1 > 0 && len2 > 0, "merging from the middle of a run");
        if ord.is_le() {
            if ord.is_eq() {
                count[a] = len1 + len2;
                count[b] = 0;
            }
            bufs.copy(side1, s1, len1, out, ptr);
            ptr += len1;
            s1 += len1;
            n1 -= len1;
            if n1 == 0 {
                bufs.copy(side2, s2, n2, out, ptr);
                return;
            }
        }
        if ord.is_ge() {
            bufs.copy(side2, s2, len2, out, ptr);
            ptr += len2;
            s2 += len2;
            n2 -= len2;
            if n2 == 0 {
                bufs.copy(side1, s1, n1, out, ptr);
                return;
            }
        }
    }
}
