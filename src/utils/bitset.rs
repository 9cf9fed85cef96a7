use num_traits::*;
use smallvec::SmallVec;
use std::fmt::{self, Binary, Debug, Formatter};
use std::ops::*;

#[inline(always)]
const fn word_bits<T>() -> usize {
    std::mem::size_of::<T>() * 8
}

/// A growable bit set backed by words of `T`, with `N` words stored inline.
#[derive(Default, Clone, PartialEq, Eq, Hash)]
pub struct BitSet<T, const N: usize>(SmallVec<T, N>);
impl<T: PrimInt + Zero, const N: usize> BitSet<T, N> {
    pub const fn new() -> Self {
        Self(SmallVec::new())
    }
    pub fn with_capacity(cap: usize) -> Self {
        let len = cap.div_ceil(word_bits::<T>());
        Self(SmallVec::from_elem(T::zero(), len))
    }

    pub fn as_slice(&self) -> &[T] {
        self.0.as_slice()
    }

    pub fn get(&self, idx: usize) -> bool {
        self.0
            .get(idx / word_bits::<T>())
            .map_or(false, |&i| i & (T::one() << (idx % word_bits::<T>())) != T::zero())
    }
    pub fn set(&mut self, idx: usize, bit: bool) {
        let si = idx / word_bits::<T>();
        let sb = idx % word_bits::<T>();
        if si >= self.0.len() {
            if !bit {
                return;
            }
            self.0.resize(si + 1, T::zero());
        }
        let word = self.0[si];
        self.0[si] = if bit {
            word | (T::one() << sb)
        } else {
            word & !(T::one() << sb)
        };
    }
    /// Set every bit below `len`.
    pub fn fill(&mut self, len: usize) {
        for i in 0..len {
            self.set(i, true);
        }
    }
    pub fn clear(&mut self) {
        for i in &mut self.0 {
            *i = T::zero();
        }
    }

    pub fn all_zero(&self) -> bool {
        let zero = T::zero();
        self.0.iter().all(|&i| i == zero)
    }
    pub fn count_ones(&self) -> usize {
        self.0.iter().map(|i| i.count_ones() as usize).sum()
    }
    /// The lowest set bit, if any.
    pub fn first_one(&self) -> Option<usize> {
        self.0
            .iter()
            .enumerate()
            .find(|(_, &w)| w != T::zero())
            .map(|(n, w)| n * word_bits::<T>() + w.trailing_zeros() as usize)
    }
    /// Iterate over the set bits in ascending order.
    pub fn iter_ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().enumerate().flat_map(|(n, &w)| {
            let base = n * word_bits::<T>();
            let mut rest = w;
            std::iter::from_fn(move || {
                if rest == T::zero() {
                    return None;
                }
                let bit = rest.trailing_zeros() as usize;
                rest = rest & (rest - T::one());
                Some(base + bit)
            })
        })
    }
}

impl<T: PrimInt, const N: usize> FromIterator<usize> for BitSet<T, N> {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut out = Self::new();
        for i in iter {
            out.set(i, true);
        }
        out
    }
}

impl<T: Binary, const N: usize> Debug for BitSet<T, N> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut l = f.debug_list();
        for i in &self.0 {
            l.entry(&format_args!("{i:0>0$b}", word_bits::<T>()));
        }
        l.finish()
    }
}

impl<T: PrimInt, const N: usize> BitXorAssign<&Self> for BitSet<T, N> {
    fn bitxor_assign(&mut self, rhs: &Self) {
        let mut iter = rhs.0.iter();
        self.0
            .iter_mut()
            .zip(iter.by_ref())
            .for_each(|(l, r)| *l = *l ^ *r);
        self.0.extend(iter.copied());
    }
}
