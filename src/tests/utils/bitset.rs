use crate::utils::bitset::BitSet;
use rand::prelude::*;

const BITS: usize = std::mem::size_of::<usize>() * 8;

fn make_set(bits: impl IntoIterator<Item = usize>) -> BitSet<usize, 2> {
    let mut out = BitSet::<usize, 2>::new();
    for bit in bits {
        out.set(bit, true);
    }
    out
}

#[test]
fn bits() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut indices = Vec::<u16>::new();
    let mut set = BitSet::<usize, 2>::new();
    for _ in 0..100 {
        let count = rng.gen_range(100..1000);
        indices.resize(count, 0);
        rng.fill(&mut indices[..]);
        indices.sort();
        indices.dedup();

        set.clear();
        for &i in &indices {
            set.set(i as _, true);
        }

        assert_eq!(set.count_ones(), indices.len());

        for i in 0..(set.as_slice().len() * BITS) {
            let contained = indices.binary_search(&(i as _)).is_ok();
            assert_eq!(set.get(i), contained);
        }
        assert!(set.iter_ones().map(|i| i as u16).eq(indices.iter().copied()));
    }
}

#[test]
fn first_one() {
    {
        let set = make_set([]);
        assert_eq!(set.first_one(), None);
        assert!(set.all_zero());
    }
    {
        let mut set = make_set([65]);
        set.set(65, false);
        assert_eq!(set.first_one(), None);
        assert!(set.all_zero());
    }
    {
        let set = make_set([1, 2, 3]);
        assert_eq!(set.first_one(), Some(1));
    }
    {
        let set = make_set([64, 96, 128]);
        assert_eq!(set.first_one(), Some(64));
        assert_eq!(set.iter_ones().collect::<Vec<_>>(), [64, 96, 128]);
    }
}

#[test]
fn unset_past_end() {
    let mut set = make_set([3]);
    let len = set.as_slice().len();
    set.set(1000, false);
    assert_eq!(set.as_slice().len(), len);
    assert!(!set.get(1000));
}

#[test]
fn capacity_and_fill() {
    let mut set = BitSet::<usize, 2>::with_capacity(BITS + 1);
    assert_eq!(set.as_slice().len(), 2);
    assert!(set.all_zero());
    set.fill(BITS + 1);
    assert_eq!(set.count_ones(), BITS + 1);
    assert!(set.get(BITS));
    assert!(!set.get(BITS + 1));
    set.clear();
    assert!(set.all_zero());
    assert_eq!(set.as_slice().len(), 2);
}

#[test]
fn xor() {
    let mut a = make_set([0, 5, 70]);
    let b = make_set([5, 130]);
    a ^= &b;
    assert_eq!(a.iter_ones().collect::<Vec<_>>(), [0, 70, 130]);
    let copy = a.clone();
    a ^= &copy;
    assert!(a.all_zero());
}
