use super::*;
use crate::graph::*;
use rand::prelude::*;

#[test]
fn acyclic() {
    // methyl acetate
    let graph = mol(&[6, 8, 6, 8, 6], &[(0, 1), (1, 2), (2, 3), (2, 4)]);
    assert_eq!(RingInfo::perceive(&graph).num_cycles(), 0);
    let rings = RingInfo::perceive(&graph);
    assert!(rings.is_empty());
    assert!((0..5).all(|a| !rings.is_in_ring(a)));
}

#[test]
fn monocycles() {
    {
        let benzene = benzene();
        assert_eq!(RingInfo::perceive(&benzene).num_cycles(), 1);
        let rings = RingInfo::perceive(&benzene);
        assert_eq!(rings.rings(), [vec![0, 1, 2, 3, 4, 5]]);
        assert!((0..6).all(|a| rings.num_atom_rings(a) == 1));
    }
    {
        let toluene = toluene();
        assert_eq!(RingInfo::perceive(&toluene).num_cycles(), 1);
        let rings = RingInfo::perceive(&toluene);
        assert_eq!(rings.len(), 1);
        assert!(!rings.is_in_ring(6));
    }
    {
        // a ring with a stray self-loop
        let mut graph = ring(6, 5, BondKind::Single);
        graph.add_edge(NodeIndex::new(2), NodeIndex::new(2), Bond::new(BondKind::Single));
        assert_eq!(RingInfo::perceive(&graph).num_cycles(), 1);
        assert_eq!(RingInfo::perceive(&graph).len(), 1);
    }
    {
        // a doubled bond isn't a ring
        let mut graph = mol(&[6, 6], &[(0, 1)]);
        graph.add_edge(NodeIndex::new(0), NodeIndex::new(1), Bond::new(BondKind::Single));
        let rings = RingInfo::perceive(&graph);
        assert_eq!(rings.num_cycles(), 0);
        assert!(rings.is_empty());
    }
}

#[test]
fn fused_cycles() {
    {
        let naphthalene = naphthalene();
        assert_eq!(RingInfo::perceive(&naphthalene).num_cycles(), 2);
        let rings = RingInfo::perceive(&naphthalene);
        // the outer ten-membered ring is the sum of the other two
        assert_eq!(rings.len(), 2);
        assert!(rings.rings().iter().all(|r| r.len() == 6));
        assert_eq!(rings.num_atom_rings(4), 2);
        assert_eq!(rings.num_atom_rings(5), 2);
        assert!([0, 1, 2, 3, 6, 7, 8, 9]
            .iter()
            .all(|&a| rings.num_atom_rings(a) == 1));
    }
    {
        let bicyclobutane = mol(&[6; 4], &[(0, 1), (1, 2), (2, 3), (3, 0), (0, 2)]);
        assert_eq!(RingInfo::perceive(&bicyclobutane).num_cycles(), 2);
        let rings = RingInfo::perceive(&bicyclobutane);
        assert_eq!(rings.len(), 2);
        assert_eq!(rings.num_atom_rings(0), 2);
        assert_eq!(rings.num_atom_rings(1), 1);
        assert_eq!(rings.num_atom_rings(2), 2);
        assert_eq!(rings.num_atom_rings(3), 1);
    }
}

#[test]
fn cubane() {
    let cubane = super::cubane();
    assert_eq!(RingInfo::perceive(&cubane).num_cycles(), 5);
    let rings = RingInfo::perceive(&cubane);
    // every face, even though only five are independent
    assert_eq!(rings.len(), 6);
    assert!((0..8).all(|a| rings.num_atom_rings(a) == 3));
}

#[test]
fn equal_paths() {
    {
        let k33 = k33();
        let rings = RingInfo::perceive(&k33);
        assert_eq!(rings.num_cycles(), 4);
        assert_eq!(rings.len(), 9);
        assert!(rings.rings().iter().all(|r| r.len() == 4));
        assert!((0..6).all(|a| rings.num_atom_rings(a) == 6));
    }
    {
        let adamantane = adamantane();
        let rings = RingInfo::perceive(&adamantane);
        assert_eq!(rings.num_cycles(), 3);
        assert_eq!(rings.len(), 4);
        assert!((0..4).all(|a| rings.num_atom_rings(a) == 3));
        assert!((4..10).all(|a| rings.num_atom_rings(a) == 2));
    }
}

#[test]
fn renumbering() {
    let mut rng = StdRng::seed_from_u64(33);
    for graph in [k33(), adamantane(), super::cubane(), naphthalene()] {
        let rings = RingInfo::perceive(&graph);
        for _ in 0..20 {
            let perm = random_perm(graph.node_count(), &mut rng);
            let shuffled = RingInfo::perceive(&permuted(&graph, &perm, &mut rng));
            assert_eq!(shuffled.len(), rings.len());
            for (atom, &to) in perm.iter().enumerate() {
                assert_eq!(shuffled.num_atom_rings(to), rings.num_atom_rings(atom));
            }
        }
    }
}

#[test]
fn filtered() {
    let naphthalene = naphthalene();
    // drop the bond between atoms 7 and 8, opening the second ring
    let rings = RingInfo::perceive_filtered(&naphthalene, |id, _, _| id != 8);
    assert_eq!(rings.rings(), [vec![0, 1, 2, 3, 4, 5]]);
    assert_eq!(rings.num_atom_rings(6), 0);
}

#[test]
fn counts() {
    let rings = RingInfo::from_counts(vec![1, 2, 0]);
    assert_eq!(rings.num_atom_rings(1), 2);
    assert!(!rings.is_in_ring(2));
    assert!(!rings.is_in_ring(10));
    assert!(rings.rings().is_empty());
}
