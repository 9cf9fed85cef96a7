use crate::core::*;

#[test]
fn hydrogens() {
    let mut atom = Atom::new(6);
    atom.add_hydrogens(3).unwrap();
    assert_eq!(atom.hydrogens(), 3);
    assert_eq!(atom.add_hydrogens(13), Err(TooManyHydrogens(16)));
    assert_eq!(atom.hydrogens(), 3);
    assert_eq!(Atom::new(7).with_hydrogens(16), Err(TooManyHydrogens(16)));
    assert!(Atom::new(7).with_hydrogens(MAX_HYDROGENS).is_ok());
    assert_eq!(
        TooManyHydrogens(16).to_string(),
        "too many hydrogens: attempted to set 16, the max is 15"
    );
}

#[test]
fn packed_fields() {
    let atom = Atom::new(6)
        .with_hydrogens(1)
        .unwrap()
        .with_chiral_tag(ChiralTag::Cw)
        .with_cip(CipLabel::R)
        .with_ring_stereo(true);
    assert_eq!(atom.hydrogens(), 1);
    assert_eq!(atom.chiral_tag(), ChiralTag::Cw);
    assert_eq!(atom.cip(), CipLabel::R);
    assert!(atom.data.ring_stereo());
    assert_ne!(atom, Atom::new(6).with_hydrogens(1).unwrap());
}

#[test]
fn cip_codes() {
    assert_eq!(CipLabel::None.code(), 0);
    assert_eq!(CipLabel::S.code(), 1);
    assert_eq!(CipLabel::Other.code(), 1);
    assert_eq!(CipLabel::R.code(), 2);
    assert!(!ChiralTag::None.is_chiral());
    assert!(ChiralTag::Ccw.is_chiral());
}

#[test]
fn bond_order() {
    assert!(BondKind::Single < BondKind::Double);
    assert!(BondKind::Triple < BondKind::Aromatic);
    assert!(BondStereo::None < BondStereo::Z);
    assert!(BondStereo::Z < BondStereo::E);
}

#[test]
fn display() {
    assert_eq!(Atom::new(6).with_hydrogens(4).unwrap().to_string(), "CH₄");
    assert_eq!(Atom::new(8).with_hydrogens(1).unwrap().to_string(), "OH");
    assert_eq!(Atom::new(7).with_charge(1).to_string(), "N⁺");
    assert_eq!(Atom::new_isotope(6, 13).to_string(), "¹³C");
    assert_eq!(Bond::new(BondKind::Double).to_string(), "double");
    assert_eq!(
        Bond::new(BondKind::Double)
            .with_stereo(BondStereo::E)
            .to_string(),
        "double (E)"
    );
}
