//! The molecule model the ranking engine reads from.
//!
//! Atoms and bonds only carry what canonical ranking consumes. Stereo descriptors (chiral tags,
//! CIP labels, ring stereo flags) are set by whoever built the molecule; nothing here computes
//! them.

use c_enum::*;
use modular_bitfield::prelude::*;
use petgraph::prelude::*;
use std::fmt::{self, Display, Formatter};
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Element symbols, indexed by atomic number. Index 0 is an unknown/dummy atom.
#[rustfmt::skip]
const SYMBOLS: [&str; 119] = [
    "*",
    "H",                                                                                 "He",
    "Li", "Be",                                                  "B",  "C",  "N",  "O",  "F",  "Ne",
    "Na", "Mg",                                                  "Al", "Si", "P",  "S",  "Cl", "Ar",
    "K",  "Ca", "Sc", "Ti", "V",  "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As", "Se", "Br", "Kr",
    "Rb", "Sr", "Y",  "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In", "Sn", "Sb", "Te", "I",  "Xe",
    "Cs", "Ba",
    "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb", "Dy", "Ho", "Er", "Tm", "Yb", "Lu",
                "Hf", "Ta", "W",  "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl", "Pb", "Bi", "Po", "At", "Rn",
    "Fr", "Ra",
    "Ac", "Th", "Pa", "U",  "Np", "Pu", "Am", "Cm", "Bk", "Cf", "Es", "Fm", "Md", "No", "Lr",
                "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn", "Nh", "Fl", "Mc", "Lv", "Ts", "Og",
];

/// The largest implicit hydrogen count an atom can hold.
pub const MAX_HYDROGENS: u8 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[error("too many hydrogens: attempted to set {0}, the max is 15")]
pub struct TooManyHydrogens(pub usize);

/// The raw chiral tag of an atom, as written in the input.
///
/// Its value depends on neighbor order, so it can only be compared for presence.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, BitfieldSpecifier)]
pub enum ChiralTag {
    #[default]
    None,
    Ccw,
    Cw,
    Other,
}
impl ChiralTag {
    pub fn is_chiral(self) -> bool {
        self != Self::None
    }
}

/// A CIP label assigned by a stereo perception step.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, BitfieldSpecifier)]
pub enum CipLabel {
    #[default]
    None,
    R,
    S,
    /// Assigned, but neither R nor S
    Other,
}
impl CipLabel {
    /// Two-valued encoding used for ranking: unlabeled atoms first, then anything that isn't R,
    /// then R.
    pub fn code(self) -> u8 {
        match self {
            Self::None => 0,
            Self::R => 2,
            Self::S | Self::Other => 1,
        }
    }
}

/// Bit-packed per-atom data
#[bitfield]
#[repr(u16)]
#[derive(Debug, Clone, Copy)]
pub struct AtomData {
    pub hydrogen: B4,
    pub chiral_tag: ChiralTag,
    pub cip: CipLabel,
    /// Set on stereocenters that take part in ring stereochemistry
    pub ring_stereo: bool,
    #[skip]
    __: B7,
}
impl PartialEq for AtomData {
    fn eq(&self, other: &Self) -> bool {
        self.into_bytes() == other.into_bytes()
    }
}
impl Eq for AtomData {}
impl Hash for AtomData {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.into_bytes().hash(state);
    }
}

/// An atom in the molecule graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(C)]
pub struct Atom {
    pub protons: u8,
    pub charge: i8,
    pub isotope: u16,
    pub data: AtomData,
}
impl Default for Atom {
    fn default() -> Self {
        Self::new(0)
    }
}
impl Atom {
    pub fn new(protons: u8) -> Self {
        Self {
            protons,
            charge: 0,
            isotope: 0,
            data: AtomData::new(),
        }
    }
    pub fn new_isotope(protons: u8, isotope: u16) -> Self {
        Self {
            protons,
            charge: 0,
            isotope,
            data: AtomData::new(),
        }
    }

    pub fn with_charge(mut self, charge: i8) -> Self {
        self.charge = charge;
        self
    }
    pub fn with_hydrogens(mut self, h: u8) -> Result<Self, TooManyHydrogens> {
        self.set_hydrogens(h)?;
        Ok(self)
    }
    pub fn with_chiral_tag(mut self, tag: ChiralTag) -> Self {
        self.data.set_chiral_tag(tag);
        self
    }
    pub fn with_cip(mut self, cip: CipLabel) -> Self {
        self.data.set_cip(cip);
        self
    }
    pub fn with_ring_stereo(mut self, ring_stereo: bool) -> Self {
        self.data.set_ring_stereo(ring_stereo);
        self
    }

    pub fn set_hydrogens(&mut self, h: u8) -> Result<(), TooManyHydrogens> {
        if h <= MAX_HYDROGENS {
            self.data.set_hydrogen(h);
            Ok(())
        } else {
            Err(TooManyHydrogens(h as _))
        }
    }
    pub fn add_hydrogens(&mut self, h: u8) -> Result<(), TooManyHydrogens> {
        let total = self.data.hydrogen() as usize + h as usize;
        if total <= MAX_HYDROGENS as usize {
            self.data.set_hydrogen(total as u8);
            Ok(())
        } else {
            Err(TooManyHydrogens(total))
        }
    }

    #[inline(always)]
    pub fn hydrogens(self) -> u8 {
        self.data.hydrogen()
    }
    #[inline(always)]
    pub fn chiral_tag(self) -> ChiralTag {
        self.data.chiral_tag()
    }
    #[inline(always)]
    pub fn cip(self) -> CipLabel {
        self.data.cip()
    }

    pub fn symbol(self) -> &'static str {
        SYMBOLS.get(self.protons as usize).copied().unwrap_or("?")
    }
}
impl Display for Atom {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        use fmtastic::*;
        if self.isotope != 0 {
            write!(f, "{}", Superscript(self.isotope))?;
        }
        f.write_str(self.symbol())?;
        match self.hydrogens() {
            0 => {}
            1 => f.write_str("H")?,
            h => write!(f, "H{}", Subscript(h))?,
        }
        match self.charge {
            0 => {}
            1 => f.write_str("⁺")?,
            -1 => f.write_str("⁻")?,
            _ => write!(f, "{:+}", Superscript(self.charge))?,
        }
        Ok(())
    }
}

c_enum! {
    /// The kind of a bond. Ordered by declaration.
    #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub enum BondKind: u8 {
        /// Non-bond, shouldn't appear in final graph
        Non,
        Single,
        Double,
        Triple,
        Quad,
        Aromatic,
    }
}
impl BondKind {
    pub fn as_static_str(self) -> &'static str {
        match self {
            Self::Non => "non",
            Self::Single => "single",
            Self::Double => "double",
            Self::Triple => "triple",
            Self::Quad => "quad",
            Self::Aromatic => "aromatic",
            _ => panic!("invalid bond!"),
        }
    }
}
impl Display for BondKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_static_str())
    }
}

c_enum! {
    /// Stereo descriptor of a bond. Ordered by declaration.
    #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub enum BondStereo: u8 {
        None,
        Any,
        Z,
        E,
        Cis,
        Trans,
    }
}
impl BondStereo {
    pub fn as_static_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Any => "any",
            Self::Z => "Z",
            Self::E => "E",
            Self::Cis => "cis",
            Self::Trans => "trans",
            _ => panic!("invalid bond stereo!"),
        }
    }
}

/// A bond between atoms in the molecule graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bond {
    pub kind: BondKind,
    pub stereo: BondStereo,
}
impl Bond {
    pub const fn new(kind: BondKind) -> Self {
        Self {
            kind,
            stereo: BondStereo::None,
        }
    }
    pub const fn with_stereo(mut self, stereo: BondStereo) -> Self {
        self.stereo = stereo;
        self
    }
}
impl From<BondKind> for Bond {
    fn from(kind: BondKind) -> Self {
        Self::new(kind)
    }
}
impl Display for Bond {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.as_static_str())?;
        if self.stereo != BondStereo::None {
            write!(f, " ({})", self.stereo.as_static_str())?;
        }
        Ok(())
    }
}

/// A molecule graph is an undirected graph between atoms, connected with bonds
pub type MoleculeGraph = UnGraph<Atom, Bond>;
