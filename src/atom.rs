//! Atom kinds and their display metadata.
//!
//! Every reactive entity in the sandbox is tagged with an [`AtomKind`], a
//! fixed set of elements the palette offers. The kind doubles as the asset
//! identifier used for prefab lookup: `AtomKind::Oxygen` loads the prefab
//! registered under `"oxygen"`.
//!
//! # Example
//!
//! ```ignore
//! use valence::AtomKind;
//!
//! let kind = AtomKind::Hydrogen;
//! assert_eq!(kind.asset_name(), "hydrogen");
//! assert_eq!(kind.symbol(), "H");
//! ```

use glam::Vec3;
use std::fmt;

/// The fixed set of elements available in the sandbox palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AtomKind {
    Hydrogen,
    Oxygen,
    Carbon,
    Nitrogen,
    Beryllium,
    Fluorine,
}

impl AtomKind {
    /// All kinds, in palette order.
    pub const ALL: [AtomKind; 6] = [
        AtomKind::Hydrogen,
        AtomKind::Beryllium,
        AtomKind::Carbon,
        AtomKind::Nitrogen,
        AtomKind::Oxygen,
        AtomKind::Fluorine,
    ];

    /// Asset identifier used to look up this kind's prefab.
    pub fn asset_name(&self) -> &'static str {
        match self {
            AtomKind::Hydrogen => "hydrogen",
            AtomKind::Oxygen => "oxygen",
            AtomKind::Carbon => "carbon",
            AtomKind::Nitrogen => "nitrogen",
            AtomKind::Beryllium => "beryllium",
            AtomKind::Fluorine => "fluorine",
        }
    }

    /// Resolve a kind from its asset identifier.
    pub fn from_asset_name(name: &str) -> Option<AtomKind> {
        AtomKind::ALL.iter().copied().find(|k| k.asset_name() == name)
    }

    /// Human-readable element name.
    pub fn title(&self) -> &'static str {
        match self {
            AtomKind::Hydrogen => "Hydrogen",
            AtomKind::Oxygen => "Oxygen",
            AtomKind::Carbon => "Carbon",
            AtomKind::Nitrogen => "Nitrogen",
            AtomKind::Beryllium => "Beryllium",
            AtomKind::Fluorine => "Fluorine",
        }
    }

    /// Chemical symbol shown on palette buttons.
    pub fn symbol(&self) -> &'static str {
        match self {
            AtomKind::Hydrogen => "H",
            AtomKind::Oxygen => "O",
            AtomKind::Carbon => "C",
            AtomKind::Nitrogen => "N",
            AtomKind::Beryllium => "Be",
            AtomKind::Fluorine => "F",
        }
    }

    /// Display color (RGB, 0.0-1.0), CPK-ish like the palette swatches.
    pub fn color(&self) -> Vec3 {
        match self {
            AtomKind::Hydrogen => Vec3::new(1.0, 1.0, 1.0),
            AtomKind::Oxygen => Vec3::new(1.0, 0.25, 0.2),
            AtomKind::Carbon => Vec3::new(0.5, 0.5, 0.5),
            AtomKind::Nitrogen => Vec3::new(0.3, 0.5, 1.0),
            AtomKind::Beryllium => Vec3::new(0.2, 0.9, 0.9),
            AtomKind::Fluorine => Vec3::new(0.3, 0.9, 0.3),
        }
    }
}

impl fmt::Display for AtomKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.asset_name())
    }
}
