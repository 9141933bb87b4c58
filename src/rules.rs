//! Reaction rules.
//!
//! A [`ReactionTable`] maps unordered pairs of reactant identities to an
//! [`Outcome`]. Identities are either a bare atom kind or a compound id, so
//! a table entry can describe atom + atom reactions as well as chained
//! compound + atom reactions.
//!
//! Pairs are canonicalized (sorted) before insertion and lookup, so rule
//! evaluation never depends on which collider was reported first.
//!
//! # Example
//!
//! ```ignore
//! use valence::{AtomKind, ReactionTable, Outcome};
//!
//! let mut table = ReactionTable::new();
//! table.product(AtomKind::Oxygen, AtomKind::Hydrogen, "compound_ho");
//! table.product("compound_ho", AtomKind::Hydrogen, "molecule_h2o");
//!
//! let out = table.evaluate(
//!     &AtomKind::Hydrogen.into(),
//!     &AtomKind::Oxygen.into(),
//! );
//! assert_eq!(out, Outcome::Product("compound_ho".into()));
//! ```

use crate::atom::AtomKind;
use std::collections::HashMap;
use std::fmt;

/// Identifier of a compound or molecule prefab ("compound_ho",
/// "molecule_h2o", ...).
///
/// Compound ids are opaque strings: they name the prefab asset, the scene
/// root of a spawned compound, and the reactant identity used for chained
/// reactions.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompoundId(String);

impl CompoundId {
    /// Wrap an asset identifier as a compound id.
    pub fn new(id: impl Into<String>) -> Self {
        CompoundId(id.into())
    }

    /// The underlying asset identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CompoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CompoundId {
    fn from(id: &str) -> Self {
        CompoundId::new(id)
    }
}

impl From<String> for CompoundId {
    fn from(id: String) -> Self {
        CompoundId::new(id)
    }
}

/// Identity of one side of a collision, as far as rule matching cares.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Reactant {
    /// A lone atom of the given kind.
    Atom(AtomKind),
    /// A compound root, or any node belonging to one.
    Compound(CompoundId),
}

impl From<AtomKind> for Reactant {
    fn from(kind: AtomKind) -> Self {
        Reactant::Atom(kind)
    }
}

impl From<CompoundId> for Reactant {
    fn from(id: CompoundId) -> Self {
        Reactant::Compound(id)
    }
}

impl From<&str> for Reactant {
    fn from(id: &str) -> Self {
        Reactant::Compound(CompoundId::new(id))
    }
}

impl fmt::Display for Reactant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reactant::Atom(kind) => write!(f, "atom {kind}"),
            Reactant::Compound(id) => write!(f, "compound {id}"),
        }
    }
}

/// Result of evaluating a reactant pair against the table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The pair reacts and produces the named compound.
    Product(CompoundId),
    /// The pair is recognized but its product has not been authored yet.
    /// Logged only; no product, no side effects.
    Unimplemented,
    /// No rule covers the pair. Not an error, a no-op.
    Inert,
}

#[derive(Clone, Debug)]
enum Entry {
    Product(CompoundId),
    Unimplemented,
}

/// Symmetric lookup from unordered reactant pairs to outcomes.
///
/// Internally keyed by the sorted pair, so `product(a, b, ..)` and a later
/// `evaluate(b, a)` hit the same entry. Registering a pair twice replaces
/// the earlier entry.
#[derive(Clone, Debug, Default)]
pub struct ReactionTable {
    entries: HashMap<(Reactant, Reactant), Entry>,
}

impl ReactionTable {
    /// Create an empty table. Every pair evaluates to [`Outcome::Inert`].
    pub fn new() -> Self {
        Self::default()
    }

    /// The stock sandbox chemistry:
    ///
    /// - oxygen + hydrogen -> "compound_ho"
    /// - "compound_ho" + hydrogen -> "molecule_h2o"
    /// - carbon + oxygen -> "compound_co"
    /// - beryllium + carbon -> recognized, unimplemented
    pub fn standard() -> Self {
        let mut table = Self::new();
        table.product(AtomKind::Oxygen, AtomKind::Hydrogen, "compound_ho");
        table.product("compound_ho", AtomKind::Hydrogen, "molecule_h2o");
        table.product(AtomKind::Carbon, AtomKind::Oxygen, "compound_co");
        table.unimplemented(AtomKind::Beryllium, AtomKind::Carbon);
        table
    }

    /// Register a reaction: `a` + `b` produce `product`.
    ///
    /// Order of `a` and `b` does not matter.
    pub fn product<A, B>(&mut self, a: A, b: B, product: impl Into<CompoundId>)
    where
        A: Into<Reactant>,
        B: Into<Reactant>,
    {
        let key = canonical_pair(a.into(), b.into());
        self.entries.insert(key, Entry::Product(product.into()));
    }

    /// Mark a pair as recognized but not yet implemented.
    ///
    /// Evaluation yields [`Outcome::Unimplemented`], which resolvers log
    /// and otherwise ignore.
    pub fn unimplemented<A, B>(&mut self, a: A, b: B)
    where
        A: Into<Reactant>,
        B: Into<Reactant>,
    {
        let key = canonical_pair(a.into(), b.into());
        self.entries.insert(key, Entry::Unimplemented);
    }

    /// Look up the outcome for a pair, order-insensitively.
    ///
    /// Pure: same inputs always yield the same outcome.
    pub fn evaluate(&self, a: &Reactant, b: &Reactant) -> Outcome {
        let key = canonical_pair(a.clone(), b.clone());
        match self.entries.get(&key) {
            Some(Entry::Product(id)) => Outcome::Product(id.clone()),
            Some(Entry::Unimplemented) => Outcome::Unimplemented,
            None => Outcome::Inert,
        }
    }

    /// Number of registered pairs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Sort a pair into its canonical key order.
fn canonical_pair(a: Reactant, b: Reactant) -> (Reactant, Reactant) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
