//! # Valence - collision-driven reaction sandbox core
//!
//! Atoms get dragged into a 3D scene, collide, and scripted reactions swap
//! the colliding pair for a compound prefab. Valence is the decision core
//! of that loop. The host engine keeps rendering, physics, hit-testing,
//! and gestures; valence consumes the engine's collision and drag event
//! streams, decides what (if anything) reacts, and mutates a scene graph
//! the engine renders.
//!
//! ## Quick Start
//!
//! ```ignore
//! use valence::prelude::*;
//!
//! let mut sandbox = Sandbox::new()
//!     .with_attraction(MantleAttraction::default());
//!
//! let oxygen = sandbox.place_atom(AtomKind::Oxygen, Vec3::new(0.35, 0.0, 0.0))?;
//! let hydrogen = sandbox.place_atom(AtomKind::Hydrogen, Vec3::new(-0.35, 0.0, 0.0))?;
//!
//! // Forwarded from the host's collision stream:
//! sandbox.handle(Event::CollisionBegan { a: oxygen, b: hydrogen });
//!
//! // Host update pass, once per frame:
//! sandbox.update(1.0 / 90.0);
//! ```
//!
//! ## Core Concepts
//!
//! ### Atoms and compounds
//!
//! Scene nodes tagged with an [`AtomKind`] are atoms; nodes produced by a
//! reaction are compounds, tagged on their root with a [`CompoundId`] and
//! eligible as reactants themselves (hydrogen + oxygen makes
//! "compound_ho", which plus another hydrogen makes "molecule_h2o").
//!
//! ### Reaction rules
//!
//! A [`ReactionTable`] maps unordered reactant pairs to products. Lookup
//! is symmetric and pure; unmatched pairs are no-ops.
//!
//! ### The resolution lock
//!
//! The [`Resolver`] lets exactly one reaction resolve at a time: spawn the
//! product, fade the reactants out, despawn them on completion. Collisions
//! arriving mid-resolution are kept (latest wins) and retried afterwards,
//! so a reactant is never consumed twice and chained reactions are not
//! lost.
//!
//! ### The palette
//!
//! Palette slots are ordinary unplaced atoms; dragging one spawns a fresh
//! copy into the slot and lets the original become a placed scene atom.
//! The [`Palette`] never empties.
//!
//! ## Feature Overview
//!
//! | Concern | Types |
//! |---------|-------|
//! | Session | [`Sandbox`], [`Event`] |
//! | Scene graph | [`Scene`], [`EntityId`], [`AtomTag`], [`CompoundTag`] |
//! | Rules | [`ReactionTable`], [`Reactant`], [`Outcome`] |
//! | Resolution | [`Resolver`], [`Resolution`] |
//! | Prefabs | [`PrefabLibrary`], [`PrefabNode`], [`PrefabSource`] |
//! | Tweens | [`Animator`], [`BatchId`] |
//! | Extras | [`Palette`], [`MantleAttraction`], [`Collection`] |

pub mod animation;
pub mod atom;
pub mod attraction;
pub mod collection;
pub mod error;
pub mod palette;
pub mod prefab;
pub mod resolver;
pub mod rules;
pub mod sandbox;
pub mod scene;

pub use animation::{Animator, BatchId};
pub use atom::AtomKind;
pub use attraction::MantleAttraction;
pub use collection::Collection;
pub use error::PrefabError;
pub use glam::Vec3;
pub use palette::{DragOutcome, Palette};
pub use prefab::{PrefabLibrary, PrefabNode, PrefabSource};
pub use resolver::{Resolution, Resolver};
pub use rules::{CompoundId, Outcome, Reactant, ReactionTable};
pub use sandbox::{Event, Sandbox};
pub use scene::{AtomTag, CompoundTag, EntityId, Manipulation, ReleaseBehavior, Scene};

/// Convenient re-exports for common usage.
///
/// # Usage
///
/// ```ignore
/// use valence::prelude::*;
/// ```
pub mod prelude {
    pub use crate::animation::{Animator, BatchId};
    pub use crate::atom::AtomKind;
    pub use crate::attraction::MantleAttraction;
    pub use crate::collection::Collection;
    pub use crate::error::PrefabError;
    pub use crate::palette::{DragOutcome, Palette};
    pub use crate::prefab::{PrefabLibrary, PrefabNode, PrefabSource};
    pub use crate::resolver::{Resolution, Resolver};
    pub use crate::rules::{CompoundId, Outcome, Reactant, ReactionTable};
    pub use crate::sandbox::{Event, Sandbox};
    pub use crate::scene::{AtomTag, CompoundTag, EntityId, Manipulation, ReleaseBehavior, Scene};
    pub use crate::Vec3;
}
