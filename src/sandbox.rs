//! Sandbox session: builder and event pump.
//!
//! A [`Sandbox`] owns one scene and everything that reacts to it: the
//! resolver, the palette, the tween engine, the prefab library, and the
//! collection. Sessions are independent; two sandboxes never share state.
//!
//! The host engine drives the sandbox with [`Event`]s from its collision
//! and gesture streams and a per-frame [`update`](Sandbox::update) call.
//! Event handling runs synchronously inside the call and never blocks; the
//! only deferred work is the reactant fade-out, finalized from `update`.
//!
//! # Quick Start
//!
//! ```ignore
//! use valence::prelude::*;
//!
//! let mut sandbox = Sandbox::new()
//!     .with_attraction(MantleAttraction::default())
//!     .with_fade_duration(0.4);
//!
//! let oxygen = sandbox.place_atom(AtomKind::Oxygen, Vec3::new(0.35, 0.0, 0.0))?;
//! let hydrogen = sandbox.place_atom(AtomKind::Hydrogen, Vec3::new(-0.35, 0.0, 0.0))?;
//!
//! // Delivered by the host's collision stream:
//! sandbox.handle(Event::CollisionBegan { a: oxygen, b: hydrogen });
//!
//! // Host update pass:
//! sandbox.update(1.0 / 90.0);
//! ```

use crate::animation::Animator;
use crate::atom::AtomKind;
use crate::attraction::MantleAttraction;
use crate::collection::Collection;
use crate::error::PrefabError;
use crate::palette::{DragOutcome, Palette};
use crate::prefab::{PrefabLibrary, PrefabSource};
use crate::resolver::{Resolution, Resolver};
use crate::rules::ReactionTable;
use crate::scene::{AtomTag, EntityId, Manipulation, Scene};
use glam::Vec3;
use log::{debug, warn};

/// Host-engine events the sandbox consumes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Two collision shapes began touching.
    CollisionBegan {
        /// First collider.
        a: EntityId,
        /// Second collider.
        b: EntityId,
    },
    /// A drag gesture started on an entity.
    DragBegan {
        /// The grabbed entity.
        target: EntityId,
    },
}

/// A self-contained sandbox session.
///
/// Use method chaining to configure, then feed it events and updates.
pub struct Sandbox {
    scene: Scene,
    prefabs: PrefabLibrary,
    resolver: Resolver,
    palette: Palette,
    animator: Animator,
    attraction: Option<MantleAttraction>,
    collection: Collection,
}

impl Sandbox {
    /// A session with the stock chemistry: standard rule table, standard
    /// prefab bundle, standard palette, no attraction.
    pub fn new() -> Self {
        Sandbox {
            scene: Scene::new(),
            prefabs: PrefabLibrary::standard(),
            resolver: Resolver::new(ReactionTable::standard()),
            palette: Palette::standard(),
            animator: Animator::new(),
            attraction: None,
            collection: Collection::new(),
        }
    }

    /// Replace the reaction table.
    pub fn with_reactions(mut self, table: ReactionTable) -> Self {
        let mut resolver = Resolver::new(table);
        resolver.set_fade_duration(self.resolver.fade_duration());
        self.resolver = resolver;
        self
    }

    /// Replace the prefab library.
    pub fn with_prefabs(mut self, prefabs: PrefabLibrary) -> Self {
        self.prefabs = prefabs;
        self
    }

    /// Replace the palette.
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Enable mantle attraction.
    pub fn with_attraction(mut self, attraction: MantleAttraction) -> Self {
        self.attraction = Some(attraction);
        self
    }

    /// Set the reactant fade-out duration in seconds.
    pub fn with_fade_duration(mut self, seconds: f32) -> Self {
        self.resolver.set_fade_duration(seconds);
        self
    }

    /// Set the collection's display slot count.
    pub fn with_collection_slots(mut self, slots: usize) -> Self {
        self.collection = Collection::with_slots(slots);
        self
    }

    // =========================================================================
    // SCENE SETUP
    // =========================================================================

    /// Instantiate an atom prefab as a placed, draggable scene atom.
    pub fn place_atom(&mut self, kind: AtomKind, position: Vec3) -> Result<EntityId, PrefabError> {
        let id = self
            .prefabs
            .instantiate(kind.asset_name(), &mut self.scene)?;
        self.scene.set_position(id, position);
        self.scene.set_atom(id, AtomTag::placed(kind));
        self.scene
            .set_manipulation(id, Some(Manipulation::keep_in_place()));
        Ok(id)
    }

    /// Instantiate an atom prefab as an unplaced palette slot.
    pub fn add_palette_slot(
        &mut self,
        kind: AtomKind,
        position: Vec3,
    ) -> Result<EntityId, PrefabError> {
        let id = self
            .prefabs
            .instantiate(kind.asset_name(), &mut self.scene)?;
        self.scene.set_position(id, position);
        Ok(id)
    }

    // =========================================================================
    // EVENTS AND UPDATES
    // =========================================================================

    /// Dispatch a host-engine event.
    pub fn handle(&mut self, event: Event) {
        match event {
            Event::CollisionBegan { a, b } => {
                self.collide(a, b);
            }
            Event::DragBegan { target } => {
                self.begin_drag(target);
            }
        }
    }

    /// Handle a collision between `a` and `b`, returning what it amounted
    /// to. [`handle`](Self::handle) routes here.
    pub fn collide(&mut self, a: EntityId, b: EntityId) -> Resolution {
        let resolution =
            self.resolver
                .on_collision(&mut self.scene, &self.prefabs, &mut self.animator, a, b);
        if let Resolution::Spawned { product, .. } = &resolution {
            if self.collection.unlock(product.clone()) {
                debug!("collection unlocked {product}");
            }
        }
        resolution
    }

    /// Handle a drag-began gesture on `target`. [`handle`](Self::handle)
    /// routes here.
    ///
    /// A missing palette prefab is logged and treated as
    /// [`DragOutcome::Ignored`]; the drag itself still proceeds in the
    /// host.
    pub fn begin_drag(&mut self, target: EntityId) -> DragOutcome {
        match self
            .palette
            .on_drag_began(&mut self.scene, &self.prefabs, &mut self.animator, target)
        {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!("palette duplication failed: {err}");
                DragOutcome::Ignored
            }
        }
    }

    /// Advance the session by `dt` seconds: attraction drift, tweens, and
    /// resolution completion (including the pending-pair retry).
    pub fn update(&mut self, dt: f32) {
        // Attraction pauses while a resolution is in flight so fading
        // reactants stay put.
        if !self.resolver.is_resolving() {
            if let Some(attraction) = self.attraction {
                attraction.apply(&mut self.scene, dt);
            }
        }

        for batch in self.animator.update(&mut self.scene, dt) {
            if let Some((a, b)) = self.resolver.finish(&mut self.scene, batch) {
                if self.scene.contains(a) && self.scene.contains(b) {
                    self.collide(a, b);
                } else {
                    debug!("pending collision dropped, a collider is gone");
                }
            }
        }
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// The session's scene.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable access to the session's scene.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// The session's collection of discovered compounds.
    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    /// Whether a resolution is currently in flight.
    pub fn is_resolving(&self) -> bool {
        self.resolver.is_resolving()
    }
}

impl Default for Sandbox {
    fn default() -> Self {
        Self::new()
    }
}
