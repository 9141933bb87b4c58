//! The reaction resolver.
//!
//! Collisions arrive as pairs of entity ids; the resolver classifies both
//! sides, evaluates the [`ReactionTable`], and on a match swaps the
//! reactants for the product prefab. It is a two-state machine:
//!
//! - `Idle` - no resolution in flight.
//! - `Resolving` - a product has been spawned and the reactants are fading
//!   out; entered on a successful match, left when the fade batch
//!   completes and the reactants are despawned.
//!
//! At most one resolution is in flight per resolver, so a reactant can
//! never be consumed by two overlapping resolutions. A collision reported
//! while resolving is not dropped: the latest such pair is kept in a
//! single pending slot and handed back to the caller when the in-flight
//! resolution finishes, so a legitimate follow-up reaction is only delayed,
//! never lost.
//!
//! The product prefab is loaded *before* the resolver locks or touches the
//! reactants. If loading fails the resolution is abandoned: the resolver
//! stays idle and both reactants remain in the scene untouched.
//!
//! Each resolver instance carries its own state; independent scenes get
//! independent resolvers.
//!
//! # Example
//!
//! ```ignore
//! use valence::{Animator, ReactionTable, Resolution, Resolver};
//!
//! let mut resolver = Resolver::new(ReactionTable::standard());
//! match resolver.on_collision(&mut scene, &prefabs, &mut animator, a, b) {
//!     Resolution::Spawned { product, .. } => println!("made {product}"),
//!     other => println!("{other:?}"),
//! }
//! ```

use crate::animation::{Animator, BatchId};
use crate::error::PrefabError;
use crate::prefab::PrefabSource;
use crate::rules::{CompoundId, Outcome, Reactant, ReactionTable};
use crate::scene::{EntityId, Manipulation, Scene};
use glam::Vec3;
use log::{debug, info, warn};

/// What a collision amounted to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// A reaction fired: the product is in the scene at the reactants'
    /// midpoint and the reactants are fading out.
    Spawned {
        /// Identity of the spawned compound.
        product: CompoundId,
        /// Scene root of the spawned compound.
        root: EntityId,
    },
    /// A resolution was already in flight; the pair was kept as the
    /// pending pair and will be retried when the current one finishes.
    Deferred,
    /// The pair is recognized but its product has not been authored.
    Unimplemented,
    /// Nothing to do: untagged scenery, a self-collision, or a pair no
    /// rule covers.
    Inert,
    /// The product prefab failed to load. The resolver stayed idle and
    /// both reactants are intact.
    Failed(PrefabError),
}

#[derive(Debug)]
struct Active {
    batch: BatchId,
    reactants: (EntityId, EntityId),
}

/// Collision-driven reaction state machine.
#[derive(Debug)]
pub struct Resolver {
    table: ReactionTable,
    fade_duration: f32,
    active: Option<Active>,
    pending: Option<(EntityId, EntityId)>,
}

impl Resolver {
    /// Create an idle resolver over the given rule table.
    pub fn new(table: ReactionTable) -> Self {
        Resolver {
            table,
            fade_duration: 0.4,
            active: None,
            pending: None,
        }
    }

    /// Set how long the reactant fade-out runs, in seconds.
    pub fn with_fade_duration(mut self, seconds: f32) -> Self {
        self.fade_duration = seconds;
        self
    }

    /// In-place variant of [`with_fade_duration`](Self::with_fade_duration).
    pub fn set_fade_duration(&mut self, seconds: f32) {
        self.fade_duration = seconds;
    }

    /// The configured fade-out duration in seconds.
    pub fn fade_duration(&self) -> f32 {
        self.fade_duration
    }

    /// Whether a resolution is currently in flight.
    pub fn is_resolving(&self) -> bool {
        self.active.is_some()
    }

    /// The rule table this resolver evaluates.
    pub fn table(&self) -> &ReactionTable {
        &self.table
    }

    /// Handle a collision-began event between entities `a` and `b`.
    ///
    /// Runs synchronously and never blocks; the only deferred work is the
    /// reactant fade-out, which the caller drives through its [`Animator`]
    /// and reports back via [`finish`](Self::finish).
    pub fn on_collision(
        &mut self,
        scene: &mut Scene,
        prefabs: &dyn PrefabSource,
        animator: &mut Animator,
        a: EntityId,
        b: EntityId,
    ) -> Resolution {
        if self.active.is_some() {
            debug!("collision deferred while a resolution is in flight");
            self.pending = Some((a, b));
            return Resolution::Deferred;
        }

        let (Some(ident_a), Some(ident_b)) = (scene.reactant_of(a), scene.reactant_of(b)) else {
            debug!("collision involved untagged scenery, ignoring");
            return Resolution::Inert;
        };

        // The node that gets consumed on success: the compound root or the
        // atom container, never the raw collider child.
        let (Some(root_a), Some(root_b)) = (consumable_root(scene, a), consumable_root(scene, b))
        else {
            return Resolution::Inert;
        };
        if root_a == root_b {
            debug!("collision within one assembly, ignoring");
            return Resolution::Inert;
        }

        match self.table.evaluate(&ident_a, &ident_b) {
            Outcome::Product(product) => self.spawn_product(
                scene,
                prefabs,
                animator,
                &ident_a,
                &ident_b,
                product,
                (a, b),
                (root_a, root_b),
            ),
            Outcome::Unimplemented => {
                info!("{ident_a} + {ident_b} is recognized but not implemented yet");
                Resolution::Unimplemented
            }
            Outcome::Inert => {
                debug!("no reaction between {ident_a} and {ident_b}");
                Resolution::Inert
            }
        }
    }

    /// Note a completed fade batch.
    ///
    /// If it is this resolver's batch, the reactants are despawned, the
    /// resolver returns to idle, and any pending pair is handed back for
    /// the caller to re-dispatch. Foreign batches are ignored.
    pub fn finish(&mut self, scene: &mut Scene, batch: BatchId) -> Option<(EntityId, EntityId)> {
        let active = self.active.as_ref()?;
        if active.batch != batch {
            return None;
        }
        let (a, b) = active.reactants;
        scene.despawn(a);
        scene.despawn(b);
        self.active = None;
        self.pending.take()
    }

    #[allow(clippy::too_many_arguments)]
    fn spawn_product(
        &mut self,
        scene: &mut Scene,
        prefabs: &dyn PrefabSource,
        animator: &mut Animator,
        ident_a: &Reactant,
        ident_b: &Reactant,
        product: CompoundId,
        colliders: (EntityId, EntityId),
        roots: (EntityId, EntityId),
    ) -> Resolution {
        // Load first: a failed load must leave the reactants untouched and
        // the resolver idle.
        let product_root = match prefabs.instantiate(product.as_str(), scene) {
            Ok(root) => root,
            Err(err) => {
                warn!("{ident_a} + {ident_b} aborted, product failed to load: {err}");
                return Resolution::Failed(err);
            }
        };

        scene.set_name(product_root, product.as_str());
        scene.tag_compound(product_root, product.clone());

        let midpoint = {
            let pa = scene.world_position(colliders.0).unwrap_or(Vec3::ZERO);
            let pb = scene.world_position(colliders.1).unwrap_or(Vec3::ZERO);
            (pa + pb) * 0.5
        };
        scene.set_position(product_root, midpoint);

        // Loaded assets arrive with input targets on nested nodes; strip
        // them so drags always land on the compound root.
        for node in scene.descendants(product_root) {
            scene.set_input_target(node, false);
        }
        scene.set_input_target(product_root, true);
        scene.set_manipulation(product_root, Some(Manipulation::keep_in_place()));

        let batch = animator.fade_out(scene, &[roots.0, roots.1], self.fade_duration);
        self.active = Some(Active {
            batch,
            reactants: (roots.0, roots.1),
        });
        info!("{ident_a} + {ident_b} -> {product}");

        Resolution::Spawned {
            product,
            root: product_root,
        }
    }
}

fn consumable_root(scene: &Scene, id: EntityId) -> Option<EntityId> {
    scene.compound_root(id).or_else(|| scene.atom_anchor(id))
}
