//! Palette duplication.
//!
//! Palette slots are ordinary atom entities sitting in the scene. When the
//! user starts dragging one that has never been placed, the palette spawns
//! a fresh copy of the same prefab into the vacated slot and lets the
//! original become the dragged, placed atom. The slot therefore never
//! empties, and an atom that has already been placed never re-duplicates.
//!
//! The fresh copy fades in from zero opacity, the way the toolbar ramps a
//! model in while it enters the scene.
//!
//! # Example
//!
//! ```ignore
//! use valence::{DragOutcome, Palette};
//!
//! let palette = Palette::standard();
//! match palette.on_drag_began(&mut scene, &prefabs, &mut animator, grabbed)? {
//!     DragOutcome::Duplicated { replacement } => {
//!         // `grabbed` is now a placed atom; `replacement` fills its slot
//!     }
//!     DragOutcome::Ignored => {}
//! }
//! ```

use crate::animation::Animator;
use crate::atom::AtomKind;
use crate::error::PrefabError;
use crate::prefab::PrefabSource;
use crate::scene::{AtomTag, EntityId, Manipulation, Scene};
use log::debug;
use std::collections::HashSet;

/// What a drag-began event amounted to, as far as the palette cares.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragOutcome {
    /// The dragged node was an unplaced palette atom: a fresh copy now
    /// occupies its slot and the original is marked placed.
    Duplicated {
        /// The copy left behind in the palette slot.
        replacement: EntityId,
    },
    /// Nothing to do: the target was not an atom, was already placed, or
    /// its root is not a palette slot.
    Ignored,
}

/// The set of scene names that count as palette slots.
#[derive(Clone, Debug)]
pub struct Palette {
    names: HashSet<String>,
    fade_in: f32,
}

impl Palette {
    /// An empty palette: every drag is ignored.
    pub fn new() -> Self {
        Palette {
            names: HashSet::new(),
            fade_in: 0.25,
        }
    }

    /// The stock palette: one slot per [`AtomKind`], named after its
    /// asset.
    pub fn standard() -> Self {
        let mut palette = Self::new();
        for kind in AtomKind::ALL {
            palette.names.insert(kind.asset_name().to_owned());
        }
        palette
    }

    /// Add a slot name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.names.insert(name.into());
        self
    }

    /// Set how long the replacement's fade-in runs, in seconds.
    pub fn with_fade_in(mut self, seconds: f32) -> Self {
        self.fade_in = seconds;
        self
    }

    /// Whether `name` is a palette slot name.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Handle a drag-began event on `target`.
    ///
    /// Fails only if the slot's prefab is missing from `prefabs`; in that
    /// case nothing in the scene has changed and the original can still be
    /// dragged (it just stays a palette atom).
    pub fn on_drag_began(
        &self,
        scene: &mut Scene,
        prefabs: &dyn PrefabSource,
        animator: &mut Animator,
        target: EntityId,
    ) -> Result<DragOutcome, PrefabError> {
        let Some(anchor) = scene.atom_anchor(target) else {
            return Ok(DragOutcome::Ignored);
        };
        let Some(tag) = scene.atom(anchor) else {
            return Ok(DragOutcome::Ignored);
        };
        if tag.placed {
            return Ok(DragOutcome::Ignored);
        }
        let is_slot = scene
            .name(anchor)
            .map(|name| self.names.contains(name))
            .unwrap_or(false);
        if !is_slot {
            return Ok(DragOutcome::Ignored);
        }

        let parent = scene.parent(anchor);
        let position = scene.position(anchor).unwrap_or_default();
        let scale = scene.scale(anchor).unwrap_or(1.0);

        let replacement = prefabs.instantiate(tag.kind.asset_name(), scene)?;
        scene.set_parent(replacement, parent);
        scene.set_position(replacement, position);
        scene.set_scale(replacement, scale);
        scene.set_opacity(replacement, 0.0);
        animator.fade_to(scene, &[replacement], scale, 1.0, self.fade_in);

        // The original leaves the palette: placed, and draggable from now
        // on with keep-in-place release.
        scene.set_atom(anchor, AtomTag::placed(tag.kind));
        scene.set_manipulation(anchor, Some(Manipulation::keep_in_place()));

        debug!("palette slot {} refilled", tag.kind);
        Ok(DragOutcome::Duplicated { replacement })
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new()
    }
}
