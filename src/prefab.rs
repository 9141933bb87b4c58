//! Prefab templates and named-asset loading.
//!
//! The host engine loads models by asset name from a content bundle. This
//! module models that surface: a [`PrefabSource`] instantiates a named
//! prefab into a [`Scene`], and [`PrefabLibrary`] is the in-memory
//! implementation used by the sandbox and by tests.
//!
//! A [`PrefabNode`] describes one node of a template tree: its name, local
//! transform, and whether it carries an atom tag or an input target. Atom
//! prefabs mirror the app's container convention: a tagged, targetable
//! container wrapping a scaled model child.
//!
//! # Example
//!
//! ```ignore
//! use valence::{AtomKind, PrefabLibrary, PrefabNode, PrefabSource, Scene};
//!
//! let library = PrefabLibrary::new().with(
//!     PrefabNode::new("hydrogen")
//!         .atom(AtomKind::Hydrogen)
//!         .input_target()
//!         .child(PrefabNode::new("hydrogen_model").scaled(0.12)),
//! );
//!
//! let mut scene = Scene::new();
//! let root = library.instantiate("hydrogen", &mut scene)?;
//! ```

use crate::atom::AtomKind;
use crate::error::PrefabError;
use crate::scene::{AtomTag, EntityId, Scene};
use glam::Vec3;
use std::collections::HashMap;

/// Instantiates named prefabs into a scene.
///
/// Implemented by [`PrefabLibrary`]; a host-engine adapter would implement
/// this over its own asset bundle.
pub trait PrefabSource {
    /// Instantiate the prefab registered under `name` into `scene` at root
    /// level, returning the new root id.
    fn instantiate(&self, name: &str, scene: &mut Scene) -> Result<EntityId, PrefabError>;
}

/// One node of a prefab template tree.
#[derive(Clone, Debug)]
pub struct PrefabNode {
    name: String,
    position: Vec3,
    scale: f32,
    atom: Option<AtomKind>,
    input_target: bool,
    children: Vec<PrefabNode>,
}

impl PrefabNode {
    /// A template node with identity transform and no components.
    pub fn new(name: impl Into<String>) -> Self {
        PrefabNode {
            name: name.into(),
            position: Vec3::ZERO,
            scale: 1.0,
            atom: None,
            input_target: false,
            children: Vec::new(),
        }
    }

    /// Set the node's local position.
    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Set the node's local uniform scale.
    pub fn scaled(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Tag instances of this node as an (unplaced) atom of `kind`.
    pub fn atom(mut self, kind: AtomKind) -> Self {
        self.atom = Some(kind);
        self
    }

    /// Make instances of this node hit-testable for manipulation.
    pub fn input_target(mut self) -> Self {
        self.input_target = true;
        self
    }

    /// Append a child template.
    pub fn child(mut self, child: PrefabNode) -> Self {
        self.children.push(child);
        self
    }

    /// The template's node name.
    pub fn name(&self) -> &str {
        &self.name
    }

    fn build(&self, scene: &mut Scene, parent: Option<EntityId>) -> EntityId {
        let id = match parent {
            // The parent was just spawned by this walk and is still alive.
            Some(p) => scene
                .spawn_child(p, self.name.clone())
                .unwrap_or_else(|| scene.spawn(self.name.clone())),
            None => scene.spawn(self.name.clone()),
        };
        scene.set_position(id, self.position);
        scene.set_scale(id, self.scale);
        if let Some(kind) = self.atom {
            scene.set_atom(id, AtomTag::new(kind));
        }
        scene.set_input_target(id, self.input_target);
        for child in &self.children {
            child.build(scene, Some(id));
        }
        id
    }
}

/// In-memory registry of prefab templates, keyed by root name.
#[derive(Clone, Debug, Default)]
pub struct PrefabLibrary {
    prefabs: HashMap<String, PrefabNode>,
}

impl PrefabLibrary {
    /// Create an empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// The stock content bundle: one container prefab per [`AtomKind`] and
    /// the three compound prefabs the standard rule table can produce.
    ///
    /// Compound prefabs deliberately carry input targets on their child
    /// sites, the way nested targets arrive in loaded assets; the resolver
    /// strips them so only the compound root is draggable.
    pub fn standard() -> Self {
        let mut library = Self::new();
        for kind in AtomKind::ALL {
            library.insert(atom_container(kind));
        }
        library.insert(
            compound_root("compound_ho")
                .child(bond_site("hydrogen_site", Vec3::new(-0.05, 0.0, 0.0)))
                .child(bond_site("oxygen_site", Vec3::new(0.05, 0.0, 0.0))),
        );
        library.insert(
            compound_root("compound_co")
                .child(bond_site("carbon_site", Vec3::new(-0.06, 0.0, 0.0)))
                .child(bond_site("oxygen_site", Vec3::new(0.06, 0.0, 0.0))),
        );
        library.insert(
            compound_root("molecule_h2o")
                .child(bond_site("oxygen_site", Vec3::ZERO))
                .child(bond_site("hydrogen_site_a", Vec3::new(-0.06, 0.04, 0.0)))
                .child(bond_site("hydrogen_site_b", Vec3::new(0.06, 0.04, 0.0))),
        );
        library
    }

    /// Register a prefab under its root name, replacing any previous one.
    pub fn insert(&mut self, prefab: PrefabNode) {
        self.prefabs.insert(prefab.name().to_owned(), prefab);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, prefab: PrefabNode) -> Self {
        self.insert(prefab);
        self
    }

    /// Whether a prefab is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.prefabs.contains_key(name)
    }

    /// Number of registered prefabs.
    pub fn len(&self) -> usize {
        self.prefabs.len()
    }

    /// Whether the library is empty.
    pub fn is_empty(&self) -> bool {
        self.prefabs.is_empty()
    }
}

impl PrefabSource for PrefabLibrary {
    fn instantiate(&self, name: &str, scene: &mut Scene) -> Result<EntityId, PrefabError> {
        let template = self
            .prefabs
            .get(name)
            .ok_or_else(|| PrefabError::NotFound(name.to_owned()))?;
        Ok(template.build(scene, None))
    }
}

/// Container prefab for one atom kind: tagged, targetable, wrapping a
/// scaled model child.
fn atom_container(kind: AtomKind) -> PrefabNode {
    PrefabNode::new(kind.asset_name())
        .atom(kind)
        .input_target()
        .child(PrefabNode::new(format!("{}_model", kind.asset_name())).scaled(0.12))
}

fn compound_root(id: &str) -> PrefabNode {
    PrefabNode::new(id).input_target()
}

fn bond_site(name: &str, position: Vec3) -> PrefabNode {
    PrefabNode::new(name).at(position).scaled(0.12).input_target()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_prefab_is_an_error() {
        let library = PrefabLibrary::new();
        let mut scene = Scene::new();
        let err = library.instantiate("compound_ho", &mut scene).unwrap_err();
        assert!(matches!(err, PrefabError::NotFound(ref n) if n == "compound_ho"));
        assert!(scene.is_empty());
    }

    #[test]
    fn test_standard_covers_palette_and_products() {
        let library = PrefabLibrary::standard();
        for kind in AtomKind::ALL {
            assert!(library.contains(kind.asset_name()));
        }
        for id in ["compound_ho", "compound_co", "molecule_h2o"] {
            assert!(library.contains(id));
        }
    }

    #[test]
    fn test_atom_instance_shape() {
        let library = PrefabLibrary::standard();
        let mut scene = Scene::new();
        let root = library.instantiate("oxygen", &mut scene).unwrap();

        let tag = scene.atom(root).unwrap();
        assert_eq!(tag.kind, AtomKind::Oxygen);
        assert!(!tag.placed);
        assert!(scene.input_target(root));

        let children = scene.children(root).to_vec();
        assert_eq!(children.len(), 1);
        assert_eq!(scene.scale(children[0]), Some(0.12));
    }

    #[test]
    fn test_template_transform_applied() {
        let library = PrefabLibrary::new().with(
            PrefabNode::new("probe")
                .at(Vec3::new(0.5, 0.0, 0.0))
                .scaled(2.0)
                .child(PrefabNode::new("tip").at(Vec3::new(0.0, 1.0, 0.0))),
        );
        let mut scene = Scene::new();
        let root = library.instantiate("probe", &mut scene).unwrap();
        let tip = scene.children(root)[0];

        assert_eq!(scene.position(root), Some(Vec3::new(0.5, 0.0, 0.0)));
        assert_eq!(scene.world_position(tip), Some(Vec3::new(0.5, 2.0, 0.0)));
    }

    #[test]
    fn test_instances_are_independent() {
        let library = PrefabLibrary::standard();
        let mut scene = Scene::new();
        let first = library.instantiate("hydrogen", &mut scene).unwrap();
        let second = library.instantiate("hydrogen", &mut scene).unwrap();
        assert_ne!(first, second);

        scene.set_position(first, Vec3::ONE);
        assert_eq!(scene.position(second), Some(Vec3::ZERO));
    }
}
