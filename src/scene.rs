//! Entity scene graph.
//!
//! A minimal stand-in for the host engine's entity/component hierarchy:
//! named nodes with parent/child links, a local transform (position +
//! uniform scale), an opacity channel, and the handful of components the
//! reaction core reads and writes. Rendering, physics, and hit-testing
//! belong to the host engine and are out of scope; the graph only has to be
//! truthful enough for classification, spawning, repositioning, fading, and
//! despawning.
//!
//! Entity ids are generational: despawning a node invalidates its id, and a
//! stale id never aliases a reused slot. Operations on stale ids are no-ops
//! (`bool` setters return `false`, getters return `None`).
//!
//! # Example
//!
//! ```ignore
//! use valence::{AtomKind, AtomTag, Scene};
//!
//! let mut scene = Scene::new();
//! let group = scene.spawn("AtomsGroup");
//! let h = scene.spawn_child(group, "hydrogen").unwrap();
//! scene.set_atom(h, AtomTag::new(AtomKind::Hydrogen));
//! assert_eq!(scene.atom_anchor(h), Some(h));
//! ```

use crate::atom::AtomKind;
use crate::rules::{CompoundId, Reactant};
use glam::Vec3;

/// Generational handle to a scene node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntityId {
    index: u32,
    generation: u32,
}

/// Marks a node as an atom of a given kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AtomTag {
    /// Element identity used for rule matching.
    pub kind: AtomKind,
    /// False while the atom still sits in the palette, true once it has
    /// been dragged into the scene.
    pub placed: bool,
}

impl AtomTag {
    /// A fresh, unplaced atom tag.
    pub fn new(kind: AtomKind) -> Self {
        AtomTag {
            kind,
            placed: false,
        }
    }

    /// A tag for an atom already placed in the scene.
    pub fn placed(kind: AtomKind) -> Self {
        AtomTag { kind, placed: true }
    }
}

/// Marks a node as the root of a spawned compound.
///
/// Descendants of a tagged root carry a membership link back to it, so
/// "which compound does this node belong to" is a constant-time lookup
/// rather than an ancestor name-walk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompoundTag {
    /// Compound identity used for rule matching and collection unlocks.
    pub id: CompoundId,
}

/// What happens to a dragged node when the grab is released.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReleaseBehavior {
    /// Keep the node where it was released.
    #[default]
    Stay,
    /// Snap back to the pre-drag transform.
    Reset,
}

/// Drag/manipulation capability on a node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Manipulation {
    /// Release handling for the host's drag gesture.
    pub release: ReleaseBehavior,
}

impl Manipulation {
    /// Translate-only dragging that keeps the node in place on release.
    pub fn keep_in_place() -> Self {
        Manipulation {
            release: ReleaseBehavior::Stay,
        }
    }
}

#[derive(Clone, Debug)]
struct Node {
    name: String,
    parent: Option<EntityId>,
    children: Vec<EntityId>,
    position: Vec3,
    scale: f32,
    opacity: f32,
    atom: Option<AtomTag>,
    compound: Option<CompoundTag>,
    member_of: Option<EntityId>,
    input_target: bool,
    manipulation: Option<Manipulation>,
}

impl Node {
    fn new(name: String, parent: Option<EntityId>) -> Self {
        Node {
            name,
            parent,
            children: Vec::new(),
            position: Vec3::ZERO,
            scale: 1.0,
            opacity: 1.0,
            atom: None,
            compound: None,
            member_of: None,
            input_target: false,
            manipulation: None,
        }
    }
}

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// The scene graph: a generational arena of nodes.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Whether the scene has no live nodes.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Whether `id` refers to a live node.
    pub fn contains(&self, id: EntityId) -> bool {
        self.node(id).is_some()
    }

    // =========================================================================
    // SPAWN / DESPAWN / HIERARCHY
    // =========================================================================

    /// Spawn a root-level node with the given name.
    pub fn spawn(&mut self, name: impl Into<String>) -> EntityId {
        let node = Node::new(name.into(), None);
        self.insert(node)
    }

    /// Spawn a node as a child of `parent`.
    ///
    /// Returns `None` if `parent` is not alive.
    pub fn spawn_child(&mut self, parent: EntityId, name: impl Into<String>) -> Option<EntityId> {
        if !self.contains(parent) {
            return None;
        }
        let node = Node::new(name.into(), Some(parent));
        let id = self.insert(node);
        if let Some(p) = self.node_mut(parent) {
            p.children.push(id);
        }
        Some(id)
    }

    /// Despawn a node and its entire subtree.
    ///
    /// Returns `false` if `id` was already dead.
    pub fn despawn(&mut self, id: EntityId) -> bool {
        if !self.contains(id) {
            return false;
        }
        // Detach from the parent before tearing the subtree down.
        if let Some(parent) = self.node(id).and_then(|n| n.parent) {
            if let Some(p) = self.node_mut(parent) {
                p.children.retain(|&c| c != id);
            }
        }
        self.despawn_subtree(id);
        true
    }

    fn despawn_subtree(&mut self, id: EntityId) {
        let children = self
            .node(id)
            .map(|n| n.children.clone())
            .unwrap_or_default();
        for child in children {
            self.despawn_subtree(child);
        }
        let slot = &mut self.slots[id.index as usize];
        if slot.generation == id.generation && slot.node.is_some() {
            slot.node = None;
            slot.generation += 1;
            self.free.push(id.index);
            self.live -= 1;
        }
    }

    /// Parent of `id`, if any.
    pub fn parent(&self, id: EntityId) -> Option<EntityId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Children of `id`. Empty for dead ids and leaves.
    pub fn children(&self, id: EntityId) -> &[EntityId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Reparent `child` under `new_parent` (or detach to root level with
    /// `None`). The local transform is kept as-is.
    ///
    /// Returns `false` if either node is dead or the move would create a
    /// cycle.
    pub fn set_parent(&mut self, child: EntityId, new_parent: Option<EntityId>) -> bool {
        if !self.contains(child) {
            return false;
        }
        if let Some(np) = new_parent {
            if !self.contains(np) {
                return false;
            }
            // Walking up from the new parent must not reach the child.
            let mut cursor = Some(np);
            while let Some(c) = cursor {
                if c == child {
                    return false;
                }
                cursor = self.parent(c);
            }
        }
        if let Some(old) = self.parent(child) {
            if let Some(p) = self.node_mut(old) {
                p.children.retain(|&c| c != child);
            }
        }
        if let Some(np) = new_parent {
            if let Some(p) = self.node_mut(np) {
                p.children.push(child);
            }
        }
        if let Some(n) = self.node_mut(child) {
            n.parent = new_parent;
        }
        true
    }

    /// All live descendants of `id` in pre-order, excluding `id` itself.
    pub fn descendants(&self, id: EntityId) -> Vec<EntityId> {
        let mut out = Vec::new();
        let mut stack: Vec<EntityId> = self.children(id).to_vec();
        stack.reverse();
        while let Some(next) = stack.pop() {
            out.push(next);
            let mut kids = self.children(next).to_vec();
            kids.reverse();
            stack.extend(kids);
        }
        out
    }

    /// Iterate over all live node ids.
    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            slot.node.as_ref().map(|_| EntityId {
                index: i as u32,
                generation: slot.generation,
            })
        })
    }

    /// Iterate over all live atom-tagged nodes.
    pub fn atoms(&self) -> impl Iterator<Item = (EntityId, AtomTag)> + '_ {
        self.ids()
            .filter_map(|id| self.atom(id).map(|tag| (id, tag)))
    }

    // =========================================================================
    // NAMES AND TRANSFORMS
    // =========================================================================

    /// Name of `id`.
    pub fn name(&self, id: EntityId) -> Option<&str> {
        self.node(id).map(|n| n.name.as_str())
    }

    /// Rename `id`.
    pub fn set_name(&mut self, id: EntityId, name: impl Into<String>) -> bool {
        match self.node_mut(id) {
            Some(n) => {
                n.name = name.into();
                true
            }
            None => false,
        }
    }

    /// Local position of `id`.
    pub fn position(&self, id: EntityId) -> Option<Vec3> {
        self.node(id).map(|n| n.position)
    }

    /// Set the local position of `id`.
    pub fn set_position(&mut self, id: EntityId, position: Vec3) -> bool {
        match self.node_mut(id) {
            Some(n) => {
                n.position = position;
                true
            }
            None => false,
        }
    }

    /// Local uniform scale of `id`.
    pub fn scale(&self, id: EntityId) -> Option<f32> {
        self.node(id).map(|n| n.scale)
    }

    /// Set the local uniform scale of `id`.
    pub fn set_scale(&mut self, id: EntityId, scale: f32) -> bool {
        match self.node_mut(id) {
            Some(n) => {
                n.scale = scale;
                true
            }
            None => false,
        }
    }

    /// Opacity of `id` (0.0 invisible, 1.0 opaque).
    pub fn opacity(&self, id: EntityId) -> Option<f32> {
        self.node(id).map(|n| n.opacity)
    }

    /// Set the opacity of `id`, clamped to 0.0..=1.0.
    pub fn set_opacity(&mut self, id: EntityId, opacity: f32) -> bool {
        match self.node_mut(id) {
            Some(n) => {
                n.opacity = opacity.clamp(0.0, 1.0);
                true
            }
            None => false,
        }
    }

    /// World-space position of `id`, composed through its ancestors.
    ///
    /// Uniform scales apply to child offsets; there is no rotation channel.
    pub fn world_position(&self, id: EntityId) -> Option<Vec3> {
        let mut v = self.position(id)?;
        let mut cursor = self.parent(id);
        while let Some(a) = cursor {
            let node = self.node(a)?;
            v = node.position + node.scale * v;
            cursor = node.parent;
        }
        Some(v)
    }

    /// World-space scale of `id` (product of the ancestor chain).
    pub fn world_scale(&self, id: EntityId) -> Option<f32> {
        let mut s = self.scale(id)?;
        let mut cursor = self.parent(id);
        while let Some(a) = cursor {
            let node = self.node(a)?;
            s *= node.scale;
            cursor = node.parent;
        }
        Some(s)
    }

    // =========================================================================
    // COMPONENTS
    // =========================================================================

    /// Atom tag on `id`, if present.
    pub fn atom(&self, id: EntityId) -> Option<AtomTag> {
        self.node(id).and_then(|n| n.atom)
    }

    /// Set (or replace) the atom tag on `id`.
    pub fn set_atom(&mut self, id: EntityId, tag: AtomTag) -> bool {
        match self.node_mut(id) {
            Some(n) => {
                n.atom = Some(tag);
                true
            }
            None => false,
        }
    }

    /// Nearest node, starting at `id` and walking up, that carries an atom
    /// tag.
    pub fn atom_anchor(&self, id: EntityId) -> Option<EntityId> {
        let mut cursor = Some(id);
        while let Some(c) = cursor {
            if self.atom(c).is_some() {
                return Some(c);
            }
            cursor = self.parent(c);
        }
        None
    }

    /// Compound tag on `id`, if `id` is a compound root.
    pub fn compound(&self, id: EntityId) -> Option<&CompoundTag> {
        self.node(id).and_then(|n| n.compound.as_ref())
    }

    /// Tag `root` as a compound and link every current descendant back to
    /// it, making membership queries constant-time.
    pub fn tag_compound(&mut self, root: EntityId, id: CompoundId) -> bool {
        if !self.contains(root) {
            return false;
        }
        let members = self.descendants(root);
        if let Some(n) = self.node_mut(root) {
            n.compound = Some(CompoundTag { id });
        }
        for member in members {
            if let Some(n) = self.node_mut(member) {
                n.member_of = Some(root);
            }
        }
        true
    }

    /// The compound root `id` belongs to: itself if tagged, otherwise its
    /// membership link. O(1), no ancestor walk.
    pub fn compound_root(&self, id: EntityId) -> Option<EntityId> {
        let node = self.node(id)?;
        if node.compound.is_some() {
            return Some(id);
        }
        node.member_of
    }

    /// Whether `id` is an input target (hit-testable for manipulation).
    pub fn input_target(&self, id: EntityId) -> bool {
        self.node(id).map(|n| n.input_target).unwrap_or(false)
    }

    /// Enable or disable input targeting on `id`.
    pub fn set_input_target(&mut self, id: EntityId, enabled: bool) -> bool {
        match self.node_mut(id) {
            Some(n) => {
                n.input_target = enabled;
                true
            }
            None => false,
        }
    }

    /// Manipulation capability on `id`, if any.
    pub fn manipulation(&self, id: EntityId) -> Option<Manipulation> {
        self.node(id).and_then(|n| n.manipulation)
    }

    /// Set or clear the manipulation capability on `id`.
    pub fn set_manipulation(&mut self, id: EntityId, manipulation: Option<Manipulation>) -> bool {
        match self.node_mut(id) {
            Some(n) => {
                n.manipulation = manipulation;
                true
            }
            None => false,
        }
    }

    /// Classify `id` as a reactant: compound membership wins, then the
    /// nearest atom tag. `None` for untagged scenery.
    pub fn reactant_of(&self, id: EntityId) -> Option<Reactant> {
        if let Some(root) = self.compound_root(id) {
            if let Some(tag) = self.compound(root) {
                return Some(Reactant::Compound(tag.id.clone()));
            }
        }
        let anchor = self.atom_anchor(id)?;
        self.atom(anchor).map(|tag| Reactant::Atom(tag.kind))
    }

    // =========================================================================
    // INTERNAL
    // =========================================================================

    fn insert(&mut self, node: Node) -> EntityId {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            EntityId {
                index,
                generation: slot.generation,
            }
        } else {
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            EntityId {
                index: (self.slots.len() - 1) as u32,
                generation: 0,
            }
        }
    }

    fn node(&self, id: EntityId) -> Option<&Node> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    fn node_mut(&mut self, id: EntityId) -> Option<&mut Node> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_mut()
    }
}
