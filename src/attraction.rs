//! Mantle attraction.
//!
//! Hydrogen atoms drift toward the nearest oxygen once it enters a "mantle"
//! radius around them, with linear falloff: the pull is strongest up close
//! and fades to nothing at the mantle edge. Pure position nudging applied
//! from the session's update pass; there is no velocity state.
//!
//! Only placed atoms participate, so palette slots stay put, and the
//! session skips the pass entirely while a resolution is in flight so a
//! fading reactant is never dragged around.

use crate::atom::AtomKind;
use crate::scene::{EntityId, Scene};
use glam::Vec3;

/// Attraction field pulling placed hydrogens toward nearby oxygens.
#[derive(Clone, Copy, Debug)]
pub struct MantleAttraction {
    /// Attraction range in meters.
    pub radius: f32,
    /// Drift speed in meters per second at zero distance.
    pub strength: f32,
}

impl Default for MantleAttraction {
    fn default() -> Self {
        MantleAttraction {
            radius: 0.35,
            strength: 0.6,
        }
    }
}

impl MantleAttraction {
    /// Attraction with the given range and strength.
    pub fn new(radius: f32, strength: f32) -> Self {
        MantleAttraction { radius, strength }
    }

    /// Advance the attraction by `dt` seconds.
    pub fn apply(&self, scene: &mut Scene, dt: f32) {
        if dt <= 0.0 || self.radius <= 0.0 {
            return;
        }

        let mut hydrogens: Vec<(EntityId, Vec3)> = Vec::new();
        let mut oxygens: Vec<Vec3> = Vec::new();
        for (id, tag) in scene.atoms() {
            if !tag.placed {
                continue;
            }
            match tag.kind {
                AtomKind::Hydrogen => {
                    if let Some(pos) = scene.world_position(id) {
                        hydrogens.push((id, pos));
                    }
                }
                AtomKind::Oxygen => {
                    if let Some(pos) = scene.world_position(id) {
                        oxygens.push(pos);
                    }
                }
                _ => {}
            }
        }

        for (h, h_pos) in hydrogens {
            let Some(o_pos) = nearest(&oxygens, h_pos) else {
                continue;
            };
            let delta = o_pos - h_pos;
            let dist = delta.length();
            if dist <= 0.001 || dist >= self.radius {
                continue;
            }

            let falloff = 1.0 - dist / self.radius;
            let step = delta / dist * self.strength * falloff * dt;

            // The step is world-space; convert into the node's parent
            // frame before nudging its local position.
            let parent_scale = scene
                .parent(h)
                .and_then(|p| scene.world_scale(p))
                .unwrap_or(1.0);
            if parent_scale.abs() < f32::EPSILON {
                continue;
            }
            if let Some(local) = scene.position(h) {
                scene.set_position(h, local + step / parent_scale);
            }
        }
    }
}

fn nearest(candidates: &[Vec3], from: Vec3) -> Option<Vec3> {
    candidates
        .iter()
        .copied()
        .min_by(|a, b| {
            a.distance_squared(from)
                .total_cmp(&b.distance_squared(from))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::AtomTag;

    fn placed(scene: &mut Scene, kind: AtomKind, pos: Vec3) -> EntityId {
        let id = scene.spawn(kind.asset_name());
        scene.set_atom(id, AtomTag::placed(kind));
        scene.set_position(id, pos);
        id
    }

    #[test]
    fn test_hydrogen_steps_toward_oxygen_inside_mantle() {
        let mut scene = Scene::new();
        let h = placed(&mut scene, AtomKind::Hydrogen, Vec3::ZERO);
        placed(&mut scene, AtomKind::Oxygen, Vec3::new(0.175, 0.0, 0.0));

        let attraction = MantleAttraction::default();
        attraction.apply(&mut scene, 0.1);

        // Half-way into the mantle: falloff 0.5, step = 0.6 * 0.5 * 0.1.
        let moved = scene.position(h).unwrap();
        assert!((moved.x - 0.03).abs() < 1e-6);
        assert_eq!(moved.y, 0.0);
    }

    #[test]
    fn test_oxygen_does_not_move() {
        let mut scene = Scene::new();
        placed(&mut scene, AtomKind::Hydrogen, Vec3::ZERO);
        let o = placed(&mut scene, AtomKind::Oxygen, Vec3::new(0.2, 0.0, 0.0));

        MantleAttraction::default().apply(&mut scene, 0.1);
        assert_eq!(scene.position(o), Some(Vec3::new(0.2, 0.0, 0.0)));
    }

    #[test]
    fn test_no_pull_outside_mantle() {
        let mut scene = Scene::new();
        let h = placed(&mut scene, AtomKind::Hydrogen, Vec3::ZERO);
        placed(&mut scene, AtomKind::Oxygen, Vec3::new(0.5, 0.0, 0.0));

        MantleAttraction::default().apply(&mut scene, 0.1);
        assert_eq!(scene.position(h), Some(Vec3::ZERO));
    }

    #[test]
    fn test_unplaced_atoms_are_inert() {
        let mut scene = Scene::new();
        let h = scene.spawn("hydrogen");
        scene.set_atom(h, AtomTag::new(AtomKind::Hydrogen));
        placed(&mut scene, AtomKind::Oxygen, Vec3::new(0.1, 0.0, 0.0));

        MantleAttraction::default().apply(&mut scene, 0.1);
        assert_eq!(scene.position(h), Some(Vec3::ZERO));
    }

    #[test]
    fn test_pulls_toward_nearest_oxygen() {
        let mut scene = Scene::new();
        let h = placed(&mut scene, AtomKind::Hydrogen, Vec3::ZERO);
        placed(&mut scene, AtomKind::Oxygen, Vec3::new(0.3, 0.0, 0.0));
        placed(&mut scene, AtomKind::Oxygen, Vec3::new(-0.1, 0.0, 0.0));

        MantleAttraction::default().apply(&mut scene, 0.1);
        assert!(scene.position(h).unwrap().x < 0.0);
    }
}
