//! Scale/opacity tweens with batch completion.
//!
//! The host engine exposes a declarative animation primitive: interpolate
//! an entity's scale and opacity toward a target, then fire a completion.
//! This module models that primitive headlessly. Tweens are grouped into
//! batches; a batch completes exactly once, when every member has reached
//! its target, and completions are reported from explicit [`update`] ticks
//! rather than timers, so behavior is deterministic under test.
//!
//! Easing is smoothstep, matching the host's default "smooth" curve.
//!
//! # Example
//!
//! ```ignore
//! use valence::{Animator, Scene};
//!
//! let mut animator = Animator::new();
//! let batch = animator.fade_out(&scene, &[a, b], 0.4);
//!
//! // In the session's update pass:
//! for done in animator.update(&mut scene, dt) {
//!     if done == batch {
//!         // both reactants fully faded
//!     }
//! }
//! ```
//!
//! [`update`]: Animator::update

use crate::scene::{EntityId, Scene};

/// Handle to a running tween batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BatchId(u64);

#[derive(Clone, Debug)]
struct Member {
    entity: EntityId,
    from_scale: f32,
    from_opacity: f32,
    to_scale: f32,
    to_opacity: f32,
}

#[derive(Clone, Debug)]
struct Batch {
    id: BatchId,
    elapsed: f32,
    duration: f32,
    members: Vec<Member>,
}

/// Runs scale/opacity tween batches against a scene.
#[derive(Debug, Default)]
pub struct Animator {
    batches: Vec<Batch>,
    next_id: u64,
}

impl Animator {
    /// Create an idle animator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tween `entities` from their current scale/opacity to zero over
    /// `duration` seconds. The returned batch completes once all members
    /// have vanished.
    pub fn fade_out(&mut self, scene: &Scene, entities: &[EntityId], duration: f32) -> BatchId {
        self.fade_to(scene, entities, 0.0, 0.0, duration)
    }

    /// Tween `entities` from their current scale/opacity to the given
    /// targets over `duration` seconds.
    ///
    /// Entities that are already dead are skipped; a batch whose members
    /// are all dead still completes on the next update. A non-positive
    /// duration completes immediately on the next update, with targets
    /// applied.
    pub fn fade_to(
        &mut self,
        scene: &Scene,
        entities: &[EntityId],
        target_scale: f32,
        target_opacity: f32,
        duration: f32,
    ) -> BatchId {
        let id = BatchId(self.next_id);
        self.next_id += 1;

        let members = entities
            .iter()
            .filter_map(|&entity| {
                let from_scale = scene.scale(entity)?;
                let from_opacity = scene.opacity(entity)?;
                Some(Member {
                    entity,
                    from_scale,
                    from_opacity,
                    to_scale: target_scale,
                    to_opacity: target_opacity,
                })
            })
            .collect();

        self.batches.push(Batch {
            id,
            elapsed: 0.0,
            duration: duration.max(0.0),
            members,
        });
        id
    }

    /// Advance all batches by `dt` seconds, writing interpolated values
    /// into `scene`. Returns the batches that completed this tick, oldest
    /// first; a completed batch is gone afterwards.
    pub fn update(&mut self, scene: &mut Scene, dt: f32) -> Vec<BatchId> {
        let mut completed = Vec::new();
        for batch in &mut self.batches {
            batch.elapsed += dt.max(0.0);
            let t = if batch.duration > 0.0 {
                (batch.elapsed / batch.duration).clamp(0.0, 1.0)
            } else {
                1.0
            };
            let eased = smoothstep(t);
            for member in &batch.members {
                // Members despawned mid-flight just stop receiving writes.
                scene.set_scale(
                    member.entity,
                    lerp(member.from_scale, member.to_scale, eased),
                );
                scene.set_opacity(
                    member.entity,
                    lerp(member.from_opacity, member.to_opacity, eased),
                );
            }
            if t >= 1.0 {
                completed.push(batch.id);
            }
        }
        self.batches.retain(|b| !completed.contains(&b.id));
        completed
    }

    /// Whether `entity` is a member of any running batch.
    pub fn is_animating(&self, entity: EntityId) -> bool {
        self.batches
            .iter()
            .any(|b| b.members.iter().any(|m| m.entity == entity))
    }

    /// Number of running batches.
    pub fn active_batches(&self) -> usize {
        self.batches.len()
    }
}

#[inline]
fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

#[inline]
fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}
