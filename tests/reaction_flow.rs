//! End-to-end reaction scenarios.
//!
//! These tests drive a full [`Sandbox`] session through its host-facing
//! surface only: collision events, drag events, and per-frame updates.

use valence::prelude::*;

/// Run updates until every fade has finished and the resolver is idle.
fn settle(sandbox: &mut Sandbox) {
    for _ in 0..30 {
        sandbox.update(0.1);
    }
}

/// All compound roots currently in the scene, as (id, compound name).
fn compound_roots(scene: &Scene) -> Vec<(EntityId, String)> {
    scene
        .ids()
        .filter_map(|id| {
            scene
                .compound(id)
                .map(|tag| (id, tag.id.as_str().to_owned()))
        })
        .collect()
}

// ============================================================================
// Reaction pipeline
// ============================================================================

#[test]
fn test_water_pipeline_end_to_end() {
    let mut sandbox = Sandbox::new();
    let o = sandbox
        .place_atom(AtomKind::Oxygen, Vec3::new(0.35, 0.0, 0.0))
        .unwrap();
    let h = sandbox
        .place_atom(AtomKind::Hydrogen, Vec3::new(-0.35, 0.0, 0.0))
        .unwrap();

    // Oxygen + hydrogen -> compound_ho at the midpoint.
    sandbox.handle(Event::CollisionBegan { a: o, b: h });
    let roots = compound_roots(sandbox.scene());
    assert_eq!(roots.len(), 1);
    let (ho_root, ho_name) = roots[0].clone();
    assert_eq!(ho_name, "compound_ho");
    assert_eq!(sandbox.scene().world_position(ho_root), Some(Vec3::ZERO));

    // Reactants survive until the fade completes, then disappear.
    assert!(sandbox.scene().contains(o));
    settle(&mut sandbox);
    assert!(!sandbox.scene().contains(o));
    assert!(!sandbox.scene().contains(h));
    assert!(sandbox.scene().contains(ho_root));

    // A descendant of the compound chains with a fresh hydrogen.
    let site = sandbox.scene().children(ho_root)[0];
    let h2 = sandbox
        .place_atom(AtomKind::Hydrogen, Vec3::new(0.1, 0.0, 0.0))
        .unwrap();
    sandbox.handle(Event::CollisionBegan { a: site, b: h2 });
    settle(&mut sandbox);

    assert!(!sandbox.scene().contains(ho_root));
    let roots = compound_roots(sandbox.scene());
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].1, "molecule_h2o");

    assert!(sandbox.collection().is_unlocked("compound_ho"));
    assert!(sandbox.collection().is_unlocked("molecule_h2o"));
    assert_eq!(sandbox.collection().unlocked_count(), 2);
}

#[test]
fn test_products_are_order_insensitive() {
    for swap in [false, true] {
        let mut sandbox = Sandbox::new();
        let c = sandbox.place_atom(AtomKind::Carbon, Vec3::ZERO).unwrap();
        let o = sandbox.place_atom(AtomKind::Oxygen, Vec3::ONE).unwrap();
        let (a, b) = if swap { (o, c) } else { (c, o) };

        sandbox.handle(Event::CollisionBegan { a, b });
        settle(&mut sandbox);

        let roots = compound_roots(sandbox.scene());
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].1, "compound_co");
    }
}

#[test]
fn test_unimplemented_pair_changes_nothing() {
    let mut sandbox = Sandbox::new();
    let be = sandbox.place_atom(AtomKind::Beryllium, Vec3::ZERO).unwrap();
    let c = sandbox.place_atom(AtomKind::Carbon, Vec3::ONE).unwrap();
    let entities = sandbox.scene().len();

    sandbox.handle(Event::CollisionBegan { a: be, b: c });
    settle(&mut sandbox);

    assert!(sandbox.scene().contains(be));
    assert!(sandbox.scene().contains(c));
    assert_eq!(sandbox.scene().len(), entities);
    assert!(compound_roots(sandbox.scene()).is_empty());
    assert_eq!(sandbox.collection().unlocked_count(), 0);
}

// ============================================================================
// Resolution lock
// ============================================================================

#[test]
fn test_single_spawn_under_collision_storm() {
    let mut sandbox = Sandbox::new();
    let o = sandbox.place_atom(AtomKind::Oxygen, Vec3::ZERO).unwrap();
    let h = sandbox.place_atom(AtomKind::Hydrogen, Vec3::ONE).unwrap();
    let c = sandbox
        .place_atom(AtomKind::Carbon, Vec3::new(2.0, 0.0, 0.0))
        .unwrap();
    let o2 = sandbox
        .place_atom(AtomKind::Oxygen, Vec3::new(2.2, 0.0, 0.0))
        .unwrap();

    sandbox.handle(Event::CollisionBegan { a: o, b: h });
    assert!(sandbox.is_resolving());

    // Hammer the resolver mid-flight; nothing further may spawn.
    for _ in 0..10 {
        sandbox.handle(Event::CollisionBegan { a: c, b: o2 });
        assert_eq!(compound_roots(sandbox.scene()).len(), 1);
    }

    // The latest deferred pair fires after completion.
    settle(&mut sandbox);
    let names: Vec<String> = compound_roots(sandbox.scene())
        .into_iter()
        .map(|(_, name)| name)
        .collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"compound_ho".to_owned()));
    assert!(names.contains(&"compound_co".to_owned()));
}

#[test]
fn test_pending_pair_with_consumed_reactant_is_dropped() {
    let mut sandbox = Sandbox::new();
    let o = sandbox.place_atom(AtomKind::Oxygen, Vec3::ZERO).unwrap();
    let h = sandbox.place_atom(AtomKind::Hydrogen, Vec3::ONE).unwrap();
    let c = sandbox
        .place_atom(AtomKind::Carbon, Vec3::new(2.0, 0.0, 0.0))
        .unwrap();

    sandbox.handle(Event::CollisionBegan { a: o, b: h });
    // This pending pair references a reactant that is being consumed.
    sandbox.handle(Event::CollisionBegan { a: h, b: c });
    settle(&mut sandbox);

    // Only the first reaction happened; the stale pair was discarded.
    assert_eq!(compound_roots(sandbox.scene()).len(), 1);
    assert!(sandbox.scene().contains(c));
    assert!(!sandbox.scene().contains(h));
}

// ============================================================================
// Error handling
// ============================================================================

#[test]
fn test_missing_product_prefab_leaves_session_healthy() {
    // A content bundle with atoms but no compound assets.
    let mut atoms_only = PrefabLibrary::new();
    for kind in AtomKind::ALL {
        atoms_only.insert(PrefabNode::new(kind.asset_name()).atom(kind).input_target());
    }
    let mut sandbox = Sandbox::new().with_prefabs(atoms_only);

    let o = sandbox.place_atom(AtomKind::Oxygen, Vec3::ZERO).unwrap();
    let h = sandbox.place_atom(AtomKind::Hydrogen, Vec3::ONE).unwrap();

    sandbox.handle(Event::CollisionBegan { a: o, b: h });
    settle(&mut sandbox);

    // No spawn, no consumption, no stuck lock, no unlock.
    assert!(compound_roots(sandbox.scene()).is_empty());
    assert!(sandbox.scene().contains(o));
    assert!(sandbox.scene().contains(h));
    assert_eq!(sandbox.scene().opacity(o), Some(1.0));
    assert!(!sandbox.is_resolving());
    assert_eq!(sandbox.collection().unlocked_count(), 0);
}

// ============================================================================
// Palette
// ============================================================================

#[test]
fn test_palette_drag_cycle() {
    let mut sandbox = Sandbox::new();
    let slot = sandbox
        .add_palette_slot(AtomKind::Hydrogen, Vec3::new(0.0, -0.3, 0.0))
        .unwrap();
    let model = sandbox.scene().children(slot)[0];

    // Grabbing the model child duplicates via the tagged container.
    sandbox.handle(Event::DragBegan { target: model });
    assert!(sandbox.scene().atom(slot).unwrap().placed);

    let hydrogens = |sandbox: &Sandbox| {
        sandbox
            .scene()
            .atoms()
            .filter(|(_, tag)| tag.kind == AtomKind::Hydrogen)
            .count()
    };
    assert_eq!(hydrogens(&sandbox), 2);

    // Dragging the now-placed original again must not duplicate.
    sandbox.handle(Event::DragBegan { target: slot });
    assert_eq!(hydrogens(&sandbox), 2);

    // The replacement finishes fading in and is itself a live slot.
    settle(&mut sandbox);
    let replacement = sandbox
        .scene()
        .atoms()
        .find(|(_, tag)| !tag.placed)
        .map(|(id, _)| id)
        .unwrap();
    assert_eq!(sandbox.scene().opacity(replacement), Some(1.0));
    sandbox.handle(Event::DragBegan { target: replacement });
    assert_eq!(hydrogens(&sandbox), 3);
}

// ============================================================================
// Attraction
// ============================================================================

#[test]
fn test_mantle_attraction_closes_the_gap() {
    let mut sandbox = Sandbox::new().with_attraction(MantleAttraction::default());
    sandbox.place_atom(AtomKind::Oxygen, Vec3::ZERO).unwrap();
    let h = sandbox
        .place_atom(AtomKind::Hydrogen, Vec3::new(0.3, 0.0, 0.0))
        .unwrap();

    let start = sandbox.scene().position(h).unwrap().x;
    for _ in 0..10 {
        sandbox.update(1.0 / 90.0);
    }
    let end = sandbox.scene().position(h).unwrap().x;
    assert!(end < start, "hydrogen should drift toward the oxygen");
}
