//! Property tests for the document store and zone layout.
//!
//! Covers:
//! - The five-element cap
//! - Priority assignment per zone
//! - Removal never renumbering siblings
//! - Layout stability under input reordering
//! - Gradient edits always activating gradient mode
//! - Pointer positions clamping to the canvas

use std::collections::HashMap;

use proptest::prelude::*;
use thumbnail_core::{
    BackgroundKind, BackgroundUpdate, BoundingBox, DocumentStore, ElementId, ElementUpdate,
    GradientKind, GradientUpdate, Layout, StudioError, Zone, MAX_ELEMENTS,
};

fn arb_zone() -> impl Strategy<Value = Zone> {
    prop::sample::select(Zone::ALL.to_vec())
}

fn arb_gradient_update() -> impl Strategy<Value = GradientUpdate> {
    (
        prop::option::of(prop::sample::select(vec![
            GradientKind::Linear,
            GradientKind::Radial,
            GradientKind::Mesh,
        ])),
        prop::option::of(0.0f32..360.0f32),
    )
        .prop_map(|(kind, angle)| GradientUpdate {
            kind,
            angle,
            ..GradientUpdate::default()
        })
}

proptest! {
    #[test]
    fn prop_element_count_never_exceeds_cap(zones in prop::collection::vec(arb_zone(), 0..16)) {
        let mut store = DocumentStore::new();
        for zone in zones {
            let before = store.snapshot();
            match store.add_element(zone) {
                Ok(_) => prop_assert!(before.element_count() < MAX_ELEMENTS),
                Err(StudioError::CapacityExceeded { limit }) => {
                    prop_assert_eq!(limit, MAX_ELEMENTS);
                    prop_assert_eq!(store.state(), &*before);
                }
                Err(other) => prop_assert!(false, "unexpected error: {other}"),
            }
            prop_assert!(store.state().element_count() <= MAX_ELEMENTS);
        }
    }

    #[test]
    fn prop_priorities_increase_per_zone(zones in prop::collection::vec(arb_zone(), 0..5)) {
        let mut store = DocumentStore::new();
        let mut seen: HashMap<Zone, Vec<u32>> = HashMap::new();
        for zone in zones {
            let id = store.add_element(zone).expect("below cap");
            let priority = store.state().element(id).map(|e| e.priority).expect("exists");
            seen.entry(zone).or_default().push(priority);
        }
        for priorities in seen.values() {
            let expected: Vec<u32> = (0..).take(priorities.len()).collect();
            prop_assert_eq!(priorities, &expected);
        }
    }

    #[test]
    fn prop_removal_keeps_sibling_priorities(
        zones in prop::collection::vec(arb_zone(), 1..=5),
        victim in any::<prop::sample::Index>(),
    ) {
        let mut store = DocumentStore::new();
        let ids: Vec<ElementId> = zones
            .iter()
            .map(|&z| store.add_element(z).expect("below cap"))
            .collect();
        let before: HashMap<ElementId, u32> = store
            .state()
            .elements()
            .iter()
            .map(|e| (e.id, e.priority))
            .collect();

        let removed = ids[victim.index(ids.len())];
        store.remove_element(removed);

        prop_assert!(store.state().element(removed).is_none());
        for element in store.state().elements() {
            prop_assert_eq!(Some(&element.priority), before.get(&element.id));
        }
    }

    #[test]
    fn prop_layout_is_stable_under_reordering(
        zones in prop::collection::vec(arb_zone(), 1..=5),
        seed in any::<u64>(),
    ) {
        let mut store = DocumentStore::with_seed(seed);
        let mut ids = Vec::new();
        for (i, zone) in zones.iter().enumerate() {
            let id = store.add_element(*zone).expect("below cap");
            store
                .update_element(id, &ElementUpdate {
                    content: Some(format!("text {i}")),
                    ..ElementUpdate::default()
                })
                .expect("update");
            ids.push(id);
        }
        let layout = Layout::compute(store.state());

        // Re-add the same content in reverse insertion order, keeping each
        // element's zone and priority.
        let mut reversed = DocumentStore::with_seed(seed);
        let mut mapping = HashMap::new();
        for &id in ids.iter().rev() {
            let original = store.state().element(id).expect("exists").clone();
            let copy = reversed.add_element(original.zone).expect("below cap");
            reversed
                .update_element(copy, &ElementUpdate {
                    content: Some(original.content.clone()),
                    zone: None,
                    priority: Some(original.priority),
                })
                .expect("update");
            mapping.insert(copy, id);
        }
        let relaid = Layout::compute(reversed.state());

        for zone in Zone::ALL {
            let a: Vec<_> = layout.zone(zone).items.iter().map(|b| (b.id, b.bounds)).collect();
            let b: Vec<_> = relaid
                .zone(zone)
                .items
                .iter()
                .map(|b| (mapping[&b.id], b.bounds))
                .collect();
            prop_assert_eq!(a, b);
        }
    }

    #[test]
    fn prop_update_gradient_activates_gradient(update in arb_gradient_update()) {
        let mut store = DocumentStore::new();
        store
            .update_background(BackgroundUpdate {
                kind: Some(BackgroundKind::Solid),
                ..BackgroundUpdate::default()
            })
            .expect("solid");
        store.update_gradient(update).expect("gradient");
        prop_assert_eq!(store.state().background().kind, BackgroundKind::Gradient);
    }

    #[test]
    fn prop_pointer_to_percent_clamps(
        left in -5000.0f32..5000.0,
        top in -5000.0f32..5000.0,
        width in 0.0f32..4000.0,
        height in 0.0f32..4000.0,
        x in -20000.0f32..20000.0,
        y in -20000.0f32..20000.0,
    ) {
        let bbox = BoundingBox::new(left, top, width, height);
        let (px, py) = bbox.pointer_to_percent(x, y);
        prop_assert!((0.0..=100.0).contains(&px), "x percent {} out of range", px);
        prop_assert!((0.0..=100.0).contains(&py), "y percent {} out of range", py);
    }
}
