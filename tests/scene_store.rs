use std::collections::HashSet;

use egui::{pos2, vec2};
use proptest::prelude::*;
use travelstory::element::{ElementDraft, ElementId, ElementKind, ElementPatch, TextStyle};
use travelstory::interaction::{InteractionController, PointerEvent};
use travelstory::scene::{SceneStore, Theme};

const BOUNDS: egui::Vec2 = egui::Vec2::new(800.0, 600.0);

fn add_stickers(store: &SceneStore, count: usize) -> Vec<ElementId> {
    (0..count)
        .map(|i| store.add_element(ElementDraft::sticker(format!("bytes://stickers/{i}.svg"))))
        .collect()
}

#[test]
fn adding_default_text_selects_it_at_z_zero() {
    let store = SceneStore::new();
    let id = store.add_element(ElementDraft::text("Your text here", TextStyle::default()));

    let scene = store.snapshot();
    assert_eq!(scene.len(), 1);
    let element = scene.element(id).expect("element was added");
    assert_eq!(element.kind, ElementKind::Text);
    assert_eq!(element.z_index, 0);
    assert_eq!(scene.selected(), Some(id));
}

#[test]
fn move_to_front_after_three_adds() {
    let store = SceneStore::new();
    let ids = add_stickers(&store, 3);
    let z: Vec<i64> = ids
        .iter()
        .map(|id| store.element(*id).map(|e| e.z_index).unwrap_or(-1))
        .collect();
    assert_eq!(z, vec![0, 1, 2]);

    store.move_element_to_front(ids[0]);
    assert_eq!(store.element(ids[0]).map(|e| e.z_index), Some(3));
}

#[test]
fn move_to_back_goes_below_the_lowest() {
    let store = SceneStore::new();
    let ids = add_stickers(&store, 3);

    store.move_element_to_back(ids[2]);
    assert_eq!(store.element(ids[2]).map(|e| e.z_index), Some(-1));

    store.move_element_to_back(ids[1]);
    assert_eq!(store.element(ids[1]).map(|e| e.z_index), Some(-2));

    let before = store.snapshot();
    store.move_element_to_back(ElementId::new());
    assert_eq!(store.snapshot(), before);
}

#[test]
fn updating_a_missing_element_changes_nothing() {
    let store = SceneStore::new();
    add_stickers(&store, 2);
    let before = store.snapshot();

    store.update_element(
        ElementId::new(),
        ElementPatch {
            x: Some(5.0),
            ..Default::default()
        },
    );

    assert_eq!(store.snapshot(), before);
}

#[test]
fn removing_unselected_element_keeps_selection() {
    let store = SceneStore::new();
    let ids = add_stickers(&store, 2);
    // The last add is selected
    store.remove_element(ids[0]);
    assert_eq!(store.selected(), Some(ids[1]));

    store.remove_element(ids[1]);
    assert_eq!(store.selected(), None);
    assert!(store.is_empty());
}

#[test]
fn clear_canvas_mid_gesture_empties_everything() {
    let store = SceneStore::new();
    let ids = add_stickers(&store, 3);
    let mut controller = InteractionController::new();
    controller.handle(&store, ids[1], PointerEvent::BodyPressed { pointer: pos2(120.0, 120.0) }, BOUNDS);
    controller.handle(&store, ids[1], PointerEvent::Moved { pointer: pos2(300.0, 200.0) }, BOUNDS);
    assert!(controller.is_tracking_pointer());

    store.clear_canvas();
    let scene = store.snapshot();
    assert!(scene.is_empty());
    assert_eq!(scene.selected(), None);

    // The gesture finds its element gone and gives up without recreating it
    controller.sync(&store, &scene);
    assert!(!controller.is_tracking_pointer());
    assert!(store.is_empty());
}

#[test]
fn theme_is_replaced_unconditionally() {
    let store = SceneStore::new();
    assert_eq!(store.theme(), Theme::Default);
    for theme in Theme::ALL {
        store.set_theme(theme);
        assert_eq!(store.theme(), theme);
    }
}

proptest! {
    #[test]
    fn ids_are_pairwise_distinct(count in 1usize..64) {
        let store = SceneStore::new();
        let ids = add_stickers(&store, count);
        let unique: HashSet<_> = ids.iter().collect();
        prop_assert_eq!(unique.len(), count);
    }

    #[test]
    fn resizing_never_goes_below_minimum(
        moves in prop::collection::vec((-500.0f32..500.0, -500.0f32..500.0), 1..20)
    ) {
        let store = SceneStore::new();
        let id = store.add_element(ElementDraft::sticker("s"));
        let mut controller = InteractionController::new();

        let start = pos2(200.0, 200.0);
        controller.handle(&store, id, PointerEvent::ResizePressed { pointer: start }, BOUNDS);
        for (dx, dy) in moves {
            controller.handle(&store, id, PointerEvent::Moved { pointer: start + vec2(dx, dy) }, BOUNDS);
            let element = store.element(id).expect("element is alive");
            prop_assert!(element.width >= 30.0 && element.height >= 30.0);
        }
        controller.handle(&store, id, PointerEvent::Released, BOUNDS);
    }

    #[test]
    fn front_beats_every_other_element(count in 2usize..16, pick in 0usize..16, later in 0usize..8) {
        let store = SceneStore::new();
        let ids = add_stickers(&store, count);
        let target = ids[pick % count];

        store.move_element_to_front(target);
        let scene = store.snapshot();
        let z = scene.element(target).map(|e| e.z_index).unwrap_or_default();
        for element in scene.elements().iter().filter(|e| e.id != target) {
            prop_assert!(z > element.z_index);
        }

        // Later adds take the element count, which may tie or pass the front
        add_stickers(&store, later);
        let scene = store.snapshot();
        let z_after = scene.element(target).map(|e| e.z_index).unwrap_or_default();
        prop_assert_eq!(z_after, z);
    }

    #[test]
    fn removing_selected_clears_selection(count in 1usize..10, pick in 0usize..10) {
        let store = SceneStore::new();
        let ids = add_stickers(&store, count);
        let target = ids[pick % count];
        store.select_element(Some(target));
        store.remove_element(target);
        prop_assert_eq!(store.selected(), None);
        prop_assert_eq!(store.len(), count - 1);
    }
}
