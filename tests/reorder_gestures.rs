use proptest::prelude::*;

use snippet_composer::{
    core::{
        registry::Registry,
        reorder::{apply_move, DragIndicator, DragState, Reorder, ReorderEngine, ReorderError},
    },
    types::SnippetKind,
};

fn registry_with(n: usize) -> Registry {
    let mut reg = Registry::starting_at(1);
    for _ in 0..n {
        reg.add(SnippetKind::Paragraph).unwrap();
    }
    reg
}

fn drag(reg: &mut Registry, engine: &mut ReorderEngine, from: usize, to: usize) -> bool {
    engine.begin_drag(from);
    match engine.drop(to).unwrap() {
        Some(Reorder { from, to }) => reg.move_item(from, to).unwrap().is_some(),
        None => false,
    }
}

#[test]
fn drop_on_source_is_noop() {
    let mut reg = registry_with(4);
    let mut engine = ReorderEngine::new();
    let before = reg.list();

    engine.begin_drag(2);
    engine.hover(0).unwrap();
    assert_eq!(engine.drop(2), Ok(None));
    assert_eq!(engine.state(), DragState::Idle);
    assert_eq!(reg.list(), before);
}

#[test]
fn forward_drag_lands_in_post_removal_slot() {
    let mut reg = registry_with(4);
    let mut engine = ReorderEngine::new();
    let ids = reg.ordered_ids().to_vec();

    assert!(drag(&mut reg, &mut engine, 0, 2));
    assert_eq!(reg.ordered_ids(), &[ids[1], ids[2], ids[0], ids[3]]);
}

#[test]
fn backward_drag_to_front() {
    let mut reg = registry_with(3);
    let mut engine = ReorderEngine::new();
    let ids = reg.ordered_ids().to_vec();

    assert!(drag(&mut reg, &mut engine, 2, 0));
    assert_eq!(reg.ordered_ids(), &[ids[2], ids[0], ids[1]]);
}

#[test]
fn hover_never_mutates_order() {
    let mut reg = registry_with(3);
    let mut engine = ReorderEngine::new();
    let before = reg.list();

    engine.begin_drag(0);
    for target in [1, 2, 0, 2] {
        engine.hover(target).unwrap();
    }
    assert_eq!(
        engine.indicator(),
        DragIndicator {
            dragged: Some(0),
            pending_drop: Some(2),
        }
    );
    engine.cancel().unwrap();
    assert_eq!(engine.indicator(), DragIndicator::default());
    assert_eq!(reg.list(), before);
}

#[test]
fn events_outside_a_gesture_are_rejected() {
    let mut engine = ReorderEngine::new();
    assert_eq!(engine.drop(1), Err(ReorderError::NotDragging));
    assert_eq!(engine.hover(1), Err(ReorderError::NotDragging));
    assert_eq!(engine.cancel(), Err(ReorderError::NotDragging));
    assert_eq!(engine.state(), DragState::Idle);
}

#[test]
fn overlapping_begin_cancels_previous_gesture() {
    let mut reg = registry_with(4);
    let mut engine = ReorderEngine::new();
    let ids = reg.ordered_ids().to_vec();

    engine.begin_drag(0);
    engine.hover(3).unwrap();
    engine.begin_drag(1);
    assert_eq!(
        engine.state(),
        DragState::Dragging {
            source: 1,
            pending: None,
        }
    );

    let reorder = engine.drop(3).unwrap().unwrap();
    assert_eq!(reorder, Reorder { from: 1, to: 3 });
    reg.move_item(reorder.from, reorder.to).unwrap();
    assert_eq!(reg.ordered_ids(), &[ids[0], ids[2], ids[3], ids[1]]);
}

proptest! {
    #[test]
    fn moved_element_lands_at_target_and_rest_keep_order(len in 1usize..24, a in 0usize..24, b in 0usize..24) {
        let from = a % len;
        let to = b % len;
        let original: Vec<usize> = (0..len).collect();
        let mut items = original.clone();
        apply_move(&mut items, from, to);

        prop_assert_eq!(items.len(), len);
        prop_assert_eq!(items[to], original[from]);
        let rest_before: Vec<_> = original.iter().filter(|x| **x != original[from]).collect();
        let rest_after: Vec<_> = items.iter().filter(|x| **x != original[from]).collect();
        prop_assert_eq!(rest_before, rest_after);
    }
}
