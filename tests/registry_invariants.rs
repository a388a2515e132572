use std::collections::BTreeSet;

use proptest::prelude::*;

use snippet_composer::{
    core::registry::{Registry, RegistryError},
    types::{SnippetId, SnippetKind},
};

#[derive(Debug, Clone)]
enum Action {
    Add { kind: u8 },
    Delete { target: u8 },
    DeleteMissing,
    Move { from: u8, to: u8 },
}

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        3 => (0u8..5).prop_map(|kind| Action::Add { kind }),
        1 => (0u8..32).prop_map(|target| Action::Delete { target }),
        1 => Just(Action::DeleteMissing),
        2 => (0u8..32, 0u8..32).prop_map(|(from, to)| Action::Move { from, to }),
    ]
}

fn meta_count(reg: &Registry) -> usize {
    reg.iter().filter(|r| r.kind() == SnippetKind::Meta).count()
}

proptest! {
    #[test]
    fn random_sequences_preserve_meta_and_position_rules(actions in prop::collection::vec(action_strategy(), 1..200)) {
        let mut reg = Registry::starting_at(1);
        let mut ever_issued = BTreeSet::<SnippetId>::new();

        for action in actions {
            match action {
                Action::Add { kind } => {
                    let kind = SnippetKind::ALL[usize::from(kind)];
                    let before = reg.list();
                    match reg.add(kind) {
                        Ok((id, _)) => {
                            prop_assert!(ever_issued.insert(id), "id {} reused", id);
                            if kind == SnippetKind::Meta {
                                prop_assert_eq!(reg.ordered_ids()[0], id);
                            } else {
                                prop_assert_eq!(*reg.ordered_ids().last().unwrap(), id);
                            }
                            prop_assert_eq!(reg.len(), before.len() + 1);
                        }
                        Err(RegistryError::DuplicateMeta) => {
                            prop_assert_eq!(kind, SnippetKind::Meta);
                            prop_assert_eq!(reg.list(), before);
                        }
                        Err(other) => prop_assert!(false, "unexpected add error: {other:?}"),
                    }
                }
                Action::Delete { target } => {
                    if reg.is_empty() {
                        continue;
                    }
                    let id = reg.ordered_ids()[usize::from(target) % reg.len()];
                    reg.delete(id).unwrap();
                    prop_assert!(reg.get(id).is_none());
                }
                Action::DeleteMissing => {
                    let before = reg.list();
                    let missing = ever_issued.last().copied().unwrap_or(0) + 1_000;
                    prop_assert_eq!(reg.delete(missing), Err(RegistryError::NotFound(missing)));
                    prop_assert_eq!(reg.list(), before);
                }
                Action::Move { from, to } => {
                    if reg.is_empty() {
                        continue;
                    }
                    let from = usize::from(from) % reg.len();
                    let to = usize::from(to) % reg.len();
                    let before: Vec<SnippetId> = reg.ordered_ids().to_vec();
                    let moved = reg.move_item(from, to).unwrap();
                    let after = reg.ordered_ids().to_vec();

                    if from == to {
                        prop_assert!(moved.is_none());
                        prop_assert_eq!(&after, &before);
                    } else {
                        let id = before[from];
                        prop_assert_eq!(after[to], id);
                        let rest_before: Vec<_> = before.iter().filter(|x| **x != id).collect();
                        let rest_after: Vec<_> = after.iter().filter(|x| **x != id).collect();
                        prop_assert_eq!(rest_before, rest_after);
                    }
                }
            }

            prop_assert!(meta_count(&reg) <= 1);
            prop_assert_eq!(reg.has_meta(), meta_count(&reg) == 1);
            for (idx, id) in reg.ordered_ids().iter().enumerate() {
                prop_assert_eq!(reg.position(*id), Some(idx));
            }
        }
    }
}
