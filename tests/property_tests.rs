//! Property-based tests for the todo service.
//!
//! Uses proptest to verify invariants across random operation sequences:
//! - Assigned ids are unique and stable across reads
//! - `list` always matches the repository after any mix of mutations
//! - Counters equal the number of operations performed
//! - Repeated reads without mutations hit the store at most once

#![allow(clippy::expect_used, clippy::unwrap_used)]

use proptest::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;
use todo_backend::storage::{InMemoryCounterStore, InMemoryTodoRepository, SqliteTodoRepository};
use todo_backend::{NewTodo, StatName, Todo, TodoId, TodoService};

#[derive(Debug, Clone)]
enum Op {
    Create(String, bool),
    Update(usize, String, bool),
    Delete(usize),
    List,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        ("[a-z ]{1,12}", any::<bool>()).prop_map(|(t, c)| Op::Create(t, c)),
        (0usize..8, "[a-z ]{1,12}", any::<bool>()).prop_map(|(i, t, c)| Op::Update(i, t, c)),
        (0usize..8).prop_map(Op::Delete),
        Just(Op::List),
    ]
}

fn memory_service() -> TodoService {
    let store = Arc::new(InMemoryCounterStore::new());
    TodoService::new(Arc::new(InMemoryTodoRepository::new()), store.clone(), store)
}

proptest! {
    /// Property: ids are unique, increasing, and read back unchanged.
    #[test]
    fn prop_ids_unique_and_stable(titles in prop::collection::vec("[a-zA-Z0-9]{1,20}", 1..30)) {
        let store = Arc::new(InMemoryCounterStore::new());
        let service = TodoService::new(
            Arc::new(SqliteTodoRepository::in_memory().unwrap()),
            store.clone(),
            store,
        );

        let created: Vec<Todo> = titles
            .iter()
            .map(|t| service.create(NewTodo::titled(t.clone())).unwrap())
            .collect();

        let ids: Vec<TodoId> = created.iter().map(|t| t.id.unwrap()).collect();
        prop_assert!(ids.windows(2).all(|w| w[0] < w[1]));

        for todo in &created {
            let fetched = service.get_by_id(todo.id.unwrap()).unwrap();
            prop_assert_eq!(fetched.as_ref(), Some(todo));
        }
        prop_assert_eq!(service.list().unwrap(), created);
    }

    /// Property: after any operation sequence, `list` equals a model map and
    /// the counters equal the operation counts.
    #[test]
    fn prop_list_and_counters_track_operations(ops in prop::collection::vec(op(), 0..40)) {
        let service = memory_service();
        let mut model: BTreeMap<TodoId, Todo> = BTreeMap::new();
        let mut known: Vec<TodoId> = Vec::new();
        let (mut created, mut updated, mut deleted) = (0i64, 0i64, 0i64);

        for op in ops {
            match op {
                Op::Create(title, completed) => {
                    let todo = service
                        .create(NewTodo::titled(title).with_completed(completed))
                        .unwrap();
                    let id = todo.id.unwrap();
                    known.push(id);
                    model.insert(id, todo);
                    created += 1;
                },
                Op::Update(index, title, completed) => {
                    let id = known.get(index).copied().unwrap_or(TodoId::new(10_000));
                    let result = service.update(id, NewTodo::titled(title).with_completed(completed));
                    if let Some(slot) = model.get_mut(&id) {
                        let todo = result.unwrap();
                        *slot = todo;
                        updated += 1;
                    } else {
                        prop_assert!(result.is_err());
                    }
                },
                Op::Delete(index) => {
                    let id = known.get(index).copied().unwrap_or(TodoId::new(10_000));
                    service.delete(id).unwrap();
                    model.remove(&id);
                    deleted += 1;
                },
                Op::List => {
                    let listed = service.list().unwrap();
                    prop_assert_eq!(listed, model.values().cloned().collect::<Vec<_>>());
                },
            }
        }

        prop_assert_eq!(service.list().unwrap(), model.values().cloned().collect::<Vec<_>>());
        prop_assert_eq!(service.get_stat(StatName::TodosCreated).unwrap(), created);
        prop_assert_eq!(service.get_stat(StatName::TodosUpdated).unwrap(), updated);
        prop_assert_eq!(service.get_stat(StatName::TodosDeleted).unwrap(), deleted);
    }

    /// Property: consecutive reads without a mutation hit the store once.
    #[test]
    fn prop_repeated_reads_hit_store_once(reads in 1usize..20, todos in 0usize..5) {
        let service = memory_service();
        for i in 0..todos {
            service.create(NewTodo::titled(format!("todo {i}"))).unwrap();
        }

        for _ in 0..reads {
            prop_assert_eq!(service.list().unwrap().len(), todos);
        }
        prop_assert_eq!(service.get_stat(StatName::DbReads).unwrap(), 1);
    }
}
