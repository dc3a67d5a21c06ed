use chrono::{Duration, Utc};
use std::sync::Arc;
use taskhub_server::task::{InMemoryTaskRepository, Task, TaskRepository};

fn candidate(title: &str) -> Task {
    Task::new(
        0,
        title.to_string(),
        format!("{} description", title),
        Utc::now() + Duration::days(1),
        false,
    )
}

#[test]
fn can_assign_distinct_increasing_ids() {
    let repository = InMemoryTaskRepository::new();

    let ids: Vec<u64> = (0..5)
        .map(|_| repository.create_task(candidate("task")).id())
        .collect();

    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
}

#[test]
fn can_ignore_candidate_id_on_create() {
    let repository = InMemoryTaskRepository::new();

    let created = repository.create_task(candidate("task").with_id(999));

    assert_eq!(created.id(), 1);
    assert_eq!(repository.get_task(999), None);
}

#[test]
fn can_get_created_task_by_id() {
    let repository = InMemoryTaskRepository::new();

    let created = repository.create_task(candidate("task"));

    assert_eq!(repository.get_task(created.id()), Some(created));
    assert_eq!(repository.get_task(42), None);
}

#[test]
fn can_keep_list_unchanged_when_updating_missing_task() {
    let repository = InMemoryTaskRepository::new();
    repository.create_task(candidate("task"));
    let before = repository.list_tasks();

    assert_eq!(repository.update_task(42, candidate("other")), None);
    assert_eq!(repository.list_tasks(), before);
}

#[test]
fn can_force_path_id_onto_updated_task() {
    let repository = InMemoryTaskRepository::new();
    repository.create_task(candidate("first"));
    let second = repository.create_task(candidate("second"));

    let replacement = Task::new(
        999,
        "Buy oat milk".to_string(),
        "oat, not dairy".to_string(),
        Utc::now() + Duration::days(2),
        false,
    );
    let updated = repository
        .update_task(second.id(), replacement.clone())
        .expect("task should exist");

    assert_eq!(updated.id(), second.id());
    assert_eq!(updated, replacement.with_id(second.id()));
    assert_eq!(repository.get_task(999), None);
}

#[test]
fn can_keep_position_in_list_after_update() {
    let repository = InMemoryTaskRepository::new();
    let first = repository.create_task(candidate("first"));
    repository.create_task(candidate("second"));

    repository
        .update_task(first.id(), candidate("first, revised"))
        .expect("task should exist");

    let tasks = repository.list_tasks();
    let titles: Vec<&str> = tasks.iter().map(|task| task.title()).collect();
    assert_eq!(titles, vec!["first, revised", "second"]);
}

#[test]
fn can_delete_task_exactly_once() {
    let repository = InMemoryTaskRepository::new();
    let created = repository.create_task(candidate("task"));

    assert_eq!(repository.delete_task(created.id()), Some(created.clone()));
    assert_eq!(repository.delete_task(created.id()), None);
    assert!(repository.list_tasks().is_empty());
}

#[test]
fn can_never_reuse_deleted_ids() {
    let repository = InMemoryTaskRepository::new();
    let first = repository.create_task(candidate("first"));

    repository
        .delete_task(first.id())
        .expect("task should exist");
    let second = repository.create_task(candidate("second"));

    assert_eq!(second.id(), 2);
    assert_eq!(repository.get_task(first.id()), None);
}

#[test]
fn can_track_list_length_across_creates_and_deletes() {
    let repository = InMemoryTaskRepository::new();

    for n in 0..6 {
        repository.create_task(candidate(&format!("task {}", n)));
    }
    repository.delete_task(2).expect("task should exist");
    repository.delete_task(5).expect("task should exist");

    assert_eq!(repository.list_tasks().len(), 4);
}

#[test]
fn can_list_tasks_in_insertion_order() {
    let repository = InMemoryTaskRepository::new();

    let milk = repository.create_task(Task::new(
        0,
        "Buy milk".to_string(),
        "2 liters".to_string(),
        Utc::now() + Duration::days(1),
        false,
    ));
    assert_eq!(milk.id(), 1);

    let bread = repository.create_task(candidate("Buy bread"));
    assert_eq!(bread.id(), 2);

    assert_eq!(
        repository.list_tasks(),
        vec![milk.clone(), bread.clone()]
    );

    assert_eq!(repository.delete_task(1), Some(milk));
    assert_eq!(repository.list_tasks(), vec![bread]);
    assert_eq!(repository.get_task(1), None);
}

#[test]
fn can_take_independent_snapshots_from_list() {
    let repository = InMemoryTaskRepository::new();
    repository.create_task(candidate("task"));

    let snapshot = repository.list_tasks();
    repository.create_task(candidate("other"));

    assert_eq!(snapshot.len(), 1);
    assert_eq!(repository.list_tasks().len(), 2);
}

#[test]
fn can_assign_unique_ids_under_concurrent_creates() {
    let repository = Arc::new(InMemoryTaskRepository::new());

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let repository = Arc::clone(&repository);
            std::thread::spawn(move || {
                (0..50)
                    .map(|n| {
                        repository
                            .create_task(candidate(&format!("worker {} task {}", worker, n)))
                            .id()
                    })
                    .collect::<Vec<u64>>()
            })
        })
        .collect();

    let mut ids: Vec<u64> = handles
        .into_iter()
        .flat_map(|handle| handle.join().unwrap())
        .collect();
    ids.sort_unstable();
    ids.dedup();

    assert_eq!(ids.len(), 400);
    assert_eq!(repository.list_tasks().len(), 400);
}
