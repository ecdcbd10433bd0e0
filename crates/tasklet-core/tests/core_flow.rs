use std::cell::Cell;

use tasklet_core::store::{FileStore, KeyValueStore, MemoryStore};
use tasklet_core::task::{FilterMode, Task, TaskId};
use tasklet_core::{TaskListController, Theme, ThemePreference};
use tempfile::tempdir;

fn ticking_clock() -> impl Fn() -> u64 {
    let now = Cell::new(1_000);
    move || {
        now.set(now.get() + 1);
        now.get()
    }
}

#[test]
fn file_slots_roundtrip_between_sessions() {
    let temp = tempdir().expect("tempdir");
    let store = FileStore::open(temp.path()).expect("open slot directory");

    let mut list = TaskListController::with_clock(store.clone(), "tasks", ticking_clock());
    let a = list.add("Task A").expect("add a");
    let b = list.add("Task B").expect("add b");
    let c = list.add("Task C").expect("add c");
    list.toggle(b);
    let before: Vec<Task> = list.tasks().to_vec();

    let reopened_store = FileStore::open(temp.path()).expect("reopen slot directory");
    let reopened = TaskListController::open(reopened_store, "tasks");
    assert_eq!(reopened.tasks(), before.as_slice());
    assert_eq!(
        reopened.tasks().iter().map(|t| t.id).collect::<Vec<_>>(),
        vec![a, b, c]
    );

    let raw = store
        .get_item("tasks")
        .expect("read slot")
        .expect("slot present");
    let decoded: serde_json::Value = serde_json::from_str(&raw).expect("slot is json");
    assert_eq!(decoded[1]["text"], "Task B");
    assert_eq!(decoded[1]["completed"], true);
    assert!(decoded[0]["id"].is_u64());
}

#[test]
fn scenario_add_toggle_filter_delete() {
    let store = MemoryStore::new();
    let mut list = TaskListController::with_clock(store.clone(), "tasks", ticking_clock());

    let id = list.add("Buy milk").expect("add");
    assert_eq!(list.tasks().len(), 1);
    assert_eq!(list.tasks()[0].text, "Buy milk");
    assert!(!list.tasks()[0].completed);

    assert!(list.toggle(id));
    assert!(list.get(id).expect("task").completed);
    assert!(list.filtered_view(FilterMode::Active).is_empty());
    let completed = list.filtered_view(FilterMode::Completed);
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].id, id);

    assert!(list.delete(id));
    assert!(list.tasks().is_empty());
    assert_eq!(store.get_item("tasks").expect("read").as_deref(), Some("[]"));
}

#[test]
fn corrupted_slot_falls_back_to_empty_list() {
    let store = MemoryStore::new();
    {
        let mut list = TaskListController::with_clock(store.clone(), "tasks", ticking_clock());
        list.add("Task A").expect("add");
    }

    store
        .set_item("tasks", r#"[{"id":1,"text":"Task A","compl"#)
        .expect("corrupt slot");
    let list = TaskListController::open(store.clone(), "tasks");
    assert!(list.tasks().is_empty());

    store
        .set_item("tasks", r#"[{"id":1,"text":"Task A"}]"#)
        .expect("write record missing a field");
    let list = TaskListController::open(store, "tasks");
    assert!(list.tasks().is_empty());
}

#[test]
fn slot_with_repeated_ids_falls_back_to_empty_list() {
    let temp = tempdir().expect("tempdir");
    let store = FileStore::open(temp.path()).expect("open slot directory");
    store
        .set_item(
            "tasks",
            r#"[{"id":5,"text":"first","completed":false},{"id":5,"text":"second","completed":false}]"#,
        )
        .expect("seed repeated ids");

    let mut list = TaskListController::with_clock(store.clone(), "tasks", ticking_clock());
    assert!(list.tasks().is_empty());

    let id = list.add("fresh").expect("add");
    assert!(list.toggle(id));

    let reopened = TaskListController::open(store, "tasks");
    let flags: Vec<(TaskId, bool)> = reopened
        .tasks()
        .iter()
        .map(|task| (task.id, task.completed))
        .collect();
    assert_eq!(flags, vec![(id, true)]);
}

#[test]
fn recovered_list_is_rewritten_on_next_mutation() {
    let temp = tempdir().expect("tempdir");
    let store = FileStore::open(temp.path()).expect("open slot directory");
    store.set_item("tasks", "garbage").expect("seed garbage");

    let mut list = TaskListController::with_clock(store.clone(), "tasks", ticking_clock());
    assert!(list.tasks().is_empty());
    let id = list.add("fresh").expect("add");

    let reopened = TaskListController::open(store, "tasks");
    assert_eq!(reopened.tasks().len(), 1);
    assert_eq!(reopened.tasks()[0].id, id);
    assert!(id > TaskId(0));
}

#[test]
fn theme_and_tasks_use_independent_slots() {
    let temp = tempdir().expect("tempdir");
    let store = FileStore::open(temp.path()).expect("open slot directory");

    let mut pref = ThemePreference::load(store.clone(), "theme");
    assert_eq!(pref.toggle(), Theme::Dark);

    let mut list = TaskListController::with_clock(store.clone(), "tasks", ticking_clock());
    list.add("unrelated").expect("add");

    assert_eq!(
        std::fs::read_to_string(temp.path().join("theme.data")).expect("theme file"),
        "dark"
    );
    assert_eq!(ThemePreference::load(store, "theme").theme(), Theme::Dark);
}

#[test]
fn file_store_rejects_path_like_keys() {
    let temp = tempdir().expect("tempdir");
    let store = FileStore::open(temp.path()).expect("open slot directory");

    assert!(store.set_item("../escape", "x").is_err());
    assert!(store.get_item("").is_err());
    assert_eq!(store.get_item("absent").expect("read"), None);
    store.remove_item("absent").expect("removing a missing slot is fine");
}
