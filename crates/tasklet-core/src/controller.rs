use tracing::{debug, info, warn};

use crate::store::{KeyValueStore, PersistentValue};
use crate::task::{self, Clock, FilterMode, IdGenerator, SystemClock, Task, TaskId, TaskListCodec};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskEvent {
    Added(TaskId),
    Toggled { id: TaskId, completed: bool },
    Deleted(TaskId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskCounts {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

impl TaskCounts {
    pub fn of(tasks: &[Task]) -> Self {
        let active = tasks.iter().filter(|task| task.is_active()).count();
        Self {
            total: tasks.len(),
            active,
            completed: tasks.len() - active,
        }
    }
}

/// Called after a mutation has been applied and persisted, with the event
/// and the resulting list.
pub type Listener = Box<dyn Fn(&TaskEvent, &[Task])>;

/// CRUD and filtered views over the persisted task list.
///
/// Invalid input (blank text, unknown id) is ignored: nothing changes, nothing
/// is written, no listener fires. The same holds for `add` once the id space
/// is exhausted.
pub struct TaskListController<S, K = SystemClock> {
    tasks: PersistentValue<Vec<Task>, S, TaskListCodec>,
    ids: IdGenerator,
    clock: K,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl<S: KeyValueStore> TaskListController<S> {
    pub fn open(store: S, key: &str) -> Self {
        Self::with_clock(store, key, SystemClock)
    }
}

impl<S: KeyValueStore, K: Clock> TaskListController<S, K> {
    #[tracing::instrument(skip(store, clock))]
    pub fn with_clock(store: S, key: &str, clock: K) -> Self {
        let tasks: PersistentValue<Vec<Task>, S, TaskListCodec> =
            PersistentValue::load(store, key, Vec::new());
        let ids = IdGenerator::seeded(tasks.get());

        info!(key, count = tasks.get().len(), "opened task list");
        Self {
            tasks,
            ids,
            clock,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        self.tasks.get()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks().iter().find(|task| task.id == id)
    }

    pub fn persisted_ok(&self) -> bool {
        self.tasks.persisted_ok()
    }

    #[tracing::instrument(skip(self, text))]
    pub fn add(&mut self, text: &str) -> Option<TaskId> {
        if text.trim().is_empty() {
            debug!("ignoring blank task text");
            return None;
        }

        let Some(id) = self.ids.next(self.clock.now_millis()) else {
            warn!("task id space exhausted; ignoring add");
            return None;
        };
        let task = Task::new(id, text.to_string());
        self.tasks.update(|tasks| tasks.push(task));

        debug!(%id, "added task");
        self.notify(TaskEvent::Added(id));
        Some(id)
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    pub fn toggle(&mut self, id: TaskId) -> bool {
        let Some(idx) = self.position(id) else {
            debug!("toggle for unknown task ignored");
            return false;
        };

        let completed = self.tasks.update(|tasks| {
            let task = &mut tasks[idx];
            task.completed = !task.completed;
            task.completed
        });

        debug!(completed, "toggled task");
        self.notify(TaskEvent::Toggled { id, completed });
        true
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    pub fn delete(&mut self, id: TaskId) -> bool {
        let Some(idx) = self.position(id) else {
            debug!("delete for unknown task ignored");
            return false;
        };

        self.tasks.update(|tasks| {
            tasks.remove(idx);
        });

        debug!("deleted task");
        self.notify(TaskEvent::Deleted(id));
        true
    }

    pub fn filtered_view(&self, mode: FilterMode) -> Vec<&Task> {
        task::filtered(self.tasks(), mode)
    }

    pub fn counts(&self) -> TaskCounts {
        TaskCounts::of(self.tasks())
    }

    pub fn subscribe(&mut self, listener: impl Fn(&TaskEvent, &[Task]) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks().iter().position(|task| task.id == id)
    }

    fn notify(&self, event: TaskEvent) {
        let tasks = self.tasks.get();
        for (_, listener) in &self.listeners {
            listener(&event, tasks);
        }
    }
}
