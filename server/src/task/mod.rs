use chrono::{DateTime, Utc};
use std::sync::RwLock;

pub mod api;

#[derive(Debug, PartialEq, Clone, Eq)]
pub struct Task {
    id: u64,
    title: String,
    description: String,
    due_date: DateTime<Utc>,
    is_completed: bool,
}

impl Task {
    pub fn new(
        id: u64,
        title: String,
        description: String,
        due_date: DateTime<Utc>,
        is_completed: bool,
    ) -> Self {
        Self {
            id,
            title,
            description,
            due_date,
            is_completed,
        }
    }

    /// Returns the ID of the task.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Returns the title of the task.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description of the task.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the due date of the task.
    pub fn due_date(&self) -> DateTime<Utc> {
        self.due_date
    }

    /// Returns whether the task has been completed.
    pub fn is_completed(&self) -> bool {
        self.is_completed
    }

    /// Returns this task with its ID replaced by `id`, leaving every other
    /// field as-is.
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }
}

/// Contract for the component owning the task collection.
///
/// Implementations serialize mutations against each other and against
/// concurrent reads, so every operation is a single atomic step from the
/// caller's perspective. Absence is reported as `None`, never as an error.
#[cfg_attr(test, mockall::automock)]
pub trait TaskRepository: Send + Sync {
    /// Returns a snapshot of all current tasks in insertion order, oldest
    /// first.
    fn list_tasks(&self) -> Vec<Task>;

    /// Retrieves a task by its ID.
    ///
    /// # Arguments
    ///
    /// * `id` - The ID of the task to retrieve.
    ///
    /// # Returns
    ///
    /// The matching `Task`, or `None` if no task has that ID.
    fn get_task(&self, id: u64) -> Option<Task>;

    /// Creates a new task.
    ///
    /// The candidate's own `id` is ignored; the repository stamps the next
    /// unused identifier onto the stored record. Identifiers are never
    /// reused, even after deletions.
    ///
    /// # Arguments
    ///
    /// * `candidate` - The task to store; every field except `id` is kept
    ///   as given.
    ///
    /// # Returns
    ///
    /// The stored record, carrying the allocated ID.
    fn create_task(&self, candidate: Task) -> Task;

    /// Replaces the task with the given ID.
    ///
    /// The replacement's own `id` is overridden by `id`, and the record
    /// keeps its position in the listing order.
    ///
    /// # Arguments
    ///
    /// * `id` - The ID of the task to replace.
    /// * `replacement` - The full record to store in its place.
    ///
    /// # Returns
    ///
    /// The new stored record, or `None` if no task has that ID.
    fn update_task(&self, id: u64, replacement: Task) -> Option<Task>;

    /// Removes the task with the given ID.
    ///
    /// # Arguments
    ///
    /// * `id` - The ID of the task to remove.
    ///
    /// # Returns
    ///
    /// The removed record's last known value, or `None` if no task has
    /// that ID.
    fn delete_task(&self, id: u64) -> Option<Task>;
}

#[derive(Debug)]
struct TaskStore {
    tasks: Vec<Task>,
    next_id: u64,
}

/// In-memory `TaskRepository`.
///
/// The collection and the ID counter live behind a single lock, so ID
/// allocation and every mutation are serialized while reads may run
/// concurrently with each other.
#[derive(Debug)]
pub struct InMemoryTaskRepository {
    store: RwLock<TaskStore>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(TaskStore {
                tasks: Vec::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for InMemoryTaskRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskRepository for InMemoryTaskRepository {
    fn list_tasks(&self) -> Vec<Task> {
        self.store
            .read()
            .expect("task store lock poisoned")
            .tasks
            .clone()
    }

    fn get_task(&self, id: u64) -> Option<Task> {
        self.store
            .read()
            .expect("task store lock poisoned")
            .tasks
            .iter()
            .find(|task| task.id == id)
            .cloned()
    }

    fn create_task(&self, candidate: Task) -> Task {
        let mut store = self.store.write().expect("task store lock poisoned");
        let task = candidate.with_id(store.next_id);
        store.next_id += 1;
        store.tasks.push(task.clone());
        task
    }

    fn update_task(&self, id: u64, replacement: Task) -> Option<Task> {
        let mut store = self.store.write().expect("task store lock poisoned");
        let slot = store.tasks.iter_mut().find(|task| task.id == id)?;
        *slot = replacement.with_id(id);
        Some(slot.clone())
    }

    fn delete_task(&self, id: u64) -> Option<Task> {
        let mut store = self.store.write().expect("task store lock poisoned");
        let index = store.tasks.iter().position(|task| task.id == id)?;
        Some(store.tasks.remove(index))
    }
}
