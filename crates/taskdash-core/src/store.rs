use std::fmt;

use taskdash_shared::TaskDto;
use tracing::{debug, error, info, instrument, warn};

use crate::error::Result;
use crate::service::TaskService;

pub type Listener = Box<dyn FnMut(&[TaskDto])>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreAction {
    /// Replace the whole collection, e.g. after the initial fetch.
    Replace(Vec<TaskDto>),
    /// Append a newly created task. An id already present is replaced in place.
    Append(TaskDto),
    /// Full-record replace of the task with `id`.
    Update { id: String, task: TaskDto },
    Remove(String),
}

/// The page-level task collection. All mutation goes through [`TaskStore::apply`],
/// which notifies every subscriber with the new snapshot.
pub struct TaskStore {
    tasks: Vec<TaskDto>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
    revision: u64,
    loaded: bool,
}

impl fmt::Debug for TaskStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskStore")
            .field("tasks", &self.tasks.len())
            .field("listeners", &self.listeners.len())
            .field("revision", &self.revision)
            .field("loaded", &self.loaded)
            .finish()
    }
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            listeners: Vec::new(),
            next_subscription: 0,
            revision: 0,
            loaded: false,
        }
    }

    pub fn tasks(&self) -> &[TaskDto] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&TaskDto> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Bumped once per action that changed the collection.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&[TaskDto]) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        debug!(subscription = id.0, listeners = self.listeners.len(), "store subscriber added");
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        before != self.listeners.len()
    }

    /// Applies `action` and returns whether the collection changed.
    /// Subscribers are only notified on change.
    #[instrument(skip_all)]
    pub fn apply(&mut self, action: StoreAction) -> bool {
        let changed = match action {
            StoreAction::Replace(tasks) => {
                self.tasks = dedupe_by_id(tasks);
                true
            }
            StoreAction::Append(task) => {
                if let Some(existing) = self.tasks.iter_mut().find(|t| t.id == task.id) {
                    warn!(id = %task.id, "append with an existing id; replacing in place");
                    *existing = task;
                } else {
                    self.tasks.push(task);
                }
                true
            }
            StoreAction::Update { id, task } => {
                match self.tasks.iter_mut().find(|t| t.id == id) {
                    Some(existing) => {
                        *existing = task;
                        true
                    }
                    None => {
                        warn!(id = %id, "update for a task the store does not hold");
                        false
                    }
                }
            }
            StoreAction::Remove(id) => {
                let before = self.tasks.len();
                self.tasks.retain(|t| t.id != id);
                before != self.tasks.len()
            }
        };

        if changed {
            self.revision += 1;
            self.notify();
        }
        changed
    }

    /// Claims the one-time initial fetch. Returns `false` when a load was
    /// already started for this store.
    pub fn begin_load(&mut self) -> bool {
        if self.loaded {
            debug!("tasks already loaded; skipping fetch");
            return false;
        }
        self.loaded = true;
        true
    }

    pub fn finish_load(&mut self, outcome: Result<Vec<TaskDto>>) -> Result<usize> {
        match outcome {
            Ok(tasks) => {
                let count = tasks.len();
                info!(count, "loaded tasks from service");
                self.apply(StoreAction::Replace(tasks));
                Ok(count)
            }
            Err(err) => {
                error!(error = %err, "failed to fetch tasks");
                Err(err)
            }
        }
    }

    pub async fn load<S: TaskService>(&mut self, service: &S) -> Result<usize> {
        if !self.begin_load() {
            return Ok(self.tasks.len());
        }
        let outcome = service.fetch_tasks().await;
        self.finish_load(outcome)
    }

    fn notify(&mut self) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&self.tasks);
        }
    }
}

fn dedupe_by_id(tasks: Vec<TaskDto>) -> Vec<TaskDto> {
    let mut out: Vec<TaskDto> = Vec::with_capacity(tasks.len());
    for task in tasks {
        if out.iter().any(|t| t.id == task.id) {
            warn!(id = %task.id, "dropping duplicate task id from snapshot");
            continue;
        }
        out.push(task);
    }
    out
}
