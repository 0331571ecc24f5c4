//! The remote task service seam. The page only ever talks to the service
//! through [`TaskService`]; [`crate::http::HttpTaskService`] is the real
//! backend and [`MemoryTaskService`] stands in for it in tests and demos.

use parking_lot::Mutex;
use taskdash_shared::{TaskCreate, TaskDto};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::error::{Result, TaskError};

/// CRUD over the remote collection. Futures are not required to be `Send`
/// so the same implementations run under `wasm-bindgen-futures` and a
/// current-thread tokio runtime.
#[allow(async_fn_in_trait)]
pub trait TaskService {
    async fn fetch_tasks(&self) -> Result<Vec<TaskDto>>;

    /// The service assigns the id of the returned record.
    async fn create_task(&self, fields: &TaskCreate) -> Result<TaskDto>;

    /// Full-record replace of the editable fields of task `id`.
    async fn update_task(&self, id: &str, fields: &TaskCreate) -> Result<TaskDto>;

    async fn delete_task(&self, id: &str) -> Result<()>;
}

#[derive(Debug, Default)]
struct MemoryState {
    tasks: Vec<TaskDto>,
    failing: bool,
    fetches: usize,
}

/// In-process service holding tasks in memory.
#[derive(Debug, Default)]
pub struct MemoryTaskService {
    state: Mutex<MemoryState>,
}

impl MemoryTaskService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(tasks: Vec<TaskDto>) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                tasks,
                ..MemoryState::default()
            }),
        }
    }

    /// While set, every call fails with a service error and changes nothing.
    pub fn set_failing(&self, failing: bool) {
        self.state.lock().failing = failing;
    }

    pub fn fetch_count(&self) -> usize {
        self.state.lock().fetches
    }

    pub fn snapshot(&self) -> Vec<TaskDto> {
        self.state.lock().tasks.clone()
    }

    fn check_online(state: &MemoryState) -> Result<()> {
        if state.failing {
            Err(TaskError::Service("service unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

impl TaskService for MemoryTaskService {
    #[instrument(skip(self))]
    async fn fetch_tasks(&self) -> Result<Vec<TaskDto>> {
        let mut state = self.state.lock();
        state.fetches += 1;
        Self::check_online(&state)?;
        Ok(state.tasks.clone())
    }

    #[instrument(skip(self, draft), fields(title_len = draft.title.len()))]
    async fn create_task(&self, draft: &TaskCreate) -> Result<TaskDto> {
        let mut state = self.state.lock();
        Self::check_online(&state)?;
        let task = TaskDto {
            id: Uuid::new_v4().simple().to_string(),
            title: draft.title.clone(),
            description: draft.description.clone(),
            due_date: draft.due_date.clone(),
            priority: draft.priority,
            completed: false,
        };
        debug!(id = %task.id, "memory service created task");
        state.tasks.push(task.clone());
        Ok(task)
    }

    #[instrument(skip(self, draft))]
    async fn update_task(&self, id: &str, draft: &TaskCreate) -> Result<TaskDto> {
        let mut state = self.state.lock();
        Self::check_online(&state)?;
        let existing = state
            .tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or_else(|| TaskError::NotFound(id.to_string()))?;
        *existing = existing.with_fields(draft);
        Ok(existing.clone())
    }

    #[instrument(skip(self))]
    async fn delete_task(&self, id: &str) -> Result<()> {
        let mut state = self.state.lock();
        Self::check_online(&state)?;
        let before = state.tasks.len();
        state.tasks.retain(|task| task.id != id);
        if state.tasks.len() == before {
            return Err(TaskError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
