use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use taskdash_shared::{TaskCreate, TaskDto};
use tracing::{debug, error, info, warn};

use crate::analytics::DashboardSummary;
use crate::datetime::cmp_due;
use crate::error::{Notice, Result, TaskError};
use crate::form::TaskForm;
use crate::service::TaskService;
use crate::store::{StoreAction, TaskStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    DueDate,
    Priority,
}

impl FromStr for SortKey {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "due" | "duedate" | "due_date" => Ok(Self::DueDate),
            "priority" => Ok(Self::Priority),
            other => Err(TaskError::validation(
                "sort",
                format!("`{other}` (expected due or priority)"),
            )),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DueDate => f.write_str("due"),
            Self::Priority => f.write_str("priority"),
        }
    }
}

/// The row currently in edit mode and its form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditState {
    pub task_id: String,
    pub form: TaskForm,
}

/// Local, sortable copy of the store plus the per-row UI state: at most one
/// row in edit mode and at most one row shown in the details panel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskListView {
    tasks: Vec<TaskDto>,
    sort: Option<SortKey>,
    editing: Option<EditState>,
    selected: Option<TaskDto>,
    notice: Option<Notice>,
}

impl TaskListView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tasks(&self) -> &[TaskDto] {
        &self.tasks
    }

    pub fn sort_key(&self) -> Option<SortKey> {
        self.sort
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// Takes a fresh snapshot from the store. The active sort is re-applied
    /// and the edit/details slots drop tasks that no longer exist.
    pub fn sync(&mut self, tasks: &[TaskDto]) {
        self.tasks = tasks.to_vec();
        if let Some(key) = self.sort {
            self.sort_by(key);
        }

        if let Some(selected_id) = self.selected.as_ref().map(|t| t.id.clone()) {
            self.selected = self.tasks.iter().find(|t| t.id == selected_id).cloned();
        }
        if let Some(editing) = self.editing.as_ref()
            && !self.tasks.iter().any(|t| t.id == editing.task_id)
        {
            debug!(id = %editing.task_id, "edited task vanished; leaving edit mode");
            self.editing = None;
        }
    }

    pub fn sort_by(&mut self, key: SortKey) {
        self.sort = Some(key);
        match key {
            SortKey::DueDate => self
                .tasks
                .sort_by(|a, b| cmp_due(&a.due_date, &b.due_date)),
            SortKey::Priority => self.tasks.sort_by_key(|task| task.priority.rank()),
        }
    }

    pub fn sort_by_due_date(&mut self) {
        self.sort_by(SortKey::DueDate);
    }

    pub fn sort_by_priority(&mut self) {
        self.sort_by(SortKey::Priority);
    }

    pub fn view_details(&mut self, task: &TaskDto) {
        self.selected = Some(task.clone());
    }

    pub fn close_details(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&TaskDto> {
        self.selected.as_ref()
    }

    /// Puts `task` in edit mode, replacing any row already being edited.
    pub fn edit(&mut self, task: &TaskDto) {
        if let Some(previous) = self.editing.as_ref()
            && previous.task_id != task.id
        {
            debug!(previous = %previous.task_id, next = %task.id, "switching edited task");
        }
        self.editing = Some(EditState {
            task_id: task.id.clone(),
            form: TaskForm::from_task(task),
        });
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    pub fn editing(&self) -> Option<&EditState> {
        self.editing.as_ref()
    }

    pub fn edit_form_mut(&mut self) -> Option<&mut TaskForm> {
        self.editing.as_mut().map(|state| &mut state.form)
    }

    pub fn begin_delete(&self, id: &str) -> Result<()> {
        if self.tasks.iter().any(|task| task.id == id) {
            Ok(())
        } else {
            Err(TaskError::NotFound(id.to_string()))
        }
    }

    /// On success the task leaves both the local list and the store. On
    /// failure nothing changes and an error notice is raised.
    pub fn finish_delete(
        &mut self,
        id: &str,
        outcome: Result<()>,
        store: &mut TaskStore,
    ) -> Result<()> {
        match outcome {
            Ok(()) => {
                info!(id, "task deleted");
                self.tasks.retain(|task| task.id != id);
                if self.selected.as_ref().is_some_and(|t| t.id == id) {
                    self.selected = None;
                }
                if self.editing.as_ref().is_some_and(|e| e.task_id == id) {
                    self.editing = None;
                }
                store.apply(StoreAction::Remove(id.to_string()));
                self.notice = Some(Notice::Info("Task deleted".to_string()));
                Ok(())
            }
            Err(err) => {
                error!(id, error = %err, "error deleting task");
                self.notice = Some(Notice::failure("delete task", &err));
                Err(err)
            }
        }
    }

    pub async fn delete<S: TaskService>(
        &mut self,
        service: &S,
        store: &mut TaskStore,
        id: &str,
    ) -> Result<()> {
        self.begin_delete(id)?;
        let outcome = service.delete_task(id).await;
        self.finish_delete(id, outcome, store)
    }

    /// Validates the edit form and returns the id to update with its payload.
    pub fn begin_update(&mut self) -> Result<(String, TaskCreate)> {
        let state = self
            .editing
            .as_mut()
            .ok_or_else(|| TaskError::NotFound("no task is being edited".to_string()))?;
        let payload = state.form.begin_submit()?;
        Ok((state.task_id.clone(), payload))
    }

    /// Replaces the edited row by id in the local list and the store, then
    /// leaves edit mode. On failure the form stays open with its input.
    pub fn finish_update(
        &mut self,
        id: &str,
        outcome: Result<TaskDto>,
        store: &mut TaskStore,
    ) -> Result<TaskDto> {
        match outcome {
            Ok(mut task) => {
                if task.id != id {
                    warn!(expected = id, returned = %task.id, "service returned a different id; keeping the edited one");
                    task.id = id.to_string();
                }
                info!(id, "task updated");
                if let Some(row) = self.tasks.iter_mut().find(|t| t.id == id) {
                    *row = task.clone();
                }
                if self.selected.as_ref().is_some_and(|t| t.id == id) {
                    self.selected = Some(task.clone());
                }
                self.editing = None;
                store.apply(StoreAction::Update {
                    id: id.to_string(),
                    task: task.clone(),
                });
                self.notice = Some(Notice::Info(format!("Updated \"{}\"", task.title)));
                Ok(task)
            }
            Err(err) => {
                error!(id, error = %err, "error updating task");
                if let Some(form) = self.edit_form_mut() {
                    form.settle();
                }
                self.notice = Some(Notice::failure("update task", &err));
                Err(err)
            }
        }
    }

    pub async fn update<S: TaskService>(
        &mut self,
        service: &S,
        store: &mut TaskStore,
    ) -> Result<TaskDto> {
        let (id, payload) = self.begin_update()?;
        let outcome = service.update_task(&id, &payload).await;
        self.finish_update(&id, outcome, store)
    }

    /// Derived views over the current local list.
    pub fn summary(&self, now: DateTime<Utc>) -> DashboardSummary {
        DashboardSummary::live(&self.tasks, now)
    }
}
