use taskdash_shared::{TaskCreate, TaskDto, TaskPriority};
use tracing::{error, info};

use crate::error::{Notice, Result, TaskError};
use crate::service::TaskService;
use crate::store::{StoreAction, TaskStore};

/// Draft state of the create form (and of the inline edit form, which
/// reuses it). `submitting` is raised between `begin_submit` and
/// `finish_submit` and rejects a second submission in that window.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskForm {
    draft: TaskCreate,
    submitting: bool,
    notice: Option<Notice>,
}

impl TaskForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_task(task: &TaskDto) -> Self {
        Self {
            draft: TaskCreate::from(task),
            ..Self::default()
        }
    }

    pub fn draft(&self) -> &TaskCreate {
        &self.draft
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.draft.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.draft.description = description.into();
    }

    pub fn set_due_date(&mut self, due_date: impl Into<String>) {
        self.draft.due_date = due_date.into();
    }

    pub fn set_priority(&mut self, priority: TaskPriority) {
        self.draft.priority = priority;
    }

    /// For select inputs that hand back the option's text.
    pub fn set_priority_str(&mut self, raw: &str) -> Result<()> {
        self.draft.priority = raw.parse()?;
        Ok(())
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// Back to `{title:'', description:'', dueDate:'', priority:'Medium'}`.
    pub fn reset(&mut self) {
        self.draft = TaskCreate::default();
    }

    pub fn validate(&self) -> Result<()> {
        if self.draft.title.trim().is_empty() {
            return Err(TaskError::validation("title", "must not be empty"));
        }
        Ok(())
    }

    /// Validates and raises the submitting guard; the returned payload is
    /// what goes to the service.
    pub fn begin_submit(&mut self) -> Result<TaskCreate> {
        if self.submitting {
            return Err(TaskError::Busy);
        }
        self.validate()?;
        self.submitting = true;
        self.notice = None;
        Ok(self.draft.clone())
    }

    /// Lowers the guard without touching the draft.
    pub fn settle(&mut self) {
        self.submitting = false;
    }

    /// Lowers the guard and applies the create outcome: append + reset on
    /// success, an error notice with the draft kept on failure.
    pub fn finish_submit(
        &mut self,
        outcome: Result<TaskDto>,
        store: &mut TaskStore,
    ) -> Result<TaskDto> {
        self.settle();
        match outcome {
            Ok(task) => {
                info!(id = %task.id, "task created");
                store.apply(StoreAction::Append(task.clone()));
                self.reset();
                self.notice = Some(Notice::Info(format!("Created \"{}\"", task.title)));
                Ok(task)
            }
            Err(err) => {
                error!(error = %err, "error creating task");
                self.notice = Some(Notice::failure("create task", &err));
                Err(err)
            }
        }
    }

    pub async fn submit<S: TaskService>(
        &mut self,
        service: &S,
        store: &mut TaskStore,
    ) -> Result<TaskDto> {
        let payload = self.begin_submit()?;
        let outcome = service.create_task(&payload).await;
        self.finish_submit(outcome, store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::MemoryTaskService;

    fn filled() -> TaskForm {
        let mut form = TaskForm::new();
        form.set_title("Write report");
        form.set_description("quarterly");
        form.set_due_date("2099-01-01");
        form.set_priority(TaskPriority::High);
        form
    }

    #[tokio::test]
    async fn successful_submit_appends_and_resets() {
        let service = MemoryTaskService::new();
        let mut store = TaskStore::new();
        let mut form = filled();

        let created = form.submit(&service, &mut store).await.expect("submit");

        assert_eq!(store.len(), 1);
        assert_eq!(store.tasks()[0], created);
        assert_eq!(created.priority, TaskPriority::High);
        assert_eq!(form.draft(), &TaskCreate::default());
        assert!(!form.is_submitting());
        assert!(form.notice().is_some_and(|n| !n.is_error()));
    }

    #[tokio::test]
    async fn failed_submit_keeps_the_draft() {
        let service = MemoryTaskService::new();
        service.set_failing(true);
        let mut store = TaskStore::new();
        let mut form = filled();

        let err = form.submit(&service, &mut store).await.expect_err("service down");

        assert!(err.is_service());
        assert!(store.is_empty());
        assert_eq!(form.draft().title, "Write report");
        assert!(!form.is_submitting());
        assert!(form.notice().is_some_and(Notice::is_error));
    }

    #[test]
    fn blank_title_is_rejected_before_sending() {
        let mut form = TaskForm::new();
        form.set_title("   ");
        let err = form.begin_submit().expect_err("blank title");
        assert!(matches!(err, TaskError::Validation { field: "title", .. }));
        assert!(!form.is_submitting());
    }

    #[test]
    fn second_submit_while_in_flight_is_busy() {
        let mut form = filled();
        form.begin_submit().expect("first submit");
        assert_eq!(form.begin_submit(), Err(TaskError::Busy));
    }

    #[test]
    fn priority_select_values_are_validated() {
        let mut form = TaskForm::new();
        form.set_priority_str("Low").expect("known priority");
        assert_eq!(form.draft().priority, TaskPriority::Low);
        assert!(form.set_priority_str("Critical").is_err());
        assert_eq!(form.draft().priority, TaskPriority::Low);
    }
}
