use std::io::Write;

use chrono::{DateTime, Utc};
use taskdash_core::analytics::DashboardSummary;
use taskdash_core::form::TaskForm;
use taskdash_core::list::{SortKey, TaskListView};
use taskdash_core::service::TaskService;
use taskdash_core::store::TaskStore;
use taskdash_core::{Notice, TaskError};
use tracing::{debug, info};

use crate::cli::{Command, EditTask, NewTask};
use crate::render::Renderer;

/// Turns a core outcome into the CLI's result. Info notices are printed;
/// a failure carries the user-facing notice text on top of the cause.
fn settle<T, W: Write>(
    renderer: &mut Renderer<W>,
    notice: Option<Notice>,
    outcome: Result<T, TaskError>,
) -> anyhow::Result<T> {
    match outcome {
        Ok(value) => {
            renderer.print_notice(notice)?;
            Ok(value)
        }
        Err(err) => match notice {
            Some(Notice::Error(text)) => Err(anyhow::Error::new(err).context(text)),
            _ => Err(err.into()),
        },
    }
}

async fn load<S: TaskService, W: Write>(
    service: &S,
    store: &mut TaskStore,
    renderer: &mut Renderer<W>,
) -> anyhow::Result<()> {
    let outcome = store.load(service).await;
    let notice = outcome
        .as_ref()
        .err()
        .map(|err| Notice::failure("fetch tasks", err));
    let count = settle(renderer, notice, outcome)?;
    debug!(count, "tasks loaded");
    Ok(())
}

#[tracing::instrument(skip(service, renderer, default_sort, now))]
pub async fn dispatch<S: TaskService, W: Write>(
    command: Command,
    service: &S,
    renderer: &mut Renderer<W>,
    default_sort: Option<SortKey>,
    now: DateTime<Utc>,
) -> anyhow::Result<()> {
    let mut store = TaskStore::new();

    match command {
        Command::List { sort } => {
            load(service, &mut store, renderer).await?;
            let sort = sort.or(default_sort);

            let mut view = TaskListView::new();
            view.sync(store.tasks());
            if let Some(key) = sort {
                view.sort_by(key);
            }
            renderer.print_task_table(view.tasks(), now)
        }
        Command::Add(NewTask {
            title,
            description,
            due,
            priority,
        }) => {
            let mut form = TaskForm::new();
            form.set_title(title);
            form.set_description(description);
            form.set_due_date(due);
            form.set_priority(priority);

            let outcome = form.submit(service, &mut store).await;
            let task = settle(renderer, form.take_notice(), outcome)?;
            renderer.print_task_info(&task)
        }
        Command::Edit { id, fields } => {
            load(service, &mut store, renderer).await?;
            let task = store
                .get(&id)
                .cloned()
                .ok_or_else(|| TaskError::NotFound(id.clone()))?;

            let mut view = TaskListView::new();
            view.sync(store.tasks());
            view.edit(&task);
            if let Some(form) = view.edit_form_mut() {
                apply_edits(form, fields);
            }

            let outcome = view.update(service, &mut store).await;
            let task = settle(renderer, view.take_notice(), outcome)?;
            renderer.print_task_info(&task)
        }
        Command::Delete { id } => {
            load(service, &mut store, renderer).await?;
            let mut view = TaskListView::new();
            view.sync(store.tasks());

            let outcome = view.delete(service, &mut store, &id).await;
            settle(renderer, view.take_notice(), outcome)?;
            info!(remaining = store.len(), "delete finished");
            Ok(())
        }
        Command::Stats { sample } => {
            let summary = if sample {
                DashboardSummary::sample()
            } else {
                load(service, &mut store, renderer).await?;
                DashboardSummary::live(store.tasks(), now)
            };
            renderer.print_summary(&summary)
        }
        Command::Upcoming => {
            load(service, &mut store, renderer).await?;
            let mut view = TaskListView::new();
            view.sync(store.tasks());
            view.sort_by_due_date();
            let summary = view.summary(now);
            renderer.print_task_table(&summary.upcoming, now)
        }
    }
}

fn apply_edits(form: &mut TaskForm, fields: EditTask) {
    if let Some(title) = fields.title {
        form.set_title(title);
    }
    if let Some(description) = fields.description {
        form.set_description(description);
    }
    if let Some(due) = fields.due {
        form.set_due_date(due);
    }
    if let Some(priority) = fields.priority {
        form.set_priority(priority);
    }
}
