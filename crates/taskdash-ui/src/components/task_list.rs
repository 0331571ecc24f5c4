use taskdash_core::datetime::display_due;
use taskdash_core::list::{
  EditState,
  SortKey
};
use taskdash_core::{
  TaskDto,
  TaskPriority
};
use yew::{
  Callback,
  Html,
  Properties,
  classes,
  function_component,
  html
};

use super::task_form::{
  Field,
  TaskFields
};

#[derive(Properties, PartialEq)]
pub struct TaskListProps {
  pub tasks:          Vec<TaskDto>,
  pub sort:           Option<SortKey>,
  pub editing:        Option<EditState>,
  pub on_sort:        Callback<SortKey>,
  pub on_edit:        Callback<TaskDto>,
  pub on_edit_field:
    Callback<(Field, String)>,
  pub on_update:      Callback<()>,
  pub on_cancel_edit: Callback<()>,
  pub on_delete:      Callback<String>,
  pub on_details:     Callback<TaskDto>
}

#[function_component(TaskList)]
pub fn task_list(
  props: &TaskListProps
) -> Html {
  let sort_button =
    |key: SortKey, label: &str| {
      let on_sort = props.on_sort.clone();
      let class =
        if props.sort == Some(key) {
          "btn active"
        } else {
          "btn"
        };
      html! {
          <button class={class} onclick={move |_| on_sort.emit(key)}>{ label }</button>
      }
    };

  html! {
      <div class="panel list">
          <div class="header">
              { "Tasks" }
              <span class="actions">
                  { sort_button(SortKey::DueDate, "Sort by Due Date") }
                  { sort_button(SortKey::Priority, "Sort by Priority") }
              </span>
          </div>
          {
              if props.tasks.is_empty() {
                  html! { <div class="empty">{ "No tasks yet." }</div> }
              } else {
                  html! {
                      <ul>
                          { for props.tasks.iter().map(|task| render_row(props, task)) }
                      </ul>
                  }
              }
          }
      </div>
  }
}

fn render_row(
  props: &TaskListProps,
  task: &TaskDto
) -> Html {
  if let Some(state) = props
    .editing
    .as_ref()
    .filter(|state| state.task_id == task.id)
  {
    let on_update =
      props.on_update.clone();
    let on_cancel =
      props.on_cancel_edit.clone();
    let busy =
      state.form.is_submitting();
    return html! {
        <li key={task.id.clone()} class="row editing">
            <TaskFields draft={state.form.draft().clone()} on_field={props.on_edit_field.clone()} />
            <div class="actions">
                <button class="btn ok" disabled={busy} onclick={move |_| on_update.emit(())}>
                    { "Update Task" }
                </button>
                <button class="btn" onclick={move |_| on_cancel.emit(())}>{ "Cancel" }</button>
            </div>
        </li>
    };
  }

  let on_edit = props.on_edit.clone();
  let on_delete = props.on_delete.clone();
  let on_details =
    props.on_details.clone();
  let for_edit = task.clone();
  let for_details = task.clone();
  let id = task.id.clone();

  let priority_class =
    match task.priority {
      | TaskPriority::High => {
        "badge high"
      }
      | TaskPriority::Medium => {
        "badge medium"
      }
      | TaskPriority::Low => {
        "badge low"
      }
    };

  html! {
      <li key={task.id.clone()} class={classes!("row", task.completed.then_some("done"))}>
          <div>
              <div class="title">{ &task.title }</div>
              <div class="meta">
                  <span class={priority_class}>{ task.priority.as_str() }</span>
                  <span class="badge">{ format!("due: {}", display_due(&task.due_date)) }</span>
              </div>
          </div>
          <div class="actions">
              <button class="btn" onclick={move |_| on_edit.emit(for_edit.clone())}>{ "Edit" }</button>
              <button class="btn danger" onclick={move |_| on_delete.emit(id.clone())}>{ "Delete" }</button>
              <button class="btn" onclick={move |_| on_details.emit(for_details.clone())}>{ "View Details" }</button>
          </div>
      </li>
  }
}
