use taskdash_core::TaskDto;
use taskdash_core::datetime::display_due;
use yew::{
  Callback,
  Html,
  Properties,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct TaskDetailsProps {
  pub task:     Option<TaskDto>,
  pub on_close: Callback<()>
}

#[function_component(TaskDetails)]
pub fn task_details(
  props: &TaskDetailsProps
) -> Html {
  let Some(task) = &props.task else {
    return html! {};
  };
  let on_close = props.on_close.clone();
  let description =
    if task.description.is_empty() {
      "—"
    } else {
      task.description.as_str()
    };
  let status = if task.completed {
    "Completed"
  } else {
    "Pending"
  };

  html! {
      <div class="panel details">
          <div class="header">{ "Task Details" }</div>
          <div style="font-size:1.15rem;font-weight:700;">{ &task.title }</div>
          <div class="kv">
              <strong>{ "description" }</strong>
              <div>{ description }</div>
          </div>
          <div class="kv">
              <strong>{ "due" }</strong>
              <div>{ display_due(&task.due_date) }</div>
          </div>
          <div class="kv">
              <strong>{ "priority" }</strong>
              <div>{ task.priority.as_str() }</div>
          </div>
          <div class="kv">
              <strong>{ "status" }</strong>
              <div>{ status }</div>
          </div>
          <div class="actions">
              <button class="btn" onclick={move |_| on_close.emit(())}>{ "Close" }</button>
          </div>
      </div>
  }
}
