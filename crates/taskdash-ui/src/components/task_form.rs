use taskdash_core::form::TaskForm;
use taskdash_core::{
  TaskCreate,
  TaskError,
  TaskPriority
};
use web_sys::{
  HtmlInputElement,
  HtmlSelectElement,
  HtmlTextAreaElement
};
use yew::{
  Callback,
  Html,
  Properties,
  SubmitEvent,
  TargetCast,
  function_component,
  html
};

/// Editable inputs shared by the create form and the inline edit form.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum Field {
  Title,
  Description,
  DueDate,
  Priority
}

pub fn apply_field(
  form: &mut TaskForm,
  field: Field,
  value: &str
) -> Result<(), TaskError> {
  match field {
    | Field::Title => {
      form.set_title(value)
    }
    | Field::Description => {
      form.set_description(value)
    }
    | Field::DueDate => {
      form.set_due_date(value)
    }
    | Field::Priority => {
      form.set_priority_str(value)?
    }
  }
  Ok(())
}

#[derive(Properties, PartialEq)]
pub struct TaskFieldsProps {
  pub draft:    TaskCreate,
  pub on_field:
    Callback<(Field, String)>
}

#[function_component(TaskFields)]
pub fn task_fields(
  props: &TaskFieldsProps
) -> Html {
  let on_title = {
    let on_field = props.on_field.clone();
    Callback::from(
      move |e: yew::InputEvent| {
        let input: HtmlInputElement =
          e.target_unchecked_into();
        on_field.emit((
          Field::Title,
          input.value()
        ));
      }
    )
  };
  let on_description = {
    let on_field = props.on_field.clone();
    Callback::from(
      move |e: yew::InputEvent| {
        let input: HtmlTextAreaElement =
          e.target_unchecked_into();
        on_field.emit((
          Field::Description,
          input.value()
        ));
      }
    )
  };
  let on_due = {
    let on_field = props.on_field.clone();
    Callback::from(move |e: yew::Event| {
      let input: HtmlInputElement =
        e.target_unchecked_into();
      on_field.emit((
        Field::DueDate,
        input.value()
      ));
    })
  };
  let on_priority = {
    let on_field = props.on_field.clone();
    Callback::from(move |e: yew::Event| {
      let select: HtmlSelectElement =
        e.target_unchecked_into();
      on_field.emit((
        Field::Priority,
        select.value()
      ));
    })
  };

  html! {
      <div class="fields">
          <input
              type="text"
              placeholder="Title"
              required=true
              value={props.draft.title.clone()}
              oninput={on_title}
          />
          <textarea
              placeholder="Description"
              value={props.draft.description.clone()}
              oninput={on_description}
          />
          <input type="date" value={props.draft.due_date.clone()} onchange={on_due} />
          <select onchange={on_priority}>
              {
                  for TaskPriority::ALL.iter().map(|priority| html! {
                      <option
                          value={priority.as_str()}
                          selected={*priority == props.draft.priority}
                      >
                          { priority.as_str() }
                      </option>
                  })
              }
          </select>
      </div>
  }
}

#[derive(Properties, PartialEq)]
pub struct TaskFormPanelProps {
  pub draft:      TaskCreate,
  pub submitting: bool,
  pub on_field:
    Callback<(Field, String)>,
  pub on_submit:  Callback<()>
}

#[function_component(TaskFormPanel)]
pub fn task_form_panel(
  props: &TaskFormPanelProps
) -> Html {
  let onsubmit = {
    let on_submit =
      props.on_submit.clone();
    Callback::from(
      move |e: SubmitEvent| {
        e.prevent_default();
        on_submit.emit(());
      }
    )
  };

  html! {
      <form class="panel task-form" onsubmit={onsubmit}>
          <div class="header">{ "New Task" }</div>
          <TaskFields draft={props.draft.clone()} on_field={props.on_field.clone()} />
          <div class="actions">
              <button class="btn ok" type="submit" disabled={props.submitting}>
                  { if props.submitting { "Adding…" } else { "Add Task" } }
              </button>
          </div>
      </form>
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fields_write_through_to_the_draft()
  {
    let mut form = TaskForm::new();
    apply_field(
      &mut form,
      Field::Title,
      "Plan sprint"
    )
    .expect("title");
    apply_field(
      &mut form,
      Field::DueDate,
      "2099-01-01"
    )
    .expect("due");
    apply_field(
      &mut form,
      Field::Priority,
      "High"
    )
    .expect("priority");

    assert_eq!(
      form.draft().title,
      "Plan sprint"
    );
    assert_eq!(
      form.draft().due_date,
      "2099-01-01"
    );
    assert_eq!(
      form.draft().priority,
      TaskPriority::High
    );
  }

  #[test]
  fn unknown_priority_option_leaves_the_draft_alone()
  {
    let mut form = TaskForm::new();
    let err = apply_field(
      &mut form,
      Field::Priority,
      "Urgent"
    )
    .expect_err("unknown");
    assert!(matches!(
      err,
      TaskError::Validation {
        field: "priority",
        ..
      }
    ));
    assert_eq!(
      form.draft().priority,
      TaskPriority::Medium
    );
  }
}
