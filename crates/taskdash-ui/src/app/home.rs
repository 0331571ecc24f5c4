use chrono::Utc;
use taskdash_core::analytics::DashboardMode;
use taskdash_core::list::SortKey;
use taskdash_core::service::TaskService;
use taskdash_core::{
  Notice,
  TaskDto,
  TaskError
};
use yew::{
  Callback,
  Html,
  function_component,
  html,
  use_context
};

use super::{
  AppState,
  show_notice,
  ui_debug
};
use crate::components::{
  Dashboard,
  Field,
  TaskDetails,
  TaskFormPanel,
  TaskList,
  apply_field
};

#[function_component(HomePage)]
pub fn home_page() -> Html {
  let Some(state) =
    use_context::<AppState>()
  else {
    return html! {
        <div class="banner error">{ "Application state is unavailable." }</div>
    };
  };

  let on_form_field = {
    let state = state.clone();
    Callback::from(
      move |(field, value): (
        Field,
        String
      )| {
        let applied = apply_field(
          &mut state.form.borrow_mut(),
          field,
          &value
        );
        if let Err(err) = applied {
          show_notice(Some(
            Notice::failure(
              "update the form",
              &err
            )
          ));
        }
        state.refresh.emit(());
      }
    )
  };

  let on_submit = {
    let state = state.clone();
    Callback::from(move |_: ()| {
      let begun = state
        .form
        .borrow_mut()
        .begin_submit();
      let payload = match begun {
        | Ok(payload) => payload,
        | Err(TaskError::Busy) => {
          ui_debug(
            "form.busy",
            "submit ignored while a \
             create is in flight"
          );
          return;
        }
        | Err(err) => {
          show_notice(Some(
            Notice::failure(
              "create task",
              &err
            )
          ));
          return;
        }
      };
      state.refresh.emit(());

      let state = state.clone();
      wasm_bindgen_futures::spawn_local(
        async move {
          let outcome = state
            .api
            .create_task(&payload)
            .await;
          let mut form =
            state.form.borrow().clone();
          let _ = form.finish_submit(
            outcome,
            &mut state.store.borrow_mut()
          );
          show_notice(form.take_notice());
          *state.form.borrow_mut() = form;
          state.refresh.emit(());
        }
      );
    })
  };

  let on_sort = {
    let state = state.clone();
    Callback::from(move |key: SortKey| {
      state
        .list
        .borrow_mut()
        .sort_by(key);
      state.refresh.emit(());
    })
  };

  let on_edit = {
    let state = state.clone();
    Callback::from(move |task: TaskDto| {
      state
        .list
        .borrow_mut()
        .edit(&task);
      state.refresh.emit(());
    })
  };

  let on_edit_field = {
    let state = state.clone();
    Callback::from(
      move |(field, value): (
        Field,
        String
      )| {
        let mut list =
          state.list.borrow_mut();
        let applied =
          match list.edit_form_mut() {
            | Some(form) => {
              apply_field(
                form, field, &value
              )
            }
            | None => Ok(())
          };
        drop(list);
        if let Err(err) = applied {
          show_notice(Some(
            Notice::failure(
              "update the form",
              &err
            )
          ));
        }
        state.refresh.emit(());
      }
    )
  };

  let on_cancel_edit = {
    let state = state.clone();
    Callback::from(move |_: ()| {
      state
        .list
        .borrow_mut()
        .cancel_edit();
      state.refresh.emit(());
    })
  };

  let on_update = {
    let state = state.clone();
    Callback::from(move |_: ()| {
      let begun = state
        .list
        .borrow_mut()
        .begin_update();
      let (id, payload) = match begun {
        | Ok(request) => request,
        | Err(TaskError::Busy) => return,
        | Err(err) => {
          show_notice(Some(
            Notice::failure(
              "update task",
              &err
            )
          ));
          return;
        }
      };
      state.refresh.emit(());

      let state = state.clone();
      wasm_bindgen_futures::spawn_local(
        async move {
          let outcome = state
            .api
            .update_task(&id, &payload)
            .await;
          let mut view =
            state.list.borrow().clone();
          let _ = view.finish_update(
            &id,
            outcome,
            &mut state.store.borrow_mut()
          );
          show_notice(view.take_notice());
          *state.list.borrow_mut() = view;
          state.refresh.emit(());
        }
      );
    })
  };

  let on_delete = {
    let state = state.clone();
    Callback::from(move |id: String| {
      let begun = state
        .list
        .borrow()
        .begin_delete(&id);
      if let Err(err) = begun {
        show_notice(Some(
          Notice::failure(
            "delete task",
            &err
          )
        ));
        return;
      }

      let state = state.clone();
      wasm_bindgen_futures::spawn_local(
        async move {
          let outcome = state
            .api
            .delete_task(&id)
            .await;
          let mut view =
            state.list.borrow().clone();
          let _ = view.finish_delete(
            &id,
            outcome,
            &mut state.store.borrow_mut()
          );
          show_notice(view.take_notice());
          *state.list.borrow_mut() = view;
          state.refresh.emit(());
        }
      );
    })
  };

  let on_details = {
    let state = state.clone();
    Callback::from(move |task: TaskDto| {
      state
        .list
        .borrow_mut()
        .view_details(&task);
      state.refresh.emit(());
    })
  };

  let on_close_details = {
    let state = state.clone();
    Callback::from(move |_: ()| {
      state
        .list
        .borrow_mut()
        .close_details();
      state.refresh.emit(());
    })
  };

  let form = state.form.borrow().clone();
  let list = state.list.borrow().clone();

  html! {
      <div class="layout">
          {
              match &state.load_error {
                  Some(notice) => html! { <div class="banner error">{ notice.text() }</div> },
                  None => html! {},
              }
          }
          <TaskFormPanel
              draft={form.draft().clone()}
              submitting={form.is_submitting()}
              on_field={on_form_field}
              on_submit={on_submit}
          />
          <TaskList
              tasks={list.tasks().to_vec()}
              sort={list.sort_key()}
              editing={list.editing().cloned()}
              on_sort={on_sort}
              on_edit={on_edit}
              on_edit_field={on_edit_field}
              on_update={on_update}
              on_cancel_edit={on_cancel_edit}
              on_delete={on_delete}
              on_details={on_details}
          />
          <TaskDetails task={list.selected().cloned()} on_close={on_close_details} />
          <Dashboard
              live={list.summary(Utc::now())}
              initial_mode={DashboardMode::Live}
          />
      </div>
  }
}
