mod analytics;
mod home;

use std::cell::RefCell;
use std::rc::Rc;

use gloo::console::log;
use taskdash_core::Notice;
use taskdash_core::form::TaskForm;
use taskdash_core::list::TaskListView;
use taskdash_core::service::TaskService;
use taskdash_core::store::TaskStore;
use yew::{
  Callback,
  ContextProvider,
  Html,
  Reducible,
  function_component,
  html,
  use_effect_with,
  use_mut_ref,
  use_reducer,
  use_state
};
use yew_router::prelude::{
  BrowserRouter,
  Link,
  Routable,
  Switch
};

use crate::api::TaskApi;

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
  #[at("/")]
  Home,
  #[at("/analytics")]
  Analytics,
  #[not_found]
  #[at("/404")]
  NotFound
}

/// Page-level state handed to every route through context.
///
/// Rendering only reads `list` and `form`. Handlers therefore never hold a
/// borrow of either while the store notifies: they work on a copy and
/// write it back once the store call returns.
#[derive(Clone)]
pub struct AppState {
  pub store:      Rc<RefCell<TaskStore>>,
  pub list:
    Rc<RefCell<TaskListView>>,
  pub form:       Rc<RefCell<TaskForm>>,
  pub api:        TaskApi,
  pub load_error: Option<Notice>,
  pub version:    u64,
  pub refresh:    Callback<()>
}

impl PartialEq for AppState {
  fn eq(
    &self,
    other: &Self
  ) -> bool {
    self.version == other.version
      && self.load_error
        == other.load_error
      && Rc::ptr_eq(
        &self.store,
        &other.store
      )
      && self.api == other.api
  }
}

#[derive(Default)]
struct Version(u64);

impl Reducible for Version {
  type Action = ();

  fn reduce(
    self: Rc<Self>,
    _: ()
  ) -> Rc<Self> {
    Rc::new(Self(self.0 + 1))
  }
}

#[function_component(App)]
pub fn app() -> Html {
  let store =
    use_mut_ref(TaskStore::new);
  let list =
    use_mut_ref(TaskListView::new);
  let form = use_mut_ref(TaskForm::new);
  let api = use_state(TaskApi::from_env);
  let load_error =
    use_state(|| None::<Notice>);
  let version =
    use_reducer(Version::default);

  {
    let store = store.clone();
    let list = list.clone();
    let api = (*api).clone();
    let load_error = load_error.clone();
    let bump = version.dispatcher();
    use_effect_with((), move |_| {
      let sink = list.clone();
      let subscription = store
        .borrow_mut()
        .subscribe(move |tasks| {
          sink.borrow_mut().sync(tasks);
          bump.dispatch(());
        });
      ui_debug(
        "app.mounted",
        "subscribed list to the task \
         store"
      );

      if store.borrow_mut().begin_load() {
        let store = store.clone();
        wasm_bindgen_futures::spawn_local(
          async move {
            let outcome =
              api.fetch_tasks().await;
            let loaded = store
              .borrow_mut()
              .finish_load(outcome);
            if let Err(err) = loaded {
              load_error.set(Some(
                Notice::failure(
                  "fetch tasks",
                  &err
                )
              ));
            }
          }
        );
      }

      move || {
        store
          .borrow_mut()
          .unsubscribe(subscription);
      }
    });
  }

  let refresh = {
    let bump = version.dispatcher();
    Callback::from(move |_: ()| {
      bump.dispatch(())
    })
  };

  let state = AppState {
    store,
    list,
    form,
    api: (*api).clone(),
    load_error: (*load_error).clone(),
    version: version.0,
    refresh
  };

  html! {
      <ContextProvider<AppState> context={state}>
          <BrowserRouter>
              <nav class="topbar">
                  <span class="brand">{ "Task Manager" }</span>
                  <Link<Route> to={Route::Home}>{ "Tasks" }</Link<Route>>
                  <Link<Route> to={Route::Analytics}>{ "Analytics" }</Link<Route>>
              </nav>
              <main>
                  <Switch<Route> render={switch} />
              </main>
          </BrowserRouter>
      </ContextProvider<AppState>>
  }
}

fn switch(route: Route) -> Html {
  match route {
    | Route::Home => {
      html! { <home::HomePage /> }
    }
    | Route::Analytics => {
      html! { <analytics::AnalyticsPage /> }
    }
    | Route::NotFound => {
      html! {
          <div class="panel">
              <div class="header">{ "Not found" }</div>
          </div>
      }
    }
  }
}

/// Shows a notice the way every action reports its outcome: errors block
/// with an alert, everything else goes to the console.
pub fn show_notice(
  notice: Option<Notice>
) {
  match notice {
    | Some(Notice::Error(text)) => {
      gloo::dialogs::alert(&text)
    }
    | Some(Notice::Info(text)) => {
      ui_debug("notice", &text)
    }
    | None => {}
  }
}

pub fn ui_debug(
  event: &str,
  detail: &str
) {
  tracing::debug!(
    event,
    detail,
    "ui-debug"
  );
  log!(format!(
    "[ui-debug] {event}: {detail}"
  ));
}
