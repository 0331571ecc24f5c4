use chrono::Utc;
use taskdash_core::analytics::DashboardMode;
use yew::{
  Html,
  function_component,
  html,
  use_context
};

use super::AppState;
use crate::components::Dashboard;

/// Stand-alone dashboard; opens on the sample figures.
#[function_component(AnalyticsPage)]
pub fn analytics_page() -> Html {
  let Some(state) =
    use_context::<AppState>()
  else {
    return html! {};
  };
  let live = state
    .list
    .borrow()
    .summary(Utc::now());

  html! {
      <div class="layout">
          <Dashboard live={live} initial_mode={DashboardMode::Sample} />
      </div>
  }
}
