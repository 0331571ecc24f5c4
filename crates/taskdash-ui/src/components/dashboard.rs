use taskdash_core::analytics::{
  DashboardMode,
  DashboardSummary
};
use taskdash_core::datetime::display_due;
use yew::{
  Html,
  Properties,
  function_component,
  html,
  use_state
};

use super::charts::{
  BarChart,
  LineChart,
  PieChart
};

#[derive(Properties, PartialEq)]
pub struct DashboardProps {
  /// Summary of the current task list.
  pub live:         DashboardSummary,
  pub initial_mode: DashboardMode
}

#[function_component(Dashboard)]
pub fn dashboard(
  props: &DashboardProps
) -> Html {
  let mode =
    use_state(|| props.initial_mode);

  let summary = match *mode {
    | DashboardMode::Sample => {
      DashboardSummary::sample()
    }
    | DashboardMode::Live => {
      props.live.clone()
    }
  };
  let chart =
    summary.distribution_chart();
  let completed = summary
    .completion_rate
    .map(|rate| {
      format!("{:.0}%", rate * 100.0)
    })
    .unwrap_or_else(|| "—".to_string());

  let mode_button =
    |target: DashboardMode,
     label: &str| {
      let mode = mode.clone();
      let class = if *mode == target {
        "btn active"
      } else {
        "btn"
      };
      html! {
          <button class={class} onclick={move |_| mode.set(target)}>{ label }</button>
      }
    };

  html! {
      <div class="panel dashboard">
          <div class="header">
              { "Dashboard" }
              <span class="actions">
                  { mode_button(DashboardMode::Sample, "Sample Data") }
                  { mode_button(DashboardMode::Live, "Live Data") }
              </span>
          </div>
          <div class="charts">
              <PieChart data={chart.clone()} />
              <BarChart data={chart} />
              <LineChart points={summary.completion.clone()} />
          </div>
          {
              if summary.mode == DashboardMode::Live {
                  html! {
                      <div class="stats">
                          <div class="kv">
                              <strong>{ "completed" }</strong>
                              <div>{ completed }</div>
                          </div>
                          <div class="header">{ "Upcoming Deadlines" }</div>
                          {
                              if summary.upcoming.is_empty() {
                                  html! { <div class="empty">{ "Nothing due." }</div> }
                              } else {
                                  html! {
                                      <ul>
                                          {
                                              for summary.upcoming.iter().map(|task| html! {
                                                  <li key={task.id.clone()}>
                                                      { format!("{} (due {})", task.title, display_due(&task.due_date)) }
                                                  </li>
                                              })
                                          }
                                      </ul>
                                  }
                              }
                          }
                      </div>
                  }
              } else {
                  html! {}
              }
          }
      </div>
  }
}
