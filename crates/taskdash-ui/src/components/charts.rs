use std::f64::consts::{
  FRAC_PI_2,
  TAU
};

use taskdash_core::analytics::{
  ChartData,
  CompletionPoint
};
use yew::{
  Html,
  Properties,
  function_component,
  html
};

const SIZE: f64 = 200.0;
const RADIUS: f64 = 80.0;
const PLOT_WIDTH: f64 = 320.0;
const PLOT_HEIGHT: f64 = 160.0;

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
  pub path:  String,
  pub color: &'static str,
  pub label: String,
  pub value: usize
}

/// SVG paths for each non-empty slice, clockwise from twelve o'clock.
pub fn pie_slices(
  data: &ChartData,
  cx: f64,
  cy: f64,
  r: f64
) -> Vec<PieSlice> {
  let total = data.total();
  if total == 0 {
    return Vec::new();
  }

  let mut start = -FRAC_PI_2;
  let mut out =
    Vec::with_capacity(data.slices.len());
  for slice in data
    .slices
    .iter()
    .filter(|slice| slice.value > 0)
  {
    let fraction =
      slice.value as f64 / total as f64;
    let path = if slice.value == total {
      // A single arc cannot close on itself; draw two halves.
      format!(
        "M {cx:.2} {:.2} A {r:.2} \
         {r:.2} 0 1 1 {cx:.2} {:.2} A \
         {r:.2} {r:.2} 0 1 1 {cx:.2} \
         {:.2} Z",
        cy - r,
        cy + r,
        cy - r
      )
    } else {
      let end = start + fraction * TAU;
      let large =
        u8::from(fraction > 0.5);
      format!(
        "M {cx:.2} {cy:.2} L {:.2} \
         {:.2} A {r:.2} {r:.2} 0 \
         {large} 1 {:.2} {:.2} Z",
        cx + r * start.cos(),
        cy + r * start.sin(),
        cx + r * end.cos(),
        cy + r * end.sin()
      )
    };
    start += fraction * TAU;
    out.push(PieSlice {
      path,
      color: slice.color,
      label: slice.label.clone(),
      value: slice.value
    });
  }
  out
}

/// Polyline points for a 0/1 series spread across `width`.
pub fn line_points(
  points: &[CompletionPoint],
  width: f64,
  height: f64
) -> String {
  let step = if points.len() > 1 {
    width / (points.len() - 1) as f64
  } else {
    0.0
  };
  points
    .iter()
    .enumerate()
    .map(|(idx, point)| {
      let x = idx as f64 * step;
      let y = height
        - f64::from(point.completed)
          * height;
      format!("{x:.2},{y:.2}")
    })
    .collect::<Vec<_>>()
    .join(" ")
}

#[derive(Properties, PartialEq)]
pub struct ChartProps {
  pub data: ChartData
}

#[function_component(PieChart)]
pub fn pie_chart(
  props: &ChartProps
) -> Html {
  let slices = pie_slices(
    &props.data,
    SIZE / 2.0,
    SIZE / 2.0,
    RADIUS
  );
  html! {
      <figure class="chart">
          <figcaption>{ &props.data.title }</figcaption>
          <svg width={SIZE.to_string()} height={SIZE.to_string()} viewBox="0 0 200 200">
              {
                  for slices.iter().map(|slice| html! {
                      <path d={slice.path.clone()} fill={slice.color}>
                          <title>{ format!("{}: {}", slice.label, slice.value) }</title>
                      </path>
                  })
              }
          </svg>
          <Legend data={props.data.clone()} />
      </figure>
  }
}

#[function_component(BarChart)]
pub fn bar_chart(
  props: &ChartProps
) -> Html {
  let max =
    props.data.max().max(1) as f64;
  let count =
    props.data.slices.len().max(1) as f64;
  let slot = PLOT_WIDTH / count;

  html! {
      <figure class="chart">
          <figcaption>{ "Task Priority" }</figcaption>
          <svg width={PLOT_WIDTH.to_string()} height={(PLOT_HEIGHT + 20.0).to_string()}>
              {
                  for props.data.slices.iter().enumerate().map(|(idx, slice)| {
                      let height = slice.value as f64 / max * PLOT_HEIGHT;
                      let x = idx as f64 * slot + slot * 0.15;
                      html! {
                          <g>
                              <rect
                                  x={format!("{x:.2}")}
                                  y={format!("{:.2}", PLOT_HEIGHT - height)}
                                  width={format!("{:.2}", slot * 0.7)}
                                  height={format!("{height:.2}")}
                                  fill={slice.color}
                              />
                              <text x={format!("{:.2}", x + slot * 0.35)} y={(PLOT_HEIGHT + 15.0).to_string()} text-anchor="middle">
                                  { &slice.label }
                              </text>
                          </g>
                      }
                  })
              }
          </svg>
      </figure>
  }
}

#[derive(Properties, PartialEq)]
pub struct LineChartProps {
  pub points: Vec<CompletionPoint>
}

#[function_component(LineChart)]
pub fn line_chart(
  props: &LineChartProps
) -> Html {
  if props.points.is_empty() {
    return html! {};
  }
  let points = line_points(
    &props.points,
    PLOT_WIDTH,
    PLOT_HEIGHT
  );

  html! {
      <figure class="chart">
          <figcaption>{ "Task Completion" }</figcaption>
          <svg width={PLOT_WIDTH.to_string()} height={PLOT_HEIGHT.to_string()} style="overflow:visible;">
              <polyline points={points} fill="none" stroke="#36A2EB" stroke-width="2" />
          </svg>
      </figure>
  }
}

#[function_component(Legend)]
fn legend(props: &ChartProps) -> Html {
  html! {
      <div class="legend">
          {
              for props.data.slices.iter().map(|slice| html! {
                  <span class="badge" style={format!("border-left:10px solid {};", slice.color)}>
                      { format!("{} {}", slice.label, slice.value) }
                  </span>
              })
          }
      </div>
  }
}
