//! Aggregates behind the dashboard: priority distribution, the completion
//! series and the upcoming-deadline list. All of it is recomputed from a
//! task slice on demand; nothing here holds state.

use chrono::{DateTime, Utc};
use taskdash_shared::{TaskDto, TaskPriority};

use crate::datetime::{cmp_due, display_due, is_upcoming, parse_due};

pub const LIVE_COLORS: [&str; 3] = ["#FF5733", "#FFBD33", "#33FF57"];
pub const SAMPLE_COLORS: [&str; 3] = ["#FF6384", "#36A2EB", "#FFCE56"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PriorityDistribution {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl PriorityDistribution {
    pub fn from_tasks(tasks: &[TaskDto]) -> Self {
        let mut out = Self::default();
        for task in tasks {
            match task.priority {
                TaskPriority::High => out.high += 1,
                TaskPriority::Medium => out.medium += 1,
                TaskPriority::Low => out.low += 1,
            }
        }
        out
    }

    /// Fixed figures shown by the sample dashboard.
    pub fn sample() -> Self {
        Self {
            high: 10,
            medium: 20,
            low: 5,
        }
    }

    pub fn count(&self, priority: TaskPriority) -> usize {
        match priority {
            TaskPriority::High => self.high,
            TaskPriority::Medium => self.medium,
            TaskPriority::Low => self.low,
        }
    }

    pub fn total(&self) -> usize {
        self.high + self.medium + self.low
    }

    pub fn chart(&self, title: &str, colors: [&'static str; 3]) -> ChartData {
        ChartData {
            title: title.to_string(),
            slices: TaskPriority::ALL
                .iter()
                .zip(colors)
                .map(|(priority, color)| ChartSlice {
                    label: priority.to_string(),
                    value: self.count(*priority),
                    color,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSlice {
    pub label: String,
    pub value: usize,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartData {
    pub title: String,
    pub slices: Vec<ChartSlice>,
}

impl ChartData {
    pub fn total(&self) -> usize {
        self.slices.iter().map(|slice| slice.value).sum()
    }

    pub fn max(&self) -> usize {
        self.slices.iter().map(|slice| slice.value).max().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionPoint {
    pub label: String,
    pub due: Option<DateTime<Utc>>,
    pub completed: u8,
}

/// One point per task, 1 when completed and 0 otherwise, ordered by due date.
pub fn completion_series(tasks: &[TaskDto]) -> Vec<CompletionPoint> {
    let mut ordered: Vec<&TaskDto> = tasks.iter().collect();
    ordered.sort_by(|a, b| cmp_due(&a.due_date, &b.due_date));
    ordered
        .into_iter()
        .map(|task| CompletionPoint {
            label: display_due(&task.due_date),
            due: parse_due(&task.due_date),
            completed: u8::from(task.completed),
        })
        .collect()
}

pub fn completion_rate(tasks: &[TaskDto]) -> Option<f64> {
    if tasks.is_empty() {
        return None;
    }
    let done = tasks.iter().filter(|task| task.completed).count();
    Some(done as f64 / tasks.len() as f64)
}

/// Tasks due strictly after `now`, in list order.
pub fn upcoming(tasks: &[TaskDto], now: DateTime<Utc>) -> Vec<TaskDto> {
    tasks
        .iter()
        .filter(|task| is_upcoming(&task.due_date, now))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DashboardMode {
    Sample,
    #[default]
    Live,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub mode: DashboardMode,
    pub distribution: PriorityDistribution,
    pub completion: Vec<CompletionPoint>,
    pub completion_rate: Option<f64>,
    pub upcoming: Vec<TaskDto>,
}

impl DashboardSummary {
    pub fn live(tasks: &[TaskDto], now: DateTime<Utc>) -> Self {
        Self {
            mode: DashboardMode::Live,
            distribution: PriorityDistribution::from_tasks(tasks),
            completion: completion_series(tasks),
            completion_rate: completion_rate(tasks),
            upcoming: upcoming(tasks, now),
        }
    }

    pub fn sample() -> Self {
        Self {
            mode: DashboardMode::Sample,
            distribution: PriorityDistribution::sample(),
            completion: Vec::new(),
            completion_rate: None,
            upcoming: Vec::new(),
        }
    }

    pub fn distribution_chart(&self) -> ChartData {
        match self.mode {
            DashboardMode::Sample => self.distribution.chart("Task Distribution", SAMPLE_COLORS),
            DashboardMode::Live => self.distribution.chart("Task Distribution", LIVE_COLORS),
        }
    }
}
