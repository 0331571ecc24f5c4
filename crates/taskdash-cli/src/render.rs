use std::io::Write;

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use taskdash_core::analytics::{ChartData, DashboardMode, DashboardSummary};
use taskdash_core::datetime::{display_due, parse_due};
use taskdash_core::{Notice, TaskDto, TaskPriority};
use unicode_width::UnicodeWidthStr;

use crate::config::Config;

const BAR_WIDTH: usize = 30;

#[derive(Debug)]
pub struct Renderer<W> {
    out: W,
    color: bool,
}

impl<W: Write> Renderer<W> {
    /// `tty` says whether `out` is a terminal; color is only emitted to one.
    pub fn new(cfg: &Config, out: W, tty: bool) -> anyhow::Result<Self> {
        let color = cfg.get_bool("color")?.unwrap_or(true);

        Ok(Self {
            out,
            color: color && tty,
        })
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    #[tracing::instrument(skip(self, tasks, now))]
    pub fn print_task_table(&mut self, tasks: &[TaskDto], now: DateTime<Utc>) -> anyhow::Result<()> {
        if tasks.is_empty() {
            writeln!(self.out, "No tasks.")?;
            return Ok(());
        }

        let headers = vec![
            "ID".to_string(),
            "Done".to_string(),
            "Due".to_string(),
            "Priority".to_string(),
            "Title".to_string(),
        ];

        let mut rows = Vec::with_capacity(tasks.len());
        for task in tasks {
            let due = display_due(&task.due_date);
            let overdue = !task.completed && parse_due(&task.due_date).is_some_and(|d| d < now);
            let due = if overdue { self.paint(&due, "31") } else { due };

            let priority = match task.priority {
                TaskPriority::High => self.paint(task.priority.as_str(), "1;31"),
                TaskPriority::Medium => self.paint(task.priority.as_str(), "33"),
                TaskPriority::Low => task.priority.as_str().to_string(),
            };

            rows.push(vec![
                self.paint(&task.id, "33"),
                if task.completed { "x".to_string() } else { String::new() },
                due,
                priority,
                task.title.clone(),
            ]);
        }

        write_table(&mut self.out, headers, rows)?;
        Ok(())
    }

    #[tracing::instrument(skip(self, task))]
    pub fn print_task_info(&mut self, task: &TaskDto) -> anyhow::Result<()> {
        writeln!(self.out, "id        {}", task.id)?;
        writeln!(self.out, "title     {}", task.title)?;
        writeln!(self.out, "desc      {}", task.description)?;
        writeln!(self.out, "due       {}", display_due(&task.due_date))?;
        writeln!(self.out, "priority  {}", task.priority)?;
        writeln!(
            self.out,
            "status    {}",
            if task.completed { "Completed" } else { "Pending" }
        )?;
        Ok(())
    }

    #[tracing::instrument(skip(self, summary))]
    pub fn print_summary(&mut self, summary: &DashboardSummary) -> anyhow::Result<()> {
        let heading = match summary.mode {
            DashboardMode::Sample => "Sample Data",
            DashboardMode::Live => "Live Data",
        };
        writeln!(self.out, "{}", self.paint(heading, "1"))?;
        self.print_chart(&summary.distribution_chart())?;

        if summary.mode == DashboardMode::Live {
            match summary.completion_rate {
                Some(rate) => writeln!(self.out, "Completed {:.0}%", rate * 100.0)?,
                None => writeln!(self.out, "Completed —")?,
            }
            writeln!(self.out, "Upcoming  {}", summary.upcoming.len())?;
        }
        Ok(())
    }

    fn print_chart(&mut self, chart: &ChartData) -> anyhow::Result<()> {
        writeln!(self.out, "{}", chart.title)?;
        let max = chart.max();
        let label_width = chart
            .slices
            .iter()
            .map(|slice| UnicodeWidthStr::width(slice.label.as_str()))
            .max()
            .unwrap_or(0);

        for slice in &chart.slices {
            let len = if max == 0 { 0 } else { slice.value * BAR_WIDTH / max };
            writeln!(
                self.out,
                "  {:label_width$}  {:>3}  {}",
                slice.label,
                slice.value,
                "#".repeat(len),
            )?;
        }
        Ok(())
    }

    /// Informational notices go to the output; errors are returned so the
    /// caller exits through the shared error path.
    pub fn print_notice(&mut self, notice: Option<Notice>) -> anyhow::Result<()> {
        match notice {
            Some(Notice::Info(text)) => writeln!(self.out, "{text}")?,
            Some(Notice::Error(text)) => return Err(anyhow!(text)),
            None => {}
        }
        Ok(())
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn write_table<W: Write>(
    mut writer: W,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    let column_count = headers.len();
    let mut widths = vec![0usize; column_count];

    for (idx, header) in headers.iter().enumerate() {
        widths[idx] = widths[idx].max(UnicodeWidthStr::width(header.as_str()));
    }

    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(UnicodeWidthStr::width(strip_ansi(cell).as_str()));
        }
    }

    for (header, width) in headers.iter().zip(&widths) {
        write!(writer, "{header:width$} ")?;
    }
    writeln!(writer)?;

    for width in &widths {
        write!(writer, "{:-<width$} ", "")?;
    }
    writeln!(writer)?;

    for row in rows {
        for (cell, width) in row.iter().zip(&widths) {
            let visible = UnicodeWidthStr::width(strip_ansi(cell).as_str());
            let padding = width.saturating_sub(visible);
            write!(writer, "{}{} ", cell, " ".repeat(padding))?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, title: &str, due: &str) -> TaskDto {
        TaskDto {
            id: id.to_string(),
            title: title.to_string(),
            description: String::new(),
            due_date: due.to_string(),
            priority: TaskPriority::High,
            completed: false,
        }
    }

    #[test]
    fn table_columns_align_without_color() {
        let mut renderer = Renderer::new(&Config::defaults(), Vec::new(), false).expect("renderer");
        renderer
            .print_task_table(&[task("1", "Ship", "2099-01-01"), task("22", "Café", "")], Utc::now())
            .expect("table");
        let text = String::from_utf8(renderer.into_inner()).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].starts_with("ID Done Due        Priority Title"));
        assert!(lines[2].starts_with("1       2099-01-01 High     Ship"));
        assert!(lines[3].starts_with("22      —          High     Café"));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn color_is_painted_for_terminals() {
        let mut renderer = Renderer::new(&Config::defaults(), Vec::new(), true).expect("renderer");
        renderer
            .print_task_table(&[task("1", "Ship", "2000-01-01")], Utc::now())
            .expect("table");
        let text = String::from_utf8(renderer.into_inner()).expect("utf8");
        assert!(text.contains("\x1b[31m2000-01-01\x1b[0m"));
    }

    #[test]
    fn sample_summary_bars_scale_to_the_largest_slice() {
        let mut renderer = Renderer::new(&Config::defaults(), Vec::new(), false).expect("renderer");
        renderer.print_summary(&DashboardSummary::sample()).expect("summary");
        let text = String::from_utf8(renderer.into_inner()).expect("utf8");

        assert!(text.starts_with("Sample Data\nTask Distribution\n"));
        assert!(text.contains(&format!("Medium   20  {}", "#".repeat(BAR_WIDTH))));
        assert!(text.contains(&format!("High     10  {}", "#".repeat(BAR_WIDTH / 2))));
        assert!(!text.contains("Upcoming"));
    }

    #[test]
    fn color_setting_follows_config_booleans() {
        let mut cfg = Config::defaults();
        cfg.apply_overrides(vec![("color".to_string(), "y".to_string())]);
        let mut renderer = Renderer::new(&cfg, Vec::new(), true).expect("y means on");
        renderer
            .print_task_table(&[task("1", "Ship", "2000-01-01")], Utc::now())
            .expect("table");
        let text = String::from_utf8(renderer.into_inner()).expect("utf8");
        assert!(text.contains("\x1b[31m2000-01-01\x1b[0m"));

        cfg.apply_overrides(vec![("color".to_string(), "sometimes".to_string())]);
        let err = Renderer::new(&cfg, Vec::new(), false).expect_err("unknown value");
        assert!(err.to_string().contains("invalid color setting"));
    }
}
