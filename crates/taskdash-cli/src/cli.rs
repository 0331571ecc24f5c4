use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::{ArgAction, Args, Parser, Subcommand};
use taskdash_core::datetime::validate_due;
use taskdash_core::list::SortKey;
use taskdash_shared::TaskPriority;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
pub struct KeyVal {
    pub key: String,
    pub value: String,
}

impl std::str::FromStr for KeyVal {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (k, v) = s
            .split_once('=')
            .ok_or_else(|| anyhow!("expected KEY=VALUE, got: {s}"))?;
        Ok(Self {
            key: k.trim().to_string(),
            value: v.trim().to_string(),
        })
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "taskdash",
    version,
    about = "Task dashboard: list, edit and summarize tasks on a remote task API"
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Config file to read instead of $TASKDASHRC / ~/.taskdashrc.
    #[arg(long = "config")]
    pub config: Option<PathBuf>,

    /// Base URL of the task API, overriding `api.url`.
    #[arg(long = "api")]
    pub api: Option<String>,

    #[arg(
        long = "rc",
        value_parser = clap::builder::ValueParser::new(|s: &str| s.parse::<KeyVal>()),
        action = ArgAction::Append
    )]
    pub rc_overrides: Vec<KeyVal>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List tasks, optionally sorted by `due` or `priority`.
    List {
        #[arg(long, value_parser = parse_sort_arg)]
        sort: Option<SortKey>,
    },
    /// Create a task.
    Add(NewTask),
    /// Replace the fields of an existing task; omitted fields keep their value.
    Edit {
        id: String,
        #[command(flatten)]
        fields: EditTask,
    },
    Delete {
        id: String,
    },
    /// Priority distribution and completion rate.
    Stats {
        /// Show the fixed sample figures instead of live data.
        #[arg(long)]
        sample: bool,
    },
    /// Tasks due after now.
    Upcoming,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    #[arg(long)]
    pub title: String,

    #[arg(long, default_value = "")]
    pub description: String,

    #[arg(long = "due", default_value = "", value_parser = parse_due_arg)]
    pub due: String,

    #[arg(long, default_value_t = TaskPriority::Medium, value_parser = parse_priority_arg)]
    pub priority: TaskPriority,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct EditTask {
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long = "due", value_parser = parse_due_arg)]
    pub due: Option<String>,

    #[arg(long, value_parser = parse_priority_arg)]
    pub priority: Option<TaskPriority>,
}

fn parse_priority_arg(raw: &str) -> Result<TaskPriority, String> {
    raw.parse::<TaskPriority>().map_err(|err| err.to_string())
}

fn parse_sort_arg(raw: &str) -> Result<SortKey, String> {
    raw.parse::<SortKey>().map_err(|err| err.to_string())
}

fn parse_due_arg(raw: &str) -> Result<String, String> {
    validate_due(raw).map_err(|err| err.to_string())?;
    Ok(raw.trim().to_string())
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let default_level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_defaults_to_medium_priority() {
        let cli = GlobalCli::try_parse_from(["taskdash", "add", "--title", "Ship"])
            .expect("parse add");
        let Some(Command::Add(task)) = cli.command else {
            panic!("expected add command");
        };
        assert_eq!(task.priority, TaskPriority::Medium);
        assert_eq!(task.due, "");
    }

    #[test]
    fn unknown_priority_is_rejected_at_the_boundary() {
        let parsed = GlobalCli::try_parse_from([
            "taskdash",
            "add",
            "--title",
            "Ship",
            "--priority",
            "Urgent",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn free_text_due_dates_are_rejected() {
        let parsed = GlobalCli::try_parse_from([
            "taskdash", "add", "--title", "Ship", "--due", "tomorrow",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn sort_keys_are_parsed_with_the_arguments() {
        let cli = GlobalCli::try_parse_from(["taskdash", "list", "--sort", "Priority"])
            .expect("parse list");
        assert_eq!(
            cli.command,
            Some(Command::List {
                sort: Some(SortKey::Priority)
            })
        );

        let parsed = GlobalCli::try_parse_from(["taskdash", "list", "--sort", "title"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn rc_overrides_and_global_flags() {
        let cli = GlobalCli::try_parse_from([
            "taskdash",
            "--rc",
            "default.sort=priority",
            "list",
            "-vv",
        ])
        .expect("parse list");
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.rc_overrides[0].key, "default.sort");
        assert_eq!(cli.command, Some(Command::List { sort: None }));
    }
}
