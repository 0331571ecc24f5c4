use std::fmt;
use std::str::FromStr;

use serde::{
  Deserialize,
  Serialize
};

#[derive(
  Debug,
  Clone,
  Copy,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
  Hash,
  Default,
)]
pub enum TaskPriority {
  High,
  #[default]
  Medium,
  Low
}

impl TaskPriority {
  pub const ALL: [TaskPriority; 3] = [
    TaskPriority::High,
    TaskPriority::Medium,
    TaskPriority::Low
  ];

  /// Sort rank, most urgent first.
  pub fn rank(self) -> u8 {
    match self {
      | TaskPriority::High => 1,
      | TaskPriority::Medium => 2,
      | TaskPriority::Low => 3
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      | TaskPriority::High => "High",
      | TaskPriority::Medium => "Medium",
      | TaskPriority::Low => "Low"
    }
  }
}

impl fmt::Display for TaskPriority {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(
  Debug, Clone, PartialEq, Eq, thiserror::Error,
)]
#[error(
  "unknown priority `{0}` (expected High, Medium or Low)"
)]
pub struct ParsePriorityError(pub String);

impl FromStr for TaskPriority {
  type Err = ParsePriorityError;

  fn from_str(
    s: &str
  ) -> Result<Self, Self::Err> {
    match s
      .trim()
      .to_ascii_lowercase()
      .as_str()
    {
      | "high" => Ok(TaskPriority::High),
      | "medium" => {
        Ok(TaskPriority::Medium)
      }
      | "low" => Ok(TaskPriority::Low),
      | _ => Err(ParsePriorityError(
        s.to_string()
      ))
    }
  }
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
#[serde(rename_all = "camelCase")]
pub struct TaskDto {
  #[serde(rename = "_id")]
  pub id:          String,
  pub title:       String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub due_date:    String,
  #[serde(default)]
  pub priority:    TaskPriority,
  #[serde(default)]
  pub completed:   bool
}

impl TaskDto {
  /// Full-record replacement with the
  /// editable fields of `fields`; id and
  /// completion are kept.
  pub fn with_fields(
    &self,
    fields: &TaskCreate
  ) -> TaskDto {
    TaskDto {
      id:          self.id.clone(),
      title:       fields.title.clone(),
      description: fields
        .description
        .clone(),
      due_date:    fields.due_date.clone(),
      priority:    fields.priority,
      completed:   self.completed
    }
  }
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
  Default,
)]
#[serde(rename_all = "camelCase")]
pub struct TaskCreate {
  pub title:       String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub due_date:    String,
  #[serde(default)]
  pub priority:    TaskPriority
}

impl From<&TaskDto> for TaskCreate {
  fn from(task: &TaskDto) -> Self {
    Self {
      title:       task.title.clone(),
      description: task
        .description
        .clone(),
      due_date:    task.due_date.clone(),
      priority:    task.priority
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn task_uses_wire_field_names() {
    let raw = r#"{
      "_id": "65a1",
      "title": "Ship it",
      "dueDate": "2099-01-01",
      "priority": "High"
    }"#;

    let task: TaskDto =
      serde_json::from_str(raw)
        .expect("decode task");
    assert_eq!(task.id, "65a1");
    assert_eq!(task.due_date, "2099-01-01");
    assert_eq!(
      task.priority,
      TaskPriority::High
    );
    assert!(task.description.is_empty());
    assert!(!task.completed);

    let value =
      serde_json::to_value(&task)
        .expect("encode task");
    assert_eq!(value["_id"], "65a1");
    assert_eq!(
      value["dueDate"],
      "2099-01-01"
    );
  }

  #[test]
  fn missing_priority_defaults_to_medium()
  {
    let task: TaskDto =
      serde_json::from_str(
        r#"{"_id":"1","title":"t"}"#
      )
      .expect("decode task");
    assert_eq!(
      task.priority,
      TaskPriority::Medium
    );
  }

  #[test]
  fn unknown_priority_is_rejected() {
    let decoded =
      serde_json::from_str::<TaskDto>(
        r#"{"_id":"1","title":"t","priority":"Urgent"}"#
      );
    assert!(decoded.is_err());

    let parsed =
      "urgent".parse::<TaskPriority>();
    assert_eq!(
      parsed,
      Err(ParsePriorityError(
        "urgent".to_string()
      ))
    );
    assert_eq!(
      " low ".parse::<TaskPriority>(),
      Ok(TaskPriority::Low)
    );
  }

  #[test]
  fn create_payload_defaults_match_blank_form()
  {
    let create = TaskCreate::default();
    let value =
      serde_json::to_value(&create)
        .expect("encode create");
    assert_eq!(
      value,
      serde_json::json!({
        "title": "",
        "description": "",
        "dueDate": "",
        "priority": "Medium"
      })
    );
  }

  #[test]
  fn ranks_order_high_before_low() {
    let ranks: Vec<u8> = TaskPriority::ALL
      .iter()
      .map(|p| p.rank())
      .collect();
    assert_eq!(ranks, vec![1, 2, 3]);
  }
}
