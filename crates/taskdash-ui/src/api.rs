use std::rc::Rc;

use taskdash_core::http::HttpTaskService;
use taskdash_core::service::TaskService;
use taskdash_core::{
  Result,
  TaskCreate,
  TaskDto,
  TaskError
};

const DEFAULT_API_PATH: &str = "/api";

/// Handle to the remote task service shared by every component. A bad
/// build-time API url is kept as the error every call returns.
#[derive(Clone)]
pub struct TaskApi {
  inner: Rc<Result<HttpTaskService>>
}

impl PartialEq for TaskApi {
  fn eq(
    &self,
    other: &Self
  ) -> bool {
    Rc::ptr_eq(
      &self.inner,
      &other.inner
    )
  }
}

impl TaskApi {
  pub fn from_env() -> Self {
    let origin = web_sys::window()
      .and_then(|window| {
        window.location().origin().ok()
      })
      .unwrap_or_default();
    let configured = option_env!(
      "TASKDASH_API_URL"
    )
    .unwrap_or(DEFAULT_API_PATH);
    let base = resolve_api_base(
      configured, &origin
    );
    tracing::debug!(
      base = %base,
      "resolved task api base"
    );

    Self {
      inner: Rc::new(
        HttpTaskService::new(&base)
      )
    }
  }

  fn service(
    &self
  ) -> Result<&HttpTaskService> {
    (*self.inner)
      .as_ref()
      .map_err(TaskError::clone)
  }
}

impl TaskService for TaskApi {
  async fn fetch_tasks(
    &self
  ) -> Result<Vec<TaskDto>> {
    self.service()?.fetch_tasks().await
  }

  async fn create_task(
    &self,
    fields: &TaskCreate
  ) -> Result<TaskDto> {
    self
      .service()?
      .create_task(fields)
      .await
  }

  async fn update_task(
    &self,
    id: &str,
    fields: &TaskCreate
  ) -> Result<TaskDto> {
    self
      .service()?
      .update_task(id, fields)
      .await
  }

  async fn delete_task(
    &self,
    id: &str
  ) -> Result<()> {
    self
      .service()?
      .delete_task(id)
      .await
  }
}

/// Absolute urls are used as is; a path is resolved against the page origin.
fn resolve_api_base(
  configured: &str,
  origin: &str
) -> String {
  let configured = configured.trim();
  if configured.starts_with("http://")
    || configured
      .starts_with("https://")
  {
    return configured.to_string();
  }
  let path =
    if configured.starts_with('/') {
      configured.to_string()
    } else {
      format!("/{configured}")
    };
  format!(
    "{}{path}",
    origin.trim_end_matches('/')
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn paths_resolve_against_the_origin()
  {
    assert_eq!(
      resolve_api_base(
        "/api",
        "http://localhost:8080"
      ),
      "http://localhost:8080/api"
    );
    assert_eq!(
      resolve_api_base(
        "api/v1",
        "https://tasks.example/"
      ),
      "https://tasks.example/api/v1"
    );
  }

  #[test]
  fn absolute_urls_are_kept() {
    assert_eq!(
      resolve_api_base(
        " http://localhost:5000/api ",
        "http://localhost:8080"
      ),
      "http://localhost:5000/api"
    );
  }
}
