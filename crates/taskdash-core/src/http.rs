use reqwest::{Client, Response, Url};
use serde::Deserialize;
use taskdash_shared::{TaskCreate, TaskDto};
use tracing::{debug, instrument, warn};

use crate::error::{Result, TaskError};
use crate::service::TaskService;

/// REST client for the remote task API rooted at `base_url`:
/// `GET/POST {base}/tasks`, `PUT/DELETE {base}/tasks/{id}`.
#[derive(Debug, Clone)]
pub struct HttpTaskService {
    client: Client,
    tasks_url: Url,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(alias = "error")]
    message: String,
}

impl HttpTaskService {
    pub fn new(base_url: &str) -> Result<Self> {
        let mut tasks_url = Url::parse(base_url.trim())
            .map_err(|err| TaskError::validation("api url", format!("{base_url}: {err}")))?;
        tasks_url
            .path_segments_mut()
            .map_err(|_| TaskError::validation("api url", format!("{base_url} cannot be a base")))?
            .pop_if_empty()
            .push("tasks");

        debug!(url = %tasks_url, "configured task service");
        Ok(Self {
            client: Client::new(),
            tasks_url,
        })
    }

    pub fn tasks_url(&self) -> &Url {
        &self.tasks_url
    }

    fn task_url(&self, id: &str) -> Result<Url> {
        let mut url = self.tasks_url.clone();
        url.path_segments_mut()
            .map_err(|_| TaskError::Service(format!("{} cannot be a base", self.tasks_url)))?
            .push(id);
        Ok(url)
    }
}

/// Maps a non-success status to a service error, keeping the server's
/// message when the body carries one.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ErrorBody>(&body)
        .map(|parsed| parsed.message)
        .unwrap_or(body);
    warn!(%status, detail = %detail, "task service returned an error status");

    if detail.trim().is_empty() {
        Err(TaskError::Service(format!("HTTP {status}")))
    } else {
        Err(TaskError::Service(format!("HTTP {status}: {}", detail.trim())))
    }
}

impl TaskService for HttpTaskService {
    #[instrument(skip(self), fields(url = %self.tasks_url))]
    async fn fetch_tasks(&self) -> Result<Vec<TaskDto>> {
        let response = self.client.get(self.tasks_url.clone()).send().await?;
        let tasks: Vec<TaskDto> = check_status(response).await?.json().await?;
        debug!(count = tasks.len(), "fetched tasks");
        Ok(tasks)
    }

    #[instrument(skip(self, draft), fields(title_len = draft.title.len()))]
    async fn create_task(&self, draft: &TaskCreate) -> Result<TaskDto> {
        let response = self
            .client
            .post(self.tasks_url.clone())
            .json(draft)
            .send()
            .await?;
        let task: TaskDto = check_status(response).await?.json().await?;
        debug!(id = %task.id, "created task");
        Ok(task)
    }

    #[instrument(skip(self, draft))]
    async fn update_task(&self, id: &str, draft: &TaskCreate) -> Result<TaskDto> {
        let response = self
            .client
            .put(self.task_url(id)?)
            .json(draft)
            .send()
            .await?;
        let task: TaskDto = check_status(response).await?.json().await?;
        Ok(task)
    }

    #[instrument(skip(self))]
    async fn delete_task(&self, id: &str) -> Result<()> {
        let response = self.client.delete(self.task_url(id)?).send().await?;
        check_status(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tasks_url_appends_collection_segment() {
        let service = HttpTaskService::new("http://localhost:5000/api").expect("valid url");
        assert_eq!(service.tasks_url().as_str(), "http://localhost:5000/api/tasks");

        let trailing = HttpTaskService::new("http://localhost:5000/api/").expect("valid url");
        assert_eq!(trailing.tasks_url().as_str(), "http://localhost:5000/api/tasks");
    }

    #[test]
    fn task_ids_are_path_encoded() {
        let service = HttpTaskService::new("http://localhost:5000/api").expect("valid url");
        let url = service.task_url("a b/c").expect("task url");
        assert_eq!(url.as_str(), "http://localhost:5000/api/tasks/a%20b%2Fc");
    }

    #[test]
    fn relative_urls_are_rejected() {
        let err = HttpTaskService::new("/api").expect_err("relative url");
        assert!(matches!(err, TaskError::Validation { field: "api url", .. }));
    }
}
