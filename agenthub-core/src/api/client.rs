use std::time::Duration;

use reqwest::header::{ACCEPT, CACHE_CONTROL};
use reqwest::{Client, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::HubConfig;
use crate::error::{HubError, HubResult};
use crate::models::{Task, TaskAgent, TaskCreate};

/// HTTP client for the hub backend.
///
/// Normal calls carry the configured request timeout; stream requests only
/// carry the connect timeout since a chat stream may stay open for a while.
#[derive(Debug, Clone)]
pub struct HubClient {
    client: Client,
    base_url: String,
    prefix: String,
    request_timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct TaskListResponse {
    #[serde(default)]
    tasks: Vec<Task>,
}

#[derive(Debug, Deserialize)]
struct TaskAgentsResponse {
    #[serde(default)]
    agents: Vec<TaskAgent>,
}

#[derive(Debug, Deserialize)]
struct AgentChatResponse {
    #[serde(default)]
    response: Option<String>,
}

#[derive(Debug, Serialize)]
struct AgentChatRequest<'a> {
    message: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

pub const NO_RESPONSE: &str = "No response received";

impl HubClient {
    pub fn new(config: &HubConfig) -> HubResult<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| HubError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
            prefix: config.api.prefix.trim_end_matches('/').to_string(),
            request_timeout: config.request_timeout(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Endpoint URL under the API prefix. Each segment is percent-encoded,
    /// so ids containing `/` or `?` stay inside their own segment.
    fn url(&self, segments: &[&str]) -> HubResult<Url> {
        let root = format!("{}{}/", self.base_url, self.prefix);
        let invalid = |message: String| HubError::InvalidConfigValue {
            key: "api.base_url".to_string(),
            message,
        };

        let mut url = Url::parse(&root).map_err(|e| invalid(format!("{}: {}", root, e)))?;
        url.path_segments_mut()
            .map_err(|_| invalid(format!("{} cannot carry a path", root)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn transport_error(&self, err: reqwest::Error) -> HubError {
        if err.is_timeout() {
            HubError::Timeout(self.request_timeout.as_secs())
        } else {
            err.into()
        }
    }

    async fn check_status(resp: Response) -> HubResult<Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        warn!("Hub API returned status {}", status);
        Err(HubError::http_status(status.as_u16(), body))
    }

    async fn decode<T: for<'de> Deserialize<'de>>(resp: Response) -> HubResult<T> {
        resp.json::<T>()
            .await
            .map_err(|e| HubError::ResponseParseError(e.to_string()))
    }

    /// `POST /tasks`
    pub async fn create_task(&self, body: &TaskCreate) -> HubResult<Task> {
        let url = self.url(&["tasks"])?;
        debug!("POST {}", url);

        let resp = self
            .client
            .post(url)
            .timeout(self.request_timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let resp = Self::check_status(resp).await?;
        Self::decode(resp).await
    }

    /// `GET /tasks`
    pub async fn list_tasks(&self) -> HubResult<Vec<Task>> {
        let url = self.url(&["tasks"])?;
        debug!("GET {}", url);

        let resp = self
            .client
            .get(url)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let resp = Self::check_status(resp).await?;
        let body: TaskListResponse = Self::decode(resp).await?;
        Ok(body.tasks)
    }

    /// `GET /tasks/{id}`; a 404 becomes [`HubError::TaskNotFound`].
    pub async fn get_task(&self, task_id: &str) -> HubResult<Task> {
        let url = self.url(&["tasks", task_id])?;
        debug!("GET {}", url);

        let resp = self
            .client
            .get(url)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Err(HubError::TaskNotFound(task_id.to_string()));
        }

        let resp = Self::check_status(resp).await?;
        Self::decode(resp).await
    }

    /// `GET /tasks/{id}/agents`
    pub async fn task_agents(&self, task_id: &str) -> HubResult<Vec<TaskAgent>> {
        let url = self.url(&["tasks", task_id, "agents"])?;
        debug!("GET {}", url);

        let resp = self
            .client
            .get(url)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Err(HubError::TaskNotFound(task_id.to_string()));
        }

        let resp = Self::check_status(resp).await?;
        let body: TaskAgentsResponse = Self::decode(resp).await?;
        Ok(body.agents)
    }

    /// `POST /agents/{id}/chat`. The backend reads the message from the query
    /// string; it is sent in the JSON body as well.
    pub async fn chat_with_agent(&self, agent_id: &str, message: &str) -> HubResult<String> {
        let url = self.url(&["agents", agent_id, "chat"])?;
        debug!("POST {}", url);

        let resp = self
            .client
            .post(url)
            .timeout(self.request_timeout)
            .query(&[("message", message)])
            .json(&AgentChatRequest { message })
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let resp = Self::check_status(resp).await?;
        let body: AgentChatResponse = Self::decode(resp).await?;
        Ok(body
            .response
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| NO_RESPONSE.to_string()))
    }

    /// `POST /stream-chat`; returns the response once its status is known to
    /// be successful. The body is read by the caller.
    pub async fn open_chat_stream(&self, task_id: &str, message: &str) -> HubResult<Response> {
        let url = self.url(&["stream-chat"])?;
        debug!(task_id = %task_id, "POST {}", url);

        let resp = self
            .client
            .post(url)
            .query(&[("task_id", task_id), ("message", message)])
            .header(ACCEPT, "text/event-stream")
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        Self::check_status(resp).await
    }

    /// `GET /health`, outside the API prefix.
    pub async fn health(&self) -> HubResult<HealthStatus> {
        let url = format!("{}/health", self.base_url);
        debug!("GET {}", url);

        let resp = self
            .client
            .get(url)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let resp = Self::check_status(resp).await?;
        Self::decode(resp).await
    }
}
